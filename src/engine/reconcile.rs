use crate::engine::terrain;
use crate::model::delta::{
    DeltaPayload, EnemyUpdates, IncrementFields, InventoryUpdates, PlayerUpdates, QuestUpdates,
    SetFields,
};
use crate::model::game_state::{
    Enemy, GameState, HistoryEntry, HistoryRole, Item, LogEntry, Quest, QuestSeed, QuestStatus,
};
use crate::model::notification::Notification;

pub const COMBAT_STARTED: &str = "PERTEMPURAN DIMULAI!";
pub const COMBAT_ENDED: &str = "Pertempuran Berakhir!";

/// Result of one turn: the next authoritative snapshot plus the toast events
/// it produced.
#[derive(Debug, Clone)]
pub struct Reconciled {
    pub state: GameState,
    pub notifications: Vec<Notification>,
}

/// Merge an untrusted delta into the previous snapshot, producing the next
/// one. Never fails: malformed or contradictory instructions are dropped
/// field by field (warned to the developer log, never to the player), and
/// every invariant violation is corrected at the point of merge.
///
/// The input state is not mutated; the caller adopts the returned snapshot
/// atomically.
pub fn reconcile(state: &GameState, delta: &DeltaPayload, command: &str) -> Reconciled {
    let mut next = state.clone();
    let mut notifications = Vec::new();
    let was_in_combat = !next.world.active_enemies.is_empty();

    next.history.push(HistoryEntry {
        role: HistoryRole::Player,
        content: command.to_string(),
    });
    next.history.push(HistoryEntry {
        role: HistoryRole::Narrator,
        content: delta.narration.clone(),
    });
    next.log.push(LogEntry::Player {
        content: command.to_string(),
    });
    next.log.push(LogEntry::Narration {
        content: delta.narration.clone(),
    });
    for entry in &delta.log_entries {
        next.log.push(LogEntry::System {
            content: entry.clone(),
        });
    }

    apply_quest_offer(&mut next, delta.quest_offer.as_ref());

    if let Some(updates) = &delta.player_updates {
        apply_player_updates(&mut next, updates);
    }
    if let Some(updates) = &delta.inventory_updates {
        apply_inventory_updates(&mut next.player.inventory, updates);
    }
    if let Some(updates) = &delta.enemy_updates {
        apply_enemy_updates(&mut next.world.active_enemies, updates);
    }
    if let Some(updates) = &delta.quest_updates {
        apply_quest_updates(&mut next.quests, updates, &mut notifications);
    }

    // Combat state is derived from roster cardinality alone, so a narrator
    // that forgets to announce a fight cannot desync the banner.
    let in_combat = !next.world.active_enemies.is_empty();
    if !was_in_combat && in_combat {
        next.log.push(LogEntry::CombatBanner {
            content: COMBAT_STARTED.to_string(),
        });
    } else if was_in_combat && !in_combat {
        next.log.push(LogEntry::CombatBanner {
            content: COMBAT_ENDED.to_string(),
        });
    }

    next.suggested_actions = delta.suggested_actions.clone();
    next.is_loading = false;

    Reconciled {
        state: next,
        notifications,
    }
}

/// At most one offer is outstanding. An offer missing its id, title or
/// description is discarded, and either way the previous offer is replaced.
fn apply_quest_offer(state: &mut GameState, offer: Option<&QuestSeed>) {
    state.quest_offer = match offer {
        Some(offer)
            if !offer.id.is_empty()
                && !offer.title.trim().is_empty()
                && !offer.description.trim().is_empty() =>
        {
            Some(offer.clone())
        }
        Some(offer) => {
            log::warn!("discarding invalid quest offer {:?}", offer.id);
            None
        }
        None => None,
    };
}

fn apply_player_updates(state: &mut GameState, updates: &PlayerUpdates) {
    if let Some(set) = &updates.set {
        apply_player_set(state, set);
    }
    if let Some(increment) = &updates.increment {
        apply_player_increment(state, increment);
    }
}

fn apply_player_set(state: &mut GameState, set: &SetFields) {
    for key in set.unrecognized.keys() {
        if key == "inventory" {
            // The inventory has its own merge path with stacking and
            // durability rules; a wholesale overwrite would bypass them.
            log::warn!("narrator tried to replace the inventory via a player set; ignored");
        } else {
            log::warn!("ignoring unrecognized player field {key:?}");
        }
    }

    let player = &mut state.player;
    if let Some(hp) = set.hp {
        player.hp = hp.round() as i64;
    }
    if let Some(mp) = set.mp {
        player.mp = mp.round() as i64;
    }
    if let Some(max_hp) = set.max_hp {
        player.max_hp = max_hp.round() as i64;
    }
    if let Some(max_mp) = set.max_mp {
        player.max_mp = max_mp.round() as i64;
    }
    if let Some(exp) = set.exp {
        player.exp = exp.round() as i64;
    }
    if let Some(gold) = set.gold {
        player.gold = gold.round() as i64;
    }
    if let Some(atk) = set.atk {
        player.atk = atk.round() as i64;
    }
    if let Some(def) = set.def {
        player.def = def.round() as i64;
    }

    // Movement lands on the world, not the player record, and refreshes the
    // derived terrain for the new tile.
    if let Some(coords) = set.coords {
        state.world.location.coords = coords;
        state.world.location.kind = terrain::terrain_at(coords.x, coords.y);
    }
    if let Some(name) = &set.location_name {
        if !name.trim().is_empty() {
            state.world.location.name = name.clone();
        }
    }
}

fn apply_player_increment(state: &mut GameState, increment: &IncrementFields) {
    for key in increment.unrecognized.keys() {
        log::warn!("ignoring unrecognized player increment {key:?}");
    }

    let player = &mut state.player;
    if let Some(hp) = increment.hp {
        player.hp += hp.round() as i64;
    }
    if let Some(mp) = increment.mp {
        player.mp += mp.round() as i64;
    }
    if let Some(exp) = increment.exp {
        player.exp += exp.round() as i64;
    }
    if let Some(gold) = increment.gold {
        // Not clamped: an inconsistent narrator can drive gold negative, and
        // the panel shows exactly what the story said happened.
        player.gold += gold.round() as i64;
    }
}

fn apply_inventory_updates(inventory: &mut Vec<Item>, updates: &InventoryUpdates) {
    for incoming in &updates.add {
        add_item(inventory, incoming);
    }

    for id in &updates.remove {
        let Some(index) = inventory.iter().position(|item| &item.id == id) else {
            log::warn!("removal of unknown item {id:?} ignored");
            continue;
        };
        let item = &mut inventory[index];
        match item.count {
            // Partial removal of a stack.
            Some(count) if !item.is_equipment() && count > 1 => item.count = Some(count - 1),
            _ => {
                inventory.remove(index);
            }
        }
    }

    for update in &updates.update {
        let Some(item) = inventory.iter_mut().find(|item| item.id == update.id) else {
            log::warn!("update for unknown item {:?} ignored", update.id);
            continue;
        };

        let changes = &update.changes;
        if let Some(name) = &changes.name {
            item.name = name.clone();
        }
        if let Some(icon) = &changes.icon {
            item.icon = icon.clone();
        }
        if let Some(kind) = changes.kind {
            item.kind = kind;
        }
        if let Some(equipped) = changes.equipped {
            item.equipped = equipped;
        }
        if let Some(slot) = changes.slot {
            item.slot = Some(slot);
        }
        if let Some(stats) = &changes.stats {
            item.stats = Some(stats.clone());
        }
        if let Some(durability) = changes.durability {
            item.durability = Some(durability);
        }
        if let Some(max_durability) = changes.max_durability {
            item.max_durability = Some(max_durability);
        }
        item.clamp_durability();

        if let Some(count) = changes.count {
            if count <= 0 {
                let id = update.id.clone();
                inventory.retain(|item| item.id != id);
            } else {
                item.count = Some(count as u32);
            }
        }
    }
}

fn add_item(inventory: &mut Vec<Item>, incoming: &Item) {
    // Stacking: non-equipment merges onto an existing non-equipment entry
    // with the same id. Equipment never stacks, even on an id collision.
    if !incoming.is_equipment() {
        if let Some(existing) = inventory
            .iter_mut()
            .find(|item| item.id == incoming.id && !item.is_equipment())
        {
            let count = existing.count.unwrap_or(0) + incoming.count.unwrap_or(1);
            existing.count = Some(count);
            return;
        }
    }

    let mut item = incoming.clone();
    if !item.is_equipment() && item.count.is_none() {
        item.count = Some(1);
    }
    item.clamp_durability();
    inventory.push(item);
}

fn apply_enemy_updates(enemies: &mut Vec<Enemy>, updates: &EnemyUpdates) {
    if !updates.remove.is_empty() {
        enemies.retain(|enemy| !updates.remove.contains(&enemy.id));
    }

    enemies.extend(updates.add.iter().cloned());

    for update in &updates.update {
        let Some(enemy) = enemies.iter_mut().find(|enemy| enemy.id == update.id) else {
            log::warn!("update for unknown enemy {:?} ignored", update.id);
            continue;
        };
        if let Some(hp) = update.changes.hp {
            enemy.hp = hp.round() as i64;
        }
    }
}

fn apply_quest_updates(
    quests: &mut Vec<Quest>,
    updates: &QuestUpdates,
    notifications: &mut Vec<Notification>,
) {
    for seed in &updates.add {
        // Idempotent: a re-add of a known quest id is a no-op.
        if quests.iter().any(|quest| quest.id == seed.id) {
            continue;
        }
        quests.push(Quest {
            id: seed.id.clone(),
            title: seed.title.clone(),
            description: seed.description.clone(),
            // Whatever the narrator implied, a freshly added quest is active.
            status: QuestStatus::Active,
        });
        notifications.push(Notification::QuestStarted {
            title: seed.title.clone(),
        });
    }

    for update in &updates.update {
        let Some(quest) = quests.iter_mut().find(|quest| quest.id == update.id) else {
            log::warn!("update for unknown quest {:?} ignored", update.id);
            continue;
        };
        if let Some(status) = update.changes.status {
            // Deliberately permissive: any status may overwrite any other,
            // including re-opening a completed quest.
            quest.status = status;
            match status {
                QuestStatus::Completed => notifications.push(Notification::QuestCompleted {
                    title: quest.title.clone(),
                }),
                QuestStatus::Failed => notifications.push(Notification::QuestFailed {
                    title: quest.title.clone(),
                }),
                QuestStatus::Active => {}
            }
        }
    }
}
