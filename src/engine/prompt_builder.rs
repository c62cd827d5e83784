use serde::Serialize;

use crate::engine::terrain::{self, LocalMap};
use crate::model::game_state::{GameState, HistoryEntry, ItemType, Quest, QuestSeed};

/// Keep the last few player/GM turn pairs in the request; the authoritative
/// history is never trimmed, only this view of it.
pub const MAX_HISTORY_TURNS: usize = 10;

/// Builds the full prompt sent to the narrator.
/// This struct is intentionally dumb: it only formats text and JSON.
/// No parsing, no networking, no engine logic.
pub struct PromptBuilder;

impl PromptBuilder {
    pub fn system_instruction() -> String {
        let mut prompt = String::new();

        push_role_rules(&mut prompt);
        push_highlight_rules(&mut prompt);
        push_world_awareness(&mut prompt);
        push_update_rules(&mut prompt);
        push_movement_rules(&mut prompt);
        push_quest_flow(&mut prompt);
        push_reminder(&mut prompt);

        prompt
    }

    /// The per-turn user message: the serialized game-state view.
    pub fn user_content(state: &GameState, command: &str) -> String {
        let request = TurnRequest::from_state(state, command);
        let payload = serde_json::to_string(&request).unwrap_or_else(|err| {
            log::warn!("turn request failed to serialize: {err}");
            String::from("{}")
        });
        format!("Game State: {payload}")
    }

    /// Single-string variant for backends without a system/user split.
    pub fn full_prompt(state: &GameState, command: &str) -> String {
        format!(
            "{}\n\n{}\n\nSekarang, hasilkan respons JSON berdasarkan perintah pemain.",
            Self::system_instruction(),
            Self::user_content(state, command)
        )
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TurnRequest<'a> {
    player_state: PlayerView<'a>,
    world_state: WorldView<'a>,
    history: &'a [HistoryEntry],
    quests: &'a [Quest],
    #[serde(skip_serializing_if = "Option::is_none")]
    active_quest_offer: Option<&'a QuestSeed>,
    player_command: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PlayerView<'a> {
    name: &'a str,
    level: u32,
    hp: i64,
    max_hp: i64,
    mp: i64,
    max_mp: i64,
    stats: CombatStats,
    gold: i64,
    inventory: Vec<ItemView<'a>>,
}

#[derive(Serialize)]
struct CombatStats {
    atk: i64,
    def: i64,
}

#[derive(Serialize)]
struct ItemView<'a> {
    id: &'a str,
    name: &'a str,
    #[serde(rename = "type")]
    kind: ItemType,
    #[serde(skip_serializing_if = "Option::is_none")]
    equipped: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    count: Option<u32>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WorldView<'a> {
    location: LocationView,
    time_of_day: &'a str,
    active_enemies: Vec<EnemyView<'a>>,
    local_map: LocalMap,
}

#[derive(Serialize)]
struct LocationView {
    coords: crate::model::game_state::Coords,
    #[serde(rename = "type")]
    kind: crate::engine::terrain::TerrainKind,
}

#[derive(Serialize)]
struct EnemyView<'a> {
    id: &'a str,
    name: &'a str,
    hp: i64,
}

impl<'a> TurnRequest<'a> {
    fn from_state(state: &'a GameState, command: &'a str) -> Self {
        let player = &state.player;
        let world = &state.world;
        let coords = world.location.coords;

        let history_start = state.history.len().saturating_sub(MAX_HISTORY_TURNS);

        Self {
            player_state: PlayerView {
                name: &player.name,
                level: player.lvl,
                hp: player.hp,
                max_hp: player.max_hp,
                mp: player.mp,
                max_mp: player.max_mp,
                stats: CombatStats {
                    atk: player.atk,
                    def: player.def,
                },
                gold: player.gold,
                inventory: player
                    .inventory
                    .iter()
                    .map(|item| ItemView {
                        id: &item.id,
                        name: &item.name,
                        kind: item.kind,
                        equipped: item.is_equipment().then_some(item.equipped),
                        count: item.count,
                    })
                    .collect(),
            },
            world_state: WorldView {
                location: LocationView {
                    coords,
                    kind: world.location.kind,
                },
                time_of_day: world.time_of_day.label(),
                active_enemies: world
                    .active_enemies
                    .iter()
                    .map(|enemy| EnemyView {
                        id: &enemy.id,
                        name: &enemy.name,
                        hp: enemy.hp,
                    })
                    .collect(),
                local_map: terrain::local_map(coords.x, coords.y),
            },
            history: &state.history[history_start..],
            quests: &state.quests,
            active_quest_offer: state.quest_offer.as_ref(),
            player_command: command,
        }
    }
}

fn push_role_rules(prompt: &mut String) {
    prompt.push_str(
        "You are a master Game Master for a text-based RPG.\n\n\
Rules:\n\
- You receive the current game state, the recent conversation history, and the player's latest command.\n\
- Your response MUST be a single JSON object matching the documented response shape. No markdown, no extra sections.\n\
- All output is final, player-facing text. NEVER include your internal thought process, brainstorming, or self-corrections.\n\
- All text for the player must be in Bahasa Indonesia.\n\n",
    );
}

fn push_highlight_rules(prompt: &mut String) {
    prompt.push_str(
        "Narration and Highlighting:\n\
- narration describes what happens in response to the player's command; set the scene and advance the story.\n\
- Highlight key elements with this syntax:\n\
  - **Lokasi Penting** for locations.\n\
  - *Karakter atau Musuh* for NPC or enemy names inside a sentence. Never use single asterisks for whole sentences or bullet points.\n\
  - [Nama Item] for items.\n\
  - _Aksi atau Kata Kunci_ for important actions or concepts.\n\n",
    );
}

fn push_world_awareness(prompt: &mut String) {
    prompt.push_str(
        "World Awareness:\n\
- The localMap object describes the tiles immediately surrounding the player and is the absolute ground truth of the world's geography.\n\
- When describing the environment, your narration MUST be consistent with localMap. Do not invent geography that contradicts it.\n\n",
    );
}

fn push_update_rules(prompt: &mut String) {
    prompt.push_str(
        "Game Logic and State Updates:\n\
- logEntries: short, specific log messages for events like taking damage, finding items, or gaining experience.\n\
- playerUpdates: use set for absolute values (like new coordinates) and increment for relative changes (like losing HP or gaining EXP).\n\
- inventoryUpdates: add new items, remove items by id, update item properties.\n\
- enemyUpdates: add new enemies, remove them when defeated, update their hp during combat.\n\
- suggestedActions: up to four short follow-up commands the player might type next.\n\n",
    );
}

fn push_movement_rules(prompt: &mut String) {
    prompt.push_str(
        "Movement and Exploration:\n\
- Movement is step by step: you may move the player at most ONE TILE per turn, via playerUpdates.set.coords changing x or y by exactly 1.\n\
- Narrate the single step of the journey and what the player sees.\n\
- For complex or ambiguous commands, do NOT move the player; propose the first logical step and ask for confirmation.\n\
- ABSOLUTELY DO NOT teleport the player to a distant location in a single turn. The journey is part of the adventure.\n\n",
    );
}

fn push_quest_flow(prompt: &mut String) {
    prompt.push_str(
        "Quest Flow:\n\
- Check the quests array before offering anything; never re-issue a quest that is already active, completed, or failed.\n\
- To introduce a new quest, use the questOffer field with a unique id, a title, and a concise narrative description. Do NOT add it to the quest log yet.\n\
- Quest descriptions are story-facing: no reward lists, no experience points, no game rules.\n\
- The player's accept/reject choice comes back as a command (e.g. \"Terima quest 'goblin_slaying'\"). Verify the id against activeQuestOffer; on accept, add the quest via questUpdates.add with the offer's details. On reject, respond with narration only.\n\
- When the player fulfills a quest, set its status to COMPLETED via questUpdates.update and grant rewards via playerUpdates and inventoryUpdates.\n\n",
    );
}

fn push_reminder(prompt: &mut String) {
    prompt.push_str(
        "REMINDER:\n\
- Respond with one valid JSON object only; all keys and string values use double quotes.\n\
- The narration field is required; every other field is optional.\n\
- Keep the game balanced and creative. Introduce interesting NPCs, plot hooks, and locations.\n",
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::game_state::HistoryRole;

    #[test]
    fn user_content_carries_the_local_map_and_command() {
        let state = GameState::default();
        let content = PromptBuilder::user_content(&state, "lihat peta");

        let json: serde_json::Value =
            serde_json::from_str(content.strip_prefix("Game State: ").unwrap()).unwrap();
        assert_eq!(json["playerCommand"], "lihat peta");
        assert_eq!(json["worldState"]["location"]["type"], "village");
        assert!(json["worldState"]["localMap"]["northEast"].is_string());
        assert_eq!(json["playerState"]["inventory"][0]["id"], "rusty_sword");
    }

    #[test]
    fn request_history_is_truncated_to_recent_turns() {
        let mut state = GameState::default();
        for i in 0..30 {
            state.history.push(HistoryEntry {
                role: HistoryRole::Player,
                content: format!("perintah {i}"),
            });
        }

        let content = PromptBuilder::user_content(&state, "x");
        let json: serde_json::Value =
            serde_json::from_str(content.strip_prefix("Game State: ").unwrap()).unwrap();
        let history = json["history"].as_array().unwrap();
        assert_eq!(history.len(), MAX_HISTORY_TURNS);
        assert_eq!(history.last().unwrap()["content"], "perintah 29");
        // The authoritative history is untouched.
        assert_eq!(state.history.len(), 30);
    }
}
