use eframe::egui;
use egui::{Color32, ProgressBar, RichText};

use crate::model::game_state::{EquipmentSlot, Item, ItemType, PlayerState};

pub fn draw(ui: &mut egui::Ui, player: &PlayerState) {
    ui.heading(&player.name);
    ui.label(RichText::new(format!("Level {}", player.lvl)).weak());
    ui.separator();

    stat_bar(ui, "HP", player.hp, player.max_hp, Color32::from_rgb(200, 70, 70));
    stat_bar(ui, "MP", player.mp, player.max_mp, Color32::from_rgb(80, 110, 220));
    stat_bar(ui, "EXP", player.exp, player.max_exp, Color32::from_rgb(240, 180, 60));

    ui.add_space(6.0);
    ui.horizontal(|ui| {
        ui.label(format!("⚔ ATK {}", player.atk));
        ui.label(format!("🛡 DEF {}", player.def));
    });
    ui.label(format!("🪙 {} gold", player.gold));

    ui.separator();
    draw_inventory(ui, &player.inventory);
}

fn stat_bar(ui: &mut egui::Ui, label: &str, value: i64, max: i64, color: Color32) {
    let fraction = if max > 0 {
        (value as f32 / max as f32).clamp(0.0, 1.0)
    } else {
        0.0
    };
    ui.add(
        ProgressBar::new(fraction)
            .fill(color)
            .text(format!("{label} {value}/{max}")),
    );
}

fn draw_inventory(ui: &mut egui::Ui, inventory: &[Item]) {
    ui.label(RichText::new("Tas").strong());

    if inventory.is_empty() {
        ui.label(RichText::new("Tasmu kosong.").weak().italics());
        return;
    }

    section(ui, "Equipment", inventory, |item| item.is_equipment());
    section(ui, "Consumables", inventory, |item| item.kind == ItemType::Consumable);
    section(ui, "Materials", inventory, |item| item.kind == ItemType::Material);
    section(ui, "Valuables", inventory, |item| item.kind == ItemType::Valuable);
    section(ui, "Key Items", inventory, |item| item.kind == ItemType::Key);
}

fn section(ui: &mut egui::Ui, title: &str, inventory: &[Item], keep: impl Fn(&Item) -> bool) {
    let items: Vec<&Item> = inventory.iter().filter(|item| keep(item)).collect();
    if items.is_empty() {
        return;
    }

    ui.add_space(4.0);
    ui.label(RichText::new(title).color(Color32::from_rgb(240, 200, 90)));
    for item in items {
        draw_item(ui, item);
    }
}

fn draw_item(ui: &mut egui::Ui, item: &Item) {
    ui.horizontal(|ui| {
        if item.is_equipment() {
            ui.label(slot_icon(item.slot));
        } else {
            ui.label(&item.icon);
        }

        let mut label = item.name.clone();
        if let Some(count) = item.count {
            label.push_str(&format!(" x{count}"));
        }
        let mut text = RichText::new(label);
        if item.is_equipment() && !item.equipped {
            text = text.weak();
        }
        ui.label(text);

        if let Some(stats) = &item.stats {
            let mut bonus = String::new();
            if let Some(atk) = stats.atk {
                bonus.push_str(&format!("ATK+{atk} "));
            }
            if let Some(def) = stats.def {
                bonus.push_str(&format!("DEF+{def}"));
            }
            if !bonus.is_empty() {
                ui.label(RichText::new(bonus.trim().to_string()).weak().small());
            }
        }

        if let (Some(durability), Some(max)) = (item.durability, item.max_durability) {
            ui.label(RichText::new(format!("{durability}/{max}")).weak().small());
        }
    });
}

fn slot_icon(slot: Option<EquipmentSlot>) -> &'static str {
    match slot {
        Some(EquipmentSlot::Weapon) => "⚔️",
        Some(EquipmentSlot::Armor) => "🛡️",
        Some(EquipmentSlot::Helmet) => "👑",
        None => "❔",
    }
}
