use eframe::egui;
use egui::{Color32, RichText};

use crate::engine::terrain;
use crate::model::game_state::{GameState, Quest, QuestStatus};

const VIEW_RADIUS: i64 = 3;

pub fn draw(ui: &mut egui::Ui, snapshot: &GameState) {
    draw_map(ui, snapshot);
    ui.separator();
    draw_quest_log(ui, &snapshot.quests);
}

fn draw_map(ui: &mut egui::Ui, snapshot: &GameState) {
    let location = &snapshot.world.location;
    let coords = location.coords;

    ui.vertical_centered(|ui| {
        ui.label(RichText::new(&location.name).color(Color32::from_rgb(250, 190, 80)).strong());
        ui.label(RichText::new(location.kind.name()).weak());
        ui.label(
            RichText::new(format!("({}, {})", coords.x, coords.y))
                .weak()
                .small()
                .monospace(),
        );
        ui.label(RichText::new(snapshot.world.time_of_day.label()).weak().small());
    });

    ui.add_space(4.0);
    egui::Grid::new("local_map")
        .spacing([2.0, 2.0])
        .show(ui, |ui| {
            for dy in -VIEW_RADIUS..=VIEW_RADIUS {
                for dx in -VIEW_RADIUS..=VIEW_RADIUS {
                    let here = dx == 0 && dy == 0;
                    let tile = terrain::terrain_at(coords.x + dx, coords.y + dy);
                    let (glyph, fill) = if here {
                        ("🦸", Color32::from_rgb(120, 95, 30))
                    } else {
                        (tile.icon(), Color32::from_gray(45))
                    };

                    let cell = egui::Frame::new()
                        .fill(fill)
                        .corner_radius(3)
                        .inner_margin(egui::Margin::same(3))
                        .show(ui, |ui| {
                            ui.label(RichText::new(glyph).size(16.0));
                        });
                    let hover = if here {
                        format!("Kamu di sini: {}", location.name)
                    } else {
                        tile.name().to_string()
                    };
                    cell.response.on_hover_text(hover);
                }
                ui.end_row();
            }
        });

    // Compass: Utara / Selatan / Barat / Timur.
    ui.vertical_centered(|ui| {
        ui.label(RichText::new("U").weak().small());
        ui.label(RichText::new("B ─┼─ T").weak().small().monospace());
        ui.label(RichText::new("S").weak().small());
    });
}

fn draw_quest_log(ui: &mut egui::Ui, quests: &[Quest]) {
    ui.label(RichText::new("Quest").strong());

    if quests.is_empty() {
        ui.label(RichText::new("Belum ada quest.").weak().italics());
        return;
    }

    for quest in quests {
        let (mark, color) = match quest.status {
            QuestStatus::Active => ("●", Color32::from_rgb(240, 180, 60)),
            QuestStatus::Completed => ("✔", Color32::from_rgb(110, 200, 110)),
            QuestStatus::Failed => ("✘", Color32::from_rgb(220, 90, 90)),
        };

        ui.add_space(4.0);
        ui.horizontal(|ui| {
            ui.label(RichText::new(mark).color(color));
            ui.label(RichText::new(&quest.title).color(color).strong());
        });
        if !quest.description.is_empty() {
            ui.label(RichText::new(&quest.description).weak().small());
        }
    }
}
