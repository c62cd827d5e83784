use eframe::egui;
use egui::{Color32, Layout, RichText};

use crate::engine::protocol::EngineCommand;
use crate::model::game_state::{GameState, LogEntry};

/// Inline highlight syntax used by the narrator:
/// `**Lokasi**`, `*Karakter*`, `[Item]`, `_Aksi_`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Span {
    Plain(String),
    Location(String),
    Being(String),
    ItemRef(String),
    Action(String),
}

pub fn draw(
    ui: &mut egui::Ui,
    snapshot: &GameState,
    input: &mut String,
    stick_to_bottom: bool,
    outbox: &mut Vec<EngineCommand>,
) {
    let input_height = 84.0;

    egui::TopBottomPanel::bottom("command_area")
        .exact_height(input_height)
        .show_inside(ui, |ui| {
            draw_suggested_actions(ui, snapshot, outbox);
            draw_command_input(ui, snapshot, input, outbox);
        });

    egui::CentralPanel::default().show_inside(ui, |ui| {
        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .stick_to_bottom(stick_to_bottom)
            .show(ui, |ui| {
                for entry in &snapshot.log {
                    draw_log_entry(ui, entry);
                }
                if snapshot.is_loading {
                    ui.add_space(6.0);
                    ui.horizontal(|ui| {
                        ui.spinner();
                        ui.label(RichText::new("Sang Game Master sedang berpikir…").weak());
                    });
                }
            });
    });

    draw_quest_offer(ui, snapshot, outbox);
}

fn draw_log_entry(ui: &mut egui::Ui, entry: &LogEntry) {
    ui.add_space(6.0);
    match entry {
        LogEntry::Player { content } => {
            ui.with_layout(Layout::right_to_left(egui::Align::TOP), |ui| {
                bubble(ui, Color32::from_rgb(40, 70, 120), |ui| {
                    ui.label(RichText::new(format!("> {content}")).color(Color32::WHITE));
                });
            });
        }
        LogEntry::Narration { content } => {
            bubble(ui, Color32::from_rgb(40, 44, 52), |ui| {
                draw_highlighted(ui, content);
            });
        }
        LogEntry::System { content } => {
            ui.label(RichText::new(content).weak().italics().small());
        }
        LogEntry::CombatBanner { content } => {
            ui.vertical_centered(|ui| {
                ui.label(
                    RichText::new(content)
                        .color(Color32::from_rgb(220, 60, 60))
                        .strong()
                        .size(16.0),
                );
            });
        }
    }
}

fn bubble(ui: &mut egui::Ui, color: Color32, add_contents: impl FnOnce(&mut egui::Ui)) {
    egui::Frame::new()
        .fill(color)
        .corner_radius(8)
        .inner_margin(egui::Margin::symmetric(10, 6))
        .show(ui, add_contents);
}

fn draw_highlighted(ui: &mut egui::Ui, text: &str) {
    ui.horizontal_wrapped(|ui| {
        ui.spacing_mut().item_spacing.x = 0.0;
        for span in parse_highlights(text) {
            match span {
                Span::Plain(t) => {
                    ui.label(RichText::new(t).color(Color32::from_gray(220)));
                }
                Span::Location(t) => {
                    ui.label(RichText::new(t).color(Color32::from_rgb(250, 190, 80)).strong());
                }
                Span::Being(t) => {
                    ui.label(RichText::new(t).color(Color32::from_rgb(235, 110, 110)).italics());
                }
                Span::ItemRef(t) => {
                    ui.label(RichText::new(t).color(Color32::from_rgb(110, 200, 235)));
                }
                Span::Action(t) => {
                    ui.label(RichText::new(t).color(Color32::from_rgb(130, 215, 130)));
                }
            }
        }
    });
}

fn draw_suggested_actions(ui: &mut egui::Ui, snapshot: &GameState, outbox: &mut Vec<EngineCommand>) {
    if snapshot.suggested_actions.is_empty() {
        return;
    }
    ui.add_space(4.0);
    ui.horizontal_wrapped(|ui| {
        for action in &snapshot.suggested_actions {
            if ui
                .add_enabled(!snapshot.is_loading, egui::Button::new(action).small())
                .clicked()
            {
                outbox.push(EngineCommand::Submit(action.clone()));
            }
        }
    });
}

fn draw_command_input(
    ui: &mut egui::Ui,
    snapshot: &GameState,
    input: &mut String,
    outbox: &mut Vec<EngineCommand>,
) {
    ui.add_space(4.0);
    ui.horizontal(|ui| {
        let send = ui
            .add_enabled(!snapshot.is_loading, egui::Button::new("Kirim"))
            .clicked();

        let edit = ui.add_sized(
            ui.available_size(),
            egui::TextEdit::singleline(input).hint_text("Apa yang ingin kamu lakukan?"),
        );
        let entered = edit.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

        if (send || entered) && !snapshot.is_loading && !input.trim().is_empty() {
            outbox.push(EngineCommand::Submit(input.trim().to_string()));
            input.clear();
            edit.request_focus();
        }
    });
}

fn draw_quest_offer(ui: &mut egui::Ui, snapshot: &GameState, outbox: &mut Vec<EngineCommand>) {
    // Hidden while a turn is in flight so the buttons can't double-submit.
    let Some(offer) = &snapshot.quest_offer else {
        return;
    };
    if snapshot.is_loading {
        return;
    }

    egui::Window::new("Tawaran Quest")
        .anchor(egui::Align2::RIGHT_BOTTOM, [-16.0, -100.0])
        .collapsible(false)
        .resizable(false)
        .show(ui.ctx(), |ui| {
            ui.label(RichText::new(&offer.title).color(Color32::from_rgb(250, 190, 80)).strong());
            ui.add_space(4.0);
            draw_highlighted(ui, &offer.description);
            ui.add_space(8.0);
            ui.horizontal(|ui| {
                if ui.button(RichText::new("Terima").color(Color32::LIGHT_GREEN)).clicked() {
                    outbox.push(EngineCommand::AcceptQuest);
                }
                if ui.button(RichText::new("Tolak").color(Color32::LIGHT_RED)).clicked() {
                    outbox.push(EngineCommand::RejectQuest);
                }
            });
        });
}

/// Split narration into styled spans. Unterminated markers render literally.
pub fn parse_highlights(text: &str) -> Vec<Span> {
    let mut spans = Vec::new();
    let mut plain = String::new();
    let chars: Vec<char> = text.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        let (marker_len, close, build): (usize, &str, fn(String) -> Span) =
            if chars[i..].starts_with(&['*', '*']) {
                (2, "**", Span::Location)
            } else if chars[i] == '*' {
                (1, "*", Span::Being)
            } else if chars[i] == '[' {
                (1, "]", Span::ItemRef)
            } else if chars[i] == '_' {
                (1, "_", Span::Action)
            } else {
                plain.push(chars[i]);
                i += 1;
                continue;
            };

        let rest: String = chars[i + marker_len..].iter().collect();
        match rest.find(close) {
            Some(end) if end > 0 => {
                if !plain.is_empty() {
                    spans.push(Span::Plain(std::mem::take(&mut plain)));
                }
                let inner: String = rest[..end].to_string();
                let consumed = marker_len + inner.chars().count() + close.chars().count();
                spans.push(build(inner));
                i += consumed;
            }
            _ => {
                plain.push(chars[i]);
                i += 1;
            }
        }
    }

    if !plain.is_empty() {
        spans.push(Span::Plain(plain));
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn highlights_are_parsed_into_spans() {
        let spans = parse_highlights("Kamu tiba di **Desa Oakvale** dan melihat *goblin* membawa [Potion] lalu _kabur_.");
        assert!(spans.contains(&Span::Location("Desa Oakvale".to_string())));
        assert!(spans.contains(&Span::Being("goblin".to_string())));
        assert!(spans.contains(&Span::ItemRef("Potion".to_string())));
        assert!(spans.contains(&Span::Action("kabur".to_string())));
    }

    #[test]
    fn unterminated_markers_stay_literal() {
        let spans = parse_highlights("harga 3 * 4 gold");
        assert_eq!(spans, vec![Span::Plain("harga 3 * 4 gold".to_string())]);
    }

    #[test]
    fn plain_text_is_one_span() {
        let spans = parse_highlights("tidak ada sorotan");
        assert_eq!(spans.len(), 1);
    }
}
