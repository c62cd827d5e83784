use std::sync::mpsc;
use std::time::{Duration, Instant};

use eframe::egui;
use egui::{Color32, RichText};

use crate::engine::engine::Engine;
use crate::engine::narrator::{BackendKind, HttpNarrator};
use crate::engine::protocol::{EngineCommand, EngineResponse};
use crate::model::game_state::GameState;
use crate::model::notification::{Notification, Severity};
use crate::ui::settings::AppSettings;
use crate::ui::{center_panel, left_panel, right_panel, settings_io};

const TOAST_LIFETIME: Duration = Duration::from_secs(5);

/* =========================
   Phases
   ========================= */

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    BackendSelect,
    CharacterCreation,
    Playing,
}

struct ActiveToast {
    notification: Notification,
    shown_at: Instant,
}

/* =========================
   App
   ========================= */

pub struct App {
    phase: Phase,
    settings: AppSettings,
    name_input: String,
    command_input: String,
    snapshot: GameState,
    toasts: Vec<ActiveToast>,
    stick_to_bottom: bool,

    cmd_tx: mpsc::Sender<EngineCommand>,
    resp_rx: mpsc::Receiver<EngineResponse>,
}

impl App {
    pub fn new() -> Self {
        let settings = settings_io::load_settings();

        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (resp_tx, resp_rx) = mpsc::channel();

        let narrator = HttpNarrator::new(settings.backend.clone());
        std::thread::spawn(move || {
            let mut engine = Engine::new(cmd_rx, resp_tx, Box::new(narrator));
            engine.run();
        });

        Self {
            phase: Phase::BackendSelect,
            settings,
            name_input: String::new(),
            command_input: String::new(),
            snapshot: GameState::default(),
            toasts: Vec::new(),
            stick_to_bottom: false,
            cmd_tx,
            resp_rx,
        }
    }

    fn drain_responses(&mut self) {
        while let Ok(resp) = self.resp_rx.try_recv() {
            match resp {
                EngineResponse::StateChanged(state) => {
                    self.snapshot = state;
                    self.stick_to_bottom = true;
                }
                EngineResponse::TurnCompleted {
                    state,
                    notifications,
                } => {
                    self.snapshot = state;
                    self.stick_to_bottom = true;
                    let now = Instant::now();
                    self.toasts.extend(notifications.into_iter().map(|notification| ActiveToast {
                        notification,
                        shown_at: now,
                    }));
                }
            }
        }
    }

    fn send(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            log::error!("engine thread is gone");
        }
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

/* =========================
   egui App
   ========================= */

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _: &mut eframe::Frame) {
        ctx.set_pixels_per_point(self.settings.ui_scale);
        self.drain_responses();

        match self.phase {
            Phase::BackendSelect => self.draw_backend_select(ctx),
            Phase::CharacterCreation => self.draw_character_creation(ctx),
            Phase::Playing => self.draw_playing(ctx),
        }

        self.toasts.retain(|toast| toast.shown_at.elapsed() < TOAST_LIFETIME);
        draw_toasts(ctx, &self.toasts);

        if self.snapshot.is_loading || !self.toasts.is_empty() {
            ctx.request_repaint_after(Duration::from_millis(200));
        }
    }
}

impl App {
    fn draw_backend_select(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(60.0);
                ui.heading("Wayfarer");
                ui.label(RichText::new("Petualangan teks yang dinarasikan oleh AI").weak());
                ui.add_space(24.0);
            });

            let backend = &mut self.settings.backend;
            egui::Grid::new("backend_form").num_columns(2).show(ui, |ui| {
                ui.label("Layanan");
                egui::ComboBox::from_id_salt("backend_kind")
                    .selected_text(backend.kind.label())
                    .show_ui(ui, |ui| {
                        for kind in [BackendKind::Ollama, BackendKind::OpenAiCompatible] {
                            if ui
                                .selectable_value(&mut backend.kind, kind, kind.label())
                                .changed()
                            {
                                backend.endpoint = kind.default_endpoint().to_string();
                            }
                        }
                    });
                ui.end_row();

                ui.label("Endpoint");
                ui.text_edit_singleline(&mut backend.endpoint);
                ui.end_row();

                ui.label("Model");
                ui.text_edit_singleline(&mut backend.model);
                ui.end_row();

                ui.label("Skala UI");
                ui.add(egui::Slider::new(&mut self.settings.ui_scale, 0.75..=2.0));
                ui.end_row();
            });

            ui.add_space(16.0);
            let ready = !self.settings.backend.endpoint.trim().is_empty()
                && !self.settings.backend.model.trim().is_empty();
            if ui.add_enabled(ready, egui::Button::new("Lanjut")).clicked() {
                settings_io::save_settings(&self.settings);
                self.send(EngineCommand::ConfigureBackend(self.settings.backend.clone()));
                self.phase = Phase::CharacterCreation;
            }
        });
    }

    fn draw_character_creation(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(60.0);
                ui.heading("Siapa namamu, petualang?");
                ui.add_space(16.0);

                ui.add_sized(
                    [240.0, 24.0],
                    egui::TextEdit::singleline(&mut self.name_input).hint_text("Orion"),
                );

                ui.add_space(12.0);
                let ready = !self.name_input.trim().is_empty();
                if ui
                    .add_enabled(ready, egui::Button::new("Mulai Petualangan"))
                    .clicked()
                {
                    self.send(EngineCommand::StartGame {
                        name: self.name_input.trim().to_string(),
                    });
                    self.phase = Phase::Playing;
                }

                ui.add_space(8.0);
                if ui.small_button("Kembali ke pilihan layanan").clicked() {
                    self.phase = Phase::BackendSelect;
                }
            });
        });
    }

    fn draw_playing(&mut self, ctx: &egui::Context) {
        let mut outbox: Vec<EngineCommand> = Vec::new();

        egui::SidePanel::left("status")
            .resizable(true)
            .default_width(240.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    left_panel::draw(ui, &self.snapshot.player);
                });
            });

        egui::SidePanel::right("world")
            .resizable(true)
            .default_width(260.0)
            .min_width(220.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    right_panel::draw(ui, &self.snapshot);
                });
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            center_panel::draw(
                ui,
                &self.snapshot,
                &mut self.command_input,
                self.stick_to_bottom,
                &mut outbox,
            );
        });

        self.stick_to_bottom = false;

        for command in outbox {
            self.send(command);
        }
    }
}

/* =========================
   Toasts
   ========================= */

fn draw_toasts(ctx: &egui::Context, toasts: &[ActiveToast]) {
    if toasts.is_empty() {
        return;
    }

    egui::Area::new(egui::Id::new("toasts"))
        .anchor(egui::Align2::RIGHT_TOP, [-16.0, 16.0])
        .order(egui::Order::Foreground)
        .show(ctx, |ui| {
            for toast in toasts {
                let (icon, fill) = match toast.notification.severity() {
                    Severity::Info => ("📜", Color32::from_rgb(30, 90, 140)),
                    Severity::Success => ("✅", Color32::from_rgb(35, 110, 60)),
                    Severity::Error => ("❌", Color32::from_rgb(140, 45, 45)),
                };
                egui::Frame::new()
                    .fill(fill)
                    .corner_radius(6)
                    .inner_margin(egui::Margin::symmetric(10, 8))
                    .show(ui, |ui| {
                        ui.horizontal(|ui| {
                            ui.label(icon);
                            ui.label(
                                RichText::new(toast.notification.message()).color(Color32::WHITE),
                            );
                        });
                    });
                ui.add_space(6.0);
            }
        });
}
