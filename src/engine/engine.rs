use std::sync::mpsc::{Receiver, Sender};

use crate::engine::level_up::apply_level_ups;
use crate::engine::narrator::{HttpNarrator, Narrator};
use crate::engine::protocol::{EngineCommand, EngineResponse};
use crate::engine::reconcile::{reconcile, Reconciled};
use crate::model::game_state::GameState;

/// Owns the authoritative game state and runs the turn cycle on its own
/// thread. Single-flight by construction: commands are handled one at a
/// time, and the `is_loading` flag on the outgoing snapshots tells the UI
/// to hold further submissions until the turn completes.
pub struct Engine {
    rx: Receiver<EngineCommand>,
    tx: Sender<EngineResponse>,
    narrator: Box<dyn Narrator>,
    state: GameState,
}

impl Engine {
    pub fn new(
        rx: Receiver<EngineCommand>,
        tx: Sender<EngineResponse>,
        narrator: Box<dyn Narrator>,
    ) -> Self {
        Self {
            rx,
            tx,
            narrator,
            state: GameState::default(),
        }
    }

    pub fn run(&mut self) {
        while let Ok(cmd) = self.rx.recv() {
            match cmd {
                EngineCommand::StartGame { name } => {
                    // The name is set exactly once, at creation.
                    self.state.player.name = name;
                    let intro = format!(
                        "Perkenalkan karakterku, {}, yang baru saja tiba di dunia ini. Mulai petualangan.",
                        self.state.player.name
                    );
                    self.run_turn(intro);
                }

                EngineCommand::Submit(command) => self.run_turn(command),

                EngineCommand::AcceptQuest => {
                    if let Some(offer) = &self.state.quest_offer {
                        let command = format!("Terima quest '{}'", offer.id);
                        // The offer stays in the state for this request so the
                        // narrator can copy its details into questUpdates.add;
                        // reconciliation clears it afterwards.
                        self.run_turn(command);
                    }
                }

                EngineCommand::RejectQuest => {
                    if let Some(offer) = &self.state.quest_offer {
                        let command = format!("Tolak quest '{}'", offer.id);
                        self.run_turn(command);
                    }
                }

                EngineCommand::ConfigureBackend(config) => {
                    self.narrator = Box::new(HttpNarrator::new(config));
                }
            }
        }
    }

    /// One full request/response cycle. The narrator call is the only slow
    /// point; the state is untouched while it runs except for the loading
    /// flag and the cleared suggestions set at the start.
    fn run_turn(&mut self, command: String) {
        self.state.is_loading = true;
        self.state.suggested_actions.clear();
        let _ = self.tx.send(EngineResponse::StateChanged(self.state.clone()));

        let delta = self.narrator.request_turn(&self.state, &command);

        let Reconciled {
            mut state,
            notifications,
        } = reconcile(&self.state, &delta, &command);
        apply_level_ups(&mut state.player, &mut state.log);

        self.state = state;
        let _ = self.tx.send(EngineResponse::TurnCompleted {
            state: self.state.clone(),
            notifications,
        });
    }
}
