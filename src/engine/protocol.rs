use crate::engine::narrator::BackendConfig;
use crate::model::game_state::GameState;
use crate::model::notification::Notification;

pub enum EngineCommand {
    /// Names the character (once) and issues the opening command.
    StartGame { name: String },
    Submit(String),
    AcceptQuest,
    RejectQuest,
    ConfigureBackend(BackendConfig),
}

pub enum EngineResponse {
    /// Interim snapshot: the turn is still in flight.
    StateChanged(GameState),
    TurnCompleted {
        state: GameState,
        notifications: Vec<Notification>,
    },
}
