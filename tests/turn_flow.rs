//! Drives the engine thread end-to-end with a scripted narrator.

use std::sync::mpsc;
use std::sync::Mutex;
use std::time::Duration;

use wayfarer::engine::engine::Engine;
use wayfarer::engine::narrator::{BackendConfig, BackendKind, HttpNarrator, Narrator};
use wayfarer::engine::protocol::{EngineCommand, EngineResponse};
use wayfarer::model::delta::DeltaPayload;
use wayfarer::model::game_state::{GameState, LogEntry, QuestStatus};
use wayfarer::model::notification::Notification;

struct ScriptedNarrator {
    deltas: Mutex<Vec<DeltaPayload>>,
}

impl ScriptedNarrator {
    fn new(raw: &[&str]) -> Self {
        let deltas = raw
            .iter()
            .map(|json| DeltaPayload::from_json(json).expect("scripted delta must parse"))
            .collect();
        Self {
            deltas: Mutex::new(deltas),
        }
    }
}

impl Narrator for ScriptedNarrator {
    fn request_turn(&self, _state: &GameState, _command: &str) -> DeltaPayload {
        let mut deltas = self.deltas.lock().unwrap();
        if deltas.is_empty() {
            DeltaPayload::narration_only("…", Vec::new())
        } else {
            deltas.remove(0)
        }
    }
}

fn spawn_engine(
    narrator: Box<dyn Narrator>,
) -> (mpsc::Sender<EngineCommand>, mpsc::Receiver<EngineResponse>) {
    let (cmd_tx, cmd_rx) = mpsc::channel();
    let (resp_tx, resp_rx) = mpsc::channel();
    std::thread::spawn(move || {
        Engine::new(cmd_rx, resp_tx, narrator).run();
    });
    (cmd_tx, resp_rx)
}

fn next_response(rx: &mpsc::Receiver<EngineResponse>) -> EngineResponse {
    rx.recv_timeout(Duration::from_secs(10))
        .expect("engine should respond")
}

#[test]
fn a_turn_marks_loading_then_commits_the_reconciled_state() {
    let narrator = ScriptedNarrator::new(&[r#"{
        "narration": "Seekor *goblin* melompat keluar dari semak!",
        "playerUpdates": { "increment": { "exp": 250 } },
        "enemyUpdates": { "add": [
            { "id": "goblin", "name": "Goblin", "hp": 12, "maxHp": 12 }
        ] },
        "suggestedActions": ["serang goblin", "lari"]
    }"#]);
    let (cmd_tx, resp_rx) = spawn_engine(Box::new(narrator));

    cmd_tx
        .send(EngineCommand::Submit("masuk hutan".to_string()))
        .unwrap();

    let EngineResponse::StateChanged(loading) = next_response(&resp_rx) else {
        panic!("expected the interim loading snapshot first");
    };
    assert!(loading.is_loading);
    assert!(loading.suggested_actions.is_empty());

    let EngineResponse::TurnCompleted { state, .. } = next_response(&resp_rx) else {
        panic!("expected the committed snapshot");
    };
    assert!(!state.is_loading);
    assert_eq!(state.world.active_enemies.len(), 1);
    assert_eq!(state.suggested_actions, vec!["serang goblin", "lari"]);
    assert!(state
        .log
        .iter()
        .any(|entry| matches!(entry, LogEntry::CombatBanner { .. })));

    // 250 exp against a 100 threshold crosses two levels in one turn.
    assert_eq!(state.player.lvl, 3);
    assert_eq!(state.player.exp, 0);
    assert_eq!(state.player.hp, state.player.max_hp);
}

#[test]
fn starting_a_game_names_the_player_and_issues_the_opening_command() {
    let narrator = ScriptedNarrator::new(&[r#"{
        "narration": "Selamat datang di **Desa Oakvale**, Sinta."
    }"#]);
    let (cmd_tx, resp_rx) = spawn_engine(Box::new(narrator));

    cmd_tx
        .send(EngineCommand::StartGame {
            name: "Sinta".to_string(),
        })
        .unwrap();

    let _loading = next_response(&resp_rx);
    let EngineResponse::TurnCompleted { state, .. } = next_response(&resp_rx) else {
        panic!("expected the committed snapshot");
    };

    assert_eq!(state.player.name, "Sinta");
    let LogEntry::Player { content } = &state.log[0] else {
        panic!("first log entry should be the opening command");
    };
    assert!(content.contains("Sinta"));
    assert!(content.contains("Mulai petualangan"));
}

#[test]
fn accepting_an_offer_turns_it_into_an_active_quest() {
    let narrator = ScriptedNarrator::new(&[
        r#"{
            "narration": "Seorang wanita tua mendekatimu.",
            "questOffer": { "id": "cursed_well", "title": "Air Sumur Terkutuk",
                            "description": "Ambilkan air dari sumur terkutuk." }
        }"#,
        r#"{
            "narration": "Dia tersenyum lega.",
            "questUpdates": { "add": [
                { "id": "cursed_well", "title": "Air Sumur Terkutuk",
                  "description": "Ambilkan air dari sumur terkutuk." }
            ] }
        }"#,
    ]);
    let (cmd_tx, resp_rx) = spawn_engine(Box::new(narrator));

    cmd_tx
        .send(EngineCommand::Submit("bicara dengan wanita tua".to_string()))
        .unwrap();
    let _loading = next_response(&resp_rx);
    let EngineResponse::TurnCompleted { state, .. } = next_response(&resp_rx) else {
        panic!("expected the offer snapshot");
    };
    assert_eq!(
        state.quest_offer.as_ref().map(|offer| offer.id.as_str()),
        Some("cursed_well")
    );

    cmd_tx.send(EngineCommand::AcceptQuest).unwrap();
    let _loading = next_response(&resp_rx);
    let EngineResponse::TurnCompleted {
        state,
        notifications,
    } = next_response(&resp_rx)
    else {
        panic!("expected the accepted snapshot");
    };

    // The acceptance command quotes the offer id for the narrator.
    let LogEntry::Player { content } = state
        .log
        .iter()
        .rev()
        .find(|entry| matches!(entry, LogEntry::Player { .. }))
        .unwrap()
    else {
        unreachable!()
    };
    assert_eq!(content, "Terima quest 'cursed_well'");

    assert_eq!(state.quests.len(), 1);
    assert_eq!(state.quests[0].status, QuestStatus::Active);
    // The offer never survives the turn that consumed it.
    assert!(state.quest_offer.is_none());
    assert_eq!(
        notifications,
        vec![Notification::QuestStarted {
            title: "Air Sumur Terkutuk".to_string()
        }]
    );
}

#[test]
fn an_unreachable_backend_still_produces_a_safe_turn() {
    // Nothing listens on the discard port; the narrator must swallow the
    // transport failure and hand back an inert delta.
    let narrator = HttpNarrator::new(BackendConfig {
        kind: BackendKind::Ollama,
        endpoint: "http://127.0.0.1:9/api/generate".to_string(),
        model: "llama3".to_string(),
    });
    let (cmd_tx, resp_rx) = spawn_engine(Box::new(narrator));

    cmd_tx
        .send(EngineCommand::Submit("halo?".to_string()))
        .unwrap();

    let _loading = next_response(&resp_rx);
    let response = resp_rx
        .recv_timeout(Duration::from_secs(150))
        .expect("engine should respond even without a backend");
    let EngineResponse::TurnCompleted { state, .. } = response else {
        panic!("expected the committed snapshot");
    };

    let baseline = GameState::default();
    assert_eq!(state.player, baseline.player);
    assert_eq!(state.world, baseline.world);
    assert_eq!(state.quests, baseline.quests);
    assert!(!state.is_loading);
    // Only the log and history grew, and the narration explains the failure.
    assert!(state
        .log
        .iter()
        .any(|entry| matches!(entry, LogEntry::Narration { content } if !content.is_empty())));
}
