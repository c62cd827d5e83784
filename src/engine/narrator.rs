use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::engine::llm_client;
use crate::engine::prompt_builder::PromptBuilder;
use crate::model::delta::DeltaPayload;
use crate::model::game_state::GameState;

/// The external text-generation collaborator. One call per turn.
///
/// Implementations must never fail to their caller: on any transport or
/// parse problem they resolve to an inert delta whose narration explains the
/// failure in player-facing language and which makes no state-mutating
/// claims, so feeding it through the reconciler is always safe.
pub trait Narrator: Send {
    fn request_turn(&self, state: &GameState, command: &str) -> DeltaPayload;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    Ollama,
    OpenAiCompatible,
}

impl BackendKind {
    pub fn label(&self) -> &'static str {
        match self {
            BackendKind::Ollama => "Ollama",
            BackendKind::OpenAiCompatible => "OpenAI-compatible (LM Studio)",
        }
    }

    pub fn default_endpoint(&self) -> &'static str {
        match self {
            BackendKind::Ollama => "http://localhost:11434/api/generate",
            BackendKind::OpenAiCompatible => "http://localhost:1234/v1/chat/completions",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    pub kind: BackendKind,
    pub endpoint: String,
    pub model: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            kind: BackendKind::Ollama,
            endpoint: BackendKind::Ollama.default_endpoint().to_string(),
            model: "llama3".to_string(),
        }
    }
}

pub struct HttpNarrator {
    config: BackendConfig,
    client: reqwest::blocking::Client,
}

impl HttpNarrator {
    pub fn new(config: BackendConfig) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .unwrap_or_default();
        Self { config, client }
    }

    fn try_request(&self, state: &GameState, command: &str) -> Result<DeltaPayload> {
        let raw = match self.config.kind {
            BackendKind::Ollama => llm_client::ollama_generate(
                &self.client,
                &self.config.endpoint,
                &self.config.model,
                &PromptBuilder::full_prompt(state, command),
            )?,
            BackendKind::OpenAiCompatible => llm_client::chat_completion(
                &self.client,
                &self.config.endpoint,
                &self.config.model,
                &PromptBuilder::system_instruction(),
                &PromptBuilder::user_content(state, command),
            )?,
        };

        DeltaPayload::from_json(strip_code_fences(&raw))
            .context("narrator response was not the expected JSON object")
    }
}

impl Narrator for HttpNarrator {
    fn request_turn(&self, state: &GameState, command: &str) -> DeltaPayload {
        match self.try_request(state, command) {
            Ok(delta) => delta,
            Err(err) => {
                log::warn!("narrator request failed: {err:#}");
                fallback_delta(&err, &self.config)
            }
        }
    }
}

/// Models love wrapping JSON in markdown fences; peel them off before parsing.
fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

fn fallback_delta(err: &anyhow::Error, config: &BackendConfig) -> DeltaPayload {
    let is_transport = err
        .chain()
        .filter_map(|cause| cause.downcast_ref::<reqwest::Error>())
        .any(|cause| cause.is_connect() || cause.is_timeout());

    if is_transport {
        DeltaPayload::narration_only(
            format!(
                "Seorang penyihir lokal yang kamu coba hubungi sepertinya tidak ada di rumah. \
                 Pastikan server narator Anda berjalan di `{}`. (Error: Gagal terhubung ke server lokal.)",
                config.endpoint
            ),
            vec!["Sistem: Koneksi ke narator gagal.".to_string()],
        )
    } else {
        DeltaPayload::narration_only(
            "Pesan sihir dari penyihir lokal menjadi kacau dan tidak dapat dipahami. \
             Sepertinya dia salah mengucapkan mantra. (Error: Gagal mem-parsing respons narator. \
             Pastikan model Anda dapat menghasilkan JSON yang valid.)",
            vec![format!("Sistem: Error narator - {err}")],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_fences_are_stripped() {
        assert_eq!(strip_code_fences("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fences("```\n{}\n```"), "{}");
        assert_eq!(strip_code_fences("  {\"a\":1}  "), "{\"a\":1}");
    }

    #[test]
    fn fallback_delta_makes_no_state_claims() {
        let err = anyhow::anyhow!("boom");
        let delta = fallback_delta(&err, &BackendConfig::default());

        assert!(!delta.narration.is_empty());
        assert!(delta.player_updates.is_none());
        assert!(delta.inventory_updates.is_none());
        assert!(delta.enemy_updates.is_none());
        assert!(delta.quest_updates.is_none());
        assert!(delta.quest_offer.is_none());
        assert!(delta.suggested_actions.is_empty());
    }
}
