use serde::{Deserialize, Serialize};

use crate::engine::narrator::BackendConfig;

#[derive(Serialize, Deserialize, Clone)]
pub struct AppSettings {
    pub backend: BackendConfig,
    pub ui_scale: f32,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            backend: BackendConfig::default(),
            ui_scale: 1.0,
        }
    }
}
