use serde::{Deserialize, Serialize};

/// Toast-style events reported alongside a reconciled state, decoupled from
/// the narrative log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Notification {
    QuestStarted { title: String },
    QuestCompleted { title: String },
    QuestFailed { title: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Error,
}

impl Notification {
    pub fn message(&self) -> String {
        match self {
            Notification::QuestStarted { title } => format!("Quest Dimulai: {title}"),
            Notification::QuestCompleted { title } => format!("Quest Selesai: {title}"),
            Notification::QuestFailed { title } => format!("Quest Gagal: {title}"),
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            Notification::QuestStarted { .. } => Severity::Info,
            Notification::QuestCompleted { .. } => Severity::Success,
            Notification::QuestFailed { .. } => Severity::Error,
        }
    }
}
