use crate::player::PlayerId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub id: String,
    pub label: String,
}

impl Choice {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self { id: id.into(), label: label.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PendingKind {
    Select { options: Vec<Choice>, min: usize, max: usize },
    Input { min: u64, max: u64, step: u64 },
    Confirm { message: String },
    View { message: String },
}

/// What the engine is waiting for, and from whom.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingAction {
    pub kind: PendingKind,
    pub targets: Vec<PlayerId>,
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl PendingAction {
    /// Single-choice select.
    pub fn select(targets: Vec<PlayerId>, prompt: impl Into<String>, options: Vec<Choice>) -> Self {
        Self {
            kind: PendingKind::Select { options, min: 1, max: 1 },
            targets,
            prompt: prompt.into(),
            note: None,
        }
    }

    pub fn input(targets: Vec<PlayerId>, prompt: impl Into<String>, min: u64, max: u64, step: u64) -> Self {
        Self { kind: PendingKind::Input { min, max, step }, targets, prompt: prompt.into(), note: None }
    }

    pub fn confirm(target: PlayerId, prompt: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: PendingKind::Confirm { message: message.into() },
            targets: vec![target],
            prompt: prompt.into(),
            note: None,
        }
    }

    /// Re-issue the same request with the reason the last answer was refused.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn is_for(&self, player: &PlayerId) -> bool {
        self.targets.contains(player)
    }

    pub fn has_option(&self, id: &str) -> bool {
        match &self.kind {
            PendingKind::Select { options, .. } => options.iter().any(|o| o.id == id),
            _ => false,
        }
    }
}
