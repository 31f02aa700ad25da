use crate::model::{Entry, Preferences, Trail};
use std::path::PathBuf;

pub mod export;
pub mod import;
pub mod list;
pub mod note;
pub mod nudge;
pub mod prefs;
pub mod reset;
pub mod trail;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub affected_entries: Vec<Entry>,
    pub listed_entries: Vec<Entry>,
    pub listed_trails: Vec<Trail>,
    pub export_path: Option<PathBuf>,
    pub prefs: Option<Preferences>,
    pub messages: Vec<CmdMessage>,
    /// Set when the command mutated the state and it needs persisting.
    pub state_changed: bool,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn mark_changed(&mut self) {
        self.state_changed = true;
    }

    pub fn with_listed_entries(mut self, entries: Vec<Entry>) -> Self {
        self.listed_entries = entries;
        self
    }

    pub fn with_listed_trails(mut self, trails: Vec<Trail>) -> Self {
        self.listed_trails = trails;
        self
    }

    pub fn with_export_path(mut self, path: PathBuf) -> Self {
        self.export_path = Some(path);
        self
    }

    pub fn with_prefs(mut self, prefs: Preferences) -> Self {
        self.prefs = Some(prefs);
        self
    }

    pub fn has_errors(&self) -> bool {
        self.messages
            .iter()
            .any(|m| m.level == MessageLevel::Error)
    }

    pub fn contains_message(&self, needle: &str) -> bool {
        self.messages.iter().any(|m| m.content.contains(needle))
    }
}
