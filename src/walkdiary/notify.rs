//! The "show message" channel.
//!
//! Most operations report back through the messages on their `CmdResult`.
//! Work that happens off the caller's path (the recording ticker sampling a
//! position every twenty seconds) has nobody to return to, so it reports
//! through a [`Notifier`] supplied by the UI instead.

use crate::commands::CmdMessage;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

pub trait Notifier: Send + Sync {
    fn notify(&self, message: CmdMessage);
}

pub type SharedNotifier = Arc<dyn Notifier>;

/// Drops every message.
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl Notifier for Silent {
    fn notify(&self, _message: CmdMessage) {}
}

/// Keeps every message, in order.
#[derive(Debug, Default)]
pub struct MessageLog {
    messages: Mutex<Vec<CmdMessage>>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> Vec<String> {
        self.lock().iter().map(|m| m.content.clone()).collect()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<CmdMessage>> {
        self.messages.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Notifier for MessageLog {
    fn notify(&self, message: CmdMessage) {
        self.lock().push(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_log_keeps_order() {
        let log = MessageLog::new();
        log.notify(CmdMessage::info("one"));
        log.notify(CmdMessage::warning("two"));
        assert_eq!(log.contents(), vec!["one", "two"]);
    }

    #[test]
    fn test_shared_notifier() {
        let log = Arc::new(MessageLog::new());
        let notifier: SharedNotifier = log.clone();
        notifier.notify(CmdMessage::success("saved"));
        Silent.notify(CmdMessage::error("dropped"));
        assert_eq!(log.contents(), vec!["saved"]);
    }
}
