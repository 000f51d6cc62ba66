use std::time::{Duration, Instant};

use crate::util::generate_id;

const STATUS_AUTO_DISMISS: Duration = Duration::from_secs(6);
const MAX_STATUS_ENTRIES: usize = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Clone, Debug, PartialEq)]
pub struct StatusMessage {
    pub id: String,
    pub kind: StatusKind,
    pub text: String,
    pub created: Instant,
}

impl StatusMessage {
    pub fn new(kind: StatusKind, text: impl Into<String>) -> Self {
        Self {
            id: generate_id("status"),
            kind,
            text: text.into(),
            created: Instant::now(),
        }
    }
}

/// Recent status messages, newest last. Old ones fall off after a few
/// seconds or once the log is full.
#[derive(Clone, Debug, Default)]
pub struct StatusLog {
    entries: Vec<StatusMessage>,
}

impl StatusLog {
    pub fn push(&mut self, kind: StatusKind, message: impl Into<String>) {
        if self.entries.len() >= MAX_STATUS_ENTRIES {
            self.entries.remove(0);
        }
        self.entries.push(StatusMessage::new(kind, message));
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(StatusKind::Info, message);
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(StatusKind::Success, message);
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.push(StatusKind::Warning, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(StatusKind::Error, message);
    }

    pub fn latest(&self) -> Option<&StatusMessage> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops messages older than the auto-dismiss window.
    pub fn prune(&mut self, now: Instant) {
        self.entries
            .retain(|entry| now.saturating_duration_since(entry.created) < STATUS_AUTO_DISMISS);
    }

    pub fn dismiss(&mut self, id: &str) {
        self.entries.retain(|entry| entry.id != id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_only_the_newest_five() {
        let mut log = StatusLog::default();
        for n in 0..7 {
            log.info(format!("msg {n}"));
        }
        assert_eq!(log.len(), MAX_STATUS_ENTRIES);
        assert_eq!(log.entries[0].text, "msg 2");
        assert_eq!(log.latest().unwrap().text, "msg 6");
    }

    #[test]
    fn prune_expires_old_messages() {
        let mut log = StatusLog::default();
        log.error("boom");
        let created = log.latest().unwrap().created;
        log.prune(created + Duration::from_secs(1));
        assert_eq!(log.len(), 1);
        log.prune(created + STATUS_AUTO_DISMISS);
        assert!(log.is_empty());
    }

    #[test]
    fn dismiss_removes_by_id() {
        let mut log = StatusLog::default();
        log.success("one");
        log.warning("two");
        let id = log.latest().unwrap().id.clone();
        log.dismiss(&id);
        assert_eq!(log.latest().unwrap().text, "one");
        assert_eq!(log.latest().unwrap().kind, StatusKind::Success);
    }
}
