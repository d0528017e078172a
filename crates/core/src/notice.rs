//! Transient notices.
//!
//! At most one notice is active. Posting a new one replaces the previous
//! notice and restarts the dismissal clock.

use std::time::{Duration, Instant};

/// How long a notice stays visible.
pub const DEFAULT_NOTICE_TTL: Duration = Duration::from_millis(1200);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    pub posted_at: Instant,
}

#[derive(Debug, Clone)]
pub struct NoticeBoard {
    ttl: Duration,
    active: Option<Notice>,
}

impl Default for NoticeBoard {
    fn default() -> Self {
        NoticeBoard::new(DEFAULT_NOTICE_TTL)
    }
}

impl NoticeBoard {
    pub fn new(ttl: Duration) -> Self {
        NoticeBoard { ttl, active: None }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn post(&mut self, message: impl Into<String>, now: Instant) {
        self.active = Some(Notice {
            message: message.into(),
            posted_at: now,
        });
    }

    /// The notice visible at `now`, if it has not been dismissed yet.
    pub fn current(&self, now: Instant) -> Option<&Notice> {
        self.active
            .as_ref()
            .filter(|notice| now.saturating_duration_since(notice.posted_at) < self.ttl)
    }

    /// The most recent notice regardless of expiry.
    pub fn last(&self) -> Option<&Notice> {
        self.active.as_ref()
    }

    /// Drop the active notice once its time is up.
    pub fn dismiss_expired(&mut self, now: Instant) {
        if self.current(now).is_none() {
            self.active = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notice_expires_after_ttl() {
        let start = Instant::now();
        let mut board = NoticeBoard::new(Duration::from_millis(100));
        board.post("Saved", start);
        assert_eq!(board.current(start).unwrap().message, "Saved");
        assert!(board.current(start + Duration::from_millis(99)).is_some());
        assert!(board.current(start + Duration::from_millis(100)).is_none());
        assert_eq!(board.last().unwrap().message, "Saved");
    }

    #[test]
    fn new_notice_supersedes_and_restarts_timer() {
        let start = Instant::now();
        let mut board = NoticeBoard::new(Duration::from_millis(100));
        board.post("first", start);
        board.post("second", start + Duration::from_millis(80));

        let later = start + Duration::from_millis(150);
        let visible = board.current(later).unwrap();
        assert_eq!(visible.message, "second");
    }

    #[test]
    fn dismiss_expired_clears_board() {
        let start = Instant::now();
        let mut board = NoticeBoard::new(Duration::from_millis(10));
        board.post("gone soon", start);
        board.dismiss_expired(start + Duration::from_millis(5));
        assert!(board.last().is_some());
        board.dismiss_expired(start + Duration::from_millis(10));
        assert!(board.last().is_none());
    }
}
