//! User-facing error notices that hide themselves after a display window

use std::time::{Duration, Instant};

pub const NOTICE_DISPLAY_WINDOW: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub struct Notice {
    message: String,
    raised_at: Instant,
}

impl Notice {
    pub fn new(message: impl Into<String>, raised_at: Instant) -> Self {
        Self {
            message: message.into(),
            raised_at,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Visible for [`NOTICE_DISPLAY_WINDOW`] whether or not the cause went away.
    pub fn is_visible(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.raised_at) < NOTICE_DISPLAY_WINDOW
    }
}

/// Holds at most one notice; raising a new one replaces the old.
#[derive(Debug, Default)]
pub struct NoticeBoard {
    current: Option<Notice>,
}

impl NoticeBoard {
    pub fn raise(&mut self, message: impl Into<String>, now: Instant) {
        self.current = Some(Notice::new(message, now));
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    /// The current notice if still inside its window. Expired notices are dropped.
    pub fn visible(&mut self, now: Instant) -> Option<&Notice> {
        if self.current.as_ref().is_some_and(|n| !n.is_visible(now)) {
            self.current = None;
        }
        self.current.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notice_expires_after_window() {
        let start = Instant::now();
        let notice = Notice::new("Crypto rate not available", start);

        assert!(notice.is_visible(start));
        assert!(notice.is_visible(start + Duration::from_millis(4999)));
        assert!(!notice.is_visible(start + NOTICE_DISPLAY_WINDOW));
    }

    #[test]
    fn test_board_drops_expired_notice() {
        let start = Instant::now();
        let mut board = NoticeBoard::default();
        board.raise("Please enter a valid amount", start);

        assert_eq!(
            board.visible(start + Duration::from_secs(1)).map(Notice::message),
            Some("Please enter a valid amount")
        );
        assert!(board.visible(start + Duration::from_secs(6)).is_none());
        // Stays gone
        assert!(board.visible(start).is_none());
    }

    #[test]
    fn test_raise_replaces_and_clear_hides() {
        let start = Instant::now();
        let mut board = NoticeBoard::default();
        board.raise("first", start);
        board.raise("second", start);
        assert_eq!(board.visible(start).map(Notice::message), Some("second"));

        board.clear();
        assert!(board.visible(start).is_none());
    }
}
