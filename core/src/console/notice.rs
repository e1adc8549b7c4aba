use std::collections::VecDeque;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// A transient, user-facing notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
    pub created: Instant,
}

impl Notice {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            text: text.into(),
            created: Instant::now(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            text: text.into(),
            created: Instant::now(),
        }
    }
}

/// Time-limited notification queue, oldest first.
#[derive(Debug, Clone)]
pub struct Notices {
    queue: VecDeque<Notice>,
    ttl: Duration,
    max_visible: usize,
}

impl Notices {
    pub fn new(ttl: Duration, max_visible: usize) -> Self {
        Self {
            queue: VecDeque::new(),
            ttl,
            max_visible: max_visible.max(1),
        }
    }

    pub fn push(&mut self, notice: Notice) {
        self.queue.push_back(notice);
        while self.queue.len() > self.max_visible {
            self.queue.pop_front();
        }
    }

    pub fn expire(&mut self, now: Instant) {
        let ttl = self.ttl;
        self.queue
            .retain(|n| now.saturating_duration_since(n.created) < ttl);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notice> {
        self.queue.iter()
    }

    pub fn latest(&self) -> Option<&Notice> {
        self.queue.back()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
