// SPDX-License-Identifier: MIT OR Apache-2.0
//! Quick message queue for transient notifications.

use crate::host::NotificationService;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

/// Messages kept before the oldest are dropped
const MAX_PENDING: usize = 32;

/// A transient message waiting to be displayed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuickMessage {
    /// Message text
    pub text: String,
    /// How long the message stays on screen
    pub duration: Duration,
}

/// Shared queue of quick messages.
///
/// Clones share the same queue; commands push, the UI drains.
#[derive(Debug, Clone, Default)]
pub struct QuickMessages {
    queue: Arc<Mutex<VecDeque<QuickMessage>>>,
}

impl QuickMessages {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Take every pending message, oldest first
    pub fn drain(&self) -> Vec<QuickMessage> {
        self.queue.lock().drain(..).collect()
    }

    /// Most recent pending message
    pub fn last(&self) -> Option<QuickMessage> {
        self.queue.lock().back().cloned()
    }

    /// Number of pending messages
    pub fn len(&self) -> usize {
        self.queue.lock().len()
    }

    /// Check if no messages are pending
    pub fn is_empty(&self) -> bool {
        self.queue.lock().is_empty()
    }
}

impl NotificationService for QuickMessages {
    fn show(&self, message: &str, duration: Duration) {
        tracing::debug!("quick message: {message}");
        let mut queue = self.queue.lock();
        if queue.len() == MAX_PENDING {
            queue.pop_front();
        }
        queue.push_back(QuickMessage {
            text: message.to_string(),
            duration,
        });
    }
}
