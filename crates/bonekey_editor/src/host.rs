// SPDX-License-Identifier: MIT OR Apache-2.0
//! Host collaborators consumed by editor commands.
//!
//! Commands never reach into global editor state; everything they touch is
//! handed to them through these traits.

use crate::history::{OperationID, Result as HistoryResult, Transaction};
use bonekey_timeline::{Animation, Animator, Channel, Insertion, TimelineState};
use std::time::Duration;

/// Creates keyframes on animator curves
pub trait KeyframeFactory {
    /// Ensure a keyframe exists on `channel` at `time`.
    ///
    /// Reuses the keyframe already at that time unmodified, or creates one
    /// holding the animator's effective value when `force_duplicate` is set.
    /// `None` means the keyframe could not be created.
    fn request_keyframe(
        &mut self,
        animator: &mut Animator,
        channel: Channel,
        time: f32,
        force_duplicate: bool,
    ) -> Option<Insertion>;
}

/// Scoped undo history entries
pub trait TransactionManager {
    /// Open a transaction before mutating `animation`
    fn begin(&mut self, label: &str, animation: &Animation) -> HistoryResult<Transaction>;

    /// Close a transaction after mutating `animation`
    fn commit(&mut self, transaction: Transaction, animation: &Animation) -> HistoryResult<OperationID>;
}

/// Re-renders the current pose
pub trait PreviewRenderer {
    /// Refresh the preview of `animation` at `time`
    fn refresh(&mut self, animation: &Animation, time: f32);
}

/// Transient user-facing messages
pub trait NotificationService {
    /// Show `message` for `duration`
    fn show(&self, message: &str, duration: Duration);
}

/// Opaque scroll position of the timeline viewport
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollOffset(pub f32);

/// Viewport scroll position
pub trait ScrollState {
    /// Current offset
    fn get(&self) -> ScrollOffset;

    /// Jump to `offset`
    fn set(&mut self, offset: ScrollOffset);
}

/// Keyframe factory backed by the animator's own curves
#[derive(Debug, Clone, Copy, Default)]
pub struct CurveKeyframeFactory;

impl KeyframeFactory for CurveKeyframeFactory {
    fn request_keyframe(
        &mut self,
        animator: &mut Animator,
        channel: Channel,
        time: f32,
        force_duplicate: bool,
    ) -> Option<Insertion> {
        animator.create_keyframe(channel, time, force_duplicate)
    }
}

/// Scroll state stored on the timeline
#[derive(Debug, Clone, Copy, Default)]
pub struct TimelineScroll {
    offset: f32,
}

impl TimelineScroll {
    /// Start from the timeline's current scroll position
    pub fn from_timeline(timeline: &TimelineState) -> Self {
        Self {
            offset: timeline.vertical_scroll,
        }
    }

    /// Write the tracked offset back into the timeline
    pub fn apply(&self, timeline: &mut TimelineState) {
        timeline.vertical_scroll = self.offset;
    }
}

impl ScrollState for TimelineScroll {
    fn get(&self) -> ScrollOffset {
        ScrollOffset(self.offset)
    }

    fn set(&mut self, offset: ScrollOffset) {
        self.offset = offset.0;
    }
}

/// Restores a captured scroll offset when dropped
pub struct ScrollGuard<'a> {
    scroll: &'a mut dyn ScrollState,
    saved: ScrollOffset,
}

impl<'a> ScrollGuard<'a> {
    /// Capture the current offset of `scroll`
    pub fn capture(scroll: &'a mut dyn ScrollState) -> Self {
        let saved = scroll.get();
        Self { scroll, saved }
    }

    /// Offset that will be restored
    pub fn saved(&self) -> ScrollOffset {
        self.saved
    }

    /// Restore now instead of at end of scope
    pub fn restore(self) {
        drop(self);
    }
}

impl Drop for ScrollGuard<'_> {
    fn drop(&mut self) {
        self.scroll.set(self.saved);
    }
}
