// SPDX-License-Identifier: MIT OR Apache-2.0
//! Keyframe selection and timeline cursor state.

use crate::animation::Animation;
use crate::animator::AnimatorId;
use crate::channel::Channel;
use crate::keyframe::KeyframeId;
use serde::{Deserialize, Serialize};

/// Address of a keyframe inside an animation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyframeRef {
    /// Owning animator
    pub animator: AnimatorId,
    /// Channel curve
    pub channel: Channel,
    /// Keyframe on that curve
    pub keyframe: KeyframeId,
}

impl KeyframeRef {
    /// Create a keyframe reference
    pub fn new(animator: AnimatorId, channel: Channel, keyframe: KeyframeId) -> Self {
        Self {
            animator,
            channel,
            keyframe,
        }
    }
}

/// Selected keyframes, in selection order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Selection {
    keyframes: Vec<KeyframeRef>,
}

impl Selection {
    /// Create a new empty selection
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the selection from the `selected` flags of `animation`.
    ///
    /// Keyframes are listed by animator, then channel, then time.
    pub fn from_animation(animation: &Animation) -> Self {
        let keyframes = animation
            .animators()
            .flat_map(|animator| {
                Channel::ALL.into_iter().flat_map(move |channel| {
                    animator
                        .curve(channel)
                        .iter()
                        .filter(|kf| kf.selected)
                        .map(move |kf| KeyframeRef::new(animator.id, channel, kf.id))
                })
            })
            .collect();
        Self { keyframes }
    }

    /// Check if a keyframe is selected
    pub fn contains(&self, keyframe: &KeyframeRef) -> bool {
        self.keyframes.contains(keyframe)
    }

    /// Append a keyframe (idempotent)
    pub fn add(&mut self, keyframe: KeyframeRef) {
        if !self.contains(&keyframe) {
            self.keyframes.push(keyframe);
        }
    }

    /// Remove a keyframe from the selection
    pub fn remove(&mut self, keyframe: &KeyframeRef) {
        self.keyframes.retain(|k| k != keyframe);
    }

    /// Clear the selection
    pub fn clear(&mut self) {
        self.keyframes.clear();
    }

    /// Check if the selection is empty
    pub fn is_empty(&self) -> bool {
        self.keyframes.is_empty()
    }

    /// Get the number of selected keyframes
    pub fn len(&self) -> usize {
        self.keyframes.len()
    }

    /// Iterate over selected keyframes
    pub fn iter(&self) -> impl Iterator<Item = &KeyframeRef> {
        self.keyframes.iter()
    }
}

/// Timeline cursor, keyframe selection and viewport scroll
#[derive(Debug, Clone, Default)]
pub struct TimelineState {
    /// Cursor time in seconds
    pub time: f32,
    /// Selected keyframes
    pub selection: Selection,
    /// Vertical scroll offset of the animator list (in pixels)
    pub vertical_scroll: f32,
}

impl TimelineState {
    /// Create a timeline at time zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the cursor, clamped at zero
    pub fn set_time(&mut self, time: f32) {
        self.time = time.max(0.0);
    }
}
