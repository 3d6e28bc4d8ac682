// SPDX-License-Identifier: MIT OR Apache-2.0
//! Animators: the per-bone tracks of an animation.

use crate::channel::{Channel, ChannelSet};
use crate::keyframe::{Keyframe, KeyframeId, KeyframeValue, TIME_EPSILON};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for an animator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnimatorId(pub Uuid);

impl AnimatorId {
    /// Create a new random animator ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for AnimatorId {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of ensuring a keyframe exists at a time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Insertion {
    /// A new keyframe was inserted
    Created(KeyframeId),
    /// A keyframe already sat at that time
    Reused(KeyframeId),
}

impl Insertion {
    /// The keyframe that now sits at the requested time
    pub fn id(&self) -> KeyframeId {
        match self {
            Self::Created(id) | Self::Reused(id) => *id,
        }
    }

    /// Whether a new keyframe was inserted
    pub fn is_created(&self) -> bool {
        matches!(self, Self::Created(_))
    }
}

/// Bone transform used where a channel has no keyframes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestPose {
    /// Position (x, y, z)
    pub position: [f32; 3],
    /// Rotation quaternion (x, y, z, w)
    pub rotation: [f32; 4],
    /// Scale (x, y, z)
    pub scale: [f32; 3],
}

impl Default for RestPose {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, 0.0],
            rotation: [0.0, 0.0, 0.0, 1.0],
            scale: [1.0, 1.0, 1.0],
        }
    }
}

impl RestPose {
    /// Rest value of a single channel
    pub fn value(&self, channel: Channel) -> KeyframeValue {
        match channel {
            Channel::Position => KeyframeValue::Vec3(self.position),
            Channel::Rotation => KeyframeValue::Vec4(self.rotation),
            Channel::Scale => KeyframeValue::Vec3(self.scale),
        }
    }
}

/// Animation track of a single bone
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Animator {
    /// Unique animator ID
    pub id: AnimatorId,
    /// Bone name
    pub name: String,
    /// Hidden animators are skipped by batch edits
    pub hidden: bool,
    /// Channels this animator can animate
    channels: ChannelSet,
    /// Pose used for channels without keyframes
    pub rest: RestPose,
    /// Position channel keyframes
    position: Vec<Keyframe>,
    /// Rotation channel keyframes
    rotation: Vec<Keyframe>,
    /// Scale channel keyframes
    scale: Vec<Keyframe>,
}

impl Animator {
    /// Create a new animator
    pub fn new(name: impl Into<String>, channels: ChannelSet) -> Self {
        Self {
            id: AnimatorId::new(),
            name: name.into(),
            hidden: false,
            channels,
            rest: RestPose::default(),
            position: Vec::new(),
            rotation: Vec::new(),
            scale: Vec::new(),
        }
    }

    /// Mark the animator hidden or visible
    pub fn with_hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    /// Set the rest pose
    pub fn with_rest(mut self, rest: RestPose) -> Self {
        self.rest = rest;
        self
    }

    /// Channels this animator can animate
    pub fn channels(&self) -> ChannelSet {
        self.channels
    }

    /// Check whether a channel is animatable on this animator
    pub fn supports(&self, channel: Channel) -> bool {
        self.channels.supports(channel)
    }

    /// Keyframes of a channel, sorted by time
    pub fn curve(&self, channel: Channel) -> &[Keyframe] {
        match channel {
            Channel::Position => &self.position,
            Channel::Rotation => &self.rotation,
            Channel::Scale => &self.scale,
        }
    }

    fn curve_mut(&mut self, channel: Channel) -> &mut Vec<Keyframe> {
        match channel {
            Channel::Position => &mut self.position,
            Channel::Rotation => &mut self.rotation,
            Channel::Scale => &mut self.scale,
        }
    }

    /// Add a keyframe to its channel curve, keeping time order.
    ///
    /// Returns `false` without inserting if the channel is unsupported,
    /// the value does not fit the channel, the time is not a finite
    /// non-negative number, or a keyframe already sits at that time.
    pub fn add_keyframe(&mut self, keyframe: Keyframe) -> bool {
        let channel = keyframe.channel;
        if !self.supports(channel)
            || !channel.accepts(&keyframe.value)
            || !keyframe.time.is_finite()
            || keyframe.time < 0.0
            || self.keyframe_at(channel, keyframe.time).is_some()
        {
            tracing::trace!(bone = %self.name, %channel, time = keyframe.time, "keyframe rejected");
            return false;
        }
        let curve = self.curve_mut(keyframe.channel);
        let idx = curve.partition_point(|k| k.time < keyframe.time);
        curve.insert(idx, keyframe);
        true
    }

    /// Remove a keyframe
    pub fn remove_keyframe(&mut self, channel: Channel, keyframe_id: KeyframeId) -> Option<Keyframe> {
        let curve = self.curve_mut(channel);
        let idx = curve.iter().position(|k| k.id == keyframe_id)?;
        Some(curve.remove(idx))
    }

    /// Get keyframe at time (if exists)
    pub fn keyframe_at(&self, channel: Channel, time: f32) -> Option<&Keyframe> {
        self.curve(channel).iter().find(|k| k.is_at(time))
    }

    /// Get keyframe by ID
    pub fn keyframe(&self, channel: Channel, keyframe_id: KeyframeId) -> Option<&Keyframe> {
        self.curve(channel).iter().find(|k| k.id == keyframe_id)
    }

    /// Get mutable keyframe by ID
    pub fn keyframe_mut(&mut self, channel: Channel, keyframe_id: KeyframeId) -> Option<&mut Keyframe> {
        self.curve_mut(channel).iter_mut().find(|k| k.id == keyframe_id)
    }

    /// Total keyframes across all channels
    pub fn keyframe_count(&self) -> usize {
        self.position.len() + self.rotation.len() + self.scale.len()
    }

    /// Effective value of a channel at a given time.
    ///
    /// Outside the keyed range the nearest end keyframe holds; with no
    /// keyframes at all the rest pose is used.
    pub fn evaluate(&self, channel: Channel, time: f32) -> KeyframeValue {
        let curve = self.curve(channel);
        let next_idx = curve.partition_point(|k| k.time < time);

        match (next_idx.checked_sub(1).and_then(|i| curve.get(i)), curve.get(next_idx)) {
            (None, None) => self.rest.value(channel),
            (Some(kf), None) | (None, Some(kf)) => kf.value.clone(),
            (Some(a), Some(b)) => {
                if (b.time - a.time).abs() < TIME_EPSILON || b.is_at(time) {
                    return b.value.clone();
                }
                let t = (time - a.time) / (b.time - a.time);
                a.value
                    .interpolate(&b.value, t, a.interpolation)
                    .unwrap_or_else(|| a.value.clone())
            }
        }
    }

    /// Ensure a keyframe exists on `channel` at `time`.
    ///
    /// An existing keyframe at that time is reused untouched. Otherwise a
    /// new one is inserted; with `force_duplicate` it copies the effective
    /// value at `time`, without it the channel identity value is used.
    /// Returns `None` if the channel is unsupported or the time is invalid.
    pub fn create_keyframe(&mut self, channel: Channel, time: f32, force_duplicate: bool) -> Option<Insertion> {
        if !self.supports(channel) || !time.is_finite() || time < 0.0 {
            return None;
        }

        if let Some(existing) = self.keyframe_at(channel, time) {
            tracing::trace!(bone = %self.name, %channel, time, "reusing keyframe");
            return Some(Insertion::Reused(existing.id));
        }

        let value = if force_duplicate {
            self.evaluate(channel, time)
        } else {
            channel.identity()
        };
        let keyframe = Keyframe::new(channel, time, value);
        let id = keyframe.id;
        self.add_keyframe(keyframe);
        tracing::trace!(bone = %self.name, %channel, time, "created keyframe");
        Some(Insertion::Created(id))
    }
}
