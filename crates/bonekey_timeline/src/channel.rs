// SPDX-License-Identifier: MIT OR Apache-2.0
//! Transform channels and per-animator channel capabilities.

use crate::keyframe::KeyframeValue;
use serde::{Deserialize, Serialize};

/// A transform component animated independently
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Channel {
    /// Translation (x, y, z)
    Position,
    /// Rotation quaternion (x, y, z, w)
    Rotation,
    /// Scale (x, y, z)
    Scale,
}

impl Channel {
    /// All channels, in processing order
    pub const ALL: [Channel; 3] = [Channel::Position, Channel::Rotation, Channel::Scale];

    /// Get the display name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Position => "position",
            Self::Rotation => "rotation",
            Self::Scale => "scale",
        }
    }

    /// Value of this channel in an untransformed bone
    pub fn identity(&self) -> KeyframeValue {
        match self {
            Self::Position => KeyframeValue::Vec3([0.0, 0.0, 0.0]),
            Self::Rotation => KeyframeValue::Vec4([0.0, 0.0, 0.0, 1.0]),
            Self::Scale => KeyframeValue::Vec3([1.0, 1.0, 1.0]),
        }
    }

    /// Check whether `value` has the shape this channel stores
    pub fn accepts(&self, value: &KeyframeValue) -> bool {
        matches!(
            (self, value),
            (Self::Position | Self::Scale, KeyframeValue::Vec3(_)) | (Self::Rotation, KeyframeValue::Vec4(_))
        )
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Which channels an animator can animate.
///
/// Fixed when the animator is built; a bone that cannot be scaled
/// simply has `scale: false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelSet {
    /// Position is animatable
    pub position: bool,
    /// Rotation is animatable
    pub rotation: bool,
    /// Scale is animatable
    pub scale: bool,
}

impl ChannelSet {
    /// Supports position, rotation and scale
    pub const TRANSFORM: ChannelSet = ChannelSet {
        position: true,
        rotation: true,
        scale: true,
    };

    /// Supports nothing
    pub const NONE: ChannelSet = ChannelSet {
        position: false,
        rotation: false,
        scale: false,
    };

    /// Create a channel set from explicit flags
    pub const fn new(position: bool, rotation: bool, scale: bool) -> Self {
        Self {
            position,
            rotation,
            scale,
        }
    }

    /// Check whether a channel is supported
    pub fn supports(&self, channel: Channel) -> bool {
        match channel {
            Channel::Position => self.position,
            Channel::Rotation => self.rotation,
            Channel::Scale => self.scale,
        }
    }

    /// Iterate over supported channels in processing order
    pub fn iter(&self) -> impl Iterator<Item = Channel> + '_ {
        Channel::ALL.into_iter().filter(|c| self.supports(*c))
    }

    /// Number of supported channels
    pub fn count(&self) -> usize {
        self.iter().count()
    }
}

impl Default for ChannelSet {
    fn default() -> Self {
        Self::TRANSFORM
    }
}
