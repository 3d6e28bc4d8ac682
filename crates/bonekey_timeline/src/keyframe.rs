// SPDX-License-Identifier: MIT OR Apache-2.0
//! Keyframe definitions for animator curves.

use crate::channel::Channel;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Two keyframe times closer than this (in seconds) are the same time
pub const TIME_EPSILON: f32 = 0.001;

/// Unique identifier for a keyframe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyframeId(pub Uuid);

impl KeyframeId {
    /// Create a new random keyframe ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for KeyframeId {
    fn default() -> Self {
        Self::new()
    }
}

/// Interpolation mode between keyframes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum InterpolationMode {
    /// Hold the value until the next keyframe
    Step,
    /// Linear interpolation (slerp for rotations)
    #[default]
    Linear,
}

/// Value stored in a keyframe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum KeyframeValue {
    /// 3D vector (position, scale)
    Vec3([f32; 3]),
    /// Quaternion (rotation)
    Vec4([f32; 4]),
}

/// A keyframe on one channel curve of an animator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Keyframe {
    /// Unique keyframe ID
    pub id: KeyframeId,
    /// Time in seconds
    pub time: f32,
    /// Channel this keyframe belongs to
    pub channel: Channel,
    /// Value at this keyframe
    pub value: KeyframeValue,
    /// Interpolation mode to next keyframe
    pub interpolation: InterpolationMode,
    /// Whether the keyframe is selected in the timeline
    pub selected: bool,
}

impl Keyframe {
    /// Create a new keyframe
    pub fn new(channel: Channel, time: f32, value: KeyframeValue) -> Self {
        Self {
            id: KeyframeId::new(),
            time,
            channel,
            value,
            interpolation: InterpolationMode::Linear,
            selected: false,
        }
    }

    /// Set interpolation mode
    pub fn with_interpolation(mut self, mode: InterpolationMode) -> Self {
        self.interpolation = mode;
        self
    }

    /// Check whether this keyframe sits at `time`
    pub fn is_at(&self, time: f32) -> bool {
        (self.time - time).abs() < TIME_EPSILON
    }
}

/// Interpolation utilities
pub struct Interpolation;

impl Interpolation {
    /// Linear interpolation between two floats
    pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
        a + (b - a) * t
    }

    /// Interpolate Vec3
    pub fn lerp_vec3(a: [f32; 3], b: [f32; 3], t: f32) -> [f32; 3] {
        [
            Self::lerp(a[0], b[0], t),
            Self::lerp(a[1], b[1], t),
            Self::lerp(a[2], b[2], t),
        ]
    }

    /// Interpolate Vec4
    pub fn lerp_vec4(a: [f32; 4], b: [f32; 4], t: f32) -> [f32; 4] {
        [
            Self::lerp(a[0], b[0], t),
            Self::lerp(a[1], b[1], t),
            Self::lerp(a[2], b[2], t),
            Self::lerp(a[3], b[3], t),
        ]
    }

    /// Spherical linear interpolation for quaternions
    pub fn slerp(a: [f32; 4], b: [f32; 4], t: f32) -> [f32; 4] {
        let mut dot = a[0] * b[0] + a[1] * b[1] + a[2] * b[2] + a[3] * b[3];

        // Take the short way around
        let mut b = b;
        if dot < 0.0 {
            b = [-b[0], -b[1], -b[2], -b[3]];
            dot = -dot;
        }

        if dot > 0.9995 {
            let r = Self::lerp_vec4(a, b, t);
            let len = (r[0] * r[0] + r[1] * r[1] + r[2] * r[2] + r[3] * r[3]).sqrt();
            if len == 0.0 {
                return a;
            }
            return [r[0] / len, r[1] / len, r[2] / len, r[3] / len];
        }

        let theta_0 = dot.acos();
        let theta = theta_0 * t;
        let sin_theta = theta.sin();
        let sin_theta_0 = theta_0.sin();

        let s0 = theta.cos() - dot * sin_theta / sin_theta_0;
        let s1 = sin_theta / sin_theta_0;

        [
            a[0] * s0 + b[0] * s1,
            a[1] * s0 + b[1] * s1,
            a[2] * s0 + b[2] * s1,
            a[3] * s0 + b[3] * s1,
        ]
    }
}

impl KeyframeValue {
    /// Interpolate between two keyframe values
    pub fn interpolate(&self, other: &KeyframeValue, t: f32, mode: InterpolationMode) -> Option<KeyframeValue> {
        match mode {
            InterpolationMode::Step => Some(self.clone()),
            InterpolationMode::Linear => match (self, other) {
                (KeyframeValue::Vec3(a), KeyframeValue::Vec3(b)) => {
                    Some(KeyframeValue::Vec3(Interpolation::lerp_vec3(*a, *b, t)))
                }
                (KeyframeValue::Vec4(a), KeyframeValue::Vec4(b)) => {
                    Some(KeyframeValue::Vec4(Interpolation::slerp(*a, *b, t)))
                }
                _ => None, // Mismatched types
            },
        }
    }

    /// Get as Vec3 if possible
    pub fn as_vec3(&self) -> Option<[f32; 3]> {
        match self {
            KeyframeValue::Vec3(v) => Some(*v),
            KeyframeValue::Vec4(_) => None,
        }
    }

    /// Get as Vec4/quaternion if possible
    pub fn as_vec4(&self) -> Option<[f32; 4]> {
        match self {
            KeyframeValue::Vec4(v) => Some(*v),
            KeyframeValue::Vec3(_) => None,
        }
    }
}
