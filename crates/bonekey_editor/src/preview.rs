// SPDX-License-Identifier: MIT OR Apache-2.0
//! Pose preview: evaluates every visible bone at the cursor time.

use crate::host::PreviewRenderer;
use bonekey_timeline::{Animation, AnimatorId, Channel, KeyframeValue};
use indexmap::IndexMap;

/// Evaluated transform of one bone
#[derive(Debug, Clone, PartialEq)]
pub struct BonePose {
    /// Position, if the bone animates it
    pub position: Option<[f32; 3]>,
    /// Rotation quaternion, if the bone animates it
    pub rotation: Option<[f32; 4]>,
    /// Scale, if the bone animates it
    pub scale: Option<[f32; 3]>,
}

/// Evaluated pose of an animation at a point in time
#[derive(Debug, Clone, Default)]
pub struct Pose {
    /// Time the pose was sampled at
    pub time: f32,
    /// Per-bone transforms, in animator order
    pub bones: IndexMap<AnimatorId, BonePose>,
}

/// Preview renderer that keeps the last evaluated pose
#[derive(Debug, Default)]
pub struct PosePreview {
    pose: Pose,
    refresh_count: u64,
}

impl PosePreview {
    /// Create an empty preview
    pub fn new() -> Self {
        Self::default()
    }

    /// Last evaluated pose
    pub fn pose(&self) -> &Pose {
        &self.pose
    }

    /// Number of refreshes so far
    pub fn refresh_count(&self) -> u64 {
        self.refresh_count
    }
}

impl PreviewRenderer for PosePreview {
    fn refresh(&mut self, animation: &Animation, time: f32) {
        let bones = animation
            .animators()
            .filter(|animator| !animator.hidden)
            .map(|animator| {
                let sample = |channel: Channel| {
                    animator
                        .supports(channel)
                        .then(|| animator.evaluate(channel, time))
                };
                let pose = BonePose {
                    position: sample(Channel::Position).as_ref().and_then(KeyframeValue::as_vec3),
                    rotation: sample(Channel::Rotation).as_ref().and_then(KeyframeValue::as_vec4),
                    scale: sample(Channel::Scale).as_ref().and_then(KeyframeValue::as_vec3),
                };
                (animator.id, pose)
            })
            .collect();

        self.pose = Pose { time, bones };
        self.refresh_count += 1;
        tracing::trace!(time, bones = self.pose.bones.len(), "preview refreshed");
    }
}
