// SPDX-License-Identifier: MIT OR Apache-2.0
//! Animation containing one animator per animated bone.

use crate::animator::{Animator, AnimatorId};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for an animation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnimationId(pub Uuid);

impl AnimationId {
    /// Create a new random animation ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for AnimationId {
    fn default() -> Self {
        Self::new()
    }
}

/// An animation clip
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Animation {
    /// Unique animation ID
    pub id: AnimationId,
    /// Animation name
    pub name: String,
    /// Animators in host order
    animators: IndexMap<AnimatorId, Animator>,
}

impl Animation {
    /// Create a new animation
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: AnimationId::new(),
            name: name.into(),
            animators: IndexMap::new(),
        }
    }

    /// Add an animator at the end of the list
    pub fn add_animator(&mut self, animator: Animator) -> AnimatorId {
        let id = animator.id;
        self.animators.insert(id, animator);
        id
    }

    /// Remove an animator, keeping the order of the rest
    pub fn remove_animator(&mut self, animator_id: AnimatorId) -> Option<Animator> {
        self.animators.shift_remove(&animator_id)
    }

    /// Get an animator
    pub fn animator(&self, animator_id: AnimatorId) -> Option<&Animator> {
        self.animators.get(&animator_id)
    }

    /// Get a mutable animator
    pub fn animator_mut(&mut self, animator_id: AnimatorId) -> Option<&mut Animator> {
        self.animators.get_mut(&animator_id)
    }

    /// Get all animators
    pub fn animators(&self) -> impl Iterator<Item = &Animator> {
        self.animators.values()
    }

    /// Get all animators mutably
    pub fn animators_mut(&mut self) -> impl Iterator<Item = &mut Animator> {
        self.animators.values_mut()
    }

    /// Get animator count
    pub fn animator_count(&self) -> usize {
        self.animators.len()
    }

    /// Total keyframes across all animators
    pub fn keyframe_count(&self) -> usize {
        self.animators.values().map(Animator::keyframe_count).sum()
    }
}

impl Default for Animation {
    fn default() -> Self {
        Self::new("animation")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::ChannelSet;

    #[test]
    fn test_animators_keep_insertion_order() {
        let mut animation = Animation::new("walk");
        let names = ["zeta", "alpha", "mid"];
        for name in names {
            animation.add_animator(Animator::new(name, ChannelSet::TRANSFORM));
        }
        let order: Vec<&str> = animation.animators().map(|a| a.name.as_str()).collect();
        assert_eq!(order, names);
    }

    #[test]
    fn test_remove_animator_preserves_order() {
        let mut animation = Animation::new("walk");
        let a = animation.add_animator(Animator::new("a", ChannelSet::TRANSFORM));
        animation.add_animator(Animator::new("b", ChannelSet::TRANSFORM));
        animation.add_animator(Animator::new("c", ChannelSet::TRANSFORM));

        assert!(animation.remove_animator(a).is_some());
        let order: Vec<&str> = animation.animators().map(|a| a.name.as_str()).collect();
        assert_eq!(order, ["b", "c"]);
        assert_eq!(animation.animator_count(), 2);
    }
}
