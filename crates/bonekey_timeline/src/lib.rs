// SPDX-License-Identifier: MIT OR Apache-2.0
//! Animation timeline model for BoneKey.
//!
//! This crate provides the in-memory animation document:
//! - Transform channels (position, rotation, scale)
//! - Keyframes with interpolation
//! - Animators, one per animated bone
//! - Animations holding animators in host order
//! - Keyframe selection and timeline cursor state
//!
//! ## Architecture
//!
//! The model is built on:
//! - Per-channel keyframe curves kept sorted by time
//! - Explicit channel capability flags per animator
//! - Create-or-reuse keyframe insertion at a given time

pub mod channel;
pub mod keyframe;
pub mod animator;
pub mod animation;
pub mod selection;

pub use channel::{Channel, ChannelSet};
pub use keyframe::{Keyframe, KeyframeId, KeyframeValue, InterpolationMode, Interpolation, TIME_EPSILON};
pub use animator::{Animator, AnimatorId, Insertion, RestPose};
pub use animation::{Animation, AnimationId};
pub use selection::{KeyframeRef, Selection, TimelineState};
