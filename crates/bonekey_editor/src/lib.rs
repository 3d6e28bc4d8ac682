// SPDX-License-Identifier: MIT OR Apache-2.0
//! BoneKey editor command: keyframe all visible bones.
//!
//! One action, "Add Keyframe to All Visible Bones", which keys position,
//! rotation and scale of every visible animator in the active animation at
//! the timeline cursor, as a single undo step.
//!
//! ## Architecture
//!
//! - [`insert`]: the batch inserter and its precondition checks
//! - [`host`]: collaborator traits the inserter is handed (keyframe factory,
//!   undo transactions, preview, notifications, scroll)
//! - [`history`]: snapshot-based undo/redo implementing the transaction trait
//! - [`menus`] and [`plugin`]: action registration and plugin lifecycle
//! - [`session`]: a host session wiring everything together

pub mod config;
pub mod history;
pub mod host;
pub mod insert;
pub mod logging;
pub mod menus;
pub mod notify;
pub mod plugin;
pub mod preview;
pub mod session;

pub use config::{ConfigError, InserterConfig};
pub use history::{History, HistoryError, OperationGroup, OperationID, Transaction};
pub use host::{
    CurveKeyframeFactory, KeyframeFactory, NotificationService, PreviewRenderer, ScrollGuard,
    ScrollOffset, ScrollState, TimelineScroll, TransactionManager,
};
pub use insert::{AnimationContext, HostServices, InsertError, InsertReport, KeyframeInserter};
pub use menus::{Action, ActionError, ActionRegistry};
pub use notify::{QuickMessage, QuickMessages};
pub use plugin::{KeyframeAllBonesPlugin, Plugin, PluginManifest, PluginVariant, ADD_KEYFRAMES_ALL_BONES};
pub use preview::{BonePose, Pose, PosePreview};
pub use session::{ActionGate, EditorSession};
