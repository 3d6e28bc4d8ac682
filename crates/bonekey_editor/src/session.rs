// SPDX-License-Identifier: MIT OR Apache-2.0
//! Editor session: the document, its history and the installed actions.
//!
//! This is the glue a host shell drives. It owns the animations and
//! timeline state, wires them into [`KeyframeInserter`] and dispatches
//! registered actions by id.

use crate::config::InserterConfig;
use crate::history::{History, HistoryError};
use crate::host::{CurveKeyframeFactory, PreviewRenderer, TimelineScroll};
use crate::insert::{AnimationContext, HostServices, InsertError, InsertReport, KeyframeInserter};
use crate::menus::{ActionError, ActionRegistry};
use crate::notify::QuickMessages;
use crate::plugin::{Plugin, ADD_KEYFRAMES_ALL_BONES};
use crate::preview::PosePreview;
use bonekey_timeline::{Animation, AnimationId, Selection, TimelineState};
use indexmap::IndexMap;
use parking_lot::{Mutex, MutexGuard};
use std::sync::Arc;

/// Shared flag marking an action run in progress.
///
/// The UI keeps a clone to disable triggers while a run is active.
#[derive(Debug, Clone, Default)]
pub struct ActionGate(Arc<Mutex<()>>);

impl ActionGate {
    /// Check whether a run is in progress
    pub fn is_running(&self) -> bool {
        self.0.is_locked()
    }

    /// Enter the gate, or `None` if a run is already in progress
    pub fn try_enter(&self) -> Option<MutexGuard<'_, ()>> {
        self.0.try_lock()
    }
}

/// Editor session state
pub struct EditorSession {
    /// All animations of the project
    animations: IndexMap<AnimationId, Animation>,
    /// Animation being edited
    active: Option<AnimationId>,
    /// Cursor, keyframe selection and scroll
    pub timeline: TimelineState,
    /// Undo/redo history
    history: History,
    /// Pose preview
    preview: PosePreview,
    /// Quick message queue
    messages: QuickMessages,
    /// Keyframe factory
    keyframes: CurveKeyframeFactory,
    /// Keyframe-all-bones command
    inserter: KeyframeInserter,
    /// Installed actions
    registry: ActionRegistry,
    /// Installed plugins
    plugins: Vec<Box<dyn Plugin>>,
    /// Non-reentrancy gate for action runs
    gate: ActionGate,
}

impl EditorSession {
    /// Create an empty session
    pub fn new(config: InserterConfig) -> Self {
        Self {
            animations: IndexMap::new(),
            active: None,
            timeline: TimelineState::new(),
            history: History::with_max_depth(config.history_depth),
            preview: PosePreview::new(),
            messages: QuickMessages::new(),
            keyframes: CurveKeyframeFactory,
            inserter: KeyframeInserter::new(config),
            registry: ActionRegistry::new(),
            plugins: Vec::new(),
            gate: ActionGate::default(),
        }
    }

    /// Add an animation to the project
    pub fn add_animation(&mut self, animation: Animation) -> AnimationId {
        let id = animation.id;
        self.animations.insert(id, animation);
        id
    }

    /// Make an animation the active one
    pub fn select_animation(&mut self, id: AnimationId) -> bool {
        if self.animations.contains_key(&id) {
            self.active = Some(id);
            true
        } else {
            false
        }
    }

    /// Deselect the active animation
    pub fn clear_active(&mut self) {
        self.active = None;
    }

    /// Get an animation
    pub fn animation(&self, id: AnimationId) -> Option<&Animation> {
        self.animations.get(&id)
    }

    /// Get the active animation
    pub fn active_animation(&self) -> Option<&Animation> {
        self.active.and_then(|id| self.animations.get(&id))
    }

    /// Get the active animation mutably
    pub fn active_animation_mut(&mut self) -> Option<&mut Animation> {
        self.active.and_then(|id| self.animations.get_mut(&id))
    }

    /// Undo/redo history
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Pose preview
    pub fn preview(&self) -> &PosePreview {
        &self.preview
    }

    /// Handle on the quick message queue
    pub fn messages(&self) -> QuickMessages {
        self.messages.clone()
    }

    /// Installed actions
    pub fn registry(&self) -> &ActionRegistry {
        &self.registry
    }

    /// Handle on the action run gate
    pub fn gate(&self) -> ActionGate {
        self.gate.clone()
    }

    /// Install a plugin and let it register its actions
    pub fn install_plugin(&mut self, mut plugin: Box<dyn Plugin>) -> Result<(), ActionError> {
        plugin.on_load(&mut self.registry)?;
        self.plugins.push(plugin);
        Ok(())
    }

    /// Uninstall a plugin by id
    pub fn uninstall_plugin(&mut self, id: &str) -> bool {
        let Some(idx) = self.plugins.iter().position(|p| p.manifest().id == id) else {
            return false;
        };
        let mut plugin = self.plugins.remove(idx);
        plugin.on_unload(&mut self.registry);
        true
    }

    /// Run a registered action by id
    pub fn execute(&mut self, id: &str) -> Result<InsertReport, ActionError> {
        let Some(action) = self.registry.action(id) else {
            tracing::warn!("Unknown action: {id}");
            return Err(ActionError::UnknownAction(id.to_string()));
        };
        let action_id = action.id;

        let gate = self.gate.clone();
        let Some(_running) = gate.try_enter() else {
            tracing::warn!("Action {action_id} is already running");
            return Err(ActionError::Busy(action_id));
        };

        match action_id {
            ADD_KEYFRAMES_ALL_BONES => Ok(self.add_keyframes_all_bones()?),
            other => {
                tracing::warn!("No handler for action: {other}");
                Err(ActionError::UnknownAction(other.to_string()))
            }
        }
    }

    /// Keyframe every visible bone of the active animation at the cursor
    pub fn add_keyframes_all_bones(&mut self) -> Result<InsertReport, InsertError> {
        let mut scroll = TimelineScroll::from_timeline(&self.timeline);
        let animation = self.active.and_then(|id| self.animations.get_mut(&id));

        let result = self.inserter.run(
            AnimationContext {
                animation,
                time: self.timeline.time,
                selection: &mut self.timeline.selection,
            },
            HostServices {
                keyframes: &mut self.keyframes,
                history: &mut self.history,
                preview: &mut self.preview,
                notifications: &self.messages,
                scroll: &mut scroll,
            },
        );

        scroll.apply(&mut self.timeline);
        result
    }

    /// Undo the last edit
    pub fn undo(&mut self) -> Result<(), HistoryError> {
        let group = self.history.undo()?;
        let animation = group.restore_before()?;
        tracing::info!("Undo: {}", group.description);
        self.replace_animation(animation);
        Ok(())
    }

    /// Redo the last undone edit
    pub fn redo(&mut self) -> Result<(), HistoryError> {
        let group = self.history.redo()?;
        let animation = group.restore_after()?;
        tracing::info!("Redo: {}", group.description);
        self.replace_animation(animation);
        Ok(())
    }

    fn replace_animation(&mut self, animation: Animation) {
        self.timeline.selection = Selection::from_animation(&animation);
        self.preview.refresh(&animation, self.timeline.time);
        self.animations.insert(animation.id, animation);
    }
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new(InserterConfig::default())
    }
}
