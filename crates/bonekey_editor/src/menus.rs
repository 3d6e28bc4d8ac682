// SPDX-License-Identifier: MIT OR Apache-2.0
//! Action definitions and menu placement.

use crate::history::HistoryError;
use crate::insert::InsertError;
use indexmap::IndexMap;
use thiserror::Error;

/// Errors from registering or running actions
#[derive(Debug, Error)]
pub enum ActionError {
    /// No action with this id is registered
    #[error("Unknown action: {0}")]
    UnknownAction(String),

    /// An action with this id is already registered
    #[error("Action already registered: {0}")]
    DuplicateAction(&'static str),

    /// The action is still running
    #[error("Action is already running: {0}")]
    Busy(&'static str),

    /// Keyframe insertion failed
    #[error(transparent)]
    Insert(#[from] InsertError),

    /// Undo history failed
    #[error("History error: {0}")]
    History(#[from] HistoryError),
}

/// A user-invokable action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    /// Unique identifier for the action
    pub id: &'static str,
    /// Display name shown in menus
    pub name: &'static str,
    /// Description shown as hint
    pub description: Option<&'static str>,
    /// Icon name
    pub icon: Option<&'static str>,
}

impl Action {
    /// Create a new action
    pub const fn new(id: &'static str, name: &'static str) -> Self {
        Self {
            id,
            name,
            description: None,
            icon: None,
        }
    }

    /// Add a description
    pub const fn with_description(mut self, description: &'static str) -> Self {
        self.description = Some(description);
        self
    }

    /// Add an icon
    pub const fn with_icon(mut self, icon: &'static str) -> Self {
        self.icon = Some(icon);
        self
    }
}

/// Registered actions and the menus they appear in
#[derive(Debug, Default)]
pub struct ActionRegistry {
    actions: IndexMap<&'static str, Action>,
    menus: IndexMap<&'static str, Vec<&'static str>>,
}

impl ActionRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an action
    pub fn register(&mut self, action: Action) -> Result<(), ActionError> {
        if self.actions.contains_key(action.id) {
            return Err(ActionError::DuplicateAction(action.id));
        }
        tracing::debug!("registered action {}", action.id);
        self.actions.insert(action.id, action);
        Ok(())
    }

    /// Remove an action and every menu entry pointing at it
    pub fn remove_action(&mut self, id: &str) -> Option<Action> {
        let action = self.actions.shift_remove(id)?;
        for entries in self.menus.values_mut() {
            entries.retain(|entry| *entry != id);
        }
        tracing::debug!("removed action {id}");
        Some(action)
    }

    /// Append a registered action to a menu
    pub fn add_to_menu(&mut self, id: &str, menu: &'static str) -> Result<(), ActionError> {
        let Some(action) = self.actions.get(id) else {
            return Err(ActionError::UnknownAction(id.to_string()));
        };
        let entries = self.menus.entry(menu).or_default();
        if !entries.contains(&action.id) {
            entries.push(action.id);
        }
        Ok(())
    }

    /// Get an action by ID
    pub fn action(&self, id: &str) -> Option<&Action> {
        self.actions.get(id)
    }

    /// Check whether an action is registered
    pub fn contains(&self, id: &str) -> bool {
        self.actions.contains_key(id)
    }

    /// Actions of a menu, in menu order
    pub fn menu(&self, menu: &str) -> Vec<&Action> {
        self.menus
            .get(menu)
            .into_iter()
            .flatten()
            .filter_map(|id| self.actions.get(id))
            .collect()
    }

    /// Number of registered actions
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Check if no actions are registered
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BAKE: Action = Action::new("bake", "Bake").with_icon("fa-fire");

    #[test]
    fn test_register_rejects_duplicates() {
        let mut registry = ActionRegistry::new();
        registry.register(BAKE).unwrap();
        assert!(matches!(
            registry.register(BAKE),
            Err(ActionError::DuplicateAction("bake"))
        ));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_menu_lists_actions_in_order() {
        let mut registry = ActionRegistry::new();
        registry.register(BAKE).unwrap();
        registry.register(Action::new("loop", "Loop")).unwrap();
        registry.add_to_menu("loop", "animation").unwrap();
        registry.add_to_menu("bake", "animation").unwrap();
        registry.add_to_menu("bake", "animation").unwrap();

        let names: Vec<_> = registry.menu("animation").iter().map(|a| a.name).collect();
        assert_eq!(names, ["Loop", "Bake"]);
        assert!(registry.menu("file").is_empty());
    }

    #[test]
    fn test_add_to_menu_requires_registration() {
        let mut registry = ActionRegistry::new();
        assert!(matches!(
            registry.add_to_menu("ghost", "animation"),
            Err(ActionError::UnknownAction(_))
        ));
    }

    #[test]
    fn test_remove_action_clears_menus() {
        let mut registry = ActionRegistry::new();
        registry.register(BAKE).unwrap();
        registry.add_to_menu("bake", "animation").unwrap();

        assert_eq!(registry.remove_action("bake"), Some(BAKE));
        assert!(registry.menu("animation").is_empty());
        assert!(registry.remove_action("bake").is_none());
        assert!(registry.is_empty());
    }
}
