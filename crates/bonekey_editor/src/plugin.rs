// SPDX-License-Identifier: MIT OR Apache-2.0
//! Plugin lifecycle and the keyframe-all-bones plugin.

use crate::menus::{Action, ActionError, ActionRegistry};
use serde::{Deserialize, Serialize};

/// Id of the keyframe-all-bones action
pub const ADD_KEYFRAMES_ALL_BONES: &str = "add_keyframes_all_bones";

/// Menu the action is placed in
pub const ANIMATION_MENU: &str = "animation";

/// The keyframe-all-bones action
pub const ADD_KEYFRAMES_ACTION: Action = Action::new(ADD_KEYFRAMES_ALL_BONES, "Add Keyframe to All Visible Bones")
    .with_description("Adds keyframes to all visible bones at the current timeline position.")
    .with_icon("fa-plus-circle");

/// Where a plugin can run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PluginVariant {
    /// Desktop and web
    #[default]
    Both,
    /// Desktop only
    Desktop,
    /// Web only
    Web,
}

/// Plugin metadata shown in the plugin browser
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginManifest {
    /// Unique plugin id
    pub id: String,
    /// Display title
    pub title: String,
    /// Author
    pub author: String,
    /// Short description
    pub description: String,
    /// Icon name
    pub icon: String,
    /// Version string
    pub version: String,
    /// Supported platforms
    pub variant: PluginVariant,
}

impl PluginManifest {
    /// Serialize as JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Parse from JSON
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }
}

/// A plugin that installs actions into the editor
pub trait Plugin {
    /// Plugin metadata
    fn manifest(&self) -> &PluginManifest;

    /// Install the plugin's actions
    fn on_load(&mut self, registry: &mut ActionRegistry) -> Result<(), ActionError>;

    /// Remove everything `on_load` installed
    fn on_unload(&mut self, registry: &mut ActionRegistry);
}

/// Adds the keyframe-all-bones action to the animation menu
#[derive(Debug, Clone)]
pub struct KeyframeAllBonesPlugin {
    manifest: PluginManifest,
}

impl KeyframeAllBonesPlugin {
    /// Create the plugin
    pub fn new() -> Self {
        Self {
            manifest: PluginManifest {
                id: "add_keyframes_all_bones".to_string(),
                title: "Add Keyframes to All Bones".to_string(),
                author: "BoneKey".to_string(),
                description: "Adds keyframes for position, rotation, and scale for all visible bones at the current timeline time.".to_string(),
                icon: "fa-plus-circle".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                variant: PluginVariant::Both,
            },
        }
    }
}

impl Default for KeyframeAllBonesPlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl Plugin for KeyframeAllBonesPlugin {
    fn manifest(&self) -> &PluginManifest {
        &self.manifest
    }

    fn on_load(&mut self, registry: &mut ActionRegistry) -> Result<(), ActionError> {
        registry.register(ADD_KEYFRAMES_ACTION)?;
        registry.add_to_menu(ADD_KEYFRAMES_ALL_BONES, ANIMATION_MENU)?;
        tracing::info!("loaded plugin {}", self.manifest.id);
        Ok(())
    }

    fn on_unload(&mut self, registry: &mut ActionRegistry) {
        registry.remove_action(ADD_KEYFRAMES_ALL_BONES);
        tracing::info!("unloaded plugin {}", self.manifest.id);
    }
}
