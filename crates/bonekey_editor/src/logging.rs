// SPDX-License-Identifier: MIT OR Apache-2.0
//! Tracing subscriber setup for hosts embedding the editor.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::EnvFilter;

/// Directive applied on top of `RUST_LOG`
const DEFAULT_DIRECTIVE: &str = "bonekey_editor=debug";

fn env_filter() -> EnvFilter {
    let filter = EnvFilter::from_default_env();
    match DEFAULT_DIRECTIVE.parse() {
        Ok(directive) => filter.add_directive(directive),
        Err(_) => filter,
    }
}

/// Install the global subscriber, failing if one is already set
pub fn try_init() -> Result<(), TryInitError> {
    tracing_subscriber::registry()
        .with(env_filter())
        .with(tracing_subscriber::fmt::layer())
        .try_init()
}

/// Install the global subscriber, leaving an existing one in place
pub fn init() {
    if try_init().is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}
