//! Command layer.
//!
//! Each command takes one invocation-mode enum (built once at the CLI
//! boundary) and a resource-client trait object, and returns presentation
//! values. Commands never retry; a failed remote call surfaces immediately.

pub mod subnet;
pub mod subscription;
pub mod vault;
pub mod virtual_network;

use crate::types::{AzureError, CommandError};

/// Result shape of read commands: one resource, or a sequence to be
/// enumerated element by element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> Outcome<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Outcome::One(item) => vec![item],
            Outcome::Many(items) => items,
        }
    }
}

pub(crate) fn not_found(kind: &'static str, name: &str, scope: String) -> CommandError {
    CommandError::NotFound {
        kind,
        name: name.to_string(),
        scope,
    }
}

pub(crate) fn resource_group_scope(resource_group: &str) -> String {
    format!("resource group '{}'", resource_group)
}

/// Reject blank identifiers before anything goes over the wire.
pub(crate) fn require(field: &str, value: &str) -> Result<(), CommandError> {
    if value.trim().is_empty() {
        return Err(CommandError::InvalidInput(format!("{field} must not be empty")));
    }
    Ok(())
}

/// Tag conversion is the only fallible mapping; it is a caller mistake, not
/// a remote failure.
pub(crate) fn mapping_error(e: AzureError) -> CommandError {
    CommandError::InvalidInput(e.message)
}
