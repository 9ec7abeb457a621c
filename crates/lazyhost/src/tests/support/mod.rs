//! Shared fixtures and helpers for activation tests.

mod editors;
mod recording_host;
mod world;

use url::Url;

use crate::document::DocumentRef;

pub use editors::{RecordingContextKeys, ScriptedEditors, ScriptedWorkspace};
pub use recording_host::RecordingClientHost;
pub use world::{HookMode, TestWorld};

/// Builds a document reference from a language identifier and URI text.
#[must_use]
pub fn document(language: &str, uri: &str) -> DocumentRef {
    DocumentRef::new(language, Url::parse(uri).expect("invalid test URI"))
}
