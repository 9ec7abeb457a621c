//! Editor-side collaborators consumed by the activation gate.

use crate::dispose::Disposable;
use crate::document::DocumentRef;

/// Listener invoked once per newly opened document.
pub type DocumentListener = Box<dyn FnMut(&DocumentRef)>;

/// Listener invoked whenever the active editor changes.
pub type ActiveEditorListener = Box<dyn FnMut(Option<&DocumentRef>)>;

/// Open documents and the stream of documents opened later.
pub trait Workspace {
    /// Snapshot of the currently open documents, in editor order.
    fn text_documents(&self) -> Vec<DocumentRef>;

    /// Subscribes to documents opened from now on.
    fn on_did_open_text_document(&self, listener: DocumentListener) -> Box<dyn Disposable>;
}

/// Tracks the editor that currently has focus.
pub trait ActiveEditorTracker {
    /// Document shown in the active editor, if any.
    fn active_document(&self) -> Option<DocumentRef>;

    /// Subscribes to active editor changes.
    fn on_did_change_active_editor(&self, listener: ActiveEditorListener)
    -> Box<dyn Disposable>;
}

/// Sink for boolean context keys consulted by editor `when` clauses.
pub trait ContextKeys {
    /// Sets `key` to `value`.
    fn set_context(&self, key: &str, value: bool);
}
