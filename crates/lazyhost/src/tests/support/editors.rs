//! Scripted editor collaborators.

use std::cell::{Cell, RefCell};

use crate::dispose::Disposable;
use crate::document::DocumentRef;
use crate::events::Emitter;
use crate::workspace::{
    ActiveEditorListener, ActiveEditorTracker, ContextKeys, DocumentListener, Workspace,
};

/// Workspace whose open documents and open events are driven by the test.
#[derive(Debug, Default)]
pub struct ScriptedWorkspace {
    documents: RefCell<Vec<DocumentRef>>,
    opened: Emitter<DocumentRef>,
    snapshots: Cell<usize>,
}

impl ScriptedWorkspace {
    /// Creates a workspace without open documents.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a document that is already open, without firing an event.
    pub fn add_open(&self, document: DocumentRef) {
        self.documents.borrow_mut().push(document);
    }

    /// Opens a document and notifies listeners.
    pub fn open(&self, document: DocumentRef) {
        self.opened.fire(&document);
        self.documents.borrow_mut().push(document);
    }

    /// Number of live document-opened subscriptions.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.opened.listener_count()
    }

    /// Number of snapshots taken through [`Workspace::text_documents`].
    #[must_use]
    pub const fn snapshot_count(&self) -> usize {
        self.snapshots.get()
    }
}

impl Workspace for ScriptedWorkspace {
    fn text_documents(&self) -> Vec<DocumentRef> {
        self.snapshots.set(self.snapshots.get() + 1);
        self.documents.borrow().clone()
    }

    fn on_did_open_text_document(&self, listener: DocumentListener) -> Box<dyn Disposable> {
        self.opened.subscribe(listener)
    }
}

/// Active-editor tracker driven by the test.
#[derive(Debug, Default)]
pub struct ScriptedEditors {
    active: RefCell<Option<DocumentRef>>,
    changes: Emitter<Option<DocumentRef>>,
}

impl ScriptedEditors {
    /// Creates a tracker with no active editor.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Focuses an editor showing `document`, or none.
    pub fn activate(&self, document: Option<DocumentRef>) {
        *self.active.borrow_mut() = document;
        let current = self.active.borrow().clone();
        self.changes.fire(&current);
    }

    /// Number of live active-editor subscriptions.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.changes.listener_count()
    }
}

impl ActiveEditorTracker for ScriptedEditors {
    fn active_document(&self) -> Option<DocumentRef> {
        self.active.borrow().clone()
    }

    fn on_did_change_active_editor(
        &self,
        mut listener: ActiveEditorListener,
    ) -> Box<dyn Disposable> {
        self.changes
            .subscribe(move |document: &Option<DocumentRef>| listener(document.as_ref()))
    }
}

/// Context key sink that records every write.
#[derive(Debug, Default)]
pub struct RecordingContextKeys {
    writes: RefCell<Vec<(String, bool)>>,
}

impl RecordingContextKeys {
    /// Every write in call order.
    #[must_use]
    pub fn writes(&self) -> Vec<(String, bool)> {
        self.writes.borrow().clone()
    }

    /// Latest value written for `key`.
    #[must_use]
    pub fn current(&self, key: &str) -> Option<bool> {
        self.writes
            .borrow()
            .iter()
            .rev()
            .find(|(written, _)| written == key)
            .map(|(_, value)| *value)
    }
}

impl ContextKeys for RecordingContextKeys {
    fn set_context(&self, key: &str, value: bool) {
        self.writes.borrow_mut().push((key.to_owned(), value));
    }
}
