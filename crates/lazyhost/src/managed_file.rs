//! Context key tracking whether the active editor shows a managed file.
//!
//! A file is managed when its language is served by the client host and the
//! host can resolve it to a path. Project configuration files
//! (`tsconfig.json`, `jsconfig.json` and variants such as
//! `tsconfig.base.json`) are always managed. The key is only written when its value
//! changes, and is cleared when the resource is disposed.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use camino::Utf8PathBuf;
use url::Url;

use crate::dispose::Disposable;
use crate::document::DocumentRef;
use crate::language::SupportedLanguageSet;
use crate::workspace::{ActiveEditorTracker, ContextKeys};

/// Context key written by [`ManagedFileContext`].
pub const MANAGED_FILE_CONTEXT_KEY: &str = "typescript.isManagedFile";

type PathResolver = Box<dyn Fn(&Url) -> Option<Utf8PathBuf>>;

struct ContextState {
    keys: Rc<dyn ContextKeys>,
    languages: Rc<SupportedLanguageSet>,
    resolve: PathResolver,
    managed: Cell<bool>,
}

impl ContextState {
    fn update(&self, document: Option<&DocumentRef>) {
        let managed = document.is_some_and(|open| {
            is_project_config(open.uri())
                || (self.languages.contains(open.language_id())
                    && (self.resolve)(open.uri()).is_some())
        });
        self.set(managed);
    }

    fn set(&self, managed: bool) {
        if self.managed.replace(managed) != managed {
            self.keys.set_context(MANAGED_FILE_CONTEXT_KEY, managed);
        }
    }
}

/// Matches `tsconfig.json`, `jsconfig.json` and `[tj]sconfig.*.json`,
/// ignoring case.
fn is_project_config(uri: &Url) -> bool {
    let Some(name) = uri.path_segments().and_then(|mut segments| segments.next_back()) else {
        return false;
    };
    let lowered = name.to_ascii_lowercase();
    let rest = lowered
        .strip_prefix("tsconfig.")
        .or_else(|| lowered.strip_prefix("jsconfig."));
    rest.is_some_and(|tail| {
        tail == "json" || tail.strip_suffix(".json").is_some_and(|infix| !infix.is_empty())
    })
}

/// Keeps [`MANAGED_FILE_CONTEXT_KEY`] in sync with the active editor.
pub struct ManagedFileContext {
    state: Rc<ContextState>,
    subscription: Option<Box<dyn Disposable>>,
}

impl ManagedFileContext {
    /// Evaluates the current editor and follows later editor changes.
    #[must_use]
    pub fn new<R>(
        tracker: &dyn ActiveEditorTracker,
        keys: Rc<dyn ContextKeys>,
        languages: Rc<SupportedLanguageSet>,
        resolve: R,
    ) -> Self
    where
        R: Fn(&Url) -> Option<Utf8PathBuf> + 'static,
    {
        let state = Rc::new(ContextState {
            keys,
            languages,
            resolve: Box::new(resolve),
            managed: Cell::new(false),
        });

        let listener_state = Rc::clone(&state);
        let subscription = tracker.on_did_change_active_editor(Box::new(
            move |document: Option<&DocumentRef>| listener_state.update(document),
        ));
        state.update(tracker.active_document().as_ref());

        Self {
            state,
            subscription: Some(subscription),
        }
    }

    /// Last value written to the context key.
    #[must_use]
    pub fn is_managed(&self) -> bool {
        self.state.managed.get()
    }
}

impl Disposable for ManagedFileContext {
    fn dispose(&mut self) {
        if let Some(mut subscription) = self.subscription.take() {
            subscription.dispose();
            self.state.set(false);
        }
    }
}

impl fmt::Debug for ManagedFileContext {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("ManagedFileContext")
            .field("managed", &self.is_managed())
            .field("listening", &self.subscription.is_some())
            .finish()
    }
}
