//! Recording client host used in tests.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use camino::Utf8PathBuf;
use url::Url;

use crate::client_host::ClientHost;

#[derive(Debug, Default)]
struct RecordingState {
    disposals: Cell<usize>,
    resolved: RefCell<Vec<Url>>,
}

/// Test double that records path lookups and teardown.
///
/// Clones share their recordings, so a clone kept by the test observes the
/// instance owned by the deferred cell.
#[derive(Debug, Clone, Default)]
pub struct RecordingClientHost {
    shared: Rc<RecordingState>,
}

impl RecordingClientHost {
    /// Creates a host with empty recordings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of times the host was disposed.
    #[must_use]
    pub fn dispose_count(&self) -> usize {
        self.shared.disposals.get()
    }

    /// Resources passed to [`ClientHost::to_path`], in call order.
    #[must_use]
    pub fn resolved(&self) -> Vec<Url> {
        self.shared.resolved.borrow().clone()
    }
}

impl ClientHost for RecordingClientHost {
    fn to_path(&self, resource: &Url) -> Option<Utf8PathBuf> {
        self.shared.resolved.borrow_mut().push(resource.clone());
        (resource.scheme() == "file").then(|| Utf8PathBuf::from(resource.path()))
    }

    fn dispose(&self) {
        self.shared.disposals.set(self.shared.disposals.get() + 1);
    }
}
