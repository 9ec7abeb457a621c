//! BDD test world driving the activation gate on a local task set.

use std::cell::Cell;
use std::rc::Rc;

use futures::FutureExt;
use futures::future;
use tokio::runtime::{Builder, Runtime};
use tokio::sync::oneshot;
use tokio::task::LocalSet;

use crate::client_host::{LazyClientHost, create_lazy_client_host};
use crate::controller::{
    ActivationController, ActivationOptions, EditorServices, HookFuture, PreActivationHook,
    lazily_activate_client,
};
use crate::dispose::DisposableAggregate;
use crate::document::{DisabledSchemes, DocumentRef};
use crate::errors::{ClientHostError, HookError};
use crate::language::{LanguageDescription, standard_language_descriptions};
use crate::plugins::PluginRegistry;
use crate::spawn::LocalSetSpawner;
use crate::workspace::{ActiveEditorTracker, ContextKeys};

use super::editors::{RecordingContextKeys, ScriptedEditors, ScriptedWorkspace};
use super::recording_host::RecordingClientHost;

/// Number of scheduler turns granted to local tasks by [`TestWorld::settle`].
const SETTLE_TURNS: usize = 16;

/// How the pre-activation hook behaves once invoked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookMode {
    /// Resolves immediately.
    Immediate,
    /// Waits until [`TestWorld::release_hook`] is called.
    Gated,
    /// Rejects with the supplied message.
    Rejecting(String),
}

/// Shared state exercised by BDD step implementations and unit tests.
pub struct TestWorld {
    runtime: Runtime,
    local: Rc<LocalSet>,
    /// Workspace that reports open documents.
    pub workspace: Rc<ScriptedWorkspace>,
    /// Active editor tracker handed to the managed-file context.
    pub editors: Rc<ScriptedEditors>,
    /// Context key sink.
    pub keys: Rc<RecordingContextKeys>,
    /// Plugins consulted when the gate starts.
    pub plugins: PluginRegistry,
    /// Languages served natively.
    pub descriptions: Vec<LanguageDescription>,
    /// Schemes that never trigger activation.
    pub disabled: DisabledSchemes,
    /// Hook behaviour used when the gate starts.
    pub hook: HookMode,
    /// Whether the host factory fails.
    pub fail_builds: bool,
    /// Extension-level subscriptions owning host teardown.
    pub subscriptions: Rc<DisposableAggregate>,
    /// Clone of every host the factory hands out.
    pub host: RecordingClientHost,
    builds: Rc<Cell<usize>>,
    hook_calls: Rc<Cell<usize>>,
    gate: Option<oneshot::Sender<()>>,
    lazy_host: Option<LazyClientHost<RecordingClientHost>>,
    controller: Option<ActivationController<RecordingClientHost>>,
}

impl TestWorld {
    /// Creates a world serving the standard languages.
    ///
    /// # Panics
    ///
    /// Panics when the current-thread runtime cannot be built.
    #[must_use]
    pub fn new() -> Self {
        let runtime = Builder::new_current_thread()
            .build()
            .expect("current-thread runtime should build");
        Self {
            runtime,
            local: Rc::new(LocalSet::new()),
            workspace: Rc::new(ScriptedWorkspace::new()),
            editors: Rc::new(ScriptedEditors::new()),
            keys: Rc::new(RecordingContextKeys::default()),
            plugins: PluginRegistry::new(),
            descriptions: standard_language_descriptions(),
            disabled: DisabledSchemes::builtin(),
            hook: HookMode::Immediate,
            fail_builds: false,
            subscriptions: Rc::new(DisposableAggregate::new()),
            host: RecordingClientHost::new(),
            builds: Rc::new(Cell::new(0)),
            hook_calls: Rc::new(Cell::new(0)),
            gate: None,
            lazy_host: None,
            controller: None,
        }
    }

    /// Creates the lazy host and the activation gate, then lets local tasks
    /// run.
    ///
    /// # Panics
    ///
    /// Panics when the gate was already started.
    pub fn start(&mut self) {
        assert!(self.controller.is_none(), "gate already started");

        let template = self.host.clone();
        let builds = Rc::clone(&self.builds);
        let fail = self.fail_builds;
        let lazy_host = create_lazy_client_host((), &self.subscriptions, move |_: &()| {
            builds.set(builds.get() + 1);
            if fail {
                return Err(ClientHostError::startup("analysis process exited during startup"));
            }
            Ok(template.clone())
        });
        self.lazy_host = Some(Rc::clone(&lazy_host));

        let tracker: Rc<dyn ActiveEditorTracker> = self.editors.clone();
        let keys: Rc<dyn ContextKeys> = self.keys.clone();
        let spawner = LocalSetSpawner::new(Rc::clone(&self.local));
        let mut options = ActivationOptions::new(spawner)
            .with_descriptions(self.descriptions.clone())
            .with_disabled_schemes(self.disabled.clone());
        options.on_activate = self.build_hook();

        let workspace = Rc::clone(&self.workspace);
        let controller = self.local.block_on(&self.runtime, async {
            lazily_activate_client(
                lazy_host,
                workspace.as_ref(),
                &self.plugins,
                EditorServices {
                    active_editor_tracker: tracker,
                    context_keys: keys,
                },
                options,
            )
        });
        self.controller = Some(controller);
        self.settle();
    }

    fn build_hook(&mut self) -> PreActivationHook {
        let calls = Rc::clone(&self.hook_calls);
        let behaviour = match &self.hook {
            HookMode::Immediate => None,
            HookMode::Gated => {
                let (sender, receiver) = oneshot::channel();
                self.gate = Some(sender);
                Some(Ok(receiver))
            }
            HookMode::Rejecting(message) => Some(Err(message.clone())),
        };
        Box::new(move || -> HookFuture {
            calls.set(calls.get() + 1);
            match behaviour {
                None => future::ready(Ok(())).boxed_local(),
                Some(Ok(receiver)) => async move {
                    receiver
                        .await
                        .map_err(|_| HookError::new("pre-activation gate was dropped"))
                }
                .boxed_local(),
                Some(Err(message)) => future::ready(Err(HookError::new(message))).boxed_local(),
            }
        })
    }

    /// Adds a document that is open before the gate starts.
    pub fn add_open(&self, document: DocumentRef) {
        self.workspace.add_open(document);
    }

    /// Opens a document after the gate started, then lets local tasks run.
    pub fn open(&self, document: DocumentRef) {
        let workspace = Rc::clone(&self.workspace);
        self.local
            .block_on(&self.runtime, async move { workspace.open(document) });
        self.settle();
    }

    /// Focuses an editor, or none.
    pub fn focus(&self, document: Option<DocumentRef>) {
        self.editors.activate(document);
    }

    /// Completes a gated hook.
    ///
    /// # Panics
    ///
    /// Panics when no gated hook is waiting.
    pub fn release_hook(&mut self) {
        let gate = self.gate.take().expect("a gated hook should be waiting");
        gate.send(()).expect("the hook should still be awaiting its gate");
        self.settle();
    }

    /// Disposes the activation gate, then lets local tasks run.
    pub fn dispose(&self) {
        self.controller().dispose();
        self.settle();
    }

    /// Drops the activation gate without disposing it.
    pub fn drop_controller(&mut self) {
        self.controller = None;
    }

    /// Gives spawned local tasks a chance to make progress.
    pub fn settle(&self) {
        self.local.block_on(&self.runtime, async {
            for _ in 0..SETTLE_TURNS {
                tokio::task::yield_now().await;
            }
        });
    }

    /// The activation gate under test.
    ///
    /// # Panics
    ///
    /// Panics when the gate has not been started.
    #[must_use]
    pub fn controller(&self) -> &ActivationController<RecordingClientHost> {
        self.controller.as_ref().expect("gate should be started")
    }

    /// The deferred host cell handed to the gate.
    ///
    /// # Panics
    ///
    /// Panics when the gate has not been started.
    #[must_use]
    pub fn lazy_host(&self) -> &LazyClientHost<RecordingClientHost> {
        self.lazy_host.as_ref().expect("gate should be started")
    }

    /// Number of times the host factory ran.
    #[must_use]
    pub fn builds(&self) -> usize {
        self.builds.get()
    }

    /// Number of times the pre-activation hook was invoked.
    #[must_use]
    pub fn hook_calls(&self) -> usize {
        self.hook_calls.get()
    }
}

impl Default for TestWorld {
    fn default() -> Self {
        Self::new()
    }
}
