//! Activation gate deciding when the client host is first built.
//!
//! The controller scans the documents already open when it is created. If
//! none qualifies it listens for newly opened documents instead. The first
//! qualifying document latches the controller into
//! [`ActivationState::Activated`] and drops the listener before anything
//! asynchronous happens, so a second activation can never be queued.
//!
//! Activation then completes in a task handed to the configured
//! [`LocalSpawn`] executor: the pre-activation hook is awaited, the deferred
//! client host is forced, and a [`ManagedFileContext`] bound to the live host
//! is registered with the controller's disposables.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use futures::FutureExt;
use futures::future::{self, LocalBoxFuture};
use futures::task::{LocalSpawn, LocalSpawnExt};
use url::Url;

use crate::client_host::{ClientHost, LazyClientHost};
use crate::dispose::{Disposable, DisposableAggregate, on_dispose};
use crate::document::{DisabledSchemes, DocumentRef, is_supported_document};
use crate::errors::{ActivationError, HookError};
use crate::language::{LanguageDescription, SupportedLanguageSet, standard_language_descriptions};
use crate::telemetry::ACTIVATION_TARGET;
use crate::managed_file::ManagedFileContext;
use crate::plugins::PluginRegistry;
use crate::workspace::{ActiveEditorTracker, ContextKeys, Workspace};

/// Future returned by a pre-activation hook.
pub type HookFuture = LocalBoxFuture<'static, Result<(), HookError>>;

/// Callback awaited between the activation trigger and host construction.
pub type PreActivationHook = Box<dyn FnOnce() -> HookFuture>;

/// Hook that resolves immediately.
#[must_use]
pub fn immediate_hook() -> PreActivationHook {
    Box::new(|| future::ready(Ok(())).boxed_local())
}

/// Whether the gate has fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivationState {
    /// No qualifying document has been seen yet.
    Idle,
    /// A qualifying document was seen. Terminal.
    Activated,
}

/// Progress of the asynchronous half of activation.
#[derive(Debug, Clone)]
pub enum ActivationOutcome {
    /// Not activated yet, or still waiting on the hook.
    Pending,
    /// The host was built and the managed-file context registered.
    Ready,
    /// Activation failed and will not be retried.
    Failed(Rc<ActivationError>),
}

impl ActivationOutcome {
    /// Returns `true` for [`ActivationOutcome::Ready`].
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }
}

/// Editor services consumed once the host is live.
pub struct EditorServices {
    /// Source of active editor changes.
    pub active_editor_tracker: Rc<dyn ActiveEditorTracker>,
    /// Sink for the managed-file context key.
    pub context_keys: Rc<dyn ContextKeys>,
}

/// Tunables for [`lazily_activate_client`].
pub struct ActivationOptions {
    /// Languages served natively by the host.
    pub descriptions: Vec<LanguageDescription>,
    /// Schemes that never trigger activation.
    pub disabled_schemes: DisabledSchemes,
    /// Hook awaited before the host is built.
    pub on_activate: PreActivationHook,
    /// Executor running the asynchronous half of activation.
    pub spawner: Rc<dyn LocalSpawn>,
}

impl ActivationOptions {
    /// Standard descriptions, built-in disabled schemes and an immediate
    /// hook, with activation tasks handed to `spawner`.
    #[must_use]
    pub fn new<S>(spawner: S) -> Self
    where
        S: LocalSpawn + 'static,
    {
        Self {
            descriptions: standard_language_descriptions(),
            disabled_schemes: DisabledSchemes::builtin(),
            on_activate: immediate_hook(),
            spawner: Rc::new(spawner),
        }
    }

    /// Replaces the language descriptions.
    #[must_use]
    pub fn with_descriptions(mut self, descriptions: Vec<LanguageDescription>) -> Self {
        self.descriptions = descriptions;
        self
    }

    /// Replaces the disabled schemes.
    #[must_use]
    pub fn with_disabled_schemes(mut self, disabled_schemes: DisabledSchemes) -> Self {
        self.disabled_schemes = disabled_schemes;
        self
    }

    /// Replaces the pre-activation hook.
    #[must_use]
    pub fn with_hook<F>(mut self, hook: F) -> Self
    where
        F: FnOnce() -> HookFuture + 'static,
    {
        self.on_activate = Box::new(hook);
        self
    }
}

type SubscriptionSlot = Rc<RefCell<Option<Box<dyn Disposable>>>>;

struct Deferred<H> {
    host: LazyClientHost<H>,
    editors: EditorServices,
    on_activate: PreActivationHook,
    spawner: Rc<dyn LocalSpawn>,
}

struct Shared<H> {
    languages: Rc<SupportedLanguageSet>,
    disabled: DisabledSchemes,
    state: Cell<ActivationState>,
    outcome: RefCell<ActivationOutcome>,
    subscription: SubscriptionSlot,
    disposables: DisposableAggregate,
    deferred: RefCell<Option<Deferred<H>>>,
}

/// Handle over the activation gate.
///
/// Disposing it releases the document listener if activation has not
/// happened yet, and the managed-file context if it has.
pub struct ActivationController<H> {
    shared: Rc<Shared<H>>,
}

/// Builds the client host the first time a supported document is open.
///
/// The supported-language set is computed here, once, from
/// `options.descriptions` and the plugins registered in `plugins` at this
/// moment.
///
/// The pre-activation hook is invoked synchronously when the first
/// qualifying document is seen; awaiting it and building the host happen in
/// a task handed to `options.spawner`. An executor that refuses the task is
/// recorded as [`ActivationOutcome::Failed`].
#[must_use]
pub fn lazily_activate_client<H>(
    lazy_client_host: LazyClientHost<H>,
    workspace: &dyn Workspace,
    plugins: &PluginRegistry,
    editors: EditorServices,
    options: ActivationOptions,
) -> ActivationController<H>
where
    H: ClientHost + 'static,
{
    let ActivationOptions {
        descriptions,
        disabled_schemes,
        on_activate,
        spawner,
    } = options;
    let languages = Rc::new(SupportedLanguageSet::from_sources(&descriptions, plugins));
    tracing::debug!(
        target: ACTIVATION_TARGET,
        languages = languages.len(),
        plugins = plugins.len(),
        "computed supported languages"
    );

    let shared = Rc::new(Shared {
        languages,
        disabled: disabled_schemes,
        state: Cell::new(ActivationState::Idle),
        outcome: RefCell::new(ActivationOutcome::Pending),
        subscription: Rc::new(RefCell::new(None)),
        disposables: DisposableAggregate::new(),
        deferred: RefCell::new(Some(Deferred {
            host: lazy_client_host,
            editors,
            on_activate,
            spawner,
        })),
    });

    let open = workspace.text_documents();
    if open.iter().any(|document| maybe_activate(&shared, document)) {
        return ActivationController { shared };
    }

    let listener = Rc::downgrade(&shared);
    let subscription =
        workspace.on_did_open_text_document(Box::new(move |document: &DocumentRef| {
            if let Some(gate) = listener.upgrade() {
                maybe_activate(&gate, document);
            }
        }));
    *shared.subscription.borrow_mut() = Some(subscription);

    let slot = Rc::clone(&shared.subscription);
    shared.disposables.push(on_dispose(move || release(&slot)));
    tracing::debug!(
        target: ACTIVATION_TARGET,
        open_documents = open.len(),
        "no open document qualifies; waiting for documents to open"
    );

    ActivationController { shared }
}

impl<H> ActivationController<H> {
    /// Current gate state.
    #[must_use]
    pub fn state(&self) -> ActivationState {
        self.shared.state.get()
    }

    /// Whether a qualifying document has been seen.
    #[must_use]
    pub fn has_activated(&self) -> bool {
        self.state() == ActivationState::Activated
    }

    /// Progress of the asynchronous half of activation.
    #[must_use]
    pub fn outcome(&self) -> ActivationOutcome {
        self.shared.outcome.borrow().clone()
    }

    /// Whether the document-opened listener is still registered.
    #[must_use]
    pub fn is_listening(&self) -> bool {
        self.shared.subscription.borrow().is_some()
    }

    /// The supported-language snapshot taken at construction.
    #[must_use]
    pub fn languages(&self) -> &SupportedLanguageSet {
        &self.shared.languages
    }

    /// Releases every resource the controller acquired. Idempotent.
    pub fn dispose(&self) {
        self.shared.disposables.dispose();
        // Drops the host handle when activation never happened.
        let unused = self.shared.deferred.borrow_mut().take();
        drop(unused);
    }
}

impl<H> Disposable for ActivationController<H> {
    fn dispose(&mut self) {
        Self::dispose(self);
    }
}

impl<H> fmt::Debug for ActivationController<H> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("ActivationController")
            .field("state", &self.state())
            .field("outcome", &self.outcome())
            .field("listening", &self.is_listening())
            .finish_non_exhaustive()
    }
}

fn release(slot: &SubscriptionSlot) {
    let subscription = slot.borrow_mut().take();
    if let Some(mut live) = subscription {
        live.dispose();
    }
}

fn maybe_activate<H>(shared: &Rc<Shared<H>>, document: &DocumentRef) -> bool
where
    H: ClientHost + 'static,
{
    if shared.state.get() == ActivationState::Activated
        || !is_supported_document(document, &shared.languages, &shared.disabled)
    {
        return false;
    }

    shared.state.set(ActivationState::Activated);
    release(&shared.subscription);
    tracing::info!(
        target: ACTIVATION_TARGET,
        event = "activation_triggered",
        language = document.language_id(),
        scheme = document.scheme(),
        "document triggered client host activation"
    );

    let deferred = shared.deferred.borrow_mut().take();
    if let Some(Deferred {
        host,
        editors,
        on_activate,
        spawner,
    }) = deferred
    {
        let hook = on_activate();
        let task = finish_activation(Rc::clone(shared), hook, host, editors);
        if let Err(source) = spawner.spawn_local(task) {
            tracing::error!(
                target: ACTIVATION_TARGET,
                event = "activation_failed",
                error = %source,
                "executor refused the activation task"
            );
            *shared.outcome.borrow_mut() =
                ActivationOutcome::Failed(Rc::new(ActivationError::Spawn { source }));
        }
    }
    true
}

async fn finish_activation<H>(
    shared: Rc<Shared<H>>,
    hook: HookFuture,
    host: LazyClientHost<H>,
    editors: EditorServices,
) where
    H: ClientHost + 'static,
{
    let result = match hook.await {
        Ok(()) => attach_client_host(&shared, host, editors),
        Err(source) => Err(ActivationError::Hook { source }),
    };

    let outcome = match result {
        Ok(()) => {
            tracing::info!(
                target: ACTIVATION_TARGET,
                event = "activation_ready",
                "client host is live"
            );
            ActivationOutcome::Ready
        }
        Err(error) => {
            tracing::error!(
                target: ACTIVATION_TARGET,
                event = "activation_failed",
                %error,
                "client host activation failed"
            );
            ActivationOutcome::Failed(Rc::new(error))
        }
    };
    *shared.outcome.borrow_mut() = outcome;
}

fn attach_client_host<H>(
    shared: &Shared<H>,
    host: LazyClientHost<H>,
    editors: EditorServices,
) -> Result<(), ActivationError>
where
    H: ClientHost + 'static,
{
    host.force()
        .map_err(|source| ActivationError::ClientHost { source })?;

    let EditorServices {
        active_editor_tracker,
        context_keys,
    } = editors;
    let context = ManagedFileContext::new(
        active_editor_tracker.as_ref(),
        context_keys,
        Rc::clone(&shared.languages),
        move |resource: &Url| host.get().and_then(|live| live.to_path(resource)),
    );
    shared.disposables.push(Box::new(context));
    Ok(())
}
