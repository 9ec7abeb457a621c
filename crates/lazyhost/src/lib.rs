//! Deferred activation of a language-service client host.
#![deny(missing_docs)]
//!
//! Building the client host is expensive: it spawns and negotiates with an
//! external analysis process. The crate postpones that work until a document
//! the service understands is actually open, then builds the host exactly
//! once. [`DeferredCell`] memoises construction, [`lazily_activate_client`]
//! decides when to force it, and [`DisposableAggregate`] releases everything
//! the gate acquired.
//!
//! Everything here is single-threaded. The asynchronous half of activation
//! runs on any [`futures::task::LocalSpawn`] executor; [`LocalSetSpawner`]
//! adapts a `tokio` `LocalSet`.

mod client_host;
mod controller;
mod deferred;
mod document;
mod dispose;
mod errors;
mod events;
mod language;
mod managed_file;
mod plugins;
mod spawn;
pub mod telemetry;
mod workspace;

pub use client_host::{ClientHost, LazyClientHost, create_lazy_client_host};
pub use controller::{
    ActivationController, ActivationOptions, ActivationOutcome, ActivationState, EditorServices,
    HookFuture, PreActivationHook, immediate_hook, lazily_activate_client,
};
pub use deferred::DeferredCell;
pub use dispose::{Disposable, DisposableAggregate, OnDispose, on_dispose};
pub use document::{DisabledSchemes, DocumentRef, is_supported_document};
pub use errors::{ActivationError, ClientHostError, HookError, PluginError};
pub use events::Emitter;
pub use language::{LanguageDescription, SupportedLanguageSet, standard_language_descriptions};
pub use managed_file::{MANAGED_FILE_CONTEXT_KEY, ManagedFileContext};
pub use plugins::{PluginManifest, PluginRegistry};
pub use spawn::LocalSetSpawner;
pub use workspace::{
    ActiveEditorListener, ActiveEditorTracker, ContextKeys, DocumentListener, Workspace,
};
