//! Error types surfaced by the activation gate and its collaborators.

use std::error::Error;

use thiserror::Error;

/// Failure reported while constructing the client host.
#[derive(Debug, Error)]
pub enum ClientHostError {
    /// The extension subscriptions were released before the host was built.
    #[error("extension subscriptions were disposed before the client host was built")]
    Deactivated,

    /// The host factory failed.
    #[error("failed to start the client host: {message}")]
    Startup {
        /// Human-readable description of the failure.
        message: String,
        /// Optional underlying error reported by the factory.
        #[source]
        source: Option<Box<dyn Error + Send + Sync>>,
    },
}

impl ClientHostError {
    /// Builds a startup error without an underlying source.
    #[must_use]
    pub fn startup(message: impl Into<String>) -> Self {
        Self::Startup {
            message: message.into(),
            source: None,
        }
    }

    /// Builds a startup error that wraps an underlying source.
    #[must_use]
    pub fn startup_with_source(
        message: impl Into<String>,
        source: impl Into<Box<dyn Error + Send + Sync>>,
    ) -> Self {
        Self::Startup {
            message: message.into(),
            source: Some(source.into()),
        }
    }
}

/// Rejection reported by a pre-activation hook.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct HookError {
    message: String,
    #[source]
    source: Option<Box<dyn Error + Send + Sync>>,
}

impl HookError {
    /// Builds an error without an underlying source.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Builds an error that wraps an underlying source.
    #[must_use]
    pub fn with_source(
        message: impl Into<String>,
        source: impl Into<Box<dyn Error + Send + Sync>>,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Human-friendly description without the optional source.
    #[must_use]
    pub const fn message(&self) -> &str {
        self.message.as_str()
    }
}

/// Errors recorded when the asynchronous half of activation fails.
///
/// Activation is never retried; the error is logged and kept on the
/// controller for inspection.
#[derive(Debug, Error)]
pub enum ActivationError {
    /// The pre-activation hook rejected.
    #[error("pre-activation hook failed: {source}")]
    Hook {
        /// Error returned by the hook.
        #[source]
        source: HookError,
    },

    /// The executor refused the activation task.
    #[error("could not schedule client host activation: {source}")]
    Spawn {
        /// Error returned by the executor.
        #[source]
        source: futures::task::SpawnError,
    },

    /// The deferred client host could not be built.
    #[error("client host construction failed: {source}")]
    ClientHost {
        /// Error returned by the host factory.
        #[source]
        source: ClientHostError,
    },
}

/// Errors raised while loading or registering language-service plugins.
#[derive(Debug, Error)]
pub enum PluginError {
    /// A manifest failed validation.
    #[error("invalid plugin manifest: {message}")]
    Manifest {
        /// Description of the validation failure.
        message: String,
    },

    /// A contribution document could not be decoded.
    #[error("failed to decode plugin contributions: {0}")]
    Decode(#[source] serde_json::Error),
}

impl PluginError {
    pub(crate) fn manifest(message: impl Into<String>) -> Self {
        Self::Manifest {
            message: message.into(),
        }
    }
}
