//! Log targets and subscriber installation for the extension host process.
//!
//! Activation decisions are logged under [`ACTIVATION_TARGET`], host
//! construction under [`CLIENT_HOST_TARGET`] and plugin registration under
//! [`PLUGINS_TARGET`]. [`initialise`] keeps the lifecycle targets at `info`
//! unless the configured filter names them, so a terse global filter such as
//! `warn` still records when and why the client host was started.

use std::io::{self, IsTerminal};

use once_cell::sync::OnceCell;
use tracing::{Subscriber, subscriber::SetGlobalDefaultError};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;

use lazyhost_config::{Config, LogFormat};

/// Target of activation gate events.
pub const ACTIVATION_TARGET: &str = "lazyhost::activation";

/// Target of client host construction events.
pub const CLIENT_HOST_TARGET: &str = "lazyhost::client_host";

/// Target of plugin registry events.
pub const PLUGINS_TARGET: &str = "lazyhost::plugins";

const LIFECYCLE_TARGETS: [&str; 2] = [ACTIVATION_TARGET, CLIENT_HOST_TARGET];

static INSTALLED: OnceCell<TelemetryHandle> = OnceCell::new();

/// Describes the subscriber installed by the first successful [`initialise`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryHandle {
    filter: String,
    format: LogFormat,
}

impl TelemetryHandle {
    /// Effective filter expression, lifecycle directives included.
    #[must_use]
    pub const fn filter(&self) -> &str {
        self.filter.as_str()
    }

    /// Output format of the subscriber.
    #[must_use]
    pub const fn format(&self) -> LogFormat {
        self.format
    }
}

/// Errors encountered while configuring telemetry.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// The configured filter expression did not parse.
    #[error("invalid log filter '{filter}': {message}")]
    Filter {
        /// Effective filter expression that was rejected.
        filter: String,
        /// Parser diagnostic.
        message: String,
    },
    /// Another global subscriber is already installed.
    #[error("failed to install telemetry subscriber: {0}")]
    Subscriber(#[source] SetGlobalDefaultError),
}

/// Installs the global subscriber on first use.
///
/// Later calls return the handle of the subscriber already installed, even
/// when `config` differs.
///
/// # Errors
///
/// Returns [`TelemetryError::Filter`] for an invalid filter expression and
/// [`TelemetryError::Subscriber`] when a subscriber was installed by other
/// code.
pub fn initialise(config: &Config) -> Result<TelemetryHandle, TelemetryError> {
    INSTALLED.get_or_try_init(|| install(config)).cloned()
}

/// Appends an `info` directive for each lifecycle target `filter` leaves
/// unnamed.
#[must_use]
pub fn lifecycle_filter(filter: &str) -> String {
    let mut directives: Vec<String> = filter
        .split(',')
        .map(str::trim)
        .filter(|directive| !directive.is_empty())
        .map(str::to_owned)
        .collect();
    for target in LIFECYCLE_TARGETS {
        let named = directives
            .iter()
            .any(|directive| directive.starts_with(target));
        if !named {
            directives.push(format!("{target}=info"));
        }
    }
    directives.join(",")
}

fn install(config: &Config) -> Result<TelemetryHandle, TelemetryError> {
    let effective = lifecycle_filter(config.log_filter());
    let env_filter = parse_filter(&effective)?;
    let format = config.log_format();

    let builder = fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        // Stdout carries the extension host protocol.
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_timer(fmt::time::UtcTime::rfc_3339());
    let subscriber: Box<dyn Subscriber + Send + Sync> = match format {
        LogFormat::Json => Box::new(builder.json().flatten_event(true).finish()),
        LogFormat::Compact => Box::new(builder.compact().finish()),
    };
    tracing::subscriber::set_global_default(subscriber).map_err(TelemetryError::Subscriber)?;

    tracing::debug!(target: ACTIVATION_TARGET, filter = %effective, "telemetry installed");
    Ok(TelemetryHandle {
        filter: effective,
        format,
    })
}

fn parse_filter(filter: &str) -> Result<EnvFilter, TelemetryError> {
    EnvFilter::try_new(filter).map_err(|error| TelemetryError::Filter {
        filter: filter.to_owned(),
        message: error.to_string(),
    })
}
