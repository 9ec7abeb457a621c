//! Layered configuration for the deferred client host.
//!
//! Values are merged by `ortho_config` from defaults, a `lazyhost.toml`
//! configuration file, `LAZYHOST_*` environment variables, and command-line
//! flags, with later layers taking precedence.

mod defaults;
mod logging;

use serde::{Deserialize, Serialize};

use ortho_config::OrthoConfig;

pub use defaults::{
    DEFAULT_DISABLED_SCHEMES, DEFAULT_LOG_FILTER, default_disabled_schemes, default_log_filter,
    default_log_filter_string, default_log_format,
};
pub use logging::{LogFormat, LogFormatParseError};

/// Resolved configuration shared by the extension host glue and telemetry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(prefix = "LAZYHOST")]
pub struct Config {
    /// `tracing` filter expression applied to the subscriber.
    #[ortho_config(default = default_log_filter_string())]
    pub log_filter: String,
    /// Output format used by the subscriber.
    #[ortho_config(default = default_log_format())]
    pub log_format: LogFormat,
    /// Schemes disabled on top of [`DEFAULT_DISABLED_SCHEMES`].
    #[serde(default)]
    pub disabled_schemes: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
            disabled_schemes: Vec::new(),
        }
    }
}

impl Config {
    /// Filter expression for the tracing subscriber.
    #[must_use]
    pub const fn log_filter(&self) -> &str {
        self.log_filter.as_str()
    }

    /// Output format for the tracing subscriber.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }

    /// Every scheme that must never trigger activation.
    ///
    /// The built-in schemes always come first, followed by configured extras
    /// in declaration order. Duplicates are dropped.
    #[must_use]
    pub fn disabled_schemes(&self) -> Vec<String> {
        let mut schemes = default_disabled_schemes();
        for scheme in &self.disabled_schemes {
            let normalised = scheme.trim().to_ascii_lowercase();
            if !normalised.is_empty() && !schemes.contains(&normalised) {
                schemes.push(normalised);
            }
        }
        schemes
    }
}
