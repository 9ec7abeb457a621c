//! Default values shared by the configuration layer and its consumers.

use crate::logging::LogFormat;

/// Default log filter expression.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// URI schemes that never trigger activation, whatever their language.
///
/// These cover virtual and remote file systems served by other extensions,
/// where the language service has no on-disk view of the resource.
pub const DEFAULT_DISABLED_SCHEMES: &[&str] = &["git", "vsls", "github", "azurerepos"];

/// Default log filter expression.
#[must_use]
pub const fn default_log_filter() -> &'static str {
    DEFAULT_LOG_FILTER
}

/// Owned log filter value used where allocation is required (e.g. serde).
#[must_use]
pub fn default_log_filter_string() -> String {
    DEFAULT_LOG_FILTER.to_owned()
}

/// Default logging format.
#[must_use]
pub const fn default_log_format() -> LogFormat {
    LogFormat::Json
}

/// Built-in disabled schemes as owned strings.
#[must_use]
pub fn default_disabled_schemes() -> Vec<String> {
    DEFAULT_DISABLED_SCHEMES
        .iter()
        .map(|scheme| (*scheme).to_owned())
        .collect()
}
