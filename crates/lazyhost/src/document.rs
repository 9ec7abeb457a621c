//! Open documents and the predicate deciding whether one triggers activation.

use std::collections::HashSet;

use url::Url;

use lazyhost_config::{Config, DEFAULT_DISABLED_SCHEMES};

use crate::language::SupportedLanguageSet;

/// An open editor buffer as seen by the activation gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRef {
    language_id: String,
    uri: Url,
}

impl DocumentRef {
    /// Describes a document by language identifier and resource locator.
    #[must_use]
    pub fn new(language_id: impl Into<String>, uri: Url) -> Self {
        Self {
            language_id: language_id.into(),
            uri,
        }
    }

    /// Language identifier assigned by the editor.
    #[must_use]
    pub const fn language_id(&self) -> &str {
        self.language_id.as_str()
    }

    /// Resource locator of the document.
    #[must_use]
    pub const fn uri(&self) -> &Url {
        &self.uri
    }

    /// Scheme of the resource locator, always lower case.
    #[must_use]
    pub fn scheme(&self) -> &str {
        self.uri.scheme()
    }
}

/// Schemes whose documents never trigger activation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisabledSchemes {
    schemes: HashSet<String>,
}

impl DisabledSchemes {
    /// Builds a set from arbitrary schemes. Matching is case-insensitive.
    #[must_use]
    pub fn new<I, S>(schemes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            schemes: schemes
                .into_iter()
                .map(|scheme| scheme.as_ref().to_ascii_lowercase())
                .collect(),
        }
    }

    /// The built-in set of virtual and remote file-system schemes.
    #[must_use]
    pub fn builtin() -> Self {
        Self::new(DEFAULT_DISABLED_SCHEMES)
    }

    /// Built-in schemes extended with the configured extras.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.disabled_schemes())
    }

    /// Whether documents with `scheme` are excluded.
    #[must_use]
    pub fn contains(&self, scheme: &str) -> bool {
        self.schemes.contains(&scheme.to_ascii_lowercase())
    }
}

impl Default for DisabledSchemes {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Returns `true` when `document` should trigger activation.
///
/// The language must be supported and the scheme must not be disabled.
#[must_use]
pub fn is_supported_document(
    document: &DocumentRef,
    languages: &SupportedLanguageSet,
    disabled: &DisabledSchemes,
) -> bool {
    languages.contains(document.language_id()) && !disabled.contains(document.scheme())
}
