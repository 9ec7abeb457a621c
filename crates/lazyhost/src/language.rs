//! Languages served by the client host.

use std::collections::HashSet;

use crate::plugins::PluginRegistry;

/// A language family handled natively by the client host.
///
/// The primary identifier is always the first entry of
/// [`language_ids`](Self::language_ids), followed by the dialects that share
/// the same service (for example `typescriptreact` for `typescript`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageDescription {
    id: String,
    language_ids: Vec<String>,
    diagnostic_source: Option<String>,
    standard_file_extensions: Vec<String>,
    is_external: bool,
}

impl LanguageDescription {
    /// Builds a description from its primary identifier and dialects.
    ///
    /// Dialects repeating the primary identifier or each other are dropped.
    #[must_use]
    pub fn new<I, S>(id: impl Into<String>, associated: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let primary = id.into();
        let mut language_ids = vec![primary.clone()];
        for dialect in associated {
            let dialect_id = dialect.into();
            if !language_ids.contains(&dialect_id) {
                language_ids.push(dialect_id);
            }
        }
        Self {
            id: primary,
            language_ids,
            diagnostic_source: None,
            standard_file_extensions: Vec::new(),
            is_external: false,
        }
    }

    /// Labels diagnostics produced for this language with `source`.
    #[must_use]
    pub fn with_diagnostic_source(mut self, source: impl Into<String>) -> Self {
        self.diagnostic_source = Some(source.into());
        self
    }

    /// Sets the file extensions, without leading dots, that map to this
    /// language by default.
    #[must_use]
    pub fn with_file_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.standard_file_extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    /// Marks the language as contributed from outside the client host.
    #[must_use]
    pub const fn external(mut self) -> Self {
        self.is_external = true;
        self
    }

    /// Primary language identifier.
    #[must_use]
    pub const fn id(&self) -> &str {
        self.id.as_str()
    }

    /// Primary identifier followed by its dialects, in declaration order.
    #[must_use]
    pub const fn language_ids(&self) -> &[String] {
        self.language_ids.as_slice()
    }

    /// Source label attached to this language's diagnostics, if any.
    #[must_use]
    pub fn diagnostic_source(&self) -> Option<&str> {
        self.diagnostic_source.as_deref()
    }

    /// File extensions associated with the language by default.
    #[must_use]
    pub const fn standard_file_extensions(&self) -> &[String] {
        self.standard_file_extensions.as_slice()
    }

    /// Whether the language comes from outside the client host.
    #[must_use]
    pub const fn is_external(&self) -> bool {
        self.is_external
    }
}

/// Descriptions for the languages the client host always understands.
#[must_use]
pub fn standard_language_descriptions() -> Vec<LanguageDescription> {
    vec![
        LanguageDescription::new("typescript", ["typescriptreact"])
            .with_diagnostic_source("ts")
            .with_file_extensions(["ts", "cts", "mts", "tsx"]),
        LanguageDescription::new("javascript", ["javascriptreact"])
            .with_diagnostic_source("js")
            .with_file_extensions(["js", "cjs", "mjs", "jsx", "es6"]),
    ]
}

/// Every language identifier that may trigger activation.
///
/// The set is a snapshot: plugins registered after it was built are not
/// reflected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SupportedLanguageSet {
    identifiers: HashSet<String>,
}

impl SupportedLanguageSet {
    /// Flattens standard descriptions and plugin languages into one set.
    #[must_use]
    pub fn from_sources(descriptions: &[LanguageDescription], plugins: &PluginRegistry) -> Self {
        descriptions
            .iter()
            .flat_map(|description| description.language_ids().iter().map(String::as_str))
            .chain(plugins.languages())
            .collect()
    }

    /// Whether `language_id` is supported.
    #[must_use]
    pub fn contains(&self, language_id: &str) -> bool {
        self.identifiers.contains(language_id)
    }

    /// Number of distinct identifiers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.identifiers.len()
    }

    /// Returns `true` when no language is supported.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.identifiers.is_empty()
    }

    /// Identifiers in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.identifiers.iter().map(String::as_str)
    }
}

impl<S> FromIterator<S> for SupportedLanguageSet
where
    S: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self {
            identifiers: iter.into_iter().map(Into::into).collect(),
        }
    }
}
