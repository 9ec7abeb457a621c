//! Language-service plugins contributed by installed extensions.
//!
//! Each [`PluginManifest`] names a plugin and the document languages it
//! teaches the language service about. The [`PluginRegistry`] keeps them in
//! registration order and rejects duplicate names. Manifests can be decoded
//! from the `typescriptServerPlugins` contribution block of an extension
//! manifest.

use serde::{Deserialize, Serialize};

use crate::errors::PluginError;
use crate::telemetry::PLUGINS_TARGET;

/// A plugin contributed to the language service.
///
/// # Example
///
/// ```
/// use lazyhost::PluginManifest;
///
/// let manifest = PluginManifest::new("vue-plugin".into(), vec!["vue".into()]);
/// assert_eq!(manifest.languages(), ["vue"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginManifest {
    name: String,
    #[serde(default)]
    languages: Vec<String>,
    #[serde(default, rename = "enableForWorkspaceTypeScriptVersions")]
    enable_for_workspace_typescript_versions: bool,
}

impl PluginManifest {
    /// Creates a manifest for the bundled language service only.
    #[must_use]
    pub const fn new(name: String, languages: Vec<String>) -> Self {
        Self {
            name,
            languages,
            enable_for_workspace_typescript_versions: false,
        }
    }

    /// Marks the plugin as usable with workspace-provided service versions.
    #[must_use]
    pub const fn enabled_for_workspace_versions(mut self) -> Self {
        self.enable_for_workspace_typescript_versions = true;
        self
    }

    /// Plugin name as published by the contributing extension.
    #[must_use]
    pub const fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Language identifiers the plugin adds to the service.
    #[must_use]
    pub const fn languages(&self) -> &[String] {
        self.languages.as_slice()
    }

    /// Whether the plugin also loads into workspace-provided service versions.
    #[must_use]
    pub const fn enable_for_workspace_typescript_versions(&self) -> bool {
        self.enable_for_workspace_typescript_versions
    }

    /// Rejects manifests with blank names or blank language identifiers.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::Manifest`] describing the first problem found.
    pub fn validate(&self) -> Result<(), PluginError> {
        if self.name.trim().is_empty() {
            return Err(PluginError::manifest("plugin name must not be empty"));
        }
        if self.languages.iter().any(|language| language.trim().is_empty()) {
            return Err(PluginError::manifest(format!(
                "plugin '{}' declares an empty language identifier",
                self.name
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Contributions {
    #[serde(default)]
    typescript_server_plugins: Vec<PluginManifest>,
}

/// Ordered registry of installed plugins.
#[derive(Debug, Clone, Default)]
pub struct PluginRegistry {
    plugins: Vec<PluginManifest>,
}

impl PluginRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a plugin manifest after validation.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::Manifest`] if validation fails or if a plugin
    /// with the same name is already registered.
    pub fn register(&mut self, manifest: PluginManifest) -> Result<(), PluginError> {
        manifest.validate()?;
        if self.get(manifest.name()).is_some() {
            return Err(PluginError::manifest(format!(
                "plugin '{}' is already registered",
                manifest.name()
            )));
        }
        tracing::debug!(
            target: PLUGINS_TARGET,
            plugin = manifest.name(),
            languages = ?manifest.languages(),
            "registered language-service plugin"
        );
        self.plugins.push(manifest);
        Ok(())
    }

    /// Decodes a `contributes` block and registers every plugin it declares.
    ///
    /// Returns the number of plugins registered. Registration stops at the
    /// first invalid manifest; earlier plugins stay registered.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::Decode`] for malformed JSON and
    /// [`PluginError::Manifest`] for invalid or duplicate manifests.
    pub fn register_contributions(&mut self, contributes: &str) -> Result<usize, PluginError> {
        let contributions: Contributions =
            serde_json::from_str(contributes).map_err(PluginError::Decode)?;
        let count = contributions.typescript_server_plugins.len();
        for manifest in contributions.typescript_server_plugins {
            self.register(manifest)?;
        }
        Ok(count)
    }

    /// Looks up a plugin by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&PluginManifest> {
        self.plugins.iter().find(|plugin| plugin.name() == name)
    }

    /// Plugins in registration order.
    #[must_use]
    pub const fn plugins(&self) -> &[PluginManifest] {
        self.plugins.as_slice()
    }

    /// Every language identifier contributed by any plugin.
    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.plugins
            .iter()
            .flat_map(|plugin| plugin.languages().iter().map(String::as_str))
    }

    /// Returns the number of registered plugins.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.plugins.len()
    }

    /// Returns `true` when no plugins are registered.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}
