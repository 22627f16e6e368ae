//! Generator configuration.

use std::collections::BTreeSet;

/// Entities that structure the protocol but are not generated by default.
pub const DEFAULT_EXCLUDED: [&str; 4] = ["ProtocolMessage", "Request", "Event", "Response"];

/// Runtime crate the generated code refers to by default.
pub const DEFAULT_RUNTIME_CRATE: &str = "wiretype_core";

/// Builder-style configuration for the [`Generator`](crate::Generator).
///
/// # Example
/// ```
/// use wiretype_codegen::GeneratorConfig;
///
/// let config = GeneratorConfig::new()
///     .runtime_crate("my_runtime")
///     .exclude("Envelope")
///     .dispatcher(false);
/// assert_eq!(config.runtime_path(), "::my_runtime");
/// assert!(config.is_excluded("Envelope"));
/// ```
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    runtime_crate: String,
    exclude: BTreeSet<String>,
    dispatcher: bool,
    header: Option<String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl GeneratorConfig {
    /// Creates a configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            runtime_crate: DEFAULT_RUNTIME_CRATE.to_string(),
            exclude: DEFAULT_EXCLUDED.iter().map(|name| name.to_string()).collect(),
            dispatcher: true,
            header: None,
        }
    }

    /// Sets the path of the runtime crate, e.g. `wiretype_core` or
    /// `wiretype::core`.
    #[must_use]
    pub fn runtime_crate(mut self, path: impl Into<String>) -> Self {
        self.runtime_crate = path.into();
        self
    }

    /// Excludes an entity from generation. It is still resolved.
    #[must_use]
    pub fn exclude(mut self, name: impl Into<String>) -> Self {
        self.exclude.insert(name.into());
        self
    }

    /// Removes every excluded entity, including the defaults.
    #[must_use]
    pub fn clear_excluded(mut self) -> Self {
        self.exclude.clear();
        self
    }

    /// Enables or disables the request dispatcher.
    #[must_use]
    pub fn dispatcher(mut self, enabled: bool) -> Self {
        self.dispatcher = enabled;
        self
    }

    /// Replaces the generated file header.
    #[must_use]
    pub fn header(mut self, header: impl Into<String>) -> Self {
        self.header = Some(header.into());
        self
    }

    /// Returns the absolute path generated code uses for the runtime crate.
    #[must_use]
    pub fn runtime_path(&self) -> String {
        let path = self.runtime_crate.trim();
        let relative = ["crate", "self", "super"]
            .iter()
            .any(|root| path == *root || path.starts_with(&format!("{}::", root)));

        if path.starts_with("::") || relative {
            path.to_string()
        } else {
            format!("::{}", path)
        }
    }

    /// Returns true if `name` is excluded from generation.
    #[must_use]
    pub fn is_excluded(&self, name: &str) -> bool {
        self.exclude.contains(name)
    }

    /// Iterates excluded entity names.
    pub fn excluded(&self) -> impl Iterator<Item = &str> {
        self.exclude.iter().map(String::as_str)
    }

    /// Returns true if the dispatcher is generated.
    #[must_use]
    pub fn dispatcher_enabled(&self) -> bool {
        self.dispatcher
    }

    /// Returns the custom header, if any.
    #[must_use]
    pub fn header_text(&self) -> Option<&str> {
        self.header.as_deref()
    }
}
