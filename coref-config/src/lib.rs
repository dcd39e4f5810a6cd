//! Shared configuration loader for the coref transcoders.
//!
//! `defaults/coref.default.toml` is embedded into every binary so that docs and
//! runtime behavior stay in sync. Applications layer user-specific files on top
//! of those defaults via [`Loader`] before deserializing into [`CorefConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use coref_babel::{DecodeOptions, EncodeOptions, MarkerStyle};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../defaults/coref.default.toml");

/// Name of the optional per-directory configuration file.
pub const LOCAL_CONFIG: &str = "coref.toml";

/// Top-level configuration consumed by the coref tools.
#[derive(Debug, Clone, Deserialize)]
pub struct CorefConfig {
    pub text: TextConfig,
    pub json: JsonConfig,
    pub conllu: ConlluConfig,
}

/// Rendering of marked-up text.
#[derive(Debug, Clone, Deserialize)]
pub struct TextConfig {
    pub marker_style: MarkerStyle,
    pub sequential_ids: bool,
    pub zero_mentions: bool,
    pub blind: bool,
}

/// Rendering of cluster JSON.
#[derive(Debug, Clone, Deserialize)]
pub struct JsonConfig {
    pub zero_mentions: bool,
    pub blind: bool,
    pub empty_node_form: bool,
}

/// Rebuilding CoNLL-U from text or JSON.
#[derive(Debug, Clone, Deserialize)]
pub struct ConlluConfig {
    pub use_gold_empty_nodes: bool,
}

impl CorefConfig {
    pub fn text_options(&self) -> EncodeOptions {
        EncodeOptions {
            zero_mentions: self.text.zero_mentions,
            blind: self.text.blind,
            sequential_ids: self.text.sequential_ids,
            marker_style: self.text.marker_style,
            ..EncodeOptions::default()
        }
    }

    pub fn json_options(&self) -> EncodeOptions {
        EncodeOptions {
            zero_mentions: self.json.zero_mentions,
            blind: self.json.blind,
            empty_node_form: self.json.empty_node_form,
            ..EncodeOptions::default()
        }
    }

    pub fn decode_options(&self) -> DecodeOptions {
        DecodeOptions {
            use_gold_empty_nodes: self.conllu.use_gold_empty_nodes,
        }
    }
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (used for CLI flags).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<CorefConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<CorefConfig, ConfigError> {
    Loader::new().build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn loads_default_config() {
        let config = load_defaults().expect("defaults to deserialize");
        assert_eq!(config.text.marker_style, MarkerStyle::Brackets);
        assert!(!config.text.sequential_ids);
        assert!(config.json.empty_node_form);
        assert!(!config.conllu.use_gold_empty_nodes);
    }

    #[test]
    fn supports_overrides() {
        let config = Loader::new()
            .set_override("text.marker_style", "tags")
            .expect("override to apply")
            .set_override("json.blind", true)
            .expect("override to apply")
            .build()
            .expect("config to build");
        assert_eq!(config.text_options().marker_style, MarkerStyle::Tags);
        assert!(config.json_options().blind);
        assert!(!config.text_options().blind);
    }

    #[test]
    fn files_layer_over_defaults() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("coref.toml");
        fs::write(&path, "[text]\nzero_mentions = true\n").expect("write config");
        let config = Loader::new().with_file(&path).build().expect("config to build");
        assert!(config.text.zero_mentions);
        assert_eq!(config.text.marker_style, MarkerStyle::Brackets);
    }

    #[test]
    fn optional_files_may_be_missing() {
        let dir = tempfile::tempdir().expect("temp dir");
        let missing = dir.path().join(LOCAL_CONFIG);
        assert!(Loader::new().with_optional_file(&missing).build().is_ok());
        assert!(Loader::new().with_file(&missing).build().is_err());
    }
}
