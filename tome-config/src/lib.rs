//! Shared configuration loader for the tome toolchain.
//!
//! `defaults/tome.default.toml` is embedded into every binary so that docs and
//! runtime behavior stay in sync. Applications layer user-specific files on top
//! of those defaults via [`Loader`] before deserializing into [`TomeConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::Path;
use tome_markup::{RenderOptions, RollerMode};

const DEFAULT_TOML: &str = include_str!("../defaults/tome.default.toml");

/// Top-level configuration consumed by tome applications.
#[derive(Debug, Clone, Deserialize)]
pub struct TomeConfig {
    pub dice: DiceConfig,
    pub render: RenderConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DiceConfig {
    pub roller: RollerMode,
}

/// Layout knobs for rendered Markdown.
#[derive(Debug, Clone, Deserialize)]
pub struct RenderConfig {
    pub list_indent: String,
}

impl TomeConfig {
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions::from(self)
    }
}

impl From<TomeConfig> for RenderOptions {
    fn from(config: TomeConfig) -> Self {
        RenderOptions {
            roller: config.dice.roller,
            list_indent: config.render.list_indent,
        }
    }
}

impl From<&TomeConfig> for RenderOptions {
    fn from(config: &TomeConfig) -> Self {
        RenderOptions {
            roller: config.dice.roller,
            list_indent: config.render.list_indent.clone(),
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
    pub fn build(self) -> Result<TomeConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<TomeConfig, ConfigError> {
    Loader::new().build()
}
