//! Configuration settings for the inliner.
//!
//! The render mode decides how much of the pipeline runs, mirroring the build
//! environments the templates are rendered in. Configuration can be loaded from
//! environment variables or constructed programmatically.

use anyhow::{Context as _, Result, anyhow};
use core::fmt;
use core::str::FromStr;
use std::env;

/// Environment variable selecting the render mode.
pub const ENV_MODE: &str = "EMAIL_INLINER_ENV";
/// Environment variable that keeps custom property declarations in the output.
pub const ENV_KEEP_CUSTOM_PROPERTIES: &str = "EMAIL_INLINER_KEEP_CUSTOM_PROPERTIES";

/// Build environment the document is rendered for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RenderMode {
    /// Live-reloading development builds: the document is left untouched.
    Development,
    /// Test builds: styles are inlined but `<style>` blocks are kept.
    Test,
    /// Production builds: inline, normalize text and strip `<style>` blocks.
    #[default]
    Production,
}

impl RenderMode {
    /// Whether the inliner runs at all.
    pub const fn inlines(self) -> bool {
        !matches!(self, Self::Development)
    }

    /// Whether `<style>` elements are removed after inlining.
    pub const fn strips_style_sheets(self) -> bool {
        matches!(self, Self::Production)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Test => "test",
            Self::Production => "production",
        }
    }
}

impl fmt::Display for RenderMode {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for RenderMode {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "development" => Ok(Self::Development),
            "test" => Ok(Self::Test),
            "production" => Ok(Self::Production),
            other => Err(anyhow!(
                "unknown render mode `{other}` (expected development, test or production)"
            )),
        }
    }
}

/// Runtime configuration for one inlining run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InlinerConfig {
    /// Which parts of the pipeline run.
    pub mode: RenderMode,
    /// Keep `--*` declarations in the inlined `style` attributes.
    pub keep_custom_properties: bool,
}

impl InlinerConfig {
    /// Construct a new `InlinerConfig` with explicit values.
    #[inline]
    #[must_use]
    pub const fn new(mode: RenderMode, keep_custom_properties: bool) -> Self {
        Self {
            mode,
            keep_custom_properties,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Reads the following environment variables:
    /// - `EMAIL_INLINER_ENV`: `development`, `test` or `production` (default: production)
    /// - `EMAIL_INLINER_KEEP_CUSTOM_PROPERTIES`: set to "1" or "true" to keep `--*` declarations
    ///
    /// # Errors
    /// Returns an error if `EMAIL_INLINER_ENV` names an unknown mode.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to its value.
    ///
    /// # Errors
    /// Returns an error if the mode variable names an unknown mode.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mode = lookup(ENV_MODE)
            .map(|value| value.parse::<RenderMode>())
            .transpose()
            .with_context(|| format!("invalid {ENV_MODE}"))?
            .unwrap_or_default();
        let keep_custom_properties = lookup(ENV_KEEP_CUSTOM_PROPERTIES)
            .is_some_and(|value| matches!(value.trim(), "1") || value.trim().eq_ignore_ascii_case("true"));
        Ok(Self::new(mode, keep_custom_properties))
    }
}
