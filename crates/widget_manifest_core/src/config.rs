//! Parser configuration.
//!
//! # Responsibility
//! - Hold the knobs that change parse behavior without changing the C ABI.
//! - Resolve overrides from the process environment.
//!
//! # Invariants
//! - Invalid environment values never fail a parse; they fall back to
//!   defaults and are logged.

use log::warn;

/// Environment variable selecting the error message style.
pub const ERROR_STYLE_ENV: &str = "WIDGET_MANIFEST_ERROR_STYLE";
/// Environment variable overriding the manifest size limit in bytes.
pub const MAX_BYTES_ENV: &str = "WIDGET_MANIFEST_MAX_BYTES";

const DEFAULT_MAX_DOCUMENT_BYTES: u64 = 1024 * 1024;

/// How missing-field errors are worded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ErrorStyle {
    /// `Value not found. Value name: <key>` for every required field.
    #[default]
    Canonical,
    /// Historical field-specific messages for `name` and `required_version`.
    Legacy,
}

impl ErrorStyle {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "canonical" => Some(Self::Canonical),
            "legacy" => Some(Self::Legacy),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserConfig {
    pub error_style: ErrorStyle,
    /// Manifests larger than this are rejected by the loader.
    pub max_document_bytes: u64,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            error_style: ErrorStyle::default(),
            max_document_bytes: DEFAULT_MAX_DOCUMENT_BYTES,
        }
    }
}

impl ParserConfig {
    /// Builds a config from defaults plus environment overrides.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config reading overrides through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(raw) = lookup(ERROR_STYLE_ENV) {
            match ErrorStyle::parse(&raw) {
                Some(style) => config.error_style = style,
                None => warn!(
                    "event=config_fallback module=config key={} status=invalid",
                    ERROR_STYLE_ENV
                ),
            }
        }

        if let Some(raw) = lookup(MAX_BYTES_ENV) {
            match raw.trim().parse::<u64>() {
                Ok(limit) if limit > 0 => config.max_document_bytes = limit,
                _ => warn!(
                    "event=config_fallback module=config key={} status=invalid",
                    MAX_BYTES_ENV
                ),
            }
        }

        config
    }
}
