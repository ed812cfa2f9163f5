//! Core logic for widget manifest extraction.
//! Everything here is safe Rust; the C boundary lives in `widget_manifest_ffi`.

pub mod config;
pub mod document;
pub mod extract;
pub mod logging;
pub mod manifest;
pub mod registry;

pub use config::{ErrorStyle, ParserConfig};
pub use document::{
    ApplicationInfo, Document, FileManifestLoader, JsonManifestLoader, LoadedManifest,
    ManifestLoader, PathError, XmlManifestLoader,
};
pub use extract::{
    extract_optional_scalar, extract_repeated_scalar, extract_required_scalar, ExpectedShape,
    FieldError, FieldResult,
};
pub use logging::{default_log_level, init_logging, logging_status, LogSettings};
pub use manifest::{parse_manifest, ExtractedFields, ManifestRecord, ParseError, ParseResult};
pub use registry::{Exposed, Handle, LifetimeRegistry};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
