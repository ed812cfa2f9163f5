//! C ABI for widget manifest extraction.
//!
//! # Responsibility
//! - Export `ParseManifest` / `ReleaseData` and their companions.
//! - Own every string and array handed to foreign callers until release.
//!
//! # See also
//! - include/widget_manifest_parser.h

pub mod api;
pub mod record;

pub use api::{
    InitManifestLogging, ManifestParserVersion, ParseManifest, ReleaseAllManifestData,
    ReleaseData,
};
pub use record::{ExposedError, ExposedManifest, ExposedValue, ManifestData, RecordError};
