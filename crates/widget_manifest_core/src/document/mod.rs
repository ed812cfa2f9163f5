//! Manifest document model and loading.
//!
//! The loaders produce a validated tree; everything downstream reads it
//! through [`Document::lookup`] and never mutates it.

mod loader;
mod value;
mod xml;

pub use loader::{
    widget_keys, ApplicationInfo, FileManifestLoader, JsonManifestLoader, LoadedManifest,
    ManifestLoader, XmlManifestLoader, APPLICATION_KEY, WIDGET_KEY,
};
pub use value::{Document, PathError, PATH_SEPARATOR};
