//! Manifest document loading and structural validation.
//!
//! # Responsibility
//! - Turn a manifest file path into a validated [`LoadedManifest`].
//! - Report every loading failure as one human-readable message.
//!
//! # Invariants
//! - A returned manifest always has a dictionary root with a `widget`
//!   dictionary inside.
//! - Loader messages are surfaced to callers verbatim.

use super::value::Document;
use super::xml;
use log::{error, info};
use std::fs;
use std::io::Read;
use std::path::Path;
use std::time::Instant;

/// Root element of a widget manifest.
pub const WIDGET_KEY: &str = "widget";
/// Platform application element nested in `widget`.
pub const APPLICATION_KEY: &str = "tizen:application";

const NAME_KEY: &str = "name";
pub(crate) const TEXT_KEY: &str = "#text";
const SHORT_NAME_ATTR: &str = "@short";
const VERSION_ATTR: &str = "@version";
const PACKAGE_ATTR: &str = "@package";
const ID_ATTR: &str = "@id";
const REQUIRED_VERSION_ATTR: &str = "@required_version";

/// Keys of the synthesized widget info dictionary.
pub mod widget_keys {
    pub const NAME: &str = "name";
    pub const SHORT_NAME: &str = "shortName";
    pub const VERSION: &str = "version";
}

/// Platform application attributes, already pulled out of the document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplicationInfo {
    pub package: Option<String>,
    pub id: Option<String>,
    pub required_version: Option<String>,
}

/// Validated manifest handed to the field extractor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedManifest {
    /// Whole document; repeated groups are looked up from here.
    pub root: Document,
    /// Dictionary with `name`, `shortName` and `version` when declared.
    pub widget_info: Document,
    /// Present when the widget declares a platform application element.
    pub application: Option<ApplicationInfo>,
}

impl LoadedManifest {
    /// Validates a document tree and derives the widget info sub-objects.
    pub fn from_document(root: Document) -> Result<Self, String> {
        let widget = match root.get(WIDGET_KEY) {
            Some(widget @ Document::Dictionary(_)) => widget,
            Some(_) => return Err("Invalid widget element.".to_string()),
            None => return Err("Manifest has no widget element.".to_string()),
        };

        let application = match widget.get(APPLICATION_KEY) {
            None => None,
            Some(app @ Document::Dictionary(_)) => Some(ApplicationInfo {
                package: attribute(Some(app), PACKAGE_ATTR),
                id: attribute(Some(app), ID_ATTR),
                required_version: attribute(Some(app), REQUIRED_VERSION_ATTR),
            }),
            Some(_) => return Err(format!("Invalid {APPLICATION_KEY} element.")),
        };

        let mut info = std::collections::BTreeMap::new();
        if let Some(name) = widget_name(widget.get(NAME_KEY)) {
            info.insert(widget_keys::NAME.to_string(), Document::Scalar(name));
        }
        if let Some(short) = name_attribute(widget.get(NAME_KEY), SHORT_NAME_ATTR) {
            info.insert(widget_keys::SHORT_NAME.to_string(), Document::Scalar(short));
        }
        if let Some(version) = widget.get(VERSION_ATTR) {
            info.insert(widget_keys::VERSION.to_string(), version.clone());
        }

        Ok(Self {
            widget_info: Document::Dictionary(info),
            application,
            root,
        })
    }
}

/// Turns a manifest path into a validated document.
///
/// Implementations own all I/O; the error string is shown to the caller as is.
pub trait ManifestLoader {
    fn load(&self, path: &Path) -> Result<LoadedManifest, String>;
}

/// Loads widget manifests stored as JSON documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JsonManifestLoader {
    max_document_bytes: u64,
}

impl JsonManifestLoader {
    pub fn new(max_document_bytes: u64) -> Self {
        Self { max_document_bytes }
    }
}

impl ManifestLoader for JsonManifestLoader {
    fn load(&self, path: &Path) -> Result<LoadedManifest, String> {
        timed_load("json", || {
            let bytes = read_limited(path, self.max_document_bytes)?;
            let value: serde_json::Value = serde_json::from_slice(&bytes)
                .map_err(|err| format!("Manifest is not valid JSON: {err}"))?;
            LoadedManifest::from_document(Document::from_json(value))
        })
    }
}

/// Loads widget `config.xml` manifests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XmlManifestLoader {
    max_document_bytes: u64,
}

impl XmlManifestLoader {
    pub fn new(max_document_bytes: u64) -> Self {
        Self { max_document_bytes }
    }
}

impl ManifestLoader for XmlManifestLoader {
    fn load(&self, path: &Path) -> Result<LoadedManifest, String> {
        timed_load("xml", || {
            let bytes = read_limited(path, self.max_document_bytes)?;
            let text = std::str::from_utf8(&bytes)
                .map_err(|err| format!("Manifest is not valid UTF-8: {err}"))?;
            LoadedManifest::from_document(xml::parse_document(text)?)
        })
    }
}

/// Picks the XML or JSON loader from the file extension.
///
/// `.json` files go through [`JsonManifestLoader`]; everything else is read
/// as XML, the native widget manifest format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileManifestLoader {
    max_document_bytes: u64,
}

impl FileManifestLoader {
    pub fn new(max_document_bytes: u64) -> Self {
        Self { max_document_bytes }
    }
}

impl ManifestLoader for FileManifestLoader {
    fn load(&self, path: &Path) -> Result<LoadedManifest, String> {
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            JsonManifestLoader::new(self.max_document_bytes).load(path)
        } else {
            XmlManifestLoader::new(self.max_document_bytes).load(path)
        }
    }
}

fn read_limited(path: &Path, max_document_bytes: u64) -> Result<Vec<u8>, String> {
    let file =
        fs::File::open(path).map_err(|err| format!("Failed to open manifest file: {err}"))?;
    let mut bytes = Vec::new();
    let read = file
        .take(max_document_bytes.saturating_add(1))
        .read_to_end(&mut bytes)
        .map_err(|err| format!("Failed to read manifest file: {err}"))?;
    if read as u64 > max_document_bytes {
        return Err(format!("Manifest file exceeds {max_document_bytes} bytes."));
    }
    Ok(bytes)
}

fn timed_load(
    format: &'static str,
    load: impl FnOnce() -> Result<LoadedManifest, String>,
) -> Result<LoadedManifest, String> {
    let started_at = Instant::now();
    let result = load();
    match &result {
        Ok(_) => info!(
            "event=manifest_load module=loader status=ok format={} duration_ms={}",
            format,
            started_at.elapsed().as_millis()
        ),
        Err(_) => error!(
            "event=manifest_load module=loader status=error format={} duration_ms={} error_code=load_failed",
            format,
            started_at.elapsed().as_millis()
        ),
    }
    result
}

fn attribute(node: Option<&Document>, key: &str) -> Option<String> {
    node?.get(key)?.as_scalar().map(str::to_string)
}

fn widget_name(node: Option<&Document>) -> Option<String> {
    match node? {
        Document::Scalar(text) => Some(text.clone()),
        dictionary @ Document::Dictionary(_) => attribute(Some(dictionary), TEXT_KEY),
        Document::List(items) => items.iter().find_map(|item| widget_name(Some(item))),
    }
}

fn name_attribute(node: Option<&Document>, key: &str) -> Option<String> {
    match node? {
        Document::List(items) => items.iter().find_map(|item| attribute(Some(item), key)),
        other => attribute(Some(other), key),
    }
}
