//! Manifest parse pipeline.
//!
//! # Responsibility
//! - Validate the input path before any I/O.
//! - Drive the loader and extract every field in a fixed order.
//!
//! # Invariants
//! - Field order is package, id, name, short_name, version, icons,
//!   api_version, privileges; the first failure wins.
//! - A record is returned only when every extraction succeeded.

use super::record::{ExtractedFields, ManifestRecord};
use crate::config::ErrorStyle;
use crate::document::{widget_keys, ApplicationInfo, LoadedManifest, ManifestLoader};
use crate::extract::{
    extract_optional_scalar, extract_repeated_scalar, extract_required_scalar, FieldError,
    FieldResult,
};
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;
use std::time::Instant;

const MSG_NO_PATH: &str = "Path not specified.";
const MSG_INVALID_PATH: &str = "Invalid path.";
const MSG_LEGACY_NAME_NOT_FOUND: &str = "Application name not found.";
const MSG_LEGACY_REQUIRED_VERSION_NOT_FOUND: &str = "Required version not found.";

/// Repeated group holding privilege declarations.
pub const PRIVILEGE_GROUP: &str = "widget.privilege";
/// Sub-key naming one privilege.
pub const PRIVILEGE_ITEM: &str = "@name";
/// Repeated group holding icon declarations.
pub const ICON_GROUP: &str = "widget.icon";
/// Sub-key naming one icon source.
pub const ICON_ITEM: &str = "@src";

/// Names used for the platform application attributes in messages.
pub mod application_keys {
    pub const PACKAGE: &str = "package";
    pub const ID: &str = "id";
    pub const REQUIRED_VERSION: &str = "required_version";
}

pub type ParseResult<T> = Result<T, ParseError>;

/// Parse failure. `Display` renders the canonical caller-visible message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// No path was supplied.
    NoPath,
    /// The path is empty or not representable.
    InvalidPath,
    /// The loader rejected the document; the message is passed through.
    Load(String),
    /// A field could not be extracted.
    Field(FieldError),
}

impl ParseError {
    /// Stable code used in log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NoPath => "no_path",
            Self::InvalidPath => "invalid_path",
            Self::Load(_) => "load_failed",
            Self::Field(err) => err.code(),
        }
    }

    /// Renders the message in the requested style.
    pub fn message(&self, style: ErrorStyle) -> String {
        if style == ErrorStyle::Legacy {
            if let Self::Field(FieldError::MissingKey(key)) = self {
                match key.as_str() {
                    widget_keys::NAME => return MSG_LEGACY_NAME_NOT_FOUND.to_string(),
                    application_keys::REQUIRED_VERSION => {
                        return MSG_LEGACY_REQUIRED_VERSION_NOT_FOUND.to_string()
                    }
                    _ => {}
                }
            }
        }
        self.to_string()
    }
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoPath => write!(f, "{MSG_NO_PATH}"),
            Self::InvalidPath => write!(f, "{MSG_INVALID_PATH}"),
            Self::Load(message) => write!(f, "{message}"),
            Self::Field(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ParseError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Field(err) => Some(err),
            Self::NoPath | Self::InvalidPath | Self::Load(_) => None,
        }
    }
}

impl From<FieldError> for ParseError {
    fn from(value: FieldError) -> Self {
        Self::Field(value)
    }
}

/// Parses the manifest at `path` into a record.
///
/// `None` and empty paths are rejected before the loader is invoked.
///
/// # Side effects
/// - The loader performs file I/O.
/// - Emits `manifest_parse` logging events with duration and status.
pub fn parse_manifest(
    path: Option<&str>,
    loader: &dyn ManifestLoader,
) -> ParseResult<ManifestRecord> {
    let started_at = Instant::now();
    info!("event=manifest_parse module=manifest status=start");

    let result = parse_checked(path, loader);
    match &result {
        Ok(record) => info!(
            "event=manifest_parse module=manifest status=ok duration_ms={} privilege_count={}",
            started_at.elapsed().as_millis(),
            record.privilege_count()
        ),
        Err(err) => error!(
            "event=manifest_parse module=manifest status=error duration_ms={} error_code={}",
            started_at.elapsed().as_millis(),
            err.code()
        ),
    }
    result
}

fn parse_checked(path: Option<&str>, loader: &dyn ManifestLoader) -> ParseResult<ManifestRecord> {
    let path = path.ok_or(ParseError::NoPath)?;
    if path.is_empty() {
        return Err(ParseError::InvalidPath);
    }

    let manifest = loader.load(Path::new(path)).map_err(ParseError::Load)?;
    let fields = extract_fields(&manifest)?;
    Ok(ManifestRecord::from_fields(fields))
}

/// Extracts every exposed field from a loaded manifest, in fixed order.
pub fn extract_fields(manifest: &LoadedManifest) -> FieldResult<ExtractedFields> {
    let application = manifest.application.as_ref();
    let info = &manifest.widget_info;

    let package =
        application_attribute(application, |app| &app.package, application_keys::PACKAGE)?;
    let id = application_attribute(application, |app| &app.id, application_keys::ID)?;
    let name = extract_required_scalar(info, widget_keys::NAME)?;
    let short_name = extract_optional_scalar(info, widget_keys::SHORT_NAME)?;
    let version = extract_required_scalar(info, widget_keys::VERSION)?;
    let icons = extract_repeated_scalar(&manifest.root, ICON_GROUP, ICON_ITEM)?;
    let api_version = application_attribute(
        application,
        |app| &app.required_version,
        application_keys::REQUIRED_VERSION,
    )?;
    let privileges = extract_repeated_scalar(&manifest.root, PRIVILEGE_GROUP, PRIVILEGE_ITEM)?;

    Ok(ExtractedFields {
        package,
        id,
        name,
        short_name,
        version,
        icons,
        api_version,
        privileges,
    })
}

fn application_attribute(
    application: Option<&ApplicationInfo>,
    select: impl Fn(&ApplicationInfo) -> &Option<String>,
    key: &'static str,
) -> FieldResult<String> {
    application
        .and_then(|app| select(app).clone())
        .ok_or_else(|| FieldError::MissingKey(key.to_string()))
}
