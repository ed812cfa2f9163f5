//! C ABI entry points.
//!
//! # Responsibility
//! - Expose `ParseManifest` / `ReleaseData` with stable C semantics.
//! - Keep every exposed record and error string alive in one registry until
//!   the caller releases it.
//!
//! # Invariants
//! - Exported functions never unwind across the boundary.
//! - `*data` is written only on success and `*error` only on failure.
//! - A handle not present in the registry is never dereferenced or freed.

use crate::record::{ExposedError, ExposedManifest, ExposedValue, ManifestData};
use log::{error, info, warn};
use std::ffi::{c_char, CStr};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::str::Utf8Error;
use std::sync::OnceLock;
use widget_manifest_core::{
    init_logging, parse_manifest, FileManifestLoader, Handle, LifetimeRegistry, ParseError,
    ParserConfig,
};

const MSG_INTERNAL_ERROR: &str = "Internal parser error.";
const MSG_NO_LOG_LEVEL: &str = "Log level not specified.";
const MSG_NO_LOG_DIR: &str = "Log directory not specified.";
const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), "\0");

static REGISTRY: OnceLock<BoundaryRegistry> = OnceLock::new();
static PARSER_CONFIG: OnceLock<ParserConfig> = OnceLock::new();

type BoundaryRegistry = LifetimeRegistry<ExposedValue>;

/// Parses the widget manifest at `path`.
///
/// On success stores a record view in `*data` and returns `true`; on failure
/// stores a message in `*error` and returns `false`. Both must be handed back
/// to [`ReleaseData`]. Null out-pointers are skipped.
///
/// # Safety
/// `path` must be null or a valid NUL-terminated string. `data` and `error`
/// must each be null or valid for one pointer write.
#[no_mangle]
#[allow(non_snake_case)]
pub unsafe extern "C" fn ParseManifest(
    path: *const c_char,
    data: *mut *const ManifestData,
    error: *mut *const c_char,
) -> bool {
    let path = c_str_arg(path);
    let outcome = catch_unwind(AssertUnwindSafe(|| build_manifest(path, parser_config())))
        .unwrap_or_else(|_| Err(MSG_INTERNAL_ERROR.to_string()));

    match outcome {
        Ok(exposed) => {
            if !data.is_null() {
                *data = expose_manifest(registry(), exposed);
            }
            true
        }
        Err(message) => {
            if !error.is_null() {
                *error = expose_error(registry(), &message);
            }
            false
        }
    }
}

/// Releases handles returned by [`ParseManifest`] or [`InitManifestLogging`].
///
/// Each non-null handle is released independently. Returns `true` only when
/// at least one handle was supplied and every supplied handle was live.
///
/// # Safety
/// Handles are compared by address only and never dereferenced, so any
/// pointer value is accepted.
#[no_mangle]
#[allow(non_snake_case)]
pub unsafe extern "C" fn ReleaseData(data: *const ManifestData, error: *const c_char) -> bool {
    release_handles(registry(), data, error)
}

/// Starts rolling file logs at `level` (`trace|debug|info|warn|error`) in
/// the absolute directory `log_dir`.
///
/// Idempotent for identical arguments. On failure stores a message in
/// `*error`, which must be released with [`ReleaseData`].
///
/// # Safety
/// `level` and `log_dir` must be null or valid NUL-terminated strings.
/// `error` must be null or valid for one pointer write.
#[no_mangle]
#[allow(non_snake_case)]
pub unsafe extern "C" fn InitManifestLogging(
    level: *const c_char,
    log_dir: *const c_char,
    error: *mut *const c_char,
) -> bool {
    let result = match (c_str_arg(level), c_str_arg(log_dir)) {
        (None, _) => Err(MSG_NO_LOG_LEVEL.to_string()),
        (_, None) => Err(MSG_NO_LOG_DIR.to_string()),
        (Some(Err(err)), _) | (_, Some(Err(err))) => Err(format!("argument is not UTF-8: {err}")),
        (Some(Ok(level)), Some(Ok(log_dir))) => {
            catch_unwind(|| init_logging(level, log_dir))
                .unwrap_or_else(|_| Err(MSG_INTERNAL_ERROR.to_string()))
        }
    };

    match result {
        Ok(()) => true,
        Err(message) => {
            if !error.is_null() {
                *error = expose_error(registry(), &message);
            }
            false
        }
    }
}

/// Frees every outstanding record and error string.
///
/// Intended for library shutdown; any pointer obtained earlier becomes
/// invalid. Returns the number of entries freed.
#[no_mangle]
#[allow(non_snake_case)]
pub extern "C" fn ReleaseAllManifestData() -> usize {
    let released = registry().drain();
    info!("event=registry_shutdown module=ffi status=ok released={released}");
    released
}

/// Returns the library version as a static NUL-terminated string.
#[no_mangle]
#[allow(non_snake_case)]
pub extern "C" fn ManifestParserVersion() -> *const c_char {
    VERSION.as_ptr().cast()
}

fn registry() -> &'static BoundaryRegistry {
    REGISTRY.get_or_init(BoundaryRegistry::new)
}

fn parser_config() -> &'static ParserConfig {
    PARSER_CONFIG.get_or_init(ParserConfig::from_env)
}

/// Runs the parse pipeline and copies the record into C storage.
fn build_manifest(
    path: Option<Result<&str, Utf8Error>>,
    config: &ParserConfig,
) -> Result<ExposedManifest, String> {
    let loader = FileManifestLoader::new(config.max_document_bytes);
    let parsed = match path {
        Some(Err(_)) => {
            warn!("event=manifest_parse module=ffi status=error error_code=non_utf8_path");
            Err(ParseError::InvalidPath)
        }
        Some(Ok(path)) => parse_manifest(Some(path), &loader),
        None => parse_manifest(None, &loader),
    };
    let record = parsed.map_err(|err| err.message(config.error_style))?;
    ExposedManifest::build(&record).map_err(|err| {
        error!("event=record_build module=ffi status=error error_code=interior_nul");
        err.to_string()
    })
}

fn expose_manifest(registry: &BoundaryRegistry, exposed: ExposedManifest) -> *const ManifestData {
    let view = exposed.as_ptr();
    registry.register(ExposedValue::Manifest(exposed));
    view
}

fn expose_error(registry: &BoundaryRegistry, message: &str) -> *const c_char {
    let exposed = ExposedError::new(message);
    let view = exposed.as_ptr();
    registry.register(ExposedValue::Error(exposed));
    view
}

fn release_handles(
    registry: &BoundaryRegistry,
    data: *const ManifestData,
    error: *const c_char,
) -> bool {
    if data.is_null() && error.is_null() {
        return false;
    }

    let mut released_all = true;
    if !data.is_null() {
        released_all &= registry.release_if(Handle::from_ptr(data), |entry| {
            matches!(entry, ExposedValue::Manifest(_))
        });
    }
    if !error.is_null() {
        released_all &= registry.release_if(Handle::from_ptr(error), |entry| {
            matches!(entry, ExposedValue::Error(_))
        });
    }
    released_all
}

/// Borrows a C string argument; `None` for null.
///
/// # Safety
/// `ptr` must be null or point to a NUL-terminated string that outlives `'a`.
unsafe fn c_str_arg<'a>(ptr: *const c_char) -> Option<Result<&'a str, Utf8Error>> {
    if ptr.is_null() {
        return None;
    }
    Some(CStr::from_ptr(ptr).to_str())
}
