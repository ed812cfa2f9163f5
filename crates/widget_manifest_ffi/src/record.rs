//! C-layout views over extracted manifest records.
//!
//! # Responsibility
//! - Copy a [`ManifestRecord`] into NUL-terminated buffers owned by one value.
//! - Expose a `#[repr(C)]` view whose pointers stay valid while that value lives.
//!
//! # Invariants
//! - Building is all-or-nothing; a failed build exposes nothing.
//! - Every pointer in a view targets heap storage owned by the same
//!   [`ExposedManifest`]; moving the owner never moves the storage.
//! - Views are never written after construction.

use std::error::Error;
use std::ffi::{c_char, CString};
use std::fmt::{Display, Formatter};
use std::ptr;
use widget_manifest_core::{Exposed, ManifestRecord};

/// Read-only manifest view handed to foreign callers.
#[repr(C)]
#[derive(Debug)]
pub struct ManifestData {
    pub package: *const c_char,
    pub id: *const c_char,
    pub name: *const c_char,
    pub short_name: *const c_char,
    pub version: *const c_char,
    pub icon: *const c_char,
    pub api_version: *const c_char,
    pub privilege_count: usize,
    /// `privilege_count` entries, or null when the count is zero.
    pub privilege_list: *const *const c_char,
}

/// Failure to copy a record into C storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    InteriorNul(&'static str),
}

impl Display for RecordError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InteriorNul(field) => {
                write!(f, "Value contains a NUL character. Value name: {field}")
            }
        }
    }
}

impl Error for RecordError {}

struct ScalarStorage {
    package: CString,
    id: CString,
    name: CString,
    short_name: CString,
    version: CString,
    icon: CString,
    api_version: CString,
}

/// Owner of one exposed manifest view and all of its backing storage.
pub struct ExposedManifest {
    view: Box<ManifestData>,
    _scalars: ScalarStorage,
    _privileges: Vec<CString>,
    _privilege_ptrs: Vec<*const c_char>,
}

// SAFETY: the raw pointers in `view` and `_privilege_ptrs` only reference
// heap buffers owned by this same value, and nothing writes through them
// after construction, so moving the owner to another thread is sound.
unsafe impl Send for ExposedManifest {}

impl ExposedManifest {
    /// Copies `record` into owned C storage.
    pub fn build(record: &ManifestRecord) -> Result<Self, RecordError> {
        let scalars = ScalarStorage {
            package: c_string("package", &record.package)?,
            id: c_string("id", &record.id)?,
            name: c_string("name", &record.name)?,
            short_name: c_string("shortName", &record.short_name)?,
            version: c_string("version", &record.version)?,
            icon: c_string("icon", &record.icon)?,
            api_version: c_string("required_version", &record.api_version)?,
        };
        let privileges = record
            .privileges
            .iter()
            .map(|privilege| c_string("privilege", privilege))
            .collect::<Result<Vec<_>, _>>()?;
        let privilege_ptrs: Vec<*const c_char> =
            privileges.iter().map(|privilege| privilege.as_ptr()).collect();

        let view = Box::new(ManifestData {
            package: scalars.package.as_ptr(),
            id: scalars.id.as_ptr(),
            name: scalars.name.as_ptr(),
            short_name: scalars.short_name.as_ptr(),
            version: scalars.version.as_ptr(),
            icon: scalars.icon.as_ptr(),
            api_version: scalars.api_version.as_ptr(),
            privilege_count: privilege_ptrs.len(),
            privilege_list: if privilege_ptrs.is_empty() {
                ptr::null()
            } else {
                privilege_ptrs.as_ptr()
            },
        });

        Ok(Self {
            view,
            _scalars: scalars,
            _privileges: privileges,
            _privilege_ptrs: privilege_ptrs,
        })
    }

    pub fn as_ptr(&self) -> *const ManifestData {
        self.view.as_ref()
    }
}

/// Owner of one exposed error message.
pub struct ExposedError {
    message: CString,
}

impl ExposedError {
    /// Wraps `message`, dropping any NUL characters it contains.
    pub fn new(message: &str) -> Self {
        let message = CString::new(message.replace('\0', "")).unwrap_or_default();
        Self { message }
    }

    pub fn as_ptr(&self) -> *const c_char {
        self.message.as_ptr()
    }
}

/// Everything the boundary registry can own.
pub enum ExposedValue {
    Manifest(ExposedManifest),
    Error(ExposedError),
}

impl Exposed for ExposedValue {
    fn exposed_address(&self) -> usize {
        match self {
            Self::Manifest(manifest) => manifest.as_ptr() as usize,
            Self::Error(error) => error.as_ptr() as usize,
        }
    }
}

fn c_string(field: &'static str, value: &str) -> Result<CString, RecordError> {
    CString::new(value).map_err(|_| RecordError::InteriorNul(field))
}
