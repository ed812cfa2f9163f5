//! Manifest parsing: fixed-order field extraction into one record.

mod parse;
mod record;

pub use parse::{
    application_keys, extract_fields, parse_manifest, ParseError, ParseResult, ICON_GROUP,
    ICON_ITEM, PRIVILEGE_GROUP, PRIVILEGE_ITEM,
};
pub use record::{ExtractedFields, ManifestRecord};
