//! Field extraction contracts.

mod field;

pub use field::{
    extract_optional_scalar, extract_repeated_scalar, extract_required_scalar, ExpectedShape,
    FieldError, FieldResult,
};
