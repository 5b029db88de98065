//! Minimal FITS reading for the survey's data products.
//!
//! Covers exactly what the Legacy Surveys files require: header parsing and
//! first-extension `BINTABLE` column access. Image HDUs, ASCII tables,
//! compressed tiles and variable-length arrays are out of scope.

pub mod errors;
pub mod header;
pub mod table;

#[cfg(test)]
pub(crate) mod testdata;

pub use errors::{FitsError, Result};
pub use header::{Header, Keyword, KeywordValue};
pub use table::{BinaryTable, Field, FieldType};
