//! Error and diagnostic types for the calvin-reader crate.

use std::fmt;
use thiserror::Error;

/// The primary error type for all operations in this crate.
///
/// Every variant raised while decoding carries the absolute stream offset
/// at which decoding failed.
#[derive(Debug, Error)]
pub enum CalvinError {
    /// The byte source could not be opened or read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Fewer bytes remain in the source than a field requires.
    #[error("Truncated data at offset {offset}: needed {needed} bytes, but only {available} available")]
    TruncatedData {
        offset: u64,
        needed: u64,
        available: u64,
    },

    /// A seek target lies outside the byte source.
    #[error("Invalid offset {offset}: source is only {len} bytes long")]
    InvalidOffset { offset: u64, len: u64 },

    /// A length or count prefix is negative or cannot fit in the remaining bytes.
    #[error("Malformed {context} count {count} at offset {offset}")]
    MalformedCount {
        offset: u64,
        context: &'static str,
        count: i64,
    },

    /// The file header does not carry the expected magic number or version.
    #[error("Format mismatch at offset {offset}: expected {field} {expected}, found {found}")]
    FormatMismatch {
        offset: u64,
        field: &'static str,
        expected: u8,
        found: u8,
    },

    /// An offset chain points back to a record that was already decoded.
    #[error("Cyclic {context} chain: offset {offset} was already visited")]
    CyclicChain { offset: u64, context: &'static str },
}

/// A convenience `Result` type alias using the crate's `CalvinError` type.
pub type Result<T> = std::result::Result<T, CalvinError>;

/// A non-fatal finding recorded while decoding.
///
/// Diagnostics never abort a decode. They are collected on the reader and
/// handed back to the caller next to the successfully decoded structures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// The group chain yielded a different number of groups than the file header declares.
    GroupCountMismatch { expected: i32, found: usize },

    /// A group's data-set chain ended before its declared count was reached.
    DataSetCountMismatch {
        group: String,
        expected: i32,
        found: usize,
    },

    /// A parameter carried a type tag this decoder does not know; its value was kept as raw bytes.
    UnrecognizedTypeTag { parameter: String, type_tag: String },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::GroupCountMismatch { expected, found } => write!(
                f,
                "group count mismatch: header declares {}, chain yielded {}",
                expected, found
            ),
            Diagnostic::DataSetCountMismatch {
                group,
                expected,
                found,
            } => write!(
                f,
                "data set count mismatch in group '{}': declared {}, decoded {}",
                group, expected, found
            ),
            Diagnostic::UnrecognizedTypeTag {
                parameter,
                type_tag,
            } => write!(
                f,
                "parameter '{}' has unrecognized type tag '{}'",
                parameter, type_tag
            ),
        }
    }
}
