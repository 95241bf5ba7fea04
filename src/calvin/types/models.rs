//! Core data structures for Calvin generic data files.
//!
//! This module defines the decoded, immutable representation of a file:
//! - The fixed file header and the generic metadata headers
//! - Typed parameters and the `Value` union they decode into
//! - Data groups, data sets and their column schemas

use std::collections::HashMap;
use std::fmt;

/// Magic number every Calvin generic data file starts with.
pub const CALVIN_MAGIC: u8 = 59;

/// The only generic data file version this reader understands.
pub const CALVIN_VERSION: u8 = 1;

/// Parameter name in the first extra-block entry holding the array identifier.
pub const ARRAY_ID_PARAMETER: &str = "affymetrix-array-id";

/// Parameter name in the first extra-block entry holding the array barcode.
pub const ARRAY_BARCODE_PARAMETER: &str = "affymetrix-array-barcode";

/// The fixed-size record at the start of the file.
///
/// ```text
/// [1 byte]  magic number
/// [1 byte]  version
/// [4 bytes] number of data groups (big-endian i32)
/// [4 bytes] absolute offset of the first data group (big-endian u32)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileHeader {
    pub magic: u8,
    pub version: u8,
    pub group_count: i32,
    pub first_group_offset: u32,
}

/// A generic metadata header.
///
/// The same record layout is used for the top-level descriptive header,
/// every parent (provenance) header, and every extra-block entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataHeader {
    /// Data type identifier, e.g. `affymetrix-calvin-intensity`.
    pub uid: Option<String>,
    pub guid: Option<String>,
    pub timestamp: Option<String>,
    pub locale: Option<String>,
    pub parameters: HashMap<String, Parameter>,
}

impl DataHeader {
    /// Looks up a parameter by name.
    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.parameters.get(name)
    }

    /// Returns the textual value of the named parameter, if it has one.
    pub fn parameter_str(&self, name: &str) -> Option<&str> {
        self.parameter(name).and_then(|p| p.value.as_str())
    }
}

/// A named, typed parameter decoded from a parameters block.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    /// MIME-like tag that selected how the raw bytes were coerced.
    pub type_tag: String,
    pub value: Value,
}

/// A single decoded scalar.
///
/// Parameter values are produced by type-tag coercion, data set cells by
/// column type code; both land in this union.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int8(i8),
    UInt8(u8),
    Int16(i16),
    UInt16(u16),
    Int32(i32),
    UInt32(u32),
    Float(f32),
    /// Text decoded from UTF-16BE.
    Text(String),
    /// Text decoded from single-byte ASCII/UTF-8.
    Ascii(String),
    /// Opaque bytes: byte-string cells, unknown column types, unrecognized type tags.
    Bytes(Vec<u8>),
    /// A zero-length string field.
    Absent,
}

impl Value {
    /// Returns the text of a `Text` or `Ascii` value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) | Value::Ascii(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// Widens any integer variant to `i64`.
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Value::Int8(v) => Some(v.into()),
            Value::UInt8(v) => Some(v.into()),
            Value::Int16(v) => Some(v.into()),
            Value::UInt16(v) => Some(v.into()),
            Value::Int32(v) => Some(v.into()),
            Value::UInt32(v) => Some(v.into()),
            _ => None,
        }
    }

    pub fn as_f32(&self) -> Option<f32> {
        match *self {
            Value::Float(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Value::Absent)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int8(v) => write!(f, "{}", v),
            Value::UInt8(v) => write!(f, "{}", v),
            Value::Int16(v) => write!(f, "{}", v),
            Value::UInt16(v) => write!(f, "{}", v),
            Value::Int32(v) => write!(f, "{}", v),
            Value::UInt32(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::Text(s) | Value::Ascii(s) => f.write_str(s),
            Value::Bytes(b) => {
                for byte in b {
                    write!(f, "{:02x}", byte)?;
                }
                Ok(())
            }
            Value::Absent => Ok(()),
        }
    }
}

/// Column type codes used by data set schemas.
///
/// This code space is independent of the MIME-like tags used for header parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Int8,
    UInt8,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Float,
    /// Length-prefixed single-byte string.
    ByteString,
    /// Length-prefixed UTF-16BE string.
    WideString,
    /// Any other code: cells are `byte_size` raw bytes.
    Other(u8),
}

impl From<u8> for ColumnType {
    fn from(code: u8) -> Self {
        match code {
            0 => Self::Int8,
            1 => Self::UInt8,
            2 => Self::Int16,
            3 => Self::UInt16,
            4 => Self::Int32,
            5 => Self::UInt32,
            6 => Self::Float,
            7 => Self::ByteString,
            8 => Self::WideString,
            other => Self::Other(other),
        }
    }
}

/// Schema entry for one data set column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    pub name: String,
    pub type_code: u8,
    /// Declared cell size in bytes. Only consulted for unknown type codes.
    pub byte_size: i32,
}

impl ColumnSpec {
    pub fn column_type(&self) -> ColumnType {
        ColumnType::from(self.type_code)
    }

    /// Smallest number of bytes one cell of this column can occupy.
    pub(crate) fn min_cell_size(&self) -> u64 {
        match self.column_type() {
            ColumnType::Int8 | ColumnType::UInt8 => 1,
            ColumnType::Int16 | ColumnType::UInt16 => 2,
            ColumnType::Int32 | ColumnType::UInt32 | ColumnType::Float => 4,
            ColumnType::ByteString | ColumnType::WideString => 4,
            ColumnType::Other(_) => self.byte_size.max(0) as u64,
        }
    }
}

/// A named table with typed columns and a row-major value block.
#[derive(Debug, Clone, PartialEq)]
pub struct DataSet {
    pub name: String,
    pub parameters: HashMap<String, Parameter>,
    pub columns: Vec<ColumnSpec>,
    pub row_count: u32,
    /// Absolute offset of the value block.
    pub first_element_offset: u32,
    /// Offset of the following data set header, or one byte past this data set's block.
    pub next_data_set_offset: u32,
    /// `row_count` rows of `columns.len()` cells each.
    pub rows: Vec<Vec<Value>>,
}

impl DataSet {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Column-wise view over the row-major value block.
    pub fn column_values(&self, name: &str) -> Option<impl Iterator<Item = &Value> + '_> {
        let index = self.column_index(name)?;
        Some(self.rows.iter().filter_map(move |row| row.get(index)))
    }

    pub fn row(&self, index: usize) -> Option<&[Value]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    /// Total number of decoded cells.
    pub fn cell_count(&self) -> usize {
        self.rows.iter().map(Vec::len).sum()
    }
}

/// A named, offset-linked collection of data sets.
#[derive(Debug, Clone, PartialEq)]
pub struct DataGroup {
    pub name: String,
    pub data_set_count: i32,
    /// Offset of the next group; `0` marks the last one.
    pub next_group_offset: u32,
    pub first_data_set_offset: u32,
    pub data_sets: Vec<DataSet>,
}

impl DataGroup {
    pub fn data_set(&self, name: &str) -> Option<&DataSet> {
        self.data_sets.iter().find(|ds| ds.name == name)
    }
}

/// Looks up a textual parameter in the first extra-block entry.
pub(crate) fn extra_parameter<'a>(extra: &'a [DataHeader], name: &str) -> Option<&'a str> {
    extra.first().and_then(|entry| entry.parameter_str(name))
}

/// A fully materialized Calvin file, detached from its byte source.
#[derive(Debug, Clone, PartialEq)]
pub struct CalvinFile {
    pub file_header: FileHeader,
    pub header: DataHeader,
    pub parents: Vec<DataHeader>,
    pub extra: Vec<DataHeader>,
    pub groups: Vec<DataGroup>,
    /// Non-fatal findings collected over the whole decode.
    pub diagnostics: Vec<super::error::Diagnostic>,
}

impl CalvinFile {
    pub fn array_id(&self) -> Option<&str> {
        extra_parameter(&self.extra, ARRAY_ID_PARAMETER)
    }

    pub fn barcode(&self) -> Option<&str> {
        extra_parameter(&self.extra, ARRAY_BARCODE_PARAMETER)
    }

    pub fn group(&self, name: &str) -> Option<&DataGroup> {
        self.groups.iter().find(|g| g.name == name)
    }
}
