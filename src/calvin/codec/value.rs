//! Scalar decoding.
//!
//! Two independent code spaces map bytes to a [`Value`]:
//! - column type codes, used for data set cells read straight from the stream
//! - MIME-like type tags, used to coerce the opaque bytes of header parameters

use std::io::{Read, Seek};
use byteorder::{BigEndian, ByteOrder};
use log::trace;

use crate::calvin::types::error::{CalvinError, Result};
use crate::calvin::types::models::{ColumnSpec, ColumnType, Value};
use super::byte_reader::ByteReader;
use super::text;

/// Known parameter type tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeTag {
    Text,
    Float,
    Int8,
    UInt8,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Ascii,
}

impl TypeTag {
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "text/plain" => Some(Self::Text),
            "text/x-calvin-float" => Some(Self::Float),
            "text/x-calvin-integer-8" => Some(Self::Int8),
            "text/x-calvin-unsigned-integer-8" => Some(Self::UInt8),
            "text/x-calvin-integer-16" => Some(Self::Int16),
            "text/x-calvin-unsigned-integer-16" => Some(Self::UInt16),
            "text/x-calvin-integer-32" => Some(Self::Int32),
            "text/x-calvin-unsigned-integer-32" => Some(Self::UInt32),
            "text/ascii" => Some(Self::Ascii),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text/plain",
            Self::Float => "text/x-calvin-float",
            Self::Int8 => "text/x-calvin-integer-8",
            Self::UInt8 => "text/x-calvin-unsigned-integer-8",
            Self::Int16 => "text/x-calvin-integer-16",
            Self::UInt16 => "text/x-calvin-unsigned-integer-16",
            Self::Int32 => "text/x-calvin-integer-32",
            Self::UInt32 => "text/x-calvin-unsigned-integer-32",
            Self::Ascii => "text/ascii",
        }
    }
}

/// Returns the first `n` bytes of a raw parameter value.
///
/// `offset` is where the raw value starts in the stream and is only used for error reporting.
fn leading(raw: &[u8], n: usize, offset: u64) -> Result<&[u8]> {
    raw.get(..n).ok_or(CalvinError::TruncatedData {
        offset,
        needed: n as u64,
        available: raw.len() as u64,
    })
}

/// Coerces the raw bytes of a parameter according to its type tag.
///
/// `None` for `tag` means the tag was not recognized: the bytes pass through
/// as [`Value::Bytes`]. An absent raw value stays [`Value::Absent`] for
/// textual and unrecognized tags; numeric tags require the bytes to be present.
pub fn coerce(raw: Option<Vec<u8>>, tag: Option<TypeTag>, offset: u64) -> Result<Value> {
    let raw = match (raw, tag) {
        (Some(raw), _) => raw,
        (None, None | Some(TypeTag::Text) | Some(TypeTag::Ascii)) => return Ok(Value::Absent),
        (None, Some(_)) => Vec::new(),
    };

    let value = match tag {
        Some(TypeTag::Text) => {
            let decoded = text::decode_utf16be(&raw);
            Value::Text(decoded.trim_end_matches('\0').to_owned())
        }
        Some(TypeTag::Float) => Value::Float(BigEndian::read_f32(leading(&raw, 4, offset)?)),
        Some(TypeTag::Int8) => Value::Int8(leading(&raw, 1, offset)?[0] as i8),
        Some(TypeTag::UInt8) => Value::UInt8(leading(&raw, 1, offset)?[0]),
        Some(TypeTag::Int16) => Value::Int16(BigEndian::read_i16(leading(&raw, 2, offset)?)),
        Some(TypeTag::UInt16) => Value::UInt16(BigEndian::read_u16(leading(&raw, 2, offset)?)),
        Some(TypeTag::Int32) => Value::Int32(BigEndian::read_i32(leading(&raw, 4, offset)?)),
        Some(TypeTag::UInt32) => Value::UInt32(BigEndian::read_u32(leading(&raw, 4, offset)?)),
        Some(TypeTag::Ascii) => {
            let start = raw.iter().position(|&b| b != 0).unwrap_or(raw.len());
            let end = raw.iter().rposition(|&b| b != 0).map_or(start, |i| i + 1);
            Value::Ascii(String::from_utf8_lossy(&raw[start..end]).into_owned())
        }
        None => Value::Bytes(raw),
    };
    Ok(value)
}

/// Reads one data set cell from the stream according to its column's type code.
pub fn read_cell<R: Read + Seek>(reader: &mut ByteReader<R>, column: &ColumnSpec) -> Result<Value> {
    let value = match column.column_type() {
        ColumnType::Int8 => Value::Int8(reader.read_i8()?),
        ColumnType::UInt8 => Value::UInt8(reader.read_u8()?),
        ColumnType::Int16 => Value::Int16(reader.read_i16()?),
        ColumnType::UInt16 => Value::UInt16(reader.read_u16()?),
        ColumnType::Int32 => Value::Int32(reader.read_i32()?),
        ColumnType::UInt32 => Value::UInt32(reader.read_u32()?),
        ColumnType::Float => Value::Float(reader.read_f32()?),
        ColumnType::ByteString => match text::read_byte_string(reader)? {
            Some(bytes) => Value::Bytes(bytes),
            None => Value::Absent,
        },
        ColumnType::WideString => match text::read_wide_string(reader)? {
            Some(s) => Value::Text(s),
            None => Value::Absent,
        },
        ColumnType::Other(code) => {
            let offset = reader.position();
            if column.byte_size < 0 {
                return Err(CalvinError::MalformedCount {
                    offset,
                    context: "column byte size",
                    count: i64::from(column.byte_size),
                });
            }
            trace!("Column '{}' has unknown type code {}, reading {} raw bytes", column.name, code, column.byte_size);
            Value::Bytes(reader.read_bytes(column.byte_size as usize)?)
        }
    };
    Ok(value)
}
