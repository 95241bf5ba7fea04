//! Length-prefixed string fields.
//!
//! Both string flavours start with a big-endian `i32` length. A length of
//! zero means the field is absent; a negative length is malformed.
//!
//! ```text
//! byte string: [i32 n] [n bytes]
//! wide string: [i32 n] [n UTF-16BE code units = 2n bytes]
//! ```

use std::io::{Read, Seek};
use encoding_rs::UTF_16BE;

use crate::calvin::types::error::{CalvinError, Result};
use super::byte_reader::ByteReader;

/// Reads a length prefix, mapping `0` to `None` and rejecting negatives.
fn read_length<R: Read + Seek>(reader: &mut ByteReader<R>, context: &'static str) -> Result<Option<usize>> {
    let offset = reader.position();
    let len = reader.read_i32()?;
    match len {
        0 => Ok(None),
        n if n < 0 => Err(CalvinError::MalformedCount {
            offset,
            context,
            count: i64::from(n),
        }),
        n => Ok(Some(n as usize)),
    }
}

/// Reads a length-prefixed run of single-byte code units.
///
/// The bytes are returned untouched; the caller picks the final text encoding.
pub fn read_byte_string<R: Read + Seek>(reader: &mut ByteReader<R>) -> Result<Option<Vec<u8>>> {
    match read_length(reader, "byte string length")? {
        Some(len) => Ok(Some(reader.read_bytes(len)?)),
        None => Ok(None),
    }
}

/// Reads a length-prefixed UTF-16BE string. The prefix counts code units, not bytes.
pub fn read_wide_string<R: Read + Seek>(reader: &mut ByteReader<R>) -> Result<Option<String>> {
    match read_length(reader, "wide string length")? {
        Some(units) => {
            let offset = reader.position();
            let byte_len = units.checked_mul(2).ok_or(CalvinError::MalformedCount {
                offset,
                context: "wide string length",
                count: units as i64,
            })?;
            let bytes = reader.read_bytes(byte_len)?;
            Ok(Some(decode_utf16be(&bytes)))
        }
        None => Ok(None),
    }
}

/// Reads a byte string and decodes it as (lossy) UTF-8 text.
pub fn read_utf8_string<R: Read + Seek>(reader: &mut ByteReader<R>) -> Result<Option<String>> {
    Ok(read_byte_string(reader)?.map(|bytes| String::from_utf8_lossy(&bytes).into_owned()))
}

/// Decodes UTF-16BE bytes without BOM sniffing. Malformed units become U+FFFD.
pub fn decode_utf16be(bytes: &[u8]) -> String {
    let (text, _) = UTF_16BE.decode_without_bom_handling(bytes);
    text.into_owned()
}
