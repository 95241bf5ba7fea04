//! The fixed leading record of a Calvin file.

use std::io::{Read, Seek};
use log::{debug, trace};

use crate::calvin::codec::byte_reader::ByteReader;
use crate::calvin::types::{
    error::{CalvinError, Result},
    models::{FileHeader, CALVIN_MAGIC, CALVIN_VERSION},
};

/// Parses the file header at offset 0 and validates magic number and version.
///
/// # Header Structure
/// ```text
/// [1 byte]  magic number (59)
/// [1 byte]  version (1)
/// [4 bytes] number of data groups (big-endian i32)
/// [4 bytes] offset of the first data group (big-endian u32)
/// ```
pub fn parse<R: Read + Seek>(reader: &mut ByteReader<R>) -> Result<FileHeader> {
    reader.seek(0)?;

    let magic = reader.read_u8()?;
    if magic != CALVIN_MAGIC {
        return Err(CalvinError::FormatMismatch {
            offset: 0,
            field: "magic number",
            expected: CALVIN_MAGIC,
            found: magic,
        });
    }

    let version_offset = reader.position();
    let version = reader.read_u8()?;
    if version != CALVIN_VERSION {
        return Err(CalvinError::FormatMismatch {
            offset: version_offset,
            field: "version",
            expected: CALVIN_VERSION,
            found: version,
        });
    }

    let group_count = reader.read_i32()?;
    let first_group_offset = reader.read_u32()?;
    trace!("File header: groups={}, first group at {}", group_count, first_group_offset);

    debug!("Calvin file header validated (magic={}, version={})", magic, version);
    Ok(FileHeader {
        magic,
        version,
        group_count,
        first_group_offset,
    })
}
