//! Data set records.
//!
//! ```text
//! [u32] first element offset (absolute position of the value block)
//! [u32] next data set offset
//! [wide string] name
//! [parameters]
//! [i32 count] then count x ([wide string] name, [u8] type code, [i32] byte size)
//! [u32] row count
//! ... value block at first element offset, row-major ...
//! ```

use std::io::{Read, Seek};
use log::{debug, trace};

use crate::calvin::codec::{byte_reader::ByteReader, text, value};
use crate::calvin::types::{
    error::{Diagnostic, Result},
    models::{ColumnSpec, DataSet},
};
use super::header;

/// Smallest encoding of a column spec: empty name, type code, byte size.
const MIN_COLUMN_SIZE: u64 = 9;

/// Upper bound on rows preallocated for data sets whose cells occupy no bytes.
const MAX_ZERO_WIDTH_PREALLOC: usize = 4096;

fn parse_column<R: Read + Seek>(reader: &mut ByteReader<R>) -> Result<ColumnSpec> {
    let name = text::read_wide_string(reader)?.unwrap_or_default();
    let type_code = reader.read_u8()?;
    let byte_size = reader.read_i32()?;
    Ok(ColumnSpec {
        name,
        type_code,
        byte_size,
    })
}

/// Decodes the data set whose header starts at `offset`, including its value block.
///
/// The cursor is left wherever the value block ended; callers locate the next
/// sibling through [`DataSet::next_data_set_offset`].
pub fn parse<R: Read + Seek>(
    reader: &mut ByteReader<R>,
    offset: u64,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<DataSet> {
    reader.seek(offset)?;

    let first_element_offset = reader.read_u32()?;
    let next_data_set_offset = reader.read_u32()?;
    let name = text::read_wide_string(reader)?.unwrap_or_default();
    let parameters = header::parse_parameters(reader, diagnostics)?;

    let column_count = reader.read_count("column", MIN_COLUMN_SIZE)?;
    let columns = (0..column_count)
        .map(|_| parse_column(reader))
        .collect::<Result<Vec<_>>>()?;

    let row_count_offset = reader.position();
    let row_count = reader.read_u32()?;
    trace!(
        "Data set '{}': {} columns, {} rows, values at {}, next at {}",
        name, columns.len(), row_count, first_element_offset, next_data_set_offset
    );

    // Value block lives at its own offset, which may precede the header fields.
    reader.seek(u64::from(first_element_offset))?;
    let row_size: u64 = columns.iter().map(ColumnSpec::min_cell_size).sum();
    let capacity = if row_size == 0 {
        // Zero-width rows consume no bytes, so the remaining length cannot bound them.
        (row_count as usize).min(MAX_ZERO_WIDTH_PREALLOC)
    } else {
        reader.check_count(row_count_offset, "row", i64::from(row_count), row_size)?
    };

    let mut rows = Vec::with_capacity(capacity);
    for _ in 0..row_count {
        let row = columns
            .iter()
            .map(|column| value::read_cell(reader, column))
            .collect::<Result<Vec<_>>>()?;
        rows.push(row);
    }

    debug!(
        "Data set '{}' decoded: {} x {} cells, block ended at {}",
        name, row_count, columns.len(), reader.position()
    );

    Ok(DataSet {
        name,
        parameters,
        columns,
        row_count,
        first_element_offset,
        next_data_set_offset,
        rows,
    })
}
