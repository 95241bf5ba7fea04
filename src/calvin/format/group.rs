//! Data group records and their data-set chains.

use std::collections::HashSet;
use std::io::{Read, Seek};
use log::{debug, warn};

use crate::calvin::codec::{byte_reader::ByteReader, text};
use crate::calvin::types::{
    error::{CalvinError, Diagnostic, Result},
    models::DataGroup,
};
use super::{data_set, is_chain_end};

/// Decodes the data group whose record starts at `offset`, then every data
/// set reachable from its first data-set offset.
///
/// # Record Structure
/// ```text
/// [u32] next group offset (0 for the last group)
/// [u32] first data set offset
/// [i32] data set count
/// [wide string] name
/// ```
///
/// At most `data_set_count` data sets are decoded. If the chain ends early,
/// a [`Diagnostic::DataSetCountMismatch`] is recorded and the group is
/// returned with the data sets that were reachable.
pub fn parse<R: Read + Seek>(
    reader: &mut ByteReader<R>,
    offset: u64,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<DataGroup> {
    reader.seek(offset)?;

    let next_group_offset = reader.read_u32()?;
    let first_data_set_offset = reader.read_u32()?;
    let count_offset = reader.position();
    let data_set_count = reader.read_i32()?;
    if data_set_count < 0 {
        return Err(CalvinError::MalformedCount {
            offset: count_offset,
            context: "data set",
            count: i64::from(data_set_count),
        });
    }
    let name = text::read_wide_string(reader)?.unwrap_or_default();
    debug!("Data group '{}' at {}: {} data sets declared", name, offset, data_set_count);

    let mut data_sets = Vec::new();
    let mut visited = HashSet::new();
    let mut next = u64::from(first_data_set_offset);
    while data_sets.len() < data_set_count as usize {
        if is_chain_end(next, reader.len()) {
            break;
        }
        if !visited.insert(next) {
            return Err(CalvinError::CyclicChain {
                offset: next,
                context: "data set",
            });
        }
        let data_set = data_set::parse(reader, next, diagnostics)?;
        next = u64::from(data_set.next_data_set_offset);
        data_sets.push(data_set);
    }

    if data_sets.len() != data_set_count as usize {
        warn!(
            "Data group '{}' declares {} data sets but only {} are reachable",
            name, data_set_count, data_sets.len()
        );
        diagnostics.push(Diagnostic::DataSetCountMismatch {
            group: name.clone(),
            expected: data_set_count,
            found: data_sets.len(),
        });
    }

    Ok(DataGroup {
        name,
        data_set_count,
        next_group_offset,
        first_data_set_offset,
        data_sets,
    })
}
