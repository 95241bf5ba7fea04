//! File format parsing layer for Calvin generic data files.
//!
//! This module sits between the byte-level [`codec`](crate::calvin::codec)
//! primitives and the high-level [`CalvinReader`](crate::calvin::reader::CalvinReader).
//!
//! # Architecture
//!
//! ```text
//! File Structure:
//! ┌─────────────────┐
//! │  File Header    │ ← file_header::parse()
//! ├─────────────────┤
//! │  Data Header    │ ← header::parse()
//! │  Parent Headers │ ← header::parse_list()
//! │  Extra Block    │ ← header::parse_list()
//! ├─────────────────┤
//! │  Data Group     │ ← group::parse()      ─┐ linked by
//! │   Data Set ...  │ ← data_set::parse()    │ absolute
//! │  Data Group     │                        │ offsets
//! │   ...           │                       ─┘
//! └─────────────────┘
//! ```

pub mod data_set;
pub mod file_header;
pub mod group;
pub mod header;

/// Whether an offset read from a chain link terminates the chain.
///
/// Writers mark the end either with `0` or with the length of the file.
pub(crate) fn is_chain_end(offset: u64, source_len: u64) -> bool {
    offset == 0 || offset == source_len
}
