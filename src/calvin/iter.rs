//! Lazy traversal of the data group chain.
//!
//! Groups are linked through absolute offsets stored in each group record.
//! [`GroupIterator`] walks that chain one link per call to `next()`:
//!
//! ```text
//! Pending(first_group_offset) ──decode──▶ yield group ──▶ Pending(next_group_offset)
//!        │                                                        │
//!        └──── offset 0 or end of source ──▶ Terminal ◀───────────┘
//! ```
//!
//! # Example
//! ```no_run
//! # use calvin_reader::CalvinReader;
//! let mut reader = CalvinReader::open("sample.CEL").unwrap();
//! for group in reader.iter_groups() {
//!     let group = group.unwrap();
//!     println!("{}: {} data sets", group.name, group.data_sets.len());
//! }
//! ```

use std::collections::HashSet;
use std::io::{Read, Seek};
use log::warn;

use super::codec::byte_reader::ByteReader;
use super::format::{group, is_chain_end};
use super::types::error::{CalvinError, Diagnostic, Result};
use super::types::models::DataGroup;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TraversalState {
    /// The next group record is expected at this offset.
    Pending(u64),
    Terminal,
}

/// Iterator over the data groups of a file, decoding each one on demand.
///
/// Created by [`CalvinReader::iter_groups()`](crate::CalvinReader::iter_groups).
/// When the chain ends normally the number of decoded groups is compared
/// with the file header and a [`Diagnostic::GroupCountMismatch`] is recorded
/// if they disagree. After a fatal error the iterator is exhausted.
pub struct GroupIterator<'a, R> {
    source: &'a mut ByteReader<R>,
    diagnostics: &'a mut Vec<Diagnostic>,
    state: TraversalState,
    visited: HashSet<u64>,
    expected: i32,
    decoded: usize,
}

impl<'a, R: Read + Seek> GroupIterator<'a, R> {
    pub(super) fn new(
        source: &'a mut ByteReader<R>,
        diagnostics: &'a mut Vec<Diagnostic>,
        first_group_offset: u32,
        expected: i32,
    ) -> Self {
        Self {
            source,
            diagnostics,
            state: TraversalState::Pending(u64::from(first_group_offset)),
            visited: HashSet::new(),
            expected,
            decoded: 0,
        }
    }

    fn finish(&mut self) {
        self.state = TraversalState::Terminal;
        let matches = usize::try_from(self.expected).map_or(false, |n| n == self.decoded);
        if !matches {
            warn!(
                "File header declares {} data groups but the chain yielded {}",
                self.expected, self.decoded
            );
            self.diagnostics.push(Diagnostic::GroupCountMismatch {
                expected: self.expected,
                found: self.decoded,
            });
        }
    }
}

impl<'a, R: Read + Seek> Iterator for GroupIterator<'a, R> {
    type Item = Result<DataGroup>;

    fn next(&mut self) -> Option<Self::Item> {
        let offset = match self.state {
            TraversalState::Pending(offset) => offset,
            TraversalState::Terminal => return None,
        };

        if is_chain_end(offset, self.source.len()) {
            self.finish();
            return None;
        }

        if !self.visited.insert(offset) {
            self.state = TraversalState::Terminal;
            return Some(Err(CalvinError::CyclicChain {
                offset,
                context: "data group",
            }));
        }

        match group::parse(&mut *self.source, offset, &mut *self.diagnostics) {
            Ok(group) => {
                self.decoded += 1;
                self.state = TraversalState::Pending(u64::from(group.next_group_offset));
                Some(Ok(group))
            }
            Err(e) => {
                self.state = TraversalState::Terminal;
                Some(Err(e))
            }
        }
    }
}
