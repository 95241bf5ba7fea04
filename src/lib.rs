//! # calvin-reader
//!
//! A reader for Calvin generic data files, the hierarchical binary container
//! used by Affymetrix/GeneChip instrument files (`.CEL`, `.CHP`).
//!
//! Decodes the file header, the descriptive data header, parent headers and
//! the extra block up front, and the offset-linked data groups and data sets
//! on demand. Writing the format is not supported.
pub mod calvin;

// Re-export the main types for convenience
pub use calvin::{
    CalvinError,
    CalvinReader,
    Diagnostic,
    Result,
    iter::GroupIterator,
    types::models::{
        CalvinFile,
        ColumnSpec,
        ColumnType,
        DataGroup,
        DataHeader,
        DataSet,
        FileHeader,
        Parameter,
        Value,
    },
};
