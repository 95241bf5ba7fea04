//! Core Calvin generic data file reader module

pub mod codec;
pub mod format;
pub mod iter;
pub mod reader;
pub mod types;

pub use reader::CalvinReader;
pub use types::error::{CalvinError, Diagnostic, Result};
