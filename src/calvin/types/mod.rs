//! Foundational data structures, error types and format constants.

pub mod error;
pub mod models;
