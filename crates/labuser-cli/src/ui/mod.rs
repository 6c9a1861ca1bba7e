//! Terminal interaction helpers.

pub mod prompt;
