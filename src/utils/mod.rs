//! Utility functions.

pub mod fs;
pub mod text;
