//! tvsort Library
//!
//! Decides which TV episodes from a feed are worth downloading and files
//! finished downloads into a show library, matching release names to show
//! folders despite spelling and punctuation drift.

pub mod cli;
pub mod core;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;

pub use error::{Error, Result};
