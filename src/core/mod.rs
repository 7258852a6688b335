//! Core episode matching and placement logic.

pub mod library;
pub mod oracle;
pub mod parser;
pub mod planner;
pub mod postqueue;
pub mod prequeue;
pub mod renamer;
pub mod session;
