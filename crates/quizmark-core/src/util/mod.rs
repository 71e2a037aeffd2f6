//! Utility modules.
//!
//! - [`paths`]: Lexical path resolution and display helpers

pub mod paths;
