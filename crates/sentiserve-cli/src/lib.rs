//! Sentiserve CLI
//!
//! Classifies the contents of a single text file and prints the result.

pub mod cli;
pub mod predict;

pub use cli::{Cli, CliConfig};
pub use predict::classify_file;
