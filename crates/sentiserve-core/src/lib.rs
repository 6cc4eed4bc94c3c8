//! Sentiserve Core
//!
//! Types shared by the classifier crate and both transports:
//! - the error taxonomy and `Result` alias
//! - `LabelScore`, one record of a classification result
//! - `InputText`, text that has passed the non-empty check

pub mod error;
pub mod types;

pub use error::{Error, ErrorKind, Result};
pub use types::{InputText, LabelScore};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{Error, ErrorKind, Result};
    pub use crate::types::{InputText, LabelScore};
}
