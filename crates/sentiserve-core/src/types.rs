//! Request and result types shared by both transports

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Deref;

/// One labelled confidence score produced by a classifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelScore {
    /// Classification label, e.g. `POSITIVE`
    pub label: String,

    /// Confidence score (0.0-1.0)
    pub score: f32,
}

impl LabelScore {
    pub fn new(label: impl Into<String>, score: f32) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }
}

impl fmt::Display for LabelScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.4})", self.label, self.score)
    }
}

/// Text that is non-empty after trimming whitespace.
///
/// The original text is kept as-is; trimming only decides validity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputText(String);

impl InputText {
    /// Validate `text`, failing with [`Error::Validation`] when it is blank
    pub fn new(text: impl Into<String>) -> Result<Self> {
        Self::with_message(text, "Empty text provided")
    }

    /// Same as [`InputText::new`] with a caller-chosen validation message
    pub fn with_message(text: impl Into<String>, message: &str) -> Result<Self> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(Error::validation(message));
        }
        Ok(Self(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Deref for InputText {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for InputText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
