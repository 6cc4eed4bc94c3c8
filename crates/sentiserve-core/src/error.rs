//! Error types for Sentiserve

use std::path::PathBuf;

/// Result type alias using Sentiserve's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for Sentiserve operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Missing or empty input
    #[error("{0}")]
    Validation(String),

    /// Input file does not exist
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Input file exists but could not be read as UTF-8 text
    #[error("failed to read {}: {source}", path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Model could not be materialized
    #[error("initialization error: {0}")]
    Initialization(String),

    /// The underlying model failed while classifying
    #[error("inference error: {0}")]
    Inference(String),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),
}

/// Coarse category of an [`Error`], used for status mapping and metrics labels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Resource,
    Initialization,
    Inference,
    Config,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Resource => "resource",
            Self::Initialization => "initialization",
            Self::Inference => "inference",
            Self::Config => "config",
        }
    }
}

impl Error {
    /// Create a new validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a new initialization error
    pub fn initialization(msg: impl Into<String>) -> Self {
        Self::Initialization(msg.into())
    }

    /// Create a new inference error
    pub fn inference(msg: impl Into<String>) -> Self {
        Self::Inference(msg.into())
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a file read error for `path`
    pub fn file_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileRead {
            path: path.into(),
            source,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::FileNotFound(_) | Self::FileRead { .. } => ErrorKind::Resource,
            Self::Initialization(_) => ErrorKind::Initialization,
            Self::Inference(_) => ErrorKind::Inference,
            Self::Config(_) => ErrorKind::Config,
        }
    }

    /// True when the caller can fix the problem by changing their input
    pub fn is_user_error(&self) -> bool {
        matches!(self.kind(), ErrorKind::Validation | ErrorKind::Resource)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_errors() {
        assert!(Error::validation("Empty text provided").is_user_error());
        assert!(Error::FileNotFound(PathBuf::from("missing.txt")).is_user_error());
        assert!(Error::file_read(
            "bad.txt",
            std::io::Error::new(std::io::ErrorKind::InvalidData, "stream did not contain valid UTF-8"),
        )
        .is_user_error());

        assert!(!Error::initialization("no weights").is_user_error());
        assert!(!Error::inference("forward pass failed").is_user_error());
        assert!(!Error::config("bad device").is_user_error());
    }

    #[test]
    fn test_validation_message_is_bare() {
        let err = Error::validation("Empty text provided");
        assert_eq!(err.to_string(), "Empty text provided");
        assert_eq!(err.kind().as_str(), "validation");
    }

    #[test]
    fn test_file_not_found_display() {
        let err = Error::FileNotFound(PathBuf::from("sample_data/input.txt"));
        assert_eq!(err.to_string(), "file not found: sample_data/input.txt");
        assert_eq!(err.kind(), ErrorKind::Resource);
    }
}
