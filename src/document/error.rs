//! Error types for loading and resizing SVG documents

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::error::ParseError;

/// Errors that can occur while loading a document from disk
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("failed to read '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse '{}': {error}", .path.display())]
    Parse {
        path: PathBuf,
        /// Full source text, kept for diagnostics
        text: String,
        #[source]
        error: ParseError,
    },
}

impl DocumentError {
    pub fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn parse(path: &Path, text: String, error: ParseError) -> Self {
        Self::Parse {
            path: path.to_path_buf(),
            text,
            error,
        }
    }

    /// Render parse errors against their source, if this is one
    pub fn diagnostic(&self) -> Option<String> {
        match self {
            Self::Parse { path, text, error } => {
                Some(error.format(text, &path.display().to_string()))
            }
            Self::Io { .. } => None,
        }
    }
}

/// Errors that can occur while resizing a document
#[derive(Debug, Error)]
pub enum ResizeError {
    /// A viewBox has to be derived from a length that is not in user units
    #[error("cannot derive a viewBox from {attribute}=\"{value}\"; only plain or px lengths are supported")]
    UnsupportedLength { attribute: String, value: String },

    #[error("failed to write resized document to '{}': {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
