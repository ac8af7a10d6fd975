//! Error types for batch runs

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;
use crate::document::{DocumentError, ResizeError};
use crate::size::SizeSpec;

use super::rasterizer::RasterizerError;

/// Errors that can stop a batch run
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("failed to create output directory '{}': {source}", .path.display())]
    CreateOutputDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error(transparent)]
    Resize(#[from] ResizeError),

    #[error(transparent)]
    Rasterizer(#[from] RasterizerError),

    /// An artifact from an earlier run could not be cleared before rasterizing
    #[error("failed to remove existing artifact '{}': {source}", .path.display())]
    StaleArtifact {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The rasterizer ran but reported failure
    #[error("rasterizing {size}x{size} failed ({}){}", describe_exit(.exit_code), describe_stderr(.stderr))]
    Rasterize {
        size: SizeSpec,
        exit_code: Option<i32>,
        stderr: String,
    },

    /// The rasterizer reported success without writing its output
    #[error("rasterizer exited successfully but '{}' was not written", .path.display())]
    MissingArtifact { size: SizeSpec, path: PathBuf },

    #[error("failed to remove temporary file '{}': {source}", .path.display())]
    Cleanup {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl BatchError {
    /// Size the error is attributed to, for per-size failures
    pub fn size(&self) -> Option<SizeSpec> {
        match self {
            Self::Rasterize { size, .. } | Self::MissingArtifact { size, .. } => Some(*size),
            _ => None,
        }
    }

    /// Render a source diagnostic for parse failures
    pub fn diagnostic(&self) -> Option<String> {
        match self {
            Self::Document(err) => err.diagnostic(),
            _ => None,
        }
    }
}

fn describe_exit(exit_code: &Option<i32>) -> String {
    match exit_code {
        Some(code) => format!("exit code {}", code),
        None => "terminated by signal".to_string(),
    }
}

fn describe_stderr(stderr: &str) -> String {
    let stderr = stderr.trim();
    if stderr.is_empty() {
        String::new()
    } else {
        format!(": {}", stderr)
    }
}
