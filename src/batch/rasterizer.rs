//! External rasterizer invocation

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use thiserror::Error;

use crate::config::RasterizerConfig;
use crate::size::SizeSpec;

/// Errors starting the rasterizer process
#[derive(Debug, Error)]
pub enum RasterizerError {
    #[error("rasterizer '{program}' not found; is it installed and on PATH?")]
    ToolNotFound { program: String },

    #[error("failed to run rasterizer '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
}

/// One conversion request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterJob {
    pub input: PathBuf,
    pub output: PathBuf,
    pub width: u32,
    pub height: u32,
}

impl RasterJob {
    /// A square job with both edges equal to `size`
    pub fn square(input: &Path, output: &Path, size: SizeSpec) -> Self {
        Self {
            input: input.to_path_buf(),
            output: output.to_path_buf(),
            width: size.get(),
            height: size.get(),
        }
    }
}

/// How a rasterizer process ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterOutcome {
    /// None when the process was terminated by a signal
    pub exit_code: Option<i32>,
    pub stderr: String,
}

impl RasterOutcome {
    pub fn success() -> Self {
        Self {
            exit_code: Some(0),
            stderr: String::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Converts an SVG file on disk into a PNG file on disk
pub trait Rasterizer {
    /// Run one job to completion. An `Err` means the conversion could not be
    /// attempted at all; a failed conversion is an `Ok` with a non-zero exit code.
    fn rasterize(&self, job: &RasterJob) -> Result<RasterOutcome, RasterizerError>;
}

/// Runs an rsvg-convert compatible program as a child process
#[derive(Debug, Clone)]
pub struct CommandRasterizer {
    program: String,
    args: Vec<String>,
}

impl CommandRasterizer {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn from_config(config: &RasterizerConfig) -> Self {
        Self {
            program: config.program.clone(),
            args: config.args.clone(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Arguments passed for `job`: configured extras, then
    /// `-w <width> -h <height> -o <output> <input>`. Paths are passed as-is,
    /// without a round trip through UTF-8.
    pub fn arguments(&self, job: &RasterJob) -> Vec<OsString> {
        let mut args: Vec<OsString> = self.args.iter().map(OsString::from).collect();
        args.extend([
            OsString::from("-w"),
            OsString::from(job.width.to_string()),
            OsString::from("-h"),
            OsString::from(job.height.to_string()),
            OsString::from("-o"),
            job.output.as_os_str().to_os_string(),
            job.input.as_os_str().to_os_string(),
        ]);
        args
    }
}

impl Default for CommandRasterizer {
    fn default() -> Self {
        Self::from_config(&RasterizerConfig::default())
    }
}

impl Rasterizer for CommandRasterizer {
    fn rasterize(&self, job: &RasterJob) -> Result<RasterOutcome, RasterizerError> {
        let output = Command::new(&self.program)
            .args(self.arguments(job))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .map_err(|source| match source.kind() {
                io::ErrorKind::NotFound => RasterizerError::ToolNotFound {
                    program: self.program.clone(),
                },
                _ => RasterizerError::Spawn {
                    program: self.program.clone(),
                    source,
                },
            })?;

        Ok(RasterOutcome {
            exit_code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
