//! Sequential resize-then-rasterize loop

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::BatchConfig;
use crate::document::{resize_to_file, VectorDocument};
use crate::size::SizeSpec;

use super::error::BatchError;
use super::observer::BatchObserver;
use super::rasterizer::{CommandRasterizer, RasterJob, RasterOutcome, Rasterizer};

/// A PNG written during a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedArtifact {
    pub size: SizeSpec,
    pub path: PathBuf,
}

/// A size that could not be produced in a run that tolerates failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizeFailure {
    pub size: SizeSpec,
    pub reason: String,
}

/// Outcome of a completed run, in processing order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub generated: Vec<GeneratedArtifact>,
    pub failed: Vec<SizeFailure>,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Produces one PNG per configured size from a single SVG
#[derive(Debug, Clone)]
pub struct BatchRasterizer<R = CommandRasterizer> {
    config: BatchConfig,
    rasterizer: R,
}

impl BatchRasterizer<CommandRasterizer> {
    /// Use the external program named in the configuration
    pub fn from_config(config: BatchConfig) -> Self {
        let rasterizer = CommandRasterizer::from_config(&config.rasterizer);
        Self { config, rasterizer }
    }
}

impl<R: Rasterizer> BatchRasterizer<R> {
    pub fn new(config: BatchConfig, rasterizer: R) -> Self {
        Self { config, rasterizer }
    }

    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    pub fn rasterizer(&self) -> &R {
        &self.rasterizer
    }

    /// Run every size in ascending order
    ///
    /// The source is parsed once up front; each size is rewritten into the
    /// shared temporary file and handed to the rasterizer, which runs to
    /// completion before the next size starts. The temporary file is removed
    /// when the run ends, successfully or not.
    pub fn run(&self, observer: &mut dyn BatchObserver) -> Result<BatchReport, BatchError> {
        let output_dir = &self.config.output_dir;
        fs::create_dir_all(output_dir).map_err(|source| BatchError::CreateOutputDir {
            path: output_dir.clone(),
            source,
        })?;
        self.config.validate()?;

        let document = VectorDocument::from_file(&self.config.source)?;
        let temp = TempFile::new(self.config.temp_path());

        observer.run_started(self.config.sizes.len());
        let mut report = BatchReport::default();
        for size in self.config.sizes.iter() {
            observer.size_started(size);
            match self.render_size(&document, size, temp.path()) {
                Ok(path) => {
                    observer.artifact_generated(size, &path);
                    report.generated.push(GeneratedArtifact { size, path });
                }
                Err(err) if self.config.keep_going && err.size().is_some() => {
                    observer.size_failed(size, &err);
                    report.failed.push(SizeFailure {
                        size,
                        reason: err.to_string(),
                    });
                }
                Err(err) => return Err(err),
            }
        }

        temp.remove()?;
        observer.run_finished(&report);
        Ok(report)
    }

    fn render_size(
        &self,
        document: &VectorDocument,
        size: SizeSpec,
        temp_path: &Path,
    ) -> Result<PathBuf, BatchError> {
        let output = self.config.artifact_path(size);
        remove_if_present(&output).map_err(|source| BatchError::StaleArtifact {
            path: output.clone(),
            source,
        })?;

        resize_to_file(document, size, temp_path)?;
        let job = RasterJob::square(temp_path, &output, size);
        debug!(size = size.get(), output = %output.display(), "invoking rasterizer");
        let outcome = self.rasterizer.rasterize(&job)?;
        check_outcome(size, outcome, &output)?;
        Ok(output)
    }
}

fn check_outcome(size: SizeSpec, outcome: RasterOutcome, output: &Path) -> Result<(), BatchError> {
    if !outcome.is_success() {
        return Err(BatchError::Rasterize {
            size,
            exit_code: outcome.exit_code,
            stderr: outcome.stderr,
        });
    }
    if !output.is_file() {
        return Err(BatchError::MissingArtifact {
            size,
            path: output.to_path_buf(),
        });
    }
    Ok(())
}

fn remove_if_present(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        result => result,
    }
}

/// Intermediate SVG path, removed on drop unless already removed
struct TempFile {
    path: PathBuf,
    removed: bool,
}

impl TempFile {
    fn new(path: PathBuf) -> Self {
        Self {
            path,
            removed: false,
        }
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn remove(mut self) -> Result<(), BatchError> {
        self.removed = true;
        remove_if_present(&self.path).map_err(|source| BatchError::Cleanup {
            path: self.path.clone(),
            source,
        })
    }
}

impl Drop for TempFile {
    fn drop(&mut self) {
        if !self.removed {
            let _ = fs::remove_file(&self.path);
        }
    }
}
