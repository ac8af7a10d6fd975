//! Progress reporting for batch runs

use std::path::Path;

use tracing::{debug, info, warn};

use crate::size::SizeSpec;

use super::error::BatchError;
use super::runner::BatchReport;

/// Receives progress events from [`BatchRasterizer::run`](super::BatchRasterizer::run)
///
/// All methods default to doing nothing.
pub trait BatchObserver {
    fn run_started(&mut self, _total: usize) {}

    fn size_started(&mut self, _size: SizeSpec) {}

    fn artifact_generated(&mut self, _size: SizeSpec, _path: &Path) {}

    /// Only called when failures are tolerated; otherwise the error ends the run
    fn size_failed(&mut self, _size: SizeSpec, _error: &BatchError) {}

    fn run_finished(&mut self, _report: &BatchReport) {}
}

/// Discards every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl BatchObserver for NullObserver {}

/// Emits events through `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl BatchObserver for TracingObserver {
    fn run_started(&mut self, total: usize) {
        debug!(total, "starting batch");
    }

    fn size_started(&mut self, size: SizeSpec) {
        debug!(size = size.get(), "rasterizing");
    }

    fn artifact_generated(&mut self, size: SizeSpec, path: &Path) {
        info!(size = size.get(), "Generated: {}", path.display());
    }

    fn size_failed(&mut self, size: SizeSpec, error: &BatchError) {
        warn!(size = size.get(), "skipping size: {}", error);
    }

    fn run_finished(&mut self, report: &BatchReport) {
        info!(
            generated = report.generated.len(),
            failed = report.failed.len(),
            "batch finished"
        );
    }
}
