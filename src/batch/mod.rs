//! Batch conversion of one SVG into a set of PNG icons
//!
//! [`BatchRasterizer`] drives the run: for each size it rewrites the source
//! with [`crate::document::resize`], writes it to a temporary file and hands it
//! to a [`Rasterizer`]. Progress is reported through a [`BatchObserver`].

pub mod error;
pub mod observer;
pub mod rasterizer;
pub mod runner;

pub use error::BatchError;
pub use observer::{BatchObserver, NullObserver, TracingObserver};
pub use rasterizer::{CommandRasterizer, RasterJob, RasterOutcome, Rasterizer, RasterizerError};
pub use runner::{BatchRasterizer, BatchReport, GeneratedArtifact, SizeFailure};
