//! svg-iconset - render a square SVG into a set of fixed-size PNG icons
//!
//! The SVG root's `width`, `height` and `viewBox` are rewritten for every
//! target size and the result is converted by an external rasterizer
//! (`rsvg-convert` by default) into `{size}x{size}.png`.
//!
//! # Example
//!
//! ```rust
//! use svg_iconset::{resize, SizeSpec, VectorDocument};
//!
//! let doc = VectorDocument::parse(r#"<svg width="512" height="512"></svg>"#).unwrap();
//! let small = resize(&doc, SizeSpec::new(16).unwrap()).unwrap();
//!
//! assert_eq!(
//!     small.to_svg_string(),
//!     r#"<svg width="16" height="16" viewBox="0 0 512 512"></svg>"#
//! );
//! ```

pub mod batch;
pub mod config;
pub mod document;
pub mod error;
pub mod size;

pub use batch::{
    BatchError, BatchObserver, BatchRasterizer, BatchReport, CommandRasterizer, Rasterizer,
    TracingObserver,
};
pub use config::{BatchConfig, ConfigError, ConfigFile, RasterizerConfig};
pub use document::{resize, resize_to_file, DocumentError, ResizeError, VectorDocument};
pub use error::ParseError;
pub use size::{SizeSet, SizeSpec, DEFAULT_SIZES};

/// Run a batch with the configured external rasterizer, logging through `tracing`
///
/// ```no_run
/// use svg_iconset::{generate, BatchConfig, SizeSet};
///
/// let config = BatchConfig::new("YouTube.svg")
///     .with_output_dir("icons")
///     .with_sizes(SizeSet::new([16, 32, 64]).unwrap());
/// let report = generate(config).unwrap();
/// assert_eq!(report.generated.len(), 3);
/// ```
pub fn generate(config: BatchConfig) -> Result<BatchReport, BatchError> {
    BatchRasterizer::from_config(config).run(&mut TracingObserver)
}
