//! SVG document model and size rewriting

pub mod error;
pub mod lexer;
pub mod resize;
pub mod svg;

pub use error::{DocumentError, ResizeError};
pub use resize::{resize, resize_to_file};
pub use svg::{Attribute, Length, Quote, RootElement, VectorDocument};
