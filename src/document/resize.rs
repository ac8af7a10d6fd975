//! Rewriting a document's declared size

use std::path::Path;

use crate::size::SizeSpec;

use super::error::ResizeError;
use super::svg::{Length, VectorDocument};

/// Return a copy of `document` whose `width` and `height` are `target`
///
/// A missing `viewBox` is synthesized as `0 0 {width} {height}` from the
/// original dimensions, so the drawing scales instead of being cropped. A
/// dimension that was never declared falls back to `target`, which gives a
/// square viewBox even for non-square art. An existing `viewBox` is left as is.
pub fn resize(document: &VectorDocument, target: SizeSpec) -> Result<VectorDocument, ResizeError> {
    let view_box = match document.root.view_box() {
        Some(_) => None,
        None => {
            let width = original_length(document.root.width(), "width", target)?;
            let height = original_length(document.root.height(), "height", target)?;
            Some(format!("0 0 {} {}", width, height))
        }
    };

    let mut resized = document.clone();
    let edge = target.to_string();
    resized.root.set_attribute("width", edge.as_str());
    resized.root.set_attribute("height", edge);
    if let Some(view_box) = view_box {
        resized.root.set_attribute("viewBox", view_box);
    }
    Ok(resized)
}

/// Resize and write the result to `path`, replacing any previous content
pub fn resize_to_file(
    document: &VectorDocument,
    target: SizeSpec,
    path: &Path,
) -> Result<VectorDocument, ResizeError> {
    let resized = resize(document, target)?;
    resized
        .write_to(path)
        .map_err(|source| ResizeError::Write {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(resized)
}

fn original_length(
    declared: Option<&str>,
    attribute: &str,
    target: SizeSpec,
) -> Result<Length, ResizeError> {
    match declared {
        None => Ok(Length::from(target.get())),
        Some(value) => Length::parse(value).ok_or_else(|| ResizeError::UnsupportedLength {
            attribute: attribute.to_string(),
            value: value.to_string(),
        }),
    }
}
