//! PNG snapshots of a trajectory.
//!
//! Feature-gated behind `png` (default on) so that consumers that only need
//! the session can skip the `image` crate. Rasterization itself lives in
//! [`crate::pixel`].

use attractors_core::{AttractorError, Color, DVec3};
use std::path::Path;

use crate::pixel::points_to_rgba;

/// Largest accepted edge length.
pub const MAX_DIMENSION: usize = 8192;

/// Renders `points` and writes them as a PNG image.
///
/// Returns `AttractorError::InvalidDimensions` for a zero or oversized frame,
/// or `AttractorError::Io` on write failure.
pub fn write_png(
    points: &[DVec3],
    rotation: Option<DVec3>,
    width: usize,
    height: usize,
    color: Color,
    path: &Path,
) -> Result<(), AttractorError> {
    if width == 0 || height == 0 || width > MAX_DIMENSION || height > MAX_DIMENSION {
        return Err(AttractorError::InvalidDimensions);
    }
    let w = u32::try_from(width).map_err(|_| AttractorError::InvalidDimensions)?;
    let h = u32::try_from(height).map_err(|_| AttractorError::InvalidDimensions)?;
    let rgba = points_to_rgba(points, rotation, width, height, color);
    let img = image::RgbaImage::from_raw(w, h, rgba)
        .ok_or_else(|| AttractorError::Io("RGBA buffer size mismatch".into()))?;
    img.save(path).map_err(|e| AttractorError::Io(e.to_string()))?;
    log::info!("wrote {}x{} snapshot to {}", width, height, path.display());
    Ok(())
}
