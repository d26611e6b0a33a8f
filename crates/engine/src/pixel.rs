//! Pure-computation rasterization of a trajectory into an RGBA8 buffer.
//!
//! Points are rotated by the attractor's Euler angles (radians), projected
//! onto the XY plane and fitted into the frame with a small margin. Each
//! pixel's brightness follows the log of how many points landed on it, so
//! dense regions saturate to the line color while sparse ones stay dim.
//! This module is always available (no feature gate); PNG encoding lives in
//! `snapshot`.

use attractors_core::{Color, DVec3};
use glam::{DMat3, EulerRot};

/// Fraction of the frame left empty on each side.
const MARGIN: f64 = 0.05;

/// Rotation matrix for XYZ Euler angles in radians.
pub fn rotation_matrix(angles: DVec3) -> DMat3 {
    DMat3::from_euler(EulerRot::XYZ, angles.x, angles.y, angles.z)
}

/// Rasterizes `points` into a `width * height * 4` RGBA buffer on an opaque black background.
///
/// Non-finite points are skipped. An empty (or fully non-finite) trajectory
/// yields a black frame.
pub fn points_to_rgba(
    points: &[DVec3],
    rotation: Option<DVec3>,
    width: usize,
    height: usize,
    color: Color,
) -> Vec<u8> {
    let mut rgba = vec![0u8; width * height * 4];
    for px in rgba.chunks_exact_mut(4) {
        px[3] = 255;
    }
    if width == 0 || height == 0 {
        return rgba;
    }

    let rot = rotation.map(rotation_matrix).unwrap_or(DMat3::IDENTITY);
    let projected: Vec<(f64, f64)> = points
        .iter()
        .filter(|p| p.is_finite())
        .map(|&p| {
            let r = rot * p;
            (r.x, r.y)
        })
        .collect();
    if projected.is_empty() {
        return rgba;
    }

    let (mut min_x, mut max_x) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut min_y, mut max_y) = (f64::INFINITY, f64::NEG_INFINITY);
    for &(x, y) in &projected {
        min_x = min_x.min(x);
        max_x = max_x.max(x);
        min_y = min_y.min(y);
        max_y = max_y.max(y);
    }

    // Uniform scale keeps the aspect ratio; degenerate spans collapse to the center.
    let span = (max_x - min_x).max(max_y - min_y);
    let usable = (1.0 - 2.0 * MARGIN) * (width.min(height) as f64 - 1.0);
    let scale = if span > 0.0 { usable / span } else { 0.0 };
    let cx = (min_x + max_x) / 2.0;
    let cy = (min_y + max_y) / 2.0;
    let half_w = (width as f64 - 1.0) / 2.0;
    let half_h = (height as f64 - 1.0) / 2.0;

    let mut hits = vec![0u32; width * height];
    for (x, y) in projected {
        let col = (half_w + (x - cx) * scale).round();
        // Screen y grows downward.
        let row = (half_h - (y - cy) * scale).round();
        if col < 0.0 || row < 0.0 {
            continue;
        }
        let (col, row) = (col as usize, row as usize);
        if col < width && row < height {
            hits[row * width + col] += 1;
        }
    }

    let peak = hits.iter().copied().max().unwrap_or(0);
    if peak == 0 {
        return rgba;
    }
    let norm = (peak as f64).ln_1p();
    let [r, g, b, _] = color.with_alpha(255);
    for (px, &n) in rgba.chunks_exact_mut(4).zip(&hits) {
        if n == 0 {
            continue;
        }
        let t = (n as f64).ln_1p() / norm;
        px[0] = (r as f64 * t).round() as u8;
        px[1] = (g as f64 * t).round() as u8;
        px[2] = (b as f64 * t).round() as u8;
    }
    rgba
}
