//! Coordinate helpers shared by the registry and the drag controller.

use crate::model::{Footprint, Surface};

/// Clamp a sticker origin so the whole footprint stays on the surface.
///
/// The result lies in `[0, surface - footprint]` on both axes. When the
/// surface is smaller than the footprint the origin pins to 0.
pub fn clamp_origin(x: f32, y: f32, surface: Surface, footprint: Footprint) -> (f32, f32) {
    let max_x = (surface.width - footprint.width).max(0.0);
    let max_y = (surface.height - footprint.height).max(0.0);
    (x.clamp(0.0, max_x), y.clamp(0.0, max_y))
}

/// Origin for a sticker dropped with its centre at `(px, py)`, clamped
/// onto the surface.
pub fn drop_origin(px: f32, py: f32, surface: Surface, footprint: Footprint) -> (f32, f32) {
    let (hw, hh) = footprint.half();
    clamp_origin(px - hw, py - hh, surface, footprint)
}

/// Whether `(ax, ay)` and `(bx, by)` differ by strictly less than
/// `tolerance` on both axes.
pub fn within_tolerance(ax: f32, ay: f32, bx: f32, by: f32, tolerance: f32) -> bool {
    (ax - bx).abs() < tolerance && (ay - by).abs() < tolerance
}
