//! Coordinate mapping into the overlay layer

use nebula_core::{Bounds, Point};

/// Translate an element's absolute origin into overlay-local coordinates.
///
/// Both boxes must be in the same absolute space; no unit conversion happens
/// here.
pub fn map_to_overlay(element: Bounds, overlay: Bounds) -> Point {
    Point::new((element.x - overlay.x) as f32, (element.y - overlay.y) as f32)
}
