//! Clip rectangle for partially hidden targets

use nebula_core::{Insets, IntRect};

/// Clip for the indicator given the target's visible region.
///
/// `visible` is relative to the target's own origin. Returns `None` when the
/// target is fully visible. Otherwise the region is shifted by the padding's
/// left/top so it lands in the indicator's (padded) frame.
///
/// The result is not clamped to the indicator's own bounds; intersecting it
/// with the drawn area is up to the renderer.
pub fn compute_clip(visible: IntRect, full_width: i32, full_height: i32, padding: Insets) -> Option<IntRect> {
    if visible.covers(full_width, full_height) {
        return None;
    }
    Some(visible.offset(padding.left, padding.top))
}
