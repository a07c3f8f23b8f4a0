//! Sizing and positioning rules for anchored surfaces
//!
//! An anchored surface occupies the strip between one edge of its parent and
//! the screen boundary on the same side. [`constrain_size`] decides how much
//! of a requested size fits in that strip, and [`anchored_position`] places
//! the surface against the edge. Both are pure functions; the surface object
//! calls them with whatever geometry is current at the time.

use attached_surface_protocol::Anchor;

use crate::geometry::{Rect, Size};

/// Clamp a requested size to the space available around the parent
///
/// For [`Anchor::None`] the requested size is returned unchanged. For edge
/// anchors, the axis pointing away from the parent edge is clamped to the
/// space left between that edge (pushed out by `margin`) and the screen
/// boundary; the other axis is not constrained. If there is no positive
/// space left, the request is granted as-is. Edge-anchored results are
/// floored at 1×1.
pub fn constrain_size(
    anchor: Anchor,
    margin: i32,
    parent: Rect,
    screen: Rect,
    requested: Size,
) -> Size {
    // margins come from the client unvalidated; the edge math is done in i64
    // so no value an i32 holds can overflow it
    let margin = i64::from(margin);
    let (width, height) = match anchor {
        Anchor::None => return requested,
        Anchor::Right => {
            let available = i64::from(screen.right()) - (i64::from(parent.right()) + margin);
            (clamp_to(requested.width, available), requested.height)
        }
        Anchor::Left => {
            let available = (i64::from(parent.left()) - margin) - i64::from(screen.left());
            (clamp_to(requested.width, available), requested.height)
        }
        Anchor::Top => {
            let available = (i64::from(parent.top()) - margin) - i64::from(screen.top());
            (requested.width, clamp_to(requested.height, available))
        }
        Anchor::Bottom => {
            let available = i64::from(screen.bottom()) - (i64::from(parent.bottom()) + margin);
            (requested.width, clamp_to(requested.height, available))
        }
    };
    Size::new(width.max(1), height.max(1))
}

fn clamp_to(requested: u32, available: i64) -> u32 {
    if available > 0 && available < i64::from(requested) {
        available as u32
    } else {
        requested
    }
}

/// Position of a surface relative to its parent's origin
///
/// `explicit` is the client-requested position; it is only used for
/// [`Anchor::None`]. For edge anchors the position derives from the parent's
/// extent, the margin and the current surface size, with `offset` sliding the
/// surface along the anchored edge. Coordinates past the representable range
/// saturate.
pub fn anchored_position(
    anchor: Anchor,
    margin: i32,
    offset: i32,
    explicit: (i32, i32),
    parent: Rect,
    size: Size,
) -> (i32, i32) {
    let margin = i64::from(margin);
    match anchor {
        Anchor::None => explicit,
        Anchor::Right => (saturate(i64::from(parent.width) + margin), offset),
        Anchor::Left => (saturate(-i64::from(size.width) - margin), offset),
        Anchor::Top => (offset, saturate(-i64::from(size.height) - margin)),
        Anchor::Bottom => (offset, saturate(i64::from(parent.height) + margin)),
    }
}

fn saturate(coord: i64) -> i32 {
    coord.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}
