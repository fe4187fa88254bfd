// vecraster/content/src/lib.rs
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The geometry frontend: a retained path command list, an adaptive
//! flattener that turns it into closed polylines, and a stroke expander
//! that turns a polyline into fillable polygons.

pub mod path;
pub mod stroke;

pub use path::{FlattenError, Path, PathCommand, Polyline, DEFAULT_FLATTEN_TOLERANCE};
pub use stroke::{LineCap, LineJoin, StrokeStyle};

/// Closes a polyline in place if its last point is not already coincident
/// with its first, within `eps`. Used by both the flattener and the scene
/// packer, which both need "closed within tolerance" rather than "closed
/// exactly".
pub fn ensure_closed(points: &mut Vec<vg_geometry::vector::Vector2F>, eps: f32) {
    if let (Some(&first), Some(&last)) = (points.first(), points.last()) {
        if !first.approx_eq(last, eps) {
            points.push(first);
        }
    }
}
