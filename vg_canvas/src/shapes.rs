// vecraster/canvas/src/shapes.rs
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Parametric shape helpers that supplement the core scripting surface,
//! per SPEC_FULL.md §6 ("Supplement features").

use std::f32::consts::PI;
use vg_geometry::vector::Vector2F;

/// Returns the `2*n` alternating-radius points of a star polygon centered
/// at `(cx, cy)`, starting at the top (angle `-PI/2`) and proceeding
/// clockwise. `n` is the number of outer points; `n < 2` degenerates to an
/// empty polygon.
pub fn star(cx: f32, cy: f32, r_out: f32, r_in: f32, n: u32) -> Vec<Vector2F> {
    if n < 2 {
        return Vec::new();
    }
    let step = PI / n as f32;
    (0..2 * n)
        .map(|i| {
            let angle = -PI / 2.0 + step * i as f32;
            let radius = if i % 2 == 0 { r_out } else { r_in };
            Vector2F::new(cx + radius * angle.cos(), cy + radius * angle.sin())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn star_produces_two_n_points() {
        let points = star(0.0, 0.0, 10.0, 4.0, 5);
        assert_eq!(points.len(), 10);
    }

    #[test]
    fn star_first_point_is_directly_above_center() {
        let points = star(0.0, 0.0, 10.0, 4.0, 5);
        assert!((points[0].x).abs() < 1e-4);
        assert!((points[0].y - (-10.0)).abs() < 1e-4);
    }

    #[test]
    fn star_alternates_outer_and_inner_radius() {
        let points = star(1.0, 2.0, 10.0, 4.0, 6);
        for (i, p) in points.iter().enumerate() {
            let radius = ((p.x - 1.0).powi(2) + (p.y - 2.0).powi(2)).sqrt();
            let expected = if i % 2 == 0 { 10.0 } else { 4.0 };
            assert!((radius - expected).abs() < 1e-3);
        }
    }

    #[test]
    fn degenerate_star_with_fewer_than_two_points_is_empty() {
        assert!(star(0.0, 0.0, 10.0, 4.0, 1).is_empty());
        assert!(star(0.0, 0.0, 10.0, 4.0, 0).is_empty());
    }
}
