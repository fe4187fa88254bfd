// vecraster/svg/src/arc.rs
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The SVG 1.1 endpoint-to-center elliptical arc algorithm, converting an
//! `A`/`a` path command into a sequence of cubic Béziers. See spec.md §4.B.

use vg_geometry::vector::Vector2F;

const EPSILON: f32 = 1e-6;

/// Converts one SVG arc segment into absolute-coordinate cubic Bézier
/// triples `(c1, c2, endpoint)`. `rotation` is in radians.
pub fn arc_to_cubics(
    p0: Vector2F,
    rx: f32,
    ry: f32,
    rotation: f32,
    large_arc: bool,
    sweep: bool,
    p1: Vector2F,
) -> Vec<(Vector2F, Vector2F, Vector2F)> {
    if p0.approx_eq(p1, EPSILON) {
        return Vec::new();
    }
    if rx.abs() < EPSILON || ry.abs() < EPSILON {
        // Degenerate ellipse: a straight line, represented as a colinear
        // cubic so the caller can always treat arcs uniformly.
        let c1 = p0.lerp(p1, 1.0 / 3.0);
        let c2 = p0.lerp(p1, 2.0 / 3.0);
        return vec![(c1, c2, p1)];
    }

    let (mut rx, mut ry) = (rx.abs(), ry.abs());
    let (sin_phi, cos_phi) = rotation.sin_cos();

    // Step 1: compute (x1', y1'), the endpoint in the ellipse's rotated frame.
    let half_delta = (p0 - p1).scale(0.5);
    let x1p = cos_phi * half_delta.x + sin_phi * half_delta.y;
    let y1p = -sin_phi * half_delta.x + cos_phi * half_delta.y;

    // Step 2: correct out-of-range radii.
    let lambda = (x1p * x1p) / (rx * rx) + (y1p * y1p) / (ry * ry);
    if lambda > 1.0 {
        let scale = lambda.sqrt();
        rx *= scale;
        ry *= scale;
    }

    // Step 3: compute the center in the rotated frame.
    let rx2 = rx * rx;
    let ry2 = ry * ry;
    let x1p2 = x1p * x1p;
    let y1p2 = y1p * y1p;
    let sign: f32 = if large_arc == sweep { -1.0 } else { 1.0 };
    let num = rx2 * ry2 - rx2 * y1p2 - ry2 * x1p2;
    let denom = rx2 * y1p2 + ry2 * x1p2;
    let co = sign * (num.max(0.0) / denom.max(EPSILON)).sqrt();
    let cxp = co * (rx * y1p) / ry;
    let cyp = co * -(ry * x1p) / rx;

    // Step 4: transform the center back to the original coordinate system.
    let center = Vector2F::new(
        cos_phi * cxp - sin_phi * cyp + (p0.x + p1.x) * 0.5,
        sin_phi * cxp + cos_phi * cyp + (p0.y + p1.y) * 0.5,
    );

    // Step 5: derive theta1 and delta-theta.
    let ux = (x1p - cxp) / rx;
    let uy = (y1p - cyp) / ry;
    let vx = (-x1p - cxp) / rx;
    let vy = (-y1p - cyp) / ry;

    let theta1 = vector_angle(1.0, 0.0, ux, uy);
    let mut delta = vector_angle(ux, uy, vx, vy);
    if !sweep && delta > 0.0 {
        delta -= 2.0 * std::f32::consts::PI;
    } else if sweep && delta < 0.0 {
        delta += 2.0 * std::f32::consts::PI;
    }

    // Step 6: split into subarcs no larger than pi/2 and convert each to a
    // cubic via the k = (4/3)*tan(delta/4) tangent-length rule.
    let subarc_count = (delta.abs() / std::f32::consts::FRAC_PI_2).ceil().max(1.0) as u32;
    let sub_delta = delta / subarc_count as f32;

    let mut cubics = Vec::with_capacity(subarc_count as usize);
    let mut theta = theta1;
    for i in 0..subarc_count {
        let theta_next = theta + sub_delta;
        let (c1_unit, c2_unit, p1_unit) = unit_arc_to_cubic(theta, theta_next);
        let p0_unit = Vector2F::new(theta.cos(), theta.sin());
        let transform = |v: Vector2F| -> Vector2F {
            let scaled = Vector2F::new(v.x * rx, v.y * ry);
            Vector2F::new(cos_phi * scaled.x - sin_phi * scaled.y, sin_phi * scaled.x + cos_phi * scaled.y)
                + center
        };
        let _ = p0_unit; // implicit start point is the previous cubic's endpoint
        let end_point = if i == subarc_count - 1 { p1 } else { transform(p1_unit) };
        cubics.push((transform(c1_unit), transform(c2_unit), end_point));
        theta = theta_next;
    }
    cubics
}

/// The signed angle (in `(-pi, pi]`) from vector `(ux,uy)` to `(vx,vy)`.
fn vector_angle(ux: f32, uy: f32, vx: f32, vy: f32) -> f32 {
    let dot = ux * vx + uy * vy;
    let len = ((ux * ux + uy * uy) * (vx * vx + vy * vy)).sqrt();
    let cos_angle = (dot / len.max(EPSILON)).max(-1.0).min(1.0);
    let angle = cos_angle.acos();
    let cross = ux * vy - uy * vx;
    if cross < 0.0 {
        -angle
    } else {
        angle
    }
}

/// Converts a unit-circle arc from `theta0` to `theta1` (|theta1-theta0| <=
/// pi/2) into a cubic Bézier `(c1, c2, endpoint)` still in unit-circle
/// space, using the standard tangent-length rule `k = (4/3)*tan(delta/4)`.
fn unit_arc_to_cubic(theta0: f32, theta1: f32) -> (Vector2F, Vector2F, Vector2F) {
    let delta = theta1 - theta0;
    let k = (4.0 / 3.0) * (delta / 4.0).tan();
    let p0 = Vector2F::new(theta0.cos(), theta0.sin());
    let p1 = Vector2F::new(theta1.cos(), theta1.sin());
    let t0 = Vector2F::new(-theta0.sin(), theta0.cos());
    let t1 = Vector2F::new(-theta1.sin(), theta1.cos());
    let c1 = p0 + t0.scale(k);
    let c2 = p1 - t1.scale(k);
    (c1, c2, p1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn semicircle_produces_cubics_reaching_endpoint() {
        let p0 = Vector2F::new(0.0, 0.0);
        let p1 = Vector2F::new(100.0, 0.0);
        let cubics = arc_to_cubics(p0, 50.0, 50.0, 0.0, false, true, p1);
        assert!(!cubics.is_empty());
        let last = cubics.last().unwrap().2;
        assert!(last.approx_eq(p1, 1e-2));
    }

    #[test]
    fn degenerate_zero_radius_is_a_line() {
        let p0 = Vector2F::new(0.0, 0.0);
        let p1 = Vector2F::new(10.0, 10.0);
        let cubics = arc_to_cubics(p0, 0.0, 5.0, 0.0, false, true, p1);
        assert_eq!(cubics.len(), 1);
        assert_eq!(cubics[0].2, p1);
    }

    #[test]
    fn coincident_endpoints_produce_no_segment() {
        let p = Vector2F::new(5.0, 5.0);
        assert!(arc_to_cubics(p, 10.0, 10.0, 0.0, false, true, p).is_empty());
    }

    #[test]
    fn large_arc_flag_chooses_longer_path() {
        let p0 = Vector2F::new(0.0, 0.0);
        let p1 = Vector2F::new(100.0, 0.0);
        let short = arc_to_cubics(p0, 60.0, 60.0, 0.0, false, true, p1);
        let long = arc_to_cubics(p0, 60.0, 60.0, 0.0, true, true, p1);
        assert!(long.len() >= short.len());
    }
}
