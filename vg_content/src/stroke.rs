// vecraster/content/src/stroke.rs
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Stroke expansion: turns a polyline, a width, and a join/cap/miter style
//! into zero or more filled polygons, per spec.md §4.C. Every polygon
//! produced here is consumed downstream as an even-odd fill.

use crate::path::Polyline;
use vg_geometry::vector::Vector2F;

const DUPLICATE_EPSILON: f32 = 1e-5;
const PARALLEL_EPSILON: f32 = 1e-5;
const MAX_FAN_STEP: f32 = std::f32::consts::PI / 12.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineJoin {
    Round,
    Bevel,
    Miter,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineCap {
    Round,
    Butt,
    Square,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StrokeStyle {
    pub width: f32,
    pub join: LineJoin,
    pub cap: LineCap,
    pub miter_limit: f32,
}

impl Default for StrokeStyle {
    /// spec.md §6: width 10, round join + round cap, miter limit 4.
    fn default() -> StrokeStyle {
        StrokeStyle { width: 10.0, join: LineJoin::Round, cap: LineCap::Round, miter_limit: 4.0 }
    }
}

#[derive(Clone, Copy, Debug)]
struct Segment {
    p0: Vector2F,
    p1: Vector2F,
    dir: Vector2F,
    left_normal: Vector2F,
}

/// Expands `polyline` into filled polygons implementing `style` at width
/// `style.width`. Returns an empty vec if fewer than two distinct points
/// survive deduplication.
pub fn expand_stroke(polyline: &[Vector2F], style: &StrokeStyle) -> Vec<Polyline> {
    if style.width <= 0.0 {
        return Vec::new();
    }
    let h = style.width * 0.5;

    let points = collapse_duplicates(polyline);
    if points.len() < 2 {
        return Vec::new();
    }
    let closed = points.first().unwrap().approx_eq(*points.last().unwrap(), DUPLICATE_EPSILON);
    // If closed, the collapsed last point duplicates the first; drop it so
    // segment construction doesn't emit a zero-length final segment.
    let ring: Vec<Vector2F> = if closed { points[..points.len() - 1].to_vec() } else { points };
    if closed && ring.len() < 2 {
        return Vec::new();
    }

    let segments = build_segments(&ring, closed);
    if segments.is_empty() {
        return Vec::new();
    }

    let mut polygons = Vec::new();

    for seg in &segments {
        let n = seg.left_normal;
        let quad = vec![
            seg.p0 + n.scale(h),
            seg.p1 + n.scale(h),
            seg.p1 - n.scale(h),
            seg.p0 - n.scale(h),
            seg.p0 + n.scale(h),
        ];
        polygons.push(quad);
    }

    let interior_joins = if closed { segments.len() } else { segments.len() - 1 };
    for i in 0..interior_joins {
        let prev = &segments[i];
        let next = &segments[(i + 1) % segments.len()];
        if let Some(poly) = emit_join(prev, next, h, style.join, style.miter_limit) {
            polygons.push(poly);
        }
    }

    if !closed {
        if let Some(poly) = emit_cap(segments.first().unwrap(), h, style.cap, true) {
            polygons.push(poly);
        }
        if let Some(poly) = emit_cap(segments.last().unwrap(), h, style.cap, false) {
            polygons.push(poly);
        }
    }

    polygons.retain(|p| p.len() >= 4); // >=3 distinct vertices plus the closing repeat.
    polygons
}

fn collapse_duplicates(points: &[Vector2F]) -> Vec<Vector2F> {
    let mut out: Vec<Vector2F> = Vec::with_capacity(points.len());
    for &p in points {
        if out.last().map_or(true, |&last| !last.approx_eq(p, DUPLICATE_EPSILON)) {
            out.push(p);
        }
    }
    out
}

fn build_segments(ring: &[Vector2F], closed: bool) -> Vec<Segment> {
    let mut segments = Vec::with_capacity(ring.len());
    let n = ring.len();
    let last_index = if closed { n } else { n - 1 };
    for i in 0..last_index {
        let p0 = ring[i];
        let p1 = ring[(i + 1) % n];
        let delta = p1 - p0;
        if delta.length() <= DUPLICATE_EPSILON {
            continue;
        }
        let dir = delta.normalize();
        segments.push(Segment { p0, p1, dir, left_normal: dir.left_normal() });
    }
    segments
}

fn emit_join(prev: &Segment, next: &Segment, h: f32, join: LineJoin, miter_limit: f32) -> Option<Polyline> {
    let center = prev.p1;
    let c = prev.dir.cross(next.dir);
    if c.abs() < PARALLEL_EPSILON {
        return None;
    }
    let sign = if c > 0.0 { 1.0 } else { -1.0 };
    let n_prev = prev.left_normal.scale(sign);
    let n_next = next.left_normal.scale(sign);

    match join {
        LineJoin::Bevel => Some(bevel_polygon(center, n_prev, n_next, h)),
        LineJoin::Round => Some(fan_polygon(center, n_prev, n_next, h, sign)),
        LineJoin::Miter => {
            let a = center + n_prev.scale(h);
            let b = center + n_next.scale(h);
            let denom = prev.dir.cross(next.dir);
            if denom.abs() < PARALLEL_EPSILON {
                return Some(bevel_polygon(center, n_prev, n_next, h));
            }
            let t = (b - a).cross(next.dir) / denom;
            let intersection = a + prev.dir.scale(t);
            let limit = h * miter_limit.max(1.0);
            if (intersection - center).length() <= limit {
                Some(vec![center, a, intersection, b, center])
            } else {
                Some(bevel_polygon(center, n_prev, n_next, h))
            }
        }
    }
}

fn bevel_polygon(center: Vector2F, n_prev: Vector2F, n_next: Vector2F, h: f32) -> Polyline {
    vec![center, center + n_prev.scale(h), center + n_next.scale(h), center]
}

fn fan_polygon(center: Vector2F, n_prev: Vector2F, n_next: Vector2F, h: f32, sign: f32) -> Polyline {
    let angle_from = n_prev.angle();
    let mut delta = n_next.angle() - angle_from;
    // Normalize into (-pi, pi], then force the sweep direction to match the
    // turn direction (sign), per spec.md §4.C step 4.
    while delta <= -std::f32::consts::PI {
        delta += 2.0 * std::f32::consts::PI;
    }
    while delta > std::f32::consts::PI {
        delta -= 2.0 * std::f32::consts::PI;
    }
    if sign > 0.0 && delta < 0.0 {
        delta += 2.0 * std::f32::consts::PI;
    } else if sign < 0.0 && delta > 0.0 {
        delta -= 2.0 * std::f32::consts::PI;
    }

    let mut poly = vec![center];
    poly.extend(arc_fan(center, h, angle_from, angle_from + delta));
    poly.push(center);
    poly
}

/// Samples points along a circular arc from `angle_from` to `angle_to`
/// (which may wind more than once in sign but not in magnitude beyond
/// `2*pi`), with steps no larger than `MAX_FAN_STEP` and at least two steps.
fn arc_fan(center: Vector2F, radius: f32, angle_from: f32, angle_to: f32) -> Vec<Vector2F> {
    let delta = angle_to - angle_from;
    let steps = ((delta.abs() / MAX_FAN_STEP).ceil() as u32).max(2);
    let mut points = Vec::with_capacity(steps as usize + 1);
    for i in 0..=steps {
        let theta = angle_from + delta * (i as f32 / steps as f32);
        points.push(center + Vector2F::new(theta.cos(), theta.sin()).scale(radius));
    }
    points
}

fn emit_cap(seg: &Segment, h: f32, cap: LineCap, is_start: bool) -> Option<Polyline> {
    let (point, dir, n) = if is_start {
        (seg.p0, seg.dir, seg.left_normal)
    } else {
        (seg.p1, seg.dir, seg.left_normal)
    };
    let outward = if is_start { -dir } else { dir };

    match cap {
        LineCap::Butt => None,
        LineCap::Square => {
            let ext = outward.scale(h);
            Some(vec![
                point + n.scale(h),
                point + n.scale(h) + ext,
                point - n.scale(h) + ext,
                point - n.scale(h),
                point + n.scale(h),
            ])
        }
        LineCap::Round => {
            let outward_angle = outward.angle();
            let mut poly = vec![point + n.scale(h)];
            poly.extend(arc_fan(point, h, outward_angle - std::f32::consts::FRAC_PI_2, outward_angle + std::f32::consts::FRAC_PI_2));
            poly.push(point + n.scale(h));
            Some(poly)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck::quickcheck;

    /// Local even-odd point-in-polygon test, duplicated here (rather than
    /// depending on `vg_raster`) purely so this property test can check
    /// stroke coverage without introducing a cross-crate dev-dependency.
    fn point_in_polygon(poly: &[Vector2F], p: Vector2F) -> bool {
        let n = poly.len();
        if n < 2 {
            return false;
        }
        let mut inside = false;
        let mut j = n - 1;
        for i in 0..n {
            let vi = poly[i];
            let vj = poly[j];
            if (vi.y > p.y) != (vj.y > p.y) {
                let x_intersect = (vj.x - vi.x) * (p.y - vi.y) / (vj.y - vi.y + 1e-6) + vi.x;
                if p.x < x_intersect {
                    inside = !inside;
                }
            }
            j = i;
        }
        inside
    }

    fn point_in_any(polys: &[Polyline], p: Vector2F) -> bool {
        polys.iter().any(|poly| point_in_polygon(poly, p))
    }

    /// spec.md §8: "the generated polygons' union contains every point on
    /// the original polyline within distance <= w/2 in the direction
    /// perpendicular to the local tangent" — sampled along each segment's
    /// midpoint, offset inward by a safety margin to stay clear of join/cap
    /// seams where coverage is only guaranteed up to numerical precision.
    fn stroke_covers_offset_points(dx: i16, dy: i16, width: u8) -> bool {
        let width = (width as f32 / 4.0).max(2.0);
        let p0 = Vector2F::new(0.0, 0.0);
        let p1 = Vector2F::new((dx as f32 / 50.0).max(-600.0).min(600.0), (dy as f32 / 50.0).max(-600.0).min(600.0));
        if (p1 - p0).length() < 5.0 {
            return true; // degenerate input, not a meaningful segment
        }
        let polyline = vec![p0, p1];
        let style = StrokeStyle { width, join: LineJoin::Round, cap: LineCap::Round, miter_limit: 4.0 };
        let polys = expand_stroke(&polyline, &style);
        if polys.is_empty() {
            return false;
        }

        let dir = (p1 - p0).normalize();
        let normal = dir.left_normal();
        let mid = p0.lerp(p1, 0.5);
        // Offset just inside the half-width, away from the polygon boundary.
        let h = width * 0.5 * 0.8;
        point_in_any(&polys, mid + normal.scale(h)) && point_in_any(&polys, mid - normal.scale(h))
    }

    quickcheck! {
        fn prop_stroke_covers_offset_points(dx: i16, dy: i16, width: u8) -> bool {
            stroke_covers_offset_points(dx, dy, width)
        }
    }

    #[test]
    fn zero_width_produces_nothing() {
        let polyline = vec![Vector2F::zero(), Vector2F::new(10.0, 0.0)];
        let style = StrokeStyle { width: 0.0, ..Default::default() };
        assert!(expand_stroke(&polyline, &style).is_empty());
    }

    #[test]
    fn straight_open_polyline_with_butt_caps_has_one_quad() {
        let polyline = vec![Vector2F::zero(), Vector2F::new(100.0, 0.0)];
        let style = StrokeStyle { width: 10.0, join: LineJoin::Miter, cap: LineCap::Butt, miter_limit: 4.0 };
        let polys = expand_stroke(&polyline, &style);
        assert_eq!(polys.len(), 1);
    }

    #[test]
    fn square_caps_add_two_polygons() {
        let polyline = vec![Vector2F::zero(), Vector2F::new(100.0, 0.0)];
        let style = StrokeStyle { width: 10.0, join: LineJoin::Miter, cap: LineCap::Square, miter_limit: 4.0 };
        let polys = expand_stroke(&polyline, &style);
        assert_eq!(polys.len(), 3); // one segment quad + two caps
    }

    #[test]
    fn sharp_miter_falls_back_to_bevel() {
        // polyline [(0,0),(100,0),(100,1)], width 20, miter, miterLimit 2:
        // spec.md §8 scenario 4. Expected polygon count = 2 segments + 1
        // join (bevel, since the miter exceeds the limit) + 2 caps = 5.
        let polyline =
            vec![Vector2F::new(0.0, 0.0), Vector2F::new(100.0, 0.0), Vector2F::new(100.0, 1.0)];
        let style = StrokeStyle { width: 20.0, join: LineJoin::Miter, cap: LineCap::Round, miter_limit: 2.0 };
        let polys = expand_stroke(&polyline, &style);
        assert_eq!(polys.len(), 5);
    }

    #[test]
    fn closed_polyline_has_no_caps() {
        let polyline = vec![
            Vector2F::new(0.0, 0.0),
            Vector2F::new(10.0, 0.0),
            Vector2F::new(10.0, 10.0),
            Vector2F::new(0.0, 10.0),
            Vector2F::new(0.0, 0.0),
        ];
        let style = StrokeStyle { width: 4.0, join: LineJoin::Bevel, cap: LineCap::Round, miter_limit: 4.0 };
        let polys = expand_stroke(&polyline, &style);
        // 4 segment quads + 4 joins, no caps.
        assert_eq!(polys.len(), 8);
    }
}
