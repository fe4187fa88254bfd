// vecraster/scene/src/binner.rs
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The tile binner, spec.md §4.F: bounding-box computation, per-tile shape
//! counting, exclusive prefix scan, and scatter into the per-tile shape
//! list. `BinnerArena` owns the transient counts/offsets/cursors scratch so
//! callers can reuse it frame to frame instead of reallocating at large
//! tile counts (spec.md §5 "Scratch reuse", §9 Design Notes).

use crate::records::ShapeRecord;
use vg_geometry::util::clamp_i32;
use vg_geometry::vector::Vector2F;

/// Scratch buffers for one binning pass, reusable across frames. Borrowed
/// (not owned) by the binner for the duration of a single `bin_shapes`
/// call, per the Design Notes' "treat the reusable buffer as borrowed
/// during binning".
#[derive(Default)]
pub struct BinnerArena {
    counts: Vec<u32>,
    offsets: Vec<u32>,
    cursors: Vec<u32>,
}

impl BinnerArena {
    pub fn new() -> BinnerArena {
        BinnerArena::default()
    }

    fn reset(&mut self, tile_count: usize) {
        self.counts.clear();
        self.counts.resize(tile_count, 0);
        self.offsets.clear();
        self.offsets.resize(tile_count, 0);
        self.cursors.clear();
        self.cursors.resize(tile_count, 0);
    }
}

/// The tile tables a [`crate::scene::PackedScene`] attaches to its shape
/// records: `tileOffsetCounts` and `tileShapeIndices` of spec.md §3.
pub struct TileTables {
    pub tiles_x: u32,
    pub tiles_y: u32,
    pub tile_offset_counts: Vec<u32>,
    pub tile_shape_indices: Vec<u32>,
}

/// Bins `shapes` (whose vertices live in `vertices`) into `tiles_x *
/// tiles_y` buckets of `tile_size` pixels, per spec.md §4.F steps 1-6.
/// Degenerate shapes (empty AABB, zero vertex count, inverted ranges) are
/// skipped, per spec.md's "Degenerate shapes" note.
pub fn bin_shapes(
    shapes: &[ShapeRecord],
    vertices: &[Vector2F],
    canvas_w: u32,
    canvas_h: u32,
    tile_size: u32,
    arena: &mut BinnerArena,
) -> TileTables {
    let tile_size = tile_size.max(1);
    let tiles_x = ((canvas_w + tile_size - 1) / tile_size).max(1);
    let tiles_y = ((canvas_h + tile_size - 1) / tile_size).max(1);
    let tile_count = (tiles_x * tiles_y) as usize;
    arena.reset(tile_count);

    // Step 2: per-shape AABB -> tile range, recorded for reuse in the
    // scatter pass.
    let mut ranges: Vec<Option<(u32, u32, u32, u32)>> = Vec::with_capacity(shapes.len());
    for shape in shapes {
        ranges.push(shape_tile_range(shape, vertices, tile_size, tiles_x, tiles_y));
    }

    // Step 3: counts pass.
    for range in ranges.iter().flatten() {
        let &(min_tx, max_tx, min_ty, max_ty) = range;
        for ty in min_ty..=max_ty {
            for tx in min_tx..=max_tx {
                arena.counts[(ty * tiles_x + tx) as usize] += 1;
            }
        }
    }

    // Step 4: exclusive scan.
    let mut total: u32 = 0;
    for i in 0..tile_count {
        arena.offsets[i] = total;
        total += arena.counts[i];
    }
    arena.cursors.copy_from_slice(&arena.offsets);

    // Step 5: scatter pass, preserving submission order within each tile.
    let mut tile_shape_indices = vec![0u32; total as usize];
    for (shape_index, range) in ranges.iter().enumerate() {
        if let Some((min_tx, max_tx, min_ty, max_ty)) = *range {
            for ty in min_ty..=max_ty {
                for tx in min_tx..=max_tx {
                    let t = (ty * tiles_x + tx) as usize;
                    let cursor = arena.cursors[t];
                    tile_shape_indices[cursor as usize] = shape_index as u32;
                    arena.cursors[t] += 1;
                }
            }
        }
    }

    // Step 6: interleave offsets and counts.
    let mut tile_offset_counts = vec![0u32; tile_count * 2];
    for i in 0..tile_count {
        tile_offset_counts[2 * i] = arena.offsets[i];
        tile_offset_counts[2 * i + 1] = arena.counts[i];
    }

    TileTables { tiles_x, tiles_y, tile_offset_counts, tile_shape_indices }
}

fn shape_tile_range(
    shape: &ShapeRecord,
    vertices: &[Vector2F],
    tile_size: u32,
    tiles_x: u32,
    tiles_y: u32,
) -> Option<(u32, u32, u32, u32)> {
    if shape.v_count == 0 {
        return None;
    }
    let start = shape.v_start as usize;
    let end = start + shape.v_count as usize;
    let verts = vertices.get(start..end)?;
    let mut min = verts[0];
    let mut max = verts[0];
    for &v in &verts[1..] {
        min = min.min(v);
        max = max.max(v);
    }
    let min_tx = clamp_i32((min.x / tile_size as f32).floor() as i32, 0, tiles_x as i32 - 1) as u32;
    let min_ty = clamp_i32((min.y / tile_size as f32).floor() as i32, 0, tiles_y as i32 - 1) as u32;
    let max_tx = clamp_i32((max.x / tile_size as f32).floor() as i32, 0, tiles_x as i32 - 1) as u32;
    let max_ty = clamp_i32((max.y / tile_size as f32).floor() as i32, 0, tiles_y as i32 - 1) as u32;
    if max_tx < min_tx || max_ty < min_ty {
        return None;
    }
    Some((min_tx, max_tx, min_ty, max_ty))
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck::{quickcheck, TestResult};

    fn shape(v_start: u32, v_count: u32) -> ShapeRecord {
        ShapeRecord {
            v_start,
            v_count,
            rule: 0,
            _pad0: 0,
            color: [0.0; 4],
            clip_start: 0,
            clip_count: 0,
            mask_start: 0,
            mask_count: 0,
            opacity: 1.0,
            _pad1: [0.0; 3],
        }
    }

    #[test]
    fn two_shapes_determinism_matches_spec_scenario() {
        // spec.md §8 scenario 6: two shapes covering tiles {0} and {0,1}.
        // Canvas 128x64, tile 64 -> tiles_x=2, tiles_y=1.
        let vertices = vec![
            // shape 0: fully inside tile 0.
            Vector2F::new(1.0, 1.0),
            Vector2F::new(10.0, 1.0),
            Vector2F::new(10.0, 10.0),
            Vector2F::new(1.0, 1.0),
            // shape 1: spans tile 0 and tile 1.
            Vector2F::new(50.0, 1.0),
            Vector2F::new(80.0, 1.0),
            Vector2F::new(80.0, 10.0),
            Vector2F::new(50.0, 1.0),
        ];
        let shapes = vec![shape(0, 4), shape(4, 4)];
        let mut arena = BinnerArena::new();
        let tables = bin_shapes(&shapes, &vertices, 128, 64, 64, &mut arena);

        assert_eq!(tables.tiles_x, 2);
        assert_eq!(tables.tiles_y, 1);
        assert_eq!(&tables.tile_offset_counts[0..4], &[0, 2, 2, 1]);
        assert_eq!(tables.tile_shape_indices, vec![0, 1, 1]);
    }

    #[test]
    fn empty_shape_is_skipped() {
        let vertices: Vec<Vector2F> = Vec::new();
        let shapes = vec![shape(0, 0)];
        let mut arena = BinnerArena::new();
        let tables = bin_shapes(&shapes, &vertices, 64, 64, 64, &mut arena);
        assert_eq!(tables.tile_shape_indices.len(), 0);
    }

    #[test]
    fn arena_reuse_produces_same_result_twice() {
        let vertices = vec![
            Vector2F::new(1.0, 1.0),
            Vector2F::new(10.0, 1.0),
            Vector2F::new(10.0, 10.0),
            Vector2F::new(1.0, 1.0),
        ];
        let shapes = vec![shape(0, 4)];
        let mut arena = BinnerArena::new();
        let first = bin_shapes(&shapes, &vertices, 64, 64, 64, &mut arena);
        let second = bin_shapes(&shapes, &vertices, 64, 64, 64, &mut arena);
        assert_eq!(first.tile_shape_indices, second.tile_shape_indices);
        assert_eq!(first.tile_offset_counts, second.tile_offset_counts);
    }

    /// spec.md §8: "for every shape s, the interval [offsets[t],
    /// offsets[t]+counts[t]) contains s exactly once per tile t intersecting
    /// AABB(s)", and ids within a tile segment stay in submission order.
    fn tile_membership_matches_aabb(seed: Vec<(u8, u8, u8, u8)>) -> TestResult {
        if seed.is_empty() || seed.len() > 12 {
            return TestResult::discard();
        }
        let canvas_w = 128u32;
        let canvas_h = 128u32;
        let tile_size = 32u32;

        let mut vertices = Vec::new();
        let mut shapes = Vec::new();
        let mut aabbs = Vec::new();
        for &(x, y, w, h) in &seed {
            let x0 = x as f32;
            let y0 = y as f32;
            let w = (w as f32).max(1.0);
            let h = (h as f32).max(1.0);
            let x1 = x0 + w;
            let y1 = y0 + h;
            let v_start = vertices.len() as u32;
            vertices.push(Vector2F::new(x0, y0));
            vertices.push(Vector2F::new(x1, y0));
            vertices.push(Vector2F::new(x1, y1));
            vertices.push(Vector2F::new(x0, y1));
            shapes.push(shape(v_start, 4));
            aabbs.push((x0, x1, y0, y1));
        }

        let mut arena = BinnerArena::new();
        let tables = bin_shapes(&shapes, &vertices, canvas_w, canvas_h, tile_size, &mut arena);

        for (shape_idx, &(x0, x1, y0, y1)) in aabbs.iter().enumerate() {
            let min_tx = clamp_i32((x0 / tile_size as f32).floor() as i32, 0, tables.tiles_x as i32 - 1) as u32;
            let max_tx = clamp_i32((x1 / tile_size as f32).floor() as i32, 0, tables.tiles_x as i32 - 1) as u32;
            let min_ty = clamp_i32((y0 / tile_size as f32).floor() as i32, 0, tables.tiles_y as i32 - 1) as u32;
            let max_ty = clamp_i32((y1 / tile_size as f32).floor() as i32, 0, tables.tiles_y as i32 - 1) as u32;
            for ty in min_ty..=max_ty {
                for tx in min_tx..=max_tx {
                    let t = (ty * tables.tiles_x + tx) as usize;
                    let start = tables.tile_offset_counts[2 * t] as usize;
                    let count = tables.tile_offset_counts[2 * t + 1] as usize;
                    let segment = &tables.tile_shape_indices[start..start + count];
                    let occurrences = segment.iter().filter(|&&id| id as usize == shape_idx).count();
                    if occurrences != 1 {
                        return TestResult::error(format!(
                            "shape {} expected once in tile {}, found {}",
                            shape_idx, t, occurrences
                        ));
                    }
                }
            }
        }

        // Every per-tile segment must be strictly increasing (submission
        // order preserved, no duplicate scatter).
        for t in 0..(tables.tiles_x * tables.tiles_y) as usize {
            let start = tables.tile_offset_counts[2 * t] as usize;
            let count = tables.tile_offset_counts[2 * t + 1] as usize;
            let segment = &tables.tile_shape_indices[start..start + count];
            for w in segment.windows(2) {
                if w[0] >= w[1] {
                    return TestResult::error("tile segment not strictly increasing");
                }
            }
        }

        TestResult::passed()
    }

    quickcheck! {
        fn prop_tile_membership_matches_aabb(seed: Vec<(u8, u8, u8, u8)>) -> TestResult {
            tile_membership_matches_aabb(seed)
        }
    }
}
