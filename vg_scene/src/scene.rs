// vecraster/scene/src/scene.rs
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! `PackedScene`: the immutable buffers [`crate::packer::ScenePacker::build`]
//! produces, plus the invariant validation and byte-buffer round-trip that
//! spec.md §7/§8 call for.

use crate::error::PackError;
use crate::records::{
    ClipRecord, MaskRecord, ShapeRecord, Uniforms, CLIP_RECORD_SIZE, MASK_RECORD_SIZE,
    SHAPE_RECORD_SIZE,
};
use vg_geometry::vector::Vector2F;

/// The packed scene a frame's worth of authoring calls compiles down to.
/// Immutable once constructed (spec.md §3 "Lifecycle"): GPU buffers derived
/// from it are owned by the renderer and rebuilt next frame.
#[derive(Clone, Debug, PartialEq)]
pub struct PackedScene {
    pub uniforms: Uniforms,
    /// Shape verts, then clip verts, then mask verts, per spec.md §3
    /// "Vertex buffer".
    pub vertices: Vec<Vector2F>,
    pub shapes: Vec<ShapeRecord>,
    pub clips: Vec<ClipRecord>,
    pub masks: Vec<MaskRecord>,
    /// Clip refs, then mask refs, per spec.md §3 "Reference buffer".
    pub refs: Vec<u32>,
    pub clip_ref_total: u32,
    pub tile_offset_counts: Vec<u32>,
    pub tile_shape_indices: Vec<u32>,
}

impl PackedScene {
    #[inline]
    pub fn tiles_y(&self) -> u32 {
        let tile_size = self.uniforms.tile_size.max(1);
        (self.uniforms.canvas_h + tile_size - 1) / tile_size
    }

    /// Validates invariants 1-6 of spec.md §3. Callable unconditionally
    /// (unlike the `debug_assert!`s `ScenePacker::build` also runs), for
    /// tests and fuzzers, per SPEC_FULL.md §6.
    pub fn validate(&self) -> Result<(), PackError> {
        let tile_size = self.uniforms.tile_size.max(1);
        let expected_tiles_x = {
            // spec.md invariant 5 is stated in terms of the canvas
            // dimensions the uniforms carry; `tiles_x` itself is already
            // stored, so this recomputes it for comparison.
            (self.uniforms.canvas_w + tile_size - 1) / tile_size
        };
        if self.uniforms.tiles_x != expected_tiles_x.max(1) {
            return Err(PackError::InvariantViolation(format!(
                "tiles_x {} does not match ceil(canvas_w/tile_size) {}",
                self.uniforms.tiles_x, expected_tiles_x
            )));
        }
        let tiles_y = self.tiles_y();
        let tile_count = (self.uniforms.tiles_x as usize) * (tiles_y as usize);
        if self.tile_offset_counts.len() != tile_count * 2 {
            return Err(PackError::InvariantViolation(format!(
                "tile_offset_counts length {} does not match 2*tile_count {}",
                self.tile_offset_counts.len(),
                tile_count * 2
            )));
        }

        let mut running_total: u32 = 0;
        for t in 0..tile_count {
            let offset = self.tile_offset_counts[2 * t];
            let count = self.tile_offset_counts[2 * t + 1];
            if offset != running_total {
                return Err(PackError::InvariantViolation(format!(
                    "tile {} offset {} does not match running total {}",
                    t, offset, running_total
                )));
            }
            let segment = &self.tile_shape_indices[offset as usize..(offset + count) as usize];
            for pair in segment.windows(2) {
                if pair[1] <= pair[0] {
                    return Err(PackError::InvariantViolation(format!(
                        "tile {} shape ids not strictly increasing: {:?}",
                        t, segment
                    )));
                }
            }
            running_total += count;
        }
        if running_total as usize != self.tile_shape_indices.len() {
            // Invariant 1.
            return Err(PackError::InvariantViolation(format!(
                "sum of counts {} does not match |tileShapeIndices| {}",
                running_total,
                self.tile_shape_indices.len()
            )));
        }

        for (i, shape) in self.shapes.iter().enumerate() {
            let start = shape.v_start as usize;
            let end = start + shape.v_count as usize;
            let verts = self.vertices.get(start..end).ok_or_else(|| {
                PackError::InvariantViolation(format!("shape {} vertex range out of bounds", i))
            })?;
            // Invariant 3.
            if verts.len() < 4 {
                return Err(PackError::InvariantViolation(format!(
                    "shape {} has fewer than 3 distinct vertices",
                    i
                )));
            }
            if !verts.first().unwrap().approx_eq(*verts.last().unwrap(), 1e-3) {
                return Err(PackError::InvariantViolation(format!("shape {} is not closed", i)));
            }
            // Invariant 4.
            if shape.clip_start + shape.clip_count > self.clip_ref_total {
                return Err(PackError::InvariantViolation(format!(
                    "shape {} clip span exceeds clip_ref_total",
                    i
                )));
            }
            if shape.mask_start + shape.mask_count > self.refs.len() as u32 {
                return Err(PackError::InvariantViolation(format!(
                    "shape {} mask span exceeds refs length",
                    i
                )));
            }
            // Invariant 6.
            if shape.opacity < -1e-5 || shape.opacity > 1.0 + 1e-5 {
                return Err(PackError::InvariantViolation(format!(
                    "shape {} opacity {} out of [0,1]",
                    i, shape.opacity
                )));
            }
        }

        Ok(())
    }

    fn shape_bytes(&self) -> Vec<u8> {
        let mut out = vec![0u8; self.shapes.len() * SHAPE_RECORD_SIZE];
        for (i, record) in self.shapes.iter().enumerate() {
            record.write_le(&mut out[i * SHAPE_RECORD_SIZE..(i + 1) * SHAPE_RECORD_SIZE]);
        }
        out
    }

    fn clip_bytes(&self) -> Vec<u8> {
        let mut out = vec![0u8; self.clips.len() * CLIP_RECORD_SIZE];
        for (i, record) in self.clips.iter().enumerate() {
            record.write_le(&mut out[i * CLIP_RECORD_SIZE..(i + 1) * CLIP_RECORD_SIZE]);
        }
        out
    }

    fn mask_bytes(&self) -> Vec<u8> {
        let mut out = vec![0u8; self.masks.len() * MASK_RECORD_SIZE];
        for (i, record) in self.masks.iter().enumerate() {
            record.write_le(&mut out[i * MASK_RECORD_SIZE..(i + 1) * MASK_RECORD_SIZE]);
        }
        out
    }

    /// Reconstructs shape/clip/mask records from their serialized
    /// little-endian byte form. `scene = build(); rebuild(scene) == scene`
    /// (spec.md §8 "Round-trips"): callers compare the result against
    /// `self.shapes`/`self.clips`/`self.masks`.
    pub fn rebuild_records(&self) -> (Vec<ShapeRecord>, Vec<ClipRecord>, Vec<MaskRecord>) {
        let shapes = self
            .shape_bytes()
            .chunks(SHAPE_RECORD_SIZE)
            .map(ShapeRecord::read_le)
            .collect();
        let clips = self.clip_bytes().chunks(CLIP_RECORD_SIZE).map(ClipRecord::read_le).collect();
        let masks = self.mask_bytes().chunks(MASK_RECORD_SIZE).map(MaskRecord::read_le).collect();
        (shapes, clips, masks)
    }
}
