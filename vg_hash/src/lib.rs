// vecraster/hash/src/lib.rs
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! A deterministic content hash over a [`PackedScene`]'s buffers, used for
//! byte-for-byte parity tests between the CPU and (future) GPU backends
//! (spec.md component table row I, §8 "Byte-for-byte frame parity").
//!
//! Every field is hashed in a fixed, explicit order rather than by
//! deriving `Hash` on the buffer types, so the hash stays stable across
//! struct field reordering and is immune to `HashMap`/`HashSet` iteration
//! order (there is none here — everything is a `Vec`).

use fxhash::FxHasher64;
use std::hash::Hasher;
use vg_scene::records::{ClipRecord, MaskRecord, ShapeRecord, Uniforms};
use vg_scene::scene::PackedScene;

/// Hashes every buffer of `scene` in a fixed order: uniforms, vertices,
/// shapes, clips, masks, refs, tile tables.
pub fn hash_scene(scene: &PackedScene) -> u64 {
    let mut hasher = FxHasher64::default();
    hash_uniforms(&scene.uniforms, &mut hasher);

    hasher.write_usize(scene.vertices.len());
    for v in &scene.vertices {
        hasher.write_u32(v.x.to_bits());
        hasher.write_u32(v.y.to_bits());
    }

    hasher.write_usize(scene.shapes.len());
    for shape in &scene.shapes {
        hash_shape(shape, &mut hasher);
    }

    hasher.write_usize(scene.clips.len());
    for clip in &scene.clips {
        hash_clip(clip, &mut hasher);
    }

    hasher.write_usize(scene.masks.len());
    for mask in &scene.masks {
        hash_mask(mask, &mut hasher);
    }

    hasher.write_usize(scene.refs.len());
    for r in &scene.refs {
        hasher.write_u32(*r);
    }

    hasher.write_u32(scene.clip_ref_total);

    hasher.write_usize(scene.tile_offset_counts.len());
    for v in &scene.tile_offset_counts {
        hasher.write_u32(*v);
    }
    hasher.write_usize(scene.tile_shape_indices.len());
    for v in &scene.tile_shape_indices {
        hasher.write_u32(*v);
    }

    hasher.finish()
}

fn hash_uniforms(u: &Uniforms, hasher: &mut FxHasher64) {
    hasher.write_u32(u.canvas_w);
    hasher.write_u32(u.canvas_h);
    hasher.write_u32(u.tile_size);
    hasher.write_u32(u.tiles_x);
    hasher.write_u32(u.supersample);
}

fn hash_shape(s: &ShapeRecord, hasher: &mut FxHasher64) {
    hasher.write_u32(s.v_start);
    hasher.write_u32(s.v_count);
    hasher.write_u32(s.rule);
    for c in &s.color {
        hasher.write_u32(c.to_bits());
    }
    hasher.write_u32(s.clip_start);
    hasher.write_u32(s.clip_count);
    hasher.write_u32(s.mask_start);
    hasher.write_u32(s.mask_count);
    hasher.write_u32(s.opacity.to_bits());
}

fn hash_clip(c: &ClipRecord, hasher: &mut FxHasher64) {
    hasher.write_u32(c.v_start);
    hasher.write_u32(c.v_count);
    hasher.write_u32(c.rule);
}

fn hash_mask(m: &MaskRecord, hasher: &mut FxHasher64) {
    hasher.write_u32(m.v_start);
    hasher.write_u32(m.v_count);
    hasher.write_u32(m.rule);
    hasher.write_u32(m.alpha.to_bits());
}

#[cfg(test)]
mod tests {
    use super::*;
    use vg_color::ColorU;
    use vg_content::Path;
    use vg_scene::{FillRule, ScenePacker};

    fn build_scene() -> PackedScene {
        let mut packer = ScenePacker::default();
        let mut path = Path::new();
        path.rect(10.0, 10.0, 100.0, 100.0);
        packer.fill(&path, ColorU::new(255, 0, 0, 255), FillRule::EvenOdd);
        packer.build(128, 128, 64, 1).unwrap()
    }

    #[test]
    fn identical_scenes_hash_identically() {
        assert_eq!(hash_scene(&build_scene()), hash_scene(&build_scene()));
    }

    #[test]
    fn differing_color_changes_the_hash() {
        let mut packer = ScenePacker::default();
        let mut path = Path::new();
        path.rect(10.0, 10.0, 100.0, 100.0);
        packer.fill(&path, ColorU::new(0, 255, 0, 255), FillRule::EvenOdd);
        let other = packer.build(128, 128, 64, 1).unwrap();
        assert_ne!(hash_scene(&build_scene()), hash_scene(&other));
    }
}
