// vecraster/raster/src/kernel.rs
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The per-pixel SSAA rasterizer kernel (spec.md §4.G), run as a portable
//! CPU backend over a work-stealing thread pool, one task per tile row
//! (spec.md §5 "Scheduling model").

use crate::polygon::inside;
use rayon::prelude::*;
use vg_color::ColorF;
use vg_geometry::vector::Vector2F;
use vg_scene::records::{ClipRecord, FillRule, MaskRecord, ShapeRecord};
use vg_scene::scene::PackedScene;

/// Renders `scene` to a straight-alpha RGBA8 buffer, tightly packed
/// (`row_pitch == width * 4`); callers that need the GPU readback's 256-byte
/// row alignment re-pack via [`crate::align_rows`].
pub fn render(scene: &PackedScene) -> Vec<u8> {
    let width = scene.uniforms.canvas_w;
    let height = scene.uniforms.canvas_h;
    let tile_size = scene.uniforms.tile_size.max(1);
    let tiles_x = scene.uniforms.tiles_x.max(1);
    let tiles_y = scene.tiles_y().max(1);
    let supersample = scene.uniforms.supersample.max(1);

    log::debug!(
        "rasterizing {}x{} ({} tiles, {}x supersample, {} shapes)",
        width,
        height,
        tiles_x * tiles_y,
        supersample * supersample,
        scene.shapes.len()
    );

    let mut pixels = vec![0u8; width as usize * height as usize * 4];
    pixels
        .par_chunks_mut(width as usize * 4)
        .enumerate()
        .for_each(|(y, row)| {
            let y = y as u32;
            let ty = (y / tile_size).min(tiles_y - 1);
            for x in 0..width {
                let tx = (x / tile_size).min(tiles_x - 1);
                let tile = (ty * tiles_x + tx) as usize;
                let color = shade_pixel(scene, x, y, tile, supersample);
                let straight = color.unpremultiply_to_u8();
                let offset = x as usize * 4;
                row[offset] = straight.r;
                row[offset + 1] = straight.g;
                row[offset + 2] = straight.b;
                row[offset + 3] = straight.a;
            }
        });
    pixels
}

fn shade_pixel(scene: &PackedScene, x: u32, y: u32, tile: usize, supersample: u32) -> ColorF {
    let start = scene.tile_offset_counts[2 * tile] as usize;
    let count = scene.tile_offset_counts[2 * tile + 1] as usize;
    let shape_ids = &scene.tile_shape_indices[start..start + count];

    let mut accum = ColorF::transparent_black();
    for sy in 0..supersample {
        for sx in 0..supersample {
            let sample = Vector2F::new(
                x as f32 + (sx as f32 + 0.5) / supersample as f32,
                y as f32 + (sy as f32 + 0.5) / supersample as f32,
            );
            accum += shade_sample(scene, shape_ids, sample);
        }
    }
    accum / (supersample * supersample) as f32
}

fn shade_sample(scene: &PackedScene, shape_ids: &[u32], sample: Vector2F) -> ColorF {
    let mut color = ColorF::transparent_black();
    for &shape_id in shape_ids {
        let shape = &scene.shapes[shape_id as usize];
        if !inside(shape_verts(scene, shape), sample, rule_of(shape.rule)) {
            continue;
        }
        if !passes_clips(scene, shape, sample) {
            continue;
        }
        let mask_value = mask_value(scene, shape, sample);
        let factor = shape.opacity * mask_value;
        if factor <= 1e-5 {
            continue;
        }
        let src = ColorF::from_array(shape.color).scale(factor);
        color = src.over(color);
    }
    color
}

fn shape_verts(scene: &PackedScene, shape: &ShapeRecord) -> &[Vector2F] {
    let start = shape.v_start as usize;
    let end = start + shape.v_count as usize;
    &scene.vertices[start..end]
}

fn clip_verts<'a>(scene: &'a PackedScene, clip: &ClipRecord) -> &'a [Vector2F] {
    let start = clip.v_start as usize;
    let end = start + clip.v_count as usize;
    &scene.vertices[start..end]
}

fn mask_verts<'a>(scene: &'a PackedScene, mask: &MaskRecord) -> &'a [Vector2F] {
    let start = mask.v_start as usize;
    let end = start + mask.v_count as usize;
    &scene.vertices[start..end]
}

#[inline]
fn rule_of(bits: u32) -> FillRule {
    FillRule::from_u32(bits)
}

fn passes_clips(scene: &PackedScene, shape: &ShapeRecord, sample: Vector2F) -> bool {
    let start = shape.clip_start as usize;
    let end = start + shape.clip_count as usize;
    for &clip_id in &scene.refs[start..end] {
        let clip = &scene.clips[clip_id as usize];
        if !inside(clip_verts(scene, clip), sample, rule_of(clip.rule)) {
            return false;
        }
    }
    true
}

fn mask_value(scene: &PackedScene, shape: &ShapeRecord, sample: Vector2F) -> f32 {
    if shape.mask_count == 0 {
        return 1.0;
    }
    let start = shape.mask_start as usize;
    let end = start + shape.mask_count as usize;
    let mut value = 0.0f32;
    for &mask_id in &scene.refs[start..end] {
        let mask = &scene.masks[mask_id as usize];
        if inside(mask_verts(scene, mask), sample, rule_of(mask.rule)) {
            let alpha = mask.alpha.max(0.0).min(1.0);
            value += (1.0 - value) * alpha;
        }
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use vg_color::ColorU;
    use vg_content::Path;
    use vg_scene::ScenePacker;

    #[test]
    fn solid_opaque_rect_is_fully_colored() {
        let mut packer = ScenePacker::default();
        let mut path = Path::new();
        path.rect(0.0, 0.0, 4.0, 4.0);
        packer.fill(&path, ColorU::new(255, 0, 0, 255), FillRule::EvenOdd);
        let scene = packer.build(4, 4, 64, 1).unwrap();
        let pixels = render(&scene);
        assert_eq!(&pixels[0..4], &[255, 0, 0, 255]);
        let last = pixels.len() - 4;
        assert_eq!(&pixels[last..], &[255, 0, 0, 255]);
    }

    #[test]
    fn outside_canvas_bounds_never_covered_stays_transparent() {
        let mut packer = ScenePacker::default();
        let mut path = Path::new();
        path.rect(0.0, 0.0, 2.0, 2.0);
        packer.fill(&path, ColorU::new(0, 255, 0, 255), FillRule::EvenOdd);
        let scene = packer.build(4, 4, 64, 1).unwrap();
        let pixels = render(&scene);
        let corner_offset = (3 * 4 + 3) * 4;
        assert_eq!(&pixels[corner_offset..corner_offset + 4], &[0, 0, 0, 0]);
    }

    #[test]
    fn overlapping_half_alpha_rects_blend_over() {
        let mut packer = ScenePacker::default();
        let mut bottom = Path::new();
        bottom.rect(0.0, 0.0, 4.0, 4.0);
        packer.fill(&bottom, ColorU::new(255, 0, 0, 255), FillRule::EvenOdd);
        let mut top = Path::new();
        top.rect(0.0, 0.0, 4.0, 4.0);
        packer.fill(&top, ColorU::new(0, 0, 255, 128), FillRule::EvenOdd);
        let scene = packer.build(4, 4, 64, 1).unwrap();
        let pixels = render(&scene);
        // Fully opaque red under a half-alpha blue: result stays opaque,
        // with a red/blue mix, not pure blue.
        assert_eq!(pixels[3], 255);
        assert!(pixels[0] > 0 && pixels[2] > 0);
    }
}
