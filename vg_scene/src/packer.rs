// vecraster/scene/src/packer.rs
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The scene packer, spec.md §4.E: maintains the clip/mask/opacity stacks
//! and emits the shape/clip/mask records, vertex buffer, reference buffer,
//! and uniforms that make up a [`crate::scene::PackedScene`].

use crate::binner::{bin_shapes, BinnerArena};
use crate::error::PackError;
use crate::records::{ClipRecord, FillRule, MaskRecord, ShapeRecord, Uniforms};
use crate::scene::PackedScene;
use smallvec::SmallVec;
use vg_color::{ColorF, ColorU};
use vg_content::stroke::{expand_stroke, StrokeStyle};
use vg_content::{ensure_closed, Path, DEFAULT_FLATTEN_TOLERANCE};
use vg_geometry::vector::Vector2F;

const CLOSE_EPSILON: f32 = 1e-4;

/// A snapshot of active clip/mask ids, small enough in the common case
/// (shapes nested a few levels deep) to stay on the stack.
type RefList = SmallVec<[u32; 4]>;

struct ShapeInstance {
    verts: Vec<Vector2F>,
    rule: FillRule,
    color: ColorF,
    clip_refs: RefList,
    mask_refs: RefList,
    opacity: f32,
}

struct ClipInstance {
    verts: Vec<Vector2F>,
    rule: FillRule,
}

struct MaskInstance {
    verts: Vec<Vector2F>,
    rule: FillRule,
    alpha: f32,
}

/// The frame-scoped scene-authoring state of spec.md §4.E: ordered
/// shape/clip/mask lists plus the clip/opacity/mask stacks every emitted
/// shape snapshots. Created per frame, consumed by [`ScenePacker::build`],
/// then discarded (spec.md §3 "Lifecycle").
pub struct ScenePacker {
    shapes: Vec<ShapeInstance>,
    clips: Vec<ClipInstance>,
    masks: Vec<MaskInstance>,
    clip_stack: Vec<RefList>,
    mask_stack: Vec<RefList>,
    opacity_stack: Vec<f32>,
    tolerance: f32,
}

impl Default for ScenePacker {
    fn default() -> ScenePacker {
        ScenePacker::new(DEFAULT_FLATTEN_TOLERANCE)
    }
}

impl ScenePacker {
    pub fn new(tolerance: f32) -> ScenePacker {
        ScenePacker {
            shapes: Vec::new(),
            clips: Vec::new(),
            masks: Vec::new(),
            clip_stack: Vec::new(),
            mask_stack: Vec::new(),
            // One element always present: pushOpacity/popOpacity never pop
            // it away, per spec.md §6 "initial element remains".
            opacity_stack: vec![1.0],
            tolerance,
        }
    }

    fn active_clip_refs(&self) -> RefList {
        self.clip_stack.iter().flatten().copied().collect()
    }

    fn active_mask_refs(&self) -> RefList {
        self.mask_stack.iter().flatten().copied().collect()
    }

    /// Product of the opacity stack, per spec.md §3 invariant 6. Every
    /// pushed value is itself clamped to `[0,1]` in `push_opacity`, so the
    /// product can never exceed 1 in practice; it is reclamped here purely
    /// as the belt-and-suspenders spec.md calls for ("clamped to [0,1]").
    fn active_opacity(&self) -> f32 {
        let product: f32 = self.opacity_stack.iter().product();
        product.max(0.0).min(1.0)
    }

    /// Fills `path` with `color` under `rule`. Each flattened subpath with
    /// fewer than 3 distinct vertices (after closing) is silently dropped,
    /// per spec.md §3 invariant 3.
    pub fn fill(&mut self, path: &Path, color: ColorU, rule: FillRule) -> &mut ScenePacker {
        let subpaths = path.flatten(self.tolerance);
        let premul = color.to_premultiplied_f32();
        let clip_refs = self.active_clip_refs();
        let mask_refs = self.active_mask_refs();
        let opacity = self.active_opacity();
        for mut verts in subpaths {
            ensure_closed(&mut verts, CLOSE_EPSILON);
            if distinct_vertex_count(&verts) < 3 {
                continue;
            }
            self.shapes.push(ShapeInstance {
                verts,
                rule,
                color: premul,
                clip_refs: clip_refs.clone(),
                mask_refs: mask_refs.clone(),
                opacity,
            });
        }
        self
    }

    /// Strokes `path` with `color` under `style`, expanding each flattened
    /// subpath into zero or more filled (even-odd) polygons per spec.md
    /// §4.C, then emitting each as a shape instance.
    pub fn stroke(&mut self, path: &Path, color: ColorU, style: &StrokeStyle) -> &mut ScenePacker {
        let subpaths = path.flatten(self.tolerance);
        let premul = color.to_premultiplied_f32();
        let clip_refs = self.active_clip_refs();
        let mask_refs = self.active_mask_refs();
        let opacity = self.active_opacity();
        for subpath in subpaths {
            for verts in expand_stroke(&subpath, style) {
                self.shapes.push(ShapeInstance {
                    verts,
                    rule: FillRule::EvenOdd,
                    color: premul,
                    clip_refs: clip_refs.clone(),
                    mask_refs: mask_refs.clone(),
                    opacity,
                });
            }
        }
        self
    }

    /// Pushes a new clip frame: every closed subpath of `path` (with >=3
    /// distinct vertices) is appended to `clips[]`, and the list of new ids
    /// becomes one frame on the clip stack.
    pub fn push_clip(&mut self, path: &Path, rule: FillRule) -> &mut ScenePacker {
        let subpaths = path.flatten(self.tolerance);
        let mut ids = RefList::new();
        for mut verts in subpaths {
            ensure_closed(&mut verts, CLOSE_EPSILON);
            if distinct_vertex_count(&verts) < 3 {
                continue;
            }
            ids.push(self.clips.len() as u32);
            self.clips.push(ClipInstance { verts, rule });
        }
        self.clip_stack.push(ids);
        self
    }

    pub fn pop_clip(&mut self) -> Result<(), PackError> {
        self.clip_stack.pop().map(|_| ()).ok_or(PackError::StackUnderflow)
    }

    /// Pushes `clamp(a, 0, 1)` onto the opacity stack.
    pub fn push_opacity(&mut self, a: f32) -> &mut ScenePacker {
        self.opacity_stack.push(a.max(0.0).min(1.0));
        self
    }

    /// Pops the opacity stack. Fails if only the mandatory base element
    /// would remain (it is never removable), matching the scripting
    /// surface contract ("initial element remains").
    pub fn pop_opacity(&mut self) -> Result<(), PackError> {
        if self.opacity_stack.len() <= 1 {
            return Err(PackError::StackUnderflow);
        }
        self.opacity_stack.pop();
        Ok(())
    }

    /// Analogous to [`ScenePacker::push_clip`], but each closed subpath
    /// becomes a `MaskInstance` carrying `clamp(alpha, 0, 1)`.
    pub fn push_opacity_mask(&mut self, path: &Path, alpha: f32, rule: FillRule) -> &mut ScenePacker {
        let subpaths = path.flatten(self.tolerance);
        let clamped_alpha = alpha.max(0.0).min(1.0);
        let mut ids = RefList::new();
        for mut verts in subpaths {
            ensure_closed(&mut verts, CLOSE_EPSILON);
            if distinct_vertex_count(&verts) < 3 {
                continue;
            }
            ids.push(self.masks.len() as u32);
            self.masks.push(MaskInstance { verts, rule, alpha: clamped_alpha });
        }
        self.mask_stack.push(ids);
        self
    }

    pub fn pop_opacity_mask(&mut self) -> Result<(), PackError> {
        self.mask_stack.pop().map(|_| ()).ok_or(PackError::StackUnderflow)
    }

    /// Assembles the immutable [`PackedScene`], per spec.md §4.E `build()`
    /// steps 1-4. `canvas_w`/`canvas_h` and `tile_size` feed the tile
    /// binner (§4.F); `supersample` is recorded in the uniforms for the
    /// rasterizer kernel (§4.G) to read.
    pub fn build(
        &self,
        canvas_w: u32,
        canvas_h: u32,
        tile_size: u32,
        supersample: u32,
    ) -> Result<PackedScene, PackError> {
        let mut vertices: Vec<Vector2F> = Vec::new();

        let mut shape_v_starts = Vec::with_capacity(self.shapes.len());
        for shape in &self.shapes {
            shape_v_starts.push(vertices.len() as u32);
            vertices.extend_from_slice(&shape.verts);
        }
        let mut clip_v_starts = Vec::with_capacity(self.clips.len());
        for clip in &self.clips {
            clip_v_starts.push(vertices.len() as u32);
            vertices.extend_from_slice(&clip.verts);
        }
        let mut mask_v_starts = Vec::with_capacity(self.masks.len());
        for mask in &self.masks {
            mask_v_starts.push(vertices.len() as u32);
            vertices.extend_from_slice(&mask.verts);
        }

        // Two append cursors build the reference buffer as clip refs,
        // then mask refs, per spec.md §4.E step 3.
        let mut clip_refs_buf: Vec<u32> = Vec::new();
        let mut mask_refs_buf: Vec<u32> = Vec::new();
        let mut shape_records = Vec::with_capacity(self.shapes.len());
        for (i, shape) in self.shapes.iter().enumerate() {
            let clip_start = clip_refs_buf.len() as u32;
            clip_refs_buf.extend_from_slice(&shape.clip_refs);
            let mask_start = mask_refs_buf.len() as u32;
            mask_refs_buf.extend_from_slice(&shape.mask_refs);
            shape_records.push(ShapeRecord {
                v_start: shape_v_starts[i],
                v_count: shape.verts.len() as u32,
                rule: shape.rule.to_u32(),
                _pad0: 0,
                color: shape.color.to_array(),
                clip_start,
                clip_count: shape.clip_refs.len() as u32,
                mask_start,
                mask_count: shape.mask_refs.len() as u32,
                opacity: shape.opacity,
                _pad1: [0.0; 3],
            });
        }
        let clip_ref_total = clip_refs_buf.len() as u32;
        for record in shape_records.iter_mut() {
            record.mask_start += clip_ref_total;
        }
        let mut refs = clip_refs_buf;
        refs.extend(mask_refs_buf);

        let clip_records: Vec<ClipRecord> = self
            .clips
            .iter()
            .enumerate()
            .map(|(i, clip)| ClipRecord {
                v_start: clip_v_starts[i],
                v_count: clip.verts.len() as u32,
                rule: clip.rule.to_u32(),
                _pad: 0,
            })
            .collect();

        let mask_records: Vec<MaskRecord> = self
            .masks
            .iter()
            .enumerate()
            .map(|(i, mask)| MaskRecord {
                v_start: mask_v_starts[i],
                v_count: mask.verts.len() as u32,
                rule: mask.rule.to_u32(),
                _pad0: 0,
                alpha: mask.alpha,
                _pad1: [0.0; 3],
            })
            .collect();

        let mut arena = BinnerArena::new();
        let tables = bin_shapes(&shape_records, &vertices, canvas_w, canvas_h, tile_size, &mut arena);

        let uniforms = Uniforms {
            canvas_w,
            canvas_h,
            tile_size,
            tiles_x: tables.tiles_x,
            supersample,
            _pad: [0; 3],
        };

        let scene = PackedScene {
            uniforms,
            vertices,
            shapes: shape_records,
            clips: clip_records,
            masks: mask_records,
            refs,
            clip_ref_total,
            tile_offset_counts: tables.tile_offset_counts,
            tile_shape_indices: tables.tile_shape_indices,
        };

        #[cfg(debug_assertions)]
        scene.validate()?;

        log::debug!(
            "packed scene: {} shapes, {} clips, {} masks, {} tiles",
            scene.shapes.len(),
            scene.clips.len(),
            scene.masks.len(),
            tables.tiles_x as u64 * tables.tiles_y as u64,
        );

        Ok(scene)
    }
}

fn distinct_vertex_count(verts: &[Vector2F]) -> usize {
    if verts.len() >= 2 && verts.first().unwrap().approx_eq(*verts.last().unwrap(), CLOSE_EPSILON) {
        verts.len() - 1
    } else {
        verts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vg_color::ColorU;

    #[test]
    fn push_pop_clip_leaves_stack_balanced() {
        let mut packer = ScenePacker::default();
        let mut path = Path::new();
        path.rect(0.0, 0.0, 10.0, 10.0);
        packer.push_clip(&path, FillRule::EvenOdd);
        assert_eq!(packer.clip_stack.len(), 1);
        packer.pop_clip().unwrap();
        assert_eq!(packer.clip_stack.len(), 0);
        assert!(packer.pop_clip().is_err());
    }

    #[test]
    fn opacity_stack_base_element_is_protected() {
        let mut packer = ScenePacker::default();
        assert!(packer.pop_opacity().is_err());
        packer.push_opacity(0.5);
        packer.pop_opacity().unwrap();
        assert!(packer.pop_opacity().is_err());
    }

    #[test]
    fn solid_rectangle_scenario_builds_expected_single_shape() {
        // spec.md §8 scenario 1.
        let mut packer = ScenePacker::default();
        let mut path = Path::new();
        path.rect(10.0, 10.0, 100.0, 100.0);
        packer.fill(&path, ColorU::new(255, 0, 0, 255), FillRule::EvenOdd);
        let scene = packer.build(128, 128, 64, 1).unwrap();
        assert_eq!(scene.shapes.len(), 1);
        assert_eq!(scene.shapes[0].v_count, 5);
        assert_eq!(scene.shapes[0].clip_count, 0);
        assert_eq!(scene.shapes[0].mask_count, 0);
        assert!((scene.shapes[0].opacity - 1.0).abs() < 1e-6);
    }

    #[test]
    fn clip_ref_offsets_shift_mask_starts() {
        let mut packer = ScenePacker::default();
        let mut clip_path = Path::new();
        clip_path.rect(0.0, 0.0, 50.0, 50.0);
        packer.push_clip(&clip_path, FillRule::EvenOdd);

        let mut mask_path = Path::new();
        mask_path.rect(0.0, 0.0, 20.0, 20.0);
        packer.push_opacity_mask(&mask_path, 0.5, FillRule::EvenOdd);

        let mut fill_path = Path::new();
        fill_path.rect(0.0, 0.0, 100.0, 100.0);
        packer.fill(&fill_path, ColorU::white(), FillRule::EvenOdd);

        let scene = packer.build(128, 128, 64, 1).unwrap();
        let shape = &scene.shapes[0];
        assert_eq!(shape.clip_count, 1);
        assert_eq!(shape.mask_count, 1);
        assert_eq!(shape.mask_start, scene.clip_ref_total);
    }

    #[test]
    fn rebuild_records_round_trips() {
        let mut packer = ScenePacker::default();
        let mut path = Path::new();
        path.rect(0.0, 0.0, 10.0, 10.0);
        packer.fill(&path, ColorU::new(10, 20, 30, 255), FillRule::NonZero);
        let scene = packer.build(64, 64, 64, 2).unwrap();
        let (shapes, clips, masks) = scene.rebuild_records();
        assert_eq!(shapes, scene.shapes);
        assert_eq!(clips, scene.clips);
        assert_eq!(masks, scene.masks);
    }
}
