// vecraster/canvas/src/canvas.rs
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! [`Canvas`]: the scripting-facing entry point of spec.md §6, mirroring
//! the teacher's `CanvasRenderingContext2D` (`canvas/src/lib.rs`) but
//! wired to a [`vg_scene::ScenePacker`] instead of a pathfinder `Scene`.

use crate::config::SceneConfig;
use crate::error::CanvasError;
use vg_color::ColorU;
use vg_content::stroke::StrokeStyle;
use vg_content::Path;
use vg_geometry::transform2d::Transform2F;
use vg_scene::{FillRule, PackedScene, ScenePacker};
use vg_text::{layout_text, GlyphProvider, TextLayoutOptions};

/// The subset of [`Canvas`] state `save`/`restore` snapshot: the current
/// transform and the default paint the next `fill_path`/`stroke_path` call
/// without an explicit style falls back to. Mirrors the teacher's `State`
/// struct, trimmed to what SPEC_FULL.md §6 actually specifies.
#[derive(Clone, Debug)]
struct CanvasState {
    transform: Transform2F,
    stroke_style: StrokeStyle,
    fill_rule: FillRule,
}

/// The authoring-facing scripting surface of spec.md §6: builds up a
/// [`ScenePacker`] through drawing calls, then [`Canvas::build`] packs it
/// into a [`PackedScene`] ready for the rasterizer kernel.
pub struct Canvas {
    packer: ScenePacker,
    config: SceneConfig,
    current: CanvasState,
    saved_states: Vec<CanvasState>,
}

impl Canvas {
    pub fn new(config: SceneConfig) -> Canvas {
        Canvas {
            packer: ScenePacker::new(config.flatten_tolerance),
            current: CanvasState {
                transform: Transform2F::identity(),
                stroke_style: config.default_stroke_style,
                fill_rule: config.default_fill_rule,
            },
            config,
            saved_states: Vec::new(),
        }
    }

    /// A fresh, empty path builder, per the scripting-surface table.
    #[inline]
    pub fn path(&self) -> Path {
        Path::new()
    }

    /// Applies the canvas's current transform on top of whatever transform
    /// `path` already carries, leaving `path` itself untouched.
    fn transformed(&self, path: &Path) -> Path {
        let mut out = path.clone();
        out.set_transform(self.current.transform.concat(&path.transform()));
        out
    }

    pub fn fill_path(&mut self, path: &Path, color: ColorU) -> &mut Canvas {
        self.fill_path_with_rule(path, color, self.current.fill_rule)
    }

    pub fn fill_path_with_rule(&mut self, path: &Path, color: ColorU, rule: FillRule) -> &mut Canvas {
        let transformed = self.transformed(path);
        self.packer.fill(&transformed, color, rule);
        self
    }

    pub fn stroke_path(&mut self, path: &Path, color: ColorU) -> &mut Canvas {
        let style = self.current.stroke_style;
        self.stroke_path_with_style(path, color, &style)
    }

    pub fn stroke_path_with_style(&mut self, path: &Path, color: ColorU, style: &StrokeStyle) -> &mut Canvas {
        let transformed = self.transformed(path);
        self.packer.stroke(&transformed, color, style);
        self
    }

    pub fn push_clip(&mut self, path: &Path) -> &mut Canvas {
        self.push_clip_with_rule(path, self.current.fill_rule)
    }

    pub fn push_clip_with_rule(&mut self, path: &Path, rule: FillRule) -> &mut Canvas {
        let transformed = self.transformed(path);
        self.packer.push_clip(&transformed, rule);
        self
    }

    pub fn pop_clip(&mut self) -> Result<(), CanvasError> {
        self.packer.pop_clip().map_err(CanvasError::from)
    }

    pub fn push_opacity(&mut self, alpha: f32) -> &mut Canvas {
        self.packer.push_opacity(alpha);
        self
    }

    pub fn pop_opacity(&mut self) -> Result<(), CanvasError> {
        self.packer.pop_opacity().map_err(CanvasError::from)
    }

    pub fn push_opacity_mask(&mut self, path: &Path, alpha: f32) -> &mut Canvas {
        self.push_opacity_mask_with_rule(path, alpha, self.current.fill_rule)
    }

    pub fn push_opacity_mask_with_rule(&mut self, path: &Path, alpha: f32, rule: FillRule) -> &mut Canvas {
        let transformed = self.transformed(path);
        self.packer.push_opacity_mask(&transformed, alpha, rule);
        self
    }

    pub fn pop_opacity_mask(&mut self) -> Result<(), CanvasError> {
        self.packer.pop_opacity_mask().map_err(CanvasError::from)
    }

    /// Lays out `text` with `provider` and fills the resulting glyph
    /// outlines, per spec.md §4.D / §6.
    pub fn fill_text(
        &mut self,
        provider: &dyn GlyphProvider,
        text: &str,
        origin_x: f32,
        origin_y: f32,
        size: f32,
        options: &TextLayoutOptions,
        color: ColorU,
    ) -> &mut Canvas {
        let path = layout_text(provider, text, origin_x, origin_y, size, options);
        self.fill_path(&path, color)
    }

    pub fn stroke_text(
        &mut self,
        provider: &dyn GlyphProvider,
        text: &str,
        origin_x: f32,
        origin_y: f32,
        size: f32,
        options: &TextLayoutOptions,
        color: ColorU,
    ) -> &mut Canvas {
        let path = layout_text(provider, text, origin_x, origin_y, size, options);
        self.stroke_path(&path, color)
    }

    /// Parses an SVG path-data string into a fresh [`Path`], per spec.md
    /// §4.B. Does not draw it; combine with [`Canvas::fill_svg`] /
    /// [`Canvas::stroke_svg`] or the packer directly.
    pub fn svg_path(&self, d: &str) -> Result<Path, CanvasError> {
        vg_svg::parse_path(d).map_err(CanvasError::from)
    }

    pub fn fill_svg(&mut self, d: &str, color: ColorU) -> Result<&mut Canvas, CanvasError> {
        let path = self.svg_path(d)?;
        Ok(self.fill_path(&path, color))
    }

    pub fn stroke_svg(&mut self, d: &str, color: ColorU) -> Result<&mut Canvas, CanvasError> {
        let path = self.svg_path(d)?;
        Ok(self.stroke_path(&path, color))
    }

    /// Right-multiplies `translate(tx,ty) * rotate(rot) * scale(sx,sy)`
    /// onto the canvas's current transform.
    pub fn transform(&mut self, tx: f32, ty: f32, sx: f32, sy: f32, rot: f32) -> &mut Canvas {
        let local = Transform2F::from_translation(vg_geometry::vector::Vector2F::new(tx, ty))
            .concat(&Transform2F::from_rotation(rot))
            .concat(&Transform2F::from_scale(vg_geometry::vector::Vector2F::new(sx, sy)));
        self.current.transform = self.current.transform.concat(&local);
        self
    }

    pub fn set_transform(&mut self, t: Transform2F) -> &mut Canvas {
        self.current.transform = t;
        self
    }

    pub fn reset_transform(&mut self) -> &mut Canvas {
        self.current.transform = Transform2F::identity();
        self
    }

    #[inline]
    pub fn current_transform(&self) -> Transform2F {
        self.current.transform
    }

    pub fn set_default_stroke_style(&mut self, style: StrokeStyle) -> &mut Canvas {
        self.current.stroke_style = style;
        self
    }

    pub fn set_default_fill_rule(&mut self, rule: FillRule) -> &mut Canvas {
        self.current.fill_rule = rule;
        self
    }

    /// Snapshots the transform and default paint state, per spec.md §6
    /// "Stack semantics". Does not touch the clip/opacity/mask stacks —
    /// those have their own explicit push/pop pairs.
    #[inline]
    pub fn save(&mut self) {
        self.saved_states.push(self.current.clone());
    }

    /// Restores the most recently saved state, discarding the current one.
    /// A no-op if nothing has been saved, matching the teacher's
    /// `restore()`.
    #[inline]
    pub fn restore(&mut self) {
        if let Some(state) = self.saved_states.pop() {
            self.current = state;
        }
    }

    /// Packs everything recorded so far into an immutable [`PackedScene`].
    /// Consumes no state: the canvas can keep drawing and `build` again,
    /// though spec.md §3 "Lifecycle" treats one frame as one `build` call.
    pub fn build(&self) -> Result<PackedScene, CanvasError> {
        self.packer
            .build(self.config.canvas_w, self.config.canvas_h, self.config.tile_size, self.config.supersample)
            .map_err(CanvasError::from)
    }
}
