// vecraster/canvas/src/config.rs
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! `SceneConfig`: the configuration defaults of spec.md §6 ("Configuration
//! defaults") as a plain struct with a validating constructor, grounded on
//! the teacher's `RendererMode`/`RendererOptions` config-struct idiom in
//! `renderer/src/gpu/options.rs`.

use vg_content::{StrokeStyle, DEFAULT_FLATTEN_TOLERANCE};
use vg_scene::FillRule;

/// Tile size MUST fall within this range, per spec.md §6.
const MIN_TILE_SIZE: u32 = 16;
const MAX_TILE_SIZE: u32 = 128;

/// Supersample factor is one of these three values, per spec.md §6.
const SUPERSAMPLE_LEVELS: [u32; 3] = [1, 2, 4];

#[derive(Debug, thiserror::Error, PartialEq, Eq, Clone, Copy)]
pub enum ConfigError {
    #[error("canvas dimensions must be non-zero (got {0}x{1})")]
    ZeroCanvasDimension(u32, u32),
}

/// Scene-wide defaults a [`crate::Canvas`] is built with: canvas size,
/// flatten tolerance, tile size, supersample factor, and the default
/// stroke style / fill rule new paths use when the caller doesn't specify
/// one explicitly.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneConfig {
    pub canvas_w: u32,
    pub canvas_h: u32,
    pub flatten_tolerance: f32,
    pub tile_size: u32,
    pub supersample: u32,
    pub default_stroke_style: StrokeStyle,
    pub default_fill_rule: FillRule,
}

impl Default for SceneConfig {
    /// A 0x0 canvas at every other default — useless on its own (`Canvas`
    /// requires a validated config), but a convenient base for
    /// `SceneConfig { canvas_w, canvas_h, ..SceneConfig::default() }` or
    /// for overriding fields before calling [`SceneConfig::new`].
    fn default() -> SceneConfig {
        SceneConfig {
            canvas_w: 0,
            canvas_h: 0,
            flatten_tolerance: DEFAULT_FLATTEN_TOLERANCE,
            tile_size: 64,
            supersample: 2,
            default_stroke_style: StrokeStyle::default(),
            default_fill_rule: FillRule::EvenOdd,
        }
    }
}

impl SceneConfig {
    /// Builds a config for a `canvas_w x canvas_h` canvas, clamping
    /// `tile_size` into `[16,128]` and snapping `supersample` up to the
    /// nearest of `{1,2,4}`. Fails if either canvas dimension is zero.
    pub fn new(canvas_w: u32, canvas_h: u32, tile_size: u32, supersample: u32) -> Result<SceneConfig, ConfigError> {
        if canvas_w == 0 || canvas_h == 0 {
            return Err(ConfigError::ZeroCanvasDimension(canvas_w, canvas_h));
        }
        Ok(SceneConfig {
            canvas_w,
            canvas_h,
            tile_size: tile_size.max(MIN_TILE_SIZE).min(MAX_TILE_SIZE),
            supersample: clamp_supersample(supersample),
            ..SceneConfig::default()
        })
    }

    pub fn with_flatten_tolerance(mut self, tolerance: f32) -> SceneConfig {
        self.flatten_tolerance = tolerance;
        self
    }

    pub fn with_default_stroke_style(mut self, style: StrokeStyle) -> SceneConfig {
        self.default_stroke_style = style;
        self
    }

    pub fn with_default_fill_rule(mut self, rule: FillRule) -> SceneConfig {
        self.default_fill_rule = rule;
        self
    }
}

/// Snaps `value` up to the nearest supported supersample level, capping at
/// the largest (4) rather than growing past it.
fn clamp_supersample(value: u32) -> u32 {
    for &level in &SUPERSAMPLE_LEVELS {
        if value <= level {
            return level;
        }
    }
    *SUPERSAMPLE_LEVELS.last().unwrap()
}
