// vecraster/raster/src/lib.rs
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The portable CPU rasterizer backend (spec.md §4.G): always available,
//! used as the fallback when no GPU device/driver is present and as the
//! reference implementation parity tests compare a GPU backend against.

pub mod kernel;
pub mod png;
pub mod polygon;

use vg_gpu::{BackendError, RasterBackend, RenderedFrame};
use vg_scene::scene::PackedScene;

/// Row pitch for the CPU backend is always exactly `width * 4`: there is
/// no readback alignment requirement without a real GPU copy-to-buffer.
/// [`align_rows`] pads to [`vg_gpu::READBACK_ROW_ALIGNMENT`] for callers
/// that need to emulate that layout.
pub struct CpuBackend;

impl RasterBackend for CpuBackend {
    fn name(&self) -> &'static str {
        "cpu"
    }

    fn render(&self, scene: &PackedScene) -> Result<RenderedFrame, BackendError> {
        let width = scene.uniforms.canvas_w;
        let height = scene.uniforms.canvas_h;
        let pixels = kernel::render(scene);
        Ok(RenderedFrame { pixels, row_pitch: width as usize * 4, width, height })
    }
}

/// Re-packs a tightly-packed `width*4`-pitch RGBA8 buffer into one with
/// `row_pitch` rounded up to [`vg_gpu::READBACK_ROW_ALIGNMENT`], the layout
/// a GPU copy-to-buffer readback produces (spec.md §5 "Shared resources").
pub fn align_rows(pixels: &[u8], width: u32, height: u32) -> (Vec<u8>, usize) {
    let unaligned = width as usize * 4;
    let row_pitch = vg_gpu::align_row_pitch(unaligned, vg_gpu::READBACK_ROW_ALIGNMENT);
    let mut out = vec![0u8; row_pitch * height as usize];
    for y in 0..height as usize {
        let src = &pixels[y * unaligned..(y + 1) * unaligned];
        out[y * row_pitch..y * row_pitch + unaligned].copy_from_slice(src);
    }
    (out, row_pitch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use vg_color::ColorU;
    use vg_content::Path;
    use vg_scene::{FillRule, ScenePacker};

    #[test]
    fn cpu_backend_reports_its_name() {
        assert_eq!(CpuBackend.name(), "cpu");
    }

    #[test]
    fn cpu_backend_renders_a_frame_of_the_right_size() {
        let mut packer = ScenePacker::default();
        let mut path = Path::new();
        path.rect(0.0, 0.0, 8.0, 8.0);
        packer.fill(&path, ColorU::new(10, 20, 30, 255), FillRule::EvenOdd);
        let scene = packer.build(16, 8, 64, 1).unwrap();
        let frame = CpuBackend.render(&scene).unwrap();
        assert_eq!(frame.width, 16);
        assert_eq!(frame.height, 8);
        assert_eq!(frame.pixels.len(), 16 * 8 * 4);
    }

    #[test]
    fn align_rows_pads_each_row_to_the_readback_alignment() {
        let pixels = vec![7u8; 10 * 3 * 4];
        let (aligned, row_pitch) = align_rows(&pixels, 10, 3);
        assert_eq!(row_pitch, 256);
        assert_eq!(aligned.len(), 256 * 3);
        assert_eq!(&aligned[0..40], &pixels[0..40]);
        assert!(aligned[40..256].iter().all(|&b| b == 0));
    }
}
