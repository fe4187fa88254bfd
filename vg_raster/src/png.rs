// vecraster/raster/src/png.rs
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! PNG export of a rendered frame, grounded on the teacher's
//! `export/src/raster.rs` `export_png` (same `image` crate call), but over
//! a CPU-rendered buffer instead of a GPU readback.

use image::{DynamicImage, ImageOutputFormat, RgbaImage};
use std::io;
use vg_gpu::RenderedFrame;

/// Writes `frame` to `writer` as a PNG. Fails if `frame.pixels` is not
/// exactly `width * height * 4` bytes tightly packed (use
/// [`crate::tightly_packed_pixels`] first if it came from a readback with
/// row-pitch padding).
pub fn export_png<W: io::Write>(frame: &RenderedFrame, writer: &mut W) -> io::Result<()> {
    let image = RgbaImage::from_raw(frame.width, frame.height, frame.pixels.clone())
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidData, "pixel buffer size mismatch"))?;
    DynamicImage::ImageRgba8(image)
        .write_to(writer, ImageOutputFormat::Png)
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_png_rejects_mismatched_buffer_size() {
        let frame = RenderedFrame { pixels: vec![0u8; 4], row_pitch: 4, width: 2, height: 2 };
        let mut out = Vec::new();
        assert!(export_png(&frame, &mut out).is_err());
    }

    #[test]
    fn export_png_writes_a_png_signature() {
        let frame = RenderedFrame { pixels: vec![0u8; 4 * 4], row_pitch: 4, width: 1, height: 4 };
        let mut out = Vec::new();
        export_png(&frame, &mut out).unwrap();
        assert_eq!(&out[0..8], &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]);
    }
}
