// vecraster/demos/src/overlap_alpha.rs
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! End-to-end scenario 2 of spec.md §8: a half-alpha blue rectangle
//! composited over a solid red one, written out as `overlap_alpha.png`.
//! At pixel (48,32) the expected straight-alpha result is (127,0,128,255).

use std::error::Error;
use std::fs::File;
use vg_canvas::{Canvas, SceneConfig};
use vg_color::ColorU;
use vg_gpu::RasterBackend;
use vg_raster::{png, CpuBackend};

fn main() -> Result<(), Box<dyn Error>> {
    pretty_env_logger::init();

    let config = SceneConfig::new(64, 64, 64, 1)?;
    let mut canvas = Canvas::new(config);

    let mut under = canvas.path();
    under.rect(0.0, 0.0, 64.0, 64.0);
    canvas.fill_path(&under, ColorU::new(255, 0, 0, 255));

    let mut over = canvas.path();
    over.rect(32.0, 0.0, 64.0, 64.0);
    canvas.fill_path(&over, ColorU::new(0, 0, 255, 128));

    let scene = canvas.build()?;
    let frame = CpuBackend.render(&scene)?;

    if let Some(pixel) = frame.pixel(48, 32) {
        log::info!("pixel (48,32) = {:?} (expected ~(127,0,128,255))", pixel);
    }

    let mut out = File::create("overlap_alpha.png")?;
    png::export_png(&frame, &mut out)?;
    Ok(())
}
