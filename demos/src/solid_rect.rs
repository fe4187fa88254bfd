// vecraster/demos/src/solid_rect.rs
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! End-to-end scenario 1 of spec.md §8: a single opaque red rectangle on a
//! 128x128 canvas at supersample 1, written out as `solid_rect.png`.

use std::error::Error;
use std::fs::File;
use vg_canvas::{Canvas, SceneConfig};
use vg_color::ColorU;
use vg_raster::{png, CpuBackend};
use vg_gpu::RasterBackend;

fn main() -> Result<(), Box<dyn Error>> {
    pretty_env_logger::init();

    let config = SceneConfig::new(128, 128, 64, 1)?;
    let mut canvas = Canvas::new(config);
    let mut path = canvas.path();
    path.rect(10.0, 10.0, 100.0, 100.0);
    canvas.fill_path(&path, ColorU::new(255, 0, 0, 255));

    let scene = canvas.build()?;
    scene.validate()?;
    let frame = CpuBackend.render(&scene)?;

    let mut out = File::create("solid_rect.png")?;
    png::export_png(&frame, &mut out)?;
    log::info!("wrote solid_rect.png ({}x{})", frame.width, frame.height);
    Ok(())
}
