// vecraster/demos/src/svg_star.rs
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Demonstrates two of SPEC_FULL.md's §6 supplement features together:
//! the parametric [`vg_canvas::star`] helper filled as a polygon, and an
//! SVG path-data string parsed and stroked around it. Written out as
//! `svg_star.png`.

use std::error::Error;
use std::fs::File;
use vg_canvas::{star, Canvas, SceneConfig};
use vg_color::ColorU;
use vg_gpu::RasterBackend;
use vg_raster::{png, CpuBackend};

fn main() -> Result<(), Box<dyn Error>> {
    pretty_env_logger::init();

    let config = SceneConfig::new(120, 120, 64, 2)?;
    let mut canvas = Canvas::new(config);

    let points = star(60.0, 60.0, 50.0, 20.0, 5);
    let mut star_path = canvas.path();
    star_path.poly(&points, true);
    canvas.fill_path(&star_path, ColorU::new(255, 200, 0, 255));

    canvas.stroke_svg("M10 10 L110 10 L110 110 L10 110 Z", ColorU::new(0, 0, 0, 255))?;

    let scene = canvas.build()?;
    let frame = CpuBackend.render(&scene)?;

    let mut out = File::create("svg_star.png")?;
    png::export_png(&frame, &mut out)?;
    log::info!("wrote svg_star.png ({}x{})", frame.width, frame.height);
    Ok(())
}
