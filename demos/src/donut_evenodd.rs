// vecraster/demos/src/donut_evenodd.rs
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! End-to-end scenario 3 of spec.md §8: a single path with an outer ring
//! and a reversed inner ring, filled even-odd, written out as
//! `donut_evenodd.png`. The center (50,50) is expected transparent; the
//! edge (10,50) filled.

use std::error::Error;
use std::fs::File;
use vg_canvas::{Canvas, SceneConfig};
use vg_color::ColorU;
use vg_geometry::vector::Vector2F;
use vg_gpu::RasterBackend;
use vg_raster::{png, CpuBackend};
use vg_scene::FillRule;

fn main() -> Result<(), Box<dyn Error>> {
    pretty_env_logger::init();

    let config = SceneConfig::new(100, 100, 64, 2)?;
    let mut canvas = Canvas::new(config);

    let mut path = canvas.path();
    // Outer ring, clockwise.
    path.poly(
        &[
            Vector2F::new(0.0, 0.0),
            Vector2F::new(100.0, 0.0),
            Vector2F::new(100.0, 100.0),
            Vector2F::new(0.0, 100.0),
        ],
        true,
    );
    // Inner ring, reversed (counter-clockwise) relative to the outer one.
    path.poly(
        &[
            Vector2F::new(25.0, 25.0),
            Vector2F::new(25.0, 75.0),
            Vector2F::new(75.0, 75.0),
            Vector2F::new(75.0, 25.0),
        ],
        true,
    );

    canvas.fill_path_with_rule(&path, ColorU::new(0, 200, 0, 255), FillRule::EvenOdd);

    let scene = canvas.build()?;
    let frame = CpuBackend.render(&scene)?;

    log::info!("center (50,50) = {:?} (expected transparent)", frame.pixel(50, 50));
    log::info!("edge (10,50) = {:?} (expected filled)", frame.pixel(10, 50));

    let mut out = File::create("donut_evenodd.png")?;
    png::export_png(&frame, &mut out)?;
    Ok(())
}
