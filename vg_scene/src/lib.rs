// vecraster/scene/src/lib.rs
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The scene packer and tile binner (spec.md §4.E-4.F): turns the path/
//! stroke/clip/mask/opacity authoring calls into the immutable, tightly
//! packed buffers the rasterizer kernel consumes.

pub mod binner;
pub mod error;
pub mod packer;
pub mod records;
pub mod scene;

pub use binner::{bin_shapes, BinnerArena, TileTables};
pub use error::PackError;
pub use packer::ScenePacker;
pub use records::FillRule;
pub use scene::PackedScene;
