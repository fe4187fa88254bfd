// vecraster/canvas/src/error.rs
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The scripting surface's error type: a thin wrapper over the lower
//! layers' own error enums, per spec.md §7 "Propagation policy" — packer
//! and parser errors unwind the current frame/parse via `Result`/`?`
//! rather than being translated into something new.

use crate::config::ConfigError;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum CanvasError {
    #[error(transparent)]
    Pack(#[from] vg_scene::PackError),

    #[error(transparent)]
    Svg(#[from] vg_svg::ParseError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
