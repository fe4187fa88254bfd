// vecraster/geometry/src/line_segment.rs
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::vector::Vector2F;

/// A directed line segment `from -> to`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineSegment2F {
    pub from: Vector2F,
    pub to: Vector2F,
}

impl LineSegment2F {
    #[inline]
    pub fn new(from: Vector2F, to: Vector2F) -> LineSegment2F {
        LineSegment2F { from, to }
    }

    #[inline]
    pub fn vector(self) -> Vector2F {
        self.to - self.from
    }

    #[inline]
    pub fn midpoint(self) -> Vector2F {
        self.from.lerp(self.to, 0.5)
    }

    #[inline]
    pub fn length(self) -> f32 {
        self.vector().length()
    }

    #[inline]
    pub fn sample(self, t: f32) -> Vector2F {
        self.from.lerp(self.to, t)
    }
}
