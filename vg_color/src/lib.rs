// vecraster/color/src/lib.rs
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Straight (authoring) and premultiplied (internal/GPU) color, and the
//! conversions between them.

use std::ops::{Add, AddAssign, Div};

/// An 8-bit straight-alpha RGBA color, as authoring code supplies it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ColorU {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl ColorU {
    #[inline]
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> ColorU {
        ColorU { r, g, b, a }
    }

    #[inline]
    pub fn black() -> ColorU {
        ColorU::new(0, 0, 0, 255)
    }

    #[inline]
    pub fn transparent_black() -> ColorU {
        ColorU::new(0, 0, 0, 0)
    }

    #[inline]
    pub fn white() -> ColorU {
        ColorU::new(255, 255, 255, 255)
    }

    /// Converts to premultiplied linear-in-[0,1] floats, as `ShapeRecord.color`
    /// and `MaskRecord.alpha` store them.
    #[inline]
    pub fn to_premultiplied_f32(self) -> ColorF {
        let a = self.a as f32 / 255.0;
        ColorF {
            r: (self.r as f32 / 255.0) * a,
            g: (self.g as f32 / 255.0) * a,
            b: (self.b as f32 / 255.0) * a,
            a,
        }
    }

    #[inline]
    pub fn pack(self) -> u32 {
        u32::from_le_bytes([self.r, self.g, self.b, self.a])
    }

    #[inline]
    pub fn unpack(bits: u32) -> ColorU {
        let [r, g, b, a] = bits.to_le_bytes();
        ColorU::new(r, g, b, a)
    }
}

/// A premultiplied RGBA color with `f32` channels in `[0,1]`, the form every
/// internal buffer and the rasterizer kernel operate on.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ColorF {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl ColorF {
    #[inline]
    pub fn new(r: f32, g: f32, b: f32, a: f32) -> ColorF {
        ColorF { r, g, b, a }
    }

    #[inline]
    pub fn transparent_black() -> ColorF {
        ColorF::new(0.0, 0.0, 0.0, 0.0)
    }

    #[inline]
    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    #[inline]
    pub fn from_array(a: [f32; 4]) -> ColorF {
        ColorF::new(a[0], a[1], a[2], a[3])
    }

    /// Scales every channel (including alpha) by `factor`, the operation the
    /// rasterizer kernel applies before compositing a premultiplied shape
    /// color with its accumulated opacity/mask factor.
    #[inline]
    pub fn scale(self, factor: f32) -> ColorF {
        ColorF::new(self.r * factor, self.g * factor, self.b * factor, self.a * factor)
    }

    /// Premultiplied-over: `src over dst`.
    #[inline]
    pub fn over(self, dst: ColorF) -> ColorF {
        let inv_src_a = 1.0 - self.a;
        ColorF::new(
            self.r + inv_src_a * dst.r,
            self.g + inv_src_a * dst.g,
            self.b + inv_src_a * dst.b,
            self.a + inv_src_a * dst.a,
        )
    }

    /// Converts a premultiplied color back to 8-bit straight alpha for
    /// storage into the output image, per spec.md §4.G step 6.
    #[inline]
    pub fn unpremultiply_to_u8(self) -> ColorU {
        let a = self.a.max(0.0).min(1.0);
        let (r, g, b) = if a > 1e-5 {
            (
                (self.r / a).max(0.0).min(1.0),
                (self.g / a).max(0.0).min(1.0),
                (self.b / a).max(0.0).min(1.0),
            )
        } else {
            (0.0, 0.0, 0.0)
        };
        ColorU::new(
            (r * 255.0).round() as u8,
            (g * 255.0).round() as u8,
            (b * 255.0).round() as u8,
            (a * 255.0).round() as u8,
        )
    }
}

impl Add for ColorF {
    type Output = ColorF;

    #[inline]
    fn add(self, rhs: ColorF) -> ColorF {
        ColorF::new(self.r + rhs.r, self.g + rhs.g, self.b + rhs.b, self.a + rhs.a)
    }
}

impl AddAssign for ColorF {
    #[inline]
    fn add_assign(&mut self, rhs: ColorF) {
        *self = *self + rhs;
    }
}

impl Div<f32> for ColorF {
    type Output = ColorF;

    /// Divides every channel by `rhs`, the operation the rasterizer kernel
    /// applies to turn a subsample accumulator into an average.
    #[inline]
    fn div(self, rhs: f32) -> ColorF {
        ColorF::new(self.r / rhs, self.g / rhs, self.b / rhs, self.a / rhs)
    }
}
