// vecraster/geometry/src/vector.rs
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! 2D vectors, in both floating-point and integer flavors.

use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

/// A 2D point or vector with floating point coordinates, in device pixels.
///
/// The coordinate system is top-left origin, +X right, +Y down.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vector2F {
    pub x: f32,
    pub y: f32,
}

impl Vector2F {
    #[inline]
    pub fn new(x: f32, y: f32) -> Vector2F {
        Vector2F { x, y }
    }

    #[inline]
    pub fn splat(v: f32) -> Vector2F {
        Vector2F { x: v, y: v }
    }

    #[inline]
    pub fn zero() -> Vector2F {
        Vector2F::new(0.0, 0.0)
    }

    #[inline]
    pub fn x(self) -> f32 {
        self.x
    }

    #[inline]
    pub fn y(self) -> f32 {
        self.y
    }

    #[inline]
    pub fn yx(self) -> Vector2F {
        Vector2F::new(self.y, self.x)
    }

    #[inline]
    pub fn scale(self, factor: f32) -> Vector2F {
        Vector2F::new(self.x * factor, self.y * factor)
    }

    #[inline]
    pub fn scale_xy(self, factor: Vector2F) -> Vector2F {
        Vector2F::new(self.x * factor.x, self.y * factor.y)
    }

    #[inline]
    pub fn dot(self, other: Vector2F) -> f32 {
        self.x * other.x + self.y * other.y
    }

    /// The 2D cross product (a scalar: the z-component of the 3D cross product).
    #[inline]
    pub fn cross(self, other: Vector2F) -> f32 {
        self.x * other.y - self.y * other.x
    }

    #[inline]
    pub fn length(self) -> f32 {
        self.dot(self).sqrt()
    }

    #[inline]
    pub fn normalize(self) -> Vector2F {
        let len = self.length();
        if len <= std::f32::EPSILON {
            Vector2F::zero()
        } else {
            self.scale(1.0 / len)
        }
    }

    /// A unit vector perpendicular to `self`, rotated 90° counter-clockwise in
    /// screen space (+X right, +Y down): `(-y, x)`.
    #[inline]
    pub fn left_normal(self) -> Vector2F {
        Vector2F::new(-self.y, self.x)
    }

    #[inline]
    pub fn angle(self) -> f32 {
        self.y.atan2(self.x)
    }

    #[inline]
    pub fn lerp(self, other: Vector2F, t: f32) -> Vector2F {
        self + (other - self).scale(t)
    }

    #[inline]
    pub fn min(self, other: Vector2F) -> Vector2F {
        Vector2F::new(self.x.min(other.x), self.y.min(other.y))
    }

    #[inline]
    pub fn max(self, other: Vector2F) -> Vector2F {
        Vector2F::new(self.x.max(other.x), self.y.max(other.y))
    }

    #[inline]
    pub fn floor(self) -> Vector2F {
        Vector2F::new(self.x.floor(), self.y.floor())
    }

    #[inline]
    pub fn ceil(self) -> Vector2F {
        Vector2F::new(self.x.ceil(), self.y.ceil())
    }

    #[inline]
    pub fn to_i32(self) -> Vector2I {
        Vector2I::new(self.x as i32, self.y as i32)
    }

    #[inline]
    pub fn approx_eq(self, other: Vector2F, epsilon: f32) -> bool {
        (self - other).length() <= epsilon
    }
}

impl Add for Vector2F {
    type Output = Vector2F;
    #[inline]
    fn add(self, other: Vector2F) -> Vector2F {
        Vector2F::new(self.x + other.x, self.y + other.y)
    }
}

impl AddAssign for Vector2F {
    #[inline]
    fn add_assign(&mut self, other: Vector2F) {
        *self = *self + other;
    }
}

impl Sub for Vector2F {
    type Output = Vector2F;
    #[inline]
    fn sub(self, other: Vector2F) -> Vector2F {
        Vector2F::new(self.x - other.x, self.y - other.y)
    }
}

impl SubAssign for Vector2F {
    #[inline]
    fn sub_assign(&mut self, other: Vector2F) {
        *self = *self - other;
    }
}

impl Neg for Vector2F {
    type Output = Vector2F;
    #[inline]
    fn neg(self) -> Vector2F {
        Vector2F::new(-self.x, -self.y)
    }
}

impl Mul<f32> for Vector2F {
    type Output = Vector2F;
    #[inline]
    fn mul(self, scalar: f32) -> Vector2F {
        self.scale(scalar)
    }
}

impl Div<f32> for Vector2F {
    type Output = Vector2F;
    #[inline]
    fn div(self, scalar: f32) -> Vector2F {
        self.scale(1.0 / scalar)
    }
}

/// A 2D point or vector with integer coordinates, used for tile/pixel indices.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Vector2I {
    pub x: i32,
    pub y: i32,
}

impl Vector2I {
    #[inline]
    pub fn new(x: i32, y: i32) -> Vector2I {
        Vector2I { x, y }
    }

    #[inline]
    pub fn splat(v: i32) -> Vector2I {
        Vector2I { x: v, y: v }
    }

    #[inline]
    pub fn x(self) -> i32 {
        self.x
    }

    #[inline]
    pub fn y(self) -> i32 {
        self.y
    }

    #[inline]
    pub fn to_f32(self) -> Vector2F {
        Vector2F::new(self.x as f32, self.y as f32)
    }
}

impl Add for Vector2I {
    type Output = Vector2I;
    #[inline]
    fn add(self, other: Vector2I) -> Vector2I {
        Vector2I::new(self.x + other.x, self.y + other.y)
    }
}

impl Sub for Vector2I {
    type Output = Vector2I;
    #[inline]
    fn sub(self, other: Vector2I) -> Vector2I {
        Vector2I::new(self.x - other.x, self.y - other.y)
    }
}
