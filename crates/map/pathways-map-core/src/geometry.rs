//! 2D geometry for the stylized map: points, rotation, and the
//! offset → scale → rotate transform from logical space into render space.
//!
//! Everything here is pure and stateless; the transform is built once per
//! rendering session.

use serde::{Deserialize, Serialize};

use crate::error::MapError;

/// A point in either logical or render space. Serialized as `[x, y]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Linear interpolation: `self + (other - self) * t`.
    #[inline]
    pub fn lerp(self, other: Point, t: f64) -> Point {
        Point {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
        }
    }

    #[inline]
    pub fn distance(self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

impl From<[f64; 2]> for Point {
    fn from([x, y]: [f64; 2]) -> Self {
        Self { x, y }
    }
}

impl From<Point> for [f64; 2] {
    fn from(p: Point) -> Self {
        [p.x, p.y]
    }
}

impl std::ops::Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

/// Rotate `(x, y)` about `(cx, cy)` by `angle_deg` degrees.
///
/// `nx = cx + dx·cos − dy·sin`, `ny = cy + dx·sin + dy·cos`. On a Y-down
/// surface (SVG) a positive angle turns clockwise, the same as SVG `rotate()`.
pub fn rotate_point(x: f64, y: f64, angle_deg: f64, cx: f64, cy: f64) -> Point {
    let (sin, cos) = angle_deg.to_radians().sin_cos();
    let dx = x - cx;
    let dy = y - cy;
    Point {
        x: cx + dx * cos - dy * sin,
        y: cy + dx * sin + dy * cos,
    }
}

/// Multiply both coordinates by `factor`.
#[inline]
pub fn scale_point(p: Point, factor: f64) -> Point {
    Point::new(p.x * factor, p.y * factor)
}

/// Fixed logical → render transform.
///
/// Order matters: the offset lives in logical units, so its visual size
/// scales with the map; rotation happens in render units about `center`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MapTransform {
    pub scale_factor: f64,
    pub rotation_deg: f64,
    pub center: Point,
    pub offset: Point,
}

impl MapTransform {
    /// Build a transform, rejecting a non-finite or non-positive scale.
    pub fn new(
        scale_factor: f64,
        rotation_deg: f64,
        center: Point,
        offset: Point,
    ) -> Result<Self, MapError> {
        if !scale_factor.is_finite() || scale_factor <= 0.0 {
            return Err(MapError::InvalidScale {
                value: scale_factor,
            });
        }
        Ok(Self {
            scale_factor,
            rotation_deg,
            center,
            offset,
        })
    }

    /// Identity: scale 1, no rotation, no offset.
    pub fn identity() -> Self {
        Self {
            scale_factor: 1.0,
            rotation_deg: 0.0,
            center: Point::ORIGIN,
            offset: Point::ORIGIN,
        }
    }

    /// Offset then scale, without rotating. Used for shapes drawn inside a
    /// group that carries the rotation itself.
    #[inline]
    pub fn apply_unrotated(&self, p: Point) -> Point {
        scale_point(p + self.offset, self.scale_factor)
    }

    /// Offset, scale, then rotate about `center`.
    #[inline]
    pub fn apply(&self, p: Point) -> Point {
        let s = self.apply_unrotated(p);
        self.rotate(s)
    }

    /// Rotate a render-space point about `center`.
    #[inline]
    pub fn rotate(&self, p: Point) -> Point {
        rotate_point(p.x, p.y, self.rotation_deg, self.center.x, self.center.y)
    }

    /// Scale a logical length into render units.
    #[inline]
    pub fn scale_len(&self, len: f64) -> f64 {
        len * self.scale_factor
    }
}

impl Default for MapTransform {
    fn default() -> Self {
        Self::identity()
    }
}
