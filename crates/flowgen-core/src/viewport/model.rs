//! Viewport state and the transform it produces.

use std::ops::{Add, Sub};

pub const MIN_SCALE: f64 = 0.5;
pub const MAX_SCALE: f64 = 5.0;
pub const ZOOM_STEP: f64 = 0.2;

/// 2D position or displacement in unscaled screen space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Pan offset and zoom scale of the diagram view.
///
/// `scale` always stays within [`MIN_SCALE`, `MAX_SCALE`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportState {
    scale: f64,
    offset: Point,
}

impl Default for ViewportState {
    fn default() -> Self {
        Self {
            scale: 1.0,
            offset: Point::ORIGIN,
        }
    }
}

impl ViewportState {
    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn offset(&self) -> Point {
        self.offset
    }

    pub(crate) fn set_offset(&mut self, offset: Point) {
        self.offset = offset;
    }

    /// Adds `delta` to the scale and saturates at the bounds.
    pub(crate) fn step_scale(&mut self, delta: f64) {
        self.scale = (self.scale + delta).clamp(MIN_SCALE, MAX_SCALE);
    }

    pub fn transform(&self) -> ViewTransform {
        ViewTransform {
            scale: self.scale,
            offset: self.offset,
        }
    }
}

/// `translate(offset)` followed by `scale(scale)` about the visual center.
///
/// The translation is applied in unscaled screen space, so panning moves the
/// diagram at pointer speed whatever the zoom level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    pub scale: f64,
    pub offset: Point,
}

impl ViewTransform {
    /// CSS transform with the origin at the element center.
    pub fn to_css(&self) -> String {
        format!(
            "translate({}px, {}px) scale({})",
            self.offset.x, self.offset.y, self.scale
        )
    }

    /// Affine matrix `[a, b, c, d, e, f]` for a viewport whose visual center
    /// is `center`.
    pub fn matrix(&self, center: Point) -> [f64; 6] {
        let s = self.scale;
        [
            s,
            0.0,
            0.0,
            s,
            self.offset.x + center.x * (1.0 - s),
            self.offset.y + center.y * (1.0 - s),
        ]
    }

    /// SVG `transform` attribute value equivalent to [`Self::matrix`].
    pub fn to_svg_transform(&self, center: Point) -> String {
        let [a, b, c, d, e, f] = self.matrix(center);
        format!("matrix({a} {b} {c} {d} {e} {f})")
    }

    /// Maps a point of the untransformed content to screen space.
    pub fn apply(&self, point: Point, center: Point) -> Point {
        Point::new(
            center.x + self.offset.x + (point.x - center.x) * self.scale,
            center.y + self.offset.y + (point.y - center.y) * self.scale,
        )
    }
}
