//! Scene-space geometry.
//!
//! Scene space is measured in units with the origin at the frame centre and
//! `y` pointing up. The frame is always 8 units tall; its width follows the
//! output aspect ratio.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Neg, Sub};

pub const FRAME_HEIGHT: f32 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
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

impl Mul<f32> for Point {
    type Output = Point;

    fn mul(self, rhs: f32) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

impl Neg for Point {
    type Output = Point;

    fn neg(self) -> Point {
        Point::new(-self.x, -self.y)
    }
}

pub const ORIGIN: Point = Point::new(0.0, 0.0);
pub const UP: Point = Point::new(0.0, 1.0);
pub const DOWN: Point = Point::new(0.0, -1.0);
pub const LEFT: Point = Point::new(-1.0, 0.0);
pub const RIGHT: Point = Point::new(1.0, 0.0);

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bounds {
    pub center: Point,
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(center: Point, width: f32, height: f32) -> Self {
        Self {
            center,
            width,
            height,
        }
    }

    pub fn from_corners(min: Point, max: Point) -> Self {
        Self {
            center: Point::new((min.x + max.x) / 2.0, (min.y + max.y) / 2.0),
            width: (max.x - min.x).abs(),
            height: (max.y - min.y).abs(),
        }
    }

    pub fn left(&self) -> f32 {
        self.center.x - self.width / 2.0
    }

    pub fn right(&self) -> f32 {
        self.center.x + self.width / 2.0
    }

    pub fn top(&self) -> f32 {
        self.center.y + self.height / 2.0
    }

    pub fn bottom(&self) -> f32 {
        self.center.y - self.height / 2.0
    }

    /// Critical point of the box in direction `dir` (an edge midpoint or corner)
    pub fn edge(&self, dir: Point) -> Point {
        Point::new(
            self.center.x + dir.x.signum_or_zero() * self.width / 2.0,
            self.center.y + dir.y.signum_or_zero() * self.height / 2.0,
        )
    }

    pub fn shifted(self, delta: Point) -> Self {
        Self {
            center: self.center + delta,
            ..self
        }
    }

    /// Scale about `about`
    pub fn scaled(self, factor: f32, about: Point) -> Self {
        Self {
            center: about + (self.center - about) * factor,
            width: self.width * factor,
            height: self.height * factor,
        }
    }

    pub fn padded(self, pad: f32) -> Self {
        Self {
            width: self.width + 2.0 * pad,
            height: self.height + 2.0 * pad,
            ..self
        }
    }

    pub fn union(self, other: Bounds) -> Self {
        Self::from_corners(
            Point::new(self.left().min(other.left()), self.bottom().min(other.bottom())),
            Point::new(self.right().max(other.right()), self.top().max(other.top())),
        )
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.left() && p.x <= self.right() && p.y >= self.bottom() && p.y <= self.top()
    }

    /// Union of every box in `boxes`, `None` when empty
    pub fn enclosing<I: IntoIterator<Item = Bounds>>(boxes: I) -> Option<Bounds> {
        boxes.into_iter().reduce(Bounds::union)
    }
}

trait SignumOrZero {
    fn signum_or_zero(self) -> f32;
}

impl SignumOrZero for f32 {
    fn signum_or_zero(self) -> f32 {
        if self > 0.0 {
            1.0
        } else if self < 0.0 {
            -1.0
        } else {
            0.0
        }
    }
}

/// Visible region of the scene
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub width: f32,
    pub height: f32,
}

impl Default for Frame {
    fn default() -> Self {
        Self::for_resolution(1920, 1080)
    }
}

impl Frame {
    pub fn for_resolution(pixel_width: u32, pixel_height: u32) -> Self {
        let aspect = if pixel_height == 0 {
            16.0 / 9.0
        } else {
            pixel_width as f32 / pixel_height as f32
        };
        Self {
            width: FRAME_HEIGHT * aspect,
            height: FRAME_HEIGHT,
        }
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new(ORIGIN, self.width, self.height)
    }

    /// Shift that moves `bounds` flush against the frame edge in `dir`, `buff` units inside.
    /// Only the axes named by `dir` move.
    pub fn to_edge_delta(&self, bounds: &Bounds, dir: Point, buff: f32) -> Point {
        let target = self.bounds().edge(dir);
        let current = bounds.edge(dir);
        let mask = Point::new(dir.x.signum_or_zero().abs(), dir.y.signum_or_zero().abs());
        let raw = target - current - Point::new(dir.x.signum_or_zero(), dir.y.signum_or_zero()) * buff;
        Point::new(raw.x * mask.x, raw.y * mask.y)
    }
}

/// Shift that places `bounds` beside `anchor` in `dir` with a gap of `buff`,
/// centred on the other axis.
pub fn next_to_delta(bounds: &Bounds, anchor: &Bounds, dir: Point, buff: f32) -> Point {
    let dir = Point::new(dir.x.signum_or_zero(), dir.y.signum_or_zero());
    let target = anchor.edge(dir) + dir * buff;
    target - bounds.edge(-dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn test_frame_for_resolution() {
        let frame = Frame::for_resolution(1920, 1080);
        assert!(approx(frame.height, 8.0));
        assert!(approx(frame.width, 14.2222));

        let frame = Frame::for_resolution(100, 0);
        assert!(approx(frame.width, 8.0 * 16.0 / 9.0));
    }

    #[test]
    fn test_edges() {
        let b = Bounds::new(Point::new(1.0, 1.0), 2.0, 4.0);
        assert_eq!(b.edge(UP), Point::new(1.0, 3.0));
        assert_eq!(b.edge(DOWN), Point::new(1.0, -1.0));
        assert_eq!(b.edge(LEFT), Point::new(0.0, 1.0));
        assert_eq!(b.edge(UP + RIGHT), Point::new(2.0, 3.0));
    }

    #[test]
    fn test_to_edge_moves_only_named_axis() {
        let frame = Frame::for_resolution(1920, 1080);
        let b = Bounds::new(Point::new(2.0, 0.0), 4.0, 1.0);
        let delta = frame.to_edge_delta(&b, UP, 0.5);
        let moved = b.shifted(delta);
        assert!(approx(moved.top(), 3.5));
        assert!(approx(moved.center.x, 2.0));
    }

    #[test]
    fn test_next_to_below() {
        let anchor = Bounds::new(Point::new(0.0, 1.0), 6.0, 2.0);
        let b = Bounds::new(Point::new(3.0, 3.0), 2.0, 1.0);
        let moved = b.shifted(next_to_delta(&b, &anchor, DOWN, 0.3));
        assert!(approx(moved.top(), -0.3));
        assert!(approx(moved.center.x, 0.0));
    }

    #[test]
    fn test_scale_about_point() {
        let b = Bounds::new(Point::new(2.0, 0.0), 2.0, 2.0);
        let s = b.scaled(0.5, ORIGIN);
        assert_eq!(s.center, Point::new(1.0, 0.0));
        assert!(approx(s.width, 1.0));
    }

    #[test]
    fn test_enclosing() {
        assert!(Bounds::enclosing(Vec::new()).is_none());
        let u = Bounds::enclosing(vec![
            Bounds::new(Point::new(0.0, 0.0), 2.0, 2.0),
            Bounds::new(Point::new(4.0, 0.0), 2.0, 2.0),
        ])
        .unwrap();
        assert!(approx(u.left(), -1.0));
        assert!(approx(u.right(), 5.0));
        assert!(u.contains(Point::new(2.0, 0.5)));
    }
}
