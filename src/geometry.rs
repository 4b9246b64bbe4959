use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

use eframe::egui::{Pos2, Vec2, pos2, vec2};
use serde::{Deserialize, Serialize};

/// A point or displacement in either world or view space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn distance(self, other: Self) -> f32 {
        (self - other).length()
    }
}

impl Add for Point {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Point {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Point {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl SubAssign for Point {
    fn sub_assign(&mut self, rhs: Self) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl Neg for Point {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

impl Mul<f32> for Point {
    type Output = Self;

    fn mul(self, factor: f32) -> Self {
        Self::new(self.x * factor, self.y * factor)
    }
}

impl Div<f32> for Point {
    type Output = Self;

    fn div(self, divisor: f32) -> Self {
        Self::new(self.x / divisor, self.y / divisor)
    }
}

impl From<Point> for Pos2 {
    fn from(point: Point) -> Self {
        pos2(point.x, point.y)
    }
}

impl From<Point> for Vec2 {
    fn from(point: Point) -> Self {
        vec2(point.x, point.y)
    }
}

impl From<Pos2> for Point {
    fn from(pos: Pos2) -> Self {
        Self::new(pos.x, pos.y)
    }
}

impl From<Vec2> for Point {
    fn from(vec: Vec2) -> Self {
        Self::new(vec.x, vec.y)
    }
}

/// Axis-aligned rectangle, inclusive on every side.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub min: Point,
    pub max: Point,
}

impl Bounds {
    pub fn from_center_size(center: Point, size: Point) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    pub fn contains(self, point: Point) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }

    pub fn center(self) -> Point {
        (self.min + self.max) * 0.5
    }

    pub fn size(self) -> Point {
        self.max - self.min
    }
}
