use std::{cmp::Ordering, fmt};

use ordered_float::OrderedFloat;
use rand::{distributions::{Distribution, Uniform}, Rng};

use crate::{Error, KdPoint, KdRegion, Result};


/// The coordinate a tree node splits on.
/// Nodes at even depth split on x (a vertical line), nodes at odd depth on y (a horizontal line).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    X,
    Y
}

impl Axis {
    pub fn at_depth(layer: usize) -> Self {
        if layer%2 == 0 { Axis::X } else { Axis::Y }
    }
}

/// A point in the plane.
/// Equality is exact (`0.0` and `-0.0` are the same coordinate) and the total order is
/// lexicographic by x then y, so points can be kept in ordered collections.
#[derive(Clone, Copy, Debug)]
pub struct Point2D {
    x: f64,
    y: f64
}

impl Point2D {
    pub const fn new(x: f64, y: f64) -> Self {
        Self{x, y}
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn coord(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y
        }
    }

    pub fn distance_squared_to(&self, other: &Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx*dx + dy*dy
    }

    pub fn distance_to(&self, other: &Self) -> f64 {
        self.distance_squared_to(other).sqrt()
    }

    fn key(&self) -> (OrderedFloat<f64>, OrderedFloat<f64>) {
        (OrderedFloat(self.x), OrderedFloat(self.y))
    }
}

impl PartialEq for Point2D {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Point2D {}

impl PartialOrd for Point2D {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(Ord::cmp(self, other))
    }
}

impl Ord for Point2D {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

impl fmt::Display for Point2D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl KdPoint for Point2D {
    type Distance = OrderedFloat<f64>;

    fn sqdist(&self, other: &Self) -> Self::Distance {
        OrderedFloat(self.distance_squared_to(other))
    }

    fn cmp(&self, other: &Self, layer: usize) -> Ordering {
        let axis = Axis::at_depth(layer);
        OrderedFloat(self.coord(axis)).cmp(&OrderedFloat(other.coord(axis)))
    }
}

impl Distribution<Point2D> for Uniform<f64> {
    fn sample<R>(&self, rng: &mut R) -> Point2D where R: Rng + ?Sized {
        let x = <Self as Distribution<f64>>::sample(self, rng);
        let y = <Self as Distribution<f64>>::sample(self, rng);
        Point2D::new(x, y)
    }
}


/// A closed axis aligned rectangle [xmin, xmax] x [ymin, ymax]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RectHV {
    xmin: f64,
    ymin: f64,
    xmax: f64,
    ymax: f64
}

impl RectHV {
    pub const UNIT: Self = Self{xmin: 0.0, ymin: 0.0, xmax: 1.0, ymax: 1.0};

    /// Fails if either min exceeds its max or any coordinate is NaN.
    /// Degenerate (zero width or height) rectangles are fine.
    pub fn new(xmin: f64, ymin: f64, xmax: f64, ymax: f64) -> Result<Self> {
        if !(xmin <= xmax && ymin <= ymax) {
            return Err(Error::InvalidRect{xmin, ymin, xmax, ymax})
        }
        Ok(Self{xmin, ymin, xmax, ymax})
    }

    pub fn xmin(&self) -> f64 {
        self.xmin
    }

    pub fn ymin(&self) -> f64 {
        self.ymin
    }

    pub fn xmax(&self) -> f64 {
        self.xmax
    }

    pub fn ymax(&self) -> f64 {
        self.ymax
    }

    pub fn width(&self) -> f64 {
        self.xmax - self.xmin
    }

    pub fn height(&self) -> f64 {
        self.ymax - self.ymin
    }

    pub fn contains(&self, p: &Point2D) -> bool {
        self.xmin <= p.x && p.x <= self.xmax && self.ymin <= p.y && p.y <= self.ymax
    }

    pub fn intersects(&self, other: &Self) -> bool {
        self.xmax >= other.xmin && self.ymax >= other.ymin
            && other.xmax >= self.xmin && other.ymax >= self.ymin
    }

    pub fn contains_rect(&self, other: &Self) -> bool {
        self.xmin <= other.xmin && other.xmax <= self.xmax
            && self.ymin <= other.ymin && other.ymax <= self.ymax
    }

    /// Squared distance from `p` to the closest point of the rectangle, 0 if `p` is inside
    pub fn distance_squared_to(&self, p: &Point2D) -> f64 {
        let dx = if p.x < self.xmin { p.x - self.xmin } else if p.x > self.xmax { p.x - self.xmax } else { 0.0 };
        let dy = if p.y < self.ymin { p.y - self.ymin } else if p.y > self.ymax { p.y - self.ymax } else { 0.0 };
        dx*dx + dy*dy
    }

    pub fn distance_to(&self, p: &Point2D) -> f64 {
        self.distance_squared_to(p).sqrt()
    }

    pub(crate) fn check_bounds(&self, p: &Point2D) -> Result<()> {
        if self.contains(p) { Ok(()) } else { Err(Error::OutOfBounds{x: p.x, y: p.y}) }
    }

    /// Cut along the line `axis = at`.  The caller guarantees `at` lies within the rectangle's extent on `axis`.
    pub fn split_at(&self, axis: Axis, at: f64) -> (Self, Self) {
        let mut lo = *self;
        let mut hi = *self;
        match axis {
            Axis::X => { lo.xmax = at; hi.xmin = at }
            Axis::Y => { lo.ymax = at; hi.ymin = at }
        }
        (lo, hi)
    }
}

impl fmt::Display for RectHV {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}] x [{}, {}]", self.xmin, self.xmax, self.ymin, self.ymax)
    }
}

impl KdRegion for RectHV {
    type Point = Point2D;

    fn split(&self, point: &Self::Point, layer: usize) -> (Self, Self) {
        let axis = Axis::at_depth(layer);
        self.split_at(axis, point.coord(axis))
    }

    fn min_sqdist(&self, point: &Self::Point) -> OrderedFloat<f64> {
        OrderedFloat(self.distance_squared_to(point))
    }

    fn might_overlap(&self, other: &Self) -> bool {
        self.intersects(other)
    }
}
