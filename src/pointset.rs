use std::collections::{btree_set, BTreeSet};

use tracing::debug;

use crate::{KdPoint, Point2D, RectHV, Result, SpatialSet};

/// A set of points inside a bounding rectangle (the unit square by default), kept in a `BTreeSet`.
/// - Insert / contains: O(log(n))
/// - Range / nearest: O(n), a full scan
/// This is the reference that `KdTree` is checked against.
#[derive(Clone, Debug)]
pub struct PointSet {
    bounds: RectHV,
    points: BTreeSet<Point2D>
}

impl PointSet {
    /// Create an empty set over the unit square
    pub fn new() -> Self {
        Self::with_bounds(RectHV::UNIT)
    }

    /// Create an empty set that accepts points inside `bounds` (boundary included)
    pub fn with_bounds(bounds: RectHV) -> Self {
        Self{bounds, points: BTreeSet::new()}
    }

    pub fn bounds(&self) -> &RectHV {
        &self.bounds
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Add a point if it is not already present.
    /// Returns Ok(true) if it was added, Ok(false) if it was a duplicate,
    /// or `Error::OutOfBounds` (leaving the set untouched) if it lies outside `bounds`.
    pub fn insert(&mut self, point: Point2D) -> Result<bool> {
        self.check(&point)?;
        Ok(self.points.insert(point))
    }

    pub fn contains(&self, point: &Point2D) -> Result<bool> {
        self.check(point)?;
        Ok(self.points.contains(point))
    }

    /// All points inside `rect`, in lexicographic order.  `rect` may extend past `bounds`.
    pub fn range(&self, rect: &RectHV) -> Vec<Point2D> {
        self.points.iter().filter(|p|rect.contains(p)).copied().collect()
    }

    /// The closest point to `point`, which may lie anywhere.
    /// Ties go to the lexicographically smallest point.  None if the set is empty.
    pub fn nearest(&self, point: &Point2D) -> Option<&Point2D> {
        self.points.iter().min_by_key(|p|point.sqdist(p))
    }

    /// Points in lexicographic order
    pub fn iter(&self) -> btree_set::Iter<'_, Point2D> {
        self.points.iter()
    }

    fn check(&self, point: &Point2D) -> Result<()> {
        self.bounds.check_bounds(point).inspect_err(|_|debug!(%point, bounds = %self.bounds, "point set rejected point"))
    }
}

impl Default for PointSet {
    fn default() -> Self {
        Self::new()
    }
}

impl SpatialSet for PointSet {
    fn len(&self) -> usize {
        PointSet::len(self)
    }

    fn insert(&mut self, point: Point2D) -> Result<bool> {
        PointSet::insert(self, point)
    }

    fn contains(&self, point: &Point2D) -> Result<bool> {
        PointSet::contains(self, point)
    }

    fn range(&self, rect: &RectHV) -> Vec<Point2D> {
        PointSet::range(self, rect)
    }

    fn nearest(&self, point: &Point2D) -> Option<&Point2D> {
        PointSet::nearest(self, point)
    }
}

impl<'a> IntoIterator for &'a PointSet {
    type Item = &'a Point2D;
    type IntoIter = btree_set::Iter<'a, Point2D>;
    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}
