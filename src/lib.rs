pub mod error;
pub mod geom;
pub mod input;
pub mod kdtree;
pub mod pointset;

use std::cmp::Ordering;

use num_traits::Zero;

pub use error::{Error, Result};
pub use geom::{Axis, Point2D, RectHV};
pub use kdtree::{KdTree, Split};
pub use pointset::PointSet;



pub trait KdPoint: Sized {
    type Distance: Ord + Zero;
    fn sqdist(&self, other: &Self) -> Self::Distance;
    fn cmp(&self, other: &Self, layer: usize) -> Ordering;
}

pub trait KdRegion: Sized + Clone {
    type Point: KdPoint;
    /// Split into the lower and upper halves on the axis for `layer`, at `point`'s coordinate.
    /// Both halves include the splitting line.
    fn split(&self, point: &Self::Point, layer: usize) -> (Self, Self);
    fn min_sqdist(&self, point: &Self::Point) -> <Self::Point as KdPoint>::Distance;
    /// Closed regions touching only on their boundary count as overlapping
    fn might_overlap(&self, other: &Self) -> bool;
}



pub enum WalkDecision {
    Continue,
    SkipChildren,
    Stop
}



/// The operations shared by `KdTree` and its brute force reference `PointSet`.
/// For any sequence of inserts, both must agree on membership, on the set of points
/// returned by `range`, and on the distance to the point returned by `nearest`.
pub trait SpatialSet {
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
    /// Ok(true) if the point was added, Ok(false) if it was already present
    fn insert(&mut self, point: Point2D) -> Result<bool>;
    fn contains(&self, point: &Point2D) -> Result<bool>;
    fn range(&self, rect: &RectHV) -> Vec<Point2D>;
    fn nearest(&self, point: &Point2D) -> Option<&Point2D>;
}



/// Insert every point from `points`, stopping at the first one that is rejected.
/// Points inserted before the failure stay in the set.
/// Returns how many points were actually new.
pub fn insert_all<S: SpatialSet>(set: &mut S, points: impl IntoIterator<Item = Point2D>) -> Result<usize> {
    let mut added = 0;
    for p in points {
        if set.insert(p)? { added += 1 }
    }
    Ok(added)
}
