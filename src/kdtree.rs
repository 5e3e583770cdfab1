use std::{cmp::Ordering, slice};

use num_traits::Zero;
use tracing::{debug, trace};

use crate::{Axis, KdPoint, KdRegion, Point2D, RectHV, Result, SpatialSet, WalkDecision};

const LOWER: usize = 0;
const UPPER: usize = 1;

/// Which child a point belongs under.  Ties on the splitting axis go to the upper child.
fn side(ord: Ordering) -> usize {
    match ord {
        Ordering::Less => LOWER,
        _ => UPPER
    }
}

#[derive(Clone, Debug)]
struct Node {
    point: Point2D,
    /// Fixed when the node is attached: the parent's region cut at the parent's point
    region: RectHV,
    children: [Option<usize>; 2]
}

/// Where a descent for some point ended up
enum Slot {
    Empty,
    Occupied,
    Vacant{parent: usize, side: usize, layer: usize}
}

/// The splitting line of one node, clipped to that node's region
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Split {
    pub point: Point2D,
    pub region: RectHV,
    pub axis: Axis
}

impl Split {
    /// Endpoints of the splitting segment, lower end first
    pub fn segment(&self) -> (Point2D, Point2D) {
        match self.axis {
            Axis::X => (Point2D::new(self.point.x(), self.region.ymin()), Point2D::new(self.point.x(), self.region.ymax())),
            Axis::Y => (Point2D::new(self.region.xmin(), self.point.y()), Point2D::new(self.region.xmax(), self.point.y()))
        }
    }
}

/// A 2d tree represents a set of points inside a bounding rectangle (the unit square by default),
/// with the ability to answer:
/// - Is a point in the set?  O(log(n)) typical, O(n) worst case
/// - What are all the points within a given rectangle?  (Sometimes called a range query)
///   O(r + log(n)) typical where r is the number of matches, O(n) worst case
/// - What is the closest point to a given point?  O(log(n)) typical, O(n) worst case
/// Nodes at even depth split their region with a vertical line through their point, nodes at odd depth
/// with a horizontal line.
/// Nodes live in one buffer in insertion order and refer to their children by index, so the root is
/// always at index 0.  Points can be added one at a time but never removed, and the tree is not rebalanced,
/// so inserting points in sorted order gives the linear worst case.
#[derive(Clone, Debug)]
pub struct KdTree {
    bounds: RectHV,
    nodes: Vec<Node>
}

impl KdTree {
    /// Create an empty tree over the unit square
    pub fn new() -> Self {
        Self::with_bounds(RectHV::UNIT)
    }

    /// Create an empty tree that accepts points inside `bounds` (boundary included).
    /// `bounds` becomes the root's region.
    pub fn with_bounds(bounds: RectHV) -> Self {
        Self{bounds, nodes: Vec::new()}
    }

    pub fn bounds(&self) -> &RectHV {
        &self.bounds
    }

    /// Get the number of points in the tree
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of layers in the tree, 0 if it is empty
    pub fn depth(&self) -> usize {
        let mut res = 0;
        self.walk(&mut |_, _, layer|{
            res = res.max(layer + 1);
            WalkDecision::Continue
        });
        res
    }

    /// Add a point if it is not already present.
    /// Returns Ok(true) if it was added, Ok(false) if it was a duplicate,
    /// or `Error::OutOfBounds` (leaving the tree untouched) if it lies outside `bounds`.
    pub fn insert(&mut self, point: Point2D) -> Result<bool> {
        self.check(&point)?;
        let (region, link) = match self.find(&point) {
            Slot::Occupied => return Ok(false),
            Slot::Empty => (self.bounds, None),
            Slot::Vacant{parent, side, layer} => {
                let parent_node = &self.nodes[parent];
                let halves = parent_node.region.split(&parent_node.point, layer);
                (if side == LOWER { halves.0 } else { halves.1 }, Some((parent, side)))
            }
        };
        let idx = self.nodes.len();
        self.nodes.push(Node{point, region, children: [None, None]});
        if let Some((parent, side)) = link {
            self.nodes[parent].children[side] = Some(idx);
        }
        trace!(%point, idx, "attached node");
        Ok(true)
    }

    /// Ok(true) iff the tree holds a point with exactly these coordinates.
    /// Fails like `insert` for points outside `bounds`.
    pub fn contains(&self, point: &Point2D) -> Result<bool> {
        self.check(point)?;
        Ok(matches!(self.find(point), Slot::Occupied))
    }

    /// All points inside `rect` (boundary included), in depth first order.
    /// `rect` may extend past `bounds`.  Only subtrees whose region meets `rect` are visited.
    pub fn range(&self, rect: &RectHV) -> Vec<Point2D> {
        self.range_counted(rect).0
    }

    /// The closest point to `point`, which may lie anywhere.  None if the tree is empty.
    /// Among points at the same distance, the first one reached wins.
    /// The child on the same side of the splitting line as `point` is searched first, and the other child
    /// is only searched if its region is strictly closer than the best point found so far.
    pub fn nearest(&self, point: &Point2D) -> Option<&Point2D> {
        self.nearest_counted(point).0.map(|idx|&self.nodes[idx].point)
    }

	/// Visit every node in depth first order, lower child before upper child,
	/// calling a visitor function on each.  The visitor function gets the node's region, its point,
	/// and its depth (which determines the splitting axis, see `Axis::at_depth`),
	/// and may return a WalkDecision to instruct the traversal to skip the
	/// subtree or to stop the traversal entirely.
    pub fn walk<'a>(&'a self, visitor: &mut impl FnMut(&'a RectHV, &'a Point2D, usize) -> WalkDecision) {
        if self.is_empty() { return }
        let mut todo = vec![(0, 0)];
        while let Some((idx, layer)) = todo.pop() {
            let node = &self.nodes[idx];
            match visitor(&node.region, &node.point, layer) {
                WalkDecision::Stop => return,
                WalkDecision::SkipChildren => continue,
                WalkDecision::Continue => ()
            }
            todo.extend(node.children.iter().rev().flatten().map(|&c|(c, layer + 1)));
        }
    }

    /// The splitting segment of every node, in depth first order.
    /// Together with the points this is everything needed to draw the tree.
    pub fn splits(&self) -> Vec<Split> {
        let mut res = Vec::with_capacity(self.len());
        self.walk(&mut |region, point, layer|{
            res.push(Split{point: *point, region: *region, axis: Axis::at_depth(layer)});
            WalkDecision::Continue
        });
        res
    }

    /// Borrowing iterator over the points in insertion order
    pub fn iter(&self) -> Iter<'_> {
        Iter{nodes: self.nodes.iter()}
    }

    /// `range`, also returning how many nodes had their region tested against `rect`
    fn range_counted(&self, rect: &RectHV) -> (Vec<Point2D>, usize) {
        let mut res = Vec::new();
        let mut visited = 0;
        self.walk(&mut |region, point, _|{
            visited += 1;
            if !rect.might_overlap(region) {
                return WalkDecision::SkipChildren;
            }
            if rect.contains(point) {
                res.push(*point);
            }
            WalkDecision::Continue
        });
        (res, visited)
    }

    /// Index of the nearest node, and how many nodes had their point compared against `point`
    fn nearest_counted(&self, point: &Point2D) -> (Option<usize>, usize) {
        if self.is_empty() { return (None, 0) }
        let mut best = (0, point.sqdist(&self.nodes[0].point));
        let mut visited = 0;
        // (node, layer, whether the node is a far child that has to beat `best` to be searched)
        let mut todo = vec![(0, 0, false)];
        while let Some((idx, layer, bounded)) = todo.pop() {
            let node = &self.nodes[idx];
            if bounded && node.region.min_sqdist(point) >= best.1 {
                continue;
            }
            visited += 1;
            let d = point.sqdist(&node.point);
            if d < best.1 {
                best = (idx, d);
            }
            if best.1.is_zero() {
                break;
            }
            let near = side(KdPoint::cmp(point, &node.point, layer));
            // far is pushed first so the whole near subtree is done before its bound is checked
            if let Some(far) = node.children[1 - near] { todo.push((far, layer + 1, true)) }
            if let Some(next) = node.children[near] { todo.push((next, layer + 1, false)) }
        }
        (Some(best.0), visited)
    }

    fn check(&self, point: &Point2D) -> Result<()> {
        self.bounds.check_bounds(point).inspect_err(|_|debug!(%point, bounds = %self.bounds, "kd tree rejected point"))
    }

    fn find(&self, point: &Point2D) -> Slot {
        if self.is_empty() { return Slot::Empty }
        let mut idx = 0;
        let mut layer = 0;
        loop {
            let node = &self.nodes[idx];
            if node.point == *point {
                return Slot::Occupied;
            }
            let side = side(KdPoint::cmp(point, &node.point, layer));
            match node.children[side] {
                Some(child) => idx = child,
                None => return Slot::Vacant{parent: idx, side, layer}
            }
            layer += 1;
        }
    }

    #[cfg(test)]
    fn subtree(&self, idx: usize) -> Vec<&Point2D> {
        let mut res = Vec::new();
        let mut todo = vec![idx];
        while let Some(i) = todo.pop() {
            res.push(&self.nodes[i].point);
            todo.extend(self.nodes[i].children.iter().flatten());
        }
        res
    }

    #[cfg(test)]
    pub(crate) fn check_tree(&self) -> bool {
        if self.is_empty() {
            return true
        }
        if self.nodes[0].region != self.bounds {
            return false
        }
        let mut seen = 0;
        let mut todo = vec![(0, 0)];
        while let Some((idx, layer)) = todo.pop() {
            seen += 1;
            let node = &self.nodes[idx];
            if !node.region.contains(&node.point) || !self.bounds.contains_rect(&node.region) {
                return false
            }
            let halves = node.region.split(&node.point, layer);
            for (s, half) in [(LOWER, halves.0), (UPPER, halves.1)] {
                let Some(c) = node.children[s] else { continue };
                if self.nodes[c].region != half || !node.region.contains_rect(&half) {
                    return false
                }
                for p in self.subtree(c) {
                    if p == &node.point || side(KdPoint::cmp(p, &node.point, layer)) != s {
                        return false
                    }
                }
                todo.push((c, layer + 1));
            }
        }
        seen == self.len()
    }
}

impl Default for KdTree {
    fn default() -> Self {
        Self::new()
    }
}

impl SpatialSet for KdTree {
    fn len(&self) -> usize {
        KdTree::len(self)
    }

    fn insert(&mut self, point: Point2D) -> Result<bool> {
        KdTree::insert(self, point)
    }

    fn contains(&self, point: &Point2D) -> Result<bool> {
        KdTree::contains(self, point)
    }

    fn range(&self, rect: &RectHV) -> Vec<Point2D> {
        KdTree::range(self, rect)
    }

    fn nearest(&self, point: &Point2D) -> Option<&Point2D> {
        KdTree::nearest(self, point)
    }
}

pub struct Iter<'a> {
    nodes: slice::Iter<'a, Node>
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Point2D;
    fn next(&mut self) -> Option<Self::Item> {
        self.nodes.next().map(|n|&n.point)
    }
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.nodes.size_hint()
    }
}

impl<'a> IntoIterator for &'a KdTree {
    type Item = &'a Point2D;
    type IntoIter = Iter<'a>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
