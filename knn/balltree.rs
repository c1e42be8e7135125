//! Ball-tree spatial index for exact k-nearest-neighbor search.
//!
//! Every node bounds its subtree by a center point and a covering radius
//! under the haversine metric, which allows whole subtrees to be skipped
//! during a query without ever losing a candidate. The tree stores point
//! indices only; the coordinate slice it was built over stays the single
//! source of truth and must be passed back in at query time.
//!
//! ## Algorithm Overview
//!
//! Build:
//! 1. Compute the centroid of the node's points and the maximum distance
//!    from the centroid to any of them (the covering radius)
//! 2. If the node is small enough, store the indices as a leaf
//! 3. Otherwise split the indices at the median of the coordinate with the
//!    greatest spread and recurse into both halves
//!
//! Query:
//! 1. Keep a bounded max-heap of the k best `(distance, index)` candidates
//! 2. Visit nodes in order of increasing lower-bound distance
//!    `max(0, d(query, center) - radius)` via a min-heap
//! 3. Skip a subtree once its lower bound exceeds the current k-th best
//!    distance; by the triangle inequality no point inside it can improve
//!    the result
//!
//! ## Performance
//!
//! - Build: O(n log n), depth O(log n) from the median split
//! - Query: far fewer than n distance evaluations on average, with the
//!   exact same results a linear scan would produce

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::error::LocusError;
use crate::knn::haversine;
use crate::knn::point::GeoPoint;

/// Leaves hold at most this many points unless the caller overrides it.
pub const DEFAULT_LEAF_SIZE: usize = 8;

/// Center and covering radius of one node, radius in radians.
#[derive(Debug)]
struct Ball {
    center: GeoPoint,
    radius: f64,
}

impl Ball {
    /// Lower bound on the distance from `query` to any point inside this
    /// ball. Zero when the query falls within the covering radius.
    fn lower_bound(&self, query: GeoPoint) -> f64 {
        (haversine::angular_distance(query, self.center) - self.radius).max(0.0)
    }
}

#[derive(Debug)]
enum Node {
    Leaf {
        ball: Ball,
        indices: Vec<u32>,
    },
    Branch {
        ball: Ball,
        left: Box<Node>,
        right: Box<Node>,
    },
}

impl Node {
    fn ball(&self) -> &Ball {
        match self {
            Node::Leaf { ball, .. } => ball,
            Node::Branch { ball, .. } => ball,
        }
    }

    fn depth(&self) -> usize {
        match self {
            Node::Leaf { .. } => 1,
            Node::Branch { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }
}

/// Balanced ball-tree over a fixed set of points.
///
/// Built once from a coordinate snapshot; queries never mutate the tree, so
/// a built tree can be shared freely across threads behind an `Arc`.
#[derive(Debug)]
pub struct BallTree {
    root: Node,
    len: usize,
}

impl BallTree {
    /// Build a tree over `points` with the default leaf size.
    ///
    /// Fails with [`LocusError::EmptyIndex`] for an empty slice: an index
    /// over zero points would silently answer every query with nothing,
    /// which the engine treats as a precondition failure instead.
    pub fn build(points: &[GeoPoint]) -> Result<Self, LocusError> {
        Self::with_leaf_size(points, DEFAULT_LEAF_SIZE)
    }

    /// Build with an explicit leaf size (clamped to at least 1).
    pub fn with_leaf_size(points: &[GeoPoint], leaf_size: usize) -> Result<Self, LocusError> {
        if points.is_empty() {
            return Err(LocusError::EmptyIndex);
        }

        let leaf_size = leaf_size.max(1);
        let mut indices: Vec<u32> = (0..points.len() as u32).collect();
        let root = build_node(points, &mut indices, leaf_size);

        Ok(BallTree {
            root,
            len: points.len(),
        })
    }

    /// Number of indexed points.
    pub fn len(&self) -> usize {
        self.len
    }

    /// A built tree always covers at least one point.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Tree depth in nodes, for diagnostics.
    pub fn depth(&self) -> usize {
        self.root.depth()
    }

    /// Find the `min(k, len)` nearest points to `query`, as
    /// `(index, angular distance)` pairs sorted ascending by distance with
    /// ties broken by ascending index.
    ///
    /// `points` must be the same slice the tree was built over; indices in
    /// the tree refer into it.
    pub fn nearest(&self, points: &[GeoPoint], query: GeoPoint, k: usize) -> Vec<(u32, f64)> {
        debug_assert_eq!(points.len(), self.len);

        if k == 0 {
            return Vec::new();
        }
        let k = k.min(self.len);

        let mut best: BinaryHeap<Candidate> = BinaryHeap::with_capacity(k + 1);
        let mut pending = BinaryHeap::new();
        pending.push(Visit {
            bound: self.root.ball().lower_bound(query),
            node: &self.root,
        });

        while let Some(Visit { bound, node }) = pending.pop() {
            // Every unvisited node has a bound at least this large, so once
            // the k-th best distance drops below it nothing can improve.
            // Ties are not pruned: an equally distant point with a smaller
            // index may still replace a candidate.
            if best.len() == k && bound > best.peek().map_or(f64::INFINITY, |c| c.distance) {
                break;
            }

            match node {
                Node::Leaf { indices, .. } => {
                    for &index in indices {
                        let distance =
                            haversine::angular_distance(query, points[index as usize]);
                        offer(&mut best, k, Candidate { distance, index });
                    }
                }
                Node::Branch { left, right, .. } => {
                    pending.push(Visit {
                        bound: left.ball().lower_bound(query),
                        node: left,
                    });
                    pending.push(Visit {
                        bound: right.ball().lower_bound(query),
                        node: right,
                    });
                }
            }
        }

        best.into_sorted_vec()
            .into_iter()
            .map(|c| (c.index, c.distance))
            .collect()
    }
}

/// Push a candidate into the bounded heap, evicting the current worst when
/// full and the new candidate ranks strictly better.
fn offer(best: &mut BinaryHeap<Candidate>, k: usize, candidate: Candidate) {
    if best.len() < k {
        best.push(candidate);
    } else if let Some(&worst) = best.peek() {
        if candidate.cmp(&worst) == Ordering::Less {
            best.pop();
            best.push(candidate);
        }
    }
}

fn build_node(points: &[GeoPoint], indices: &mut [u32], leaf_size: usize) -> Node {
    let ball = bounding_ball(points, indices);

    if indices.len() <= leaf_size {
        return Node::Leaf {
            ball,
            indices: indices.to_vec(),
        };
    }

    // Split along the coordinate with the greatest spread, at the median so
    // the tree stays balanced. The index tie-break keeps the partition
    // deterministic for coincident coordinates.
    let split_on_latitude = latitude_spread(points, indices) >= longitude_spread(points, indices);
    let mid = indices.len() / 2;
    indices.select_nth_unstable_by(mid, |&a, &b| {
        let (ka, kb) = if split_on_latitude {
            (
                points[a as usize].latitude(),
                points[b as usize].latitude(),
            )
        } else {
            (
                points[a as usize].longitude(),
                points[b as usize].longitude(),
            )
        };
        ka.partial_cmp(&kb)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.cmp(&b))
    });

    let (near, far) = indices.split_at_mut(mid);
    Node::Branch {
        ball,
        left: Box::new(build_node(points, near, leaf_size)),
        right: Box::new(build_node(points, far, leaf_size)),
    }
}

/// Centroid of the member coordinates plus the maximum metric distance from
/// it to any member. The centroid of valid coordinates stays within valid
/// ranges, and since the radius is measured with the real metric the bound
/// holds no matter how rough the center is.
fn bounding_ball(points: &[GeoPoint], indices: &[u32]) -> Ball {
    let n = indices.len() as f64;
    let (lat_sum, lon_sum) = indices.iter().fold((0.0, 0.0), |(lat, lon), &i| {
        let p = points[i as usize];
        (lat + p.latitude(), lon + p.longitude())
    });
    let center = GeoPoint::new_unchecked(lat_sum / n, lon_sum / n);

    let radius = indices
        .iter()
        .map(|&i| haversine::angular_distance(center, points[i as usize]))
        .fold(0.0, f64::max);

    Ball { center, radius }
}

fn latitude_spread(points: &[GeoPoint], indices: &[u32]) -> f64 {
    spread(indices.iter().map(|&i| points[i as usize].latitude()))
}

fn longitude_spread(points: &[GeoPoint], indices: &[u32]) -> f64 {
    spread(indices.iter().map(|&i| points[i as usize].longitude()))
}

fn spread(values: impl Iterator<Item = f64>) -> f64 {
    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    max - min
}

/// Entry in the bounded result heap. Max-heap: the worst candidate (largest
/// distance, then largest index) sits on top and is evicted first, which
/// resolves exact distance ties in favor of the smaller original index.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    distance: f64,
    index: u32,
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate {}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.distance
            .partial_cmp(&other.distance)
            .unwrap_or(Ordering::Equal)
            .then_with(|| self.index.cmp(&other.index))
    }
}

/// Entry in the traversal queue, ordered by lower-bound distance.
/// BinaryHeap is a max-heap, so the ordering is reversed for min-heap
/// behavior, the same trick the result heap does not need.
#[derive(Debug)]
struct Visit<'a> {
    bound: f64,
    node: &'a Node,
}

impl PartialEq for Visit<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.bound == other.bound
    }
}

impl Eq for Visit<'_> {}

impl PartialOrd for Visit<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Visit<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .bound
            .partial_cmp(&self.bound)
            .unwrap_or(Ordering::Equal)
    }
}
