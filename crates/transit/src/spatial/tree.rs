//! Fixed-depth, alternating-axis partition tree over projected stops.
//!
//! Each level splits its stops at the median along one axis: x on even
//! depths, y on odd depths. Splitting stops at `max_depth` regardless of how
//! many stops remain, so the tree is balanced by count per level and every
//! leaf sits at exactly `max_depth`.
//!
//! The split key is the stop at index `len / 2` after sorting. It opens the
//! right half: left gets `[0, mid)` and right gets `[mid, len)`, so on odd
//! lengths the right half holds one more stop than the left. Ties on the
//! split coordinate are broken by stop id, which makes the shape of the tree
//! a pure function of the stop set.
//!
//! A subset that runs out of stops above `max_depth` becomes a single
//! [`Node::Vacant`]. It stands for the complete empty subtree below it, so the
//! depth invariant holds without allocating `2^depth` empty nodes.

use std::fmt;
use std::sync::Arc;

use crate::models::types::Stop;
use crate::spatial::queries::{AxisRange, Bounds};

/// Coordinate a tree level partitions on
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    /// Split axis for a node at `depth`
    pub fn for_depth(depth: usize) -> Self {
        if depth % 2 == 0 {
            Axis::X
        } else {
            Axis::Y
        }
    }

    /// The other axis
    pub fn orthogonal(self) -> Self {
        match self {
            Axis::X => Axis::Y,
            Axis::Y => Axis::X,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::X => write!(f, "x"),
            Axis::Y => write!(f, "y"),
        }
    }
}

#[derive(Debug)]
pub enum Node {
    Internal {
        axis: Axis,
        key: Arc<Stop>,
        left: Box<Node>,
        right: Box<Node>,
    },
    Leaf(Vec<Arc<Stop>>),
    /// Empty subtree above `max_depth`; every leaf it stands for is empty
    Vacant,
}

impl Node {
    /// Build the subtree rooted at `depth`
    pub fn build(mut stops: Vec<Arc<Stop>>, depth: usize, max_depth: usize) -> Node {
        if depth >= max_depth {
            return Node::Leaf(stops);
        }

        if stops.is_empty() {
            return Node::Vacant;
        }

        let axis = Axis::for_depth(depth);
        stops.sort_by(|a, b| {
            a.coordinate(axis)
                .total_cmp(&b.coordinate(axis))
                .then_with(|| a.id.cmp(&b.id))
        });

        let mid = stops.len() / 2;
        let key = stops[mid].clone();
        let right = stops.split_off(mid);

        Node::Internal {
            axis,
            key,
            left: Box::new(Node::build(stops, depth + 1, max_depth)),
            right: Box::new(Node::build(right, depth + 1, max_depth)),
        }
    }

    /// Append every stop inside the inclusive rectangle to `out`
    pub fn collect_in_rect(&self, x: &AxisRange, y: &AxisRange, out: &mut Vec<Arc<Stop>>) {
        match self {
            Node::Leaf(stops) => out.extend(
                stops
                    .iter()
                    .filter(|s| x.contains(s.location.x()) && y.contains(s.location.y()))
                    .cloned(),
            ),
            Node::Vacant => {}
            Node::Internal {
                axis,
                key,
                left,
                right,
            } => {
                let split = key.coordinate(*axis);
                let range = match axis {
                    Axis::X => x,
                    Axis::Y => y,
                };

                if range.upper() < split {
                    left.collect_in_rect(x, y, out);
                } else if range.lower() > split {
                    right.collect_in_rect(x, y, out);
                } else {
                    left.collect_in_rect(x, y, out);
                    right.collect_in_rect(x, y, out);
                }
            }
        }
    }

    /// Number of internal nodes, each carrying one split key
    pub fn split_count(&self) -> usize {
        match self {
            Node::Leaf(_) | Node::Vacant => 0,
            Node::Internal { left, right, .. } => 1 + left.split_count() + right.split_count(),
        }
    }

    /// Pre-order walk of the split lines, clipped to `bounds`
    pub fn boundaries(&self, bounds: Bounds) -> Boundaries<'_> {
        Boundaries {
            stack: vec![(self, bounds, 0)],
        }
    }
}

/// One split line of the tree, ready for an external renderer
///
/// An x split is a vertical segment at `x = coordinate` running from
/// `span_start` to `span_end` along y; a y split is the horizontal
/// counterpart.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoundarySegment {
    pub axis: Axis,
    pub coordinate: f64,
    pub span_start: f64,
    pub span_end: f64,
    pub depth: usize,
}

impl BoundarySegment {
    /// Stroke weight hint, thinning as the split gets deeper
    pub fn line_weight(&self, max_depth: usize) -> usize {
        max_depth.saturating_sub(self.depth)
    }
}

/// Lazy pre-order iterator over [`BoundarySegment`]s
pub struct Boundaries<'a> {
    stack: Vec<(&'a Node, Bounds, usize)>,
}

impl Iterator for Boundaries<'_> {
    type Item = BoundarySegment;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((node, bounds, depth)) = self.stack.pop() {
            let Node::Internal {
                axis,
                key,
                left,
                right,
            } = node
            else {
                continue;
            };

            let coordinate = key.coordinate(*axis);
            let (span_start, span_end) = bounds.span(axis.orthogonal());

            // Right first so left is visited first
            self.stack
                .push((right.as_ref(), bounds.with_lower(*axis, coordinate), depth + 1));
            self.stack
                .push((left.as_ref(), bounds.with_upper(*axis, coordinate), depth + 1));

            return Some(BoundarySegment {
                axis: *axis,
                coordinate,
                span_start,
                span_end,
                depth,
            });
        }

        None
    }
}
