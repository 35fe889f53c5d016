use bon::Builder;
use itertools::Itertools as _;
use log::{debug, trace};
use ordered_float::OrderedFloat;
use thiserror::Error;

use crate::{
    geometry::{FloatType, WorldPoint},
    scene::{Shape as _, primitives::Primitive},
};

use super::{Bvh, Node, NodeIdx, NodeLink, PrimitiveIdx};

use index_vec::{IndexSlice, IndexVec};

/// How an inner node divides its primitives (sorted along the split axis) between
/// the two children.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum SplitPolicy {
    /// Split the sorted primitives in half.
    Midpoint,
    /// Split where the mean centroid coordinates of the two halves are furthest apart.
    /// Favors separation over balance and can produce very uneven trees.
    #[default]
    MaxSeparation,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Builder)]
pub struct BuildSettings {
    #[builder(default)]
    pub split_policy: SplitPolicy,

    /// Use `split_policy` on every level of the tree.
    /// When false, `split_policy` is only used for the root and all nodes below use
    /// `SplitPolicy::MaxSeparation`.
    #[builder(default)]
    pub propagate_split_policy: bool,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("Cannot build a BVH without any primitives")]
    NoPrimitives,
}

impl Bvh {
    pub fn build(
        primitives: impl IntoIterator<Item = Primitive>,
        settings: BuildSettings,
    ) -> Result<Bvh, BuildError> {
        let primitives: IndexVec<PrimitiveIdx, Primitive> = primitives.into_iter().collect();
        if primitives.is_empty() {
            return Err(BuildError::NoPrimitives);
        }

        let centers: IndexVec<PrimitiveIdx, WorldPoint> =
            primitives.iter().map(|p| p.center()).collect();
        // Construction reorders this instead of the primitives themselves
        let mut order: Vec<PrimitiveIdx> = primitives.indices().collect();

        let mut bvh = Bvh {
            nodes: IndexVec::with_capacity(primitives.len()),
            primitives,
        };
        bvh.build_recursive(&mut order, &centers, settings.split_policy, &settings);

        debug!(
            "Built BVH over {} primitives with {:?}: {} nodes",
            bvh.primitives.len(),
            settings,
            bvh.nodes.len()
        );

        Ok(bvh)
    }

    fn build_recursive(
        &mut self,
        order: &mut [PrimitiveIdx],
        centers: &IndexSlice<PrimitiveIdx, [WorldPoint]>,
        split_policy: SplitPolicy,
        settings: &BuildSettings,
    ) -> NodeIdx {
        match *order {
            [] => unreachable!("BVH nodes are never built over an empty set"),
            [only] => self.nodes.push(Node {
                bounding_box: self.primitives[only].bounding_box(),
                left: NodeLink::Leaf(only),
                right: NodeLink::Leaf(only),
            }),
            [first, second] => self.nodes.push(Node {
                bounding_box: self.primitives[first]
                    .bounding_box()
                    .union(&self.primitives[second].bounding_box()),
                left: NodeLink::Leaf(first),
                right: NodeLink::Leaf(second),
            }),
            _ => self.build_inner_node(order, centers, split_policy, settings),
        }
    }

    fn build_inner_node(
        &mut self,
        order: &mut [PrimitiveIdx],
        centers: &IndexSlice<PrimitiveIdx, [WorldPoint]>,
        split_policy: SplitPolicy,
        settings: &BuildSettings,
    ) -> NodeIdx {
        let axis = split_axis(order, centers);
        // Stable, primitives with equal coordinates keep their relative order
        order.sort_by_key(|&i| OrderedFloat(centers[i][axis]));

        let coordinates: Vec<FloatType> = order.iter().map(|&i| centers[i][axis]).collect();
        let split = match split_policy {
            SplitPolicy::Midpoint => order.len() / 2,
            SplitPolicy::MaxSeparation => max_separation_split(&coordinates),
        };
        trace!(
            "Splitting {} primitives along axis {} at {} ({:?})",
            order.len(),
            axis,
            split,
            split_policy
        );

        // Reserve the slot so that the arena ends up in pre-order
        let node_index = self.nodes.push(Node::placeholder());

        let child_policy = if settings.propagate_split_policy {
            split_policy
        } else {
            SplitPolicy::MaxSeparation
        };

        let (left_order, right_order) = order.split_at_mut(split);
        let left = self.build_recursive(left_order, centers, child_policy, settings);
        let right = self.build_recursive(right_order, centers, child_policy, settings);

        self.nodes[node_index] = Node {
            bounding_box: self.nodes[left]
                .bounding_box
                .union(&self.nodes[right].bounding_box),
            left: NodeLink::Inner(left),
            right: NodeLink::Inner(right),
        };

        node_index
    }
}

/// Index of the axis with the largest spread of primitive centers, ties go to y.
fn split_axis(order: &[PrimitiveIdx], centers: &IndexSlice<PrimitiveIdx, [WorldPoint]>) -> usize {
    let range = |axis: usize| {
        order
            .iter()
            .map(|&i| centers[i][axis])
            .minmax()
            .into_option()
            .map_or(0.0, |(min, max)| max - min)
    };

    if range(0) > range(1) { 0 } else { 1 }
}

/// Find the split index in `1..coordinates.len()` that maximizes the distance between
/// the mean coordinate before and after the split.
/// The first index wins when several are equally good.
fn max_separation_split(coordinates: &[FloatType]) -> usize {
    let mean = |values: &[FloatType]| values.iter().sum::<FloatType>() / values.len() as FloatType;

    let mut best_split = 1;
    let mut best_distance = FloatType::NEG_INFINITY;
    for i in 1..coordinates.len() {
        let (left, right) = coordinates.split_at(i);
        let distance = (mean(left) - mean(right)).abs();
        if distance > best_distance {
            best_distance = distance;
            best_split = i;
        }
    }

    best_split
}
