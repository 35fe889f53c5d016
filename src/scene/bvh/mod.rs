mod building;
mod printing;
mod ray_bvh_intersection;

pub use building::{BuildError, BuildSettings, SplitPolicy};
pub use printing::TreeStatistics;

use crate::geometry::{WorldBox, WorldPoint};

use super::primitives::Primitive;

use index_vec::IndexVec;

/// Binary bounding volume hierarchy over a fixed set of primitives.
///
/// Inner nodes live in an arena in depth first (pre-)order, the root is always
/// the first node. Primitives are stored in the order they were passed to `build`.
#[derive(Clone, Debug)]
pub struct Bvh {
    nodes: IndexVec<NodeIdx, Node>,
    primitives: IndexVec<PrimitiveIdx, Primitive>,
}

#[derive(Clone, Debug)]
struct Node {
    /// Union of the bounding boxes of everything below this node
    bounding_box: WorldBox,
    left: NodeLink,
    right: NodeLink,
}

/// Child of a node.
/// A node built over a single primitive has both links pointing to that primitive.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum NodeLink {
    Inner(NodeIdx),
    Leaf(PrimitiveIdx),
}

index_vec::define_index_type! {
    pub struct NodeIdx = u32;
}

index_vec::define_index_type! {
    pub struct PrimitiveIdx = u32;
}

impl Node {
    /// Value for reserving a slot in the arena, overwritten once the children are built
    fn placeholder() -> Node {
        let link = NodeLink::Leaf(PrimitiveIdx::from_raw(0));
        Node {
            bounding_box: WorldBox::new(WorldPoint::origin(), WorldPoint::origin()),
            left: link,
            right: link,
        }
    }
}

impl Bvh {
    fn root() -> NodeIdx {
        NodeIdx::from_raw(0)
    }

    /// Bounding box of the whole hierarchy.
    pub fn bounding_box(&self) -> &WorldBox {
        &self.nodes[Self::root()].bounding_box
    }

    /// Primitives in the order they were given to `build`.
    pub fn primitives(&self) -> &[Primitive] {
        self.primitives.as_raw_slice()
    }

    /// Number of inner nodes, including the root.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Bounding boxes of all nodes, root first.
    pub fn node_boxes(&self) -> impl Iterator<Item = &WorldBox> {
        self.nodes.iter().map(|node| &node.bounding_box)
    }
}
