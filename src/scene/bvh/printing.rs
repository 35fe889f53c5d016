use std::fmt;

use itertools::Itertools as _;

use crate::util::Stats;

use super::{Bvh, NodeIdx, NodeLink, PrimitiveIdx};

use assert2::assert;

/// Shape summary of a built tree.
#[derive(Clone, Debug, PartialEq)]
pub struct TreeStatistics {
    /// Number of inner nodes between the root and each leaf link, root included
    pub depth: Stats,
    pub node_count: usize,
    /// Distinct primitives reachable from the root
    pub leaf_count: usize,
}

impl Bvh {
    /// Indented dump of the tree, one line per node or leaf.
    pub fn tree_string(&self) -> String {
        self.to_string()
    }

    pub fn print_tree(&self) {
        print!("{}", self);
    }

    pub fn leaf_count(&self) -> usize {
        self.leaf_primitives().unique().count()
    }

    pub fn statistics(&self) -> TreeStatistics {
        let mut depth = Stats::default();
        self.depth_statistics_recursive(Self::root(), 1, &mut depth);

        // Binary tree, every inner node except the root takes up one link
        assert!(depth.count == self.nodes.len() + 1);

        TreeStatistics {
            depth,
            node_count: self.node_count(),
            leaf_count: self.leaf_count(),
        }
    }

    pub fn print_statistics(&self) {
        println!("{}", self.statistics());
    }

    fn leaf_primitives(&self) -> impl Iterator<Item = PrimitiveIdx> + '_ {
        self.nodes
            .iter()
            .flat_map(|node| [node.left, node.right])
            .filter_map(|link| match link {
                NodeLink::Leaf(index) => Some(index),
                NodeLink::Inner(_) => None,
            })
    }

    fn depth_statistics_recursive(&self, node: NodeIdx, depth: usize, stats: &mut Stats) {
        let node = &self.nodes[node];
        for link in [node.left, node.right] {
            match link {
                NodeLink::Inner(child) => self.depth_statistics_recursive(child, depth + 1, stats),
                NodeLink::Leaf(_) => stats.add_sample(depth),
            }
        }
    }

    fn fmt_recursive(&self, f: &mut fmt::Formatter<'_>, indent: usize, link: NodeLink) -> fmt::Result {
        let indent_str = " ".repeat(indent);
        match link {
            NodeLink::Inner(index) => {
                // Nodes are stored in pre-order, so arena indices are also print order
                writeln!(f, "{}Node{}", indent_str, index.index())?;
                let node = &self.nodes[index];
                self.fmt_recursive(f, indent + 1, node.left)?;
                self.fmt_recursive(f, indent + 1, node.right)
            }
            NodeLink::Leaf(index) => writeln!(f, "{}{}", indent_str, self.primitives[index]),
        }
    }
}

impl fmt::Display for Bvh {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_recursive(f, 0, NodeLink::Inner(Self::root()))
    }
}

impl fmt::Display for TreeStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Depth: {}", self.depth)?;
        writeln!(f, "Inner nodes: {}", self.node_count)?;
        write!(f, "Leaves: {}", self.leaf_count)
    }
}
