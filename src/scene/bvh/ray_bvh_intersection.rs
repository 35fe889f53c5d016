use crate::{
    geometry::{Ray, RayIntersectionExt as _, Traced, WorldPoint},
    scene::{Shape as _, nearer},
};

use super::{Bvh, NodeLink};

impl Bvh {
    /// Find the nearest intersection of the ray with any of the primitives.
    ///
    /// Every box and primitive test adds 1 to the cost. Both children of every node whose
    /// box is hit get visited, the search is not cut short by hits found earlier.
    /// Of two equally distant hits the one further right in the tree is kept.
    pub fn intersect(&self, ray: &Ray) -> Traced<Option<WorldPoint>> {
        let origin = ray.origin();
        let mut stack = vec![NodeLink::Inner(Self::root())];
        let mut result = Traced::new(None, 0);

        while let Some(link) = stack.pop() {
            match link {
                NodeLink::Inner(index) => {
                    let node = &self.nodes[index];
                    let box_hit = node.bounding_box.intersect(ray);
                    result.cost += box_hit.cost;

                    if box_hit.hit {
                        // Left child gets popped first
                        stack.push(node.right);
                        stack.push(node.left);
                    }
                }
                NodeLink::Leaf(index) => {
                    let primitive_hit = self.primitives[index].intersect(ray);
                    result.cost += primitive_hit.cost;
                    result.hit = nearer(origin, result.hit, primitive_hit.hit);
                }
            }
        }

        result
    }

    /// Test the ray against every primitive in input order and keep the nearest hit.
    /// Cost is the number of primitives.
    pub fn intersect_brute_force(&self, ray: &Ray) -> Traced<Option<WorldPoint>> {
        let origin = ray.origin();
        self.primitives
            .iter()
            .map(|primitive| primitive.intersect(ray))
            .fold(Traced::new(None, 0), |acc, current| {
                Traced::new(nearer(origin, acc.hit, current.hit), acc.cost + current.cost)
            })
    }
}
