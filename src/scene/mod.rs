pub mod bvh;
pub mod light;
pub mod primitives;

use crate::geometry::{Ray, Traced, WorldBox, WorldPoint};

/// Anything that can be put into a BVH
pub trait Shape {
    /// Representative point used for sorting and splitting during BVH construction.
    fn center(&self) -> WorldPoint;
    fn bounding_box(&self) -> WorldBox;
    /// Nearest intersection with the ray in front of its origin. Costs 1.
    fn intersect(&self, ray: &Ray) -> Traced<Option<WorldPoint>>;
}

/// Pick the hit that is nearer to `origin`, comparing squared distances.
/// On a tie the later `candidate` wins.
pub(crate) fn nearer(
    origin: WorldPoint,
    current: Option<WorldPoint>,
    candidate: Option<WorldPoint>,
) -> Option<WorldPoint> {
    match (current, candidate) {
        (Some(current), Some(candidate)) => {
            if (current - origin).norm_squared() < (candidate - origin).norm_squared() {
                Some(current)
            } else {
                Some(candidate)
            }
        }
        (current, None) => current,
        (None, candidate) => candidate,
    }
}
