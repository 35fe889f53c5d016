use super::{FloatType, Ray, Traced, WorldBox};

/// Every box is grown on all sides by this fraction of the largest coordinate involved
/// (at least 1) before the slab test. Rounding in the primitive tests stays well below it.
pub const BOX_PADDING: FloatType = 1e-9;

pub trait RayIntersectionExt {
    /// Calculate the range of ray parameters where the ray is inside all slabs of the
    /// box grown by `BOX_PADDING`.
    /// Returns `None` if the per-axis ranges don't overlap.
    /// The range is not clamped to the ray origin, `t_near` may be negative.
    fn slab_interval(&self, ray: &Ray) -> Option<(FloatType, FloatType)>;

    /// Test whether the ray hits the box in front of its origin. Always costs 1.
    /// Touching the box in a single point counts as a hit, so that boxes with zero width
    /// or height (axis aligned line segments) can be hit.
    fn intersect(&self, ray: &Ray) -> Traced<bool>;
}

impl RayIntersectionExt for WorldBox {
    fn slab_interval(&self, ray: &Ray) -> Option<(FloatType, FloatType)> {
        let origin = ray.origin();
        let direction = ray.direction();

        let (tx_min, tx_max) = axis_interval(self.min.x, self.max.x, origin.x, direction.x);
        let (ty_min, ty_max) = axis_interval(self.min.y, self.max.y, origin.y, direction.y);

        if tx_min > ty_max || ty_min > tx_max {
            None
        } else {
            Some((tx_min.max(ty_min), tx_max.min(ty_max)))
        }
    }

    fn intersect(&self, ray: &Ray) -> Traced<bool> {
        let hit = self
            .slab_interval(ray)
            .is_some_and(|(t_near, t_far)| t_far >= t_near.max(0.0));
        Traced::new(hit, 1)
    }
}

/// Ray parameter range between the two (padded) planes of a single slab, ordered.
/// Zero direction component leaves the axis unconstrained, even if the origin is outside
/// of the slab.
fn axis_interval(
    box_min: FloatType,
    box_max: FloatType,
    origin: FloatType,
    direction: FloatType,
) -> (FloatType, FloatType) {
    if direction == 0.0 {
        return (FloatType::NEG_INFINITY, FloatType::INFINITY);
    }

    let padding = BOX_PADDING * box_min.abs().max(box_max.abs()).max(origin.abs()).max(1.0);
    let t1 = (box_min - padding - origin) / direction;
    let t2 = (box_max + padding - origin) / direction;
    if t1 > t2 { (t2, t1) } else { (t1, t2) }
}
