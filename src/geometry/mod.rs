pub mod aabb;
mod ray_box_intersection;

pub use aabb::AABB;
pub use ray_box_intersection::{BOX_PADDING, RayIntersectionExt};

use nalgebra::{Point2, Vector2};
use thiserror::Error;

pub type FloatType = f64;

pub type WorldPoint = Point2<FloatType>;
pub type WorldVector = Vector2<FloatType>;
pub type WorldBox = AABB<WorldPoint>;

/// Distance (in multiples of the direction vector) that a ray origin is pushed forward,
/// so that a ray leaving a surface doesn't immediately hit that surface again.
pub const RAY_ORIGIN_OFFSET: FloatType = 1e-6;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum GeometryError {
    #[error("{0} has a non-finite coordinate")]
    NonFinite(&'static str),

    #[error("Ray direction must be non-zero")]
    ZeroDirection,

    #[error("Circle radius must not be negative, got {0}")]
    NegativeRadius(FloatType),
}

/// Fails with `GeometryError::NonFinite` if any of the values is NaN or infinite.
pub(crate) fn ensure_finite<'a>(
    what: &'static str,
    values: impl IntoIterator<Item = &'a FloatType>,
) -> Result<(), GeometryError> {
    if values.into_iter().all(|x| x.is_finite()) {
        Ok(())
    } else {
        Err(GeometryError::NonFinite(what))
    }
}

/// Construct a point, rejecting NaN and infinite coordinates.
pub fn finite_point(x: FloatType, y: FloatType) -> Result<WorldPoint, GeometryError> {
    ensure_finite("point", &[x, y])?;
    Ok(WorldPoint::new(x, y))
}

/// Construct a vector, rejecting NaN and infinite coordinates.
pub fn finite_vector(x: FloatType, y: FloatType) -> Result<WorldVector, GeometryError> {
    ensure_finite("vector", &[x, y])?;
    Ok(WorldVector::new(x, y))
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Ray {
    /// Origin of the ray, already moved forward by `RAY_ORIGIN_OFFSET`
    origin: WorldPoint,
    /// Direction of the ray, not normalized, never zero
    direction: WorldVector,
}

impl Ray {
    pub fn new(origin: WorldPoint, direction: WorldVector) -> Result<Ray, GeometryError> {
        ensure_finite("ray origin", origin.iter())?;
        ensure_finite("ray direction", direction.iter())?;
        if direction.norm_squared() == 0.0 {
            return Err(GeometryError::ZeroDirection);
        }

        Ok(Ray {
            origin: origin + direction * RAY_ORIGIN_OFFSET,
            direction,
        })
    }

    /// Ray starting at `origin` and going through `target`.
    pub fn towards(origin: WorldPoint, target: WorldPoint) -> Result<Ray, GeometryError> {
        Ray::new(origin, target - origin)
    }

    pub fn origin(&self) -> WorldPoint {
        self.origin
    }

    pub fn direction(&self) -> WorldVector {
        self.direction
    }

    pub fn point_at(&self, t: FloatType) -> WorldPoint {
        self.origin + self.direction * t
    }
}

/// Query result together with its traversal cost.
/// Cost counts box and primitive tests, one unit each.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Traced<T> {
    pub hit: T,
    pub cost: usize,
}

impl<T> Traced<T> {
    pub fn new(hit: T, cost: usize) -> Traced<T> {
        Traced { hit, cost }
    }
}
