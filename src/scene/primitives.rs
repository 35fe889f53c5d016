use std::fmt;

use crate::geometry::{
    FloatType, GeometryError, Ray, Traced, WorldBox, WorldPoint, ensure_finite,
};

use super::Shape;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Circle {
    center: WorldPoint,
    radius: FloatType,
}

impl Circle {
    pub fn new(center: WorldPoint, radius: FloatType) -> Result<Circle, GeometryError> {
        ensure_finite("circle", center.iter().chain([&radius]))?;
        if radius < 0.0 {
            return Err(GeometryError::NegativeRadius(radius));
        }
        Ok(Circle { center, radius })
    }

    pub fn radius(&self) -> FloatType {
        self.radius
    }
}

impl Shape for Circle {
    fn center(&self) -> WorldPoint {
        self.center
    }

    fn bounding_box(&self) -> WorldBox {
        WorldBox::around(self.center, self.radius)
    }

    fn intersect(&self, ray: &Ray) -> Traced<Option<WorldPoint>> {
        let direction = ray.direction();
        let oc = ray.origin() - self.center;

        // Ray guarantees a non-zero direction, so `a` is positive
        let a = direction.norm_squared();
        let b = 2.0 * oc.dot(&direction);
        let c = oc.norm_squared() - self.radius * self.radius;
        let discriminant = b * b - 4.0 * a * c;

        if discriminant < 0.0 {
            return Traced::new(None, 1);
        }

        let sqrt_disc = discriminant.sqrt();
        let t1 = (-b - sqrt_disc) / (2.0 * a);
        let t2 = (-b + sqrt_disc) / (2.0 * a);
        let hit = if t1 > 0.0 {
            Some(ray.point_at(t1))
        } else if t2 > 0.0 {
            Some(ray.point_at(t2))
        } else {
            None
        };

        Traced::new(hit, 1)
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LineSegment {
    start: WorldPoint,
    end: WorldPoint,
}

impl LineSegment {
    pub fn new(start: WorldPoint, end: WorldPoint) -> Result<LineSegment, GeometryError> {
        ensure_finite("line segment", start.iter().chain(end.iter()))?;
        Ok(LineSegment { start, end })
    }

    pub fn start(&self) -> WorldPoint {
        self.start
    }

    pub fn end(&self) -> WorldPoint {
        self.end
    }
}

impl Shape for LineSegment {
    fn center(&self) -> WorldPoint {
        nalgebra::center(&self.start, &self.end)
    }

    fn bounding_box(&self) -> WorldBox {
        WorldBox::new(self.start.inf(&self.end), self.start.sup(&self.end))
    }

    /// Intersects the segment with the ray's supporting line.
    /// `t` parametrizes the segment (0 at start, 1 at end), `u` the ray.
    fn intersect(&self, ray: &Ray) -> Traced<Option<WorldPoint>> {
        let (x1, y1) = (self.start.x, self.start.y);
        let (x2, y2) = (self.end.x, self.end.y);
        let (x3, y3) = (ray.origin().x, ray.origin().y);
        let (x4, y4) = (x3 + ray.direction().x, y3 + ray.direction().y);

        let denom = (x1 - x2) * (y3 - y4) - (y1 - y2) * (x3 - x4);
        if denom == 0.0 {
            // Parallel
            return Traced::new(None, 1);
        }

        let t = ((x1 - x3) * (y3 - y4) - (y1 - y3) * (x3 - x4)) / denom;
        let u = -((x1 - x2) * (y1 - y3) - (y1 - y2) * (x1 - x3)) / denom;

        let hit = ((0.0..=1.0).contains(&t) && u >= 0.0)
            .then(|| WorldPoint::new(x1 + t * (x2 - x1), y1 + t * (y2 - y1)));

        Traced::new(hit, 1)
    }
}

/// All shapes that the BVH knows about.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Primitive {
    Circle(Circle),
    LineSegment(LineSegment),
}

impl Shape for Primitive {
    fn center(&self) -> WorldPoint {
        match self {
            Primitive::Circle(circle) => circle.center(),
            Primitive::LineSegment(segment) => segment.center(),
        }
    }

    fn bounding_box(&self) -> WorldBox {
        match self {
            Primitive::Circle(circle) => circle.bounding_box(),
            Primitive::LineSegment(segment) => segment.bounding_box(),
        }
    }

    fn intersect(&self, ray: &Ray) -> Traced<Option<WorldPoint>> {
        match self {
            Primitive::Circle(circle) => circle.intersect(ray),
            Primitive::LineSegment(segment) => segment.intersect(ray),
        }
    }
}

impl From<Circle> for Primitive {
    fn from(value: Circle) -> Self {
        Primitive::Circle(value)
    }
}

impl From<LineSegment> for Primitive {
    fn from(value: LineSegment) -> Self {
        Primitive::LineSegment(value)
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Primitive::Circle(circle) => write!(
                f,
                "Circle(({}, {}), {})",
                circle.center.x, circle.center.y, circle.radius
            ),
            Primitive::LineSegment(segment) => write!(
                f,
                "LineSegment(({}, {}), ({}, {}))",
                segment.start.x, segment.start.y, segment.end.x, segment.end.y
            ),
        }
    }
}
