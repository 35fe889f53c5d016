use std::f64::consts::TAU;

use log::debug;

use crate::{
    geometry::{FloatType, GeometryError, Ray, Traced, WorldPoint, WorldVector, ensure_finite},
    util::Stats,
};

use super::bvh::Bvh;

/// Point light that shoots an evenly spaced fan of rays in all directions.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RadialLight {
    position: WorldPoint,
}

/// Outcome of casting a fan of rays.
#[derive(Clone, Debug, PartialEq)]
pub struct CastReport {
    /// Nearest hit of every ray that hit something, in ray order
    pub hits: Vec<WorldPoint>,
    pub total_cost: usize,
    pub ray_count: usize,
    /// Distribution of per ray costs
    pub cost: Stats,
}

impl RadialLight {
    pub fn new(position: WorldPoint) -> Result<RadialLight, GeometryError> {
        ensure_finite("light position", position.iter())?;
        Ok(RadialLight { position })
    }

    pub fn position(&self) -> WorldPoint {
        self.position
    }

    /// `count` rays, the i-th one at angle `2π * i / count` counterclockwise from +x.
    pub fn rays(&self, count: usize) -> impl Iterator<Item = Result<Ray, GeometryError>> + '_ {
        (0..count).map(move |i| {
            let (sin, cos) = (TAU * i as FloatType / count as FloatType).sin_cos();
            Ray::new(self.position, WorldVector::new(cos, sin))
        })
    }

    pub fn cast(&self, bvh: &Bvh, count: usize) -> Result<CastReport, GeometryError> {
        self.cast_with(count, |ray| bvh.intersect(ray))
    }

    /// Same fan as `cast`, but every ray is tested against every primitive.
    pub fn cast_brute_force(&self, bvh: &Bvh, count: usize) -> Result<CastReport, GeometryError> {
        self.cast_with(count, |ray| bvh.intersect_brute_force(ray))
    }

    fn cast_with(
        &self,
        count: usize,
        intersect: impl Fn(&Ray) -> Traced<Option<WorldPoint>>,
    ) -> Result<CastReport, GeometryError> {
        let mut report = CastReport {
            hits: Vec::new(),
            total_cost: 0,
            ray_count: count,
            cost: Stats::default(),
        };

        for ray in self.rays(count) {
            let result = intersect(&ray?);
            report.total_cost += result.cost;
            report.cost.add_sample(result.cost);
            report.hits.extend(result.hit);
        }

        debug!(
            "Cast {} rays from {:?}: {} hits, {} intersection tests",
            count,
            self.position,
            report.hits.len(),
            report.total_cost
        );

        Ok(report)
    }
}

impl CastReport {
    /// Mean number of intersection tests per ray, zero for an empty fan.
    pub fn average_cost(&self) -> f64 {
        if self.ray_count == 0 {
            0.0
        } else {
            self.total_cost as f64 / self.ray_count as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{
        Shape as _,
        bvh::{
            BuildSettings, SplitPolicy,
            test::{segment, six_circles},
        },
    };

    use assert2::{assert, let_assert};
    use test_case::test_case;

    fn origin_light() -> RadialLight {
        RadialLight::new(WorldPoint::origin()).unwrap()
    }

    #[test]
    fn fan_directions() {
        let rays: Vec<Ray> = origin_light()
            .rays(4)
            .collect::<Result<_, _>>()
            .unwrap();

        assert!(rays.len() == 4);
        let expected = [(1.0, 0.0), (0.0, 1.0), (-1.0, 0.0), (0.0, -1.0)];
        for (ray, (x, y)) in rays.iter().zip(expected) {
            assert!((ray.direction() - WorldVector::new(x, y)).norm() < 1e-12);
        }
    }

    #[test]
    fn non_finite_position_is_rejected() {
        let_assert!(
            Err(GeometryError::NonFinite(_)) =
                RadialLight::new(WorldPoint::new(FloatType::NAN, 0.0))
        );
    }

    #[test_case(SplitPolicy::MaxSeparation, 1786 ; "max_separation")]
    #[test_case(SplitPolicy::Midpoint, 2268 ; "midpoint")]
    fn six_circle_fan(split_policy: SplitPolicy, expected_cost: usize) {
        let settings = BuildSettings::builder().split_policy(split_policy).build();
        let bvh = Bvh::build(six_circles(), settings).unwrap();
        let report = origin_light().cast(&bvh, 360).unwrap();

        assert!(report.ray_count == 360);
        assert!(report.hits.len() == 107);
        assert!(report.total_cost == expected_cost);
        assert!(report.cost.count == 360);
        assert!((report.average_cost() - expected_cost as f64 / 360.0).abs() < 1e-12);
    }

    #[test]
    fn both_trees_see_the_same_hits() {
        let unbalanced = Bvh::build(six_circles(), BuildSettings::default()).unwrap();
        let balanced = Bvh::build(
            six_circles(),
            BuildSettings::builder()
                .split_policy(SplitPolicy::Midpoint)
                .build(),
        )
        .unwrap();

        let light = origin_light();
        let a = light.cast(&unbalanced, 360).unwrap();
        let b = light.cast(&balanced, 360).unwrap();
        let brute_force = light.cast_brute_force(&unbalanced, 360).unwrap();

        assert!(a.hits == b.hits);
        assert!(a.hits == brute_force.hits);
        assert!(brute_force.total_cost == 6 * 360);
    }

    #[test]
    fn hits_lie_on_the_circles() {
        let bvh = Bvh::build(six_circles(), BuildSettings::default()).unwrap();
        let report = origin_light().cast(&bvh, 360).unwrap();

        for hit in &report.hits {
            let on_some_circle = six_circles()
                .iter()
                .any(|p| ((hit - p.center()).norm() - 0.5).abs() < 1e-9);
            assert!(on_some_circle);
        }
    }

    #[test]
    fn segment_walls() {
        // Light enclosed in a square of segments, every ray must hit.
        // No ray of the fan passes exactly through a corner.
        let walls = [
            segment(-1.0, -1.0, 1.0, -1.0),
            segment(1.0, -1.0, 1.0, 1.0),
            segment(1.0, 1.0, -1.0, 1.0),
            segment(-1.0, 1.0, -1.0, -1.0),
        ];
        let bvh = Bvh::build(walls, BuildSettings::default()).unwrap();
        let report = origin_light().cast(&bvh, 60).unwrap();

        assert!(report.hits.len() == 60);
        for hit in &report.hits {
            assert!((hit.x.abs().max(hit.y.abs()) - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn empty_fan() {
        let bvh = Bvh::build(six_circles(), BuildSettings::default()).unwrap();
        let report = origin_light().cast(&bvh, 0).unwrap();

        assert!(report.hits.is_empty());
        assert!(report.total_cost == 0);
        assert!(report.average_cost() == 0.0);
    }
}
