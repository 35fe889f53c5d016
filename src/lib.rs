pub mod geometry;
pub mod scene;
mod util;

pub use geometry::{GeometryError, Ray, Traced};
pub use scene::{
    Shape,
    bvh::{BuildError, BuildSettings, Bvh, SplitPolicy, TreeStatistics},
    light::{CastReport, RadialLight},
    primitives::{Circle, LineSegment, Primitive},
};
pub use util::Stats;
