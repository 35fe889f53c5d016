use anyhow::{Context as _, ensure};
use bvh2d::{
    BuildSettings, Bvh, CastReport, Circle, Primitive, RadialLight, SplitPolicy, Stats,
    geometry::WorldPoint,
};
use clap::Parser;
use log::debug;

/// Compare the intersection cost of an unbalanced and a balanced BVH over a demo scene
#[derive(Debug, Parser)]
#[command(name = "bvh2d-cli")]
struct Cli {
    /// Number of rays in the fan around the light
    #[arg(long = "rays", default_value_t = 360)]
    ray_count: usize,

    /// Use the midpoint split on every level of the balanced tree, not only at its root
    #[arg(long)]
    propagate_split_policy: bool,
}

fn scene() -> anyhow::Result<Vec<Primitive>> {
    [
        ((-2.0, 2.0), 0.5),
        ((3.0, -1.0), 0.5),
        ((-2.0, 0.0), 0.5),
        ((3.0, 1.0), 0.5),
        ((-2.0, -2.0), 0.5),
        ((-3.5, 0.0), 0.5),
    ]
    .into_iter()
    .map(|((x, y), r)| -> anyhow::Result<Primitive> {
        Ok(Circle::new(WorldPoint::new(x, y), r)?.into())
    })
    .collect()
}

fn print_tree(title: &str, bvh: &Bvh) {
    println!("{}:", title);
    bvh.print_tree();
    bvh.print_statistics();
    for (i, node_box) in bvh.node_boxes().enumerate() {
        debug!("Node{} box: {:?} - {:?}", i, node_box.min, node_box.max);
    }
    println!();
}

fn print_cost_table(unbalanced: &CastReport, balanced: &CastReport) {
    println!("\t\t\t\tUnbalanced\tBalanced");
    println!(
        "Total intersection calls:\t{}\t\t{}",
        unbalanced.total_cost, balanced.total_cost
    );
    println!(
        "Avg intersection calls per ray:\t{:.2}\t\t{:.2}",
        unbalanced.average_cost(),
        balanced.average_cost()
    );
    println!("Per ray (unbalanced):\t\t{}", unbalanced.cost);
    println!("Per ray (balanced):\t\t{}", balanced.cost);
    println!("Per ray (both trees):\t\t{}", combined_cost(unbalanced, balanced));
}

fn combined_cost(unbalanced: &CastReport, balanced: &CastReport) -> Stats {
    unbalanced.cost.merge(&balanced.cost)
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let options = Cli::parse();

    let primitives = scene()?;
    let light = RadialLight::new(WorldPoint::origin())?;

    let unbalanced = Bvh::build(primitives.clone(), BuildSettings::default())
        .context("Building the unbalanced tree")?;
    let balanced = Bvh::build(
        primitives,
        BuildSettings::builder()
            .split_policy(SplitPolicy::Midpoint)
            .propagate_split_policy(options.propagate_split_policy)
            .build(),
    )
    .context("Building the balanced tree")?;

    print_tree("Unbalanced BVH Tree", &unbalanced);
    print_tree("Balanced BVH Tree", &balanced);

    let unbalanced_report = light.cast(&unbalanced, options.ray_count)?;
    let balanced_report = light.cast(&balanced, options.ray_count)?;
    print_cost_table(&unbalanced_report, &balanced_report);

    ensure!(
        unbalanced_report.hits == balanced_report.hits,
        "The two trees disagree on the nearest hits"
    );
    println!("{} of {} rays hit", unbalanced_report.hits.len(), options.ray_count);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::{assert, let_assert};

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("bvh2d-cli").chain(args.iter().copied()))
    }

    #[test]
    fn defaults() {
        let options = parse(&[]).unwrap();
        assert!(options.ray_count == 360);
        assert!(!options.propagate_split_policy);
    }

    #[test]
    fn all_options() {
        let options = parse(&["--rays", "12", "--propagate-split-policy"]).unwrap();
        assert!(options.ray_count == 12);
        assert!(options.propagate_split_policy);
    }

    #[test]
    fn invalid_ray_count() {
        let_assert!(Err(_) = parse(&["--rays", "many"]));
        let_assert!(Err(_) = parse(&["--rays"]));
    }

    #[test]
    fn unknown_arguments() {
        let_assert!(Err(_) = parse(&["--frobnicate"]));
        let_assert!(Err(_) = parse(&["positional"]));
    }

    #[test]
    fn help_is_generated() {
        let_assert!(Err(e) = parse(&["--help"]));
        assert!(e.kind() == clap::error::ErrorKind::DisplayHelp);
        assert!(e.to_string().contains("--propagate-split-policy"));
    }

    #[test]
    fn clap_definition_is_consistent() {
        use clap::CommandFactory as _;
        Cli::command().debug_assert();
    }

    #[test]
    fn demo_scene_is_valid() {
        assert!(scene().unwrap().len() == 6);
    }

    #[test]
    fn combined_cost_covers_both_trees() {
        let primitives = scene().unwrap();
        let light = RadialLight::new(WorldPoint::origin()).unwrap();
        let unbalanced = Bvh::build(primitives.clone(), BuildSettings::default()).unwrap();
        let balanced = Bvh::build(
            primitives,
            BuildSettings::builder()
                .split_policy(SplitPolicy::Midpoint)
                .build(),
        )
        .unwrap();

        let a = light.cast(&unbalanced, 36).unwrap();
        let b = light.cast(&balanced, 36).unwrap();
        let combined = combined_cost(&a, &b);

        assert!(combined.count == 72);
        assert!(combined.min == a.cost.min.min(b.cost.min));
        assert!(combined.max == a.cost.max.max(b.cost.max));
    }
}
