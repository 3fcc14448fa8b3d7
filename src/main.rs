use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use augmented_octree::{AugmentedOctree, OctreeNode};
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "octree-eval", about = "Build augmented octrees and report their statistics")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Point to look up after the tree is built, as `x,y,z` (repeatable).
    #[arg(long = "query", global = true, value_parser = parse_query, allow_hyphen_values = true)]
    queries: Vec<[f64; 3]>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fill a cube of voxels and attach a cone-shaped auxiliary field.
    Synthetic {
        /// Voxel edge length in metres.
        #[arg(long, default_value_t = 0.1)]
        resolution: f64,
        /// Half-width of the filled cube in metres.
        #[arg(long, default_value_t = 1.0)]
        extent: f64,
        /// Half-angle of the cone (degrees) opening along +z from the origin.
        #[arg(long, default_value_t = 30.0)]
        half_angle: f64,
    },
    /// Insert a point cloud (`x y z` per line) and count hits per voxel.
    Points {
        /// Point cloud file.
        cloud: PathBuf,
        /// Voxel edge length in metres.
        #[arg(long, default_value_t = 0.1)]
        resolution: f64,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Synthetic {
            resolution,
            extent,
            half_angle,
        } => run_synthetic(resolution, extent, half_angle, &cli.queries)?,
        Commands::Points { cloud, resolution } => run_points(cloud, resolution, &cli.queries)?,
    }

    Ok(())
}

fn run_synthetic(resolution: f64, extent: f64, half_angle: f64, queries: &[[f64; 3]]) -> Result<()> {
    let mut tree = AugmentedOctree::with_resolution(resolution).context("invalid resolution")?;
    let half_angle = half_angle.to_radians();
    let steps = (extent / resolution).ceil() as i64;

    let tic = Instant::now();
    for i in -steps..steps {
        for j in -steps..steps {
            for k in -steps..steps {
                let point = [
                    (i as f64 + 0.5) * resolution,
                    (j as f64 + 0.5) * resolution,
                    (k as f64 + 0.5) * resolution,
                ];
                let key = tree
                    .coord_to_key_checked(point)
                    .context("extent exceeds the tree volume")?;
                let node = tree.update_node(key, true);
                if let Some(weight) = cone_weight(point, half_angle) {
                    node.set_auxiliary(weight);
                }
            }
        }
    }
    info!(elapsed = ?tic.elapsed(), "filled synthetic volume");

    report(&mut tree);
    query(&tree, queries);
    Ok(())
}

/// 1 on the cone axis, falling linearly to 0 at the cone boundary.
fn cone_weight(point: [f64; 3], half_angle: f64) -> Option<f64> {
    let [x, y, z] = point;
    if z <= 0.0 {
        return None;
    }
    let angle = (x * x + y * y).sqrt().atan2(z);
    (angle < half_angle).then(|| 1.0 - angle / half_angle)
}

fn run_points(cloud_path: PathBuf, resolution: f64, queries: &[[f64; 3]]) -> Result<()> {
    let mut tree = AugmentedOctree::with_resolution(resolution).context("invalid resolution")?;

    let reader = BufReader::new(File::open(&cloud_path).with_context(|| {
        format!("failed to open point cloud {}", cloud_path.display())
    })?);

    let tic = Instant::now();
    let mut inserted = 0usize;
    let mut skipped = 0usize;
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let point = parse_point(line)
            .with_context(|| format!("invalid point on line {}", idx + 1))?;
        match tree.coord_to_key(point) {
            Some(key) => {
                tree.update_node(key, true).accumulate_auxiliary(1.0);
                inserted += 1;
            }
            None => skipped += 1,
        }
    }
    if skipped > 0 {
        warn!(skipped, "points outside the tree volume were ignored");
    }
    info!(inserted, elapsed = ?tic.elapsed(), "inserted point cloud");

    report(&mut tree);
    query(&tree, queries);
    Ok(())
}

fn parse_point(line: &str) -> Result<[f64; 3]> {
    let mut fields = line.split_whitespace();
    let mut point = [0.0; 3];
    for (axis, value) in point.iter_mut().enumerate() {
        let field = fields
            .next()
            .ok_or_else(|| anyhow::anyhow!("missing coordinate {}", axis))?;
        *value = field
            .parse()
            .with_context(|| format!("invalid coordinate '{}'", field))?;
    }
    Ok(point)
}

fn parse_query(arg: &str) -> std::result::Result<[f64; 3], String> {
    let fields: Vec<&str> = arg.split(',').collect();
    if fields.len() != 3 {
        return Err(format!("expected x,y,z but got '{}'", arg));
    }
    let mut point = [0.0; 3];
    for (value, field) in point.iter_mut().zip(fields) {
        *value = field
            .trim()
            .parse()
            .map_err(|e| format!("invalid coordinate '{}': {}", field, e))?;
    }
    Ok(point)
}

/// Print occupancy and auxiliary value of the voxel containing each point.
fn query(tree: &AugmentedOctree, points: &[[f64; 3]]) {
    if points.is_empty() {
        return;
    }
    println!(
        "occupancy threshold\t{:.3}",
        tree.config().occupancy.occupancy_threshold()
    );
    for point in points {
        let node = tree.coord_to_key(*point).and_then(|key| tree.search(key));
        match node {
            Some(node) => println!(
                "query {:?}\t{}\toccupancy {:.3}\tauxiliary {}",
                point,
                if tree.is_node_occupied(node) { "occupied" } else { "free" },
                node.occupancy(),
                node.auxiliary_value()
                    .map_or_else(|| "unset".to_string(), |v| format!("{:.6}", v)),
            ),
            None => println!("query {:?}\tunknown", point),
        }
    }
}

fn report(tree: &mut AugmentedOctree) {
    let tic = Instant::now();
    tree.recompute_aggregates_bottom_up();
    let recompute = tic.elapsed();

    let tic = Instant::now();
    let pruned = tree.prune();
    let prune = tic.elapsed();

    let tic = Instant::now();
    let mut traversed = 0usize;
    for leaf in tree.leaves() {
        let _ = leaf.coordinate(tree.config());
        traversed += 1;
    }
    let traverse = tic.elapsed();

    println!("resolution\t{:.3} m", tree.resolution());
    println!("nodes\t{}", tree.num_nodes());
    println!("leaves\t{}", traversed);
    println!("collapsed\t{}", pruned);
    println!("memory\t{:.2} MB", tree.memory_usage() as f64 / 1e6);
    println!("auxiliary sum\t{:.6}", tree.sum());
    match tree.auxiliary_range() {
        Some((lo, hi)) => println!("auxiliary range\t[{:.6}, {:.6}]", lo, hi),
        None => println!("auxiliary range\tunset"),
    }
    println!("recompute\t{:?}", recompute);
    println!("prune\t{:?}", prune);
    println!("traverse\t{:?}", traverse);
}
