use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use cubic::naive::total_cost;
use cubic::planes::PlaneCost;
use cubic::Algorithm;
use serde_json::json;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing_subscriber::fmt::SubscriberBuilder;

mod evaluate;
mod input;
mod provenance;

use evaluate::{run_evaluation, EvalConfig};
use provenance::{current_git_rev, write_sidecar, Payload};

#[derive(Parser)]
#[command(name = "cli")]
#[command(about = "Cubic clustering of 3D points into planes through the origin")]
struct Cmd {
    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Partition the points of a CSV or Parquet file
    Partition {
        #[arg(long)]
        input: PathBuf,
        /// GreedyJoining, GreedyMoving, NaiveGreedyJoining or NaiveGreedyMoving
        #[arg(long, default_value = "GreedyMoving")]
        algo: Algorithm,
        #[arg(long, default_value_t = 1.0)]
        threshold: f64,
        #[arg(long, default_value_t = 1.0)]
        amplification: f64,
        /// JSON file with `different_partition` pairs
        #[arg(long)]
        constraints: Option<PathBuf>,
        /// Write labels and partitions as JSON (plus a provenance sidecar)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Measure accuracy on noisy samples of the three coordinate planes
    Evaluate {
        /// JSON with `iterations`, `stddev_values` and `points_per_plane`
        #[arg(long)]
        config: PathBuf,
        #[arg(long, default_value = "GreedyMoving")]
        algo: Algorithm,
        /// Defaults to the current UNIX time
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        out: PathBuf,
    },
    /// Print a small provenance JSON block
    Report,
}

fn main() -> Result<()> {
    SubscriberBuilder::default().with_target(false).init();
    let cmd = Cmd::parse();
    match cmd.action {
        Action::Partition {
            input,
            algo,
            threshold,
            amplification,
            constraints,
            out,
        } => partition(
            &input,
            algo,
            PlaneCost {
                threshold,
                amplification,
            },
            constraints.as_deref(),
            out.as_deref(),
        ),
        Action::Evaluate {
            config,
            algo,
            seed,
            out,
        } => evaluate_cmd(&config, algo, seed, &out),
        Action::Report => report(),
    }
}

fn partition(
    input: &Path,
    algo: Algorithm,
    cost: PlaneCost,
    constraints_file: Option<&Path>,
    out: Option<&Path>,
) -> Result<()> {
    tracing::info!(
        input = %input.display(),
        %algo,
        threshold = cost.threshold,
        amplification = cost.amplification,
        "partition"
    );
    let points = input::read_points(input)?;
    let constraints = constraints_file
        .map(|path| input::read_constraints(path, points.len()))
        .transpose()?;
    let labels = algo.run(&points, &cost, constraints.as_ref())?;
    let objective = total_cost(&labels, &points, &cost);

    let mut groups: Vec<Vec<usize>> = Vec::new();
    let mut index_of = std::collections::HashMap::new();
    for (i, &label) in labels.iter().enumerate() {
        let g = *index_of.entry(label).or_insert_with(|| {
            groups.push(Vec::new());
            groups.len() - 1
        });
        groups[g].push(i);
    }
    tracing::info!(partitions = groups.len(), objective, "partitioned");

    println!("--------------");
    for (id, members) in groups.iter().enumerate() {
        println!("Partition_{id}");
        for &i in members {
            let p = points[i];
            println!("X: {:.6}, Y: {:.6}, Z: {:.6}", p.x, p.y, p.z);
        }
        println!("--------------");
    }

    if let Some(out) = out {
        let doc = json!({
            "algorithm": algo.name(),
            "labels": labels,
            "partitions": groups,
            "total_cost": objective,
        });
        write_json(out, &doc)?;
        let mut payload = Payload::new(json!({
            "algorithm": algo.name(),
            "threshold": cost.threshold,
            "amplification": cost.amplification,
            "points": points.len(),
        }))
        .with_input(input);
        if let Some(path) = constraints_file {
            payload = payload.with_input(path);
        }
        let prov = write_sidecar(out, payload)?;
        tracing::info!(out = %out.display(), provenance = %prov.display(), "wrote partitioning");
    }
    Ok(())
}

fn evaluate_cmd(config: &Path, algo: Algorithm, seed: Option<u64>, out: &Path) -> Result<()> {
    let cfg = EvalConfig::load(config)?;
    let seed = match seed {
        Some(s) => s,
        None => SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .context("system clock is before 1970")?
            .as_secs(),
    };
    tracing::info!(
        config = %config.display(),
        %algo,
        seed,
        iterations = cfg.iterations,
        levels = cfg.stddev_values.len(),
        "evaluate"
    );
    let report = run_evaluation(&cfg, algo, seed)?;
    write_json(out, &report)?;
    let payload = Payload::new(json!({
        "algorithm": algo.name(),
        "seed": seed,
        "config": cfg,
    }))
    .with_input(config);
    let prov = write_sidecar(out, payload)?;
    tracing::info!(out = %out.display(), provenance = %prov.display(), "wrote evaluation");
    Ok(())
}

fn report() -> Result<()> {
    let algorithms: Vec<&str> = Algorithm::ALL.iter().map(|a| a.name()).collect();
    let obj = json!({
        "code_rev": current_git_rev(),
        "cubic_version": cubic::VERSION,
        "algorithms": algorithms,
    });
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}

fn write_json<S: serde::Serialize>(out: &Path, value: &S) -> Result<()> {
    if let Some(parent) = out.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating output dir {}", parent.display()))?;
        }
    }
    std::fs::write(out, serde_json::to_vec_pretty(value)?)
        .with_context(|| format!("writing {}", out.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn partition_writes_labels_and_sidecar() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("points.csv");
        fs::write(&input, "1,0,0\n1,2,0\n2,1,0\n0,1,3\n0,2,1\n0,3,2\n").unwrap();
        let constraints = dir.path().join("constraints.json");
        fs::write(&constraints, r#"{"different_partition": [[0, 3]]}"#).unwrap();
        let out = dir.path().join("run").join("labels.json");
        let cost = PlaneCost {
            threshold: 0.1,
            amplification: 1.0,
        };
        partition(&input, Algorithm::GreedyMoving, cost, Some(&constraints), Some(&out)).unwrap();

        let doc: serde_json::Value = serde_json::from_slice(&fs::read(&out).unwrap()).unwrap();
        let labels = doc["labels"].as_array().unwrap();
        assert_eq!(labels.len(), 6);
        assert_ne!(labels[0], labels[3]);
        let sidecar = dir.path().join("run").join("labels.provenance.json");
        let prov: serde_json::Value = serde_json::from_slice(&fs::read(sidecar).unwrap()).unwrap();
        assert_eq!(prov["inputs"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn joining_rejects_constraints() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("points.csv");
        fs::write(&input, "x,y,z\n1,0,0\n0,1,0\n0,0,1\n").unwrap();
        let constraints = dir.path().join("constraints.json");
        fs::write(&constraints, r#"{"different_partition": [[0, 1]]}"#).unwrap();
        let err = partition(
            &input,
            Algorithm::GreedyJoining,
            PlaneCost::default(),
            Some(&constraints),
            None,
        )
        .unwrap_err();
        assert!(err.to_string().contains("does not support constraints"));
    }
}
