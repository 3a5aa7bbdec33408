//! Entry point: CLI wiring and config-driven pipeline construction.

use std::process;

use tracing::error;
use tracing_subscriber::EnvFilter;

use loadshape_cluster::cli::{CliOptions, parse_args, print_usage};
use loadshape_cluster::cluster::{ClusterSummary, two_stage_assign};
use loadshape_cluster::config::ClusteringConfig;
use loadshape_cluster::io::export::export_assignments;
use loadshape_cluster::io::import::{ImportedBatch, read_batch_from_path};
use loadshape_cluster::profile::synthetic::demo_batch;

/// Readings per synthetic demo profile (15-minute data).
const DEMO_STEPS_PER_DAY: usize = 96;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Loads the batch from `--input`, or generates the demo batch.
fn load_batch(cli: &CliOptions, cfg: &ClusteringConfig) -> Result<ImportedBatch, String> {
    if let Some(path) = &cli.input {
        return read_batch_from_path(path, &cfg.input)
            .map_err(|e| format!("failed to read \"{}\": {e}", path.display()));
    }

    let n = cli.demo.unwrap_or(loadshape_cluster::cli::DEFAULT_DEMO_LOADS);
    let batch = demo_batch(n, DEMO_STEPS_PER_DAY, cfg.clustering.seed).map_err(|e| e.to_string())?;
    Ok(ImportedBatch {
        ids: (0..batch.len()).map(|i| format!("demo-{i}")).collect(),
        batch,
    })
}

fn run(cli: &CliOptions) -> Result<(), String> {
    let mut cfg = match &cli.config {
        Some(path) => ClusteringConfig::from_toml_file(path).map_err(|e| e.to_string())?,
        None => ClusteringConfig::defaults(),
    };
    cli.apply(&mut cfg);

    let errors = cfg.validate();
    if !errors.is_empty() {
        let joined: Vec<String> = errors.iter().map(ToString::to_string).collect();
        return Err(joined.join("\n"));
    }

    let imported = load_batch(cli, &cfg)?;
    let c = &cfg.clustering;
    let assignment = two_stage_assign(
        &imported.batch,
        c.k_consumption,
        c.k_peaktime,
        &cfg.partitioner(),
        c.seed,
    )
    .map_err(|e| e.to_string())?;

    let summary =
        ClusterSummary::from_assignment(&imported.batch, &assignment).map_err(|e| e.to_string())?;
    println!("{summary}");

    if let Some(path) = &cli.out {
        export_assignments(&assignment, &imported.ids, cfg.label_order(), path)
            .map_err(|e| format!("failed to write CSV: {e}"))?;
        eprintln!("Assignments written to {}", path.display());
    }

    Ok(())
}

fn main() {
    init_tracing();

    let cli = match parse_args() {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("error: {e}");
            print_usage();
            process::exit(2);
        }
    };

    if let Err(e) = run(&cli) {
        error!("{e}");
        process::exit(1);
    }
}
