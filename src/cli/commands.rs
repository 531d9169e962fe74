//! Command implementations for the groundtruth CLI.

use std::path::{Path, PathBuf};

use log::warn;

use crate::cli::args::*;
use crate::cli::output::*;
use crate::error::{GroundTruthError, Result};
use crate::fixture::verify::{VerificationReport, verify_dataset};
use crate::fixture::{fixture_file_name, parse_fixture_file_name, read_fixture_for};
use crate::sweep::{SweepCell, SweepConfig, run_cell, run_sweep};
use crate::vector::Metric;
use crate::vector::core::distance::METRIC_TABLE;

/// Execute a CLI command.
pub fn execute_command(args: GroundTruthArgs) -> Result<()> {
    match &args.command {
        Command::Generate(generate_args) => generate(generate_args, &args),
        Command::Cell(cell_args) => generate_cell(cell_args, &args),
        Command::Verify(verify_args) => verify(verify_args, &args),
        Command::Metrics => list_metrics(&args),
    }
}

/// Merge a config file (if any) with command line overrides.
pub fn sweep_config(args: &GenerateArgs) -> Result<SweepConfig> {
    let mut config = match &args.config {
        Some(path) => SweepConfig::from_file(path)?,
        None => SweepConfig::default(),
    };

    if let Some(output_dir) = &args.output_dir {
        config.output_dir = output_dir.clone();
    }
    if !args.dims.is_empty() {
        config.dims = args.dims.clone();
    }
    if !args.metrics.is_empty() {
        config.metrics = args.metrics.clone();
    }
    apply_sizes(&mut config, &args.sizes);
    config.parallel |= args.parallel;
    config.pretty |= args.pretty;

    Ok(config)
}

fn apply_sizes(config: &mut SweepConfig, sizes: &SizeArgs) {
    if let Some(corpus_size) = sizes.corpus_size {
        config.corpus_size = corpus_size;
    }
    if let Some(num_queries) = sizes.num_queries {
        config.num_queries = num_queries;
    }
    if let Some(k) = sizes.k {
        config.k = k;
    }
}

/// Run the full sweep.
fn generate(args: &GenerateArgs, cli_args: &GroundTruthArgs) -> Result<()> {
    let config = sweep_config(args)?;
    let report = run_sweep(&config)?;
    output_result("Fixtures generated successfully", &report, cli_args)
}

/// Build and write one cell.
fn generate_cell(args: &CellArgs, cli_args: &GroundTruthArgs) -> Result<()> {
    let mut config = SweepConfig {
        dims: vec![args.dim],
        metrics: vec![args.metric.clone()],
        pretty: args.pretty,
        ..SweepConfig::default()
    };
    if let Some(output_dir) = &args.output_dir {
        config.output_dir = output_dir.clone();
    }
    apply_sizes(&mut config, &args.sizes);

    let cell: SweepCell = config
        .plan()?
        .into_iter()
        .next()
        .ok_or_else(|| GroundTruthError::invalid_argument("no cell to generate"))?;
    let report = run_cell(&cell, config.pretty)?;
    output_result("Fixture generated successfully", &report, cli_args)
}

/// Metric for a fixture: explicit, or inferred from its file name.
fn fixture_metric(path: &Path, explicit: Option<&str>) -> Result<Metric> {
    if let Some(name) = explicit {
        return Metric::parse_str(name);
    }
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| {
            GroundTruthError::invalid_argument(format!("no file name in {}", path.display()))
        })?;
    let (metric, dimension) = parse_fixture_file_name(file_name)?;
    let canonical = fixture_file_name(metric, dimension);
    if canonical != file_name {
        warn!("{file_name} would be written as {canonical}");
    }
    Ok(metric)
}

/// Verify fixture files.
fn verify(args: &VerifyArgs, cli_args: &GroundTruthArgs) -> Result<()> {
    let mut reports: Vec<VerificationReport> = Vec::with_capacity(args.files.len());
    let mut failed: Vec<PathBuf> = Vec::new();

    for path in &args.files {
        let metric = fixture_metric(path, args.metric.as_deref())?;
        let dataset = read_fixture_for(path, metric)?;
        let report = verify_dataset(&dataset, metric)?;
        if !report.is_exact() {
            failed.push(path.clone());
        }
        reports.push(report);
    }

    output_result("Fixture verification", &reports, cli_args)?;

    if failed.is_empty() {
        Ok(())
    } else {
        let names: Vec<String> = failed.iter().map(|p| p.display().to_string()).collect();
        Err(GroundTruthError::invalid_fixture(format!(
            "ground truth mismatch in {}",
            names.join(", ")
        )))
    }
}

/// List the metric registry.
fn list_metrics(cli_args: &GroundTruthArgs) -> Result<()> {
    let metrics: Vec<MetricInfo> = METRIC_TABLE
        .iter()
        .map(|spec| MetricInfo {
            name: spec.name.to_string(),
            aliases: spec.aliases.iter().map(|a| a.to_string()).collect(),
            vector_kind: spec.distance.kind().to_string(),
            distance: spec.distance_formula.to_string(),
            similarity: spec.similarity_formula.to_string(),
        })
        .collect();
    output_result("Supported metrics", &metrics, cli_args)
}
