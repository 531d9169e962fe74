//! Command line argument parsing for the groundtruth CLI using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

/// groundtruth - exact k-NN fixture generator for ANN search tests
#[derive(Parser, Debug, Clone)]
#[command(name = "groundtruth")]
#[command(about = "Generate exact nearest neighbor fixtures for approximate search tests")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct GroundTruthArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human", global = true)]
    pub output_format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl GroundTruthArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n + 1,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Generate fixtures for every dimension × metric cell
    Generate(GenerateArgs),

    /// Generate the fixture for a single cell
    Cell(CellArgs),

    /// Re-check fixtures against a fresh exact search
    Verify(VerifyArgs),

    /// List the supported metrics
    Metrics,
}

/// Arguments for the full sweep
#[derive(Parser, Debug, Clone)]
pub struct GenerateArgs {
    /// Output directory for fixture files
    #[arg(value_name = "OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Sweep configuration file (JSON)
    #[arg(short, long, value_name = "CONFIG_FILE")]
    pub config: Option<PathBuf>,

    /// Dimensions to sweep (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub dims: Vec<usize>,

    /// Metrics to sweep (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub metrics: Vec<String>,

    #[command(flatten)]
    pub sizes: SizeArgs,

    /// Build cells in parallel
    #[arg(long)]
    pub parallel: bool,

    /// Pretty-print JSON fixtures
    #[arg(long)]
    pub pretty: bool,
}

/// Arguments for a single cell
#[derive(Parser, Debug, Clone)]
pub struct CellArgs {
    /// Metric name (l1, l2, angular, hamming, jaccard)
    #[arg(short, long)]
    pub metric: String,

    /// Vector dimension
    #[arg(short, long)]
    pub dim: usize,

    /// Output directory for the fixture file
    #[arg(value_name = "OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    #[command(flatten)]
    pub sizes: SizeArgs,

    /// Pretty-print JSON fixture
    #[arg(long)]
    pub pretty: bool,
}

/// Dataset size overrides shared by generate and cell
#[derive(clap::Args, Debug, Clone, Default)]
pub struct SizeArgs {
    /// Number of corpus vectors
    #[arg(long)]
    pub corpus_size: Option<usize>,

    /// Number of query vectors
    #[arg(long)]
    pub num_queries: Option<usize>,

    /// Neighbors recorded per query
    #[arg(short, long)]
    pub k: Option<usize>,
}

/// Arguments for fixture verification
#[derive(Parser, Debug, Clone)]
pub struct VerifyArgs {
    /// Fixture files to verify
    #[arg(value_name = "FIXTURE", required = true)]
    pub files: Vec<PathBuf>,

    /// Metric to verify with (default: inferred from the file name)
    #[arg(short, long)]
    pub metric: Option<String>,
}

/// Output formats for CLI
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_generate_command() {
        let args = GroundTruthArgs::try_parse_from([
            "groundtruth",
            "generate",
            "/tmp/fixtures",
            "--dims",
            "10,128",
            "--metrics",
            "l2,jaccard",
            "--corpus-size",
            "200",
            "--parallel",
        ])
        .unwrap();

        if let Command::Generate(generate_args) = args.command {
            assert_eq!(generate_args.output_dir, Some(PathBuf::from("/tmp/fixtures")));
            assert_eq!(generate_args.dims, vec![10, 128]);
            assert_eq!(generate_args.metrics, vec!["l2", "jaccard"]);
            assert_eq!(generate_args.sizes.corpus_size, Some(200));
            assert_eq!(generate_args.sizes.k, None);
            assert!(generate_args.parallel);
            assert!(!generate_args.pretty);
        } else {
            panic!("Expected Generate command");
        }
    }

    #[test]
    fn test_cell_command() {
        let args = GroundTruthArgs::try_parse_from([
            "groundtruth",
            "cell",
            "--metric",
            "angular",
            "--dim",
            "512",
            "-k",
            "5",
        ])
        .unwrap();

        if let Command::Cell(cell_args) = args.command {
            assert_eq!(cell_args.metric, "angular");
            assert_eq!(cell_args.dim, 512);
            assert_eq!(cell_args.sizes.k, Some(5));
            assert_eq!(cell_args.output_dir, None);
        } else {
            panic!("Expected Cell command");
        }
    }

    #[test]
    fn test_verify_requires_files() {
        assert!(GroundTruthArgs::try_parse_from(["groundtruth", "verify"]).is_err());

        let args = GroundTruthArgs::try_parse_from([
            "groundtruth",
            "verify",
            "a.json",
            "b.json",
        ])
        .unwrap();
        if let Command::Verify(verify_args) = args.command {
            assert_eq!(verify_args.files.len(), 2);
            assert!(verify_args.metric.is_none());
        } else {
            panic!("Expected Verify command");
        }
    }

    #[test]
    fn test_verbosity_levels() {
        let args = GroundTruthArgs::try_parse_from(["groundtruth", "metrics"]).unwrap();
        assert_eq!(args.verbosity(), 1);

        let args = GroundTruthArgs::try_parse_from(["groundtruth", "-v", "metrics"]).unwrap();
        assert_eq!(args.verbosity(), 2);

        let args = GroundTruthArgs::try_parse_from(["groundtruth", "-vv", "metrics"]).unwrap();
        assert_eq!(args.verbosity(), 3);

        let args = GroundTruthArgs::try_parse_from(["groundtruth", "metrics", "--quiet"]).unwrap();
        assert_eq!(args.verbosity(), 0);
    }

    #[test]
    fn test_output_format() {
        let args =
            GroundTruthArgs::try_parse_from(["groundtruth", "--format", "json", "metrics"]).unwrap();
        assert_eq!(args.output_format, OutputFormat::Json);
    }
}
