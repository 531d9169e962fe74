//! Output formatting for CLI commands.

use serde::{Deserialize, Serialize};

use crate::cli::args::{GroundTruthArgs, OutputFormat};
use crate::error::Result;
use crate::fixture::verify::VerificationReport;
use crate::sweep::{CellReport, SweepReport};

/// One row of the metric listing.
#[derive(Debug, Serialize, Deserialize)]
pub struct MetricInfo {
    pub name: String,
    pub aliases: Vec<String>,
    pub vector_kind: String,
    pub distance: String,
    pub similarity: String,
}

/// Human-readable rendering of a result.
pub trait HumanOutput {
    fn print_human(&self);
}

/// Output a result in the specified format.
pub fn output_result<T>(message: &str, result: &T, args: &GroundTruthArgs) -> Result<()>
where
    T: Serialize + HumanOutput,
{
    match args.output_format {
        OutputFormat::Human => {
            if args.verbosity() > 0 {
                println!("{message}");
                println!();
            }
            result.print_human();
            Ok(())
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(result)?);
            Ok(())
        }
    }
}

impl HumanOutput for CellReport {
    fn print_human(&self) {
        println!(
            "{:<8} dim={:<5} corpus={:<5} queries={:<4} k={:<3} {}",
            self.metric.name(),
            self.dimension,
            self.corpus_size,
            self.num_queries,
            self.k,
            self.path.display()
        );
    }
}

impl HumanOutput for SweepReport {
    fn print_human(&self) {
        println!("Fixtures:");
        println!("═════════");
        for cell in &self.cells {
            cell.print_human();
        }
        println!();
        println!("Cells written: {}", self.cells.len());
        println!("Elapsed: {}ms", self.elapsed_ms);
    }
}

impl HumanOutput for Vec<VerificationReport> {
    fn print_human(&self) {
        for report in self {
            let status = if report.is_exact() { "OK" } else { "MISMATCH" };
            println!(
                "[{status}] {} dim={} corpus={} queries={} k={}",
                report.metric.name(),
                report.dimension,
                report.corpus_size,
                report.queries_checked,
                report.k
            );
            println!("  mean recall: {:.4}", report.mean_recall);
            println!("  max similarity error: {:e}", report.max_similarity_error);
            if !report.similarities_ordered {
                println!("  similarities are not in nearest-first order");
            }
            for mismatch in &report.mismatches {
                println!(
                    "  query {}: stored {:?}, expected {:?} (recall {:.2})",
                    mismatch.query,
                    mismatch.stored_indices,
                    mismatch.expected_indices,
                    mismatch.recall
                );
            }
        }
    }
}

impl HumanOutput for Vec<MetricInfo> {
    fn print_human(&self) {
        println!("Metrics:");
        println!("════════");
        for info in self {
            let aliases = if info.aliases.is_empty() {
                String::new()
            } else {
                format!(" (alias: {})", info.aliases.join(", "))
            };
            println!("{}{aliases}", info.name);
            println!("  vectors:    {}", info.vector_kind);
            println!("  distance:   {}", info.distance);
            println!("  similarity: {}", info.similarity);
        }
    }
}
