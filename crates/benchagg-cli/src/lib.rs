// Benchagg - Benchmark Result Aggregator
//
// Copyright (c) 2025 Dweve IP B.V. and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Command-line front end for benchmark result aggregation.
//!
//! The binary is a thin wrapper: [`Args`] is parsed by clap, logging is
//! initialised with [`init_logging`], and [`Args::execute`] hands the
//! resulting [`AggregateConfig`] to [`benchagg_core::run`].
//!
//! # Examples
//!
//! ```no_run
//! use benchagg_cli::Args;
//! use clap::Parser;
//!
//! # fn main() -> Result<(), benchagg_core::AggError> {
//! let args = Args::parse_from([
//!     "benchagg",
//!     "--input-dir",
//!     "all-results",
//!     "--output-dir",
//!     "final-report",
//!     "--no-charts",
//! ]);
//! args.execute()?;
//! # Ok(())
//! # }
//! ```

use benchagg_core::{
    run, select_renderer, AggregateConfig, LoadConfig, ReportConfig, Result, RunOutcome,
};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Aggregate benchmark CI artifacts into a single report
///
/// Reads every `results-<os>-<framework>-<test_type>` directory under the
/// input directory and writes `summary.md`, `combined_results.csv`,
/// `raw_results.json` and comparison charts to the output directory.
#[derive(Parser, Debug, Clone)]
#[command(name = "benchagg")]
#[command(author, version, about = "Aggregate benchmark results into reports and charts", long_about = None)]
pub struct Args {
    /// Directory containing downloaded benchmark artifacts
    #[arg(long, value_name = "DIR")]
    pub input_dir: PathBuf,

    /// Directory to write reports and charts to (created if missing)
    #[arg(long, value_name = "DIR")]
    pub output_dir: PathBuf,

    /// Number of benchmark runs per test, shown in the summary
    #[arg(long, default_value = "5")]
    pub benchmark_runs: String,

    /// Duration of each test in seconds, shown in the summary
    #[arg(long, default_value = "30")]
    pub test_duration: String,

    /// Skip chart rendering
    #[arg(long)]
    pub no_charts: bool,

    /// Log per-artifact details
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    /// Default log directive implied by the verbosity flags.
    pub fn log_directive(&self) -> &'static str {
        if self.verbose {
            "benchagg=debug"
        } else if self.quiet {
            "benchagg=warn"
        } else {
            "benchagg=info"
        }
    }

    /// Pipeline configuration for these arguments.
    pub fn config(&self) -> AggregateConfig {
        AggregateConfig::new(&self.input_dir, &self.output_dir)
            .with_report(ReportConfig {
                benchmark_runs: self.benchmark_runs.clone(),
                test_duration: self.test_duration.clone(),
                ..Default::default()
            })
            .with_load(LoadConfig::from_env())
    }

    /// Runs the aggregation.
    pub fn execute(&self) -> Result<()> {
        let renderer = select_renderer(!self.no_charts);

        match run(&self.config(), renderer.as_ref())? {
            RunOutcome::NoResults { summary } => {
                info!(summary = %summary.display(), "no results found, wrote empty summary");
            }
            RunOutcome::Report(summary) => {
                info!(
                    frameworks = summary.frameworks,
                    data_points = summary.data_points,
                    charts = summary.charts.len(),
                    output = %self.output_dir.display(),
                    "report complete"
                );
            }
        }
        Ok(())
    }
}

/// Installs the stderr log subscriber. `RUST_LOG` overrides `default_directive`.
pub fn init_logging(default_directive: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    // A subscriber may already be installed when embedded in tests.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
