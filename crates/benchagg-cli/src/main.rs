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

//! Benchagg Command Line Interface

use benchagg_cli::{init_logging, Args};
use clap::Parser;
use std::process::ExitCode;

/// Benchagg - benchmark result aggregator
///
/// Turns the per-job artifacts of a benchmark CI matrix into one summary
/// report with winners, detail tables, a flat CSV, a raw JSON dump and
/// comparison charts.
///
/// # Examples
///
/// ```bash
/// # Aggregate downloaded artifacts
/// benchagg --input-dir all-results --output-dir final-report
///
/// # Record the run parameters in the summary
/// benchagg --input-dir all-results --output-dir final-report \
///     --benchmark-runs 3 --test-duration 60
///
/// # Reports only, with per-artifact logging
/// benchagg --input-dir all-results --output-dir final-report --no-charts -v
/// ```
fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.log_directive());

    match args.execute() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
