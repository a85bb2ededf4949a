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

//! Combined CSV export of the results table.

use crate::error::{AggError, Result};
use crate::table::{ResultsTable, TableRow};
use std::path::Path;

/// Column order of the combined CSV.
pub const COLUMNS: [&str; 8] = [
    "framework",
    "os",
    "test_type",
    "latency_us",
    "throughput_req_s",
    "mem_peak_kb",
    "mem_avg_kb",
    "cpu_percent",
];

/// Writes every table row to `path`, header first.
pub fn export_csv(table: &ResultsTable, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).map_err(|e| AggError::csv_error(path, e))?;

    if table.is_empty() {
        // serialize() emits the header with the first row only.
        writer
            .write_record(COLUMNS)
            .map_err(|e| AggError::csv_error(path, e))?;
    }
    for row in table.rows() {
        writer
            .serialize(row)
            .map_err(|e| AggError::csv_error(path, e))?;
    }

    writer.flush().map_err(|e| AggError::io_error(path, e))
}

/// Reads a combined CSV back into a table.
pub fn load_combined_csv(path: &Path) -> Result<ResultsTable> {
    let mut reader = csv::Reader::from_path(path).map_err(|e| AggError::csv_error(path, e))?;
    let rows = reader
        .deserialize::<TableRow>()
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| AggError::csv_error(path, e))?;
    Ok(ResultsTable::new(rows))
}
