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

//! Comparison charts.
//!
//! Chart contents are described by [`ChartSpec`] values built from the
//! results table by pure functions. Drawing is delegated to a
//! [`ChartRenderer`] picked once at startup: the plotters-backed renderer
//! when the `charts` feature is compiled in and enabled, [`NoopRenderer`]
//! otherwise.
//!
//! | File             | Test types                        | Metric              |
//! |------------------|-----------------------------------|---------------------|
//! | `throughput.png` | `low_normal`, `high_normal`       | requests per second |
//! | `latency.png`    | `low_normal`, `high_normal`       | latency             |
//! | `memory.png`     | `high_normal`                     | peak memory         |
//! | `stressed.png`   | `low_stressed`, `high_stressed`   | requests per second |

#[cfg(feature = "charts")]
mod bitmap;

#[cfg(feature = "charts")]
pub use self::bitmap::PlottersRenderer;

use crate::table::{Metric, Pivot, ResultsTable};
use std::any::Any;
use std::fs;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

pub const THROUGHPUT_CHART: &str = "throughput.png";
pub const LATENCY_CHART: &str = "latency.png";
pub const MEMORY_CHART: &str = "memory.png";
pub const STRESSED_CHART: &str = "stressed.png";

/// Every chart file name, in the order charts are produced.
pub const CHART_FILES: [&str; 4] = [THROUGHPUT_CHART, LATENCY_CHART, MEMORY_CHART, STRESSED_CHART];

/// A chart could not be drawn. Logged by [`render_charts`], never propagated.
#[derive(Error, Debug)]
pub enum ChartError {
    #[error("failed to render '{chart}': {message}")]
    Render { chart: String, message: String },

    #[error("chart rendering is not available")]
    Unavailable,
}

/// An sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Parses `#rrggbb`.
    pub const fn hex(value: u32) -> Self {
        Rgb((value >> 16) as u8, (value >> 8) as u8, value as u8)
    }
}

/// Ten-color categorical cycle used when a chart has no palette of its own.
pub const DEFAULT_PALETTE: [Rgb; 10] = [
    Rgb::hex(0x1f77b4),
    Rgb::hex(0xff7f0e),
    Rgb::hex(0x2ca02c),
    Rgb::hex(0xd62728),
    Rgb::hex(0x9467bd),
    Rgb::hex(0x8c564b),
    Rgb::hex(0xe377c2),
    Rgb::hex(0x7f7f7f),
    Rgb::hex(0xbcbd22),
    Rgb::hex(0x17becf),
];

const LATENCY_PALETTE: [Rgb; 2] = [Rgb::hex(0x3498db), Rgb::hex(0xe74c3c)];
const MEMORY_PALETTE: [Rgb; 2] = [Rgb::hex(0x2ecc71), Rgb::hex(0x9b59b6)];
const STRESSED_PALETTE: [Rgb; 2] = [Rgb::hex(0xf39c12), Rgb::hex(0x1abc9c)];

const WIDE_SIZE: (u32, u32) = (2100, 900);
const SINGLE_SIZE: (u32, u32) = (1500, 900);

/// One grouped bar plot: frameworks on the x axis, one bar per OS.
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    pub title: String,
    pub y_label: String,
    /// Mean values per framework and OS. Empty when the panel's test type
    /// has no rows; such panels are drawn as empty axes.
    pub pivot: Pivot,
    /// Colors cycled over the OS series.
    pub palette: Vec<Rgb>,
    /// Print each bar's value above it.
    pub value_labels: bool,
}

impl Panel {
    /// Color of the `index`-th OS series.
    pub fn color(&self, index: usize) -> Rgb {
        if self.palette.is_empty() {
            DEFAULT_PALETTE[index % DEFAULT_PALETTE.len()]
        } else {
            self.palette[index % self.palette.len()]
        }
    }
}

/// A complete image: panels laid out left to right.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub file_name: &'static str,
    /// Pixel size of the whole image.
    pub size: (u32, u32),
    pub panels: Vec<Panel>,
}

/// Draws chart specs to disk.
pub trait ChartRenderer {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Whether this renderer produces any output.
    fn is_available(&self) -> bool {
        true
    }

    /// Writes `spec` as an image at `path`.
    fn render(&self, spec: &ChartSpec, path: &Path) -> Result<(), ChartError>;
}

/// Renderer used when charting is disabled or not compiled in.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopRenderer;

impl ChartRenderer for NoopRenderer {
    fn name(&self) -> &'static str {
        "none"
    }

    fn is_available(&self) -> bool {
        false
    }

    fn render(&self, _spec: &ChartSpec, _path: &Path) -> Result<(), ChartError> {
        Err(ChartError::Unavailable)
    }
}

/// Picks the renderer for this process.
#[cfg(feature = "charts")]
pub fn select_renderer(enabled: bool) -> Box<dyn ChartRenderer> {
    if enabled {
        Box::new(PlottersRenderer::new())
    } else {
        Box::new(NoopRenderer)
    }
}

/// Picks the renderer for this process.
#[cfg(not(feature = "charts"))]
pub fn select_renderer(_enabled: bool) -> Box<dyn ChartRenderer> {
    Box::new(NoopRenderer)
}

struct PanelDef {
    test_type: &'static str,
    title: &'static str,
}

const NORMAL_PANELS: [PanelDef; 2] = [
    PanelDef {
        test_type: "low_normal",
        title: "Low Connections (100)",
    },
    PanelDef {
        test_type: "high_normal",
        title: "High Connections (512)",
    },
];

const STRESSED_PANELS: [PanelDef; 2] = [
    PanelDef {
        test_type: "low_stressed",
        title: "Low Connections + Network Stress",
    },
    PanelDef {
        test_type: "high_stressed",
        title: "High Connections + Network Stress",
    },
];

/// Builds a multi-panel chart, or `None` when none of its test types has rows.
#[allow(clippy::too_many_arguments)]
fn paneled_chart(
    table: &ResultsTable,
    file_name: &'static str,
    defs: &[PanelDef],
    metric: Metric,
    title_prefix: &str,
    y_label: &str,
    palette: &[Rgb],
    value_labels: bool,
) -> Option<ChartSpec> {
    let test_types: Vec<&str> = defs.iter().map(|d| d.test_type).collect();
    if table.pivot_mean(&test_types, metric).is_empty() {
        return None;
    }

    let panels = defs
        .iter()
        .map(|def| Panel {
            title: format!("{title_prefix} - {}", def.title),
            y_label: y_label.to_string(),
            pivot: table.pivot_mean(&[def.test_type], metric),
            palette: palette.to_vec(),
            value_labels,
        })
        .collect();

    Some(ChartSpec {
        file_name,
        size: WIDE_SIZE,
        panels,
    })
}

/// Throughput of the normal-network tests.
pub fn throughput_chart(table: &ResultsTable) -> Option<ChartSpec> {
    paneled_chart(
        table,
        THROUGHPUT_CHART,
        &NORMAL_PANELS,
        Metric::Throughput,
        "Throughput",
        "Requests/second",
        &[],
        true,
    )
}

/// Latency of the normal-network tests.
pub fn latency_chart(table: &ResultsTable) -> Option<ChartSpec> {
    paneled_chart(
        table,
        LATENCY_CHART,
        &NORMAL_PANELS,
        Metric::Latency,
        "Latency",
        "Latency (μs)",
        &LATENCY_PALETTE,
        false,
    )
}

/// Peak memory of the high-connection normal test.
pub fn memory_chart(table: &ResultsTable) -> Option<ChartSpec> {
    let pivot = table.pivot_mean(&["high_normal"], Metric::MemPeak);
    if pivot.is_empty() {
        return None;
    }

    Some(ChartSpec {
        file_name: MEMORY_CHART,
        size: SINGLE_SIZE,
        panels: vec![Panel {
            title: "Peak Memory Usage (High Connections)".to_string(),
            y_label: "Memory (KB)".to_string(),
            pivot,
            palette: MEMORY_PALETTE.to_vec(),
            value_labels: false,
        }],
    })
}

/// Throughput of the stressed-network tests.
pub fn stressed_chart(table: &ResultsTable) -> Option<ChartSpec> {
    paneled_chart(
        table,
        STRESSED_CHART,
        &STRESSED_PANELS,
        Metric::Throughput,
        "Throughput",
        "Requests/second",
        &STRESSED_PALETTE,
        false,
    )
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "renderer panicked".to_string()
    }
}

/// Runs one render, turning a backend panic into [`ChartError::Render`] and
/// removing any partially written file on failure.
fn render_contained(
    renderer: &dyn ChartRenderer,
    spec: &ChartSpec,
    path: &Path,
) -> Result<(), ChartError> {
    let result = panic::catch_unwind(AssertUnwindSafe(|| renderer.render(spec, path)))
        .unwrap_or_else(|payload| {
            Err(ChartError::Render {
                chart: spec.file_name.to_string(),
                message: panic_message(payload.as_ref()),
            })
        });

    if result.is_err() && path.exists() {
        let _ = fs::remove_file(path);
    }
    result
}

/// Renders every chart that has data and returns the files written.
///
/// Failures, panics included, are logged and skipped so one broken chart
/// never fails the run.
pub fn render_charts(
    table: &ResultsTable,
    renderer: &dyn ChartRenderer,
    output_dir: &Path,
) -> Vec<PathBuf> {
    if !renderer.is_available() {
        debug!(renderer = renderer.name(), "chart rendering unavailable, skipping");
        return Vec::new();
    }

    info!(renderer = renderer.name(), "generating charts");
    let builders: [fn(&ResultsTable) -> Option<ChartSpec>; 4] =
        [throughput_chart, latency_chart, memory_chart, stressed_chart];

    let mut written = Vec::new();
    for build in builders {
        let Some(spec) = build(table) else {
            continue;
        };
        let path = output_dir.join(spec.file_name);
        match render_contained(renderer, &spec, &path) {
            Ok(()) => {
                debug!(path = %path.display(), "chart written");
                written.push(path);
            }
            Err(e) => warn!(chart = spec.file_name, error = %e, "skipping chart"),
        }
    }
    written
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::TableRow;
    use std::cell::RefCell;

    fn row(framework: &str, os: &str, test_type: &str, value: f64) -> TableRow {
        TableRow {
            framework: framework.to_string(),
            os: os.to_string(),
            test_type: test_type.to_string(),
            latency_us: value,
            throughput_req_s: value,
            mem_peak_kb: value,
            mem_avg_kb: value,
            cpu_percent: 0.0,
        }
    }

    #[derive(Default)]
    struct RecordingRenderer {
        fail_on: Option<&'static str>,
        rendered: RefCell<Vec<&'static str>>,
    }

    impl ChartRenderer for RecordingRenderer {
        fn name(&self) -> &'static str {
            "recording"
        }

        fn render(&self, spec: &ChartSpec, _path: &Path) -> Result<(), ChartError> {
            if self.fail_on == Some(spec.file_name) {
                return Err(ChartError::Render {
                    chart: spec.file_name.to_string(),
                    message: "boom".to_string(),
                });
            }
            self.rendered.borrow_mut().push(spec.file_name);
            Ok(())
        }
    }

    #[test]
    fn test_throughput_chart_panels() {
        let table = ResultsTable::new(vec![
            row("coroute", "ubuntu", "low_normal", 10.0),
            row("coroute", "ubuntu", "low_normal", 30.0),
        ]);

        let spec = throughput_chart(&table).unwrap();
        assert_eq!(spec.file_name, THROUGHPUT_CHART);
        assert_eq!(spec.panels.len(), 2);
        assert_eq!(spec.panels[0].title, "Throughput - Low Connections (100)");
        assert_eq!(spec.panels[0].pivot.values, vec![vec![Some(20.0)]]);
        assert!(spec.panels[0].value_labels);
        // No high_normal rows: the second panel is empty.
        assert!(spec.panels[1].pivot.is_empty());
    }

    #[test]
    fn test_charts_skip_empty_subsets() {
        let table = ResultsTable::new(vec![row("a", "ubuntu", "profile", 1.0)]);
        assert!(throughput_chart(&table).is_none());
        assert!(latency_chart(&table).is_none());
        assert!(memory_chart(&table).is_none());
        assert!(stressed_chart(&table).is_none());
    }

    #[test]
    fn test_memory_chart_only_high_normal() {
        let table = ResultsTable::new(vec![row("a", "ubuntu", "low_normal", 1.0)]);
        assert!(memory_chart(&table).is_none());

        let table = ResultsTable::new(vec![row("a", "ubuntu", "high_normal", 1.0)]);
        let spec = memory_chart(&table).unwrap();
        assert_eq!(spec.panels.len(), 1);
        assert_eq!(spec.panels[0].color(1), MEMORY_PALETTE[1]);
        assert_eq!(spec.panels[0].color(2), MEMORY_PALETTE[0]);
    }

    #[test]
    fn test_default_palette_cycles() {
        let spec = throughput_chart(&ResultsTable::new(vec![row("a", "x", "high_normal", 1.0)]))
            .unwrap();
        assert_eq!(spec.panels[1].color(0), Rgb(0x1f, 0x77, 0xb4));
        assert_eq!(spec.panels[1].color(10), DEFAULT_PALETTE[0]);
    }

    #[test]
    fn test_render_charts_with_noop_writes_nothing() {
        let table = ResultsTable::new(vec![row("a", "ubuntu", "high_normal", 1.0)]);
        let written = render_charts(&table, &NoopRenderer, Path::new("unused"));
        assert!(written.is_empty());
    }

    #[test]
    fn test_render_charts_swallows_failures() {
        let table = ResultsTable::new(vec![
            row("a", "ubuntu", "high_normal", 1.0),
            row("a", "ubuntu", "low_stressed", 1.0),
        ]);
        let renderer = RecordingRenderer {
            fail_on: Some(LATENCY_CHART),
            ..Default::default()
        };

        let written = render_charts(&table, &renderer, Path::new("out"));
        assert_eq!(
            *renderer.rendered.borrow(),
            vec![THROUGHPUT_CHART, MEMORY_CHART, STRESSED_CHART]
        );
        assert_eq!(written.len(), 3);
        assert_eq!(written[0], Path::new("out").join(THROUGHPUT_CHART));
    }

    /// Writes a partial file, then panics on the throughput chart.
    struct PanickingRenderer;

    impl ChartRenderer for PanickingRenderer {
        fn name(&self) -> &'static str {
            "panicking"
        }

        fn render(&self, spec: &ChartSpec, path: &Path) -> Result<(), ChartError> {
            fs::write(path, b"partial").map_err(|e| ChartError::Render {
                chart: spec.file_name.to_string(),
                message: e.to_string(),
            })?;
            if spec.file_name == THROUGHPUT_CHART {
                panic!("unable to draw text");
            }
            Ok(())
        }
    }

    #[test]
    fn test_render_charts_contains_panics() {
        let dir = tempfile::TempDir::new().unwrap();
        let table = ResultsTable::new(vec![row("a", "ubuntu", "high_normal", 1.0)]);

        let written = render_charts(&table, &PanickingRenderer, dir.path());
        assert_eq!(
            written,
            vec![dir.path().join(LATENCY_CHART), dir.path().join(MEMORY_CHART)]
        );
        assert!(!dir.path().join(THROUGHPUT_CHART).exists());
    }

    #[test]
    fn test_panic_message() {
        let payload: Box<dyn Any + Send> = Box::new("static message");
        assert_eq!(panic_message(payload.as_ref()), "static message");
        let payload: Box<dyn Any + Send> = Box::new(String::from("owned message"));
        assert_eq!(panic_message(payload.as_ref()), "owned message");
        let payload: Box<dyn Any + Send> = Box::new(42_u32);
        assert_eq!(panic_message(payload.as_ref()), "renderer panicked");
    }

    #[test]
    fn test_select_renderer_disabled() {
        assert!(!select_renderer(false).is_available());
    }

    #[test]
    fn test_rgb_hex() {
        assert_eq!(Rgb::hex(0x3498db), Rgb(0x34, 0x98, 0xdb));
    }
}
