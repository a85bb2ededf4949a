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

//! PNG rendering through plotters' bitmap backend.

use super::{ChartError, ChartRenderer, ChartSpec, Panel, Rgb};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::error::Error;
use std::path::Path;

/// Share of a category slot covered by its bar cluster.
const CLUSTER_WIDTH: f64 = 0.8;

/// Headroom above the tallest bar, leaving room for value labels.
const Y_HEADROOM: f64 = 1.15;

const FONT: &str = "sans-serif";

/// Text needs a font backend. Without one, plotters panics on the first
/// glyph, so captions, axis labels, legends and value labels are left out
/// and only the bars and grid are drawn.
const DRAW_TEXT: bool = cfg!(feature = "chart-fonts");

type DrawResult<T> = Result<T, Box<dyn Error>>;

/// Grouped bar charts written as PNG bitmaps.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlottersRenderer;

impl PlottersRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl ChartRenderer for PlottersRenderer {
    fn name(&self) -> &'static str {
        "plotters"
    }

    fn render(&self, spec: &ChartSpec, path: &Path) -> Result<(), ChartError> {
        draw_chart(spec, path).map_err(|e| ChartError::Render {
            chart: spec.file_name.to_string(),
            message: e.to_string(),
        })
    }
}

fn color(rgb: Rgb) -> RGBColor {
    RGBColor(rgb.0, rgb.1, rgb.2)
}

fn draw_chart(spec: &ChartSpec, path: &Path) -> DrawResult<()> {
    let root = BitMapBackend::new(path, spec.size).into_drawing_area();
    root.fill(&WHITE)?;

    let areas = root.split_evenly((1, spec.panels.len().max(1)));
    for (area, panel) in areas.iter().zip(&spec.panels) {
        draw_panel(area, panel)?;
    }

    root.present()?;
    Ok(())
}

/// Framework name for a tick sitting on a category center, blank otherwise.
fn category_label(names: &[String], x: f64) -> String {
    let nearest = x.round();
    if (x - nearest).abs() > 1e-6 || nearest < 0.0 {
        return String::new();
    }
    names.get(nearest as usize).cloned().unwrap_or_default()
}

/// Left edge of the bar for `series` within category `category`.
fn bar_start(category: usize, series: usize, series_count: usize) -> f64 {
    let width = CLUSTER_WIDTH / series_count as f64;
    category as f64 - CLUSTER_WIDTH / 2.0 + series as f64 * width
}

fn draw_panel<DB>(area: &DrawingArea<DB, Shift>, panel: &Panel) -> DrawResult<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let pivot = &panel.pivot;
    let categories = pivot.frameworks.len().max(1);
    let y_max = pivot.max_value().filter(|v| *v > 0.0).unwrap_or(1.0) * Y_HEADROOM;

    let mut builder = ChartBuilder::on(area);
    builder.margin(15);
    if DRAW_TEXT {
        builder
            .caption(&panel.title, (FONT, 22.0))
            .x_label_area_size(60)
            .y_label_area_size(80);
    }
    let mut chart = builder.build_cartesian_2d(-0.5..(categories as f64 - 0.5), 0.0..y_max)?;

    let names = &pivot.frameworks;
    let x_label = |x: &f64| category_label(names, *x);
    let mut mesh = chart.configure_mesh();
    mesh.disable_x_mesh();
    if DRAW_TEXT {
        mesh.x_labels(categories)
            .x_label_formatter(&x_label)
            .x_desc("Framework")
            .y_desc(panel.y_label.as_str());
    }
    mesh.draw()?;

    if pivot.is_empty() {
        return Ok(());
    }

    let series_count = pivot.oses.len();
    let bar_width = CLUSTER_WIDTH / series_count as f64;

    for (series, os) in pivot.oses.iter().enumerate() {
        let style = color(panel.color(series)).filled();
        let bars: Vec<(f64, f64)> = pivot
            .column(series)
            .into_iter()
            .enumerate()
            .filter_map(|(category, value)| {
                value.map(|v| (bar_start(category, series, series_count), v))
            })
            .collect();

        chart
            .draw_series(
                bars.iter()
                    .map(|&(x0, v)| Rectangle::new([(x0, 0.0), (x0 + bar_width, v)], style)),
            )?
            .label(os.as_str())
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 12, y + 5)], style));

        if DRAW_TEXT && panel.value_labels {
            chart.draw_series(bars.iter().map(|&(x0, v)| {
                Text::new(format!("{v:.0}"), (x0, v), (FONT, 11.0).into_font())
            }))?;
        }
    }

    if !DRAW_TEXT {
        return Ok(());
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;

    Ok(())
}
