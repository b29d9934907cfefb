/*
 * Copyright (c):
 * 2026 zephyrj
 * zephyrj@protonmail.com
 *
 * This file is part of launch-calc.
 *
 * launch-calc is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * launch-calc is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with launch-calc. If not, see <https://www.gnu.org/licenses/>.
 */

use std::ops::Range;
use std::path::{Path, PathBuf};
use plotters::chart::{ChartBuilder, ChartContext, LabelAreaPosition};
use plotters::coord::Shift;
use plotters::coord::types::RangedCoordf64;
use plotters::drawing::{DrawingArea, IntoDrawingArea};
use plotters::element::PathElement;
use plotters::prelude::{BLACK, Cartesian2d, FontDesc, FontFamily, FontStyle, LineSeries, SVGBackend, WHITE};
use plotters::style::{Color, CYAN, TextStyle, YELLOW};
use tracing::info;
use perf_model::ResultSet;
use utils::filesystem::create_safe_filename_in_path;
use utils::numeric::round_up_to_nearest_multiple;
use crate::error::{Error, Result};

type DrawResult<T> = std::result::Result<T, Box<dyn std::error::Error>>;
type Chart<'a, 'b> = ChartContext<'a, SVGBackend<'b>, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ChartKind {
    Acceleration,
    Power,
    Torque,
    Ratios
}

impl ChartKind {
    pub const ALL: [ChartKind; 4] = [ChartKind::Acceleration, ChartKind::Power, ChartKind::Torque, ChartKind::Ratios];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChartKind::Acceleration => "acceleration",
            ChartKind::Power => "power",
            ChartKind::Torque => "torque",
            ChartKind::Ratios => "ratios"
        }
    }
}

/// Writes SVG charts of a calculation into a directory
pub struct ChartRenderer {
    output_path: PathBuf,
    size: (u32, u32),
    name: String
}

impl ChartRenderer {
    pub fn new(output_path: &Path, size: (u32, u32), name: &str) -> ChartRenderer {
        ChartRenderer { output_path: output_path.to_path_buf(), size, name: name.to_string() }
    }

    pub fn render_all(&self, results: &ResultSet) -> Result<Vec<PathBuf>> {
        std::fs::create_dir_all(&self.output_path)?;
        ChartKind::ALL.iter().map(|kind| self.render(*kind, results)).collect()
    }

    pub fn render(&self, kind: ChartKind, results: &ResultSet) -> Result<PathBuf> {
        let filename = create_safe_filename_in_path(&self.output_path,
                                                    &format!("{} {}", self.name, kind.as_str()),
                                                    "svg");
        let drawn = match kind {
            ChartKind::Acceleration => draw_acceleration(&filename, self.size, results),
            ChartKind::Power => draw_power(&filename, self.size, results),
            ChartKind::Torque => draw_torque(&filename, self.size, results),
            ChartKind::Ratios => draw_ratios(&filename, self.size, results)
        };
        drawn.map_err(|e| Error::Chart { chart: kind.as_str(), reason: e.to_string() })?;
        info!("Wrote {} chart to {}", kind.as_str(), filename.display());
        Ok(filename)
    }
}

fn draw_acceleration(path: &Path, size: (u32, u32), results: &ResultSet) -> DrawResult<()> {
    let max_time = results.acceleration_curve.iter().fold(0f64, |max, (_, time)| max.max(*time));
    let max_speed = results.acceleration_curve.last().map(|(speed, _)| *speed).unwrap_or(0.0);
    let root = SVGBackend::new(path, size).into_drawing_area();
    let mut context = build_chart(&root,
                                  "Acceleration",
                                  0f64..axis_limit(max_time, 5),
                                  0f64..axis_limit(max_speed + 10.0, 10))?;
    draw_mesh(&mut context, "Time (s)", "Speed (KM/H)")?;

    let data = results.acceleration_curve.iter().map(|(speed, time)| (*time, *speed));
    context
        .draw_series(LineSeries::new(data, &YELLOW))?
        .label(format!("0-100 {}", results.time_0_to_100))
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &YELLOW));
    draw_legend(&mut context)?;
    root.present()?;
    Ok(())
}

fn draw_power(path: &Path, size: (u32, u32), results: &ResultSet) -> DrawResult<()> {
    let max_power = results.power_curve.iter()
        .fold(0f64, |max, point| max.max(point.required_kw).max(point.available_kw));
    let max_speed = results.power_curve.last().map(|point| point.speed_kmh).unwrap_or(0.0);
    let root = SVGBackend::new(path, size).into_drawing_area();
    let mut context = build_chart(&root,
                                  "Power Vs Speed",
                                  0f64..axis_limit(max_speed + 10.0, 10),
                                  0f64..axis_limit(max_power * 1.1, 50))?;
    draw_mesh(&mut context, "Speed (KM/H)", "Power (KW)")?;

    context
        .draw_series(LineSeries::new(results.power_curve.iter().map(|p| (p.speed_kmh, p.required_kw)), &YELLOW))?
        .label("Required")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &YELLOW));
    context
        .draw_series(LineSeries::new(results.power_curve.iter().map(|p| (p.speed_kmh, p.available_kw)), &CYAN))?
        .label("Available")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &CYAN));
    draw_legend(&mut context)?;
    root.present()?;
    Ok(())
}

fn draw_torque(path: &Path, size: (u32, u32), results: &ResultSet) -> DrawResult<()> {
    let points = &results.torque_curve.points;
    let max_value = points.iter().fold(0f64, |max, p| max.max(p.torque_nm).max(p.power_kw));
    let min_rpm = points.first().map(|p| p.rpm).unwrap_or(0.0);
    let max_rpm = points.last().map(|p| p.rpm).unwrap_or(0.0);
    let root = SVGBackend::new(path, size).into_drawing_area();
    let mut context = build_chart(&root,
                                  &format!("Torque Curve ({})", results.torque_curve.engine_class),
                                  0f64.max(min_rpm - 500.0)..axis_limit(max_rpm + 500.0, 1000),
                                  0f64..axis_limit(max_value * 1.1, 50))?;
    draw_mesh(&mut context, "Engine RPM", "Torque (Nm) / Power (KW)")?;

    context
        .draw_series(LineSeries::new(points.iter().map(|p| (p.rpm, p.torque_nm)), &YELLOW))?
        .label("Torque")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &YELLOW));
    context
        .draw_series(LineSeries::new(points.iter().map(|p| (p.rpm, p.power_kw)), &CYAN))?
        .label("Power")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &CYAN));

    if let Some(peak) = &results.peak_torque {
        let mut text_coord = context.backend_coord(&(peak.rpm, peak.torque_nm));
        text_coord.1 -= 15;
        let text_style = TextStyle::from(("sans-serif", 12)).color(&WHITE);
        let _ = root.draw_text(&format!("{} Nm", peak.torque_nm as usize), &text_style, text_coord);
    }
    draw_legend(&mut context)?;
    root.present()?;
    Ok(())
}

fn draw_ratios(path: &Path, size: (u32, u32), results: &ResultSet) -> DrawResult<()> {
    let max_speed = results.gear_speed_plot.iter()
        .filter_map(|gear| gear.last())
        .fold(0f64, |max, (speed, _)| max.max(*speed));
    let (min_rpm, max_rpm) = results.gear_speed_plot.iter()
        .flatten()
        .fold((f64::MAX, 0f64), |(min, max), (_, rpm)| (min.min(*rpm), max.max(*rpm)));
    let y_axis_start = match min_rpm <= max_rpm {
        true => 0f64.max(min_rpm - 500.0),
        false => 0.0
    };
    let root = SVGBackend::new(path, size).into_drawing_area();
    let mut context = build_chart(&root,
                                  "Ratios Graph",
                                  0f64..axis_limit(max_speed + 10.0, 10),
                                  y_axis_start..axis_limit(max_rpm + 1000.0, 1000))?;
    draw_mesh(&mut context, "Speed (KM/H)", "Engine RPM")?;

    for (idx, data) in results.gear_speed_plot.iter().enumerate() {
        let last = match data.last() {
            Some(last) => *last,
            None => continue
        };
        let mut text_coord = context.backend_coord(&last);
        text_coord.0 += 5;
        text_coord.1 -= 5;
        context
            .draw_series(LineSeries::new(data.iter().copied(), &YELLOW))?
            .label(format!("Gear {}", idx + 1))
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &YELLOW));
        let text_style = TextStyle::from(("sans-serif", 12)).color(&WHITE);
        let _ = root.draw_text(&(last.0 as usize).to_string(), &text_style, text_coord);
    }
    root.present()?;
    Ok(())
}

fn build_chart<'a, 'b>(root: &'a DrawingArea<SVGBackend<'b>, Shift>,
                       caption: &str,
                       x_range: Range<f64>,
                       y_range: Range<f64>) -> DrawResult<Chart<'a, 'b>> {
    let font_desc = FontDesc::new(FontFamily::Name("sans-serif"), 20.0, FontStyle::Normal);
    root.fill(&BLACK.mix(0.9))?;
    let context = ChartBuilder::on(root)
        .margin(15)
        .caption(caption, font_desc.color(&WHITE))
        .set_label_area_size(LabelAreaPosition::Bottom, 40)
        .set_label_area_size(LabelAreaPosition::Left, 50)
        .build_cartesian_2d(x_range, y_range)?;
    Ok(context)
}

fn draw_mesh<'a, 'b: 'a>(context: &mut Chart<'a, 'b>, x_desc: &str, y_desc: &str) -> DrawResult<()> {
    context
        .configure_mesh()
        .x_label_formatter(&as_usize)
        .x_desc(x_desc)
        .y_label_formatter(&as_usize)
        .y_desc(y_desc)
        .label_style(&WHITE)
        .bold_line_style(&WHITE.mix(0.2))
        .light_line_style(&WHITE.mix(0.1))
        .draw()?;
    Ok(())
}

fn draw_legend<'a, 'b: 'a>(context: &mut Chart<'a, 'b>) -> DrawResult<()> {
    context
        .configure_series_labels()
        .label_font(&WHITE)
        .background_style(&BLACK.mix(0.8))
        .border_style(&WHITE)
        .draw()?;
    Ok(())
}

/// Round an axis maximum up so the chart always has a non-empty range
fn axis_limit(value: f64, multiple: i32) -> f64 {
    round_up_to_nearest_multiple(value.ceil() as i32, multiple) as f64
}

fn as_usize(x: &f64) -> String {
    format!("{}", *x as usize)
}
