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

mod charts;
mod error;
mod settings;
mod vehicle;

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;
use clap::Parser;
use tracing_subscriber;
use tracing_appender;
use tracing::{error, info};

use perf_model::{AccelerationStrategy, Calculator, InputField, RawInputs};
use crate::charts::ChartRenderer;
use crate::error::Result;
use crate::settings::GlobalSettings;

/// Estimate acceleration times, top speed and the torque curve of a car
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct LaunchCalcArgs {
    /// Engine power (CV)
    #[clap(long, value_parser)]
    power_cv: Option<String>,
    /// Vehicle mass (kg)
    #[clap(long, value_parser)]
    mass_kg: Option<String>,
    /// Fraction of engine power that reaches the wheels
    #[clap(long, value_parser)]
    efficiency: Option<String>,
    /// Air density (kg/m^3)
    #[clap(long, value_parser)]
    air_density: Option<String>,
    /// Drag coefficient
    #[clap(long, value_parser)]
    cd: Option<String>,
    /// Rolling resistance coefficient
    #[clap(long, value_parser)]
    cr: Option<String>,
    /// Frontal area (m^2)
    #[clap(long, value_parser)]
    frontal_area: Option<String>,
    /// FWD, RWD or AWD
    #[clap(long, value_parser)]
    drivetrain: Option<String>,
    /// Lowest RPM of the torque curve
    #[clap(long, value_parser)]
    min_rpm: Option<String>,
    /// Highest RPM of the torque curve
    #[clap(long, value_parser)]
    max_rpm: Option<String>,
    /// TOML file with the inputs. Any flags given override its values
    #[clap(long, value_parser)]
    vehicle: Option<PathBuf>,
    /// simulation or closed-form
    #[clap(long, value_parser)]
    strategy: Option<AccelerationStrategy>,
    /// Print the full results as JSON
    #[clap(long, action)]
    json: bool,
    /// Write SVG charts into the chart_output_path from the settings file
    #[clap(long, action)]
    draw_charts: bool,
    /// Directory to write SVG charts into. Implies --draw-charts
    #[clap(long, value_parser)]
    charts: Option<PathBuf>,
}

impl LaunchCalcArgs {
    fn raw_inputs(&self) -> RawInputs {
        let mut inputs = RawInputs::default();
        for (field, value) in [
            (InputField::PowerCv, &self.power_cv),
            (InputField::MassKg, &self.mass_kg),
            (InputField::Efficiency, &self.efficiency),
            (InputField::AirDensity, &self.air_density),
            (InputField::DragCoefficient, &self.cd),
            (InputField::RollingResistanceCoefficient, &self.cr),
            (InputField::FrontalArea, &self.frontal_area),
            (InputField::Drivetrain, &self.drivetrain),
            (InputField::MinRpm, &self.min_rpm),
            (InputField::MaxRpm, &self.max_rpm),
        ] {
            if let Some(value) = value {
                inputs.set(field, value.as_str());
            }
        }
        inputs
    }

    fn chart_name(&self) -> String {
        self.vehicle.as_ref()
            .and_then(|path| path.file_stem())
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "vehicle".to_string())
    }

    fn chart_dir(&self, settings: &GlobalSettings) -> Option<PathBuf> {
        match (&self.charts, self.draw_charts) {
            (Some(path), _) => Some(path.clone()),
            (None, true) => Some(settings.chart_output_path()),
            (None, false) => None
        }
    }
}

fn main() -> ExitCode {
    match env::current_dir() {
        Ok(current_dir) => {
            let file_appender = tracing_appender::rolling::never(current_dir, "launch_calc.log");
            let subscriber = tracing_subscriber::fmt()
                .with_writer(file_appender)
                .with_ansi(false)
                .compact()
                .finish();
            match tracing::subscriber::set_global_default(subscriber) {
                Ok(_) => {
                    info!("Logging initialised");
                }
                Err(e) => {
                    eprintln!("Failed to init logging. {}", e.to_string());
                }
            }
        }
        Err(e) => {
            eprintln!("Failed to init logging. Couldn't determine current dir {}", e.to_string());
        }
    }

    let args = LaunchCalcArgs::parse();
    match run(&args) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e.to_string());
            eprintln!("{}", e.to_string());
            ExitCode::FAILURE
        }
    }
}

fn run(args: &LaunchCalcArgs) -> Result<()> {
    let mut settings = GlobalSettings::load()?;
    if let Some(strategy) = args.strategy {
        settings.calculator_mut().strategy = strategy;
    }

    let mut inputs = match &args.vehicle {
        Some(path) => vehicle::load_vehicle_file(path)?,
        None => RawInputs::default()
    };
    inputs.merge(&args.raw_inputs());

    let calculator = Calculator::new(settings.calculator().clone());
    let results = calculator.calculate(&inputs)?;
    match args.json {
        true => println!("{}", serde_json::to_string_pretty(&results)?),
        false => println!("{}", results)
    }

    if let Some(chart_path) = args.chart_dir(&settings) {
        let renderer = ChartRenderer::new(&chart_path, settings.chart_size(), &args.chart_name());
        for path in renderer.render_all(&results)? {
            if !args.json {
                println!("Wrote {}", path.display());
            }
        }
    }
    Ok(())
}
