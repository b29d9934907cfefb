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

use std::fmt::{Display, Formatter};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use utils::numeric::round_float_to;
use crate::acceleration::{acceleration_model, acceleration_sweep, AccelerationStrategy, SimulationConfig, TimeEstimate};
use crate::classification::{EngineClass, VehicleClass};
use crate::error::Result;
use crate::gearing::GearboxModel;
use crate::inputs::{InputDefaults, RawInputs, RequiredFields};
use crate::params::ParameterSet;
use crate::top_speed::{PowerPoint, TopSpeedConfig, TopSpeedSolver};
use crate::torque::{TorqueCurve, TorqueCurveConfig, TorqueCurveModel, TorquePoint};
use crate::stats::PerformanceStats;

/// Everything that shapes a calculation apart from the vehicle itself
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculatorConfig {
    pub strategy: AccelerationStrategy,
    /// Highest speed (KM/H) of the speed-vs-time series
    pub sweep_max_kmh: u32,
    /// RPM spacing of the per-gear speed plot
    pub gear_plot_rpm_step: f64,
    pub defaults: InputDefaults,
    pub required_fields: RequiredFields,
    pub simulation: SimulationConfig,
    pub top_speed: TopSpeedConfig,
    pub torque_curve: TorqueCurveConfig
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        CalculatorConfig {
            strategy: AccelerationStrategy::default(),
            sweep_max_kmh: 200,
            gear_plot_rpm_step: 100.0,
            defaults: InputDefaults::default(),
            required_fields: RequiredFields::default(),
            simulation: SimulationConfig::default(),
            top_speed: TopSpeedConfig::default(),
            torque_curve: TorqueCurveConfig::default()
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResultSet {
    pub strategy: AccelerationStrategy,
    pub vehicle_class: VehicleClass,
    pub engine_class: EngineClass,
    pub time_0_to_100: TimeEstimate,
    pub time_0_to_200: TimeEstimate,
    /// KM/H
    pub top_speed: f64,
    pub top_speed_at_search_limit: bool,
    /// Highest sampled point of the torque curve
    pub peak_torque: Option<TorquePoint>,
    /// (KM/H, seconds)
    pub acceleration_curve: Vec<(f64, f64)>,
    pub power_curve: Vec<PowerPoint>,
    pub torque_curve: TorqueCurve,
    /// (KM/H, RPM) per gear
    pub gear_speed_plot: Vec<Vec<(f64, f64)>>,
    pub stats: PerformanceStats
}

impl Display for ResultSet {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Vehicle class: {} / Engine class: {} ({})",
                 self.vehicle_class, self.engine_class, self.strategy)?;
        writeln!(f, "0-100 km/h: {}", self.time_0_to_100)?;
        writeln!(f, "0-200 km/h: {}", self.time_0_to_200)?;
        match self.top_speed_at_search_limit {
            true => writeln!(f, "Top speed: {:.2} km/h (search limit)", self.top_speed)?,
            false => writeln!(f, "Top speed: {:.2} km/h", self.top_speed)?
        }
        match &self.peak_torque {
            Some(peak) => writeln!(f, "Peak torque: {:.2} Nm @ {} rpm", peak.torque_nm, peak.rpm)?,
            None => writeln!(f, "Peak torque: -")?
        }
        writeln!(f, "Power: {:.2} kW ({:.2} bhp)", self.stats.power_kw, self.stats.power_bhp)?;
        write!(f, "{:.2} kg/cv, {:.2} cv/tonne", self.stats.kg_per_cv, self.stats.cv_per_tonne)?;
        if let Some(accel) = self.stats.mean_acceleration {
            write!(f, "\nMean 0-100 acceleration: {:.2} m/s^2", accel)?;
        }
        if let Some(distance) = self.stats.distance_to_100 {
            write!(f, "\nDistance to 100 km/h: {:.2} m", distance)?;
        }
        Ok(())
    }
}

impl ResultSet {
    /// Scalar results rounded to two decimal places
    pub fn summary(&self) -> ResultSummary {
        ResultSummary {
            time_0_to_100: round_float_to(self.time_0_to_100.seconds, 2),
            reached_100: self.time_0_to_100.reached,
            time_0_to_200: round_float_to(self.time_0_to_200.seconds, 2),
            reached_200: self.time_0_to_200.reached,
            top_speed: round_float_to(self.top_speed, 2),
            peak_torque: self.peak_torque.map(|p| round_float_to(p.torque_nm, 2))
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResultSummary {
    pub time_0_to_100: f64,
    pub reached_100: bool,
    pub time_0_to_200: f64,
    pub reached_200: bool,
    pub top_speed: f64,
    pub peak_torque: Option<f64>
}

/// Runs a full calculation for a set of form inputs
pub struct Calculator {
    config: CalculatorConfig
}

impl Calculator {
    pub fn new(config: CalculatorConfig) -> Calculator {
        Calculator { config }
    }

    pub fn config(&self) -> &CalculatorConfig {
        &self.config
    }

    /// Refuses to calculate anything if a required field is empty
    pub fn calculate(&self, inputs: &RawInputs) -> Result<ResultSet> {
        let params = inputs.to_parameter_set(&self.config.defaults, &self.config.required_fields)?;
        self.config.simulation.validate()?;
        self.config.top_speed.validate()?;
        Ok(self.calculate_params(&params))
    }

    pub fn calculate_params(&self, params: &ParameterSet) -> ResultSet {
        info!("Calculating {} cv, {} kg, {} with the {} strategy",
              params.power_cv(), params.mass_kg(), params.drivetrain(), self.config.strategy);

        let model = acceleration_model(self.config.strategy, params, &self.config.simulation);
        let time_0_to_100 = model.estimate(100.0);
        let time_0_to_200 = model.estimate(200.0);
        if !time_0_to_200.reached {
            warn!("200 km/h not reached. Stopped after {:.2} s", time_0_to_200.seconds);
        }
        let acceleration_curve = acceleration_sweep(model.as_ref(), self.config.sweep_max_kmh);

        let top_speed = TopSpeedSolver::new(params, self.config.top_speed).solve();

        let torque_model = TorqueCurveModel::new(params, self.config.torque_curve);
        let torque_curve = torque_model.curve();
        let peak_torque = torque_curve.peak();

        let gearbox = GearboxModel::new(self.config.simulation.gears.clone(),
                                        self.config.simulation.shift_schedule);
        let gear_speed_plot = gearbox.speed_plot(self.config.gear_plot_rpm_step);

        let results = ResultSet {
            strategy: self.config.strategy,
            vehicle_class: VehicleClass::classify(params),
            engine_class: torque_model.engine_class(),
            time_0_to_100,
            time_0_to_200,
            top_speed: top_speed.speed_kmh,
            top_speed_at_search_limit: top_speed.at_search_limit,
            peak_torque,
            acceleration_curve,
            power_curve: top_speed.curve,
            torque_curve,
            gear_speed_plot,
            stats: PerformanceStats::new(params, &time_0_to_100)
        };
        info!("0-100 {} | 0-200 {} | top speed {:.2} km/h",
              results.time_0_to_100, results.time_0_to_200, results.top_speed);
        results
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use crate::acceleration::AccelerationStrategy;
    use crate::calculator::{Calculator, CalculatorConfig};
    use crate::classification::{EngineClass, VehicleClass};
    use crate::error::Error;
    use crate::gearing::GearTable;
    use crate::inputs::{InputField, RequiredFields};
    use crate::inputs::tests::reference_inputs;

    #[test]
    fn reference_inputs_calculate() {
        let results = Calculator::new(CalculatorConfig::default())
            .calculate(&reference_inputs())
            .unwrap();
        assert_eq!(results.vehicle_class, VehicleClass::Normal);
        assert_eq!(results.engine_class, EngineClass::Sport);
        assert!(results.time_0_to_100.reached);
        assert_abs_diff_eq!(results.time_0_to_100.seconds, 5.22, epsilon = 0.02);
        assert!(!results.time_0_to_200.reached);
        assert_abs_diff_eq!(results.top_speed, 270.78, epsilon = 0.1);
        assert!(!results.top_speed_at_search_limit);

        let peak = results.peak_torque.unwrap();
        assert_eq!(peak.rpm, 4500.0);
        assert_abs_diff_eq!(peak.torque_nm, 346.96, epsilon = 0.01);

        assert_eq!(results.acceleration_curve.len(), 201);
        assert_eq!(results.acceleration_curve[0], (0.0, 0.0));
        assert_eq!(results.power_curve.len(), 271);
        assert_eq!(results.torque_curve.points.len(), 7);
        assert_eq!(results.gear_speed_plot.len(), 6);
        assert_abs_diff_eq!(results.stats.power_kw, 220.65, epsilon = 0.01);
    }

    #[test]
    fn missing_fields_stop_the_calculation() {
        let mut inputs = reference_inputs();
        inputs.set(InputField::PowerCv, " ");
        inputs.set(InputField::MaxRpm, "");
        let result = Calculator::new(CalculatorConfig::default()).calculate(&inputs);
        assert_eq!(result, Err(Error::MissingFields(vec!["power_cv", "max_rpm"])));
    }

    #[test]
    fn relaxed_gate_falls_back_to_defaults() {
        let mut inputs = reference_inputs();
        inputs.set(InputField::MassKg, "");
        inputs.set(InputField::Drivetrain, "");
        let config = CalculatorConfig {
            required_fields: RequiredFields::new(vec![InputField::PowerCv]),
            ..CalculatorConfig::default()
        };
        let results = Calculator::new(config).calculate(&inputs).unwrap();
        // 1500 kg FWD is slower than the 1400 kg RWD reference
        assert!(results.time_0_to_100.seconds > 5.22);
    }

    #[test]
    fn unknown_drivetrain_is_rejected() {
        let mut inputs = reference_inputs();
        inputs.set(InputField::Drivetrain, "4WD");
        let result = Calculator::new(CalculatorConfig::default()).calculate(&inputs);
        assert!(matches!(result, Err(Error::InvalidDrivetrain(_))));
    }

    #[test]
    fn bad_gear_table_from_settings_is_rejected() {
        let mut config = CalculatorConfig::default();
        config.simulation.gears = serde_json::from_str(
            r#"{"gear_ratios": [3.0, -1.0], "final_drive": 3.42, "tire_radius": 0.33}"#
        ).unwrap();
        let result = Calculator::new(config).calculate(&reference_inputs());
        assert!(matches!(result, Err(Error::InvalidGearTable(_))));
    }

    #[test]
    fn settings_that_never_terminate_are_rejected() {
        let mut config = CalculatorConfig::default();
        config.simulation.min_time_step = 0.0;
        let result = Calculator::new(config).calculate(&reference_inputs());
        assert!(matches!(result, Err(Error::InvalidConfig(_))));

        let mut config = CalculatorConfig::default();
        config.top_speed.tolerance_kmh = 0.0;
        let result = Calculator::new(config).calculate(&reference_inputs());
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn underpowered_car_has_no_run_stats() {
        let mut inputs = reference_inputs();
        inputs.set(InputField::PowerCv, "40");
        let results = Calculator::new(CalculatorConfig::default()).calculate(&inputs).unwrap();
        assert!(!results.time_0_to_100.reached);
        assert!(results.stats.mean_acceleration.is_none());
        assert!(results.stats.distance_to_100.is_none());
        assert_abs_diff_eq!(results.stats.kg_per_cv, 35.0, epsilon = 0.01);
    }

    #[test]
    fn closed_form_strategy_is_used_when_configured() {
        let config = CalculatorConfig { strategy: AccelerationStrategy::ClosedForm, ..CalculatorConfig::default() };
        let results = Calculator::new(config).calculate(&reference_inputs()).unwrap();
        assert_eq!(results.strategy, AccelerationStrategy::ClosedForm);
        assert_abs_diff_eq!(results.time_0_to_100.seconds, 5.94, epsilon = 0.01);
        assert!(results.time_0_to_200.reached);
    }

    #[test]
    fn unparsable_power_gives_empty_series() {
        let mut inputs = reference_inputs();
        inputs.set(InputField::PowerCv, "lots");
        let results = Calculator::new(CalculatorConfig::default()).calculate(&inputs).unwrap();
        assert!(results.time_0_to_100.seconds.is_nan());
        assert!(results.top_speed.is_nan());
        assert_eq!(results.acceleration_curve, vec![(0.0, 0.0)]);
        assert!(results.power_curve.is_empty());
        assert!(results.torque_curve.points.is_empty());
        assert!(results.peak_torque.is_none());
        assert!(results.stats.mean_acceleration.is_none());
    }

    #[test]
    fn summary_is_rounded() {
        let results = Calculator::new(CalculatorConfig::default())
            .calculate(&reference_inputs())
            .unwrap();
        let summary = results.summary();
        assert_eq!(summary.time_0_to_100, (summary.time_0_to_100 * 100.0).round() / 100.0);
        assert!(summary.reached_100);
        assert!(!summary.reached_200);
        assert_eq!(summary.peak_torque, Some(346.96));
        assert!(results.to_string().contains("0-200 km/h: "));
        assert!(results.to_string().contains("(not reached)"));
    }

    #[test]
    fn partial_config_keeps_defaults() {
        let config: CalculatorConfig = serde_json::from_str(r#"{"strategy": "closed-form", "sweep_max_kmh": 120}"#).unwrap();
        assert_eq!(config.strategy, AccelerationStrategy::ClosedForm);
        assert_eq!(config.sweep_max_kmh, 120);
        assert_eq!(config.simulation.gears, GearTable::default());
    }
}
