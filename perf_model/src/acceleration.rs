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

//! Time-to-speed estimation.
//!
//! Two strategies answer the same question. [AccelerationSimulator] steps a
//! gear shifting, traction limited model forward in time and is the reference.
//! [ClosedFormEstimator] is the older single step kinematic approximation
//! kept as an alternative. Results from the two are never mixed.

use std::fmt::{Display, Formatter};
use std::str::FromStr;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use utils::units::{kmh_to_mps, mps_to_kmh};
use crate::classification::VehicleClass;
use crate::error::{Error, Result};
use crate::gearing::{GearboxModel, GearTable, ShiftSchedule};
use crate::params::{Drivetrain, ParameterSet};
use crate::resistance::{AeroDragModel, RollingResistance};
use crate::traction::{TractionModel, TractionTable};

/// Anything that can estimate how long a car takes to reach a speed from standstill
pub trait AccelerationModel {
    /// Seconds to reach `target_kmh` from a standstill
    fn time_to_reach(&self, target_kmh: f64) -> f64;

    /// Like [AccelerationModel::time_to_reach] but also says whether the target was actually reached
    fn estimate(&self, target_kmh: f64) -> TimeEstimate {
        let seconds = self.time_to_reach(target_kmh);
        TimeEstimate { target_kmh, seconds, reached: seconds.is_finite() }
    }

    fn strategy(&self) -> AccelerationStrategy;
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TimeEstimate {
    pub target_kmh: f64,
    pub seconds: f64,
    /// False when the run ended before the target speed
    pub reached: bool
}

impl Display for TimeEstimate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.reached {
            true => write!(f, "{:.2} s", self.seconds),
            false => write!(f, "{:.2} s (not reached)", self.seconds)
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AccelerationStrategy {
    Simulation,
    ClosedForm
}

impl AccelerationStrategy {
    pub const SIMULATION_VALUE: &'static str = "simulation";
    pub const CLOSED_FORM_VALUE: &'static str = "closed-form";

    pub fn as_str(&self) -> &'static str {
        match self {
            AccelerationStrategy::Simulation => AccelerationStrategy::SIMULATION_VALUE,
            AccelerationStrategy::ClosedForm => AccelerationStrategy::CLOSED_FORM_VALUE
        }
    }
}

impl Default for AccelerationStrategy {
    fn default() -> Self {
        AccelerationStrategy::Simulation
    }
}

impl FromStr for AccelerationStrategy {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            AccelerationStrategy::SIMULATION_VALUE => Ok(AccelerationStrategy::Simulation),
            AccelerationStrategy::CLOSED_FORM_VALUE => Ok(AccelerationStrategy::ClosedForm),
            _ => Err(format!("unknown acceleration strategy '{}'", s))
        }
    }
}

impl Display for AccelerationStrategy {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Constants of the time stepping simulation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub gears: GearTable,
    pub shift_schedule: ShiftSchedule,
    pub traction: TractionTable,
    /// The run ends once acceleration (m/s^2) drops below this
    pub stall_acceleration: f64,
    pub min_time_step: f64,
    pub base_time_step: f64,
    /// How much the time step grows per m/s^2 of acceleration lost
    pub time_step_gain: f64,
    /// Simulated seconds after which a run is abandoned
    pub time_limit: f64
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            gears: GearTable::default(),
            shift_schedule: ShiftSchedule::default(),
            traction: TractionTable::default(),
            stall_acceleration: 0.1,
            min_time_step: 0.01,
            base_time_step: 0.03,
            time_step_gain: 0.05,
            time_limit: 120.0
        }
    }
}

impl SimulationConfig {
    /// Reject settings that would stop a run from ever ending
    pub fn validate(&self) -> Result<()> {
        self.gears.validate()?;
        if !(self.min_time_step > 0.0) {
            return Err(Error::InvalidConfig(format!("min_time_step {} must be positive", self.min_time_step)));
        }
        if !self.base_time_step.is_finite() || !self.time_step_gain.is_finite() {
            return Err(Error::InvalidConfig("time step constants must be finite".to_string()));
        }
        if !(self.time_limit > 0.0) || !self.time_limit.is_finite() {
            return Err(Error::InvalidConfig(format!("time_limit {} must be positive", self.time_limit)));
        }
        Ok(())
    }

    pub fn time_step(&self, acceleration: f64) -> f64 {
        self.min_time_step.max(self.base_time_step - acceleration * self.time_step_gain)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Termination {
    /// The target speed was reached
    Reached,
    /// The current gear index has no ratio in the gear table
    GearsExhausted,
    /// Net acceleration fell below the stall threshold
    Stalled,
    /// The simulated time exceeded the configured limit
    TimeLimit,
    /// Forces stopped being finite numbers
    InvalidInputs
}

/// Outcome of a single simulation run
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AccelerationRun {
    pub target_kmh: f64,
    /// Simulated seconds before the class correction
    pub elapsed: f64,
    /// Corrected seconds. NaN when the inputs couldn't be simulated
    pub time: f64,
    pub final_speed_kmh: f64,
    pub final_gear: usize,
    pub shifts: usize,
    pub vehicle_class: VehicleClass,
    pub termination: Termination
}

impl AccelerationRun {
    pub fn reached(&self) -> bool {
        self.termination == Termination::Reached
    }
}

struct SimulationState {
    speed: f64,
    elapsed: f64,
    gear_idx: usize,
    rpm: f64,
    /// `rpm` was set by the launch or a shift and drives the next step instead of the road speed
    hold_rpm: bool,
    shifts: usize
}

impl SimulationState {
    fn launch(launch_rpm: f64) -> SimulationState {
        SimulationState { speed: 0.0, elapsed: 0.0, gear_idx: 0, rpm: launch_rpm, hold_rpm: true, shifts: 0 }
    }
}

pub struct AccelerationSimulator {
    power_watts: f64,
    mass: f64,
    gearbox: GearboxModel,
    traction: TractionModel,
    drag: AeroDragModel,
    rolling: RollingResistance,
    vehicle_class: VehicleClass,
    config: SimulationConfig
}

impl AccelerationSimulator {
    pub fn new(params: &ParameterSet, config: &SimulationConfig) -> AccelerationSimulator {
        AccelerationSimulator {
            power_watts: params.power_watts() * params.simulation_efficiency(),
            mass: params.mass_kg(),
            gearbox: GearboxModel::new(config.gears.clone(), config.shift_schedule),
            traction: TractionModel::new(params, &config.traction),
            drag: AeroDragModel::amplified(params),
            rolling: RollingResistance::speed_scaled(params),
            vehicle_class: VehicleClass::classify(params),
            config: config.clone()
        }
    }

    pub fn vehicle_class(&self) -> VehicleClass {
        self.vehicle_class
    }

    pub fn gearbox(&self) -> &GearboxModel {
        &self.gearbox
    }

    /// Simulate from a standstill until `target_kmh` is reached or the run can't continue
    pub fn run(&self, target_kmh: f64) -> AccelerationRun {
        let target_speed = kmh_to_mps(target_kmh);
        let mut state = SimulationState::launch(self.gearbox.schedule().launch_rpm);

        let termination = loop {
            if state.speed >= target_speed {
                break Termination::Reached;
            }
            if state.hold_rpm {
                state.hold_rpm = false;
            } else {
                state.rpm = match self.gearbox.rpm_for_speed(state.speed, state.gear_idx) {
                    Some(rpm) => rpm,
                    None => break Termination::GearsExhausted
                };
                if self.gearbox.should_upshift(state.rpm, state.gear_idx) {
                    state.gear_idx += 1;
                    state.elapsed += self.gearbox.schedule().shift_penalty(state.gear_idx);
                    state.rpm = self.gearbox.schedule().post_shift_rpm();
                    state.shifts += 1;
                }
            }

            let torque = self.gearbox.engine_torque(state.rpm, self.power_watts);
            let engine_force = match self.gearbox.wheel_force(torque, state.gear_idx) {
                Some(force) => force,
                None => break Termination::GearsExhausted
            };
            let wheel_force = self.traction.limit(engine_force, state.speed);
            let drag_force = self.drag.drag_force(state.speed);
            let rolling_force = self.rolling.force(state.speed);
            let acceleration = (wheel_force - drag_force - rolling_force) / self.mass;
            if !acceleration.is_finite() {
                break Termination::InvalidInputs;
            }
            if acceleration < self.config.stall_acceleration {
                break Termination::Stalled;
            }

            let dt = self.config.time_step(acceleration);
            state.speed += acceleration * dt;
            state.elapsed += dt;
            if state.elapsed > self.config.time_limit {
                break Termination::TimeLimit;
            }
        };

        let time = match termination {
            Termination::InvalidInputs => f64::NAN,
            _ => state.elapsed * self.vehicle_class.time_correction()
        };
        let run = AccelerationRun {
            target_kmh,
            elapsed: state.elapsed,
            time,
            final_speed_kmh: mps_to_kmh(state.speed),
            final_gear: state.gear_idx,
            shifts: state.shifts,
            vehicle_class: self.vehicle_class,
            termination
        };
        match termination {
            Termination::Reached => {
                debug!("Reached {} km/h in {:.3}s (gear {}, {} shifts)", target_kmh, run.time, run.final_gear + 1, run.shifts);
            }
            _ => {
                debug!("Run to {} km/h ended early ({:?}) at {:.2} km/h after {:.3}s",
                       target_kmh, termination, run.final_speed_kmh, run.time);
            }
        }
        run
    }
}

impl AccelerationModel for AccelerationSimulator {
    fn time_to_reach(&self, target_kmh: f64) -> f64 {
        self.run(target_kmh).time
    }

    fn estimate(&self, target_kmh: f64) -> TimeEstimate {
        let run = self.run(target_kmh);
        TimeEstimate { target_kmh, seconds: run.time, reached: run.reached() }
    }

    fn strategy(&self) -> AccelerationStrategy {
        AccelerationStrategy::Simulation
    }
}

/// Single step kinematic estimate: average force at the target speed applied over the whole run
pub struct ClosedFormEstimator {
    effective_power: f64,
    mass: f64,
    drivetrain: Drivetrain,
    drag: AeroDragModel,
    rolling: RollingResistance
}

impl ClosedFormEstimator {
    /// Final speed (m/s) used for a 100 km/h target
    pub const HUNDRED_KMH_MPS: f64 = 27.78;

    pub fn new(params: &ParameterSet) -> ClosedFormEstimator {
        ClosedFormEstimator {
            effective_power: params.power_watts() * params.efficiency(),
            mass: params.mass_kg(),
            drivetrain: params.drivetrain(),
            drag: AeroDragModel::plain(params),
            rolling: RollingResistance::constant(params)
        }
    }

    /// Seconds subtracted from the estimate for the better launch of driven rear or all wheels
    pub fn traction_bonus(drivetrain: Drivetrain, target_kmh: f64) -> f64 {
        let factor = match drivetrain {
            Drivetrain::FWD => 0.0,
            Drivetrain::RWD => 0.3,
            Drivetrain::AWD => 0.5
        };
        factor * target_kmh / 100.0
    }
}

impl AccelerationModel for ClosedFormEstimator {
    fn time_to_reach(&self, target_kmh: f64) -> f64 {
        let final_speed = if target_kmh == 100.0 {
            ClosedFormEstimator::HUNDRED_KMH_MPS
        } else {
            kmh_to_mps(target_kmh)
        };
        if final_speed == 0.0 {
            return 0.0;
        }
        let resistance = self.drag.drag_force(final_speed) + self.rolling.force(final_speed);
        let net_force = self.effective_power / final_speed - resistance;
        let acceleration = net_force / self.mass;
        let time = final_speed / acceleration - ClosedFormEstimator::traction_bonus(self.drivetrain, target_kmh);
        if time.is_nan() {
            return time;
        }
        time.max(0.0)
    }

    fn strategy(&self) -> AccelerationStrategy {
        AccelerationStrategy::ClosedForm
    }
}

/// Build the model for the requested strategy
pub fn acceleration_model(strategy: AccelerationStrategy,
                          params: &ParameterSet,
                          config: &SimulationConfig) -> Box<dyn AccelerationModel> {
    match strategy {
        AccelerationStrategy::Simulation => Box::new(AccelerationSimulator::new(params, config)),
        AccelerationStrategy::ClosedForm => Box::new(ClosedFormEstimator::new(params))
    }
}

/// Time to every whole km/h from 0 to `max_kmh`, each point an independent run.
///
/// Points that don't produce a number are dropped and the series always starts at (0, 0).
pub fn acceleration_sweep(model: &dyn AccelerationModel, max_kmh: u32) -> Vec<(f64, f64)> {
    let mut data: Vec<(f64, f64)> = (0..=max_kmh)
        .map(|speed| (speed as f64, model.time_to_reach(speed as f64)))
        .filter(|(_, time)| !time.is_nan())
        .collect();
    let dropped = (max_kmh as usize + 1) - data.len();
    if dropped > 0 {
        warn!("{} of {} acceleration points couldn't be calculated", dropped, max_kmh + 1);
    }
    match data.first() {
        Some((speed, _)) if *speed == 0.0 => {}
        _ => data.insert(0, (0.0, 0.0))
    }
    data
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use crate::acceleration::{acceleration_model, acceleration_sweep, AccelerationModel, AccelerationSimulator, AccelerationStrategy, ClosedFormEstimator, SimulationConfig, Termination};
    use crate::classification::VehicleClass;
    use crate::error::Error;
    use crate::gearing::GearTable;
    use crate::params::{Drivetrain, ParameterSet, RpmWindow};
    use crate::params::tests::{reference_car, super_car};

    #[test]
    fn reference_car_reaches_100_in_plausible_time() {
        let sim = AccelerationSimulator::new(&reference_car(), &SimulationConfig::default());
        let run = sim.run(100.0);
        assert!(run.reached());
        assert_eq!(run.vehicle_class, VehicleClass::Normal);
        assert!(run.time > 4.0 && run.time < 6.0, "0-100 took {}", run.time);
        assert_abs_diff_eq!(run.time, 5.22, epsilon = 0.02);
        assert_eq!(run.final_gear, 1);
        assert_eq!(run.shifts, 1);
    }

    #[test]
    fn zero_target_takes_no_time() {
        let sim = AccelerationSimulator::new(&reference_car(), &SimulationConfig::default());
        assert_eq!(sim.time_to_reach(0.0), 0.0);
        assert_eq!(ClosedFormEstimator::new(&reference_car()).time_to_reach(0.0), 0.0);
    }

    #[test]
    fn time_never_decreases_with_target_speed() {
        let sim = AccelerationSimulator::new(&reference_car(), &SimulationConfig::default());
        let times: Vec<f64> = (0..=200).map(|v| sim.time_to_reach(v as f64)).collect();
        for pair in times.windows(2) {
            assert!(pair[0] <= pair[1], "{} > {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn grip_loss_stalls_before_200() {
        let sim = AccelerationSimulator::new(&reference_car(), &SimulationConfig::default());
        let run = sim.run(200.0);
        assert!(!run.reached());
        assert_eq!(run.termination, Termination::Stalled);
        assert!(run.final_speed_kmh > 100.0 && run.final_speed_kmh < 200.0);
        // a stalled run reports the time it stalled at for every higher target
        assert_eq!(sim.time_to_reach(250.0), run.time);
    }

    #[test]
    fn awd_is_quickest_off_the_line() {
        let config = SimulationConfig::default();
        let car = reference_car();
        let time = |d: Drivetrain| AccelerationSimulator::new(&car.with_drivetrain(d), &config).time_to_reach(100.0);
        assert!(time(Drivetrain::AWD) <= time(Drivetrain::RWD));
        assert!(time(Drivetrain::AWD) <= time(Drivetrain::FWD));
    }

    #[test]
    fn hypercar_correction_is_applied() {
        let sim = AccelerationSimulator::new(&super_car(), &SimulationConfig::default());
        let run = sim.run(100.0);
        assert_eq!(run.vehicle_class, VehicleClass::Hypercar);
        assert_abs_diff_eq!(run.time, run.elapsed * 0.9, epsilon = 1e-12);
        assert!(run.time < AccelerationSimulator::new(&reference_car(), &SimulationConfig::default()).time_to_reach(100.0));
    }

    #[test]
    fn empty_gear_table_ends_immediately() {
        let config = SimulationConfig {
            gears: GearTable::new(vec![], 3.42, 0.33).unwrap(),
            ..SimulationConfig::default()
        };
        let run = AccelerationSimulator::new(&reference_car(), &config).run(100.0);
        assert_eq!(run.termination, Termination::GearsExhausted);
        assert_eq!(run.time, 0.0);
    }

    #[test]
    fn post_shift_rpm_drives_the_step_after_a_shift() {
        let car = ParameterSet::new(90.0, 1400.0, 0.85, 1.225, 0.30, 0.015, 2.2,
                                    Drivetrain::FWD, RpmWindow::new(500.0, 7000.0));
        let run_with = |post_shift_fraction: f64| {
            let mut config = SimulationConfig::default();
            config.shift_schedule.post_shift_fraction = post_shift_fraction;
            AccelerationSimulator::new(&car, &config).run(120.0)
        };
        let low = run_with(0.3);
        let high = run_with(0.99);
        assert!(low.reached() && high.reached());
        assert_eq!(low.shifts, 2);
        assert_eq!(high.shifts, 2);
        // a higher post-shift RPM means less torque on the first step in the new gear
        assert!(high.time - low.time > 0.02, "{} vs {}", low.time, high.time);
        assert_abs_diff_eq!(low.time, 21.72, epsilon = 0.01);
        assert_abs_diff_eq!(high.time, 21.76, epsilon = 0.01);
    }

    #[test]
    fn settings_that_never_end_a_run_are_rejected() {
        assert_eq!(SimulationConfig::default().validate(), Ok(()));
        let no_step = SimulationConfig { min_time_step: 0.0, ..SimulationConfig::default() };
        assert!(matches!(no_step.validate(), Err(Error::InvalidConfig(_))));
        let no_limit = SimulationConfig { time_limit: f64::INFINITY, ..SimulationConfig::default() };
        assert!(matches!(no_limit.validate(), Err(Error::InvalidConfig(_))));
        let bad_gears = SimulationConfig {
            gears: serde_json::from_str(r#"{"gear_ratios": [0.0], "final_drive": 3.42, "tire_radius": 0.33}"#).unwrap(),
            ..SimulationConfig::default()
        };
        assert!(matches!(bad_gears.validate(), Err(Error::InvalidGearTable(_))));
    }

    #[test]
    fn unparsed_power_gives_nan() {
        let car = ParameterSet::new(f64::NAN, 1400.0, 0.85, 1.225, 0.30, 0.015, 2.2,
                                    Drivetrain::RWD, RpmWindow::new(500.0, 7000.0));
        let run = AccelerationSimulator::new(&car, &SimulationConfig::default()).run(100.0);
        assert_eq!(run.termination, Termination::InvalidInputs);
        assert!(run.time.is_nan());
    }

    #[test]
    fn underpowered_car_stalls() {
        let car = ParameterSet::new(5.0, 1400.0, 0.85, 1.225, 0.30, 0.015, 2.2,
                                    Drivetrain::FWD, RpmWindow::new(500.0, 7000.0));
        let run = AccelerationSimulator::new(&car, &SimulationConfig::default()).run(100.0);
        assert_eq!(run.termination, Termination::Stalled);
    }

    #[test]
    fn estimates_flag_unreached_targets() {
        let sim = AccelerationSimulator::new(&reference_car(), &SimulationConfig::default());
        let to_100 = sim.estimate(100.0);
        assert!(to_100.reached);
        assert_eq!(to_100.to_string(), "5.22 s");
        let to_200 = sim.estimate(200.0);
        assert!(!to_200.reached);
        assert!(to_200.to_string().ends_with("(not reached)"));

        let closed_form = ClosedFormEstimator::new(&reference_car()).estimate(100.0);
        assert!(closed_form.reached);
        assert_eq!(closed_form.to_string(), "5.94 s");
    }

    #[test]
    fn closed_form_reference_value() {
        let estimator = ClosedFormEstimator::new(&reference_car());
        assert_abs_diff_eq!(estimator.time_to_reach(100.0), 5.94, epsilon = 0.01);
        assert_eq!(ClosedFormEstimator::traction_bonus(Drivetrain::AWD, 200.0), 1.0);
        assert_eq!(ClosedFormEstimator::traction_bonus(Drivetrain::FWD, 200.0), 0.0);
    }

    #[test]
    fn strategy_selection() {
        let car = reference_car();
        let config = SimulationConfig::default();
        for strategy in [AccelerationStrategy::Simulation, AccelerationStrategy::ClosedForm] {
            assert_eq!(acceleration_model(strategy, &car, &config).strategy(), strategy);
            assert_eq!(strategy.as_str().parse::<AccelerationStrategy>(), Ok(strategy));
        }
        assert!("euler".parse::<AccelerationStrategy>().is_err());
    }

    #[test]
    fn sweep_starts_at_zero_and_has_one_point_per_kmh() {
        let sim = AccelerationSimulator::new(&reference_car(), &SimulationConfig::default());
        let sweep = acceleration_sweep(&sim, 100);
        assert_eq!(sweep.len(), 101);
        assert_eq!(sweep[0], (0.0, 0.0));
        assert_eq!(sweep[100].0, 100.0);
        assert_eq!(sweep[100].1, sim.time_to_reach(100.0));
    }

    #[test]
    fn sweep_drops_nan_points_but_keeps_origin() {
        let car = ParameterSet::new(f64::NAN, 1400.0, 0.85, 1.225, 0.30, 0.015, 2.2,
                                    Drivetrain::RWD, RpmWindow::new(500.0, 7000.0));
        let estimator = ClosedFormEstimator::new(&car);
        let sweep = acceleration_sweep(&estimator, 50);
        assert_eq!(sweep, vec![(0.0, 0.0)]);
    }
}
