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

use serde::{Deserialize, Serialize};
use utils::units::{mps_to_kmh, watts_to_kw};
use crate::error::{Error, Result};

/// Engine RPM per kW of power that yields torque in Nm (60 * 1000 / 2pi)
pub const TORQUE_CONSTANT: f64 = 9549.0;

/// Fixed gear ratios, final drive and driven tyre radius of the modelled car
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GearTable {
    gear_ratios: Vec<f64>,
    final_drive: f64,
    tire_radius: f64
}

impl Default for GearTable {
    fn default() -> Self {
        GearTable {
            gear_ratios: vec![3.82, 2.36, 1.68, 1.31, 1.08, 0.88],
            final_drive: 3.42,
            tire_radius: 0.33
        }
    }
}

impl GearTable {
    pub fn new(gear_ratios: Vec<f64>, final_drive: f64, tire_radius: f64) -> Result<GearTable> {
        let table = GearTable { gear_ratios, final_drive, tire_radius };
        table.validate()?;
        Ok(table)
    }

    /// Check every ratio and dimension is positive. Tables loaded through serde
    /// should be passed through this before use
    pub fn validate(&self) -> Result<()> {
        if let Some(ratio) = self.gear_ratios.iter().find(|r| !(**r > 0.0)) {
            return Err(Error::InvalidGearTable(format!("gear ratio {} must be positive", ratio)));
        }
        if !(self.final_drive > 0.0) {
            return Err(Error::InvalidGearTable(format!("final drive {} must be positive", self.final_drive)));
        }
        if !(self.tire_radius > 0.0) {
            return Err(Error::InvalidGearTable(format!("tyre radius {} must be positive", self.tire_radius)));
        }
        Ok(())
    }

    pub fn gear_ratios(&self) -> &[f64] {
        &self.gear_ratios
    }

    pub fn ratio(&self, gear_idx: usize) -> Option<f64> {
        self.gear_ratios.get(gear_idx).copied()
    }

    pub fn num_gears(&self) -> usize {
        self.gear_ratios.len()
    }

    pub fn final_drive(&self) -> f64 {
        self.final_drive
    }

    pub fn tire_radius(&self) -> f64 {
        self.tire_radius
    }

    pub fn wheel_circumference(&self) -> f64 {
        2.0 * std::f64::consts::PI * self.tire_radius
    }
}

/// Engine speed limits and the cost of changing gear
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShiftSchedule {
    pub redline: f64,
    /// An upshift happens this many RPM below the redline
    pub shift_margin: f64,
    /// Fraction of the redline the engine drops to after an upshift
    pub post_shift_fraction: f64,
    /// Seconds lost on every shift
    pub base_shift_penalty: f64,
    /// Extra seconds lost per gear index of the gear being shifted into
    pub per_gear_penalty: f64,
    /// RPM the car launches from. Torque is never computed below this speed
    pub launch_rpm: f64
}

impl Default for ShiftSchedule {
    fn default() -> Self {
        ShiftSchedule {
            redline: 7000.0,
            shift_margin: 200.0,
            post_shift_fraction: 0.65,
            base_shift_penalty: 0.15,
            per_gear_penalty: 0.03,
            launch_rpm: 2200.0
        }
    }
}

impl ShiftSchedule {
    pub fn shift_point(&self) -> f64 {
        self.redline - self.shift_margin
    }

    pub fn post_shift_rpm(&self) -> f64 {
        self.redline * self.post_shift_fraction
    }

    /// Seconds lost shifting into `new_gear_idx`
    pub fn shift_penalty(&self, new_gear_idx: usize) -> f64 {
        self.base_shift_penalty + new_gear_idx as f64 * self.per_gear_penalty
    }
}

pub struct GearboxModel {
    gears: GearTable,
    schedule: ShiftSchedule
}

impl GearboxModel {
    pub fn new(gears: GearTable, schedule: ShiftSchedule) -> GearboxModel {
        GearboxModel { gears, schedule }
    }

    pub fn gears(&self) -> &GearTable {
        &self.gears
    }

    pub fn schedule(&self) -> &ShiftSchedule {
        &self.schedule
    }

    pub fn max_gear_idx(&self) -> Option<usize> {
        self.gears.num_gears().checked_sub(1)
    }

    pub fn is_final_gear(&self, gear_idx: usize) -> bool {
        gear_idx + 1 >= self.gears.num_gears()
    }

    /// Engine RPM (clamped to the redline) at `speed` m/s in the provided gear.
    /// Returns `None` if the gear doesn't exist
    pub fn rpm_for_speed(&self, speed: f64, gear_idx: usize) -> Option<f64> {
        let ratio = self.gears.ratio(gear_idx)?;
        let rpm = speed * 60.0 * ratio * self.gears.final_drive() / self.gears.wheel_circumference();
        Some(rpm.min(self.schedule.redline))
    }

    /// Whether the engine is close enough to the redline to change up and a higher gear exists
    pub fn should_upshift(&self, rpm: f64, gear_idx: usize) -> bool {
        rpm >= self.schedule.shift_point() && !self.is_final_gear(gear_idx)
    }

    /// Torque (Nm) the engine makes at `rpm` if `power_watts` is delivered at every engine speed
    pub fn engine_torque(&self, rpm: f64, power_watts: f64) -> f64 {
        watts_to_kw(power_watts) * TORQUE_CONSTANT / rpm.max(self.schedule.launch_rpm)
    }

    /// Force (N) at the contact patch from `torque` Nm at the engine in the provided gear
    pub fn wheel_force(&self, torque: f64, gear_idx: usize) -> Option<f64> {
        let ratio = self.gears.ratio(gear_idx)?;
        Some(torque * ratio * self.gears.final_drive() / self.gears.tire_radius())
    }

    /// Speed in m/s at `engine_rpm` in the provided gear
    pub fn engine_rpm_to_wheel_speed(&self, engine_rpm: f64, gear_idx: usize) -> Option<f64> {
        let ratio = self.gears.ratio(gear_idx)?;
        Some(engine_rpm * self.gears.wheel_circumference() / (60.0 * ratio * self.gears.final_drive()))
    }

    /// Get the max possible speed (KM/H) the provided gear
    /// could reach
    ///
    /// - `gear_idx`: The index of the gear (indexed from 0)
    pub fn max_speed_for_gear(&self, gear_idx: usize) -> Option<f64> {
        self.engine_rpm_to_wheel_speed(self.schedule.redline, gear_idx).map(mps_to_kmh)
    }

    /// The max speed (KM/H) reachable at the redline in any gear
    pub fn max_speed(&self) -> f64 {
        (0..self.gears.num_gears())
            .filter_map(|idx| self.max_speed_for_gear(idx))
            .fold(0.0, f64::max)
    }

    /// Speed (KM/H) against engine RPM for one gear, from launch RPM to the redline
    pub fn speed_plot_for_gear(&self, gear_idx: usize, rpm_increment: f64) -> Vec<(f64, f64)> {
        let mut plot_data: Vec<(f64, f64)> = Vec::new();
        if gear_idx >= self.gears.num_gears() || !(rpm_increment > 0.0) {
            return plot_data;
        }
        let mut engine_rpm = self.schedule.launch_rpm;
        while engine_rpm <= self.schedule.redline {
            if let Some(speed) = self.engine_rpm_to_wheel_speed(engine_rpm, gear_idx) {
                plot_data.push((mps_to_kmh(speed), engine_rpm));
            }
            engine_rpm += rpm_increment;
        }
        plot_data
    }

    pub fn speed_plot(&self, rpm_increment: f64) -> Vec<Vec<(f64, f64)>> {
        (0..self.gears.num_gears())
            .map(|gear_idx| self.speed_plot_for_gear(gear_idx, rpm_increment))
            .collect()
    }
}
