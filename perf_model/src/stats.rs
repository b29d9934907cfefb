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
use utils::units::{kmh_to_mps, kw_to_bhp, watts_to_kw};
use crate::acceleration::TimeEstimate;
use crate::params::ParameterSet;

/// Figures derived from the inputs and the 0-100 time
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PerformanceStats {
    pub power_kw: f64,
    pub power_bhp: f64,
    pub kg_per_cv: f64,
    pub cv_per_tonne: f64,
    /// Mean acceleration (m/s^2) over the 0-100 run. `None` when 100 km/h was not reached
    pub mean_acceleration: Option<f64>,
    /// Distance (m) covered during the 0-100 run assuming constant acceleration
    pub distance_to_100: Option<f64>
}

impl PerformanceStats {
    pub fn new(params: &ParameterSet, time_0_to_100: &TimeEstimate) -> PerformanceStats {
        let power_kw = watts_to_kw(params.power_watts());
        let seconds = time_0_to_100.seconds;
        let (mean_acceleration, distance_to_100) = match time_0_to_100.reached && seconds.is_finite() && seconds > 0.0 {
            true => {
                let acceleration = kmh_to_mps(time_0_to_100.target_kmh) / seconds;
                (Some(acceleration), Some(0.5 * acceleration * seconds.powi(2)))
            }
            false => (None, None)
        };
        PerformanceStats {
            power_kw,
            power_bhp: kw_to_bhp(power_kw),
            kg_per_cv: params.mass_kg() / params.power_cv(),
            cv_per_tonne: params.power_cv() / (params.mass_kg() / 1000.0),
            mean_acceleration,
            distance_to_100
        }
    }
}
