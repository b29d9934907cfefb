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
use tracing::{debug, warn};
use utils::units::{kmh_to_mps, watts_to_kw};
use crate::error::{Error, Result};
use crate::params::ParameterSet;
use crate::resistance::{AeroDragModel, RollingResistance};

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TopSpeedConfig {
    /// Lower bound (KM/H) of the search
    pub min_kmh: f64,
    /// Upper bound (KM/H) of the search
    pub max_kmh: f64,
    /// Search stops once the bracket is narrower than this (KM/H)
    pub tolerance_kmh: f64
}

impl TopSpeedConfig {
    /// The search range must be finite and ordered and the tolerance positive, or the bisection never ends
    pub fn validate(&self) -> Result<()> {
        if !(self.tolerance_kmh > 0.0) {
            return Err(Error::InvalidConfig(format!("tolerance_kmh {} must be positive", self.tolerance_kmh)));
        }
        if !self.min_kmh.is_finite() || !self.max_kmh.is_finite() || self.min_kmh >= self.max_kmh {
            return Err(Error::InvalidConfig(format!("top speed search range {}..{} is invalid",
                                                    self.min_kmh, self.max_kmh)));
        }
        Ok(())
    }
}

impl Default for TopSpeedConfig {
    fn default() -> Self {
        TopSpeedConfig {
            min_kmh: 38.0,
            max_kmh: 500.0,
            tolerance_kmh: 0.1
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PowerPoint {
    pub speed_kmh: f64,
    pub required_kw: f64,
    pub available_kw: f64
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TopSpeed {
    pub speed_kmh: f64,
    pub iterations: u32,
    /// The power balance was never met inside the search range
    pub at_search_limit: bool,
    /// Road load and available power at every whole km/h up to the top speed
    pub curve: Vec<PowerPoint>
}

/// Finds the speed where the power needed to overcome road load matches what the engine delivers
/// Bound on bisection steps when the configuration hasn't been validated
const MAX_BISECTION_ITERATIONS: u32 = 200;

pub struct TopSpeedSolver {
    power_available: f64,
    drag: AeroDragModel,
    rolling: RollingResistance,
    config: TopSpeedConfig
}

impl TopSpeedSolver {
    pub fn new(params: &ParameterSet, config: TopSpeedConfig) -> TopSpeedSolver {
        TopSpeedSolver {
            power_available: params.power_watts() * params.efficiency(),
            drag: AeroDragModel::plain(params),
            rolling: RollingResistance::constant(params),
            config
        }
    }

    /// Power (W) at the wheels
    pub fn power_available(&self) -> f64 {
        self.power_available
    }

    /// Power (W) needed to hold `speed_kmh` against drag and rolling resistance
    pub fn power_required(&self, speed_kmh: f64) -> f64 {
        let speed = kmh_to_mps(speed_kmh);
        self.drag.drag_power(speed) + self.rolling.power(speed)
    }

    pub fn solve(&self) -> TopSpeed {
        if !self.power_available.is_finite() {
            warn!("Can't solve top speed with {} W available", self.power_available);
            return TopSpeed { speed_kmh: f64::NAN, iterations: 0, at_search_limit: false, curve: Vec::new() };
        }

        let mut low = self.config.min_kmh;
        let mut high = self.config.max_kmh;
        let mut iterations = 0;
        while high - low >= self.config.tolerance_kmh && iterations < MAX_BISECTION_ITERATIONS {
            let mid = (low + high) / 2.0;
            if self.power_required(mid) < self.power_available {
                low = mid;
            } else {
                high = mid;
            }
            iterations += 1;
        }
        let speed_kmh = (low + high) / 2.0;
        let at_search_limit = self.config.max_kmh - speed_kmh < self.config.tolerance_kmh
            || speed_kmh - self.config.min_kmh < self.config.tolerance_kmh;
        debug!("Top speed {:.2} km/h after {} iterations", speed_kmh, iterations);

        TopSpeed {
            speed_kmh,
            iterations,
            at_search_limit,
            curve: self.power_curve(speed_kmh)
        }
    }

    /// Sample required and available power (kW) at each whole km/h from 0 to `top_speed_kmh`
    pub fn power_curve(&self, top_speed_kmh: f64) -> Vec<PowerPoint> {
        if !top_speed_kmh.is_finite() || top_speed_kmh < 0.0 {
            return Vec::new();
        }
        let available_kw = watts_to_kw(self.power_available);
        (0..=top_speed_kmh.floor() as u32)
            .map(|speed| PowerPoint {
                speed_kmh: speed as f64,
                required_kw: watts_to_kw(self.power_required(speed as f64)),
                available_kw
            })
            .filter(|p| p.required_kw.is_finite())
            .collect()
    }
}
