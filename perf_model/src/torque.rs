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

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use tracing::debug;
use utils::units::calculate_power_kw;
use crate::classification::{EngineClass, TorqueShape};
use crate::params::{ParameterSet, RpmWindow};

/// Fraction of the theoretical torque at the peak RPM a real engine is assumed to make
pub const REALISTIC_TORQUE_FRACTION: f64 = 0.85;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TorqueCurveConfig {
    pub rpm_step: f64
}

impl Default for TorqueCurveConfig {
    fn default() -> Self {
        TorqueCurveConfig { rpm_step: 1000.0 }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TorquePoint {
    pub rpm: f64,
    pub torque_nm: f64,
    pub power_kw: f64
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TorqueCurve {
    pub engine_class: EngineClass,
    pub points: Vec<TorquePoint>
}

impl TorqueCurve {
    /// The point with the most torque. The lowest RPM wins a tie
    pub fn peak(&self) -> Option<TorquePoint> {
        self.points.iter().fold(None, |best: Option<TorquePoint>, point| match best {
            Some(b) if b.torque_nm >= point.torque_nm => Some(b),
            _ => Some(*point)
        })
    }

    /// Linearly interpolated torque at `rpm`. Clamped to the first and last points
    pub fn torque_at(&self, rpm: f64) -> Option<f64> {
        let first = self.points.first()?;
        if rpm <= first.rpm {
            return Some(first.torque_nm);
        }
        for (prev, next) in self.points.iter().tuple_windows() {
            if rpm <= next.rpm {
                let slope = (next.torque_nm - prev.torque_nm) / (next.rpm - prev.rpm);
                return Some(prev.torque_nm + slope * (rpm - prev.rpm));
            }
        }
        self.points.last().map(|p| p.torque_nm)
    }
}

/// Analytic torque curve: exponential rise to the class peak RPM then a gaussian fall off
pub struct TorqueCurveModel {
    power_watts: f64,
    engine_class: EngineClass,
    shape: TorqueShape,
    window: RpmWindow,
    config: TorqueCurveConfig
}

impl TorqueCurveModel {
    pub fn new(params: &ParameterSet, config: TorqueCurveConfig) -> TorqueCurveModel {
        let engine_class = EngineClass::classify(params);
        TorqueCurveModel {
            power_watts: params.power_watts(),
            engine_class,
            shape: engine_class.torque_shape(),
            window: params.rpm_window(),
            config
        }
    }

    pub fn engine_class(&self) -> EngineClass {
        self.engine_class
    }

    /// Torque (Nm) at the peak RPM if all the power was made there
    pub fn theoretical_peak_torque(&self) -> f64 {
        60.0 * self.power_watts / (2.0 * std::f64::consts::PI * self.shape.peak_rpm)
    }

    /// Realistic peak torque (Nm), capped at the class limit. NaN if the power is unknown
    pub fn peak_torque(&self) -> f64 {
        let realistic = self.theoretical_peak_torque() * REALISTIC_TORQUE_FRACTION;
        match realistic > self.shape.max_torque_limit {
            true => self.shape.max_torque_limit,
            false => realistic
        }
    }

    pub fn torque_at(&self, rpm: f64) -> f64 {
        let peak = self.peak_torque();
        let torque = if rpm < self.shape.peak_rpm {
            peak * (1.0 - (-rpm / self.shape.growth_factor).exp())
        } else {
            peak * (-((rpm - self.shape.peak_rpm) / self.shape.decay_factor).powi(2)).exp()
        };
        match torque < 0.0 {
            true => 0.0,
            false => torque
        }
    }

    pub fn curve(&self) -> TorqueCurve {
        let mut points = Vec::new();
        if self.config.rpm_step > 0.0 {
            let mut rpm = self.window.min_rpm;
            while rpm <= self.window.max_rpm {
                let torque_nm = self.torque_at(rpm);
                if !torque_nm.is_nan() {
                    points.push(TorquePoint { rpm, torque_nm, power_kw: calculate_power_kw(rpm, torque_nm) });
                }
                rpm += self.config.rpm_step;
            }
        }
        debug!("Generated {} point {} torque curve", points.len(), self.engine_class);
        TorqueCurve { engine_class: self.engine_class, points }
    }
}
