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

//! Heuristic performance classes used to calibrate the simulation and shape the torque curve

use std::fmt::{Display, Formatter};
use serde::{Deserialize, Serialize};
use crate::params::ParameterSet;

/// Classification that picks the correction applied to simulated acceleration times
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum VehicleClass {
    Normal,
    Supercar,
    Hypercar
}

impl VehicleClass {
    const HYPERCAR_MIN_POWER_TO_WEIGHT: f64 = 0.45;
    const HYPERCAR_MAX_MASS: f64 = 1500.0;
    const SUPERCAR_MIN_POWER_TO_WEIGHT: f64 = 0.35;
    const SUPERCAR_MAX_MASS: f64 = 1700.0;

    pub fn classify(params: &ParameterSet) -> VehicleClass {
        let power_to_weight = params.power_to_weight();
        let mass = params.mass_kg();
        if power_to_weight > VehicleClass::HYPERCAR_MIN_POWER_TO_WEIGHT && mass < VehicleClass::HYPERCAR_MAX_MASS {
            VehicleClass::Hypercar
        } else if power_to_weight > VehicleClass::SUPERCAR_MIN_POWER_TO_WEIGHT && mass < VehicleClass::SUPERCAR_MAX_MASS {
            VehicleClass::Supercar
        } else {
            VehicleClass::Normal
        }
    }

    /// Multiplier applied to the simulated time
    pub fn time_correction(&self) -> f64 {
        match self {
            VehicleClass::Normal => 1.0,
            VehicleClass::Supercar => 0.95,
            VehicleClass::Hypercar => 0.90
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleClass::Normal => "normal",
            VehicleClass::Supercar => "supercar",
            VehicleClass::Hypercar => "hypercar"
        }
    }
}

impl Display for VehicleClass {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Parameters of the analytic torque curve for an engine class
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TorqueShape {
    pub peak_rpm: f64,
    pub max_torque_limit: f64,
    pub decay_factor: f64,
    pub growth_factor: f64
}

/// Classification that picks the shape of the generated torque curve
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum EngineClass {
    Normal,
    Sport,
    Super
}

impl EngineClass {
    const SUPER_MIN_POWER_CV: f64 = 600.0;
    const SUPER_MIN_POWER_TO_WEIGHT: f64 = 0.40;
    const SPORT_MIN_POWER_CV: f64 = 250.0;
    const SPORT_MIN_POWER_TO_WEIGHT: f64 = 0.18;

    pub fn classify(params: &ParameterSet) -> EngineClass {
        let power_cv = params.power_cv();
        let power_to_weight = params.power_to_weight();
        if power_cv >= EngineClass::SUPER_MIN_POWER_CV || power_to_weight >= EngineClass::SUPER_MIN_POWER_TO_WEIGHT {
            EngineClass::Super
        } else if power_cv >= EngineClass::SPORT_MIN_POWER_CV || power_to_weight >= EngineClass::SPORT_MIN_POWER_TO_WEIGHT {
            EngineClass::Sport
        } else {
            EngineClass::Normal
        }
    }

    pub fn torque_shape(&self) -> TorqueShape {
        match self {
            EngineClass::Super => TorqueShape {
                peak_rpm: 6000.0, max_torque_limit: 900.0, decay_factor: 2500.0, growth_factor: 1500.0
            },
            EngineClass::Sport => TorqueShape {
                peak_rpm: 5000.0, max_torque_limit: 600.0, decay_factor: 2200.0, growth_factor: 1300.0
            },
            EngineClass::Normal => TorqueShape {
                peak_rpm: 4000.0, max_torque_limit: 400.0, decay_factor: 2000.0, growth_factor: 1100.0
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EngineClass::Normal => "normal",
            EngineClass::Sport => "sport",
            EngineClass::Super => "super"
        }
    }
}

impl Display for EngineClass {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
