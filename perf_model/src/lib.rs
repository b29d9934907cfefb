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

pub mod error;
pub mod params;
pub mod inputs;
pub mod resistance;
pub mod traction;
pub mod gearing;
pub mod classification;
pub mod acceleration;
pub mod top_speed;
pub mod torque;
pub mod stats;
pub mod calculator;

pub use error::{Error, Result};
pub use params::{Drivetrain, ParameterSet, RpmWindow};
pub use inputs::{InputDefaults, InputField, RawInputs, RequiredFields};
pub use acceleration::{AccelerationModel, AccelerationStrategy, TimeEstimate};
pub use calculator::{Calculator, CalculatorConfig, ResultSet};
