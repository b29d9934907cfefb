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

use std::result;
use itertools::Itertools;

pub type Result<T> = result::Result<T, Error>;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("missing required fields: {}", .0.iter().join(", "))]
    MissingFields(Vec<&'static str>),
    #[error("unknown drivetrain `{0}`. expected one of FWD, RWD or AWD")]
    InvalidDrivetrain(String),
    #[error("invalid gear table. `{0}`")]
    InvalidGearTable(String),
    #[error("invalid calculator settings. `{0}`")]
    InvalidConfig(String),
}
