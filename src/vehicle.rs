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

use std::fs;
use std::path::Path;
use toml::{Table, Value};
use tracing::{info, warn};
use perf_model::{InputField, RawInputs};
use crate::error::{Error, Result};

/// Load form inputs from a TOML file keyed by the input field names.
///
/// Numbers and strings are both accepted, `power_cv = 300` and `power_cv = "300"` are equivalent
pub fn load_vehicle_file(path: &Path) -> Result<RawInputs> {
    let contents = fs::read_to_string(path).map_err(|e| {
        Error::VehicleFile { path: path.to_path_buf(), reason: e.to_string() }
    })?;
    let inputs = parse_vehicle(&contents).map_err(|e| {
        Error::VehicleFile { path: path.to_path_buf(), reason: e.to_string() }
    })?;
    info!("Loaded vehicle from {}", path.display());
    Ok(inputs)
}

pub fn parse_vehicle(contents: &str) -> std::result::Result<RawInputs, toml::de::Error> {
    let table: Table = toml::from_str(contents)?;
    let mut inputs = RawInputs::default();
    for (key, value) in &table {
        match InputField::ALL.iter().find(|f| f.as_str() == key) {
            Some(field) => inputs.set(*field, value_as_input(value)),
            None => warn!("Ignoring unknown vehicle key {}", key)
        }
    }
    Ok(inputs)
}

fn value_as_input(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string()
    }
}
