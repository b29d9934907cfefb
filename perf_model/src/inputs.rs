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
use tracing::debug;
use utils::numeric::parse_float_prefix;
use crate::error::{Error, Result};
use crate::params::{Drivetrain, ParameterSet, RpmWindow};

/// Every value a user can provide for a calculation
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputField {
    PowerCv,
    MassKg,
    Efficiency,
    AirDensity,
    DragCoefficient,
    RollingResistanceCoefficient,
    FrontalArea,
    Drivetrain,
    MinRpm,
    MaxRpm
}

impl InputField {
    pub const ALL: [InputField; 10] = [
        InputField::PowerCv,
        InputField::MassKg,
        InputField::Efficiency,
        InputField::AirDensity,
        InputField::DragCoefficient,
        InputField::RollingResistanceCoefficient,
        InputField::FrontalArea,
        InputField::Drivetrain,
        InputField::MinRpm,
        InputField::MaxRpm
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            InputField::PowerCv => "power_cv",
            InputField::MassKg => "mass_kg",
            InputField::Efficiency => "efficiency",
            InputField::AirDensity => "air_density",
            InputField::DragCoefficient => "drag_coefficient",
            InputField::RollingResistanceCoefficient => "rolling_resistance_coefficient",
            InputField::FrontalArea => "frontal_area",
            InputField::Drivetrain => "drivetrain",
            InputField::MinRpm => "min_rpm",
            InputField::MaxRpm => "max_rpm"
        }
    }
}

/// Raw, unparsed values exactly as they were entered
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawInputs {
    pub power_cv: String,
    pub mass_kg: String,
    pub efficiency: String,
    pub air_density: String,
    pub drag_coefficient: String,
    pub rolling_resistance_coefficient: String,
    pub frontal_area: String,
    pub drivetrain: String,
    pub min_rpm: String,
    pub max_rpm: String
}

impl RawInputs {
    pub fn get(&self, field: InputField) -> &str {
        match field {
            InputField::PowerCv => &self.power_cv,
            InputField::MassKg => &self.mass_kg,
            InputField::Efficiency => &self.efficiency,
            InputField::AirDensity => &self.air_density,
            InputField::DragCoefficient => &self.drag_coefficient,
            InputField::RollingResistanceCoefficient => &self.rolling_resistance_coefficient,
            InputField::FrontalArea => &self.frontal_area,
            InputField::Drivetrain => &self.drivetrain,
            InputField::MinRpm => &self.min_rpm,
            InputField::MaxRpm => &self.max_rpm
        }
    }

    pub fn set(&mut self, field: InputField, value: impl Into<String>) {
        let value = value.into();
        match field {
            InputField::PowerCv => self.power_cv = value,
            InputField::MassKg => self.mass_kg = value,
            InputField::Efficiency => self.efficiency = value,
            InputField::AirDensity => self.air_density = value,
            InputField::DragCoefficient => self.drag_coefficient = value,
            InputField::RollingResistanceCoefficient => self.rolling_resistance_coefficient = value,
            InputField::FrontalArea => self.frontal_area = value,
            InputField::Drivetrain => self.drivetrain = value,
            InputField::MinRpm => self.min_rpm = value,
            InputField::MaxRpm => self.max_rpm = value
        }
    }

    /// Overwrite any field of `self` with the non-empty fields of `other`
    pub fn merge(&mut self, other: &RawInputs) {
        for field in InputField::ALL {
            let value = other.get(field);
            if !value.trim().is_empty() {
                self.set(field, value);
            }
        }
    }

    /// Required fields that are empty (after trimming), in declaration order
    pub fn missing_fields(&self, required: &RequiredFields) -> Vec<&'static str> {
        InputField::ALL.iter()
            .filter(|f| required.contains(**f) && self.get(**f).trim().is_empty())
            .map(|f| f.as_str())
            .collect()
    }

    /// Gate on the required fields and then parse every value into a [ParameterSet].
    ///
    /// Numeric values are parsed permissively. A value that can't be parsed falls
    /// back to its default or becomes NaN if the field has no default.
    pub fn to_parameter_set(&self,
                            defaults: &InputDefaults,
                            required: &RequiredFields) -> Result<ParameterSet> {
        let missing = self.missing_fields(required);
        if !missing.is_empty() {
            return Err(Error::MissingFields(missing));
        }

        let number = |field: InputField| -> f64 {
            match parse_float_prefix(self.get(field)) {
                Some(v) => v,
                None => {
                    let fallback = defaults.numeric_default(field).unwrap_or(f64::NAN);
                    debug!("Couldn't parse {} from '{}'. Using {}", field.as_str(), self.get(field), fallback);
                    fallback
                }
            }
        };

        let drivetrain = match self.drivetrain.trim() {
            "" => defaults.drivetrain,
            val => val.parse::<Drivetrain>()?
        };

        Ok(ParameterSet::new(
            number(InputField::PowerCv),
            number(InputField::MassKg),
            number(InputField::Efficiency),
            number(InputField::AirDensity),
            number(InputField::DragCoefficient),
            number(InputField::RollingResistanceCoefficient),
            number(InputField::FrontalArea),
            drivetrain,
            RpmWindow::new(number(InputField::MinRpm), number(InputField::MaxRpm))
        ))
    }
}

/// Values substituted when an entered number can't be parsed
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputDefaults {
    pub power_cv: Option<f64>,
    pub mass_kg: Option<f64>,
    pub efficiency: Option<f64>,
    pub air_density: Option<f64>,
    pub drag_coefficient: Option<f64>,
    pub rolling_resistance_coefficient: Option<f64>,
    pub frontal_area: Option<f64>,
    pub drivetrain: Drivetrain,
    pub min_rpm: Option<f64>,
    pub max_rpm: Option<f64>
}

impl Default for InputDefaults {
    fn default() -> Self {
        InputDefaults {
            power_cv: None,
            mass_kg: Some(1500.0),
            efficiency: Some(0.85),
            air_density: Some(1.225),
            drag_coefficient: Some(0.30),
            rolling_resistance_coefficient: Some(0.015),
            frontal_area: Some(2.2),
            drivetrain: Drivetrain::FWD,
            min_rpm: None,
            max_rpm: None
        }
    }
}

impl InputDefaults {
    pub fn numeric_default(&self, field: InputField) -> Option<f64> {
        match field {
            InputField::PowerCv => self.power_cv,
            InputField::MassKg => self.mass_kg,
            InputField::Efficiency => self.efficiency,
            InputField::AirDensity => self.air_density,
            InputField::DragCoefficient => self.drag_coefficient,
            InputField::RollingResistanceCoefficient => self.rolling_resistance_coefficient,
            InputField::FrontalArea => self.frontal_area,
            InputField::MinRpm => self.min_rpm,
            InputField::MaxRpm => self.max_rpm,
            InputField::Drivetrain => None
        }
    }
}

/// The fields that must be non-empty before a calculation is attempted
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequiredFields(Vec<InputField>);

impl RequiredFields {
    pub fn new(fields: Vec<InputField>) -> RequiredFields {
        RequiredFields(fields)
    }

    pub fn none() -> RequiredFields {
        RequiredFields(Vec::new())
    }

    pub fn contains(&self, field: InputField) -> bool {
        self.0.contains(&field)
    }

    pub fn fields(&self) -> &[InputField] {
        &self.0
    }
}

impl Default for RequiredFields {
    fn default() -> Self {
        RequiredFields(InputField::ALL.to_vec())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use crate::error::Error;
    use crate::inputs::{InputDefaults, InputField, RawInputs, RequiredFields};
    use crate::params::Drivetrain;

    pub(crate) fn reference_inputs() -> RawInputs {
        RawInputs {
            power_cv: "300".to_string(),
            mass_kg: "1400".to_string(),
            efficiency: "0.85".to_string(),
            air_density: "1.225".to_string(),
            drag_coefficient: "0.30".to_string(),
            rolling_resistance_coefficient: "0.015".to_string(),
            frontal_area: "2.2".to_string(),
            drivetrain: "RWD".to_string(),
            min_rpm: "500".to_string(),
            max_rpm: "7000".to_string()
        }
    }

    #[test]
    fn complete_inputs_parse() {
        let params = reference_inputs()
            .to_parameter_set(&InputDefaults::default(), &RequiredFields::default())
            .unwrap();
        assert_eq!(params.power_cv(), 300.0);
        assert_eq!(params.mass_kg(), 1400.0);
        assert_eq!(params.drivetrain(), Drivetrain::RWD);
        assert_eq!(params.rpm_window().max_rpm, 7000.0);
    }

    #[test]
    fn every_empty_required_field_is_reported() {
        let mut inputs = reference_inputs();
        inputs.set(InputField::MassKg, "");
        inputs.set(InputField::Drivetrain, "   ");
        let res = inputs.to_parameter_set(&InputDefaults::default(), &RequiredFields::default());
        assert_eq!(res, Err(Error::MissingFields(vec!["mass_kg", "drivetrain"])));
    }

    #[test]
    fn unparsable_values_fall_back_to_defaults() {
        let mut inputs = reference_inputs();
        inputs.set(InputField::MassKg, "heavy");
        inputs.set(InputField::FrontalArea, "n/a");
        inputs.set(InputField::PowerCv, "lots");
        let params = inputs
            .to_parameter_set(&InputDefaults::default(), &RequiredFields::default())
            .unwrap();
        assert_eq!(params.mass_kg(), 1500.0);
        assert_eq!(params.frontal_area(), 2.2);
        assert!(params.power_cv().is_nan());
    }

    #[test]
    fn optional_fields_use_defaults_when_empty() {
        let inputs = RawInputs {
            power_cv: "150".to_string(),
            ..RawInputs::default()
        };
        let required = RequiredFields::new(vec![InputField::PowerCv]);
        let params = inputs.to_parameter_set(&InputDefaults::default(), &required).unwrap();
        assert_eq!(params.drivetrain(), Drivetrain::FWD);
        assert_eq!(params.mass_kg(), 1500.0);
        assert!(params.rpm_window().min_rpm.is_nan());
    }

    #[test]
    fn unknown_drivetrain_is_rejected() {
        let mut inputs = reference_inputs();
        inputs.set(InputField::Drivetrain, "4x4");
        let res = inputs.to_parameter_set(&InputDefaults::default(), &RequiredFields::default());
        assert_eq!(res, Err(Error::InvalidDrivetrain("4x4".to_string())));
    }

    #[test]
    fn merge_only_takes_non_empty_values() {
        let mut base = reference_inputs();
        let overrides = RawInputs {
            power_cv: "450".to_string(),
            mass_kg: " ".to_string(),
            ..RawInputs::default()
        };
        base.merge(&overrides);
        assert_eq!(base.power_cv, "450");
        assert_eq!(base.mass_kg, "1400");
    }
}
