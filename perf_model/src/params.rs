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

use std::fmt::{Display, Formatter};
use std::str::FromStr;
use serde::{Deserialize, Serialize};
use utils::units::cv_to_watts;
use crate::error::Error;

pub const GRAVITY: f64 = 9.81; // m/s^2

/// Upper bound applied to the drivetrain efficiency by the acceleration simulation
pub const MAX_SIMULATION_EFFICIENCY: f64 = 0.95;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Drivetrain {
    FWD,
    RWD,
    AWD
}

impl Drivetrain {
    pub const FWD_VALUE: &'static str = "FWD";
    pub const RWD_VALUE: &'static str = "RWD";
    pub const AWD_VALUE: &'static str = "AWD";

    pub fn as_str(&self) -> &'static str {
        match self {
            Drivetrain::FWD => { Drivetrain::FWD_VALUE }
            Drivetrain::RWD => { Drivetrain::RWD_VALUE }
            Drivetrain::AWD => { Drivetrain::AWD_VALUE }
        }
    }
}

impl FromStr for Drivetrain {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            Drivetrain::FWD_VALUE => Ok(Drivetrain::FWD),
            Drivetrain::RWD_VALUE => Ok(Drivetrain::RWD),
            Drivetrain::AWD_VALUE => Ok(Drivetrain::AWD),
            _ => Err(Error::InvalidDrivetrain(s.to_string()))
        }
    }
}

impl Display for Drivetrain {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The engine speed range the torque curve is sampled across
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RpmWindow {
    pub min_rpm: f64,
    pub max_rpm: f64
}

impl RpmWindow {
    pub fn new(min_rpm: f64, max_rpm: f64) -> RpmWindow {
        RpmWindow { min_rpm, max_rpm }
    }
}

/// The immutable set of vehicle parameters every calculation reads from.
///
/// Values are stored as entered; nothing here is range checked. Inputs that
/// failed to parse are carried as NaN and propagate through the maths.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParameterSet {
    power_cv: f64,
    mass_kg: f64,
    efficiency: f64,
    air_density: f64,
    drag_coefficient: f64,
    rolling_resistance_coefficient: f64,
    frontal_area: f64,
    drivetrain: Drivetrain,
    rpm_window: RpmWindow
}

impl ParameterSet {
    pub fn new(power_cv: f64,
               mass_kg: f64,
               efficiency: f64,
               air_density: f64,
               drag_coefficient: f64,
               rolling_resistance_coefficient: f64,
               frontal_area: f64,
               drivetrain: Drivetrain,
               rpm_window: RpmWindow
    ) -> ParameterSet {
        ParameterSet {
            power_cv,
            mass_kg,
            efficiency,
            air_density,
            drag_coefficient,
            rolling_resistance_coefficient,
            frontal_area,
            drivetrain,
            rpm_window
        }
    }

    pub fn power_cv(&self) -> f64 {
        self.power_cv
    }

    pub fn power_watts(&self) -> f64 {
        cv_to_watts(self.power_cv)
    }

    pub fn mass_kg(&self) -> f64 {
        self.mass_kg
    }

    pub fn efficiency(&self) -> f64 {
        self.efficiency
    }

    pub fn simulation_efficiency(&self) -> f64 {
        match self.efficiency > MAX_SIMULATION_EFFICIENCY {
            true => MAX_SIMULATION_EFFICIENCY,
            false => self.efficiency
        }
    }

    pub fn air_density(&self) -> f64 {
        self.air_density
    }

    pub fn drag_coefficient(&self) -> f64 {
        self.drag_coefficient
    }

    pub fn rolling_resistance_coefficient(&self) -> f64 {
        self.rolling_resistance_coefficient
    }

    pub fn frontal_area(&self) -> f64 {
        self.frontal_area
    }

    pub fn drivetrain(&self) -> Drivetrain {
        self.drivetrain
    }

    pub fn rpm_window(&self) -> RpmWindow {
        self.rpm_window
    }

    /// CV per kilogram
    pub fn power_to_weight(&self) -> f64 {
        self.power_cv / self.mass_kg
    }

    pub fn weight_force(&self) -> f64 {
        self.mass_kg * GRAVITY
    }

    /// Copy of this set with a different drivetrain. Handy for comparing layouts
    /// of an otherwise identical car.
    pub fn with_drivetrain(&self, drivetrain: Drivetrain) -> ParameterSet {
        ParameterSet { drivetrain, ..self.clone() }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::str::FromStr;
    use crate::error::Error;
    use crate::params::{Drivetrain, ParameterSet, RpmWindow};

    pub(crate) fn reference_car() -> ParameterSet {
        ParameterSet::new(300.0, 1400.0, 0.85, 1.225, 0.30, 0.015, 2.2,
                          Drivetrain::RWD, RpmWindow::new(500.0, 7000.0))
    }

    pub(crate) fn super_car() -> ParameterSet {
        ParameterSet::new(700.0, 1400.0, 0.85, 1.225, 0.30, 0.015, 2.2,
                          Drivetrain::AWD, RpmWindow::new(500.0, 7000.0))
    }

    #[test]
    fn drivetrain_round_trips_through_strings() {
        for d in [Drivetrain::FWD, Drivetrain::RWD, Drivetrain::AWD] {
            assert_eq!(Drivetrain::from_str(&d.to_string()), Ok(d));
        }
        assert_eq!(Drivetrain::from_str(" awd "), Ok(Drivetrain::AWD));
        assert_eq!(Drivetrain::from_str("4WD"), Err(Error::InvalidDrivetrain("4WD".to_string())));
    }

    #[test]
    fn derived_values() {
        let car = reference_car();
        assert_eq!(car.power_watts(), 300.0 * 735.49875);
        assert!((car.power_to_weight() - 0.2142857).abs() < 1e-6);
        assert_eq!(car.simulation_efficiency(), 0.85);

        let lossless = ParameterSet::new(300.0, 1400.0, 1.0, 1.225, 0.30, 0.015, 2.2,
                                         Drivetrain::RWD, RpmWindow::new(500.0, 7000.0));
        assert_eq!(lossless.efficiency(), 1.0);
        assert_eq!(lossless.simulation_efficiency(), 0.95);
        assert_eq!(car.with_drivetrain(Drivetrain::FWD).drivetrain(), Drivetrain::FWD);
    }

    #[test]
    fn unparsed_efficiency_stays_nan_in_the_simulation() {
        let car = ParameterSet::new(300.0, 1400.0, f64::NAN, 1.225, 0.30, 0.015, 2.2,
                                    Drivetrain::RWD, RpmWindow::new(500.0, 7000.0));
        assert!(car.simulation_efficiency().is_nan());
        let over_unity = ParameterSet::new(300.0, 1400.0, 1.2, 1.225, 0.30, 0.015, 2.2,
                                           Drivetrain::RWD, RpmWindow::new(500.0, 7000.0));
        assert_eq!(over_unity.simulation_efficiency(), 0.95);
    }
}
