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
use crate::params::{Drivetrain, ParameterSet};

/// Grip characteristics of a single drivetrain layout
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TractionCoefficients {
    /// Multiple of the car's weight force that can be transmitted from standstill
    pub base_coefficient: f64,
    /// Speed (m/s) over which the available grip falls by a factor of e
    pub decay_constant: f64
}

impl TractionCoefficients {
    pub const fn new(base_coefficient: f64, decay_constant: f64) -> TractionCoefficients {
        TractionCoefficients { base_coefficient, decay_constant }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TractionTable {
    pub fwd: TractionCoefficients,
    pub rwd: TractionCoefficients,
    pub awd: TractionCoefficients
}

impl Default for TractionTable {
    fn default() -> Self {
        TractionTable {
            fwd: TractionCoefficients::new(1.30, 20.0),
            rwd: TractionCoefficients::new(1.45, 18.0),
            awd: TractionCoefficients::new(1.60, 22.0)
        }
    }
}

impl TractionTable {
    pub fn coefficients_for(&self, drivetrain: Drivetrain) -> TractionCoefficients {
        match drivetrain {
            Drivetrain::FWD => self.fwd,
            Drivetrain::RWD => self.rwd,
            Drivetrain::AWD => self.awd
        }
    }
}

/// Upper bound on the force the driven wheels can put down before they spin
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TractionModel {
    weight_force: f64,
    coefficients: TractionCoefficients
}

impl TractionModel {
    pub fn new(params: &ParameterSet, table: &TractionTable) -> TractionModel {
        TractionModel {
            weight_force: params.weight_force(),
            coefficients: table.coefficients_for(params.drivetrain())
        }
    }

    pub fn coefficients(&self) -> TractionCoefficients {
        self.coefficients
    }

    /// Max tractive force (N) available at `speed` (m/s)
    pub fn max_traction(&self, speed: f64) -> f64 {
        self.coefficients.base_coefficient * self.weight_force * (-speed / self.coefficients.decay_constant).exp()
    }

    /// Clamp the force the engine can deliver to what the tyres can transmit.
    /// A NaN engine force stays NaN
    pub fn limit(&self, engine_force: f64, speed: f64) -> f64 {
        let max_traction = self.max_traction(speed);
        match engine_force > max_traction {
            true => max_traction,
            false => engine_force
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use crate::params::Drivetrain;
    use crate::params::tests::reference_car;
    use crate::traction::{TractionModel, TractionTable};

    #[test]
    fn traction_at_standstill_is_base_coefficient_times_weight() {
        let car = reference_car();
        let model = TractionModel::new(&car, &TractionTable::default());
        assert_relative_eq!(model.max_traction(0.0), 1.45 * 1400.0 * 9.81, max_relative = 1e-12);
    }

    #[test]
    fn traction_decays_with_speed() {
        let car = reference_car();
        let model = TractionModel::new(&car, &TractionTable::default());
        assert_relative_eq!(model.max_traction(18.0), model.max_traction(0.0) / std::f64::consts::E, max_relative = 1e-12);
        assert!(model.max_traction(40.0) < model.max_traction(20.0));
    }

    #[test]
    fn awd_has_the_most_grip_from_standstill() {
        let car = reference_car();
        let table = TractionTable::default();
        let grip = |d: Drivetrain| TractionModel::new(&car.with_drivetrain(d), &table).max_traction(0.0);
        assert!(grip(Drivetrain::AWD) > grip(Drivetrain::RWD));
        assert!(grip(Drivetrain::AWD) > grip(Drivetrain::FWD));
    }

    #[test]
    fn engine_force_is_clamped() {
        let car = reference_car();
        let model = TractionModel::new(&car, &TractionTable::default());
        let grip = model.max_traction(10.0);
        assert_eq!(model.limit(grip * 2.0, 10.0), grip);
        assert_eq!(model.limit(grip / 2.0, 10.0), grip / 2.0);
        assert!(model.limit(f64::NAN, 10.0).is_nan());
    }
}
