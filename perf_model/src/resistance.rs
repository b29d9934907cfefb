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

//! Road load forces opposing the car's motion

use serde::{Deserialize, Serialize};
use crate::params::ParameterSet;

/// Speed (m/s) at which the high speed drag correction reaches 2x
pub const HIGH_SPEED_REFERENCE: f64 = 35.0;
pub const HIGH_SPEED_EXPONENT: f64 = 1.8;
/// Speed (m/s) at which speed scaled rolling resistance doubles
pub const ROLLING_SPEED_SCALE: f64 = 100.0;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DragVariant {
    /// 0.5 * rho * Cd * A * v^2
    Plain,
    /// Plain drag amplified by 1 + (v/35)^1.8 to approximate the growth seen at high speed
    HighSpeedAmplified
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AeroDragModel {
    air_density: f64,
    drag_coefficient: f64,
    frontal_area: f64,
    variant: DragVariant
}

impl AeroDragModel {
    pub fn new(params: &ParameterSet, variant: DragVariant) -> AeroDragModel {
        AeroDragModel {
            air_density: params.air_density(),
            drag_coefficient: params.drag_coefficient(),
            frontal_area: params.frontal_area(),
            variant
        }
    }

    pub fn plain(params: &ParameterSet) -> AeroDragModel {
        AeroDragModel::new(params, DragVariant::Plain)
    }

    pub fn amplified(params: &ParameterSet) -> AeroDragModel {
        AeroDragModel::new(params, DragVariant::HighSpeedAmplified)
    }

    pub fn variant(&self) -> DragVariant {
        self.variant
    }

    pub fn base_drag(&self, speed: f64) -> f64 {
        0.5 * self.air_density * self.drag_coefficient * self.frontal_area * speed.powi(2)
    }

    pub fn high_speed_factor(speed: f64) -> f64 {
        1.0 + (speed / HIGH_SPEED_REFERENCE).powf(HIGH_SPEED_EXPONENT)
    }

    /// Drag force (N) at `speed` (m/s)
    pub fn drag_force(&self, speed: f64) -> f64 {
        match self.variant {
            DragVariant::Plain => self.base_drag(speed),
            DragVariant::HighSpeedAmplified => self.base_drag(speed) * AeroDragModel::high_speed_factor(speed)
        }
    }

    /// Power (W) needed to overcome drag at `speed` (m/s)
    pub fn drag_power(&self, speed: f64) -> f64 {
        self.drag_force(speed) * speed
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RollingVariant {
    /// Cr * m * g
    Constant,
    /// Cr * m * g * (1 + v/100)
    SpeedScaled
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RollingResistance {
    coefficient: f64,
    weight_force: f64,
    variant: RollingVariant
}

impl RollingResistance {
    pub fn new(params: &ParameterSet, variant: RollingVariant) -> RollingResistance {
        RollingResistance {
            coefficient: params.rolling_resistance_coefficient(),
            weight_force: params.weight_force(),
            variant
        }
    }

    pub fn constant(params: &ParameterSet) -> RollingResistance {
        RollingResistance::new(params, RollingVariant::Constant)
    }

    pub fn speed_scaled(params: &ParameterSet) -> RollingResistance {
        RollingResistance::new(params, RollingVariant::SpeedScaled)
    }

    pub fn force(&self, speed: f64) -> f64 {
        let base = self.coefficient * self.weight_force;
        match self.variant {
            RollingVariant::Constant => base,
            RollingVariant::SpeedScaled => base * (1.0 + speed / ROLLING_SPEED_SCALE)
        }
    }

    pub fn power(&self, speed: f64) -> f64 {
        self.force(speed) * speed
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use crate::params::tests::reference_car;
    use crate::resistance::{AeroDragModel, RollingResistance};

    #[test]
    fn drag_is_zero_when_stationary() {
        let car = reference_car();
        assert_eq!(AeroDragModel::plain(&car).drag_force(0.0), 0.0);
        assert_eq!(AeroDragModel::amplified(&car).drag_force(0.0), 0.0);
    }

    #[test]
    fn plain_drag_at_100kmh() {
        let car = reference_car();
        let speed = 100.0 / 3.6;
        // 0.5 * 1.225 * 0.3 * 2.2 * 27.78^2
        assert_relative_eq!(AeroDragModel::plain(&car).drag_force(speed), 311.92, max_relative = 1e-3);
    }

    #[test]
    fn amplification_doubles_drag_at_reference_speed() {
        let car = reference_car();
        let plain = AeroDragModel::plain(&car);
        let amplified = AeroDragModel::amplified(&car);
        assert_relative_eq!(amplified.drag_force(35.0), 2.0 * plain.drag_force(35.0), max_relative = 1e-12);
        assert!(amplified.drag_force(20.0) > plain.drag_force(20.0));
    }

    #[test]
    fn rolling_resistance_variants() {
        let car = reference_car();
        let constant = RollingResistance::constant(&car);
        let scaled = RollingResistance::speed_scaled(&car);
        assert_relative_eq!(constant.force(50.0), 0.015 * 1400.0 * 9.81, max_relative = 1e-12);
        assert_relative_eq!(scaled.force(0.0), constant.force(0.0), max_relative = 1e-12);
        assert_relative_eq!(scaled.force(100.0), 2.0 * constant.force(100.0), max_relative = 1e-12);
    }
}
