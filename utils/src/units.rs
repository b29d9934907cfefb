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

/// Watts per metric horsepower (CV)
pub const WATTS_PER_CV: f64 = 735.49875;
pub const KMH_PER_MPS: f64 = 3.6;

pub fn cv_to_watts(power_cv: f64) -> f64 {
    power_cv * WATTS_PER_CV
}

pub fn watts_to_kw(power_watts: f64) -> f64 {
    power_watts / 1000.0
}

pub fn kw_to_bhp(power_kw: f64) -> f64 {
    power_kw * 1.341
}

pub fn kmh_to_mps(speed_kmh: f64) -> f64 {
    speed_kmh / KMH_PER_MPS
}

pub fn mps_to_kmh(speed_mps: f64) -> f64 {
    speed_mps * KMH_PER_MPS
}

pub fn calculate_power_kw(rpm: f64, torque: f64) -> f64 {
    (torque * rpm * 2.0 * std::f64::consts::PI) / (60.0 * 1000.0)
}

#[cfg(test)]
mod tests {
    use crate::units::{calculate_power_kw, cv_to_watts, kmh_to_mps, mps_to_kmh};

    #[test]
    fn conversions() {
        assert_eq!(cv_to_watts(1.0), 735.49875);
        assert_eq!(kmh_to_mps(36.0), 10.0);
        assert_eq!(mps_to_kmh(10.0), 36.0);
        assert!((calculate_power_kw(9549.0, 1000.0) - 1000.0).abs() < 0.1);
    }
}
