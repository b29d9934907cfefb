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

pub fn round_float_to(float: f64, decimal_places: u32) -> f64 {
    let precision_base: u64 = 10;
    let precision_factor = precision_base.pow(decimal_places) as f64;
    (float * precision_factor).round() / precision_factor
}

pub fn round_up_to_nearest_multiple(val: i32, multiple: i32) -> i32 {
    if val < multiple {
        return multiple;
    }
    ((val + (multiple-1)) / multiple) * multiple
}

/// Parse the longest leading numeric portion of `val` as a float.
///
/// Leading whitespace is skipped and anything after the number is ignored so
/// `"1400kg"` parses as `1400.0`. Returns `None` when no digits are found.
pub fn parse_float_prefix(val: &str) -> Option<f64> {
    let trimmed = val.trim_start();
    let bytes = trimmed.as_bytes();
    let mut end = 0;
    if end < bytes.len() && (bytes[end] == b'+' || bytes[end] == b'-') {
        end += 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut num_digits = end - int_start;
    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        num_digits += frac_end - frac_start;
        if num_digits > 0 {
            end = frac_end;
        }
    }
    if num_digits == 0 {
        return None;
    }
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && (bytes[exp_end] == b'+' || bytes[exp_end] == b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }
    trimmed[..end].parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use crate::numeric::{parse_float_prefix, round_float_to, round_up_to_nearest_multiple};

    #[test]
    fn round_multiple_tests()  {
        assert_eq!(round_up_to_nearest_multiple(0, 1), 1);
        assert_eq!(round_up_to_nearest_multiple(2, 1), 2);
        assert_eq!(round_up_to_nearest_multiple(0, 50), 50);
        assert_eq!(round_up_to_nearest_multiple(49, 50), 50);
        assert_eq!(round_up_to_nearest_multiple(50, 50), 50);
        assert_eq!(round_up_to_nearest_multiple(51, 50), 100);
        assert_eq!(round_up_to_nearest_multiple(271, 50), 300);
    }

    #[test]
    fn round_to_two_places() {
        assert_eq!(round_float_to(5.219999999, 2), 5.22);
        assert_eq!(round_float_to(270.7764, 2), 270.78);
        assert_eq!(round_float_to(-1.005, 1), -1.0);
    }

    #[test]
    fn permissive_float_parsing() {
        assert_eq!(parse_float_prefix("300"), Some(300.0));
        assert_eq!(parse_float_prefix("  0.85"), Some(0.85));
        assert_eq!(parse_float_prefix("1400kg"), Some(1400.0));
        assert_eq!(parse_float_prefix(".30"), Some(0.3));
        assert_eq!(parse_float_prefix("-2.5e3x"), Some(-2500.0));
        assert_eq!(parse_float_prefix("12e"), Some(12.0));
        assert_eq!(parse_float_prefix("7."), Some(7.0));
        assert_eq!(parse_float_prefix(""), None);
        assert_eq!(parse_float_prefix("abc"), None);
        assert_eq!(parse_float_prefix("."), None);
        assert_eq!(parse_float_prefix("-"), None);
    }
}
