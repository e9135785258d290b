//! Unit conversions and wind-speed string handling

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref NUMBER: Regex = Regex::new(r"\d+").unwrap();
}

/// Convert degrees Celsius to degrees Fahrenheit
pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    celsius * 9.0 / 5.0 + 32.0
}

/// Convert meters per second to miles per hour
pub fn mps_to_mph(mps: f64) -> f64 {
    mps * 2.236_936
}

/// Reduce a wind-speed phrase such as "10 to 15 mph" to its upper bound,
/// "15 mph". Phrases without a number pass through unchanged.
pub fn compact_wind(wind: &str) -> String {
    NUMBER
        .find_iter(wind)
        .last()
        .map(|m| format!("{} mph", m.as_str()))
        .unwrap_or_else(|| wind.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_celsius_to_fahrenheit() {
        assert_eq!(celsius_to_fahrenheit(0.0), 32.0);
        assert_eq!(celsius_to_fahrenheit(100.0), 212.0);
        assert!((celsius_to_fahrenheit(20.0) - 68.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_mps_to_mph() {
        assert!((mps_to_mph(1.0) - 2.236936).abs() < 1e-6);
        assert!((mps_to_mph(10.0) - 22.36936).abs() < 1e-5);
    }

    #[test]
    fn test_compact_wind_range() {
        assert_eq!(compact_wind("10 to 15 mph"), "15 mph");
        assert_eq!(compact_wind("15 mph"), "15 mph");
    }

    #[test]
    fn test_compact_wind_no_number() {
        assert_eq!(compact_wind("Calm"), "Calm");
    }
}
