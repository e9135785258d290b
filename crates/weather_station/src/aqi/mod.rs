//! Air-quality forecast clients
//!
//! - `openweather`: OpenWeatherMap air_pollution forecast (hourly, keyed by
//!   lat/lon, index buckets 1..=5)
//! - `airnow`: AirNow daily forecast (keyed by ZIP code, EPA AQI values)

pub mod airnow;
pub mod openweather;

pub use airnow::AirNowClient;
pub use openweather::OwmAqiClient;

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;

/// Label for an OpenWeatherMap air-quality index (1..=5)
pub fn category_label(index: u8) -> &'static str {
    match index {
        1 => "Good",
        2 => "Fair",
        3 => "Moderate",
        4 => "Poor",
        5 => "Very Poor",
        _ => "Unknown",
    }
}

/// One day of AQI forecast
#[derive(Debug, Clone, PartialEq)]
pub struct AqiDay {
    pub date: NaiveDate,
    pub aqi: i64,
    pub category: String,
}

impl fmt::Display for AqiDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\nAQI: {} ({})",
            self.date.format("%A %m/%d"),
            self.aqi,
            self.category
        )
    }
}

/// One hour of AQI forecast
#[derive(Debug, Clone)]
pub struct AqiHour {
    /// "2025-03-23 14:00:00" style local timestamp
    pub timestamp: String,
    pub aqi: i64,
    pub category: String,
}

/// Current AQI with pollutant concentrations
#[derive(Debug, Clone)]
pub struct CurrentAqi {
    pub timestamp: String,
    pub aqi: i64,
    pub category: String,
    /// Pollutant concentrations in μg/m³, keyed by pollutant name
    pub components: BTreeMap<String, f64>,
}

impl CurrentAqi {
    /// Pollutant concentrations with units attached, for display
    pub fn components_display(&self) -> BTreeMap<String, String> {
        self.components
            .iter()
            .map(|(name, value)| (name.clone(), format!("{} μg/m³", value)))
            .collect()
    }
}
