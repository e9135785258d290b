//! Weather forecast clients
//!
//! Two interchangeable providers:
//! - `nws`: National Weather Service gridpoint forecasts (no API key)
//! - `owm`: OpenWeatherMap One Call (keyed)
//!
//! plus `sun` for sunrise/sunset times. All providers normalize into the
//! period types defined here.

pub mod nws;
pub mod owm;
pub mod sun;

pub use nws::NwsClient;
pub use owm::{OwmClient, OwmCurrent, OwmDaily};
pub use sun::{sun_times, SunTimes};

use chrono::{DateTime, TimeZone};

use crate::error::Result;

/// Current conditions, taken from the first forecast period
#[derive(Debug, Clone)]
pub struct CurrentConditions {
    pub temperature: i64,
    pub temp_unit: String,
    pub wind_speed: String,
    pub short_forecast: String,
}

impl CurrentConditions {
    /// "53 F" style temperature string
    pub fn temp_string(&self) -> String {
        format!("{} {}", self.temperature, self.temp_unit)
    }
}

/// One named period of the daily forecast ("Tonight", "Tuesday", ...)
#[derive(Debug, Clone)]
pub struct DailyPeriod {
    pub name: String,
    pub temperature: i64,
    pub precip_chance: Option<u8>,
    pub wind_speed: String,
    pub short_forecast: String,
}

/// One hour of the hourly forecast
#[derive(Debug, Clone)]
pub struct HourlyPeriod {
    /// Local hour of day, zero padded ("00".."23")
    pub hour: String,
    pub temperature: i64,
    pub wind_speed: String,
    pub wind_direction: String,
    pub short_forecast: String,
    pub precip_chance: Option<u8>,
}

/// Weekday name of an RFC3339 timestamp, in the timestamp's own offset
pub fn day_name(rfc3339: &str) -> Result<String> {
    let time = DateTime::parse_from_rfc3339(rfc3339)?;
    Ok(time.format("%A").to_string())
}

/// "09:00 PM" style clock string of an RFC3339 timestamp
pub fn clock_time(rfc3339: &str) -> Result<String> {
    let time = DateTime::parse_from_rfc3339(rfc3339)?;
    Ok(time.format("%I:%M %p").to_string())
}

/// "Sunday 09:00 PM - 10:00 PM" style range string
pub fn duration_string(start: &str, end: &str) -> Result<String> {
    Ok(format!(
        "{} {} - {}",
        day_name(start)?,
        clock_time(start)?,
        clock_time(end)?
    ))
}

/// Format a UTC timestamp as a clock string in the given zone
pub(crate) fn clock_in<Tz: TimeZone>(utc: DateTime<chrono::Utc>, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    utc.with_timezone(tz).format("%I:%M %p").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    #[test]
    fn test_day_name() {
        // 2025-03-23 was a Sunday
        assert_eq!(day_name("2025-03-23T21:00:00-07:00").unwrap(), "Sunday");
    }

    #[test]
    fn test_clock_time() {
        assert_eq!(clock_time("2025-03-23T21:00:00-07:00").unwrap(), "09:00 PM");
        assert_eq!(clock_time("2025-03-24T00:00:00-07:00").unwrap(), "12:00 AM");
    }

    #[test]
    fn test_duration_string() {
        assert_eq!(
            duration_string("2025-03-23T21:00:00-07:00", "2025-03-23T22:00:00-07:00").unwrap(),
            "Sunday 09:00 PM - 10:00 PM"
        );
    }

    #[test]
    fn test_clock_in_offset() {
        let utc = Utc.with_ymd_and_hms(2025, 3, 23, 13, 30, 0).unwrap();
        let pdt = FixedOffset::west_opt(7 * 3600).unwrap();
        assert_eq!(clock_in(utc, &pdt), "06:30 AM");
    }

    #[test]
    fn test_invalid_timestamp_is_error() {
        assert!(day_name("not-a-timestamp").is_err());
    }

    #[test]
    fn test_temp_string() {
        let current = CurrentConditions {
            temperature: 53,
            temp_unit: "F".to_string(),
            wind_speed: "15 mph".to_string(),
            short_forecast: "Light Rain".to_string(),
        };
        assert_eq!(current.temp_string(), "53 F");
    }
}
