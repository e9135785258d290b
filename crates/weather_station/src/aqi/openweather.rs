//! OpenWeatherMap air_pollution forecast client

use std::collections::BTreeMap;

use chrono::{DateTime, Local, NaiveDate, TimeZone};
use serde::Deserialize;

use crate::aqi::{category_label, AqiDay, AqiHour, CurrentAqi};
use crate::error::{Result, StationError};

const FORECAST_URL: &str = "http://api.openweathermap.org/data/2.5/air_pollution/forecast";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Deserialize)]
struct PollutionResponse {
    list: Vec<PollutionEntry>,
}

#[derive(Debug, Deserialize)]
struct PollutionEntry {
    dt: i64,
    main: PollutionIndex,
    components: BTreeMap<String, f64>,
}

#[derive(Debug, Deserialize)]
struct PollutionIndex {
    aqi: u8,
}

/// One normalized forecast entry
#[derive(Debug, Clone)]
pub struct ForecastEntry {
    pub timestamp: String,
    /// Local calendar day, used for the daily max-bucket grouping
    pub date: NaiveDate,
    pub aqi: i64,
    pub category: String,
    pub components: BTreeMap<String, f64>,
}

/// Client for the OpenWeatherMap air_pollution forecast API
pub struct OwmAqiClient {
    client: reqwest::Client,
    lat: f64,
    lon: f64,
    key: String,
}

impl OwmAqiClient {
    /// Create a new air-pollution client
    pub fn new(client: reqwest::Client, lat: f64, lon: f64, key: impl Into<String>) -> Self {
        Self {
            client,
            lat,
            lon,
            key: key.into(),
        }
    }

    fn url(&self) -> String {
        format!(
            "{}?lat={}&lon={}&appid={}",
            FORECAST_URL, self.lat, self.lon, self.key
        )
    }

    /// The full forecast, one entry per hour, timestamps in local time
    pub async fn forecast(&self) -> Result<Vec<ForecastEntry>> {
        let body = self
            .client
            .get(self.url())
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        let response: PollutionResponse = serde_json::from_str(&body)?;
        response
            .list
            .iter()
            .map(|entry| to_entry(entry, &Local))
            .collect()
    }

    /// The next 24 hours of AQI forecast
    pub async fn hourly_forecast(&self) -> Result<Vec<AqiHour>> {
        let forecast = self.forecast().await?;
        Ok(forecast
            .into_iter()
            .take(24)
            .map(|entry| AqiHour {
                timestamp: entry.timestamp,
                aqi: entry.aqi,
                category: entry.category,
            })
            .collect())
    }

    /// The current AQI with pollutant concentrations
    pub async fn current_detailed(&self) -> Result<CurrentAqi> {
        let forecast = self.forecast().await?;
        let first = forecast
            .into_iter()
            .next()
            .ok_or_else(|| StationError::MissingData("pollution forecast is empty".into()))?;

        Ok(CurrentAqi {
            timestamp: first.timestamp,
            aqi: first.aqi,
            category: first.category,
            components: first.components,
        })
    }

    /// Daily AQI forecast, where the worst hour of each day wins
    pub async fn daily_forecast(&self) -> Result<Vec<AqiDay>> {
        let forecast = self.forecast().await?;
        Ok(daily_max(&forecast))
    }
}

fn to_entry<Tz: TimeZone>(raw: &PollutionEntry, tz: &Tz) -> Result<ForecastEntry>
where
    Tz::Offset: std::fmt::Display,
{
    let utc = DateTime::from_timestamp(raw.dt, 0)
        .ok_or_else(|| StationError::MissingData(format!("timestamp {} out of range", raw.dt)))?;
    let local = utc.with_timezone(tz);

    Ok(ForecastEntry {
        timestamp: local.format(TIMESTAMP_FORMAT).to_string(),
        date: local.date_naive(),
        aqi: i64::from(raw.main.aqi),
        category: category_label(raw.main.aqi).to_string(),
        components: raw.components.clone(),
    })
}

/// Collapse hourly entries into one entry per day, keeping the max AQI
pub(crate) fn daily_max(entries: &[ForecastEntry]) -> Vec<AqiDay> {
    let mut days: BTreeMap<NaiveDate, AqiDay> = BTreeMap::new();

    for entry in entries {
        let candidate = AqiDay {
            date: entry.date,
            aqi: entry.aqi,
            category: entry.category.clone(),
        };
        days.entry(entry.date)
            .and_modify(|day| {
                if entry.aqi > day.aqi {
                    *day = candidate.clone();
                }
            })
            .or_insert(candidate);
    }

    days.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    const SAMPLE: &str = r#"{
        "coord": {"lon": -122.3222, "lat": 47.697},
        "list": [
            {
                "main": {"aqi": 2},
                "components": {
                    "co": 230.31, "no": 0.05, "no2": 7.02, "o3": 68.66,
                    "so2": 0.64, "pm2_5": 4.2, "pm10": 5.9, "nh3": 0.5
                },
                "dt": 1742763600
            },
            {
                "main": {"aqi": 3},
                "components": {
                    "co": 240.33, "no": 0.06, "no2": 8.11, "o3": 70.10,
                    "so2": 0.71, "pm2_5": 9.8, "pm10": 11.2, "nh3": 0.6
                },
                "dt": 1742767200
            },
            {
                "main": {"aqi": 1},
                "components": {
                    "co": 220.30, "no": 0.04, "no2": 6.55, "o3": 66.52,
                    "so2": 0.60, "pm2_5": 3.1, "pm10": 4.4, "nh3": 0.4
                },
                "dt": 1742850000
            }
        ]
    }"#;

    fn entries() -> Vec<ForecastEntry> {
        let response: PollutionResponse = serde_json::from_str(SAMPLE).unwrap();
        let pdt = FixedOffset::west_opt(7 * 3600).unwrap();
        response
            .list
            .iter()
            .map(|e| to_entry(e, &pdt).unwrap())
            .collect()
    }

    #[test]
    fn test_entry_mapping() {
        let entries = entries();
        assert_eq!(entries.len(), 3);
        // 1742763600 is 2025-03-23 21:00 UTC, 14:00 PDT
        assert_eq!(entries[0].timestamp, "2025-03-23 14:00:00");
        assert_eq!(entries[0].aqi, 2);
        assert_eq!(entries[0].category, "Fair");
        assert!((entries[0].components["pm2_5"] - 4.2).abs() < 1e-9);
    }

    #[test]
    fn test_daily_max_bucket() {
        let daily = daily_max(&entries());
        assert_eq!(daily.len(), 2);

        // the worse hour (aqi 3) wins for the first day
        assert_eq!(daily[0].date, NaiveDate::from_ymd_opt(2025, 3, 23).unwrap());
        assert_eq!(daily[0].aqi, 3);
        assert_eq!(daily[0].category, "Moderate");

        assert_eq!(daily[1].date, NaiveDate::from_ymd_opt(2025, 3, 24).unwrap());
        assert_eq!(daily[1].aqi, 1);
        assert_eq!(daily[1].category, "Good");
    }

    #[test]
    fn test_missing_aqi_is_error() {
        let broken = r#"{"list": [{"dt": 1742763600, "components": {}, "main": {}}]}"#;
        assert!(serde_json::from_str::<PollutionResponse>(broken).is_err());
    }
}
