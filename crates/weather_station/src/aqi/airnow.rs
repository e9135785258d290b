//! AirNow daily AQI forecast client
//!
//! AirNow publishes one forecast row per pollutant per day; the rows collapse
//! to the worst AQI of each day. The upstream forecast only changes daily, so
//! the response is cached and refetched at most once per calendar day.

use std::collections::BTreeMap;

use chrono::{Local, NaiveDate};
use serde::Deserialize;
use tracing::debug;

use crate::aqi::AqiDay;
use crate::error::Result;

const FORECAST_URL: &str = "https://www.airnowapi.org/aq/forecast/zipCode/";
const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AirNowPeriod {
    date_forecast: String,
    #[serde(rename = "AQI")]
    aqi: i64,
    category: AirNowCategory,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AirNowCategory {
    name: String,
}

/// Client for the AirNow ZIP-code forecast API
pub struct AirNowClient {
    client: reqwest::Client,
    zip: String,
    key: String,
    fetched_on: Option<NaiveDate>,
    cache: Vec<AqiDay>,
}

impl AirNowClient {
    /// Create a new AirNow client for a ZIP code
    pub fn new(client: reqwest::Client, zip: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            client,
            zip: zip.into(),
            key: key.into(),
            fetched_on: None,
            cache: Vec::new(),
        }
    }

    fn url(&self) -> String {
        format!(
            "{}?format=json&zipCode={}&API_KEY={}",
            FORECAST_URL, self.zip, self.key
        )
    }

    /// Daily AQI forecast, cached for the rest of the calendar day
    pub async fn forecasts(&mut self) -> Result<Vec<AqiDay>> {
        let today = Local::now().date_naive();
        if self.fetched_on.map_or(true, |fetched| today > fetched) {
            debug!(zip = %self.zip, "grabbing new AirNow forecast data");
            let body = self
                .client
                .get(self.url())
                .send()
                .await?
                .error_for_status()?
                .text()
                .await?;
            let periods: Vec<AirNowPeriod> = serde_json::from_str(&body)?;

            self.cache = collapse_periods(&periods)?;
            self.fetched_on = Some(today);
        }
        Ok(self.cache.clone())
    }
}

/// One row per day, worst pollutant wins, sorted by date
fn collapse_periods(periods: &[AirNowPeriod]) -> Result<Vec<AqiDay>> {
    let mut days: BTreeMap<NaiveDate, AqiDay> = BTreeMap::new();

    for period in periods {
        let date = NaiveDate::parse_from_str(period.date_forecast.trim(), DATE_FORMAT)?;
        let candidate = AqiDay {
            date,
            aqi: period.aqi,
            category: period.category.name.clone(),
        };
        days.entry(date)
            .and_modify(|day| {
                if period.aqi > day.aqi {
                    *day = candidate.clone();
                }
            })
            .or_insert(candidate);
    }

    Ok(days.into_values().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    // AirNow pads DateForecast with a trailing space
    const SAMPLE: &str = r#"[
        {
            "DateIssue": "2025-03-23 ",
            "DateForecast": "2025-03-23 ",
            "ReportingArea": "Seattle-Bellevue-Kent Valley",
            "StateCode": "WA",
            "ParameterName": "O3",
            "AQI": 35,
            "Category": {"Number": 1, "Name": "Good"}
        },
        {
            "DateIssue": "2025-03-23 ",
            "DateForecast": "2025-03-23 ",
            "ReportingArea": "Seattle-Bellevue-Kent Valley",
            "StateCode": "WA",
            "ParameterName": "PM2.5",
            "AQI": 55,
            "Category": {"Number": 2, "Name": "Moderate"}
        },
        {
            "DateIssue": "2025-03-23 ",
            "DateForecast": "2025-03-24 ",
            "ReportingArea": "Seattle-Bellevue-Kent Valley",
            "StateCode": "WA",
            "ParameterName": "PM2.5",
            "AQI": 28,
            "Category": {"Number": 1, "Name": "Good"}
        }
    ]"#;

    #[test]
    fn test_collapse_periods() {
        let periods: Vec<AirNowPeriod> = serde_json::from_str(SAMPLE).unwrap();
        let days = collapse_periods(&periods).unwrap();

        assert_eq!(days.len(), 2);

        // PM2.5 at 55 beats O3 at 35 for the first day
        assert_eq!(days[0].date, NaiveDate::from_ymd_opt(2025, 3, 23).unwrap());
        assert_eq!(days[0].aqi, 55);
        assert_eq!(days[0].category, "Moderate");

        assert_eq!(days[1].date, NaiveDate::from_ymd_opt(2025, 3, 24).unwrap());
        assert_eq!(days[1].aqi, 28);
    }

    #[test]
    fn test_bad_date_is_error() {
        let periods = vec![AirNowPeriod {
            date_forecast: "03/23/2025".to_string(),
            aqi: 10,
            category: AirNowCategory {
                name: "Good".to_string(),
            },
        }];
        assert!(collapse_periods(&periods).is_err());
    }
}
