//! National Weather Service gridpoint forecast client
//!
//! A lat/lon is first resolved to a forecast grid via the points endpoint,
//! then daily and hourly forecasts are fetched per grid cell.

use chrono::DateTime;
use serde::Deserialize;
use tracing::debug;

use crate::error::{Result, StationError};
use crate::weather::{CurrentConditions, DailyPeriod, HourlyPeriod};

const POINTS_URL: &str = "https://api.weather.gov/points";
const GRIDPOINTS_URL: &str = "https://api.weather.gov/gridpoints";

#[derive(Debug, Deserialize)]
struct PointsResponse {
    properties: PointsProperties,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PointsProperties {
    grid_id: String,
    grid_x: i64,
    grid_y: i64,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    properties: ForecastProperties,
}

#[derive(Debug, Deserialize)]
struct ForecastProperties {
    periods: Vec<Period>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Period {
    name: String,
    start_time: String,
    temperature: i64,
    temperature_unit: String,
    probability_of_precipitation: PrecipProbability,
    wind_speed: String,
    wind_direction: String,
    short_forecast: String,
}

#[derive(Debug, Deserialize)]
struct PrecipProbability {
    value: Option<u8>,
}

/// Client for api.weather.gov gridpoint forecasts
pub struct NwsClient {
    client: reqwest::Client,
    grid_id: String,
    grid_x: i64,
    grid_y: i64,
}

impl NwsClient {
    /// Create a client for the given coordinates, resolving the forecast grid
    pub async fn new(client: reqwest::Client, lat: f64, lon: f64) -> Result<Self> {
        let url = format!("{}/{},{}", POINTS_URL, lat, lon);
        let body = client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        let points: PointsResponse = serde_json::from_str(&body)?;
        let properties = points.properties;

        debug!(
            grid_id = %properties.grid_id,
            grid_x = properties.grid_x,
            grid_y = properties.grid_y,
            "resolved forecast grid"
        );

        Ok(Self {
            client,
            grid_id: properties.grid_id,
            grid_x: properties.grid_x,
            grid_y: properties.grid_y,
        })
    }

    fn daily_forecast_url(&self) -> String {
        format!(
            "{}/{}/{},{}/forecast",
            GRIDPOINTS_URL, self.grid_id, self.grid_x, self.grid_y
        )
    }

    fn hourly_forecast_url(&self) -> String {
        format!("{}/hourly", self.daily_forecast_url())
    }

    async fn fetch_periods(&self, url: &str) -> Result<Vec<Period>> {
        let body = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        let forecast: ForecastResponse = serde_json::from_str(&body)?;
        Ok(forecast.properties.periods)
    }

    /// Daily forecast periods for the coming week
    pub async fn daily_forecast(&self) -> Result<Vec<DailyPeriod>> {
        let periods = self.fetch_periods(&self.daily_forecast_url()).await?;
        Ok(periods.iter().map(to_daily).collect())
    }

    /// Hourly forecast periods
    pub async fn hourly_forecast(&self) -> Result<Vec<HourlyPeriod>> {
        let periods = self.fetch_periods(&self.hourly_forecast_url()).await?;
        periods.iter().map(to_hourly).collect()
    }

    /// Current conditions, taken from the first daily period
    pub async fn current_conditions(&self) -> Result<CurrentConditions> {
        let periods = self.fetch_periods(&self.daily_forecast_url()).await?;
        let first = periods
            .first()
            .ok_or_else(|| StationError::MissingData("forecast has no periods".into()))?;

        Ok(CurrentConditions {
            temperature: first.temperature,
            temp_unit: first.temperature_unit.clone(),
            wind_speed: first.wind_speed.clone(),
            short_forecast: first.short_forecast.clone(),
        })
    }
}

fn to_daily(period: &Period) -> DailyPeriod {
    DailyPeriod {
        name: period.name.clone(),
        temperature: period.temperature,
        precip_chance: period.probability_of_precipitation.value,
        wind_speed: period.wind_speed.clone(),
        short_forecast: period.short_forecast.clone(),
    }
}

fn to_hourly(period: &Period) -> Result<HourlyPeriod> {
    let start = DateTime::parse_from_rfc3339(&period.start_time)?;
    Ok(HourlyPeriod {
        hour: start.format("%H").to_string(),
        temperature: period.temperature,
        wind_speed: period.wind_speed.clone(),
        wind_direction: period.wind_direction.clone(),
        short_forecast: period.short_forecast.clone(),
        precip_chance: period.probability_of_precipitation.value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const POINTS_SAMPLE: &str = r#"{
        "properties": {
            "@id": "https://api.weather.gov/points/47.697,-122.3222",
            "cwa": "SEW",
            "gridId": "SEW",
            "gridX": 126,
            "gridY": 72,
            "forecast": "https://api.weather.gov/gridpoints/SEW/126,72/forecast"
        }
    }"#;

    const FORECAST_SAMPLE: &str = r#"{
        "properties": {
            "periods": [
                {
                    "number": 1,
                    "name": "Tonight",
                    "startTime": "2025-03-24T00:00:00-07:00",
                    "endTime": "2025-03-24T01:00:00-07:00",
                    "isDaytime": false,
                    "temperature": 53,
                    "temperatureUnit": "F",
                    "probabilityOfPrecipitation": {
                        "unitCode": "wmoUnit:percent",
                        "value": 79
                    },
                    "windSpeed": "15 mph",
                    "windDirection": "SSW",
                    "shortForecast": "Light Rain"
                },
                {
                    "number": 2,
                    "name": "Monday",
                    "startTime": "2025-03-24T06:00:00-07:00",
                    "endTime": "2025-03-24T18:00:00-07:00",
                    "isDaytime": true,
                    "temperature": 58,
                    "temperatureUnit": "F",
                    "probabilityOfPrecipitation": {
                        "unitCode": "wmoUnit:percent",
                        "value": null
                    },
                    "windSpeed": "5 to 10 mph",
                    "windDirection": "SW",
                    "shortForecast": "Partly Sunny"
                }
            ]
        }
    }"#;

    #[test]
    fn test_points_mapping() {
        let points: PointsResponse = serde_json::from_str(POINTS_SAMPLE).unwrap();
        assert_eq!(points.properties.grid_id, "SEW");
        assert_eq!(points.properties.grid_x, 126);
        assert_eq!(points.properties.grid_y, 72);
    }

    #[test]
    fn test_daily_mapping() {
        let forecast: ForecastResponse = serde_json::from_str(FORECAST_SAMPLE).unwrap();
        let daily: Vec<DailyPeriod> = forecast.properties.periods.iter().map(to_daily).collect();

        assert_eq!(daily.len(), 2);
        assert_eq!(daily[0].name, "Tonight");
        assert_eq!(daily[0].temperature, 53);
        assert_eq!(daily[0].precip_chance, Some(79));
        assert_eq!(daily[0].wind_speed, "15 mph");
        assert_eq!(daily[0].short_forecast, "Light Rain");
        assert_eq!(daily[1].precip_chance, None);
    }

    #[test]
    fn test_hourly_mapping() {
        let forecast: ForecastResponse = serde_json::from_str(FORECAST_SAMPLE).unwrap();
        let hourly: Vec<HourlyPeriod> = forecast
            .properties
            .periods
            .iter()
            .map(|p| to_hourly(p).unwrap())
            .collect();

        assert_eq!(hourly[0].hour, "00");
        assert_eq!(hourly[0].wind_direction, "SSW");
        assert_eq!(hourly[1].hour, "06");
        assert_eq!(hourly[1].temperature, 58);
    }

    #[test]
    fn test_missing_field_is_error() {
        // no temperature on the period
        let broken = r#"{"properties": {"periods": [{"name": "Tonight"}]}}"#;
        assert!(serde_json::from_str::<ForecastResponse>(broken).is_err());
    }
}
