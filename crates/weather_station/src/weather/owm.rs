//! OpenWeatherMap One Call forecast client
//!
//! Queried with metric units; normalized structs carry both Celsius and the
//! converted Fahrenheit so the dashboard can stay in one unit.

use chrono::{DateTime, Local};
use serde::Deserialize;

use crate::error::{Result, StationError};
use crate::units::celsius_to_fahrenheit;

const ONECALL_URL: &str = "https://api.openweathermap.org/data/3.0/onecall";

#[derive(Debug, Deserialize)]
struct OneCallResponse {
    current: RawCurrent,
    daily: Vec<RawDaily>,
}

#[derive(Debug, Deserialize)]
struct RawCurrent {
    dt: i64,
    temp: f64,
    humidity: u8,
    pressure: u32,
    wind_speed: f64,
    weather: Vec<RawCondition>,
}

#[derive(Debug, Deserialize)]
struct RawDaily {
    dt: i64,
    temp: RawDailyTemp,
    humidity: u8,
    pressure: u32,
    wind_speed: f64,
    weather: Vec<RawCondition>,
}

#[derive(Debug, Deserialize)]
struct RawDailyTemp {
    min: f64,
    max: f64,
}

#[derive(Debug, Deserialize)]
struct RawCondition {
    description: String,
    icon: String,
}

/// Normalized current weather
#[derive(Debug, Clone)]
pub struct OwmCurrent {
    pub timestamp: DateTime<Local>,
    pub temp_c: f64,
    pub temp_f: f64,
    pub humidity: u8,
    pub pressure_hpa: u32,
    pub wind_speed_mps: f64,
    pub description: String,
    pub icon: String,
}

/// Normalized one-day forecast
#[derive(Debug, Clone)]
pub struct OwmDaily {
    /// "2025-03-24" style local date
    pub date: String,
    pub high_c: f64,
    pub high_f: f64,
    pub low_c: f64,
    pub low_f: f64,
    pub humidity: u8,
    pub pressure_hpa: u32,
    pub wind_speed_mps: f64,
    pub description: String,
    pub icon: String,
}

/// Client for the OpenWeatherMap One Call API
pub struct OwmClient {
    client: reqwest::Client,
    lat: f64,
    lon: f64,
    key: String,
}

impl OwmClient {
    /// Create a new One Call client
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
            "{}?lat={}&lon={}&exclude=minutely,hourly,alerts&units=metric&appid={}",
            ONECALL_URL, self.lat, self.lon, self.key
        )
    }

    async fn fetch(&self) -> Result<OneCallResponse> {
        let body = self
            .client
            .get(self.url())
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Current weather conditions
    pub async fn current(&self) -> Result<OwmCurrent> {
        let data = self.fetch().await?;
        to_current(&data.current)
    }

    /// Daily forecast, at most `days` entries
    pub async fn daily_forecast(&self, days: usize) -> Result<Vec<OwmDaily>> {
        let data = self.fetch().await?;
        data.daily.iter().take(days).map(to_daily).collect()
    }
}

fn local_time(unix: i64) -> Result<DateTime<Local>> {
    DateTime::from_timestamp(unix, 0)
        .map(|utc| utc.with_timezone(&Local))
        .ok_or_else(|| StationError::MissingData(format!("timestamp {} out of range", unix)))
}

fn description_of(conditions: &[RawCondition]) -> Result<&RawCondition> {
    conditions
        .first()
        .ok_or_else(|| StationError::MissingData("weather condition list is empty".into()))
}

/// Capitalize only the first character, the way the dashboard expects
fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

fn to_current(raw: &RawCurrent) -> Result<OwmCurrent> {
    let condition = description_of(&raw.weather)?;
    Ok(OwmCurrent {
        timestamp: local_time(raw.dt)?,
        temp_c: raw.temp,
        temp_f: celsius_to_fahrenheit(raw.temp),
        humidity: raw.humidity,
        pressure_hpa: raw.pressure,
        wind_speed_mps: raw.wind_speed,
        description: capitalize(&condition.description),
        icon: condition.icon.clone(),
    })
}

fn to_daily(raw: &RawDaily) -> Result<OwmDaily> {
    let condition = description_of(&raw.weather)?;
    Ok(OwmDaily {
        date: local_time(raw.dt)?.format("%Y-%m-%d").to_string(),
        high_c: raw.temp.max,
        high_f: celsius_to_fahrenheit(raw.temp.max),
        low_c: raw.temp.min,
        low_f: celsius_to_fahrenheit(raw.temp.min),
        humidity: raw.humidity,
        pressure_hpa: raw.pressure,
        wind_speed_mps: raw.wind_speed,
        description: capitalize(&condition.description),
        icon: condition.icon.clone(),
    })
}
