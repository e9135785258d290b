//! Sunrise and sunset times from api.sunrise-sunset.org

use chrono::{DateTime, Local, Utc};
use serde::Deserialize;

use crate::error::{Result, StationError};
use crate::weather::clock_in;

const SUN_URL: &str = "https://api.sunrise-sunset.org/json";

#[derive(Debug, Deserialize)]
struct SunResponse {
    results: SunResults,
    status: String,
}

#[derive(Debug, Deserialize)]
struct SunResults {
    sunrise: String,
    sunset: String,
}

/// Local sunrise and sunset clock strings ("06:51 AM")
#[derive(Debug, Clone)]
pub struct SunTimes {
    pub sunrise: String,
    pub sunset: String,
}

/// Fetch sunrise/sunset for the given coordinates, formatted in local time
pub async fn sun_times(client: &reqwest::Client, lat: f64, lon: f64) -> Result<SunTimes> {
    let url = format!("{}?lat={}&lng={}&formatted=0", SUN_URL, lat, lon);
    let body = client
        .get(&url)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;
    let response: SunResponse = serde_json::from_str(&body)?;

    if response.status != "OK" {
        return Err(StationError::MissingData(format!(
            "sunrise-sunset status was '{}'",
            response.status
        )));
    }

    Ok(SunTimes {
        sunrise: clock_in(parse_utc(&response.results.sunrise)?, &Local),
        sunset: clock_in(parse_utc(&response.results.sunset)?, &Local),
    })
}

fn parse_utc(timestamp: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(timestamp)?.with_timezone(&Utc))
}
