//! Location lookup based on the caller's public IP address

use serde::Deserialize;
use tracing::{info, warn};

use crate::error::{Result, StationError};

const IDENT_ME_URL: &str = "https://ident.me";
const IP_API_URL: &str = "http://ip-api.com/json";

/// A resolved station location
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub zip: String,
    pub city: String,
    pub region: String,
    pub lat: f64,
    pub lon: f64,
}

/// Geolocation payload from ip-api.com
#[derive(Debug, Clone, Deserialize)]
pub struct IpApiResponse {
    #[serde(default)]
    status: String,
    city: Option<String>,
    region: Option<String>,
    zip: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
}

impl Location {
    /// The hardcoded default location used when geolocation fails
    pub fn fallback() -> Self {
        Self {
            zip: "98115".to_string(),
            city: "Seattle".to_string(),
            region: "WA".to_string(),
            lat: 47.697_029,
            lon: -122.322_217,
        }
    }

    /// Resolve the station location from the caller's public IP.
    ///
    /// This is the one place where errors are swallowed: any lookup failure
    /// or invalid payload falls back to the default location.
    pub async fn detect(client: &reqwest::Client) -> Self {
        match Self::lookup(client).await {
            Ok(location) => {
                info!(
                    city = %location.city,
                    region = %location.region,
                    zip = %location.zip,
                    "resolved location from public IP"
                );
                location
            }
            Err(e) => {
                warn!("location lookup failed ({}), using default location", e);
                Self::fallback()
            }
        }
    }

    async fn lookup(client: &reqwest::Client) -> Result<Self> {
        let ip = client
            .get(IDENT_ME_URL)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let body = client
            .get(format!("{}/{}", IP_API_URL, ip.trim()))
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let data: IpApiResponse = serde_json::from_str(&body)?;
        Self::validate(data)
    }

    /// Check the geolocation payload for success and all required fields
    fn validate(data: IpApiResponse) -> Result<Self> {
        if data.status != "success" {
            return Err(StationError::MissingData(format!(
                "ip-api status was '{}'",
                data.status
            )));
        }

        let field = |name: &str, value: Option<String>| {
            value.filter(|v| !v.is_empty()).ok_or_else(|| {
                StationError::MissingData(format!("ip-api field '{}' is missing", name))
            })
        };

        Ok(Self {
            zip: field("zip", data.zip)?,
            city: field("city", data.city)?,
            region: field("region", data.region)?,
            lat: data
                .lat
                .ok_or_else(|| StationError::MissingData("ip-api field 'lat' is missing".into()))?,
            lon: data
                .lon
                .ok_or_else(|| StationError::MissingData("ip-api field 'lon' is missing".into()))?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "status": "success",
        "country": "United States",
        "countryCode": "US",
        "region": "WA",
        "regionName": "Washington",
        "city": "Seattle",
        "zip": "98115",
        "lat": 47.6974,
        "lon": -122.3222,
        "timezone": "America/Los_Angeles",
        "isp": "Example ISP",
        "query": "203.0.113.7"
    }"#;

    #[test]
    fn test_validate_success_payload() {
        let data: IpApiResponse = serde_json::from_str(SAMPLE).unwrap();
        let location = Location::validate(data).unwrap();

        assert_eq!(location.city, "Seattle");
        assert_eq!(location.region, "WA");
        assert_eq!(location.zip, "98115");
        assert!((location.lat - 47.6974).abs() < 1e-9);
        assert!((location.lon - -122.3222).abs() < 1e-9);
    }

    #[test]
    fn test_validate_rejects_failed_status() {
        let data: IpApiResponse =
            serde_json::from_str(r#"{"status": "fail", "message": "private range"}"#).unwrap();
        assert!(Location::validate(data).is_err());
    }

    #[test]
    fn test_validate_rejects_missing_zip() {
        let data: IpApiResponse = serde_json::from_str(
            r#"{"status": "success", "city": "Seattle", "region": "WA", "lat": 1.0, "lon": 2.0}"#,
        )
        .unwrap();
        assert!(Location::validate(data).is_err());
    }

    #[test]
    fn test_fallback_location() {
        let location = Location::fallback();
        assert_eq!(location.zip, "98115");
        assert_eq!(location.city, "Seattle");
    }
}
