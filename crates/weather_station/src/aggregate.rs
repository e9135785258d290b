//! One-cycle data aggregation
//!
//! Calls each configured client and sensor once and merges the results into
//! a `StationSnapshot` for rendering. Remote fetch failures fail the cycle;
//! a sensor that fails to read only blanks its own corner of the dashboard.

use chrono::{DateTime, Local};
use linux_embedded_hal::{Delay, I2cdev};
use tracing::warn;

use crate::aqi::{openweather, AirNowClient, AqiDay, AqiHour, CurrentAqi, OwmAqiClient};
use crate::error::Result;
use crate::location::Location;
use crate::sensors::{Bme688Sensor, BmeReading, LuxReading, Sgp30, Sgp30Reading, Veml7700};
use crate::units::{compact_wind, mps_to_mph};
use crate::weather::{
    sun_times, CurrentConditions, DailyPeriod, HourlyPeriod, NwsClient, OwmClient,
};

/// Weather data for one cycle
#[derive(Debug, Clone)]
pub struct WeatherSummary {
    pub current: CurrentConditions,
    pub daily: Vec<DailyPeriod>,
    pub hourly: Vec<HourlyPeriod>,
    pub sunrise: String,
    pub sunset: String,
}

/// Air-quality data for one cycle
#[derive(Debug, Clone)]
pub struct AqiSummary {
    pub current: Option<CurrentAqi>,
    pub hourly: Vec<AqiHour>,
    pub daily: Vec<AqiDay>,
}

/// Everything the renderer needs for one frame
#[derive(Debug, Clone)]
pub struct StationSnapshot {
    pub captured_at: DateTime<Local>,
    pub location: Location,
    pub weather: WeatherSummary,
    pub aqi: Option<AqiSummary>,
    pub indoor: Option<BmeReading>,
    pub air: Option<Sgp30Reading>,
    pub light: Option<LuxReading>,
}

/// The configured weather backend
pub enum WeatherApi {
    Nws(NwsClient),
    OpenWeather(OwmClient),
}

/// The configured air-quality backend
pub enum AqiApi {
    OpenWeather(OwmAqiClient),
    AirNow(AirNowClient),
}

/// Collects one snapshot per cycle from the configured sources
pub struct Aggregator {
    http: reqwest::Client,
    location: Location,
    weather: WeatherApi,
    aqi: Option<AqiApi>,
    bme: Option<Bme688Sensor>,
    sgp: Option<Sgp30<I2cdev, Delay>>,
    light: Option<Veml7700<I2cdev>>,
}

impl Aggregator {
    /// Create an aggregator over the remote clients
    pub fn new(
        http: reqwest::Client,
        location: Location,
        weather: WeatherApi,
        aqi: Option<AqiApi>,
    ) -> Self {
        Self {
            http,
            location,
            weather,
            aqi,
            bme: None,
            sgp: None,
            light: None,
        }
    }

    /// Attach an opened BME688
    pub fn with_bme(mut self, sensor: Bme688Sensor) -> Self {
        self.bme = Some(sensor);
        self
    }

    /// Attach an opened SGP30
    pub fn with_sgp(mut self, sensor: Sgp30<I2cdev, Delay>) -> Self {
        self.sgp = Some(sensor);
        self
    }

    /// Attach an opened VEML7700
    pub fn with_light(mut self, sensor: Veml7700<I2cdev>) -> Self {
        self.light = Some(sensor);
        self
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    /// Fetch everything once and merge it into a snapshot
    pub async fn collect(&mut self) -> Result<StationSnapshot> {
        let weather = self.weather_summary().await?;

        let aqi = match &mut self.aqi {
            Some(AqiApi::OpenWeather(client)) => {
                let entries = client.forecast().await?;
                let current = entries.first().map(|entry| CurrentAqi {
                    timestamp: entry.timestamp.clone(),
                    aqi: entry.aqi,
                    category: entry.category.clone(),
                    components: entry.components.clone(),
                });
                let hourly = entries
                    .iter()
                    .take(24)
                    .map(|entry| AqiHour {
                        timestamp: entry.timestamp.clone(),
                        aqi: entry.aqi,
                        category: entry.category.clone(),
                    })
                    .collect();
                let daily = openweather::daily_max(&entries);
                Some(AqiSummary {
                    current,
                    hourly,
                    daily,
                })
            }
            Some(AqiApi::AirNow(client)) => {
                let daily = client.forecasts().await?;
                Some(AqiSummary {
                    current: None,
                    hourly: Vec::new(),
                    daily,
                })
            }
            None => None,
        };

        let indoor = self.bme.as_mut().and_then(|sensor| match sensor.read() {
            Ok(reading) => Some(reading),
            Err(e) => {
                warn!("BME688 read failed: {}", e);
                None
            }
        });
        let air = self.sgp.as_mut().and_then(|sensor| match sensor.measure() {
            Ok(reading) => Some(reading),
            Err(e) => {
                warn!("SGP30 read failed: {}", e);
                None
            }
        });
        let light = self.light.as_mut().and_then(|sensor| match sensor.read() {
            Ok(reading) => Some(reading),
            Err(e) => {
                warn!("VEML7700 read failed: {}", e);
                None
            }
        });

        Ok(StationSnapshot {
            captured_at: Local::now(),
            location: self.location.clone(),
            weather,
            aqi,
            indoor,
            air,
            light,
        })
    }

    async fn weather_summary(&self) -> Result<WeatherSummary> {
        let sun = sun_times(&self.http, self.location.lat, self.location.lon);

        match &self.weather {
            WeatherApi::Nws(client) => {
                let (daily, hourly, current, sun) = tokio::join!(
                    client.daily_forecast(),
                    client.hourly_forecast(),
                    client.current_conditions(),
                    sun,
                );
                let sun = sun?;
                Ok(WeatherSummary {
                    current: current?,
                    daily: daily?,
                    hourly: hourly?,
                    sunrise: sun.sunrise,
                    sunset: sun.sunset,
                })
            }
            WeatherApi::OpenWeather(client) => {
                let (current, daily, sun) =
                    tokio::join!(client.current(), client.daily_forecast(7), sun);
                let current = current?;
                let sun = sun?;
                Ok(WeatherSummary {
                    current: CurrentConditions {
                        temperature: current.temp_f.round() as i64,
                        temp_unit: "F".to_string(),
                        wind_speed: compact_wind(&format!(
                            "{:.0} mph",
                            mps_to_mph(current.wind_speed_mps)
                        )),
                        short_forecast: current.description,
                    },
                    daily: daily?.into_iter().map(owm_daily_period).collect(),
                    hourly: Vec::new(),
                    sunrise: sun.sunrise,
                    sunset: sun.sunset,
                })
            }
        }
    }
}

fn owm_daily_period(day: crate::weather::OwmDaily) -> DailyPeriod {
    DailyPeriod {
        name: day.date,
        temperature: day.high_f.round() as i64,
        precip_chance: None,
        wind_speed: format!("{:.0} mph", mps_to_mph(day.wind_speed_mps)),
        short_forecast: day.description,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weather::OwmDaily;

    #[test]
    fn test_owm_daily_period_mapping() {
        let day = OwmDaily {
            date: "2025-03-24".to_string(),
            high_c: 12.8,
            high_f: 55.04,
            low_c: 6.2,
            low_f: 43.16,
            humidity: 78,
            pressure_hpa: 1015,
            wind_speed_mps: 4.1,
            description: "Moderate rain".to_string(),
            icon: "10d".to_string(),
        };

        let period = owm_daily_period(day);
        assert_eq!(period.name, "2025-03-24");
        assert_eq!(period.temperature, 55);
        assert_eq!(period.wind_speed, "9 mph");
        assert_eq!(period.short_forecast, "Moderate rain");
    }
}
