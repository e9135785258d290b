//! Station orchestration
//!
//! Wires location, clients, sensors and the panel together and runs the
//! fetch / render / sleep cycle.

use std::fmt::Write as _;

use tracing::{info, warn};

use crate::aggregate::{Aggregator, AqiApi, StationSnapshot, WeatherApi};
use crate::config::{resolve_key, AqiProvider, StationConfig, WeatherProvider};
use crate::display::{
    draw_dashboard, LinuxPanel, MonoCanvas, PanelPins, PANEL_HEIGHT, PANEL_WIDTH,
};
use crate::error::Result;
use crate::http::build_client;
use crate::location::Location;
use crate::sensors::{Bme688Sensor, Sgp30, Veml7700};
use crate::weather::{NwsClient, OwmClient};

/// Environment variable holding a literal OpenWeatherMap key
pub const OWM_KEY_ENV: &str = "INKWX_OWM_API_KEY";
/// Environment variable holding a literal AirNow key
pub const AIRNOW_KEY_ENV: &str = "INKWX_AIRNOW_API_KEY";

/// The assembled station
pub struct Station {
    config: StationConfig,
    aggregator: Aggregator,
    canvas: MonoCanvas,
    panel: Option<LinuxPanel>,
}

impl Station {
    /// Resolve the location and build every configured part
    pub async fn new(config: StationConfig) -> Result<Self> {
        let http = build_client()?;

        let mut location = Location::detect(&http).await;
        if let Some((lat, lon)) = config.coordinates {
            location.lat = lat;
            location.lon = lon;
        }
        if let Some(zip) = &config.zip {
            location.zip = zip.clone();
        }

        let weather = match config.weather_provider {
            WeatherProvider::Nws => {
                WeatherApi::Nws(NwsClient::new(http.clone(), location.lat, location.lon).await?)
            }
            WeatherProvider::OpenWeather => {
                let key = resolve_key(OWM_KEY_ENV, &config.owm_key_file)?;
                WeatherApi::OpenWeather(OwmClient::new(
                    http.clone(),
                    location.lat,
                    location.lon,
                    key,
                ))
            }
        };

        let aqi = match config.aqi_provider {
            Some(AqiProvider::OpenWeather) => {
                let key = resolve_key(OWM_KEY_ENV, &config.owm_key_file)?;
                Some(AqiApi::OpenWeather(crate::aqi::OwmAqiClient::new(
                    http.clone(),
                    location.lat,
                    location.lon,
                    key,
                )))
            }
            Some(AqiProvider::AirNow) => {
                let key = resolve_key(AIRNOW_KEY_ENV, &config.airnow_key_file)?;
                Some(AqiApi::AirNow(crate::aqi::AirNowClient::new(
                    http.clone(),
                    location.zip.clone(),
                    key,
                )))
            }
            None => None,
        };

        let mut aggregator = Aggregator::new(http, location, weather, aqi);

        if config.use_sensors {
            match Bme688Sensor::open(&config.i2c_bus) {
                Ok(sensor) => aggregator = aggregator.with_bme(sensor),
                Err(e) => warn!("BME688 unavailable: {}", e),
            }
            match Sgp30::open(&config.i2c_bus) {
                Ok(sensor) => {
                    // the air-quality engine reports fixed values until it settles
                    let warmup = crate::config::FETCH_TIMING.sgp30_warmup_secs;
                    info!(seconds = warmup, "waiting for SGP30 to stabilize");
                    tokio::time::sleep(std::time::Duration::from_secs(warmup)).await;
                    aggregator = aggregator.with_sgp(sensor);
                }
                Err(e) => warn!("SGP30 unavailable: {}", e),
            }
            match Veml7700::open(&config.i2c_bus) {
                Ok(sensor) => aggregator = aggregator.with_light(sensor),
                Err(e) => warn!("VEML7700 unavailable: {}", e),
            }
        }

        let panel = if config.use_panel {
            Some(LinuxPanel::open(
                &config.spi_dev,
                &config.gpio_chip,
                PanelPins::default(),
            )?)
        } else {
            None
        };

        Ok(Self {
            config,
            aggregator,
            canvas: MonoCanvas::new(PANEL_WIDTH, PANEL_HEIGHT),
            panel,
        })
    }

    /// The resolved station location
    pub fn location(&self) -> &Location {
        self.aggregator.location()
    }

    /// Run one fetch / render cycle and return the snapshot
    pub async fn run_once(&mut self) -> Result<StationSnapshot> {
        let snapshot = self.aggregator.collect().await?;

        draw_dashboard(&mut self.canvas, &snapshot);

        if let Some(path) = &self.config.png_path {
            self.canvas.save_png(path)?;
            info!(path = %path.display(), "wrote dashboard PNG");
        }
        if let Some(panel) = self.panel.as_mut() {
            panel.show(&self.canvas)?;
        }

        info!(
            temperature = snapshot.weather.current.temperature,
            forecast = %snapshot.weather.current.short_forecast,
            "cycle complete"
        );
        Ok(snapshot)
    }

    /// Run cycles forever, sleeping the configured interval between them.
    ///
    /// A failed cycle is logged and the loop keeps going.
    pub async fn run(&mut self) -> Result<()> {
        loop {
            if let Err(e) = self.run_once().await {
                warn!("cycle failed: {}", e);
            }
            tokio::time::sleep(self.config.interval).await;
        }
    }
}

/// Multi-line console report of one snapshot
pub fn format_report(snapshot: &StationSnapshot) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "[Time] {}",
        snapshot.captured_at.format("%Y-%m-%d %H:%M:%S")
    );
    let _ = writeln!(
        out,
        "[Location] {}, {} {}",
        snapshot.location.city, snapshot.location.region, snapshot.location.zip
    );

    let current = &snapshot.weather.current;
    let _ = writeln!(
        out,
        "[Weather] Temperature: {}, Wind Speed: {}",
        current.temp_string(),
        current.wind_speed
    );
    let _ = writeln!(out, "[Weather] {}", current.short_forecast);
    let _ = writeln!(
        out,
        "[Sun] Sunrise {}, Sunset {}",
        snapshot.weather.sunrise, snapshot.weather.sunset
    );

    if let Some(aqi) = &snapshot.aqi {
        if let Some(current) = &aqi.current {
            let _ = writeln!(out, "[AQI] {} ({})", current.aqi, current.category);
        } else if let Some(today) = aqi.daily.first() {
            let _ = writeln!(out, "[AQI] {} ({})", today.aqi, today.category);
        }
    }

    if let Some(indoor) = &snapshot.indoor {
        let _ = writeln!(
            out,
            "[Indoor] {:.1} F, {:.0}%, {:.0} hPa, gas {} ohms",
            indoor.temperature_f(),
            indoor.humidity_pct,
            indoor.pressure_hpa,
            indoor.gas_ohms
        );
    }
    if let Some(air) = &snapshot.air {
        let _ = writeln!(out, "[Air] eCO2 {} ppm, TVOC {} ppb", air.eco2_ppm, air.tvoc_ppb);
    }
    if let Some(light) = &snapshot.light {
        let _ = writeln!(out, "[Light] {:.1} lux", light.lux);
    }

    if !snapshot.weather.hourly.is_empty() {
        let _ = writeln!(out, "\n[Hourly Weather Forecast]");
        for hour in snapshot.weather.hourly.iter().take(24) {
            let _ = writeln!(
                out,
                "{}:00 | {} {} | {} {} | {}",
                hour.hour,
                hour.temperature,
                current.temp_unit,
                hour.wind_speed,
                hour.wind_direction,
                hour.short_forecast
            );
        }
    }

    if let Some(aqi) = &snapshot.aqi {
        if !aqi.hourly.is_empty() {
            let _ = writeln!(out, "\n[Hourly AQI Forecast]");
            for hour in aqi.hourly.iter().take(24) {
                let _ = writeln!(
                    out,
                    "{} | AQI: {} ({})",
                    hour.timestamp, hour.aqi, hour.category
                );
            }
        }
    }

    let _ = writeln!(out, "\n[7-Day Weather and AQI Summary Forecast]");
    let empty = Vec::new();
    let daily_aqi = snapshot.aqi.as_ref().map(|a| &a.daily).unwrap_or(&empty);
    for (i, day) in snapshot.weather.daily.iter().take(7).enumerate() {
        let _ = write!(
            out,
            "{}: {} {}, Wind {}, {}",
            day.name, day.temperature, current.temp_unit, day.wind_speed, day.short_forecast
        );
        if let Some(aqi_day) = daily_aqi.get(i) {
            let _ = write!(out, " | AQI {} ({})", aqi_day.aqi, aqi_day.category);
        }
        let _ = writeln!(out);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{AqiSummary, WeatherSummary};
    use crate::aqi::{AqiDay, AqiHour};
    use crate::sensors::{BmeReading, Sgp30Reading};
    use crate::weather::{CurrentConditions, DailyPeriod, HourlyPeriod};
    use chrono::{Local, TimeZone};

    fn snapshot() -> StationSnapshot {
        StationSnapshot {
            captured_at: Local.with_ymd_and_hms(2025, 3, 23, 14, 0, 0).unwrap(),
            location: Location::fallback(),
            weather: WeatherSummary {
                current: CurrentConditions {
                    temperature: 53,
                    temp_unit: "F".to_string(),
                    wind_speed: "15 mph".to_string(),
                    short_forecast: "Light Rain".to_string(),
                },
                daily: vec![
                    DailyPeriod {
                        name: "Tonight".to_string(),
                        temperature: 53,
                        precip_chance: Some(79),
                        wind_speed: "15 mph".to_string(),
                        short_forecast: "Light Rain".to_string(),
                    },
                    DailyPeriod {
                        name: "Monday".to_string(),
                        temperature: 58,
                        precip_chance: None,
                        wind_speed: "5 to 10 mph".to_string(),
                        short_forecast: "Partly Sunny".to_string(),
                    },
                ],
                hourly: vec![HourlyPeriod {
                    hour: "21".to_string(),
                    temperature: 53,
                    wind_speed: "15 mph".to_string(),
                    wind_direction: "SSW".to_string(),
                    short_forecast: "Light Rain".to_string(),
                    precip_chance: Some(79),
                }],
                sunrise: "07:05 AM".to_string(),
                sunset: "07:27 PM".to_string(),
            },
            aqi: Some(AqiSummary {
                current: None,
                hourly: vec![AqiHour {
                    timestamp: "2025-03-23 14:00:00".to_string(),
                    aqi: 2,
                    category: "Fair".to_string(),
                }],
                daily: vec![AqiDay {
                    date: chrono::NaiveDate::from_ymd_opt(2025, 3, 23).unwrap(),
                    aqi: 55,
                    category: "Moderate".to_string(),
                }],
            }),
            indoor: Some(BmeReading {
                temperature_c: 21.5,
                humidity_pct: 41.0,
                pressure_hpa: 1013.2,
                gas_ohms: 120_000,
            }),
            air: Some(Sgp30Reading {
                eco2_ppm: 412,
                tvoc_ppb: 19,
            }),
            light: None,
        }
    }

    #[test]
    fn test_report_sections() {
        let report = format_report(&snapshot());

        assert!(report.contains("[Time] 2025-03-23 14:00:00"));
        assert!(report.contains("[Location] Seattle, WA 98115"));
        assert!(report.contains("[Weather] Temperature: 53 F, Wind Speed: 15 mph"));
        assert!(report.contains("[Sun] Sunrise 07:05 AM, Sunset 07:27 PM"));
        assert!(report.contains("[AQI] 55 (Moderate)"));
        assert!(report.contains("[Indoor] 70.7 F, 41%, 1013 hPa"));
        assert!(report.contains("[Air] eCO2 412 ppm, TVOC 19 ppb"));
        assert!(report.contains("21:00 | 53 F | 15 mph SSW | Light Rain"));
        assert!(report.contains("2025-03-23 14:00:00 | AQI: 2 (Fair)"));
        assert!(report.contains("Tonight: 53 F, Wind 15 mph, Light Rain | AQI 55 (Moderate)"));
        assert!(report.contains("Monday: 58 F, Wind 5 to 10 mph, Partly Sunny"));
    }

    #[test]
    fn test_report_without_optional_parts() {
        let mut snapshot = snapshot();
        snapshot.aqi = None;
        snapshot.indoor = None;
        snapshot.air = None;

        let report = format_report(&snapshot);
        assert!(!report.contains("[AQI]"));
        assert!(!report.contains("[Indoor]"));
        assert!(report.contains("[Weather]"));
    }
}
