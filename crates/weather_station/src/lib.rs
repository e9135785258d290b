//! weather_station: home weather and air-quality station library
//!
//! This library provides the pieces of an e-ink weather dashboard:
//! - Location lookup from the public IP, with a hardcoded fallback
//! - Forecast clients for the National Weather Service and OpenWeatherMap
//! - Air-quality clients for OpenWeatherMap and AirNow
//! - I2C drivers for the BME688, SGP30 and VEML7700 sensors
//! - A fixed-layout renderer and SPI driver for the Inky wHAT panel
//! - The aggregation loop tying one cycle together
//!
//! # Example
//!
//! ```no_run
//! use weather_station::{format_report, Station, StationConfig};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = StationConfig::new()
//!         .with_sensors(false)
//!         .with_panel(false);
//!
//!     let mut station = Station::new(config).await?;
//!     let snapshot = station.run_once().await?;
//!     println!("{}", format_report(&snapshot));
//!     Ok(())
//! }
//! ```

// Core modules
pub mod error;

// Configuration module
pub mod config;

// Remote data clients
pub mod aqi;
pub mod location;
pub mod weather;

// Local sensors
pub mod sensors;

// Rendering
pub mod display;

// Core functionality
pub mod aggregate;
pub mod http;
pub mod station;
pub mod units;

// Re-export commonly used types and functions
pub use error::{Result, StationError};

// Config re-exports
pub use config::{
    load_key, resolve_key, AqiProvider, FetchTiming, StationConfig, WeatherProvider,
    DEFAULT_AIRNOW_KEY_FILE, DEFAULT_OWM_KEY_FILE, FETCH_TIMING,
};

// Location re-exports
pub use location::Location;

// Weather re-exports
pub use weather::{sun_times, CurrentConditions, DailyPeriod, HourlyPeriod, NwsClient, OwmClient};

// AQI re-exports
pub use aqi::{category_label, AirNowClient, AqiDay, AqiHour, CurrentAqi, OwmAqiClient};

// Sensor re-exports
pub use sensors::{Bme688Sensor, BmeReading, LuxReading, Sgp30, Sgp30Reading, Veml7700};

// Display re-exports
pub use display::{draw_centered_message, draw_dashboard, InkyPanel, LinuxPanel, MonoCanvas};

// Aggregation and orchestration re-exports
pub use aggregate::{Aggregator, AqiApi, AqiSummary, StationSnapshot, WeatherApi, WeatherSummary};
pub use station::{format_report, Station, AIRNOW_KEY_ENV, OWM_KEY_ENV};
