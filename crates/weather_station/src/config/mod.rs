//! Configuration module for the station
//!
//! This module contains:
//! - `StationConfig`: provider selection, hardware paths and render toggles
//! - `keys`: plaintext API key loading
//! - `timing`: environment-backed fetch timing defaults

mod keys;
mod timing;

pub use keys::{load_key, resolve_key, DEFAULT_AIRNOW_KEY_FILE, DEFAULT_OWM_KEY_FILE};
pub use timing::{FetchTiming, FETCH_TIMING};

use std::path::PathBuf;
use std::time::Duration;

/// Which forecast API supplies the weather data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WeatherProvider {
    /// National Weather Service (api.weather.gov), no key required
    #[default]
    Nws,
    /// OpenWeatherMap One Call
    OpenWeather,
}

/// Which API supplies the air-quality data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AqiProvider {
    /// OpenWeatherMap air_pollution forecast, keyed by lat/lon
    #[default]
    OpenWeather,
    /// AirNow forecast, keyed by ZIP code
    AirNow,
}

/// Configuration for the station
#[derive(Debug, Clone)]
pub struct StationConfig {
    pub weather_provider: WeatherProvider,
    /// `None` disables air-quality fetching entirely
    pub aqi_provider: Option<AqiProvider>,
    /// Fixed coordinates instead of IP geolocation
    pub coordinates: Option<(f64, f64)>,
    /// Fixed ZIP code instead of the geolocated one (AirNow lookups)
    pub zip: Option<String>,
    pub owm_key_file: PathBuf,
    pub airnow_key_file: PathBuf,
    pub i2c_bus: String,
    pub spi_dev: String,
    pub gpio_chip: String,
    /// Seconds between refresh cycles
    pub interval: Duration,
    /// Read the local I2C sensors each cycle
    pub use_sensors: bool,
    /// Push each frame to the e-ink panel
    pub use_panel: bool,
    /// Also write each rendered frame to this PNG path
    pub png_path: Option<PathBuf>,
}

impl Default for StationConfig {
    fn default() -> Self {
        Self {
            weather_provider: WeatherProvider::default(),
            aqi_provider: Some(AqiProvider::default()),
            coordinates: None,
            zip: None,
            owm_key_file: PathBuf::from(DEFAULT_OWM_KEY_FILE),
            airnow_key_file: PathBuf::from(DEFAULT_AIRNOW_KEY_FILE),
            i2c_bus: "/dev/i2c-1".to_string(),
            spi_dev: "/dev/spidev0.0".to_string(),
            gpio_chip: "/dev/gpiochip0".to_string(),
            interval: Duration::from_secs(FETCH_TIMING.refresh_secs),
            use_sensors: true,
            use_panel: true,
            png_path: None,
        }
    }
}

impl StationConfig {
    /// Create a new StationConfig with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the weather provider
    pub fn with_weather_provider(mut self, provider: WeatherProvider) -> Self {
        self.weather_provider = provider;
        self
    }

    /// Set the AQI provider, or `None` to skip air-quality fetching
    pub fn with_aqi_provider(mut self, provider: Option<AqiProvider>) -> Self {
        self.aqi_provider = provider;
        self
    }

    /// Pin the station to fixed coordinates
    pub fn with_coordinates(mut self, lat: f64, lon: f64) -> Self {
        self.coordinates = Some((lat, lon));
        self
    }

    /// Pin the station to a fixed ZIP code
    pub fn with_zip(mut self, zip: impl Into<String>) -> Self {
        self.zip = Some(zip.into());
        self
    }

    /// Set the OpenWeatherMap key file path
    pub fn with_owm_key_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.owm_key_file = path.into();
        self
    }

    /// Set the AirNow key file path
    pub fn with_airnow_key_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.airnow_key_file = path.into();
        self
    }

    /// Set the I2C bus device path
    pub fn with_i2c_bus(mut self, path: impl Into<String>) -> Self {
        self.i2c_bus = path.into();
        self
    }

    /// Set the SPI device path for the panel
    pub fn with_spi_dev(mut self, path: impl Into<String>) -> Self {
        self.spi_dev = path.into();
        self
    }

    /// Set the GPIO character device for the panel control pins
    pub fn with_gpio_chip(mut self, path: impl Into<String>) -> Self {
        self.gpio_chip = path.into();
        self
    }

    /// Set the refresh interval
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Enable or disable local sensor reads
    pub fn with_sensors(mut self, enabled: bool) -> Self {
        self.use_sensors = enabled;
        self
    }

    /// Enable or disable the e-ink panel
    pub fn with_panel(mut self, enabled: bool) -> Self {
        self.use_panel = enabled;
        self
    }

    /// Also render each frame to a PNG file
    pub fn with_png_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.png_path = Some(path.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = StationConfig::default();
        assert_eq!(config.weather_provider, WeatherProvider::Nws);
        assert_eq!(config.aqi_provider, Some(AqiProvider::OpenWeather));
        assert!(config.use_sensors);
        assert!(config.use_panel);
        assert!(config.coordinates.is_none());
    }

    #[test]
    fn test_config_builder() {
        let config = StationConfig::new()
            .with_weather_provider(WeatherProvider::OpenWeather)
            .with_aqi_provider(Some(AqiProvider::AirNow))
            .with_coordinates(47.697, -122.3222)
            .with_zip("98115")
            .with_sensors(false)
            .with_panel(false)
            .with_png_path("/tmp/frame.png");

        assert_eq!(config.weather_provider, WeatherProvider::OpenWeather);
        assert_eq!(config.aqi_provider, Some(AqiProvider::AirNow));
        assert_eq!(config.coordinates, Some((47.697, -122.3222)));
        assert_eq!(config.zip.as_deref(), Some("98115"));
        assert!(!config.use_sensors);
        assert!(!config.use_panel);
        assert!(config.png_path.is_some());
    }
}
