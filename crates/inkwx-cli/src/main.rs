//! inkwx - e-ink home weather and air-quality station
//!
//! Usage:
//!     inkwx [OPTIONS]
//!
//! Environment Variables:
//!     INKWX_OWM_API_KEY: OpenWeatherMap API key (overrides the key file)
//!     INKWX_AIRNOW_API_KEY: AirNow API key (overrides the key file)
//!     INKWX_REFRESH_SECS: Seconds between refresh cycles (default: 300)
//!     INKWX_HTTP_TIMEOUT_SECS: Per-request HTTP timeout (default: 30)

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;
use weather_station::{format_report, AqiProvider, Station, StationConfig, WeatherProvider};

/// inkwx - home weather station on an Inky wHAT
#[derive(Parser, Debug)]
#[command(name = "inkwx")]
#[command(about = "Home weather and air-quality station for an e-ink display")]
#[command(after_help = r#"Examples:
    # Run with defaults (NWS weather, OpenWeatherMap AQI, panel + sensors)
    inkwx

    # One cycle, print the report, skip the hardware
    inkwx --once --print --no-panel --no-sensors

    # Render to a PNG instead of the panel
    inkwx --once --no-panel --png /tmp/dashboard.png

    # Pin the location instead of IP geolocation
    inkwx --lat 47.697 --lon -122.3222 --zip 98115

    # OpenWeatherMap for weather, AirNow for air quality
    inkwx --weather open-weather --aqi air-now
"#)]
struct Cli {
    // Provider options
    /// Weather forecast provider
    #[arg(long, value_enum, env = "INKWX_WEATHER_PROVIDER", default_value = "nws")]
    weather: WeatherArg,

    /// Air-quality provider
    #[arg(long, value_enum, env = "INKWX_AQI_PROVIDER", default_value = "open-weather")]
    aqi: AqiArg,

    /// OpenWeatherMap key file
    #[arg(long, env = "INKWX_OWM_KEY_FILE", default_value = "/private/keys/openweather.txt")]
    owm_key_file: PathBuf,

    /// AirNow key file
    #[arg(long, env = "INKWX_AIRNOW_KEY_FILE", default_value = "/private/keys/aqi.txt")]
    airnow_key_file: PathBuf,

    // Location options
    /// Latitude override (requires --lon)
    #[arg(long, requires = "lon", allow_hyphen_values = true)]
    lat: Option<f64>,

    /// Longitude override (requires --lat)
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    lon: Option<f64>,

    /// ZIP code override for AirNow lookups
    #[arg(long)]
    zip: Option<String>,

    // Hardware options
    /// I2C bus device for the sensors
    #[arg(long, env = "INKWX_I2C_BUS", default_value = "/dev/i2c-1")]
    i2c_bus: String,

    /// SPI device for the panel
    #[arg(long, env = "INKWX_SPI_DEV", default_value = "/dev/spidev0.0")]
    spi_dev: String,

    /// GPIO character device for the panel control pins
    #[arg(long, env = "INKWX_GPIO_CHIP", default_value = "/dev/gpiochip0")]
    gpio_chip: String,

    /// Skip the local I2C sensors
    #[arg(long)]
    no_sensors: bool,

    /// Skip the e-ink panel
    #[arg(long)]
    no_panel: bool,

    // Run options
    /// Seconds between refresh cycles
    #[arg(long, env = "INKWX_REFRESH_SECS")]
    interval_secs: Option<u64>,

    /// Run a single cycle and exit
    #[arg(long)]
    once: bool,

    /// Print the console report after each cycle
    #[arg(long)]
    print: bool,

    /// Also write each rendered frame to this PNG path
    #[arg(long, value_name = "PATH")]
    png: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum WeatherArg {
    Nws,
    OpenWeather,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum AqiArg {
    OpenWeather,
    AirNow,
    Off,
}

fn build_config(cli: &Cli) -> StationConfig {
    let mut config = StationConfig::new()
        .with_weather_provider(match cli.weather {
            WeatherArg::Nws => WeatherProvider::Nws,
            WeatherArg::OpenWeather => WeatherProvider::OpenWeather,
        })
        .with_aqi_provider(match cli.aqi {
            AqiArg::OpenWeather => Some(AqiProvider::OpenWeather),
            AqiArg::AirNow => Some(AqiProvider::AirNow),
            AqiArg::Off => None,
        })
        .with_owm_key_file(&cli.owm_key_file)
        .with_airnow_key_file(&cli.airnow_key_file)
        .with_i2c_bus(&cli.i2c_bus)
        .with_spi_dev(&cli.spi_dev)
        .with_gpio_chip(&cli.gpio_chip)
        .with_sensors(!cli.no_sensors)
        .with_panel(!cli.no_panel);

    if let (Some(lat), Some(lon)) = (cli.lat, cli.lon) {
        config = config.with_coordinates(lat, lon);
    }
    if let Some(zip) = &cli.zip {
        config = config.with_zip(zip);
    }
    if let Some(secs) = cli.interval_secs {
        config = config.with_interval(Duration::from_secs(secs));
    }
    if let Some(png) = &cli.png {
        config = config.with_png_path(png);
    }
    config
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = build_config(&cli);

    let mut station = Station::new(config).await?;
    println!(
        "Station location: {}, {} ({}, {})",
        station.location().city,
        station.location().region,
        station.location().lat,
        station.location().lon
    );

    if cli.once {
        let snapshot = station.run_once().await?;
        if cli.print {
            println!("{}", format_report(&snapshot));
        }
        return Ok(());
    }

    if cli.print {
        // print mode keeps the loop in the foreground with a report per cycle
        loop {
            match station.run_once().await {
                Ok(snapshot) => println!("{}", format_report(&snapshot)),
                Err(e) => eprintln!("cycle failed: {}", e),
            }
            tokio::time::sleep(station_interval(&cli)).await;
        }
    }

    station.run().await?;
    Ok(())
}

fn station_interval(cli: &Cli) -> Duration {
    Duration::from_secs(
        cli.interval_secs
            .unwrap_or(weather_station::FETCH_TIMING.refresh_secs),
    )
}
