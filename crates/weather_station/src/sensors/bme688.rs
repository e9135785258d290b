//! BME688 temperature / humidity / pressure / gas sensor

use core::time::Duration;

use bme680::{
    Bme680, I2CAddress, IIRFilterSize, OversamplingSetting, PowerMode, SettingsBuilder,
};
use linux_embedded_hal::{Delay, I2cdev};

use crate::error::{Result, StationError};
use crate::sensors::open_bus;
use crate::units::celsius_to_fahrenheit;

/// One instantaneous BME688 reading
#[derive(Debug, Clone, PartialEq)]
pub struct BmeReading {
    pub temperature_c: f32,
    pub humidity_pct: f32,
    pub pressure_hpa: f32,
    pub gas_ohms: u32,
}

impl BmeReading {
    /// Temperature in Fahrenheit for the dashboard
    pub fn temperature_f(&self) -> f32 {
        celsius_to_fahrenheit(f64::from(self.temperature_c)) as f32
    }
}

/// BME688 behind the vendor driver, run in forced mode
pub struct Bme688Sensor {
    sensor: Bme680<I2cdev, Delay>,
    delay: Delay,
}

impl Bme688Sensor {
    /// Open the sensor on a Linux I2C bus and apply the measurement profile
    pub fn open(bus_path: &str) -> Result<Self> {
        let i2c = open_bus(bus_path)?;
        let mut delay = Delay;

        let mut sensor = Bme680::init(i2c, &mut delay, I2CAddress::Primary)
            .map_err(|e| StationError::Sensor(format!("BME688 init: {:?}", e)))?;

        let settings = SettingsBuilder::new()
            .with_humidity_oversampling(OversamplingSetting::OS2x)
            .with_pressure_oversampling(OversamplingSetting::OS4x)
            .with_temperature_oversampling(OversamplingSetting::OS8x)
            .with_temperature_filter(IIRFilterSize::Size3)
            .with_gas_measurement(Duration::from_millis(1500), 320, 25)
            .with_run_gas(true)
            .build();

        sensor
            .set_sensor_settings(&mut delay, settings)
            .map_err(|e| StationError::Sensor(format!("BME688 settings: {:?}", e)))?;

        Ok(Self { sensor, delay })
    }

    /// Trigger a forced measurement and read it back
    pub fn read(&mut self) -> Result<BmeReading> {
        self.sensor
            .set_sensor_mode(&mut self.delay, PowerMode::ForcedMode)
            .map_err(|e| StationError::Sensor(format!("BME688 forced mode: {:?}", e)))?;

        let (data, _state) = self
            .sensor
            .get_sensor_data(&mut self.delay)
            .map_err(|e| StationError::Sensor(format!("BME688 read: {:?}", e)))?;

        Ok(BmeReading {
            temperature_c: data.temperature_celsius(),
            humidity_pct: data.humidity_percent(),
            pressure_hpa: data.pressure_hpa(),
            gas_ohms: data.gas_resistance_ohm(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temperature_f() {
        let reading = BmeReading {
            temperature_c: 20.0,
            humidity_pct: 40.0,
            pressure_hpa: 1013.2,
            gas_ohms: 120_000,
        };
        assert!((reading.temperature_f() - 68.0).abs() < 1e-4);
    }
}
