//! Local I2C environmental sensors
//!
//! Each driver exposes a reading struct and an `open()` constructor that
//! binds it to a Linux I2C bus device. The SGP30 and VEML7700 drivers talk
//! registers directly over the `embedded-hal` I2C trait; the BME688 goes
//! through the vendor driver crate.

pub mod bme688;
pub mod sgp30;
pub mod veml7700;

pub use bme688::{Bme688Sensor, BmeReading};
pub use sgp30::{Sgp30, Sgp30Baseline, Sgp30Reading};
pub use veml7700::{LuxReading, Veml7700};

use linux_embedded_hal::I2cdev;

use crate::error::{Result, StationError};

/// Open a Linux I2C bus device
pub(crate) fn open_bus(path: &str) -> Result<I2cdev> {
    I2cdev::new(path).map_err(|e| StationError::Sensor(format!("open {}: {:?}", path, e)))
}
