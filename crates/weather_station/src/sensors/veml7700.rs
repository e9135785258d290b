//! VEML7700 ambient light sensor
//!
//! Register-level driver over the embedded-hal I2C trait. Runs at gain x1
//! with a 100 ms integration time, which puts the ALS resolution at
//! 0.0576 lux per count.

use embedded_hal::i2c::I2c;
use linux_embedded_hal::I2cdev;

use crate::error::{Result, StationError};
use crate::sensors::open_bus;

/// Fixed I2C address of the VEML7700
pub const VEML7700_ADDR: u8 = 0x10;

const REG_ALS_CONF: u8 = 0x00;
const REG_ALS: u8 = 0x04;
const REG_WHITE: u8 = 0x05;

/// ALS resolution at gain x1 / 100 ms integration
const LUX_PER_COUNT: f32 = 0.0576;

/// One instantaneous light reading
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LuxReading {
    /// Ambient light in lux
    pub lux: f32,
    /// Raw white-channel counts
    pub white: u16,
}

/// VEML7700 driver, generic over the I2C bus
pub struct Veml7700<I2C> {
    i2c: I2C,
    address: u8,
}

impl Veml7700<I2cdev> {
    /// Open and power on the sensor on a Linux I2C bus
    pub fn open(bus_path: &str) -> Result<Self> {
        let mut sensor = Self::new(open_bus(bus_path)?);
        sensor.init()?;
        Ok(sensor)
    }
}

impl<I2C: I2c> Veml7700<I2C> {
    /// Create a driver on the given bus
    pub fn new(i2c: I2C) -> Self {
        Self {
            i2c,
            address: VEML7700_ADDR,
        }
    }

    /// Power on with gain x1 and 100 ms integration time (config word 0x0000)
    pub fn init(&mut self) -> Result<()> {
        self.write_u16(REG_ALS_CONF, 0x0000)
    }

    /// Read ambient light and the white channel
    pub fn read(&mut self) -> Result<LuxReading> {
        let raw = self.read_u16(REG_ALS)?;
        let white = self.read_u16(REG_WHITE)?;
        Ok(LuxReading {
            lux: counts_to_lux(raw),
            white,
        })
    }

    fn write_u16(&mut self, register: u8, value: u16) -> Result<()> {
        let bytes = value.to_le_bytes();
        self.i2c
            .write(self.address, &[register, bytes[0], bytes[1]])
            .map_err(|e| StationError::Sensor(format!("VEML7700 write: {:?}", e)))
    }

    fn read_u16(&mut self, register: u8) -> Result<u16> {
        let mut buf = [0u8; 2];
        self.i2c
            .write_read(self.address, &[register], &mut buf)
            .map_err(|e| StationError::Sensor(format!("VEML7700 read: {:?}", e)))?;
        Ok(u16::from_le_bytes(buf))
    }
}

/// Convert raw ALS counts to lux at the configured gain
pub fn counts_to_lux(raw: u16) -> f32 {
    f32::from(raw) * LUX_PER_COUNT
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::i2c::{ErrorKind, ErrorType, Operation};
    use std::collections::VecDeque;

    #[derive(Debug)]
    struct MockError;

    impl embedded_hal::i2c::Error for MockError {
        fn kind(&self) -> ErrorKind {
            ErrorKind::Other
        }
    }

    struct MockBus {
        reads: VecDeque<Vec<u8>>,
        writes: Vec<Vec<u8>>,
    }

    impl ErrorType for MockBus {
        type Error = MockError;
    }

    impl I2c for MockBus {
        fn transaction(
            &mut self,
            _address: u8,
            operations: &mut [Operation<'_>],
        ) -> std::result::Result<(), MockError> {
            for op in operations {
                match op {
                    Operation::Write(bytes) => self.writes.push(bytes.to_vec()),
                    Operation::Read(buf) => {
                        let frame = self.reads.pop_front().ok_or(MockError)?;
                        buf.copy_from_slice(&frame);
                    }
                }
            }
            Ok(())
        }
    }

    #[test]
    fn test_counts_to_lux() {
        assert_eq!(counts_to_lux(0), 0.0);
        assert!((counts_to_lux(1000) - 57.6).abs() < 1e-3);
    }

    #[test]
    fn test_read_registers() {
        // 1000 counts ALS, 1234 counts white, little endian
        let bus = MockBus {
            reads: vec![vec![0xE8, 0x03], vec![0xD2, 0x04]].into(),
            writes: Vec::new(),
        };
        let mut sensor = Veml7700::new(bus);

        let reading = sensor.read().unwrap();
        assert!((reading.lux - 57.6).abs() < 1e-3);
        assert_eq!(reading.white, 1234);
        assert_eq!(sensor.i2c.writes, vec![vec![REG_ALS], vec![REG_WHITE]]);
    }

    #[test]
    fn test_init_config_word() {
        let bus = MockBus {
            reads: VecDeque::new(),
            writes: Vec::new(),
        };
        let mut sensor = Veml7700::new(bus);

        sensor.init().unwrap();
        assert_eq!(sensor.i2c.writes, vec![vec![REG_ALS_CONF, 0x00, 0x00]]);
    }
}
