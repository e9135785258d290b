//! SGP30 eCO2 / TVOC air-quality sensor
//!
//! Register-level driver over the embedded-hal I2C trait. Every measurement
//! word carries a Sensirion CRC-8 (polynomial 0x31, init 0xFF) which is
//! verified on read.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use linux_embedded_hal::{Delay, I2cdev};

use crate::error::{Result, StationError};
use crate::sensors::open_bus;

/// Fixed I2C address of the SGP30
pub const SGP30_ADDR: u8 = 0x58;

const CMD_INIT_AIR_QUALITY: [u8; 2] = [0x20, 0x03];
const CMD_MEASURE_AIR_QUALITY: [u8; 2] = [0x20, 0x08];
const CMD_GET_BASELINE: [u8; 2] = [0x20, 0x15];
const CMD_GET_SERIAL: [u8; 2] = [0x36, 0x82];

/// One instantaneous SGP30 reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sgp30Reading {
    /// Equivalent CO2 in ppm
    pub eco2_ppm: u16,
    /// Total volatile organic compounds in ppb
    pub tvoc_ppb: u16,
}

/// Stored compensation baseline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sgp30Baseline {
    pub eco2: u16,
    pub tvoc: u16,
}

/// SGP30 driver, generic over the I2C bus
pub struct Sgp30<I2C, D> {
    i2c: I2C,
    delay: D,
    address: u8,
}

impl Sgp30<I2cdev, Delay> {
    /// Open and initialize the sensor on a Linux I2C bus
    pub fn open(bus_path: &str) -> Result<Self> {
        let mut sensor = Self::new(open_bus(bus_path)?, Delay);
        sensor.init()?;
        Ok(sensor)
    }
}

impl<I2C, D> Sgp30<I2C, D>
where
    I2C: I2c,
    D: DelayNs,
{
    /// Create a driver on the given bus
    pub fn new(i2c: I2C, delay: D) -> Self {
        Self {
            i2c,
            delay,
            address: SGP30_ADDR,
        }
    }

    /// Start the on-chip air-quality engine.
    ///
    /// The sensor reports 400 ppm / 0 ppb for the first ~15 s after init.
    pub fn init(&mut self) -> Result<()> {
        self.i2c
            .write(self.address, &CMD_INIT_AIR_QUALITY)
            .map_err(|e| StationError::Sensor(format!("SGP30 init: {:?}", e)))?;
        self.delay.delay_ms(10);
        Ok(())
    }

    /// Measure eCO2 and TVOC
    pub fn measure(&mut self) -> Result<Sgp30Reading> {
        let [eco2_ppm, tvoc_ppb] = self.read_words(CMD_MEASURE_AIR_QUALITY, 12)?;
        Ok(Sgp30Reading { eco2_ppm, tvoc_ppb })
    }

    /// Read the current compensation baseline
    pub fn baseline(&mut self) -> Result<Sgp30Baseline> {
        let [eco2, tvoc] = self.read_words(CMD_GET_BASELINE, 10)?;
        Ok(Sgp30Baseline { eco2, tvoc })
    }

    /// Read the 48-bit serial number as three words
    pub fn serial(&mut self) -> Result<[u16; 3]> {
        self.read_words(CMD_GET_SERIAL, 1)
    }

    /// Issue a command, wait out the measurement, read N CRC-protected words
    fn read_words<const N: usize>(&mut self, command: [u8; 2], wait_ms: u32) -> Result<[u16; N]> {
        self.i2c
            .write(self.address, &command)
            .map_err(|e| StationError::Sensor(format!("SGP30 write: {:?}", e)))?;
        self.delay.delay_ms(wait_ms);

        let mut buf = [0u8; 64];
        let frame = &mut buf[..N * 3];
        self.i2c
            .read(self.address, frame)
            .map_err(|e| StationError::Sensor(format!("SGP30 read: {:?}", e)))?;

        let mut words = [0u16; N];
        for (i, chunk) in frame.chunks_exact(3).enumerate() {
            if crc8(&chunk[..2]) != chunk[2] {
                return Err(StationError::Sensor(format!(
                    "SGP30 CRC mismatch on word {}",
                    i
                )));
            }
            words[i] = u16::from_be_bytes([chunk[0], chunk[1]]);
        }
        Ok(words)
    }
}

/// Sensirion CRC-8: polynomial 0x31, initialization 0xFF
fn crc8(data: &[u8]) -> u8 {
    let mut crc: u8 = 0xFF;
    for byte in data {
        crc ^= byte;
        for _ in 0..8 {
            if crc & 0x80 != 0 {
                crc = (crc << 1) ^ 0x31;
            } else {
                crc <<= 1;
            }
        }
    }
    crc
}
