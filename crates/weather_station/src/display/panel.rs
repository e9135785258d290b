//! SPI driver for the Inky wHAT e-ink panel
//!
//! The panel speaks an SSD16xx-style command set: one command byte with DC
//! low, parameter/frame bytes with DC high, and a BUSY line that stays high
//! while the controller refreshes.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::spi::SpiDevice;
use linux_embedded_hal::gpio_cdev::{Chip, LineRequestFlags};
use linux_embedded_hal::spidev::{SpiModeFlags, SpidevOptions};
use linux_embedded_hal::{CdevPin, Delay, SpidevDevice};
use tracing::debug;

use crate::display::canvas::MonoCanvas;
use crate::error::{Result, StationError};

/// Panel resolution of the Inky wHAT
pub const PANEL_WIDTH: u32 = 400;
/// Panel resolution of the Inky wHAT
pub const PANEL_HEIGHT: u32 = 300;

const SW_RESET: u8 = 0x12;
const DRIVER_CONTROL: u8 = 0x01;
const DATA_ENTRY_MODE: u8 = 0x11;
const SET_RAM_X_RANGE: u8 = 0x44;
const SET_RAM_Y_RANGE: u8 = 0x45;
const SET_RAM_X_COUNTER: u8 = 0x4E;
const SET_RAM_Y_COUNTER: u8 = 0x4F;
const BORDER_WAVEFORM: u8 = 0x3C;
const WRITE_RAM_BW: u8 = 0x24;
const UPDATE_CONTROL2: u8 = 0x22;
const MASTER_ACTIVATE: u8 = 0x20;
const DEEP_SLEEP: u8 = 0x10;

/// BCM pin assignment of the Inky HAT header
#[derive(Debug, Clone, Copy)]
pub struct PanelPins {
    pub dc: u32,
    pub reset: u32,
    pub busy: u32,
}

impl Default for PanelPins {
    fn default() -> Self {
        Self {
            dc: 22,
            reset: 27,
            busy: 17,
        }
    }
}

/// E-ink panel behind SPI plus DC/RESET/BUSY control lines
pub struct InkyPanel<SPI, DC, RST, BUSY, D> {
    spi: SPI,
    dc: DC,
    reset: RST,
    busy: BUSY,
    delay: D,
}

/// The panel as wired on a Raspberry Pi
pub type LinuxPanel = InkyPanel<SpidevDevice, CdevPin, CdevPin, CdevPin, Delay>;

impl LinuxPanel {
    /// Open the panel on Linux spidev/gpiochip devices
    pub fn open(spi_path: &str, gpio_chip: &str, pins: PanelPins) -> Result<Self> {
        let mut spi = SpidevDevice::open(spi_path)
            .map_err(|e| StationError::Display(format!("open {}: {:?}", spi_path, e)))?;
        let options = SpidevOptions::new()
            .bits_per_word(8)
            .max_speed_hz(488_000)
            .mode(SpiModeFlags::SPI_MODE_0)
            .build();
        spi.configure(&options)
            .map_err(|e| StationError::Display(format!("configure {}: {:?}", spi_path, e)))?;

        let mut chip = Chip::new(gpio_chip)
            .map_err(|e| StationError::Display(format!("open {}: {:?}", gpio_chip, e)))?;
        let mut output = |line: u32, name: &str| -> Result<CdevPin> {
            let handle = chip
                .get_line(line)
                .and_then(|l| l.request(LineRequestFlags::OUTPUT, 0, name))
                .map_err(|e| StationError::Display(format!("gpio {}: {:?}", line, e)))?;
            CdevPin::new(handle).map_err(|e| StationError::Display(format!("gpio {}: {:?}", line, e)))
        };
        let dc = output(pins.dc, "inkwx-dc")?;
        let reset = output(pins.reset, "inkwx-reset")?;
        let busy_handle = chip
            .get_line(pins.busy)
            .and_then(|l| l.request(LineRequestFlags::INPUT, 0, "inkwx-busy"))
            .map_err(|e| StationError::Display(format!("gpio {}: {:?}", pins.busy, e)))?;
        let busy = CdevPin::new(busy_handle)
            .map_err(|e| StationError::Display(format!("gpio {}: {:?}", pins.busy, e)))?;

        let mut panel = InkyPanel::new(spi, dc, reset, busy, Delay);
        panel.init()?;
        Ok(panel)
    }
}

impl<SPI, DC, RST, BUSY, D> InkyPanel<SPI, DC, RST, BUSY, D>
where
    SPI: SpiDevice,
    DC: OutputPin,
    RST: OutputPin,
    BUSY: InputPin,
    D: DelayNs,
{
    /// Wrap already-configured SPI and control pins
    pub fn new(spi: SPI, dc: DC, reset: RST, busy: BUSY, delay: D) -> Self {
        Self {
            spi,
            dc,
            reset,
            busy,
            delay,
        }
    }

    fn command(&mut self, command: u8) -> Result<()> {
        self.dc
            .set_low()
            .map_err(|e| StationError::Display(format!("dc pin: {:?}", e)))?;
        self.spi
            .write(&[command])
            .map_err(|e| StationError::Display(format!("spi write: {:?}", e)))
    }

    fn data(&mut self, data: &[u8]) -> Result<()> {
        self.dc
            .set_high()
            .map_err(|e| StationError::Display(format!("dc pin: {:?}", e)))?;
        self.spi
            .write(data)
            .map_err(|e| StationError::Display(format!("spi write: {:?}", e)))
    }

    fn wait_while_busy(&mut self) -> Result<()> {
        while self
            .busy
            .is_high()
            .map_err(|e| StationError::Display(format!("busy pin: {:?}", e)))?
        {
            self.delay.delay_ms(10);
        }
        Ok(())
    }

    /// Pulse the hardware reset line
    fn hardware_reset(&mut self) -> Result<()> {
        self.reset
            .set_low()
            .map_err(|e| StationError::Display(format!("reset pin: {:?}", e)))?;
        self.delay.delay_ms(100);
        self.reset
            .set_high()
            .map_err(|e| StationError::Display(format!("reset pin: {:?}", e)))?;
        self.delay.delay_ms(100);
        Ok(())
    }

    /// Reset and configure the controller
    pub fn init(&mut self) -> Result<()> {
        self.hardware_reset()?;

        self.command(SW_RESET)?;
        self.delay.delay_ms(10);
        self.wait_while_busy()?;

        let last_row = (PANEL_HEIGHT - 1) as u16;
        self.command(DRIVER_CONTROL)?;
        self.data(&[(last_row & 0xFF) as u8, (last_row >> 8) as u8, 0x00])?;

        // x increments per byte, y per row
        self.command(DATA_ENTRY_MODE)?;
        self.data(&[0x03])?;

        let last_col_byte = (PANEL_WIDTH / 8 - 1) as u8;
        self.command(SET_RAM_X_RANGE)?;
        self.data(&[0x00, last_col_byte])?;
        self.command(SET_RAM_Y_RANGE)?;
        self.data(&[0x00, 0x00, (last_row & 0xFF) as u8, (last_row >> 8) as u8])?;

        // white border
        self.command(BORDER_WAVEFORM)?;
        self.data(&[0x01])?;

        debug!("panel initialized");
        Ok(())
    }

    /// Push a rendered canvas to the panel and trigger a full refresh
    pub fn show(&mut self, canvas: &MonoCanvas) -> Result<()> {
        if canvas.width() != PANEL_WIDTH || canvas.height() != PANEL_HEIGHT {
            return Err(StationError::Display(format!(
                "canvas is {}x{}, panel needs {}x{}",
                canvas.width(),
                canvas.height(),
                PANEL_WIDTH,
                PANEL_HEIGHT
            )));
        }

        self.command(SET_RAM_X_COUNTER)?;
        self.data(&[0x00])?;
        self.command(SET_RAM_Y_COUNTER)?;
        self.data(&[0x00, 0x00])?;

        // panel RAM wants 0 for black, the canvas packs 1 for ink
        let frame: Vec<u8> = canvas.packed_rows().iter().map(|b| !b).collect();
        self.command(WRITE_RAM_BW)?;
        self.data(&frame)?;

        self.command(UPDATE_CONTROL2)?;
        self.data(&[0xF7])?;
        self.command(MASTER_ACTIVATE)?;
        self.wait_while_busy()?;

        debug!("panel refresh complete");
        Ok(())
    }

    /// Put the controller into deep sleep until the next init
    pub fn sleep(&mut self) -> Result<()> {
        self.command(DEEP_SLEEP)?;
        self.data(&[0x01])
    }
}
