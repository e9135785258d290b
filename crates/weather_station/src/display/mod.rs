//! E-ink dashboard rendering
//!
//! This module contains:
//! - `canvas`: the in-memory 1-bpp frame the dashboard is drawn onto
//! - `layout`: fixed-coordinate dashboard and message layouts
//! - `panel`: the SPI push to the Inky wHAT

pub mod canvas;
pub mod layout;
pub mod panel;

pub use canvas::MonoCanvas;
pub use layout::{draw_centered_message, draw_dashboard};
pub use panel::{InkyPanel, LinuxPanel, PanelPins, PANEL_HEIGHT, PANEL_WIDTH};
