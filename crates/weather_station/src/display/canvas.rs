//! In-memory 1-bpp canvas the dashboard is drawn onto
//!
//! The canvas is the seam between embedded-graphics drawing and the panel:
//! rendering happens entirely in memory, then the packed buffer is pushed
//! over SPI (or exported to PNG for headless debugging).

use core::convert::Infallible;

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use image::GrayImage;
use std::path::Path;

use crate::error::Result;

/// A white canvas that collects black ink pixels
pub struct MonoCanvas {
    width: u32,
    height: u32,
    /// true = ink (black)
    pixels: Vec<bool>,
}

impl MonoCanvas {
    /// Create an all-white canvas
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![false; (width * height) as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Reset every pixel to white
    pub fn clear_white(&mut self) {
        self.pixels.fill(false);
    }

    /// Whether the pixel at (x, y) carries ink
    pub fn is_set(&self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height && self.pixels[(y * self.width + x) as usize]
    }

    /// Number of ink pixels on the canvas
    pub fn ink_count(&self) -> usize {
        self.pixels.iter().filter(|p| **p).count()
    }

    /// Pack the canvas rows into 1-bpp bytes, MSB first, each row padded to
    /// a whole byte. A set bit means ink.
    pub fn packed_rows(&self) -> Vec<u8> {
        let row_bytes = self.width.div_ceil(8) as usize;
        let mut packed = vec![0u8; row_bytes * self.height as usize];

        for y in 0..self.height {
            for x in 0..self.width {
                if self.pixels[(y * self.width + x) as usize] {
                    let index = y as usize * row_bytes + (x / 8) as usize;
                    packed[index] |= 0x80 >> (x % 8);
                }
            }
        }
        packed
    }

    /// Render to an 8-bit grayscale image, black ink on white
    pub fn to_image(&self) -> GrayImage {
        GrayImage::from_fn(self.width, self.height, |x, y| {
            if self.is_set(x, y) {
                image::Luma([0u8])
            } else {
                image::Luma([255u8])
            }
        })
    }

    /// Write the canvas to a PNG file
    pub fn save_png(&self, path: &Path) -> Result<()> {
        self.to_image().save(path)?;
        Ok(())
    }
}

impl OriginDimensions for MonoCanvas {
    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

impl DrawTarget for MonoCanvas {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> std::result::Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if point.x >= 0
                && point.y >= 0
                && (point.x as u32) < self.width
                && (point.y as u32) < self.height
            {
                let index = point.y as usize * self.width as usize + point.x as usize;
                self.pixels[index] = color.is_on();
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::primitives::{Line, PrimitiveStyle};

    #[test]
    fn test_new_canvas_is_white() {
        let canvas = MonoCanvas::new(16, 8);
        assert_eq!(canvas.ink_count(), 0);
    }

    #[test]
    fn test_draw_line_sets_pixels() {
        let mut canvas = MonoCanvas::new(16, 8);
        Line::new(Point::new(0, 2), Point::new(15, 2))
            .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
            .draw(&mut canvas)
            .unwrap();

        assert_eq!(canvas.ink_count(), 16);
        assert!(canvas.is_set(0, 2));
        assert!(canvas.is_set(15, 2));
        assert!(!canvas.is_set(0, 3));
    }

    #[test]
    fn test_out_of_bounds_pixels_are_dropped() {
        let mut canvas = MonoCanvas::new(4, 4);
        Line::new(Point::new(-2, -2), Point::new(8, 8))
            .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
            .draw(&mut canvas)
            .unwrap();

        assert!(canvas.ink_count() > 0);
    }

    #[test]
    fn test_packed_rows() {
        let mut canvas = MonoCanvas::new(10, 2);
        Line::new(Point::new(0, 0), Point::new(9, 0))
            .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
            .draw(&mut canvas)
            .unwrap();

        let packed = canvas.packed_rows();
        // 10 px pad to 2 bytes per row
        assert_eq!(packed.len(), 4);
        assert_eq!(packed[0], 0xFF);
        assert_eq!(packed[1], 0xC0);
        assert_eq!(packed[2], 0x00);
        assert_eq!(packed[3], 0x00);
    }

    #[test]
    fn test_clear_white() {
        let mut canvas = MonoCanvas::new(4, 4);
        Line::new(Point::new(0, 0), Point::new(3, 3))
            .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
            .draw(&mut canvas)
            .unwrap();
        assert!(canvas.ink_count() > 0);

        canvas.clear_white();
        assert_eq!(canvas.ink_count(), 0);
    }

    #[test]
    fn test_png_export() {
        let mut canvas = MonoCanvas::new(8, 8);
        Line::new(Point::new(0, 0), Point::new(7, 0))
            .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
            .draw(&mut canvas)
            .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.png");
        canvas.save_png(&path).unwrap();
        assert!(path.exists());

        let image = canvas.to_image();
        assert_eq!(image.get_pixel(0, 0).0[0], 0);
        assert_eq!(image.get_pixel(0, 1).0[0], 255);
    }
}
