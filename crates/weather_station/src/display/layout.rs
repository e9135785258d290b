//! Fixed-coordinate dashboard layout for the 400x300 panel

use embedded_graphics::mono_font::ascii::{
    FONT_10X20, FONT_6X10, FONT_6X13_BOLD, FONT_7X13_BOLD, FONT_9X15_BOLD,
};
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Line, PrimitiveStyle};
use embedded_graphics::text::{Alignment, Text};

use crate::aggregate::StationSnapshot;
use crate::display::canvas::MonoCanvas;
use crate::units::compact_wind;

const MARGIN: i32 = 8;
const HEADER_BASELINE: i32 = 24;
const HEADER_RULE_Y: i32 = 32;
const TEMP_BASELINE: i32 = 78;
const CONDITION_BASELINE: i32 = 98;
const RIGHT_COLUMN_X: i32 = 240;
const RIGHT_COLUMN_TOP: i32 = 58;
const RIGHT_LINE_STEP: i32 = 16;
const INDOOR_RULE_Y: i32 = 128;
const INDOOR_BASELINE: i32 = 148;
const HOURLY_BASELINE: i32 = 196;
const DAILY_RULE_Y: i32 = 208;
const DAILY_TOP: i32 = 228;
const DAY_COLUMN_WIDTH: i32 = 133;

fn draw_text(canvas: &mut MonoCanvas, text: &str, x: i32, y: i32, font: &MonoFont<'static>) {
    let style = MonoTextStyle::new(font, BinaryColor::On);
    let _ = Text::new(text, Point::new(x, y), style).draw(canvas);
}

fn draw_rule(canvas: &mut MonoCanvas, y: i32) {
    let width = canvas.width() as i32;
    let _ = Line::new(Point::new(MARGIN, y), Point::new(width - MARGIN, y))
        .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
        .draw(canvas);
}

/// Clip a label to the space a dashboard cell offers
fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

/// Draw a single message centered on the canvas
pub fn draw_centered_message(canvas: &mut MonoCanvas, message: &str) {
    canvas.clear_white();
    let center = Point::new(canvas.width() as i32 / 2, canvas.height() as i32 / 2);
    let style = MonoTextStyle::new(&FONT_10X20, BinaryColor::On);
    let _ = Text::with_alignment(message, center, style, Alignment::Center).draw(canvas);
}

/// Draw the full dashboard for one snapshot
pub fn draw_dashboard(canvas: &mut MonoCanvas, snapshot: &StationSnapshot) {
    canvas.clear_white();

    // header: place and date
    let header = format!(
        "{}, {}  {}",
        snapshot.location.city,
        snapshot.location.region,
        snapshot.captured_at.format("%A %b %d")
    );
    draw_text(canvas, &header, MARGIN, HEADER_BASELINE, &FONT_9X15_BOLD);
    draw_rule(canvas, HEADER_RULE_Y);

    // current conditions, big temperature on the left
    let current = &snapshot.weather.current;
    draw_text(
        canvas,
        &current.temp_string(),
        MARGIN,
        TEMP_BASELINE,
        &FONT_10X20,
    );
    draw_text(
        canvas,
        &truncate(&current.short_forecast, 36),
        MARGIN,
        CONDITION_BASELINE,
        &FONT_6X10,
    );

    // sun, wind and AQI on the right
    let mut y = RIGHT_COLUMN_TOP;
    let mut right_line = |canvas: &mut MonoCanvas, text: &str| {
        draw_text(canvas, text, RIGHT_COLUMN_X, y, &FONT_6X10);
        y += RIGHT_LINE_STEP;
    };
    right_line(canvas, &format!("Sunrise {}", snapshot.weather.sunrise));
    right_line(canvas, &format!("Sunset  {}", snapshot.weather.sunset));
    right_line(canvas, &format!("Wind    {}", compact_wind(&current.wind_speed)));
    if let Some(aqi) = snapshot.aqi.as_ref() {
        if let Some(today) = aqi.current.as_ref().map(|c| (c.aqi, c.category.clone())).or_else(
            || aqi.daily.first().map(|d| (d.aqi, d.category.clone())),
        ) {
            right_line(canvas, &format!("AQI {} ({})", today.0, today.1));
        }
    }

    // indoor sensor block
    draw_rule(canvas, INDOOR_RULE_Y);
    draw_text(canvas, "Indoor", MARGIN, INDOOR_BASELINE, &FONT_7X13_BOLD);
    let mut y = INDOOR_BASELINE + 16;
    if let Some(indoor) = snapshot.indoor.as_ref() {
        draw_text(
            canvas,
            &format!(
                "{:.1} F  {:.0}%  {:.0} hPa",
                indoor.temperature_f(),
                indoor.humidity_pct,
                indoor.pressure_hpa
            ),
            MARGIN,
            y,
            &FONT_6X10,
        );
        y += 14;
    }
    if let Some(air) = snapshot.air.as_ref() {
        draw_text(
            canvas,
            &format!("eCO2 {} ppm  TVOC {} ppb", air.eco2_ppm, air.tvoc_ppb),
            MARGIN,
            y,
            &FONT_6X10,
        );
        y += 14;
    }
    if let Some(light) = snapshot.light.as_ref() {
        draw_text(canvas, &format!("{:.0} lux", light.lux), MARGIN, y, &FONT_6X10);
    }

    // next hours in one strip
    let hours: Vec<String> = snapshot
        .weather
        .hourly
        .iter()
        .take(6)
        .map(|h| format!("{}h {}", h.hour, h.temperature))
        .collect();
    if !hours.is_empty() {
        draw_text(canvas, &hours.join("  "), MARGIN, HOURLY_BASELINE, &FONT_6X10);
    }

    // three-day outlook columns
    draw_rule(canvas, DAILY_RULE_Y);
    for (i, day) in snapshot.weather.daily.iter().take(3).enumerate() {
        let x = MARGIN + i as i32 * DAY_COLUMN_WIDTH;
        draw_text(canvas, &truncate(&day.name, 12), x, DAILY_TOP, &FONT_6X13_BOLD);
        draw_text(
            canvas,
            &format!("{} F", day.temperature),
            x,
            DAILY_TOP + 18,
            &FONT_6X10,
        );
        draw_text(
            canvas,
            &truncate(&day.short_forecast, 20),
            x,
            DAILY_TOP + 32,
            &FONT_6X10,
        );
        if let Some(chance) = day.precip_chance {
            draw_text(
                canvas,
                &format!("{}% precip", chance),
                x,
                DAILY_TOP + 46,
                &FONT_6X10,
            );
        }
    }
}
