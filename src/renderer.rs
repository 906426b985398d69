//! # Wave Card Rendering
//!
//! This module lays a [`NormalizedReport`] out on the card and writes it as a PNG.
//! It also provides an ASCII rendition of the same card for development runs
//! without writing any files.
//!
//! The layout is designed at 800×950 and scaled to the configured canvas:
//! date and title centred at the top, forecast lines below, and a buoy panel
//! near the bottom. Text uses the built-in 10×20 Latin-1 mono font, so the card
//! needs no font files at runtime.

use crate::{canvas::Canvas, config::Config, report::NormalizedReport};
use chrono::NaiveDate;
use embedded_graphics::{
    mono_font::{iso_8859_1::FONT_10X20, MonoTextStyle},
    pixelcolor::Rgb888,
    prelude::*,
    primitives::{PrimitiveStyle, Rectangle},
    text::{Alignment, Baseline, Text, TextStyleBuilder},
};
use std::path::Path;

pub const BACKGROUND: Rgb888 = Rgb888::new(0x00, 0x33, 0x66);
pub const PANEL: Rgb888 = Rgb888::new(0x00, 0x1a, 0x33);
pub const ACCENT: Rgb888 = Rgb888::new(0xa0, 0xd0, 0xff);

const DESIGN_WIDTH: f32 = 800.0;
const DESIGN_HEIGHT: f32 = 950.0;
const CHAR_WIDTH: i32 = 10;
const LINE_SPACING: i32 = 28;
const ASCII_WIDTH: usize = 50;

/// Card renderer for one zone/station pair
pub struct CardRenderer {
    width: u32,
    height: u32,
    zone: String,
    station: String,
}

impl CardRenderer {
    pub fn new(config: &Config) -> Self {
        Self {
            width: config.card.width,
            height: config.card.height,
            zone: config.forecast.zone.clone(),
            station: config.buoy.station.clone(),
        }
    }

    /// Draw the full card onto any RGB draw target.
    pub fn draw<D>(
        &self,
        report: &NormalizedReport,
        date: NaiveDate,
        display: &mut D,
    ) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb888>,
    {
        display.clear(BACKGROUND)?;

        let white = MonoTextStyle::new(&FONT_10X20, Rgb888::WHITE);
        let accent = MonoTextStyle::new(&FONT_10X20, ACCENT);
        let centered = TextStyleBuilder::new()
            .alignment(Alignment::Center)
            .baseline(Baseline::Middle)
            .build();
        let center_x = (self.width / 2) as i32;
        let left = self.x(80);
        let columns = self.columns_from(left);

        // Header
        let date_text = date.format("%b %d, %Y").to_string();
        Text::with_text_style(&date_text, Point::new(center_x, self.y(80)), white, centered)
            .draw(display)?;
        let title = fit(&format!("Wave Forecast – {}", self.zone), columns);
        Text::with_text_style(&title, Point::new(center_x, self.y(150)), white, centered)
            .draw(display)?;

        // Forecast lines, or the fallback text
        let mut y = self.y(220);
        for line in report.forecast_text_lines() {
            Text::with_baseline(&fit(line, columns), Point::new(left, y), white, Baseline::Top)
                .draw(display)?;
            y += LINE_SPACING;
        }

        // Buoy panel
        let panel_top = self.y(700);
        Rectangle::with_corners(
            Point::new(self.x(60), panel_top),
            Point::new(self.x(740), self.y(810)),
        )
        .into_styled(PrimitiveStyle::with_fill(PANEL))
        .draw(display)?;

        let heading = fit(&format!("Current – Buoy {}", self.station), columns);
        Text::with_baseline(&heading, Point::new(left, panel_top + 15), white, Baseline::Top)
            .draw(display)?;
        Text::with_baseline(
            &fit(&report.buoy_summary(), columns),
            Point::new(left, panel_top + 45),
            accent,
            Baseline::Top,
        )
        .draw(display)?;
        if let Some(observed) = report.observed_at_text() {
            Text::with_baseline(
                &fit(&format!("Observed {observed}"), columns),
                Point::new(left, panel_top + 75),
                accent,
                Baseline::Top,
            )
            .draw(display)?;
        }

        Ok(())
    }

    /// Draw the card on a fresh canvas and write it to `path` as PNG.
    pub fn render_png<P: AsRef<Path>>(
        &self,
        report: &NormalizedReport,
        date: NaiveDate,
        path: P,
    ) -> Result<(), image::ImageError> {
        let mut canvas = Canvas::new(self.width, self.height);
        self.draw(report, date, &mut canvas)
            .unwrap_or_else(|never| match never {});
        canvas.save_png(path)
    }

    fn x(&self, design_x: i32) -> i32 {
        (design_x as f32 * self.width as f32 / DESIGN_WIDTH).round() as i32
    }

    fn y(&self, design_y: i32) -> i32 {
        (design_y as f32 * self.height as f32 / DESIGN_HEIGHT).round() as i32
    }

    /// Characters that fit between `left` and a matching right margin.
    fn columns_from(&self, left: i32) -> usize {
        ((self.width as i32 - 2 * left).max(0) / CHAR_WIDTH) as usize
    }
}

/// Render the card as text for development mode.
pub fn ascii_card(
    report: &NormalizedReport,
    zone: &str,
    station: &str,
    date: NaiveDate,
) -> String {
    let rule = "=".repeat(ASCII_WIDTH);
    let divider = "-".repeat(ASCII_WIDTH);

    let mut lines = vec![
        rule.clone(),
        date.format("%b %d, %Y").to_string(),
        format!("Wave Forecast – {zone}"),
        divider.clone(),
    ];
    lines.extend(report.forecast_text_lines().into_iter().map(str::to_string));
    lines.push(divider);
    lines.push(format!("Current – Buoy {station}"));
    lines.push(report.buoy_summary());
    if let Some(observed) = report.observed_at_text() {
        lines.push(format!("Observed {observed}"));
    }
    lines.push(rule);

    lines.join("\n") + "\n"
}

/// Print the ASCII card to stdout.
pub fn draw_ascii(report: &NormalizedReport, config: &Config, date: NaiveDate) {
    print!(
        "{}",
        ascii_card(report, &config.forecast.zone, &config.buoy.station, date)
    );
}

/// Map text onto the Latin-1 font and cut it to `columns` characters.
fn fit(text: &str, columns: usize) -> String {
    text.chars()
        .map(|c| match c {
            '–' | '—' => '-',
            c if (c as u32) > 0xff => '?',
            c => c,
        })
        .take(columns)
        .collect()
}
