use display_interface::{DisplayError, WriteOnlyDataCommand};
use embedded_graphics::mono_font::ascii::FONT_6X9;
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Baseline, Text};
use heapless::String;
use ssd1306::mode::BufferedGraphicsMode;
use ssd1306::size::DisplaySize;
use ssd1306::Ssd1306;
use ufmt::uwrite;

use crate::policy::Status;
use crate::sensors::{AtmoReading, GasReading};

/// Vertical pixel offset of each line on the 128x64 panel
pub mod rows {
    pub const ECO2: i32 = 0;
    pub const TVOC: i32 = 9;
    pub const TEMPERATURE: i32 = 20;
    pub const HUMIDITY: i32 = 30;
    pub const PRESSURE: i32 = 40;
    pub const STATUS: i32 = 50;
}

/// One rendered line. The panel fits 21 characters of FONT_6X9.
pub type Line = String<32>;

/// Text-only frame buffer
pub trait TextDisplay {
    type Error: core::fmt::Debug;

    /// Blanks the frame buffer
    fn clear(&mut self) -> Result<(), Self::Error>;

    /// Draws `text` with its top-left corner at (`x`, `y`)
    fn draw_text(&mut self, text: &str, x: i32, y: i32) -> Result<(), Self::Error>;

    /// Pushes the frame buffer to the panel
    fn present(&mut self) -> Result<(), Self::Error>;
}

impl<DI, SIZE> TextDisplay for Ssd1306<DI, SIZE, BufferedGraphicsMode<SIZE>>
where
    DI: WriteOnlyDataCommand,
    SIZE: DisplaySize,
{
    type Error = DisplayError;

    fn clear(&mut self) -> Result<(), DisplayError> {
        DrawTarget::clear(self, BinaryColor::Off)
    }

    fn draw_text(&mut self, text: &str, x: i32, y: i32) -> Result<(), DisplayError> {
        let style = MonoTextStyle::new(&FONT_6X9, BinaryColor::On);
        Text::with_baseline(text, Point::new(x, y), style, Baseline::Top).draw(self)?;
        Ok(())
    }

    fn present(&mut self) -> Result<(), DisplayError> {
        self.flush()
    }
}

/// Renders a single message on an otherwise blank screen
/// param text: text to render on the top line
/// param display: display instance
pub fn render_message<D: TextDisplay>(text: &str, display: &mut D) -> Result<(), D::Error> {
    display.clear()?;
    display.draw_text(text, 0, 0)?;
    display.present()
}

/// Renders the measurement screen
/// param gas: eCO2 / tVOC reading
/// param atmo: temperature, humidity and pressure
/// param status: classification and time text for the bottom line
/// param display: display instance
pub fn render_readings<D: TextDisplay>(
    gas: &GasReading,
    atmo: &AtmoReading,
    status: &Status,
    display: &mut D,
) -> Result<(), D::Error> {
    display.clear()?;

    let mut line = Line::new();
    // Lines are well below capacity
    let _ = uwrite!(line, "eCO2: {} ppm", gas.eco2);
    draw_line(&mut line, rows::ECO2, display)?;

    let _ = uwrite!(line, "tVOC: {} ppb", gas.tvoc);
    draw_line(&mut line, rows::TVOC, display)?;

    let _ = uwrite!(line, "Temp: {} C", atmo.temperature());
    draw_line(&mut line, rows::TEMPERATURE, display)?;

    let _ = uwrite!(line, "Hum:  {} %", atmo.humidity());
    draw_line(&mut line, rows::HUMIDITY, display)?;

    let _ = uwrite!(line, "Pres: {} kPa", atmo.pressure());
    draw_line(&mut line, rows::PRESSURE, display)?;

    let _ = uwrite!(line, "{}{}", status.level.label(), status.text.as_str());
    draw_line(&mut line, rows::STATUS, display)?;

    display.present()
}

/// Draws the line at the left edge of `y`, then empties it for reuse
fn draw_line<D: TextDisplay>(line: &mut Line, y: i32, display: &mut D) -> Result<(), D::Error> {
    let result = display.draw_text(line.as_str(), 0, y);
    line.clear();
    result
}
