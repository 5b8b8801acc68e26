use embedded_hal::digital::OutputPin;

/// On/off state of each channel of the RGB LED
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Color {
    pub red: bool,
    pub green: bool,
    pub blue: bool,
}

impl Color {
    pub const fn new(red: bool, green: bool, blue: bool) -> Self {
        Self { red, green, blue }
    }

    pub const WHITE: Color = Color::new(true, true, true);
    pub const RED: Color = Color::new(true, false, false);
    pub const GREEN: Color = Color::new(false, true, false);
    pub const BLUE: Color = Color::new(false, false, true);
    pub const YELLOW: Color = Color::new(true, true, false);

    /// Human readable name, used in logs
    pub fn name(&self) -> &'static str {
        match (self.red, self.green, self.blue) {
            (true, true, true) => "WHITE",
            (true, false, false) => "RED",
            (false, true, false) => "GREEN",
            (false, false, true) => "BLUE",
            (true, true, false) => "YELLOW",
            (false, false, false) => "OFF",
            _ => "MIXED",
        }
    }
}

/// Tri-color status indicator
pub trait Indicator {
    type Error: core::fmt::Debug;

    fn set_color(&mut self, color: Color) -> Result<(), Self::Error>;
}

/// Common-cathode RGB LED on three GPIO outputs
pub struct RgbLed<R, G, B> {
    red: R,
    green: G,
    blue: B,
}

impl<R, G, B, E> RgbLed<R, G, B>
where
    R: OutputPin<Error = E>,
    G: OutputPin<Error = E>,
    B: OutputPin<Error = E>,
{
    pub fn new(red: R, green: G, blue: B) -> Self {
        Self { red, green, blue }
    }

    /// Gives the pins back
    pub fn release(self) -> (R, G, B) {
        (self.red, self.green, self.blue)
    }
}

impl<R, G, B, E> Indicator for RgbLed<R, G, B>
where
    R: OutputPin<Error = E>,
    G: OutputPin<Error = E>,
    B: OutputPin<Error = E>,
    E: core::fmt::Debug,
{
    type Error = E;

    fn set_color(&mut self, color: Color) -> Result<(), E> {
        self.red.set_state(color.red.into())?;
        self.green.set_state(color.green.into())?;
        self.blue.set_state(color.blue.into())
    }
}
