//! Recording fakes for the peripheral traits.

use crate::indicator::{Color, Indicator};
use crate::monitor::Watchdog;
use crate::rendering::TextDisplay;
use crate::sensors::{AtmoSensor, GasReading, GasSensor, RawAtmo};

/// Drawn lines: (text, x, y)
pub type Frame = Vec<(String, i32, i32)>;

#[derive(Default)]
pub struct RecordingDisplay {
    pub pending: Frame,
    pub presented: Vec<Frame>,
    pub fail: bool,
}

impl TextDisplay for RecordingDisplay {
    type Error = ();

    fn clear(&mut self) -> Result<(), ()> {
        self.pending.clear();
        Ok(())
    }

    fn draw_text(&mut self, text: &str, x: i32, y: i32) -> Result<(), ()> {
        if self.fail {
            return Err(());
        }
        self.pending.push((text.into(), x, y));
        Ok(())
    }

    fn present(&mut self) -> Result<(), ()> {
        self.presented.push(core::mem::take(&mut self.pending));
        Ok(())
    }
}

/// Errors the scripted gas sensor reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FakeError {
    Unavailable,
    Sensor(u8),
}

/// Gas sensor that reports `readings` in order, one per ready poll
#[derive(Default)]
pub struct ScriptedGas {
    pub ready: Vec<bool>,
    pub readings: Vec<GasReading>,
    pub calibrations: Vec<(f32, f32)>,
    pub fail: bool,
    /// Raised by the next read instead of returning a reading
    pub error_id: Option<u8>,
}

impl GasSensor for ScriptedGas {
    type Error = FakeError;

    fn data_ready(&mut self) -> Result<bool, FakeError> {
        if self.fail {
            return Err(FakeError::Unavailable);
        }
        Ok(if self.ready.is_empty() {
            true
        } else {
            self.ready.remove(0)
        })
    }

    fn read(&mut self) -> Result<GasReading, FakeError> {
        if let Some(id) = self.error_id.take() {
            return Err(FakeError::Sensor(id));
        }
        if self.readings.is_empty() {
            return Err(FakeError::Unavailable);
        }
        Ok(self.readings.remove(0))
    }

    fn calibrate(&mut self, humidity: f32, temperature: f32) -> Result<(), FakeError> {
        self.calibrations.push((humidity, temperature));
        Ok(())
    }
}

pub struct FixedAtmo(pub RawAtmo);

impl AtmoSensor for FixedAtmo {
    type Error = ();

    fn read(&mut self) -> Result<RawAtmo, ()> {
        Ok(self.0)
    }
}

#[derive(Default)]
pub struct RecordingLed {
    pub colors: Vec<Color>,
}

impl Indicator for RecordingLed {
    type Error = ();

    fn set_color(&mut self, color: Color) -> Result<(), ()> {
        self.colors.push(color);
        Ok(())
    }
}

#[derive(Default)]
pub struct CountingWatchdog {
    pub feeds: usize,
}

impl Watchdog for CountingWatchdog {
    fn feed(&mut self) {
        self.feeds += 1;
    }
}
