use bme280::i2c::BME280;
use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

use crate::format::Centi;

/// One algorithm result from the gas sensor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GasReading {
    /// Equivalent CO2 in ppm
    pub eco2: u16,
    /// Total volatile organic compounds in ppb
    pub tvoc: u16,
}

/// Compensated atmospheric data in the sensor's integer format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawAtmo {
    /// Hundredths of a degree Celsius
    pub temperature: i32,
    /// Pascal in Q24.8
    pub pressure: u32,
    /// Percent relative humidity in Q22.10
    pub humidity: u32,
}

impl RawAtmo {
    /// Carries floating point measurements into the integer format
    /// param temperature: degrees Celsius
    /// param pressure: Pascal
    /// param humidity: percent relative humidity
    pub fn from_measurements(temperature: f32, pressure: f32, humidity: f32) -> Self {
        Self {
            temperature: round(temperature * 100.) as i32,
            pressure: round(pressure * 256.) as u32,
            humidity: round(humidity * 1024.) as u32,
        }
    }
}

/// Atmospheric reading scaled for display.
/// Values are kept in hundredths, which is what the display rounds to anyway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AtmoReading {
    raw: RawAtmo,
}

impl AtmoReading {
    pub fn from_raw(raw: RawAtmo) -> Self {
        Self { raw }
    }

    /// Temperature in degrees Celsius, rounded to hundredths
    pub fn temperature(&self) -> Centi {
        Centi(self.raw.temperature)
    }

    /// Pressure (raw / 25600), rounded to hundredths
    pub fn pressure(&self) -> Centi {
        Centi(div_round(self.raw.pressure as u64, 256))
    }

    /// Relative humidity in percent (raw / 1024), rounded to hundredths
    pub fn humidity(&self) -> Centi {
        Centi(div_round(self.raw.humidity as u64 * 100, 1024))
    }

    /// Unrounded temperature for gas sensor compensation
    pub fn temperature_celsius(&self) -> f32 {
        self.raw.temperature as f32 / 100.
    }

    /// Unrounded humidity for gas sensor compensation
    pub fn humidity_percent(&self) -> f32 {
        self.raw.humidity as f32 / 1024.
    }
}

/// Rounds half away from zero without pulling in libm
fn round(value: f32) -> f32 {
    if value < 0. {
        (value - 0.5) as i64 as f32
    } else {
        (value + 0.5) as i64 as f32
    }
}

fn div_round(numerator: u64, denominator: u64) -> i32 {
    ((numerator + denominator / 2) / denominator) as i32
}

/// eCO2 / tVOC sensor
pub trait GasSensor {
    type Error: core::fmt::Debug;

    /// Whether a new algorithm result is waiting
    fn data_ready(&mut self) -> Result<bool, Self::Error>;

    /// Reads the latest algorithm result
    fn read(&mut self) -> Result<GasReading, Self::Error>;

    /// Feeds ambient conditions back into the sensor's compensation
    fn calibrate(&mut self, humidity: f32, temperature: f32) -> Result<(), Self::Error>;
}

/// Temperature / pressure / humidity sensor
pub trait AtmoSensor {
    type Error: core::fmt::Debug;

    fn read(&mut self) -> Result<RawAtmo, Self::Error>;
}

/// BME280 I2C address, selected by the SDO pin
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Bme280Address {
    /// SDO tied to ground
    Primary = 0x76,
    /// SDO tied to VDDIO
    Secondary = 0x77,
}

impl Bme280Address {
    pub const fn address(self) -> u8 {
        self as u8
    }
}

/// BME280 on I2C, measuring on demand
pub struct Bme280Sensor<I2C, D> {
    bme: BME280<I2C>,
    delay: D,
}

impl<I2C, D, E> Bme280Sensor<I2C, D>
where
    I2C: I2c<Error = E>,
    D: DelayNs,
{
    /// Sets up the BME280
    /// param i2c: bus handle
    /// param delay: delay used during measurements
    /// param address: which of the two addresses the board wires up
    pub fn init(
        i2c: I2C,
        mut delay: D,
        address: Bme280Address,
    ) -> Result<Self, bme280::Error<E>> {
        let mut bme = match address {
            Bme280Address::Primary => BME280::new_primary(i2c),
            Bme280Address::Secondary => BME280::new_secondary(i2c),
        };
        bme.init(&mut delay)?;
        Ok(Self { bme, delay })
    }
}

impl<I2C, D, E> AtmoSensor for Bme280Sensor<I2C, D>
where
    I2C: I2c<Error = E>,
    E: core::fmt::Debug,
    D: DelayNs,
{
    type Error = bme280::Error<E>;

    fn read(&mut self) -> Result<RawAtmo, Self::Error> {
        let measurements = self.bme.measure(&mut self.delay)?;
        Ok(RawAtmo::from_measurements(
            measurements.temperature,
            measurements.pressure,
            measurements.humidity,
        ))
    }
}
