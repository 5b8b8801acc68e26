//! Minimal blocking driver for the CCS811 eCO2 / tVOC sensor.
//!
//! Covers what the monitor needs: bring-up into application mode with one
//! measurement per second, polling the data-ready flag, reading the algorithm
//! result and writing the humidity / temperature compensation.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

use crate::sensors::{GasReading, GasSensor};

/// Address with ADDR pulled high
pub const ADDRESS_HIGH: u8 = 0x5B;
/// Address with ADDR pulled low
pub const ADDRESS_LOW: u8 = 0x5A;

const HW_ID: u8 = 0x81;

#[repr(u8)]
#[derive(Clone, Copy)]
enum Register {
    Status = 0x00,
    MeasMode = 0x01,
    AlgResultData = 0x02,
    EnvData = 0x05,
    HwId = 0x20,
    ErrorId = 0xE0,
    AppStart = 0xF4,
}

mod status {
    pub const ERROR: u8 = 0b0000_0001;
    pub const DATA_READY: u8 = 0b0000_1000;
    pub const APP_VALID: u8 = 0b0001_0000;
}

/// Measurement drive mode, written to MEAS_MODE bits 6:4
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DriveMode {
    Idle = 0b000_0000,
    EverySecond = 0b001_0000,
    Every10Seconds = 0b010_0000,
    Every60Seconds = 0b011_0000,
}

/// All possible errors in this driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// I2C bus error
    I2c(E),
    /// Something other than a CCS811 answered at the address
    UnexpectedHardwareId(u8),
    /// No valid application firmware to start
    NoApplication,
    /// The sensor raised its error flag; carries ERROR_ID
    Sensor(u8),
}

impl<E> From<E> for Error<E> {
    fn from(e: E) -> Self {
        Error::I2c(e)
    }
}

pub struct Ccs811<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C, E> Ccs811<I2C>
where
    I2C: I2c<Error = E>,
{
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    /// Destroy driver instance, return the bus
    pub fn release(self) -> I2C {
        self.i2c
    }

    /// Checks the hardware id, leaves boot mode and starts measuring
    pub fn start<D: DelayNs>(&mut self, delay: &mut D, mode: DriveMode) -> Result<(), Error<E>> {
        let hw_id = self.read_register(Register::HwId)?;
        if hw_id != HW_ID {
            return Err(Error::UnexpectedHardwareId(hw_id));
        }

        if self.read_register(Register::Status)? & status::APP_VALID == 0 {
            return Err(Error::NoApplication);
        }

        self.i2c.write(self.address, &[Register::AppStart as u8])?;
        // Application needs a moment before it accepts MEAS_MODE
        delay.delay_ms(1);
        self.i2c
            .write(self.address, &[Register::MeasMode as u8, mode as u8])?;
        info!("CCS811 started");
        Ok(())
    }

    /// Reads the status register, surfacing the error flag as an error
    fn status(&mut self) -> Result<u8, Error<E>> {
        let value = self.read_register(Register::Status)?;
        if value & status::ERROR != 0 {
            let error_id = self.read_register(Register::ErrorId)?;
            return Err(Error::Sensor(error_id));
        }
        Ok(value)
    }

    fn read_register(&mut self, register: Register) -> Result<u8, E> {
        let mut data = [0u8; 1];
        self.i2c
            .write_read(self.address, &[register as u8], &mut data)?;
        Ok(data[0])
    }

    /// Reads eCO2 and tVOC from ALG_RESULT_DATA
    pub fn alg_result(&mut self) -> Result<GasReading, Error<E>> {
        let mut data = [0u8; 4];
        self.i2c
            .write_read(self.address, &[Register::AlgResultData as u8], &mut data)?;
        Ok(GasReading {
            eco2: u16::from_be_bytes([data[0], data[1]]),
            tvoc: u16::from_be_bytes([data[2], data[3]]),
        })
    }

    /// Writes ENV_DATA
    /// param humidity: percent relative humidity
    /// param temperature: degrees Celsius
    pub fn set_environment(&mut self, humidity: f32, temperature: f32) -> Result<(), Error<E>> {
        let humidity = encode_environment(humidity).to_be_bytes();
        let temperature = encode_environment(temperature + 25.).to_be_bytes();
        self.i2c.write(
            self.address,
            &[
                Register::EnvData as u8,
                humidity[0],
                humidity[1],
                temperature[0],
                temperature[1],
            ],
        )?;
        Ok(())
    }
}

/// ENV_DATA fields count in 1/512ths; out of range values saturate
fn encode_environment(value: f32) -> u16 {
    if value <= 0. {
        0
    } else if value >= 65535. / 512. {
        u16::MAX
    } else {
        (value * 512.) as u16
    }
}

impl<I2C, E> GasSensor for Ccs811<I2C>
where
    I2C: I2c<Error = E>,
    E: core::fmt::Debug,
{
    type Error = Error<E>;

    fn data_ready(&mut self) -> Result<bool, Self::Error> {
        Ok(self.status()? & status::DATA_READY != 0)
    }

    fn read(&mut self) -> Result<GasReading, Self::Error> {
        self.alg_result()
    }

    fn calibrate(&mut self, humidity: f32, temperature: f32) -> Result<(), Self::Error> {
        self.set_environment(humidity, temperature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal_mock::eh1::delay::NoopDelay;
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction};

    const ADDR: u8 = ADDRESS_HIGH;

    #[test]
    fn test_start() {
        let expectations = [
            Transaction::write_read(ADDR, vec![0x20], vec![0x81]),
            Transaction::write_read(ADDR, vec![0x00], vec![0x10]),
            Transaction::write(ADDR, vec![0xF4]),
            Transaction::write(ADDR, vec![0x01, 0x10]),
        ];
        let mut ccs = Ccs811::new(I2cMock::new(&expectations), ADDR);
        ccs.start(&mut NoopDelay::new(), DriveMode::EverySecond)
            .unwrap();
        ccs.release().done();
    }

    #[test]
    fn test_start_drive_modes_at_low_address() {
        for (mode, bits) in [
            (DriveMode::Idle, 0x00),
            (DriveMode::Every10Seconds, 0x20),
            (DriveMode::Every60Seconds, 0x30),
        ] {
            let expectations = [
                Transaction::write_read(ADDRESS_LOW, vec![0x20], vec![0x81]),
                Transaction::write_read(ADDRESS_LOW, vec![0x00], vec![0x10]),
                Transaction::write(ADDRESS_LOW, vec![0xF4]),
                Transaction::write(ADDRESS_LOW, vec![0x01, bits]),
            ];
            let mut ccs = Ccs811::new(I2cMock::new(&expectations), ADDRESS_LOW);
            ccs.start(&mut NoopDelay::new(), mode).unwrap();
            ccs.release().done();
        }
    }

    #[test]
    fn test_start_wrong_device() {
        let expectations = [Transaction::write_read(ADDR, vec![0x20], vec![0x60])];
        let mut ccs = Ccs811::new(I2cMock::new(&expectations), ADDR);
        let result = ccs.start(&mut NoopDelay::new(), DriveMode::EverySecond);
        assert_eq!(result, Err(Error::UnexpectedHardwareId(0x60)));
        ccs.release().done();
    }

    #[test]
    fn test_start_without_application() {
        let expectations = [
            Transaction::write_read(ADDR, vec![0x20], vec![0x81]),
            Transaction::write_read(ADDR, vec![0x00], vec![0x00]),
        ];
        let mut ccs = Ccs811::new(I2cMock::new(&expectations), ADDR);
        let result = ccs.start(&mut NoopDelay::new(), DriveMode::EverySecond);
        assert_eq!(result, Err(Error::NoApplication));
        ccs.release().done();
    }

    #[test]
    fn test_data_ready() {
        let expectations = [
            Transaction::write_read(ADDR, vec![0x00], vec![0x98]),
            Transaction::write_read(ADDR, vec![0x00], vec![0x90]),
        ];
        let mut ccs = Ccs811::new(I2cMock::new(&expectations), ADDR);
        assert!(ccs.data_ready().unwrap());
        assert!(!ccs.data_ready().unwrap());
        ccs.release().done();
    }

    #[test]
    fn test_error_flag_reads_error_id() {
        let expectations = [
            Transaction::write_read(ADDR, vec![0x00], vec![0x91]),
            Transaction::write_read(ADDR, vec![0xE0], vec![0x04]),
        ];
        let mut ccs = Ccs811::new(I2cMock::new(&expectations), ADDR);
        assert_eq!(ccs.data_ready(), Err(Error::Sensor(0x04)));
        ccs.release().done();
    }

    #[test]
    fn test_read() {
        let expectations = [Transaction::write_read(
            ADDR,
            vec![0x02],
            vec![0x01, 0xC2, 0x00, 0x0C],
        )];
        let mut ccs = Ccs811::new(I2cMock::new(&expectations), ADDR);
        assert_eq!(ccs.read().unwrap(), GasReading { eco2: 450, tvoc: 12 });
        ccs.release().done();
    }

    #[test]
    fn test_calibrate() {
        // 48.5 %RH -> 0x6100, 25 C -> 50 * 512 = 0x6400
        let expectations = [Transaction::write(
            ADDR,
            vec![0x05, 0x61, 0x00, 0x64, 0x00],
        )];
        let mut ccs = Ccs811::new(I2cMock::new(&expectations), ADDR);
        ccs.calibrate(48.5, 25.).unwrap();
        ccs.release().done();
    }

    #[test]
    fn test_encode_environment_saturates() {
        assert_eq!(encode_environment(-30.), 0);
        assert_eq!(encode_environment(200.), u16::MAX);
        assert_eq!(encode_environment(0.5), 256);
    }
}
