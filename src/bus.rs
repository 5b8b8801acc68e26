use embedded_hal::i2c::I2c;
use heapless::Vec;

/// Addresses below and above this range are reserved by the I2C standard
pub const SCAN_RANGE: core::ops::RangeInclusive<u8> = 0x08..=0x77;

/// Found device addresses; a hobby bus rarely carries more
pub type Devices = Vec<u8, 16>;

/// Tries a one byte read at every non-reserved 7-bit address
/// returns the addresses that acknowledged, in ascending order
pub fn scan<I2C: I2c>(i2c: &mut I2C) -> Devices {
    let mut devices = Devices::new();
    let mut buffer = [0u8; 1];
    for address in SCAN_RANGE {
        if i2c.read(address, &mut buffer).is_ok() {
            info!("I2C device at {=u8:#x}", address);
            if devices.push(address).is_err() {
                warn!("Too many I2C devices, stopping scan");
                break;
            }
        }
    }
    devices
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::i2c::{ErrorKind, NoAcknowledgeSource};
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction};

    #[test]
    fn test_scan_finds_board_devices() {
        let present = [0x3C, 0x5B, 0x77];
        let expectations: std::vec::Vec<Transaction> = SCAN_RANGE
            .map(|address| {
                let transaction = Transaction::read(address, vec![0]);
                if present.contains(&address) {
                    transaction
                } else {
                    transaction.with_error(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address))
                }
            })
            .collect();
        let mut i2c = I2cMock::new(&expectations);

        let devices = scan(&mut i2c);
        assert_eq!(devices.as_slice(), &present);
        i2c.done();
    }
}
