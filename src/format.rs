use heapless::String;
use ufmt::{uDisplay, uWrite, uwrite, Formatter};

use crate::clock::Seconds;

/// Large enough for any `Seconds` value rendered as HH:MM:SS
pub type TimeText = String<24>;

/// Formats seconds as HH:MM:SS
/// Each field is zero padded to two digits, hours may grow past two digits
/// param seconds: total seconds, zero and negative values are not special-cased
pub fn format_hhmmss(seconds: Seconds) -> TimeText {
    let (hours, minutes, secs) = split(seconds);
    let mut text = TimeText::new();
    // Capacity covers the whole i64 range
    let _ = uwrite!(text, "{}:{}:{}", Padded(hours), Padded(minutes), Padded(secs));
    text
}

/// Formats seconds as MM:SS, dropping the hour field entirely
/// Only used for the warmup countdown, which never exceeds 20 minutes
pub fn format_mmss(seconds: Seconds) -> TimeText {
    let (_, minutes, secs) = split(seconds);
    let mut text = TimeText::new();
    let _ = uwrite!(text, "{}:{}", Padded(minutes), Padded(secs));
    text
}

/// Floor division into (hours, minutes, seconds)
fn split(seconds: Seconds) -> (Seconds, Seconds, Seconds) {
    let hours = seconds.div_euclid(3600);
    let rest = seconds.rem_euclid(3600);
    (hours, rest / 60, rest % 60)
}

/// Pads a number with a zero before it if it is a single digit
/// Negative numbers keep their sign and are not padded
struct Padded(Seconds);

impl uDisplay for Padded {
    fn fmt<W>(&self, f: &mut Formatter<'_, W>) -> Result<(), W::Error>
    where
        W: uWrite + ?Sized,
    {
        if (0..10).contains(&self.0) {
            uwrite!(f, "0{}", self.0)
        } else {
            uwrite!(f, "{}", self.0)
        }
    }
}

/// A fixed-point value in hundredths, displayed like a float rounded to two
/// decimals: `2150` prints as `21.5`, `2000` as `20.0`, `4461` as `44.61`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Centi(pub i32);

impl uDisplay for Centi {
    fn fmt<W>(&self, f: &mut Formatter<'_, W>) -> Result<(), W::Error>
    where
        W: uWrite + ?Sized,
    {
        if self.0 < 0 {
            f.write_str("-")?;
        }
        let magnitude = self.0.unsigned_abs();
        let whole = magnitude / 100;
        let tenths = magnitude / 10 % 10;
        let hundredths = magnitude % 10;
        if hundredths == 0 {
            uwrite!(f, "{}.{}", whole, tenths)
        } else {
            uwrite!(f, "{}.{}{}", whole, tenths, hundredths)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn centi(value: i32) -> String<16> {
        let mut text = String::new();
        uwrite!(text, "{}", Centi(value)).unwrap();
        text
    }

    #[test]
    fn test_hhmmss() {
        assert_eq!(format_hhmmss(3661).as_str(), "01:01:01");
        assert_eq!(format_hhmmss(59).as_str(), "00:00:59");
        assert_eq!(format_hhmmss(0).as_str(), "00:00:00");
        assert_eq!(format_hhmmss(1200).as_str(), "00:20:00");
    }

    #[test]
    fn test_hhmmss_long_uptime() {
        // 4 days, 3 hours
        assert_eq!(format_hhmmss(99 * 3600 + 59 * 60 + 59).as_str(), "99:59:59");
        assert_eq!(format_hhmmss(100 * 3600).as_str(), "100:00:00");
    }

    #[test]
    fn test_hhmmss_negative() {
        assert_eq!(format_hhmmss(-5).as_str(), "-1:59:55");
    }

    #[test]
    fn test_mmss() {
        assert_eq!(format_mmss(1200).as_str(), "20:00");
        assert_eq!(format_mmss(0).as_str(), "00:00");
        assert_eq!(format_mmss(1198).as_str(), "19:58");
        assert_eq!(format_mmss(9).as_str(), "00:09");
    }

    #[test]
    fn test_mmss_drops_hours() {
        assert_eq!(format_mmss(3661).as_str(), "01:01");
    }

    #[test]
    fn test_centi() {
        assert_eq!(centi(2345).as_str(), "23.45");
        assert_eq!(centi(2150).as_str(), "21.5");
        assert_eq!(centi(2000).as_str(), "20.0");
        assert_eq!(centi(5).as_str(), "0.05");
        assert_eq!(centi(101325).as_str(), "1013.25");
    }

    #[test]
    fn test_centi_negative() {
        assert_eq!(centi(-512).as_str(), "-5.12");
        assert_eq!(centi(-5).as_str(), "-0.05");
        assert_eq!(centi(-1000).as_str(), "-10.0");
    }
}
