//! Conversion between spreadsheet date serials and `chrono` date-times
//!
//! Serial numbers count days since an epoch, with the fractional part
//! holding the time of day. The 1900 system uses an epoch of 1899-12-30 so
//! that serial 60 lands on the phantom 1900-02-29 Lotus bug day; serials
//! from 61 onwards map to real calendar dates.

use chrono::{Duration, NaiveDate, NaiveDateTime};

const MS_PER_DAY: f64 = 86_400_000.0;

fn epoch(date_1904: bool) -> NaiveDateTime {
    let (y, m, d) = if date_1904 { (1904, 1, 1) } else { (1899, 12, 30) };
    NaiveDate::from_ymd_opt(y, m, d)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .unwrap_or_default()
}

/// Convert a date serial into a date-time, rounding to the millisecond
///
/// Returns `None` for negative or non-finite serials.
pub fn serial_to_datetime(serial: f64, date_1904: bool) -> Option<NaiveDateTime> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }
    let ms = (serial * MS_PER_DAY).round();
    if ms > i64::MAX as f64 {
        return None;
    }
    epoch(date_1904).checked_add_signed(Duration::milliseconds(ms as i64))
}

/// Convert a date-time into a 1900-system date serial
pub fn datetime_to_serial(dt: NaiveDateTime) -> f64 {
    let elapsed = dt.signed_duration_since(epoch(false));
    elapsed.num_milliseconds() as f64 / MS_PER_DAY
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd_hms(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    #[test]
    fn test_known_serials() {
        assert_eq!(
            serial_to_datetime(45000.0, false),
            Some(ymd_hms(2023, 3, 15, 0, 0, 0))
        );
        assert_eq!(
            serial_to_datetime(45000.5, false),
            Some(ymd_hms(2023, 3, 15, 12, 0, 0))
        );
        assert_eq!(
            serial_to_datetime(0.0, true),
            Some(ymd_hms(1904, 1, 1, 0, 0, 0))
        );
        assert_eq!(serial_to_datetime(-1.0, false), None);
        assert_eq!(serial_to_datetime(f64::NAN, false), None);
    }

    #[test]
    fn test_serial_round_trip() {
        let dt = ymd_hms(2024, 2, 29, 18, 45, 30);
        let serial = datetime_to_serial(dt);
        assert_eq!(serial_to_datetime(serial, false), Some(dt));
    }
}
