//! Text parsers for the built-in scalar targets.
use chrono::Duration;
use chrono::NaiveDate;
use chrono::NaiveDateTime;

/// Exact, case-sensitive `"True"` / `"False"`.
pub fn parse_boolean(text: &str) -> Option<bool> {
    match text {
        "True" => Some(true),
        "False" => Some(false),
        _ => None,
    }
}

/// Integer text, or numeric text without a fractional part (e.g. `"3.0"`).
pub fn parse_integer(text: &str) -> Option<i64> {
    let text = text.trim();
    if let Ok(integer) = text.parse::<i64>() {
        return Some(integer);
    }
    let number = text.parse::<f64>().ok()?;
    // i64::MAX is not exactly representable; 2^63 is the first value out of range
    if number.is_finite() && number.fract() == 0.0 && number >= i64::MIN as f64 && number < 9_223_372_036_854_775_808f64 {
        Some(number as i64)
    } else {
        None
    }
}

pub fn parse_float(text: &str) -> Option<f32> {
    text.trim().parse::<f32>().ok()
}

pub fn parse_double(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok()
}

/// Identity, except the literal `"null"` which means "no value".
pub fn parse_string(text: &str) -> Option<String> {
    if text == "null" {
        None
    } else {
        Some(text.to_owned())
    }
}

/// Excel 1900-system serial number or ISO `YYYY-MM-DD` text.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if let Ok(serial) = text.parse::<f64>() {
        return serial_to_date(serial);
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d").ok()
}

/// Excel 1900-system serial number or ISO date-time text.
pub fn parse_datetime(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    if let Ok(serial) = text.parse::<f64>() {
        let date = serial_to_date(serial)?;
        let milliseconds = (serial.fract() * 86_400_000f64).round() as i64;
        return date
            .and_hms_opt(0, 0, 0)
            .and_then(|midnight| midnight.checked_add_signed(Duration::milliseconds(milliseconds)));
    }
    NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .or_else(|| NaiveDate::parse_from_str(text, "%Y-%m-%d").ok()?.and_hms_opt(0, 0, 0))
}

/// Converts an Excel serial day number to a date.
/// Serials below 60 are shifted by a day to undo the Lotus 1-2-3 leap year bug.
fn serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 0.0 || serial > 2_958_465f64 {
        return None;
    }
    let days = serial.trunc() as i64;
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    epoch.checked_add_signed(Duration::days(days + if days < 60 { 1 } else { 0 }))
}
