//! Text representation of formatted keyword elements
//!
//! Floats and doubles are written as `0.dddd...{E|D}+pp` with the mantissa
//! normalized into [0.1, 1.0). The `D` exponent marker is not understood by
//! Rust float parsing, so values are rebuilt as `mantissa * 10^exponent`.

use crate::data_type::DataType;
use crate::error::{EclError, Result};

/// Split `x` into a mantissa in [0.1, 1.0) (by magnitude) and a power of ten
///
/// Zero maps to `(0.0, 0)`. Non-finite values are passed through with a zero
/// exponent.
pub fn normalize_scientific(x: f64) -> (f64, i32) {
    if x == 0.0 || !x.is_finite() {
        return (if x == 0.0 { 0.0 } else { x }, 0);
    }
    let mut power = x.abs().log10().ceil() as i32;
    let mut mantissa = x / 10f64.powi(power);
    if mantissa.abs() >= 1.0 {
        mantissa *= 0.1;
        power += 1;
    } else if mantissa.abs() < 0.1 {
        mantissa *= 10.0;
        power -= 1;
    }
    (mantissa, power)
}

/// `  0.dddddddd E+pp` with 8 decimals, as written for REAL data
pub fn format_float(value: f32) -> String {
    let (mantissa, power) = normalize_scientific(value as f64);
    format!("  {:11.8}E{:+03}", mantissa, power)
}

/// `  0.dddddddddddddd D+pp` with 14 decimals, as written for DOUB data
pub fn format_double(value: f64) -> String {
    let (mantissa, power) = normalize_scientific(value);
    format!("  {:17.14}D{:+03}", mantissa, power)
}

/// Right-justified integer field
pub fn format_int(value: i32) -> String {
    format!("{:12}", value)
}

/// `  T` or `  F`
pub fn format_bool(value: bool) -> String {
    format!("  {}", if value { 'T' } else { 'F' })
}

/// `'text'` blank-padded to `width`, embedded quotes doubled
pub fn quote(text: &str, width: usize) -> String {
    let padded = format!("{:<width$}", text, width = width);
    format!("'{}'", padded.replace('\'', "''"))
}

/// Quoted, blank-padded string field of the element width
pub fn format_string(value: &[u8], width: usize) -> String {
    let text = String::from_utf8_lossy(value);
    format!(" {}", quote(text.trim_end_matches('\0'), width))
}

/// Parse a number written with an `E`, `D` (either case) or no exponent marker
pub fn parse_scientific(token: &str) -> Result<f64> {
    let token = token.trim();
    let marker = token
        .char_indices()
        .skip(1)
        .find(|(_, c)| matches!(c, 'E' | 'e' | 'D' | 'd'))
        .map(|(i, _)| i);

    let Some(marker) = marker else {
        return token
            .parse::<f64>()
            .map_err(|e| EclError::data_read(format!("invalid number '{}': {}", token, e)));
    };

    let mantissa = token[..marker]
        .parse::<f64>()
        .map_err(|e| EclError::data_read(format!("invalid mantissa in '{}': {}", token, e)))?;
    let exponent = token[marker + 1..]
        .parse::<i32>()
        .map_err(|e| EclError::data_read(format!("invalid exponent in '{}': {}", token, e)))?;
    Ok(mantissa * 10f64.powi(exponent))
}

/// Parse an integer token
pub fn parse_int(token: &str) -> Result<i32> {
    token
        .trim()
        .parse::<i32>()
        .map_err(|e| EclError::data_read(format!("invalid integer '{}': {}", token, e)))
}

/// Parse a `T`/`F` token
pub fn parse_bool(token: &str) -> Result<bool> {
    match token.trim().chars().next() {
        Some('T') | Some('t') => Ok(true),
        Some('F') | Some('f') => Ok(false),
        _ => Err(EclError::data_read(format!("invalid logical '{}'", token))),
    }
}

/// Text for one element slot of a payload in host byte order
pub fn format_element(data_type: DataType, slot: &[u8]) -> String {
    use crate::keyword::Element;
    match data_type {
        DataType::Int => format_int(i32::read_ne(slot)),
        DataType::Float => format_float(f32::read_ne(slot)),
        DataType::Double => format_double(f64::read_ne(slot)),
        DataType::Bool => format_bool(bool::read_ne(slot)),
        DataType::Char | DataType::String(_) | DataType::Message => {
            format_string(slot, data_type.element_size())
        }
    }
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)] // Test code - unwrap is acceptable
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize_scientific(0.0), (0.0, 0));
        assert_eq!(normalize_scientific(1.0), (0.1, 1));
        assert_eq!(normalize_scientific(1000.0), (0.1, 4));
        assert_eq!(normalize_scientific(-2.5), (-0.25, 1));

        let (m, p) = normalize_scientific(0.001);
        assert!((m - 0.1).abs() < 1e-12);
        assert_eq!(p, -2);

        for x in [3.7e-9, 0.5, 9.99, 12345.678, -6.02e23] {
            let (m, p) = normalize_scientific(x);
            assert!(m.abs() >= 0.1 && m.abs() < 1.0, "{} -> {}", x, m);
            assert!(((m * 10f64.powi(p)) - x).abs() <= x.abs() * 1e-14);
        }
    }

    #[test]
    fn test_format_float() {
        assert_eq!(format_float(1.0), "   0.10000000E+01");
        assert_eq!(format_float(0.0), "   0.00000000E+00");
        assert_eq!(format_float(-2.5), "  -0.25000000E+01");
        assert_eq!(format_float(0.0009765625), "   0.97656250E-03");
    }

    #[test]
    fn test_format_double() {
        assert_eq!(format_double(1.0), "   0.10000000000000D+01");
        assert_eq!(format_double(-250.5), "  -0.25050000000000D+03");
    }

    #[test]
    fn test_format_other_fields() {
        assert_eq!(format_int(42), "          42");
        assert_eq!(format_int(-7), "          -7");
        assert_eq!(format_bool(true), "  T");
        assert_eq!(format_bool(false), "  F");
        assert_eq!(format_string(b"OP_1    ", 8), " 'OP_1    '");
        assert_eq!(format_string(b"AB", 4), " 'AB  '");
        assert_eq!(format_string(b"O'BRIEN ", 8), " 'O''BRIEN '");
    }

    #[test]
    fn test_parse_scientific() {
        assert_eq!(parse_scientific("0.10000000E+01").unwrap(), 1.0);
        assert_eq!(parse_scientific("0.25D+01").unwrap(), 2.5);
        assert_eq!(parse_scientific("-0.5d-01").unwrap(), -0.05);
        assert_eq!(parse_scientific("0.00000000E+00").unwrap(), 0.0);
        assert_eq!(parse_scientific("17.5").unwrap(), 17.5);
        assert!(parse_scientific("0.1E").is_err());
        assert!(parse_scientific("abc").is_err());
    }

    #[test]
    fn test_parse_int_and_bool() {
        assert_eq!(parse_int("  -12").unwrap(), -12);
        assert!(parse_int("1.5").is_err());
        assert!(parse_bool("T").unwrap());
        assert!(!parse_bool("F").unwrap());
        assert!(parse_bool("X").is_err());
    }

    #[test]
    fn test_format_then_parse_double_precision() {
        for x in [123.456789012345, -0.000314159265358979, 6.02214076e23] {
            let text = format_double(x);
            let parsed = parse_scientific(text.trim()).unwrap();
            assert!((parsed - x).abs() <= x.abs() * 1e-13, "{} -> {}", x, text);
        }
    }
}
