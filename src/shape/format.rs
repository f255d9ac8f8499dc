// Formatting contract for scalar values

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Utc};
use std::fmt::{self, Write};
use url::Url;
use uuid::Uuid;

/// How a scalar value turns into text inside a URI.
///
/// `format_with` receives the specifier written after `|` in a placeholder.
/// The default implementation ignores it, which is what types without a
/// formatting contract want. Returning `Err` rejects the specifier; the
/// message ends up in [`TemplateError::Format`](crate::TemplateError::Format).
pub trait FormatValue {
    fn to_uri_string(&self) -> String;

    fn format_with(&self, spec: &str) -> Result<String, String> {
        let _ = spec;
        Ok(self.to_uri_string())
    }
}

macro_rules! plain_format_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FormatValue for $ty {
                fn to_uri_string(&self) -> String {
                    self.to_string()
                }
            }
        )*
    };
}

plain_format_value!(String, &'static str, char, bool);

macro_rules! integer_format_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FormatValue for $ty {
                fn to_uri_string(&self) -> String {
                    self.to_string()
                }

                fn format_with(&self, spec: &str) -> Result<String, String> {
                    format_integer(self, spec)
                }
            }
        )*
    };
}

integer_format_value!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize);

macro_rules! float_format_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FormatValue for $ty {
                fn to_uri_string(&self) -> String {
                    self.to_string()
                }

                fn format_with(&self, spec: &str) -> Result<String, String> {
                    format_float(self, spec)
                }
            }
        )*
    };
}

float_format_value!(f32, f64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Radix {
    Decimal,
    LowerHex,
    UpperHex,
    Octal,
    Binary,
}

/// Largest padding width or float precision a specifier may ask for
const MAX_WIDTH: usize = 255;

/// `[0][width][d|x|X|o|b]`
#[derive(Debug, PartialEq, Eq)]
struct IntegerSpec {
    zero_pad: bool,
    width: usize,
    radix: Radix,
}

impl IntegerSpec {
    fn parse(spec: &str) -> Result<Self, String> {
        let unsupported = || format!("unsupported integer format '{}'", spec);
        if spec.is_empty() {
            return Err(unsupported());
        }

        let (radix, digits) = match spec.chars().last() {
            Some('d') => (Radix::Decimal, &spec[..spec.len() - 1]),
            Some('x') => (Radix::LowerHex, &spec[..spec.len() - 1]),
            Some('X') => (Radix::UpperHex, &spec[..spec.len() - 1]),
            Some('o') => (Radix::Octal, &spec[..spec.len() - 1]),
            Some('b') => (Radix::Binary, &spec[..spec.len() - 1]),
            _ => (Radix::Decimal, spec),
        };

        if !digits.chars().all(|ch| ch.is_ascii_digit()) {
            return Err(unsupported());
        }

        let zero_pad = digits.starts_with('0');
        let width = if digits.is_empty() {
            0
        } else {
            digits.parse::<usize>().map_err(|_| unsupported())?
        };
        if width > MAX_WIDTH {
            return Err(format!(
                "unsupported integer format '{}' (width is limited to {})",
                spec, MAX_WIDTH
            ));
        }

        Ok(Self {
            zero_pad,
            width,
            radix,
        })
    }
}

fn format_integer<T>(value: &T, spec: &str) -> Result<String, String>
where
    T: fmt::Display + fmt::LowerHex + fmt::UpperHex + fmt::Octal + fmt::Binary,
{
    let IntegerSpec {
        zero_pad,
        width: w,
        radix,
    } = IntegerSpec::parse(spec)?;

    Ok(match (radix, zero_pad) {
        (Radix::Decimal, true) => format!("{:0w$}", value),
        (Radix::Decimal, false) => format!("{:w$}", value),
        (Radix::LowerHex, true) => format!("{:0w$x}", value),
        (Radix::LowerHex, false) => format!("{:w$x}", value),
        (Radix::UpperHex, true) => format!("{:0w$X}", value),
        (Radix::UpperHex, false) => format!("{:w$X}", value),
        (Radix::Octal, true) => format!("{:0w$o}", value),
        (Radix::Octal, false) => format!("{:w$o}", value),
        (Radix::Binary, true) => format!("{:0w$b}", value),
        (Radix::Binary, false) => format!("{:w$b}", value),
    })
}

/// `.N` fixed precision, or `e` / `E` exponent form
fn format_float<T>(value: &T, spec: &str) -> Result<String, String>
where
    T: fmt::Display + fmt::LowerExp + fmt::UpperExp,
{
    match spec {
        "e" => Ok(format!("{:e}", value)),
        "E" => Ok(format!("{:E}", value)),
        _ => {
            let precision = spec
                .strip_prefix('.')
                .and_then(|digits| digits.parse::<usize>().ok())
                .ok_or_else(|| format!("unsupported float format '{}'", spec))?;
            if precision > MAX_WIDTH {
                return Err(format!(
                    "unsupported float format '{}' (precision is limited to {})",
                    spec, MAX_WIDTH
                ));
            }
            Ok(format!("{:.precision$}", value))
        }
    }
}

fn format_delayed(formatted: impl fmt::Display, spec: &str) -> Result<String, String> {
    let mut out = String::new();
    write!(out, "{}", formatted).map_err(|_| format!("invalid strftime format '{}'", spec))?;
    Ok(out)
}

impl FormatValue for DateTime<Utc> {
    fn to_uri_string(&self) -> String {
        self.to_rfc3339()
    }

    fn format_with(&self, spec: &str) -> Result<String, String> {
        format_delayed(self.format(spec), spec)
    }
}

impl FormatValue for DateTime<FixedOffset> {
    fn to_uri_string(&self) -> String {
        self.to_rfc3339()
    }

    fn format_with(&self, spec: &str) -> Result<String, String> {
        format_delayed(self.format(spec), spec)
    }
}

impl FormatValue for NaiveDate {
    fn to_uri_string(&self) -> String {
        self.to_string()
    }

    fn format_with(&self, spec: &str) -> Result<String, String> {
        format_delayed(self.format(spec), spec)
    }
}

impl FormatValue for NaiveDateTime {
    fn to_uri_string(&self) -> String {
        self.format("%Y-%m-%dT%H:%M:%S%.f").to_string()
    }

    fn format_with(&self, spec: &str) -> Result<String, String> {
        format_delayed(self.format(spec), spec)
    }
}

impl FormatValue for Uuid {
    fn to_uri_string(&self) -> String {
        self.hyphenated().to_string()
    }

    fn format_with(&self, spec: &str) -> Result<String, String> {
        match spec {
            "simple" => Ok(self.simple().to_string()),
            "hyphenated" => Ok(self.hyphenated().to_string()),
            "urn" => Ok(self.urn().to_string()),
            "braced" => Ok(self.braced().to_string()),
            other => Err(format!(
                "unsupported uuid format '{}' (expected simple, hyphenated, urn or braced)",
                other
            )),
        }
    }
}

impl FormatValue for Url {
    fn to_uri_string(&self) -> String {
        self.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_integer_spec_parse() {
        assert_eq!(
            IntegerSpec::parse("08").unwrap(),
            IntegerSpec {
                zero_pad: true,
                width: 8,
                radix: Radix::Decimal
            }
        );
        assert_eq!(
            IntegerSpec::parse("X").unwrap(),
            IntegerSpec {
                zero_pad: false,
                width: 0,
                radix: Radix::UpperHex
            }
        );
        assert!(IntegerSpec::parse("").is_err());
        assert!(IntegerSpec::parse("upper").is_err());
        assert!(IntegerSpec::parse("4.2").is_err());
    }

    #[test]
    fn test_integer_formats() {
        assert_eq!(255u8.format_with("x").unwrap(), "ff");
        assert_eq!(255u32.format_with("04X").unwrap(), "00FF");
        assert_eq!(5i64.format_with("03").unwrap(), "005");
        assert_eq!(8u16.format_with("o").unwrap(), "10");
        assert_eq!(5u8.format_with("08b").unwrap(), "00000101");
        assert_eq!(42usize.format_with("d").unwrap(), "42");
    }

    #[test]
    fn test_integer_rejects_unknown_format() {
        let err = 42u32.format_with("upper").unwrap_err();
        assert!(err.contains("unsupported integer format 'upper'"));
    }

    #[test]
    fn test_integer_width_is_bounded() {
        assert_eq!(7u8.format_with("0255").unwrap().len(), 255);
        let err = 1u32.format_with("0200000").unwrap_err();
        assert!(err.contains("width is limited to 255"));
        assert!(IntegerSpec::parse("99999999999999999999999").is_err());
    }

    #[test]
    fn test_float_precision_is_bounded() {
        assert!(1.0f64.format_with(".255").is_ok());
        let err = 1.0f64.format_with(".99999").unwrap_err();
        assert!(err.contains("precision is limited to 255"));
    }

    #[test]
    fn test_float_formats() {
        assert_eq!(3.14159f64.format_with(".2").unwrap(), "3.14");
        assert_eq!(1500.0f64.format_with("e").unwrap(), "1.5e3");
        assert!(1.0f32.format_with("x").is_err());
        assert_eq!(2.5f32.to_uri_string(), "2.5");
    }

    #[test]
    fn test_strings_ignore_format() {
        assert_eq!("abc".to_string().format_with("upper").unwrap(), "abc");
        assert_eq!(true.format_with("x").unwrap(), "true");
    }

    #[test]
    fn test_datetime_formats() {
        let when = Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 0).unwrap();
        assert_eq!(when.to_uri_string(), "2024-03-09T14:05:00+00:00");
        assert_eq!(when.format_with("%Y-%m-%d").unwrap(), "2024-03-09");
    }

    #[test]
    fn test_naive_date_formats() {
        let day = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        assert_eq!(day.to_uri_string(), "2024-01-02");
        assert_eq!(day.format_with("%d.%m.%Y").unwrap(), "02.01.2024");
    }

    #[test]
    fn test_uuid_formats() {
        let id = Uuid::parse_str("67e55044-10b1-426f-9247-bb680e5fe0c8").unwrap();
        assert_eq!(id.to_uri_string(), "67e55044-10b1-426f-9247-bb680e5fe0c8");
        assert_eq!(id.format_with("simple").unwrap(), "67e5504410b1426f9247bb680e5fe0c8");
        assert_eq!(
            id.format_with("urn").unwrap(),
            "urn:uuid:67e55044-10b1-426f-9247-bb680e5fe0c8"
        );
        assert!(id.format_with("base64").is_err());
    }

    #[test]
    fn test_url_uses_serialization() {
        let url = Url::parse("https://example.com/a b").unwrap();
        assert_eq!(url.to_uri_string(), "https://example.com/a%20b");
    }
}
