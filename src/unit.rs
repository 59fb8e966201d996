use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{ParseError, ParseErrorKind};

/// `sign? magnitude unit`, where the unit is any two lowercase letters.
/// Whether the unit is one that can actually be laid out is not decided here.
pub(crate) static SIZE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([-+]?) *(\d+(?:\.\d*)?|\.\d+) *([a-z]{2})$").unwrap());

/// A signed magnitude paired with a two letter unit code, like `-3.5em`
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    pub number: f64,
    pub unit: String,
}
impl Measurement {
    pub fn new(number: f64, unit: impl Into<String>) -> Measurement {
        Measurement {
            number,
            unit: unit.into(),
        }
    }
}

/// Parse a dimension string such as `"3em"` or `"-.5 pt"`.
///
/// Only the syntax is checked: `"3zz"` is accepted while `"3"` fails with
/// [`ParseErrorKind::InvalidSize`].
pub fn parse_measurement(text: &str) -> Result<Measurement, ParseError> {
    let Some(captures) = SIZE_REGEX.captures(text.trim()) else {
        return Err(ParseErrorKind::InvalidSize(text.to_string()).into());
    };

    let sign = captures.get(1).map_or("", |m| m.as_str());
    let magnitude = captures.get(2).map_or("", |m| m.as_str());
    let unit = captures.get(3).map_or("", |m| m.as_str());

    // A leading '.' like ".5" is valid for f64 parsing, a trailing "5." is as well
    let number = format!("{sign}{magnitude}")
        .parse::<f64>()
        .map_err(|_| ParseError::new(ParseErrorKind::InvalidSize(text.to_string())))?;

    Ok(Measurement::new(number, unit))
}

#[cfg(test)]
mod tests {
    use super::{parse_measurement, Measurement};
    use crate::error::{ErrorCategory, ParseErrorKind};

    #[test]
    fn signed_decimal() {
        assert_eq!(parse_measurement("-3.5em").unwrap(), Measurement::new(-3.5, "em"));
        assert_eq!(parse_measurement("3em").unwrap(), Measurement::new(3.0, "em"));
        assert_eq!(parse_measurement("+.5 pt").unwrap(), Measurement::new(0.5, "pt"));
        assert_eq!(parse_measurement("2.mm").unwrap(), Measurement::new(2.0, "mm"));
    }

    #[test]
    fn unit_is_not_checked() {
        let m = parse_measurement("1zz").unwrap();
        assert_eq!(m, Measurement::new(1.0, "zz"));
    }

    #[test]
    fn missing_unit() {
        let err = parse_measurement("3").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::InvalidSize("3".to_string()));
        assert_eq!(err.category(), ErrorCategory::Semantic);

        assert!(parse_measurement("em").is_err());
        assert!(parse_measurement("3e").is_err());
    }
}
