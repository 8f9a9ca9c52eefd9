//! Unit conversion utilities
//!
//! Box dimensions are generated in millimetres. Inputs may arrive in inches,
//! including fractional notation such as `"1 1/2"`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const MM_PER_INCH: f64 = 25.4;

/// Measurement system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeasurementSystem {
    /// Metric system (mm)
    #[default]
    #[serde(alias = "mm")]
    Metric,
    /// Imperial system (inches)
    #[serde(alias = "in", alias = "inch")]
    Imperial,
}

impl MeasurementSystem {
    /// Convert a value expressed in this system to millimetres.
    pub fn to_mm(self, value: f64) -> f64 {
        match self {
            Self::Metric => value,
            Self::Imperial => value * MM_PER_INCH,
        }
    }

    /// Convert a millimetre value into this system.
    pub fn from_mm(self, value_mm: f64) -> f64 {
        match self {
            Self::Metric => value_mm,
            Self::Imperial => value_mm / MM_PER_INCH,
        }
    }

    /// Unit label ("mm" or "in")
    pub fn label(self) -> &'static str {
        match self {
            Self::Metric => "mm",
            Self::Imperial => "in",
        }
    }
}

impl fmt::Display for MeasurementSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Metric => write!(f, "Metric"),
            Self::Imperial => write!(f, "Imperial"),
        }
    }
}

impl FromStr for MeasurementSystem {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "metric" | "mm" => Ok(Self::Metric),
            "imperial" | "inch" | "in" => Ok(Self::Imperial),
            _ => Err(format!("Unknown measurement system: {}", s)),
        }
    }
}

/// Format length value for display
///
/// * `value_mm` - Value in millimeters
/// * `system` - Target measurement system
pub fn format_length(value_mm: f64, system: MeasurementSystem) -> String {
    format!("{:.3}", system.from_mm(value_mm))
}

/// Parse length string to millimeters
///
/// * `input` - String to parse
/// * `system` - Assumed measurement system
pub fn parse_length(input: &str, system: MeasurementSystem) -> Result<f64, String> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(0.0);
    }

    match system {
        MeasurementSystem::Metric => input.parse::<f64>().map_err(|e| e.to_string()),
        MeasurementSystem::Imperial => {
            if !input.contains('/') {
                let inches = input.parse::<f64>().map_err(|e| e.to_string())?;
                return Ok(system.to_mm(inches));
            }

            let mut total_inches = 0.0;
            for part in input.split_whitespace() {
                if part.contains('/') {
                    let frac_parts: Vec<&str> = part.split('/').collect();
                    if frac_parts.len() != 2 {
                        return Err("Invalid fraction format".to_string());
                    }
                    let num = frac_parts[0]
                        .parse::<f64>()
                        .map_err(|_| "Invalid numerator".to_string())?;
                    let den = frac_parts[1]
                        .parse::<f64>()
                        .map_err(|_| "Invalid denominator".to_string())?;
                    if den == 0.0 {
                        return Err("Division by zero".to_string());
                    }
                    total_inches += num / den;
                } else {
                    total_inches += part
                        .parse::<f64>()
                        .map_err(|_| "Invalid number part".to_string())?;
                }
            }
            Ok(system.to_mm(total_inches))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_metric_conversion() {
        assert_eq!(format_length(10.5, MeasurementSystem::Metric), "10.500");
        assert!(close(parse_length("10.5", MeasurementSystem::Metric).unwrap(), 10.5));
    }

    #[test]
    fn test_imperial_decimal() {
        assert_eq!(format_length(25.4, MeasurementSystem::Imperial), "1.000");
        assert!(close(parse_length("1", MeasurementSystem::Imperial).unwrap(), 25.4));
        assert_eq!(format_length(12.7, MeasurementSystem::Imperial), "0.500");
        assert!(close(parse_length("0.5", MeasurementSystem::Imperial).unwrap(), 12.7));
    }

    #[test]
    fn test_imperial_fraction() {
        assert!(close(parse_length("1 1/2", MeasurementSystem::Imperial).unwrap(), 38.1));
        assert!(close(parse_length("5 1/8", MeasurementSystem::Imperial).unwrap(), 130.175));
        assert!(close(parse_length("1/4", MeasurementSystem::Imperial).unwrap(), 6.35));
        assert!(close(parse_length("  1  1/2  ", MeasurementSystem::Imperial).unwrap(), 38.1));
    }

    #[test]
    fn test_system_round_trip() {
        let sys = MeasurementSystem::Imperial;
        assert!(close(sys.from_mm(sys.to_mm(3.25)), 3.25));
        assert_eq!(MeasurementSystem::Metric.to_mm(7.0), 7.0);
        assert_eq!(sys.label(), "in");
        assert_eq!("mm".parse::<MeasurementSystem>(), Ok(MeasurementSystem::Metric));
        assert!("furlong".parse::<MeasurementSystem>().is_err());
    }

    #[test]
    fn test_zero_and_invalid_inputs() {
        assert_eq!(parse_length("", MeasurementSystem::Metric).unwrap(), 0.0);
        assert_eq!(parse_length("0", MeasurementSystem::Imperial).unwrap(), 0.0);
        assert!(parse_length("abc", MeasurementSystem::Metric).is_err());
        assert!(parse_length("1/0", MeasurementSystem::Imperial).is_err());
        assert!(parse_length("1/2/3", MeasurementSystem::Imperial).is_err());
    }
}
