//! Length and area units
//!
//! Formats measured distances for segment labels ("812.4 m", "1.25 km")
//! and parses lengths typed into a label back into metres.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Floating-point slack when comparing a length against the km threshold.
///
/// A segment built to be exactly 1000 m can measure 999.9999999999 m after
/// projection round-trips; it must still be labelled in kilometres.
pub const LENGTH_EPSILON_M: f64 = 1e-6;

/// Unit a length label is shown in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthUnit {
    /// Metres
    Meters,
    /// Kilometres
    Kilometers,
}

impl Default for LengthUnit {
    fn default() -> Self {
        Self::Meters
    }
}

impl LengthUnit {
    /// Number of metres in one of this unit
    pub fn meters_per_unit(self) -> f64 {
        match self {
            Self::Meters => 1.0,
            Self::Kilometers => 1000.0,
        }
    }

    /// Infer the unit from a rendered label such as `"1.25 km"`
    pub fn from_label(label: &str) -> Self {
        if label.trim_end().ends_with("km") {
            Self::Kilometers
        } else {
            Self::Meters
        }
    }
}

impl fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", get_unit_label(*self))
    }
}

impl FromStr for LengthUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "m" | "meter" | "meters" | "metre" | "metres" => Ok(Self::Meters),
            "km" | "kilometer" | "kilometers" | "kilometre" | "kilometres" => {
                Ok(Self::Kilometers)
            }
            _ => Err(format!("Unknown length unit: {}", s)),
        }
    }
}

/// Label formatting rules
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LengthFormat {
    /// Lengths at or above this many metres are shown in kilometres
    pub km_threshold_m: f64,
    /// Decimals for metre labels
    pub meter_decimals: usize,
    /// Decimals for kilometre labels
    pub km_decimals: usize,
}

impl Default for LengthFormat {
    fn default() -> Self {
        Self {
            km_threshold_m: 1000.0,
            meter_decimals: 1,
            km_decimals: 2,
        }
    }
}

impl LengthFormat {
    /// Unit a length will be labelled in
    pub fn unit_for(&self, length_m: f64) -> LengthUnit {
        if length_m >= self.km_threshold_m - LENGTH_EPSILON_M {
            LengthUnit::Kilometers
        } else {
            LengthUnit::Meters
        }
    }

    /// Format a length in metres for display
    pub fn format(&self, length_m: f64) -> String {
        match self.unit_for(length_m) {
            LengthUnit::Kilometers => {
                format!("{:.*} km", self.km_decimals, length_m / 1000.0)
            }
            LengthUnit::Meters => format!("{:.*} m", self.meter_decimals, length_m),
        }
    }

    /// Numeric part of the label, used to pre-fill an edit field
    pub fn format_value(&self, length_m: f64) -> String {
        match self.unit_for(length_m) {
            LengthUnit::Kilometers => format!("{:.*}", self.km_decimals, length_m / 1000.0),
            LengthUnit::Meters => format!("{:.*}", self.meter_decimals, length_m),
        }
    }
}

/// Format length value for display using the default rules
///
/// * `length_m` - Value in metres
pub fn format_length(length_m: f64) -> String {
    LengthFormat::default().format(length_m)
}

/// Format an area for display
///
/// Areas of one square kilometre or more are shown in km², smaller ones in m².
pub fn format_area(area_m2: f64) -> String {
    if area_m2 >= 1_000_000.0 {
        format!("{:.2} km²", area_m2 / 1_000_000.0)
    } else {
        format!("{:.1} m²", area_m2)
    }
}

/// Parse a typed length into metres
///
/// * `input` - Text typed into the label
/// * `unit` - Unit of the label being edited
pub fn parse_length(input: &str, unit: LengthUnit) -> Result<f64, String> {
    let input = input.trim();
    if input.is_empty() {
        return Err("Empty length".to_string());
    }

    let value = input.parse::<f64>().map_err(|e| e.to_string())?;
    if !value.is_finite() {
        return Err(format!("Length must be finite: {}", input));
    }

    Ok(value * unit.meters_per_unit())
}

/// Get the unit label for the given unit ("m" or "km")
pub fn get_unit_label(unit: LengthUnit) -> &'static str {
    match unit {
        LengthUnit::Meters => "m",
        LengthUnit::Kilometers => "km",
    }
}
