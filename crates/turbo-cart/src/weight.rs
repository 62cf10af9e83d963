//! Weight units and conversion.

use crate::config::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const GRAMS_PER_KILOGRAM: f64 = 1000.0;
const GRAMS_PER_OUNCE: f64 = 28.3495;
const GRAMS_PER_POUND: f64 = 453.592;

/// Unit in which product weights are recorded or reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum WeightUnit {
    #[default]
    #[serde(rename = "g")]
    Gram,
    #[serde(rename = "kg")]
    Kilogram,
    #[serde(rename = "oz")]
    Ounce,
    #[serde(rename = "lb")]
    Pound,
}

impl WeightUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            WeightUnit::Gram => "g",
            WeightUnit::Kilogram => "kg",
            WeightUnit::Ounce => "oz",
            WeightUnit::Pound => "lb",
        }
    }

    /// Grams in one of this unit.
    pub fn grams(&self) -> f64 {
        match self {
            WeightUnit::Gram => 1.0,
            WeightUnit::Kilogram => GRAMS_PER_KILOGRAM,
            WeightUnit::Ounce => GRAMS_PER_OUNCE,
            WeightUnit::Pound => GRAMS_PER_POUND,
        }
    }

    /// Convert `value` from this unit into `target`, going through grams.
    pub fn convert(&self, value: f64, target: WeightUnit) -> f64 {
        if *self == target {
            return value;
        }
        value * self.grams() / target.grams()
    }
}

impl FromStr for WeightUnit {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "g" => Ok(WeightUnit::Gram),
            "kg" => Ok(WeightUnit::Kilogram),
            "oz" => Ok(WeightUnit::Ounce),
            "lb" | "lbs" => Ok(WeightUnit::Pound),
            _ => Err(ConfigError::UnknownWeightUnit(s.to_string())),
        }
    }
}

impl fmt::Display for WeightUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const ALL: [WeightUnit; 4] = [
        WeightUnit::Gram,
        WeightUnit::Kilogram,
        WeightUnit::Ounce,
        WeightUnit::Pound,
    ];

    #[test]
    fn test_fixed_factors() {
        assert_eq!(WeightUnit::Kilogram.convert(1.0, WeightUnit::Gram), 1000.0);
        assert!((WeightUnit::Ounce.convert(1.0, WeightUnit::Gram) - 28.3495).abs() < 1e-9);
        assert!((WeightUnit::Pound.convert(1.0, WeightUnit::Gram) - 453.592).abs() < 1e-9);
        assert!((WeightUnit::Gram.convert(500.0, WeightUnit::Kilogram) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_pound_to_ounce() {
        let ounces = WeightUnit::Pound.convert(1.0, WeightUnit::Ounce);
        assert!((ounces - 16.0).abs() < 0.001);
    }

    #[test]
    fn test_round_trip_within_tolerance() {
        for from in ALL {
            for to in ALL {
                let value = 12.345;
                let back = to.convert(from.convert(value, to), from);
                assert!((back - value).abs() < 1e-9, "{from} -> {to} -> {from}");
            }
        }
    }

    proptest! {
        #[test]
        fn test_any_weight_round_trips(
            value in 0.0f64..1_000_000.0,
            from in proptest::sample::select(ALL.to_vec()),
            to in proptest::sample::select(ALL.to_vec()),
        ) {
            let back = to.convert(from.convert(value, to), from);
            prop_assert!((back - value).abs() <= value * 1e-12 + 1e-12);
        }
    }

    #[test]
    fn test_parse() {
        assert_eq!("kg".parse::<WeightUnit>().unwrap(), WeightUnit::Kilogram);
        assert_eq!(" LB ".parse::<WeightUnit>().unwrap(), WeightUnit::Pound);
        assert!(matches!(
            "stone".parse::<WeightUnit>(),
            Err(ConfigError::UnknownWeightUnit(_))
        ));
    }

    #[test]
    fn test_serde_codes() {
        assert_eq!(serde_json::to_string(&WeightUnit::Ounce).unwrap(), r#""oz""#);
        let unit: WeightUnit = serde_json::from_str(r#""kg""#).unwrap();
        assert_eq!(unit, WeightUnit::Kilogram);
    }
}
