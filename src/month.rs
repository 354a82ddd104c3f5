use crate::error::{ReportError, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

const LABEL_PREFIX: &str = "Tháng";

/// A reporting month, 1 through 12.
///
/// Reports are keyed by their display label (`"Tháng 3"`), but ordering and
/// comparison always go through the month number so that `"Tháng 2"` sorts
/// before `"Tháng 10"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Month(u8);

impl Month {
    pub fn new(number: u32) -> Result<Self> {
        if (1..=12).contains(&number) {
            Ok(Self(number as u8))
        } else {
            Err(ReportError::InvalidMonth(number.to_string()))
        }
    }

    pub fn number(self) -> u32 {
        u32::from(self.0)
    }

    /// The store key / display label, e.g. `"Tháng 7"`.
    pub fn label(self) -> String {
        format!("{} {}", LABEL_PREFIX, self.0)
    }

    /// All twelve months in calendar order.
    pub fn all() -> impl Iterator<Item = Month> {
        (1..=12u8).map(Month)
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", LABEL_PREFIX, self.0)
    }
}

impl FromStr for Month {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self> {
        let number = s
            .trim()
            .strip_prefix(LABEL_PREFIX)
            .map(str::trim)
            .and_then(|n| n.parse::<u32>().ok())
            .ok_or_else(|| ReportError::InvalidMonth(s.to_string()))?;

        Month::new(number).map_err(|_| ReportError::InvalidMonth(s.to_string()))
    }
}

impl From<chrono::Month> for Month {
    fn from(month: chrono::Month) -> Self {
        Self(month.number_from_month() as u8)
    }
}

impl From<Month> for chrono::Month {
    fn from(month: Month) -> Self {
        // Month is always 1..=12, so the conversion cannot fail.
        chrono::Month::try_from(month.0).unwrap_or(chrono::Month::January)
    }
}

impl Serialize for Month {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Month {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        label.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_round_trip() {
        let month = Month::new(7).unwrap();
        assert_eq!(month.label(), "Tháng 7");
        assert_eq!(month.to_string(), "Tháng 7");
        assert_eq!("Tháng 7".parse::<Month>().unwrap(), month);
        assert_eq!("  Tháng 12 ".parse::<Month>().unwrap().number(), 12);
    }

    #[test]
    fn test_numeric_ordering() {
        let feb: Month = "Tháng 2".parse().unwrap();
        let oct: Month = "Tháng 10".parse().unwrap();
        assert!(feb < oct);
        // Lexical order would say the opposite.
        assert!(feb.label() > oct.label());
    }

    #[test]
    fn test_rejects_invalid_labels() {
        assert!(Month::new(0).is_err());
        assert!(Month::new(13).is_err());
        assert!("Tháng 13".parse::<Month>().is_err());
        assert!("Tháng".parse::<Month>().is_err());
        assert!("March".parse::<Month>().is_err());
        assert!("3".parse::<Month>().is_err());
    }

    #[test]
    fn test_chrono_conversion() {
        let month: Month = chrono::Month::March.into();
        assert_eq!(month.number(), 3);
        assert_eq!(chrono::Month::from(month), chrono::Month::March);
        assert_eq!(Month::all().count(), 12);
    }

    #[test]
    fn test_serde_as_label() {
        let month = Month::new(4).unwrap();
        let json = serde_json::to_string(&month).unwrap();
        assert_eq!(json, "\"Tháng 4\"");
        let back: Month = serde_json::from_str(&json).unwrap();
        assert_eq!(back, month);
    }
}
