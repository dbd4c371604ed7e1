use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    #[error("Invalid number: '{0}'")]
    InvalidNumber(String),
}

/// A single scalar lab reading.
///
/// Readings written with a decimal point keep their scale (`13.50` stays
/// `13.50`); everything else is an integer count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabValue {
    Integer(i64),
    Decimal(Decimal),
}

impl LabValue {
    pub fn parse(raw: &str) -> Result<Self, ValueError> {
        let s = raw.trim();
        let invalid = || ValueError::InvalidNumber(raw.to_string());
        if s.contains('.') {
            Decimal::from_str(s).map(LabValue::Decimal).map_err(|_| invalid())
        } else {
            s.parse::<i64>().map(LabValue::Integer).map_err(|_| invalid())
        }
    }

    pub fn is_decimal(self) -> bool {
        matches!(self, LabValue::Decimal(_))
    }
}

impl fmt::Display for LabValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LabValue::Integer(i) => write!(f, "{i}"),
            LabValue::Decimal(d) => write!(f, "{d}"),
        }
    }
}

impl FromStr for LabValue {
    type Err = ValueError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LabValue::parse(s)
    }
}
