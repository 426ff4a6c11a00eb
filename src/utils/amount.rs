// Valores monetários tratados como centavos inteiros.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A transaction amount in centavos.
///
/// Kept as an integer so rendering the two fraction digits never goes
/// through floating point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amount(u64);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AmountError {
    #[error("invalid amount {0:?}")]
    Invalid(String),
    #[error("negative amount {0:?}")]
    Negative(String),
}

impl Amount {
    pub fn from_cents(cents: u64) -> Self {
        Amount(cents)
    }

    pub fn cents(self) -> u64 {
        self.0
    }

    /// Converts a value in reais, rounding half away from zero to the cent.
    pub fn from_reais(value: f64) -> Result<Self, AmountError> {
        if !value.is_finite() {
            return Err(AmountError::Invalid(value.to_string()));
        }
        if value < 0.0 {
            return Err(AmountError::Negative(value.to_string()));
        }
        let cents = (value * 100.0).round();
        if cents > u64::MAX as f64 {
            return Err(AmountError::Invalid(value.to_string()));
        }
        Ok(Amount(cents as u64))
    }
}

impl fmt::Display for Amount {
    /// Always two fraction digits: 1000 centavos render as `10.00`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    /// Parses a plain decimal string without a float round trip. Digits
    /// past the second decimal place round half away from zero.
    fn from_str(s: &str) -> Result<Self, AmountError> {
        let raw = s.trim();
        if raw.starts_with('-') {
            return Err(AmountError::Negative(s.to_string()));
        }
        let (int_part, frac_part) = match raw.split_once('.') {
            Some((int_part, frac_part)) => (int_part, frac_part),
            None => (raw, ""),
        };
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(AmountError::Invalid(s.to_string()));
        }
        if !int_part.bytes().all(|b| b.is_ascii_digit())
            || !frac_part.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(AmountError::Invalid(s.to_string()));
        }

        let whole: u64 = if int_part.is_empty() {
            0
        } else {
            int_part.parse().map_err(|_| AmountError::Invalid(s.to_string()))?
        };
        let frac = frac_part.as_bytes();
        let tens = frac.first().map_or(0, |b| u64::from(b - b'0'));
        let units = frac.get(1).map_or(0, |b| u64::from(b - b'0'));
        let round_up = frac.get(2).is_some_and(|b| *b >= b'5');

        whole
            .checked_mul(100)
            .and_then(|c| c.checked_add(tens * 10 + units))
            .and_then(|c| c.checked_add(u64::from(round_up)))
            .map(Amount)
            .ok_or_else(|| AmountError::Invalid(s.to_string()))
    }
}
