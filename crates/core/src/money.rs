//! Fixed-point currency amounts.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::value_object::ValueObject;

/// A currency amount in minor units (cents).
///
/// All arithmetic is integer arithmetic; decimal strings are parsed and
/// rendered with exactly two fraction digits so `"25.00"` round-trips without
/// drift. Amounts may be negative in intermediate arithmetic, but every domain
/// field that stores a `Money` enforces its own sign invariant.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    pub fn cents(&self) -> i64 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }

    pub fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Overflow-checked addition.
    pub fn checked_add(self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money)
    }

    /// Overflow-checked subtraction.
    pub fn checked_sub(self, other: Money) -> Option<Money> {
        self.0.checked_sub(other.0).map(Money)
    }

    /// Overflow-checked multiplication by a quantity (line totals).
    pub fn checked_mul_quantity(self, quantity: u32) -> Option<Money> {
        self.0.checked_mul(i64::from(quantity)).map(Money)
    }

    /// Lossless only for display-sized amounts; used at the JSON boundary
    /// where every cent value in range is exactly representable.
    pub fn as_f64(&self) -> f64 {
        self.0 as f64 / 100.0
    }
}

impl ValueObject for Money {}

impl core::fmt::Display for Money {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

impl FromStr for Money {
    type Err = DomainError;

    /// Parse a decimal amount with at most two fraction digits.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (negative, unsigned) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };

        let (whole, frac) = match unsigned.split_once('.') {
            Some((w, f)) => (w, f),
            None => (unsigned, ""),
        };

        if whole.is_empty() && frac.is_empty() {
            return Err(DomainError::validation(format!("invalid amount '{s}'")));
        }
        if !whole.chars().all(|c| c.is_ascii_digit()) || !frac.chars().all(|c| c.is_ascii_digit()) {
            return Err(DomainError::validation(format!("invalid amount '{s}'")));
        }
        if frac.len() > 2 {
            return Err(DomainError::validation(format!(
                "amount '{s}' has more than two decimal places"
            )));
        }

        let whole: i64 = if whole.is_empty() {
            0
        } else {
            whole
                .parse()
                .map_err(|_| DomainError::validation(format!("invalid amount '{s}'")))?
        };
        let mut frac_cents: i64 = if frac.is_empty() {
            0
        } else {
            frac.parse()
                .map_err(|_| DomainError::validation(format!("invalid amount '{s}'")))?
        };
        if frac.len() == 1 {
            frac_cents *= 10;
        }

        let cents = whole
            .checked_mul(100)
            .and_then(|c| c.checked_add(frac_cents))
            .ok_or_else(|| DomainError::validation(format!("amount '{s}' out of range")))?;

        Ok(Money(if negative { -cents } else { cents }))
    }
}
