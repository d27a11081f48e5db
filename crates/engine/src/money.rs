use std::{fmt, str::FromStr};

use crate::EngineError;

/// An amount in integer cents.
///
/// Used to read decimal amounts from form input and to print balances in
/// error messages. Storage keeps the raw cents in `*_minor` columns.
///
/// ```rust
/// use engine::Money;
///
/// assert_eq!("10,5".parse::<Money>().unwrap().cents(), 1050);
/// assert_eq!(Money::new(-1050).to_string(), "-10.50");
/// assert!("12.345".parse::<Money>().is_err());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Money(i64);

impl Money {
    #[must_use]
    pub const fn new(cents: i64) -> Self {
        Self(cents)
    }

    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let abs = self.0.unsigned_abs();
        if self.0 < 0 {
            f.write_str("-")?;
        }
        write!(f, "{}.{:02}", abs / 100, abs % 100)
    }
}

impl FromStr for Money {
    type Err = EngineError;

    /// Accepts `.` or `,` as decimal separator, an optional sign and at most
    /// two fractional digits.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim();
        let (sign, digits) = match input.as_bytes().first() {
            Some(b'-') => (-1, &input[1..]),
            Some(b'+') => (1, &input[1..]),
            _ => (1, input),
        };
        if digits.is_empty() {
            return Err(EngineError::Validation("empty amount".to_string()));
        }

        let invalid = || EngineError::Validation(format!("invalid amount: {input}"));
        let (units, fraction) = digits
            .split_once(['.', ','])
            .unwrap_or((digits, ""));
        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if units.is_empty() || !all_digits(units) || !all_digits(fraction) {
            return Err(invalid());
        }
        if fraction.len() > 2 {
            return Err(EngineError::Validation(format!(
                "too many decimals in amount: {input}"
            )));
        }

        let too_large = || EngineError::Validation(format!("amount too large: {input}"));
        let units: i64 = units.parse().map_err(|_| too_large())?;
        let fraction: i64 = format!("{fraction:0<2}").parse().map_err(|_| invalid())?;
        units
            .checked_mul(100)
            .and_then(|cents| cents.checked_add(fraction))
            .map(|cents| Money(sign * cents))
            .ok_or_else(too_large)
    }
}
