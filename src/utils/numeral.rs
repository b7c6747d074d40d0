//! Fixed-precision two-part issue numerals.
//!
//! An installment number like "7-11" (whole part 7, second part 11) is packed
//! into a single fixed-precision integer so it sorts numerically, stores as a
//! plain field, and round-trips through URL path segments. Two digits are
//! reserved for the second part: `7-11` packs to `711`, `7` alone to `700`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::LongboxError;

/// Digits reserved for the whole part of an installment number.
pub const FIRST_LENGTH: u32 = 4;
/// Digits reserved for the second (fractional) part.
pub const SECOND_LENGTH: u32 = 2;

const SCALE: i64 = 10i64.pow(SECOND_LENGTH);
const MAX_WHOLE: i64 = 10i64.pow(FIRST_LENGTH);

/// A packed installment number.
///
/// Stored and serialized as the raw scaled integer; ordering on the raw value
/// is exactly the natural ordering of the two-part numeral.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IssueNumber(i64);

impl IssueNumber {
    /// Pack a two-part numeral into a single fixed-precision value.
    pub fn pack(whole: i64, second: i64) -> Result<Self, LongboxError> {
        if whole < 0 || second < 0 {
            return Err(LongboxError::Validation(
                "Installment numbers cannot be negative.".into(),
            ));
        }
        if whole >= MAX_WHOLE {
            return Err(LongboxError::Validation(format!(
                "Whole part {} exceeds {} digits.",
                whole, FIRST_LENGTH
            )));
        }
        if second >= SCALE {
            return Err(LongboxError::Validation(format!(
                "Second part {} exceeds {} digits.",
                second, SECOND_LENGTH
            )));
        }
        Ok(IssueNumber(whole * SCALE + second))
    }

    /// Reconstruct from a raw scaled value (e.g. read back from storage).
    pub fn from_raw(raw: i64) -> Result<Self, LongboxError> {
        if raw < 0 || raw >= MAX_WHOLE * SCALE {
            return Err(LongboxError::Validation(format!(
                "Raw numeral {} out of range.",
                raw
            )));
        }
        Ok(IssueNumber(raw))
    }

    /// The raw scaled value, as stored.
    pub fn raw(self) -> i64 {
        self.0
    }

    /// The whole part of the numeral.
    pub fn whole(self) -> i64 {
        self.0 / SCALE
    }

    /// The second part of the numeral.
    pub fn second(self) -> i64 {
        self.0 % SCALE
    }

    /// True when the second part is zero (a plain "issue 7" style number).
    pub fn is_whole(self) -> bool {
        self.second() == 0
    }

    /// The next number an editor would expect: whole numbers advance by one,
    /// in-between numbers advance by a single second-part unit.
    pub fn bump(self) -> Result<Self, LongboxError> {
        if self.is_whole() {
            IssueNumber::pack(self.whole() + 1, 0)
        } else {
            IssueNumber::from_raw(self.0 + 1)
        }
    }

    /// URL path segment form: `7-11`, or just `7` when the second part is zero.
    /// The second part is an integer, never zero-padded, so segments stay
    /// unambiguous ("7-5" is part 5, "7-50" is part 50).
    pub fn path_segment(self) -> String {
        if self.is_whole() {
            self.whole().to_string()
        } else {
            format!("{}-{}", self.whole(), self.second())
        }
    }
}

impl fmt::Display for IssueNumber {
    /// Decimal display form: `7.05`, `7.5` (trailing zero trimmed), or `7`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_whole() {
            return write!(f, "{}", self.whole());
        }
        let mut frac = format!("{:0width$}", self.second(), width = SECOND_LENGTH as usize);
        while frac.ends_with('0') {
            frac.pop();
        }
        write!(f, "{}.{}", self.whole(), frac)
    }
}

impl FromStr for IssueNumber {
    type Err = LongboxError;

    /// Accepts the path-segment form (`7-11`, integer second part), the
    /// decimal form (`7.5` meaning 7.50), and a bare whole number (`7`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = || LongboxError::Validation(format!("Invalid installment number '{}'.", s));

        if let Some((a, b)) = s.split_once('-') {
            let whole: i64 = a.parse().map_err(|_| invalid())?;
            let second: i64 = b.parse().map_err(|_| invalid())?;
            return IssueNumber::pack(whole, second);
        }

        if let Some((a, b)) = s.split_once('.') {
            let whole: i64 = a.parse().map_err(|_| invalid())?;
            if b.is_empty() || b.len() > SECOND_LENGTH as usize {
                return Err(invalid());
            }
            // decimal digits: "5" means .50, "05" means .05
            let mut digits = b.to_string();
            while digits.len() < SECOND_LENGTH as usize {
                digits.push('0');
            }
            let second: i64 = digits.parse().map_err(|_| invalid())?;
            return IssueNumber::pack(whole, second);
        }

        let whole: i64 = s.parse().map_err(|_| invalid())?;
        IssueNumber::pack(whole, 0)
    }
}
