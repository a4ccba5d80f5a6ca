//! Exact fixed-point decimal for packed numbers.
//!
//! A value is `mantissa * 10^-scale`. Parsing and formatting go through
//! decimal digits only, so a wire value like `464624.521` survives a
//! round-trip without binary floating-point drift.

use crate::error::{Error, Result};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// Largest supported scale. Packed numbers carry at most 14 decimals,
/// floats are formatted with fewer than 38 significant digits.
pub const MAX_SCALE: u32 = 38;

/// Fixed-point decimal number.
#[derive(Debug, Clone, Copy)]
pub struct Decimal {
    mantissa: i128,
    scale: u32,
}

impl Decimal {
    pub const ZERO: Decimal = Decimal {
        mantissa: 0,
        scale: 0,
    };

    /// Create `mantissa * 10^-scale`.
    ///
    /// # Example
    /// ```
    /// use rfc_thin_rs::Decimal;
    ///
    /// assert_eq!(Decimal::new(25, 1).to_string(), "2.5");
    /// ```
    pub fn new(mantissa: i128, scale: u32) -> Self {
        Self { mantissa, scale }
    }

    pub fn mantissa(&self) -> i128 {
        self.mantissa
    }

    pub fn scale(&self) -> u32 {
        self.scale
    }

    pub fn is_zero(&self) -> bool {
        self.mantissa == 0
    }

    pub fn is_negative(&self) -> bool {
        self.mantissa < 0
    }

    /// Strip trailing fractional zeros.
    pub fn normalize(&self) -> Self {
        let mut mantissa = self.mantissa;
        let mut scale = self.scale;
        while scale > 0 && mantissa % 10 == 0 {
            mantissa /= 10;
            scale -= 1;
        }
        Self { mantissa, scale }
    }

    /// Change the scale without losing digits.
    ///
    /// Widening always succeeds unless the mantissa overflows. Narrowing
    /// is only allowed when the dropped digits are all zero.
    pub fn rescale(&self, scale: u32) -> Result<Self> {
        match scale.cmp(&self.scale) {
            Ordering::Equal => Ok(*self),
            Ordering::Greater => {
                let factor = pow10(scale - self.scale)?;
                let mantissa = self.mantissa.checked_mul(factor).ok_or_else(|| {
                    Error::type_conversion(format!("{} overflows at scale {}", self, scale))
                })?;
                Ok(Self { mantissa, scale })
            }
            Ordering::Less => {
                let factor = pow10(self.scale - scale)?;
                if self.mantissa % factor != 0 {
                    return Err(Error::type_conversion(format!(
                        "{} has more than {} decimal places",
                        self, scale
                    )));
                }
                Ok(Self {
                    mantissa: self.mantissa / factor,
                    scale,
                })
            }
        }
    }

    /// Integer value, if there is no fractional part.
    pub fn to_i64(&self) -> Option<i64> {
        let normalized = self.normalize();
        if normalized.scale != 0 {
            return None;
        }
        i64::try_from(normalized.mantissa).ok()
    }

    /// Nearest `f64`. Lossy.
    pub fn to_f64(&self) -> f64 {
        // Going through the decimal text keeps the result correctly rounded.
        self.to_string().parse().unwrap_or(f64::NAN)
    }
}

fn pow10(exp: u32) -> Result<i128> {
    10i128
        .checked_pow(exp)
        .ok_or_else(|| Error::type_conversion(format!("scale {} out of range", exp)))
}

impl FromStr for Decimal {
    type Err = Error;

    /// Parse `[+-]digits[.digits]`, also accepting the trailing-minus
    /// form `123.45-` used by packed numbers.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::type_conversion(format!("'{}' is not a valid decimal", s));

        let trimmed = s.trim();
        let (negative, body) = if let Some(rest) = trimmed.strip_prefix('-') {
            (true, rest)
        } else if let Some(rest) = trimmed.strip_suffix('-') {
            (true, rest.trim_end())
        } else if let Some(rest) = trimmed.strip_prefix('+') {
            (false, rest)
        } else {
            (false, trimmed)
        };

        let (int_part, frac_part) = match body.split_once('.') {
            Some((i, f)) => (i, f),
            None => (body, ""),
        };
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(invalid());
        }
        if !int_part.bytes().all(|b| b.is_ascii_digit())
            || !frac_part.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalid());
        }

        let scale = frac_part.len() as u32;
        if scale > MAX_SCALE {
            return Err(invalid());
        }

        let mut mantissa: i128 = 0;
        for b in int_part.bytes().chain(frac_part.bytes()) {
            mantissa = mantissa
                .checked_mul(10)
                .and_then(|m| m.checked_add((b - b'0') as i128))
                .ok_or_else(invalid)?;
        }
        if negative {
            mantissa = -mantissa;
        }
        Ok(Self { mantissa, scale })
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.mantissa.unsigned_abs().to_string();
        let sign = if self.mantissa < 0 { "-" } else { "" };
        let scale = self.scale as usize;
        if scale == 0 {
            return write!(f, "{}{}", sign, digits);
        }
        if digits.len() <= scale {
            write!(f, "{}0.{}{}", sign, "0".repeat(scale - digits.len()), digits)
        } else {
            let (int_part, frac_part) = digits.split_at(digits.len() - scale);
            write!(f, "{}{}.{}", sign, int_part, frac_part)
        }
    }
}

impl PartialEq for Decimal {
    fn eq(&self, other: &Self) -> bool {
        let a = self.normalize();
        let b = other.normalize();
        a.mantissa == b.mantissa && a.scale == b.scale
    }
}

impl Eq for Decimal {}

impl Hash for Decimal {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let n = self.normalize();
        n.mantissa.hash(state);
        n.scale.hash(state);
    }
}

impl PartialOrd for Decimal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Decimal {
    fn cmp(&self, other: &Self) -> Ordering {
        let scale = self.scale.max(other.scale);
        match (self.rescale(scale), other.rescale(scale)) {
            (Ok(a), Ok(b)) => a.mantissa.cmp(&b.mantissa),
            // Overflow only happens for huge magnitudes; fall back to floats.
            _ => self
                .to_f64()
                .partial_cmp(&other.to_f64())
                .unwrap_or(Ordering::Equal),
        }
    }
}

impl From<i64> for Decimal {
    fn from(value: i64) -> Self {
        Self::new(value as i128, 0)
    }
}

impl From<i32> for Decimal {
    fn from(value: i32) -> Self {
        Self::new(value as i128, 0)
    }
}

impl TryFrom<f64> for Decimal {
    type Error = Error;

    /// Convert via the shortest decimal text that round-trips the float,
    /// so `464624.521_f64` becomes exactly `464624.521`.
    fn try_from(value: f64) -> Result<Self> {
        if !value.is_finite() {
            return Err(Error::type_conversion(format!(
                "{} cannot be represented as a decimal",
                value
            )));
        }
        value.to_string().parse()
    }
}
