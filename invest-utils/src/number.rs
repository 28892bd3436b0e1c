use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{
    fmt::Display,
    iter::Sum,
    ops::{Add, AddAssign, Neg, Sub, SubAssign},
    str::FromStr,
};

/// Number of minor currency units (cents) per major unit.
pub const MINOR_UNITS_PER_MAJOR: i64 = 100;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Rounding {
    /// Round to the nearest minor unit, ties away from zero.
    HalfUp,
    /// Round towards negative infinity.
    Floor,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AmountParseError {
    Empty,
    InvalidDigit(String),
    NotFinite,
    Overflow,
}

impl Display for AmountParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AmountParseError::Empty => write!(f, "empty amount"),
            AmountParseError::InvalidDigit(s) => write!(f, "invalid amount '{}'", s),
            AmountParseError::NotFinite => write!(f, "amount is not a finite number"),
            AmountParseError::Overflow => write!(f, "amount overflows fixed-point range"),
        }
    }
}

impl std::error::Error for AmountParseError {}

/// Exact monetary amount with six fractional digits.
///
/// Floating point inputs are converted through their shortest round-tripping
/// decimal representation, so `Amount::from_f64(0.335)` is exactly `0.335`
/// and sums of amounts never pick up binary rounding noise.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(i64);

impl Amount {
    const DECIMALS: u32 = 6;
    const SCALE: i64 = 10i64.pow(Amount::DECIMALS);
    const UNITS_PER_MINOR: i64 = Amount::SCALE / MINOR_UNITS_PER_MAJOR;

    pub const ZERO: Amount = Amount(0);

    pub fn inner(&self) -> i64 {
        self.0
    }

    pub fn from_f64(value: f64) -> Result<Self, AmountParseError> {
        if !value.is_finite() {
            return Err(AmountParseError::NotFinite);
        }
        // f64's Display never uses exponent notation
        value.to_string().parse()
    }

    pub fn from_minor_units(minor: i64) -> Self {
        Amount::checked_from_minor_units(minor).expect("Amount overflow")
    }

    pub fn checked_from_minor_units(minor: i64) -> Option<Self> {
        minor.checked_mul(Amount::UNITS_PER_MINOR).map(Amount)
    }

    pub fn to_f64(&self) -> f64 {
        self.0 as f64 / Amount::SCALE as f64
    }

    pub fn to_minor_units(&self, rounding: Rounding) -> i64 {
        match rounding {
            Rounding::Floor => self.0.div_euclid(Amount::UNITS_PER_MINOR),
            Rounding::HalfUp => {
                let whole = self.0 / Amount::UNITS_PER_MINOR;
                let rest = self.0 % Amount::UNITS_PER_MINOR;
                if rest.abs() >= Amount::UNITS_PER_MINOR / 2 {
                    whole + self.0.signum()
                } else {
                    whole
                }
            }
        }
    }

    /// Rounds to whole minor units, `None` if the result leaves the range.
    pub fn round_to_minor_units(&self, rounding: Rounding) -> Option<Self> {
        Amount::checked_from_minor_units(self.to_minor_units(rounding))
    }

    pub fn checked_add(&self, other: Amount) -> Option<Amount> {
        self.0.checked_add(other.0).map(Amount)
    }

    pub fn checked_sub(&self, other: Amount) -> Option<Amount> {
        self.0.checked_sub(other.0).map(Amount)
    }

    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }

    pub fn is_negative(&self) -> bool {
        self.0 < 0
    }
}

impl FromStr for Amount {
    type Err = AmountParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        let (negative, digits) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text.strip_prefix('+').unwrap_or(text)),
        };
        let (whole, fraction) = digits.split_once('.').unwrap_or((digits, ""));
        if whole.is_empty() && fraction.is_empty() {
            return Err(AmountParseError::Empty);
        }
        if !whole.bytes().all(|b| b.is_ascii_digit())
            || !fraction.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(AmountParseError::InvalidDigit(text.to_string()));
        }

        let mut units: i64 = 0;
        for b in whole.bytes() {
            units = units
                .checked_mul(10)
                .and_then(|u| u.checked_add((b - b'0') as i64))
                .ok_or(AmountParseError::Overflow)?;
        }
        units = units
            .checked_mul(Amount::SCALE)
            .ok_or(AmountParseError::Overflow)?;

        let mut place = Amount::SCALE / 10;
        for b in fraction.bytes().take(Amount::DECIMALS as usize) {
            units += (b - b'0') as i64 * place;
            place /= 10;
        }
        // digits past the sixth decimal round half-up
        if let Some(b) = fraction.bytes().nth(Amount::DECIMALS as usize) {
            if b >= b'5' {
                units = units.checked_add(1).ok_or(AmountParseError::Overflow)?;
            }
        }

        Ok(Amount(if negative { -units } else { units }))
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let magnitude = self.0.unsigned_abs();
        let scale = Amount::SCALE as u64;
        let fraction = format!("{:06}", magnitude % scale);
        let fraction = fraction.trim_end_matches('0');
        write!(
            f,
            "{}{}.{:0<2}",
            sign,
            magnitude / scale,
            fraction
        )
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.to_string().as_str())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl Add for Amount {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        self.checked_add(other).expect("Amount overflow")
    }
}

impl<'a> Add<&'a Amount> for Amount {
    type Output = Self;

    fn add(self, other: &'a Self) -> Self {
        self + *other
    }
}

impl Sub for Amount {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        self.checked_sub(other).expect("Amount overflow")
    }
}

impl<'a> Sub<&'a Amount> for Amount {
    type Output = Self;

    fn sub(self, other: &'a Self) -> Self {
        self - *other
    }
}

impl Neg for Amount {
    type Output = Self;

    fn neg(self) -> Self {
        Amount(self.0.checked_neg().expect("Amount overflow"))
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

impl SubAssign for Amount {
    fn sub_assign(&mut self, other: Self) {
        *self = *self - other;
    }
}

impl<'a> Sum<&'a Amount> for Amount {
    fn sum<I: Iterator<Item = &'a Amount>>(iter: I) -> Self {
        iter.fold(Amount::ZERO, |acc, x| acc + *x)
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Amount>>(iter: I) -> Self {
        iter.fold(Amount::ZERO, |acc, x| acc + x)
    }
}
