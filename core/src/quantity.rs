// ParaTime Deposit
// Copyright (C) 2019 Monadic GmbH <radicle@monadic.xyz>
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License version 3 as
// published by the Free Software Foundation.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Token amounts: [Quantity], [Denomination] and [BaseUnits].

use num_bigint::BigUint;
use parity_scale_codec::{Decode, Encode, EncodeLike, Error as CodecError, Input, Output};
use std::fmt;
use std::str::FromStr;

/// Non-negative integer of arbitrary size that represents an amount of tokens in base units.
///
/// Parsing accepts decimal digits with optional `_` separators and the `0x`, `0o` and `0b`
/// prefixes for other radixes. [Quantity] is displayed in decimal.
///
/// ```rust
/// # use paratime_deposit_core::Quantity;
/// let amount: Quantity = "1_000_000".parse().unwrap();
/// assert_eq!(amount, Quantity::from(1_000_000u64));
/// assert!("-1".parse::<Quantity>().is_err());
/// ```
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct Quantity(BigUint);

#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum QuantityError {
    #[error("amount is empty")]
    Empty,

    #[error("amount must not be negative")]
    Negative,

    #[error("amount {0:?} is not a number")]
    Malformed(String),

    #[error("amount is smaller than {0}")]
    Underflow(Quantity),
}

impl Quantity {
    pub fn zero() -> Self {
        Quantity(BigUint::default())
    }

    pub fn is_zero(&self) -> bool {
        self.0 == BigUint::default()
    }

    pub fn checked_sub(&self, other: &Quantity) -> Result<Quantity, QuantityError> {
        if self.0 < other.0 {
            Err(QuantityError::Underflow(other.clone()))
        } else {
            Ok(Quantity(&self.0 - &other.0))
        }
    }

    /// Big-endian bytes without leading zeros. Zero has no bytes.
    pub fn to_bytes_be(&self) -> Vec<u8> {
        if self.is_zero() {
            Vec::new()
        } else {
            self.0.to_bytes_be()
        }
    }

    pub fn from_bytes_be(bytes: &[u8]) -> Self {
        Quantity(BigUint::from_bytes_be(bytes))
    }
}

impl std::ops::Add<&Quantity> for &Quantity {
    type Output = Quantity;

    fn add(self, other: &Quantity) -> Quantity {
        Quantity(&self.0 + &other.0)
    }
}

impl From<u64> for Quantity {
    fn from(value: u64) -> Self {
        Quantity(BigUint::from(value))
    }
}

impl From<u128> for Quantity {
    fn from(value: u128) -> Self {
        Quantity(BigUint::from(value))
    }
}

impl From<BigUint> for Quantity {
    fn from(value: BigUint) -> Self {
        Quantity(value)
    }
}

impl From<Quantity> for BigUint {
    fn from(value: Quantity) -> Self {
        value.0
    }
}

impl FromStr for Quantity {
    type Err = QuantityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.replace('_', "");
        if digits.is_empty() {
            return Err(QuantityError::Empty);
        }
        if digits.starts_with('-') {
            return Err(QuantityError::Negative);
        }
        let digits = digits.strip_prefix('+').unwrap_or(&digits);

        let (radix, digits) = match digits.get(..2) {
            Some("0x") | Some("0X") => (16, &digits[2..]),
            Some("0o") | Some("0O") => (8, &digits[2..]),
            Some("0b") | Some("0B") => (2, &digits[2..]),
            _ => (10, digits),
        };
        if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
            return Err(QuantityError::Malformed(s.to_string()));
        }
        BigUint::parse_bytes(digits.as_bytes(), radix)
            .map(Quantity)
            .ok_or_else(|| QuantityError::Malformed(s.to_string()))
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Encode for Quantity {
    fn encode_to<T: Output + ?Sized>(&self, dest: &mut T) {
        self.to_bytes_be().encode_to(dest)
    }
}

impl EncodeLike for Quantity {}

impl Decode for Quantity {
    fn decode<I: Input>(input: &mut I) -> Result<Self, CodecError> {
        let bytes: Vec<u8> = Vec::decode(input)?;
        if bytes.first() == Some(&0) {
            return Err(CodecError::from("Quantity has leading zero bytes"));
        }
        Ok(Quantity::from_bytes_be(&bytes))
    }
}

/// Name of a token. The empty name is the native token of the runtime.
#[derive(Decode, Encode, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct Denomination(Vec<u8>);

impl Denomination {
    pub const NATIVE: Denomination = Denomination(Vec::new());

    pub fn new(name: impl Into<Vec<u8>>) -> Self {
        Denomination(name.into())
    }

    pub fn is_native(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Denomination {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_native() {
            f.write_str("<native>")
        } else {
            f.write_str(&String::from_utf8_lossy(&self.0))
        }
    }
}

/// An amount of tokens of a given [Denomination].
#[derive(Decode, Encode, Clone, Debug, Default, Eq, PartialEq)]
pub struct BaseUnits {
    pub amount: Quantity,
    pub denomination: Denomination,
}

impl BaseUnits {
    pub fn new(amount: Quantity, denomination: Denomination) -> Self {
        BaseUnits {
            amount,
            denomination,
        }
    }

    /// Amount of the runtime's native token.
    pub fn native(amount: impl Into<Quantity>) -> Self {
        BaseUnits::new(amount.into(), Denomination::NATIVE)
    }
}

impl fmt::Display for BaseUnits {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {}", self.amount, self.denomination)
    }
}
