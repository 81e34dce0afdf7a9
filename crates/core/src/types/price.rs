//! Type-safe price representation using decimal arithmetic.
//!
//! Prices are kept as [`Decimal`] end to end so that cart totals never pick up
//! binary floating-point drift (`2 × 199.99 + 89.99` is exactly `489.97`).

use core::fmt;
use core::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::Quantity;

/// Errors that can occur when constructing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The amount is below zero.
    #[error("price cannot be negative (got {0})")]
    Negative(Decimal),
    /// The input is not a decimal number.
    #[error("invalid price {input:?}: {reason}")]
    Invalid {
        /// The rejected input.
        input: String,
        /// Why the decimal parser rejected it.
        reason: String,
    },
}

/// A non-negative amount in the store's single currency (USD).
///
/// ## Examples
///
/// ```
/// use quickcart_core::Price;
///
/// let price: Price = "199.99".parse().unwrap();
/// assert_eq!(price.to_string(), "$199.99");
///
/// assert!("-1".parse::<Price>().is_err());
/// assert!("abc".parse::<Price>().is_err());
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Price(Decimal);

impl Price {
    /// A price of zero.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a new price.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] if `amount` is below zero.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_zero() {
            return Ok(Self::ZERO);
        }
        if amount.is_sign_negative() {
            return Err(PriceError::Negative(amount));
        }
        Ok(Self(amount))
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Canonical string form used when persisting the price (`"199.99"`).
    #[must_use]
    pub fn to_canonical_string(&self) -> String {
        self.0.normalize().to_string()
    }

    /// Price of `quantity` units at this unit price.
    ///
    /// Returns `None` if the product overflows the decimal range.
    #[must_use]
    pub fn checked_times(self, quantity: Quantity) -> Option<Self> {
        self.0
            .checked_mul(Decimal::from(quantity.get()))
            .map(Self)
    }

    /// Sum of two prices, or `None` on overflow.
    #[must_use]
    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cents = self
            .0
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        write!(f, "${cents:.2}")
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let amount = Decimal::from_str(s.trim()).map_err(|e| PriceError::Invalid {
            input: s.to_owned(),
            reason: e.to_string(),
        })?;
        Self::new(amount)
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        Self::new(amount)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}
