//! Product prices in Brazilian reais.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors returned when constructing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    #[error("price cannot be negative")]
    Negative,
}

/// A non-negative amount in BRL.
///
/// Zero is representable, but product forms treat a zero price as "no price"
/// (see [`Price::positive`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Price(Decimal);

impl Price {
    /// Currency symbol shown before every amount.
    pub const SYMBOL: &'static str = "R$";

    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] for amounts below zero.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative);
        }
        Ok(Self(amount))
    }

    /// Like [`Price::new`], but zero becomes `None`.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] for amounts below zero.
    pub fn positive(amount: Decimal) -> Result<Option<Self>, PriceError> {
        let price = Self::new(amount)?;
        Ok((!price.0.is_zero()).then_some(price))
    }

    /// Price from an integer number of centavos.
    #[must_use]
    pub fn from_cents(cents: u32) -> Self {
        Self(Decimal::new(i64::from(cents), 2))
    }

    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Format for display, e.g. `R$ 19.90`.
    ///
    /// ```
    /// use rust_decimal::Decimal;
    /// use vitrine_core::Price;
    ///
    /// let price = Price::new(Decimal::new(1999, 2)).unwrap();
    /// assert_eq!(price.display(), "R$ 19.99");
    /// ```
    #[must_use]
    pub fn display(&self) -> String {
        format!("{} {:.2}", Self::SYMBOL, self.0)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}
