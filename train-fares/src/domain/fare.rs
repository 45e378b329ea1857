//! Fare values as scraped from provider pages.
//!
//! Providers print prices in local formats ("35,50 €") and sometimes print
//! sentinels ("Completo", "sold out") where a price should be. A [`Fare`]
//! keeps either a numeric [`Price`] or the raw text of a sentinel.

use std::fmt;
use std::ops::Add;
use std::str::FromStr;

use rust_decimal::Decimal;

/// A non-negative amount in the provider's currency.
///
/// Backed by a decimal so that sums of printed prices compare exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Price(Decimal);

impl Price {
    /// Create a price, rejecting negative values.
    pub fn new(value: Decimal) -> Option<Self> {
        if value.is_sign_negative() && !value.is_zero() {
            return None;
        }
        // -0 prints with its sign
        if value.is_zero() {
            return Some(Self(Decimal::ZERO));
        }
        Some(Self(value))
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl Add for Price {
    type Output = Price;

    fn add(self, rhs: Price) -> Price {
        Price(self.0 + rhs.0)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The price column of a trip record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Fare {
    /// A purchasable offer at this price.
    Amount(Price),

    /// No numeric price was shown; holds the text that was shown instead.
    Unavailable(String),
}

impl Fare {
    /// Interpret a price as printed by a provider.
    ///
    /// Surrounding whitespace and a leading or trailing euro sign are
    /// dropped and a decimal comma becomes a point. Anything that is then
    /// not a plain non-negative decimal is kept as [`Fare::Unavailable`].
    ///
    /// # Examples
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use train_fares::domain::{Fare, Price};
    ///
    /// assert_eq!(Fare::parse("35,50 €"), Fare::Amount(Price::new(dec!(35.5)).unwrap()));
    /// assert_eq!(Fare::parse("12.9"), Fare::Amount(Price::new(dec!(12.9)).unwrap()));
    /// assert_eq!(Fare::parse("1 234"), Fare::Unavailable("1 234".into()));
    /// assert_eq!(Fare::parse("Completo"), Fare::Unavailable("Completo".into()));
    /// ```
    pub fn parse(text: &str) -> Self {
        let trimmed = text.trim();
        let bare = trimmed
            .strip_suffix('€')
            .or_else(|| trimmed.strip_prefix('€'))
            .unwrap_or(trimmed)
            .trim();

        // Decimal's parser also takes signs and digit separators
        if bare.is_empty() || !bare.chars().all(|c| c.is_ascii_digit() || c == ',' || c == '.') {
            return Fare::Unavailable(text.to_string());
        }

        let normalised = bare.replace(',', ".");
        match Decimal::from_str(&normalised).ok().and_then(Price::new) {
            Some(price) => Fare::Amount(price),
            None => Fare::Unavailable(text.to_string()),
        }
    }

    /// The numeric price, if this fare is purchasable.
    pub fn amount(&self) -> Option<Price> {
        match self {
            Fare::Amount(price) => Some(*price),
            Fare::Unavailable(_) => None,
        }
    }
}

impl fmt::Display for Fare {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fare::Amount(price) => write!(f, "{price}"),
            Fare::Unavailable(text) => f.write_str(text),
        }
    }
}
