use std::fmt::Display;

use rusty_money::{iso, Money};

use super::Error;

/// Surcharge on the student price paid by employees and guests in Frankfurt.
pub const FRANKFURT_MARKUP: Euro = Euro::from_cents(160);

const CURRENCY_SYMBOL: char = '€';

/// An exact euro amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Euro(i64); // in cents

impl Euro {
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    pub fn checked_add(self, other: Self) -> Result<Self, Error> {
        self.0
            .checked_add(other.0)
            .map(Self)
            .ok_or_else(|| Error::internal_error("price overflow"))
    }

    fn money(self) -> Money<'static, iso::Currency> {
        Money::from_minor(self.0, iso::EUR)
    }
}

/// Renders the amount the way the feed wants it: `3.50`.
impl Display for Euro {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.money().amount())
    }
}

/// Normalizes one price token such as `"3,50 €"`.
///
/// Tokens without a currency symbol or without any digit are no price at all. Digits are kept, the
/// first comma becomes the decimal point, everything else (including `.` thousands separators and
/// further commas) is dropped, and the fraction is cut after two digits. A cell that runs two amounts
/// together (`"2,50 € 3,80 €"`) yields the first one. Only an amount too large for the cent
/// counter is an error.
pub fn normalize_price(token: &str) -> Result<Option<Euro>, Error> {
    if !token.contains(CURRENCY_SYMBOL) {
        return Ok(None);
    }
    let mut whole = String::new();
    let mut fraction: Option<String> = None;
    for c in token.chars() {
        match (c, fraction.as_mut()) {
            (',', None) => fraction = Some(String::new()),
            (d, None) if d.is_ascii_digit() => whole.push(d),
            (d, Some(frac)) if d.is_ascii_digit() => frac.push(d),
            _ => {}
        }
    }
    let mut fraction = fraction.unwrap_or_default();
    if whole.is_empty() && fraction.is_empty() {
        return Ok(None);
    }
    fraction.truncate(2);
    while fraction.len() < 2 {
        fraction.push('0');
    }
    let cents = format!("{whole}{fraction}")
        .parse::<i64>()
        .map_err(|e| Error::PriceParse(format!("{token:?}: {e}")))?;
    Ok(Some(Euro(cents)))
}

/// Normalizes every `|`-separated token of `text`, dropping the ones that are no price.
pub fn normalize_prices(text: &str) -> Result<Vec<Euro>, Error> {
    let mut prices = Vec::new();
    for token in text.split('|') {
        if let Some(price) = normalize_price(token)? {
            prices.push(price);
        }
    }
    Ok(prices)
}
