//! # Currency Formatting
//!
//! Renders [`Money`] for display. Every amount is shown with exactly two
//! fraction digits and locale-specific separators. The currency itself is
//! fixed per installation; there is no runtime switching.
//!
//! ```text
//! en-US  USD   $1,234.56
//! en-GB  GBP   £1,234.56
//! de-DE  EUR   1.234,56 €
//! fr-FR  EUR   1 234,56 €
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::money::PreciseMoney;

/// Where the currency symbol sits relative to the number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum SymbolPosition {
    /// `$1.00`
    Prefix,
    /// `1,00 €`
    Suffix,
}

/// Display rules for one currency in one locale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CurrencyFormat {
    /// ISO 4217 code ("USD").
    pub code: String,
    pub symbol: String,
    pub symbol_position: SymbolPosition,
    pub group_separator: String,
    pub decimal_separator: String,
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        CurrencyFormat::for_locale("en-US", "USD")
    }
}

impl CurrencyFormat {
    /// Builds the format for `currency` displayed in `locale`.
    ///
    /// Unknown locales fall back to en-US separators. Unknown currencies use
    /// the code itself as the symbol.
    ///
    /// ```rust
    /// use harvest_core::{CurrencyFormat, Money};
    ///
    /// let de = CurrencyFormat::for_locale("de-DE", "EUR");
    /// assert_eq!(de.format(Money::from_cents(123456)), "1.234,56 €");
    /// ```
    pub fn for_locale(locale: &str, currency: &str) -> Self {
        let code = currency.trim().to_uppercase();
        let symbol = symbol_for(&code);

        let (symbol_position, group, decimal) = match locale.trim() {
            "de-DE" | "de-AT" | "es-ES" | "it-IT" | "nl-NL" => {
                (SymbolPosition::Suffix, ".", ",")
            }
            // NARROW NO-BREAK SPACE is what browsers emit for fr-FR grouping.
            "fr-FR" | "fr-CA" => (SymbolPosition::Suffix, "\u{202f}", ","),
            "en-GB" | "en-US" | "en-CA" | "en-AU" => (SymbolPosition::Prefix, ",", "."),
            _ => (SymbolPosition::Prefix, ",", "."),
        };

        CurrencyFormat {
            code,
            symbol,
            symbol_position,
            group_separator: group.to_string(),
            decimal_separator: decimal.to_string(),
        }
    }

    /// Formats an amount with two fraction digits and grouping.
    pub fn format(&self, amount: Money) -> String {
        let cents = amount.cents();
        let negative = cents < 0;
        let abs = cents.unsigned_abs();

        let whole = group_digits(abs / 100, &self.group_separator);
        let number = format!("{}{}{:02}", whole, self.decimal_separator, abs % 100);
        let sign = if negative { "-" } else { "" };

        match self.symbol_position {
            SymbolPosition::Prefix => format!("{sign}{}{number}", self.symbol),
            SymbolPosition::Suffix => format!("{sign}{number} {}", self.symbol),
        }
    }

    /// Formats a full-precision amount, rounding to cents first.
    pub fn format_precise(&self, amount: PreciseMoney) -> String {
        self.format(amount.round_to_cents())
    }
}

fn symbol_for(code: &str) -> String {
    match code {
        "USD" | "CAD" | "AUD" => "$",
        "EUR" => "€",
        "GBP" => "£",
        "JPY" => "¥",
        "PKR" => "Rs",
        other => other,
    }
    .to_string()
}

fn group_digits(mut value: u64, separator: &str) -> String {
    if value < 1_000 {
        return value.to_string();
    }
    let mut groups = Vec::new();
    while value >= 1_000 {
        groups.push(format!("{:03}", value % 1_000));
        value /= 1_000;
    }
    groups.push(value.to_string());
    groups.reverse();
    groups.join(separator)
}
