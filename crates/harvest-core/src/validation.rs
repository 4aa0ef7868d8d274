//! # Validation Module
//!
//! Input validation for the register and menu management screens.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Browser form                                                 │
//! │  └── Immediate feedback (empty fields, number inputs)                  │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Money / quantity parsing                                          │
//! │  ├── Checkout preconditions (non-empty ticket, cash covers total)     │
//! │  └── Menu item fields                                                  │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Hosted backend constraints                                   │
//! │                                                                         │
//! │  A failure here never reaches the backend.                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::ticket::Ticket;
use crate::types::{MenuItem, PaymentMethod};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

const MAX_NAME_LEN: usize = 100;
const MAX_CATEGORY_LEN: usize = 50;
const MAX_NOTES_LEN: usize = 500;

/// Highest accepted menu price ($100,000.00).
///
/// At this price a full line of [`crate::MAX_ITEM_QUANTITY`] taxed at 100%
/// stays well inside `i64` micro-cents.
pub const MAX_PRICE: Money = Money::from_cents(10_000_000);

// =============================================================================
// Numeric Input
// =============================================================================

/// Parses an operator-entered amount ("4.50", "4.5", "$4.50", "4") into cents.
///
/// ```rust
/// use harvest_core::validation::parse_money;
///
/// assert_eq!(parse_money("price", "4.50").unwrap().cents(), 450);
/// assert_eq!(parse_money("price", " $12 ").unwrap().cents(), 1200);
/// assert!(parse_money("price", "four").is_err());
/// assert!(parse_money("price", "1.005").is_err());
/// ```
pub fn parse_money(field: &str, input: &str) -> ValidationResult<Money> {
    let trimmed = input.trim();
    let raw = trimmed.strip_prefix('$').unwrap_or(trimmed).trim();

    if raw.is_empty() {
        return Err(ValidationError::required(field));
    }
    if raw.starts_with('-') {
        return Err(ValidationError::Negative {
            field: field.to_string(),
        });
    }

    let (whole, frac) = match raw.split_once('.') {
        Some((w, f)) => (w, f),
        None => (raw, ""),
    };

    let digits_only = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    if (whole.is_empty() && frac.is_empty()) || !digits_only(whole) || !digits_only(frac) {
        return Err(ValidationError::not_numeric(field, input));
    }
    if frac.len() > 2 {
        return Err(ValidationError::TooPrecise {
            field: field.to_string(),
            places: 2,
        });
    }

    let whole: i64 = if whole.is_empty() {
        0
    } else {
        whole
            .parse()
            .map_err(|_| ValidationError::not_numeric(field, input))?
    };
    let frac_cents: i64 = match frac.len() {
        0 => 0,
        1 => frac.parse::<i64>().unwrap_or(0) * 10,
        _ => frac.parse::<i64>().unwrap_or(0),
    };

    whole
        .checked_mul(100)
        .and_then(|c| c.checked_add(frac_cents))
        .map(Money::from_cents)
        .ok_or_else(|| ValidationError::not_numeric(field, input))
}

/// Parses a quantity input. Range clamping is the ticket's job; this only
/// rejects text that is not an integer.
pub fn parse_quantity(input: &str) -> ValidationResult<i64> {
    input
        .trim()
        .parse::<i64>()
        .map_err(|_| ValidationError::not_numeric("quantity", input))
}

// =============================================================================
// Checkout Preconditions
// =============================================================================

/// A ticket must have at least one line to be checked out.
pub fn validate_ticket_for_checkout(ticket: &Ticket) -> ValidationResult<()> {
    if ticket.is_empty() {
        return Err(ValidationError::EmptyTicket);
    }
    Ok(())
}

/// Cash must cover the total. Card and mobile tenders are taken for the
/// exact amount by the terminal, so only cash is checked.
pub fn validate_tender(
    total: Money,
    tendered: Option<Money>,
    method: PaymentMethod,
) -> ValidationResult<()> {
    if let (PaymentMethod::Cash, Some(tendered)) = (method, tendered) {
        if tendered < total {
            return Err(ValidationError::InsufficientTender {
                total: total.to_string(),
                tendered: tendered.to_string(),
            });
        }
    }
    Ok(())
}

/// Order notes are optional but bounded.
pub fn validate_notes(notes: Option<&str>) -> ValidationResult<Option<String>> {
    match notes.map(str::trim) {
        None | Some("") => Ok(None),
        Some(n) if n.chars().count() > MAX_NOTES_LEN => Err(ValidationError::TooLong {
            field: "notes".to_string(),
            max: MAX_NOTES_LEN,
        }),
        Some(n) => Ok(Some(n.to_string())),
    }
}

// =============================================================================
// Menu Management
// =============================================================================

/// Builds a menu item from the menu management form.
///
/// ## Rules
/// - name: required, at most 100 characters
/// - price: a non-negative amount with at most 2 decimals, up to [`MAX_PRICE`]
/// - category: required, at most 50 characters
///
/// ```rust
/// use harvest_core::validation::menu_item_from_input;
///
/// let item = menu_item_from_input("m9", "Chai Latte", "4.75", "Tea").unwrap();
/// assert_eq!(item.price.cents(), 475);
/// assert!(menu_item_from_input("m9", "", "4.75", "Tea").is_err());
/// ```
pub fn menu_item_from_input(
    id: &str,
    name: &str,
    price: &str,
    category: &str,
) -> ValidationResult<MenuItem> {
    let name = required_text("name", name, MAX_NAME_LEN)?;
    let category = required_text("category", category, MAX_CATEGORY_LEN)?;
    let price = parse_money("price", price)?;
    check_price(price)?;
    Ok(MenuItem::new(id, name, price, category))
}

/// Re-checks an already-typed menu item before it is written.
pub fn validate_menu_item(item: &MenuItem) -> ValidationResult<()> {
    required_text("id", &item.id, MAX_NAME_LEN)?;
    required_text("name", &item.name, MAX_NAME_LEN)?;
    required_text("category", &item.category, MAX_CATEGORY_LEN)?;
    check_price(item.price)
}

fn check_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::Negative {
            field: "price".to_string(),
        });
    }
    if price > MAX_PRICE {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: Money::zero().to_string(),
            max: MAX_PRICE.to_string(),
        });
    }
    Ok(())
}

fn required_text(field: &str, value: &str, max: usize) -> ValidationResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::required(field));
    }
    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }
    Ok(value.to_string())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TaxRate;
    use crate::MAX_ITEM_QUANTITY;

    #[test]
    fn test_parse_money_accepts_common_shapes() {
        assert_eq!(parse_money("p", "4.50").unwrap().cents(), 450);
        assert_eq!(parse_money("p", "4.5").unwrap().cents(), 450);
        assert_eq!(parse_money("p", "4").unwrap().cents(), 400);
        assert_eq!(parse_money("p", ".95").unwrap().cents(), 95);
        assert_eq!(parse_money("p", "$0.01").unwrap().cents(), 1);
        assert_eq!(parse_money("p", "12.").unwrap().cents(), 1200);
    }

    #[test]
    fn test_parse_money_rejects_bad_input() {
        assert!(matches!(
            parse_money("price", "abc"),
            Err(ValidationError::NotNumeric { .. })
        ));
        assert!(matches!(
            parse_money("price", "1.2.3"),
            Err(ValidationError::NotNumeric { .. })
        ));
        assert!(matches!(
            parse_money("price", "-1"),
            Err(ValidationError::Negative { .. })
        ));
        assert!(matches!(
            parse_money("price", "1.999"),
            Err(ValidationError::TooPrecise { .. })
        ));
        assert!(matches!(
            parse_money("price", "  "),
            Err(ValidationError::Required { .. })
        ));
        assert!(matches!(
            parse_money("price", "."),
            Err(ValidationError::NotNumeric { .. })
        ));
    }

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity(" 3 ").unwrap(), 3);
        assert_eq!(parse_quantity("-2").unwrap(), -2);
        assert!(parse_quantity("two").is_err());
        assert!(parse_quantity("1.5").is_err());
    }

    #[test]
    fn test_empty_ticket_rejected() {
        let ticket = Ticket::new(TaxRate::default());
        assert_eq!(
            validate_ticket_for_checkout(&ticket),
            Err(ValidationError::EmptyTicket)
        );
    }

    #[test]
    fn test_cash_tender_must_cover_total() {
        let total = Money::from_cents(1113);
        assert!(validate_tender(total, Some(Money::from_cents(1000)), PaymentMethod::Cash).is_err());
        assert!(validate_tender(total, Some(Money::from_cents(2000)), PaymentMethod::Cash).is_ok());
        assert!(validate_tender(total, None, PaymentMethod::Cash).is_ok());
        assert!(validate_tender(total, Some(Money::zero()), PaymentMethod::Card).is_ok());
    }

    #[test]
    fn test_notes_trimmed_and_bounded() {
        assert_eq!(validate_notes(None).unwrap(), None);
        assert_eq!(validate_notes(Some("  ")).unwrap(), None);
        assert_eq!(validate_notes(Some(" to go ")).unwrap().as_deref(), Some("to go"));
        assert!(validate_notes(Some(&"x".repeat(501))).is_err());
    }

    #[test]
    fn test_menu_item_validation() {
        assert!(menu_item_from_input("m1", "Latte", "4.50", "").is_err());
        assert!(menu_item_from_input("m1", "Latte", "free", "Coffee").is_err());
        assert!(menu_item_from_input("m1", &"L".repeat(101), "4.50", "Coffee").is_err());

        let mut item = menu_item_from_input("m1", " Latte ", "4.50", "Coffee").unwrap();
        assert_eq!(item.name, "Latte");
        assert!(validate_menu_item(&item).is_ok());

        item.price = Money::from_cents(-1);
        assert!(validate_menu_item(&item).is_err());
    }

    #[test]
    fn test_price_upper_bound() {
        let item = menu_item_from_input("big", "Catering", "100000.00", "Food").unwrap();
        assert_eq!(item.price, MAX_PRICE);
        assert!(validate_menu_item(&item).is_ok());

        for input in ["100000.01", "10000000000000"] {
            assert!(matches!(
                menu_item_from_input("big", "Catering", input, "Food"),
                Err(ValidationError::OutOfRange { .. })
            ));
        }

        let mut item = item;
        item.price = Money::from_cents(i64::MAX);
        assert!(validate_menu_item(&item).is_err());
    }

    #[test]
    fn test_largest_valid_line_totals_exactly() {
        let mut ticket = Ticket::new(TaxRate::from_percentage(100.0).unwrap());
        let item = menu_item_from_input("big", "Catering", "100000.00", "Food").unwrap();
        ticket.add_item(&item);
        ticket.update_quantity("big", MAX_ITEM_QUANTITY);

        let totals = ticket.totals();
        let subtotal = MAX_PRICE.cents() * MAX_ITEM_QUANTITY;
        assert_eq!(totals.subtotal.cents(), subtotal);
        assert_eq!(totals.tax.micro_cents(), subtotal * 1_000_000);
        assert_eq!(totals.rounded().total.cents(), subtotal * 2);
    }
}
