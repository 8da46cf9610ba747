//! Prices

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::products::PriceField;

/// Errors that can occur while converting amounts.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PricingError {
    /// The amount does not fit in minor currency units.
    #[error("amount {0} is out of range for minor currency units")]
    OutOfRange(Decimal),
}

/// Resolve the unit price of a product.
///
/// Priority order:
///
/// 1. a numeric list price greater than zero;
/// 2. a textual legacy price, parsed with [`parse_price_text`];
/// 3. a numeric legacy price;
/// 4. zero.
pub fn unit_price(list_price: Option<Decimal>, price: Option<&PriceField>) -> Decimal {
    if let Some(list_price) = list_price.filter(|amount| *amount > Decimal::ZERO) {
        return list_price;
    }

    match price {
        Some(PriceField::Text(text)) => parse_price_text(text),
        Some(PriceField::Amount(amount)) => *amount,
        None => Decimal::ZERO,
    }
}

/// Parse a formatted price such as `"$ 1,234.50"`.
///
/// Currency symbols, thousands separators and whitespace are stripped, then the longest
/// leading number is read. Text with no leading number yields zero.
pub fn parse_price_text(text: &str) -> Decimal {
    let cleaned: String = text
        .chars()
        .filter(|c| *c != '$' && *c != ',' && !c.is_whitespace())
        .collect();

    leading_number(&cleaned).unwrap_or(Decimal::ZERO)
}

/// Convert an amount to minor currency units, `round(amount × 100)` with midpoints rounded
/// away from zero.
///
/// # Errors
///
/// Returns [`PricingError::OutOfRange`] when the result does not fit in an `i64`.
pub fn amount_in_minor_units(amount: Decimal) -> Result<i64, PricingError> {
    amount
        .checked_mul(Decimal::ONE_HUNDRED)
        .map(|cents| cents.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|cents| cents.to_i64())
        .ok_or(PricingError::OutOfRange(amount))
}

/// Wrap an amount in minor units as money in the given currency.
pub fn money_from_minor(amount: i64, currency: &'static Currency) -> Money<'static, Currency> {
    Money::from_minor(amount, currency)
}

/// Read the longest numeric prefix of `text`: optional sign, digits with an optional
/// fractional part, and an optional exponent.
fn leading_number(text: &str) -> Option<Decimal> {
    let mut chars = text.chars().peekable();
    let mut mantissa = String::new();

    if let Some(sign) = chars.next_if(|c| *c == '-' || *c == '+') {
        if sign == '-' {
            mantissa.push('-');
        }
    }

    let mut integer_digits = String::new();
    while let Some(digit) = chars.next_if(char::is_ascii_digit) {
        integer_digits.push(digit);
    }

    let mut fraction_digits = String::new();
    if chars.next_if_eq(&'.').is_some() {
        while let Some(digit) = chars.next_if(char::is_ascii_digit) {
            fraction_digits.push(digit);
        }
    }

    if integer_digits.is_empty() && fraction_digits.is_empty() {
        return None;
    }

    mantissa.push_str(if integer_digits.is_empty() {
        "0"
    } else {
        &integer_digits
    });

    if !fraction_digits.is_empty() {
        mantissa.push('.');
        mantissa.push_str(&fraction_digits);
    }

    let exponent = exponent(&mut chars);

    match exponent {
        Some(exponent) => Decimal::from_scientific(&format!("{mantissa}e{exponent}")).ok(),
        None => Decimal::from_str(&mantissa).ok(),
    }
}

/// Read an exponent suffix (`e-3`, `E+2`), but only when it carries digits.
fn exponent(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> Option<String> {
    let mut lookahead = chars.clone();

    lookahead.next_if(|c| *c == 'e' || *c == 'E')?;

    let mut exponent = String::new();
    if let Some(sign) = lookahead.next_if(|c| *c == '-' || *c == '+') {
        exponent.push(sign);
    }

    let digits_start = exponent.len();
    while let Some(digit) = lookahead.next_if(char::is_ascii_digit) {
        exponent.push(digit);
    }

    if exponent.len() == digits_start {
        return None;
    }

    *chars = lookahead;

    Some(exponent)
}

#[cfg(test)]
mod tests {
    use rusty_money::iso;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn positive_list_price_wins() {
        let price = PriceField::Text("$99".to_string());

        assert_eq!(
            unit_price(Some(Decimal::new(1000, 0)), Some(&price)),
            Decimal::new(1000, 0)
        );
    }

    #[test]
    fn zero_list_price_falls_back_to_text_price() {
        let price = PriceField::Text("$1,234.50".to_string());

        assert_eq!(
            unit_price(Some(Decimal::ZERO), Some(&price)),
            Decimal::new(123_450, 2)
        );
    }

    #[test]
    fn numeric_legacy_price_used_without_list_price() {
        let price = PriceField::Amount(Decimal::new(75, 1));

        assert_eq!(unit_price(None, Some(&price)), Decimal::new(75, 1));
    }

    #[test]
    fn missing_prices_resolve_to_zero() {
        assert_eq!(unit_price(None, None), Decimal::ZERO);
        assert_eq!(unit_price(Some(Decimal::ZERO), None), Decimal::ZERO);
    }

    #[test]
    fn negative_list_price_is_ignored() {
        let price = PriceField::Amount(Decimal::new(5, 0));

        assert_eq!(
            unit_price(Some(Decimal::new(-1, 0)), Some(&price)),
            Decimal::new(5, 0)
        );
    }

    #[test]
    fn parse_price_text_strips_formatting() {
        assert_eq!(parse_price_text(" $ 12,000 "), Decimal::new(12_000, 0));
        assert_eq!(parse_price_text("1234.5"), Decimal::new(12_345, 1));
        assert_eq!(parse_price_text(".5"), Decimal::new(5, 1));
        assert_eq!(parse_price_text("-3"), Decimal::new(-3, 0));
    }

    #[test]
    fn parse_price_text_reads_leading_number_only() {
        assert_eq!(parse_price_text("12.5 COP"), Decimal::new(125, 1));
        assert_eq!(parse_price_text("7e2"), Decimal::new(700, 0));
        assert_eq!(parse_price_text("7e"), Decimal::new(7, 0));
    }

    #[test]
    fn parse_price_text_without_number_is_zero() {
        assert_eq!(parse_price_text(""), Decimal::ZERO);
        assert_eq!(parse_price_text("N/A"), Decimal::ZERO);
        assert_eq!(parse_price_text("$."), Decimal::ZERO);
    }

    #[test]
    fn minor_units_round_half_away_from_zero() -> TestResult {
        assert_eq!(amount_in_minor_units(Decimal::new(2500, 0))?, 250_000);
        assert_eq!(amount_in_minor_units(Decimal::new(10_005, 4))?, 100);
        assert_eq!(amount_in_minor_units(Decimal::new(1_005, 3))?, 101);

        Ok(())
    }

    #[test]
    fn minor_units_out_of_range() {
        assert_eq!(
            amount_in_minor_units(Decimal::MAX),
            Err(PricingError::OutOfRange(Decimal::MAX))
        );
    }

    #[test]
    fn money_from_minor_keeps_currency() {
        let money = money_from_minor(250_000, iso::COP);

        assert_eq!(money.currency().iso_alpha_code, "COP");
        assert!(money.is_positive(), "expected a positive amount");
    }
}
