//! Monetary string parsing and formatting
//!
//! Line item amounts arrive pre-formatted with a currency symbol
//! (e.g. "£11.00"). The composer never recomputes them; it only parses
//! the `total` fields to accumulate the document total.

use thiserror::Error;

/// Why a monetary string could not be parsed
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AmountError {
    #[error("expected leading currency symbol '{0}'")]
    MissingSymbol(String),

    #[error("'{0}' is not a decimal amount")]
    NotDecimal(String),
}

/// Parse a symbol-prefixed decimal amount
///
/// The value must start with the exact configured symbol (unless the
/// symbol is empty); the remainder must be an unsigned decimal, with
/// thousands separators only in thousands positions. Anything else is a
/// data contract violation -- signs, `inf`/`NaN` and stray separators
/// are rejected rather than passed to the float parser.
pub fn parse_amount(value: &str, symbol: &str) -> Result<f64, AmountError> {
    let trimmed = value.trim();

    let rest = if symbol.is_empty() {
        trimmed
    } else {
        trimmed
            .strip_prefix(symbol)
            .ok_or_else(|| AmountError::MissingSymbol(symbol.to_string()))?
    };

    let number = rest.trim();
    if !is_unsigned_decimal(number) {
        return Err(AmountError::NotDecimal(value.to_string()));
    }
    number
        .replace(',', "")
        .parse::<f64>()
        .map_err(|_| AmountError::NotDecimal(value.to_string()))
}

/// Digits with optional thousands groups and an optional fraction
fn is_unsigned_decimal(s: &str) -> bool {
    let all_digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());

    let (int_part, frac_part) = match s.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (s, None),
    };

    if let Some(frac) = frac_part {
        if !all_digits(frac) {
            return false;
        }
    }

    let mut groups = int_part.split(',');
    let first = groups.next().unwrap_or_default();
    if !all_digits(first) {
        return false;
    }
    let mut grouped = false;
    for group in groups {
        grouped = true;
        if group.len() != 3 || !all_digits(group) {
            return false;
        }
    }
    // "1234,567" would be ambiguous; grouped numbers lead with 1-3 digits
    !(grouped && first.len() > 3)
}

/// Format an amount to two decimal places, prefixed with the symbol
pub fn format_amount(amount: f64, symbol: &str) -> String {
    format!("{symbol}{amount:.2}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_pound() {
        assert_eq!(parse_amount("£11.00", "£"), Ok(11.0));
    }

    #[test]
    fn test_parse_with_whitespace() {
        assert_eq!(parse_amount("  £5.50 ", "£"), Ok(5.5));
        assert_eq!(parse_amount("£ 5.50", "£"), Ok(5.5));
    }

    #[test]
    fn test_parse_thousands_separator() {
        assert_eq!(parse_amount("£1,234.56", "£"), Ok(1234.56));
    }

    #[test]
    fn test_parse_empty_symbol() {
        assert_eq!(parse_amount("42.00", ""), Ok(42.0));
    }

    #[test]
    fn test_wrong_symbol_rejected() {
        assert_eq!(
            parse_amount("$11.00", "£"),
            Err(AmountError::MissingSymbol("£".to_string()))
        );
    }

    #[test]
    fn test_garbage_rejected() {
        assert_eq!(
            parse_amount("£abc", "£"),
            Err(AmountError::NotDecimal("£abc".to_string()))
        );
    }

    #[test]
    fn test_non_finite_rejected() {
        assert_eq!(
            parse_amount("£inf", "£"),
            Err(AmountError::NotDecimal("£inf".to_string()))
        );
        assert_eq!(
            parse_amount("£NaN", "£"),
            Err(AmountError::NotDecimal("£NaN".to_string()))
        );
    }

    #[test]
    fn test_negative_rejected() {
        assert_eq!(
            parse_amount("£-5.00", "£"),
            Err(AmountError::NotDecimal("£-5.00".to_string()))
        );
        assert_eq!(
            parse_amount("£+5.00", "£"),
            Err(AmountError::NotDecimal("£+5.00".to_string()))
        );
    }

    #[test]
    fn test_misplaced_separators_rejected() {
        for bad in ["£1,2,3", "£1234,567", "£,100", "£1,0000", "£5.", "£.50", "£1.2.3"] {
            assert_eq!(
                parse_amount(bad, "£"),
                Err(AmountError::NotDecimal(bad.to_string())),
                "accepted {bad}"
            );
        }
    }

    #[test]
    fn test_grouped_amounts_accepted() {
        assert_eq!(parse_amount("£12", "£"), Ok(12.0));
        assert_eq!(parse_amount("£123,456,789.01", "£"), Ok(123_456_789.01));
    }

    #[test]
    fn test_format_two_decimals() {
        assert_eq!(format_amount(11.0, "£"), "£11.00");
        assert_eq!(format_amount(0.0, "£"), "£0.00");
        assert_eq!(format_amount(1234.5, "$"), "$1234.50");
    }

    #[test]
    fn test_multi_char_symbol() {
        assert_eq!(parse_amount("CHF 12.00", "CHF"), Ok(12.0));
    }
}
