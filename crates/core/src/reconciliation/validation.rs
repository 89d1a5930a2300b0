//! Input coercion for values arriving as text.

use std::str::FromStr;

use rust_decimal::Decimal;

use super::attachment::AttachmentKind;
use super::error::ReconciliationError;
use super::types::Origin;

/// Largest accepted amount, `999_999_999_999.99`.
///
/// Keeps project and report sums far from `Decimal::MAX`.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(276_447_231, 23_283, 0, false, 2);

/// Longest attachment file name, in characters.
pub const MAX_FILE_NAME_LEN: usize = 255;

/// Parse an origin string.
///
/// # Errors
///
/// Returns `InvalidOrigin` for anything other than `roster` or `plan`.
pub fn parse_origin(value: &str) -> Result<Origin, ReconciliationError> {
    Origin::parse(value.trim()).ok_or_else(|| ReconciliationError::invalid_origin(value))
}

/// Parse an attachment kind string.
///
/// # Errors
///
/// Returns `InvalidAttachmentKind` for anything other than `receipt` or `invoice`.
pub fn parse_attachment_kind(value: &str) -> Result<AttachmentKind, ReconciliationError> {
    AttachmentKind::parse(value.trim())
        .ok_or_else(|| ReconciliationError::invalid_attachment_kind(value))
}

/// Coerce a textual amount into a non-negative decimal.
///
/// Accepts plain (`"1500.50"`) and scientific (`"1.5e3"`) notation. A blank
/// string is zero.
///
/// # Errors
///
/// Returns `InvalidAmount` if the value is not numeric or is negative.
pub fn parse_amount(value: &str) -> Result<Decimal, ReconciliationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(Decimal::ZERO);
    }

    let amount = Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|_| ReconciliationError::invalid_amount(value))?;

    validate_amount(amount)
}

/// Check that an amount lies in `0..=MAX_AMOUNT`.
///
/// # Errors
///
/// Returns `InvalidAmount` if `amount < 0` or `amount > MAX_AMOUNT`.
pub fn validate_amount(amount: Decimal) -> Result<Decimal, ReconciliationError> {
    if amount.is_zero() {
        return Ok(Decimal::ZERO);
    }
    if amount.is_sign_negative() || amount > MAX_AMOUNT {
        return Err(ReconciliationError::invalid_amount(amount.to_string()));
    }
    Ok(amount)
}

/// Trim an attachment file name and check its length.
///
/// # Errors
///
/// Returns `InvalidFileName` if the name is blank or longer than
/// [`MAX_FILE_NAME_LEN`] characters.
pub fn validate_file_name(name: &str) -> Result<String, ReconciliationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() || trimmed.chars().count() > MAX_FILE_NAME_LEN {
        return Err(ReconciliationError::invalid_file_name(name));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case("1500", dec!(1500))]
    #[case("1500.50", dec!(1500.50))]
    #[case(" 42 ", dec!(42))]
    #[case("0", dec!(0))]
    #[case("", dec!(0))]
    #[case("1.5e3", dec!(1500))]
    fn test_parse_amount_valid(#[case] input: &str, #[case] expected: Decimal) {
        assert_eq!(parse_amount(input).unwrap(), expected);
    }

    #[rstest]
    #[case("-1")]
    #[case("-0.01")]
    #[case("abc")]
    #[case("12,50")]
    #[case("NaN")]
    fn test_parse_amount_invalid(#[case] input: &str) {
        assert!(matches!(
            parse_amount(input),
            Err(ReconciliationError::InvalidAmount(_))
        ));
    }

    #[test]
    fn test_max_amount_value() {
        assert_eq!(MAX_AMOUNT, dec!(999999999999.99));
    }

    #[rstest]
    #[case("999999999999.99", true)]
    #[case("1000000000000", false)]
    #[case("79228162514264337593543950335", false)]
    fn test_parse_amount_ceiling(#[case] input: &str, #[case] accepted: bool) {
        let result = parse_amount(input);
        if accepted {
            assert_eq!(result.unwrap(), MAX_AMOUNT);
        } else {
            assert!(matches!(result, Err(ReconciliationError::InvalidAmount(_))));
        }
    }

    #[test]
    fn test_validate_file_name() {
        assert_eq!(validate_file_name(" recibo.pdf ").unwrap(), "recibo.pdf");
        assert!(validate_file_name(&"é".repeat(MAX_FILE_NAME_LEN)).is_ok());

        let too_long = format!("{}.pdf", "a".repeat(MAX_FILE_NAME_LEN));
        assert!(matches!(
            validate_file_name(&too_long),
            Err(ReconciliationError::InvalidFileName(_))
        ));
        assert!(matches!(
            validate_file_name("   "),
            Err(ReconciliationError::InvalidFileName(_))
        ));
    }

    #[test]
    fn test_negative_zero_is_zero() {
        assert_eq!(parse_amount("-0").unwrap(), Decimal::ZERO);
    }

    #[rstest]
    #[case("roster", Origin::Roster)]
    #[case("plan", Origin::Plan)]
    #[case(" plan", Origin::Plan)]
    fn test_parse_origin_valid(#[case] input: &str, #[case] expected: Origin) {
        assert_eq!(parse_origin(input).unwrap(), expected);
    }

    #[rstest]
    #[case("equipe")]
    #[case("Roster")]
    #[case("")]
    fn test_parse_origin_invalid(#[case] input: &str) {
        assert!(matches!(
            parse_origin(input),
            Err(ReconciliationError::InvalidOrigin(_))
        ));
    }

    #[rstest]
    #[case("receipt", AttachmentKind::Receipt)]
    #[case("invoice", AttachmentKind::Invoice)]
    fn test_parse_kind_valid(#[case] input: &str, #[case] expected: AttachmentKind) {
        assert_eq!(parse_attachment_kind(input).unwrap(), expected);
    }

    #[test]
    fn test_parse_kind_invalid() {
        assert!(matches!(
            parse_attachment_kind("contract"),
            Err(ReconciliationError::InvalidAttachmentKind(_))
        ));
    }
}
