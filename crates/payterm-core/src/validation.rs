//! # Validation Module
//!
//! Card number checks and amount guards.
//!
//! ## Card Validation Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    validate_card("4532 0151-1283 0366")                 │
//! │                                                                         │
//! │  1. Normalize ── strip spaces and hyphens ──► "4532015112830366"        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  2. Format ───── any non-digit? ──────────► is_valid=false, Unknown     │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  3. Length ───── outside 13..=19? ────────► is_valid=false, Unknown     │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  4. Brand ────── BIN prefix table ────────► Visa                        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  5. Luhn ─────── checksum ────────────────► is_valid=true               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The brand is looked up independently of the checksum, so a mistyped Visa
//! number still reports `Visa`.
//!
//! ## Usage
//! ```rust
//! use payterm_core::validation::validate_card;
//! use payterm_core::CardBrand;
//!
//! let outcome = validate_card("4532015112830366");
//! assert!(outcome.is_valid);
//! assert_eq!(outcome.brand, CardBrand::Visa);
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{CardBrand, CardValidationOutcome};
use crate::{MAX_CARD_DIGITS, MIN_CARD_DIGITS};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

pub const MSG_CARD_VALID: &str = "Card number is valid";
pub const MSG_CARD_CHECKSUM_FAILED: &str = "Card number failed the Luhn checksum";
pub const MSG_CARD_NON_DIGIT: &str = "Card number must contain only digits, spaces or hyphens";

// =============================================================================
// BIN Table
// =============================================================================

/// An inclusive range over the first `digits` digits of a card number.
struct BinRange {
    digits: usize,
    low: u32,
    high: u32,
    brand: CardBrand,
}

const fn bin(digits: usize, low: u32, high: u32, brand: CardBrand) -> BinRange {
    BinRange {
        digits,
        low,
        high,
        brand,
    }
}

/// Prefix table, most specific entries first. First match wins.
const BIN_TABLE: &[BinRange] = &[
    // Elo
    bin(6, 636297, 636297, CardBrand::Elo),
    bin(6, 636368, 636368, CardBrand::Elo),
    bin(6, 504175, 504175, CardBrand::Elo),
    bin(6, 627780, 627780, CardBrand::Elo),
    bin(6, 506699, 506778, CardBrand::Elo),
    bin(6, 509000, 509999, CardBrand::Elo),
    bin(6, 650031, 650033, CardBrand::Elo),
    bin(6, 650035, 650051, CardBrand::Elo),
    bin(6, 650405, 650439, CardBrand::Elo),
    bin(6, 650485, 650538, CardBrand::Elo),
    bin(6, 650541, 650598, CardBrand::Elo),
    bin(6, 650700, 650718, CardBrand::Elo),
    bin(6, 650720, 650727, CardBrand::Elo),
    bin(6, 650901, 650920, CardBrand::Elo),
    bin(6, 651652, 651679, CardBrand::Elo),
    bin(6, 655000, 655019, CardBrand::Elo),
    bin(6, 655021, 655058, CardBrand::Elo),
    // Hipercard
    bin(6, 606282, 606282, CardBrand::Hipercard),
    // Mastercard 2-series
    bin(4, 2221, 2720, CardBrand::Mastercard),
    // Amex
    bin(2, 34, 34, CardBrand::Amex),
    bin(2, 37, 37, CardBrand::Amex),
    // Mastercard 5-series
    bin(2, 51, 55, CardBrand::Mastercard),
    // Visa
    bin(1, 4, 4, CardBrand::Visa),
];

// =============================================================================
// Card Validators
// =============================================================================

/// Removes the separators a cashier may type or a reader may emit.
///
/// ```rust
/// use payterm_core::validation::normalize_card_number;
///
/// assert_eq!(normalize_card_number("4532 0151-1283 0366"), "4532015112830366");
/// ```
pub fn normalize_card_number(card_number: &str) -> String {
    card_number
        .chars()
        .filter(|c| *c != ' ' && *c != '-')
        .collect()
}

/// Identifies the card network from the leading digits.
///
/// Expects an already normalized, all-digit string. Anything that matches no
/// table entry (including an empty or non-numeric prefix) is `Unknown`.
pub fn identify_brand(digits: &str) -> CardBrand {
    BIN_TABLE
        .iter()
        .find(|range| {
            digits
                .get(..range.digits)
                .and_then(|prefix| prefix.parse::<u32>().ok())
                .is_some_and(|prefix| prefix >= range.low && prefix <= range.high)
        })
        .map(|range| range.brand)
        .unwrap_or(CardBrand::Unknown)
}

/// Luhn checksum over an all-digit string.
///
/// From the rightmost digit, every second digit (starting with the
/// second-from-right) is doubled, and 9 is subtracted when the double exceeds
/// 9. The number passes when the digit sum is divisible by 10.
/// Returns `false` for empty input or any non-digit character.
///
/// ```rust
/// use payterm_core::validation::luhn_checksum_valid;
///
/// assert!(luhn_checksum_valid("4532015112830366"));
/// assert!(!luhn_checksum_valid("1234567890123456"));
/// ```
pub fn luhn_checksum_valid(digits: &str) -> bool {
    if digits.is_empty() {
        return false;
    }

    let mut sum = 0u32;
    for (position, byte) in digits.bytes().rev().enumerate() {
        if !byte.is_ascii_digit() {
            return false;
        }
        let mut digit = (byte - b'0') as u32;
        if position % 2 == 1 {
            digit *= 2;
            if digit > 9 {
                digit -= 9;
            }
        }
        sum += digit;
    }

    sum % 10 == 0
}

/// Validates a card number structurally (format, length, Luhn) and reports
/// its brand.
///
/// ## Outcomes
/// | Condition                        | is_valid | brand      | message              |
/// |----------------------------------|----------|------------|----------------------|
/// | non-digit after normalization    | false    | Unknown    | format message       |
/// | fewer than 13 / more than 19     | false    | Unknown    | length message       |
/// | Luhn fails                       | false    | from table | checksum message     |
/// | Luhn passes                      | true     | from table | "Card number is valid" |
///
/// Never panics and never returns an error: every input maps to an outcome.
pub fn validate_card(card_number: &str) -> CardValidationOutcome {
    let digits = normalize_card_number(card_number);

    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return CardValidationOutcome {
            is_valid: false,
            brand: CardBrand::Unknown,
            message: MSG_CARD_NON_DIGIT.to_string(),
        };
    }

    let length = digits.len();
    if !(MIN_CARD_DIGITS..=MAX_CARD_DIGITS).contains(&length) {
        return CardValidationOutcome {
            is_valid: false,
            brand: CardBrand::Unknown,
            message: format!(
                "Card number must have between {} and {} digits (got {})",
                MIN_CARD_DIGITS, MAX_CARD_DIGITS, length
            ),
        };
    }

    let brand = identify_brand(&digits);
    let is_valid = luhn_checksum_valid(&digits);

    CardValidationOutcome {
        is_valid,
        brand,
        message: if is_valid {
            MSG_CARD_VALID.to_string()
        } else {
            MSG_CARD_CHECKSUM_FAILED.to_string()
        },
    }
}

// =============================================================================
// Amount Validators
// =============================================================================

/// Validates a gross amount handed to fee calculation.
///
/// ## Rules
/// - Must not be negative (refunds go through their own flow)
/// - Zero is allowed: the fixed fee still applies
pub fn validate_gross_amount(amount: Money) -> ValidationResult<()> {
    if amount.is_negative() {
        return Err(ValidationError::MustNotBeNegative {
            field: "gross amount".to_string(),
        });
    }

    Ok(())
}

/// Validates the amount of a payment to authorize.
///
/// ## Rules
/// - Must be positive (> 0)
pub fn validate_payment_amount(amount: Money) -> ValidationResult<()> {
    if !amount.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "payment amount".to_string(),
        });
    }

    Ok(())
}

/// Validates a tip. Zero is the common case.
pub fn validate_tip(tip: Money) -> ValidationResult<()> {
    if tip.is_negative() {
        return Err(ValidationError::MustNotBeNegative {
            field: "tip".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Independent Luhn formulation: weights 1,2,1,2... from the right and
    /// digit-sum of each product.
    fn reference_luhn(digits: &str) -> bool {
        let total: u32 = digits
            .chars()
            .rev()
            .enumerate()
            .map(|(i, c)| {
                let product = c.to_digit(10).unwrap() * if i % 2 == 0 { 1 } else { 2 };
                product / 10 + product % 10
            })
            .sum();
        total % 10 == 0
    }

    #[test]
    fn test_valid_visa() {
        let outcome = validate_card("4532015112830366");
        assert!(outcome.is_valid);
        assert_eq!(outcome.brand, CardBrand::Visa);
        assert_eq!(outcome.message, MSG_CARD_VALID);
    }

    #[test]
    fn test_checksum_failure() {
        let outcome = validate_card("1234567890123456");
        assert!(!outcome.is_valid);
        assert_eq!(outcome.brand, CardBrand::Unknown);
        assert_eq!(outcome.message, MSG_CARD_CHECKSUM_FAILED);
    }

    #[test]
    fn test_brand_reported_when_checksum_fails() {
        let outcome = validate_card("4532015112830367");
        assert!(!outcome.is_valid);
        assert_eq!(outcome.brand, CardBrand::Visa);
    }

    #[test]
    fn test_too_short() {
        let outcome = validate_card("123");
        assert!(!outcome.is_valid);
        assert_eq!(outcome.brand, CardBrand::Unknown);
        assert_eq!(
            outcome.message,
            "Card number must have between 13 and 19 digits (got 3)"
        );
    }

    #[test]
    fn test_too_long() {
        let outcome = validate_card(&"4".repeat(20));
        assert!(!outcome.is_valid);
        assert_eq!(outcome.brand, CardBrand::Unknown);
        assert!(outcome.message.contains("(got 20)"));
    }

    #[test]
    fn test_empty_input_is_a_length_failure() {
        let outcome = validate_card("");
        assert!(!outcome.is_valid);
        assert!(outcome.message.contains("(got 0)"));
    }

    #[test]
    fn test_non_digit() {
        let outcome = validate_card("4532-0151-1283-036X");
        assert!(!outcome.is_valid);
        assert_eq!(outcome.brand, CardBrand::Unknown);
        assert_eq!(outcome.message, MSG_CARD_NON_DIGIT);

        // Unicode digits are not ASCII digits
        assert_eq!(validate_card("٤٥٣٢٠١٥١١٢٨٣٠٣٦٦").message, MSG_CARD_NON_DIGIT);
    }

    #[test]
    fn test_messages_are_distinct() {
        let messages = [
            validate_card("4532015112830366").message,
            validate_card("4532015112830367").message,
            validate_card("123").message,
            validate_card("abc").message,
        ];
        for (i, a) in messages.iter().enumerate() {
            for b in &messages[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_separators_are_normalized() {
        let spaced = validate_card("4532 0151 1283 0366");
        let hyphenated = validate_card("4532-0151-1283-0366");
        let plain = validate_card("4532015112830366");
        assert_eq!(spaced, plain);
        assert_eq!(hyphenated, plain);
    }

    #[test]
    fn test_brand_table() {
        assert_eq!(identify_brand("4111111111111111"), CardBrand::Visa);
        assert_eq!(identify_brand("5105105105105100"), CardBrand::Mastercard);
        assert_eq!(identify_brand("5555555555554444"), CardBrand::Mastercard);
        assert_eq!(identify_brand("2221000000000009"), CardBrand::Mastercard);
        assert_eq!(identify_brand("2720990000000007"), CardBrand::Mastercard);
        assert_eq!(identify_brand("378282246310005"), CardBrand::Amex);
        assert_eq!(identify_brand("341111111111111"), CardBrand::Amex);
        assert_eq!(identify_brand("6362970000457013"), CardBrand::Elo);
        assert_eq!(identify_brand("5066991111111118"), CardBrand::Elo);
        assert_eq!(identify_brand("6062825624254001"), CardBrand::Hipercard);

        // Outside every range
        assert_eq!(identify_brand("2220990000000000"), CardBrand::Unknown);
        assert_eq!(identify_brand("2721000000000000"), CardBrand::Unknown);
        assert_eq!(identify_brand("5600000000000000"), CardBrand::Unknown);
        assert_eq!(identify_brand("6011111111111117"), CardBrand::Unknown);
        assert_eq!(identify_brand("3530111333300000"), CardBrand::Unknown);
        assert_eq!(identify_brand(""), CardBrand::Unknown);
    }

    #[test]
    fn test_elo_is_not_shadowed_by_other_brands() {
        // 5067xx falls in the Elo range and must not be reported as anything else
        assert_eq!(identify_brand("5067001111111111"), CardBrand::Elo);
        // 5041 75 is Elo, 5041 76 is not
        assert_eq!(identify_brand("5041751111111111"), CardBrand::Elo);
        assert_eq!(identify_brand("5041761111111111"), CardBrand::Unknown);
    }

    #[test]
    fn test_idempotent() {
        assert_eq!(validate_card("378282246310005"), validate_card("378282246310005"));
    }

    #[test]
    fn test_luhn_rejects_non_digits_and_empty() {
        assert!(!luhn_checksum_valid(""));
        assert!(!luhn_checksum_valid("4532a15112830366"));
    }

    #[test]
    fn test_amount_validators() {
        assert!(validate_gross_amount(Money::zero()).is_ok());
        assert!(validate_gross_amount(Money::from_cents(100)).is_ok());
        assert!(validate_gross_amount(Money::from_cents(-1)).is_err());

        assert!(validate_payment_amount(Money::from_cents(1)).is_ok());
        assert!(validate_payment_amount(Money::zero()).is_err());
        assert!(validate_payment_amount(Money::from_cents(-100)).is_err());

        assert!(validate_tip(Money::zero()).is_ok());
        assert!(validate_tip(Money::from_cents(-1)).is_err());
    }

    proptest! {
        #[test]
        fn prop_validity_matches_luhn(digits in "[0-9]{13,19}") {
            let outcome = validate_card(&digits);
            prop_assert_eq!(outcome.is_valid, reference_luhn(&digits));
        }

        #[test]
        fn prop_valid_visa_reports_visa(body in "4[0-9]{14}") {
            // Append the check digit that makes the number pass
            let check = (0..10u32)
                .find(|d| reference_luhn(&format!("{}{}", body, d)))
                .unwrap();
            let number = format!("{}{}", body, check);

            let outcome = validate_card(&number);
            prop_assert!(outcome.is_valid);
            prop_assert_eq!(outcome.brand, CardBrand::Visa);
        }

        #[test]
        fn prop_wrong_length_never_valid(digits in "[0-9]{0,12}|[0-9]{20,25}") {
            let outcome = validate_card(&digits);
            prop_assert!(!outcome.is_valid);
            prop_assert_eq!(outcome.brand, CardBrand::Unknown);
        }
    }
}
