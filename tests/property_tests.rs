//! Property-based tests for the field validators
//!
//! These tests verify that:
//! - Any CPF carrying correctly computed check digits passes strict mode
//! - Relaxed mode only looks at the mask
//! - Strings that do not follow the mask are rejected in both modes
//! - The age rule agrees with whole-year arithmetic

#[cfg(test)]
mod tests {
    use chrono::{Datelike, NaiveDate};
    use proptest::prelude::*;
    use student_registry::core::ValidationError;
    use student_registry::validation::{
        age_on, cpf_check_digits_match, validate_birthdate_and_age_on, validate_phone,
        ValidationConfig, Validator, MINIMUM_AGE,
    };

    fn strict() -> Validator {
        Validator::new(ValidationConfig { strict_cpf: true })
    }

    fn relaxed() -> Validator {
        Validator::new(ValidationConfig { strict_cpf: false })
    }

    fn check_digit(digits: &[u32]) -> u32 {
        let top = digits.len() as u32 + 1;
        let sum: u32 = digits.iter().enumerate().map(|(i, d)| d * (top - i as u32)).sum();
        let r = sum % 11;
        if r < 2 {
            0
        } else {
            11 - r
        }
    }

    fn masked(digits: &[u32]) -> String {
        let s: String = digits.iter().map(|d| char::from_digit(*d, 10).unwrap()).collect();
        format!("{}.{}.{}-{}", &s[0..3], &s[3..6], &s[6..9], &s[9..11])
    }

    /// Nine base digits, not all the same, completed with their check digits
    fn arb_valid_cpf() -> impl Strategy<Value = String> {
        prop::collection::vec(0u32..10, 9)
            .prop_filter("repeated digit", |d| d.iter().any(|x| *x != d[0]))
            .prop_map(|mut digits| {
                let first = check_digit(&digits);
                digits.push(first);
                let second = check_digit(&digits);
                digits.push(second);
                masked(&digits)
            })
    }

    fn arb_masked_cpf() -> impl Strategy<Value = String> {
        "[0-9]{3}\\.[0-9]{3}\\.[0-9]{3}-[0-9]{2}"
    }

    fn arb_date() -> impl Strategy<Value = NaiveDate> {
        (1950i32..2030, 1u32..=12, 1u32..=28)
            .prop_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap())
    }

    proptest! {
        #[test]
        fn test_generated_cpfs_pass_strict_mode(cpf in arb_valid_cpf()) {
            prop_assert!(cpf_check_digits_match(&cpf));
            prop_assert_eq!(strict().validate_cpf(&cpf), Ok(()));
        }

        #[test]
        fn test_relaxed_mode_accepts_any_mask(cpf in arb_masked_cpf()) {
            prop_assert_eq!(relaxed().validate_cpf(&cpf), Ok(()));
        }

        #[test]
        fn test_changing_a_check_digit_fails_strict_mode(cpf in arb_valid_cpf(), bump in 1u32..10) {
            let mut chars: Vec<char> = cpf.chars().collect();
            let last = chars.len() - 1;
            let digit = chars[last].to_digit(10).unwrap();
            chars[last] = char::from_digit((digit + bump) % 10, 10).unwrap();
            let tampered: String = chars.into_iter().collect();
            prop_assert_eq!(strict().validate_cpf(&tampered), Err(ValidationError::CpfCheckDigits));
        }

        #[test]
        fn test_unmasked_cpfs_are_rejected_in_both_modes(raw in "[0-9]{11}|[0-9./-]{1,13}|[a-z ]{1,14}") {
            prop_assert_eq!(strict().validate_cpf(&raw), Err(ValidationError::CpfFormat));
            prop_assert_eq!(relaxed().validate_cpf(&raw), Err(ValidationError::CpfFormat));
        }

        #[test]
        fn test_phone_shapes(ddd in 10u32..100, first in 1000u32..10000, last in 0u32..10000, mobile in any::<bool>()) {
            let phone = if mobile {
                format!("({}) 9{}-{:04}", ddd, first, last)
            } else {
                format!("({}) {}-{:04}", ddd, first, last)
            };
            prop_assert_eq!(validate_phone(&phone), Ok(()));
            let without_parens = phone.replace(['(', ')'], "");
            prop_assert_eq!(validate_phone(&without_parens), Err(ValidationError::PhoneFormat));
        }

        #[test]
        fn test_age_rule_matches_year_arithmetic(birth in arb_date(), today in arb_date()) {
            let iso = birth.format("%Y-%m-%d").to_string();
            let result = validate_birthdate_and_age_on(&iso, today);
            if birth > today {
                prop_assert_eq!(result, Err(ValidationError::FutureBirthDate));
            } else {
                let mut expected = today.year() - birth.year();
                if (today.month(), today.day()) < (birth.month(), birth.day()) {
                    expected -= 1;
                }
                prop_assert_eq!(age_on(birth, today), expected);
                if expected >= MINIMUM_AGE {
                    prop_assert_eq!(result, Ok(()));
                } else {
                    prop_assert_eq!(result, Err(ValidationError::Underage { age: expected, minimum: MINIMUM_AGE }));
                }
            }
        }
    }

    #[test]
    fn test_known_cpfs() {
        for cpf in ["111.444.777-35", "529.982.247-25", "935.411.347-80"] {
            assert_eq!(strict().validate_cpf(cpf), Ok(()), "{}", cpf);
        }
        assert_eq!(strict().validate_cpf("111.111.111-11"), Err(ValidationError::CpfCheckDigits));
        assert_eq!(relaxed().validate_cpf("111.111.111-11"), Ok(()));
        assert_eq!(strict().validate_cpf(""), Ok(()));
    }
}
