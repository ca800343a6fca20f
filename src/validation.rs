//! Field validation for student records.
//!
//! Every check returns `Ok(())` when the value is acceptable and a
//! `ValidationError` whose display text is the message for the user. Optional
//! fields accept the empty string.

use crate::core::ValidationError;
use crate::model::StudentRecord;
use chrono::{Datelike, Local, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use tracing::{debug, info, warn};

/// Youngest age accepted for enrollment
pub const MINIMUM_AGE: i32 = 17;

static CPF_MASK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{3}\.[0-9]{3}\.[0-9]{3}-[0-9]{2}$").expect("valid CPF regex"));

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("valid email regex")
});

static PHONE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\([0-9]{2}\) (?:9[0-9]{4}-[0-9]{4}|[0-9]{4}-[0-9]{4})$").expect("valid phone regex")
});

/// Validation switches, normally taken from `AppConfig`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ValidationConfig {
    /// Verify CPF check digits, not only the mask
    pub strict_cpf: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        ValidationConfig { strict_cpf: true }
    }
}

/// Applies the record rules under a given configuration.
///
/// The age check uses the local calendar date unless the validator has been
/// pinned to a fixed day with [`Validator::with_today`].
#[derive(Debug, Clone, Default)]
pub struct Validator {
    config: ValidationConfig,
    today: Option<NaiveDate>,
}

impl Validator {
    pub fn new(config: ValidationConfig) -> Self {
        Validator { config, today: None }
    }

    /// Pins "today" for the birth date check.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }

    /// Checks the CPF mask and, in strict mode, its check digits.
    pub fn validate_cpf(&self, cpf: &str) -> Result<(), ValidationError> {
        if cpf.is_empty() {
            return Ok(());
        }
        if !CPF_MASK.is_match(cpf) {
            debug!("CPF mask mismatch: '{}'", cpf);
            return Err(ValidationError::CpfFormat);
        }
        if !self.config.strict_cpf {
            debug!("CPF check digits not verified (strict mode disabled): '{}'", cpf);
            return Ok(());
        }
        if cpf_check_digits_match(cpf) {
            Ok(())
        } else {
            debug!("CPF check digits do not match: '{}'", cpf);
            Err(ValidationError::CpfCheckDigits)
        }
    }

    /// Checks an ISO birth date against today and the minimum age.
    pub fn validate_birthdate_and_age(&self, date: &str) -> Result<(), ValidationError> {
        validate_birthdate_and_age_on(date, self.today())
    }

    /// Runs every field rule in order and reports the first failure.
    ///
    /// The record is expected to be normalized already (see
    /// [`StudentRecord::normalized`]).
    pub fn validate_record(&self, record: &StudentRecord) -> Result<(), ValidationError> {
        validate_required("Name", &record.nome)?;
        validate_required("Surname", &record.sobrenome)?;
        self.validate_cpf(record.cpf.as_deref().unwrap_or(""))?;
        validate_email(record.email.as_deref().unwrap_or(""))?;
        validate_phone(record.telefone.as_deref().unwrap_or(""))?;
        self.validate_birthdate_and_age(record.data_nascimento.as_deref().unwrap_or(""))?;
        validate_uf(&record.uf)?;
        Ok(())
    }
}

/// Recomputes both CPF check digits with the modulo-11 rule.
///
/// Sequences of a single repeated digit satisfy the arithmetic but are not
/// issued, so they are rejected as well.
pub fn cpf_check_digits_match(cpf: &str) -> bool {
    let digits: Vec<u32> = cpf.chars().filter_map(|c| c.to_digit(10)).collect();
    if digits.len() != 11 || digits.iter().all(|&d| d == digits[0]) {
        return false;
    }
    let first = check_digit(&digits[..9]);
    let second = check_digit(&digits[..10]);
    digits[9] == first && digits[10] == second
}

/// Weights run from `len + 1` down to 2.
fn check_digit(digits: &[u32]) -> u32 {
    let top = digits.len() as u32 + 1;
    let sum: u32 = digits
        .iter()
        .enumerate()
        .map(|(i, d)| d * (top - i as u32))
        .sum();
    match sum % 11 {
        r if r < 2 => 0,
        r => 11 - r,
    }
}

pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if email.is_empty() || EMAIL_PATTERN.is_match(email) {
        Ok(())
    } else {
        debug!("Invalid email format: '{}'", email);
        Err(ValidationError::EmailFormat)
    }
}

/// Accepts `(DD) 9NNNN-NNNN` (mobile) or `(DD) NNNN-NNNN` (landline).
pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    if phone.is_empty() || PHONE_PATTERN.is_match(phone.trim()) {
        Ok(())
    } else {
        debug!("Invalid phone format: '{}'", phone);
        Err(ValidationError::PhoneFormat)
    }
}

/// Birth date rule evaluated against an explicit `today`.
pub fn validate_birthdate_and_age_on(date: &str, today: NaiveDate) -> Result<(), ValidationError> {
    if date.is_empty() {
        return Ok(());
    }
    let birth = NaiveDate::parse_from_str(date, crate::dates::STORAGE_FORMAT).map_err(|_| {
        warn!("Birth date '{}' is not YYYY-MM-DD", date);
        ValidationError::BirthDateFormat
    })?;
    if birth > today {
        warn!("Future birth date submitted: {}", birth);
        return Err(ValidationError::FutureBirthDate);
    }

    let age = age_on(birth, today);
    debug!("Age check: birth={}, today={}, age={}, minimum={}", birth, today, age, MINIMUM_AGE);
    if age < MINIMUM_AGE {
        info!("Age check failed: {} years (minimum {})", age, MINIMUM_AGE);
        return Err(ValidationError::Underage {
            age,
            minimum: MINIMUM_AGE,
        });
    }
    Ok(())
}

/// Whole years between `birth` and `today`.
pub fn age_on(birth: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        age -= 1;
    }
    age
}

pub fn validate_required(label: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::MissingField(label))
    } else {
        Ok(())
    }
}

pub fn validate_uf(uf: &str) -> Result<(), ValidationError> {
    if uf.len() == 2 && uf.chars().all(|c| c.is_ascii_alphabetic()) {
        Ok(())
    } else {
        Err(ValidationError::UfFormat)
    }
}
