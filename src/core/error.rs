/// Student Registry Error Module
///
/// This module defines the error types shared by validation, persistence and
/// configuration. Field rule failures are `ValidationError`s; everything else
/// is a `StudentError`, which the repository converts into the caller-facing
/// `Outcome` contract at its public boundary.
use crate::core::db::schema::STUDENTS_TABLE;
use thiserror::Error;

/// A field that failed a format or business rule.
///
/// Messages are meant to be shown to the user as-is.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required text field was blank
    #[error("{0} is required.")]
    MissingField(&'static str),

    #[error("CPF: invalid format (expected ###.###.###-##).")]
    CpfFormat,

    #[error("CPF is invalid (check digits do not match).")]
    CpfCheckDigits,

    #[error("Email: invalid format.")]
    EmailFormat,

    #[error("Phone: invalid format. Use (XX) XXXXX-XXXX or (XX) XXXX-XXXX.")]
    PhoneFormat,

    #[error("Birth date: invalid format (expected YYYY-MM-DD).")]
    BirthDateFormat,

    #[error("Birth date cannot be in the future.")]
    FutureBirthDate,

    #[error("Student must be at least {minimum} years old. Computed age: {age}.")]
    Underage { age: i32, minimum: i32 },

    #[error("UF: expected a two-letter state code.")]
    UfFormat,

    #[error("Unknown course '{given}'. Expected one of: {expected}.")]
    UnknownCourse { given: String, expected: String },
}

/// Error type for every fallible registry operation.
///
/// The display text of each variant is the message surfaced to the user.
#[derive(Error, Debug)]
pub enum StudentError {
    /// A field failed validation before storage was touched
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The database could not be opened
    #[error("Database connection failed.")]
    Connection,

    #[error("CPF already registered.")]
    DuplicateCpf,

    #[error("Email already registered.")]
    DuplicateEmail,

    /// A unique constraint on some other column, carrying the engine message
    #[error("Unique field violation: {0}")]
    DuplicateField(String),

    #[error("Table '{}' does not exist.", STUDENTS_TABLE)]
    MissingTable,

    /// No row matched the given id
    #[error("No student found with that ID.")]
    NotFound,

    /// Any other failure reported by SQLite
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Configuration loading and validation errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File system and I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StudentError {
    /// Classifies a raw SQLite error into the registry taxonomy.
    ///
    /// Unique violations are told apart by the column named in the engine
    /// message (`UNIQUE constraint failed: alunos.cpf`); a `no such table`
    /// failure on the students table becomes `MissingTable`. Anything else
    /// stays a `Database` error carrying the engine text.
    pub fn from_storage(err: rusqlite::Error) -> Self {
        if let rusqlite::Error::SqliteFailure(failure, Some(message)) = &err {
            if failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE {
                let lower = message.to_lowercase();
                if lower.contains("cpf") {
                    return StudentError::DuplicateCpf;
                }
                if lower.contains("email") {
                    return StudentError::DuplicateEmail;
                }
                return StudentError::DuplicateField(message.clone());
            }
            if message.starts_with("no such table") && message.contains(STUDENTS_TABLE) {
                return StudentError::MissingTable;
            }
        }
        StudentError::Database(err)
    }
}

/// Type alias for Result to use StudentError as the error type.
pub type Result<T> = std::result::Result<T, StudentError>;
