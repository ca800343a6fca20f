/// Core Module for the student registry
///
/// This module contains the shared infrastructure every other module builds
/// on: SQLite connection handling, the `alunos` schema, and the error types.

pub mod db;
pub mod error;

// Re-export commonly used types for convenience
pub use error::{Result, StudentError, ValidationError};
