//! Conversions between the ISO dates kept in storage and the `DD/MM/YYYY`
//! form users type and read.

use chrono::NaiveDate;

/// Format of `data_nascimento` in storage and in validation input
pub const STORAGE_FORMAT: &str = "%Y-%m-%d";
/// Format shown in result grids and accepted from the shell
pub const DISPLAY_FORMAT: &str = "%d/%m/%Y";

/// Normalizes user input to the storage format.
///
/// Accepts `DD/MM/YYYY` or an already-ISO date. Returns `None` when the input
/// parses as neither.
pub fn to_storage_format(input: &str) -> Option<String> {
    let input = input.trim();
    NaiveDate::parse_from_str(input, DISPLAY_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(input, STORAGE_FORMAT))
        .ok()
        .map(|date| date.format(STORAGE_FORMAT).to_string())
}

/// Rewrites an ISO date with zero-padded month and day (`2000-8-5` becomes
/// `2000-08-05`). Input that is not an ISO date is returned unchanged.
pub fn canonical_iso(input: &str) -> String {
    NaiveDate::parse_from_str(input.trim(), STORAGE_FORMAT)
        .map(|date| date.format(STORAGE_FORMAT).to_string())
        .unwrap_or_else(|_| input.to_string())
}

/// Formats an ISO date for display, or `None` if it is not a valid ISO date.
pub fn to_display_format(iso: &str) -> Option<String> {
    NaiveDate::parse_from_str(iso.trim(), STORAGE_FORMAT)
        .ok()
        .map(|date| date.format(DISPLAY_FORMAT).to_string())
}
