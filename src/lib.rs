// Core infrastructure modules
pub mod config;
pub mod core;

// Feature-specific modules
pub mod command_palette;
pub mod dates;
pub mod model;
pub mod repl;
pub mod repository;
pub mod results_grid;
pub mod search;
pub mod validation;

// Test utilities
#[cfg(test)]
mod test_utils;
