// Compensation estimation engine.
// Implements: reference tables, generic multi-factor calculator, Amazon band calculator.
// Calculators are pure and synchronous — handlers call them inline, no spawn_blocking.

pub mod amazon;
pub mod calculator;
pub mod handlers;
pub mod models;
pub mod tables;

use thiserror::Error;

pub use amazon::{calculate_amazon_compensation, AmazonBands};
pub use calculator::calculate_compensation;
pub use tables::ReferenceTables;

/// Errors raised by the calculators and by reference-table construction.
///
/// Both calculators return `Result<_, CompensationError>`. The generic calculator
/// only fails on non-finite numeric input; unknown categories fall back silently.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompensationError {
    #[error("Unknown level code '{0}'")]
    UnknownLevel(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid reference table: {0}")]
    InvalidTable(String),
}
