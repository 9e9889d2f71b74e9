//! # Error Types
//!
//! Domain-specific error types for divvy-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  divvy-core errors (this file)                                         │
//! │  ├── SplitError       - Split computation failures                     │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  divvy-service errors (separate crate)                                 │
//! │  └── ServiceError     - Auth, rate-limit, upload, extraction           │
//! │                                                                         │
//! │  Flow: ValidationError → SplitError → ServiceError → caller            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (participant, item, amounts)
//! 3. Errors are enum variants, never String
//! 4. No retries anywhere: the computation is deterministic, so retrying a
//!    failed split would fail identically

use thiserror::Error;

use crate::money::Money;
use crate::types::{ItemId, ParticipantId};

// =============================================================================
// Split Error
// =============================================================================

/// Split computation errors.
///
/// All of these surface synchronously to the caller; the engine never
/// returns a partial result alongside an error.
#[derive(Debug, Error)]
pub enum SplitError {
    /// A consumption record names someone who is not on the bill.
    ///
    /// ## When This Occurs
    /// - A vote row references a user who was removed from the group
    /// - The caller assembled records from the wrong bill
    ///
    /// Recoverable: the caller should reject the input or repair the data.
    #[error("participant {participant} is not a member of this bill")]
    UnknownParticipant { participant: ParticipantId },

    /// A consumption record names an item id the bill does not contain.
    ///
    /// Silently skipping the record would drop a voter's intent, so this is
    /// rejected as a data-integrity failure instead.
    #[error("consumption record references unknown item {item}")]
    UnknownItem { item: ItemId },

    /// The bill has items or surcharges but nobody to carry them.
    ///
    /// ## When This Occurs
    /// - A bill was created before any members joined the group
    ///
    /// Fatal for this computation: there is no participant set to apportion
    /// against.
    #[error("bill has costs but no participants to apportion them to")]
    EmptyParticipantSet,

    /// The computed owed amounts do not sum to the billed total.
    ///
    /// This invariant is enforced defensively after every computation. It is
    /// unreachable when the apportionment stages are correct, so seeing it
    /// means a programming bug, not bad input.
    #[error("split does not reconcile: owed {actual} but billed {expected}")]
    Reconciliation { expected: Money, actual: Money },

    /// Validation error (wraps ValidationError).
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when a bill doesn't meet input requirements.
/// Used for early validation before any apportionment runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Monetary value must be zero or more.
    #[error("{field} must not be negative")]
    MustBeNonNegative { field: String },

    /// Duplicate value (e.g., the same participant listed twice).
    #[error("{field} '{value}' appears more than once")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with SplitError.
pub type CoreResult<T> = Result<T, SplitError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = SplitError::UnknownParticipant {
            participant: ParticipantId::new(42),
        };
        assert_eq!(
            err.to_string(),
            "participant 42 is not a member of this bill"
        );

        let err = SplitError::Reconciliation {
            expected: Money::from_cents(1000),
            actual: Money::from_cents(999),
        };
        assert_eq!(
            err.to_string(),
            "split does not reconcile: owed $9.99 but billed $10.00"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::MustBeNonNegative {
            field: "tax".to_string(),
        };
        assert_eq!(err.to_string(), "tax must not be negative");

        let err = ValidationError::Duplicate {
            field: "participant".to_string(),
            value: "7".to_string(),
        };
        assert_eq!(err.to_string(), "participant '7' appears more than once");
    }

    #[test]
    fn test_validation_converts_to_split_error() {
        let validation_err = ValidationError::Required {
            field: "item name".to_string(),
        };
        let split_err: SplitError = validation_err.into();
        assert!(matches!(split_err, SplitError::Validation(_)));
    }
}
