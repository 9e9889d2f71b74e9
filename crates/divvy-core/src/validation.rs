//! # Validation Module
//!
//! Input validation for bills before they reach the apportionment pipeline.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Request layer (out of scope)                                 │
//! │  ├── Type validation (deserialization)                                 │
//! │  └── Immediate caller feedback                                         │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Monetary fields non-negative and bounded                          │
//! │  ├── Ids unique within the bill                                        │
//! │  └── Collection sizes bounded                                          │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: The pipeline itself                                          │
//! │  ├── Membership checks (UnknownParticipant, UnknownItem)               │
//! │  └── Post-computation reconciliation check                             │
//! │                                                                         │
//! │  Defense in depth: multiple layers catch different errors              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use divvy_core::validation::validate_amount_cents;
//!
//! // Validate a surcharge before building a bill
//! validate_amount_cents("tax", 251).unwrap();
//! ```

use std::collections::BTreeSet;

use crate::error::ValidationError;
use crate::types::Bill;
use crate::{MAX_AMOUNT_CENTS, MAX_BILL_ITEMS, MAX_BILL_PARTICIPANTS};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Field Validators
// =============================================================================

/// Validates an item name.
///
/// ## Rules
/// - Must not be empty
/// - Must be between 1 and 200 characters
///
/// ## Example
/// ```rust
/// use divvy_core::validation::validate_item_name;
///
/// assert!(validate_item_name("Margherita Pizza").is_ok());
/// assert!(validate_item_name("").is_err());
/// ```
pub fn validate_item_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "item name".to_string(),
        });
    }

    if name.len() > 200 {
        return Err(ValidationError::TooLong {
            field: "item name".to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates a monetary amount in cents.
///
/// ## Rules
/// - Must be non-negative (>= 0); zero is allowed (free items, no tip)
/// - Must not exceed MAX_AMOUNT_CENTS
///
/// ## Example
/// ```rust
/// use divvy_core::validation::validate_amount_cents;
///
/// assert!(validate_amount_cents("price", 1099).is_ok());
/// assert!(validate_amount_cents("price", 0).is_ok());
/// assert!(validate_amount_cents("price", -100).is_err());
/// ```
pub fn validate_amount_cents(field: &str, cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::MustBeNonNegative {
            field: field.to_string(),
        });
    }

    if cents > MAX_AMOUNT_CENTS {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: MAX_AMOUNT_CENTS,
        });
    }

    Ok(())
}

// =============================================================================
// Bill Validator
// =============================================================================

/// Validates a whole bill before apportionment.
///
/// ## Rules
/// - At most MAX_BILL_ITEMS items and MAX_BILL_PARTICIPANTS participants
/// - Every item: valid name, non-negative bounded price, unique id
/// - Tax and tip: non-negative and bounded
/// - Participant ids unique (silent dedup would skew every share)
///
/// Membership of consumers in the participant set is not checked here; that
/// is the consumption resolver's job, where the offending record is known.
pub fn validate_bill(bill: &Bill) -> ValidationResult<()> {
    if bill.items.len() > MAX_BILL_ITEMS {
        return Err(ValidationError::OutOfRange {
            field: "items".to_string(),
            min: 0,
            max: MAX_BILL_ITEMS as i64,
        });
    }

    if bill.participants.len() > MAX_BILL_PARTICIPANTS {
        return Err(ValidationError::OutOfRange {
            field: "participants".to_string(),
            min: 0,
            max: MAX_BILL_PARTICIPANTS as i64,
        });
    }

    let mut item_ids = BTreeSet::new();
    for item in &bill.items {
        validate_item_name(&item.name)?;
        validate_amount_cents("item price", item.price_cents)?;

        if !item_ids.insert(item.id) {
            return Err(ValidationError::Duplicate {
                field: "item id".to_string(),
                value: item.id.to_string(),
            });
        }
    }

    validate_amount_cents("tax", bill.tax_cents)?;
    validate_amount_cents("tip", bill.tip_cents)?;

    let mut participant_ids = BTreeSet::new();
    for &participant in &bill.participants {
        if !participant_ids.insert(participant) {
            return Err(ValidationError::Duplicate {
                field: "participant".to_string(),
                value: participant.to_string(),
            });
        }
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BillItem, ItemId, ParticipantId};

    fn bill_with(items: Vec<BillItem>, participants: Vec<ParticipantId>) -> Bill {
        Bill {
            id: 1,
            bill_date: None,
            items,
            tax_cents: 0,
            tip_cents: 0,
            participants,
        }
    }

    #[test]
    fn test_validate_item_name() {
        assert!(validate_item_name("Margherita Pizza").is_ok());
        assert!(validate_item_name("").is_err());
        assert!(validate_item_name("   ").is_err());
        assert!(validate_item_name(&"A".repeat(300)).is_err());
    }

    #[test]
    fn test_validate_amount_cents() {
        assert!(validate_amount_cents("price", 0).is_ok());
        assert!(validate_amount_cents("price", 1099).is_ok());
        assert!(validate_amount_cents("price", -1).is_err());
        assert!(validate_amount_cents("price", MAX_AMOUNT_CENTS + 1).is_err());
    }

    #[test]
    fn test_validate_bill_accepts_normal_bill() {
        let bill = bill_with(
            vec![BillItem {
                id: ItemId::new(1),
                name: "Pizza".to_string(),
                price_cents: 1899,
            }],
            vec![ParticipantId::new(1), ParticipantId::new(2)],
        );
        assert!(validate_bill(&bill).is_ok());
    }

    #[test]
    fn test_validate_bill_rejects_negative_surcharges() {
        let mut bill = bill_with(vec![], vec![ParticipantId::new(1)]);
        bill.tax_cents = -5;
        assert!(validate_bill(&bill).is_err());

        bill.tax_cents = 0;
        bill.tip_cents = -1;
        assert!(validate_bill(&bill).is_err());
    }

    #[test]
    fn test_validate_bill_rejects_duplicate_participant() {
        let bill = bill_with(
            vec![],
            vec![ParticipantId::new(3), ParticipantId::new(3)],
        );
        let err = validate_bill(&bill).unwrap_err();
        assert!(matches!(err, ValidationError::Duplicate { .. }));
    }

    #[test]
    fn test_validate_bill_rejects_duplicate_item_id() {
        let item = BillItem {
            id: ItemId::new(9),
            name: "Soda".to_string(),
            price_cents: 399,
        };
        let bill = bill_with(vec![item.clone(), item], vec![ParticipantId::new(1)]);
        let err = validate_bill(&bill).unwrap_err();
        assert!(matches!(err, ValidationError::Duplicate { .. }));
    }

    #[test]
    fn test_validate_bill_rejects_oversize_collections() {
        let items = (0..=MAX_BILL_ITEMS as i64)
            .map(|i| BillItem {
                id: ItemId::new(i),
                name: "Item".to_string(),
                price_cents: 100,
            })
            .collect();
        let bill = bill_with(items, vec![ParticipantId::new(1)]);
        assert!(validate_bill(&bill).is_err());

        let participants = (0..=MAX_BILL_PARTICIPANTS as i64)
            .map(ParticipantId::new)
            .collect();
        let bill = bill_with(vec![], participants);
        assert!(validate_bill(&bill).is_err());
    }
}
