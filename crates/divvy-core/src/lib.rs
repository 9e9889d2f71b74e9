//! # divvy-core: Pure Split Logic for Divvy
//!
//! This crate is the **heart** of Divvy. It contains the entire bill-splitting
//! calculation as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Divvy Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Clients (Mobile / Web)                       │   │
//! │  │    Sign in ──► Scan receipt ──► Tap who ate what ──► Settle    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ HTTPS                                  │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               divvy-service (Service Layer)                     │   │
//! │  │    auth, rate limiting, upload checks, receipt extraction       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ divvy-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   split   │  │ settlement│  │   │
//! │  │   │   Bill    │  │   Money   │  │ pipeline  │  │ Transfer  │  │   │
//! │  │   │  records  │  │   cents   │  │ remainder │  │   payer   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Bill, BillItem, ConsumptionRecord, SplitResult)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`split`] - The split pipeline: resolve, apportion, allocate, reconcile
//! - [`settlement`] - Transfers that repay whoever fronted the bill
//! - [`error`] - Domain error types
//! - [`validation`] - Bill validation rules
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in cents (i64) to avoid float errors
//! 4. **Exact Reconciliation**: What everyone owes always sums to what was billed
//! 5. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use divvy_core::split::calculate_split;
//! use divvy_core::types::{Bill, BillItem, ConsumptionRecord, ItemId, ParticipantId};
//!
//! let bill = Bill {
//!     id: 1,
//!     bill_date: None,
//!     items: vec![BillItem {
//!         id: ItemId::new(1),
//!         name: "Garlic Bread".to_string(),
//!         price_cents: 1000, // $10.00, never floats
//!     }],
//!     tax_cents: 0,
//!     tip_cents: 0,
//!     participants: vec![ParticipantId::new(1), ParticipantId::new(2), ParticipantId::new(3)],
//! };
//! let records = vec![ConsumptionRecord {
//!     item_id: ItemId::new(1),
//!     consumers: vec![ParticipantId::new(1), ParticipantId::new(2), ParticipantId::new(3)],
//! }];
//!
//! // $10.00 three ways: the odd cent lands on the first participant.
//! let result = calculate_split(&bill, &records).unwrap();
//! assert_eq!(result.owed(ParticipantId::new(1)).unwrap().cents(), 334);
//! assert_eq!(result.total_owed().cents(), 1000);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod settlement;
pub mod split;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use divvy_core::Money` instead of
// `use divvy_core::money::Money`

pub use error::{CoreResult, SplitError, ValidationError};
pub use money::Money;
pub use settlement::{settle_with_payer, Transfer};
pub use split::{allocate_proportionally, calculate_split, divide_evenly};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum items allowed on a single bill
///
/// ## Business Reason
/// A restaurant receipt never legitimately carries hundreds of line items;
/// anything past this is a parsing accident or abuse. Keeps the split
/// pipeline's inputs bounded.
pub const MAX_BILL_ITEMS: usize = 200;

/// Maximum participants on a single bill
///
/// ## Business Reason
/// Divvy splits dinner tables, not stadiums. Bounding the group keeps
/// per-item apportionment small and rules out degenerate requests.
pub const MAX_BILL_PARTICIPANTS: usize = 100;

/// Maximum value, in cents, for any single amount on a bill
///
/// ## Business Reason
/// $100,000,000.00 comfortably exceeds any real restaurant bill while
/// leaving i64 arithmetic (and the i128 intermediates in proportional
/// allocation) far from overflow.
pub const MAX_AMOUNT_CENTS: i64 = 10_000_000_000;
