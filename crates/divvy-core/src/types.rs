//! # Domain Types
//!
//! Core domain types for bill splitting.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌───────────────────┐   ┌─────────────────────┐ │
//! │  │      Bill       │   │     BillItem      │   │ ConsumptionRecord   │ │
//! │  │  ─────────────  │   │  ───────────────  │   │  ─────────────────  │ │
//! │  │  id             │   │  id (ItemId)      │   │  item_id            │ │
//! │  │  items[]        │──►│  name             │◄──│  consumers[]        │ │
//! │  │  tax_cents      │   │  price_cents      │   │  (who ate it)       │ │
//! │  │  tip_cents      │   └───────────────────┘   └─────────────────────┘ │
//! │  │  participants[] │                                                    │
//! │  └─────────────────┘   ┌───────────────────┐   ┌─────────────────────┐ │
//! │                        │ ParticipantShare  │   │    SplitResult      │ │
//! │                        │  ───────────────  │   │  ─────────────────  │ │
//! │                        │  items_subtotal   │◄──│  shares (by         │ │
//! │                        │  tax_share        │   │   ParticipantId)    │ │
//! │                        │  tip_share        │   │                     │ │
//! │                        └───────────────────┘   └─────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identifier Design
//! Participants and items are identified by opaque integer keys supplied by
//! the caller. The engine only requires that they are comparable and totally
//! orderable: every remainder-cent decision is tied to ascending identifier
//! order, never to map iteration order.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::money::Money;

// =============================================================================
// Participant Id
// =============================================================================

/// Identifies one person who may owe money on a bill.
///
/// ## Why a Newtype?
/// Participant and item keys are both integers; wrapping them keeps the two
/// id spaces from being mixed up at compile time. The inner value is the
/// caller's stable user key.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct ParticipantId(i64);

impl ParticipantId {
    /// Creates a participant id from the caller's user key.
    #[inline]
    pub const fn new(id: i64) -> Self {
        ParticipantId(id)
    }

    /// Returns the underlying key.
    #[inline]
    pub const fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// Item Id
// =============================================================================

/// Identifies one line item on a bill.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct ItemId(i64);

impl ItemId {
    /// Creates an item id.
    #[inline]
    pub const fn new(id: i64) -> Self {
        ItemId(id)
    }

    /// Returns the underlying key.
    #[inline]
    pub const fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// Bill Item
// =============================================================================

/// A line item on a bill.
///
/// Quantity is pre-multiplied into the price by the caller: "3 × $2.99 coke"
/// arrives here as a single 897-cent item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillItem {
    /// Unique identifier within the bill.
    pub id: ItemId,

    /// Display name from the receipt ("Margherita Pizza").
    pub name: String,

    /// Price in cents (smallest currency unit). Never negative.
    pub price_cents: i64,
}

impl BillItem {
    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }
}

// =============================================================================
// Consumption Record
// =============================================================================

/// Records which participants consumed a given item (a "vote").
///
/// An item may have zero, one, or many consumers; the same participant may
/// appear in many records. Several records for the same item are merged by
/// union before apportionment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumptionRecord {
    /// The item that was consumed.
    pub item_id: ItemId,

    /// Everyone who ate it. May be empty, which counts as "nobody voted".
    pub consumers: Vec<ParticipantId>,
}

// =============================================================================
// Bill
// =============================================================================

/// A shared bill: line items, surcharges, and the people splitting it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bill {
    /// Caller-assigned bill key.
    pub id: i64,

    /// When the bill was incurred. Carried for the caller; the arithmetic
    /// never looks at it.
    pub bill_date: Option<NaiveDate>,

    /// Line items in receipt order.
    pub items: Vec<BillItem>,

    /// Tax in cents. Never negative.
    pub tax_cents: i64,

    /// Tip in cents. Never negative.
    pub tip_cents: i64,

    /// Everyone eligible to share this bill. Must contain every consumer
    /// named in the consumption records.
    pub participants: Vec<ParticipantId>,
}

impl Bill {
    /// Returns the tax as a Money type.
    #[inline]
    pub fn tax(&self) -> Money {
        Money::from_cents(self.tax_cents)
    }

    /// Returns the tip as a Money type.
    #[inline]
    pub fn tip(&self) -> Money {
        Money::from_cents(self.tip_cents)
    }

    /// Sum of all item prices.
    pub fn items_total(&self) -> Money {
        self.items.iter().map(|item| item.price()).sum()
    }

    /// Items plus tax plus tip: the amount the whole group must cover.
    pub fn grand_total(&self) -> Money {
        self.items_total() + self.tax() + self.tip()
    }
}

// =============================================================================
// Participant Share
// =============================================================================

/// One participant's slice of a computed split, broken down for audit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ParticipantShare {
    /// Sum of this participant's item shares.
    pub items_subtotal: Money,

    /// This participant's slice of the tax.
    pub tax_share: Money,

    /// This participant's slice of the tip.
    pub tip_share: Money,
}

impl ParticipantShare {
    /// Total owed: items plus tax plus tip.
    #[inline]
    pub fn owed(&self) -> Money {
        self.items_subtotal + self.tax_share + self.tip_share
    }
}

// =============================================================================
// Split Result
// =============================================================================

/// The output of a split computation.
///
/// Keys every participant on the bill, including those who owe nothing.
/// Keyed by `BTreeMap` so iteration and serialization order is the
/// participant order, reproducibly.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SplitResult {
    /// Per-participant breakdown, in ascending participant order.
    pub shares: BTreeMap<ParticipantId, ParticipantShare>,
}

impl SplitResult {
    /// Looks up what one participant owes, if they are on the bill.
    pub fn owed(&self, participant: ParticipantId) -> Option<Money> {
        self.shares.get(&participant).map(|share| share.owed())
    }

    /// Sum of all owed amounts. Reconciles exactly with the bill's grand
    /// total for every result the engine returns.
    pub fn total_owed(&self) -> Money {
        self.shares.values().map(|share| share.owed()).sum()
    }

    /// Number of participants in the result.
    pub fn len(&self) -> usize {
        self.shares.len()
    }

    /// True when the result covers no participants (empty bill).
    pub fn is_empty(&self) -> bool {
        self.shares.is_empty()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
