//! # Split Engine
//!
//! Turns a bill plus its consumption records into per-participant owed
//! amounts that reconcile exactly, to the cent, with what was billed.
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Split Pipeline                                  │
//! │                                                                         │
//! │  Bill + ConsumptionRecords                                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  1. Resolve consumers        item → who shares its cost                 │
//! │     (no votes → everyone)                                               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  2. Apportion items          price split evenly, leftover cents to      │
//! │     (divide_evenly)          the first consumers by ascending id        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  3. Allocate surcharges      tax and tip split proportionally to        │
//! │     (allocate_proportionally) item subtotals, largest remainder         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  4. Aggregate + reconcile    Σ owed == Σ prices + tax + tip, always     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SplitResult                                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Data flows strictly forward; no stage revisits a previous one. The whole
//! computation is a pure function: no I/O, no shared state, no randomness,
//! and every tie-break is pinned to ascending participant id rather than to
//! container iteration order.
//!
//! ## The Two Policies
//! Two behaviors here are policy decisions, not arithmetic necessity, and
//! both are locked down by tests:
//! - **No-eaters fallback**: an item nobody voted for is split evenly across
//!   every bill participant, so no cost is ever silently dropped.
//! - **Largest-remainder surcharges**: tax and tip follow each person's
//!   share of the food, with leftover cents going to the largest fractional
//!   remainders first.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::{CoreResult, SplitError};
use crate::money::Money;
use crate::types::{Bill, ConsumptionRecord, ParticipantId, ParticipantShare, SplitResult};
use crate::validation::validate_bill;

// =============================================================================
// Even Division
// =============================================================================

/// Splits an amount into `ways` integer-cent shares that sum exactly to the
/// amount.
///
/// Every share gets the floor of `amount / ways`; the remaining cents are
/// handed out one each to the first shares in order. Callers put consumers
/// in ascending id order, so the extra cent always lands on the numerically
/// first consumer.
///
/// Amounts are validated non-negative before they reach this function.
/// `ways == 0` yields an empty vector.
///
/// ## Example
/// ```rust
/// use divvy_core::money::Money;
/// use divvy_core::split::divide_evenly;
///
/// let shares = divide_evenly(Money::from_cents(1000), 3);
/// let cents: Vec<i64> = shares.iter().map(|m| m.cents()).collect();
/// assert_eq!(cents, vec![334, 333, 333]);
/// ```
pub fn divide_evenly(amount: Money, ways: usize) -> Vec<Money> {
    if ways == 0 {
        return Vec::new();
    }

    let cents = amount.cents();
    let ways_i64 = ways as i64;
    let base = cents / ways_i64;
    let remainder = (cents % ways_i64).unsigned_abs() as usize;

    (0..ways)
        .map(|position| {
            let mut share = base;
            if position < remainder {
                share += 1;
            }
            Money::from_cents(share)
        })
        .collect()
}

// =============================================================================
// Proportional Allocation
// =============================================================================

/// Distributes `total` across participants in proportion to their weights,
/// in integer cents, summing exactly to `total`.
///
/// Classical largest-remainder apportionment:
/// 1. Each participant provisionally gets the floor of their ideal share
///    `total * weight / pool`.
/// 2. The leftover cents go to the largest fractional remainders, compared
///    as exact integers (`total * weight mod pool`), ties broken by
///    ascending participant id.
///
/// When every weight is zero (free food, but a surcharge to carry), the
/// total is split evenly instead, with the same remainder rule.
///
/// The returned vector is aligned with the input slice. Weights and total
/// are validated non-negative before they reach this function.
pub fn allocate_proportionally(
    total: Money,
    weights: &[(ParticipantId, Money)],
) -> Vec<(ParticipantId, Money)> {
    if weights.is_empty() {
        return Vec::new();
    }

    let pool: i64 = weights.iter().map(|(_, weight)| weight.cents()).sum();
    if pool == 0 {
        let shares = divide_evenly(total, weights.len());
        return weights
            .iter()
            .zip(shares)
            .map(|(&(participant, _), share)| (participant, share))
            .collect();
    }

    // i128 keeps total * weight from overflowing for any bill that passed
    // validation.
    let pool = pool as i128;
    let total_cents = total.cents() as i128;

    let mut floors = Vec::with_capacity(weights.len());
    let mut remainders = Vec::with_capacity(weights.len());
    for &(_, weight) in weights {
        let numerator = total_cents * weight.cents() as i128;
        floors.push((numerator / pool) as i64);
        remainders.push(numerator % pool);
    }

    let allocated: i64 = floors.iter().sum();
    let leftover = (total.cents() - allocated) as usize;

    // Rank positions by fractional remainder, largest first; equal
    // remainders fall back to ascending participant id.
    let mut ranked: Vec<usize> = (0..weights.len()).collect();
    ranked.sort_by(|&a, &b| {
        remainders[b]
            .cmp(&remainders[a])
            .then(weights[a].0.cmp(&weights[b].0))
    });

    for &position in ranked.iter().take(leftover) {
        floors[position] += 1;
    }

    weights
        .iter()
        .zip(floors)
        .map(|(&(participant, _), share)| (participant, Money::from_cents(share)))
        .collect()
}

// =============================================================================
// Stage 1: Consumption Resolution
// =============================================================================

/// Resolves, for every item on the bill, the finalized set of consumers in
/// ascending participant order.
///
/// - Recorded consumers are used unchanged (multiple records for the same
///   item merge by union), after checking membership in the bill's
///   participant set.
/// - An item with no recorded consumers falls back to all participants.
fn resolve_consumers(
    bill: &Bill,
    records: &[ConsumptionRecord],
) -> CoreResult<Vec<Vec<ParticipantId>>> {
    let members: BTreeSet<ParticipantId> = bill.participants.iter().copied().collect();
    let item_ids: BTreeSet<_> = bill.items.iter().map(|item| item.id).collect();

    let mut consumers_by_item: BTreeMap<_, BTreeSet<ParticipantId>> = BTreeMap::new();
    for record in records {
        if !item_ids.contains(&record.item_id) {
            return Err(SplitError::UnknownItem {
                item: record.item_id,
            });
        }

        let consumers = consumers_by_item.entry(record.item_id).or_default();
        for &consumer in &record.consumers {
            if !members.contains(&consumer) {
                return Err(SplitError::UnknownParticipant {
                    participant: consumer,
                });
            }
            consumers.insert(consumer);
        }
    }

    let everyone: Vec<ParticipantId> = members.into_iter().collect();

    Ok(bill
        .items
        .iter()
        .map(|item| match consumers_by_item.get(&item.id) {
            Some(consumers) if !consumers.is_empty() => consumers.iter().copied().collect(),
            _ => everyone.clone(),
        })
        .collect())
}

// =============================================================================
// Entry Point
// =============================================================================

/// Computes the full split for a bill.
///
/// Runs validation, then the four pipeline stages. The returned result keys
/// every bill participant (including those who owe nothing) and satisfies
/// `total_owed() == bill.grand_total()` exactly.
///
/// ## Example
/// ```rust
/// use divvy_core::split::calculate_split;
/// use divvy_core::types::{Bill, BillItem, ConsumptionRecord, ItemId, ParticipantId};
///
/// let alice = ParticipantId::new(1);
/// let bob = ParticipantId::new(2);
/// let bill = Bill {
///     id: 1,
///     bill_date: None,
///     items: vec![BillItem {
///         id: ItemId::new(10),
///         name: "Nachos".to_string(),
///         price_cents: 901,
///     }],
///     tax_cents: 0,
///     tip_cents: 0,
///     participants: vec![alice, bob],
/// };
/// let records = vec![ConsumptionRecord {
///     item_id: ItemId::new(10),
///     consumers: vec![alice, bob],
/// }];
///
/// let result = calculate_split(&bill, &records).unwrap();
/// assert_eq!(result.owed(alice).unwrap().cents(), 451);
/// assert_eq!(result.owed(bob).unwrap().cents(), 450);
/// ```
pub fn calculate_split(bill: &Bill, records: &[ConsumptionRecord]) -> CoreResult<SplitResult> {
    validate_bill(bill)?;

    if bill.participants.is_empty() {
        // A bill with nothing on it splits to nothing; a bill with costs
        // but nobody to carry them cannot reconcile.
        if bill.items.is_empty() && bill.tax().is_zero() && bill.tip().is_zero() {
            return Ok(SplitResult::default());
        }
        return Err(SplitError::EmptyParticipantSet);
    }

    let resolved = resolve_consumers(bill, records)?;

    // Stage 2: per-item shares, accumulated into per-participant subtotals.
    let mut subtotals: BTreeMap<ParticipantId, Money> = bill
        .participants
        .iter()
        .map(|&participant| (participant, Money::zero()))
        .collect();

    for (item, consumers) in bill.items.iter().zip(&resolved) {
        let shares = divide_evenly(item.price(), consumers.len());
        for (&consumer, share) in consumers.iter().zip(shares) {
            if let Some(subtotal) = subtotals.get_mut(&consumer) {
                *subtotal += share;
            }
        }
    }

    // Stage 3: surcharges, each an independent proportional allocation.
    // BTreeMap iteration gives the ascending participant order every
    // tie-break relies on.
    let weights: Vec<(ParticipantId, Money)> = subtotals
        .iter()
        .map(|(&participant, &subtotal)| (participant, subtotal))
        .collect();

    let tax_shares = allocate_proportionally(bill.tax(), &weights);
    let tip_shares = allocate_proportionally(bill.tip(), &weights);

    // Stage 4: aggregate and verify reconciliation.
    let mut shares: BTreeMap<ParticipantId, ParticipantShare> = BTreeMap::new();
    for (participant, subtotal) in weights {
        shares.insert(
            participant,
            ParticipantShare {
                items_subtotal: subtotal,
                tax_share: Money::zero(),
                tip_share: Money::zero(),
            },
        );
    }
    for (participant, tax_share) in tax_shares {
        if let Some(share) = shares.get_mut(&participant) {
            share.tax_share = tax_share;
        }
    }
    for (participant, tip_share) in tip_shares {
        if let Some(share) = shares.get_mut(&participant) {
            share.tip_share = tip_share;
        }
    }

    let result = SplitResult { shares };
    let expected = bill.grand_total();
    let actual = result.total_owed();
    if actual != expected {
        return Err(SplitError::Reconciliation { expected, actual });
    }

    Ok(result)
}

// =============================================================================
// Unit Tests
// =============================================================================
