//! # Settlement
//!
//! Turns a computed split into concrete repayments. One participant fronts
//! the whole bill; everyone else owes that payer exactly their share from
//! the split, so settlement is a straight read of the result rather than a
//! debt-graph optimization.
//!
//! Transfers come out in ascending participant order and omit anyone who
//! owes nothing (including the payer, who never pays themselves).

use serde::{Deserialize, Serialize};

use crate::error::{CoreResult, SplitError};
use crate::money::Money;
use crate::types::{ParticipantId, SplitResult};

/// A single repayment: `from` owes `amount` to `to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    pub from: ParticipantId,
    pub to: ParticipantId,
    pub amount: Money,
}

/// Produces the transfers that settle a split when `payer` covered the
/// whole bill.
///
/// The payer must be keyed in the result; a split never keys anyone who
/// was not on the bill, so an unknown payer is rejected rather than
/// settled against.
pub fn settle_with_payer(result: &SplitResult, payer: ParticipantId) -> CoreResult<Vec<Transfer>> {
    if result.owed(payer).is_none() {
        return Err(SplitError::UnknownParticipant { participant: payer });
    }

    Ok(result
        .shares
        .iter()
        .filter(|&(&participant, share)| participant != payer && !share.owed().is_zero())
        .map(|(&participant, share)| Transfer {
            from: participant,
            to: payer,
            amount: share.owed(),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::split::calculate_split;
    use crate::types::{Bill, BillItem, ConsumptionRecord, ItemId};

    fn p(id: i64) -> ParticipantId {
        ParticipantId::new(id)
    }

    fn sample_split() -> SplitResult {
        let bill = Bill {
            id: 1,
            bill_date: None,
            items: vec![
                BillItem {
                    id: ItemId::new(1),
                    name: "Pho".to_string(),
                    price_cents: 1400,
                },
                BillItem {
                    id: ItemId::new(2),
                    name: "Spring Rolls".to_string(),
                    price_cents: 600,
                },
            ],
            tax_cents: 160,
            tip_cents: 300,
            participants: vec![p(1), p(2), p(3)],
        };
        let records = vec![
            ConsumptionRecord {
                item_id: ItemId::new(1),
                consumers: vec![p(1), p(2)],
            },
            ConsumptionRecord {
                item_id: ItemId::new(2),
                consumers: vec![p(3)],
            },
        ];
        calculate_split(&bill, &records).unwrap()
    }

    #[test]
    fn test_settle_excludes_the_payer() {
        let result = sample_split();
        let transfers = settle_with_payer(&result, p(1)).unwrap();

        assert_eq!(transfers.len(), 2);
        assert!(transfers.iter().all(|t| t.to == p(1) && t.from != p(1)));
    }

    #[test]
    fn test_settled_transfers_cover_everything_but_the_payers_share() {
        let result = sample_split();
        let payer_share = result.owed(p(2)).unwrap();
        let transfers = settle_with_payer(&result, p(2)).unwrap();

        let collected: Money = transfers.iter().map(|t| t.amount).sum();
        assert_eq!(collected + payer_share, result.total_owed());
    }

    #[test]
    fn test_settle_skips_zero_balances() {
        let bill = Bill {
            id: 2,
            bill_date: None,
            items: vec![BillItem {
                id: ItemId::new(1),
                name: "Oysters".to_string(),
                price_cents: 2400,
            }],
            tax_cents: 0,
            tip_cents: 0,
            participants: vec![p(1), p(2), p(3)],
        };
        let records = vec![ConsumptionRecord {
            item_id: ItemId::new(1),
            consumers: vec![p(2)],
        }];
        let result = calculate_split(&bill, &records).unwrap();

        let transfers = settle_with_payer(&result, p(1)).unwrap();
        assert_eq!(
            transfers,
            [Transfer {
                from: p(2),
                to: p(1),
                amount: Money::from_cents(2400),
            }]
        );
    }

    #[test]
    fn test_settle_rejects_unknown_payer() {
        let result = sample_split();
        let err = settle_with_payer(&result, p(99)).unwrap_err();
        assert!(matches!(
            err,
            SplitError::UnknownParticipant { participant } if participant == p(99)
        ));
    }

    #[test]
    fn test_transfers_ordered_by_participant() {
        let result = sample_split();
        let transfers = settle_with_payer(&result, p(3)).unwrap();
        assert_eq!(transfers[0].from, p(1));
        assert_eq!(transfers[1].from, p(2));
    }
}
