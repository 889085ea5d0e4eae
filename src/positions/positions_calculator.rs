use rust_decimal::Decimal;

use super::positions_model::Position;
use crate::ledger::{Transaction, TransactionKind};

/// Derives the position of one (owner, instrument) bucket from its
/// transaction history.
///
/// The fold is deterministic regardless of input order: entries are replayed
/// by occurrence date, then insertion date, then id. Soft-deleted entries and
/// entries belonging to other buckets are ignored. Returns `None` when the
/// folded quantity ends at or below zero; callers treat that as "no
/// position" and drop the snapshot row.
pub fn calculate_position(
    owner_id: &str,
    instrument_id: &str,
    transactions: &[Transaction],
) -> Option<Position> {
    let mut history: Vec<&Transaction> = transactions
        .iter()
        .filter(|tx| {
            tx.owner_id == owner_id && tx.instrument_id == instrument_id && tx.deleted_at.is_none()
        })
        .collect();
    history.sort_by(|a, b| {
        a.occurred_at
            .cmp(&b.occurred_at)
            .then_with(|| a.created_at.cmp(&b.created_at))
            .then_with(|| a.id.cmp(&b.id))
    });

    let mut quantity = Decimal::ZERO;
    let mut total_invested = Decimal::ZERO;

    for tx in history {
        match tx.kind {
            TransactionKind::Buy => {
                quantity += tx.quantity;
                total_invested += tx.quantity * tx.unit_price + tx.fees;
            }
            TransactionKind::Sell => {
                // Capital is released at the average cost carried before the
                // sale; a non-positive running quantity releases nothing.
                let average_cost = if quantity > Decimal::ZERO {
                    total_invested / quantity
                } else {
                    Decimal::ZERO
                };
                total_invested -= tx.quantity * average_cost;
                quantity -= tx.quantity;
            }
            // Income and corporate actions sit in the ledger but move
            // neither quantity nor cost basis.
            TransactionKind::Dividend
            | TransactionKind::Interest
            | TransactionKind::Yield
            | TransactionKind::BonusShares
            | TransactionKind::Split
            | TransactionKind::ReverseSplit => {}
        }
    }

    if quantity <= Decimal::ZERO {
        return None;
    }

    Some(Position {
        owner_id: owner_id.to_string(),
        instrument_id: instrument_id.to_string(),
        quantity,
        average_cost: total_invested / quantity,
        total_invested,
    })
}
