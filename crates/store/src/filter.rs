//! Conjunctive transaction filtering: kind, category and an inclusive
//! date range at day granularity.

use api_types::{
    EntityId,
    transaction::{Transaction, TransactionKind},
};
use chrono::NaiveDate;

use crate::Collection;

/// `None` fields are inactive; the default filter is the identity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransactionFilter {
    pub kind: Option<TransactionKind>,
    pub category_id: Option<EntityId>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl TransactionFilter {
    pub fn matches(&self, tx: &Transaction) -> bool {
        if self.kind.is_some_and(|kind| tx.kind != kind) {
            return false;
        }
        if self.category_id.is_some_and(|id| tx.category_id != id) {
            return false;
        }
        // Both bounds are inclusive. A transaction without a date
        // passes the date bounds.
        if let (Some(start), Some(date)) = (self.start_date, tx.transaction_date)
            && date < start
        {
            return false;
        }
        if let (Some(end), Some(date)) = (self.end_date, tx.transaction_date)
            && date > end
        {
            return false;
        }
        true
    }
}

/// Transactions matching every active clause, in load order.
pub fn filter_transactions<'a>(
    transactions: &'a Collection<Transaction>,
    filter: &TransactionFilter,
) -> Vec<&'a Transaction> {
    transactions
        .records()
        .filter(|tx| filter.matches(tx))
        .collect()
}
