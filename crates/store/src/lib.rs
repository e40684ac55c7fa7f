//! In-memory entity store and derived-metric computations for the
//! finance tracker client.
//!
//! The store holds four independent normalized collections
//! (transactions, categories, budgets, savings goals) with identical
//! update semantics. Everything in [`metrics`] and [`filter`] is a
//! pure function over the current snapshot: recomputed on every call,
//! no caching, no side effects.

pub use collection::{Collection, Record};
pub use filter::{TransactionFilter, filter_transactions};

use api_types::{
    EntityId,
    budget::Budget,
    category::Category,
    savings::SavingsGoal,
    transaction::Transaction,
};

mod collection;
pub mod filter;
pub mod metrics;

impl Record for Transaction {
    fn id(&self) -> EntityId {
        self.id
    }
}

impl Record for Category {
    fn id(&self) -> EntityId {
        self.id
    }
}

impl Record for Budget {
    fn id(&self) -> EntityId {
        self.id
    }
}

impl Record for SavingsGoal {
    fn id(&self) -> EntityId {
        self.id
    }
}

/// Exclusive owner of the four normalized collections.
///
/// Cross-entity relations (`category_id`) are lookups by value, never
/// pointers; consumers must tolerate the referenced entity being
/// absent (see [`Store::category_name`]).
#[derive(Debug, Default)]
pub struct Store {
    pub transactions: Collection<Transaction>,
    pub categories: Collection<Category>,
    pub budgets: Collection<Budget>,
    pub savings: Collection<SavingsGoal>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sign-out reset: clears all four collections uniformly.
    pub fn clear_all(&mut self) {
        self.transactions.reset();
        self.categories.reset();
        self.budgets.reset();
        self.savings.reset();
    }

    /// Resolves a category name, falling back to `"Unknown"` when the
    /// referenced category no longer exists.
    pub fn category_name(&self, category_id: EntityId) -> &str {
        self.categories
            .get(category_id)
            .map(|category| category.name.as_str())
            .unwrap_or("Unknown")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use api_types::transaction::TransactionKind;
    use rust_decimal::Decimal;

    #[test]
    fn clear_all_resets_every_collection() {
        let mut store = Store::new();
        store.transactions.insert(Transaction {
            id: 1,
            amount: Decimal::from(10),
            description: "Lunch".to_string(),
            category_id: 5,
            kind: TransactionKind::Expense,
            transaction_date: None,
        });
        store.categories.insert(Category {
            id: 5,
            name: "Food".to_string(),
            description: None,
        });
        store.budgets.insert(Budget {
            id: 1,
            category_id: 5,
            amount: Decimal::from(200),
            month: 6,
            year: 2024,
        });
        store.savings.insert(SavingsGoal {
            id: 1,
            name: "Trip".to_string(),
            target_amount: Decimal::from(100),
            current_amount: Decimal::ZERO,
            target_date: None,
            description: None,
        });

        store.clear_all();

        assert!(store.transactions.is_empty());
        assert!(store.categories.is_empty());
        assert!(store.budgets.is_empty());
        assert!(store.savings.is_empty());
    }

    #[test]
    fn category_name_falls_back_to_unknown() {
        let mut store = Store::new();
        store.categories.insert(Category {
            id: 5,
            name: "Food".to_string(),
            description: None,
        });

        assert_eq!(store.category_name(5), "Food");
        assert_eq!(store.category_name(99), "Unknown");
    }
}
