//! Derived metrics: pure, synchronous computations over the current
//! collection snapshots.

use std::cmp::Ordering;
use std::collections::HashMap;

use api_types::{
    EntityId,
    budget::Budget,
    category::Category,
    savings::SavingsGoal,
    transaction::{Transaction, TransactionKind},
};
use chrono::{Datelike, Local, NaiveDate};
use rust_decimal::Decimal;

use crate::Collection;

/// How many categories the expense ranking keeps.
pub const TOP_CATEGORIES: usize = 5;
/// How many transactions the recent view keeps.
pub const RECENT_TRANSACTIONS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MonthlyTotals {
    pub income: Decimal,
    pub expenses: Decimal,
    pub balance: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BudgetProgress {
    pub spent: Decimal,
    /// May go negative when the budget is exceeded.
    pub remaining: Decimal,
    /// Clamped to `[0, 100]` even when `remaining` shows over-budget.
    pub percentage: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTotal {
    pub category_id: EntityId,
    pub name: String,
    pub total: Decimal,
}

fn in_month(date: Option<NaiveDate>, month: u32, year: i32) -> bool {
    date.is_some_and(|date| date.month() == month && date.year() == year)
}

/// Income, expenses and balance for the transactions of one calendar
/// month, regardless of how the dates were serialized on the wire.
pub fn monthly_totals(
    transactions: &Collection<Transaction>,
    month: u32,
    year: i32,
) -> MonthlyTotals {
    let mut totals = MonthlyTotals::default();
    for tx in transactions.records() {
        if !in_month(tx.transaction_date, month, year) {
            continue;
        }
        match tx.kind {
            TransactionKind::Income => totals.income += tx.amount,
            TransactionKind::Expense => totals.expenses += tx.amount,
        }
    }
    totals.balance = totals.income - totals.expenses;
    totals
}

/// [`monthly_totals`] for the current month on the client clock.
pub fn current_monthly_totals(transactions: &Collection<Transaction>) -> MonthlyTotals {
    let today = Local::now().date_naive();
    monthly_totals(transactions, today.month(), today.year())
}

/// `value / target * 100`.
///
/// Zero-target convention: 0% when the value is also 0, else 100%.
pub fn ratio_percentage(value: Decimal, target: Decimal) -> Decimal {
    if target <= Decimal::ZERO {
        return if value.is_zero() {
            Decimal::ZERO
        } else {
            Decimal::ONE_HUNDRED
        };
    }
    value / target * Decimal::ONE_HUNDRED
}

/// Spent/remaining/percentage for one budget, against the expense
/// transactions of its category in its month and year.
pub fn budget_progress(budget: &Budget, transactions: &Collection<Transaction>) -> BudgetProgress {
    let spent: Decimal = transactions
        .records()
        .filter(|tx| tx.kind == TransactionKind::Expense)
        .filter(|tx| tx.category_id == budget.category_id)
        .filter(|tx| in_month(tx.transaction_date, budget.month, budget.year))
        .map(|tx| tx.amount)
        .sum();

    BudgetProgress {
        spent,
        remaining: budget.amount - spent,
        percentage: ratio_percentage(spent, budget.amount).min(Decimal::ONE_HUNDRED),
    }
}

/// Budgets for one month/year, in load order.
pub fn budgets_for_month<'a>(
    budgets: &'a Collection<Budget>,
    month: u32,
    year: i32,
) -> Vec<&'a Budget> {
    budgets
        .records()
        .filter(|budget| budget.month == month && budget.year == year)
        .collect()
}

/// Raw completion percentage, deliberately unclamped: goals past their
/// target rank above everything else.
pub fn savings_percentage(goal: &SavingsGoal) -> Decimal {
    ratio_percentage(goal.current_amount, goal.target_amount)
}

/// Progress-bar width input: the raw percentage clamped to `[0, 100]`.
pub fn bar_width(percentage: Decimal) -> Decimal {
    percentage.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED)
}

/// Goals ranked by raw completion ratio, highest first.
pub fn rank_goals(savings: &Collection<SavingsGoal>) -> Vec<&SavingsGoal> {
    let mut goals: Vec<&SavingsGoal> = savings.records().collect();
    goals.sort_by(|a, b| savings_percentage(b).cmp(&savings_percentage(a)));
    goals
}

/// Expense totals grouped by category, top 5 by amount. Category
/// names resolve through the registry, defaulting to `"Unknown"` when
/// the category has been deleted. Ties break on ascending id so the
/// ranking is deterministic.
pub fn top_expense_categories(
    transactions: &Collection<Transaction>,
    categories: &Collection<Category>,
) -> Vec<CategoryTotal> {
    let mut totals: HashMap<EntityId, Decimal> = HashMap::new();
    for tx in transactions.records() {
        if tx.kind == TransactionKind::Expense {
            *totals.entry(tx.category_id).or_default() += tx.amount;
        }
    }

    let mut ranked: Vec<(EntityId, Decimal)> = totals.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    ranked.truncate(TOP_CATEGORIES);

    ranked
        .into_iter()
        .map(|(category_id, total)| CategoryTotal {
            category_id,
            name: categories
                .get(category_id)
                .map(|category| category.name.clone())
                .unwrap_or_else(|| "Unknown".to_string()),
            total,
        })
        .collect()
}

/// All transactions sorted descending by date (missing dates last),
/// top 5 taken.
pub fn recent_transactions(transactions: &Collection<Transaction>) -> Vec<&Transaction> {
    let mut all: Vec<&Transaction> = transactions.records().collect();
    all.sort_by(|a, b| match (a.transaction_date, b.transaction_date) {
        (Some(a_date), Some(b_date)) => b_date.cmp(&a_date),
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (None, None) => Ordering::Equal,
    });
    all.truncate(RECENT_TRANSACTIONS);
    all
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tx(
        id: EntityId,
        category_id: EntityId,
        kind: TransactionKind,
        amount: i64,
        date: &str,
    ) -> Transaction {
        Transaction {
            id,
            amount: Decimal::from(amount),
            description: String::new(),
            category_id,
            kind,
            transaction_date: api_types::date_only::parse(date),
        }
    }

    fn goal(id: EntityId, current: i64, target: i64) -> SavingsGoal {
        SavingsGoal {
            id,
            name: format!("goal {id}"),
            target_amount: Decimal::from(target),
            current_amount: Decimal::from(current),
            target_date: None,
            description: None,
        }
    }

    #[test]
    fn monthly_totals_partitions_by_month_and_kind() {
        let mut transactions = Collection::new();
        transactions.replace_all(vec![
            tx(1, 1, TransactionKind::Income, 1000, "2024-06-01"),
            tx(2, 1, TransactionKind::Expense, 300, "2024-06-15"),
            tx(3, 1, TransactionKind::Expense, 999, "2024-05-31"),
            tx(4, 1, TransactionKind::Income, 50, "2023-06-15"),
        ]);

        let totals = monthly_totals(&transactions, 6, 2024);
        assert_eq!(totals.income, Decimal::from(1000));
        assert_eq!(totals.expenses, Decimal::from(300));
        assert_eq!(totals.balance, Decimal::from(700));
    }

    #[test]
    fn monthly_totals_counts_date_times_in_the_month() {
        let mut transactions = Collection::new();
        transactions.replace_all(vec![tx(
            1,
            1,
            TransactionKind::Income,
            10,
            "2024-06-03T18:30:00",
        )]);

        assert_eq!(
            monthly_totals(&transactions, 6, 2024).income,
            Decimal::from(10)
        );
    }

    #[test]
    fn budget_progress_over_budget_clamps_percentage_only() {
        let budget = Budget {
            id: 1,
            category_id: 5,
            amount: Decimal::from(200),
            month: 6,
            year: 2024,
        };
        let mut transactions = Collection::new();
        transactions.replace_all(vec![
            tx(1, 5, TransactionKind::Expense, 50, "2024-06-03"),
            tx(2, 5, TransactionKind::Expense, 200, "2024-06-20"),
            tx(3, 9, TransactionKind::Expense, 1000, "2024-06-10"),
        ]);

        let progress = budget_progress(&budget, &transactions);
        assert_eq!(progress.spent, Decimal::from(250));
        assert_eq!(progress.remaining, Decimal::from(-50));
        assert_eq!(progress.percentage, Decimal::ONE_HUNDRED);
    }

    #[test]
    fn budget_progress_ignores_income_and_other_months() {
        let budget = Budget {
            id: 1,
            category_id: 5,
            amount: Decimal::from(100),
            month: 6,
            year: 2024,
        };
        let mut transactions = Collection::new();
        transactions.replace_all(vec![
            tx(1, 5, TransactionKind::Income, 40, "2024-06-03"),
            tx(2, 5, TransactionKind::Expense, 30, "2024-07-01"),
            tx(3, 5, TransactionKind::Expense, 25, "2024-06-30"),
        ]);

        let progress = budget_progress(&budget, &transactions);
        assert_eq!(progress.spent, Decimal::from(25));
        assert_eq!(progress.remaining, Decimal::from(75));
        assert_eq!(progress.percentage, Decimal::from(25));
    }

    #[test]
    fn budget_percentage_stays_within_bounds() {
        let mut transactions = Collection::new();
        transactions.replace_all(vec![tx(
            1,
            5,
            TransactionKind::Expense,
            1_000_000,
            "2024-06-03",
        )]);

        for amount in [1i64, 10, 200, 999_999] {
            let budget = Budget {
                id: 1,
                category_id: 5,
                amount: Decimal::from(amount),
                month: 6,
                year: 2024,
            };
            let percentage = budget_progress(&budget, &transactions).percentage;
            assert!(percentage >= Decimal::ZERO);
            assert!(percentage <= Decimal::ONE_HUNDRED);
        }
    }

    #[test]
    fn savings_percentage_is_unclamped_but_bar_width_caps() {
        let over = goal(1, 150, 100);
        let percentage = savings_percentage(&over);
        assert_eq!(percentage, Decimal::from(150));
        assert_eq!(bar_width(percentage), Decimal::ONE_HUNDRED);
    }

    #[test]
    fn zero_target_uses_documented_convention() {
        assert_eq!(savings_percentage(&goal(1, 0, 0)), Decimal::ZERO);
        assert_eq!(savings_percentage(&goal(2, 5, 0)), Decimal::ONE_HUNDRED);
    }

    #[test]
    fn rank_goals_orders_by_raw_ratio_descending() {
        let mut savings = Collection::new();
        savings.replace_all(vec![goal(1, 10, 100), goal(2, 150, 100), goal(3, 50, 100)]);

        let ranked = rank_goals(&savings);
        let ids: Vec<EntityId> = ranked.iter().map(|g| g.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn top_expense_categories_resolves_unknown_names() {
        let mut transactions = Collection::new();
        transactions.replace_all(vec![
            tx(1, 5, TransactionKind::Expense, 50, "2024-06-03"),
            tx(2, 5, TransactionKind::Expense, 20, "2024-06-04"),
            tx(3, 9, TransactionKind::Expense, 100, "2024-06-05"),
            tx(4, 9, TransactionKind::Income, 500, "2024-06-05"),
        ]);
        let mut categories = Collection::new();
        categories.replace_all(vec![Category {
            id: 5,
            name: "Food".to_string(),
            description: None,
        }]);

        let top = top_expense_categories(&transactions, &categories);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].name, "Unknown");
        assert_eq!(top[0].total, Decimal::from(100));
        assert_eq!(top[1].name, "Food");
        assert_eq!(top[1].total, Decimal::from(70));
    }

    #[test]
    fn top_expense_categories_keeps_five() {
        let mut transactions = Collection::new();
        transactions.replace_all(
            (1..=7)
                .map(|n| tx(n, n, TransactionKind::Expense, 10 * n, "2024-06-01"))
                .collect(),
        );
        let categories = Collection::new();

        let top = top_expense_categories(&transactions, &categories);
        assert_eq!(top.len(), TOP_CATEGORIES);
        assert_eq!(top[0].category_id, 7);
    }

    #[test]
    fn recent_transactions_sorts_missing_dates_last() {
        let mut transactions = Collection::new();
        let mut undated = tx(3, 1, TransactionKind::Expense, 1, "2024-06-01");
        undated.transaction_date = None;
        transactions.replace_all(vec![
            tx(1, 1, TransactionKind::Expense, 1, "2024-06-01"),
            tx(2, 1, TransactionKind::Expense, 1, "2024-06-10"),
            undated,
            tx(4, 1, TransactionKind::Expense, 1, "2024-05-01"),
        ]);

        let recent = recent_transactions(&transactions);
        let ids: Vec<EntityId> = recent.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![2, 1, 4, 3]);
    }
}
