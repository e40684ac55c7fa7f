use chrono::{Datelike, Local};
use store::{Store, metrics};

mod config;
mod error;

use crate::error::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let config = config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "fintrack={level},gateway={level},store={level}",
            level = config.log_level
        ))
        .init();

    let client = gateway::Client::new(&config.base_url)?;
    let mut store = Store::new();

    tracing::info!("loading collections from {}", config.base_url);
    client.load_all(&mut store).await;

    print_dashboard(&store);
    Ok(())
}

fn print_dashboard(store: &Store) {
    let today = Local::now().date_naive();
    let totals = metrics::monthly_totals(&store.transactions, today.month(), today.year());

    println!("== {} ==", today.format("%B %Y"));
    println!(
        "income {:.2} / expenses {:.2} / balance {:.2}",
        totals.income, totals.expenses, totals.balance
    );

    let budgets = metrics::budgets_for_month(&store.budgets, today.month(), today.year());
    if !budgets.is_empty() {
        println!("\nBudgets:");
        for budget in budgets {
            let progress = metrics::budget_progress(budget, &store.transactions);
            println!(
                "  {}: {:.2} of {:.2} ({:.0}%), {:.2} remaining",
                store.category_name(budget.category_id),
                progress.spent,
                budget.amount,
                progress.percentage,
                progress.remaining,
            );
        }
    }

    let top = metrics::top_expense_categories(&store.transactions, &store.categories);
    if !top.is_empty() {
        println!("\nTop expense categories:");
        for entry in top {
            println!("  {}: {:.2}", entry.name, entry.total);
        }
    }

    let goals = metrics::rank_goals(&store.savings);
    if !goals.is_empty() {
        println!("\nSavings goals:");
        for goal in goals {
            println!(
                "  {}: {:.2} of {:.2} ({:.0}%)",
                goal.name,
                goal.current_amount,
                goal.target_amount,
                metrics::bar_width(metrics::savings_percentage(goal)),
            );
        }
    }

    let recent = metrics::recent_transactions(&store.transactions);
    if !recent.is_empty() {
        println!("\nRecent transactions:");
        for tx in recent {
            let date = tx
                .transaction_date
                .map(|d| d.to_string())
                .unwrap_or_else(|| "(no date)".to_string());
            let amount = format!("{:.2}", tx.amount);
            println!(
                "  {date}  {:<20} {amount:>10}  {}",
                store.category_name(tx.category_id),
                tx.description,
            );
        }
    }
}
