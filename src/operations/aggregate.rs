use crate::models::transaction::{Transaction, TransactionType};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

pub fn total_by_type(transactions: &[Transaction], kind: TransactionType) -> Decimal {
    transactions
        .iter()
        .filter(|t| t.transaction_type == kind)
        .fold(Decimal::ZERO, |acc, t| acc + t.amount)
}

pub fn balance(transactions: &[Transaction]) -> Decimal {
    total_by_type(transactions, TransactionType::Income)
        - total_by_type(transactions, TransactionType::Expense)
}

/// Sums expense amounts per category. Categories appear in first-encountered
/// order, which is what breaks ties further down in `top_categories`.
pub fn category_breakdown(transactions: &[Transaction]) -> Vec<(String, Decimal)> {
    let mut breakdown: Vec<(String, Decimal)> = Vec::new();
    for transaction in transactions
        .iter()
        .filter(|t| t.transaction_type == TransactionType::Expense)
    {
        match breakdown.iter_mut().find(|(c, _)| *c == transaction.category) {
            Some((_, total)) => *total += transaction.amount,
            None => breakdown.push((transaction.category.clone(), transaction.amount)),
        }
    }
    breakdown
}

/// Orders a breakdown by amount descending and keeps at most `limit`
/// entries. The sort is stable, so equal amounts keep breakdown order.
pub fn top_categories(breakdown: &[(String, Decimal)], limit: usize) -> Vec<(String, Decimal)> {
    let mut sorted = breakdown.to_vec();
    sorted.sort_by(|a, b| b.1.cmp(&a.1));
    sorted.truncate(limit);
    sorted
}

/// Whole-number share of `total`, rounded half away from zero. A zero or
/// negative total yields 0 rather than a division error.
pub fn percentage_of(amount: Decimal, total: Decimal) -> i64 {
    if total <= Decimal::ZERO {
        return 0;
    }
    (amount / total * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .unwrap_or(0)
}

/// The `n` most recent transactions by date descending. The sort is stable,
/// so entries sharing a timestamp keep their original list order.
pub fn recent(transactions: &[Transaction], n: usize) -> Vec<Transaction> {
    let mut sorted = transactions.to_vec();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));
    sorted.truncate(n);
    sorted
}

/// Percentage of income left after expenses, clamped at zero. `None` when
/// there is no income to rate against.
pub fn savings_rate(income: Decimal, expenses: Decimal) -> Option<Decimal> {
    if income <= Decimal::ZERO {
        return None;
    }
    let rate = (income - expenses) / income * Decimal::ONE_HUNDRED;
    Some(rate.max(Decimal::ZERO))
}
