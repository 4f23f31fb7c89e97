use crate::db::store::TransactionStore;
use crate::models::transaction::{Transaction, TransactionType};
use crate::operations::aggregate::{
    balance, category_breakdown, percentage_of, recent, top_categories, total_by_type,
};
use crate::operations::filter::{filter_by_time, TimeFilter};
use chrono::NaiveDate;
use rust_decimal::Decimal;

const RECENT_PREVIEW_COUNT: usize = 3;
const TOP_CATEGORY_COUNT: usize = 4;

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryShare {
    pub category: String,
    pub amount: Decimal,
    pub percentage: i64,
}

/// Everything the dashboard panels display, derived from one snapshot of the
/// store and the active time filter.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardOverview {
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    pub balance: Decimal,
    pub filtered_income: Decimal,
    pub filtered_expenses: Decimal,
    pub filtered_balance: Decimal,
    pub is_filtered: bool,
    /// Share of the grand totals the filtered view represents. Only
    /// meaningful when `is_filtered` is set.
    pub income_share_of_total: i64,
    pub expense_share_of_total: i64,
    pub recent: Vec<Transaction>,
    pub top_categories: Vec<CategoryShare>,
}

pub fn build_overview(
    all: &[Transaction],
    filtered: &[Transaction],
    active: TimeFilter,
) -> DashboardOverview {
    let total_income = total_by_type(all, TransactionType::Income);
    let total_expenses = total_by_type(all, TransactionType::Expense);

    let filtered_income = total_by_type(filtered, TransactionType::Income);
    let filtered_expenses = total_by_type(filtered, TransactionType::Expense);

    let is_filtered = active != TimeFilter::All && filtered.len() != all.len();

    // Category bars are scaled against the expense total of whichever view
    // is showing.
    let percentage_base = if is_filtered {
        filtered_expenses
    } else {
        total_expenses
    };
    let breakdown = category_breakdown(filtered);
    let top = top_categories(&breakdown, TOP_CATEGORY_COUNT)
        .into_iter()
        .map(|(category, amount)| CategoryShare {
            percentage: percentage_of(amount, percentage_base),
            category,
            amount,
        })
        .collect();

    DashboardOverview {
        total_income,
        total_expenses,
        balance: balance(all),
        filtered_income,
        filtered_expenses,
        filtered_balance: filtered_income - filtered_expenses,
        is_filtered,
        income_share_of_total: percentage_of(filtered_income, total_income),
        expense_share_of_total: percentage_of(filtered_expenses, total_expenses),
        recent: recent(filtered, RECENT_PREVIEW_COUNT),
        top_categories: top,
    }
}

/// Single-slot memo for the overview. The snapshot is recomputed only when
/// the source list, the selector, or the calendar day changes.
pub struct OverviewCache {
    key: Option<(u64, TimeFilter, NaiveDate)>,
    snapshot: DashboardOverview,
}

impl OverviewCache {
    pub fn new() -> Self {
        Self {
            key: None,
            snapshot: build_overview(&[], &[], TimeFilter::All),
        }
    }

    pub fn overview(
        &mut self,
        store: &TransactionStore,
        filter: TimeFilter,
        today: NaiveDate,
    ) -> &DashboardOverview {
        let key = (store.revision(), filter, today);
        if self.key != Some(key) {
            let filtered = filter_by_time(store.transactions(), filter, today);
            self.snapshot = build_overview(store.transactions(), &filtered, filter);
            self.key = Some(key);
        }
        &self.snapshot
    }
}

impl Default for OverviewCache {
    fn default() -> Self {
        Self::new()
    }
}
