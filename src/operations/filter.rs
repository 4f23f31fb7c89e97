use crate::models::report::ReportPeriod;
use crate::models::transaction::Transaction;
use chrono::{Datelike, Duration, NaiveDate, NaiveTime};

/// Dashboard time-range selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeFilter {
    All,
    Today,
    ThisWeek,
    ThisMonth,
}

impl TimeFilter {
    pub fn parse(tag: &str) -> Result<Self, String> {
        match tag.to_lowercase().as_str() {
            "all" => Ok(TimeFilter::All),
            "today" => Ok(TimeFilter::Today),
            "week" => Ok(TimeFilter::ThisWeek),
            "month" => Ok(TimeFilter::ThisMonth),
            _ => Err(format!(
                "Invalid filter '{}'. Use 'all', 'today', 'week' or 'month'.",
                tag
            )),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TimeFilter::All => "All Time",
            TimeFilter::Today => "Today",
            TimeFilter::ThisWeek => "This Week",
            TimeFilter::ThisMonth => "This Month",
        }
    }
}

/// Narrows a transaction list to the selected time range. The reference date
/// is an explicit parameter so the function has no hidden clock dependency.
/// The input is never mutated; matching elements keep their relative order.
pub fn filter_by_time(
    transactions: &[Transaction],
    filter: TimeFilter,
    today: NaiveDate,
) -> Vec<Transaction> {
    match filter {
        TimeFilter::All => transactions.to_vec(),
        TimeFilter::Today => transactions
            .iter()
            .filter(|t| t.date.date() == today)
            .cloned()
            .collect(),
        TimeFilter::ThisWeek => {
            // Week starts on the most recent Sunday at local midnight. No
            // upper bound: future-dated entries within the week qualify.
            let start_of_week = today - Duration::days(today.weekday().num_days_from_sunday() as i64);
            let cutoff = start_of_week.and_time(NaiveTime::MIN);
            transactions
                .iter()
                .filter(|t| t.date >= cutoff)
                .cloned()
                .collect()
        }
        TimeFilter::ThisMonth => filter_by_month(transactions, today),
    }
}

/// Selects the data slice a report covers. `Current` passes the dashboard
/// filter's output through unchanged; the other periods re-filter the full
/// set.
pub fn filter_by_period(
    all: &[Transaction],
    current_view: &[Transaction],
    period: ReportPeriod,
    today: NaiveDate,
) -> Vec<Transaction> {
    match period {
        ReportPeriod::Current => current_view.to_vec(),
        ReportPeriod::Month => filter_by_month(all, today),
        ReportPeriod::Year => filter_by_year(all, today),
    }
}

pub fn filter_by_month(transactions: &[Transaction], today: NaiveDate) -> Vec<Transaction> {
    transactions
        .iter()
        .filter(|t| t.date.month() == today.month() && t.date.year() == today.year())
        .cloned()
        .collect()
}

pub fn filter_by_year(transactions: &[Transaction], today: NaiveDate) -> Vec<Transaction> {
    transactions
        .iter()
        .filter(|t| t.date.year() == today.year())
        .cloned()
        .collect()
}
