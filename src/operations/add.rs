use crate::models::transaction::{Transaction, TransactionType};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use std::str::FromStr;

/// Parses a raw `date, description, amount, type, category` line into a
/// transaction with a freshly assigned id. This is the input boundary: core
/// code past this point assumes well-formed values.
pub fn create_transaction(raw: &str) -> Result<Transaction, String> {
    let parts: Vec<&str> = raw.split(',').map(|s| s.trim()).collect();
    if parts.len() != 5 {
        return Err(format!(
            "Invalid number of details provided. Expected 5 details separated by commas but got {}",
            parts.len()
        ));
    }

    let date = parse_date(parts[0])?;

    let description = parts[1].to_string();
    if description.is_empty() {
        return Err("Description cannot be empty".to_string());
    }
    if description.len() > 255 {
        return Err("Description too long".to_string());
    }

    let amount = Decimal::from_str(parts[2]).map_err(|_| {
        format!(
            "Invalid amount format {}. Please provide a valid decimal number.",
            parts[2]
        )
    })?;
    if amount < Decimal::ZERO {
        return Err("Amount cannot be negative. Use the type field to record expenses.".to_string());
    }

    let transaction_type = TransactionType::parse(parts[3])?;

    let category = parts[4].to_string();
    if category.len() > 50 {
        return Err("Category too long".to_string());
    }

    Ok(Transaction::create(
        date,
        description,
        amount,
        transaction_type,
        category,
    ))
}

/// Accepts `YYYY-MM-DD HH:MM` or a bare `YYYY-MM-DD` (midnight assumed).
/// Timestamps are naive local time throughout.
fn parse_date(input: &str) -> Result<NaiveDateTime, String> {
    if let Ok(datetime) = NaiveDateTime::parse_from_str(input, "%Y-%m-%d %H:%M") {
        return Ok(datetime);
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .map(|date| date.and_time(NaiveTime::MIN))
        .map_err(|_| "Invalid date format. Please use YYYY-MM-DD or YYYY-MM-DD HH:MM.".to_string())
}
