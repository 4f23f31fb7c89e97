use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Suggested categories offered for expense entries. The model itself keeps
/// `category` a free string, so these are options, not a constraint.
pub const EXPENSE_CATEGORIES: [&str; 10] = [
    "Housing",
    "Transportation",
    "Food",
    "Utilities",
    "Insurance",
    "Healthcare",
    "Savings",
    "Personal",
    "Entertainment",
    "Other",
];

/// Suggested categories offered for income entries.
pub const INCOME_CATEGORIES: [&str; 5] = ["Salary", "Freelance", "Investments", "Gifts", "Other"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub fn parse(tag: &str) -> Result<Self, String> {
        match tag.to_lowercase().as_str() {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            _ => Err("Invalid transaction type. Use 'income' or 'expense'.".to_string()),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TransactionType::Income => "Income",
            TransactionType::Expense => "Expense",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub description: String,
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub category: String,
    pub date: NaiveDateTime,
}

impl Transaction {
    pub fn new(
        id: String,
        date: NaiveDateTime,
        description: String,
        amount: Decimal,
        transaction_type: TransactionType,
        category: String,
    ) -> Self {
        Self {
            id,
            date,
            description,
            amount,
            transaction_type,
            category,
        }
    }

    /// Builds a record with a freshly assigned id. Ids are never reused; a
    /// later edit replaces the whole record under the same id.
    pub fn create(
        date: NaiveDateTime,
        description: String,
        amount: Decimal,
        transaction_type: TransactionType,
        category: String,
    ) -> Self {
        Self::new(
            Uuid::new_v4().to_string(),
            date,
            description,
            amount,
            transaction_type,
            category,
        )
    }
}
