use crate::models::transaction::Transaction;
use rusqlite::{Connection, OptionalExtension};

const TRANSACTIONS_KEY: &str = "transactions";

/// Reads the persisted transaction blob. A missing or corrupt blob is an
/// empty list, never an error.
pub fn load_transactions(conn: &Connection) -> Vec<Transaction> {
    let value: Option<String> = conn
        .query_row(
            "SELECT value FROM app_state WHERE key = ?1",
            [TRANSACTIONS_KEY],
            |row| row.get(0),
        )
        .optional()
        .unwrap_or(None);

    match value {
        Some(json) => serde_json::from_str(&json).unwrap_or_default(),
        None => Vec::new(),
    }
}

/// Serializes the full list back to the blob. No incremental diffing.
pub fn save_transactions(conn: &Connection, transactions: &[Transaction]) -> Result<(), String> {
    let json = serde_json::to_string(transactions)
        .map_err(|e| format!("Failed to serialize transactions: {}", e))?;
    conn.execute(
        "INSERT OR REPLACE INTO app_state (key, value) VALUES (?1, ?2)",
        [TRANSACTIONS_KEY, json.as_str()],
    )
    .map_err(|e| format!("Failed to persist transactions: {}", e))?;
    Ok(())
}

/// The in-memory transaction list, synchronized to the persistent blob after
/// every mutation. The list is the single source of truth; filtered and
/// aggregated views are derived copies.
pub struct TransactionStore<'a> {
    conn: &'a Connection,
    transactions: Vec<Transaction>,
    revision: u64,
}

impl<'a> TransactionStore<'a> {
    /// Loads the persisted list once. Call at startup.
    pub fn open(conn: &'a Connection) -> Self {
        let transactions = load_transactions(conn);
        Self {
            conn,
            transactions,
            revision: 0,
        }
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Monotonic counter bumped by every mutation. Derived-view caches key
    /// on it to know when to recompute.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn add(&mut self, transaction: Transaction) -> Result<(), String> {
        if self.transactions.iter().any(|t| t.id == transaction.id) {
            return Err(format!(
                "Transaction with ID {} already exists",
                transaction.id
            ));
        }
        self.transactions.push(transaction);
        self.revision += 1;
        save_transactions(self.conn, &self.transactions)
    }

    /// Full-record replacement under an existing id; the entry keeps its
    /// position in the list.
    pub fn update(&mut self, replacement: Transaction) -> Result<(), String> {
        let pos = self
            .transactions
            .iter()
            .position(|t| t.id == replacement.id)
            .ok_or_else(|| format!("Transaction with ID {} not found", replacement.id))?;
        self.transactions[pos] = replacement;
        self.revision += 1;
        save_transactions(self.conn, &self.transactions)
    }

    pub fn remove(&mut self, id: &str) -> Result<(), String> {
        let pos = self
            .transactions
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| format!("Transaction with ID {} not found", id))?;
        self.transactions.remove(pos);
        self.revision += 1;
        save_transactions(self.conn, &self.transactions)
    }
}
