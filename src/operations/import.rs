use super::add::create_transaction;
use crate::db::store::TransactionStore;
use crate::models::transaction::Transaction;
use std::fs::File;

/// Reads a headerless 5-column CSV (`date, description, amount, type,
/// category`) and appends every row to the store. All rows are validated
/// before the store is touched, so a malformed line aborts the whole import.
pub fn import_transactions(store: &mut TransactionStore, path: &str) -> Result<usize, String> {
    let transactions = read_csv(path)?;
    let count = transactions.len();
    for transaction in transactions {
        store.add(transaction)?;
    }
    Ok(count)
}

fn read_csv(path: &str) -> Result<Vec<Transaction>, String> {
    let file = File::open(path).map_err(|e| format!("Failed to open file '{}': {}", path, e))?;

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .has_headers(false)
        .from_reader(file);

    let mut transactions = Vec::new();

    for (line_index, result) in reader.records().enumerate() {
        let record =
            result.map_err(|e| format!("CSV parse error on line {}: {}", line_index + 1, e))?;

        if record.len() != 5 {
            return Err(format!(
                "Invalid number of columns on line {}: expected 5, got {}",
                line_index + 1,
                record.len()
            ));
        }

        let raw_input = format!(
            "{},{},{},{},{}",
            record.get(0).unwrap_or(""),
            record.get(1).unwrap_or(""),
            record.get(2).unwrap_or(""),
            record.get(3).unwrap_or(""),
            record.get(4).unwrap_or("")
        );

        let transaction = create_transaction(&raw_input)
            .map_err(|e| format!("Line {}: {}", line_index + 1, e))?;

        transactions.push(transaction);
    }

    Ok(transactions)
}
