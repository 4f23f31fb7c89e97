use chrono::Local;
use finance_tracker::db;
use finance_tracker::db::store::TransactionStore;
use finance_tracker::models::report::{ReportDocument, ReportPeriod, ReportSection, ReportType};
use finance_tracker::models::transaction::{
    Transaction, TransactionType, EXPENSE_CATEGORIES, INCOME_CATEGORIES,
};
use finance_tracker::operations::add::create_transaction;
use finance_tracker::operations::filter::{filter_by_time, TimeFilter};
use finance_tracker::operations::import::import_transactions;
use finance_tracker::operations::overview::{DashboardOverview, OverviewCache};
use finance_tracker::operations::report::compose_report;
use std::io;

pub enum UserCommands {
    Add,
    Edit,
    Remove,
    List,
    Filter,
    Overview,
    Report,
    Import,
    Exit,
}

fn main() {
    println!("Welcome to the finance tracker!");
    let conn = db::connection::establish_connection().expect("Failed to open the local store");
    let mut store = TransactionStore::open(&conn);
    let mut active_filter = TimeFilter::All;
    let mut overview_cache = OverviewCache::new();

    loop {
        println!(
            "Please enter a command (add, edit, remove, list, filter, overview, report, import, exit):"
        );

        let input = match read_user_input() {
            Ok(cmd) => cmd,
            Err(e) => {
                println!("Error reading input: {}", e);
                continue;
            }
        };
        let parts: Vec<&str> = input.split_whitespace().collect();
        if parts.is_empty() {
            continue;
        }

        let command = match check_for_command(parts[0]) {
            Some(command) => command,
            None => {
                println!("Unknown command '{}'.", parts[0]);
                continue;
            }
        };

        match command {
            UserCommands::Add => {
                println!("Add command selected. Please enter transaction details in the format:\ndate(YYYY-MM-DD [HH:MM]), description, amount, type(income/expense), category");
                println!(
                    "Suggested expense categories: {}",
                    EXPENSE_CATEGORIES.join(", ")
                );
                println!(
                    "Suggested income categories: {}",
                    INCOME_CATEGORIES.join(", ")
                );
                let details = match read_user_input() {
                    Ok(details) => details,
                    Err(e) => {
                        println!("Error reading input: {}", e);
                        continue;
                    }
                };
                match create_transaction(&details).and_then(|t| store.add(t)) {
                    Ok(_) => println!("Transaction added successfully!"),
                    Err(e) => {
                        println!("Error adding transaction: {}", e);
                        println!("Please try again.");
                    }
                }
            }
            UserCommands::Edit => {
                println!("Edit command selected. Provide the transaction ID to replace:");
                let id = match read_user_input() {
                    Ok(id) => id,
                    Err(e) => {
                        println!("Error reading input: {}", e);
                        continue;
                    }
                };
                println!("Enter the replacement details in the format:\ndate(YYYY-MM-DD [HH:MM]), description, amount, type(income/expense), category");
                let details = match read_user_input() {
                    Ok(details) => details,
                    Err(e) => {
                        println!("Error reading input: {}", e);
                        continue;
                    }
                };
                let result = create_transaction(&details).and_then(|mut replacement| {
                    // Full-record replacement keeps the original id.
                    replacement.id = id;
                    store.update(replacement)
                });
                match result {
                    Ok(_) => println!("Transaction updated successfully!"),
                    Err(e) => println!("Error updating transaction: {}", e),
                }
            }
            UserCommands::Remove => {
                println!("Remove command selected. Provide the transaction ID to remove:");
                let id = match read_user_input() {
                    Ok(id) => id,
                    Err(e) => {
                        println!("Error reading input: {}", e);
                        continue;
                    }
                };
                match store.remove(id.trim()) {
                    Ok(_) => println!("Transaction removed successfully."),
                    Err(e) => println!("Error: {}", e),
                }
            }
            UserCommands::List => {
                let today = Local::now().date_naive();
                let view = filter_by_time(store.transactions(), active_filter, today);
                println!(
                    "Transactions ({}): {} shown",
                    active_filter.label(),
                    view.len()
                );
                for transaction in &view {
                    print_transaction(transaction);
                }
            }
            UserCommands::Filter => {
                let selection = if parts.len() > 1 {
                    parts[1].to_string()
                } else {
                    println!("Choose a view (all, today, week, month):");
                    match read_user_input() {
                        Ok(selection) => selection,
                        Err(e) => {
                            println!("Error reading input: {}", e);
                            continue;
                        }
                    }
                };
                match TimeFilter::parse(selection.trim()) {
                    Ok(filter) => {
                        active_filter = filter;
                        println!("Active view: {}", filter.label());
                    }
                    Err(e) => println!("Error: {}", e),
                }
            }
            UserCommands::Overview => {
                let today = Local::now().date_naive();
                let overview = overview_cache.overview(&store, active_filter, today);
                print_overview(overview);
            }
            UserCommands::Report => {
                let (type_tag, period_tag) = if parts.len() > 2 {
                    (parts[1].to_string(), parts[2].to_string())
                } else {
                    println!("Usage: report <summary|detailed|categories> <current|month|year>");
                    continue;
                };
                let report_type = match ReportType::parse(&type_tag) {
                    Ok(report_type) => report_type,
                    Err(e) => {
                        println!("Error: {}", e);
                        continue;
                    }
                };
                let period = match ReportPeriod::parse(&period_tag) {
                    Ok(period) => period,
                    Err(e) => {
                        println!("Error: {}", e);
                        continue;
                    }
                };

                let now = Local::now().naive_local();
                let today = now.date();
                let current_view = filter_by_time(store.transactions(), active_filter, today);
                let document = compose_report(
                    store.transactions(),
                    &current_view,
                    report_type,
                    period,
                    today,
                    now,
                );
                print_report(&document);
            }
            UserCommands::Import => {
                println!("Import command selected. Please enter the file path to import from (only csv for now):");
                let path = match read_user_input() {
                    Ok(path) => path,
                    Err(e) => {
                        println!("Error reading input: {}", e);
                        continue;
                    }
                };
                match import_transactions(&mut store, path.trim()) {
                    Ok(count) => println!("Successfully imported {} transactions.", count),
                    Err(e) => println!("Error importing transactions: {}", e),
                }
            }
            UserCommands::Exit => {
                println!("Exiting the application.");
                break;
            }
        }
    }
}

fn read_user_input() -> Result<String, String> {
    let mut input = String::new();
    io::stdin()
        .read_line(&mut input)
        .map_err(|_| "Failed to read line".to_string())?;
    Ok(input.trim().to_string())
}

fn check_for_command(input: &str) -> Option<UserCommands> {
    match input {
        "add" => Some(UserCommands::Add),
        "edit" => Some(UserCommands::Edit),
        "remove" => Some(UserCommands::Remove),
        "list" => Some(UserCommands::List),
        "filter" => Some(UserCommands::Filter),
        "overview" => Some(UserCommands::Overview),
        "report" => Some(UserCommands::Report),
        "import" => Some(UserCommands::Import),
        "exit" => Some(UserCommands::Exit),
        _ => None,
    }
}

fn print_transaction(transaction: &Transaction) {
    let sign = match transaction.transaction_type {
        TransactionType::Income => "+",
        TransactionType::Expense => "-",
    };
    println!(
        "{} | {} | {} | {} | {}${:.2}",
        transaction.id,
        transaction.date.format("%Y-%m-%d %H:%M"),
        transaction.description,
        transaction.category,
        sign,
        transaction.amount
    );
}

fn print_overview(overview: &DashboardOverview) {
    if overview.is_filtered {
        println!("Filtered Income:   ${:.2} ({}% of total ${:.2})", overview.filtered_income, overview.income_share_of_total, overview.total_income);
        println!("Filtered Expenses: ${:.2} ({}% of total ${:.2})", overview.filtered_expenses, overview.expense_share_of_total, overview.total_expenses);
        println!("Filtered Balance:  ${:.2}", overview.filtered_balance);
    } else {
        println!("Total Income:    ${:.2}", overview.total_income);
        println!("Total Expenses:  ${:.2}", overview.total_expenses);
        println!("Current Balance: ${:.2}", overview.balance);
    }

    println!("Recent transactions:");
    if overview.recent.is_empty() {
        println!("  No transactions yet");
    }
    for transaction in &overview.recent {
        print_transaction(transaction);
    }

    println!("Top spending categories:");
    if overview.top_categories.is_empty() {
        println!("  No expense data yet");
    }
    for share in &overview.top_categories {
        println!(
            "  {:15} ${:.2} ({}%)",
            share.category, share.amount, share.percentage
        );
    }
}

fn print_report(document: &ReportDocument) {
    println!("{}", document.title);
    println!("{}", document.period_label);
    println!(
        "Generated on: {}",
        document.generated_at.format("%Y-%m-%d %H:%M:%S")
    );
    for section in &document.sections {
        match section {
            ReportSection::Heading(heading) => println!("\n{}", heading),
            ReportSection::Line(line) => println!("{}", line),
            ReportSection::Table(table) => {
                println!("  {}", table.header.join(" | "));
                for row in &table.rows {
                    println!("  {}", row.join(" | "));
                }
            }
        }
    }
    println!("\nExporting to PDF uses an external document renderer backend.");
}
