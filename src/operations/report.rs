use crate::models::report::{ReportDocument, ReportPeriod, ReportSection, ReportTable, ReportType};
use crate::models::transaction::{Transaction, TransactionType};
use crate::operations::aggregate::{
    category_breakdown, percentage_of, recent, savings_rate, top_categories, total_by_type,
};
use crate::operations::filter::filter_by_period;
use crate::render::{DocumentRenderer, TextOptions};
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::{Decimal, RoundingStrategy};

// Layout constants for A4 portrait in millimetres.
const TITLE_Y: f64 = 20.0;
const SUBTITLE_Y: f64 = 30.0;
const GENERATED_Y: f64 = 38.0;
const BODY_TOP: f64 = 50.0;
const BODY_LEFT: f64 = 20.0;
const LINE_STEP: f64 = 10.0;
const TABLE_GAP: f64 = 20.0;
const WRAP_WIDTH: f64 = 170.0;
const FOOTER_MARGIN: f64 = 10.0;

/// Builds the complete report structure for the requested type and period.
/// Pure document assembly: an empty selection still composes a valid
/// document with zero-valued metrics.
pub fn compose_report(
    all: &[Transaction],
    current_view: &[Transaction],
    report_type: ReportType,
    period: ReportPeriod,
    today: NaiveDate,
    generated_at: NaiveDateTime,
) -> ReportDocument {
    let data = filter_by_period(all, current_view, period, today);

    let total_income = total_by_type(&data, TransactionType::Income);
    let total_expenses = total_by_type(&data, TransactionType::Expense);

    let sections = match report_type {
        ReportType::Summary => summary_sections(&data, total_income, total_expenses),
        ReportType::Detailed => detailed_sections(&data, total_income, total_expenses),
        ReportType::Categories => categories_sections(&data, total_expenses),
    };

    ReportDocument {
        report_type,
        title: report_type.title().to_string(),
        period_label: period_label(period, data.len()),
        generated_at,
        sections,
    }
}

fn period_label(period: ReportPeriod, count: usize) -> String {
    match period {
        ReportPeriod::Current => format!("Current Filter ({} transactions)", count),
        ReportPeriod::Month => format!("This Month ({} transactions)", count),
        ReportPeriod::Year => format!("This Year ({} transactions)", count),
    }
}

fn money(amount: Decimal) -> String {
    format!("${:.2}", amount)
}

fn summary_sections(
    data: &[Transaction],
    total_income: Decimal,
    total_expenses: Decimal,
) -> Vec<ReportSection> {
    let balance = total_income - total_expenses;

    let mut sections = vec![ReportSection::Table(ReportTable {
        header: vec!["Metric".to_string(), "Value".to_string()],
        rows: vec![
            vec!["Total Transactions".to_string(), data.len().to_string()],
            vec!["Total Income".to_string(), money(total_income)],
            vec!["Total Expenses".to_string(), money(total_expenses)],
            vec!["Current Balance".to_string(), money(balance)],
        ],
    })];

    sections.push(ReportSection::Heading("Financial Overview".to_string()));
    sections.push(ReportSection::Line(format!(
        "Your total income is {}",
        money(total_income)
    )));
    sections.push(ReportSection::Line(format!(
        "Your total expenses are {}",
        money(total_expenses)
    )));
    sections.push(ReportSection::Line(if balance >= Decimal::ZERO {
        format!("You have a positive balance of {}", money(balance))
    } else {
        format!("You have a negative balance of {}", money(balance.abs()))
    }));
    if let Some(rate) = savings_rate(total_income, total_expenses) {
        let rate = rate.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
        sections.push(ReportSection::Line(format!(
            "Your savings rate is {:.1}%",
            rate
        )));
    }

    sections
}

fn detailed_sections(
    data: &[Transaction],
    total_income: Decimal,
    total_expenses: Decimal,
) -> Vec<ReportSection> {
    let balance = total_income - total_expenses;

    // Full chronology, newest first.
    let sorted = recent(data, data.len());
    let rows = sorted
        .iter()
        .map(|t| {
            vec![
                t.date.date().format("%Y-%m-%d").to_string(),
                t.description.clone(),
                t.category.clone(),
                t.transaction_type.label().to_string(),
                money(t.amount),
            ]
        })
        .collect();

    vec![
        ReportSection::Heading("Financial Summary".to_string()),
        ReportSection::Line(format!("Total Income: {}", money(total_income))),
        ReportSection::Line(format!("Total Expenses: {}", money(total_expenses))),
        ReportSection::Line(format!("Balance: {}", money(balance))),
        ReportSection::Table(ReportTable {
            header: vec![
                "Date".to_string(),
                "Description".to_string(),
                "Category".to_string(),
                "Type".to_string(),
                "Amount".to_string(),
            ],
            rows,
        }),
    ]
}

fn categories_sections(data: &[Transaction], total_expenses: Decimal) -> Vec<ReportSection> {
    let breakdown = category_breakdown(data);
    let items: Vec<(String, Decimal, i64)> = top_categories(&breakdown, breakdown.len())
        .into_iter()
        .map(|(category, amount)| {
            let percentage = percentage_of(amount, total_expenses);
            (category, amount, percentage)
        })
        .collect();

    let mut sections = vec![
        ReportSection::Heading("Expense Categories Analysis".to_string()),
        ReportSection::Line(format!("Total Expenses: {}", money(total_expenses))),
        ReportSection::Table(ReportTable {
            header: vec![
                "Category".to_string(),
                "Amount".to_string(),
                "Percentage".to_string(),
            ],
            rows: items
                .iter()
                .map(|(category, amount, percentage)| {
                    vec![
                        category.clone(),
                        money(*amount),
                        format!("{}%", percentage),
                    ]
                })
                .collect(),
        }),
    ];

    if let Some((category, amount, percentage)) = items.first() {
        sections.push(ReportSection::Heading("Top Spending Insights".to_string()));
        sections.push(ReportSection::Line(format!(
            "Your highest spending category is \"{}\" at {} ({}% of total expenses)",
            category,
            money(*amount),
            percentage
        )));
        if items.len() >= 3 {
            // Combined share of the three largest categories, summing the
            // already-rounded individual percentages.
            let combined: i64 = items.iter().take(3).map(|(_, _, p)| *p).sum();
            sections.push(ReportSection::Line(format!(
                "Your top 3 categories represent {}% of your total expenses.",
                combined
            )));
        }
    }

    sections
}

/// Filename the finished document is saved under.
pub fn report_file_name(document: &ReportDocument) -> String {
    format!(
        "finance_report_{}_{}.pdf",
        document.report_type.slug(),
        document.generated_at.date().format("%Y-%m-%d")
    )
}

/// Lays the composed document out through the renderer boundary and saves
/// it, returning the generated filename. Fails closed: any renderer error
/// aborts the export before anything is saved.
pub fn export_report<R: DocumentRenderer>(
    renderer: &mut R,
    document: &ReportDocument,
) -> Result<String, String> {
    let center = renderer.page_width() / 2.0;

    renderer.set_font_size(20.0);
    renderer.set_text_color(41, 128, 185);
    renderer.text(&document.title, center, TITLE_Y, TextOptions::centered())?;

    renderer.set_font_size(12.0);
    renderer.set_text_color(100, 100, 100);
    renderer.text(
        &document.period_label,
        center,
        SUBTITLE_Y,
        TextOptions::centered(),
    )?;

    renderer.set_font_size(10.0);
    renderer.text(
        &format!(
            "Generated on: {}",
            document.generated_at.format("%Y-%m-%d %H:%M:%S")
        ),
        center,
        GENERATED_Y,
        TextOptions::centered(),
    )?;

    let mut y = BODY_TOP;
    for section in &document.sections {
        match section {
            ReportSection::Heading(text) => {
                renderer.set_font_size(14.0);
                renderer.set_text_color(0, 0, 0);
                renderer.text(text, BODY_LEFT, y, TextOptions::left())?;
                y += LINE_STEP;
            }
            ReportSection::Line(text) => {
                renderer.set_font_size(11.0);
                renderer.set_text_color(0, 0, 0);
                renderer.text(text, BODY_LEFT, y, TextOptions::wrapped(WRAP_WIDTH))?;
                y += LINE_STEP;
            }
            ReportSection::Table(table) => {
                y = renderer.table(&table.header, &table.rows, y)? + TABLE_GAP;
            }
        }
    }

    // The final page count exists only after body layout, so footers are a
    // post-pass over every produced page.
    let page_count = renderer.page_count();
    let footer_y = renderer.page_height() - FOOTER_MARGIN;
    renderer.set_font_size(10.0);
    renderer.set_text_color(150, 150, 150);
    for page in 1..=page_count {
        renderer.set_page(page);
        renderer.text(
            &format!("Page {} of {}", page, page_count),
            center,
            footer_y,
            TextOptions::centered(),
        )?;
    }

    let filename = report_file_name(document);
    renderer.save(&filename)?;
    Ok(filename)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::Align;

    fn create_test_transaction(
        id: &str,
        amount: Decimal,
        kind: TransactionType,
        category: &str,
        date: NaiveDate,
    ) -> Transaction {
        Transaction::new(
            id.to_string(),
            date.and_hms_opt(12, 0, 0).unwrap(),
            format!("Transaction {}", id),
            amount,
            kind,
            category.to_string(),
        )
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn generated_at() -> NaiveDateTime {
        date(2024, 1, 20).and_hms_opt(18, 30, 0).unwrap()
    }

    fn scenario_transactions() -> Vec<Transaction> {
        vec![
            create_test_transaction(
                "1",
                Decimal::new(100000, 2),
                TransactionType::Income,
                "Salary",
                date(2024, 1, 5),
            ),
            create_test_transaction(
                "2",
                Decimal::new(30000, 2),
                TransactionType::Expense,
                "Food",
                date(2024, 1, 10),
            ),
            create_test_transaction(
                "3",
                Decimal::new(20000, 2),
                TransactionType::Expense,
                "Food",
                date(2024, 1, 15),
            ),
        ]
    }

    fn lines_of(document: &ReportDocument) -> Vec<&str> {
        document
            .sections
            .iter()
            .filter_map(|s| match s {
                ReportSection::Line(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    fn first_table(document: &ReportDocument) -> &ReportTable {
        document
            .sections
            .iter()
            .find_map(|s| match s {
                ReportSection::Table(table) => Some(table),
                _ => None,
            })
            .expect("report has no table")
    }

    #[test]
    fn test_summary_report_metrics_scenario() {
        let transactions = scenario_transactions();
        let document = compose_report(
            &transactions,
            &transactions,
            ReportType::Summary,
            ReportPeriod::Current,
            date(2024, 1, 20),
            generated_at(),
        );

        assert_eq!(document.title, "Financial Summary Report");
        assert_eq!(document.period_label, "Current Filter (3 transactions)");

        let metrics = first_table(&document);
        assert_eq!(metrics.rows[0], vec!["Total Transactions", "3"]);
        assert_eq!(metrics.rows[1], vec!["Total Income", "$1000.00"]);
        assert_eq!(metrics.rows[2], vec!["Total Expenses", "$500.00"]);
        assert_eq!(metrics.rows[3], vec!["Current Balance", "$500.00"]);

        let lines = lines_of(&document);
        assert!(lines.contains(&"You have a positive balance of $500.00"));
        assert!(lines.contains(&"Your savings rate is 50.0%"));
    }

    #[test]
    fn test_summary_report_negative_balance_phrasing() {
        let transactions = vec![
            create_test_transaction(
                "1",
                Decimal::new(10000, 2),
                TransactionType::Income,
                "Salary",
                date(2024, 1, 5),
            ),
            create_test_transaction(
                "2",
                Decimal::new(25000, 2),
                TransactionType::Expense,
                "Housing",
                date(2024, 1, 6),
            ),
        ];
        let document = compose_report(
            &transactions,
            &transactions,
            ReportType::Summary,
            ReportPeriod::Current,
            date(2024, 1, 20),
            generated_at(),
        );

        let lines = lines_of(&document);
        assert!(lines.contains(&"You have a negative balance of $150.00"));
        // Overspending clamps the savings rate at zero, it is still shown.
        assert!(lines.contains(&"Your savings rate is 0.0%"));
    }

    #[test]
    fn test_summary_report_of_empty_set() {
        let document = compose_report(
            &[],
            &[],
            ReportType::Summary,
            ReportPeriod::Current,
            date(2024, 1, 20),
            generated_at(),
        );

        assert_eq!(document.period_label, "Current Filter (0 transactions)");
        let metrics = first_table(&document);
        assert_eq!(metrics.rows[0], vec!["Total Transactions", "0"]);
        assert_eq!(metrics.rows[1], vec!["Total Income", "$0.00"]);

        // No income means no savings-rate line.
        let lines = lines_of(&document);
        assert!(!lines.iter().any(|l| l.contains("savings rate")));
        assert!(lines.contains(&"You have a positive balance of $0.00"));
    }

    #[test]
    fn test_detailed_report_table_sorted_by_date_descending() {
        let transactions = scenario_transactions();
        let document = compose_report(
            &transactions,
            &transactions,
            ReportType::Detailed,
            ReportPeriod::Current,
            date(2024, 1, 20),
            generated_at(),
        );

        let table = first_table(&document);
        assert_eq!(
            table.header,
            vec!["Date", "Description", "Category", "Type", "Amount"]
        );
        assert_eq!(table.rows.len(), 3);
        assert_eq!(
            table.rows[0],
            vec!["2024-01-15", "Transaction 3", "Food", "Expense", "$200.00"]
        );
        assert_eq!(
            table.rows[2],
            vec!["2024-01-05", "Transaction 1", "Salary", "Income", "$1000.00"]
        );

        let lines = lines_of(&document);
        assert!(lines.contains(&"Total Income: $1000.00"));
        assert!(lines.contains(&"Total Expenses: $500.00"));
        assert!(lines.contains(&"Balance: $500.00"));
    }

    #[test]
    fn test_categories_report_percentages_and_insights() {
        let today = date(2024, 1, 20);
        let transactions = vec![
            create_test_transaction(
                "1",
                Decimal::from(40),
                TransactionType::Expense,
                "A",
                date(2024, 1, 2),
            ),
            create_test_transaction(
                "2",
                Decimal::from(30),
                TransactionType::Expense,
                "B",
                date(2024, 1, 3),
            ),
            create_test_transaction(
                "3",
                Decimal::from(20),
                TransactionType::Expense,
                "C",
                date(2024, 1, 4),
            ),
            create_test_transaction(
                "4",
                Decimal::from(10),
                TransactionType::Expense,
                "D",
                date(2024, 1, 5),
            ),
        ];
        let document = compose_report(
            &transactions,
            &transactions,
            ReportType::Categories,
            ReportPeriod::Current,
            today,
            generated_at(),
        );

        let table = first_table(&document);
        assert_eq!(table.rows[0], vec!["A", "$40.00", "40%"]);
        assert_eq!(table.rows[1], vec!["B", "$30.00", "30%"]);
        assert_eq!(table.rows[2], vec!["C", "$20.00", "20%"]);
        assert_eq!(table.rows[3], vec!["D", "$10.00", "10%"]);

        let lines = lines_of(&document);
        assert!(lines.contains(
            &"Your highest spending category is \"A\" at $40.00 (40% of total expenses)"
        ));
        assert!(lines.contains(&"Your top 3 categories represent 90% of your total expenses."));
    }

    #[test]
    fn test_categories_report_single_category_full_share() {
        let transactions = scenario_transactions();
        let document = compose_report(
            &transactions,
            &transactions,
            ReportType::Categories,
            ReportPeriod::Current,
            date(2024, 1, 20),
            generated_at(),
        );

        let table = first_table(&document);
        assert_eq!(table.rows, vec![vec!["Food", "$500.00", "100%"]]);

        // Top-category insight is present, the top-3 line needs three.
        let lines = lines_of(&document);
        assert!(lines.iter().any(|l| l.contains("highest spending category")));
        assert!(!lines.iter().any(|l| l.contains("top 3")));
    }

    #[test]
    fn test_categories_report_of_empty_set_has_no_insights() {
        let document = compose_report(
            &[],
            &[],
            ReportType::Categories,
            ReportPeriod::Current,
            date(2024, 1, 20),
            generated_at(),
        );

        assert!(first_table(&document).rows.is_empty());
        assert!(!document
            .sections
            .iter()
            .any(|s| matches!(s, ReportSection::Heading(h) if h == "Top Spending Insights")));
    }

    #[test]
    fn test_period_selection_month_refilters_full_set() {
        let all = vec![
            create_test_transaction(
                "1",
                Decimal::from(100),
                TransactionType::Income,
                "Salary",
                date(2024, 1, 5),
            ),
            create_test_transaction(
                "2",
                Decimal::from(50),
                TransactionType::Income,
                "Salary",
                date(2023, 12, 5),
            ),
        ];
        // A deliberately different current view proves Month ignores it.
        let view: Vec<Transaction> = Vec::new();

        let document = compose_report(
            &all,
            &view,
            ReportType::Summary,
            ReportPeriod::Month,
            date(2024, 1, 20),
            generated_at(),
        );
        assert_eq!(document.period_label, "This Month (1 transactions)");
        assert_eq!(
            first_table(&document).rows[1],
            vec!["Total Income", "$100.00"]
        );
    }

    #[test]
    fn test_composition_is_idempotent_apart_from_timestamp() {
        let transactions = scenario_transactions();
        let today = date(2024, 1, 20);
        let first = compose_report(
            &transactions,
            &transactions,
            ReportType::Summary,
            ReportPeriod::Current,
            today,
            generated_at(),
        );
        let second = compose_report(
            &transactions,
            &transactions,
            ReportType::Summary,
            ReportPeriod::Current,
            today,
            date(2024, 1, 21).and_hms_opt(8, 0, 0).unwrap(),
        );

        assert_eq!(first.sections, second.sections);
        assert_eq!(first.period_label, second.period_label);
        assert_ne!(first.generated_at, second.generated_at);
    }

    // ---- export driving ----------------------------------------------------

    #[derive(Debug, Clone, PartialEq)]
    enum RendererOp {
        Text {
            page: usize,
            y: f64,
            content: String,
            align: Align,
        },
        Table {
            rows: usize,
            start_y: f64,
        },
        SetPage(usize),
        Save(String),
    }

    struct FakeRenderer {
        ops: Vec<RendererOp>,
        pages: usize,
        current_page: usize,
        pages_per_table: usize,
        fail_tables: bool,
    }

    impl FakeRenderer {
        fn new() -> Self {
            Self {
                ops: Vec::new(),
                pages: 1,
                current_page: 1,
                pages_per_table: 0,
                fail_tables: false,
            }
        }

        fn saved_filename(&self) -> Option<&str> {
            self.ops.iter().find_map(|op| match op {
                RendererOp::Save(name) => Some(name.as_str()),
                _ => None,
            })
        }
    }

    impl DocumentRenderer for FakeRenderer {
        fn page_width(&self) -> f64 {
            210.0
        }

        fn page_height(&self) -> f64 {
            297.0
        }

        fn set_font_size(&mut self, _size: f64) {}

        fn set_text_color(&mut self, _r: u8, _g: u8, _b: u8) {}

        fn text(
            &mut self,
            content: &str,
            _x: f64,
            y: f64,
            options: TextOptions,
        ) -> Result<(), String> {
            self.ops.push(RendererOp::Text {
                page: self.current_page,
                y,
                content: content.to_string(),
                align: options.align,
            });
            Ok(())
        }

        fn table(
            &mut self,
            _header: &[String],
            rows: &[Vec<String>],
            start_y: f64,
        ) -> Result<f64, String> {
            if self.fail_tables {
                return Err("table layout failed".to_string());
            }
            self.pages += self.pages_per_table;
            self.current_page = self.pages;
            self.ops.push(RendererOp::Table {
                rows: rows.len(),
                start_y,
            });
            Ok(start_y + 30.0)
        }

        fn page_count(&self) -> usize {
            self.pages
        }

        fn set_page(&mut self, page: usize) {
            self.current_page = page;
            self.ops.push(RendererOp::SetPage(page));
        }

        fn save(&mut self, filename: &str) -> Result<(), String> {
            self.ops.push(RendererOp::Save(filename.to_string()));
            Ok(())
        }
    }

    #[test]
    fn test_export_saves_with_generated_filename() {
        let transactions = scenario_transactions();
        let document = compose_report(
            &transactions,
            &transactions,
            ReportType::Summary,
            ReportPeriod::Current,
            date(2024, 1, 20),
            generated_at(),
        );

        let mut renderer = FakeRenderer::new();
        let filename = export_report(&mut renderer, &document).unwrap();

        assert_eq!(filename, "finance_report_summary_2024-01-20.pdf");
        assert_eq!(renderer.saved_filename(), Some(filename.as_str()));
        // Save is the last operation of a successful export.
        assert!(matches!(renderer.ops.last(), Some(RendererOp::Save(_))));
    }

    #[test]
    fn test_export_stamps_footer_on_every_page() {
        let transactions = scenario_transactions();
        let document = compose_report(
            &transactions,
            &transactions,
            ReportType::Detailed,
            ReportPeriod::Current,
            date(2024, 1, 20),
            generated_at(),
        );

        let mut renderer = FakeRenderer::new();
        renderer.pages_per_table = 2; // table layout spills onto two more pages
        export_report(&mut renderer, &document).unwrap();

        let footers: Vec<&RendererOp> = renderer
            .ops
            .iter()
            .filter(|op| {
                matches!(op, RendererOp::Text { content, .. } if content.starts_with("Page "))
            })
            .collect();
        assert_eq!(footers.len(), 3);
        for (i, op) in footers.iter().enumerate() {
            match op {
                RendererOp::Text {
                    page,
                    y,
                    content,
                    align,
                } => {
                    assert_eq!(*page, i + 1);
                    assert_eq!(content, &format!("Page {} of 3", i + 1));
                    assert_eq!(*y, 287.0);
                    assert_eq!(*align, Align::Center);
                }
                _ => unreachable!(),
            }
        }
    }

    #[test]
    fn test_export_title_block_precedes_body() {
        let document = compose_report(
            &[],
            &[],
            ReportType::Summary,
            ReportPeriod::Year,
            date(2024, 1, 20),
            generated_at(),
        );

        let mut renderer = FakeRenderer::new();
        export_report(&mut renderer, &document).unwrap();

        match &renderer.ops[0] {
            RendererOp::Text {
                content, y, align, ..
            } => {
                assert_eq!(content, "Financial Summary Report");
                assert_eq!(*y, 20.0);
                assert_eq!(*align, Align::Center);
            }
            other => panic!("expected title text first, got {:?}", other),
        }
        match &renderer.ops[1] {
            RendererOp::Text { content, .. } => {
                assert_eq!(content, "This Year (0 transactions)")
            }
            other => panic!("expected period label, got {:?}", other),
        }
        match &renderer.ops[2] {
            RendererOp::Text { content, .. } => {
                assert_eq!(content, "Generated on: 2024-01-20 18:30:00")
            }
            other => panic!("expected generation line, got {:?}", other),
        }
    }

    #[test]
    fn test_export_fails_closed_on_renderer_error() {
        let transactions = scenario_transactions();
        let document = compose_report(
            &transactions,
            &transactions,
            ReportType::Summary,
            ReportPeriod::Current,
            date(2024, 1, 20),
            generated_at(),
        );

        let mut renderer = FakeRenderer::new();
        renderer.fail_tables = true;
        let result = export_report(&mut renderer, &document);

        assert!(result.is_err());
        assert!(result.unwrap_err().contains("table layout failed"));
        assert_eq!(renderer.saved_filename(), None);
    }
}
