use chrono::NaiveDateTime;

/// Which document the composer produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportType {
    Summary,
    Detailed,
    Categories,
}

impl ReportType {
    pub fn parse(tag: &str) -> Result<Self, String> {
        match tag.to_lowercase().as_str() {
            "summary" => Ok(ReportType::Summary),
            "detailed" => Ok(ReportType::Detailed),
            "categories" => Ok(ReportType::Categories),
            _ => Err(format!(
                "Invalid report type '{}'. Use 'summary', 'detailed' or 'categories'.",
                tag
            )),
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ReportType::Summary => "Financial Summary Report",
            ReportType::Detailed => "Detailed Transaction Report",
            ReportType::Categories => "Category Analysis Report",
        }
    }

    /// Tag used in generated filenames.
    pub fn slug(&self) -> &'static str {
        match self {
            ReportType::Summary => "summary",
            ReportType::Detailed => "detailed",
            ReportType::Categories => "categories",
        }
    }
}

/// Which slice of the data a report covers. `Current` reuses the dashboard
/// filter's output instead of re-filtering the full set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportPeriod {
    Current,
    Month,
    Year,
}

impl ReportPeriod {
    pub fn parse(tag: &str) -> Result<Self, String> {
        match tag.to_lowercase().as_str() {
            "current" => Ok(ReportPeriod::Current),
            "month" => Ok(ReportPeriod::Month),
            "year" => Ok(ReportPeriod::Year),
            _ => Err(format!(
                "Invalid report period '{}'. Use 'current', 'month' or 'year'.",
                tag
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReportSection {
    Heading(String),
    Line(String),
    Table(ReportTable),
}

/// A fully composed report, ready to be laid out by a document renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportDocument {
    pub report_type: ReportType,
    pub title: String,
    pub period_label: String,
    pub generated_at: NaiveDateTime,
    pub sections: Vec<ReportSection>,
}
