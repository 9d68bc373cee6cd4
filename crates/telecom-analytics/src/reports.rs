//! Report generation for analytics data.

use crate::engine::AnalyticsEngine;
use crate::error::Result;
use crate::queries::{CompanyMargin, RegionProfit, RevenuePivot};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use uuid::Uuid;

/// Comprehensive analytics report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsReport {
    pub run_id: Uuid,
    pub generated_at: String,
    pub raw_rows: i64,
    pub cleaned_rows: i64,
    pub revenue_pivot: RevenuePivot,
    pub profit_by_region: Vec<RegionProfit>,
    pub avg_ebitda_by_company: Vec<CompanyMargin>,
}

impl AnalyticsEngine {
    /// Generate comprehensive analytics report.
    pub fn generate_report(&self, run_id: Uuid) -> Result<AnalyticsReport> {
        Ok(AnalyticsReport {
            run_id,
            generated_at: chrono::Utc::now().to_rfc3339(),
            raw_rows: self.count_rows("raw_records")?,
            cleaned_rows: self.count_rows("cleaned_records")?,
            revenue_pivot: self.revenue_pivot()?,
            profit_by_region: self.profit_by_region()?,
            avg_ebitda_by_company: self.avg_ebitda_by_company()?,
        })
    }

    /// Generate report as JSON string.
    pub fn generate_report_json(&self, run_id: Uuid) -> Result<String> {
        let report = self.generate_report(run_id)?;
        report_json(&report)
    }

    /// Generate Markdown report.
    pub fn generate_report_markdown(&self, run_id: Uuid) -> Result<String> {
        let report = self.generate_report(run_id)?;
        Ok(report_markdown(&report))
    }
}

/// Serialize a report as pretty-printed JSON.
pub fn report_json(report: &AnalyticsReport) -> Result<String> {
    serde_json::to_string_pretty(report)
        .map_err(|e| crate::error::AnalyticsError::Conversion(e.to_string()))
}

/// Render a report as Markdown tables.
pub fn report_markdown(report: &AnalyticsReport) -> String {
    let mut md = String::new();
    md.push_str("# Telecom Strategic Performance Report\n\n");
    let _ = writeln!(md, "**Run:** {}  ", report.run_id);
    let _ = writeln!(md, "**Generated:** {}\n", report.generated_at);
    let _ = writeln!(
        md,
        "Rows: {} raw, {} after ETL\n",
        report.raw_rows, report.cleaned_rows
    );

    let pivot = &report.revenue_pivot;
    if !pivot.rows.is_empty() {
        md.push_str("## Revenue by Year & Company\n\n");
        let _ = writeln!(md, "| Year | {} |", pivot.companies.join(" | "));
        let _ = writeln!(md, "|------|{}", "----------|".repeat(pivot.companies.len()));
        for row in &pivot.rows {
            let cells: Vec<String> = row
                .values
                .iter()
                .map(|v| v.map_or_else(|| "N/A".to_string(), |v| format!("{v:.2}")))
                .collect();
            let _ = writeln!(md, "| {} | {} |", row.year, cells.join(" | "));
        }
        md.push('\n');
    }

    if !report.profit_by_region.is_empty() {
        md.push_str("## Profit by Region\n\n");
        md.push_str("| Region | Total Profit | Records |\n");
        md.push_str("|--------|--------------|---------|\n");
        for region in &report.profit_by_region {
            let _ = writeln!(
                md,
                "| {} | {:.2} | {} |",
                region.region, region.total_profit, region.record_count
            );
        }
        md.push('\n');
    }

    if !report.avg_ebitda_by_company.is_empty() {
        md.push_str("## Average EBITDA Margin by Company\n\n");
        md.push_str("| Company | EBITDA Margin | Years |\n");
        md.push_str("|---------|---------------|-------|\n");
        for margin in &report.avg_ebitda_by_company {
            let _ = writeln!(
                md,
                "| {} | {:.2}% | {} |",
                margin.company, margin.avg_ebitda_margin_pct, margin.years
            );
        }
        md.push('\n');
    }

    md
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::tests::seeded_engine;

    #[test]
    fn test_empty_report() {
        let engine = AnalyticsEngine::new_in_memory().unwrap();
        let report = engine.generate_report(Uuid::new_v4()).unwrap();
        assert_eq!(report.raw_rows, 0);
        assert!(report.revenue_pivot.rows.is_empty());
        assert!(report.profit_by_region.is_empty());
    }

    #[test]
    fn test_markdown_generation() {
        let engine = seeded_engine();
        let md = engine.generate_report_markdown(Uuid::nil()).unwrap();
        assert!(md.contains("# Telecom Strategic Performance Report"));
        assert!(md.contains("| Year | Telecom_A | Telecom_B |"));
        assert!(md.contains("| 2016 | 2000.00 | 1000.00 |"));
        assert!(md.contains("| North | 2080.00 | 3 |"));
        assert!(md.contains("| Telecom_A | 40.00% | 3 |"));
        assert!(md.contains("Rows: 6 raw, 6 after ETL"));
    }

    #[test]
    fn test_json_report() {
        let engine = seeded_engine();
        let json = engine.generate_report_json(Uuid::nil()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["cleaned_rows"], 6);
        assert_eq!(value["revenue_pivot"]["companies"][1], "Telecom_B");
        assert_eq!(value["profit_by_region"].as_array().unwrap().len(), 3);
    }
}
