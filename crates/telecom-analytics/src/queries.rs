//! Predefined analytical queries over the cleaned table.

use crate::engine::AnalyticsEngine;
use crate::error::{AnalyticsError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Mean revenue per year (rows) and company (columns).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RevenuePivot {
    pub companies: Vec<String>,
    pub rows: Vec<PivotRow>,
}

/// One year of the revenue pivot; `values` aligns with `RevenuePivot::companies`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PivotRow {
    pub year: i32,
    pub values: Vec<Option<f64>>,
}

impl RevenuePivot {
    /// `(year, revenue)` points of one company, skipping empty cells.
    pub fn company_series(&self, company: &str) -> Vec<(i32, f64)> {
        let Some(col) = self.companies.iter().position(|c| c == company) else {
            return Vec::new();
        };
        self.rows
            .iter()
            .filter_map(|row| row.values[col].map(|v| (row.year, v)))
            .collect()
    }

    /// First and last year covered, if any.
    pub fn year_span(&self) -> Option<(i32, i32)> {
        Some((self.rows.first()?.year, self.rows.last()?.year))
    }
}

/// Total profit of one region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionProfit {
    pub region: String,
    pub total_profit: f64,
    pub record_count: i64,
}

/// Average EBITDA margin of one company.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyMargin {
    pub company: String,
    pub avg_ebitda_margin_pct: f64,
    pub years: i64,
}

impl AnalyticsEngine {
    /// Revenue by year and company.
    pub fn revenue_pivot(&self) -> Result<RevenuePivot> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT
                year,
                company,
                AVG(revenue) as revenue
            FROM cleaned_records
            GROUP BY year, company
            ORDER BY year, company
            "#,
        )?;

        let cells = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, i32>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, f64>(2)?,
                ))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(AnalyticsError::from)?;

        let mut companies: Vec<String> = cells.iter().map(|(_, c, _)| c.clone()).collect();
        companies.sort();
        companies.dedup();

        let mut by_year: BTreeMap<i32, Vec<Option<f64>>> = BTreeMap::new();
        for (year, company, revenue) in cells {
            let col = companies
                .binary_search(&company)
                .map_err(|_| AnalyticsError::Conversion(format!("unindexed company {company}")))?;
            by_year.entry(year).or_insert_with(|| vec![None; companies.len()])[col] = Some(revenue);
        }

        Ok(RevenuePivot {
            companies,
            rows: by_year
                .into_iter()
                .map(|(year, values)| PivotRow { year, values })
                .collect(),
        })
    }

    /// Summed profit per region.
    pub fn profit_by_region(&self) -> Result<Vec<RegionProfit>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT
                region,
                ROUND(SUM(profit), 2) as total_profit,
                COUNT(*) as records
            FROM cleaned_records
            GROUP BY region
            ORDER BY region
            "#,
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(RegionProfit {
                region: row.get(0)?,
                total_profit: row.get(1)?,
                record_count: row.get(2)?,
            })
        })?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(AnalyticsError::from)
    }

    /// Mean EBITDA margin per company.
    pub fn avg_ebitda_by_company(&self) -> Result<Vec<CompanyMargin>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT
                company,
                ROUND(AVG(ebitda_margin_pct), 2) as avg_margin,
                COUNT(*) as years
            FROM cleaned_records
            GROUP BY company
            ORDER BY company
            "#,
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(CompanyMargin {
                company: row.get(0)?,
                avg_ebitda_margin_pct: row.get(1)?,
                years: row.get(2)?,
            })
        })?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(AnalyticsError::from)
    }

    /// Last observed year across all companies.
    pub fn last_year(&self) -> Result<i32> {
        let last: Option<i32> =
            self.conn
                .query_row("SELECT MAX(year) FROM cleaned_records", [], |row| row.get(0))?;
        last.ok_or(AnalyticsError::NoData)
    }
}
