//! Analytics engine using DuckDB as the tabular store.

use crate::error::{AnalyticsError, Result};
use duckdb::types::Type;
use duckdb::{params, Connection, Row};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use telecom_domain::{CleanedRecord, Observation, TelecomRecord};
use tracing::{debug, info};

/// Columns shared by `raw_records` and `cleaned_records`, in table order.
const RECORD_COLUMNS: &str = "year, company, region, service_type, revenue, operating_cost, \
    profit, subscribers_millions, churn_rate, arpu, market_share_pct, ebitda_margin_pct";

/// DuckDB-based store for the telecom dataset.
pub struct AnalyticsEngine {
    pub(crate) conn: Connection,
}

impl AnalyticsEngine {
    /// Create a new in-memory analytics engine.
    pub fn new_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let engine = Self { conn };
        engine.initialize_schema()?;
        Ok(engine)
    }

    /// Create analytics engine with persistent storage.
    pub fn new_persistent<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let engine = Self { conn };
        engine.initialize_schema()?;
        Ok(engine)
    }

    /// Initialize the analytics schema.
    fn initialize_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            -- Raw fact table; nullable so imported files can carry gaps
            CREATE TABLE IF NOT EXISTS raw_records (
                record_seq BIGINT NOT NULL,
                year INTEGER,
                company VARCHAR,
                region VARCHAR,
                service_type VARCHAR,
                revenue DOUBLE,
                operating_cost DOUBLE,
                profit DOUBLE,
                subscribers_millions DOUBLE,
                churn_rate DOUBLE,
                arpu DOUBLE,
                market_share_pct DOUBLE,
                ebitda_margin_pct DOUBLE
            );

            -- Cleaned table, rebuilt by run_etl
            CREATE TABLE IF NOT EXISTS cleaned_records (
                record_seq BIGINT NOT NULL,
                year INTEGER NOT NULL,
                company VARCHAR NOT NULL,
                region VARCHAR NOT NULL,
                service_type VARCHAR NOT NULL,
                revenue DOUBLE NOT NULL,
                operating_cost DOUBLE NOT NULL,
                profit DOUBLE NOT NULL,
                subscribers_millions DOUBLE NOT NULL,
                churn_rate DOUBLE NOT NULL,
                arpu DOUBLE NOT NULL,
                market_share_pct DOUBLE NOT NULL,
                ebitda_margin_pct DOUBLE NOT NULL,
                revenue_growth_pct DOUBLE NOT NULL,
                subscriber_growth_pct DOUBLE NOT NULL
            );
            "#,
        )?;
        Ok(())
    }

    /// Next free insertion sequence number.
    fn next_seq(&self) -> Result<i64> {
        let max: i64 = self.conn.query_row(
            "SELECT COALESCE(MAX(record_seq), 0) FROM raw_records",
            [],
            |row| row.get(0),
        )?;
        Ok(max + 1)
    }

    fn insert_record(&self, seq: i64, record: &TelecomRecord) -> Result<()> {
        self.conn.execute(
            r#"
            INSERT INTO raw_records (
                record_seq, year, company, region, service_type, revenue, operating_cost,
                profit, subscribers_millions, churn_rate, arpu, market_share_pct, ebitda_margin_pct
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
            params![
                seq,
                record.year,
                record.company,
                record.region.as_str(),
                record.service_type.as_str(),
                record.revenue,
                record.operating_cost,
                record.profit,
                record.subscribers_millions,
                record.churn_rate,
                record.arpu,
                record.market_share_pct,
                record.ebitda_margin_pct,
            ],
        )?;
        Ok(())
    }

    /// Ingest a single raw record.
    pub fn ingest_record(&self, record: &TelecomRecord) -> Result<()> {
        let seq = self.next_seq()?;
        self.insert_record(seq, record)
    }

    /// Batch ingest raw records, preserving their order.
    pub fn ingest_records_batch(&self, records: &[TelecomRecord]) -> Result<usize> {
        let mut seq = self.next_seq()?;
        let mut count = 0;
        for record in records {
            self.insert_record(seq, record)?;
            seq += 1;
            count += 1;
        }
        debug!(count, "Ingested raw records");
        Ok(count)
    }

    /// Import a raw dataset previously written by [`Self::export_raw_csv`].
    pub fn import_csv<P: AsRef<Path>>(&self, path: P) -> Result<usize> {
        let base = self.next_seq()? - 1;
        let query = format!(
            r#"
            INSERT INTO raw_records
            SELECT
                {base} + row_number() OVER () AS record_seq,
                "Year", "Company", "Region", "Service_Type", "Revenue", "Operating_Cost",
                "Profit", "Subscribers_Millions", "Churn_Rate", "ARPU", "Market_Share_%",
                "EBITDA_Margin_%"
            FROM read_csv_auto('{}', header = true)
            "#,
            sql_path(path.as_ref())
        );
        let count = self.conn.execute(&query, [])?;
        info!(count, path = %path.as_ref().display(), "Imported raw CSV");
        Ok(count)
    }

    /// Clean the raw table into `cleaned_records`.
    ///
    /// Rows with any missing field, NULL or NaN, are dropped. Growth columns hold the
    /// percentage change from the company's previous row; a company's first
    /// row gets 0.
    pub fn run_etl(&self) -> Result<EtlSummary> {
        let rows_in = self.count_rows("raw_records")?;

        self.conn.execute_batch(&format!(
            r#"
            CREATE OR REPLACE TABLE cleaned_records AS
            SELECT
                record_seq,
                {RECORD_COLUMNS},
                COALESCE(100.0 * (revenue / LAG(revenue) OVER w - 1.0), 0.0)
                    AS revenue_growth_pct,
                COALESCE(100.0 * (subscribers_millions / LAG(subscribers_millions) OVER w - 1.0), 0.0)
                    AS subscriber_growth_pct
            FROM raw_records
            WHERE year IS NOT NULL
              AND company IS NOT NULL
              AND region IS NOT NULL
              AND service_type IS NOT NULL
              AND revenue IS NOT NULL
              AND operating_cost IS NOT NULL
              AND profit IS NOT NULL
              AND subscribers_millions IS NOT NULL
              AND churn_rate IS NOT NULL
              AND arpu IS NOT NULL
              AND market_share_pct IS NOT NULL
              AND ebitda_margin_pct IS NOT NULL
              AND NOT isnan(revenue)
              AND NOT isnan(operating_cost)
              AND NOT isnan(profit)
              AND NOT isnan(subscribers_millions)
              AND NOT isnan(churn_rate)
              AND NOT isnan(arpu)
              AND NOT isnan(market_share_pct)
              AND NOT isnan(ebitda_margin_pct)
            WINDOW w AS (PARTITION BY company ORDER BY record_seq)
            ORDER BY record_seq;
            "#
        ))?;

        let rows_out = self.count_rows("cleaned_records")?;
        let summary = EtlSummary {
            rows_in,
            rows_dropped: rows_in - rows_out,
            rows_out,
        };
        info!(
            rows_in = summary.rows_in,
            rows_dropped = summary.rows_dropped,
            rows_out = summary.rows_out,
            "ETL completed"
        );
        Ok(summary)
    }

    /// Number of rows in one of the engine's tables.
    pub(crate) fn count_rows(&self, table: &str) -> Result<i64> {
        if !matches!(table, "raw_records" | "cleaned_records") {
            return Err(AnalyticsError::InvalidParameter(format!("unknown table {table}")));
        }
        let count = self
            .conn
            .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))?;
        Ok(count)
    }

    /// Distinct companies of the cleaned table, in first-appearance order.
    pub fn companies(&self) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT company
            FROM cleaned_records
            GROUP BY company
            ORDER BY MIN(record_seq)
            "#,
        )?;
        let rows = stmt.query_map([], |row| row.get(0))?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(AnalyticsError::from)
    }

    /// Revenue series of one company, ordered by year.
    pub fn revenue_series(&self, company: &str) -> Result<Vec<Observation>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT year, revenue
            FROM cleaned_records
            WHERE company = ?
            ORDER BY year
            "#,
        )?;
        let rows = stmt.query_map(params![company], |row| {
            Ok(Observation::new(company, row.get(0)?, row.get(1)?))
        })?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(AnalyticsError::from)
    }

    /// Cleaned rows in insertion order, up to `limit`.
    pub fn cleaned_records(&self, limit: usize) -> Result<Vec<CleanedRecord>> {
        let limit = i64::try_from(limit)
            .map_err(|_| AnalyticsError::InvalidParameter(format!("limit {limit}")))?;
        let mut stmt = self.conn.prepare(&format!(
            r#"
            SELECT {RECORD_COLUMNS}, revenue_growth_pct, subscriber_growth_pct
            FROM cleaned_records
            ORDER BY record_seq
            LIMIT ?
            "#
        ))?;
        let rows = stmt.query_map(params![limit], |row| {
            Ok(CleanedRecord {
                record: TelecomRecord {
                    year: row.get(0)?,
                    company: row.get(1)?,
                    region: parse_column(row, 2)?,
                    service_type: parse_column(row, 3)?,
                    revenue: row.get(4)?,
                    operating_cost: row.get(5)?,
                    profit: row.get(6)?,
                    subscribers_millions: row.get(7)?,
                    churn_rate: row.get(8)?,
                    arpu: row.get(9)?,
                    market_share_pct: row.get(10)?,
                    ebitda_margin_pct: row.get(11)?,
                },
                revenue_growth_pct: row.get(12)?,
                subscriber_growth_pct: row.get(13)?,
            })
        })?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(AnalyticsError::from)
    }

    /// Export the raw table to CSV with the dataset's published headers.
    pub fn export_raw_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let query = format!(
            r#"
            COPY (
                SELECT {}
                FROM raw_records
                ORDER BY record_seq
            ) TO '{}' (HEADER, DELIMITER ',')
            "#,
            published_columns(),
            sql_path(path.as_ref())
        );
        self.conn.execute_batch(&query)?;
        debug!(path = %path.as_ref().display(), "Exported raw CSV");
        Ok(())
    }

    /// Export the cleaned table, growth columns included, to CSV.
    pub fn export_cleaned_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let query = format!(
            r#"
            COPY (
                SELECT {},
                    revenue_growth_pct AS "Revenue_Growth_%",
                    subscriber_growth_pct AS "Subscriber_Growth_%"
                FROM cleaned_records
                ORDER BY record_seq
            ) TO '{}' (HEADER, DELIMITER ',')
            "#,
            published_columns(),
            sql_path(path.as_ref())
        );
        self.conn.execute_batch(&query)?;
        debug!(path = %path.as_ref().display(), "Exported cleaned CSV");
        Ok(())
    }

    /// Export the cleaned table to a Parquet file.
    pub fn export_to_parquet<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let query = format!(
            "COPY (SELECT * FROM cleaned_records ORDER BY record_seq) TO '{}' (FORMAT PARQUET)",
            sql_path(path.as_ref())
        );
        self.conn.execute_batch(&query)?;
        debug!(path = %path.as_ref().display(), "Exported cleaned Parquet");
        Ok(())
    }
}

/// Row counts of one ETL run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EtlSummary {
    pub rows_in: i64,
    pub rows_dropped: i64,
    pub rows_out: i64,
}

/// Select list mapping table columns onto the published CSV headers.
fn published_columns() -> &'static str {
    r#"year AS "Year", company AS "Company", region AS "Region",
       service_type AS "Service_Type", revenue AS "Revenue",
       operating_cost AS "Operating_Cost", profit AS "Profit",
       subscribers_millions AS "Subscribers_Millions", churn_rate AS "Churn_Rate",
       arpu AS "ARPU", market_share_pct AS "Market_Share_%",
       ebitda_margin_pct AS "EBITDA_Margin_%""#
}

/// Path as a single-quoted SQL string body.
fn sql_path(path: &Path) -> String {
    path.display().to_string().replace('\'', "''")
}

/// Read a text column and parse it into a domain enum.
fn parse_column<T>(row: &Row<'_>, idx: usize) -> duckdb::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw: String = row.get(idx)?;
    raw.parse()
        .map_err(|e| duckdb::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use telecom_domain::{Region, ServiceType};

    pub(crate) fn record(company: &str, year: i32, revenue: f64, region: Region) -> TelecomRecord {
        TelecomRecord {
            year,
            company: company.to_string(),
            region,
            service_type: ServiceType::Prepaid,
            revenue,
            operating_cost: revenue * 0.6,
            profit: revenue * 0.4,
            subscribers_millions: 10.0 + f64::from(year - 2016),
            churn_rate: 8.0,
            arpu: revenue / ((10.0 + f64::from(year - 2016)) * 1_000_000.0),
            market_share_pct: 30.0,
            ebitda_margin_pct: 40.0,
        }
    }

    pub(crate) fn seeded_engine() -> AnalyticsEngine {
        let engine = AnalyticsEngine::new_in_memory().unwrap();
        let records = vec![
            record("Telecom_B", 2016, 1_000.0, Region::North),
            record("Telecom_B", 2017, 1_500.0, Region::South),
            record("Telecom_B", 2018, 2_000.0, Region::North),
            record("Telecom_A", 2016, 2_000.0, Region::East),
            record("Telecom_A", 2017, 2_200.0, Region::North),
            record("Telecom_A", 2018, 2_750.0, Region::East),
        ];
        engine.ingest_records_batch(&records).unwrap();
        engine.run_etl().unwrap();
        engine
    }

    #[test]
    fn test_create_engine() {
        let engine = AnalyticsEngine::new_in_memory().unwrap();
        assert!(engine.companies().unwrap().is_empty());
        assert_eq!(engine.count_rows("raw_records").unwrap(), 0);
    }

    #[test]
    fn test_persistent_engine_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("telecom.duckdb");
        {
            let engine = AnalyticsEngine::new_persistent(&path).unwrap();
            engine
                .ingest_record(&record("Telecom_A", 2016, 1_000.0, Region::North))
                .unwrap();
        }

        let engine = AnalyticsEngine::new_persistent(&path).unwrap();
        assert_eq!(engine.count_rows("raw_records").unwrap(), 1);
        assert_eq!(engine.next_seq().unwrap(), 2);
    }

    #[test]
    fn test_count_rows_rejects_unknown_table() {
        let engine = AnalyticsEngine::new_in_memory().unwrap();
        assert!(matches!(
            engine.count_rows("sqlite_master"),
            Err(AnalyticsError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_etl_growth_columns() {
        let engine = seeded_engine();
        let cleaned = engine.cleaned_records(10).unwrap();
        assert_eq!(cleaned.len(), 6);

        assert_eq!(cleaned[0].record.company, "Telecom_B");
        assert_eq!(cleaned[0].revenue_growth_pct, 0.0);
        assert_eq!(cleaned[0].subscriber_growth_pct, 0.0);
        assert!((cleaned[1].revenue_growth_pct - 50.0).abs() < 1e-9);
        assert!((cleaned[2].revenue_growth_pct - 100.0 / 3.0).abs() < 1e-9);
        assert!((cleaned[1].subscriber_growth_pct - 10.0).abs() < 1e-9);

        // First row of the second company starts over at zero.
        assert_eq!(cleaned[3].record.company, "Telecom_A");
        assert_eq!(cleaned[3].revenue_growth_pct, 0.0);
        assert!((cleaned[4].revenue_growth_pct - 10.0).abs() < 1e-9);
        assert_eq!(cleaned[4].record.region, Region::North);
    }

    #[test]
    fn test_etl_drops_incomplete_rows() {
        let engine = seeded_engine();
        engine
            .conn
            .execute(
                "INSERT INTO raw_records (record_seq, year, company) VALUES (99, 2019, 'Telecom_B')",
                [],
            )
            .unwrap();

        let summary = engine.run_etl().unwrap();
        assert_eq!(
            summary,
            EtlSummary {
                rows_in: 7,
                rows_dropped: 1,
                rows_out: 6
            }
        );
    }

    #[test]
    fn test_companies_in_first_appearance_order() {
        let engine = seeded_engine();
        assert_eq!(engine.companies().unwrap(), vec!["Telecom_B", "Telecom_A"]);
    }

    #[test]
    fn test_revenue_series() {
        let engine = seeded_engine();
        let series = engine.revenue_series("Telecom_B").unwrap();
        let points: Vec<(i32, f64)> = series.iter().map(|o| (o.period, o.value)).collect();
        assert_eq!(points, vec![(2016, 1_000.0), (2017, 1_500.0), (2018, 2_000.0)]);
        assert!(series.iter().all(|o| o.entity_id == "Telecom_B"));
        assert!(engine.revenue_series("Telecom_Z").unwrap().is_empty());
    }

    #[test]
    fn test_ingest_record_appends_sequence() {
        let engine = seeded_engine();
        engine
            .ingest_record(&record("Telecom_C", 2016, 500.0, Region::West))
            .unwrap();
        engine.run_etl().unwrap();
        assert_eq!(
            engine.companies().unwrap(),
            vec!["Telecom_B", "Telecom_A", "Telecom_C"]
        );
    }

    #[test]
    fn test_csv_round_trip_through_import() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("raw.csv");

        let source = seeded_engine();
        source.export_raw_csv(&path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("Year,Company,Region,Service_Type,Revenue"));

        let target = AnalyticsEngine::new_in_memory().unwrap();
        assert_eq!(target.import_csv(&path).unwrap(), 6);
        target.run_etl().unwrap();
        assert_eq!(target.companies().unwrap(), vec!["Telecom_B", "Telecom_A"]);
        assert_eq!(target.revenue_series("Telecom_A").unwrap()[2].value, 2_750.0);
    }

    const CSV_WITH_NAN_REVENUE: &str = "\
Year,Company,Region,Service_Type,Revenue,Operating_Cost,Profit,Subscribers_Millions,Churn_Rate,ARPU,Market_Share_%,EBITDA_Margin_%
2016,Telecom_A,North,Prepaid,1000.0,600.0,400.0,10.0,8.0,0.0001,30.0,40.0
2017,Telecom_A,South,Prepaid,NaN,660.0,440.0,11.0,8.0,0.0001,30.0,40.0
2018,Telecom_A,East,Postpaid,2000.0,1200.0,800.0,12.0,8.0,0.0001,30.0,40.0
2019,Telecom_A,West,Postpaid,2500.0,1500.0,1000.0,13.0,8.0,0.0001,30.0,40.0
";

    #[test]
    fn test_etl_drops_nan_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("raw.csv");
        std::fs::write(&path, CSV_WITH_NAN_REVENUE).unwrap();

        let engine = AnalyticsEngine::new_in_memory().unwrap();
        assert_eq!(engine.import_csv(&path).unwrap(), 4);
        let summary = engine.run_etl().unwrap();
        assert_eq!(
            summary,
            EtlSummary {
                rows_in: 4,
                rows_dropped: 1,
                rows_out: 3
            }
        );

        let values: Vec<f64> = engine
            .revenue_series("Telecom_A")
            .unwrap()
            .iter()
            .map(|o| o.value)
            .collect();
        assert_eq!(values, vec![1_000.0, 2_000.0, 2_500.0]);

        let cleaned = engine.cleaned_records(10).unwrap();
        assert_eq!(cleaned[1].revenue_growth_pct, 100.0);
    }

    #[test]
    fn test_export_cleaned_csv_has_growth_headers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cleaned.csv");
        seeded_engine().export_cleaned_csv(&path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let header = contents.lines().next().unwrap();
        assert!(header.ends_with("Revenue_Growth_%,Subscriber_Growth_%"));
        assert_eq!(contents.lines().count(), 7);
    }

    #[test]
    fn test_export_to_parquet_readable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cleaned.parquet");
        let engine = seeded_engine();
        engine.export_to_parquet(&path).unwrap();

        let count: i64 = engine
            .conn
            .query_row(
                &format!("SELECT COUNT(*) FROM read_parquet('{}')", sql_path(&path)),
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 6);
    }
}
