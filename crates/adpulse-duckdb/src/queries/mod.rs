pub mod amounts;
pub mod goals;

/// Parse a `CAST(x AS VARCHAR)` date column back into a `NaiveDate`.
pub(crate) fn parse_date_col(raw: &str) -> Result<chrono::NaiveDate, duckdb::Error> {
    chrono::NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| duckdb::Error::InvalidQuery)
}
