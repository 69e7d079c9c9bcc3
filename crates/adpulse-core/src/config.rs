#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub data_dir: String,
    pub cors_origins: Vec<String>,
    pub duckdb_memory_limit: String,
    pub week_basis: WeekBasis,
}

/// Which date anchors "the current week" for reports.
#[derive(Debug, Clone, PartialEq)]
pub enum WeekBasis {
    /// Today's local date.
    WallClock,
    /// The most recent date present in `daily_amounts`; falls back to the
    /// wall clock when the table is empty.
    LatestData,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        Ok(Self {
            port: std::env::var("ADPULSE_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|e| format!("invalid port: {e}"))?,
            data_dir: std::env::var("ADPULSE_DATA_DIR").unwrap_or_else(|_| "./data".to_string()),
            cors_origins: std::env::var("ADPULSE_CORS_ORIGINS")
                .map(|v| v.split(',').map(str::to_string).collect())
                .unwrap_or_default(),
            duckdb_memory_limit: std::env::var("ADPULSE_DUCKDB_MEMORY")
                .unwrap_or_else(|_| "1GB".to_string()),
            week_basis: {
                let raw =
                    std::env::var("ADPULSE_WEEK_BASIS").unwrap_or_else(|_| "wall_clock".to_string());
                match raw.as_str() {
                    "latest_data" => WeekBasis::LatestData,
                    _ => WeekBasis::WallClock,
                }
            },
        })
    }
}
