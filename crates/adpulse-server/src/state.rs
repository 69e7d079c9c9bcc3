use std::collections::HashSet;
use std::sync::Arc;

use chrono::{Local, NaiveDate};
use tokio::sync::RwLock;
use tracing::error;

use adpulse_core::config::{Config, WeekBasis};
use adpulse_core::reporting::ReportingStore;
use adpulse_duckdb::DuckDbBackend;
use adpulse_metadata::DirectoryStore;

/// Shared application state injected into every Axum handler via
/// [`axum::extract::State`].
///
/// All fields are cheap to clone — heavy resources are wrapped in `Arc`.
pub struct AppState {
    /// The DuckDB backend. Internally uses `Arc<tokio::sync::Mutex<Connection>>`
    /// so it is already cheap to clone and async-safe.
    pub db: Arc<DuckDbBackend>,

    /// The reporting side of the store, as a trait object so handlers
    /// stay storage-agnostic.
    pub store: Arc<dyn ReportingStore>,

    /// The settings side (clients, managers, action items).
    pub directory: Arc<dyn DirectoryStore>,

    /// Parsed configuration, loaded once at startup from environment variables.
    pub config: Arc<Config>,

    /// Fast in-process cache of known-valid client ids.
    ///
    /// Populated lazily: the first request touching a client triggers a DB
    /// lookup; subsequent requests hit the cache. Entries are removed when
    /// a client is deleted.
    pub client_cache: Arc<RwLock<HashSet<String>>>,
}

impl AppState {
    /// Construct a new `AppState` wrapping the given backend and config.
    pub fn new(db: DuckDbBackend, config: Config) -> Self {
        let db = Arc::new(db);
        let store: Arc<dyn ReportingStore> = db.clone();
        let directory: Arc<dyn DirectoryStore> = db.clone();
        Self {
            db,
            store,
            directory,
            config: Arc::new(config),
            client_cache: Arc::new(RwLock::new(HashSet::new())),
        }
    }

    /// Return `true` if the `client_id` is known to exist.
    ///
    /// Checks the in-process cache first; on a cache miss falls back to a
    /// DuckDB query and populates the cache on success.
    pub async fn is_valid_client(&self, client_id: &str) -> bool {
        // Fast path: cache hit.
        {
            let cache = self.client_cache.read().await;
            if cache.contains(client_id) {
                return true;
            }
        }

        // Slow path: DB lookup.
        match self.directory.client_exists(client_id).await {
            Ok(true) => {
                let mut cache = self.client_cache.write().await;
                cache.insert(client_id.to_string());
                true
            }
            Ok(false) => false,
            Err(e) => {
                error!(client_id, error = %e, "client_exists DB lookup failed");
                false
            }
        }
    }

    /// The date anchoring "the current week", per `Config::week_basis`.
    ///
    /// `LatestData` falls back to the wall clock when no amounts are
    /// stored yet (or the lookup fails).
    pub async fn week_reference_date(&self) -> NaiveDate {
        match self.config.week_basis {
            WeekBasis::WallClock => Local::now().date_naive(),
            WeekBasis::LatestData => match self.store.latest_amount_date().await {
                Ok(Some(date)) => date,
                Ok(None) => Local::now().date_naive(),
                Err(e) => {
                    error!(error = %e, "latest_amount_date lookup failed — using wall clock");
                    Local::now().date_naive()
                }
            },
        }
    }
}
