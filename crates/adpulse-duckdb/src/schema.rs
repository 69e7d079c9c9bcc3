/// DuckDB initialization SQL.
///
/// Executed once at database open time via `Connection::execute_batch`.
/// All statements use `IF NOT EXISTS` so they are safe to re-run on every
/// startup (idempotent).
///
/// `memory_limit` is passed at runtime from `Config.duckdb_memory_limit`
/// (env `ADPULSE_DUCKDB_MEMORY`, default `"1GB"`). Always set an explicit
/// limit — the DuckDB default (80% of system RAM) is not acceptable for a
/// server process. `SET threads = 2` bounds the background thread pool
/// for single-writer embedded use.
pub fn init_sql(memory_limit: &str) -> String {
    format!(
        r#"SET memory_limit = '{memory_limit}';
SET threads = 2;

-- ===========================================
-- SETTINGS
-- ===========================================
-- Keys stored in this table:
--   'version'     – Database schema version (for migrations)
--   'install_id'  – Unique installation identifier
CREATE TABLE IF NOT EXISTS settings (
    key             VARCHAR PRIMARY KEY,
    value           VARCHAR NOT NULL
);

-- ===========================================
-- MANAGERS
-- ===========================================
CREATE TABLE IF NOT EXISTS managers (
    id              VARCHAR PRIMARY KEY,           -- 'mgr_' + 8-byte hex
    name            VARCHAR NOT NULL,
    email           VARCHAR,
    created_at      TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
    updated_at      TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
);

-- ===========================================
-- CLIENTS
-- ===========================================
-- manager_id is a soft reference: deleting a manager leaves the client
-- unassigned (set to NULL in the same transaction), so no FK is declared.
CREATE TABLE IF NOT EXISTS clients (
    id              VARCHAR PRIMARY KEY,           -- 'cl_' + 8-byte hex
    name            VARCHAR NOT NULL,
    manager_id      VARCHAR,
    created_at      TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
    updated_at      TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
);
CREATE INDEX IF NOT EXISTS idx_clients_manager ON clients(manager_id);

-- ===========================================
-- DAILY AMOUNTS (main reporting table)
-- ===========================================
-- One row per client per calendar date. Re-entering a day's amount
-- overwrites the previous value (upsert on the primary key).
CREATE TABLE IF NOT EXISTS daily_amounts (
    client_id       VARCHAR NOT NULL,
    date            DATE NOT NULL,
    amount          DOUBLE NOT NULL,
    updated_at      TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
    PRIMARY KEY (client_id, date)
);
-- Optimised for range scans when building daily/weekly reports
CREATE INDEX IF NOT EXISTS idx_daily_amounts_date ON daily_amounts(date);

-- ===========================================
-- GOALS
-- ===========================================
CREATE TABLE IF NOT EXISTS goals (
    id              VARCHAR PRIMARY KEY,           -- 'goal_' + 8-byte hex
    client_id       VARCHAR NOT NULL,
    name            VARCHAR NOT NULL,
    category        VARCHAR NOT NULL,              -- 'weekly_revenue' | 'monthly_revenue'
    start_date      DATE NOT NULL,
    end_date        DATE NOT NULL,
    target_revenue  DOUBLE NOT NULL,
    start_revenue   DOUBLE NOT NULL DEFAULT 0,
    created_at      TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
    updated_at      TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
);
CREATE INDEX IF NOT EXISTS idx_goals_client ON goals(client_id);

-- ===========================================
-- ACTION ITEMS
-- ===========================================
CREATE TABLE IF NOT EXISTS action_items (
    id              VARCHAR PRIMARY KEY,           -- 'item_' + 8-byte hex
    client_id       VARCHAR,                       -- NULL = not tied to a client
    title           VARCHAR NOT NULL,
    due_date        DATE,
    done            BOOLEAN NOT NULL DEFAULT FALSE,
    created_at      TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
    updated_at      TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
);
CREATE INDEX IF NOT EXISTS idx_action_items_client ON action_items(client_id);
"#
    )
}
