//! Client roster, manager directory and action-item storage.

use anyhow::Result;
use chrono::NaiveDate;

use adpulse_metadata::{
    ActionItem, Client, CreateActionItemParams, CreateClientParams, CreateManagerParams, Manager,
    UpdateActionItemParams, UpdateClientParams, UpdateManagerParams,
};

use crate::backend::generate_id;
use crate::queries::parse_date_col;
use crate::DuckDbBackend;

const CLIENT_COLUMNS: &str =
    "id, name, manager_id, CAST(created_at AS VARCHAR), CAST(updated_at AS VARCHAR)";
const MANAGER_COLUMNS: &str =
    "id, name, email, CAST(created_at AS VARCHAR), CAST(updated_at AS VARCHAR)";
const ACTION_ITEM_COLUMNS: &str = "id, client_id, title, CAST(due_date AS VARCHAR), done, \
     CAST(created_at AS VARCHAR), CAST(updated_at AS VARCHAR)";

fn date_param(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn map_client_row(row: &duckdb::Row<'_>) -> Result<Client, duckdb::Error> {
    Ok(Client {
        id: row.get(0)?,
        name: row.get(1)?,
        manager_id: row.get(2)?,
        created_at: row.get(3)?,
        updated_at: row.get(4)?,
    })
}

fn map_manager_row(row: &duckdb::Row<'_>) -> Result<Manager, duckdb::Error> {
    Ok(Manager {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        created_at: row.get(3)?,
        updated_at: row.get(4)?,
    })
}

fn map_action_item_row(row: &duckdb::Row<'_>) -> Result<ActionItem, duckdb::Error> {
    let due_raw: Option<String> = row.get(3)?;
    Ok(ActionItem {
        id: row.get(0)?,
        client_id: row.get(1)?,
        title: row.get(2)?,
        due_date: due_raw.as_deref().map(parse_date_col).transpose()?,
        done: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

impl DuckDbBackend {
    pub async fn get_setting(&self, key: &str) -> Result<Option<String>> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare("SELECT value FROM settings WHERE key = ?1")?;
        let mut rows = stmt.query_map(duckdb::params![key], |row| row.get::<_, String>(0))?;
        match rows.next() {
            Some(row) => Ok(Some(row?)),
            None => Ok(None),
        }
    }

    pub async fn set_setting(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO settings (key, value) VALUES (?1, ?2) \
             ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value",
            duckdb::params![key, value],
        )?;
        Ok(())
    }

    pub async fn create_client(&self, params: CreateClientParams) -> Result<Client> {
        let conn = self.conn.lock().await;
        let id = generate_id("cl");

        conn.execute(
            "INSERT INTO clients (id, name, manager_id, created_at, updated_at) \
             VALUES (?1, ?2, ?3, CURRENT_TIMESTAMP, CURRENT_TIMESTAMP)",
            duckdb::params![id, params.name, params.manager_id],
        )?;

        let mut stmt =
            conn.prepare(&format!("SELECT {CLIENT_COLUMNS} FROM clients WHERE id = ?1"))?;
        let client = stmt.query_row(duckdb::params![id], map_client_row)?;
        Ok(client)
    }

    pub async fn list_clients(&self) -> Result<Vec<Client>> {
        let conn = self.conn.lock().await;
        let mut stmt =
            conn.prepare(&format!("SELECT {CLIENT_COLUMNS} FROM clients ORDER BY name, id"))?;
        let rows = stmt.query_map([], map_client_row)?;

        let mut clients = Vec::new();
        for row in rows {
            clients.push(row?);
        }
        Ok(clients)
    }

    pub async fn client_exists(&self, id: &str) -> Result<bool> {
        let conn = self.conn.lock().await;
        let count: i64 = conn
            .prepare("SELECT COUNT(*) FROM clients WHERE id = ?1")?
            .query_row(duckdb::params![id], |row| row.get(0))?;
        Ok(count > 0)
    }

    pub async fn get_client(&self, id: &str) -> Result<Option<Client>> {
        let conn = self.conn.lock().await;
        let mut stmt =
            conn.prepare(&format!("SELECT {CLIENT_COLUMNS} FROM clients WHERE id = ?1"))?;
        let mut rows = stmt.query_map(duckdb::params![id], map_client_row)?;
        match rows.next() {
            Some(row) => Ok(Some(row?)),
            None => Ok(None),
        }
    }

    pub async fn update_client(
        &self,
        id: &str,
        params: UpdateClientParams,
    ) -> Result<Option<Client>> {
        let Some(existing) = self.get_client(id).await? else {
            return Ok(None);
        };

        let name = params.name.unwrap_or(existing.name);
        let manager_id = match params.manager_id {
            Some(assignment) => assignment,
            None => existing.manager_id,
        };

        let conn = self.conn.lock().await;
        conn.execute(
            "UPDATE clients SET name = ?2, manager_id = ?3, updated_at = CURRENT_TIMESTAMP \
             WHERE id = ?1",
            duckdb::params![id, name, manager_id],
        )?;

        let mut stmt =
            conn.prepare(&format!("SELECT {CLIENT_COLUMNS} FROM clients WHERE id = ?1"))?;
        let client = stmt.query_row(duckdb::params![id], map_client_row)?;
        Ok(Some(client))
    }

    /// Delete a client and its daily amounts, goals and action items.
    ///
    /// All deletes run inside one transaction, children first.
    pub async fn delete_client(&self, id: &str) -> Result<bool> {
        let mut conn = self.conn.lock().await;
        let tx = conn.transaction()?;
        tx.execute(
            "DELETE FROM daily_amounts WHERE client_id = ?1",
            duckdb::params![id],
        )?;
        tx.execute("DELETE FROM goals WHERE client_id = ?1", duckdb::params![id])?;
        tx.execute(
            "DELETE FROM action_items WHERE client_id = ?1",
            duckdb::params![id],
        )?;
        let affected = tx.execute("DELETE FROM clients WHERE id = ?1", duckdb::params![id])?;
        tx.commit()?;
        Ok(affected > 0)
    }

    pub async fn create_manager(&self, params: CreateManagerParams) -> Result<Manager> {
        let conn = self.conn.lock().await;
        let id = generate_id("mgr");

        conn.execute(
            "INSERT INTO managers (id, name, email, created_at, updated_at) \
             VALUES (?1, ?2, ?3, CURRENT_TIMESTAMP, CURRENT_TIMESTAMP)",
            duckdb::params![id, params.name, params.email],
        )?;

        let mut stmt =
            conn.prepare(&format!("SELECT {MANAGER_COLUMNS} FROM managers WHERE id = ?1"))?;
        let manager = stmt.query_row(duckdb::params![id], map_manager_row)?;
        Ok(manager)
    }

    pub async fn list_managers(&self) -> Result<Vec<Manager>> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(&format!(
            "SELECT {MANAGER_COLUMNS} FROM managers ORDER BY name, id"
        ))?;
        let rows = stmt.query_map([], map_manager_row)?;

        let mut managers = Vec::new();
        for row in rows {
            managers.push(row?);
        }
        Ok(managers)
    }

    pub async fn manager_exists(&self, id: &str) -> Result<bool> {
        let conn = self.conn.lock().await;
        let count: i64 = conn
            .prepare("SELECT COUNT(*) FROM managers WHERE id = ?1")?
            .query_row(duckdb::params![id], |row| row.get(0))?;
        Ok(count > 0)
    }

    pub async fn update_manager(
        &self,
        id: &str,
        params: UpdateManagerParams,
    ) -> Result<Option<Manager>> {
        let conn = self.conn.lock().await;

        let mut stmt =
            conn.prepare(&format!("SELECT {MANAGER_COLUMNS} FROM managers WHERE id = ?1"))?;
        let mut rows = stmt.query_map(duckdb::params![id], map_manager_row)?;
        let Some(existing) = rows.next().transpose()? else {
            return Ok(None);
        };
        drop(rows);
        drop(stmt);

        let name = params.name.unwrap_or(existing.name);
        let email = params.email.or(existing.email);

        conn.execute(
            "UPDATE managers SET name = ?2, email = ?3, updated_at = CURRENT_TIMESTAMP \
             WHERE id = ?1",
            duckdb::params![id, name, email],
        )?;

        let mut stmt =
            conn.prepare(&format!("SELECT {MANAGER_COLUMNS} FROM managers WHERE id = ?1"))?;
        let manager = stmt.query_row(duckdb::params![id], map_manager_row)?;
        Ok(Some(manager))
    }

    /// Delete a manager; their clients become unassigned in the same
    /// transaction.
    pub async fn delete_manager(&self, id: &str) -> Result<bool> {
        let mut conn = self.conn.lock().await;
        let tx = conn.transaction()?;
        tx.execute(
            "UPDATE clients SET manager_id = NULL, updated_at = CURRENT_TIMESTAMP \
             WHERE manager_id = ?1",
            duckdb::params![id],
        )?;
        let affected = tx.execute("DELETE FROM managers WHERE id = ?1", duckdb::params![id])?;
        tx.commit()?;
        Ok(affected > 0)
    }

    pub async fn create_action_item(&self, params: CreateActionItemParams) -> Result<ActionItem> {
        let conn = self.conn.lock().await;
        let id = generate_id("item");

        conn.execute(
            "INSERT INTO action_items (id, client_id, title, due_date, done, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, FALSE, CURRENT_TIMESTAMP, CURRENT_TIMESTAMP)",
            duckdb::params![id, params.client_id, params.title, params.due_date.map(date_param)],
        )?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {ACTION_ITEM_COLUMNS} FROM action_items WHERE id = ?1"
        ))?;
        let item = stmt.query_row(duckdb::params![id], map_action_item_row)?;
        Ok(item)
    }

    pub async fn list_action_items(&self, client_id: Option<&str>) -> Result<Vec<ActionItem>> {
        let conn = self.conn.lock().await;

        let (sql, params): (String, Vec<Box<dyn duckdb::types::ToSql>>) =
            if let Some(client_id) = client_id {
                (
                    format!(
                        "SELECT {ACTION_ITEM_COLUMNS} FROM action_items \
                         WHERE client_id = ?1 ORDER BY done, due_date NULLS LAST, id"
                    ),
                    vec![Box::new(client_id.to_string()) as Box<dyn duckdb::types::ToSql>],
                )
            } else {
                (
                    format!(
                        "SELECT {ACTION_ITEM_COLUMNS} FROM action_items \
                         ORDER BY done, due_date NULLS LAST, id"
                    ),
                    Vec::new(),
                )
            };

        let param_refs: Vec<&dyn duckdb::types::ToSql> =
            params.iter().map(|p| p.as_ref()).collect();
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(param_refs.as_slice(), map_action_item_row)?;

        let mut items = Vec::new();
        for row in rows {
            items.push(row?);
        }
        Ok(items)
    }

    pub async fn update_action_item(
        &self,
        id: &str,
        params: UpdateActionItemParams,
    ) -> Result<Option<ActionItem>> {
        let conn = self.conn.lock().await;

        let mut stmt = conn.prepare(&format!(
            "SELECT {ACTION_ITEM_COLUMNS} FROM action_items WHERE id = ?1"
        ))?;
        let mut rows = stmt.query_map(duckdb::params![id], map_action_item_row)?;
        let Some(existing) = rows.next().transpose()? else {
            return Ok(None);
        };
        drop(rows);
        drop(stmt);

        let title = params.title.unwrap_or(existing.title);
        let due_date = match params.due_date {
            Some(assignment) => assignment,
            None => existing.due_date,
        };
        let done = params.done.unwrap_or(existing.done);

        conn.execute(
            "UPDATE action_items SET title = ?2, due_date = ?3, done = ?4, \
             updated_at = CURRENT_TIMESTAMP WHERE id = ?1",
            duckdb::params![id, title, due_date.map(date_param), done],
        )?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {ACTION_ITEM_COLUMNS} FROM action_items WHERE id = ?1"
        ))?;
        let item = stmt.query_row(duckdb::params![id], map_action_item_row)?;
        Ok(Some(item))
    }

    pub async fn delete_action_item(&self, id: &str) -> Result<bool> {
        let conn = self.conn.lock().await;
        let affected =
            conn.execute("DELETE FROM action_items WHERE id = ?1", duckdb::params![id])?;
        Ok(affected > 0)
    }
}
