use anyhow::Result;
use chrono::NaiveDate;

use adpulse_core::goals::{CreateGoalRequest, Goal, GoalCategory, UpdateGoalRequest};

use crate::backend::generate_id;
use crate::queries::parse_date_col;
use crate::DuckDbBackend;

const GOAL_COLUMNS: &str = "id, client_id, name, category, \
     CAST(start_date AS VARCHAR), CAST(end_date AS VARCHAR), \
     target_revenue, start_revenue, \
     CAST(created_at AS VARCHAR), CAST(updated_at AS VARCHAR)";

fn date_param(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn map_goal_row(row: &duckdb::Row<'_>) -> Result<Goal, duckdb::Error> {
    let category_raw: String = row.get(3)?;
    let start_raw: String = row.get(4)?;
    let end_raw: String = row.get(5)?;
    Ok(Goal {
        id: row.get(0)?,
        client_id: row.get(1)?,
        name: row.get(2)?,
        category: GoalCategory::parse(&category_raw).map_err(|_| duckdb::Error::InvalidQuery)?,
        start_date: parse_date_col(&start_raw)?,
        end_date: parse_date_col(&end_raw)?,
        target_revenue: row.get(6)?,
        start_revenue: row.get(7)?,
        created_at: row.get(8)?,
        updated_at: row.get(9)?,
    })
}

impl DuckDbBackend {
    pub async fn create_goal(&self, req: CreateGoalRequest) -> Result<Goal> {
        let conn = self.conn.lock().await;
        let id = generate_id("goal");

        conn.execute(
            "INSERT INTO goals (id, client_id, name, category, start_date, end_date, \
             target_revenue, start_revenue, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, CURRENT_TIMESTAMP, CURRENT_TIMESTAMP)",
            duckdb::params![
                id,
                req.client_id,
                req.name,
                req.category.as_str(),
                date_param(req.start_date),
                date_param(req.end_date),
                req.target_revenue,
                req.start_revenue.unwrap_or(0.0),
            ],
        )?;

        let mut stmt =
            conn.prepare(&format!("SELECT {GOAL_COLUMNS} FROM goals WHERE id = ?1"))?;
        let goal = stmt.query_row(duckdb::params![id], map_goal_row)?;
        Ok(goal)
    }

    pub async fn list_goals(&self, client_id: Option<&str>) -> Result<Vec<Goal>> {
        let conn = self.conn.lock().await;

        let (sql, params): (String, Vec<Box<dyn duckdb::types::ToSql>>) =
            if let Some(client_id) = client_id {
                (
                    format!(
                        "SELECT {GOAL_COLUMNS} FROM goals WHERE client_id = ?1 \
                         ORDER BY start_date DESC, id"
                    ),
                    vec![Box::new(client_id.to_string()) as Box<dyn duckdb::types::ToSql>],
                )
            } else {
                (
                    format!("SELECT {GOAL_COLUMNS} FROM goals ORDER BY start_date DESC, id"),
                    Vec::new(),
                )
            };

        let param_refs: Vec<&dyn duckdb::types::ToSql> =
            params.iter().map(|p| p.as_ref()).collect();
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(param_refs.as_slice(), map_goal_row)?;

        let mut goals = Vec::new();
        for row in rows {
            goals.push(row?);
        }
        Ok(goals)
    }

    pub async fn get_goal(&self, id: &str) -> Result<Option<Goal>> {
        let conn = self.conn.lock().await;
        let mut stmt =
            conn.prepare(&format!("SELECT {GOAL_COLUMNS} FROM goals WHERE id = ?1"))?;
        let mut rows = stmt.query_map(duckdb::params![id], map_goal_row)?;
        match rows.next() {
            Some(row) => Ok(Some(row?)),
            None => Ok(None),
        }
    }

    pub async fn update_goal(&self, id: &str, req: UpdateGoalRequest) -> Result<Option<Goal>> {
        let Some(existing) = self.get_goal(id).await? else {
            return Ok(None);
        };

        let name = req.name.unwrap_or(existing.name);
        let end_date = req.end_date.unwrap_or(existing.end_date);
        let target_revenue = req.target_revenue.unwrap_or(existing.target_revenue);

        let conn = self.conn.lock().await;
        conn.execute(
            "UPDATE goals SET name = ?2, end_date = ?3, target_revenue = ?4, \
             updated_at = CURRENT_TIMESTAMP WHERE id = ?1",
            duckdb::params![id, name, date_param(end_date), target_revenue],
        )?;

        let mut stmt =
            conn.prepare(&format!("SELECT {GOAL_COLUMNS} FROM goals WHERE id = ?1"))?;
        let goal = stmt.query_row(duckdb::params![id], map_goal_row)?;
        Ok(Some(goal))
    }

    pub async fn delete_goal(&self, id: &str) -> Result<bool> {
        let conn = self.conn.lock().await;
        let affected = conn.execute("DELETE FROM goals WHERE id = ?1", duckdb::params![id])?;
        Ok(affected > 0)
    }

    pub async fn count_goals(&self, client_id: &str) -> Result<i64> {
        let conn = self.conn.lock().await;
        let count: i64 = conn
            .prepare("SELECT COUNT(*) FROM goals WHERE client_id = ?1")?
            .query_row(duckdb::params![client_id], |row| row.get(0))?;
        Ok(count)
    }

    pub async fn goal_name_exists(
        &self,
        client_id: &str,
        name: &str,
        exclude_goal_id: Option<&str>,
    ) -> Result<bool> {
        let conn = self.conn.lock().await;
        let count: i64 = if let Some(exclude) = exclude_goal_id {
            conn.prepare(
                "SELECT COUNT(*) FROM goals WHERE client_id = ?1 AND name = ?2 AND id != ?3",
            )?
            .query_row(duckdb::params![client_id, name, exclude], |row| row.get(0))?
        } else {
            conn.prepare("SELECT COUNT(*) FROM goals WHERE client_id = ?1 AND name = ?2")?
                .query_row(duckdb::params![client_id, name], |row| row.get(0))?
        };
        Ok(count > 0)
    }
}
