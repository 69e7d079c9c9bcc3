use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Client {
    pub id: String,
    pub name: String,
    pub manager_id: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Manager {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ActionItem {
    pub id: String,
    pub client_id: Option<String>,
    pub title: String,
    pub due_date: Option<NaiveDate>,
    pub done: bool,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone)]
pub struct CreateClientParams {
    pub name: String,
    pub manager_id: Option<String>,
}

#[derive(Debug, Clone)]
pub struct UpdateClientParams {
    pub name: Option<String>,
    /// `Some(None)` clears the assignment; `None` leaves it untouched.
    pub manager_id: Option<Option<String>>,
}

#[derive(Debug, Clone)]
pub struct CreateManagerParams {
    pub name: String,
    pub email: Option<String>,
}

#[derive(Debug, Clone)]
pub struct UpdateManagerParams {
    pub name: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CreateActionItemParams {
    pub client_id: Option<String>,
    pub title: String,
    pub due_date: Option<NaiveDate>,
}

#[derive(Debug, Clone)]
pub struct UpdateActionItemParams {
    pub title: Option<String>,
    pub due_date: Option<Option<NaiveDate>>,
    pub done: Option<bool>,
}

/// Storage interface for the settings side of the dashboard: the client
/// roster, manager directory, assignments, and action items.
///
/// The self-hosted build uses a DuckDB implementation; route handlers
/// depend only on this trait.
#[async_trait]
pub trait DirectoryStore: Send + Sync + 'static {
    async fn get_setting(&self, key: &str) -> anyhow::Result<Option<String>>;
    async fn set_setting(&self, key: &str, value: &str) -> anyhow::Result<()>;

    async fn create_client(&self, params: CreateClientParams) -> anyhow::Result<Client>;
    async fn list_clients(&self) -> anyhow::Result<Vec<Client>>;
    async fn client_exists(&self, id: &str) -> anyhow::Result<bool>;
    async fn get_client(&self, id: &str) -> anyhow::Result<Option<Client>>;
    async fn update_client(
        &self,
        id: &str,
        params: UpdateClientParams,
    ) -> anyhow::Result<Option<Client>>;
    /// Deletes the client and its daily amounts, goals and action items.
    async fn delete_client(&self, id: &str) -> anyhow::Result<bool>;

    async fn create_manager(&self, params: CreateManagerParams) -> anyhow::Result<Manager>;
    async fn list_managers(&self) -> anyhow::Result<Vec<Manager>>;
    async fn manager_exists(&self, id: &str) -> anyhow::Result<bool>;
    async fn update_manager(
        &self,
        id: &str,
        params: UpdateManagerParams,
    ) -> anyhow::Result<Option<Manager>>;
    /// Deletes the manager; their clients are left unassigned.
    async fn delete_manager(&self, id: &str) -> anyhow::Result<bool>;

    async fn create_action_item(
        &self,
        params: CreateActionItemParams,
    ) -> anyhow::Result<ActionItem>;
    async fn list_action_items(
        &self,
        client_id: Option<&str>,
    ) -> anyhow::Result<Vec<ActionItem>>;
    async fn update_action_item(
        &self,
        id: &str,
        params: UpdateActionItemParams,
    ) -> anyhow::Result<Option<ActionItem>>;
    async fn delete_action_item(&self, id: &str) -> anyhow::Result<bool>;
}
