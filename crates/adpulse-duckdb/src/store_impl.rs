use async_trait::async_trait;
use chrono::NaiveDate;

use adpulse_core::reporting::{AmountRow, DailySeries, DateRange, PeriodSeries, ReportingStore};
use adpulse_metadata::{
    ActionItem, Client, CreateActionItemParams, CreateClientParams, CreateManagerParams,
    DirectoryStore, Manager, UpdateActionItemParams, UpdateClientParams, UpdateManagerParams,
};

use crate::DuckDbBackend;

#[async_trait]
impl ReportingStore for DuckDbBackend {
    async fn upsert_amounts(&self, rows: &[AmountRow]) -> anyhow::Result<()> {
        crate::queries::amounts::upsert_amounts_inner(self, rows).await
    }

    async fn fetch_daily_series(&self, range: DateRange) -> anyhow::Result<Vec<DailySeries>> {
        crate::queries::amounts::fetch_daily_series_inner(self, range).await
    }

    async fn fetch_weekly_series(
        &self,
        reference: NaiveDate,
        weeks: u32,
    ) -> anyhow::Result<Vec<PeriodSeries>> {
        crate::queries::amounts::fetch_weekly_series_inner(self, reference, weeks).await
    }

    async fn latest_amount_date(&self) -> anyhow::Result<Option<NaiveDate>> {
        crate::queries::amounts::latest_amount_date_inner(self).await
    }

    async fn sum_amounts(&self, client_id: &str, range: DateRange) -> anyhow::Result<f64> {
        crate::queries::amounts::sum_amounts_inner(self, client_id, range).await
    }
}

#[async_trait]
impl DirectoryStore for DuckDbBackend {
    async fn get_setting(&self, key: &str) -> anyhow::Result<Option<String>> {
        DuckDbBackend::get_setting(self, key).await
    }

    async fn set_setting(&self, key: &str, value: &str) -> anyhow::Result<()> {
        DuckDbBackend::set_setting(self, key, value).await
    }

    async fn create_client(&self, params: CreateClientParams) -> anyhow::Result<Client> {
        DuckDbBackend::create_client(self, params).await
    }

    async fn list_clients(&self) -> anyhow::Result<Vec<Client>> {
        DuckDbBackend::list_clients(self).await
    }

    async fn client_exists(&self, id: &str) -> anyhow::Result<bool> {
        DuckDbBackend::client_exists(self, id).await
    }

    async fn get_client(&self, id: &str) -> anyhow::Result<Option<Client>> {
        DuckDbBackend::get_client(self, id).await
    }

    async fn update_client(
        &self,
        id: &str,
        params: UpdateClientParams,
    ) -> anyhow::Result<Option<Client>> {
        DuckDbBackend::update_client(self, id, params).await
    }

    async fn delete_client(&self, id: &str) -> anyhow::Result<bool> {
        DuckDbBackend::delete_client(self, id).await
    }

    async fn create_manager(&self, params: CreateManagerParams) -> anyhow::Result<Manager> {
        DuckDbBackend::create_manager(self, params).await
    }

    async fn list_managers(&self) -> anyhow::Result<Vec<Manager>> {
        DuckDbBackend::list_managers(self).await
    }

    async fn manager_exists(&self, id: &str) -> anyhow::Result<bool> {
        DuckDbBackend::manager_exists(self, id).await
    }

    async fn update_manager(
        &self,
        id: &str,
        params: UpdateManagerParams,
    ) -> anyhow::Result<Option<Manager>> {
        DuckDbBackend::update_manager(self, id, params).await
    }

    async fn delete_manager(&self, id: &str) -> anyhow::Result<bool> {
        DuckDbBackend::delete_manager(self, id).await
    }

    async fn create_action_item(
        &self,
        params: CreateActionItemParams,
    ) -> anyhow::Result<ActionItem> {
        DuckDbBackend::create_action_item(self, params).await
    }

    async fn list_action_items(
        &self,
        client_id: Option<&str>,
    ) -> anyhow::Result<Vec<ActionItem>> {
        DuckDbBackend::list_action_items(self, client_id).await
    }

    async fn update_action_item(
        &self,
        id: &str,
        params: UpdateActionItemParams,
    ) -> anyhow::Result<Option<ActionItem>> {
        DuckDbBackend::update_action_item(self, id, params).await
    }

    async fn delete_action_item(&self, id: &str) -> anyhow::Result<bool> {
        DuckDbBackend::delete_action_item(self, id).await
    }
}
