// src/menu_sync/services/contact_service.rs
use crate::client::SyncClient;
use crate::error::SyncError;
use crate::models::ContactInfo;
use crate::storage::{CachedValue, QueryKey};
use tracing::info;
use validator::Validate;

impl SyncClient {
    /// Restaurant contact details, `None` until an admin has saved them or
    /// while no actor is available.
    pub async fn contact_info(&self) -> Result<Option<ContactInfo>, SyncError> {
        if self.actor().is_none() {
            return Ok(None);
        }
        match self.fresh(&QueryKey::ContactInfo, CachedValue::into_contact_info) {
            Some(info) => Ok(info),
            None => self.fetch_contact_info().await,
        }
    }

    pub async fn fetch_contact_info(&self) -> Result<Option<ContactInfo>, SyncError> {
        let Some(actor) = self.actor() else {
            return Ok(None);
        };
        self.run_query(
            QueryKey::ContactInfo,
            "get_contact_info",
            CachedValue::ContactInfo,
            CachedValue::into_contact_info,
            async move { actor.get_contact_info().await },
        )
        .await
    }

    /// Saves trimmed contact details. Every field is required.
    pub async fn update_contact_info(&self, info: ContactInfo) -> Result<(), SyncError> {
        let info = info.trimmed();
        info.validate()
            .map_err(|e| SyncError::InvalidInput(format!("contact info: {}", e)))?;
        let actor = self.require_actor()?;

        self.remote("update_contact_info", actor.update_contact_info(info)).await?;
        info!("contact info updated");
        self.invalidate(QueryKey::ContactInfo).await;
        Ok(())
    }
}
