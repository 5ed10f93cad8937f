// src/menu_sync/adapter/actor.rs
// The remote canister capability consumed by the sync layer. One method per
// operation, parameterized by language where the canister has EN/ES variants.

use crate::error::SyncError;
use crate::models::{
    ContactInfo, Language, MenuPhoto, PhotoUpload, PrincipalId, UserProfile, UserRole, UserRoleEntry,
};
use crate::utils::progress::UploadProgress;
use async_trait::async_trait;

#[async_trait(?Send)]
pub trait RemoteActor {
    /// Photos of one partition. Expected sorted by `display_order`, not trusted to be.
    async fn get_photos(&self, language: Language) -> Result<Vec<MenuPhoto>, SyncError>;

    async fn add_photo(&self, language: Language, upload: PhotoUpload) -> Result<(), SyncError>;

    /// Adds a batch, reporting per-file progress by batch index.
    async fn add_photos(
        &self,
        language: Language,
        uploads: Vec<PhotoUpload>,
        progress: &UploadProgress,
    ) -> Result<(), SyncError>;

    async fn delete_photo(&self, language: Language, id: &str) -> Result<(), SyncError>;

    /// Sets rank = index for every id in `ordered_ids`.
    async fn reorder_photos(&self, language: Language, ordered_ids: Vec<String>) -> Result<(), SyncError>;

    async fn get_contact_info(&self) -> Result<Option<ContactInfo>, SyncError>;

    async fn update_contact_info(&self, info: ContactInfo) -> Result<(), SyncError>;

    async fn get_caller_profile(&self) -> Result<Option<UserProfile>, SyncError>;

    async fn get_user_profile(&self, user: PrincipalId) -> Result<Option<UserProfile>, SyncError>;

    async fn save_caller_profile(&self, profile: UserProfile) -> Result<(), SyncError>;

    async fn get_caller_role(&self) -> Result<UserRole, SyncError>;

    async fn assign_role(&self, user: PrincipalId, role: UserRole) -> Result<(), SyncError>;

    async fn is_caller_admin(&self) -> Result<bool, SyncError>;

    async fn initialize_access_control(&self) -> Result<(), SyncError>;

    /// Known users and their roles. The restaurant canister has no listing
    /// endpoint, so actors without one report an empty list.
    async fn list_users(&self) -> Result<Vec<UserRoleEntry>, SyncError> {
        Ok(Vec::new())
    }
}
