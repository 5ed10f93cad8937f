// src/menu_sync/services/user_service.rs
// Caller profile and role, plus the admin user list.

use crate::client::SyncClient;
use crate::error::SyncError;
use crate::models::{UserProfile, UserRole, UserRoleEntry};
use crate::storage::{CachedValue, QueryKey};
use crate::utils::guards::parse_principal;
use tracing::{info, warn};
use validator::Validate;

/// Role filter of the admin user list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum RoleFilter {
    #[default]
    All,
    Only(UserRole),
}

impl RoleFilter {
    pub fn matches(&self, role: UserRole) -> bool {
        match self {
            RoleFilter::All => true,
            RoleFilter::Only(wanted) => *wanted == role,
        }
    }
}

/// Users whose principal text contains `search` (case-insensitive) and whose
/// role passes `filter`, in input order.
pub fn filter_users(users: &[UserRoleEntry], search: &str, filter: RoleFilter) -> Vec<UserRoleEntry> {
    let needle = search.trim().to_lowercase();
    users
        .iter()
        .filter(|entry| filter.matches(entry.role))
        .filter(|entry| needle.is_empty() || entry.principal.to_text().to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

pub fn count_admins(users: &[UserRoleEntry]) -> usize {
    users.iter().filter(|entry| entry.role == UserRole::Admin).count()
}

impl SyncClient {
    // --- Profile ---

    pub async fn caller_profile(&self) -> Result<Option<UserProfile>, SyncError> {
        if self.actor().is_none() {
            return Ok(None);
        }
        match self.fresh(&QueryKey::CurrentUserProfile, CachedValue::into_profile) {
            Some(profile) => Ok(profile),
            None => self.fetch_caller_profile().await,
        }
    }

    pub async fn fetch_caller_profile(&self) -> Result<Option<UserProfile>, SyncError> {
        let Some(actor) = self.actor() else {
            return Ok(None);
        };
        self.run_query(
            QueryKey::CurrentUserProfile,
            "get_caller_profile",
            CachedValue::Profile,
            CachedValue::into_profile,
            async move { actor.get_caller_profile().await },
        )
        .await
    }

    /// Profile of any user. Not cached.
    pub async fn user_profile(&self, principal: &str) -> Result<Option<UserProfile>, SyncError> {
        let principal = parse_principal(principal)?;
        let Some(actor) = self.actor() else {
            return Ok(None);
        };
        self.remote("get_user_profile", actor.get_user_profile(principal)).await
    }

    pub async fn save_caller_profile(&self, name: &str) -> Result<(), SyncError> {
        let profile = UserProfile {
            name: name.trim().to_string(),
        };
        profile
            .validate()
            .map_err(|e| SyncError::InvalidInput(format!("profile: {}", e)))?;
        let actor = self.require_actor()?;

        self.remote("save_caller_profile", actor.save_caller_profile(profile)).await?;
        info!("caller profile saved");
        self.invalidate(QueryKey::CurrentUserProfile).await;
        Ok(())
    }

    // --- Role ---

    /// Role of the caller. Unlike the other queries this fails without an
    /// actor, since there is no neutral role to report.
    pub async fn caller_role(&self) -> Result<UserRole, SyncError> {
        self.require_actor()?;
        match self.fresh(&QueryKey::CurrentUserRole, CachedValue::into_role) {
            Some(role) => Ok(role),
            None => self.fetch_caller_role().await,
        }
    }

    pub async fn fetch_caller_role(&self) -> Result<UserRole, SyncError> {
        let actor = self.require_actor()?;
        self.run_query(
            QueryKey::CurrentUserRole,
            "get_caller_role",
            CachedValue::Role,
            CachedValue::into_role,
            async move { actor.get_caller_role().await },
        )
        .await
    }

    pub async fn is_caller_admin(&self) -> Result<bool, SyncError> {
        let actor = self.require_actor()?;
        self.remote("is_caller_admin", actor.is_caller_admin()).await
    }

    /// Registers the caller with access control. The first caller ever becomes admin.
    pub async fn initialize_access_control(&self) -> Result<(), SyncError> {
        let actor = self.require_actor()?;
        self.remote("initialize_access_control", actor.initialize_access_control())
            .await?;
        self.invalidate(QueryKey::CurrentUserRole).await;
        Ok(())
    }

    // --- User administration ---

    pub async fn all_users(&self) -> Result<Vec<UserRoleEntry>, SyncError> {
        if self.actor().is_none() {
            return Ok(Vec::new());
        }
        match self.fresh(&QueryKey::AllUsers, CachedValue::into_users) {
            Some(users) => Ok(users),
            None => self.fetch_all_users().await,
        }
    }

    pub async fn fetch_all_users(&self) -> Result<Vec<UserRoleEntry>, SyncError> {
        let Some(actor) = self.actor() else {
            return Ok(Vec::new());
        };
        self.run_query(
            QueryKey::AllUsers,
            "list_users",
            CachedValue::Users,
            CachedValue::into_users,
            async move { actor.list_users().await },
        )
        .await
    }

    /// Assigns `role` to the user whose principal text is given.
    ///
    /// # Errors
    ///
    /// `InvalidIdentity` for malformed principal text, checked before any call.
    pub async fn assign_role(&self, principal: &str, role: UserRole) -> Result<(), SyncError> {
        let principal = parse_principal(principal)?;
        let actor = self.require_actor()?;

        self.remote("assign_role", actor.assign_role(principal, role)).await?;
        info!(%principal, %role, "role assigned");
        self.invalidate(QueryKey::AllUsers).await;
        Ok(())
    }

    /// Turns an admin into a regular user, refusing to remove the last admin
    /// or the caller's own admin role.
    pub async fn demote_admin(&self, principal: &str) -> Result<(), SyncError> {
        let target = parse_principal(principal)?;
        self.require_actor()?;

        if self.session().principal() == Some(target) {
            return Err(SyncError::InvalidInput("cannot demote yourself".to_string()));
        }
        let users = self.all_users().await?;
        if count_admins(&users) <= 1 {
            warn!(principal = %target, "refusing to demote the last admin");
            return Err(SyncError::LastAdmin);
        }
        self.assign_role(&target.to_text(), UserRole::User).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use candid::Principal;

    fn entry(seed: u8, role: UserRole) -> UserRoleEntry {
        UserRoleEntry {
            principal: Principal::from_slice(&[seed; 29]),
            role,
        }
    }

    #[test]
    fn role_filter_keeps_matching_roles() {
        let users = vec![entry(1, UserRole::Admin), entry(2, UserRole::User), entry(3, UserRole::Admin)];

        assert_eq!(filter_users(&users, "", RoleFilter::All).len(), 3);
        let admins = filter_users(&users, "", RoleFilter::Only(UserRole::Admin));
        assert_eq!(admins, vec![users[0].clone(), users[2].clone()]);
        assert!(filter_users(&users, "", RoleFilter::Only(UserRole::Guest)).is_empty());
    }

    #[test]
    fn search_matches_principal_text_ignoring_case() {
        let users = vec![entry(1, UserRole::Admin), entry(2, UserRole::User)];
        let text = users[1].principal.to_text();
        let fragment = text[..5].to_uppercase();

        let found = filter_users(&users, &fragment, RoleFilter::All);
        assert!(found.contains(&users[1]));
        assert!(filter_users(&users, "not-a-principal", RoleFilter::All).is_empty());
    }

    #[test]
    fn admins_are_counted() {
        let users = vec![entry(1, UserRole::Admin), entry(2, UserRole::Guest)];
        assert_eq!(count_admins(&users), 1);
        assert_eq!(count_admins(&[]), 0);
    }
}
