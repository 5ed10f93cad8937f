// src/menu_sync/services/session_gate.rs
// Decides what the admin area shows for the current session.

use crate::client::SyncClient;
use crate::error::SyncError;
use crate::models::{PrincipalId, UserProfile, UserRole};
use crate::storage::{CachedValue, QueryKey};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    /// The identity provider is still restoring a previous session.
    Initializing,
    Anonymous,
    Authenticated(PrincipalId),
}

impl SessionState {
    pub fn is_initializing(&self) -> bool {
        matches!(self, SessionState::Initializing)
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated(_))
    }

    pub fn principal(&self) -> Option<PrincipalId> {
        match self {
            SessionState::Authenticated(principal) => Some(*principal),
            _ => None,
        }
    }
}

/// Observable state of one query.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QueryState<T> {
    /// Never fetched and not fetching.
    Idle,
    Loading,
    Ready(T),
    Failed(String),
}

impl<T> QueryState<T> {
    pub fn from_result(result: Result<T, SyncError>) -> Self {
        match result {
            Ok(value) => QueryState::Ready(value),
            Err(e) => QueryState::Failed(e.to_string()),
        }
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            QueryState::Ready(value) => Some(value),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AdminView {
    Loading,
    /// Offer login.
    Unauthenticated,
    /// Signed in but no profile yet: ask for a display name.
    NeedsProfile,
    /// Signed in with a role other than admin.
    Forbidden,
    Authorized,
}

/// Rules are checked in order, first match wins.
pub fn resolve_admin_view(
    session: &SessionState,
    role: &QueryState<UserRole>,
    profile: &QueryState<Option<UserProfile>>,
) -> AdminView {
    if session.is_initializing() || *role == QueryState::Loading {
        return AdminView::Loading;
    }
    if !session.is_authenticated() {
        return AdminView::Unauthenticated;
    }
    if *role == QueryState::Idle {
        return AdminView::Loading;
    }
    if *profile == QueryState::Ready(None) {
        return AdminView::NeedsProfile;
    }
    if role.ready() != Some(&UserRole::Admin) {
        return AdminView::Forbidden;
    }
    AdminView::Authorized
}

impl SyncClient {
    /// State of `key` as the cache sees it, without fetching.
    pub fn query_state<T>(&self, key: &QueryKey, unwrap: fn(CachedValue) -> Option<T>) -> QueryState<T> {
        let Some(entry) = self.cache.entry(key) else {
            return QueryState::Idle;
        };
        if let Some(value) = entry.value.and_then(unwrap) {
            return QueryState::Ready(value);
        }
        if self.cache.is_fetching(key) {
            return QueryState::Loading;
        }
        match entry.last_error {
            Some(message) => QueryState::Failed(message),
            None => QueryState::Idle,
        }
    }

    /// Admin view from cached role and profile only.
    pub fn admin_view_snapshot(&self) -> AdminView {
        let role = self.query_state(&QueryKey::CurrentUserRole, CachedValue::into_role);
        let profile = self.query_state(&QueryKey::CurrentUserProfile, CachedValue::into_profile);
        resolve_admin_view(&self.session(), &role, &profile)
    }

    /// Loads role and profile as needed, then resolves the admin view.
    pub async fn admin_view(&self) -> AdminView {
        let session = self.session();
        if !session.is_authenticated() || self.actor().is_none() {
            return self.admin_view_snapshot();
        }
        let role = QueryState::from_result(self.caller_role().await);
        let profile = QueryState::from_result(self.caller_profile().await);
        resolve_admin_view(&session, &role, &profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use candid::Principal;

    fn signed_in() -> SessionState {
        SessionState::Authenticated(Principal::from_slice(&[7; 29]))
    }

    fn named() -> QueryState<Option<UserProfile>> {
        QueryState::Ready(Some(UserProfile { name: "Nadia".into() }))
    }

    #[test]
    fn initializing_session_is_loading() {
        assert_eq!(
            resolve_admin_view(&SessionState::Initializing, &QueryState::Idle, &QueryState::Idle),
            AdminView::Loading
        );
    }

    #[test]
    fn loading_role_wins_over_everything() {
        assert_eq!(
            resolve_admin_view(&SessionState::Anonymous, &QueryState::Loading, &QueryState::Idle),
            AdminView::Loading
        );
    }

    #[test]
    fn anonymous_is_unauthenticated() {
        assert_eq!(
            resolve_admin_view(&SessionState::Anonymous, &QueryState::Idle, &QueryState::Idle),
            AdminView::Unauthenticated
        );
    }

    #[test]
    fn authenticated_without_role_yet_is_loading() {
        assert_eq!(
            resolve_admin_view(&signed_in(), &QueryState::Idle, &named()),
            AdminView::Loading
        );
    }

    #[test]
    fn missing_profile_asks_for_name_before_role_check() {
        assert_eq!(
            resolve_admin_view(&signed_in(), &QueryState::Ready(UserRole::Guest), &QueryState::Ready(None)),
            AdminView::NeedsProfile
        );
    }

    #[test]
    fn only_admins_are_authorized() {
        for role in [UserRole::User, UserRole::Guest] {
            assert_eq!(
                resolve_admin_view(&signed_in(), &QueryState::Ready(role), &named()),
                AdminView::Forbidden
            );
        }
        assert_eq!(
            resolve_admin_view(&signed_in(), &QueryState::Failed("rejected".into()), &named()),
            AdminView::Forbidden
        );
        assert_eq!(
            resolve_admin_view(&signed_in(), &QueryState::Ready(UserRole::Admin), &named()),
            AdminView::Authorized
        );
    }

    #[test]
    fn profile_still_loading_does_not_block_admin() {
        assert_eq!(
            resolve_admin_view(&signed_in(), &QueryState::Ready(UserRole::Admin), &QueryState::Loading),
            AdminView::Authorized
        );
    }
}
