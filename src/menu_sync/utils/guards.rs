// src/menu_sync/utils/guards.rs
use crate::adapter::RemoteActor;
use crate::error::SyncError;
use candid::Principal;
use std::rc::Rc;

/// Checks that an actor capability is present.
///
/// # Errors
///
/// Returns `SyncError::ActorUnavailable` if there is no actor yet.
pub fn require_actor(actor: Option<Rc<dyn RemoteActor>>) -> Result<Rc<dyn RemoteActor>, SyncError> {
    actor.ok_or(SyncError::ActorUnavailable)
}

/// Parses principal text before it is sent anywhere.
///
/// # Errors
///
/// Returns `SyncError::InvalidIdentity` for empty or malformed text.
pub fn parse_principal(text: &str) -> Result<Principal, SyncError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(SyncError::InvalidIdentity("principal id is required".to_string()));
    }
    Principal::from_text(text).map_err(|e| SyncError::InvalidIdentity(format!("{}: {}", text, e)))
}
