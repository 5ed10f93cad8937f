// src/menu_sync/models/user_profile.rs
use crate::models::common::{PrincipalId, UserRole};
use candid::CandidType;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(CandidType, Deserialize, Serialize, Clone, Debug, PartialEq, Eq, Validate)]
pub struct UserProfile {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
}

/// One row of the admin user list.
#[derive(CandidType, Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct UserRoleEntry {
    pub principal: PrincipalId,
    pub role: UserRole,
}
