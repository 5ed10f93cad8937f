// src/menu_sync/storage/keys.rs
use crate::models::{ContactInfo, Language, MenuPhoto, UserProfile, UserRole, UserRoleEntry};
use std::fmt;

/// Cache key: entity type, plus the language for partitioned entities.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum QueryKey {
    MenuPhotos(Language),
    ContactInfo,
    CurrentUserProfile,
    CurrentUserRole,
    AllUsers,
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryKey::MenuPhotos(language) => write!(f, "menuPhotos/{}", language),
            QueryKey::ContactInfo => f.write_str("contactInfo"),
            QueryKey::CurrentUserProfile => f.write_str("currentUserProfile"),
            QueryKey::CurrentUserRole => f.write_str("currentUserRole"),
            QueryKey::AllUsers => f.write_str("allUsers"),
        }
    }
}

/// Last known server value for a key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CachedValue {
    Photos(Vec<MenuPhoto>),
    ContactInfo(Option<ContactInfo>),
    Profile(Option<UserProfile>),
    Role(UserRole),
    Users(Vec<UserRoleEntry>),
}

impl CachedValue {
    pub fn into_photos(self) -> Option<Vec<MenuPhoto>> {
        match self {
            CachedValue::Photos(photos) => Some(photos),
            _ => None,
        }
    }

    pub fn into_contact_info(self) -> Option<Option<ContactInfo>> {
        match self {
            CachedValue::ContactInfo(info) => Some(info),
            _ => None,
        }
    }

    pub fn into_profile(self) -> Option<Option<UserProfile>> {
        match self {
            CachedValue::Profile(profile) => Some(profile),
            _ => None,
        }
    }

    pub fn into_role(self) -> Option<UserRole> {
        match self {
            CachedValue::Role(role) => Some(role),
            _ => None,
        }
    }

    pub fn into_users(self) -> Option<Vec<UserRoleEntry>> {
        match self {
            CachedValue::Users(users) => Some(users),
            _ => None,
        }
    }
}
