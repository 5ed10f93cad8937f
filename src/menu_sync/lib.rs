// src/menu_sync/lib.rs
// Client-side sync layer for a bilingual restaurant menu gallery backed by a
// remote canister: cached queries, optimistic reordering with rollback,
// batched WebP uploads and admin gating.

pub mod adapter;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod storage;
pub mod utils;

pub use adapter::{ActorOp, CanisterActor, CanisterTimer, MemoryActor, RemoteActor};
pub use client::SyncClient;
pub use config::SyncConfig;
pub use error::SyncError;
pub use models::{
    ContactInfo, Language, MenuPhoto, PhotoBlob, PhotoId, PhotoUpload, RawImage, UserProfile, UserRole,
    UserRoleEntry,
};
pub use services::{AdminView, Direction, QueryState, RoleFilter, SessionState};
pub use storage::{CachedValue, QueryCache, QueryKey};
pub use utils::progress::UploadProgress;
pub use utils::timeout::Timer;
