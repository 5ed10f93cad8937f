// src/menu_sync/services/mod.rs
// Operations of the sync client, grouped by entity.

pub mod contact_service;
pub mod photo_service;
pub mod session_gate;
pub mod upload_service;
pub mod user_service;

pub use photo_service::{optimistic_reorder, swapped_order, Direction};
pub use session_gate::{resolve_admin_view, AdminView, QueryState, SessionState};
pub use user_service::{count_admins, filter_users, RoleFilter};
