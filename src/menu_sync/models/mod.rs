pub mod common;
pub mod contact_info;
pub mod menu_photo;
pub mod user_profile;

// Re-export model types for easier access
pub use common::*;
pub use contact_info::ContactInfo;
pub use menu_photo::{sort_by_display_order, MenuPhoto, PhotoBlob, PhotoUpload, RawImage};
pub use user_profile::{UserProfile, UserRoleEntry};
