// src/menu_sync/models/menu_photo.rs
use crate::models::common::{Language, PhotoId};
use candid::CandidType;
use serde::{Deserialize, Serialize};
use serde_bytes::ByteBuf;

/// Image content of a photo. Once uploaded the bytes belong to the actor;
/// a client may only hold a reference to them.
#[derive(CandidType, Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub enum PhotoBlob {
    Bytes(ByteBuf),
    Url(String),
}

impl PhotoBlob {
    pub fn direct_url(&self) -> Option<&str> {
        match self {
            PhotoBlob::Url(url) => Some(url),
            PhotoBlob::Bytes(_) => None,
        }
    }
}

#[derive(CandidType, Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct MenuPhoto {
    pub id: PhotoId,
    pub image: PhotoBlob,
    /// Rank inside the language partition; defines gallery sequence.
    pub display_order: u64,
    /// Display label, usually the original filename.
    pub name: String,
    pub language: Language,
}

/// Payload handed to the actor for a new photo.
#[derive(CandidType, Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct PhotoUpload {
    pub id: PhotoId,
    pub image: ByteBuf,
    pub name: String,
}

/// A file picked by the user, before re-encoding.
#[derive(Clone, Debug)]
pub struct RawImage {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl RawImage {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self { name: name.into(), bytes }
    }
}

/// Sorts photos by `display_order` ascending. Stable, so equal ranks keep
/// their relative order and distinct ranks always give the same sequence.
pub fn sort_by_display_order(photos: &mut [MenuPhoto]) {
    photos.sort_by_key(|photo| photo.display_order);
}
