// src/menu_sync/adapter/canister_actor.rs
// Inter-canister binding of RemoteActor for a sync layer hosted in a
// companion canister. Calls the restaurant canister's Candid methods and maps
// wire records (camelCase, `nat` ranks) into models.

use crate::adapter::actor::RemoteActor;
use crate::error::SyncError;
use crate::models::{
    ContactInfo, Language, MenuPhoto, PhotoBlob, PhotoUpload, PrincipalId, UserProfile, UserRole,
};
use crate::utils::progress::UploadProgress;
use crate::utils::timeout::Timer;
use async_trait::async_trait;
use candid::utils::{ArgumentDecoder, ArgumentEncoder};
use candid::{CandidType, Nat, Principal};
use futures::channel::oneshot;
use futures::future::{FutureExt, LocalBoxFuture};
use ic_cdk::api::management_canister::main::raw_rand;
use serde::Deserialize;
use serde_bytes::ByteBuf;
use std::time::Duration;
use tracing::{debug, error};

#[derive(CandidType, Deserialize, Clone, Debug)]
struct WireMenuPhoto {
    id: String,
    blob: ByteBuf,
    #[serde(rename = "displayOrder")]
    display_order: Nat,
    name: String,
}

#[derive(CandidType, Deserialize, Clone, Debug)]
struct WirePhotoUpload {
    id: String,
    blob: ByteBuf,
    name: String,
}

#[derive(CandidType, Deserialize, Clone, Debug)]
struct WireContactInfo {
    email: String,
    #[serde(rename = "whatsappNumber")]
    whatsapp_number: String,
    #[serde(rename = "restaurantName")]
    restaurant_name: String,
}

impl WireMenuPhoto {
    fn into_model(self, language: Language) -> Result<MenuPhoto, SyncError> {
        let display_order = u64::try_from(self.display_order.0)
            .map_err(|_| SyncError::Rejected(format!("displayOrder of {} does not fit in u64", self.id)))?;
        Ok(MenuPhoto {
            id: self.id,
            image: PhotoBlob::Bytes(self.blob),
            display_order,
            name: self.name,
            language,
        })
    }
}

impl From<PhotoUpload> for WirePhotoUpload {
    fn from(upload: PhotoUpload) -> Self {
        Self {
            id: upload.id,
            blob: upload.image,
            name: upload.name,
        }
    }
}

impl From<WireContactInfo> for ContactInfo {
    fn from(wire: WireContactInfo) -> Self {
        ContactInfo {
            restaurant_name: wire.restaurant_name,
            email: wire.email,
            whatsapp_number: wire.whatsapp_number,
        }
    }
}

impl From<ContactInfo> for WireContactInfo {
    fn from(info: ContactInfo) -> Self {
        WireContactInfo {
            email: info.email,
            whatsapp_number: info.whatsapp_number,
            restaurant_name: info.restaurant_name,
        }
    }
}

/// Restaurant canister reached through `ic_cdk::call`.
#[derive(Clone, Copy, Debug)]
pub struct CanisterActor {
    canister_id: Principal,
}

impl CanisterActor {
    pub fn new(canister_id: Principal) -> Self {
        Self { canister_id }
    }

    pub fn canister_id(&self) -> Principal {
        self.canister_id
    }

    async fn call<A, R>(&self, method: &str, args: A) -> Result<R, SyncError>
    where
        A: ArgumentEncoder,
        R: for<'a> ArgumentDecoder<'a>,
    {
        debug!(canister = %self.canister_id, method, "inter-canister call");
        ic_cdk::call(self.canister_id, method, args).await.map_err(|(code, msg)| {
            error!(canister = %self.canister_id, method, ?code, "call rejected: {}", msg);
            SyncError::Rejected(format!("{} rejected: {:?} - {}", method, code, msg))
        })
    }
}

#[async_trait(?Send)]
impl RemoteActor for CanisterActor {
    async fn get_photos(&self, language: Language) -> Result<Vec<MenuPhoto>, SyncError> {
        let method = format!("getMenuPhotos{}", language.method_suffix());
        let (photos,): (Vec<WireMenuPhoto>,) = self.call(&method, ()).await?;
        photos.into_iter().map(|photo| photo.into_model(language)).collect()
    }

    async fn add_photo(&self, language: Language, upload: PhotoUpload) -> Result<(), SyncError> {
        let method = format!("addMenuPhoto{}", language.method_suffix());
        let upload = WirePhotoUpload::from(upload);
        self.call(&method, (upload.id, upload.blob, upload.name)).await
    }

    async fn add_photos(
        &self,
        language: Language,
        uploads: Vec<PhotoUpload>,
        progress: &UploadProgress,
    ) -> Result<(), SyncError> {
        let method = format!("addMenuPhotos{}", language.method_suffix());
        let uploads: Vec<WirePhotoUpload> = uploads.into_iter().map(Into::into).collect();
        // A single update call carries the whole batch
        self.call::<_, ()>(&method, (uploads,)).await?;
        progress.complete_all();
        Ok(())
    }

    async fn delete_photo(&self, language: Language, id: &str) -> Result<(), SyncError> {
        let method = format!("deleteMenuPhoto{}", language.method_suffix());
        self.call(&method, (id.to_string(),)).await
    }

    async fn reorder_photos(&self, language: Language, ordered_ids: Vec<String>) -> Result<(), SyncError> {
        let method = format!("reorderMenuPhotos{}", language.method_suffix());
        self.call(&method, (ordered_ids,)).await
    }

    async fn get_contact_info(&self) -> Result<Option<ContactInfo>, SyncError> {
        let (info,): (Option<WireContactInfo>,) = self.call("getContactInfo", ()).await?;
        Ok(info.map(Into::into))
    }

    async fn update_contact_info(&self, info: ContactInfo) -> Result<(), SyncError> {
        self.call("updateContactInfo", (WireContactInfo::from(info),)).await
    }

    async fn get_caller_profile(&self) -> Result<Option<UserProfile>, SyncError> {
        let (profile,): (Option<UserProfile>,) = self.call("getCallerUserProfile", ()).await?;
        Ok(profile)
    }

    async fn get_user_profile(&self, user: PrincipalId) -> Result<Option<UserProfile>, SyncError> {
        let (profile,): (Option<UserProfile>,) = self.call("getUserProfile", (user,)).await?;
        Ok(profile)
    }

    async fn save_caller_profile(&self, profile: UserProfile) -> Result<(), SyncError> {
        self.call("saveCallerUserProfile", (profile,)).await
    }

    async fn get_caller_role(&self) -> Result<UserRole, SyncError> {
        let (role,): (UserRole,) = self.call("getCallerUserRole", ()).await?;
        Ok(role)
    }

    async fn assign_role(&self, user: PrincipalId, role: UserRole) -> Result<(), SyncError> {
        self.call("assignCallerUserRole", (user, role)).await
    }

    async fn is_caller_admin(&self) -> Result<bool, SyncError> {
        let (is_admin,): (bool,) = self.call("isCallerAdmin", ()).await?;
        Ok(is_admin)
    }

    async fn initialize_access_control(&self) -> Result<(), SyncError> {
        self.call("initializeAccessControl", ()).await
    }
}

/// Sleeps backed by canister timers.
#[derive(Clone, Copy, Debug, Default)]
pub struct CanisterTimer;

impl Timer for CanisterTimer {
    fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()> {
        let (tx, rx) = oneshot::channel::<()>();
        ic_cdk_timers::set_timer(duration, move || {
            let _ = tx.send(());
        });
        async move {
            let _ = rx.await;
        }
        .boxed_local()
    }
}

/// Seed for the photo id generator from the management canister's `raw_rand`,
/// since canisters have no OS entropy.
pub async fn seed_from_raw_rand() -> Result<u64, SyncError> {
    let (bytes,) = raw_rand()
        .await
        .map_err(|(code, msg)| SyncError::Rejected(format!("raw_rand failed: {:?} - {}", code, msg)))?;
    let seed: [u8; 8] = bytes
        .get(..8)
        .and_then(|head| head.try_into().ok())
        .ok_or_else(|| SyncError::Rejected("raw_rand returned insufficient bytes for seed".to_string()))?;
    Ok(u64::from_le_bytes(seed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use candid::{Decode, Encode};

    #[test]
    fn wire_photo_decodes_camel_case_record() {
        let wire = WireMenuPhoto {
            id: "p1".into(),
            blob: ByteBuf::from(vec![1, 2, 3]),
            display_order: Nat::from(4u64),
            name: "falafel.webp".into(),
        };
        let bytes = Encode!(&wire).unwrap();
        let decoded = Decode!(&bytes, WireMenuPhoto).unwrap();

        let photo = decoded.into_model(Language::En).unwrap();
        assert_eq!(photo.display_order, 4);
        assert_eq!(photo.language, Language::En);
        assert_eq!(photo.image, PhotoBlob::Bytes(ByteBuf::from(vec![1, 2, 3])));
    }

    #[test]
    fn contact_info_round_trips_through_wire_names() {
        let info = ContactInfo::new("Lebnene", "hola@lebnene.es", "+34 600 000 000");
        let back: ContactInfo = WireContactInfo::from(info.clone()).into();
        assert_eq!(back, info);
    }

    #[test]
    fn roles_use_lowercase_variant_names() {
        #[allow(non_camel_case_types, dead_code)]
        #[derive(CandidType)]
        enum CanisterRole {
            admin,
            user,
            guest,
        }

        assert_eq!(Encode!(&UserRole::Admin).unwrap(), Encode!(&CanisterRole::admin).unwrap());
        assert_eq!(Encode!(&UserRole::Guest).unwrap(), Encode!(&CanisterRole::guest).unwrap());
    }
}
