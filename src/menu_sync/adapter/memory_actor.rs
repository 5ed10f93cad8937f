// src/menu_sync/adapter/memory_actor.rs
// In-process actor with the restaurant canister's behaviour: sorted photo
// partitions, admin-gated mutations, first-caller-becomes-admin access
// control. Supports failure injection, held and stalled calls, and call
// counting so callers can observe exactly what the sync layer sent.

use crate::adapter::actor::RemoteActor;
use crate::error::SyncError;
use crate::models::{
    ContactInfo, Language, MenuPhoto, PhotoBlob, PhotoUpload, PrincipalId, UserProfile, UserRole,
    UserRoleEntry,
};
use crate::utils::progress::UploadProgress;
use async_trait::async_trait;
use candid::Principal;
use futures::channel::oneshot;
use serde_bytes::ByteBuf;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet, VecDeque};
use std::rc::Rc;
use tracing::debug;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ActorOp {
    GetPhotos,
    AddPhoto,
    AddPhotos,
    DeletePhoto,
    ReorderPhotos,
    GetContactInfo,
    UpdateContactInfo,
    GetCallerProfile,
    GetUserProfile,
    SaveCallerProfile,
    GetCallerRole,
    AssignRole,
    IsCallerAdmin,
    InitializeAccessControl,
    ListUsers,
}

#[derive(Clone, Debug)]
struct StoredPhoto {
    id: String,
    bytes: ByteBuf,
    name: String,
    display_order: u64,
}

#[derive(Debug, Default)]
struct ActorState {
    photos: HashMap<Language, Vec<StoredPhoto>>,
    contact: Option<ContactInfo>,
    profiles: HashMap<Principal, UserProfile>,
    roles: HashMap<Principal, UserRole>,
    admin_assigned: bool,
}

impl ActorState {
    fn role_of(&self, principal: &Principal) -> UserRole {
        self.roles.get(principal).copied().unwrap_or(UserRole::Guest)
    }

    fn partition(&mut self, language: Language) -> &mut Vec<StoredPhoto> {
        self.photos.entry(language).or_default()
    }

    fn next_display_order(&self, language: Language) -> u64 {
        self.photos
            .get(&language)
            .and_then(|photos| photos.iter().map(|p| p.display_order).max())
            .map_or(0, |max| max + 1)
    }

    fn insert_photo(&mut self, language: Language, upload: PhotoUpload) -> Result<(), SyncError> {
        if self.photos.get(&language).map_or(false, |photos| photos.iter().any(|p| p.id == upload.id)) {
            return Err(SyncError::Rejected(format!("Photo already exists: {}", upload.id)));
        }
        let display_order = self.next_display_order(language);
        self.partition(language).push(StoredPhoto {
            id: upload.id,
            bytes: upload.image,
            name: upload.name,
            display_order,
        });
        Ok(())
    }
}

/// Shared in-memory canister state seen through one caller identity.
pub struct MemoryActor {
    caller: Principal,
    state: Rc<RefCell<ActorState>>,
    failures: Rc<RefCell<HashMap<ActorOp, VecDeque<SyncError>>>>,
    holds: Rc<RefCell<HashMap<ActorOp, VecDeque<oneshot::Receiver<()>>>>>,
    stalled: Rc<RefCell<HashSet<ActorOp>>>,
    calls: Rc<RefCell<HashMap<ActorOp, usize>>>,
}

impl MemoryActor {
    pub fn new(caller: Principal) -> Self {
        Self {
            caller,
            state: Rc::default(),
            failures: Rc::default(),
            holds: Rc::default(),
            stalled: Rc::default(),
            calls: Rc::default(),
        }
    }

    /// Same canister state and instrumentation, different caller.
    pub fn for_caller(&self, caller: Principal) -> Self {
        Self {
            caller,
            state: Rc::clone(&self.state),
            failures: Rc::clone(&self.failures),
            holds: Rc::clone(&self.holds),
            stalled: Rc::clone(&self.stalled),
            calls: Rc::clone(&self.calls),
        }
    }

    pub fn caller(&self) -> Principal {
        self.caller
    }

    // --- Setup helpers (bypass access control) ---

    pub fn set_role(&self, principal: Principal, role: UserRole) {
        let mut state = self.state.borrow_mut();
        if role == UserRole::Admin {
            state.admin_assigned = true;
        }
        state.roles.insert(principal, role);
    }

    pub fn set_profile(&self, principal: Principal, profile: UserProfile) {
        self.state.borrow_mut().profiles.insert(principal, profile);
    }

    pub fn set_contact_info(&self, info: ContactInfo) {
        self.state.borrow_mut().contact = Some(info);
    }

    /// Seeds a photo with an explicit rank.
    pub fn seed_photo(&self, language: Language, id: &str, display_order: u64) {
        self.state.borrow_mut().partition(language).push(StoredPhoto {
            id: id.to_string(),
            bytes: ByteBuf::new(),
            name: format!("{}.webp", id),
            display_order,
        });
    }

    /// Server-side id order of a partition.
    pub fn photo_ids(&self, language: Language) -> Vec<String> {
        self.sorted_photos(language).into_iter().map(|photo| photo.id).collect()
    }

    pub fn stored_bytes(&self, language: Language, id: &str) -> Option<Vec<u8>> {
        self.state
            .borrow()
            .photos
            .get(&language)?
            .iter()
            .find(|photo| photo.id == id)
            .map(|photo| photo.bytes.to_vec())
    }

    // --- Instrumentation ---

    /// The next call of `op` fails with `error` instead of running.
    pub fn fail_next(&self, op: ActorOp, error: SyncError) {
        self.failures.borrow_mut().entry(op).or_default().push_back(error);
    }

    /// The next call of `op` waits until the returned sender fires or is dropped.
    /// Reads capture their result before waiting, writes apply after.
    pub fn hold_next(&self, op: ActorOp) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.holds.borrow_mut().entry(op).or_default().push_back(rx);
        tx
    }

    /// Every call of `op` hangs forever until `resume` is called.
    pub fn stall(&self, op: ActorOp) {
        self.stalled.borrow_mut().insert(op);
    }

    pub fn resume(&self, op: ActorOp) {
        self.stalled.borrow_mut().remove(&op);
    }

    pub fn calls(&self, op: ActorOp) -> usize {
        self.calls.borrow().get(&op).copied().unwrap_or(0)
    }

    fn enter(&self, op: ActorOp) -> Result<(), SyncError> {
        *self.calls.borrow_mut().entry(op).or_insert(0) += 1;
        debug!(?op, caller = %self.caller, "memory actor call");
        match self.failures.borrow_mut().get_mut(&op).and_then(VecDeque::pop_front) {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    async fn wait(&self, op: ActorOp) {
        if self.stalled.borrow().contains(&op) {
            futures::future::pending::<()>().await;
        }
        let hold = self.holds.borrow_mut().get_mut(&op).and_then(VecDeque::pop_front);
        if let Some(rx) = hold {
            // A dropped sender releases the call as well
            let _ = rx.await;
        }
    }

    fn require_admin(&self, action: &str) -> Result<(), SyncError> {
        if self.state.borrow().role_of(&self.caller) == UserRole::Admin {
            Ok(())
        } else {
            Err(SyncError::Rejected(format!("Unauthorized: only admins can {}", action)))
        }
    }

    fn require_signed_in(&self, action: &str) -> Result<(), SyncError> {
        if self.caller == Principal::anonymous() {
            Err(SyncError::Rejected(format!("Unauthorized: anonymous callers cannot {}", action)))
        } else {
            Ok(())
        }
    }

    fn sorted_photos(&self, language: Language) -> Vec<MenuPhoto> {
        let state = self.state.borrow();
        let mut photos: Vec<MenuPhoto> = state
            .photos
            .get(&language)
            .map(|stored| {
                stored
                    .iter()
                    .map(|photo| MenuPhoto {
                        id: photo.id.clone(),
                        image: PhotoBlob::Url(format!("memory://{}/{}", language, photo.id)),
                        display_order: photo.display_order,
                        name: photo.name.clone(),
                        language,
                    })
                    .collect()
            })
            .unwrap_or_default();
        photos.sort_by_key(|photo| photo.display_order);
        photos
    }
}

#[async_trait(?Send)]
impl RemoteActor for MemoryActor {
    async fn get_photos(&self, language: Language) -> Result<Vec<MenuPhoto>, SyncError> {
        self.enter(ActorOp::GetPhotos)?;
        let photos = self.sorted_photos(language);
        self.wait(ActorOp::GetPhotos).await;
        Ok(photos)
    }

    async fn add_photo(&self, language: Language, upload: PhotoUpload) -> Result<(), SyncError> {
        self.enter(ActorOp::AddPhoto)?;
        self.wait(ActorOp::AddPhoto).await;
        self.require_admin("add photos")?;
        self.state.borrow_mut().insert_photo(language, upload)
    }

    async fn add_photos(
        &self,
        language: Language,
        uploads: Vec<PhotoUpload>,
        progress: &UploadProgress,
    ) -> Result<(), SyncError> {
        self.enter(ActorOp::AddPhotos)?;
        self.wait(ActorOp::AddPhotos).await;
        self.require_admin("add photos")?;
        // A rejected batch leaves the partition untouched
        {
            let state = self.state.borrow();
            let existing = state.photos.get(&language);
            let mut seen = HashSet::new();
            for upload in &uploads {
                let stored = existing.map_or(false, |photos| photos.iter().any(|p| p.id == upload.id));
                if stored || !seen.insert(upload.id.as_str()) {
                    return Err(SyncError::Rejected(format!("Photo already exists: {}", upload.id)));
                }
            }
        }
        for (index, upload) in uploads.into_iter().enumerate() {
            self.state.borrow_mut().insert_photo(language, upload)?;
            progress.complete(index);
        }
        Ok(())
    }

    async fn delete_photo(&self, language: Language, id: &str) -> Result<(), SyncError> {
        self.enter(ActorOp::DeletePhoto)?;
        self.wait(ActorOp::DeletePhoto).await;
        self.require_admin("delete photos")?;
        let mut state = self.state.borrow_mut();
        let photos = state.partition(language);
        let before = photos.len();
        photos.retain(|photo| photo.id != id);
        if photos.len() == before {
            return Err(SyncError::Rejected(format!("Photo not found: {}", id)));
        }
        Ok(())
    }

    async fn reorder_photos(&self, language: Language, ordered_ids: Vec<String>) -> Result<(), SyncError> {
        self.enter(ActorOp::ReorderPhotos)?;
        self.wait(ActorOp::ReorderPhotos).await;
        self.require_admin("reorder photos")?;

        let mut state = self.state.borrow_mut();
        let photos = state.partition(language);
        if let Some(unknown) = ordered_ids.iter().find(|id| !photos.iter().any(|p| &p.id == *id)) {
            return Err(SyncError::Rejected(format!("Photo not found: {}", unknown)));
        }

        // Listed photos take rank = index, unlisted ones follow in their current order
        photos.sort_by_key(|photo| photo.display_order);
        let mut next = ordered_ids.len() as u64;
        for photo in photos.iter_mut() {
            match ordered_ids.iter().position(|id| id == &photo.id) {
                Some(index) => photo.display_order = index as u64,
                None => {
                    photo.display_order = next;
                    next += 1;
                }
            }
        }
        photos.sort_by_key(|photo| photo.display_order);
        Ok(())
    }

    async fn get_contact_info(&self) -> Result<Option<ContactInfo>, SyncError> {
        self.enter(ActorOp::GetContactInfo)?;
        let contact = self.state.borrow().contact.clone();
        self.wait(ActorOp::GetContactInfo).await;
        Ok(contact)
    }

    async fn update_contact_info(&self, info: ContactInfo) -> Result<(), SyncError> {
        self.enter(ActorOp::UpdateContactInfo)?;
        self.wait(ActorOp::UpdateContactInfo).await;
        self.require_admin("update contact info")?;
        self.state.borrow_mut().contact = Some(info);
        Ok(())
    }

    async fn get_caller_profile(&self) -> Result<Option<UserProfile>, SyncError> {
        self.enter(ActorOp::GetCallerProfile)?;
        let profile = self.state.borrow().profiles.get(&self.caller).cloned();
        self.wait(ActorOp::GetCallerProfile).await;
        Ok(profile)
    }

    async fn get_user_profile(&self, user: PrincipalId) -> Result<Option<UserProfile>, SyncError> {
        self.enter(ActorOp::GetUserProfile)?;
        if user != self.caller {
            self.require_admin("view other profiles")?;
        }
        let profile = self.state.borrow().profiles.get(&user).cloned();
        self.wait(ActorOp::GetUserProfile).await;
        Ok(profile)
    }

    async fn save_caller_profile(&self, profile: UserProfile) -> Result<(), SyncError> {
        self.enter(ActorOp::SaveCallerProfile)?;
        self.wait(ActorOp::SaveCallerProfile).await;
        self.require_signed_in("save a profile")?;
        self.state.borrow_mut().profiles.insert(self.caller, profile);
        Ok(())
    }

    async fn get_caller_role(&self) -> Result<UserRole, SyncError> {
        self.enter(ActorOp::GetCallerRole)?;
        let role = self.state.borrow().role_of(&self.caller);
        self.wait(ActorOp::GetCallerRole).await;
        Ok(role)
    }

    async fn assign_role(&self, user: PrincipalId, role: UserRole) -> Result<(), SyncError> {
        self.enter(ActorOp::AssignRole)?;
        self.wait(ActorOp::AssignRole).await;
        self.require_admin("assign roles")?;
        self.state.borrow_mut().roles.insert(user, role);
        Ok(())
    }

    async fn is_caller_admin(&self) -> Result<bool, SyncError> {
        self.enter(ActorOp::IsCallerAdmin)?;
        let is_admin = self.state.borrow().role_of(&self.caller) == UserRole::Admin;
        self.wait(ActorOp::IsCallerAdmin).await;
        Ok(is_admin)
    }

    async fn initialize_access_control(&self) -> Result<(), SyncError> {
        self.enter(ActorOp::InitializeAccessControl)?;
        self.wait(ActorOp::InitializeAccessControl).await;
        if self.caller == Principal::anonymous() {
            return Ok(());
        }
        let mut state = self.state.borrow_mut();
        if !state.admin_assigned {
            state.admin_assigned = true;
            state.roles.insert(self.caller, UserRole::Admin);
        } else {
            state.roles.entry(self.caller).or_insert(UserRole::User);
        }
        Ok(())
    }

    async fn list_users(&self) -> Result<Vec<UserRoleEntry>, SyncError> {
        self.enter(ActorOp::ListUsers)?;
        self.require_admin("list users")?;
        let mut users: Vec<UserRoleEntry> = self
            .state
            .borrow()
            .roles
            .iter()
            .map(|(principal, role)| UserRoleEntry {
                principal: *principal,
                role: *role,
            })
            .collect();
        users.sort_by_key(|entry| entry.principal.to_text());
        self.wait(ActorOp::ListUsers).await;
        Ok(users)
    }
}
