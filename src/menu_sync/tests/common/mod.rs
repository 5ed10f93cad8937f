#![allow(dead_code)]

use candid::Principal;
use futures::future::{self, FutureExt, LocalBoxFuture};
use image::{DynamicImage, ImageOutputFormat, Rgb, RgbImage};
use menu_sync::utils::ids::PhotoIdGenerator;
use menu_sync::{
    Language, MemoryActor, MenuPhoto, QueryCache, RemoteActor, SyncClient, SyncConfig, Timer,
    UserProfile, UserRole,
};
use std::{io::Cursor, rc::Rc, time::Duration};

pub fn admin() -> Principal {
    Principal::from_slice(&[1; 29])
}

pub fn second_admin() -> Principal {
    Principal::from_slice(&[2; 29])
}

pub fn visitor() -> Principal {
    Principal::from_slice(&[9; 29])
}

/// Client with a deterministic id generator and no session yet.
pub fn client(config: SyncConfig) -> SyncClient {
    SyncClient::with_parts(config, Rc::new(QueryCache::new()), PhotoIdGenerator::seeded(42, 9))
}

/// Actor state with `admin()` as a named admin.
pub fn restaurant() -> MemoryActor {
    let actor = MemoryActor::new(admin());
    actor.set_role(admin(), UserRole::Admin);
    actor.set_profile(admin(), UserProfile { name: "Nadia".into() });
    actor
}

pub fn handle(actor: &MemoryActor, caller: Principal) -> Rc<dyn RemoteActor> {
    Rc::new(actor.for_caller(caller))
}

/// Client logged in as `admin()` against `actor`.
pub fn admin_client(actor: &MemoryActor) -> SyncClient {
    let client = client(SyncConfig::default());
    client.login(admin(), handle(actor, admin()));
    client
}

pub fn seed(actor: &MemoryActor, language: Language, ids: &[&str]) {
    for (order, id) in ids.iter().enumerate() {
        actor.seed_photo(language, id, order as u64);
    }
}

pub fn ids(photos: &[MenuPhoto]) -> Vec<String> {
    photos.iter().map(|photo| photo.id.clone()).collect()
}

pub fn strings(ids: &[&str]) -> Vec<String> {
    ids.iter().map(|id| id.to_string()).collect()
}

pub fn png(width: u32, height: u32) -> Vec<u8> {
    let raster = RgbImage::from_pixel(width, height, Rgb([180, 40, 40]));
    let mut bytes = Vec::new();
    DynamicImage::ImageRgb8(raster)
        .write_to(&mut Cursor::new(&mut bytes), ImageOutputFormat::Png)
        .unwrap();
    bytes
}

/// Timer whose sleeps are already over: any call still pending when first
/// polled times out.
pub struct Elapsed;

impl Timer for Elapsed {
    fn sleep(&self, _duration: Duration) -> LocalBoxFuture<'static, ()> {
        future::ready(()).boxed_local()
    }
}
