// src/menu_sync/adapter/mod.rs
// Outbound side: the remote actor capability and its implementations.

pub mod actor;
pub mod canister_actor;
pub mod memory_actor;

pub use actor::RemoteActor;
pub use canister_actor::{CanisterActor, CanisterTimer};
pub use memory_actor::{ActorOp, MemoryActor};
