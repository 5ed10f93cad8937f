use crate::models::common::TimestampMs;

/// Current time as milliseconds since epoch. Inside a canister this is the
/// Internet Computer time; elsewhere the system clock.
#[cfg(target_arch = "wasm32")]
pub fn now_millis() -> TimestampMs {
    ic_cdk::api::time() / 1_000_000
}

#[cfg(not(target_arch = "wasm32"))]
pub fn now_millis() -> TimestampMs {
    use std::time::{SystemTime, UNIX_EPOCH};

    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as TimestampMs)
        .unwrap_or(0)
}
