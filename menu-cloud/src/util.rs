//! Shared utility functions for menu-cloud

pub use shared::util::now_millis;

/// Fresh table QR secret: 32 random bytes, hex-encoded (64 chars)
pub fn generate_table_token() -> String {
    use rand::RngCore;
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Fresh customer session id
pub fn generate_session_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
