//! Request bodies accepted by the front-end.

use serde::Deserialize;

/// Longest key `PUT /set` accepts, in bytes.
pub const MAX_KEY_LENGTH: usize = 256;

/// `PUT /set` body.
#[derive(Debug, Clone, Deserialize)]
pub struct SetRequest {
    pub key: String,
    pub value: String,
}

impl SetRequest {
    /// Returns the reason the key is unusable, if any. Values are not checked.
    pub fn validate(&self) -> Option<String> {
        if self.key.is_empty() {
            return Some("key cannot be empty".to_string());
        }
        if self.key.len() > MAX_KEY_LENGTH {
            return Some(format!(
                "key exceeds maximum length of {} bytes",
                MAX_KEY_LENGTH
            ));
        }
        None
    }
}
