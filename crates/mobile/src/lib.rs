pub mod error;
pub mod logging;
pub mod offline;
pub mod projection;
pub mod resource;

uniffi::setup_scaffolding!();

use offline_maps_core::access_token::redacted;

/// Mask all but the first `indent` characters of `token`.
#[uniffi::export]
pub fn redact_token(token: String, indent: u32) -> String {
    redacted(&token, indent as usize)
}
