//! Messaging deep links.
//!
//! Links take the form `{base}/{digits}?text={percent-encoded message}`,
//! e.g. `https://wa.me/13125551234?text=Hello`. Building a link never fails:
//! a handle with no digits still yields a well-formed (if useless) URI.

use markethub_core::digits_only;

/// Default messaging base URL.
pub const DEFAULT_BASE_URL: &str = "https://wa.me";

/// Link that opens a chat with `handle` pre-filled with `message`.
#[must_use]
pub fn deep_link(base_url: &str, handle: &str, message: &str) -> String {
    format!(
        "{}?text={}",
        contact_link(base_url, handle),
        urlencoding::encode(message)
    )
}

/// Link that opens a chat with `handle` and no message.
///
/// Every non-digit character of the handle is dropped.
#[must_use]
pub fn contact_link(base_url: &str, handle: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), digits_only(handle))
}
