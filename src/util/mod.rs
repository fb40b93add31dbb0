//! Utility helpers shared across pages and widgets.
//!
//! SYSTEM CONTEXT
//! ==============
//! Utility modules isolate browser concerns (storage, object URLs, device
//! position, image decoding, downloads) from page and component logic.

#[cfg(feature = "hydrate")]
pub mod download;
pub mod format;
#[cfg(feature = "hydrate")]
pub mod geolocation;
#[cfg(feature = "hydrate")]
pub mod image;
pub mod object_url;
pub mod request_seq;
pub mod storage;
