//! Reusable widgets mounted by the pages.
//!
//! SYSTEM CONTEXT
//! ==============
//! Widgets receive their data and callbacks as props and read the API client
//! from context; none of them looks up the session on its own.

pub mod file_preview;
pub mod file_upload;
pub mod notification_item;
pub mod pagination;
pub mod profile_picture;
pub mod visit_card;
