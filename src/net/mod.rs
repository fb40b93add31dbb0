//! Networking modules for REST + the visit push channel.
//!
//! SYSTEM CONTEXT
//! ==============
//! `api` handles REST calls, `error` defines their failure type,
//! `push_channel` manages the websocket lifecycle, and `types` defines the
//! REST schema.

pub mod api;
pub mod error;
pub mod push_channel;
pub mod types;
