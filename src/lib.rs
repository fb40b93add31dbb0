//! # fieldwork
//!
//! Leptos + WASM frontend for the school/internship management app.
//!
//! This crate contains pages, components, per-page state, REST helpers, and
//! the push-channel client used by the visit tracker. Browser-only code is
//! gated behind the `hydrate` feature so state and validation logic stay
//! testable natively.

pub mod app;
pub mod components;
pub mod config;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;

/// WASM entry point: installs console logging and hydrates the SSR markup.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
    leptos::mount::hydrate_body(app::App);
}
