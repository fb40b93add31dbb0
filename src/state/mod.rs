//! Per-page state and the explicit session.
//!
//! DESIGN
//! ======
//! State structs are plain data with methods so the rules they enforce are
//! unit-testable without a browser. Pages wrap them in `RwSignal` and drive
//! the network calls.

pub mod homework;
pub mod notifications;
pub mod profile_picture;
pub mod session;
pub mod tracking;
pub mod uploads;
pub mod visits;
