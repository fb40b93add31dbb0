//! Continuous location tracking for the visit currently en route.
//!
//! DESIGN
//! ======
//! The device position API is modelled as a [`PositionSource`] with explicit
//! `watch` / `clear` operations. [`LocationTracker`] owns at most one active
//! watch: starting a new session clears the previous watch first, and
//! stopping (or dropping the tracker) clears it exactly once.

#[cfg(test)]
#[path = "tracking_test.rs"]
mod tracking_test;

use crate::net::types::LocationSample;

/// Acquisition timeout for one position fix.
pub const WATCH_TIMEOUT_MS: u32 = 10_000;

/// Oldest cached position the device may hand back.
pub const WATCH_MAXIMUM_AGE_MS: u32 = 30_000;

/// Options passed to the device when starting a watch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WatchOptions {
    pub high_accuracy: bool,
    pub timeout_ms: u32,
    pub maximum_age_ms: u32,
}

impl WatchOptions {
    /// Options used while a visit is en route.
    pub const TRACKING: Self = Self {
        high_accuracy: true,
        timeout_ms: WATCH_TIMEOUT_MS,
        maximum_age_ms: WATCH_MAXIMUM_AGE_MS,
    };
}

/// Device-assigned handle for an active watch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WatchId(pub i32);

/// Device capability failures. Each one halts tracking.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TrackingError {
    #[error("Geolocation is not supported by this browser.")]
    Unsupported,
    #[error("Location permission was denied.")]
    PermissionDenied,
    #[error("Your location is currently unavailable.")]
    PositionUnavailable,
    #[error("Timed out while waiting for your location.")]
    Timeout,
    #[error("Location error: {0}")]
    Other(String),
}

impl TrackingError {
    /// Map a W3C `GeolocationPositionError.code` to a tracking error.
    pub fn from_code(code: u16, message: &str) -> Self {
        match code {
            1 => Self::PermissionDenied,
            2 => Self::PositionUnavailable,
            3 => Self::Timeout,
            _ => Self::Other(message.to_owned()),
        }
    }
}

/// Callback invoked for every position fix.
pub type SampleHandler = Box<dyn FnMut(LocationSample)>;

/// Callback invoked when the device reports an observation error.
pub type ErrorHandler = Box<dyn FnMut(TrackingError)>;

/// A source of continuous position updates.
pub trait PositionSource {
    /// Begin observing the device position.
    ///
    /// # Errors
    ///
    /// Returns [`TrackingError::Unsupported`] when the device has no position capability.
    fn watch(&mut self, options: WatchOptions, on_sample: SampleHandler, on_error: ErrorHandler)
    -> Result<WatchId, TrackingError>;

    /// Cancel a watch started by [`PositionSource::watch`].
    fn clear(&mut self, id: WatchId);
}

#[derive(Debug)]
struct TrackingSession {
    visit_id: String,
    watch_id: WatchId,
}

/// Owner of the single active tracking session.
pub struct LocationTracker<S: PositionSource> {
    source: S,
    active: Option<TrackingSession>,
}

impl<S: PositionSource> LocationTracker<S> {
    pub fn new(source: S) -> Self {
        Self { source, active: None }
    }

    /// Start tracking `visit_id`, cancelling any session already running.
    ///
    /// # Errors
    ///
    /// Returns the source's error when the watch cannot be started; no session
    /// is active afterwards.
    pub fn start(&mut self, visit_id: &str, on_sample: SampleHandler, on_error: ErrorHandler) -> Result<(), TrackingError> {
        self.stop();
        let watch_id = self.source.watch(WatchOptions::TRACKING, on_sample, on_error)?;
        self.active = Some(TrackingSession { visit_id: visit_id.to_owned(), watch_id });
        Ok(())
    }

    /// Cancel the active watch, if any. Returns the visit that was tracked.
    pub fn stop(&mut self) -> Option<String> {
        let session = self.active.take()?;
        self.source.clear(session.watch_id);
        Some(session.visit_id)
    }

    /// Cancel the active watch only if it belongs to `visit_id`.
    pub fn stop_visit(&mut self, visit_id: &str) -> bool {
        if self.is_tracking(visit_id) {
            self.stop();
            return true;
        }
        false
    }

    pub fn active_visit_id(&self) -> Option<&str> {
        self.active.as_ref().map(|s| s.visit_id.as_str())
    }

    pub fn is_tracking(&self, visit_id: &str) -> bool {
        self.active_visit_id() == Some(visit_id)
    }
}

impl<S: PositionSource> Drop for LocationTracker<S> {
    fn drop(&mut self) {
        self.stop();
    }
}
