//! Browser implementation of [`PositionSource`] over `navigator.geolocation`.
//!
//! Each watch keeps its two JS callbacks alive in a map keyed by the browser's
//! watch id. Clearing a watch drops them on the next tick, since a clear may
//! be issued from inside one of those callbacks.

use std::collections::HashMap;

use gloo_timers::callback::Timeout;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{Geolocation, GeolocationPosition, GeolocationPositionError, PositionOptions};

use crate::net::types::LocationSample;
use crate::state::tracking::{ErrorHandler, PositionSource, SampleHandler, TrackingError, WatchId, WatchOptions};

struct WatchCallbacks {
    _on_position: Closure<dyn FnMut(GeolocationPosition)>,
    _on_error: Closure<dyn FnMut(GeolocationPositionError)>,
}

/// Device position via the Geolocation API.
#[derive(Default)]
pub struct BrowserGeolocation {
    watches: HashMap<i32, WatchCallbacks>,
}

fn geolocation() -> Result<Geolocation, TrackingError> {
    web_sys::window()
        .ok_or(TrackingError::Unsupported)?
        .navigator()
        .geolocation()
        .map_err(|_| TrackingError::Unsupported)
}

fn sample_from(position: &GeolocationPosition) -> LocationSample {
    let coords = position.coords();
    LocationSample {
        latitude: coords.latitude(),
        longitude: coords.longitude(),
        accuracy: coords.accuracy(),
        timestamp_ms: position.timestamp(),
    }
}

impl PositionSource for BrowserGeolocation {
    fn watch(
        &mut self,
        options: WatchOptions,
        mut on_sample: SampleHandler,
        mut on_error: ErrorHandler,
    ) -> Result<WatchId, TrackingError> {
        let geo = geolocation()?;

        let on_position = Closure::<dyn FnMut(GeolocationPosition)>::new(move |position: GeolocationPosition| {
            on_sample(sample_from(&position));
        });
        let on_failure = Closure::<dyn FnMut(GeolocationPositionError)>::new(move |err: GeolocationPositionError| {
            on_error(TrackingError::from_code(err.code(), &err.message()));
        });

        let opts = PositionOptions::new();
        opts.set_enable_high_accuracy(options.high_accuracy);
        opts.set_timeout(options.timeout_ms);
        opts.set_maximum_age(options.maximum_age_ms);

        let id = geo
            .watch_position_with_error_callback_and_options(
                on_position.as_ref().unchecked_ref(),
                Some(on_failure.as_ref().unchecked_ref()),
                &opts,
            )
            .map_err(|e| TrackingError::Other(format!("{e:?}")))?;

        self.watches.insert(id, WatchCallbacks { _on_position: on_position, _on_error: on_failure });
        Ok(WatchId(id))
    }

    fn clear(&mut self, id: WatchId) {
        if let Ok(geo) = geolocation() {
            geo.clear_watch(id.0);
        }
        if let Some(callbacks) = self.watches.remove(&id.0) {
            Timeout::new(0, move || drop(callbacks)).forget();
        }
    }
}
