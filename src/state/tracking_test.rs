use std::cell::RefCell;
use std::rc::Rc;

use super::*;

#[derive(Default)]
struct Log {
    next_id: i32,
    watched: Vec<(WatchId, WatchOptions)>,
    cleared: Vec<WatchId>,
    handlers: Vec<(WatchId, SampleHandler, ErrorHandler)>,
}

#[derive(Clone, Default)]
struct FakeSource {
    log: Rc<RefCell<Log>>,
    unsupported: bool,
}

impl PositionSource for FakeSource {
    fn watch(
        &mut self,
        options: WatchOptions,
        on_sample: SampleHandler,
        on_error: ErrorHandler,
    ) -> Result<WatchId, TrackingError> {
        if self.unsupported {
            return Err(TrackingError::Unsupported);
        }
        let mut log = self.log.borrow_mut();
        log.next_id += 1;
        let id = WatchId(log.next_id);
        log.watched.push((id, options));
        log.handlers.push((id, on_sample, on_error));
        Ok(id)
    }

    fn clear(&mut self, id: WatchId) {
        let mut log = self.log.borrow_mut();
        log.cleared.push(id);
        log.handlers.retain(|(h, _, _)| *h != id);
    }
}

fn noop_sample() -> SampleHandler {
    Box::new(|_| {})
}

fn noop_error() -> ErrorHandler {
    Box::new(|_| {})
}

fn sample() -> LocationSample {
    LocationSample { latitude: 1.0, longitude: 2.0, accuracy: 3.0, timestamp_ms: 4.0 }
}

// =============================================================
// Options and errors
// =============================================================

#[test]
fn tracking_options_request_high_accuracy_with_fixed_limits() {
    assert_eq!(
        WatchOptions::TRACKING,
        WatchOptions { high_accuracy: true, timeout_ms: 10_000, maximum_age_ms: 30_000 }
    );
}

#[test]
fn tracking_error_codes_follow_geolocation_api() {
    assert_eq!(TrackingError::from_code(1, ""), TrackingError::PermissionDenied);
    assert_eq!(TrackingError::from_code(2, ""), TrackingError::PositionUnavailable);
    assert_eq!(TrackingError::from_code(3, ""), TrackingError::Timeout);
    assert_eq!(TrackingError::from_code(9, "odd"), TrackingError::Other("odd".to_owned()));
}

// =============================================================
// Session lifecycle
// =============================================================

#[test]
fn start_registers_one_watch_with_tracking_options() {
    let source = FakeSource::default();
    let mut tracker = LocationTracker::new(source.clone());
    tracker.start("v-a", noop_sample(), noop_error()).expect("start");

    let log = source.log.borrow();
    assert_eq!(log.watched.len(), 1);
    assert_eq!(log.watched[0].1, WatchOptions::TRACKING);
    assert!(tracker.is_tracking("v-a"));
}

#[test]
fn starting_second_visit_cancels_first_watch_exactly_once() {
    let source = FakeSource::default();
    let mut tracker = LocationTracker::new(source.clone());
    tracker.start("v-a", noop_sample(), noop_error()).expect("start a");
    tracker.start("v-b", noop_sample(), noop_error()).expect("start b");

    {
        let log = source.log.borrow();
        assert_eq!(log.cleared, vec![WatchId(1)]);
        assert_eq!(log.handlers.len(), 1);
    }
    assert_eq!(tracker.active_visit_id(), Some("v-b"));

    drop(tracker);
    let log = source.log.borrow();
    assert_eq!(log.cleared, vec![WatchId(1), WatchId(2)]);
    assert!(log.handlers.is_empty());
}

#[test]
fn stop_is_idempotent() {
    let source = FakeSource::default();
    let mut tracker = LocationTracker::new(source.clone());
    tracker.start("v-a", noop_sample(), noop_error()).expect("start");

    assert_eq!(tracker.stop().as_deref(), Some("v-a"));
    assert_eq!(tracker.stop(), None);
    drop(tracker);
    assert_eq!(source.log.borrow().cleared, vec![WatchId(1)]);
}

#[test]
fn stop_visit_ignores_other_visits() {
    let source = FakeSource::default();
    let mut tracker = LocationTracker::new(source.clone());
    tracker.start("v-a", noop_sample(), noop_error()).expect("start");

    assert!(!tracker.stop_visit("v-b"));
    assert!(tracker.is_tracking("v-a"));
    assert!(tracker.stop_visit("v-a"));
    assert!(tracker.active_visit_id().is_none());
}

#[test]
fn unsupported_source_leaves_no_session() {
    let source = FakeSource { unsupported: true, ..FakeSource::default() };
    let mut tracker = LocationTracker::new(source.clone());
    let err = tracker.start("v-a", noop_sample(), noop_error()).expect_err("unsupported");
    assert_eq!(err, TrackingError::Unsupported);
    assert!(tracker.active_visit_id().is_none());
    assert!(source.log.borrow().cleared.is_empty());
}

#[test]
fn unsupported_restart_still_cancels_previous_session() {
    let source = FakeSource::default();
    let mut tracker = LocationTracker::new(source.clone());
    tracker.start("v-a", noop_sample(), noop_error()).expect("start");

    tracker.source.unsupported = true;
    assert!(tracker.start("v-b", noop_sample(), noop_error()).is_err());
    assert_eq!(source.log.borrow().cleared, vec![WatchId(1)]);
    assert!(tracker.active_visit_id().is_none());
}

// =============================================================
// Callbacks
// =============================================================

#[test]
fn samples_reach_the_handler_while_active() {
    let source = FakeSource::default();
    let received = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&received);
    let mut tracker = LocationTracker::new(source.clone());
    tracker
        .start("v-a", Box::new(move |s| sink.borrow_mut().push(s)), noop_error())
        .expect("start");

    for (_, on_sample, _) in &mut source.log.borrow_mut().handlers {
        on_sample(sample());
    }
    assert_eq!(received.borrow().as_slice(), &[sample()]);
}

#[test]
fn observation_error_handler_can_halt_tracking() {
    let source = FakeSource::default();
    let errors = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&errors);
    let mut tracker = LocationTracker::new(source.clone());
    tracker
        .start("v-a", noop_sample(), Box::new(move |e| sink.borrow_mut().push(e)))
        .expect("start");

    for (_, _, on_error) in &mut source.log.borrow_mut().handlers {
        on_error(TrackingError::Timeout);
    }
    // The page reacts to the reported error by stopping; tracking is not resumed.
    assert_eq!(errors.borrow().as_slice(), &[TrackingError::Timeout]);
    tracker.stop();
    assert!(tracker.active_visit_id().is_none());
    assert!(source.log.borrow().handlers.is_empty());
}
