use chrono::{TimeZone, Utc};

use super::*;
use crate::net::types::{Destination, StudentRef, TimelineEvent};

const ACTIONS: [VisitAction; 5] = [
    VisitAction::StartPreparing,
    VisitAction::StartJourney,
    VisitAction::MarkArrived,
    VisitAction::StartAssessment,
    VisitAction::Complete,
];

fn visit(id: &str, status: VisitStatus) -> Visit {
    Visit {
        id: id.to_owned(),
        title: "Placement check".to_owned(),
        assessment_type: "practical".to_owned(),
        status,
        student: StudentRef { name: "Ana".to_owned(), school_id: "S-1".to_owned(), phone: None },
        scheduled_date: Utc.with_ymd_and_hms(2026, 10, 20, 9, 0, 0).unwrap(),
        destination: Destination { name: "Acme".to_owned(), address: "Main St 1".to_owned() },
        timeline: Vec::new(),
        current_location: None,
    }
}

fn server_visit(id: &str, status: VisitStatus) -> Visit {
    let mut v = visit(id, status);
    v.timeline.push(TimelineEvent {
        status,
        timestamp: Utc.with_ymd_and_hms(2026, 10, 20, 8, 0, 0).unwrap(),
        notes: String::new(),
        location: None,
    });
    v
}

fn sample(lat: f64) -> LocationSample {
    LocationSample { latitude: lat, longitude: 2.0, accuracy: 10.0, timestamp_ms: 0.0 }
}

fn following(status: VisitStatus) -> Option<VisitStatus> {
    let index = VisitStatus::ALL.iter().position(|s| *s == status)?;
    VisitStatus::ALL.get(index + 1).copied()
}

fn state_with(visits: Vec<Visit>) -> VisitsState {
    let mut state = VisitsState::default();
    state.set_visits(visits);
    state
}

// =============================================================
// Workflow
// =============================================================

#[test]
fn every_action_moves_exactly_one_step_forward() {
    for status in VisitStatus::ALL {
        for action in ACTIONS {
            match apply_action(status, action) {
                Ok(next) => {
                    assert_eq!(action.source(), status);
                    assert_eq!(Some(next), following(status));
                }
                Err(TransitionError::InvalidTransition { current, action: rejected }) => {
                    assert_eq!(current, status);
                    assert_eq!(rejected, action);
                    assert_ne!(action.source(), status);
                }
                Err(other) => panic!("unexpected error {other:?}"),
            }
        }
    }
}

#[test]
fn available_action_matches_source_status() {
    for status in VisitStatus::ALL {
        if let Some(action) = VisitAction::available_for(status) {
            assert_eq!(action.source(), status);
        } else {
            assert_eq!(status, VisitStatus::Completed);
        }
    }
}

#[test]
fn only_journey_and_arrival_touch_tracking() {
    let starts: Vec<_> = ACTIONS.iter().filter(|a| a.starts_tracking()).collect();
    let stops: Vec<_> = ACTIONS.iter().filter(|a| a.stops_tracking()).collect();
    assert_eq!(starts, vec![&VisitAction::StartJourney]);
    assert_eq!(stops, vec![&VisitAction::MarkArrived]);
}

#[test]
fn invalid_transition_message_names_action_and_status() {
    let err = apply_action(VisitStatus::Scheduled, VisitAction::MarkArrived).expect_err("skip");
    assert_eq!(err.to_string(), "Cannot Mark Arrived while the visit is Scheduled.");
}

// =============================================================
// Status updates
// =============================================================

#[test]
fn begin_status_update_rejects_unknown_visit_and_skips() {
    let mut state = state_with(vec![visit("v-1", VisitStatus::Scheduled)]);
    assert_eq!(
        state.begin_status_update("nope", VisitAction::StartPreparing, ""),
        Err(TransitionError::UnknownVisit)
    );
    assert!(state.begin_status_update("v-1", VisitAction::StartJourney, "").is_err());
    assert!(!state.is_updating("v-1"));
}

#[test]
fn successful_update_replaces_status_and_timeline() {
    let mut state = state_with(vec![visit("v-1", VisitStatus::Scheduled)]);
    let pending = state
        .begin_status_update("v-1", VisitAction::StartPreparing, "  packing kit ")
        .expect("valid");
    assert_eq!(pending.status, VisitStatus::Preparing);
    assert_eq!(pending.notes, "packing kit");
    assert!(pending.location.is_none());
    assert!(state.is_updating("v-1"));

    assert!(state.apply_status_response(&pending, server_visit("v-1", VisitStatus::Preparing)));
    let v = state.visit("v-1").expect("visit");
    assert_eq!(v.status, VisitStatus::Preparing);
    assert_eq!(v.timeline.len(), 1);
    assert!(!state.is_updating("v-1"));
}

#[test]
fn failed_update_keeps_visit_and_surfaces_error() {
    let mut state = state_with(vec![visit("v-1", VisitStatus::Arrived)]);
    let pending = state
        .begin_status_update("v-1", VisitAction::StartAssessment, "")
        .expect("valid");
    assert!(state.fail_status_update(&pending, "Server down".to_owned()));
    assert_eq!(state.visit("v-1").expect("visit").status, VisitStatus::Arrived);
    assert_eq!(state.error.as_deref(), Some("Server down"));
}

#[test]
fn stale_status_response_does_not_overwrite_newer_one() {
    let mut state = state_with(vec![visit("v-1", VisitStatus::Scheduled)]);
    let first = state
        .begin_status_update("v-1", VisitAction::StartPreparing, "first")
        .expect("valid");
    let second = state
        .begin_status_update("v-1", VisitAction::StartPreparing, "second")
        .expect("valid");

    assert!(state.apply_status_response(&second, server_visit("v-1", VisitStatus::Preparing)));
    let mut stale = server_visit("v-1", VisitStatus::Scheduled);
    stale.timeline.clear();
    assert!(!state.apply_status_response(&first, stale));
    assert!(!state.fail_status_update(&first, "late".to_owned()));

    let v = state.visit("v-1").expect("visit");
    assert_eq!(v.status, VisitStatus::Preparing);
    assert_eq!(v.timeline.len(), 1);
    assert!(state.error.is_none());
}

#[test]
fn status_update_carries_location_of_tracked_visit_only() {
    let mut state = state_with(vec![visit("v-1", VisitStatus::EnRoute), visit("v-2", VisitStatus::Scheduled)]);
    state.select_for_tracking("v-1");
    assert!(state.record_location("v-1", sample(5.0)));

    let tracked = state.begin_status_update("v-1", VisitAction::MarkArrived, "").expect("valid");
    assert_eq!(tracked.location, Some(sample(5.0)));

    let other = state.begin_status_update("v-2", VisitAction::StartPreparing, "").expect("valid");
    assert!(other.location.is_none());
}

// =============================================================
// Tracking bookkeeping
// =============================================================

#[test]
fn record_location_ignores_untracked_visits() {
    let mut state = state_with(vec![visit("v-1", VisitStatus::EnRoute), visit("v-2", VisitStatus::EnRoute)]);
    state.select_for_tracking("v-1");
    assert!(!state.record_location("v-2", sample(1.0)));
    assert!(state.current_location.is_none());

    assert!(state.record_location("v-1", sample(1.0)));
    assert_eq!(state.visit("v-1").and_then(|v| v.current_location), Some(sample(1.0)));
}

#[test]
fn selecting_new_visit_forgets_previous_fix() {
    let mut state = state_with(vec![visit("v-1", VisitStatus::EnRoute), visit("v-2", VisitStatus::EnRoute)]);
    state.select_for_tracking("v-1");
    state.record_location("v-1", sample(1.0));
    state.select_for_tracking("v-2");
    assert!(state.current_location.is_none());
    assert_eq!(state.selected_visit_id.as_deref(), Some("v-2"));
    assert!(state.visit("v-1").expect("visit").current_location.is_none());
}

#[test]
fn clear_tracking_drops_selection_and_location() {
    let mut state = state_with(vec![visit("v-1", VisitStatus::EnRoute)]);
    state.select_for_tracking("v-1");
    state.record_location("v-1", sample(1.0));
    state.clear_tracking();
    assert!(state.selected_visit_id.is_none());
    assert!(state.current_location.is_none());
    assert!(state.visit("v-1").expect("visit").current_location.is_none());
}

#[test]
fn tracking_failure_clears_and_reports() {
    let mut state = state_with(vec![visit("v-1", VisitStatus::EnRoute)]);
    state.select_for_tracking("v-1");
    state.tracking_failed("Location permission was denied.".to_owned());
    assert!(state.selected_visit_id.is_none());
    assert_eq!(state.error.as_deref(), Some("Location permission was denied."));
}

#[test]
fn refetch_without_tracked_visit_clears_selection() {
    let mut state = state_with(vec![visit("v-1", VisitStatus::EnRoute)]);
    state.select_for_tracking("v-1");
    state.set_visits(vec![visit("v-2", VisitStatus::Scheduled)]);
    assert!(state.selected_visit_id.is_none());
}
