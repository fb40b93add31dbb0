//! Visit tracker state: the teacher's active visits and their workflow.
//!
//! SYSTEM CONTEXT
//! ==============
//! Visits advance one status at a time through named actions. A status update
//! is sequence-stamped per visit, so when two updates overlap only the newest
//! response is applied. Failures leave the visit untouched and surface an
//! error message.

#[cfg(test)]
#[path = "visits_test.rs"]
mod visits_test;

use crate::net::types::{LocationSample, Visit, VisitStatus};
use crate::util::request_seq::{RequestSeq, Ticket};

/// A teacher-triggered workflow step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VisitAction {
    StartPreparing,
    StartJourney,
    MarkArrived,
    StartAssessment,
    Complete,
}

impl VisitAction {
    /// Status the action must be applied from.
    pub fn source(self) -> VisitStatus {
        match self {
            Self::StartPreparing => VisitStatus::Scheduled,
            Self::StartJourney => VisitStatus::Preparing,
            Self::MarkArrived => VisitStatus::EnRoute,
            Self::StartAssessment => VisitStatus::Arrived,
            Self::Complete => VisitStatus::InProgress,
        }
    }

    /// Status the action moves the visit to.
    pub fn target(self) -> VisitStatus {
        match self {
            Self::StartPreparing => VisitStatus::Preparing,
            Self::StartJourney => VisitStatus::EnRoute,
            Self::MarkArrived => VisitStatus::Arrived,
            Self::StartAssessment => VisitStatus::InProgress,
            Self::Complete => VisitStatus::Completed,
        }
    }

    /// The single action offered for a visit in `status`.
    pub fn available_for(status: VisitStatus) -> Option<Self> {
        match status {
            VisitStatus::Scheduled => Some(Self::StartPreparing),
            VisitStatus::Preparing => Some(Self::StartJourney),
            VisitStatus::EnRoute => Some(Self::MarkArrived),
            VisitStatus::Arrived => Some(Self::StartAssessment),
            VisitStatus::InProgress => Some(Self::Complete),
            VisitStatus::Completed => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::StartPreparing => "Start Preparing",
            Self::StartJourney => "Start Journey",
            Self::MarkArrived => "Mark Arrived",
            Self::StartAssessment => "Start Assessment",
            Self::Complete => "Complete Visit",
        }
    }

    /// Whether a successful update starts location tracking.
    pub fn starts_tracking(self) -> bool {
        matches!(self, Self::StartJourney)
    }

    /// Whether a successful update stops location tracking.
    pub fn stops_tracking(self) -> bool {
        matches!(self, Self::MarkArrived)
    }
}

/// Rejected workflow step.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error("Visit not found.")]
    UnknownVisit,
    #[error("Cannot {action} while the visit is {current}.", action = .action.label(), current = .current.label())]
    InvalidTransition { current: VisitStatus, action: VisitAction },
}

/// Apply `action` to `current`, rejecting any step that is not the next one.
///
/// # Errors
///
/// Returns [`TransitionError::InvalidTransition`] when `current` is not the action's source.
pub fn apply_action(current: VisitStatus, action: VisitAction) -> Result<VisitStatus, TransitionError> {
    if current != action.source() {
        return Err(TransitionError::InvalidTransition { current, action });
    }
    Ok(action.target())
}

/// A validated status update waiting for its response.
#[derive(Clone, Debug, PartialEq)]
pub struct PendingStatusUpdate {
    pub ticket: Ticket,
    pub visit_id: String,
    pub action: VisitAction,
    pub status: VisitStatus,
    pub notes: String,
    pub location: Option<LocationSample>,
}

/// State for the visit tracker page.
#[derive(Clone, Debug, Default)]
pub struct VisitsState {
    pub visits: Vec<Visit>,
    pub loading: bool,
    /// Last user-facing error (fetch, status update, or device).
    pub error: Option<String>,
    /// Visit selected for tracking; set while en route.
    pub selected_visit_id: Option<String>,
    /// Latest device fix for the selected visit.
    pub current_location: Option<LocationSample>,
    updates: RequestSeq,
}

fn status_key(visit_id: &str) -> String {
    format!("status:{visit_id}")
}

impl VisitsState {
    pub fn visit(&self, visit_id: &str) -> Option<&Visit> {
        self.visits.iter().find(|v| v.id == visit_id)
    }

    /// Replace the visit list after a fetch.
    pub fn set_visits(&mut self, visits: Vec<Visit>) {
        self.visits = visits;
        self.loading = false;
        if let Some(selected) = self.selected_visit_id.as_deref() {
            if self.visit(selected).is_none() {
                self.clear_tracking();
            }
        }
    }

    /// Validate `action` and stamp a status update for it.
    ///
    /// # Errors
    ///
    /// Returns a [`TransitionError`] when the visit is unknown or the action is
    /// not the next step; no request should be sent in that case.
    pub fn begin_status_update(
        &mut self,
        visit_id: &str,
        action: VisitAction,
        notes: &str,
    ) -> Result<PendingStatusUpdate, TransitionError> {
        let current = self.visit(visit_id).ok_or(TransitionError::UnknownVisit)?.status;
        let status = apply_action(current, action)?;
        let location = if self.selected_visit_id.as_deref() == Some(visit_id) {
            self.current_location
        } else {
            None
        };
        let ticket = self.updates.begin(&status_key(visit_id));
        Ok(PendingStatusUpdate {
            ticket,
            visit_id: visit_id.to_owned(),
            action,
            status,
            notes: notes.trim().to_owned(),
            location,
        })
    }

    /// Whether a status update for `visit_id` is in flight.
    pub fn is_updating(&self, visit_id: &str) -> bool {
        self.updates.is_pending(&status_key(visit_id))
    }

    /// Apply the server's visit for a finished update. Stale responses are dropped.
    pub fn apply_status_response(&mut self, pending: &PendingStatusUpdate, visit: Visit) -> bool {
        if !self.updates.finish(&pending.ticket) {
            return false;
        }
        if let Some(existing) = self.visits.iter_mut().find(|v| v.id == pending.visit_id) {
            existing.status = visit.status;
            existing.timeline = visit.timeline;
        }
        self.error = None;
        true
    }

    /// Record a failed update without touching the visit. Stale failures are dropped.
    pub fn fail_status_update(&mut self, pending: &PendingStatusUpdate, message: String) -> bool {
        if !self.updates.finish(&pending.ticket) {
            return false;
        }
        self.error = Some(message);
        true
    }

    /// Mark `visit_id` as the tracked visit and forget any previous fix,
    /// including the one shown on the previously tracked visit.
    pub fn select_for_tracking(&mut self, visit_id: &str) {
        self.clear_tracking();
        self.selected_visit_id = Some(visit_id.to_owned());
    }

    /// Record a fix for the tracked visit. Fixes for any other visit are ignored.
    pub fn record_location(&mut self, visit_id: &str, sample: LocationSample) -> bool {
        if self.selected_visit_id.as_deref() != Some(visit_id) {
            return false;
        }
        self.current_location = Some(sample);
        if let Some(visit) = self.visits.iter_mut().find(|v| v.id == visit_id) {
            visit.current_location = Some(sample);
        }
        true
    }

    /// Forget the tracked visit and its location.
    pub fn clear_tracking(&mut self) {
        if let Some(visit_id) = self.selected_visit_id.take() {
            if let Some(visit) = self.visits.iter_mut().find(|v| v.id == visit_id) {
                visit.current_location = None;
            }
        }
        self.current_location = None;
    }

    /// Stop tracking after a device error and show it.
    pub fn tracking_failed(&mut self, message: String) {
        self.clear_tracking();
        self.error = Some(message);
    }
}
