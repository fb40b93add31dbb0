//! REST DTOs for the school backend.
//!
//! DESIGN
//! ======
//! These types mirror the backend's camelCase JSON. Records accept both `id`
//! and the document-store `_id` spelling so list and detail endpoints decode
//! the same way.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Visits
// =============================================================================

/// Workflow status of an assessment visit, in forward order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisitStatus {
    #[default]
    Scheduled,
    Preparing,
    EnRoute,
    Arrived,
    InProgress,
    Completed,
}

impl VisitStatus {
    /// Every status in workflow order.
    pub const ALL: [Self; 6] = [
        Self::Scheduled,
        Self::Preparing,
        Self::EnRoute,
        Self::Arrived,
        Self::InProgress,
        Self::Completed,
    ];

    /// Wire name, e.g. `"en_route"`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::Preparing => "preparing",
            Self::EnRoute => "en_route",
            Self::Arrived => "arrived",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Scheduled => "Scheduled",
            Self::Preparing => "Preparing",
            Self::EnRoute => "En Route",
            Self::Arrived => "Arrived",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
        }
    }
}

/// Student being visited.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentRef {
    pub name: String,
    #[serde(default)]
    pub school_id: String,
    #[serde(default)]
    pub phone: Option<String>,
}

/// Where the visit takes place.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Destination {
    pub name: String,
    #[serde(default)]
    pub address: String,
}

/// One device position fix.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LocationSample {
    pub latitude: f64,
    pub longitude: f64,
    /// Accuracy radius in meters.
    #[serde(default)]
    pub accuracy: f64,
    /// Fix time in milliseconds since the Unix epoch; client-side only.
    #[serde(skip_serializing, default)]
    pub timestamp_ms: f64,
}

/// A recorded status change.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TimelineEvent {
    pub status: VisitStatus,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub location: Option<LocationSample>,
}

/// A scheduled in-person assessment visit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Visit {
    #[serde(alias = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub assessment_type: String,
    #[serde(default)]
    pub status: VisitStatus,
    pub student: StudentRef,
    pub scheduled_date: DateTime<Utc>,
    pub destination: Destination,
    #[serde(default)]
    pub timeline: Vec<TimelineEvent>,
    #[serde(default)]
    pub current_location: Option<LocationSample>,
}

/// `GET /assessment-visits/active/teacher`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct VisitListResponse {
    #[serde(default)]
    pub visits: Vec<Visit>,
}

/// `PUT /assessment-visits/{id}/status`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct VisitResponse {
    pub visit: Visit,
}

// =============================================================================
// Attachments
// =============================================================================

/// A stored file record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    #[serde(alias = "_id")]
    pub id: String,
    pub original_name: String,
    pub mime_type: String,
    /// Size in bytes.
    pub size: u64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub url: String,
    #[serde(default)]
    pub download_count: u64,
    #[serde(default)]
    pub last_downloaded_at: Option<DateTime<Utc>>,
}

impl Attachment {
    /// Whether the browser can display this file inline.
    pub fn is_previewable(&self) -> bool {
        self.mime_type.starts_with("image/") || self.mime_type == "application/pdf"
    }
}

/// Response of the single and multiple upload endpoints.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct UploadResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub attachment: Option<Attachment>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

impl UploadResponse {
    /// All uploaded records regardless of which endpoint answered.
    pub fn into_attachments(self) -> Vec<Attachment> {
        let mut all = self.attachments;
        if let Some(single) = self.attachment {
            all.insert(0, single);
        }
        all
    }
}

/// `GET /attachments?relatedModel&relatedId`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct AttachmentListResponse {
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

/// Current profile picture reference.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePicture {
    pub attachment_id: String,
    pub url: String,
}

impl From<&Attachment> for ProfilePicture {
    fn from(value: &Attachment) -> Self {
        Self { attachment_id: value.id.clone(), url: value.url.clone() }
    }
}

// =============================================================================
// Notifications
// =============================================================================

/// Notification category.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    NewReport,
    ReportFeedback,
    FormSubmission,
    #[default]
    #[serde(other)]
    Other,
}

impl NotificationKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::NewReport => "New report",
            Self::ReportFeedback => "Report feedback",
            Self::FormSubmission => "Form submission",
            Self::Other => "Notice",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Self::NewReport => "📄",
            Self::ReportFeedback => "💬",
            Self::FormSubmission => "📝",
            Self::Other => "🔔",
        }
    }
}

/// One feed entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(rename = "type", default)]
    pub kind: NotificationKind,
    pub title: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

/// `GET /notifications?page&limit`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPage {
    #[serde(default)]
    pub notifications: Vec<Notification>,
    #[serde(default = "one")]
    pub total_pages: u32,
}

/// `GET /notifications/unread-count`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct UnreadCount {
    #[serde(default)]
    pub count: u32,
}

// =============================================================================
// Homework
// =============================================================================

/// Assigned student, either a bare id or a populated record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AssignedStudent {
    Id(String),
    Record {
        #[serde(alias = "_id")]
        id: String,
        #[serde(default)]
        name: Option<String>,
    },
}

impl AssignedStudent {
    pub fn id(&self) -> &str {
        match self {
            Self::Id(id) | Self::Record { id, .. } => id,
        }
    }
}

/// An assignment record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Homework {
    #[serde(alias = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub description: String,
    pub due_date: DateTime<Utc>,
    #[serde(default = "yes")]
    pub is_active: bool,
    #[serde(default)]
    pub assigned_students: Vec<AssignedStudent>,
    #[serde(default)]
    pub submission_count: u32,
    #[serde(default)]
    pub max_points: Option<f64>,
}

/// Pagination block returned with list endpoints.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    #[serde(alias = "currentPage", default = "one")]
    pub page: u32,
    #[serde(alias = "pages", default = "one")]
    pub total_pages: u32,
    #[serde(alias = "totalItems", default)]
    pub total: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self { page: 1, total_pages: 1, total: 0 }
    }
}

/// `GET /homework?page&limit&status`.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct HomeworkPage {
    #[serde(default)]
    pub homework: Vec<Homework>,
    #[serde(default)]
    pub pagination: Pagination,
}

fn one() -> u32 {
    1
}

fn yes() -> bool {
    true
}
