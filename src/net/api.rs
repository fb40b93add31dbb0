//! REST API helpers for communicating with the school backend.
//!
//! Client-side (hydrate): real HTTP calls via `gloo-net`.
//! Server-side (SSR) and native tests: stubs returning
//! [`ApiError::Unavailable`] since these endpoints are only meaningful in the
//! browser.
//!
//! ERROR HANDLING
//! ==============
//! Every helper returns `Result<_, ApiError>`; callers decide how a failure
//! degrades (keep staged files, leave visit state untouched, show a message).

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use super::error::ApiError;
use super::types::{Attachment, HomeworkPage, LocationSample, NotificationPage, Visit, VisitStatus};
use crate::config::ClientConfig;
use crate::state::homework::HomeworkFilter;
use crate::state::session::Session;
#[cfg(any(test, feature = "hydrate"))]
use crate::state::uploads::{UploadMetadata, UploadMode};

/// Bearer-authenticated client for the REST backend.
///
/// Built from the explicit config and session so no call reaches into
/// storage on its own.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiClient {
    base: String,
    #[cfg_attr(not(feature = "hydrate"), allow(dead_code))]
    bearer: Option<String>,
}

impl ApiClient {
    pub fn new(config: &ClientConfig, session: &Session) -> Self {
        Self { base: config.api_base.clone(), bearer: session.bearer() }
    }

    /// Absolute URL for a backend path beginning with `/`.
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base)
    }
}

// =============================================================================
// Paths and payloads
// =============================================================================

#[cfg(any(test, feature = "hydrate"))]
pub(crate) fn active_visits_path() -> &'static str {
    "/assessment-visits/active/teacher"
}

#[cfg(any(test, feature = "hydrate"))]
pub(crate) fn visit_location_path(visit_id: &str) -> String {
    format!("/assessment-visits/{visit_id}/location")
}

#[cfg(any(test, feature = "hydrate"))]
pub(crate) fn visit_status_path(visit_id: &str) -> String {
    format!("/assessment-visits/{visit_id}/status")
}

#[cfg(any(test, feature = "hydrate"))]
pub(crate) fn upload_path(mode: UploadMode, upload_type: &str) -> String {
    let kind = match mode {
        UploadMode::Single => "single",
        UploadMode::Multiple => "multiple",
    };
    format!("/attachments/upload/{kind}/{upload_type}")
}

#[cfg(any(test, feature = "hydrate"))]
pub(crate) fn attachment_download_path(attachment_id: &str) -> String {
    format!("/attachments/{attachment_id}/download")
}

#[cfg(any(test, feature = "hydrate"))]
pub(crate) fn attachment_path(attachment_id: &str) -> String {
    format!("/attachments/{attachment_id}")
}

#[cfg(any(test, feature = "hydrate"))]
pub(crate) fn attachment_list_path(related_model: &str, related_id: &str) -> String {
    format!(
        "/attachments?relatedModel={}&relatedId={}",
        urlencoding::encode(related_model),
        urlencoding::encode(related_id)
    )
}

#[cfg(any(test, feature = "hydrate"))]
pub(crate) fn notifications_path(page: u32, limit: u32) -> String {
    format!("/notifications?page={page}&limit={limit}")
}

#[cfg(any(test, feature = "hydrate"))]
pub(crate) fn notification_read_path(notification_id: &str) -> String {
    format!("/notifications/{notification_id}/read")
}

#[cfg(any(test, feature = "hydrate"))]
pub(crate) fn homework_path(page: u32, limit: u32, filter: HomeworkFilter) -> String {
    match filter.as_query() {
        Some(status) => format!("/homework?page={page}&limit={limit}&status={status}"),
        None => format!("/homework?page={page}&limit={limit}"),
    }
}

#[cfg(any(test, feature = "hydrate"))]
fn location_body(sample: &LocationSample) -> serde_json::Value {
    serde_json::json!({
        "latitude": sample.latitude,
        "longitude": sample.longitude,
        "accuracy": sample.accuracy,
    })
}

#[cfg(any(test, feature = "hydrate"))]
fn status_body(status: VisitStatus, notes: &str, location: Option<&LocationSample>) -> serde_json::Value {
    serde_json::json!({
        "status": status.as_str(),
        "notes": notes,
        "location": location.map(location_body),
    })
}

/// Text fields sent alongside uploaded files.
#[cfg(any(test, feature = "hydrate"))]
fn upload_form_fields(upload_type: &str, meta: &UploadMetadata) -> Vec<(&'static str, String)> {
    let mut fields = vec![
        ("uploadType", upload_type.to_owned()),
        ("description", meta.description.trim().to_owned()),
        ("tags", meta.tags.join(",")),
        ("isPublic", meta.is_public.to_string()),
    ];
    if let Some(model) = meta.related_model.as_deref() {
        fields.push(("relatedModel", model.to_owned()));
    }
    if let Some(id) = meta.related_id.as_deref() {
        fields.push(("relatedId", id.to_owned()));
    }
    fields
}

// =============================================================================
// Transport
// =============================================================================

#[cfg(feature = "hydrate")]
impl ApiClient {
    fn authorized(&self, builder: gloo_net::http::RequestBuilder) -> gloo_net::http::RequestBuilder {
        match self.bearer.as_deref() {
            Some(bearer) => builder.header("Authorization", bearer),
            None => builder,
        }
    }

    async fn send(&self, request: gloo_net::http::Request) -> Result<gloo_net::http::Response, ApiError> {
        let resp = request.send().await.map_err(|e| ApiError::Network(e.to_string()))?;
        if resp.ok() {
            return Ok(resp);
        }
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        Err(ApiError::from_status(status, &body))
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let request = self
            .authorized(gloo_net::http::Request::get(&self.url(path)))
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;
        let resp = self.send(request).await?;
        resp.json::<T>().await.map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn put_json(&self, path: &str, body: &serde_json::Value) -> Result<gloo_net::http::Response, ApiError> {
        let request = self
            .authorized(gloo_net::http::Request::put(&self.url(path)))
            .json(body)
            .map_err(|e| ApiError::Network(e.to_string()))?;
        self.send(request).await
    }
}

// =============================================================================
// Visits
// =============================================================================

impl ApiClient {
    /// Fetch the teacher's active visits.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] when the request fails or the body does not decode.
    pub async fn fetch_active_visits(&self) -> Result<Vec<Visit>, ApiError> {
        #[cfg(feature = "hydrate")]
        {
            let body: super::types::VisitListResponse = self.get_json(active_visits_path()).await?;
            Ok(body.visits)
        }
        #[cfg(not(feature = "hydrate"))]
        {
            Err(ApiError::Unavailable)
        }
    }

    /// Persist one location sample for a visit.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] when the request fails.
    pub async fn update_visit_location(&self, visit_id: &str, sample: &LocationSample) -> Result<(), ApiError> {
        #[cfg(feature = "hydrate")]
        {
            self.put_json(&visit_location_path(visit_id), &location_body(sample)).await?;
            Ok(())
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (visit_id, sample);
            Err(ApiError::Unavailable)
        }
    }

    /// Move a visit to `status`, returning the server's updated visit.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] when the request fails or the body does not decode.
    pub async fn update_visit_status(
        &self,
        visit_id: &str,
        status: VisitStatus,
        notes: &str,
        location: Option<&LocationSample>,
    ) -> Result<Visit, ApiError> {
        #[cfg(feature = "hydrate")]
        {
            let resp = self
                .put_json(&visit_status_path(visit_id), &status_body(status, notes, location))
                .await?;
            let body: super::types::VisitResponse = resp.json().await.map_err(|e| ApiError::Decode(e.to_string()))?;
            Ok(body.visit)
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (visit_id, status, notes, location);
            Err(ApiError::Unavailable)
        }
    }
}

// =============================================================================
// Attachments
// =============================================================================

impl ApiClient {
    /// Upload one or more files as a single multipart request.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] when the form cannot be built, the request
    /// fails, or the body does not decode.
    #[cfg(feature = "hydrate")]
    pub async fn upload_files(
        &self,
        mode: UploadMode,
        upload_type: &str,
        files: &[web_sys::File],
        meta: &UploadMetadata,
    ) -> Result<super::types::UploadResponse, ApiError> {
        let form = web_sys::FormData::new().map_err(|_| ApiError::Network("FormData unavailable".to_owned()))?;
        let field = match mode {
            UploadMode::Single => "file",
            UploadMode::Multiple => "files",
        };
        for file in files {
            form.append_with_blob_and_filename(field, file, &file.name())
                .map_err(|_| ApiError::Network("could not attach file".to_owned()))?;
        }
        for (name, value) in upload_form_fields(upload_type, meta) {
            form.append_with_str(name, &value)
                .map_err(|_| ApiError::Network("could not attach field".to_owned()))?;
        }
        let request = self
            .authorized(gloo_net::http::Request::post(&self.url(&upload_path(mode, upload_type))))
            .body(form)
            .map_err(|e| ApiError::Network(e.to_string()))?;
        let resp = self.send(request).await?;
        resp.json().await.map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Fetch an attachment's bytes.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] when the request fails.
    pub async fn download_attachment(&self, attachment_id: &str) -> Result<Vec<u8>, ApiError> {
        #[cfg(feature = "hydrate")]
        {
            let request = self
                .authorized(gloo_net::http::Request::get(&self.url(&attachment_download_path(attachment_id))))
                .build()
                .map_err(|e| ApiError::Network(e.to_string()))?;
            let resp = self.send(request).await?;
            resp.binary().await.map_err(|e| ApiError::Decode(e.to_string()))
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = attachment_id;
            Err(ApiError::Unavailable)
        }
    }

    /// Delete an attachment.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] when the request fails.
    pub async fn delete_attachment(&self, attachment_id: &str) -> Result<(), ApiError> {
        #[cfg(feature = "hydrate")]
        {
            let request = self
                .authorized(gloo_net::http::Request::delete(&self.url(&attachment_path(attachment_id))))
                .build()
                .map_err(|e| ApiError::Network(e.to_string()))?;
            self.send(request).await?;
            Ok(())
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = attachment_id;
            Err(ApiError::Unavailable)
        }
    }

    /// List attachments linked to an entity.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] when the request fails or the body does not decode.
    pub async fn list_attachments(&self, related_model: &str, related_id: &str) -> Result<Vec<Attachment>, ApiError> {
        #[cfg(feature = "hydrate")]
        {
            let body: super::types::AttachmentListResponse =
                self.get_json(&attachment_list_path(related_model, related_id)).await?;
            Ok(body.attachments)
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (related_model, related_id);
            Err(ApiError::Unavailable)
        }
    }
}

// =============================================================================
// Notifications
// =============================================================================

impl ApiClient {
    /// Fetch one page of notifications.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] when the request fails or the body does not decode.
    pub async fn fetch_notifications(&self, page: u32, limit: u32) -> Result<NotificationPage, ApiError> {
        #[cfg(feature = "hydrate")]
        {
            self.get_json(&notifications_path(page, limit)).await
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (page, limit);
            Err(ApiError::Unavailable)
        }
    }

    /// Fetch the number of unread notifications.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] when the request fails or the body does not decode.
    pub async fn fetch_unread_count(&self) -> Result<u32, ApiError> {
        #[cfg(feature = "hydrate")]
        {
            let body: super::types::UnreadCount = self.get_json("/notifications/unread-count").await?;
            Ok(body.count)
        }
        #[cfg(not(feature = "hydrate"))]
        {
            Err(ApiError::Unavailable)
        }
    }

    /// Mark one notification as read.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] when the request fails.
    pub async fn mark_notification_read(&self, notification_id: &str) -> Result<(), ApiError> {
        #[cfg(feature = "hydrate")]
        {
            self.put_json(&notification_read_path(notification_id), &serde_json::json!({}))
                .await?;
            Ok(())
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = notification_id;
            Err(ApiError::Unavailable)
        }
    }

    /// Mark every notification as read.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] when the request fails.
    pub async fn mark_all_notifications_read(&self) -> Result<(), ApiError> {
        #[cfg(feature = "hydrate")]
        {
            self.put_json("/notifications/mark-all-read", &serde_json::json!({}))
                .await?;
            Ok(())
        }
        #[cfg(not(feature = "hydrate"))]
        {
            Err(ApiError::Unavailable)
        }
    }
}

// =============================================================================
// Homework
// =============================================================================

impl ApiClient {
    /// Fetch one page of homework filtered by status on the server.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] when the request fails or the body does not decode.
    pub async fn fetch_homework(&self, page: u32, limit: u32, filter: HomeworkFilter) -> Result<HomeworkPage, ApiError> {
        #[cfg(feature = "hydrate")]
        {
            self.get_json(&homework_path(page, limit, filter)).await
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (page, limit, filter);
            Err(ApiError::Unavailable)
        }
    }
}
