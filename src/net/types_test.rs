use super::*;

// =============================================================
// VisitStatus
// =============================================================

#[test]
fn visit_status_wire_names_are_snake_case() {
    for status in VisitStatus::ALL {
        let encoded = serde_json::to_value(status).expect("encode");
        assert_eq!(encoded, serde_json::Value::String(status.as_str().to_owned()));
    }
}

#[test]
fn visit_status_order_matches_workflow() {
    assert!(VisitStatus::Scheduled < VisitStatus::EnRoute);
    assert!(VisitStatus::InProgress < VisitStatus::Completed);
}

// =============================================================
// Visit
// =============================================================

#[test]
fn visit_decodes_backend_payload() {
    let raw = serde_json::json!({
        "_id": "v-1",
        "title": "Workplace assessment",
        "assessmentType": "practical",
        "status": "en_route",
        "student": {"name": "Ana", "schoolId": "S-42", "phone": "+100"},
        "scheduledDate": "2026-10-20T09:00:00Z",
        "destination": {"name": "Acme GmbH", "address": "Main St 1"},
        "timeline": [
            {"status": "scheduled", "timestamp": "2026-10-01T08:00:00Z"},
            {"status": "en_route", "timestamp": "2026-10-20T08:30:00Z", "notes": "leaving",
             "location": {"latitude": 1.0, "longitude": 2.0}}
        ]
    });
    let visit: Visit = serde_json::from_value(raw).expect("visit");
    assert_eq!(visit.id, "v-1");
    assert_eq!(visit.status, VisitStatus::EnRoute);
    assert_eq!(visit.student.school_id, "S-42");
    assert_eq!(visit.timeline.len(), 2);
    let location = visit.timeline[1].location.expect("location");
    assert!((location.accuracy - 0.0).abs() < f64::EPSILON);
    assert!(visit.current_location.is_none());
}

#[test]
fn location_sample_serializes_without_client_timestamp() {
    let sample = LocationSample { latitude: 1.5, longitude: 2.5, accuracy: 8.0, timestamp_ms: 99.0 };
    let value = serde_json::to_value(sample).expect("encode");
    assert_eq!(value, serde_json::json!({"latitude": 1.5, "longitude": 2.5, "accuracy": 8.0}));
}

// =============================================================
// Attachments
// =============================================================

fn attachment(mime: &str) -> Attachment {
    Attachment {
        id: "a-1".to_owned(),
        original_name: "file".to_owned(),
        mime_type: mime.to_owned(),
        size: 10,
        description: String::new(),
        tags: Vec::new(),
        url: "/uploads/file".to_owned(),
        download_count: 0,
        last_downloaded_at: None,
    }
}

#[test]
fn attachment_previewable_for_images_and_pdf_only() {
    assert!(attachment("image/png").is_previewable());
    assert!(attachment("application/pdf").is_previewable());
    assert!(!attachment("application/zip").is_previewable());
}

#[test]
fn upload_response_merges_single_and_multiple_shapes() {
    let single: UploadResponse =
        serde_json::from_value(serde_json::json!({"attachment": attachment("image/png")})).expect("single");
    assert_eq!(single.into_attachments().len(), 1);

    let multiple: UploadResponse = serde_json::from_value(serde_json::json!({
        "message": "ok",
        "attachments": [attachment("image/png"), attachment("application/pdf")]
    }))
    .expect("multiple");
    assert_eq!(multiple.into_attachments().len(), 2);
}

#[test]
fn profile_picture_from_attachment_copies_id_and_url() {
    let picture = ProfilePicture::from(&attachment("image/jpeg"));
    assert_eq!(picture.attachment_id, "a-1");
    assert_eq!(picture.url, "/uploads/file");
}

// =============================================================
// Notifications
// =============================================================

#[test]
fn notification_kind_unknown_values_map_to_other() {
    let kind: NotificationKind = serde_json::from_str("\"system_maintenance\"").expect("kind");
    assert_eq!(kind, NotificationKind::Other);
    let kind: NotificationKind = serde_json::from_str("\"report_feedback\"").expect("kind");
    assert_eq!(kind, NotificationKind::ReportFeedback);
}

#[test]
fn notification_page_defaults_total_pages_to_one() {
    let page: NotificationPage = serde_json::from_value(serde_json::json!({
        "notifications": [{
            "_id": "n-1",
            "type": "new_report",
            "title": "Weekly report",
            "createdAt": "2026-10-18T10:00:00Z"
        }]
    }))
    .expect("page");
    assert_eq!(page.total_pages, 1);
    assert!(!page.notifications[0].read);
    assert_eq!(page.notifications[0].kind, NotificationKind::NewReport);
}

// =============================================================
// Homework
// =============================================================

#[test]
fn homework_page_accepts_populated_and_bare_students() {
    let page: HomeworkPage = serde_json::from_value(serde_json::json!({
        "homework": [{
            "_id": "h-1",
            "title": "Essay",
            "subject": "English",
            "dueDate": "2026-10-25T12:00:00Z",
            "assignedStudents": ["s-1", {"_id": "s-2", "name": "Lee"}],
            "submissionCount": 3,
            "maxPoints": 20
        }],
        "pagination": {"currentPage": 2, "totalPages": 4, "total": 31}
    }))
    .expect("page");
    let hw = &page.homework[0];
    assert!(hw.is_active);
    let ids: Vec<&str> = hw.assigned_students.iter().map(AssignedStudent::id).collect();
    assert_eq!(ids, vec!["s-1", "s-2"]);
    assert_eq!(page.pagination, Pagination { page: 2, total_pages: 4, total: 31 });
}

#[test]
fn homework_page_without_pagination_defaults_to_single_page() {
    let page: HomeworkPage = serde_json::from_value(serde_json::json!({"homework": []})).expect("page");
    assert_eq!(page.pagination, Pagination::default());
}
