use chrono::{TimeZone, Utc};

use super::*;
use crate::net::types::NotificationKind;

/// In-memory stand-in for the notifications endpoints.
struct FakeServer {
    items: Vec<Notification>,
    page_size: usize,
}

impl FakeServer {
    fn with_unread(count: usize, page_size: usize) -> Self {
        let items = (0..count)
            .map(|i| Notification {
                id: format!("n-{i}"),
                kind: NotificationKind::NewReport,
                title: format!("Report {i}"),
                message: String::new(),
                read: false,
                created_at: Utc.with_ymd_and_hms(2026, 10, 1, 8, 0, 0).unwrap(),
            })
            .collect();
        Self { items, page_size }
    }

    fn page(&self, page: u32) -> NotificationPage {
        let start = (page as usize - 1) * self.page_size;
        let total_pages = self.items.len().div_ceil(self.page_size).max(1);
        NotificationPage {
            notifications: self.items.iter().skip(start).take(self.page_size).cloned().collect(),
            total_pages: u32::try_from(total_pages).expect("pages"),
        }
    }

    fn unread_count(&self) -> u32 {
        u32::try_from(self.items.iter().filter(|n| !n.read).count()).expect("count")
    }

    fn mark_read(&mut self, id: &str) {
        if let Some(n) = self.items.iter_mut().find(|n| n.id == id) {
            n.read = true;
        }
    }

    fn mark_all_read(&mut self) {
        for n in &mut self.items {
            n.read = true;
        }
    }
}

/// Refetch page and count the way the feed does after an invalidation.
fn refetch(state: &mut NotificationsState, server: &FakeServer) {
    let page_ticket = state.begin_page_fetch();
    let unread_ticket = state.begin_unread_fetch();
    assert!(state.apply_page(&page_ticket, server.page(state.page)));
    assert!(state.apply_unread(&unread_ticket, server.unread_count()));
}

// =============================================================
// Invalidation
// =============================================================

#[test]
fn mark_all_read_then_refetch_shows_zero_unread() {
    let mut server = FakeServer::with_unread(25, 20);
    let mut state = NotificationsState::default();
    refetch(&mut state, &server);
    assert_eq!(state.unread_count, Some(25));
    assert_eq!(state.unread_in_page(), 20);
    assert_eq!(state.total_pages, 2);

    let before = state.page_key();
    server.mark_all_read();
    state.invalidate();
    assert_ne!(state.page_key(), before);

    refetch(&mut state, &server);
    assert_eq!(state.unread_count, Some(0));
    assert_eq!(state.unread_in_page(), 0);
    assert!(!state.has_unread());
}

#[test]
fn mark_one_read_decrements_after_refetch() {
    let mut server = FakeServer::with_unread(3, 20);
    let mut state = NotificationsState::default();
    refetch(&mut state, &server);

    let unread_rev = state.unread_rev();
    server.mark_read("n-1");
    state.invalidate();
    assert_eq!(state.unread_rev(), unread_rev + 1);

    refetch(&mut state, &server);
    assert_eq!(state.unread_count, Some(2));
    assert!(state.notifications.iter().any(|n| n.id == "n-1" && n.read));
}

// =============================================================
// Paging and stale responses
// =============================================================

#[test]
fn page_response_from_before_invalidation_is_dropped() {
    let mut server = FakeServer::with_unread(2, 20);
    let mut state = NotificationsState::default();
    let stale = state.begin_page_fetch();
    let stale_page = server.page(1);

    server.mark_all_read();
    state.invalidate();
    let fresh = state.begin_page_fetch();
    assert!(state.apply_page(&fresh, server.page(1)));
    assert!(!state.apply_page(&stale, stale_page));
    assert_eq!(state.unread_in_page(), 0);
}

#[test]
fn failed_unread_fetch_keeps_previous_count() {
    let server = FakeServer::with_unread(4, 20);
    let mut state = NotificationsState::default();
    refetch(&mut state, &server);

    let ticket = state.begin_unread_fetch();
    state.abandon_unread(&ticket);
    assert_eq!(state.unread_count, Some(4));
    assert!(!state.apply_unread(&ticket, 0));
}

#[test]
fn set_page_clamps_to_total_pages() {
    let server = FakeServer::with_unread(45, 20);
    let mut state = NotificationsState::default();
    refetch(&mut state, &server);
    assert_eq!(state.total_pages, 3);
    assert!(!state.has_prev());
    assert!(state.has_next());

    state.set_page(7);
    assert_eq!(state.page, 3);
    assert!(!state.has_next());
    state.set_page(0);
    assert_eq!(state.page, 1);
}

#[test]
fn failed_page_fetch_surfaces_error_and_stops_loading() {
    let mut state = NotificationsState::default();
    let ticket = state.begin_page_fetch();
    assert!(state.loading);
    assert!(state.fail_page(&ticket, "Could not reach the server.".to_owned()));
    assert!(!state.loading);
    assert_eq!(state.error.as_deref(), Some("Could not reach the server."));
}
