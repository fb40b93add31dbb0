//! Notification feed state: one page of notifications plus the unread count.
//!
//! DESIGN
//! ======
//! The page and the unread count are fetched separately. Each is keyed by a
//! revision counter; a successful mark-read bumps both revisions, which
//! invalidates the cached data and makes the page refetch. Responses carry
//! a [`Ticket`], so a slow response for an old revision or page is dropped.

#[cfg(test)]
#[path = "notifications_test.rs"]
mod notifications_test;

use crate::net::types::{Notification, NotificationPage};
use crate::util::request_seq::{RequestSeq, Ticket};

const PAGE_KEY: &str = "notifications-page";
const UNREAD_KEY: &str = "notifications-unread";

/// Identity of the page data to fetch; changes whenever it must be refetched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageKey {
    pub page: u32,
    pub rev: u64,
}

#[derive(Clone, Debug)]
pub struct NotificationsState {
    pub page: u32,
    pub total_pages: u32,
    pub notifications: Vec<Notification>,
    /// Server-side unread count; `None` until the first count arrives.
    pub unread_count: Option<u32>,
    pub loading: bool,
    pub error: Option<String>,
    page_rev: u64,
    unread_rev: u64,
    fetches: RequestSeq,
}

impl Default for NotificationsState {
    fn default() -> Self {
        Self {
            page: 1,
            total_pages: 1,
            notifications: Vec::new(),
            unread_count: None,
            loading: false,
            error: None,
            page_rev: 0,
            unread_rev: 0,
            fetches: RequestSeq::default(),
        }
    }
}

impl NotificationsState {
    pub fn page_key(&self) -> PageKey {
        PageKey { page: self.page, rev: self.page_rev }
    }

    pub fn unread_rev(&self) -> u64 {
        self.unread_rev
    }

    /// Discard cached page and count so both are fetched again.
    pub fn invalidate(&mut self) {
        self.page_rev += 1;
        self.unread_rev += 1;
    }

    /// Move to `page`, clamped to the known range.
    pub fn set_page(&mut self, page: u32) {
        self.page = page.clamp(1, self.total_pages.max(1));
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn begin_page_fetch(&mut self) -> Ticket {
        self.loading = true;
        self.fetches.begin(PAGE_KEY)
    }

    pub fn apply_page(&mut self, ticket: &Ticket, page: NotificationPage) -> bool {
        if !self.fetches.finish(ticket) {
            return false;
        }
        self.notifications = page.notifications;
        self.total_pages = page.total_pages.max(1);
        self.loading = false;
        self.error = None;
        true
    }

    pub fn fail_page(&mut self, ticket: &Ticket, message: String) -> bool {
        if !self.fetches.finish(ticket) {
            return false;
        }
        self.loading = false;
        self.error = Some(message);
        true
    }

    pub fn begin_unread_fetch(&mut self) -> Ticket {
        self.fetches.begin(UNREAD_KEY)
    }

    pub fn apply_unread(&mut self, ticket: &Ticket, count: u32) -> bool {
        if !self.fetches.finish(ticket) {
            return false;
        }
        self.unread_count = Some(count);
        true
    }

    /// Drop an unread fetch that failed; the badge keeps its last value.
    pub fn abandon_unread(&mut self, ticket: &Ticket) {
        self.fetches.finish(ticket);
    }

    /// Unread items on the current page.
    pub fn unread_in_page(&self) -> usize {
        self.notifications.iter().filter(|n| !n.read).count()
    }

    /// Whether "mark all as read" has anything to do.
    pub fn has_unread(&self) -> bool {
        self.unread_count.map_or_else(|| self.unread_in_page() > 0, |count| count > 0)
    }
}
