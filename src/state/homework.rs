//! Homework list state: server filter, client search, derived due status.

#[cfg(test)]
#[path = "homework_test.rs"]
mod homework_test;

use chrono::{DateTime, Duration, Utc};

use crate::net::types::{Homework, HomeworkPage, Pagination};
use crate::util::request_seq::{RequestSeq, Ticket};

/// Server-side status filter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum HomeworkFilter {
    #[default]
    Active,
    Inactive,
    All,
}

impl HomeworkFilter {
    pub const ALL: [Self; 3] = [Self::Active, Self::Inactive, Self::All];

    /// `status` query value; `None` omits the parameter.
    pub fn as_query(self) -> Option<&'static str> {
        match self {
            Self::Active => Some("active"),
            Self::Inactive => Some("inactive"),
            Self::All => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Inactive => "Inactive",
            Self::All => "All",
        }
    }

    /// Parse a `<select>` value produced by [`HomeworkFilter::key`].
    pub fn from_key(key: &str) -> Self {
        match key {
            "inactive" => Self::Inactive,
            "all" => Self::All,
            _ => Self::Active,
        }
    }

    pub fn key(self) -> &'static str {
        self.as_query().unwrap_or("all")
    }
}

/// Display status derived from activity and due date.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DueStatus {
    Inactive,
    Overdue,
    DueSoon,
    Active,
}

impl DueStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::Inactive => "Inactive",
            Self::Overdue => "Overdue",
            Self::DueSoon => "Due Soon",
            Self::Active => "Active",
        }
    }

    pub fn color_class(self) -> &'static str {
        match self {
            Self::Inactive => "status-badge status-badge--gray",
            Self::Overdue => "status-badge status-badge--red",
            Self::DueSoon => "status-badge status-badge--yellow",
            Self::Active => "status-badge status-badge--green",
        }
    }
}

/// Window before the due date in which an item reads "Due Soon".
pub const DUE_SOON_HOURS: i64 = 24;

/// Derive the display status of `homework` at `now`.
pub fn due_status(homework: &Homework, now: DateTime<Utc>) -> DueStatus {
    if !homework.is_active {
        return DueStatus::Inactive;
    }
    if homework.due_date < now {
        return DueStatus::Overdue;
    }
    if homework.due_date - now <= Duration::hours(DUE_SOON_HOURS) {
        return DueStatus::DueSoon;
    }
    DueStatus::Active
}

/// Case-insensitive substring match over title, subject and description.
pub fn matches_search(homework: &Homework, query: &str) -> bool {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    [&homework.title, &homework.subject, &homework.description]
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

const PAGE_KEY: &str = "homework-page";

/// Page state for the homework list.
#[derive(Clone, Debug)]
pub struct HomeworkState {
    pub items: Vec<Homework>,
    pub pagination: Pagination,
    pub page: u32,
    pub filter: HomeworkFilter,
    pub search: String,
    pub loading: bool,
    pub error: Option<String>,
    fetches: RequestSeq,
}

impl Default for HomeworkState {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            pagination: Pagination::default(),
            page: 1,
            filter: HomeworkFilter::default(),
            search: String::new(),
            loading: false,
            error: None,
            fetches: RequestSeq::default(),
        }
    }
}

impl HomeworkState {
    /// Items passing the client-side search.
    pub fn visible(&self) -> Vec<&Homework> {
        self.items.iter().filter(|h| matches_search(h, &self.search)).collect()
    }

    /// Change the server filter; goes back to the first page.
    pub fn set_filter(&mut self, filter: HomeworkFilter) {
        if self.filter != filter {
            self.filter = filter;
            self.page = 1;
        }
    }

    /// Move to `page`, clamped to the known page range.
    pub fn set_page(&mut self, page: u32) {
        self.page = page.clamp(1, self.pagination.total_pages.max(1));
    }

    pub fn begin_fetch(&mut self) -> Ticket {
        self.loading = true;
        self.fetches.begin(PAGE_KEY)
    }

    /// Apply a page response unless a newer fetch has started since.
    pub fn apply_page(&mut self, ticket: &Ticket, page: HomeworkPage) -> bool {
        if !self.fetches.finish(ticket) {
            return false;
        }
        self.items = page.homework;
        self.pagination = page.pagination;
        self.loading = false;
        self.error = None;
        true
    }

    pub fn fail_fetch(&mut self, ticket: &Ticket, message: String) -> bool {
        if !self.fetches.finish(ticket) {
            return false;
        }
        self.loading = false;
        self.error = Some(message);
        true
    }
}
