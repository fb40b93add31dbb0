//! Signed-in session: auth token and cached user role.
//!
//! DESIGN
//! ======
//! The session is read from `localStorage` once in the app shell and then
//! passed down explicitly through context. Pages and widgets never look the
//! token up on their own.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use serde::{Deserialize, Serialize};

/// `localStorage` key written by the login flow.
pub const SESSION_STORAGE_KEY: &str = "fieldwork_session";

/// Role of the signed-in user.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Teacher,
    #[default]
    Student,
    Admin,
}

impl Role {
    /// Whether staff-only actions and columns are visible.
    pub fn is_staff(self) -> bool {
        matches!(self, Self::Teacher | Self::Admin)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Teacher => "Teacher",
            Self::Student => "Student",
            Self::Admin => "Admin",
        }
    }
}

/// The signed-in user as cached by the login flow.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub role: Role,
    /// Attachment id and URL of the current profile picture, if any.
    #[serde(default)]
    pub profile_picture: Option<crate::net::types::ProfilePicture>,
}

/// Auth token plus user, both optional until someone signs in.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: Option<String>,
    pub user: Option<SessionUser>,
}

impl Session {
    /// Load the session cached by the login flow.
    pub fn load() -> Self {
        crate::util::storage::load_json::<Self>(SESSION_STORAGE_KEY).unwrap_or_default()
    }

    /// True when both a token and a user are present.
    pub fn is_signed_in(&self) -> bool {
        self.token.as_deref().is_some_and(|t| !t.is_empty()) && self.user.is_some()
    }

    /// Role of the signed-in user; anonymous sessions are treated as students.
    pub fn role(&self) -> Role {
        self.user.as_ref().map_or(Role::Student, |u| u.role)
    }

    /// `Authorization` header value for REST calls.
    pub fn bearer(&self) -> Option<String> {
        self.token
            .as_deref()
            .filter(|t| !t.is_empty())
            .map(|t| format!("Bearer {t}"))
    }
}
