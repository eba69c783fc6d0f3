//! Park administrator model.

use serde::{Deserialize, Serialize};

use super::AdminId;
use super::guest::default_email;

/// Serde default for [`Admin::name`].
fn default_name() -> String {
    "Unknown Admin".to_owned()
}

/// A staff member allowed to manage the park.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Admin {
    /// Unique identifier.
    id: AdminId,
    /// Display name.
    #[serde(default = "default_name")]
    name: String,
    /// Login email.
    #[serde(default = "default_email")]
    email: String,
}

impl Admin {
    /// Creates an admin record.
    #[inline]
    #[must_use]
    pub fn new<N: Into<String>, E: Into<String>>(id: AdminId, name: N, email: E) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
        }
    }

    /// Returns the admin's identifier.
    #[inline]
    #[must_use]
    pub const fn id(&self) -> AdminId {
        self.id
    }

    /// Returns the admin's name.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the admin's email.
    #[inline]
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Returns `true` if `email` and `id` identify this admin.
    ///
    /// Email comparison ignores ASCII case.
    #[inline]
    #[must_use]
    pub fn matches_login(&self, email: &str, id: AdminId) -> bool {
        self.id == id && self.email.eq_ignore_ascii_case(email.trim())
    }
}
