//! Change authors
//!
//! Provides [`Author`], parsed from and rendered as `Name <email>`.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Author of an origin change
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Author {
    name: String,
    email: String,
}

impl Author {
    /// Create new author
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }

    /// Display name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Email address (may be empty)
    #[inline]
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }
}

impl Display for Author {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} <{}>", self.name, self.email)
    }
}

impl FromStr for Author {
    type Err = AuthorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let open = s.find('<').ok_or_else(|| AuthorError::Malformed(s.to_string()))?;
        if !s.ends_with('>') || open + 1 > s.len() - 1 {
            return Err(AuthorError::Malformed(s.to_string()));
        }

        let name = s[..open].trim();
        if name.is_empty() {
            return Err(AuthorError::EmptyName);
        }
        let email = s[open + 1..s.len() - 1].trim();

        Ok(Self::new(name, email))
    }
}

/// Errors parsing an [`Author`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthorError {
    /// Not in `Name <email>` form
    #[error("author '{0}' doesn't match 'Name <email>'")]
    Malformed(String),

    /// Name part is blank
    #[error("author name cannot be empty")]
    EmptyName,
}
