//! User identity primitives.
//!
//! Users are owned by an external collaborator; this crate only needs a
//! stable identifier and a unique handle for lookups. Handle comparison is
//! case-insensitive, so `Handle` exposes a normalised lookup key alongside
//! the display form.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Validation errors raised by the identity constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    /// Handle was empty once trimmed.
    #[error("handle must not be empty")]
    EmptyHandle,
    /// Handle exceeds [`HANDLE_MAX`] characters.
    #[error("handle must be at most {max} characters")]
    HandleTooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// Handle contains characters outside `[A-Za-z0-9_]`.
    #[error("handle may only contain letters, numbers, or underscores")]
    HandleInvalidCharacters,
}

/// Stable user identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Wrap an existing UUID.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Generate a new random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for UserId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Maximum allowed handle length.
pub const HANDLE_MAX: usize = 32;

static HANDLE_RE: OnceLock<Regex> = OnceLock::new();

fn handle_regex() -> &'static Regex {
    HANDLE_RE.get_or_init(|| {
        // Length is enforced separately; this constrains allowed characters.
        Regex::new("^[A-Za-z0-9_]+$")
            .unwrap_or_else(|error| panic!("handle regex failed to compile: {error}"))
    })
}

/// User-facing handle, unique across the directory.
///
/// ## Invariants
/// - Non-empty, at most [`HANDLE_MAX`] characters, `[A-Za-z0-9_]` only.
/// - Lookup is case-insensitive; the display form preserves the original
///   casing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Handle(String);

impl Handle {
    /// Validate and construct a [`Handle`].
    pub fn new(handle: impl Into<String>) -> Result<Self, UserValidationError> {
        Self::from_owned(handle.into())
    }

    fn from_owned(handle: String) -> Result<Self, UserValidationError> {
        if handle.trim().is_empty() {
            return Err(UserValidationError::EmptyHandle);
        }
        if handle.chars().count() > HANDLE_MAX {
            return Err(UserValidationError::HandleTooLong { max: HANDLE_MAX });
        }
        if !handle_regex().is_match(&handle) {
            return Err(UserValidationError::HandleInvalidCharacters);
        }
        Ok(Self(handle))
    }

    /// Normalised key used for case-insensitive directory lookups.
    pub fn lookup_key(&self) -> String {
        self.0.to_lowercase()
    }

    /// Normalise arbitrary input the same way [`Handle::lookup_key`] does.
    pub fn normalise(input: &str) -> String {
        input.to_lowercase()
    }
}

impl AsRef<str> for Handle {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<Handle> for String {
    fn from(value: Handle) -> Self {
        value.0
    }
}

impl TryFrom<String> for Handle {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Directory record for a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    id: UserId,
    handle: Handle,
}

impl User {
    /// Build a [`User`] from validated components.
    pub fn new(id: UserId, handle: Handle) -> Self {
        Self { id, handle }
    }

    /// Fallible constructor validating the handle.
    pub fn with_handle(handle: impl Into<String>) -> Result<Self, UserValidationError> {
        Ok(Self::new(UserId::random(), Handle::new(handle)?))
    }

    /// Stable user identifier.
    pub fn id(&self) -> &UserId {
        &self.id
    }

    /// Unique user-facing handle.
    pub fn handle(&self) -> &Handle {
        &self.handle
    }
}
