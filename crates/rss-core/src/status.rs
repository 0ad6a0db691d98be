//! # Status Names and the Configured Vocabulary
//!
//! A [`Status`] is the operational state of a grid element (`Active`,
//! `Banned`, ...). The set of recognized statuses is deployment configuration,
//! so `Status` wraps a string rather than enumerating variants. Two sentinel
//! outcomes exist outside any configuration: `Unknown` (the policy could not
//! tell) and `Error` (the policy failed to evaluate).
//!
//! [`StatusVocabulary`] is the configured list, most restrictive first.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A validated, non-empty status name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Status(String);

impl Status {
    /// Name of the "no information" sentinel.
    pub const UNKNOWN: &'static str = "Unknown";
    /// Name of the "policy failed" sentinel.
    pub const ERROR: &'static str = "Error";

    /// Create a status from a name. Surrounding whitespace is trimmed.
    pub fn new(name: impl Into<String>) -> Result<Self, ValidationError> {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyStatus);
        }
        if trimmed.len() == name.len() {
            Ok(Self(name))
        } else {
            Ok(Self(trimmed.to_string()))
        }
    }

    /// Wrap a literal known to be a valid name.
    pub(crate) fn from_static(name: &'static str) -> Self {
        Self(name.to_string())
    }

    /// The `Unknown` sentinel.
    pub fn unknown() -> Self {
        Self(Self::UNKNOWN.to_string())
    }

    /// The `Error` sentinel.
    pub fn error() -> Self {
        Self(Self::ERROR.to_string())
    }

    /// Access the status name.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is the `Unknown` sentinel.
    pub fn is_unknown(&self) -> bool {
        self.0 == Self::UNKNOWN
    }

    /// Whether this is the `Error` sentinel.
    pub fn is_error(&self) -> bool {
        self.0 == Self::ERROR
    }

    /// Whether this is one of the two sentinel outcomes.
    pub fn is_sentinel(&self) -> bool {
        self.is_unknown() || self.is_error()
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Status {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Status {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for Status {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Status> for String {
    fn from(status: Status) -> Self {
        status.0
    }
}

impl std::str::FromStr for Status {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

// ---------------------------------------------------------------------------
// StatusVocabulary
// ---------------------------------------------------------------------------

/// The externally configured set of valid statuses, most restrictive first.
///
/// The vocabulary never contains the sentinels; use [`StatusVocabulary::admits`]
/// to test whether a policy is allowed to report a status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Status>", into = "Vec<Status>")]
pub struct StatusVocabulary {
    statuses: Vec<Status>,
}

impl StatusVocabulary {
    /// Build a vocabulary from an ordered list (most restrictive first).
    pub fn new(statuses: Vec<Status>) -> Result<Self, ValidationError> {
        if statuses.is_empty() {
            return Err(ValidationError::EmptyVocabulary);
        }
        for (i, status) in statuses.iter().enumerate() {
            if status.is_sentinel() {
                return Err(ValidationError::SentinelInVocabulary(
                    status.as_str().to_string(),
                ));
            }
            if statuses[..i].contains(status) {
                return Err(ValidationError::DuplicateStatus(status.as_str().to_string()));
            }
        }
        Ok(Self { statuses })
    }

    /// The vocabulary shipped with the reference configuration:
    /// `Banned`, `Probing`, `Degraded`, `Active`.
    pub fn standard() -> Self {
        Self {
            statuses: ["Banned", "Probing", "Degraded", "Active"]
                .into_iter()
                .map(Status::from_static)
                .collect(),
        }
    }

    /// Iterate the statuses, most restrictive first.
    pub fn iter(&self) -> impl Iterator<Item = &Status> {
        self.statuses.iter()
    }

    /// The statuses as a slice, most restrictive first.
    pub fn as_slice(&self) -> &[Status] {
        &self.statuses
    }

    /// Number of configured statuses.
    pub fn len(&self) -> usize {
        self.statuses.len()
    }

    /// Always false; a vocabulary is non-empty by construction.
    pub fn is_empty(&self) -> bool {
        self.statuses.is_empty()
    }

    /// Whether `status` is one of the configured statuses.
    pub fn contains(&self, status: &Status) -> bool {
        self.statuses.contains(status)
    }

    /// Position of `status` in the severity order (0 = most restrictive).
    pub fn position(&self, status: &Status) -> Option<usize> {
        self.statuses.iter().position(|s| s == status)
    }

    /// Whether a policy may report `status`: a configured status or a sentinel.
    pub fn admits(&self, status: &Status) -> bool {
        status.is_sentinel() || self.contains(status)
    }
}

impl TryFrom<Vec<Status>> for StatusVocabulary {
    type Error = ValidationError;

    fn try_from(statuses: Vec<Status>) -> Result<Self, Self::Error> {
        Self::new(statuses)
    }
}

impl From<StatusVocabulary> for Vec<Status> {
    fn from(vocabulary: StatusVocabulary) -> Self {
        vocabulary.statuses
    }
}
