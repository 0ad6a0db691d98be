//! # Policies, Outputs and Verdicts
//!
//! A [`PolicyDescriptor`] names one policy to run. Running it yields a
//! [`PolicyOutput`]: whatever the policy returned, with `Status` and
//! `Reason` still optional. [`PolicyOutput::validate`] turns it into a
//! [`PolicyVerdict`] or names the structural defect.
//!
//! Outputs and verdicts use the `Status` / `Reason` key spelling that
//! policies and enforcement points exchange.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use rss_core::{Status, StatusVocabulary};
use rss_state::StatusBearer;

use crate::error::VerdictDefect;

// Keys a verdict serializes itself; an extra field may not shadow them.
const RESERVED_KEYS: [&str; 3] = ["Status", "Reason", "Policy"];

/// Extra arguments handed to a policy implementation.
pub type PolicyArgs = BTreeMap<String, serde_json::Value>;

/// Identifies one policy to run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyDescriptor {
    /// Policy name, unique within a catalog.
    pub name: String,
    /// Implementation reference the invoker dispatches on.
    pub module: String,
    /// Extra arguments for the implementation.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub args: PolicyArgs,
}

impl PolicyDescriptor {
    /// A descriptor without extra arguments.
    pub fn new(name: impl Into<String>, module: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            module: module.into(),
            args: BTreeMap::new(),
        }
    }

    /// Attach an extra argument.
    pub fn with_arg(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.args.insert(key.into(), value);
        self
    }
}

/// An external remedial action descriptor attached to a decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyAction {
    /// Action name.
    pub name: String,
    /// Action type the enforcement point dispatches on.
    pub action_type: String,
}

impl PolicyAction {
    /// Create an action descriptor.
    pub fn new(name: impl Into<String>, action_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            action_type: action_type.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// PolicyOutput
// ---------------------------------------------------------------------------

/// What a policy returned, before validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PolicyOutput {
    /// Proposed status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Explanation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Anything else the policy reported.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl PolicyOutput {
    /// An output with both mandatory fields set.
    pub fn new(status: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            status: Some(status.into()),
            reason: Some(reason.into()),
            extra: BTreeMap::new(),
        }
    }

    /// Attach an extra field.
    pub fn with_extra(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// Check the output's structure and attribute it to `policy`.
    ///
    /// Defects are checked in order: missing `Status`, `Status` not exactly
    /// a name admitted by `vocabulary` (configured statuses plus `Unknown` /
    /// `Error`), missing `Reason`. Extra keys that collide with the verdict's
    /// own `Status`, `Reason` or `Policy` keys are dropped.
    pub fn validate(
        self,
        policy: &PolicyDescriptor,
        vocabulary: &StatusVocabulary,
    ) -> Result<PolicyVerdict, VerdictDefect> {
        let raw = self.status.ok_or(VerdictDefect::MissingStatus)?;
        let status = match Status::new(raw.as_str()) {
            Ok(status) if status.as_str() == raw && vocabulary.admits(&status) => status,
            _ => return Err(VerdictDefect::UnknownStatus(raw)),
        };
        let reason = self.reason.ok_or(VerdictDefect::MissingReason)?;

        let mut extra = self.extra;
        extra.retain(|key, _| !RESERVED_KEYS.contains(&key.as_str()));

        Ok(PolicyVerdict {
            status,
            reason,
            policy: policy.clone(),
            extra,
        })
    }
}

// ---------------------------------------------------------------------------
// PolicyVerdict
// ---------------------------------------------------------------------------

/// A structurally valid policy result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PolicyVerdict {
    /// Proposed status: a configured status, `Unknown` or `Error`.
    pub status: Status,
    /// Explanation.
    pub reason: String,
    /// The policy that produced the verdict.
    pub policy: PolicyDescriptor,
    /// Anything else the policy reported.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl PolicyVerdict {
    /// Name of the producing policy.
    pub fn policy_name(&self) -> &str {
        &self.policy.name
    }

    /// The status this verdict counts as when combining. An `Error` verdict
    /// carries no status information and counts as `Unknown`.
    pub fn effective_status(&self) -> Status {
        if self.status.is_error() {
            Status::unknown()
        } else {
            self.status.clone()
        }
    }
}

impl StatusBearer for PolicyVerdict {
    fn status(&self) -> &Status {
        &self.status
    }
}
