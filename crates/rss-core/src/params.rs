//! # Decision Parameters
//!
//! The input record of one decision. Eight keys are recognized:
//! `element`, `name`, `elementType`, `statusType`, `status`, `reason`,
//! `tokenOwner` and `active`. After defaulting, all eight are always present;
//! unset values serialize as `null`. Keys outside that set are carried in
//! [`DecisionParameters::extra`] untouched.
//!
//! Callers describe what they know with a [`DecisionOverrides`] and lay it
//! over [`DecisionParameters::standard`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::element::ElementFamily;
use crate::status::Status;

/// The parameters one decision runs with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionParameters {
    /// Element family being evaluated.
    pub element: Option<ElementFamily>,
    /// Element name.
    pub name: Option<String>,
    /// Element type within its family (e.g. `StorageElement`).
    pub element_type: Option<String>,
    /// Status type being decided (e.g. `ReadAccess`).
    pub status_type: Option<String>,
    /// Status the element currently holds, if any.
    pub status: Option<Status>,
    /// Reason recorded with the current status.
    pub reason: Option<String>,
    /// Owner of the most recent manual override. Carried, not interpreted.
    pub token_owner: Option<String>,
    /// Policy gate. When false no policy is expected to act.
    pub active: bool,
    /// Unrecognized keys supplied by the caller.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl DecisionParameters {
    /// The standard template: everything unset, `active` true.
    pub fn standard() -> Self {
        Self {
            element: None,
            name: None,
            element_type: None,
            status_type: None,
            status: None,
            reason: None,
            token_owner: None,
            active: true,
            extra: BTreeMap::new(),
        }
    }

    /// Build parameters from the standard template with `overrides` on top.
    pub fn from_overrides(overrides: DecisionOverrides) -> Self {
        let mut params = Self::standard();
        params.apply(overrides);
        params
    }

    /// Lay `overrides` over these parameters. Keys the overrides leave unset
    /// keep their current value; extra keys are merged, later values winning.
    pub fn apply(&mut self, overrides: DecisionOverrides) {
        let DecisionOverrides {
            element,
            name,
            element_type,
            status_type,
            status,
            reason,
            token_owner,
            active,
            extra,
        } = overrides;

        if element.is_some() {
            self.element = element;
        }
        if name.is_some() {
            self.name = name;
        }
        if element_type.is_some() {
            self.element_type = element_type;
        }
        if status_type.is_some() {
            self.status_type = status_type;
        }
        if status.is_some() {
            self.status = status;
        }
        if reason.is_some() {
            self.reason = reason;
        }
        if token_owner.is_some() {
            self.token_owner = token_owner;
        }
        if let Some(active) = active {
            self.active = active;
        }
        self.extra.extend(extra);
    }
}

impl Default for DecisionParameters {
    fn default() -> Self {
        Self::standard()
    }
}

// ---------------------------------------------------------------------------
// DecisionOverrides
// ---------------------------------------------------------------------------

/// A partial set of decision parameters supplied by the caller.
///
/// Deserializes from the same camelCase mapping as [`DecisionParameters`];
/// every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionOverrides {
    /// Element family.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element: Option<ElementFamily>,
    /// Element name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Element type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element_type: Option<String>,
    /// Status type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_type: Option<String>,
    /// Current status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
    /// Current reason.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Token owner.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_owner: Option<String>,
    /// Policy gate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    /// Extra keys, preserved verbatim.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl DecisionOverrides {
    /// Empty overrides.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the element family.
    pub fn element(mut self, element: ElementFamily) -> Self {
        self.element = Some(element);
        self
    }

    /// Set the element name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the element type.
    pub fn element_type(mut self, element_type: impl Into<String>) -> Self {
        self.element_type = Some(element_type.into());
        self
    }

    /// Set the status type.
    pub fn status_type(mut self, status_type: impl Into<String>) -> Self {
        self.status_type = Some(status_type.into());
        self
    }

    /// Set the current status.
    pub fn status(mut self, status: Status) -> Self {
        self.status = Some(status);
        self
    }

    /// Set the current reason.
    pub fn reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Set the token owner.
    pub fn token_owner(mut self, token_owner: impl Into<String>) -> Self {
        self.token_owner = Some(token_owner.into());
        self
    }

    /// Set the policy gate.
    pub fn active(mut self, active: bool) -> Self {
        self.active = Some(active);
        self
    }

    /// Attach an extra key.
    pub fn extra(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}
