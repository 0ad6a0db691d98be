//! # Policy Catalog
//!
//! An in-memory [`ApplicabilityLookup`]. Each policy and each action carries
//! an [`ApplicabilityFilter`]; an entry applies when every list the filter
//! sets contains the corresponding decision parameter. Lists left unset
//! match anything. Entries come back in registration order.
//!
//! When the decision's `active` gate is off no policy applies, but actions
//! are still looked up.
//!
//! ```yaml
//! policies:
//!   - policy: { name: DTScheduled, module: DowntimePolicy, args: { hours: 12 } }
//!     appliesTo: { element: [Site, Resource], statusType: [all] }
//! actions:
//!   - action: { name: EmailOnBan, actionType: EmailAction }
//!     appliesTo: { status: [Active, Degraded] }
//! ```

use serde::{Deserialize, Serialize};

use rss_core::{ConfigError, DecisionParameters, ElementFamily, Status};

use crate::boundary::ApplicabilityLookup;
use crate::error::LookupError;
use crate::verdict::{PolicyAction, PolicyDescriptor};

/// Conditions under which a catalog entry applies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicabilityFilter {
    /// Element families.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element: Option<Vec<ElementFamily>>,
    /// Element names.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<Vec<String>>,
    /// Element types.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element_type: Option<Vec<String>>,
    /// Status types.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_type: Option<Vec<String>>,
    /// Current statuses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Vec<Status>>,
}

impl ApplicabilityFilter {
    /// A filter matching every element.
    pub fn any() -> Self {
        Self::default()
    }

    /// Restrict to element families.
    pub fn elements(mut self, families: impl IntoIterator<Item = ElementFamily>) -> Self {
        self.element = Some(families.into_iter().collect());
        self
    }

    /// Restrict to element types.
    pub fn element_types<S: Into<String>>(mut self, types: impl IntoIterator<Item = S>) -> Self {
        self.element_type = Some(types.into_iter().map(Into::into).collect());
        self
    }

    /// Restrict to status types.
    pub fn status_types<S: Into<String>>(mut self, types: impl IntoIterator<Item = S>) -> Self {
        self.status_type = Some(types.into_iter().map(Into::into).collect());
        self
    }

    /// Restrict to current statuses.
    pub fn statuses(mut self, statuses: impl IntoIterator<Item = Status>) -> Self {
        self.status = Some(statuses.into_iter().collect());
        self
    }

    /// Whether the filter admits `params`.
    pub fn matches(&self, params: &DecisionParameters) -> bool {
        admits(&self.element, params.element.as_ref())
            && admits(&self.name, params.name.as_ref())
            && admits(&self.element_type, params.element_type.as_ref())
            && admits(&self.status_type, params.status_type.as_ref())
            && admits(&self.status, params.status.as_ref())
    }
}

fn admits<T: PartialEq>(allowed: &Option<Vec<T>>, value: Option<&T>) -> bool {
    match (allowed, value) {
        (None, _) => true,
        (Some(list), Some(value)) => list.contains(value),
        (Some(_), None) => false,
    }
}

/// A policy registered in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogPolicy {
    /// The policy to run.
    pub policy: PolicyDescriptor,
    /// When it applies.
    #[serde(default)]
    pub applies_to: ApplicabilityFilter,
}

/// An action registered in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogAction {
    /// The action to attach.
    pub action: PolicyAction,
    /// When it applies.
    #[serde(default)]
    pub applies_to: ApplicabilityFilter,
}

/// In-memory applicability lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyCatalog {
    /// Registered policies, in run order.
    #[serde(default)]
    pub policies: Vec<CatalogPolicy>,
    /// Registered actions.
    #[serde(default)]
    pub actions: Vec<CatalogAction>,
}

impl PolicyCatalog {
    /// An empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a catalog from YAML.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let catalog: Self = serde_yaml::from_str(yaml)?;
        Ok(catalog)
    }

    /// Register a policy.
    pub fn with_policy(mut self, policy: PolicyDescriptor, applies_to: ApplicabilityFilter) -> Self {
        self.policies.push(CatalogPolicy { policy, applies_to });
        self
    }

    /// Register an action.
    pub fn with_action(mut self, action: PolicyAction, applies_to: ApplicabilityFilter) -> Self {
        self.actions.push(CatalogAction { action, applies_to });
        self
    }
}

impl ApplicabilityLookup for PolicyCatalog {
    fn policies_that_apply(
        &self,
        params: &DecisionParameters,
    ) -> Result<Vec<PolicyDescriptor>, LookupError> {
        if !params.active {
            tracing::debug!(
                name = params.name.as_deref().unwrap_or_default(),
                "policies deactivated for element"
            );
            return Ok(Vec::new());
        }
        Ok(self
            .policies
            .iter()
            .filter(|entry| entry.applies_to.matches(params))
            .map(|entry| entry.policy.clone())
            .collect())
    }

    fn policy_actions_that_apply(
        &self,
        params: &DecisionParameters,
    ) -> Result<Vec<PolicyAction>, LookupError> {
        Ok(self
            .actions
            .iter()
            .filter(|entry| entry.applies_to.matches(params))
            .map(|entry| entry.action.clone())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rss_core::DecisionOverrides;

    const CATALOG: &str = r#"
policies:
  - policy: { name: DTScheduled, module: DowntimePolicy, args: { hours: 12 } }
    appliesTo: { element: [Site, Resource] }
  - policy: { name: SpaceTokenOccupancy, module: SpaceTokenOccupancyPolicy }
    appliesTo: { element: [Resource], elementType: [StorageElement] }
  - policy: { name: AlwaysActive, module: AlwaysActivePolicy }
actions:
  - action: { name: LogStatus, actionType: LogStatusAction }
  - action: { name: EmailOnBan, actionType: EmailAction }
    appliesTo: { status: [Active, Degraded] }
"#;

    fn site(name: &str) -> DecisionParameters {
        DecisionParameters::from_overrides(
            DecisionOverrides::new()
                .element(ElementFamily::Site)
                .name(name)
                .element_type("Site")
                .status(Status::new("Active").unwrap()),
        )
    }

    fn names(policies: &[PolicyDescriptor]) -> Vec<&str> {
        policies.iter().map(|p| p.name.as_str()).collect()
    }

    #[test]
    fn yaml_catalog_filters_by_element() {
        let catalog = PolicyCatalog::from_yaml_str(CATALOG).unwrap();
        let policies = catalog.policies_that_apply(&site("LCG.CERN.ch")).unwrap();
        assert_eq!(names(&policies), vec!["DTScheduled", "AlwaysActive"]);
        assert_eq!(policies[0].args.get("hours"), Some(&serde_json::json!(12)));
    }

    #[test]
    fn storage_element_gets_space_policy() {
        let catalog = PolicyCatalog::from_yaml_str(CATALOG).unwrap();
        let params = DecisionParameters::from_overrides(
            DecisionOverrides::new()
                .element(ElementFamily::Resource)
                .name("CERN-DST")
                .element_type("StorageElement"),
        );
        let policies = catalog.policies_that_apply(&params).unwrap();
        assert_eq!(
            names(&policies),
            vec!["DTScheduled", "SpaceTokenOccupancy", "AlwaysActive"]
        );
    }

    #[test]
    fn inactive_element_gets_no_policies_but_actions() {
        let catalog = PolicyCatalog::from_yaml_str(CATALOG).unwrap();
        let mut params = site("LCG.CERN.ch");
        params.active = false;
        assert!(catalog.policies_that_apply(&params).unwrap().is_empty());
        assert_eq!(catalog.policy_actions_that_apply(&params).unwrap().len(), 2);
    }

    #[test]
    fn filter_with_list_rejects_unset_parameter() {
        let catalog = PolicyCatalog::from_yaml_str(CATALOG).unwrap();
        let actions = catalog
            .policy_actions_that_apply(&DecisionParameters::standard())
            .unwrap();
        assert_eq!(actions, vec![PolicyAction::new("LogStatus", "LogStatusAction")]);
    }

    #[test]
    fn builder_catalog() {
        let catalog = PolicyCatalog::new()
            .with_policy(
                PolicyDescriptor::new("AlwaysBanned", "AlwaysBannedPolicy"),
                ApplicabilityFilter::any()
                    .elements([ElementFamily::Node])
                    .status_types(["all"]),
            )
            .with_action(
                PolicyAction::new("Notify", "EmailAction"),
                ApplicabilityFilter::any().statuses([Status::new("Banned").unwrap()]),
            );
        let params = DecisionParameters::from_overrides(
            DecisionOverrides::new()
                .element(ElementFamily::Node)
                .status_type("all"),
        );
        assert_eq!(catalog.policies_that_apply(&params).unwrap().len(), 1);
        assert!(catalog.policy_actions_that_apply(&params).unwrap().is_empty());
        assert!(catalog.policies_that_apply(&site("X")).unwrap().is_empty());
    }

    #[test]
    fn malformed_catalog_is_a_parse_error() {
        let err = PolicyCatalog::from_yaml_str("policies: [{ policy: { name: x } }]").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
