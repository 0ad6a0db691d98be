//! # Policy Caller
//!
//! A [`PolicyInvoker`] that dispatches on a descriptor's `module` to a
//! registered [`Policy`] implementation and hands it the descriptor's extra
//! arguments. Invoking an unregistered module is an invocation failure.

use std::collections::BTreeMap;

use rss_core::{DecisionParameters, Status};

use crate::boundary::PolicyInvoker;
use crate::error::InvocationError;
use crate::verdict::{PolicyArgs, PolicyDescriptor, PolicyOutput};

/// One monitoring policy.
pub trait Policy {
    /// Evaluate the element described by `params`.
    fn evaluate(
        &self,
        params: &DecisionParameters,
        args: &PolicyArgs,
    ) -> Result<PolicyOutput, InvocationError>;
}

/// A policy backed by a closure. Built with [`policy_fn`].
pub struct FnPolicy<F>(F);

/// Wrap a closure as a [`Policy`].
pub fn policy_fn<F>(f: F) -> FnPolicy<F>
where
    F: Fn(&DecisionParameters, &PolicyArgs) -> Result<PolicyOutput, InvocationError>,
{
    FnPolicy(f)
}

impl<F> Policy for FnPolicy<F>
where
    F: Fn(&DecisionParameters, &PolicyArgs) -> Result<PolicyOutput, InvocationError>,
{
    fn evaluate(
        &self,
        params: &DecisionParameters,
        args: &PolicyArgs,
    ) -> Result<PolicyOutput, InvocationError> {
        (self.0)(params, args)
    }
}

/// A policy that always answers the same status and reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedStatusPolicy {
    status: Status,
    reason: String,
}

impl FixedStatusPolicy {
    /// Always answer `status` with `reason`.
    pub fn new(status: Status, reason: impl Into<String>) -> Self {
        Self {
            status,
            reason: reason.into(),
        }
    }

    /// Always `Active`.
    pub fn always_active() -> Result<Self, rss_core::ValidationError> {
        Ok(Self::new(Status::new("Active")?, "AlwaysActive"))
    }

    /// Always `Banned`.
    pub fn always_banned() -> Result<Self, rss_core::ValidationError> {
        Ok(Self::new(Status::new("Banned")?, "AlwaysBanned"))
    }
}

impl Policy for FixedStatusPolicy {
    fn evaluate(
        &self,
        _params: &DecisionParameters,
        _args: &PolicyArgs,
    ) -> Result<PolicyOutput, InvocationError> {
        Ok(PolicyOutput::new(self.status.as_str(), self.reason.as_str()))
    }
}

/// Registry of policy implementations keyed by module.
#[derive(Default)]
pub struct PolicyCaller {
    policies: BTreeMap<String, Box<dyn Policy + Send + Sync>>,
}

impl PolicyCaller {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `policy` under `module`, replacing any previous entry.
    pub fn with_policy<P>(mut self, module: impl Into<String>, policy: P) -> Self
    where
        P: Policy + Send + Sync + 'static,
    {
        self.policies.insert(module.into(), Box::new(policy));
        self
    }

    /// Whether `module` is registered.
    pub fn has_module(&self, module: &str) -> bool {
        self.policies.contains_key(module)
    }

    /// Registered modules, sorted.
    pub fn modules(&self) -> impl Iterator<Item = &str> {
        self.policies.keys().map(String::as_str)
    }
}

impl PolicyInvoker for PolicyCaller {
    fn invoke(
        &self,
        params: &DecisionParameters,
        policy: &PolicyDescriptor,
    ) -> Result<PolicyOutput, InvocationError> {
        let implementation =
            self.policies
                .get(&policy.module)
                .ok_or_else(|| InvocationError::UnknownModule {
                    module: policy.module.clone(),
                })?;
        implementation.evaluate(params, &policy.args)
    }
}

impl std::fmt::Debug for PolicyCaller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PolicyCaller")
            .field("modules", &self.policies.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn dispatches_on_module() {
        let caller = PolicyCaller::new()
            .with_policy("AlwaysActivePolicy", FixedStatusPolicy::always_active().unwrap())
            .with_policy("AlwaysBannedPolicy", FixedStatusPolicy::always_banned().unwrap());

        let output = caller
            .invoke(
                &DecisionParameters::standard(),
                &PolicyDescriptor::new("ban", "AlwaysBannedPolicy"),
            )
            .unwrap();
        assert_eq!(output, PolicyOutput::new("Banned", "AlwaysBanned"));
    }

    #[test]
    fn unknown_module_is_an_invocation_error() {
        let caller = PolicyCaller::new();
        let err = caller
            .invoke(
                &DecisionParameters::standard(),
                &PolicyDescriptor::new("dt", "DowntimePolicy"),
            )
            .unwrap_err();
        assert_eq!(
            err,
            InvocationError::UnknownModule {
                module: "DowntimePolicy".into()
            }
        );
    }

    #[test]
    fn closure_policy_receives_args() {
        let caller = PolicyCaller::new().with_policy(
            "ThresholdPolicy",
            policy_fn(|_params, args| {
                let limit = args
                    .get("limit")
                    .and_then(|v| v.as_u64())
                    .ok_or_else(|| InvocationError::failed("missing limit"))?;
                if limit > 10 {
                    Ok(PolicyOutput::new("Active", "under limit"))
                } else {
                    Ok(PolicyOutput::new("Degraded", "over limit"))
                }
            }),
        );

        let high = PolicyDescriptor::new("t", "ThresholdPolicy").with_arg("limit", json!(50));
        let low = PolicyDescriptor::new("t", "ThresholdPolicy").with_arg("limit", json!(3));
        let bare = PolicyDescriptor::new("t", "ThresholdPolicy");
        let params = DecisionParameters::standard();

        assert_eq!(caller.invoke(&params, &high).unwrap().status.as_deref(), Some("Active"));
        assert_eq!(caller.invoke(&params, &low).unwrap().status.as_deref(), Some("Degraded"));
        assert_eq!(
            caller.invoke(&params, &bare).unwrap_err(),
            InvocationError::failed("missing limit")
        );
    }

    #[test]
    fn debug_lists_modules() {
        let caller = PolicyCaller::new()
            .with_policy("AlwaysActivePolicy", FixedStatusPolicy::always_active().unwrap());
        assert!(caller.has_module("AlwaysActivePolicy"));
        assert_eq!(caller.modules().collect::<Vec<_>>(), vec!["AlwaysActivePolicy"]);
        assert!(format!("{caller:?}").contains("AlwaysActivePolicy"));
    }
}
