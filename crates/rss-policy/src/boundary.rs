//! # Collaborator Boundary
//!
//! The PDP does not know which policies exist or how they run. It asks an
//! [`ApplicabilityLookup`] what applies to the element and a
//! [`PolicyInvoker`] to run each policy. Status configuration comes through
//! [`rss_core::ConfigurationSource`].
//!
//! Invocation is synchronous. A slow policy blocks the decision; timeouts and
//! cancellation belong inside the invoker.

use std::sync::Arc;

use rss_core::DecisionParameters;

use crate::error::{InvocationError, LookupError};
use crate::verdict::{PolicyAction, PolicyDescriptor, PolicyOutput};

/// Which policies and actions apply to an element.
pub trait ApplicabilityLookup {
    /// Policies to run for `params`, in the order they should run.
    fn policies_that_apply(
        &self,
        params: &DecisionParameters,
    ) -> Result<Vec<PolicyDescriptor>, LookupError>;

    /// Remedial actions to attach to the decision for `params`.
    fn policy_actions_that_apply(
        &self,
        params: &DecisionParameters,
    ) -> Result<Vec<PolicyAction>, LookupError>;
}

/// Runs one policy against the decision parameters.
pub trait PolicyInvoker {
    /// Run `policy` and return its raw output.
    fn invoke(
        &self,
        params: &DecisionParameters,
        policy: &PolicyDescriptor,
    ) -> Result<PolicyOutput, InvocationError>;
}

impl<T: ApplicabilityLookup + ?Sized> ApplicabilityLookup for Arc<T> {
    fn policies_that_apply(
        &self,
        params: &DecisionParameters,
    ) -> Result<Vec<PolicyDescriptor>, LookupError> {
        (**self).policies_that_apply(params)
    }

    fn policy_actions_that_apply(
        &self,
        params: &DecisionParameters,
    ) -> Result<Vec<PolicyAction>, LookupError> {
        (**self).policy_actions_that_apply(params)
    }
}

impl<T: PolicyInvoker + ?Sized> PolicyInvoker for Arc<T> {
    fn invoke(
        &self,
        params: &DecisionParameters,
        policy: &PolicyDescriptor,
    ) -> Result<PolicyOutput, InvocationError> {
        (**self).invoke(params, policy)
    }
}
