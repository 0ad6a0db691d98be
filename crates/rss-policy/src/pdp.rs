//! # Policy Decision Point
//!
//! Orchestrates one decision: looks up the policies that apply to the
//! element, runs them in order, validates every verdict, combines the
//! verdicts through the status machine and attaches the applicable actions.
//!
//! The PDP's only mutable state is its [`DecisionParameters`], replaced by
//! [`PolicyDecisionPoint::setup`]. [`PolicyDecisionPoint::take_decision`]
//! borrows `&self` and opens a fresh machine context per call, so a PDP
//! shared behind a lock or cloned per element never aliases another
//! decision's current status. The [`StatusMachine`] itself is immutable
//! and shared through an `Arc`.
//!
//! ## Failure modes
//!
//! - [`FailureMode::FailFast`] (default): the first invocation error or
//!   malformed verdict aborts the decision and is returned as is. No later
//!   policy is attempted.
//! - [`FailureMode::BestEffort`]: failing policies are isolated, reported in
//!   [`Decision::policy_failures`] and left out of combination. If every
//!   applicable policy fails the decision is `Unknown` and its reason names
//!   the failed policies.
//!
//! Lookup, configuration and machine errors abort the decision in both modes.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use rss_core::{
    ConfigurationSource, DecisionOverrides, DecisionParameters, StatusConfig, StatusVocabulary,
};
use rss_state::{MachineError, StatusMachine};

use crate::boundary::{ApplicabilityLookup, PolicyInvoker};
use crate::combine::{all_policies_failed, combine_verdicts, CombinedDecision};
use crate::error::DecisionError;
use crate::verdict::{PolicyDescriptor, PolicyVerdict};

/// How the PDP treats a failing policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureMode {
    /// Abort the decision on the first failing policy.
    #[default]
    FailFast,
    /// Skip failing policies and report them alongside the decision.
    BestEffort,
}

/// A policy left out of combination in [`FailureMode::BestEffort`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyFailure {
    /// Name of the failing policy.
    pub policy: String,
    /// Rendered cause.
    pub cause: String,
}

/// The result of running one policy.
#[derive(Debug)]
pub enum PolicyOutcome {
    /// The policy returned a structurally valid verdict.
    Verdict(PolicyVerdict),
    /// The invocation failed or the verdict was malformed.
    Failure {
        /// The policy that failed.
        policy: PolicyDescriptor,
        /// Why.
        error: DecisionError,
    },
}

impl PolicyOutcome {
    /// The verdict, if the policy succeeded.
    pub fn verdict(&self) -> Option<&PolicyVerdict> {
        match self {
            Self::Verdict(verdict) => Some(verdict),
            Self::Failure { .. } => None,
        }
    }

    /// Whether the policy failed.
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure { .. })
    }
}

/// Everything one `take_decision()` produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Decision {
    /// Every valid verdict, in invocation order.
    pub single_policy_results: Vec<PolicyVerdict>,
    /// The combined decision.
    pub policy_combined_result: CombinedDecision,
    /// The parameters the decision ran with.
    pub decision_params: DecisionParameters,
    /// Policies skipped in best-effort mode.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub policy_failures: Vec<PolicyFailure>,
}

impl Decision {
    /// Whether the decided status differs from the element's current one.
    pub fn changes_status(&self) -> bool {
        self.policy_combined_result
            .changes(self.decision_params.status.as_ref())
    }
}

// ---------------------------------------------------------------------------
// PolicyDecisionPoint
// ---------------------------------------------------------------------------

/// Decides an element's status from the policies that apply to it.
#[derive(Clone)]
pub struct PolicyDecisionPoint {
    lookup: Arc<dyn ApplicabilityLookup + Send + Sync>,
    invoker: Arc<dyn PolicyInvoker + Send + Sync>,
    config: Arc<dyn ConfigurationSource + Send + Sync>,
    machine: Arc<StatusMachine>,
    failure_mode: FailureMode,
    params: DecisionParameters,
}

impl PolicyDecisionPoint {
    /// Assemble a PDP from its collaborators. Parameters start at
    /// [`DecisionParameters::standard`].
    pub fn new<L, I, C>(
        lookup: L,
        invoker: I,
        config: C,
        machine: impl Into<Arc<StatusMachine>>,
    ) -> Self
    where
        L: ApplicabilityLookup + Send + Sync + 'static,
        I: PolicyInvoker + Send + Sync + 'static,
        C: ConfigurationSource + Send + Sync + 'static,
    {
        Self {
            lookup: Arc::new(lookup),
            invoker: Arc::new(invoker),
            config: Arc::new(config),
            machine: machine.into(),
            failure_mode: FailureMode::default(),
            params: DecisionParameters::standard(),
        }
    }

    /// Assemble a PDP whose vocabulary and machine both come from `config`.
    pub fn from_config<L, I>(
        lookup: L,
        invoker: I,
        config: StatusConfig,
    ) -> Result<Self, MachineError>
    where
        L: ApplicabilityLookup + Send + Sync + 'static,
        I: PolicyInvoker + Send + Sync + 'static,
    {
        let machine = StatusMachine::from_config(&config)?;
        Ok(Self::new(lookup, invoker, config, machine))
    }

    /// Use `mode` for failing policies.
    pub fn with_failure_mode(mut self, mode: FailureMode) -> Self {
        self.failure_mode = mode;
        self
    }

    /// The configured failure mode.
    pub fn failure_mode(&self) -> FailureMode {
        self.failure_mode
    }

    /// The shared status machine.
    pub fn machine(&self) -> &StatusMachine {
        &self.machine
    }

    /// Reset the decision parameters to the standard template with
    /// `overrides` on top. Nothing from a previous `setup()` survives.
    pub fn setup(&mut self, overrides: DecisionOverrides) {
        self.params = DecisionParameters::from_overrides(overrides);
    }

    /// The parameters the next decision will run with.
    pub fn decision_params(&self) -> &DecisionParameters {
        &self.params
    }

    /// Run every applicable policy and combine their verdicts.
    pub fn take_decision(&self) -> Result<Decision, DecisionError> {
        let params = &self.params;
        let policies = self.lookup.policies_that_apply(params)?;
        let vocabulary = self.config.valid_statuses()?;

        tracing::debug!(
            element = ?params.element,
            name = params.name.as_deref().unwrap_or_default(),
            status = ?params.status,
            policies = policies.len(),
            "running policies"
        );

        let outcomes = self.run_policies(&policies, &vocabulary)?;

        let mut verdicts = Vec::with_capacity(outcomes.len());
        let mut failures = Vec::new();
        for outcome in outcomes {
            match outcome {
                PolicyOutcome::Verdict(verdict) => verdicts.push(verdict),
                PolicyOutcome::Failure { policy, error } => failures.push(PolicyFailure {
                    policy: policy.name,
                    cause: error.to_string(),
                }),
            }
        }

        let mut combined = if verdicts.is_empty() && !failures.is_empty() {
            let failed: Vec<&str> = failures.iter().map(|f| f.policy.as_str()).collect();
            all_policies_failed(&failed)
        } else {
            combine_verdicts(&verdicts, params, &self.machine)?
        };
        combined.policy_action = self.lookup.policy_actions_that_apply(params)?;

        tracing::info!(
            name = params.name.as_deref().unwrap_or_default(),
            current = ?params.status,
            status = %combined.status,
            actions = combined.policy_action.len(),
            failures = failures.len(),
            "decision taken"
        );

        Ok(Decision {
            single_policy_results: verdicts,
            policy_combined_result: combined,
            decision_params: params.clone(),
            policy_failures: failures,
        })
    }

    /// Invoke `policies` in order against the current parameters and
    /// validate each output against `vocabulary`.
    ///
    /// In fail-fast mode the first failure is returned as the error and no
    /// later policy runs. In best-effort mode every policy runs and failures
    /// come back as [`PolicyOutcome::Failure`].
    pub fn run_policies(
        &self,
        policies: &[PolicyDescriptor],
        vocabulary: &StatusVocabulary,
    ) -> Result<Vec<PolicyOutcome>, DecisionError> {
        let mut outcomes = Vec::with_capacity(policies.len());

        for policy in policies {
            let result = match self.invoker.invoke(&self.params, policy) {
                Ok(output) => output.validate(policy, vocabulary).map_err(|defect| {
                    DecisionError::MalformedVerdict {
                        policy: policy.name.clone(),
                        defect,
                    }
                }),
                Err(source) => Err(DecisionError::Invocation {
                    policy: policy.name.clone(),
                    source,
                }),
            };

            match (result, self.failure_mode) {
                (Ok(verdict), _) => {
                    tracing::debug!(
                        policy = %policy.name,
                        status = %verdict.status,
                        "policy returned"
                    );
                    outcomes.push(PolicyOutcome::Verdict(verdict));
                }
                (Err(error), FailureMode::FailFast) => {
                    tracing::error!(
                        policy = %policy.name,
                        module = %policy.module,
                        error = %error,
                        "policy failed, aborting decision"
                    );
                    return Err(error);
                }
                (Err(error), FailureMode::BestEffort) => {
                    tracing::warn!(
                        policy = %policy.name,
                        module = %policy.module,
                        error = %error,
                        "policy failed, excluded from combination"
                    );
                    outcomes.push(PolicyOutcome::Failure {
                        policy: policy.clone(),
                        error,
                    });
                }
            }
        }

        Ok(outcomes)
    }
}

impl std::fmt::Debug for PolicyDecisionPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PolicyDecisionPoint")
            .field("failure_mode", &self.failure_mode)
            .field("params", &self.params)
            .field("statuses", self.machine.valid_statuses())
            .finish()
    }
}
