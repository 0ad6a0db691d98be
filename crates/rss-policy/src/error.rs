//! # Decision Errors
//!
//! Every failure aborts the decision for the element and is handed back to
//! the caller of `take_decision()`. There is no local recovery and no retry.

use thiserror::Error;

use rss_core::ConfigError;
use rss_state::MachineError;

/// Failure reported by the applicability lookup.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct LookupError {
    /// Description supplied by the lookup.
    pub message: String,
}

impl LookupError {
    /// Wrap a lookup failure message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Failure reported by a policy invocation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvocationError {
    /// No implementation is registered for the descriptor's module.
    #[error("no policy implementation registered for module {module:?}")]
    UnknownModule {
        /// The requested module.
        module: String,
    },

    /// The policy ran and failed.
    #[error("{message}")]
    Failed {
        /// Description supplied by the policy.
        message: String,
    },
}

impl InvocationError {
    /// A generic policy failure.
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed {
            message: message.into(),
        }
    }
}

/// The structural defect of a malformed verdict.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerdictDefect {
    /// The verdict carries no `Status`.
    #[error("verdict has no Status")]
    MissingStatus,

    /// The verdict carries a `Status` outside the vocabulary and sentinels.
    #[error("verdict Status {0:?} is not a valid status")]
    UnknownStatus(String),

    /// The verdict carries no `Reason`.
    #[error("verdict has no Reason")]
    MissingReason,
}

/// Any failure of a decision.
#[derive(Error, Debug)]
pub enum DecisionError {
    /// Policy or action applicability lookup failed; surfaced verbatim.
    #[error(transparent)]
    Lookup(#[from] LookupError),

    /// A policy invocation failed.
    #[error("policy {policy} failed: {source}")]
    Invocation {
        /// Name of the failing policy.
        policy: String,
        /// The invoker's failure.
        #[source]
        source: InvocationError,
    },

    /// A policy returned a structurally invalid verdict.
    #[error("policy {policy} returned a malformed verdict: {defect}")]
    MalformedVerdict {
        /// Name of the offending policy.
        policy: String,
        /// What is wrong with the verdict.
        defect: VerdictDefect,
    },

    /// The state machine met a status it does not know.
    #[error("state machine error: {0}")]
    Machine(#[from] MachineError),

    /// The valid status vocabulary could not be read.
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigError),
}

impl DecisionError {
    /// The policy this error is attributed to, if any.
    pub fn policy(&self) -> Option<&str> {
        match self {
            Self::Invocation { policy, .. } | Self::MalformedVerdict { policy, .. } => {
                Some(policy.as_str())
            }
            _ => None,
        }
    }
}
