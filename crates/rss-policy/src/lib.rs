//! # rss-policy: Policy Decision Point
//!
//! Decides whether a grid element's status should change by running every
//! applicable monitoring policy and combining their verdicts into one
//! authoritative decision. A Policy Enforcement layer consumes the result
//! and performs the actual status write and side effects.
//!
//! ## Flow
//!
//! ```text
//! setup(overrides) ─▶ take_decision()
//!                        ├─ lookup.policies_that_apply(params)
//!                        ├─ invoker.invoke(params, policy)   (each, in order)
//!                        ├─ validate each verdict against the vocabulary
//!                        ├─ combine_verdicts(verdicts, params, machine)
//!                        └─ lookup.policy_actions_that_apply(params)
//! ```
//!
//! ## Modules
//!
//! - **Boundary** (`boundary.rs`): the collaborator traits the PDP calls.
//! - **Verdict** (`verdict.rs`): descriptors, raw policy output, validated
//!   verdicts.
//! - **Combine** (`combine.rs`): the conservative combination algorithm.
//! - **PDP** (`pdp.rs`): orchestration and failure handling.
//! - **Catalog** (`catalog.rs`): in-memory applicability lookup.
//! - **Caller** (`caller.rs`): registry-backed policy invoker.

pub mod boundary;
pub mod caller;
pub mod catalog;
pub mod combine;
pub mod error;
pub mod pdp;
pub mod verdict;

// Re-export primary types.
pub use boundary::{ApplicabilityLookup, PolicyInvoker};
pub use caller::{policy_fn, FixedStatusPolicy, Policy, PolicyCaller};
pub use catalog::{ApplicabilityFilter, PolicyCatalog};
pub use combine::{combine_verdicts, CombinedDecision, REASON_DELIMITER};
pub use error::{DecisionError, InvocationError, LookupError, VerdictDefect};
pub use pdp::{Decision, FailureMode, PolicyDecisionPoint, PolicyFailure, PolicyOutcome};
pub use verdict::{PolicyAction, PolicyArgs, PolicyDescriptor, PolicyOutput, PolicyVerdict};
