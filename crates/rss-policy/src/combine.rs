//! # Verdict Combination
//!
//! Conflicting policies are resolved conservatively: the most restrictive
//! verdict proposes the candidate status (ban beats probing beats active).
//! The state machine then checks that the candidate is a legal direct
//! transition from the element's current status. If it is not, the
//! machine's fallback wins and the reason says so.
//!
//! ## Rules
//!
//! 1. No verdicts: `Unknown`, "No policy applies to <element>, <name>, <elementType>".
//! 2. Order verdicts most restrictive first (stable).
//! 3. The first ordered verdict proposes the candidate.
//! 4. Forced: candidate unreachable, the machine's fallback is adopted with
//!    reason "RssMachine forced status <candidate> to <fallback>".
//! 5. Otherwise the reasons of every verdict holding the chosen status are
//!    joined with `" ### "` in ordered position.
//!
//! When policies applied but all of them failed, the decision point does not
//! combine at all: the result is `Unknown` with reason
//! "All <n> applicable policies failed: <names>".
//!
//! `Error` verdicts count as `Unknown` throughout, so the combined status is
//! always a configured status or `Unknown`.

use serde::{Deserialize, Serialize};

use rss_core::{DecisionParameters, Status};
use rss_state::{MachineError, StatusMachine};

use crate::verdict::{PolicyAction, PolicyVerdict};

/// Delimiter between concatenated verdict reasons.
pub const REASON_DELIMITER: &str = " ### ";

/// The PDP's combined decision for one element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CombinedDecision {
    /// The status the element should hold.
    pub status: Status,
    /// Why.
    pub reason: String,
    /// External actions that apply to the element.
    #[serde(default)]
    pub policy_action: Vec<PolicyAction>,
}

impl CombinedDecision {
    fn new(status: Status, reason: String) -> Self {
        Self {
            status,
            reason,
            policy_action: Vec::new(),
        }
    }

    /// Whether the decided status differs from `current`.
    pub fn changes(&self, current: Option<&Status>) -> bool {
        current != Some(&self.status)
    }
}

/// Combine `verdicts` into one decision for the element described by
/// `params`, arbitrated by `machine`.
pub fn combine_verdicts(
    verdicts: &[PolicyVerdict],
    params: &DecisionParameters,
    machine: &StatusMachine,
) -> Result<CombinedDecision, MachineError> {
    let context = machine.context(params.status.as_ref());
    let ordered = machine.order_verdicts(verdicts.iter().collect::<Vec<&PolicyVerdict>>())?;

    let Some(first) = ordered.first() else {
        return Ok(no_policy_applies(params));
    };
    let candidate = first.effective_status();
    let next = context.resolve(&candidate)?;

    if next != candidate {
        tracing::info!(
            name = params.name.as_deref().unwrap_or_default(),
            current = ?params.status,
            candidate = %candidate,
            forced = %next,
            "status machine forced the combined status"
        );
        let reason = format!("RssMachine forced status {candidate} to {next}");
        return Ok(CombinedDecision::new(next, reason));
    }

    let reason = ordered
        .iter()
        .filter(|verdict| verdict.effective_status() == next)
        .map(|verdict| verdict.reason.as_str())
        .collect::<Vec<_>>()
        .join(REASON_DELIMITER);

    Ok(CombinedDecision::new(next, reason))
}

/// The decision when policies applied but every one of them failed.
pub(crate) fn all_policies_failed(failed: &[&str]) -> CombinedDecision {
    let reason = format!(
        "All {} applicable policies failed: {}",
        failed.len(),
        failed.join(", ")
    );
    CombinedDecision::new(Status::unknown(), reason)
}

fn no_policy_applies(params: &DecisionParameters) -> CombinedDecision {
    let reason = format!(
        "No policy applies to {}, {}, {}",
        or_none(params.element.as_ref()),
        or_none(params.name.as_ref()),
        or_none(params.element_type.as_ref()),
    );
    CombinedDecision::new(Status::unknown(), reason)
}

fn or_none<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map_or_else(|| "None".to_string(), |v| v.to_string())
}
