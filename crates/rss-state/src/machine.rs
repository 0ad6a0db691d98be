//! # Status Machine
//!
//! [`StatusMachine`] owns the severity order and the transition table. It is
//! immutable once built and may be shared by any number of concurrent
//! decisions. The status an element currently holds is not stored in the
//! machine: each decision opens its own [`MachineContext`].
//!
//! ```text
//! machine.order_verdicts(verdicts)      most restrictive first, stable
//! machine.context(current).resolve(c)   c, or the rule's fallback
//! ```

use serde::Serialize;

use rss_core::{Status, StatusConfig, StatusVocabulary};

use crate::error::MachineError;
use crate::table::TransitionTable;

/// Anything that carries a status and can be ranked by the machine.
pub trait StatusBearer {
    /// The status to rank by.
    fn status(&self) -> &Status;
}

impl StatusBearer for Status {
    fn status(&self) -> &Status {
        self
    }
}

impl<T: StatusBearer + ?Sized> StatusBearer for &T {
    fn status(&self) -> &Status {
        (**self).status()
    }
}

/// Severity rank of `status`: its vocabulary position, or one past the last
/// position for either sentinel. `None` for unknown statuses.
pub(crate) fn severity_rank(vocabulary: &StatusVocabulary, status: &Status) -> Option<usize> {
    if status.is_sentinel() {
        Some(vocabulary.len())
    } else {
        vocabulary.position(status)
    }
}

// ─── Machine ─────────────────────────────────────────────────────────

/// The immutable status state machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusMachine {
    vocabulary: StatusVocabulary,
    table: TransitionTable,
}

impl StatusMachine {
    /// Build a machine from a vocabulary and a table validated against it.
    pub fn new(vocabulary: StatusVocabulary, table: TransitionTable) -> Self {
        Self { vocabulary, table }
    }

    /// A machine with no transition restrictions.
    pub fn unrestricted(vocabulary: StatusVocabulary) -> Self {
        Self::new(vocabulary, TransitionTable::unrestricted())
    }

    /// Build a machine from a status configuration document.
    pub fn from_config(config: &StatusConfig) -> Result<Self, MachineError> {
        let table = TransitionTable::from_rules(&config.transitions, &config.statuses)?;
        Ok(Self::new(config.statuses.clone(), table))
    }

    /// The reference machine (`StatusConfig::standard()`).
    pub fn standard() -> Result<Self, MachineError> {
        Self::from_config(&StatusConfig::standard())
    }

    /// The configured statuses, most restrictive first.
    pub fn valid_statuses(&self) -> &StatusVocabulary {
        &self.vocabulary
    }

    /// The transition table.
    pub fn table(&self) -> &TransitionTable {
        &self.table
    }

    /// Whether the machine recognizes `status` (configured or sentinel).
    pub fn knows(&self, status: &Status) -> bool {
        self.vocabulary.admits(status)
    }

    /// Severity rank of `status`; lower is more restrictive.
    pub fn severity(&self, status: &Status) -> Result<usize, MachineError> {
        severity_rank(&self.vocabulary, status).ok_or_else(|| MachineError::UnknownStatus {
            status: status.to_string(),
        })
    }

    /// Sort `verdicts` most restrictive first.
    ///
    /// The sort is stable: verdicts of equal severity keep their input
    /// order, so the first applicable policy wins ties. Fails without
    /// reordering anything if any verdict carries an unknown status.
    pub fn order_verdicts<V: StatusBearer>(&self, verdicts: Vec<V>) -> Result<Vec<V>, MachineError> {
        let mut ranked = verdicts
            .into_iter()
            .map(|v| Ok((self.severity(v.status())?, v)))
            .collect::<Result<Vec<_>, MachineError>>()?;
        ranked.sort_by_key(|(rank, _)| *rank);
        Ok(ranked.into_iter().map(|(_, v)| v).collect())
    }

    /// Open a decision context for an element currently holding `current`.
    /// An unset current status imposes no restriction.
    pub fn context(&self, current: Option<&Status>) -> MachineContext<'_> {
        MachineContext {
            machine: self,
            current: current.cloned(),
        }
    }

    /// Whether `to` is directly reachable from `from`.
    pub fn is_reachable(&self, from: &Status, to: &Status) -> Result<bool, MachineError> {
        self.severity(from)?;
        self.severity(to)?;
        Ok(self.table.rule_for(from).map_or(true, |rule| rule.permits(to)))
    }
}

// ─── Context ─────────────────────────────────────────────────────────

/// The machine as seen by one decision: the element's current status is
/// fixed for the lifetime of the context.
#[derive(Debug, Clone)]
pub struct MachineContext<'m> {
    machine: &'m StatusMachine,
    current: Option<Status>,
}

impl<'m> MachineContext<'m> {
    /// The status the element currently holds.
    pub fn current(&self) -> Option<&Status> {
        self.current.as_ref()
    }

    /// The machine this context belongs to.
    pub fn machine(&self) -> &'m StatusMachine {
        self.machine
    }

    /// The status the element moves to when `candidate` is proposed.
    ///
    /// Returns `candidate` unchanged when it is directly reachable from the
    /// current status, and the restricting rule's fallback otherwise.
    pub fn resolve(&self, candidate: &Status) -> Result<Status, MachineError> {
        self.machine.severity(candidate)?;

        let Some(current) = &self.current else {
            return Ok(candidate.clone());
        };
        self.machine.severity(current)?;

        match self.machine.table.rule_for(current) {
            Some(rule) if !rule.permits(candidate) => {
                tracing::debug!(
                    current = %current,
                    candidate = %candidate,
                    fallback = %rule.fallback(),
                    "candidate status not reachable; applying fallback"
                );
                Ok(rule.fallback().clone())
            }
            _ => Ok(candidate.clone()),
        }
    }
}
