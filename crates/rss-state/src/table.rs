//! # Transition Table
//!
//! For a handful of current statuses the set of directly reachable statuses
//! is restricted. Each restriction is an [`AccessRule`]: an access list and
//! the fallback the machine adopts when a candidate is not on it.
//!
//! ## Fallback Selection
//!
//! 1. A rule may name its fallback explicitly. It must be on the access list
//!    and must not be `Error`.
//! 2. Otherwise the fallback is the most restrictive status on the access
//!    list, ties broken by list order.
//!
//! Rule 2 can force an element to a status more restrictive than any verdict
//! asked for. With access list `[Probing, Banned, Unknown, Error]` and no
//! explicit fallback, a `Probing` element whose candidate is `Degraded` is
//! forced to `Banned`. Name `fallback` explicitly when that is unwanted.
//!
//! Every status referenced by a rule must be known to the vocabulary
//! (configured statuses plus the two sentinels).

use std::collections::BTreeMap;

use serde::Serialize;

use rss_core::{Status, StatusVocabulary, TransitionRule};

use crate::error::MachineError;
use crate::machine::severity_rank;

// ─── Access Rule ─────────────────────────────────────────────────────

/// A validated restriction on one current status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessRule {
    allowed: Vec<Status>,
    fallback: Status,
}

impl AccessRule {
    /// Validate a configured rule for `state` against `vocabulary` and
    /// settle its fallback.
    pub fn new(
        state: &Status,
        rule: &TransitionRule,
        vocabulary: &StatusVocabulary,
    ) -> Result<Self, MachineError> {
        let invalid = |reason: String| MachineError::InvalidRule {
            state: state.to_string(),
            reason,
        };

        if rule.allowed.is_empty() {
            return Err(invalid("access list is empty".to_string()));
        }
        for status in &rule.allowed {
            if !vocabulary.admits(status) {
                return Err(invalid(format!("access list names unknown status {status}")));
            }
        }

        let fallback = match &rule.fallback {
            Some(fallback) => {
                if !rule.allowed.contains(fallback) {
                    return Err(invalid(format!(
                        "fallback {fallback} is not on the access list"
                    )));
                }
                fallback.clone()
            }
            None => most_restrictive(&rule.allowed, vocabulary)
                .ok_or_else(|| invalid("no usable fallback on the access list".to_string()))?,
        };
        if fallback.is_error() {
            return Err(invalid("fallback cannot be Error".to_string()));
        }

        Ok(Self {
            allowed: rule.allowed.clone(),
            fallback,
        })
    }

    /// Statuses directly reachable under this rule.
    pub fn allowed(&self) -> &[Status] {
        &self.allowed
    }

    /// Status adopted when a candidate is out of reach.
    pub fn fallback(&self) -> &Status {
        &self.fallback
    }

    /// Whether `candidate` is directly reachable.
    pub fn permits(&self, candidate: &Status) -> bool {
        self.allowed.contains(candidate)
    }
}

// `Error` is never a fallback; the first non-Error entry of lowest rank wins.
fn most_restrictive(allowed: &[Status], vocabulary: &StatusVocabulary) -> Option<Status> {
    allowed
        .iter()
        .filter(|s| !s.is_error())
        .filter_map(|s| severity_rank(vocabulary, s).map(|rank| (rank, s)))
        .min_by_key(|(rank, _)| *rank)
        .map(|(_, s)| s.clone())
}

// ─── Transition Table ────────────────────────────────────────────────

/// Access rules keyed by the restricted current status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TransitionTable {
    rules: BTreeMap<Status, AccessRule>,
}

impl TransitionTable {
    /// A table with no restrictions: every status reaches every status.
    pub fn unrestricted() -> Self {
        Self::default()
    }

    /// Build a table from configured rules.
    pub fn from_rules(
        rules: &BTreeMap<Status, TransitionRule>,
        vocabulary: &StatusVocabulary,
    ) -> Result<Self, MachineError> {
        let mut table = Self::unrestricted();
        for (state, rule) in rules {
            if !vocabulary.admits(state) {
                return Err(MachineError::UnknownStatus {
                    status: state.to_string(),
                });
            }
            table
                .rules
                .insert(state.clone(), AccessRule::new(state, rule, vocabulary)?);
        }
        Ok(table)
    }

    /// The rule restricting `state`, if any.
    pub fn rule_for(&self, state: &Status) -> Option<&AccessRule> {
        self.rules.get(state)
    }

    /// Whether `state` is restricted.
    pub fn is_restricted(&self, state: &Status) -> bool {
        self.rules.contains_key(state)
    }

    /// Number of restricted statuses.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether no status is restricted.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn st(name: &str) -> Status {
        Status::new(name).unwrap()
    }

    fn rule(allowed: &[&str], fallback: Option<&str>) -> TransitionRule {
        TransitionRule {
            allowed: allowed.iter().map(|s| st(s)).collect(),
            fallback: fallback.map(st),
        }
    }

    #[test]
    fn explicit_fallback_is_kept() {
        let vocab = StatusVocabulary::standard();
        let access = AccessRule::new(&st("Banned"), &rule(&["Banned", "Probing"], Some("Probing")), &vocab)
            .unwrap();
        assert_eq!(access.fallback(), &st("Probing"));
        assert!(access.permits(&st("Banned")));
        assert!(!access.permits(&st("Active")));
    }

    #[test]
    fn implicit_fallback_is_most_restrictive() {
        let vocab = StatusVocabulary::standard();
        let access = AccessRule::new(
            &st("Probing"),
            &rule(&["Error", "Unknown", "Active", "Probing"], None),
            &vocab,
        )
        .unwrap();
        assert_eq!(access.fallback(), &st("Probing"));
    }

    #[test]
    fn implicit_fallback_of_sentinels_is_unknown() {
        let vocab = StatusVocabulary::standard();
        let access = AccessRule::new(&st("Banned"), &rule(&["Error", "Unknown"], None), &vocab).unwrap();
        assert_eq!(access.fallback(), &Status::unknown());
    }

    #[test]
    fn fallback_must_be_on_access_list() {
        let vocab = StatusVocabulary::standard();
        let err = AccessRule::new(&st("Banned"), &rule(&["Banned"], Some("Active")), &vocab).unwrap_err();
        assert!(matches!(err, MachineError::InvalidRule { .. }));
        assert!(err.to_string().contains("not on the access list"));
    }

    #[test]
    fn error_only_access_list_has_no_fallback() {
        let vocab = StatusVocabulary::standard();
        assert!(AccessRule::new(&st("Banned"), &rule(&["Error"], None), &vocab).is_err());
        assert!(AccessRule::new(&st("Banned"), &rule(&["Error"], Some("Error")), &vocab).is_err());
    }

    #[test]
    fn unknown_statuses_are_rejected() {
        let vocab = StatusVocabulary::standard();
        assert!(AccessRule::new(&st("Banned"), &rule(&["Bogus"], None), &vocab).is_err());
        assert!(AccessRule::new(&st("Banned"), &rule(&[], None), &vocab).is_err());

        let mut rules = BTreeMap::new();
        rules.insert(st("Bogus"), rule(&["Banned"], None));
        assert_eq!(
            TransitionTable::from_rules(&rules, &vocab).unwrap_err(),
            MachineError::UnknownStatus {
                status: "Bogus".into()
            }
        );
    }

    #[test]
    fn table_from_standard_config() {
        let config = rss_core::StatusConfig::standard();
        let table = TransitionTable::from_rules(&config.transitions, &config.statuses).unwrap();
        assert_eq!(table.len(), 2);
        assert!(table.is_restricted(&st("Banned")));
        assert!(!table.is_restricted(&st("Active")));
        assert_eq!(table.rule_for(&st("Banned")).unwrap().fallback(), &st("Probing"));
    }
}
