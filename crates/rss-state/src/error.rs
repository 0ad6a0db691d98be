//! # Machine Errors

use thiserror::Error;

/// Errors raised by the status state machine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MachineError {
    /// A status outside the machine's vocabulary was used.
    #[error("status {status:?} is not known to the state machine")]
    UnknownStatus {
        /// The unrecognized status name.
        status: String,
    },

    /// A transition rule is inconsistent with the vocabulary.
    #[error("invalid transition rule for {state}: {reason}")]
    InvalidRule {
        /// The restricted current status.
        state: String,
        /// Why the rule was rejected.
        reason: String,
    },
}
