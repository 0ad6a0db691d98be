//! # rss-state: Status State Machine
//!
//! Decides whether a candidate status may be adopted by an element given the
//! status it currently holds, and ranks conflicting policy verdicts by how
//! restrictive they are.
//!
//! ## Pieces
//!
//! - **Transition table** (`table.rs`): per-current-status access rules. A
//!   restricted status lists the statuses directly reachable from it and a
//!   fallback adopted when a candidate is out of reach. Unrestricted statuses
//!   reach everything.
//!
//! - **Machine** (`machine.rs`): the immutable severity order plus table,
//!   built once and shared read-only. Each decision opens a
//!   [`MachineContext`] carrying the element's current status; nothing about
//!   one decision is stored in the machine.
//!
//! ## Severity
//!
//! Configured statuses rank by their position in the vocabulary (most
//! restrictive first). `Unknown` and `Error` rank together below every
//! configured status.

pub mod error;
pub mod machine;
pub mod table;

pub use error::MachineError;
pub use machine::{MachineContext, StatusBearer, StatusMachine};
pub use table::{AccessRule, TransitionTable};
