//! # rss-core: Foundational Types for the Resource Status System
//!
//! This crate is the leaf of the decision engine's crate DAG. It defines the
//! primitives every other crate agrees on: what a status is, which statuses
//! a deployment recognizes, which element is being evaluated, and the
//! parameters a single decision runs with.
//!
//! ## Key Design Principles
//!
//! 1. **`Status` is a validated newtype.** Status names come from external
//!    configuration, so they are strings, but never bare ones. `Unknown` and
//!    `Error` are the two sentinel outcomes a policy may report in addition
//!    to the configured vocabulary.
//!
//! 2. **`StatusVocabulary` carries the severity order.** The configured list
//!    is ordered most restrictive first; position is severity.
//!
//! 3. **`DecisionParameters` is a typed record.** The eight recognized keys
//!    are named fields that are always present; anything else the caller
//!    supplies is preserved in an ordered side map.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `rss-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod config;
pub mod element;
pub mod error;
pub mod params;
pub mod status;

// Re-export primary types for ergonomic imports.
pub use config::{ConfigurationSource, StatusConfig, TransitionRule};
pub use element::ElementFamily;
pub use error::{ConfigError, ValidationError};
pub use params::{DecisionOverrides, DecisionParameters};
pub use status::{Status, StatusVocabulary};
