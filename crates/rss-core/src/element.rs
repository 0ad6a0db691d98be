//! # Element Families
//!
//! The three families of managed grid element whose status is tracked.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// The family an evaluated element belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ElementFamily {
    /// A grid site.
    Site,
    /// A resource: storage endpoint, computing element, queue.
    Resource,
    /// A single node.
    Node,
}

impl ElementFamily {
    /// All families in declaration order.
    pub const ALL: [ElementFamily; 3] = [Self::Site, Self::Resource, Self::Node];

    /// Return the canonical name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Site => "Site",
            Self::Resource => "Resource",
            Self::Node => "Node",
        }
    }
}

impl std::fmt::Display for ElementFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ElementFamily {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|family| family.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownElementFamily(s.to_string()))
    }
}
