//! Cacheable server-owned resources.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A stable identifier for one cacheable server-owned collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKey {
    Profile,
    Travelers,
    Templates,
    Reviews,
}

impl ResourceKey {
    pub const ALL: [ResourceKey; 4] = [
        ResourceKey::Profile,
        ResourceKey::Travelers,
        ResourceKey::Templates,
        ResourceKey::Reviews,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKey::Profile => "profile",
            ResourceKey::Travelers => "travelers",
            ResourceKey::Templates => "templates",
            ResourceKey::Reviews => "reviews",
        }
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
