//! Mutation layer.
//!
//! Every state-changing call is a [`Mutation`] whose invalidation footprint
//! is fixed by its [`MutationKind`]. The footprint table lives in one
//! exhaustive `match`, so a new kind cannot be added without declaring what
//! it invalidates.

mod host;
mod runner;

pub use host::{SaveTemplate, SendMessage, UpdateProfile};
pub use runner::MutationRunner;

use hostdesk_core::{ApiRequest, ResourceKey, Result};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MutationKind {
    UpdateProfile,
    SendMessage,
    SaveTemplate,
}

impl MutationKind {
    pub const ALL: [MutationKind; 3] = [
        MutationKind::UpdateProfile,
        MutationKind::SendMessage,
        MutationKind::SaveTemplate,
    ];

    /// Resource keys made stale when this mutation succeeds.
    pub const fn invalidates(self) -> &'static [ResourceKey] {
        match self {
            MutationKind::UpdateProfile => &[ResourceKey::Profile],
            MutationKind::SendMessage => &[ResourceKey::Travelers],
            MutationKind::SaveTemplate => &[ResourceKey::Templates],
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            MutationKind::UpdateProfile => "updateProfile",
            MutationKind::SendMessage => "sendMessage",
            MutationKind::SaveTemplate => "saveTemplate",
        }
    }
}

impl fmt::Display for MutationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A state-changing request against the host API.
pub trait Mutation: Send + Sync {
    const KIND: MutationKind;

    /// Local input checks, run before any request is sent.
    fn validate(&self) -> Result<()> {
        Ok(())
    }

    fn request(&self) -> Result<ApiRequest>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_kind_declares_a_footprint() {
        for kind in MutationKind::ALL {
            assert!(!kind.invalidates().is_empty(), "{} has no footprint", kind);
        }
    }

    #[test]
    fn test_footprints() {
        assert_eq!(
            MutationKind::UpdateProfile.invalidates(),
            &[ResourceKey::Profile]
        );
        assert_eq!(
            MutationKind::SendMessage.invalidates(),
            &[ResourceKey::Travelers]
        );
        assert_eq!(
            MutationKind::SaveTemplate.invalidates(),
            &[ResourceKey::Templates]
        );
    }
}
