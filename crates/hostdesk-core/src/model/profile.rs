//! HostProfile domain model.

use serde::{Deserialize, Serialize};

/// The host's self-description. Exactly one per session.
///
/// Updates are always sent as a full replace, so edits are expressed as a
/// [`ProfilePatch`] merged into the current profile first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HostProfile {
    pub description: String,
    pub location: String,
    pub accommodation: String,
    pub languages: String,
    /// Kinds of help the host is looking for (gardening, cooking, ...).
    pub help_types: Vec<String>,
}

/// Field-level edit of a [`HostProfile`]. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfilePatch {
    pub description: Option<String>,
    pub location: Option<String>,
    pub accommodation: Option<String>,
    pub languages: Option<String>,
    pub help_types: Option<Vec<String>>,
}

impl ProfilePatch {
    pub fn is_empty(&self) -> bool {
        self.description.is_none()
            && self.location.is_none()
            && self.accommodation.is_none()
            && self.languages.is_none()
            && self.help_types.is_none()
    }
}

impl HostProfile {
    /// Returns a copy of this profile with the patch applied.
    pub fn merged(&self, patch: &ProfilePatch) -> HostProfile {
        let mut next = self.clone();
        if let Some(description) = &patch.description {
            next.description = description.clone();
        }
        if let Some(location) = &patch.location {
            next.location = location.clone();
        }
        if let Some(accommodation) = &patch.accommodation {
            next.accommodation = accommodation.clone();
        }
        if let Some(languages) = &patch.languages {
            next.languages = languages.clone();
        }
        if let Some(help_types) = &patch.help_types {
            let mut deduped: Vec<String> = Vec::with_capacity(help_types.len());
            for help_type in help_types {
                if !deduped.contains(help_type) {
                    deduped.push(help_type.clone());
                }
            }
            next.help_types = deduped;
        }
        next
    }
}
