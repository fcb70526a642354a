use super::{Mutation, MutationKind};
use hostdesk_core::api::endpoints;
use hostdesk_core::model::{HostProfile, NewTemplate, OutgoingMessage};
use hostdesk_core::{ApiRequest, HostdeskError, Result};

/// Full replace of the host profile.
#[derive(Debug, Clone)]
pub struct UpdateProfile(pub HostProfile);

impl Mutation for UpdateProfile {
    const KIND: MutationKind = MutationKind::UpdateProfile;

    fn request(&self) -> Result<ApiRequest> {
        endpoints::update_host_profile(&self.0)
    }
}

#[derive(Debug, Clone)]
pub struct SendMessage(pub OutgoingMessage);

impl Mutation for SendMessage {
    const KIND: MutationKind = MutationKind::SendMessage;

    fn validate(&self) -> Result<()> {
        if self.0.traveler_id.trim().is_empty() {
            return Err(HostdeskError::validation("No traveler selected"));
        }
        if self.0.text.trim().is_empty() {
            return Err(HostdeskError::validation("Message text must not be empty"));
        }
        Ok(())
    }

    fn request(&self) -> Result<ApiRequest> {
        endpoints::send_message(&self.0)
    }
}

#[derive(Debug, Clone)]
pub struct SaveTemplate(pub NewTemplate);

impl Mutation for SaveTemplate {
    const KIND: MutationKind = MutationKind::SaveTemplate;

    fn request(&self) -> Result<ApiRequest> {
        endpoints::save_message_template(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_message_is_rejected() {
        let mutation = SendMessage(OutgoingMessage {
            traveler_id: "1".to_string(),
            text: "   ".to_string(),
        });
        assert!(mutation.validate().unwrap_err().is_validation());
    }

    #[test]
    fn test_message_without_traveler_is_rejected() {
        let mutation = SendMessage(OutgoingMessage {
            traveler_id: String::new(),
            text: "Hello".to_string(),
        });
        assert!(mutation.validate().is_err());
    }
}
