//! Message composition state.

use hostdesk_core::model::{MessageTemplate, OutgoingMessage};
use hostdesk_core::{HostdeskError, Result};

/// The active compose field and its target traveler.
///
/// Applying a template copies its content; no link to the template is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageComposer {
    traveler_id: Option<String>,
    text: String,
}

impl MessageComposer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select_traveler(&mut self, traveler_id: impl Into<String>) {
        self.traveler_id = Some(traveler_id.into());
    }

    pub fn traveler_id(&self) -> Option<&str> {
        self.traveler_id.as_deref()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Overwrites any unsent draft with the template content.
    pub fn apply_template(&mut self, template: &MessageTemplate) {
        self.text = template.content.clone();
    }

    /// Builds the outgoing message, rejecting a missing target or blank text.
    pub fn to_message(&self) -> Result<OutgoingMessage> {
        let traveler_id = self
            .traveler_id
            .clone()
            .ok_or_else(|| HostdeskError::validation("No traveler selected"))?;
        if self.text.trim().is_empty() {
            return Err(HostdeskError::validation("Message text must not be empty"));
        }
        Ok(OutgoingMessage {
            traveler_id,
            text: self.text.clone(),
        })
    }

    pub fn clear(&mut self) {
        self.traveler_id = None;
        self.text.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template(content: &str) -> MessageTemplate {
        MessageTemplate {
            id: "tpl-1".to_string(),
            name: "Greeting".to_string(),
            content: content.to_string(),
        }
    }

    #[test]
    fn test_template_overwrites_draft() {
        let mut composer = MessageComposer::new();
        composer.set_text("half-written reply");

        composer.apply_template(&template("Hello!"));
        assert_eq!(composer.text(), "Hello!");
    }

    #[test]
    fn test_to_message_requires_traveler_and_text() {
        let mut composer = MessageComposer::new();
        composer.set_text("Hi");
        assert!(composer.to_message().unwrap_err().is_validation());

        composer.select_traveler("3");
        composer.set_text(" \n ");
        assert!(composer.to_message().unwrap_err().is_validation());

        composer.set_text("Hi");
        let message = composer.to_message().unwrap();
        assert_eq!(message.traveler_id, "3");
        assert_eq!(message.text, "Hi");
    }
}
