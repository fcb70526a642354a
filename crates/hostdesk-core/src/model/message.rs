use serde::{Deserialize, Serialize};

/// A message to a traveler. Write-only: nothing is kept locally after send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutgoingMessage {
    pub traveler_id: String,
    #[serde(rename = "message")]
    pub text: String,
}

/// A reusable message template owned by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageTemplate {
    #[serde(deserialize_with = "super::id_as_string")]
    pub id: String,
    pub name: String,
    pub content: String,
}

/// Request body for creating a template; the server assigns the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTemplate {
    pub name: String,
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outgoing_message_wire_shape() {
        let msg = OutgoingMessage {
            traveler_id: "42".to_string(),
            text: "Hi there".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&msg).unwrap(),
            serde_json::json!({ "travelerId": "42", "message": "Hi there" })
        );
    }
}
