use serde::{Deserialize, Serialize};

/// A candidate traveler. Read-only from the client's perspective.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Traveler {
    #[serde(deserialize_with = "super::id_as_string")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub availability: String,
    /// Date of the last message sent to this traveler, as reported by the
    /// server after a refetch.
    #[serde(default)]
    pub last_contacted: Option<String>,
}

impl Traveler {
    pub fn is_contacted(&self) -> bool {
        self.last_contacted.is_some()
    }
}

/// Optional filters for the traveler list. Unset filters are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TravelerFilters {
    pub skill: Option<String>,
    pub availability: Option<String>,
    pub location: Option<String>,
}

impl TravelerFilters {
    /// Query parameters in a stable order.
    pub fn to_query(&self) -> Vec<(String, String)> {
        [
            ("skill", &self.skill),
            ("availability", &self.availability),
            ("location", &self.location),
        ]
        .into_iter()
        .filter_map(|(name, value)| {
            value
                .as_ref()
                .filter(|v| !v.trim().is_empty())
                .map(|v| (name.to_string(), v.clone()))
        })
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_id_is_accepted() {
        let traveler: Traveler = serde_json::from_value(serde_json::json!({
            "id": 2,
            "name": "Bob",
            "skills": ["Carpentry", "Teaching"],
            "availability": "July-September",
            "lastContacted": "2023-05-01"
        }))
        .unwrap();

        assert_eq!(traveler.id, "2");
        assert!(traveler.is_contacted());
    }

    #[test]
    fn test_missing_last_contacted() {
        let traveler: Traveler = serde_json::from_value(serde_json::json!({
            "id": "t-1",
            "name": "Alice"
        }))
        .unwrap();
        assert!(!traveler.is_contacted());
        assert!(traveler.skills.is_empty());
    }

    #[test]
    fn test_filters_skip_unset_and_blank() {
        let filters = TravelerFilters {
            skill: Some("cooking".to_string()),
            availability: Some("  ".to_string()),
            location: None,
        };
        assert_eq!(
            filters.to_query(),
            vec![("skill".to_string(), "cooking".to_string())]
        );
    }
}
