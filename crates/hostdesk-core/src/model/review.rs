use serde::{Deserialize, Serialize};

/// A review left by a traveler. Server-owned and read-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    #[serde(deserialize_with = "super::id_as_string")]
    pub id: String,
    /// 1 to 5.
    pub rating: u8,
    pub traveler_name: String,
    pub date: String,
    #[serde(default)]
    pub comment: String,
}

/// Aggregate shown above the review list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReviewSummary {
    pub count: usize,
    pub average: Option<f64>,
}

impl ReviewSummary {
    /// Ratings outside 1..=5 are ignored.
    pub fn from_reviews(reviews: &[Review]) -> Self {
        let ratings: Vec<u8> = reviews
            .iter()
            .map(|r| r.rating)
            .filter(|r| (1..=5).contains(r))
            .collect();
        let average = if ratings.is_empty() {
            None
        } else {
            Some(ratings.iter().map(|r| f64::from(*r)).sum::<f64>() / ratings.len() as f64)
        };
        Self {
            count: reviews.len(),
            average,
        }
    }
}
