use serde::{Deserialize, Serialize};

use crate::error::SceneError;

/// Identifier for an element within one composed scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementId(pub u32);

impl ElementId {
    /// Placeholder carried by elements that have not been spawned yet.
    pub const UNASSIGNED: ElementId = ElementId(0);
}

/// The slice of the signed-in user record the scene cares about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProgress {
    /// Progression level; unbounded, the tree clamps it for display.
    pub level: i64,
    pub rating: f64,
    pub league: String,
}

impl Default for UserProgress {
    fn default() -> Self {
        Self {
            level: 1,
            rating: 0.0,
            league: "Bronze".to_string(),
        }
    }
}

impl UserProgress {
    /// Fold the backend's reply to a completed eco action into this record.
    pub fn apply(&mut self, response: &ActionResponse) {
        self.level = response.new_level;
        self.rating = response.new_rating;
        self.league.clone_from(&response.new_league);
    }
}

/// Backend reply after completing an eco action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionResponse {
    pub new_rating: f64,
    pub new_level: i64,
    pub new_league: String,
}

impl ActionResponse {
    pub fn from_json(json: &str) -> Result<Self, SceneError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_response_updates_progress() {
        let response = ActionResponse::from_json(
            r#"{ "new_rating": 1250.5, "new_level": 4, "new_league": "Silver" }"#,
        )
        .unwrap();
        let mut progress = UserProgress::default();
        progress.apply(&response);
        assert_eq!(progress.level, 4);
        assert_eq!(progress.league, "Silver");
        assert!((progress.rating - 1250.5).abs() < 1e-9);
    }

    #[test]
    fn malformed_response_is_an_error() {
        assert!(ActionResponse::from_json(r#"{ "new_level": "four" }"#).is_err());
    }
}
