//! Provider response shapes beyond the shared catalog model.

use reelpick_catalog::model::null_as_default;
use reelpick_catalog::{Item, NamedRef};
use serde::{Deserialize, Serialize};

/// Full record returned by `GET /games/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameDetails {
    /// Fields shared with list results.
    #[serde(flatten)]
    pub item: Item,
    /// Plain-text description.
    #[serde(default)]
    pub description_raw: Option<String>,
    /// Official website.
    #[serde(default)]
    pub website: Option<String>,
    /// Community subreddit.
    #[serde(default)]
    pub reddit_url: Option<String>,
    /// Critic review page.
    #[serde(default)]
    pub metacritic_url: Option<String>,
    /// Age rating.
    #[serde(default)]
    pub esrb_rating: Option<NamedRef>,
    /// Other titles the game is known by.
    #[serde(default, deserialize_with = "null_as_default")]
    pub alternative_names: Vec<String>,
    /// Number of DLCs and editions.
    #[serde(default)]
    pub additions_count: u64,
    /// Number of games in the same series.
    #[serde(default)]
    pub game_series_count: u64,
    /// Number of user reviews with text.
    #[serde(default)]
    pub reviews_text_count: u64,
    /// Number of related suggestions.
    #[serde(default)]
    pub suggestions_count: u64,
}

/// Genre or platform entry from the classification endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    /// Provider identifier; usable as a view parameter.
    pub id: u64,
    /// Display name.
    pub name: String,
    /// URL-safe slug.
    #[serde(default)]
    pub slug: String,
    /// Number of games in the classification.
    #[serde(default)]
    pub games_count: u64,
    /// Representative image.
    #[serde(default)]
    pub image_background: Option<String>,
}

/// Generic `{count, results}` envelope.
#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub(crate) struct ListEnvelope<T> {
    #[serde(default, deserialize_with = "null_as_default")]
    pub(crate) results: Vec<T>,
}

/// Error body the provider sends with failing statuses.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ProviderProblem {
    #[serde(default)]
    pub(crate) error: Option<String>,
    #[serde(default)]
    pub(crate) detail: Option<String>,
}

impl ProviderProblem {
    pub(crate) fn message(self) -> Option<String> {
        self.error.or(self.detail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn details_flatten_list_fields() -> Result<(), serde_json::Error> {
        let details: GameDetails = serde_json::from_value(json!({
            "id": 3328,
            "name": "The Witcher 3: Wild Hunt",
            "rating": 4.66,
            "metacritic": 92,
            "genres": [{"id": 5, "name": "RPG", "slug": "role-playing-games-rpg"}],
            "description_raw": "Geralt returns.",
            "esrb_rating": {"id": 4, "name": "Mature", "slug": "mature"},
            "alternative_names": null,
            "additions_count": 4
        }))?;

        assert_eq!(details.item.id, 3328);
        assert_eq!(details.item.metacritic, Some(92));
        assert_eq!(details.item.genre_names(), vec!["RPG"]);
        assert_eq!(details.esrb_rating.map(|rating| rating.name), Some("Mature".to_string()));
        assert!(details.alternative_names.is_empty());
        assert_eq!(details.additions_count, 4);
        Ok(())
    }

    #[test]
    fn problem_prefers_error_over_detail() {
        let problem = ProviderProblem {
            error: Some("The key parameter is not provided".to_string()),
            detail: Some("ignored".to_string()),
        };
        assert_eq!(
            problem.message().as_deref(),
            Some("The key parameter is not provided")
        );
        assert_eq!(ProviderProblem::default().message(), None);
    }
}
