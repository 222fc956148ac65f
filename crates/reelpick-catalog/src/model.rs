//! Catalog entities as returned by the remote provider.
//!
//! Items are immutable once fetched. Collections the provider may send as
//! `null` deserialize as empty so that partially populated records still
//! round-trip through the wishlist snapshot.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};

/// Stable identity of a catalog item.
pub type ItemId = u64;

/// Lightweight reference to a named classification (genre, platform, store).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NamedRef {
    /// Provider identifier.
    pub id: u64,
    /// Display name.
    pub name: String,
    /// URL-safe slug.
    #[serde(default)]
    pub slug: String,
}

/// Platform wrapper as nested by the provider (`{"platform": {...}}`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlatformEntry {
    /// Platform reference.
    pub platform: NamedRef,
}

/// Descriptive tag attached to an item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tag {
    /// Provider identifier.
    pub id: u64,
    /// Display name.
    pub name: String,
    /// URL-safe slug.
    #[serde(default)]
    pub slug: String,
    /// Language code of the tag.
    #[serde(default)]
    pub language: String,
    /// Number of items carrying the tag.
    #[serde(default)]
    pub games_count: u64,
}

/// Screenshot reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Screenshot {
    /// Provider identifier.
    pub id: u64,
    /// Image URL.
    pub image: String,
}

/// One catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Unique identity.
    pub id: ItemId,
    /// Display name.
    pub name: String,
    /// URL-safe slug.
    #[serde(default)]
    pub slug: String,
    /// Cover image reference.
    #[serde(default)]
    pub background_image: Option<String>,
    /// Release date when announced.
    #[serde(default)]
    pub released: Option<NaiveDate>,
    /// Aggregate user rating.
    #[serde(default)]
    pub rating: f64,
    /// Upper bound of the rating scale.
    #[serde(default)]
    pub rating_top: u32,
    /// Number of ratings behind `rating`.
    #[serde(default)]
    pub ratings_count: u64,
    /// Critic score, if any.
    #[serde(default)]
    pub metacritic: Option<u32>,
    /// Average playtime in hours.
    #[serde(default)]
    pub playtime: u32,
    /// Platforms the item ships on.
    #[serde(default, deserialize_with = "null_as_default")]
    pub platforms: Vec<PlatformEntry>,
    /// Genres the item belongs to.
    #[serde(default, deserialize_with = "null_as_default")]
    pub genres: Vec<NamedRef>,
    /// Descriptive tags.
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<Tag>,
    /// Preview screenshots.
    #[serde(default, deserialize_with = "null_as_default")]
    pub short_screenshots: Vec<Screenshot>,
    /// Provenance flag set when the item is saved to the wishlist.
    #[serde(default)]
    pub added_to_wishlist: bool,
}

impl Item {
    /// Genre display names in provider order.
    #[must_use]
    pub fn genre_names(&self) -> Vec<&str> {
        self.genres.iter().map(|genre| genre.name.as_str()).collect()
    }

    /// Platform display names in provider order.
    #[must_use]
    pub fn platform_names(&self) -> Vec<&str> {
        self.platforms
            .iter()
            .map(|entry| entry.platform.name.as_str())
            .collect()
    }

    /// Release year, if the item has a release date.
    #[must_use]
    pub fn release_year(&self) -> Option<i32> {
        self.released.map(|date| date.year())
    }
}

/// Ordered batch of items plus the continuation marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// Total number of items the provider reports for the query.
    #[serde(default)]
    pub count: u64,
    /// Continuation marker; present when a further page exists.
    #[serde(default)]
    pub next: Option<String>,
    /// Items in provider order.
    #[serde(default, rename = "results", deserialize_with = "null_as_default")]
    pub items: Vec<Item>,
}

impl Page {
    /// Whether the provider advertised a further page.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.next.is_some()
    }

    /// Number of items in this page.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the page carries no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Deserialize `null` as the type's default value.
///
/// # Errors
///
/// Propagates any error from the inner deserializer.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn item_tolerates_null_collections() -> anyhow::Result<()> {
        let item: Item = serde_json::from_value(json!({
            "id": 3498,
            "name": "Grand Theft Auto V",
            "released": "2013-09-17",
            "rating": 4.47,
            "platforms": null,
            "genres": [{"id": 4, "name": "Action", "slug": "action"}],
            "tags": null,
            "short_screenshots": null
        }))?;

        assert!(item.platforms.is_empty());
        assert!(item.tags.is_empty());
        assert_eq!(item.genre_names(), vec!["Action"]);
        assert_eq!(item.release_year(), Some(2013));
        assert!(!item.added_to_wishlist);
        Ok(())
    }

    #[test]
    fn page_reads_provider_envelope() -> anyhow::Result<()> {
        let page: Page = serde_json::from_value(json!({
            "count": 2,
            "next": "https://api.example.test/games?page=2",
            "previous": null,
            "results": [
                {"id": 1, "name": "One"},
                {"id": 2, "name": "Two"}
            ]
        }))?;

        assert!(page.has_next());
        assert_eq!(page.len(), 2);
        assert_eq!(page.items[1].name, "Two");
        Ok(())
    }

    #[test]
    fn last_page_has_no_continuation() -> anyhow::Result<()> {
        let page: Page = serde_json::from_value(json!({
            "count": 0,
            "next": null,
            "results": []
        }))?;
        assert!(!page.has_next());
        assert!(page.is_empty());
        Ok(())
    }
}
