//! Browsing modes and the cache key they form.

use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

/// A browsing mode plus its parameters.
///
/// The variant and its parameters form the cache key: equal views share one
/// cached page sequence, different views never do. Search text is trimmed on
/// construction so that `" zelda "` and `"zelda"` resolve to the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "param", rename_all = "snake_case")]
pub enum View {
    /// Highest rated items.
    Popular,
    /// Items added most recently within the trending window.
    Trending,
    /// Items in one genre.
    Genre(u64),
    /// Items on one platform.
    Platform(u64),
    /// Free-text search.
    Search(String),
}

impl View {
    /// Build a search view with normalised text.
    #[must_use]
    pub fn search(text: impl AsRef<str>) -> Self {
        Self::Search(text.as_ref().trim().to_string())
    }

    /// Whether the view carries the parameter it needs to be fetched.
    ///
    /// Genre and platform ids of zero mean "unset"; blank search text is
    /// likewise disabled.
    #[must_use]
    pub fn has_required_param(&self) -> bool {
        match self {
            Self::Popular | Self::Trending => true,
            Self::Genre(id) | Self::Platform(id) => *id != 0,
            Self::Search(text) => !text.trim().is_empty(),
        }
    }

    /// Machine-friendly discriminator used in logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Popular => "popular",
            Self::Trending => "trending",
            Self::Genre(_) => "genre",
            Self::Platform(_) => "platform",
            Self::Search(_) => "search",
        }
    }
}

impl Display for View {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Popular | Self::Trending => formatter.write_str(self.kind()),
            Self::Genre(id) | Self::Platform(id) => write!(formatter, "{}:{id}", self.kind()),
            Self::Search(text) => write!(formatter, "search:{text:?}"),
        }
    }
}

/// Page request handed to a [`crate::CatalogProvider`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// View being paged.
    pub view: View,
    /// One-based page number.
    pub page: u32,
    /// Requested number of items per page.
    pub page_size: u32,
}

/// Genre identifiers shown as home rows.
pub const HOME_GENRES: [(&str, u64); 6] = [
    ("Action", 4),
    ("RPG", 5),
    ("Adventure", 3),
    ("Shooter", 2),
    ("Strategy", 10),
    ("Racing", 1),
];

/// Ordered home screen rows: popular, trending, then a fixed genre set.
#[must_use]
pub fn home_rows() -> Vec<(&'static str, View)> {
    let mut rows = vec![("Popular", View::Popular), ("Trending", View::Trending)];
    rows.extend(
        HOME_GENRES
            .iter()
            .map(|(title, id)| (*title, View::Genre(*id))),
    );
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn equal_parameters_form_one_key() {
        let mut keys = HashSet::new();
        keys.insert(View::search("zelda"));
        keys.insert(View::search("  zelda "));
        keys.insert(View::Genre(4));
        keys.insert(View::Genre(4));
        assert_eq!(keys.len(), 2);
    }

    #[test]
    fn variants_with_same_id_do_not_collide() {
        assert_ne!(View::Genre(4), View::Platform(4));
        assert_ne!(View::search("4"), View::Genre(4));
    }

    #[test]
    fn missing_parameters_disable_the_view() {
        assert!(View::Popular.has_required_param());
        assert!(View::Trending.has_required_param());
        assert!(!View::Genre(0).has_required_param());
        assert!(!View::Platform(0).has_required_param());
        assert!(!View::search("   ").has_required_param());
        assert!(View::search("mario").has_required_param());
    }

    #[test]
    fn display_is_stable() {
        assert_eq!(View::Popular.to_string(), "popular");
        assert_eq!(View::Platform(187).to_string(), "platform:187");
        assert_eq!(View::search("half life").to_string(), "search:\"half life\"");
    }

    #[test]
    fn home_rows_lead_with_popular_and_trending() {
        let rows = home_rows();
        assert_eq!(rows.len(), 8);
        assert_eq!(rows[0].1, View::Popular);
        assert_eq!(rows[1].1, View::Trending);
        assert_eq!(rows[2], ("Action", View::Genre(4)));
    }
}
