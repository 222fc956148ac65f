//! Sample catalog entities.

use reelpick_catalog::{Item, ItemId, NamedRef, Page, PlatformEntry};

/// Minimal item with the given id and a derived name.
#[must_use]
pub fn sample_item(id: ItemId) -> Item {
    named_item(id, &format!("Game {id}"))
}

/// Item with a genre and platform attached, suitable for rendering tests.
#[must_use]
pub fn named_item(id: ItemId, name: &str) -> Item {
    Item {
        id,
        name: name.to_string(),
        slug: name.to_lowercase().replace(' ', "-"),
        background_image: Some(format!("https://media.example.test/{id}.jpg")),
        released: None,
        rating: 4.0,
        rating_top: 5,
        ratings_count: 100,
        metacritic: None,
        playtime: 10,
        platforms: vec![PlatformEntry {
            platform: NamedRef {
                id: 4,
                name: "PC".to_string(),
                slug: "pc".to_string(),
            },
        }],
        genres: vec![NamedRef {
            id: 4,
            name: "Action".to_string(),
            slug: "action".to_string(),
        }],
        tags: Vec::new(),
        short_screenshots: Vec::new(),
        added_to_wishlist: false,
    }
}

/// Page wrapping `items`, advertising a continuation when `has_next` is set.
#[must_use]
pub fn sample_page(items: Vec<Item>, has_next: bool) -> Page {
    Page {
        count: items.len() as u64,
        next: has_next.then(|| "https://api.example.test/games?page=next".to_string()),
        items,
    }
}

/// Items with consecutive ids starting at `first`.
#[must_use]
pub fn sample_items(first: ItemId, count: usize) -> Vec<Item> {
    (first..).take(count).map(sample_item).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_items_are_consecutive() {
        let ids: Vec<_> = sample_items(7, 3).iter().map(|item| item.id).collect();
        assert_eq!(ids, vec![7, 8, 9]);
    }

    #[test]
    fn sample_page_reflects_continuation() {
        assert!(sample_page(sample_items(1, 2), true).has_next());
        assert!(!sample_page(Vec::new(), false).has_next());
    }
}
