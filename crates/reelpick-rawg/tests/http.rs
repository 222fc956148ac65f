use std::sync::Arc;

use anyhow::Result;
use chrono::NaiveDate;
use httpmock::MockServer;
use httpmock::prelude::*;
use reelpick_catalog::{CatalogProvider, PageRequest, StaticProbe, View, ViewCache};
use reelpick_rawg::{RawgClient, RawgError};
use reqwest::Client;
use serde_json::{Value, json};
use url::Url;

const KEY: &str = "test-key";

fn rawg(server: &MockServer) -> Result<RawgClient> {
    Ok(RawgClient::with_client(
        Client::new(),
        Url::parse(&server.url("/api"))?,
        Some(KEY.to_string()),
    ))
}

fn games_body(ids: &[u64], next: Option<&str>) -> Value {
    let results: Vec<Value> = ids
        .iter()
        .map(|id| json!({"id": id, "name": format!("Game {id}"), "rating": 4.2}))
        .collect();
    json!({"count": 42, "next": next, "previous": null, "results": results})
}

#[tokio::test]
async fn popular_page_carries_key_and_ordering() -> Result<()> {
    let server = MockServer::start_async().await;
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/api/games")
            .query_param("key", KEY)
            .query_param("ordering", "-rating")
            .query_param("page", "2")
            .query_param("page_size", "20");
        then.status(200)
            .json_body(games_body(&[21, 22], Some("https://api.rawg.io/api/games?page=3")));
    });

    let page = rawg(&server)?
        .games(&PageRequest {
            view: View::Popular,
            page: 2,
            page_size: 20,
        })
        .await?;

    mock.assert();
    assert_eq!(page.count, 42);
    assert!(page.has_next());
    assert_eq!(page.items.iter().map(|item| item.id).collect::<Vec<_>>(), vec![21, 22]);
    Ok(())
}

#[tokio::test]
async fn trending_page_filters_the_last_thirty_days() -> Result<()> {
    let server = MockServer::start_async().await;
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/api/games")
            .query_param("dates", "2024-02-14,2024-03-15")
            .query_param("ordering", "-added");
        then.status(200).json_body(games_body(&[1], None));
    });

    let today = NaiveDate::from_ymd_opt(2024, 3, 15).ok_or_else(|| anyhow::anyhow!("date"))?;
    let request = PageRequest {
        view: View::Trending,
        page: 1,
        page_size: 20,
    };
    let page = rawg(&server)?.games_on(&request, today).await?;

    mock.assert();
    assert!(!page.has_next());
    Ok(())
}

#[tokio::test]
async fn provider_seam_maps_search_text() -> Result<()> {
    let server = MockServer::start_async().await;
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/api/games")
            .query_param("search", "zelda")
            .query_param("page", "1");
        then.status(200).json_body(games_body(&[7], None));
    });

    let provider: Arc<dyn CatalogProvider> = Arc::new(rawg(&server)?);
    let page = provider
        .fetch_page(PageRequest {
            view: View::search("  zelda "),
            page: 1,
            page_size: 20,
        })
        .await?;

    mock.assert();
    assert_eq!(page.items[0].name, "Game 7");
    Ok(())
}

#[tokio::test]
async fn error_status_keeps_provider_message() -> Result<()> {
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(GET).path("/api/genres");
        then.status(401)
            .json_body(json!({"error": "The key parameter is not provided"}));
    });

    let err = rawg(&server)?
        .genres()
        .await
        .expect_err("unauthorised response should fail");

    assert_eq!(err.status(), Some(401));
    match err {
        RawgError::Status { message, .. } => {
            assert_eq!(message, "The key parameter is not provided");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn details_and_screenshots_are_fetched_by_id() -> Result<()> {
    let server = MockServer::start_async().await;
    let details = server.mock(|when, then| {
        when.method(GET).path("/api/games/3498").query_param("key", KEY);
        then.status(200).json_body(json!({
            "id": 3498,
            "name": "Grand Theft Auto V",
            "released": "2013-09-17",
            "description_raw": "Los Santos.",
            "website": "http://www.rockstargames.com/V/",
            "alternative_names": ["GTA 5"]
        }));
    });
    let screenshots = server.mock(|when, then| {
        when.method(GET).path("/api/games/3498/screenshots");
        then.status(200).json_body(json!({
            "count": 2,
            "results": [
                {"id": 1, "image": "https://media.rawg.io/1.jpg"},
                {"id": 2, "image": "https://media.rawg.io/2.jpg"}
            ]
        }));
    });

    let client = rawg(&server)?;
    let game = client.game_details(3498).await?;
    let shots = client.screenshots(3498).await?;

    details.assert();
    screenshots.assert();
    assert_eq!(game.item.release_year(), Some(2013));
    assert_eq!(game.alternative_names, vec!["GTA 5".to_string()]);
    assert_eq!(shots.len(), 2);
    Ok(())
}

#[tokio::test]
async fn classification_lists_use_fixed_page_sizes() -> Result<()> {
    let server = MockServer::start_async().await;
    let genres = server.mock(|when, then| {
        when.method(GET).path("/api/genres").query_param("page_size", "20");
        then.status(200).json_body(json!({
            "count": 1,
            "results": [{"id": 4, "name": "Action", "slug": "action", "games_count": 180000}]
        }));
    });
    let platforms = server.mock(|when, then| {
        when.method(GET).path("/api/platforms").query_param("page_size", "50");
        then.status(200).json_body(json!({
            "count": 1,
            "results": [{"id": 187, "name": "PlayStation 5", "slug": "playstation5", "games_count": 1000}]
        }));
    });

    let client = rawg(&server)?;
    assert_eq!(client.genres().await?[0].id, 4);
    assert_eq!(client.platforms().await?[0].name, "PlayStation 5");
    genres.assert();
    platforms.assert();
    Ok(())
}

#[tokio::test]
async fn view_cache_pages_through_the_provider() -> Result<()> {
    let server = MockServer::start_async().await;
    let first = server.mock(|when, then| {
        when.method(GET)
            .path("/api/games")
            .query_param("genres", "4")
            .query_param("page", "1");
        then.status(200).json_body(games_body(&[1, 2], Some("next")));
    });
    let second = server.mock(|when, then| {
        when.method(GET)
            .path("/api/games")
            .query_param("genres", "4")
            .query_param("page", "2");
        then.status(200).json_body(games_body(&[3], None));
    });

    let cache = ViewCache::new(Arc::new(rawg(&server)?), Arc::new(StaticProbe(true)), 2);
    let view = View::Genre(4);
    cache.get_page(&view, cache.next_page_number(&view)).await?;
    cache.get_page(&view, cache.next_page_number(&view)).await?;

    first.assert();
    second.assert();
    assert_eq!(cache.items(&view).len(), 3);
    assert!(!cache.has_more(&view));
    Ok(())
}
