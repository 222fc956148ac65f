//! HTTP client for the RAWG video game database.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use reelpick_catalog::{CatalogProvider, ItemId, Page, PageRequest, Screenshot};
use reelpick_config::{AppConfig, api_key_available};
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::error::{RawgError, RawgResult};
use crate::models::{Classification, GameDetails, ListEnvelope, ProviderProblem};
use crate::query::page_params;

/// Page size used for the genre list.
pub const GENRE_LIST_SIZE: u32 = 20;
/// Page size used for the platform list.
pub const PLATFORM_LIST_SIZE: u32 = 50;

const MAX_ERROR_BODY: usize = 200;

/// Client bound to one base URL and API key.
#[derive(Debug, Clone)]
pub struct RawgClient {
    http: Client,
    base_url: Url,
    api_key: Option<String>,
}

impl RawgClient {
    /// Build a client from application settings.
    ///
    /// # Errors
    ///
    /// Returns [`RawgError::ClientBuild`] if the HTTP client cannot be built.
    pub fn new(config: &AppConfig) -> RawgResult<Self> {
        let http = Client::builder()
            .timeout(config.http_timeout)
            .user_agent(concat!("reelpick/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|source| RawgError::ClientBuild { source })?;
        Ok(Self::with_client(
            http,
            config.api_url.clone(),
            config.api_key.clone(),
        ))
    }

    /// Wrap an existing HTTP client.
    #[must_use]
    pub const fn with_client(http: Client, base_url: Url, api_key: Option<String>) -> Self {
        Self {
            http,
            base_url,
            api_key,
        }
    }

    /// Whether requests may be issued.
    #[must_use]
    pub fn api_key_available(&self) -> bool {
        api_key_available(self.api_key.as_deref())
    }

    /// One page of games for a view, using today's date for the trending window.
    ///
    /// # Errors
    ///
    /// See [`RawgError`].
    pub async fn games(&self, request: &PageRequest) -> RawgResult<Page> {
        self.games_on(request, Utc::now().date_naive()).await
    }

    /// One page of games for a view as of `today`.
    ///
    /// # Errors
    ///
    /// See [`RawgError`].
    pub async fn games_on(&self, request: &PageRequest, today: NaiveDate) -> RawgResult<Page> {
        self.get_json("games", &page_params(request, today)).await
    }

    /// Full details for one game.
    ///
    /// # Errors
    ///
    /// See [`RawgError`].
    pub async fn game_details(&self, id: ItemId) -> RawgResult<GameDetails> {
        self.get_json(&format!("games/{id}"), &[]).await
    }

    /// Screenshots for one game.
    ///
    /// # Errors
    ///
    /// See [`RawgError`].
    pub async fn screenshots(&self, id: ItemId) -> RawgResult<Vec<Screenshot>> {
        let envelope: ListEnvelope<Screenshot> =
            self.get_json(&format!("games/{id}/screenshots"), &[]).await?;
        Ok(envelope.results)
    }

    /// Genre catalog.
    ///
    /// # Errors
    ///
    /// See [`RawgError`].
    pub async fn genres(&self) -> RawgResult<Vec<Classification>> {
        let params = [("page_size", GENRE_LIST_SIZE.to_string())];
        let envelope: ListEnvelope<Classification> = self.get_json("genres", &params).await?;
        Ok(envelope.results)
    }

    /// Platform catalog.
    ///
    /// # Errors
    ///
    /// See [`RawgError`].
    pub async fn platforms(&self) -> RawgResult<Vec<Classification>> {
        let params = [("page_size", PLATFORM_LIST_SIZE.to_string())];
        let envelope: ListEnvelope<Classification> = self.get_json("platforms", &params).await?;
        Ok(envelope.results)
    }

    fn endpoint(&self, path: &str) -> RawgResult<Url> {
        let raw = format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Url::parse(&raw).map_err(|source| RawgError::InvalidEndpoint {
            path: path.to_string(),
            source,
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> RawgResult<T> {
        let key = self
            .api_key
            .as_deref()
            .filter(|key| api_key_available(Some(*key)))
            .ok_or(RawgError::MissingApiKey)?;

        let mut url = self.endpoint(path)?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("key", key);
            for (name, value) in params {
                pairs.append_pair(name, value);
            }
        }

        debug!(endpoint = path, "rawg request");
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|source| RawgError::Request {
                endpoint: path.to_string(),
                source,
            })?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(|source| RawgError::Request {
            endpoint: path.to_string(),
            source,
        })?;

        if !status.is_success() {
            let message = problem_message(&bytes)
                .unwrap_or_else(|| format!("request failed with status {status}"));
            warn!(endpoint = path, status = status.as_u16(), %message, "rawg error response");
            return Err(RawgError::Status {
                endpoint: path.to_string(),
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_slice(&bytes).map_err(|source| RawgError::Decode {
            endpoint: path.to_string(),
            source,
        })
    }
}

#[async_trait]
impl CatalogProvider for RawgClient {
    async fn fetch_page(&self, request: PageRequest) -> anyhow::Result<Page> {
        self.games(&request).await.map_err(|err| {
            let context = err.detail();
            anyhow::Error::new(err).context(context)
        })
    }
}

fn problem_message(bytes: &[u8]) -> Option<String> {
    let problem = serde_json::from_slice::<ProviderProblem>(bytes)
        .ok()
        .and_then(ProviderProblem::message);
    if problem.is_some() {
        return problem;
    }
    let text = String::from_utf8_lossy(bytes);
    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.chars().take(MAX_ERROR_BODY).collect())
    }
}
