//! Seams to the external catalog and to the API-key capability flag.

use async_trait::async_trait;

use crate::model::Page;
use crate::view::PageRequest;

/// Remote source of catalog pages.
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Fetch one page for the requested view.
    async fn fetch_page(&self, request: PageRequest) -> anyhow::Result<Page>;
}

/// Capability flag reporting whether the provider API key is configured.
///
/// Read once per fetch decision; implementations must be cheap.
pub trait ApiKeyProbe: Send + Sync {
    /// Whether catalog fetches are currently allowed.
    fn api_key_available(&self) -> bool;
}

impl<F> ApiKeyProbe for F
where
    F: Fn() -> bool + Send + Sync,
{
    fn api_key_available(&self) -> bool {
        self()
    }
}

/// Probe with a fixed answer.
#[derive(Debug, Clone, Copy)]
pub struct StaticProbe(pub bool);

impl ApiKeyProbe for StaticProbe {
    fn api_key_available(&self) -> bool {
        self.0
    }
}
