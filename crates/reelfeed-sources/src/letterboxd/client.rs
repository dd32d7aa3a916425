use crate::error::SourceError;
use crate::http::{body_excerpt, create_http_client, endpoint_label};
use crate::traits::FeedSource;
use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use tracing::debug;

/// Reads a member's Letterboxd RSS feed.
#[derive(Clone)]
pub struct LetterboxdFeed {
    client: Arc<Client>,
    feed_url: String,
}

impl LetterboxdFeed {
    pub fn new(feed_url: String) -> Self {
        Self {
            client: Arc::new(create_http_client()),
            feed_url,
        }
    }

    pub fn feed_url(&self) -> &str {
        &self.feed_url
    }

    pub async fn fetch(&self) -> Result<String, SourceError> {
        let endpoint = endpoint_label(&self.feed_url);
        debug!(endpoint = %endpoint, "Fetching feed");

        let response = self
            .client
            .get(&self.feed_url)
            .header("Accept", "application/rss+xml, application/xml;q=0.9, */*;q=0.8")
            .send()
            .await
            .map_err(|source| SourceError::Network {
                endpoint: endpoint.clone(),
                source,
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|source| SourceError::Network {
            endpoint: endpoint.clone(),
            source,
        })?;

        if !status.is_success() {
            return Err(SourceError::Status {
                endpoint,
                status: status.as_u16(),
                body: body_excerpt(&body),
            });
        }

        debug!(bytes = body.len(), "Feed fetched");
        Ok(body)
    }
}

#[async_trait]
impl FeedSource for LetterboxdFeed {
    fn source_name(&self) -> &str {
        "letterboxd"
    }

    async fn fetch_feed(&self) -> Result<String, SourceError> {
        self.fetch().await
    }
}
