use crate::error::SourceError;
use crate::http::{body_excerpt, create_http_client};
use crate::tmdb::api::{TmdbImagesResponse, TmdbSearchResponse};
use crate::traits::MetadataProvider;
use async_trait::async_trait;
use reelfeed_models::{MovieImages, SearchCandidate};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, trace};

/// Client for The Movie Database v3 API, authenticated with an `api_key`
/// query parameter.
#[derive(Clone)]
pub struct TmdbClient {
    client: Arc<Client>,
    api_key: String,
    base_url: String,
}

impl TmdbClient {
    pub fn new(api_key: String, base_url: String) -> Self {
        Self {
            client: Arc::new(create_http_client()),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<T, SourceError> {
        let endpoint = self.endpoint(path);
        trace!(endpoint = %endpoint, ?params, "TMDb request");

        let response = self
            .client
            .get(&endpoint)
            .query(&[("api_key", self.api_key.as_str())])
            .query(params)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|source| SourceError::Network {
                endpoint: endpoint.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::Status {
                endpoint,
                status: status.as_u16(),
                body: body_excerpt(&body),
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|source| SourceError::Decode { endpoint, source })
    }
}

#[async_trait]
impl MetadataProvider for TmdbClient {
    fn provider_name(&self) -> &str {
        "tmdb"
    }

    async fn search_movies(
        &self,
        query: &str,
        year: Option<&str>,
    ) -> Result<Vec<SearchCandidate>, SourceError> {
        let mut params = vec![("query", query)];
        if let Some(year) = year {
            params.push(("year", year));
        }

        let response: TmdbSearchResponse = self.get_json("/search/movie", &params).await?;
        debug!(query, ?year, results = response.results.len(), "TMDb search");
        Ok(response.results.into_iter().map(SearchCandidate::from).collect())
    }

    async fn movie_images(&self, movie_id: u64) -> Result<MovieImages, SourceError> {
        let path = format!("/movie/{}/images", movie_id);
        let response: TmdbImagesResponse = self
            .get_json(&path, &[("include_image_language", "en,null")])
            .await?;
        debug!(
            movie_id,
            backdrops = response.backdrops.len(),
            posters = response.posters.len(),
            "TMDb images"
        );
        Ok(response.into())
    }
}
