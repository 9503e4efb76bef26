// ABOUTME: GraphQL fetcher abstraction and the reqwest-backed CMS client
// ABOUTME: Issues a single POST per query and decodes the JSON response without retrying

use crate::builder::CmsClientConfig;
use crate::constants::http::USER_AGENT;
use crate::error::{CmsError, FetchError};
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::Serialize;
use url::Url;

/// Decoded GraphQL response: `data` plus any `errors` the server reported.
pub type GraphQLResponse = graphql_client::Response<serde_json::Value>;

/// Something that can run one GraphQL query against the CMS.
#[async_trait]
pub trait CmsFetcher: Send + Sync {
    async fn fetch(&self, query: &str) -> Result<GraphQLResponse, FetchError>;
}

#[derive(Debug, Serialize)]
struct GraphQLRequest<'a> {
    query: &'a str,
    variables: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug)]
pub struct CmsClient {
    client: reqwest::Client,
    endpoint: Url,
}

impl CmsClient {
    pub fn from_config(config: CmsClientConfig) -> Result<Self, CmsError> {
        let endpoint = Url::parse(&config.endpoint).map_err(|e| {
            CmsError::Configuration(format!(
                "Invalid GraphQL endpoint '{}': {}",
                config.endpoint, e
            ))
        })?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(token) = &config.auth_token {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
                .map_err(|_| {
                    CmsError::Configuration("Auth token contains invalid characters".to_string())
                })?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(USER_AGENT)
            .timeout(config.timeout)
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()
            .map_err(|e| CmsError::Configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl CmsFetcher for CmsClient {
    async fn fetch(&self, query: &str) -> Result<GraphQLResponse, FetchError> {
        let request = GraphQLRequest {
            query,
            variables: serde_json::Map::new(),
        };

        tracing::debug!(endpoint = %self.endpoint, bytes = query.len(), "Sending GraphQL query");

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Transport {
                status: Some(status.as_u16()),
                message: summarize_body(&body, status.canonical_reason()),
            });
        }

        let bytes = response.bytes().await?;
        let decoded: GraphQLResponse = serde_json::from_slice(&bytes)?;

        if let Some(errors) = &decoded.errors {
            for error in errors {
                tracing::warn!("GraphQL error: {}", error.message);
            }
        }

        Ok(decoded)
    }
}

fn summarize_body(body: &str, reason: Option<&str>) -> String {
    const MAX_BODY_CHARS: usize = 200;

    let trimmed = body.trim();
    if trimmed.is_empty() {
        return reason.unwrap_or("request failed").to_string();
    }
    match trimmed.char_indices().nth(MAX_BODY_CHARS) {
        Some((cut, _)) => format!("{}...", &trimmed[..cut]),
        None => trimmed.to_string(),
    }
}
