//! REST client for the Colorboxd backend functions.
//!
//! Wraps the `AuthUser`, `GetLists`, `SortList` and `WriteList` endpoints
//! using [`reqwest`] and implements [`ListBackend`] on top of them.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CACHE_CONTROL;
use serde::{Deserialize, Serialize};

use colorboxd_core::backend::{ListBackend, WriteRequest};
use colorboxd_core::error::CoreError;
use colorboxd_core::types::{Entry, List, ListSummary, UserToken};

use crate::config::ClientConfig;

/// HTTP client for one Colorboxd deployment.
pub struct ColorboxdApi {
    client: reqwest::Client,
    backend_url: String,
    lists_url: String,
}

/// Errors from the REST layer.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout, decode).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The backend returned a non-2xx status code.
    #[error("{body}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Response body, or a constructed status line when it was empty.
        body: String,
    },
}

impl From<ClientError> for CoreError {
    fn from(err: ClientError) -> Self {
        CoreError::Fetch(err.to_string())
    }
}

/// Body of a `SortList` response.
#[derive(Debug, Deserialize)]
struct SortListResponse {
    items: Vec<Entry>,
}

/// Body of a `WriteList` request.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WriteListBody<'a> {
    access_token: &'a str,
    #[serde(flatten)]
    request: &'a WriteRequest,
}

impl ColorboxdApi {
    /// Create a client from configuration.
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self::with_client(
            client,
            config.backend_url.clone(),
            config.lists_url.clone(),
        ))
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    ///
    /// Both URLs are prefixes; endpoint names are appended directly.
    pub fn with_client(client: reqwest::Client, backend_url: String, lists_url: String) -> Self {
        Self {
            client,
            backend_url,
            lists_url,
        }
    }

    /// `GET AuthUser?authCode=...`
    pub async fn fetch_user_token(&self, auth_code: &str) -> Result<UserToken, ClientError> {
        let response = self
            .client
            .get(format!("{}AuthUser", self.backend_url))
            .query(&[("authCode", auth_code)])
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// `GET GetLists?accessToken=...&userId=...`
    pub async fn fetch_lists(
        &self,
        token: &str,
        user_id: &str,
        refresh: bool,
    ) -> Result<Vec<ListSummary>, ClientError> {
        let request = self
            .client
            .get(format!("{}GetLists", self.lists_url))
            .query(&[("accessToken", token), ("userId", user_id)]);

        let response = Self::cache_mode(request, refresh).send().await?;
        Self::parse_response(response).await
    }

    /// `GET SortList?accessToken=...&listId=...`
    ///
    /// The backend returns only the entries; the summary is attached here.
    pub async fn fetch_sorted_list(
        &self,
        token: &str,
        summary: &ListSummary,
        refresh: bool,
    ) -> Result<List, ClientError> {
        let request = self
            .client
            .get(format!("{}SortList", self.backend_url))
            .query(&[("accessToken", token), ("listId", summary.id.as_str())]);

        let response = Self::cache_mode(request, refresh).send().await?;
        let body: SortListResponse = Self::parse_response(response).await?;

        Ok(List {
            summary: summary.clone(),
            entries: body.items,
        })
    }

    /// `POST WriteList` with the reordering description.
    pub async fn post_write_list(
        &self,
        token: &str,
        request: &WriteRequest,
    ) -> Result<Vec<String>, ClientError> {
        let body = WriteListBody {
            access_token: token,
            request,
        };

        let response = self
            .client
            .post(format!("{}WriteList", self.backend_url))
            .json(&body)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    // ---- private helpers ----

    fn cache_mode(request: reqwest::RequestBuilder, refresh: bool) -> reqwest::RequestBuilder {
        if refresh {
            request.header(CACHE_CONTROL, "no-cache")
        } else {
            request
        }
    }

    /// Ensure the response has a success status code. On failure the body
    /// becomes the error detail, falling back to the status line.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let body = if body.trim().is_empty() {
                format!(
                    "Error code: {}; message: {}",
                    status.as_u16(),
                    status.canonical_reason().unwrap_or("Unknown")
                )
            } else {
                body.trim().to_string()
            };
            tracing::error!(status = status.as_u16(), body = %body, "Colorboxd request failed");
            return Err(ClientError::ApiError {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Parse a successful JSON response body into the expected type.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl ListBackend for ColorboxdApi {
    async fn auth_user(&self, auth_code: &str) -> Result<UserToken, CoreError> {
        Ok(self.fetch_user_token(auth_code).await?)
    }

    async fn get_lists(&self, token: &str, user_id: &str, refresh: bool) -> Result<Vec<ListSummary>, CoreError> {
        let lists = self.fetch_lists(token, user_id, refresh).await?;
        tracing::debug!(count = lists.len(), refresh, "Fetched list summaries");
        Ok(lists)
    }

    async fn sort_list(&self, token: &str, summary: &ListSummary, refresh: bool) -> Result<List, CoreError> {
        let list = self.fetch_sorted_list(token, summary, refresh).await?;
        tracing::debug!(list_id = %summary.id, entries = list.entries.len(), "Fetched ranked list");
        Ok(list)
    }

    async fn write_sorted_list(&self, token: &str, request: &WriteRequest) -> Result<Vec<String>, CoreError> {
        Ok(self.post_write_list(token, request).await?)
    }
}
