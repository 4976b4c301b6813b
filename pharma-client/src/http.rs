//! HTTP transport for the warehouse API
//!
//! Every call takes the bearer token explicitly; the transport itself holds
//! no session state.

use async_trait::async_trait;
use http::StatusCode;
use reqwest::{Client, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use crate::{ClientConfig, ClientError, ClientResult};

/// HTTP client trait
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// GET and decode a JSON body
    async fn get<T: DeserializeOwned>(&self, path: &str, token: Option<&str>) -> ClientResult<T>;

    /// POST a JSON body and decode a JSON body
    async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
        token: Option<&str>,
    ) -> ClientResult<T>;

    /// POST a JSON body, ignoring the response body
    async fn post_unit<B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
        token: Option<&str>,
    ) -> ClientResult<()>;

    /// PUT a JSON body and return the response text
    async fn put_text<B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
        token: Option<&str>,
    ) -> ClientResult<String>;

    /// PUT without a body, ignoring the response body
    async fn put_empty(&self, path: &str, token: Option<&str>) -> ClientResult<()>;

    /// DELETE, ignoring the response body
    async fn delete(&self, path: &str, token: Option<&str>) -> ClientResult<()>;
}

/// Network HTTP client over reqwest
#[derive(Debug, Clone)]
pub struct NetworkHttpClient {
    client: Client,
    base_url: String,
}

impl NetworkHttpClient {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn authorize(req: RequestBuilder, token: Option<&str>) -> RequestBuilder {
        match token {
            Some(t) => req.bearer_auth(t),
            None => req,
        }
    }

    async fn send(&self, req: RequestBuilder, token: Option<&str>) -> ClientResult<Response> {
        let response = Self::authorize(req, token).send().await?;
        Self::check_status(response).await
    }

    /// Turn non-2xx responses into errors
    async fn check_status(response: Response) -> ClientResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        debug!(%status, body = %body, "Request rejected");
        Err(match status {
            StatusCode::UNAUTHORIZED => ClientError::Unauthorized,
            StatusCode::NOT_FOUND => ClientError::NotFound(body),
            _ => ClientError::Api { status, body },
        })
    }
}

#[async_trait]
impl HttpClient for NetworkHttpClient {
    async fn get<T: DeserializeOwned>(&self, path: &str, token: Option<&str>) -> ClientResult<T> {
        let url = self.url(path);
        debug!(%url, "GET");
        let response = self.send(self.client.get(&url), token).await?;
        Ok(response.json().await?)
    }

    async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
        token: Option<&str>,
    ) -> ClientResult<T> {
        let url = self.url(path);
        debug!(%url, "POST");
        let response = self.send(self.client.post(&url).json(body), token).await?;
        Ok(response.json().await?)
    }

    async fn post_unit<B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
        token: Option<&str>,
    ) -> ClientResult<()> {
        let url = self.url(path);
        debug!(%url, "POST");
        self.send(self.client.post(&url).json(body), token).await?;
        Ok(())
    }

    async fn put_text<B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
        token: Option<&str>,
    ) -> ClientResult<String> {
        let url = self.url(path);
        debug!(%url, "PUT");
        let response = self.send(self.client.put(&url).json(body), token).await?;
        Ok(response.text().await?)
    }

    async fn put_empty(&self, path: &str, token: Option<&str>) -> ClientResult<()> {
        let url = self.url(path);
        debug!(%url, "PUT");
        self.send(self.client.put(&url), token).await?;
        Ok(())
    }

    async fn delete(&self, path: &str, token: Option<&str>) -> ClientResult<()> {
        let url = self.url(path);
        debug!(%url, "DELETE");
        self.send(self.client.delete(&url), token).await?;
        Ok(())
    }
}
