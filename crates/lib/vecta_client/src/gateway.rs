//! HTTP gateway to the Vecta REST backend.
//!
//! Each call is an un-polled future: no request is sent until it is
//! awaited, and it resolves to exactly one value or one error. The
//! persisted access token, when present, is attached as a `Bearer` header.

use std::sync::Arc;

use reqwest::{Client, Method, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::error::{GatewayError, GatewayResult, error_detail, error_message};
use crate::storage::{ACCESS_TOKEN_KEY, KeyValueStore};

/// Thin wrapper over `reqwest` bound to one base URL.
#[derive(Debug)]
pub struct Gateway {
    http: Client,
    base_url: String,
    store: Arc<dyn KeyValueStore>,
}

impl Gateway {
    /// Create a gateway for `base_url` (e.g. `http://localhost:8000/api/v1`).
    pub fn new(base_url: &str, store: Arc<dyn KeyValueStore>) -> GatewayResult<Self> {
        url::Url::parse(base_url)?;
        Ok(Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            store,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL of a resource path such as `projects/p1/urls:batch`.
    pub fn endpoint(&self, path: &str) -> GatewayResult<url::Url> {
        let joined = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        Ok(url::Url::parse(&joined)?)
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> GatewayResult<T> {
        let req = self.request(Method::GET, path)?.query(query);
        self.send_json(req).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> GatewayResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let req = self.request(Method::POST, path)?.json(body);
        self.send_json(req).await
    }

    /// POST an `application/x-www-form-urlencoded` body.
    pub async fn post_form<T: DeserializeOwned>(
        &self,
        path: &str,
        form: &[(&str, &str)],
    ) -> GatewayResult<T> {
        let req = self.request(Method::POST, path)?.form(form);
        self.send_json(req).await
    }

    pub async fn patch<B, T>(&self, path: &str, body: &B) -> GatewayResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let req = self.request(Method::PATCH, path)?.json(body);
        self.send_json(req).await
    }

    /// DELETE a resource. Any response body is ignored.
    pub async fn delete(&self, path: &str) -> GatewayResult<()> {
        let req = self.request(Method::DELETE, path)?;
        self.send(req).await.map(|_| ())
    }

    fn request(&self, method: Method, path: &str) -> GatewayResult<RequestBuilder> {
        let url = self.endpoint(path)?;
        debug!(%method, %url, "backend request");
        let mut req = self.http.request(method, url);
        if let Some(token) = self.store.get(ACCESS_TOKEN_KEY) {
            req = req.bearer_auth(token);
        }
        Ok(req)
    }

    async fn send(&self, req: RequestBuilder) -> GatewayResult<Response> {
        let resp = req.send().await?;
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.bytes().await.unwrap_or_default();
        let message = error_message(&body);
        warn!(%status, message = message.as_deref().unwrap_or(""), "backend error response");
        Err(GatewayError::Status {
            status,
            message,
            detail: error_detail(&body),
        })
    }

    async fn send_json<T: DeserializeOwned>(&self, req: RequestBuilder) -> GatewayResult<T> {
        let resp = self.send(req).await?;
        let bytes = resp.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn gateway(base: &str) -> Gateway {
        Gateway::new(base, Arc::new(MemoryStore::new())).unwrap()
    }

    #[test]
    fn endpoint_joins_with_single_slash() {
        let gw = gateway("http://localhost:8000/api/v1/");
        assert_eq!(
            gw.endpoint("/projects").unwrap().as_str(),
            "http://localhost:8000/api/v1/projects"
        );
    }

    #[test]
    fn endpoint_keeps_custom_method_suffix() {
        let gw = gateway("http://localhost:8000/api/v1");
        assert_eq!(
            gw.endpoint("projects/p1/urls:batch").unwrap().as_str(),
            "http://localhost:8000/api/v1/projects/p1/urls:batch"
        );
    }

    #[test]
    fn invalid_base_is_rejected() {
        let result = Gateway::new("not a url", Arc::new(MemoryStore::new()));
        assert!(matches!(result, Err(GatewayError::InvalidUrl(_))));
    }
}
