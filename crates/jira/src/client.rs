//! Authenticated REST client for the Jira API.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE, LOCATION, USER_AGENT};
use reqwest::{Method, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::config::{Auth, ClientConfig};
use crate::error::{JiraError, Result};

const USER_AGENT_VALUE: &str = concat!("terraform-provider-jira/", env!("CARGO_PKG_VERSION"));

/// Jira REST client.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct JiraClient {
    client: reqwest::Client,
    base_url: Url,
    auth: Auth,
}

impl JiraClient {
    /// Create a client from a validated configuration.
    ///
    /// # Errors
    /// Returns error if the configuration is invalid or the custom header
    /// cannot be encoded.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let base_url = config.validate()?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));

        if let Some((key, value)) = &config.custom_header {
            let name = HeaderName::from_bytes(key.as_bytes())
                .map_err(|e| JiraError::Config(format!("invalid custom header name '{key}': {e}")))?;
            let mut value = HeaderValue::from_str(value)
                .map_err(|e| JiraError::Config(format!("invalid custom header value: {e}")))?;
            value.set_sensitive(true);
            headers.insert(name, value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url,
            auth: config.auth,
        })
    }

    /// Base URL every endpoint is resolved against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> Result<Url> {
        self.base_url
            .join(endpoint.trim_start_matches('/'))
            .map_err(|e| JiraError::Config(format!("invalid endpoint '{endpoint}': {e}")))
    }

    /// Send a request and return the response once its status is checked.
    async fn send(
        &self,
        method: Method,
        endpoint: &str,
        query: &[(&str, &str)],
        body: Option<Value>,
    ) -> Result<reqwest::Response> {
        let mut request = self.client.request(method.clone(), self.url(endpoint)?);

        if !query.is_empty() {
            request = request.query(query);
        }

        request = match &self.auth {
            Auth::Basic { username, password } => request.basic_auth(username, Some(password)),
            Auth::Bearer { token } => request.bearer_auth(token),
            Auth::Anonymous => request,
        };

        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await?;
        let status = response.status();
        debug!(%method, endpoint, status = status.as_u16(), "Jira API responded");

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(JiraError::NotFound {
                method: method.to_string(),
                endpoint: endpoint.to_string(),
                body,
            });
        }

        Err(JiraError::Api {
            method: method.to_string(),
            endpoint: endpoint.to_string(),
            status,
            body,
        })
    }

    /// Issue a request and decode the JSON response.
    ///
    /// An empty response body decodes as JSON `null`, so `()` and
    /// `Option<T>` work as targets for 204 responses.
    #[instrument(skip(self, query, body), fields(method = %method, endpoint = %endpoint))]
    pub async fn request<O: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        query: &[(&str, &str)],
        body: Option<Value>,
    ) -> Result<O> {
        let response = self.send(method, endpoint, query, body).await?;
        let text = response.text().await?;
        let text = if text.trim().is_empty() { "null" } else { text.as_str() };

        serde_json::from_str(text).map_err(|source| JiraError::Decode {
            endpoint: endpoint.to_string(),
            source,
        })
    }

    pub async fn get<O: DeserializeOwned>(&self, endpoint: &str) -> Result<O> {
        self.request(Method::GET, endpoint, &[], None).await
    }

    pub async fn get_with_query<O: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, &str)],
    ) -> Result<O> {
        self.request(Method::GET, endpoint, query, None).await
    }

    pub async fn post<I: Serialize + ?Sized, O: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &I,
    ) -> Result<O> {
        let body = serde_json::to_value(body)?;
        self.request(Method::POST, endpoint, &[], Some(body)).await
    }

    pub async fn post_with_query<I: Serialize + ?Sized, O: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, &str)],
        body: &I,
    ) -> Result<O> {
        let body = serde_json::to_value(body)?;
        self.request(Method::POST, endpoint, query, Some(body)).await
    }

    pub async fn put<I: Serialize + ?Sized, O: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &I,
    ) -> Result<O> {
        let body = serde_json::to_value(body)?;
        self.request(Method::PUT, endpoint, &[], Some(body)).await
    }

    /// Delete a resource, discarding any response body.
    pub async fn delete(&self, endpoint: &str) -> Result<()> {
        self.delete_with_query(endpoint, &[]).await
    }

    pub async fn delete_with_query(&self, endpoint: &str, query: &[(&str, &str)]) -> Result<()> {
        let _: Value = self.request(Method::DELETE, endpoint, query, None).await?;
        Ok(())
    }

    /// POST a body and return the `Location` header of the created resource.
    #[instrument(skip(self, body), fields(endpoint = %endpoint))]
    pub async fn post_for_location<I: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &I,
    ) -> Result<String> {
        let body = serde_json::to_value(body)?;
        let response = self.send(Method::POST, endpoint, &[], Some(body)).await?;

        response
            .headers()
            .get(LOCATION)
            .and_then(|value| value.to_str().ok())
            .map(ToString::to_string)
            .ok_or_else(|| JiraError::MissingLocation {
                endpoint: endpoint.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> JiraClient {
        JiraClient::new(ClientConfig::new(base, Auth::Anonymous)).unwrap()
    }

    #[test]
    fn test_client_creation() {
        assert!(JiraClient::new(ClientConfig::new("https://jira.example.com", Auth::Anonymous)).is_ok());
    }

    #[test]
    fn test_invalid_custom_header_is_rejected() {
        let config = ClientConfig::new("https://jira.example.com", Auth::Anonymous)
            .with_custom_header("bad header", "value");
        assert!(matches!(JiraClient::new(config), Err(JiraError::Config(_))));
    }

    #[test]
    fn test_endpoints_resolve_below_context_path() {
        let client = client("https://jira.example.com/jira");
        assert_eq!(
            client.url("/rest/api/2/issue/1").unwrap().as_str(),
            "https://jira.example.com/jira/rest/api/2/issue/1"
        );
        assert_eq!(
            client.url("rest/api/2/field").unwrap().as_str(),
            "https://jira.example.com/jira/rest/api/2/field"
        );
    }
}
