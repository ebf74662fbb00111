//! API client for the accounts REST API.
//!
//! This module provides the `ApiClient` struct for the registration, login,
//! logout and profile endpoints.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{header, Client, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::auth::{TokenPair, TokenStore};
use crate::models::{
    LoginRequest, LogoutResponse, ProfileUpdate, RegisterRequest, RegisterResponse,
    UserWithProfile,
};

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// Default API root when nothing is configured
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api/v1";

/// HTTP request timeout in seconds.
const REQUEST_TIMEOUT_SECS: u64 = 30;

const REGISTER_PATH: &str = "/accounts/register/";
const LOGIN_PATH: &str = "/accounts/login/";
const LOGOUT_PATH: &str = "/accounts/logout/";
const PROFILE_PATH: &str = "/accounts/profile/";

/// API client for the accounts service.
///
/// Every request reads the stored access token and sends it as a bearer
/// token when present. Clone is cheap; the connection pool is shared.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    tokens: Arc<dyn TokenStore>,
}

impl ApiClient {
    pub fn new(base_url: &str, tokens: Arc<dyn TokenStore>) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            tokens,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn auth_headers(&self) -> Result<header::HeaderMap, ApiError> {
        let mut headers = header::HeaderMap::new();
        if let Some(token) = self.tokens.access_token() {
            let value = header::HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| ApiError::InvalidResponse("Stored access token is not a valid header value".to_string()))?;
            headers.insert(header::AUTHORIZATION, value);
        }
        Ok(headers)
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder, path: &str) -> Result<T, ApiError> {
        let response = request.headers(self.auth_headers()?).send().await?;
        let status = response.status();
        let response = match Self::check_response(response).await {
            Ok(response) => response,
            Err(e) => {
                warn!(path = path, status = status.as_u16(), error = %e, "Request failed");
                return Err(e);
            }
        };
        debug!(path = path, status = status.as_u16(), "Request succeeded");

        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| {
            ApiError::InvalidResponse(format!("Failed to parse JSON response from {}: {}", path, e))
        })
    }

    // ===== Accounts Endpoints =====

    /// Create a new account. No token is issued.
    pub async fn register(&self, request: &RegisterRequest) -> Result<RegisterResponse, ApiError> {
        let builder = self.client.post(self.url(REGISTER_PATH)).json(request);
        self.send(builder, REGISTER_PATH).await
    }

    /// Exchange credentials for a token pair
    pub async fn login(&self, request: &LoginRequest) -> Result<TokenPair, ApiError> {
        let builder = self.client.post(self.url(LOGIN_PATH)).json(request);
        self.send(builder, LOGIN_PATH).await
    }

    /// Ask the server to invalidate the current session
    pub async fn logout(&self) -> Result<LogoutResponse, ApiError> {
        let builder = self
            .client
            .post(self.url(LOGOUT_PATH))
            .json(&serde_json::json!({}));
        self.send(builder, LOGOUT_PATH).await
    }

    pub async fn fetch_profile(&self) -> Result<UserWithProfile, ApiError> {
        let builder = self.client.get(self.url(PROFILE_PATH));
        self.send(builder, PROFILE_PATH).await
    }

    /// Send a partial profile update and return the server's new representation
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<UserWithProfile, ApiError> {
        let builder = self.client.patch(self.url(PROFILE_PATH)).json(update);
        self.send(builder, PROFILE_PATH).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{MemoryTokenStore, ACCESS_TOKEN_KEY};

    #[test]
    fn test_base_url_trailing_slash_ignored() {
        let store = Arc::new(MemoryTokenStore::new());
        let client = ApiClient::new("http://localhost:8000/api/v1/", store).expect("client");
        assert_eq!(client.base_url(), "http://localhost:8000/api/v1");
        assert_eq!(client.url(LOGIN_PATH), "http://localhost:8000/api/v1/accounts/login/");
    }

    #[test]
    fn test_auth_headers_follow_stored_token() {
        let store = Arc::new(MemoryTokenStore::new());
        let client = ApiClient::new(DEFAULT_API_BASE_URL, store.clone()).expect("client");

        let headers = client.auth_headers().expect("headers");
        assert!(headers.get(header::AUTHORIZATION).is_none());

        store.set(ACCESS_TOKEN_KEY, "t1").expect("set token");
        let headers = client.auth_headers().expect("headers");
        assert_eq!(
            headers.get(header::AUTHORIZATION).and_then(|v| v.to_str().ok()),
            Some("Bearer t1")
        );
    }

    #[test]
    fn test_auth_headers_reject_invalid_token() {
        let store = Arc::new(MemoryTokenStore::new());
        store.set(ACCESS_TOKEN_KEY, "bad\ntoken").expect("set token");
        let client = ApiClient::new(DEFAULT_API_BASE_URL, store).expect("client");
        assert!(client.auth_headers().is_err());
    }
}
