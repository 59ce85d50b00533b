//! Chat-memo provider.
//!
//! Staff link their chat account once through an OAuth consent flow; the
//! stored refresh token is exchanged for a short-lived access token each time
//! a memo goes out.

use super::{ProviderError, ProviderResponse};
use crate::config::MemoConfig;
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use serde_json::json;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

#[async_trait]
pub trait MemoProvider: Send + Sync {
    /// Browser URL that starts the account-linking consent flow for a role.
    fn link_url(&self, role: &str) -> Result<String, ProviderError>;

    /// Exchange an authorization code for a long-lived refresh token.
    async fn exchange_code(&self, code: &str) -> Result<String, ProviderError>;

    /// Exchange the stored refresh token and push a text memo.
    async fn send_memo(
        &self,
        refresh_token: &str,
        text: &str,
    ) -> Result<ProviderResponse, ProviderError>;

    fn is_enabled(&self) -> bool;
}

pub struct KakaoMemoProvider {
    config: MemoConfig,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    refresh_token: Option<String>,
}

impl KakaoMemoProvider {
    pub fn new(config: MemoConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .expect("Failed to create HTTP client");

        Self { config, client }
    }

    async fn token_request(
        &self,
        params: &[(&str, &str)],
    ) -> Result<TokenResponse, ProviderError> {
        let response = self
            .client
            .post(&self.config.token_endpoint)
            .form(params)
            .send()
            .await
            .map_err(|e| ProviderError::Connection(format!("token request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Authentication(format!(
                "token endpoint returned status {}: {}",
                status, body
            )));
        }

        response.json().await.map_err(|e| {
            ProviderError::MalformedResponse(format!("invalid token payload: {}", e))
        })
    }

    async fn access_token(&self, refresh_token: &str) -> Result<String, ProviderError> {
        let mut params = vec![
            ("grant_type", "refresh_token"),
            ("client_id", self.config.rest_api_key.as_str()),
            ("refresh_token", refresh_token),
        ];
        if !self.config.client_secret.is_empty() {
            params.push(("client_secret", self.config.client_secret.as_str()));
        }

        let token = self.token_request(&params).await?;
        token
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                ProviderError::Authentication("token response had no access_token".to_string())
            })
    }
}

#[async_trait]
impl MemoProvider for KakaoMemoProvider {
    fn link_url(&self, role: &str) -> Result<String, ProviderError> {
        if !self.config.enabled() {
            return Err(ProviderError::NotEnabled(
                "chat memo provider is not configured".to_string(),
            ));
        }

        let url = Url::parse_with_params(
            &self.config.authorize_endpoint,
            &[
                ("response_type", "code"),
                ("client_id", self.config.rest_api_key.as_str()),
                ("redirect_uri", self.config.redirect_uri.as_str()),
                ("scope", "talk_message"),
                ("state", role),
            ],
        )
        .map_err(|e| ProviderError::Configuration(format!("invalid authorize endpoint: {}", e)))?;

        Ok(url.into())
    }

    async fn exchange_code(&self, code: &str) -> Result<String, ProviderError> {
        if !self.config.enabled() {
            return Err(ProviderError::NotEnabled(
                "chat memo provider is not configured".to_string(),
            ));
        }

        let mut params = vec![
            ("grant_type", "authorization_code"),
            ("client_id", self.config.rest_api_key.as_str()),
            ("redirect_uri", self.config.redirect_uri.as_str()),
            ("code", code),
        ];
        if !self.config.client_secret.is_empty() {
            params.push(("client_secret", self.config.client_secret.as_str()));
        }

        let token = self.token_request(&params).await?;
        token
            .refresh_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                ProviderError::Authentication("token response had no refresh_token".to_string())
            })
    }

    async fn send_memo(
        &self,
        refresh_token: &str,
        text: &str,
    ) -> Result<ProviderResponse, ProviderError> {
        if !self.config.enabled() {
            return Err(ProviderError::NotEnabled(
                "chat memo provider is not configured".to_string(),
            ));
        }

        let access_token = self.access_token(refresh_token).await?;

        let template = json!({
            "object_type": "text",
            "text": text,
            "link": {
                "web_url": self.config.site_url,
                "mobile_web_url": self.config.site_url,
            },
            "button_title": "사이트 열기",
        });

        let response = self
            .client
            .post(&self.config.send_endpoint)
            .bearer_auth(access_token)
            .form(&[("template_object", template.to_string())])
            .send()
            .await
            .map_err(|e| ProviderError::Connection(format!("memo send failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::SendFailed(format!(
                "memo endpoint returned status {}: {}",
                status, body
            )));
        }

        Ok(ProviderResponse::success(None))
    }

    fn is_enabled(&self) -> bool {
        self.config.enabled()
    }
}

/// Mock memo provider for testing
pub struct MockMemoProvider {
    enabled: bool,
    fail_for_token: Option<String>,
    send_count: AtomicU64,
}

impl MockMemoProvider {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            fail_for_token: None,
            send_count: AtomicU64::new(0),
        }
    }

    /// Succeed for everyone except the recipient holding this refresh token.
    pub fn failing_for(refresh_token: &str) -> Self {
        Self {
            enabled: true,
            fail_for_token: Some(refresh_token.to_string()),
            send_count: AtomicU64::new(0),
        }
    }

    pub fn send_count(&self) -> u64 {
        self.send_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MemoProvider for MockMemoProvider {
    fn link_url(&self, role: &str) -> Result<String, ProviderError> {
        if !self.enabled {
            return Err(ProviderError::NotEnabled(
                "Mock memo provider is not enabled".to_string(),
            ));
        }
        Ok(format!("mock://link?state={}", role))
    }

    async fn exchange_code(&self, code: &str) -> Result<String, ProviderError> {
        if !self.enabled {
            return Err(ProviderError::NotEnabled(
                "Mock memo provider is not enabled".to_string(),
            ));
        }
        Ok(format!("mock-refresh-{}", code))
    }

    async fn send_memo(
        &self,
        refresh_token: &str,
        text: &str,
    ) -> Result<ProviderResponse, ProviderError> {
        if !self.enabled {
            return Err(ProviderError::NotEnabled(
                "Mock memo provider is not enabled".to_string(),
            ));
        }

        if self.fail_for_token.as_deref() == Some(refresh_token) {
            return Err(ProviderError::Authentication(
                "mock token exchange failure".to_string(),
            ));
        }

        self.send_count.fetch_add(1, Ordering::SeqCst);

        tracing::info!(
            text_len = %text.len(),
            "[MOCK] Chat memo would be sent"
        );

        Ok(ProviderResponse::success(Some(format!(
            "mock-memo-{}",
            self.send_count.load(Ordering::SeqCst)
        ))))
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }
}
