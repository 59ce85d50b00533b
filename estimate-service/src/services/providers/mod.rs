pub mod adjustment;
pub mod email;
pub mod memo;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use adjustment::{
    clamp_adj_rate, Adjustment, AdjustmentContext, AdjustmentProvider, MockAdjustmentProvider,
    OpenAiAdjustmentProvider, MAX_ADJ_RATE, MIN_ADJ_RATE,
};
pub use email::{EmailMessage, EmailProvider, MockEmailProvider, SmtpProvider};
pub use memo::{KakaoMemoProvider, MemoProvider, MockMemoProvider};

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Provider not enabled: {0}")]
    NotEnabled(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Send error: {0}")]
    SendFailed(String),

    #[error("Invalid recipient: {0}")]
    InvalidRecipient(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Authentication error: {0}")]
    Authentication(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderResponse {
    pub provider_id: Option<String>,
    pub success: bool,
    pub message: Option<String>,
}

impl ProviderResponse {
    pub fn success(provider_id: Option<String>) -> Self {
        Self {
            provider_id,
            success: true,
            message: None,
        }
    }
}
