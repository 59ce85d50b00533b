//! External fee-adjustment provider.
//!
//! Asks a text-completion model for a bounded percentage tweak on top of the
//! rule-table fee. The provider is untrusted: whatever it answers is clamped
//! into [`MIN_ADJ_RATE`, `MAX_ADJ_RATE`], and any transport or parse problem
//! degrades to a zero adjustment rather than blocking the quote.

use super::ProviderError;
use crate::config::AiConfig;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

pub const MIN_ADJ_RATE: f64 = -0.20;
pub const MAX_ADJ_RATE: f64 = 0.30;

#[derive(Debug, Clone, PartialEq)]
pub struct Adjustment {
    pub adj_rate: f64,
    pub comment: String,
}

/// Rule-stage figures handed to the provider as pricing context.
#[derive(Debug, Clone)]
pub struct AdjustmentContext {
    pub work_qty: u64,
    pub carton_qty: u64,
    pub weight_per_carton: f64,
    pub total_weight_kg: f64,
    pub base_fee: u64,
    pub carton_fee: u64,
    pub memo: Option<String>,
}

#[async_trait]
pub trait AdjustmentProvider: Send + Sync {
    async fn adjust(&self, context: &AdjustmentContext) -> Result<Adjustment, ProviderError>;
    fn is_enabled(&self) -> bool;
}

pub fn clamp_adj_rate(rate: f64) -> f64 {
    if !rate.is_finite() {
        return 0.0;
    }
    rate.clamp(MIN_ADJ_RATE, MAX_ADJ_RATE)
}

pub struct OpenAiAdjustmentProvider {
    config: AiConfig,
    client: Client,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

#[derive(Debug, Deserialize)]
struct AdjustmentReply {
    #[serde(rename = "adjRate")]
    adj_rate: f64,
    #[serde(default)]
    comment: String,
}

impl OpenAiAdjustmentProvider {
    pub fn new(config: AiConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self { config, client }
    }

    fn build_prompt(&self, context: &AdjustmentContext) -> String {
        format!(
            "너는 인천항/인천공항 보세구역에서 실제 작업을 하는 보수작업 견적 어시스턴트야.\n\
             기본 견적이 이미 계산되어 있고, 너는 그것을 기준으로\n\
             +/- 몇 %를 조정할지와 간단한 이유만 제안해야 한다.\n\n\
             입력 데이터:\n\
             - 작업 수량: {}\n\
             - 카톤 수량: {}\n\
             - 카톤당 무게(kg): {}\n\
             - 총 중량(kg): {}\n\
             - 기본 작업비(원): {}\n\
             - 카톤 수수료(원): {}\n\
             - 메모: {}\n\n\
             다음 조건을 지켜서 응답해:\n\
             1) 무리한 가격 인상/인하는 하지 말 것 (보통 -10% ~ +20% 범위)\n\
             2) JSON 형식으로만 답변할 것.\n\
             3) JSON 키는 딱 두 개만: \"adjRate\", \"comment\"\n\n\
             예:\n\
             {{\"adjRate\":0.15,\"comment\":\"야간 긴급 작업이라 15% 가산이 필요합니다.\"}}",
            context.work_qty,
            context.carton_qty,
            context.weight_per_carton,
            context.total_weight_kg,
            context.base_fee,
            context.carton_fee,
            context.memo.as_deref().unwrap_or("없음"),
        )
    }
}

/// Models sometimes wrap the JSON in prose or code fences; keep only the
/// outermost object.
fn json_slice(text: &str) -> &str {
    match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if start < end => &text[start..=end],
        _ => text,
    }
}

#[async_trait]
impl AdjustmentProvider for OpenAiAdjustmentProvider {
    async fn adjust(&self, context: &AdjustmentContext) -> Result<Adjustment, ProviderError> {
        if !self.config.enabled() {
            return Ok(Adjustment {
                adj_rate: 0.0,
                comment: "AI 보정 비활성화 상태입니다.".to_string(),
            });
        }

        let request = ChatRequest {
            model: self.config.model.clone(),
            messages: vec![ChatMessage {
                role: "user",
                content: self.build_prompt(context),
            }],
            temperature: 0.2,
        };

        let url = format!(
            "{}/chat/completions",
            self.config.api_base.trim_end_matches('/')
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::Connection(format!("adjustment request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::ApiError(format!(
                "adjustment API returned status {}: {}",
                status, body
            )));
        }

        let chat: ChatResponse = response.json().await.map_err(|e| {
            ProviderError::MalformedResponse(format!("invalid completion payload: {}", e))
        })?;

        let text = chat
            .choices
            .first()
            .map(|c| c.message.content.as_str())
            .unwrap_or("");

        match serde_json::from_str::<AdjustmentReply>(json_slice(text)) {
            Ok(reply) => Ok(Adjustment {
                adj_rate: clamp_adj_rate(reply.adj_rate),
                comment: reply.comment,
            }),
            Err(e) => {
                tracing::warn!(error = %e, raw = %text, "adjustment reply was not valid JSON");
                Ok(Adjustment {
                    adj_rate: 0.0,
                    comment: "AI 응답 파싱 실패, 기본 금액을 사용합니다.".to_string(),
                })
            }
        }
    }

    fn is_enabled(&self) -> bool {
        self.config.enabled()
    }
}

/// Mock adjustment provider for tests and local runs without a key.
pub struct MockAdjustmentProvider {
    enabled: bool,
    reply: Option<Adjustment>,
    fail: bool,
    call_count: AtomicU64,
}

impl MockAdjustmentProvider {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            reply: None,
            fail: false,
            call_count: AtomicU64::new(0),
        }
    }

    /// Reply with a fixed rate/comment; the rate still goes through the clamp.
    pub fn with_reply(adj_rate: f64, comment: &str) -> Self {
        Self {
            enabled: true,
            reply: Some(Adjustment {
                adj_rate,
                comment: comment.to_string(),
            }),
            fail: false,
            call_count: AtomicU64::new(0),
        }
    }

    /// Fail every call, as a provider outage would.
    pub fn failing() -> Self {
        Self {
            enabled: true,
            reply: None,
            fail: true,
            call_count: AtomicU64::new(0),
        }
    }

    pub fn call_count(&self) -> u64 {
        self.call_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AdjustmentProvider for MockAdjustmentProvider {
    async fn adjust(&self, _context: &AdjustmentContext) -> Result<Adjustment, ProviderError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);

        if self.fail {
            return Err(ProviderError::Connection(
                "mock adjustment outage".to_string(),
            ));
        }

        if !self.enabled {
            return Ok(Adjustment {
                adj_rate: 0.0,
                comment: "AI 보정 비활성화 상태입니다.".to_string(),
            });
        }

        match &self.reply {
            Some(reply) => Ok(Adjustment {
                adj_rate: clamp_adj_rate(reply.adj_rate),
                comment: reply.comment.clone(),
            }),
            None => Ok(Adjustment {
                adj_rate: 0.0,
                comment: String::new(),
            }),
        }
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_bounds() {
        assert_eq!(clamp_adj_rate(5.0), MAX_ADJ_RATE);
        assert_eq!(clamp_adj_rate(-5.0), MIN_ADJ_RATE);
        assert_eq!(clamp_adj_rate(0.15), 0.15);
        assert_eq!(clamp_adj_rate(f64::NAN), 0.0);
    }

    #[test]
    fn json_slice_strips_fences() {
        let wrapped = "```json\n{\"adjRate\":0.1,\"comment\":\"ok\"}\n```";
        assert_eq!(json_slice(wrapped), "{\"adjRate\":0.1,\"comment\":\"ok\"}");
        assert_eq!(json_slice("no json here"), "no json here");
    }
}
