//! Staff notification fan-out.
//!
//! Both channels run after the record is stored and are best-effort: a
//! delivery failure is logged and counted, never surfaced to the customer.

use crate::models::{AdminRecipient, EstimateRecord};
use crate::services::database::EstimateDb;
use crate::services::metrics::record_notification;
use crate::services::providers::{EmailMessage, EmailProvider, MemoProvider};
use std::sync::Arc;

#[derive(Clone)]
pub struct Notifier {
    email: Arc<dyn EmailProvider>,
    memo: Arc<dyn MemoProvider>,
    email_recipients: Vec<String>,
}

impl Notifier {
    pub fn new(
        email: Arc<dyn EmailProvider>,
        memo: Arc<dyn MemoProvider>,
        email_recipients: Vec<String>,
    ) -> Self {
        Self {
            email,
            memo,
            email_recipients,
        }
    }

    /// Fan out a stored estimate to every configured channel.
    pub async fn notify_estimate(&self, db: &EstimateDb, record: &EstimateRecord) {
        self.send_email_summary(record).await;

        match db.list_admin_recipients().await {
            Ok(admins) => self.send_admin_memos(&admins, record).await,
            Err(e) => {
                tracing::error!(error = %e, "failed to load admin recipients for memo notify");
            }
        }
    }

    pub async fn send_email_summary(&self, record: &EstimateRecord) {
        if self.email_recipients.is_empty() {
            tracing::warn!("no estimate email recipients configured, skipping email notify");
            return;
        }

        let subject = email_subject(record);
        let text = email_text(record);
        let html = email_html(record);

        for to in &self.email_recipients {
            let message = EmailMessage {
                to: to.clone(),
                subject: subject.clone(),
                body_text: text.clone(),
                body_html: html.clone(),
            };

            match self.email.send(&message).await {
                Ok(_) => {
                    record_notification("email", "sent");
                }
                Err(e) => {
                    record_notification("email", "failed");
                    tracing::error!(to = %to, error = %e, "estimate email notify failed");
                }
            }
        }
    }

    /// One send per linked admin, concurrently; each failure stays its own.
    pub async fn send_admin_memos(&self, admins: &[AdminRecipient], record: &EstimateRecord) {
        if admins.is_empty() {
            tracing::warn!("no admin recipients registered, skipping memo notify");
            return;
        }

        let text = memo_text(record);

        let sends = admins.iter().map(|admin| {
            let text = text.clone();
            async move {
                match self.memo.send_memo(&admin.refresh_token, &text).await {
                    Ok(_) => {
                        record_notification("memo", "sent");
                        tracing::info!(role = %admin.role, "admin memo sent");
                    }
                    Err(e) => {
                        record_notification("memo", "failed");
                        tracing::error!(role = %admin.role, error = %e, "admin memo failed");
                    }
                }
            }
        });

        futures::future::join_all(sends).await;
    }
}

/// Thousands-separated figure, the way the quote form shows amounts.
pub fn format_krw(amount: u64) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

pub fn email_subject(record: &EstimateRecord) -> String {
    format!(
        "[플레오 자동견적] {}님 · {}원",
        record.contact.name,
        format_krw(record.fees.total_fee)
    )
}

pub fn email_text(record: &EstimateRecord) -> String {
    let mut lines = vec![
        "새 견적 요청이 접수되었습니다.".to_string(),
        String::new(),
        format!("고객명: {}", record.contact.name),
        format!("연락처: {}", record.contact.phone),
        format!("이메일: {}", record.contact.email),
        String::new(),
        format!("작업 위치: {}", record.work_location),
        format!(
            "작업 방식: {}",
            record.work_method.as_deref().unwrap_or("-")
        ),
        format!(
            "제품 종류: {}",
            record.product_type.as_deref().unwrap_or("-")
        ),
        String::new(),
        format!("작업 수량: {} EA", format_krw(record.work_qty)),
        format!("카톤 수량: {} CTN", format_krw(record.carton_qty)),
        format!("총 중량: {} kg", record.total_weight_kg),
        String::new(),
        format!("기본 작업비: {}원", format_krw(record.fees.base_fee)),
        format!("카톤 수수료: {}원", format_krw(record.fees.carton_fee)),
        format!("규칙 보정률: {:+.0}%", record.fees.rule_adj_rate * 100.0),
        format!("AI 보정률: {:+.0}%", record.fees.ai_adj_rate * 100.0),
        format!("예상 견적: {}원 (부가세 별도)", format_krw(record.fees.total_fee)),
        format!("예상 소요일: 약 {}일", record.lead_time_days),
    ];

    if !record.ai_comment.is_empty() {
        lines.push(String::new());
        lines.push(format!("AI 코멘트: {}", record.ai_comment));
    }

    if !record.notices.is_empty() {
        lines.push(String::new());
        for notice in &record.notices {
            lines.push(format!("※ {}", notice));
        }
    }

    if let Some(memo) = record.memo.as_deref() {
        if !memo.is_empty() {
            lines.push(String::new());
            lines.push(format!("고객 메모: {}", memo));
        }
    }

    lines.join("\n")
}

pub fn email_html(record: &EstimateRecord) -> String {
    format!(
        "<html><body style=\"font-family:Arial, sans-serif;\">\
         <h2>새 견적 요청</h2>\
         <pre style=\"font-family:inherit; white-space:pre-wrap;\">{}</pre>\
         </body></html>",
        email_text(record)
    )
}

pub fn memo_text(record: &EstimateRecord) -> String {
    [
        "[플레오 AI 견적 도착]".to_string(),
        String::new(),
        format!("고객명: {}", record.contact.name),
        format!("연락처: {}", record.contact.phone),
        format!("이메일: {}", record.contact.email),
        String::new(),
        format!("작업 위치: {}", record.work_location),
        format!(
            "작업 방식: {}",
            record.work_method.as_deref().unwrap_or("-")
        ),
        format!(
            "제품 종류: {}",
            record.product_type.as_deref().unwrap_or("-")
        ),
        String::new(),
        format!("작업 수량: {} EA", format_krw(record.work_qty)),
        format!("카톤 수량: {} CTN", format_krw(record.carton_qty)),
        format!("총 중량: {} kg", record.total_weight_kg),
        String::new(),
        format!("예상 견적: {}원 (부가세 별도)", format_krw(record.fees.total_fee)),
        format!("예상 소요일: 약 {}일", record.lead_time_days),
        String::new(),
        "※ 실제 금액은 담당자 확인 후 최종 확정됩니다.".to_string(),
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::format_krw;

    #[test]
    fn format_krw_groups_thousands() {
        assert_eq!(format_krw(0), "0");
        assert_eq!(format_krw(999), "999");
        assert_eq!(format_krw(1_000), "1,000");
        assert_eq!(format_krw(1_234_567), "1,234,567");
    }
}
