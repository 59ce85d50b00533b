//! Notification rendering and fan-out tests.

mod common;

use common::shipment;
use estimate_service::models::AdminRecipient;
use estimate_service::pricing::EstimateEngine;
use estimate_service::services::notify::{email_subject, email_text, memo_text};
use estimate_service::services::{
    MockAdjustmentProvider, MockEmailProvider, MockMemoProvider, Notifier,
};
use estimate_service::models::EstimateRecord;
use std::sync::Arc;

async fn sample_record() -> EstimateRecord {
    let engine = EstimateEngine::new(Arc::new(MockAdjustmentProvider::with_reply(
        0.1,
        "야간 작업 가산",
    )));
    engine
        .produce_estimate(&shipment(1_000, 50, 20.0, "인천항"))
        .await
}

#[tokio::test]
async fn memo_text_summarizes_the_estimate() {
    let record = sample_record().await;
    let text = memo_text(&record);

    assert!(text.contains("홍길동"));
    assert!(text.contains("010-1234-5678"));
    assert!(text.contains("인천항"));
    assert!(text.contains("1,000 EA"));
    assert!(text.contains("176,000원"));
    assert!(text.contains("약 1일"));
}

#[tokio::test]
async fn email_carries_breakdown_and_comment() {
    let record = sample_record().await;

    assert!(email_subject(&record).contains("176,000"));

    let text = email_text(&record);
    assert!(text.contains("기본 작업비: 150,000원"));
    assert!(text.contains("카톤 수수료: 10,000원"));
    assert!(text.contains("AI 코멘트: 야간 작업 가산"));
}

#[tokio::test]
async fn email_goes_to_every_configured_address() {
    let email = Arc::new(MockEmailProvider::new(true));
    let memo = Arc::new(MockMemoProvider::new(true));
    let notifier = Notifier::new(
        email.clone(),
        memo,
        vec!["staff@example.com".to_string(), "boss@example.com".to_string()],
    );

    let record = sample_record().await;
    notifier.send_email_summary(&record).await;

    assert_eq!(email.send_count(), 2);
}

#[tokio::test]
async fn missing_email_config_is_a_noop() {
    let email = Arc::new(MockEmailProvider::new(true));
    let memo = Arc::new(MockMemoProvider::new(true));
    let notifier = Notifier::new(email.clone(), memo, Vec::new());

    let record = sample_record().await;
    notifier.send_email_summary(&record).await;

    assert_eq!(email.send_count(), 0);
}

#[tokio::test]
async fn one_failed_memo_does_not_block_the_rest() {
    let email = Arc::new(MockEmailProvider::new(true));
    let memo = Arc::new(MockMemoProvider::failing_for("tok-broken"));
    let notifier = Notifier::new(email, memo.clone(), Vec::new());

    let admins = vec![
        AdminRecipient::new("owner".to_string(), "tok-owner".to_string()),
        AdminRecipient::new("boss".to_string(), "tok-broken".to_string()),
        AdminRecipient::new("ops".to_string(), "tok-ops".to_string()),
    ];

    let record = sample_record().await;
    notifier.send_admin_memos(&admins, &record).await;

    assert_eq!(memo.send_count(), 2);
}
