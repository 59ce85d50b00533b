//! Estimate engine tests: adjustment layering, clamping, resilience.

mod common;

use common::shipment;
use estimate_service::pricing::EstimateEngine;
use estimate_service::services::MockAdjustmentProvider;
use std::sync::Arc;

fn engine(provider: MockAdjustmentProvider) -> EstimateEngine {
    EstimateEngine::new(Arc::new(provider))
}

#[tokio::test]
async fn zero_adjustment_keeps_rule_fee() {
    let engine = engine(MockAdjustmentProvider::new(true));
    let record = engine
        .produce_estimate(&shipment(1_000, 50, 20.0, "인천항"))
        .await;

    assert_eq!(record.total_weight_kg, 1_000.0);
    assert_eq!(record.fees.rule_fee, 160_000);
    assert_eq!(record.fees.ai_adj_rate, 0.0);
    assert_eq!(record.fees.total_fee, 160_000);
    assert_eq!(record.lead_time_days, 1);
}

#[tokio::test]
async fn provider_outage_is_absorbed() {
    let engine = engine(MockAdjustmentProvider::failing());
    let record = engine
        .produce_estimate(&shipment(1_000, 50, 20.0, "인천항"))
        .await;

    assert_eq!(record.fees.ai_adj_rate, 0.0);
    assert_eq!(record.fees.total_fee, record.fees.rule_fee);
    assert_eq!(record.ai_comment, "");
}

#[tokio::test]
async fn excessive_adjustment_is_clamped() {
    let engine = engine(MockAdjustmentProvider::with_reply(5.0, "폭등"));
    let record = engine
        .produce_estimate(&shipment(1_000, 50, 20.0, "인천항"))
        .await;

    assert_eq!(record.fees.ai_adj_rate, 0.30);
    assert_eq!(record.fees.total_fee, 208_000);

    let engine = engine_with(-5.0);
    let record = engine
        .produce_estimate(&shipment(1_000, 50, 20.0, "인천항"))
        .await;

    assert_eq!(record.fees.ai_adj_rate, -0.20);
    assert_eq!(record.fees.total_fee, 128_000);
}

fn engine_with(rate: f64) -> EstimateEngine {
    engine(MockAdjustmentProvider::with_reply(rate, ""))
}

#[tokio::test]
async fn adjustment_multiplies_rule_fee() {
    let engine = engine(MockAdjustmentProvider::with_reply(0.1, "야간 가산"));
    let record = engine
        .produce_estimate(&shipment(1_000, 50, 20.0, "인천항"))
        .await;

    // Applied to the rule fee, which already carries the rule adjustment.
    assert_eq!(record.fees.total_fee, 176_000);
    assert!((record.fees.total_adj_rate - 0.1).abs() < 1e-9);
    assert_eq!(record.ai_comment, "야간 가산");
}

#[tokio::test]
async fn sewing_floor_holds_after_downward_adjustment() {
    let mut sewing = shipment(100, 10, 5.0, "인천항");
    sewing.work_method = Some("박음질".to_string());

    let engine = engine_with(-0.2);
    let record = engine.produce_estimate(&sewing).await;

    assert_eq!(record.fees.rule_fee, 200_000);
    assert_eq!(record.fees.total_fee, 200_000);
}

#[tokio::test]
async fn lead_time_scales_with_quantity() {
    let engine = engine(MockAdjustmentProvider::new(true));

    for (qty, days) in [(0u64, 1u32), (100, 1), (30_000, 1), (30_001, 2), (90_001, 4)] {
        let record = engine
            .produce_estimate(&shipment(qty, 1, 1.0, "인천항"))
            .await;
        assert_eq!(record.lead_time_days, days, "qty {}", qty);
    }
}

#[tokio::test]
async fn record_carries_submission_fields() {
    let mut submitted = shipment(1_000, 50, 20.0, "인천항");
    submitted.product_type = Some("의류".to_string());
    submitted.ref_info = Some("PO-2024-117".to_string());
    submitted.memo = Some("라벨 교체".to_string());

    let engine = engine(MockAdjustmentProvider::new(true));
    let record = engine.produce_estimate(&submitted).await;

    assert!(record.id.is_none());
    assert_eq!(record.contact.name, "홍길동");
    assert_eq!(record.product_type.as_deref(), Some("의류"));
    assert_eq!(record.ref_info.as_deref(), Some("PO-2024-117"));
    assert_eq!(record.memo.as_deref(), Some("라벨 교체"));
}
