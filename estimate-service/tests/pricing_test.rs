//! Rule-table pricing tests.

mod common;

use common::shipment;
use estimate_service::models::Urgency;
use estimate_service::pricing::rate_table::{
    compute_rule_fee, unit_price, AIRPORT_MIN_FEE, NOTICE_REGIONAL_TRANSPORT,
    NOTICE_SEWING_MACHINE, NOTICE_WITNESS_FEE, PORT_MIN_FEE, SEWING_MIN_FEE,
};

#[test]
fn unit_price_drops_as_quantity_rises() {
    assert_eq!(unit_price(100), 800);
    assert_eq!(unit_price(200), 400);
    assert_eq!(unit_price(1_000), 150);
    assert_eq!(unit_price(3_000), 130);
    assert_eq!(unit_price(5_000), 110);
    assert_eq!(unit_price(9_000), 100);

    let quantities = [100u64, 200, 999, 1_000, 2_999, 3_000, 5_000, 9_000, 50_000];
    for pair in quantities.windows(2) {
        assert!(
            unit_price(pair[1]) <= unit_price(pair[0]),
            "unit price rose between {} and {}",
            pair[0],
            pair[1]
        );
    }
}

#[test]
fn incheon_port_scenario() {
    // 1,000 units, 50 cartons at 20 kg: the worked reference quote.
    let shipment = shipment(1_000, 50, 20.0, "인천항");
    let quote = compute_rule_fee(&shipment, 1_000.0);

    assert_eq!(quote.base_fee, 150_000);
    assert_eq!(quote.carton_fee, 10_000);
    assert_eq!(quote.transport_fee, 0);
    assert_eq!(quote.rule_adj_rate, 0.0);
    assert_eq!(quote.rule_fee, 160_000);
    assert!(quote.notices.is_empty(), "unexpected: {:?}", quote.notices);
    assert!(!quote.sewing_override);
}

#[test]
fn weight_tiers_are_exclusive() {
    let shipment = shipment(100, 0, 0.0, "인천");

    assert_eq!(compute_rule_fee(&shipment, 1_000.0).rule_adj_rate, 0.0);
    assert_eq!(compute_rule_fee(&shipment, 1_001.0).rule_adj_rate, 0.10);
    assert_eq!(compute_rule_fee(&shipment, 2_001.0).rule_adj_rate, 0.20);
    assert_eq!(compute_rule_fee(&shipment, 5_001.0).rule_adj_rate, 0.30);
}

#[test]
fn surcharges_are_additive() {
    let mut shipment = shipment(100, 10, 5.0, "인천신항");
    shipment.product_type = Some("주류(유리병)".to_string());
    shipment.urgency = Urgency::Night;
    shipment.memo = Some("야간에 긴급하게 부탁드립니다".to_string());

    let quote = compute_rule_fee(&shipment, 50.0);

    // alcohol 0.30 + night 0.40 + memo 0.10 + new-port 0.05
    assert!((quote.rule_adj_rate - 0.85).abs() < 1e-9);
    assert_eq!(quote.base_fee, 80_000);
    assert_eq!(quote.carton_fee, 2_000);
    assert_eq!(quote.rule_fee, 151_700);
}

#[test]
fn bulky_product_surcharge() {
    let mut shipment = shipment(100, 0, 0.0, "인천");
    shipment.product_type = Some("기저귀 박스".to_string());

    assert_eq!(compute_rule_fee(&shipment, 100.0).rule_adj_rate, 0.20);
}

#[test]
fn sack_work_is_floored_by_crew_days() {
    let mut shipment = shipment(100, 10, 500.0, "인천");
    shipment.product_type = Some("분말 마대".to_string());

    // 5,000 kg of sacks: two crew-days at 150,000 beats the per-unit math.
    let quote = compute_rule_fee(&shipment, 5_000.0);
    assert_eq!(quote.rule_fee, 300_000);
}

#[test]
fn frozen_premium_steps_at_one_tonne() {
    let mut shipment = shipment(100, 0, 0.0, "인천");
    shipment.product_type = Some("냉동 수산물".to_string());

    // 1,000 kg: no weight tier, light-premium.
    assert_eq!(compute_rule_fee(&shipment, 1_000.0).rule_fee, 130_000);
    // 1,001 kg: weight tier 0.10 plus the heavy premium.
    assert_eq!(compute_rule_fee(&shipment, 1_001.0).rule_fee, 188_000);
}

#[test]
fn sewing_method_overrides_pricing() {
    let mut shipment = shipment(100, 30, 10.0, "인천항");
    shipment.product_type = Some("주류".to_string());
    shipment.work_method = Some("라벨 박음질".to_string());

    let quote = compute_rule_fee(&shipment, 300.0);

    assert!(quote.sewing_override);
    assert_eq!(quote.base_fee, 40_000);
    assert_eq!(quote.carton_fee, 0);
    assert_eq!(quote.rule_adj_rate, 0.0);
    assert_eq!(quote.rule_fee, SEWING_MIN_FEE);
    assert!(quote
        .notices
        .iter()
        .any(|n| n == NOTICE_SEWING_MACHINE));
}

#[test]
fn large_sewing_jobs_clear_the_floor() {
    let mut shipment = shipment(1_000, 0, 0.0, "인천항");
    shipment.work_method = Some("재봉".to_string());

    assert_eq!(compute_rule_fee(&shipment, 0.0).rule_fee, 400_000);
}

#[test]
fn witness_method_adds_notice_without_fee_change() {
    let plain = shipment(500, 10, 5.0, "인천항");
    let mut with_witness = plain.clone();
    with_witness.work_method = Some("기타 (입회)".to_string());

    let base_quote = compute_rule_fee(&plain, 50.0);
    let witness_quote = compute_rule_fee(&with_witness, 50.0);

    assert_eq!(base_quote.rule_fee, witness_quote.rule_fee);
    assert!(witness_quote.notices.iter().any(|n| n == NOTICE_WITNESS_FEE));
    assert!(!base_quote.notices.iter().any(|n| n == NOTICE_WITNESS_FEE));
}

#[test]
fn airport_and_port_minimums() {
    let airport = shipment(10, 1, 1.0, "인천공항");
    assert_eq!(compute_rule_fee(&airport, 1.0).rule_fee, AIRPORT_MIN_FEE);

    let port = shipment(10, 1, 1.0, "인천항");
    assert_eq!(compute_rule_fee(&port, 1.0).rule_fee, PORT_MIN_FEE);

    // No floor away from airport/port; 10 units and one carton stay cheap.
    let elsewhere = shipment(10, 1, 1.0, "서울 창고");
    assert_eq!(compute_rule_fee(&elsewhere, 1.0).rule_fee, 8_200);
}

#[test]
fn transport_notice_outside_primary_area() {
    let regional = shipment(100, 5, 10.0, "평택항");
    let quote = compute_rule_fee(&regional, 50.0);
    assert!(quote
        .notices
        .iter()
        .any(|n| n == NOTICE_REGIONAL_TRANSPORT));
    assert_eq!(quote.transport_fee, 0);

    let incheon = shipment(100, 5, 10.0, "인천항");
    assert!(!compute_rule_fee(&incheon, 50.0)
        .notices
        .iter()
        .any(|n| n == NOTICE_REGIONAL_TRANSPORT));
}
