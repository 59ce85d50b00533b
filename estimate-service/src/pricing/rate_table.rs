//! Rule-table fee calculation.
//!
//! Pure and deterministic: shipment attributes in, rule-stage fee breakdown
//! out. The AI adjustment is layered on top by the engine, never here.

use super::keywords;
use crate::models::{ShipmentRequest, Urgency};

pub const CARTON_UNIT_PRICE: u64 = 200;
pub const SEWING_UNIT_PRICE: u64 = 400;
pub const SEWING_MIN_FEE: u64 = 200_000;
pub const AIRPORT_MIN_FEE: u64 = 90_000;
pub const PORT_MIN_FEE: u64 = 80_000;

/// Labor floor for sack/powder repacking: one crew-day per 2,500 kg.
pub const SACK_CREW_DAY_FEE: u64 = 150_000;
pub const SACK_KG_PER_CREW_DAY: f64 = 2_500.0;

pub const NOTICE_SEWING_MACHINE: &str = "재봉틀(미싱) 사용료는 별도입니다.";
pub const NOTICE_WITNESS_FEE: &str = "입회 수수료는 80,000원입니다.";
pub const NOTICE_REGIONAL_TRANSPORT: &str = "지방 작업은 운송비가 추가될 수 있습니다.";

/// Rule-stage quote, before the external adjustment is applied.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleQuote {
    pub base_fee: u64,
    pub carton_fee: u64,
    pub transport_fee: u64,
    pub rule_adj_rate: f64,
    pub rule_fee: u64,
    pub notices: Vec<String>,
    pub sewing_override: bool,
}

/// Per-unit labor price by quantity tier. Bigger jobs amortize setup, so the
/// unit price drops as quantity rises.
pub fn unit_price(work_qty: u64) -> u64 {
    if work_qty >= 9_000 {
        100
    } else if work_qty >= 5_000 {
        110
    } else if work_qty >= 3_000 {
        130
    } else if work_qty >= 1_000 {
        150
    } else if work_qty >= 200 {
        400
    } else {
        800
    }
}

pub(crate) fn apply_rate(amount: u64, rate: f64) -> u64 {
    (amount as f64 * (1.0 + rate)).round() as u64
}

pub fn compute_rule_fee(shipment: &ShipmentRequest, total_weight_kg: f64) -> RuleQuote {
    let product = shipment.product_type.as_deref().unwrap_or("");
    let method = shipment.work_method.as_deref().unwrap_or("");
    let memo = shipment.memo.as_deref().unwrap_or("");
    let location = shipment.work_location.as_str();

    let mut notices = Vec::new();

    let mut base_fee = shipment.work_qty * unit_price(shipment.work_qty);
    let mut carton_fee = shipment.carton_qty * CARTON_UNIT_PRICE;

    // Surcharges are additive; only the weight tiers are exclusive among
    // themselves.
    let mut rule_adj_rate = 0.0;
    if total_weight_kg > 5_000.0 {
        rule_adj_rate += 0.30;
    } else if total_weight_kg > 2_000.0 {
        rule_adj_rate += 0.20;
    } else if total_weight_kg > 1_000.0 {
        rule_adj_rate += 0.10;
    }
    if keywords::is_bulky_product(product) {
        rule_adj_rate += 0.20;
    }
    if keywords::is_alcohol_product(product) {
        rule_adj_rate += 0.30;
    }
    if keywords::is_new_port(location) {
        rule_adj_rate += 0.05;
    }
    match shipment.urgency {
        Urgency::Urgent => rule_adj_rate += 0.20,
        Urgency::Night => rule_adj_rate += 0.40,
        Urgency::Normal => {}
    }
    if keywords::has_urgency_keyword(memo) {
        rule_adj_rate += 0.10;
    }

    let mut rule_fee = apply_rate(base_fee + carton_fee, rule_adj_rate);

    // Sack/powder work is priced by crew-days at minimum, whatever the
    // per-unit math says.
    if keywords::is_sack_product(product) || keywords::is_sack_product(memo) {
        let labor_min = ((total_weight_kg / SACK_KG_PER_CREW_DAY).max(1.0)
            * SACK_CREW_DAY_FEE as f64)
            .round() as u64;
        rule_fee = rule_fee.max(labor_min);
    }

    // Cold-chain handling premium.
    if keywords::is_frozen_product(product)
        || keywords::is_frozen_product(location)
        || keywords::is_frozen_product(memo)
    {
        rule_fee += if total_weight_kg > 1_000.0 {
            100_000
        } else {
            50_000
        };
    }

    // Sewing jobs replace the whole calculation above: flat per-unit price,
    // no carton fee, no surcharges, machine rental billed separately.
    let sewing_override = keywords::is_sewing_method(method);
    if sewing_override {
        base_fee = shipment.work_qty * SEWING_UNIT_PRICE;
        carton_fee = 0;
        rule_adj_rate = 0.0;
        rule_fee = base_fee.max(SEWING_MIN_FEE);
        notices.push(NOTICE_SEWING_MACHINE.to_string());
    }

    if keywords::is_witness_method(method) {
        notices.push(NOTICE_WITNESS_FEE.to_string());
    }

    // Out-of-area transport is quoted separately by staff; the estimate only
    // carries the notice.
    if !keywords::in_primary_service_area(location) {
        notices.push(NOTICE_REGIONAL_TRANSPORT.to_string());
    }

    if keywords::is_airport(location) {
        rule_fee = rule_fee.max(AIRPORT_MIN_FEE);
    } else if keywords::is_port(location) {
        rule_fee = rule_fee.max(PORT_MIN_FEE);
    }

    RuleQuote {
        base_fee,
        carton_fee,
        transport_fee: 0,
        rule_adj_rate,
        rule_fee,
        notices,
        sewing_override,
    }
}
