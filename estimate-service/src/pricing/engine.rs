//! Estimate engine: rule table plus the bounded external adjustment.

use super::rate_table::{self, SEWING_MIN_FEE};
use crate::models::{EstimateRecord, FeeBreakdown, ShipmentRequest};
use crate::services::metrics::record_adjustment_call;
use crate::services::providers::{Adjustment, AdjustmentContext, AdjustmentProvider};
use chrono::Utc;
use std::sync::Arc;

/// One working day covers this many units.
pub const UNITS_PER_DAY: u64 = 30_000;

pub struct EstimateEngine {
    adjustment: Arc<dyn AdjustmentProvider>,
}

impl EstimateEngine {
    pub fn new(adjustment: Arc<dyn AdjustmentProvider>) -> Self {
        Self { adjustment }
    }

    /// Price a validated shipment and assemble the record to persist.
    ///
    /// Never fails: the adjustment provider is untrusted network I/O, and a
    /// quote must come back even when it is down, so provider errors collapse
    /// to a zero adjustment.
    pub async fn produce_estimate(&self, shipment: &ShipmentRequest) -> EstimateRecord {
        let total_weight_kg = shipment.carton_qty as f64 * shipment.weight_per_carton;

        let quote = rate_table::compute_rule_fee(shipment, total_weight_kg);

        let context = AdjustmentContext {
            work_qty: shipment.work_qty,
            carton_qty: shipment.carton_qty,
            weight_per_carton: shipment.weight_per_carton,
            total_weight_kg,
            base_fee: quote.base_fee,
            carton_fee: quote.carton_fee,
            memo: shipment.memo.clone(),
        };

        let adjustment = match self.adjustment.adjust(&context).await {
            Ok(adjustment) => {
                record_adjustment_call("ok");
                adjustment
            }
            Err(e) => {
                record_adjustment_call("error");
                tracing::warn!(error = %e, "adjustment provider failed, keeping rule fee");
                Adjustment {
                    adj_rate: 0.0,
                    comment: String::new(),
                }
            }
        };

        // The adjustment multiplies the already rule-adjusted fee; the summed
        // rate below is reporting only. Changing this ordering changes every
        // historical quote.
        let ai_adj_rate = adjustment.adj_rate;
        let mut total_fee = rate_table::apply_rate(quote.rule_fee, ai_adj_rate);
        if quote.sewing_override {
            total_fee = total_fee.max(SEWING_MIN_FEE);
        }

        let lead_time_days = shipment.work_qty.div_ceil(UNITS_PER_DAY).max(1) as u32;

        EstimateRecord {
            id: None,
            work_qty: shipment.work_qty,
            carton_qty: shipment.carton_qty,
            weight_per_carton: shipment.weight_per_carton,
            total_weight_kg,
            work_location: shipment.work_location.clone(),
            product_type: shipment.product_type.clone(),
            work_method: shipment.work_method.clone(),
            urgency: shipment.urgency,
            ref_info: shipment.ref_info.clone(),
            memo: shipment.memo.clone(),
            contact: shipment.contact.clone(),
            fees: FeeBreakdown {
                base_fee: quote.base_fee,
                carton_fee: quote.carton_fee,
                transport_fee: quote.transport_fee,
                rule_adj_rate: quote.rule_adj_rate,
                rule_fee: quote.rule_fee,
                ai_adj_rate,
                total_adj_rate: quote.rule_adj_rate + ai_adj_rate,
                total_fee,
            },
            lead_time_days,
            notices: quote.notices,
            ai_comment: adjustment.comment,
            created_utc: Utc::now(),
        }
    }
}
