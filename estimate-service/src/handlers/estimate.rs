use axum::{
    extract::{Query, State},
    Json,
};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{Contact, EstimateRecord, ShipmentRequest, Urgency};
use crate::services::metrics::record_estimate;
use crate::startup::AppState;
use service_core::error::AppError;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubmitEstimateRequest {
    #[validate(required(message = "workQty is required"))]
    pub work_qty: Option<u64>,
    #[validate(required(message = "cartonQty is required"))]
    pub carton_qty: Option<u64>,
    #[validate(
        required(message = "weightPerCarton is required"),
        range(min = 0.0, message = "weightPerCarton must be non-negative")
    )]
    pub weight_per_carton: Option<f64>,
    #[validate(length(min = 1, message = "workLocation is required"))]
    pub work_location: String,
    pub product_type: Option<String>,
    pub work_method: Option<String>,
    #[serde(default)]
    pub urgency: Urgency,
    pub ref_info: Option<String>,
    #[validate(length(min = 1, message = "contactName is required"))]
    pub contact_name: String,
    #[validate(length(min = 1, message = "contactPhone is required"))]
    pub contact_phone: String,
    #[validate(length(min = 1, message = "contactEmail is required"))]
    pub contact_email: String,
    pub memo: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateSummary {
    pub id: String,
    pub total_weight_kg: f64,
    pub base_fee: u64,
    pub carton_fee: u64,
    pub transport_fee: u64,
    pub rule_adj_rate: f64,
    pub ai_adj_rate: f64,
    pub total_adj_rate: f64,
    pub total_fee: u64,
    pub lead_time_days: u32,
    pub ai_comment: String,
    pub notices: Vec<String>,
}

impl EstimateSummary {
    fn from_record(id: ObjectId, record: &EstimateRecord) -> Self {
        Self {
            id: id.to_hex(),
            total_weight_kg: record.total_weight_kg,
            base_fee: record.fees.base_fee,
            carton_fee: record.fees.carton_fee,
            transport_fee: record.fees.transport_fee,
            rule_adj_rate: record.fees.rule_adj_rate,
            ai_adj_rate: record.fees.ai_adj_rate,
            total_adj_rate: record.fees.total_adj_rate,
            total_fee: record.fees.total_fee,
            lead_time_days: record.lead_time_days,
            ai_comment: record.ai_comment.clone(),
            notices: record.notices.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SubmitEstimateResponse {
    pub ok: bool,
    pub estimate: EstimateSummary,
}

#[tracing::instrument(skip(state, request))]
pub async fn submit_estimate(
    State(state): State<AppState>,
    Json(request): Json<SubmitEstimateRequest>,
) -> Result<Json<SubmitEstimateResponse>, AppError> {
    metrics::counter!("http_requests_total", "endpoint" => "estimate").increment(1);

    request.validate().inspect_err(|_| {
        record_estimate("rejected");
    })?;

    let shipment = ShipmentRequest {
        work_qty: request.work_qty.unwrap_or_default(),
        carton_qty: request.carton_qty.unwrap_or_default(),
        weight_per_carton: request.weight_per_carton.unwrap_or_default(),
        work_location: request.work_location,
        product_type: request.product_type,
        work_method: request.work_method,
        urgency: request.urgency,
        ref_info: request.ref_info,
        memo: request.memo,
        contact: Contact {
            name: request.contact_name,
            phone: request.contact_phone,
            email: request.contact_email,
        },
    };

    let record = state.engine.produce_estimate(&shipment).await;

    let id = state.db.insert_estimate(&record).await.inspect_err(|_| {
        record_estimate("failed");
    })?;
    record_estimate("accepted");

    tracing::info!(
        estimate_id = %id,
        total_fee = record.fees.total_fee,
        lead_time_days = record.lead_time_days,
        "estimate stored"
    );

    // Staff notification runs detached; the response never waits on it and
    // its failures stay in the logs.
    let notifier = state.notifier.clone();
    let db = state.db.clone();
    let stored = record.clone();
    tokio::spawn(async move {
        notifier.notify_estimate(&db, &stored).await;
    });

    Ok(Json(SubmitEstimateResponse {
        ok: true,
        estimate: EstimateSummary::from_record(id, &record),
    }))
}

#[derive(Debug, Deserialize)]
pub struct RecentQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct RecentEstimatesResponse {
    pub ok: bool,
    pub estimates: Vec<EstimateSummary>,
}

/// Most recent submissions, newest first, for staff review.
pub async fn recent_estimates(
    State(state): State<AppState>,
    Query(query): Query<RecentQuery>,
) -> Result<Json<RecentEstimatesResponse>, AppError> {
    let limit = query.limit.unwrap_or(20).clamp(1, 100);

    let records = state.db.recent_estimates(limit).await?;

    let estimates = records
        .iter()
        .map(|record| {
            EstimateSummary::from_record(record.id.unwrap_or_else(ObjectId::new), record)
        })
        .collect();

    Ok(Json(RecentEstimatesResponse {
        ok: true,
        estimates,
    }))
}
