use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// How soon the customer needs the work done.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    #[default]
    Normal,
    Urgent,
    Night,
}

impl std::fmt::Display for Urgency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Urgency::Normal => write!(f, "normal"),
            Urgency::Urgent => write!(f, "urgent"),
            Urgency::Night => write!(f, "night"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contact {
    pub name: String,
    pub phone: String,
    pub email: String,
}

/// A validated shipment submission, ready for pricing. Quantities and contact
/// fields have already been checked at the handler boundary.
#[derive(Debug, Clone)]
pub struct ShipmentRequest {
    pub work_qty: u64,
    pub carton_qty: u64,
    pub weight_per_carton: f64,
    pub work_location: String,
    pub product_type: Option<String>,
    pub work_method: Option<String>,
    pub urgency: Urgency,
    pub ref_info: Option<String>,
    pub memo: Option<String>,
    pub contact: Contact,
}

/// Fee figures for one estimate, frozen once computed.
///
/// `rule_fee` is the rule-table result before the AI adjustment;
/// `total_fee = round(rule_fee * (1 + ai_adj_rate))`. The two rates are
/// reported side by side in `total_adj_rate` but are not both applied to the
/// same base.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeBreakdown {
    pub base_fee: u64,
    pub carton_fee: u64,
    pub transport_fee: u64,
    pub rule_adj_rate: f64,
    pub rule_fee: u64,
    pub ai_adj_rate: f64,
    pub total_adj_rate: f64,
    pub total_fee: u64,
}

/// Persisted estimate document. Insert-only; never mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstimateRecord {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub work_qty: u64,
    pub carton_qty: u64,
    pub weight_per_carton: f64,
    pub total_weight_kg: f64,
    pub work_location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_method: Option<String>,
    pub urgency: Urgency,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ref_info: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
    pub contact: Contact,
    pub fees: FeeBreakdown,
    pub lead_time_days: u32,
    pub notices: Vec<String>,
    pub ai_comment: String,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_utc: DateTime<Utc>,
}
