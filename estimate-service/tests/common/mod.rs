//! Test helpers shared by the estimate-service integration tests.

#![allow(dead_code)]

use estimate_service::models::{Contact, ShipmentRequest, Urgency};

pub fn contact() -> Contact {
    Contact {
        name: "홍길동".to_string(),
        phone: "010-1234-5678".to_string(),
        email: "hong@example.com".to_string(),
    }
}

pub fn shipment(
    work_qty: u64,
    carton_qty: u64,
    weight_per_carton: f64,
    location: &str,
) -> ShipmentRequest {
    ShipmentRequest {
        work_qty,
        carton_qty,
        weight_per_carton,
        work_location: location.to_string(),
        product_type: None,
        work_method: None,
        urgency: Urgency::Normal,
        ref_info: None,
        memo: None,
        contact: contact(),
    }
}
