//! Submission validation tests.

use estimate_service::handlers::estimate::SubmitEstimateRequest;
use estimate_service::models::Urgency;
use validator::Validate;

fn valid_request() -> SubmitEstimateRequest {
    SubmitEstimateRequest {
        work_qty: Some(1_000),
        carton_qty: Some(50),
        weight_per_carton: Some(20.0),
        work_location: "인천항".to_string(),
        product_type: None,
        work_method: None,
        urgency: Urgency::Normal,
        ref_info: None,
        contact_name: "A".to_string(),
        contact_phone: "010".to_string(),
        contact_email: "a@x.com".to_string(),
        memo: None,
    }
}

#[test]
fn well_formed_request_passes() {
    let request = valid_request();
    assert!(request.validate().is_ok());
}

#[test]
fn validation_is_pure() {
    // Same input, same decision, however many times it runs.
    let accept = valid_request();
    assert_eq!(accept.validate().is_ok(), accept.validate().is_ok());

    let mut reject = valid_request();
    reject.contact_name = String::new();
    assert_eq!(reject.validate().is_err(), reject.validate().is_err());
    assert!(reject.validate().is_err());
}

#[test]
fn missing_quantities_are_rejected() {
    let mut request = valid_request();
    request.work_qty = None;
    assert!(request.validate().is_err());

    let mut request = valid_request();
    request.weight_per_carton = None;
    assert!(request.validate().is_err());
}

#[test]
fn negative_weight_is_rejected() {
    let mut request = valid_request();
    request.weight_per_carton = Some(-1.0);
    assert!(request.validate().is_err());
}

#[test]
fn empty_contact_fields_are_rejected() {
    for field in ["name", "phone", "email"] {
        let mut request = valid_request();
        match field {
            "name" => request.contact_name = String::new(),
            "phone" => request.contact_phone = String::new(),
            _ => request.contact_email = String::new(),
        }
        assert!(request.validate().is_err(), "empty {} accepted", field);
    }
}
