use crate::helpers::{spawn_app, valid_payment_body};

/// spec.md §4.3.1/§7: validation failures never reach the acquirer and are
/// reported as `400` with the field-specific message.
#[tokio::test]
async fn card_number_boundaries_are_enforced() {
    let app = spawn_app().await;

    let cases = [
        ("123456789012345", "card number is invalid"), // 15 digits, too short
        ("12345678901234567890", "card number is invalid"), // 20 digits, too long
    ];

    for (number, expected_message) in cases {
        let mut body = valid_payment_body();
        body["credit_card"]["number"] = serde_json::json!(number);

        let response = app.create_payment(&body).await;
        assert_eq!(response.status().as_u16(), 400, "number = {number}");

        let json: serde_json::Value = response.json().await.unwrap();
        assert_eq!(json["message"], expected_message);
    }
}

#[tokio::test]
async fn card_number_boundaries_of_16_and_19_are_accepted() {
    let app = spawn_app().await;

    for number in ["4485040371536584".to_owned(), "4485040371536584123".to_owned()] {
        let mut body = valid_payment_body();
        body["credit_card"]["number"] = serde_json::json!(number);
        let response = app.create_payment(&body).await;
        assert_ne!(response.status().as_u16(), 400, "number = {number}");
    }
}

#[tokio::test]
async fn blank_names_are_rejected() {
    let app = spawn_app().await;

    let mut body = valid_payment_body();
    body["credit_card"]["first_name"] = serde_json::json!("   ");
    let response = app.create_payment(&body).await;
    assert_eq!(response.status().as_u16(), 400);
    let json: serde_json::Value = response.json().await.unwrap();
    assert_eq!(json["message"], "first_name is required");

    let mut body = valid_payment_body();
    body["credit_card"]["last_name"] = serde_json::json!("");
    let response = app.create_payment(&body).await;
    assert_eq!(response.status().as_u16(), 400);
    let json: serde_json::Value = response.json().await.unwrap();
    assert_eq!(json["message"], "last_name is required");
}

#[tokio::test]
async fn expiry_fields_must_match_their_fixed_width() {
    let app = spawn_app().await;

    let mut body = valid_payment_body();
    body["credit_card"]["expiry_month"] = serde_json::json!("1");
    let response = app.create_payment(&body).await;
    assert_eq!(response.status().as_u16(), 400);
    let json: serde_json::Value = response.json().await.unwrap();
    assert_eq!(json["message"], "expiry_month need two numbers");

    let mut body = valid_payment_body();
    body["credit_card"]["expiry_year"] = serde_json::json!("22");
    let response = app.create_payment(&body).await;
    assert_eq!(response.status().as_u16(), 400);
    let json: serde_json::Value = response.json().await.unwrap();
    assert_eq!(json["message"], "expiry_year need four numbers");
}

#[tokio::test]
async fn get_payment_with_a_non_uuid_id_reports_that_it_must_be_a_uuid() {
    let app = spawn_app().await;

    let response = app.get_payment("ABC").await;

    assert_eq!(response.status().as_u16(), 400);
    let json: serde_json::Value = response.json().await.unwrap();
    assert_eq!(json["message"], "the id must be uuid");
}

#[tokio::test]
async fn get_payment_with_a_nil_uuid_reports_that_it_must_be_valid() {
    let app = spawn_app().await;

    let response = app
        .get_payment("00000000-0000-0000-0000-000000000000")
        .await;

    assert_eq!(response.status().as_u16(), 400);
    let json: serde_json::Value = response.json().await.unwrap();
    assert_eq!(json["message"], "the id must be a valid uuid");
}
