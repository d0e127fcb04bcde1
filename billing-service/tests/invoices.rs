mod common;

use billing_service::services::{seed_patient_id, seed_scheme_id, TaxBasis};
use common::{money, TestApp};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use uuid::Uuid;

fn consultation(quantity: u32) -> Value {
    json!({
        "item_type": "consultation",
        "code": "CONS-GEN",
        "name": "General Physician Consultation",
        "quantity": quantity,
        "unit_price": "500",
        "tax_rate": "18"
    })
}

fn invoice_body(items: Vec<Value>) -> Value {
    json!({
        "patient_id": seed_patient_id(1),
        "invoice_type": "opd",
        "items": items,
        "payment_method": "cash"
    })
}

async fn create(app: &TestApp, body: &Value) -> Value {
    let response = app.post_json("/api/invoices", body).await;
    assert_eq!(response.status().as_u16(), 201);
    let body: Value = response.json().await.unwrap();
    body["data"].clone()
}

#[tokio::test]
async fn preview_computes_gst_without_discount() {
    let app = TestApp::spawn().await;

    let response = app
        .post_json("/api/invoices/preview", &json!({ "items": [consultation(2)] }))
        .await;

    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    let data = &body["data"];
    assert_eq!(money(&data["subtotal"]), Decimal::from(1000));
    assert_eq!(money(&data["total_tax"]), Decimal::from(180));
    assert_eq!(money(&data["final_amount"]), Decimal::from(1180));
    assert_eq!(data["tax_basis"], "before_invoice_discount");
    assert_eq!(data["currency"], "INR");
}

#[tokio::test]
async fn preview_with_invoice_discount_keeps_tax_on_discounted_lines() {
    let app = TestApp::spawn().await;

    let body = json!({
        "items": [consultation(2)],
        "discount": { "kind": "percentage", "value": 10 }
    });
    let data = app
        .post_json("/api/invoices/preview", &body)
        .await
        .json::<Value>()
        .await
        .unwrap()["data"]
        .clone();

    assert_eq!(money(&data["invoice_discount"]), Decimal::from(100));
    assert_eq!(money(&data["total_tax"]), Decimal::from(180));
    assert_eq!(money(&data["final_amount"]), Decimal::from(1080));
}

#[tokio::test]
async fn preview_after_invoice_discount_basis_prorates_tax() {
    let app = TestApp::spawn_with_tax_basis(TaxBasis::AfterInvoiceDiscount).await;

    let body = json!({
        "items": [consultation(2)],
        "discount": { "kind": "percentage", "value": 10 }
    });
    let data = app
        .post_json("/api/invoices/preview", &body)
        .await
        .json::<Value>()
        .await
        .unwrap()["data"]
        .clone();

    assert_eq!(money(&data["total_tax"]), Decimal::from(162));
    assert_eq!(money(&data["final_amount"]), Decimal::from(1062));
}

#[tokio::test]
async fn preview_applies_default_tax_rate_when_omitted() {
    let app = TestApp::spawn().await;

    let body = json!({
        "items": [{
            "item_type": "lab_test",
            "code": "LAB-CBC",
            "name": "Complete Blood Count",
            "quantity": 1,
            "unit_price": "350"
        }]
    });
    let data = app
        .post_json("/api/invoices/preview", &body)
        .await
        .json::<Value>()
        .await
        .unwrap()["data"]
        .clone();

    assert_eq!(money(&data["total_tax"]), Decimal::from(63));
    assert_eq!(money(&data["final_amount"]), Decimal::from(413));
}

#[tokio::test]
async fn preview_rejects_zero_quantity() {
    let app = TestApp::spawn().await;

    let response = app
        .post_json("/api/invoices/preview", &json!({ "items": [consultation(0)] }))
        .await;

    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn preview_rejects_oversized_line_with_400() {
    let app = TestApp::spawn().await;

    let mut item = consultation(5);
    item["unit_price"] = json!("1000000000000000000000000000");
    let response = app
        .post_json("/api/invoices/preview", &json!({ "items": [item] }))
        .await;

    assert_eq!(response.status().as_u16(), 400);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("CONS-GEN"));

    // The server keeps serving after the rejection.
    let health = app.get("/health").await;
    assert!(health.status().is_success());
}

#[tokio::test]
async fn create_rejects_sub_paise_price() {
    let app = TestApp::spawn().await;

    let mut item = consultation(3);
    item["unit_price"] = json!("0.004");
    let response = app
        .post_json("/api/invoices", &invoice_body(vec![item]))
        .await;

    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn create_splits_scheme_and_patient_share() {
    let app = TestApp::spawn().await;

    let mut body = invoice_body(vec![consultation(2)]);
    body["discount"] = json!({ "kind": "percentage", "value": 10 });
    body["scheme_id"] = json!(seed_scheme_id(2));

    let invoice = create(&app, &body).await;

    assert_eq!(invoice["status"], "pending");
    assert_eq!(invoice["patient_name"], "Ravi Kumar");
    assert_eq!(invoice["scheme"]["scheme_code"], "CGHS");
    assert_eq!(invoice["scheme"]["scheme_name"], "Central Government Health Scheme");
    assert!(invoice["invoice_number"]
        .as_str()
        .unwrap()
        .starts_with("INV-"));

    let totals = &invoice["totals"];
    assert_eq!(money(&totals["final_amount"]), Decimal::from(1080));
    assert_eq!(money(&totals["scheme_amount"]), Decimal::from(864));
    assert_eq!(money(&totals["patient_amount"]), Decimal::from(216));
}

#[tokio::test]
async fn create_requires_patient() {
    let app = TestApp::spawn().await;

    let response = app
        .post_json("/api/invoices", &json!({ "items": [consultation(1)] }))
        .await;

    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn create_requires_items() {
    let app = TestApp::spawn().await;

    let response = app.post_json("/api/invoices", &invoice_body(vec![])).await;

    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn create_with_unknown_patient_is_404() {
    let app = TestApp::spawn().await;

    let mut body = invoice_body(vec![consultation(1)]);
    body["patient_id"] = json!(Uuid::new_v4());
    let response = app.post_json("/api/invoices", &body).await;

    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn create_with_blank_item_code_is_422() {
    let app = TestApp::spawn().await;

    let mut item = consultation(1);
    item["code"] = json!("");
    let response = app
        .post_json("/api/invoices", &invoice_body(vec![item]))
        .await;

    assert_eq!(response.status().as_u16(), 422);
}

#[tokio::test]
async fn created_invoice_can_be_fetched_and_listed() {
    let app = TestApp::spawn().await;

    let invoice = create(&app, &invoice_body(vec![consultation(1)])).await;
    let id = invoice["invoice_id"].as_str().unwrap();

    let fetched: Value = app
        .get(&format!("/api/invoices/{}", id))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(fetched["data"]["invoice_number"], invoice["invoice_number"]);

    let listed: Value = app
        .get(&format!("/api/invoices?patient_id={}", seed_patient_id(1)))
        .await
        .json()
        .await
        .unwrap();
    let ids: Vec<&str> = listed["data"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|i| i["invoice_id"].as_str())
        .collect();
    assert!(ids.contains(&id));
}

#[tokio::test]
async fn pay_then_cancel_is_conflict() {
    let app = TestApp::spawn().await;

    let invoice = create(&app, &invoice_body(vec![consultation(1)])).await;
    let id = invoice["invoice_id"].as_str().unwrap();

    let paid = app.post_empty(&format!("/api/invoices/{}/pay", id)).await;
    assert_eq!(paid.status().as_u16(), 200);
    let paid: Value = paid.json().await.unwrap();
    assert_eq!(paid["data"]["status"], "paid");

    let cancel = app
        .post_json(
            &format!("/api/invoices/{}/cancel", id),
            &json!({ "reason": "Entered twice" }),
        )
        .await;
    assert_eq!(cancel.status().as_u16(), 409);
}

#[tokio::test]
async fn cancel_pending_invoice_records_reason() {
    let app = TestApp::spawn().await;

    let invoice = create(&app, &invoice_body(vec![consultation(1)])).await;
    let id = invoice["invoice_id"].as_str().unwrap();

    let response = app
        .post_json(
            &format!("/api/invoices/{}/cancel", id),
            &json!({ "reason": "Entered twice" }),
        )
        .await;

    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["data"]["status"], "cancelled");
    assert_eq!(body["data"]["cancellation_reason"], "Entered twice");
}

#[tokio::test]
async fn listing_filters_by_status() {
    let app = TestApp::spawn().await;

    let mut body = invoice_body(vec![consultation(1)]);
    body["patient_id"] = json!(seed_patient_id(6));
    let invoice = create(&app, &body).await;
    let id = invoice["invoice_id"].as_str().unwrap();
    app.post_empty(&format!("/api/invoices/{}/pay", id)).await;

    let listed: Value = app
        .get(&format!(
            "/api/invoices?patient_id={}&status=paid",
            seed_patient_id(6)
        ))
        .await
        .json()
        .await
        .unwrap();
    let invoices = listed["data"].as_array().unwrap();
    assert!(!invoices.is_empty());
    assert!(invoices.iter().all(|i| i["status"] == "paid"));
}

#[tokio::test]
async fn unknown_invoice_is_404() {
    let app = TestApp::spawn().await;

    let response = app
        .post_empty(&format!("/api/invoices/{}/pay", Uuid::new_v4()))
        .await;

    assert_eq!(response.status().as_u16(), 404);
}
