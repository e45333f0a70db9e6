mod common;

use actix_web::{http::header, test};
use serde_json::{json, Value};

use common::{bearer, encode_form, TestApp, FORM_CONTENT_TYPE};
use payment_method_contract::{
    contract::fixtures,
    services::stripe::models::customer::CreateCustomer,
};

fn post(uri: &str, body: String) -> test::TestRequest {
    test::TestRequest::post()
        .uri(uri)
        .insert_header(bearer())
        .insert_header((header::CONTENT_TYPE, FORM_CONTENT_TYPE))
        .set_payload(body)
}

fn get(uri: &str) -> test::TestRequest {
    test::TestRequest::get().uri(uri).insert_header(bearer())
}

#[actix_rt::test]
async fn test_health_reports_resource_counts() {
    let test_app = TestApp::new();
    test_app.store.create_customer(CreateCustomer::default());
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["resources"]["customers"], 1);
    assert_eq!(body["resources"]["payment_methods"], 0);
}

#[actix_rt::test]
async fn test_missing_api_key_is_unauthorized() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post()
        .uri("/v1/customers")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["type"], "invalid_request_error");
}

#[actix_rt::test]
async fn test_configured_api_key_must_match() {
    let test_app = TestApp::with_api_key("sk_test_expected");
    let app = test::init_service(test_app.create_app()).await;

    let req = post("/v1/customers", String::new()).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);

    let req = test::TestRequest::post()
        .uri("/v1/customers")
        .insert_header((header::AUTHORIZATION, "Bearer sk_test_expected"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());
}

#[actix_rt::test]
async fn test_create_payment_method_echoes_billing_details() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;

    let req = post(
        "/v1/payment_methods",
        encode_form(&fixtures::full_payment_method()),
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body: Value = test::read_body_json(resp).await;
    assert!(body["id"].as_str().unwrap().starts_with("test_pm_"));
    assert_eq!(body["object"], "payment_method");
    assert_eq!(body["type"], "card");
    assert_eq!(body["customer"], Value::Null);
    assert_eq!(
        body["billing_details"]["address"]["city"],
        "North New Portland"
    );
    assert_eq!(body["billing_details"]["address"]["postal_code"], "05555");
    assert_eq!(body["billing_details"]["email"], "john@example.com");
    assert_eq!(body["metadata"]["order_id"], "123456789");
    assert_eq!(body["card"]["exp_month"], 9);
    assert_eq!(body["card"]["last4"], "4242");
    assert!(body["card"].get("number").is_none());
}

#[actix_rt::test]
async fn test_create_with_invalid_type_is_bad_request() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;

    let mut params = fixtures::full_payment_method();
    params.kind = fixtures::INVALID_TYPE.to_string();

    let req = post("/v1/payment_methods", encode_form(&params)).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["type"], "invalid_request_error");
    assert_eq!(body["error"]["param"], "type");
    assert_eq!(test_app.store.stats().payment_methods, 0);
}

#[actix_rt::test]
async fn test_malformed_card_is_bad_request() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;

    let req = post(
        "/v1/payment_methods",
        "type=card&card[number]=4242424242424242&card[exp_month]=soon&card[exp_year]=2099"
            .to_string(),
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}

#[actix_rt::test]
async fn test_unknown_payment_method_is_not_found() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;

    let req = get("/v1/payment_methods/test_pm_missing").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["code"], "resource_missing");
}

#[actix_rt::test]
async fn test_attach_list_detach_flow() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;

    let req = post("/v1/customers", encode_form(&CreateCustomer::default())).to_request();
    let customer: Value = test::call_and_read_body_json(&app, req).await;
    let customer_id = customer["id"].as_str().unwrap().to_string();
    assert!(customer_id.starts_with("cus_"));

    let req = post(
        "/v1/payment_methods",
        encode_form(&fixtures::card_payment_method()),
    )
    .to_request();
    let payment_method: Value = test::call_and_read_body_json(&app, req).await;
    let payment_id = payment_method["id"].as_str().unwrap().to_string();

    let req = post(
        &format!("/v1/payment_methods/{}/attach", payment_id),
        encode_form(&json!({ "customer": &customer_id })),
    )
    .to_request();
    let attached: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(attached["customer"], customer_id.as_str());

    let req = get(&format!(
        "/v1/payment_methods?customer={}&type=card",
        customer_id
    ))
    .to_request();
    let list: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(list["object"], "list");
    assert_eq!(list["data"].as_array().unwrap().len(), 1);

    let req = get(&format!(
        "/v1/customers/{}/payment_methods?type=card",
        customer_id
    ))
    .to_request();
    let list: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(list["data"][0]["id"], payment_id.as_str());

    let req = post(
        &format!("/v1/payment_methods/{}/detach", payment_id),
        String::new(),
    )
    .to_request();
    let detached: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(detached["customer"], Value::Null);
}

#[actix_rt::test]
async fn test_attach_to_missing_customer_is_bad_request() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;

    let req = post(
        "/v1/payment_methods",
        encode_form(&fixtures::card_payment_method()),
    )
    .to_request();
    let payment_method: Value = test::call_and_read_body_json(&app, req).await;
    let payment_id = payment_method["id"].as_str().unwrap();

    let req = post(
        &format!("/v1/payment_methods/{}/attach", payment_id),
        encode_form(&json!({ "customer": fixtures::MISSING_CUSTOMER })),
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["param"], "customer");
}

#[actix_rt::test]
async fn test_update_without_customer_is_bad_request() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;

    let req = post(
        "/v1/payment_methods",
        encode_form(&fixtures::card_payment_method()),
    )
    .to_request();
    let payment_method: Value = test::call_and_read_body_json(&app, req).await;
    let payment_id = payment_method["id"].as_str().unwrap();

    let req = post(
        &format!("/v1/payment_methods/{}", payment_id),
        "card[exp_month]=12".to_string(),
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}

#[actix_rt::test]
async fn test_list_with_bad_limit_is_bad_request() {
    let test_app = TestApp::new();
    let customer = test_app.store.create_customer(CreateCustomer::default());
    let app = test::init_service(test_app.create_app()).await;

    let req = get(&format!(
        "/v1/payment_methods?customer={}&limit=lots",
        customer.id
    ))
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["type"], "invalid_request_error");

    let req = get(&format!(
        "/v1/payment_methods?customer={}&limit=500",
        customer.id
    ))
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}

#[actix_rt::test]
async fn test_unrecognized_url_is_not_found() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;

    let req = get("/v1/charges").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
}

#[actix_rt::test]
async fn test_wrong_method_is_not_allowed_or_missing() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::delete()
        .uri("/v1/payment_methods/test_pm_any")
        .insert_header(bearer())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_client_error());
}
