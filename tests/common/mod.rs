#![allow(dead_code)]

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use tokio::time::{sleep, Duration};

use serde::Serialize;

use payment_method_contract::{
    routes,
    services::{memory::store::PaymentMethodStore, stripe::form},
};

pub const TEST_API_KEY: &str = "sk_test_mock";
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

pub struct TestApp {
    pub store: web::Data<PaymentMethodStore>,
    pub api_key: Option<String>,
}

impl TestApp {
    pub fn new() -> Self {
        Self {
            store: web::Data::new(PaymentMethodStore::new()),
            api_key: None,
        }
    }

    pub fn with_api_key(api_key: &str) -> Self {
        Self {
            api_key: Some(api_key.to_string()),
            ..Self::new()
        }
    }

    pub fn create_app(
        &self,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        let store = self.store.clone();
        let api_key = self.api_key.clone();
        App::new()
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .configure(move |cfg| routes::configure(cfg, store, api_key))
    }
}

pub fn bearer() -> (actix_web::http::header::HeaderName, String) {
    (
        actix_web::http::header::AUTHORIZATION,
        format!("Bearer {}", TEST_API_KEY),
    )
}

pub fn encode_form<T: Serialize>(params: &T) -> String {
    let pairs = form::encode(params).expect("Failed to encode form");
    url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish()
}

/// Starts a real server on an ephemeral port and returns its base URL.
pub async fn spawn_server(store: web::Data<PaymentMethodStore>) -> String {
    let server = HttpServer::new(move || {
        let store = store.clone();
        App::new().configure(move |cfg| routes::configure(cfg, store, None))
    })
    .workers(1)
    .bind(("127.0.0.1", 0))
    .expect("Failed to bind test server");

    let port = server.addrs()[0].port();
    actix_rt::spawn(server.run());
    wait_for_server_ready(port).await;

    format!("http://127.0.0.1:{}", port)
}

pub async fn wait_for_server_ready(port: u16) {
    for _ in 0..30 {
        if let Ok(_) = reqwest::get(&format!("http://127.0.0.1:{}/health", port)).await {
            return;
        }
        sleep(Duration::from_millis(100)).await;
    }
    panic!("Server failed to start within timeout");
}
