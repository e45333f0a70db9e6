pub mod customers;
pub mod error;
pub mod health;
pub mod payment_methods;

use actix_web::web;

use crate::{
    middleware::api_key::ApiKeyMiddleware,
    services::{memory::store::PaymentMethodStore, payment::error::PaymentError},
};

/// Registers the Stripe-compatible surface over `store`. `/v1` requires an API key.
pub fn configure(
    cfg: &mut web::ServiceConfig,
    store: web::Data<PaymentMethodStore>,
    api_key: Option<String>,
) {
    cfg.app_data(store)
        .app_data(web::QueryConfig::default().error_handler(|err, _| {
            PaymentError::invalid(format!("Invalid query parameters: {}", err), None).into()
        }))
        .route("/health", web::get().to(health::health_check))
        .service(
            web::scope("/v1")
                .wrap(ApiKeyMiddleware::new(api_key))
                .route("/customers", web::post().to(customers::create_customer))
                .route("/customers/{id}", web::get().to(customers::get_customer))
                .route(
                    "/customers/{id}/payment_methods",
                    web::get().to(payment_methods::list_customer_payment_methods),
                )
                .route(
                    "/payment_methods",
                    web::post().to(payment_methods::create_payment_method),
                )
                .route(
                    "/payment_methods",
                    web::get().to(payment_methods::list_payment_methods),
                )
                .route(
                    "/payment_methods/{id}",
                    web::get().to(payment_methods::get_payment_method),
                )
                .route(
                    "/payment_methods/{id}",
                    web::post().to(payment_methods::update_payment_method),
                )
                .route(
                    "/payment_methods/{id}/attach",
                    web::post().to(payment_methods::attach_payment_method),
                )
                .route(
                    "/payment_methods/{id}/detach",
                    web::post().to(payment_methods::detach_payment_method),
                )
                .default_service(web::to(error::unrecognized_url)),
        );
}
