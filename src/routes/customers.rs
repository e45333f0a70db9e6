use actix_web::{web, HttpResponse};

use crate::services::{
    memory::store::PaymentMethodStore, payment::error::PaymentError,
    stripe::models::customer::CreateCustomer,
};

use super::error::parse_form;

pub async fn create_customer(
    store: web::Data<PaymentMethodStore>,
    body: web::Bytes,
) -> Result<HttpResponse, PaymentError> {
    let params: CreateCustomer = parse_form(&body)?;
    Ok(HttpResponse::Ok().json(store.create_customer(params)))
}

pub async fn get_customer(
    store: web::Data<PaymentMethodStore>,
    path: web::Path<String>,
) -> Result<HttpResponse, PaymentError> {
    let customer = store.get_customer(&path.into_inner())?;
    Ok(HttpResponse::Ok().json(customer))
}
