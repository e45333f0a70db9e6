use actix_web::{web, HttpResponse};

use crate::services::{
    memory::store::PaymentMethodStore,
    payment::error::PaymentError,
    stripe::models::payment_method::{
        AttachPaymentMethodRequest, CreatePaymentMethod, ListPaymentMethods, UpdatePaymentMethod,
    },
};

use super::error::parse_form;

pub async fn create_payment_method(
    store: web::Data<PaymentMethodStore>,
    body: web::Bytes,
) -> Result<HttpResponse, PaymentError> {
    let params: CreatePaymentMethod = parse_form(&body)?;
    let payment_method = store.create_payment_method(params)?;
    Ok(HttpResponse::Ok().json(payment_method))
}

pub async fn get_payment_method(
    store: web::Data<PaymentMethodStore>,
    path: web::Path<String>,
) -> Result<HttpResponse, PaymentError> {
    let payment_method = store.get_payment_method(&path.into_inner())?;
    Ok(HttpResponse::Ok().json(payment_method))
}

pub async fn list_payment_methods(
    store: web::Data<PaymentMethodStore>,
    query: web::Query<ListPaymentMethods>,
) -> Result<HttpResponse, PaymentError> {
    let list = store.list_payment_methods(query.into_inner())?;
    Ok(HttpResponse::Ok().json(list))
}

pub async fn list_customer_payment_methods(
    store: web::Data<PaymentMethodStore>,
    path: web::Path<String>,
    query: web::Query<ListPaymentMethods>,
) -> Result<HttpResponse, PaymentError> {
    let customer_id = path.into_inner();
    let mut params = query.into_inner();
    params.customer = Some(customer_id.clone());

    let mut list = store.list_payment_methods(params)?;
    list.url = format!("/v1/customers/{}/payment_methods", customer_id);
    Ok(HttpResponse::Ok().json(list))
}

pub async fn update_payment_method(
    store: web::Data<PaymentMethodStore>,
    path: web::Path<String>,
    body: web::Bytes,
) -> Result<HttpResponse, PaymentError> {
    let params: UpdatePaymentMethod = parse_form(&body)?;
    let payment_method = store.update_payment_method(&path.into_inner(), params)?;
    Ok(HttpResponse::Ok().json(payment_method))
}

pub async fn attach_payment_method(
    store: web::Data<PaymentMethodStore>,
    path: web::Path<String>,
    body: web::Bytes,
) -> Result<HttpResponse, PaymentError> {
    let input: AttachPaymentMethodRequest = parse_form(&body)?;
    let payment_method = store.attach_payment_method(&path.into_inner(), &input.customer)?;
    Ok(HttpResponse::Ok().json(payment_method))
}

pub async fn detach_payment_method(
    store: web::Data<PaymentMethodStore>,
    path: web::Path<String>,
) -> Result<HttpResponse, PaymentError> {
    let payment_method = store.detach_payment_method(&path.into_inner())?;
    Ok(HttpResponse::Ok().json(payment_method))
}
