use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::de::DeserializeOwned;

use crate::services::{
    payment::error::{ErrorBody, PaymentError},
    stripe::form,
};

impl ResponseError for PaymentError {
    fn status_code(&self) -> StatusCode {
        match self {
            err if err.is_resource_missing() => StatusCode::NOT_FOUND,
            PaymentError::InvalidRequest { .. } => StatusCode::BAD_REQUEST,
            PaymentError::Authentication(_) => StatusCode::UNAUTHORIZED,
            PaymentError::Api { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorBody::from(self))
    }
}

/// Decodes a form body into request params, rejecting malformed values as invalid requests.
pub fn parse_form<T: DeserializeOwned>(body: &[u8]) -> Result<T, PaymentError> {
    serde_json::from_value(form::decode(body))
        .map_err(|err| PaymentError::invalid(format!("Invalid request parameters: {}", err), None))
}

pub async fn unrecognized_url() -> Result<HttpResponse, PaymentError> {
    Err(PaymentError::InvalidRequest {
        message: "Unrecognized request URL.".to_string(),
        param: None,
        code: Some(crate::services::payment::error::RESOURCE_MISSING.to_string()),
    })
}
