use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const RESOURCE_MISSING: &str = "resource_missing";

#[derive(Error, Debug)]
pub enum PaymentError {
    #[error("Invalid request: {message}")]
    InvalidRequest {
        message: String,
        param: Option<String>,
        code: Option<String>,
    },

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Stripe error: {0}")]
    Stripe(String),
}

pub type PaymentResult<T> = Result<T, PaymentError>;

impl PaymentError {
    pub fn invalid(message: impl Into<String>, param: Option<&str>) -> Self {
        PaymentError::InvalidRequest {
            message: message.into(),
            param: param.map(str::to_string),
            code: None,
        }
    }

    /// Lookup of an id that does not exist. Rendered as a 404 by the mock server.
    pub fn missing(resource: &str, id: &str, param: &str) -> Self {
        PaymentError::InvalidRequest {
            message: format!("No such {}: '{}'", resource, id),
            param: Some(param.to_string()),
            code: Some(RESOURCE_MISSING.to_string()),
        }
    }

    pub fn is_invalid_request(&self) -> bool {
        matches!(self, PaymentError::InvalidRequest { .. })
    }

    pub fn is_resource_missing(&self) -> bool {
        matches!(
            self,
            PaymentError::InvalidRequest { code: Some(code), .. } if code == RESOURCE_MISSING
        )
    }
}

/// Wire form of an error, `{"error": {...}}`.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ErrorDetail {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub param: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl ErrorBody {
    /// Maps a decoded error response back onto `PaymentError`.
    pub fn into_error(self, status: u16) -> PaymentError {
        let detail = self.error;
        let message = detail.message.unwrap_or_else(|| "Unknown error".to_string());

        if status == 401 {
            return PaymentError::Authentication(message);
        }

        match detail.kind.as_str() {
            "invalid_request_error" => PaymentError::InvalidRequest {
                message,
                param: detail.param,
                code: detail.code,
            },
            _ => PaymentError::Api { status, message },
        }
    }
}

impl From<&PaymentError> for ErrorBody {
    fn from(err: &PaymentError) -> Self {
        let detail = match err {
            PaymentError::InvalidRequest {
                message,
                param,
                code,
            } => ErrorDetail {
                kind: "invalid_request_error".to_string(),
                message: Some(message.clone()),
                param: param.clone(),
                code: code.clone(),
            },
            PaymentError::Authentication(message) => ErrorDetail {
                kind: "invalid_request_error".to_string(),
                message: Some(message.clone()),
                param: None,
                code: None,
            },
            other => ErrorDetail {
                kind: "api_error".to_string(),
                message: Some(other.to_string()),
                param: None,
                code: None,
            },
        };

        ErrorBody { error: detail }
    }
}

impl From<stripe::StripeError> for PaymentError {
    fn from(err: stripe::StripeError) -> Self {
        match err {
            stripe::StripeError::Stripe(request) => {
                let message = request
                    .message
                    .clone()
                    .unwrap_or_else(|| "Unknown error".to_string());
                if request.http_status == 401 {
                    PaymentError::Authentication(message)
                } else if matches!(request.error_type, stripe::ErrorType::InvalidRequest) {
                    PaymentError::InvalidRequest {
                        message,
                        param: None,
                        code: None,
                    }
                } else {
                    PaymentError::Api {
                        status: request.http_status,
                        message,
                    }
                }
            }
            other => PaymentError::Stripe(other.to_string()),
        }
    }
}
