use std::rc::Rc;

use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header,
    Error,
};
use futures::future::{ready, LocalBoxFuture, Ready};

use crate::services::payment::error::PaymentError;

const SECRET_KEY_PREFIX: &str = "sk_";

/// Requires `Authorization: Bearer <secret key>`. Without a configured key any
/// `sk_` key is accepted, the way a test-mode account accepts its own keys.
pub struct ApiKeyMiddleware {
    expected: Option<Rc<str>>,
}

impl ApiKeyMiddleware {
    pub fn new(expected: Option<String>) -> Self {
        Self {
            expected: expected.map(Rc::from),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for ApiKeyMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = ApiKeyMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(ApiKeyMiddlewareService {
            service,
            expected: self.expected.clone(),
        }))
    }
}

pub struct ApiKeyMiddlewareService<S> {
    service: S,
    expected: Option<Rc<str>>,
}

impl<S> ApiKeyMiddlewareService<S> {
    fn accepts(&self, key: &str) -> bool {
        match &self.expected {
            Some(expected) => key == expected.as_ref(),
            None => key.starts_with(SECRET_KEY_PREFIX) && key.len() > SECRET_KEY_PREFIX.len(),
        }
    }
}

fn redact(key: &str) -> String {
    let visible: String = key.chars().rev().take(4).collect::<Vec<_>>().into_iter().rev().collect();
    let head: String = key.chars().take(3).collect();
    format!("{}****{}", head, visible)
}

impl<S, B> Service<ServiceRequest> for ApiKeyMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let key = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(|value| value.trim().to_string());

        let rejection = match key {
            Some(key) if self.accepts(&key) => None,
            Some(key) => {
                log::warn!("Rejected API key {} for {}", redact(&key), req.path());
                Some(PaymentError::Authentication(format!(
                    "Invalid API Key provided: {}",
                    redact(&key)
                )))
            }
            None => Some(PaymentError::Authentication(
                "You did not provide an API key. Provide it as 'Authorization: Bearer YOUR_SECRET_KEY'."
                    .to_string(),
            )),
        };

        if let Some(err) = rejection {
            let response = req.error_response(err).map_into_right_body();
            return Box::pin(ready(Ok(response)));
        }

        let fut = self.service.call(req);
        Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redact_keeps_prefix_and_tail() {
        assert_eq!(redact("sk_test_abcdef1234"), "sk_****1234");
        assert_eq!(redact("ab"), "ab****ab");
    }
}
