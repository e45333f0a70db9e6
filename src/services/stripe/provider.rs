use serde::{de::DeserializeOwned, Serialize};

use crate::{
    config::ClientConfig,
    services::payment::{
        error::{ErrorBody, PaymentError},
        interface::PaymentMethodOperations,
    },
};

use super::{
    form,
    models::payment_method::{
        AttachPaymentMethodRequest, CreatePaymentMethod, ListPaymentMethods, PaymentMethod,
        PaymentMethodList, UpdatePaymentMethod,
    },
};

pub const DEFAULT_API_BASE: &str = "https://api.stripe.com";

/// Talks to a Stripe-compatible REST endpoint: real Stripe, or the mock server in this crate.
pub struct StripeProvider {
    pub client: stripe::Client,
    http: reqwest::Client,
    api_base: String,
    secret_key: String,
}

impl StripeProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(DEFAULT_API_BASE, api_key)
    }

    pub fn with_base_url(api_base: &str, api_key: impl Into<String>) -> Self {
        let secret_key = api_key.into();
        let api_base = api_base.trim_end_matches('/').to_string();
        let client = stripe::Client::from_url(api_base.as_str(), secret_key.clone());

        Self {
            client,
            http: reqwest::Client::new(),
            api_base,
            secret_key,
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::with_base_url(&config.api_base, config.secret_key.clone())
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    fn url(&self, path: &str) -> String {
        format!("{}/v1/{}", self.api_base, path)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, PaymentError> {
        let response = request.bearer_auth(&self.secret_key).send().await?;

        let status = response.status();
        let body = response.text().await?;

        if status.is_success() {
            return Ok(serde_json::from_str(&body)?);
        }

        log::warn!("Stripe responded {}: {}", status, body);
        match serde_json::from_str::<ErrorBody>(&body) {
            Ok(error) => Err(error.into_error(status.as_u16())),
            Err(_) => Err(PaymentError::Api {
                status: status.as_u16(),
                message: body,
            }),
        }
    }

    async fn post_form<T: DeserializeOwned, P: Serialize>(
        &self,
        path: &str,
        params: &P,
    ) -> Result<T, PaymentError> {
        let pairs = form::encode(params)?;
        self.send(self.http.post(self.url(path)).form(&pairs)).await
    }

    async fn get<T: DeserializeOwned, Q: Serialize>(
        &self,
        path: &str,
        query: &Q,
    ) -> Result<T, PaymentError> {
        self.send(self.http.get(self.url(path)).query(query)).await
    }
}

impl PaymentMethodOperations for StripeProvider {
    async fn create_payment_method(
        &self,
        params: CreatePaymentMethod,
    ) -> Result<PaymentMethod, PaymentError> {
        log::debug!("Creating {} payment method", params.kind);
        self.post_form("payment_methods", &params).await
    }

    async fn get_payment_method(&self, payment_id: &str) -> Result<PaymentMethod, PaymentError> {
        let path = format!("payment_methods/{}", payment_id);
        self.send(self.http.get(self.url(&path))).await
    }

    async fn list_payment_methods(
        &self,
        params: ListPaymentMethods,
    ) -> Result<PaymentMethodList, PaymentError> {
        self.get("payment_methods", &params).await
    }

    async fn attach_payment_method(
        &self,
        payment_id: &str,
        customer_id: &str,
    ) -> Result<PaymentMethod, PaymentError> {
        let path = format!("payment_methods/{}/attach", payment_id);
        let params = AttachPaymentMethodRequest {
            customer: customer_id.to_string(),
        };

        log::debug!("Attaching payment method {} to {}", payment_id, customer_id);
        self.post_form(&path, &params).await
    }

    async fn detach_payment_method(&self, payment_id: &str) -> Result<PaymentMethod, PaymentError> {
        let path = format!("payment_methods/{}/detach", payment_id);

        log::debug!("Detaching payment method {}", payment_id);
        self.post_form(&path, &()).await
    }

    async fn update_payment_method(
        &self,
        payment_id: &str,
        params: UpdatePaymentMethod,
    ) -> Result<PaymentMethod, PaymentError> {
        let path = format!("payment_methods/{}", payment_id);
        self.post_form(&path, &params).await
    }
}
