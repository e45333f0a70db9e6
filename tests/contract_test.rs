mod common;

use actix_web::web;
use serial_test::serial;

use common::{spawn_server, TEST_API_KEY};
use payment_method_contract::{
    contract::{suite, CheckStatus, ContractMode, PaymentMethodContract},
    services::{
        memory::{provider::MemoryProvider, store::PaymentMethodStore},
        payment::{
            error::PaymentError,
            interface::{CustomerOperations, PaymentMethodOperations},
        },
        stripe::{
            models::{
                customer::{CreateCustomer, Customer},
                payment_method::{
                    CreatePaymentMethod, ListPaymentMethods, PaymentMethod, PaymentMethodList,
                    UpdatePaymentMethod,
                },
            },
            provider::StripeProvider,
        },
    },
};

const CHECK_COUNT: usize = 14;

#[actix_rt::test]
async fn test_contract_passes_against_memory_provider() {
    let provider = MemoryProvider::new();

    let report = PaymentMethodContract::new(&provider, ContractMode::Mock)
        .run()
        .await;

    let failures: Vec<_> = report.failures().collect();
    assert!(failures.is_empty(), "unexpected failures: {:?}", failures);
    assert_eq!(report.passed(), CHECK_COUNT);
    assert_eq!(report.skipped(), 0);
}

#[actix_rt::test]
#[serial]
async fn test_contract_passes_against_mock_server() {
    let store = web::Data::new(PaymentMethodStore::new());
    let base_url = spawn_server(store.clone()).await;
    let provider = StripeProvider::with_base_url(&base_url, TEST_API_KEY);

    let report = PaymentMethodContract::new(&provider, ContractMode::Mock)
        .run()
        .await;

    let failures: Vec<_> = report.failures().collect();
    assert!(failures.is_empty(), "unexpected failures: {:?}", failures);
    assert_eq!(report.passed(), CHECK_COUNT);

    let stats = store.stats();
    assert!(stats.customers > 0);
    assert!(stats.attached > 0);
}

#[actix_rt::test]
#[serial]
async fn test_mock_server_rejects_wrong_secret_key() {
    let store = web::Data::new(PaymentMethodStore::new());
    let base_url = spawn_server(store).await;
    let provider = StripeProvider::with_base_url(&base_url, "pk_test_public");

    let err = provider
        .get_payment_method("test_pm_any")
        .await
        .unwrap_err();
    assert!(matches!(err, PaymentError::Authentication(_)));
    assert!(!err.is_invalid_request());
}

#[actix_rt::test]
async fn test_live_mode_skips_identifier_pattern() {
    let provider = MemoryProvider::new();

    let report = PaymentMethodContract::new(&provider, ContractMode::Live)
        .run()
        .await;

    assert!(report.is_success());
    assert_eq!(report.skipped(), 1);
    assert!(matches!(
        report.outcome(suite::CREATE_VALID_ID).map(|outcome| &outcome.status),
        Some(CheckStatus::Skipped { .. })
    ));
}

#[derive(Clone, Copy, PartialEq)]
enum Fault {
    DetachIgnored,
    LimitIgnored,
    AttachAnyCustomer,
}

/// Memory client with one deliberately broken operation.
struct FaultyProvider {
    inner: MemoryProvider,
    fault: Fault,
}

impl FaultyProvider {
    fn new(fault: Fault) -> Self {
        Self {
            inner: MemoryProvider::new(),
            fault,
        }
    }
}

impl CustomerOperations for FaultyProvider {
    async fn create_customer(&self, customer: CreateCustomer) -> Result<Customer, PaymentError> {
        self.inner.create_customer(customer).await
    }

    async fn get_customer(&self, customer_id: &str) -> Result<Customer, PaymentError> {
        self.inner.get_customer(customer_id).await
    }
}

impl PaymentMethodOperations for FaultyProvider {
    async fn create_payment_method(
        &self,
        params: CreatePaymentMethod,
    ) -> Result<PaymentMethod, PaymentError> {
        self.inner.create_payment_method(params).await
    }

    async fn get_payment_method(&self, payment_id: &str) -> Result<PaymentMethod, PaymentError> {
        self.inner.get_payment_method(payment_id).await
    }

    async fn list_payment_methods(
        &self,
        mut params: ListPaymentMethods,
    ) -> Result<PaymentMethodList, PaymentError> {
        if self.fault == Fault::LimitIgnored {
            params.limit = None;
        }
        self.inner.list_payment_methods(params).await
    }

    async fn attach_payment_method(
        &self,
        payment_id: &str,
        customer_id: &str,
    ) -> Result<PaymentMethod, PaymentError> {
        if self.fault == Fault::AttachAnyCustomer
            && self.inner.get_customer(customer_id).await.is_err()
        {
            let mut payment_method = self.inner.get_payment_method(payment_id).await?;
            payment_method.customer = Some(customer_id.to_string());
            return Ok(payment_method);
        }
        self.inner.attach_payment_method(payment_id, customer_id).await
    }

    async fn detach_payment_method(&self, payment_id: &str) -> Result<PaymentMethod, PaymentError> {
        if self.fault == Fault::DetachIgnored {
            return self.inner.get_payment_method(payment_id).await;
        }
        self.inner.detach_payment_method(payment_id).await
    }

    async fn update_payment_method(
        &self,
        payment_id: &str,
        params: UpdatePaymentMethod,
    ) -> Result<PaymentMethod, PaymentError> {
        self.inner.update_payment_method(payment_id, params).await
    }
}

async fn failed_checks(fault: Fault) -> Vec<&'static str> {
    let provider = FaultyProvider::new(fault);
    let report = PaymentMethodContract::new(&provider, ContractMode::Mock)
        .run()
        .await;
    report.failures().map(|outcome| outcome.name).collect()
}

#[actix_rt::test]
async fn test_contract_catches_ignored_detach() {
    assert_eq!(failed_checks(Fault::DetachIgnored).await, vec![suite::DETACH]);
}

#[actix_rt::test]
async fn test_contract_catches_ignored_limit() {
    assert_eq!(failed_checks(Fault::LimitIgnored).await, vec![suite::LIST_LIMIT]);
}

#[actix_rt::test]
async fn test_contract_catches_attach_to_missing_customer() {
    assert_eq!(
        failed_checks(Fault::AttachAnyCustomer).await,
        vec![suite::ATTACH_MISSING_CUSTOMER]
    );
}

#[actix_rt::test]
#[ignore = "talks to the real Stripe test-mode API; set STRIPE_LIVE_SECRET_KEY"]
async fn test_contract_passes_against_live_stripe() {
    let secret_key =
        std::env::var("STRIPE_LIVE_SECRET_KEY").expect("STRIPE_LIVE_SECRET_KEY must be set");
    let provider = StripeProvider::new(secret_key);

    let report = PaymentMethodContract::new(&provider, ContractMode::Live)
        .run()
        .await;

    let failures: Vec<_> = report.failures().collect();
    assert!(failures.is_empty(), "unexpected failures: {:?}", failures);
}
