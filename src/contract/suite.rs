use std::fmt::Debug;

use regex::Regex;
use thiserror::Error;

use crate::services::{
    payment::{
        error::PaymentError,
        interface::{CustomerOperations, PaymentMethodOperations},
    },
    stripe::models::{
        customer::{CreateCustomer, Customer},
        payment_method::{
            CardUpdate, CreatePaymentMethod, ListPaymentMethods, PaymentMethod, PaymentMethodType,
            UpdatePaymentMethod,
        },
    },
};

use super::{fixtures, report::ContractReport, ContractMode};

#[derive(Error, Debug)]
pub enum ContractViolation {
    #[error("{field}: expected {expected}, got {actual}")]
    Mismatch {
        field: &'static str,
        expected: String,
        actual: String,
    },

    #[error("unexpected error: {0}")]
    Unexpected(#[from] PaymentError),

    #[error("expected an invalid request error, got {0}")]
    ExpectedInvalidRequest(String),

    #[error("bad identifier pattern: {0}")]
    Pattern(#[from] regex::Error),
}

type CheckResult = Result<(), ContractViolation>;

fn expect_eq<T: PartialEq + Debug>(field: &'static str, expected: T, actual: T) -> CheckResult {
    if expected == actual {
        Ok(())
    } else {
        Err(ContractViolation::Mismatch {
            field,
            expected: format!("{:?}", expected),
            actual: format!("{:?}", actual),
        })
    }
}

fn expect_invalid_request<T: Debug>(result: Result<T, PaymentError>) -> CheckResult {
    match result {
        Err(err) if err.is_invalid_request() => Ok(()),
        Err(err) => Err(ContractViolation::ExpectedInvalidRequest(err.to_string())),
        Ok(value) => Err(ContractViolation::ExpectedInvalidRequest(format!(
            "success: {:?}",
            value
        ))),
    }
}

pub const CREATE_VALID_ID: &str = "create: generated id matches the identifier pattern";
pub const CREATE_BILLING: &str = "create: echoes billing details";
pub const CREATE_METADATA: &str = "create: echoes metadata";
pub const CREATE_CARD: &str = "create: echoes card expiry";
pub const CREATE_INVALID_TYPE: &str = "create: rejects an unsupported type";
pub const RETRIEVE: &str = "retrieve: returns the payment method with its customer";
pub const LIST_ALL: &str = "list: returns every attached payment method";
pub const LIST_LIMIT: &str = "list: honors the limit";
pub const LIST_ISOLATION: &str = "list: does not leak other customers' payment methods";
pub const ATTACH: &str = "attach: sets the customer";
pub const ATTACH_MISSING_CUSTOMER: &str = "attach: rejects a nonexistent customer";
pub const DETACH: &str = "detach: clears the customer";
pub const UPDATE_CARD: &str = "update: changes only the card expiry month";
pub const UPDATE_WITHOUT_CUSTOMER: &str = "update: rejects a payment method without a customer";

/// Behavioral contract of a PaymentMethod client. Every check creates its own
/// customers and payment methods and runs sequentially.
pub struct PaymentMethodContract<'a, C> {
    client: &'a C,
    mode: ContractMode,
}

impl<'a, C> PaymentMethodContract<'a, C>
where
    C: CustomerOperations + PaymentMethodOperations,
{
    pub fn new(client: &'a C, mode: ContractMode) -> Self {
        Self { client, mode }
    }

    pub async fn run(&self) -> ContractReport {
        log::info!("Running payment method contract ({:?})", self.mode);
        let mut report = ContractReport::new(self.mode);

        match self.mode {
            ContractMode::Mock => report.record(CREATE_VALID_ID, self.creates_with_valid_id().await),
            ContractMode::Live => report.skip(
                CREATE_VALID_ID,
                "live identifiers are assigned by the remote service",
            ),
        }
        report.record(CREATE_BILLING, self.creates_with_billing_details().await);
        report.record(CREATE_METADATA, self.creates_with_metadata().await);
        report.record(CREATE_CARD, self.creates_with_card_expiry().await);
        report.record(CREATE_INVALID_TYPE, self.rejects_invalid_type().await);
        report.record(RETRIEVE, self.retrieves_payment_method().await);
        report.record(LIST_ALL, self.lists_all_payment_methods().await);
        report.record(LIST_LIMIT, self.lists_with_limit().await);
        report.record(LIST_ISOLATION, self.lists_nothing_for_other_customer().await);
        report.record(ATTACH, self.attaches_to_customer().await);
        report.record(
            ATTACH_MISSING_CUSTOMER,
            self.rejects_attach_to_missing_customer().await,
        );
        report.record(DETACH, self.detaches_from_customer().await);
        report.record(UPDATE_CARD, self.updates_card().await);
        report.record(
            UPDATE_WITHOUT_CUSTOMER,
            self.rejects_update_without_customer().await,
        );

        log::info!(
            "{} passed, {} failed, {} skipped",
            report.passed(),
            report.failures().count(),
            report.skipped()
        );
        report
    }

    async fn customer(&self) -> Result<Customer, PaymentError> {
        self.client.create_customer(CreateCustomer::default()).await
    }

    async fn create(&self, params: CreatePaymentMethod) -> Result<PaymentMethod, PaymentError> {
        self.client.create_payment_method(params).await
    }

    async fn customer_of(&self, payment_id: &str) -> Result<Option<String>, PaymentError> {
        Ok(self.client.get_payment_method(payment_id).await?.customer)
    }

    async fn attached_payment_method(&self) -> Result<(Customer, PaymentMethod), PaymentError> {
        let customer = self.customer().await?;
        let payment_method = self.create(fixtures::card_payment_method()).await?;
        let payment_method = self
            .client
            .attach_payment_method(&payment_method.id, &customer.id)
            .await?;
        Ok((customer, payment_method))
    }

    async fn customer_with_payment_methods(&self, count: usize) -> Result<Customer, PaymentError> {
        let customer = self.customer().await?;
        for _ in 0..count {
            let payment_method = self.create(fixtures::card_payment_method()).await?;
            self.client
                .attach_payment_method(&payment_method.id, &customer.id)
                .await?;
        }
        Ok(customer)
    }

    pub async fn creates_with_valid_id(&self) -> CheckResult {
        let pattern = Regex::new(fixtures::ID_PATTERN)?;
        let payment_method = self.create(fixtures::full_payment_method()).await?;

        if pattern.is_match(&payment_method.id) {
            Ok(())
        } else {
            Err(ContractViolation::Mismatch {
                field: "id",
                expected: fixtures::ID_PATTERN.to_string(),
                actual: payment_method.id,
            })
        }
    }

    pub async fn creates_with_billing_details(&self) -> CheckResult {
        let expected = fixtures::billing_details();
        let actual = self
            .create(fixtures::full_payment_method())
            .await?
            .billing_details;

        let expected_address = expected.address.unwrap_or_default();
        let actual_address = actual.address.unwrap_or_default();
        expect_eq("billing_details.address.city", expected_address.city, actual_address.city)?;
        expect_eq(
            "billing_details.address.country",
            expected_address.country,
            actual_address.country,
        )?;
        expect_eq("billing_details.address.line1", expected_address.line1, actual_address.line1)?;
        expect_eq("billing_details.address.line2", expected_address.line2, actual_address.line2)?;
        expect_eq(
            "billing_details.address.postal_code",
            expected_address.postal_code,
            actual_address.postal_code,
        )?;
        expect_eq("billing_details.address.state", expected_address.state, actual_address.state)?;
        expect_eq("billing_details.email", expected.email, actual.email)?;
        expect_eq("billing_details.name", expected.name, actual.name)?;
        expect_eq("billing_details.phone", expected.phone, actual.phone)
    }

    pub async fn creates_with_metadata(&self) -> CheckResult {
        let payment_method = self.create(fixtures::full_payment_method()).await?;

        expect_eq(
            "metadata.order_id",
            Some(fixtures::ORDER_ID),
            payment_method.metadata.get("order_id").map(String::as_str),
        )
    }

    pub async fn creates_with_card_expiry(&self) -> CheckResult {
        let expected = fixtures::card_details();
        let payment_method = self.create(fixtures::full_payment_method()).await?;

        let card = payment_method.card.ok_or_else(|| ContractViolation::Mismatch {
            field: "card",
            expected: "a card".to_string(),
            actual: "none".to_string(),
        })?;
        expect_eq("card.exp_month", expected.exp_month, card.exp_month)?;
        expect_eq("card.exp_year", expected.exp_year, card.exp_year)
    }

    pub async fn rejects_invalid_type(&self) -> CheckResult {
        let mut params = fixtures::full_payment_method();
        params.kind = fixtures::INVALID_TYPE.to_string();

        expect_invalid_request(self.create(params).await)
    }

    pub async fn retrieves_payment_method(&self) -> CheckResult {
        let (customer, original) = self.attached_payment_method().await?;

        let payment_method = self.client.get_payment_method(&original.id).await?;

        expect_eq("id", &original.id, &payment_method.id)?;
        expect_eq("type", &original.kind, &payment_method.kind)?;
        expect_eq("customer", Some(customer.id), payment_method.customer)
    }

    pub async fn lists_all_payment_methods(&self) -> CheckResult {
        let customer = self.customer_with_payment_methods(3).await?;

        let list = self
            .client
            .list_payment_methods(ListPaymentMethods::for_customer(
                &customer.id,
                PaymentMethodType::Card,
            ))
            .await?;
        expect_eq("list.count", 3, list.data.len())
    }

    pub async fn lists_with_limit(&self) -> CheckResult {
        let customer = self.customer_with_payment_methods(3).await?;

        let list = self
            .client
            .list_payment_methods(
                ListPaymentMethods::for_customer(&customer.id, PaymentMethodType::Card)
                    .with_limit(2),
            )
            .await?;
        expect_eq("list.count", 2, list.data.len())
    }

    pub async fn lists_nothing_for_other_customer(&self) -> CheckResult {
        self.customer_with_payment_methods(3).await?;
        let other = self.customer().await?;

        let list = self
            .client
            .list_payment_methods(ListPaymentMethods::for_customer(
                &other.id,
                PaymentMethodType::Card,
            ))
            .await?;
        expect_eq("list.count", 0, list.data.len())
    }

    pub async fn attaches_to_customer(&self) -> CheckResult {
        let customer = self.customer().await?;
        let payment_method = self.create(fixtures::card_payment_method()).await?;

        expect_eq("customer (before)", None, self.customer_of(&payment_method.id).await?)?;
        self.client
            .attach_payment_method(&payment_method.id, &customer.id)
            .await?;
        expect_eq(
            "customer (after)",
            Some(customer.id),
            self.customer_of(&payment_method.id).await?,
        )
    }

    pub async fn rejects_attach_to_missing_customer(&self) -> CheckResult {
        let payment_method = self.create(fixtures::card_payment_method()).await?;

        expect_invalid_request(
            self.client
                .attach_payment_method(&payment_method.id, fixtures::MISSING_CUSTOMER)
                .await,
        )?;
        expect_eq("customer", None, self.customer_of(&payment_method.id).await?)
    }

    pub async fn detaches_from_customer(&self) -> CheckResult {
        let (customer, payment_method) = self.attached_payment_method().await?;

        expect_eq(
            "customer (before)",
            Some(customer.id),
            self.customer_of(&payment_method.id).await?,
        )?;
        self.client.detach_payment_method(&payment_method.id).await?;
        expect_eq("customer (after)", None, self.customer_of(&payment_method.id).await?)
    }

    pub async fn updates_card(&self) -> CheckResult {
        let (customer, before) = self.attached_payment_method().await?;
        let original_month = before.card.as_ref().map(|card| card.exp_month);
        expect_eq(
            "card.exp_month (before)",
            Some(fixtures::card_details().exp_month),
            original_month,
        )?;

        self.client
            .update_payment_method(
                &before.id,
                UpdatePaymentMethod {
                    card: Some(CardUpdate {
                        exp_month: Some(fixtures::NEW_EXP_MONTH),
                        exp_year: None,
                    }),
                    ..Default::default()
                },
            )
            .await?;
        let after = self.client.get_payment_method(&before.id).await?;

        expect_eq(
            "card.exp_month (after)",
            Some(fixtures::NEW_EXP_MONTH),
            after.card.as_ref().map(|card| card.exp_month),
        )?;
        expect_eq(
            "card.exp_year",
            before.card.as_ref().map(|card| card.exp_year),
            after.card.as_ref().map(|card| card.exp_year),
        )?;
        expect_eq(
            "card.last4",
            before.card.as_ref().map(|card| &card.last4),
            after.card.as_ref().map(|card| &card.last4),
        )?;
        expect_eq("billing_details", &before.billing_details, &after.billing_details)?;
        expect_eq("metadata", &before.metadata, &after.metadata)?;
        expect_eq("customer", Some(customer.id), after.customer)
    }

    pub async fn rejects_update_without_customer(&self) -> CheckResult {
        let payment_method = self.create(fixtures::card_payment_method()).await?;

        expect_invalid_request(
            self.client
                .update_payment_method(
                    &payment_method.id,
                    UpdatePaymentMethod {
                        card: Some(CardUpdate {
                            exp_month: Some(fixtures::NEW_EXP_MONTH),
                            exp_year: None,
                        }),
                        ..Default::default()
                    },
                )
                .await,
        )
    }
}
