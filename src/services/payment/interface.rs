use crate::services::stripe::models::{
    customer::{CreateCustomer, Customer},
    payment_method::{
        CreatePaymentMethod, ListPaymentMethods, PaymentMethod, PaymentMethodList,
        UpdatePaymentMethod,
    },
};

use super::error::PaymentError;

#[allow(async_fn_in_trait)]
pub trait CustomerOperations {
    async fn create_customer(&self, customer: CreateCustomer) -> Result<Customer, PaymentError>;
    async fn get_customer(&self, customer_id: &str) -> Result<Customer, PaymentError>;
}

/// Capability set of a PaymentMethod resource client. Every rejection the remote
/// service makes on a well-formed call surfaces as `PaymentError::InvalidRequest`.
#[allow(async_fn_in_trait)]
pub trait PaymentMethodOperations {
    async fn create_payment_method(
        &self,
        params: CreatePaymentMethod,
    ) -> Result<PaymentMethod, PaymentError>;

    async fn get_payment_method(&self, payment_id: &str) -> Result<PaymentMethod, PaymentError>;

    async fn list_payment_methods(
        &self,
        params: ListPaymentMethods,
    ) -> Result<PaymentMethodList, PaymentError>;

    async fn attach_payment_method(
        &self,
        payment_id: &str,
        customer_id: &str,
    ) -> Result<PaymentMethod, PaymentError>;

    async fn detach_payment_method(&self, payment_id: &str)
        -> Result<PaymentMethod, PaymentError>;

    async fn update_payment_method(
        &self,
        payment_id: &str,
        params: UpdatePaymentMethod,
    ) -> Result<PaymentMethod, PaymentError>;
}
