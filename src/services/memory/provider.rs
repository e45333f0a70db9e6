use std::sync::Arc;

use crate::services::{
    payment::{
        error::PaymentError,
        interface::{CustomerOperations, PaymentMethodOperations},
    },
    stripe::models::{
        customer::{CreateCustomer, Customer},
        payment_method::{
            CreatePaymentMethod, ListPaymentMethods, PaymentMethod, PaymentMethodList,
            UpdatePaymentMethod,
        },
    },
};

use super::store::PaymentMethodStore;

/// Client backed directly by an in-process store. Cloning shares the store.
#[derive(Clone, Default)]
pub struct MemoryProvider {
    store: Arc<PaymentMethodStore>,
}

impl MemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_store(store: Arc<PaymentMethodStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<PaymentMethodStore> {
        &self.store
    }
}

impl CustomerOperations for MemoryProvider {
    async fn create_customer(&self, customer: CreateCustomer) -> Result<Customer, PaymentError> {
        Ok(self.store.create_customer(customer))
    }

    async fn get_customer(&self, customer_id: &str) -> Result<Customer, PaymentError> {
        self.store.get_customer(customer_id)
    }
}

impl PaymentMethodOperations for MemoryProvider {
    async fn create_payment_method(
        &self,
        params: CreatePaymentMethod,
    ) -> Result<PaymentMethod, PaymentError> {
        self.store.create_payment_method(params)
    }

    async fn get_payment_method(&self, payment_id: &str) -> Result<PaymentMethod, PaymentError> {
        self.store.get_payment_method(payment_id)
    }

    async fn list_payment_methods(
        &self,
        params: ListPaymentMethods,
    ) -> Result<PaymentMethodList, PaymentError> {
        self.store.list_payment_methods(params)
    }

    async fn attach_payment_method(
        &self,
        payment_id: &str,
        customer_id: &str,
    ) -> Result<PaymentMethod, PaymentError> {
        self.store.attach_payment_method(payment_id, customer_id)
    }

    async fn detach_payment_method(&self, payment_id: &str) -> Result<PaymentMethod, PaymentError> {
        self.store.detach_payment_method(payment_id)
    }

    async fn update_payment_method(
        &self,
        payment_id: &str,
        params: UpdatePaymentMethod,
    ) -> Result<PaymentMethod, PaymentError> {
        self.store.update_payment_method(payment_id, params)
    }
}
