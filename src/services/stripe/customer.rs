use std::str::FromStr;

use stripe::CustomerId;

use crate::services::payment::{error::PaymentError, interface::CustomerOperations};

use super::{
    models::customer::{CreateCustomer, Customer},
    provider::StripeProvider,
};

impl CustomerOperations for StripeProvider {
    async fn create_customer(&self, customer: CreateCustomer) -> Result<Customer, PaymentError> {
        let create_customer: stripe::CreateCustomer<'_> = (&customer).into();

        let stripe_customer = stripe::Customer::create(&self.client, create_customer).await?;
        log::debug!("Created customer {}", stripe_customer.id);
        Ok(Customer::from(stripe_customer))
    }

    async fn get_customer(&self, customer_id: &str) -> Result<Customer, PaymentError> {
        let cust_id = CustomerId::from_str(customer_id)
            .map_err(|_| PaymentError::missing("customer", customer_id, "id"))?;
        let expand = &[];
        let customer = stripe::Customer::retrieve(&self.client, &cust_id, expand).await?;
        Ok(customer.into())
    }
}
