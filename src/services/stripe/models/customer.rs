use serde::{Deserialize, Serialize};

use super::payment_method::Metadata;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Customer {
    pub id: String,
    #[serde(default = "customer_object")]
    pub object: String,
    #[serde(default)]
    pub created: i64,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub metadata: Metadata,
    #[serde(default)]
    pub livemode: bool,
}

fn customer_object() -> String {
    "customer".to_string()
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct CreateCustomer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

impl From<stripe::Customer> for Customer {
    fn from(customer: stripe::Customer) -> Self {
        Self {
            id: customer.id.to_string(),
            object: customer_object(),
            created: customer.created.unwrap_or_default(),
            email: customer.email,
            name: customer.name,
            phone: customer.phone,
            metadata: customer.metadata.unwrap_or_default(),
            livemode: customer.livemode.unwrap_or_default(),
        }
    }
}

impl<'a> From<&'a CreateCustomer> for stripe::CreateCustomer<'a> {
    fn from(data: &'a CreateCustomer) -> Self {
        let mut customer = stripe::CreateCustomer::new();
        customer.email = data.email.as_deref();
        customer.name = data.name.as_deref();
        customer.phone = data.phone.as_deref();
        customer.metadata = data.metadata.clone();

        customer
    }
}
