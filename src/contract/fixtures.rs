//! Factories for the request data every check builds from. Each call returns a fresh value.

use chrono::{Datelike, Utc};

use crate::services::stripe::models::payment_method::{
    Address, BillingDetails, CardDetails, CreatePaymentMethod, Metadata, PaymentMethodType,
};

pub const ID_PATTERN: &str = "^test_pm";
pub const INVALID_TYPE: &str = "bank_account";
pub const MISSING_CUSTOMER: &str = "cus_invalid";
pub const NEW_EXP_MONTH: u8 = 12;
pub const ORDER_ID: &str = "123456789";

pub fn billing_details() -> BillingDetails {
    BillingDetails {
        address: Some(Address {
            city: Some("North New Portland".to_string()),
            country: Some("US".to_string()),
            line1: Some("2631 Bloomfield Way".to_string()),
            line2: Some("Apartment 5B".to_string()),
            postal_code: Some("05555".to_string()),
            state: Some("ME".to_string()),
        }),
        email: Some("john@example.com".to_string()),
        name: Some("John Doe".to_string()),
        phone: Some("555-555-5555".to_string()),
    }
}

/// Expires five years from now so it is always accepted.
pub fn card_details() -> CardDetails {
    CardDetails {
        number: "4242424242424242".to_string(),
        exp_month: 9,
        exp_year: u16::try_from(Utc::now().year() + 5).unwrap_or(u16::MAX),
        cvc: Some("999".to_string()),
    }
}

pub fn order_metadata() -> Metadata {
    Metadata::from([("order_id".to_string(), ORDER_ID.to_string())])
}

/// Card payment method with billing details and metadata.
pub fn full_payment_method() -> CreatePaymentMethod {
    CreatePaymentMethod {
        kind: PaymentMethodType::Card.to_string(),
        billing_details: Some(billing_details()),
        card: Some(card_details()),
        metadata: Some(order_metadata()),
    }
}

/// Card payment method with nothing but the card.
pub fn card_payment_method() -> CreatePaymentMethod {
    CreatePaymentMethod::card(card_details())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_expires_in_future() {
        let card = card_details();
        assert!(i32::from(card.exp_year) > Utc::now().year());
        assert_ne!(card.exp_month, NEW_EXP_MONTH);
    }

    #[test]
    fn test_full_payment_method_carries_everything() {
        let params = full_payment_method();
        assert_eq!(params.kind, "card");
        assert_eq!(params.billing_details, Some(billing_details()));
        assert_eq!(
            params.metadata.unwrap().get("order_id").map(String::as_str),
            Some(ORDER_ID)
        );
    }
}
