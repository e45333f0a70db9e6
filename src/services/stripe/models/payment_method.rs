use std::{collections::HashMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr, PickFirst};

pub type Metadata = HashMap<String, String>;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethodType {
    Card,
    Ideal,
    SepaDebit,
}

impl PaymentMethodType {
    pub const ACCEPTED: [PaymentMethodType; 3] = [
        PaymentMethodType::Card,
        PaymentMethodType::Ideal,
        PaymentMethodType::SepaDebit,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethodType::Card => "card",
            PaymentMethodType::Ideal => "ideal",
            PaymentMethodType::SepaDebit => "sepa_debit",
        }
    }
}

impl fmt::Display for PaymentMethodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethodType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ACCEPTED
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| s.to_string())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Address {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

impl Address {
    fn merge(&mut self, update: Address) {
        merge_field(&mut self.city, update.city);
        merge_field(&mut self.country, update.country);
        merge_field(&mut self.line1, update.line1);
        merge_field(&mut self.line2, update.line2);
        merge_field(&mut self.postal_code, update.postal_code);
        merge_field(&mut self.state, update.state);
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct BillingDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl BillingDetails {
    /// Overwrites only the sub-fields present in `update`.
    pub fn merge(&mut self, update: BillingDetails) {
        if let Some(address) = update.address {
            self.address.get_or_insert_with(Address::default).merge(address);
        }
        merge_field(&mut self.email, update.email);
        merge_field(&mut self.name, update.name);
        merge_field(&mut self.phone, update.phone);
    }
}

fn merge_field(current: &mut Option<String>, update: Option<String>) {
    if update.is_some() {
        *current = update;
    }
}

/// Raw card data as submitted on create. Never echoed back.
#[serde_as]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CardDetails {
    pub number: String,
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub exp_month: u8,
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub exp_year: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cvc: Option<String>,
}

/// Card as it appears on a stored payment method.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Card {
    pub brand: String,
    pub last4: String,
    pub exp_month: u8,
    pub exp_year: u16,
    #[serde(default)]
    pub funding: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

impl From<&CardDetails> for Card {
    fn from(details: &CardDetails) -> Self {
        let digits: String = details
            .number
            .chars()
            .filter(|c| c.is_ascii_digit())
            .collect();
        let last4 = digits[digits.len().saturating_sub(4)..].to_string();

        Card {
            brand: card_brand(&digits).to_string(),
            last4,
            exp_month: details.exp_month,
            exp_year: details.exp_year,
            funding: Some("credit".to_string()),
            country: Some("US".to_string()),
        }
    }
}

fn card_brand(digits: &str) -> &'static str {
    match digits.as_bytes() {
        [b'4', ..] => "visa",
        [b'3', b'4' | b'7', ..] => "amex",
        [b'5', b'1'..=b'5', ..] | [b'2', ..] => "mastercard",
        [b'6', ..] => "discover",
        _ => "unknown",
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PaymentMethod {
    pub id: String,
    #[serde(default = "payment_method_object")]
    pub object: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub billing_details: BillingDetails,
    #[serde(default)]
    pub card: Option<Card>,
    #[serde(default)]
    pub customer: Option<String>,
    #[serde(default)]
    pub metadata: Metadata,
    #[serde(default)]
    pub created: i64,
    #[serde(default)]
    pub livemode: bool,
}

fn payment_method_object() -> String {
    "payment_method".to_string()
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct CreatePaymentMethod {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub billing_details: Option<BillingDetails>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card: Option<CardDetails>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

impl CreatePaymentMethod {
    pub fn card(card: CardDetails) -> Self {
        Self {
            kind: PaymentMethodType::Card.to_string(),
            card: Some(card),
            ..Default::default()
        }
    }
}

#[serde_as]
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct CardUpdate {
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exp_month: Option<u8>,
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exp_year: Option<u16>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct UpdatePaymentMethod {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub billing_details: Option<BillingDetails>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card: Option<CardUpdate>,
    /// Merged into existing metadata. An empty value removes the key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ListPaymentMethods {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl ListPaymentMethods {
    pub fn for_customer(customer: impl Into<String>, kind: PaymentMethodType) -> Self {
        Self {
            customer: Some(customer.into()),
            kind: Some(kind.to_string()),
            limit: None,
        }
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PaymentMethodList {
    #[serde(default = "list_object")]
    pub object: String,
    pub data: Vec<PaymentMethod>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub url: String,
}

fn list_object() -> String {
    "list".to_string()
}

#[derive(Serialize, Deserialize, Debug)]
pub struct AttachPaymentMethodRequest {
    #[serde(default)]
    pub customer: String,
}
