use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard, PoisonError},
};

use chrono::{Datelike, Utc};
use rand::{distributions::Alphanumeric, Rng};
use serde::Serialize;

use crate::services::{
    payment::error::{PaymentError, PaymentResult},
    stripe::models::{
        customer::{CreateCustomer, Customer},
        payment_method::{
            Card, CardDetails, CreatePaymentMethod, ListPaymentMethods, PaymentMethod,
            PaymentMethodList, PaymentMethodType, UpdatePaymentMethod,
        },
    },
};

pub const PAYMENT_METHOD_PREFIX: &str = "test_pm_";
pub const CUSTOMER_PREFIX: &str = "cus_";
pub const DEFAULT_LIST_LIMIT: u32 = 10;
pub const MAX_LIST_LIMIT: u32 = 100;
const ID_LENGTH: usize = 14;
const LIST_URL: &str = "/v1/payment_methods";

struct StoredPaymentMethod {
    sequence: u64,
    payment_method: PaymentMethod,
}

#[derive(Default)]
struct StoreState {
    customers: HashMap<String, Customer>,
    payment_methods: HashMap<String, StoredPaymentMethod>,
    sequence: u64,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreStats {
    pub customers: usize,
    pub payment_methods: usize,
    pub attached: usize,
}

/// Customers and payment methods held in process memory, validated the way the
/// remote service validates them.
#[derive(Default)]
pub struct PaymentMethodStore {
    state: Mutex<StoreState>,
}

impl PaymentMethodStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn stats(&self) -> StoreStats {
        let state = self.state();
        StoreStats {
            customers: state.customers.len(),
            payment_methods: state.payment_methods.len(),
            attached: state
                .payment_methods
                .values()
                .filter(|stored| stored.payment_method.customer.is_some())
                .count(),
        }
    }

    pub fn create_customer(&self, params: CreateCustomer) -> Customer {
        let customer = Customer {
            id: generate_id(CUSTOMER_PREFIX),
            object: "customer".to_string(),
            created: Utc::now().timestamp(),
            email: params.email,
            name: params.name,
            phone: params.phone,
            metadata: params.metadata.unwrap_or_default(),
            livemode: false,
        };

        log::debug!("Created customer {}", customer.id);
        self.state()
            .customers
            .insert(customer.id.clone(), customer.clone());
        customer
    }

    pub fn get_customer(&self, customer_id: &str) -> PaymentResult<Customer> {
        self.state()
            .customers
            .get(customer_id)
            .cloned()
            .ok_or_else(|| PaymentError::missing("customer", customer_id, "id"))
    }

    pub fn create_payment_method(&self, params: CreatePaymentMethod) -> PaymentResult<PaymentMethod> {
        if params.kind.is_empty() {
            return Err(PaymentError::invalid(
                "Missing required param: type.",
                Some("type"),
            ));
        }

        let kind: PaymentMethodType = params.kind.parse().map_err(|_| {
            PaymentError::invalid(
                "Invalid type: must be one of card, ideal or sepa_debit",
                Some("type"),
            )
        })?;

        let card = match kind {
            PaymentMethodType::Card => {
                let details = params.card.as_ref().ok_or_else(|| {
                    PaymentError::invalid("Missing required param: card.", Some("card"))
                })?;
                validate_card(details)?;
                Some(Card::from(details))
            }
            _ => None,
        };

        let payment_method = PaymentMethod {
            id: generate_id(PAYMENT_METHOD_PREFIX),
            object: "payment_method".to_string(),
            kind: kind.to_string(),
            billing_details: params.billing_details.unwrap_or_default(),
            card,
            customer: None,
            metadata: params.metadata.unwrap_or_default(),
            created: Utc::now().timestamp(),
            livemode: false,
        };

        let mut state = self.state();
        state.sequence += 1;
        let sequence = state.sequence;
        state.payment_methods.insert(
            payment_method.id.clone(),
            StoredPaymentMethod {
                sequence,
                payment_method: payment_method.clone(),
            },
        );

        log::debug!("Created payment method {} ({})", payment_method.id, kind);
        Ok(payment_method)
    }

    pub fn get_payment_method(&self, payment_id: &str) -> PaymentResult<PaymentMethod> {
        self.state()
            .payment_methods
            .get(payment_id)
            .map(|stored| stored.payment_method.clone())
            .ok_or_else(|| PaymentError::missing("payment_method", payment_id, "payment_method"))
    }

    /// Newest first, scoped to one customer.
    pub fn list_payment_methods(&self, params: ListPaymentMethods) -> PaymentResult<PaymentMethodList> {
        let customer = params.customer.ok_or_else(|| {
            PaymentError::invalid("Missing required param: customer.", Some("customer"))
        })?;

        let limit = params.limit.unwrap_or(DEFAULT_LIST_LIMIT);
        if !(1..=MAX_LIST_LIMIT).contains(&limit) {
            return Err(PaymentError::invalid(
                format!("Invalid limit: must be between 1 and {}", MAX_LIST_LIMIT),
                Some("limit"),
            ));
        }

        let kind = params
            .kind
            .map(|kind| {
                kind.parse::<PaymentMethodType>().map_err(|_| {
                    PaymentError::invalid(
                        "Invalid type: must be one of card, ideal or sepa_debit",
                        Some("type"),
                    )
                })
            })
            .transpose()?;

        let state = self.state();
        if !state.customers.contains_key(&customer) {
            return Err(PaymentError::missing("customer", &customer, "customer"));
        }

        let mut matches: Vec<&StoredPaymentMethod> = state
            .payment_methods
            .values()
            .filter(|stored| stored.payment_method.customer.as_deref() == Some(customer.as_str()))
            .filter(|stored| {
                kind.map_or(true, |kind| stored.payment_method.kind == kind.as_str())
            })
            .collect();
        matches.sort_by(|a, b| b.sequence.cmp(&a.sequence));

        let has_more = matches.len() > limit as usize;
        let data = matches
            .into_iter()
            .take(limit as usize)
            .map(|stored| stored.payment_method.clone())
            .collect();

        Ok(PaymentMethodList {
            object: "list".to_string(),
            data,
            has_more,
            url: LIST_URL.to_string(),
        })
    }

    pub fn attach_payment_method(
        &self,
        payment_id: &str,
        customer_id: &str,
    ) -> PaymentResult<PaymentMethod> {
        let mut state = self.state();

        if !state.payment_methods.contains_key(payment_id) {
            return Err(PaymentError::missing(
                "payment_method",
                payment_id,
                "payment_method",
            ));
        }
        if customer_id.is_empty() {
            return Err(PaymentError::invalid(
                "Missing required param: customer.",
                Some("customer"),
            ));
        }
        if !state.customers.contains_key(customer_id) {
            return Err(PaymentError::invalid(
                format!("No such customer: '{}'", customer_id),
                Some("customer"),
            ));
        }

        let payment_method = state
            .payment_methods
            .get_mut(payment_id)
            .map(|stored| &mut stored.payment_method)
            .ok_or_else(|| PaymentError::missing("payment_method", payment_id, "payment_method"))?;

        if let Some(existing) = &payment_method.customer {
            if existing != customer_id {
                return Err(PaymentError::invalid(
                    "The payment method you provided has already been attached to a customer.",
                    None,
                ));
            }
        }
        payment_method.customer = Some(customer_id.to_string());

        log::debug!("Attached {} to {}", payment_id, customer_id);
        Ok(payment_method.clone())
    }

    pub fn detach_payment_method(&self, payment_id: &str) -> PaymentResult<PaymentMethod> {
        let mut state = self.state();
        let payment_method = state
            .payment_methods
            .get_mut(payment_id)
            .map(|stored| &mut stored.payment_method)
            .ok_or_else(|| PaymentError::missing("payment_method", payment_id, "payment_method"))?;

        if payment_method.customer.take().is_none() {
            return Err(PaymentError::invalid(
                "The payment method you provided is not attached to a customer so detachment is impossible.",
                None,
            ));
        }

        log::debug!("Detached {}", payment_id);
        Ok(payment_method.clone())
    }

    /// Applies the supplied fields and nothing else. The customer association is never touched.
    pub fn update_payment_method(
        &self,
        payment_id: &str,
        params: UpdatePaymentMethod,
    ) -> PaymentResult<PaymentMethod> {
        let mut state = self.state();
        let payment_method = state
            .payment_methods
            .get_mut(payment_id)
            .map(|stored| &mut stored.payment_method)
            .ok_or_else(|| PaymentError::missing("payment_method", payment_id, "payment_method"))?;

        if payment_method.customer.is_none() {
            return Err(PaymentError::invalid(
                "You must save this PaymentMethod to a customer before you can update it.",
                None,
            ));
        }

        // Validate everything before mutating so a rejected update leaves no trace.
        let expiry = match (&params.card, &payment_method.card) {
            (Some(update), Some(card)) => {
                let month = update.exp_month.unwrap_or(card.exp_month);
                let year = update.exp_year.unwrap_or(card.exp_year);
                validate_expiry(month, year)?;
                Some((month, year))
            }
            (Some(_), None) => {
                return Err(PaymentError::invalid(
                    "This PaymentMethod has no card to update.",
                    Some("card"),
                ));
            }
            (None, _) => None,
        };

        if let (Some((month, year)), Some(card)) = (expiry, payment_method.card.as_mut()) {
            card.exp_month = month;
            card.exp_year = year;
        }
        if let Some(billing_details) = params.billing_details {
            payment_method.billing_details.merge(billing_details);
        }
        if let Some(metadata) = params.metadata {
            for (key, value) in metadata {
                if value.is_empty() {
                    payment_method.metadata.remove(&key);
                } else {
                    payment_method.metadata.insert(key, value);
                }
            }
        }

        log::debug!("Updated {}", payment_id);
        Ok(payment_method.clone())
    }
}

fn generate_id(prefix: &str) -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(ID_LENGTH)
        .map(char::from)
        .collect();
    format!("{}{}", prefix, suffix)
}

fn validate_card(details: &CardDetails) -> PaymentResult<()> {
    if !luhn_valid(&details.number) {
        return Err(PaymentError::invalid(
            "Your card number is incorrect.",
            Some("card[number]"),
        ));
    }
    validate_expiry(details.exp_month, details.exp_year)
}

fn validate_expiry(month: u8, year: u16) -> PaymentResult<()> {
    if !(1..=12).contains(&month) {
        return Err(PaymentError::invalid(
            "Your card's expiration month is invalid.",
            Some("card[exp_month]"),
        ));
    }
    if i32::from(year) < Utc::now().year() {
        return Err(PaymentError::invalid(
            "Your card's expiration year is invalid.",
            Some("card[exp_year]"),
        ));
    }
    Ok(())
}

fn luhn_valid(number: &str) -> bool {
    let digits: Vec<u32> = number
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .map(|c| c.to_digit(10))
        .collect::<Option<Vec<u32>>>()
        .unwrap_or_default();

    if !(12..=19).contains(&digits.len()) {
        return false;
    }

    let sum: u32 = digits
        .iter()
        .rev()
        .enumerate()
        .map(|(index, digit)| {
            if index % 2 == 1 {
                let doubled = digit * 2;
                if doubled > 9 {
                    doubled - 9
                } else {
                    doubled
                }
            } else {
                *digit
            }
        })
        .sum();
    sum % 10 == 0
}
