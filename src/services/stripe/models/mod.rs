pub mod customer;
pub mod payment_method;
