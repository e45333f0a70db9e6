pub mod customer;
pub mod form;
pub mod models;
pub mod provider;
