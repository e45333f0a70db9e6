pub mod provider;
pub mod store;
