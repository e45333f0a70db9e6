pub mod error;
pub mod interface;
