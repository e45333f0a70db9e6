pub mod memory;
pub mod payment;
pub mod stripe;
