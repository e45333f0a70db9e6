pub mod config;
pub mod contract;
pub mod middleware;
pub mod routes;
pub mod services;
