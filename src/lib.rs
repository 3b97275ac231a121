//! Lifecycle core for embedding remote repository learning objects in
//! course pages: short-lived ticket acquisition and caching, remote usage
//! registration, and local instance persistence with compensating rollback.

pub mod auth;
pub mod config;
pub mod context;
pub mod database;
pub mod http;
pub mod ids;
pub mod instances;
pub mod usage;

#[cfg(test)]
mod test;
