//! Authentication against the repository service

mod cache;
mod client;
mod errors;
mod manager;
mod models;

pub use cache::*;
pub use client::*;
pub use errors::*;
pub use manager::*;
pub use models::*;
