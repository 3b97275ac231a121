//! Remote usage registration

mod client;
mod errors;
mod models;

pub use client::*;
pub use errors::*;
pub use models::*;
