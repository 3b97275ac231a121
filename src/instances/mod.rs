//! Local resource instance lifecycle

mod errors;
pub mod models;
mod service;
mod store;

pub use errors::*;
pub use service::*;
pub use store::*;
