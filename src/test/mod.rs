//! Unit test support.

mod context;
mod store;

pub(crate) use context::TestContext;
pub(crate) use store::MemoryInstancesStore;
