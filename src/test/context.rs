//! Test context wiring the lifecycle service over mock clients and the
//! in-memory store.

use std::sync::Arc;

use jiff::SignedDuration;

use crate::{
    auth::{MockAuthClient, Principal, TicketManager},
    ids::CourseId,
    instances::{LifecycleInstancesService, RequestContext},
    test::MemoryInstancesStore,
    usage::MockUsageClient,
};

pub(crate) const TEST_WINDOW: SignedDuration = SignedDuration::from_secs(10);

pub(crate) struct TestContext {
    pub(crate) store: Arc<MemoryInstancesStore>,
    pub(crate) instances: LifecycleInstancesService,
}

impl TestContext {
    pub(crate) fn new(auth: MockAuthClient, usages: MockUsageClient) -> Self {
        let store = Arc::new(MemoryInstancesStore::new());
        let tickets = Arc::new(TicketManager::new(Arc::new(auth), TEST_WINDOW));
        let instances =
            LifecycleInstancesService::new(store.clone(), tickets, Arc::new(usages));

        Self { store, instances }
    }

    pub(crate) fn request() -> RequestContext {
        RequestContext {
            principal: Principal::new("instructor01", "Ada", "Lovelace", "ada@example.edu"),
            course_id: CourseId::new(5),
        }
    }
}
