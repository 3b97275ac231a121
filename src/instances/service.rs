//! Instance lifecycle service.

use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::Arc;

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use tracing::{debug, warn};

use crate::{
    auth::{Principal, TicketManager},
    ids::{CourseId, InstanceUuid},
    instances::{
        InstancesServiceError,
        models::{NewInstance, ResourceInstance},
        store::InstancesStore,
    },
    usage::{DeleteOutcome, NodeRef, Usage, UsageClient, UsageError, UsageRequest},
};

/// Ambient request context supplied by the host CMS: who is acting, and
/// which course the action happens in.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub principal: Principal,
    pub course_id: CourseId,
}

/// Create/update/delete of local resource instances, kept consistent with
/// the remote usage graph.
#[automock]
#[async_trait]
pub trait InstancesService: Send + Sync {
    /// Insert a new embedding and register its remote usage.
    ///
    /// # Errors
    ///
    /// Any failure after the pending insert triggers a compensating delete
    /// of the row before the error is returned; no partial state survives.
    async fn add_instance(
        &self,
        ctx: &RequestContext,
        data: NewInstance,
    ) -> Result<ResourceInstance, InstancesServiceError>;

    /// Re-register the embedding under new parameters.
    ///
    /// Returns `false`, with the previous row restored, when the remote
    /// usage registration fails.
    ///
    /// # Errors
    ///
    /// Returns [`InstancesServiceError::NotFound`] when no row exists, or a
    /// storage error from the final write.
    async fn update_instance(
        &self,
        ctx: &RequestContext,
        id: InstanceUuid,
        data: NewInstance,
    ) -> Result<bool, InstancesServiceError>;

    /// Remove the embedding remotely, then locally.
    ///
    /// An already-deleted remote usage is swallowed; local cleanup proceeds
    /// regardless since the local store owns "is this still embedded".
    ///
    /// # Errors
    ///
    /// Returns [`InstancesServiceError::NotFound`] for a missing row; hard
    /// remote deletion failures propagate without touching the local row.
    async fn delete_instance(
        &self,
        ctx: &RequestContext,
        id: InstanceUuid,
    ) -> Result<(), InstancesServiceError>;

    /// Fetch one embedding row.
    ///
    /// # Errors
    ///
    /// Returns [`InstancesServiceError::NotFound`] when no row exists.
    async fn get_instance(&self, id: InstanceUuid)
    -> Result<ResourceInstance, InstancesServiceError>;
}

/// Production implementation of [`InstancesService`].
///
/// The only component that performs compensating writes; the ticket manager
/// and the clients below it simply succeed, fail, or signal.
pub struct LifecycleInstancesService {
    store: Arc<dyn InstancesStore>,
    tickets: Arc<TicketManager>,
    usages: Arc<dyn UsageClient>,
}

impl LifecycleInstancesService {
    #[must_use]
    pub fn new(
        store: Arc<dyn InstancesStore>,
        tickets: Arc<TicketManager>,
        usages: Arc<dyn UsageClient>,
    ) -> Self {
        Self {
            store,
            tickets,
            usages,
        }
    }

    /// Register a usage for `record` and return the promoted row after the
    /// final persistence write.
    async fn promote(
        &self,
        ctx: &RequestContext,
        record: ResourceInstance,
    ) -> Result<ResourceInstance, InstancesServiceError> {
        let usage = self.register_usage(ctx, &record).await?;
        let promoted = record.with_usage(&usage);

        self.store.update(&promoted).await?;

        Ok(promoted)
    }

    async fn register_usage(
        &self,
        ctx: &RequestContext,
        record: &ResourceInstance,
    ) -> Result<Usage, InstancesServiceError> {
        let node = NodeRef::parse(&record.object_url)?;
        let ticket = self.tickets.get_ticket(&ctx.principal).await?;

        let request = UsageRequest {
            course_id: record.course_id,
            resource_id: record.id,
            node_id: node.node_id,
            node_version: record.object_version.as_wire().to_owned(),
        };

        let usage = self.usages.create_usage(&ticket, &request).await?;

        Ok(usage)
    }
}

#[async_trait]
impl InstancesService for LifecycleInstancesService {
    async fn add_instance(
        &self,
        ctx: &RequestContext,
        data: NewInstance,
    ) -> Result<ResourceInstance, InstancesServiceError> {
        let pending = data.into_pending(ctx.course_id, Timestamp::now());

        self.store.insert(&pending).await?;

        match self.promote(ctx, pending.clone()).await {
            Ok(promoted) => Ok(promoted),
            Err(error) => {
                warn!(instance = %pending.id, %error, "usage registration failed; removing pending row");

                if let Err(cleanup) = self.store.delete(pending.id).await {
                    warn!(instance = %pending.id, %cleanup, "failed to remove pending row");
                }

                Err(error)
            }
        }
    }

    async fn update_instance(
        &self,
        ctx: &RequestContext,
        id: InstanceUuid,
        data: NewInstance,
    ) -> Result<bool, InstancesServiceError> {
        let memento = self
            .store
            .get(id)
            .await?
            .ok_or(InstancesServiceError::NotFound)?;

        let candidate = data.into_updated(&memento, ctx.course_id, Timestamp::now());

        match self.register_usage(ctx, &candidate).await {
            Ok(usage) => {
                let updated = candidate.with_usage(&usage);

                self.store.update(&updated).await?;

                Ok(true)
            }
            Err(error) => {
                // A usage created remotely before the failure stays behind;
                // the repository owns usage existence.
                debug!(instance = %id, %error, "usage re-registration failed; restoring previous row");

                self.store.update(&memento).await?;

                Ok(false)
            }
        }
    }

    async fn delete_instance(
        &self,
        ctx: &RequestContext,
        id: InstanceUuid,
    ) -> Result<(), InstancesServiceError> {
        let record = self
            .store
            .get(id)
            .await?
            .ok_or(InstancesServiceError::NotFound)?;

        let node = NodeRef::parse(&record.object_url)?;
        let ticket = self.tickets.get_ticket(&ctx.principal).await?;

        // A row without a stored usage id was never durably registered;
        // resolve it by natural key before the remote delete.
        let usage_id = match record.usage_id.clone() {
            Some(usage_id) => Some(usage_id),
            None => {
                let request = UsageRequest {
                    course_id: record.course_id,
                    resource_id: record.id,
                    node_id: node.node_id.clone(),
                    node_version: record.object_version.as_wire().to_owned(),
                };

                match self.usages.lookup_usage_id(&ticket, &request).await {
                    Ok(usage_id) => Some(usage_id),
                    Err(UsageError::NotFound) => {
                        debug!(instance = %id, "no remote usage registered; skipping remote delete");
                        None
                    }
                    Err(error) => return Err(error.into()),
                }
            }
        };

        if let Some(usage_id) = usage_id {
            match self.usages.delete_usage(&node.node_id, &usage_id).await? {
                DeleteOutcome::Deleted => {}
                DeleteOutcome::AlreadyGone => {
                    warn!(instance = %id, usage = %usage_id, "remote usage was already gone");
                }
            }
        }

        self.store.delete(id).await?;

        Ok(())
    }

    async fn get_instance(
        &self,
        id: InstanceUuid,
    ) -> Result<ResourceInstance, InstancesServiceError> {
        self.store
            .get(id)
            .await?
            .ok_or(InstancesServiceError::NotFound)
    }
}

impl Debug for LifecycleInstancesService {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("LifecycleInstancesService")
            .finish_non_exhaustive()
    }
}
