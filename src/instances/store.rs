//! Instance persistence.

use async_trait::async_trait;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use mockall::automock;
use sqlx::{FromRow, PgPool, Postgres, Row, postgres::PgRow, query, query_as};
use uuid::Uuid;

use crate::{
    ids::{CourseId, InstanceUuid},
    instances::models::ResourceInstance,
    usage::ObjectVersion,
};

const CREATE_INSTANCE_SQL: &str = include_str!("sql/create_instance.sql");
const GET_INSTANCE_SQL: &str = include_str!("sql/get_instance.sql");
const UPDATE_INSTANCE_SQL: &str = include_str!("sql/update_instance.sql");
const DELETE_INSTANCE_SQL: &str = include_str!("sql/delete_instance.sql");

/// Storage seam for resource instances.
///
/// The lifecycle service only needs exact-match reads and whole-row writes;
/// production wiring uses [`PgInstancesRepository`].
#[automock]
#[async_trait]
pub trait InstancesStore: Send + Sync {
    async fn insert(&self, record: &ResourceInstance) -> Result<(), sqlx::Error>;

    async fn get(&self, id: InstanceUuid) -> Result<Option<ResourceInstance>, sqlx::Error>;

    async fn update(&self, record: &ResourceInstance) -> Result<(), sqlx::Error>;

    async fn delete(&self, id: InstanceUuid) -> Result<(), sqlx::Error>;
}

/// `PostgreSQL` implementation of [`InstancesStore`].
#[derive(Debug, Clone)]
pub struct PgInstancesRepository {
    pool: PgPool,
}

impl PgInstancesRepository {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InstancesStore for PgInstancesRepository {
    async fn insert(&self, record: &ResourceInstance) -> Result<(), sqlx::Error> {
        bind_row(query(CREATE_INSTANCE_SQL), record)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn get(&self, id: InstanceUuid) -> Result<Option<ResourceInstance>, sqlx::Error> {
        query_as::<Postgres, ResourceInstance>(GET_INSTANCE_SQL)
            .bind(id.into_uuid())
            .fetch_optional(&self.pool)
            .await
    }

    async fn update(&self, record: &ResourceInstance) -> Result<(), sqlx::Error> {
        bind_row(query(UPDATE_INSTANCE_SQL), record)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn delete(&self, id: InstanceUuid) -> Result<(), sqlx::Error> {
        query(DELETE_INSTANCE_SQL)
            .bind(id.into_uuid())
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

type PgQuery<'q> =
    sqlx::query::Query<'q, Postgres, <Postgres as sqlx::Database>::Arguments<'q>>;

fn bind_row<'q>(query: PgQuery<'q>, record: &'q ResourceInstance) -> PgQuery<'q> {
    query
        .bind(record.id.into_uuid())
        .bind(record.course_id.into_i64())
        .bind(&record.name)
        .bind(&record.object_url)
        .bind(record.object_version.as_wire())
        .bind(record.force_download)
        .bind(record.popup_window)
        .bind(&record.window_options)
        .bind(record.track_views)
        .bind(record.usage_id.as_deref())
        .bind(record.usage_version.as_deref())
        .bind(SqlxTimestamp::from(record.created_at))
        .bind(SqlxTimestamp::from(record.modified_at))
}

impl<'r> FromRow<'r, PgRow> for ResourceInstance {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            id: InstanceUuid::from_uuid(row.try_get::<Uuid, _>("uuid")?),
            course_id: CourseId::new(row.try_get("course_id")?),
            name: row.try_get("name")?,
            object_url: row.try_get("object_url")?,
            object_version: ObjectVersion::from_wire(row.try_get("object_version")?),
            force_download: row.try_get("force_download")?,
            popup_window: row.try_get("popup_window")?,
            window_options: row.try_get("window_options")?,
            track_views: row.try_get("track_views")?,
            usage_id: row.try_get("usage_id")?,
            usage_version: row.try_get("usage_version")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            modified_at: row.try_get::<SqlxTimestamp, _>("modified_at")?.to_jiff(),
        })
    }
}
