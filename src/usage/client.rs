//! Repository usage endpoint client.

use async_trait::async_trait;
use mockall::automock;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::{
    http::RepositoryHttp,
    usage::{Usage, UsageError, UsageRequest},
};

/// Result of a usage deletion.
///
/// An already-gone usage is a soft outcome on the Ok path so callers decide
/// between swallowing and surfacing with a plain match instead of error
/// inspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The usage existed and was removed.
    Deleted,

    /// The usage was gone before the call; the desired end state holds.
    AlreadyGone,
}

/// Client for the repository usage endpoints.
#[automock]
#[async_trait]
pub trait UsageClient: Send + Sync {
    /// Register a usage for the given binding.
    ///
    /// The remote service owns dedup semantics; this client performs none.
    ///
    /// # Errors
    ///
    /// Returns [`UsageError::CreateFailed`] on rejection,
    /// [`UsageError::Remote`] on transport faults.
    async fn create_usage(&self, ticket: &str, request: &UsageRequest)
    -> Result<Usage, UsageError>;

    /// Resolve the usage id for a binding by its natural key.
    ///
    /// # Errors
    ///
    /// Returns [`UsageError::NotFound`] when the repository reports no
    /// matching usage.
    async fn lookup_usage_id(
        &self,
        ticket: &str,
        request: &UsageRequest,
    ) -> Result<String, UsageError>;

    /// Remove a usage, reporting already-gone as a soft outcome.
    ///
    /// # Errors
    ///
    /// Returns [`UsageError::DeleteFailed`] for any rejection other than an
    /// already-deleted usage.
    async fn delete_usage(
        &self,
        node_id: &str,
        usage_id: &str,
    ) -> Result<DeleteOutcome, UsageError>;
}

/// HTTP implementation of [`UsageClient`].
#[derive(Debug, Clone)]
pub struct HttpUsageClient {
    http: RepositoryHttp,
}

impl HttpUsageClient {
    #[must_use]
    pub fn new(http: RepositoryHttp) -> Self {
        Self { http }
    }
}

#[async_trait]
impl UsageClient for HttpUsageClient {
    async fn create_usage(
        &self,
        ticket: &str,
        request: &UsageRequest,
    ) -> Result<Usage, UsageError> {
        let body = CreateUsageBody {
            app_id: &self.http.config().app_id,
            course_id: request.course_id.into_i64(),
            resource_id: request.resource_id.to_string(),
            node_id: &request.node_id,
            node_version: &request.node_version,
        };

        let response = self
            .http
            .post("usage/v1/usages/repository")
            .query(&[("ticket", ticket)])
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();

            return Err(UsageError::CreateFailed(format!(
                "create request failed with status {status}: {text}"
            )));
        }

        let parsed: UsageResponse = response
            .json()
            .await
            .map_err(|error| UsageError::CreateFailed(format!("unexpected response: {error}")))?;

        Ok(Usage {
            usage_id: parsed.usage_id,
            node_version: parsed
                .node_version
                .unwrap_or_else(|| request.node_version.clone()),
        })
    }

    async fn lookup_usage_id(
        &self,
        ticket: &str,
        request: &UsageRequest,
    ) -> Result<String, UsageError> {
        let course_id = request.course_id.to_string();
        let resource_id = request.resource_id.to_string();

        let response = self
            .http
            .get(&format!("usage/v1/usages/node/{}", request.node_id))
            .query(&[
                ("ticket", ticket),
                ("courseId", course_id.as_str()),
                ("resourceId", resource_id.as_str()),
            ])
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(UsageError::NotFound);
        }

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();

            return Err(UsageError::LookupFailed(format!(
                "lookup request failed with status {status}: {text}"
            )));
        }

        let parsed: UsageResponse = response
            .json()
            .await
            .map_err(|error| UsageError::LookupFailed(format!("unexpected response: {error}")))?;

        Ok(parsed.usage_id)
    }

    async fn delete_usage(
        &self,
        node_id: &str,
        usage_id: &str,
    ) -> Result<DeleteOutcome, UsageError> {
        let response = self
            .http
            .delete_admin(&format!("usage/v1/usages/node/{node_id}/{usage_id}"))
            .send()
            .await?;

        let status = response.status();

        if status.is_success() {
            return Ok(DeleteOutcome::Deleted);
        }

        if status == StatusCode::NOT_FOUND {
            return Ok(DeleteOutcome::AlreadyGone);
        }

        let text = response.text().await.unwrap_or_default();

        if text.contains(&self.http.config().usage_gone_marker) {
            return Ok(DeleteOutcome::AlreadyGone);
        }

        Err(UsageError::DeleteFailed(format!(
            "delete request failed with status {status}: {text}"
        )))
    }
}

#[derive(Debug, Serialize)]
struct CreateUsageBody<'a> {
    #[serde(rename = "appId")]
    app_id: &'a str,

    #[serde(rename = "courseId")]
    course_id: i64,

    #[serde(rename = "resourceId")]
    resource_id: String,

    #[serde(rename = "nodeId")]
    node_id: &'a str,

    #[serde(rename = "nodeVersion")]
    node_version: &'a str,
}

#[derive(Debug, Deserialize)]
struct UsageResponse {
    #[serde(rename = "usageId")]
    usage_id: String,

    #[serde(rename = "nodeVersion", default)]
    node_version: Option<String>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::ids::{CourseId, InstanceUuid};

    use super::*;

    #[test]
    fn usage_response_parses_with_and_without_version() {
        let with_version: UsageResponse =
            serde_json::from_value(json!({"usageId": "u9", "nodeVersion": "4"}))
                .expect("response should parse");
        assert_eq!(with_version.usage_id, "u9");
        assert_eq!(with_version.node_version.as_deref(), Some("4"));

        let without_version: UsageResponse =
            serde_json::from_value(json!({"usageId": "u9"})).expect("response should parse");
        assert!(without_version.node_version.is_none());
    }

    #[test]
    fn create_body_uses_repository_field_names() {
        let resource_id = InstanceUuid::generate();
        let body = CreateUsageBody {
            app_id: "cms",
            course_id: CourseId::new(5).into_i64(),
            resource_id: resource_id.to_string(),
            node_id: "node123",
            node_version: "0",
        };

        let rendered = serde_json::to_value(&body).expect("body should serialize");

        assert_eq!(
            rendered,
            json!({
                "appId": "cms",
                "courseId": 5,
                "resourceId": resource_id.to_string(),
                "nodeId": "node123",
                "nodeVersion": "0",
            })
        );
    }
}
