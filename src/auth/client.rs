//! Repository authentication endpoint client.

use std::collections::BTreeMap;

use async_trait::async_trait;
use mockall::automock;
use serde::{Deserialize, Serialize};

use crate::{
    auth::{AuthError, Principal},
    http::RepositoryHttp,
};

/// Client for the repository authentication endpoints.
///
/// Cache policy lives in the ticket manager; this client only performs the
/// outbound calls.
#[automock]
#[async_trait]
pub trait AuthClient: Send + Sync {
    /// Check whether `ticket` is still accepted by the repository.
    ///
    /// Ordinary rejections (non-2xx, status other than `OK`) yield
    /// `Ok(false)`; only transport faults surface as errors.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Remote`] when the validation call cannot reach
    /// the repository.
    async fn validate_ticket(&self, ticket: &str) -> Result<bool, AuthError>;

    /// Request a brand-new ticket for `principal`.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Failed`] when the repository rejects the request
    /// or returns no usable token, [`AuthError::Remote`] on transport
    /// faults.
    async fn issue_ticket(&self, principal: &Principal) -> Result<String, AuthError>;
}

/// HTTP implementation of [`AuthClient`].
#[derive(Debug, Clone)]
pub struct HttpAuthClient {
    http: RepositoryHttp,
}

impl HttpAuthClient {
    #[must_use]
    pub fn new(http: RepositoryHttp) -> Self {
        Self { http }
    }
}

#[async_trait]
impl AuthClient for HttpAuthClient {
    async fn validate_ticket(&self, ticket: &str) -> Result<bool, AuthError> {
        let response = self
            .http
            .get("authentication/v1/validate")
            .query(&[("ticket", ticket)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Ok(false);
        }

        match response.json::<ValidateResponse>().await {
            Ok(parsed) => Ok(parsed.status_code == "OK"),
            Err(_) => Ok(false),
        }
    }

    async fn issue_ticket(&self, principal: &Principal) -> Result<String, AuthError> {
        let body = AppAuthBody {
            first_name: &principal.first_name,
            last_name: &principal.last_name,
            email: &principal.email,
            attributes: &principal.attributes,
        };

        let response = self
            .http
            .post_admin(&format!("authentication/v1/appauth/{}", principal.id))
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();

            return Err(AuthError::Failed(format!(
                "appauth request failed with status {status}: {text}"
            )));
        }

        let parsed: AppAuthResponse = response
            .json()
            .await
            .map_err(|error| AuthError::Failed(format!("unexpected appauth response: {error}")))?;

        if parsed.ticket.is_empty() {
            return Err(AuthError::Failed(
                "appauth response carried no ticket".to_owned(),
            ));
        }

        Ok(parsed.ticket)
    }
}

#[derive(Debug, Serialize)]
struct AppAuthBody<'a> {
    #[serde(rename = "firstName")]
    first_name: &'a str,

    #[serde(rename = "lastName")]
    last_name: &'a str,

    email: &'a str,

    #[serde(rename = "additionalAttributes", skip_serializing_if = "BTreeMap::is_empty")]
    attributes: &'a BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct ValidateResponse {
    #[serde(rename = "statusCode")]
    status_code: String,
}

#[derive(Debug, Deserialize)]
struct AppAuthResponse {
    #[serde(default)]
    ticket: String,
}
