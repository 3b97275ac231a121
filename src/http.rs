//! HTTP transport for the repository service REST API.

use reqwest::{Client, ClientBuilder, RequestBuilder};

use crate::config::RepositoryConfig;

/// Shared HTTP layer for the repository REST endpoints.
///
/// Owns the `reqwest` client and applies base URL joining and HTTP Basic
/// application credentials for administrative calls. Ticket parameters are
/// added by the individual endpoint clients.
#[derive(Debug, Clone)]
pub struct RepositoryHttp {
    config: RepositoryConfig,
    http: Client,
}

impl RepositoryHttp {
    /// Build the transport, honouring the TLS verification toggle.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying client cannot be constructed.
    pub fn new(config: RepositoryConfig) -> Result<Self, reqwest::Error> {
        let http = ClientBuilder::new()
            .danger_accept_invalid_certs(!config.verify_tls)
            .build()?;

        Ok(Self { config, http })
    }

    pub(crate) fn config(&self) -> &RepositoryConfig {
        &self.config
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/rest/{path}", self.config.base_url.trim_end_matches('/'))
    }

    pub(crate) fn get(&self, path: &str) -> RequestBuilder {
        self.http.get(self.endpoint(path))
    }

    pub(crate) fn post(&self, path: &str) -> RequestBuilder {
        self.http.post(self.endpoint(path))
    }

    /// POST with application credentials, for administrative endpoints.
    pub(crate) fn post_admin(&self, path: &str) -> RequestBuilder {
        self.post(path)
            .basic_auth(&self.config.app_id, Some(&self.config.app_secret))
    }

    /// DELETE with application credentials, for administrative endpoints.
    pub(crate) fn delete_admin(&self, path: &str) -> RequestBuilder {
        self.http
            .delete(self.endpoint(path))
            .basic_auth(&self.config.app_id, Some(&self.config.app_secret))
    }
}
