//! Repository service configuration.

use jiff::SignedDuration;

/// Default freshness window before a cached ticket is revalidated.
pub const DEFAULT_TICKET_WINDOW: SignedDuration = SignedDuration::from_secs(10);

/// Default marker the repository places in the error body of a deletion
/// request for a usage that no longer exists.
pub const DEFAULT_USAGE_GONE_MARKER: &str = "usage_not_found";

/// Configuration for connecting to the remote repository service.
#[derive(Debug, Clone)]
pub struct RepositoryConfig {
    /// Repository base address, e.g. `"https://repo.example.edu"`.
    pub base_url: String,

    /// Application id registered with the repository.
    pub app_id: String,

    /// Application secret used for HTTP Basic administrative calls.
    pub app_secret: String,

    /// Verify TLS certificates; disable only against development instances.
    pub verify_tls: bool,

    /// Cached tickets younger than this are reused without a remote call.
    pub ticket_window: SignedDuration,

    /// Marker identifying an already-deleted usage in deletion error bodies.
    pub usage_gone_marker: String,
}

impl RepositoryConfig {
    /// Build a configuration with default window and gone-marker values.
    #[must_use]
    pub fn new(base_url: String, app_id: String, app_secret: String) -> Self {
        Self {
            base_url,
            app_id,
            app_secret,
            verify_tls: true,
            ticket_window: DEFAULT_TICKET_WINDOW,
            usage_gone_marker: DEFAULT_USAGE_GONE_MARKER.to_owned(),
        }
    }
}
