//! Configuration for the UAA client.

use std::time::Duration;

/// Protocol constants and configuration defaults.
pub mod defaults {
    use std::time::Duration;

    /// Default OAuth client id.
    pub const CLIENT_ID: &str = "oauthClient";

    /// Default OAuth client secret.
    pub const CLIENT_SECRET: &str = "secret";

    /// Default scheme.
    pub const SCHEME: &str = "http";

    /// Default UAA host.
    pub const HOST: &str = "localhost";

    /// Default base path of the identity service.
    pub const UAA_ENDPOINT: &str = "/oauth";

    /// Default OAuth redirect URL.
    pub const REDIRECT_URL: &str = "/";

    /// Authorization endpoint, relative to the UAA base path.
    pub const AUTHORIZE_PATH: &str = "/authorize";

    /// Token endpoint, relative to the UAA base path.
    pub const TOKEN_PATH: &str = "/token";

    /// Introspection endpoint, relative to the host root.
    pub const CHECK_TOKEN_PATH: &str = "/check_token";

    /// Client registration resource, relative to the UAA base path.
    pub const CLIENTS_PATH: &str = "/clients/";

    /// Name of the session correlation cookie.
    pub const SESSION_COOKIE: &str = "JSESSIONID";

    /// Maximum number of response body bytes read per request (1 MiB).
    pub const MAX_RESPONSE_BYTES: usize = 1 << 20;

    /// Request timeout.
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

    /// Connection timeout.
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
}

/// Client configuration.
///
/// Immutable after [`crate::UaaClient::new`]: the client keeps its own copy,
/// so one client instance is safe to share across concurrent callers.
#[derive(Debug, Clone)]
pub struct Config {
    /// OAuth client id registered with the identity service.
    pub client_id: String,

    /// OAuth client secret. Auto-generated at client construction when empty.
    pub client_secret: String,

    /// `http` or `https`.
    pub scheme: String,

    /// Identity service host (host or host:port).
    pub host: String,

    /// Base path of the identity service, e.g. `/oauth` or `/uaa/oauth`.
    pub uaa_endpoint: String,

    /// URL users are redirected to after the authorization-code flow.
    pub redirect_url: String,

    /// Scopes requested during authorization.
    pub scopes: Vec<String>,

    /// Request timeout. There is no per-call override.
    pub request_timeout: Duration,

    /// Connection timeout.
    pub connect_timeout: Duration,
}

impl Config {
    /// Create a configuration for the given client id and secret, with
    /// defaults for everything else.
    #[must_use]
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            ..Self::default()
        }
    }

    /// Create a test configuration pointed at a mock server, with short
    /// timeouts. `base_url` is e.g. a wiremock server URI.
    #[must_use]
    pub fn for_testing(base_url: &str) -> Self {
        let host = base_url
            .strip_prefix("http://")
            .or_else(|| base_url.strip_prefix("https://"))
            .unwrap_or(base_url)
            .trim_end_matches('/')
            .to_string();

        Self {
            client_id: "test-client".to_string(),
            client_secret: "test-secret".to_string(),
            scheme: defaults::SCHEME.to_string(),
            host,
            uaa_endpoint: defaults::UAA_ENDPOINT.to_string(),
            redirect_url: defaults::REDIRECT_URL.to_string(),
            scopes: Vec::new(),
            request_timeout: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(2),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            client_id: defaults::CLIENT_ID.to_string(),
            client_secret: defaults::CLIENT_SECRET.to_string(),
            scheme: defaults::SCHEME.to_string(),
            host: defaults::HOST.to_string(),
            uaa_endpoint: defaults::UAA_ENDPOINT.to_string(),
            redirect_url: defaults::REDIRECT_URL.to_string(),
            scopes: Vec::new(),
            request_timeout: defaults::REQUEST_TIMEOUT,
            connect_timeout: defaults::CONNECT_TIMEOUT,
        }
    }
}
