//! Error types for the UAA client.
//!
//! Uses `thiserror` for structured error handling with automatic `From` implementations.
//! Not-found and "absent" conditions get their own variants so callers can branch on
//! them without string-matching protocol failures.

use crate::models::Token;

/// Errors from the UAA client.
#[derive(thiserror::Error, Debug)]
pub enum UaaError {
    /// HTTP transport error (connection, DNS, TLS, timeout, body read)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body exceeded the read limit. Treated as a transport
    /// failure, never as a parse failure.
    #[error("Response body larger than {limit} bytes")]
    ResponseTooLarge {
        /// Maximum number of body bytes read per response
        limit: usize,
    },

    /// Configuration is missing a client id
    #[error("Client id must not be empty")]
    MissingClientId,

    /// Configuration carries a scheme other than http or https
    #[error("Unknown protocol scheme: [{scheme}]")]
    UnsupportedScheme {
        /// The rejected scheme
        scheme: String,
    },

    /// Access token is not a well-formed signed JWT
    #[error("Cannot parse token: {reason}")]
    MalformedJwt {
        /// What made the token unparseable
        reason: String,
    },

    /// Access token looks like an encrypted JWT, which this client cannot read
    #[error("Encrypted tokens are not supported")]
    EncryptedTokenUnsupported,

    /// Token endpoint refused the grant request
    #[error("Token endpoint returned {status}: {message}")]
    TokenEndpoint {
        /// HTTP status code
        status: u16,
        /// Server-provided detail, or the raw body
        message: String,
    },

    /// Identity service rejected the token during introspection (400)
    #[error("Invalid token: {reason}")]
    InvalidToken {
        /// `error_description` from the server, or a generic fallback
        reason: String,
    },

    /// Identity service rejected the client's basic-auth credentials (401)
    #[error("Failed to decode basic authentication token")]
    BadCredentials,

    /// Introspection failed with an unexpected status
    #[error("Error validating token. Status {status}. Resp: {body}")]
    ValidationFailed {
        /// HTTP status code
        status: u16,
        /// Raw response body
        body: String,
    },

    /// Identity service rejected the request as invalid (400)
    #[error("Invalid request: {message}")]
    BadRequest {
        /// Response body detail
        message: String,
    },

    /// Requested resource does not exist (404)
    #[error("{resource} not found")]
    NotFound {
        /// Description of the missing resource
        resource: String,
    },

    /// No session cookie on the inbound request
    #[error("Session cookie not found")]
    SessionNotFound,

    /// JSON (de)serialization error
    #[error("Failed to parse response: {0}")]
    Json(#[from] serde_json::Error),

    /// A constructed URL was invalid
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// A value could not be used as an HTTP header
    #[error("Invalid header value: {0}")]
    Header(#[from] http::header::InvalidHeaderValue),

    /// An `http` response could not be assembled
    #[error("Cannot build response: {0}")]
    Response(#[from] http::Error),

    /// Unexpected HTTP status
    #[error("Unexpected status {status}: {message}")]
    UnexpectedStatus {
        /// HTTP status code
        status: u16,
        /// Response body or message
        message: String,
    },
}

impl UaaError {
    /// Create a malformed-JWT error.
    #[must_use]
    pub fn malformed_jwt(reason: impl Into<String>) -> Self {
        Self::MalformedJwt { reason: reason.into() }
    }

    /// Create a not-found error.
    #[must_use]
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound { resource: resource.into() }
    }

    /// Create a bad-request error.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest { message: message.into() }
    }

    /// Create an unexpected-status error.
    #[must_use]
    pub fn unexpected_status(status: u16, message: impl Into<String>) -> Self {
        Self::UnexpectedStatus { status, message: message.into() }
    }

    /// Returns true for "the thing does not exist" conditions, as opposed
    /// to transport or protocol failures.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::SessionNotFound)
    }
}

/// Failure extracting a bearer token from an `Authorization` header.
///
/// This error only exists when a header was found, so every variant implies
/// "header present". The absent-header case is `Ok(None)` from
/// [`crate::models::token_from_header`].
#[derive(thiserror::Error, Debug)]
pub enum HeaderTokenError {
    /// Header present but the value does not start with exactly `"Bearer "`
    #[error("Token type is not a Bearer")]
    NotBearer,

    /// Bearer token found but its claims could not be parsed. Carries the
    /// partially constructed token so callers can still forward it.
    #[error("Cannot parse bearer token claims: {source}")]
    Claims {
        /// Token built from the header value, claims unpopulated
        token: Box<Token>,
        /// The underlying parse failure
        #[source]
        source: UaaError,
    },
}

impl HeaderTokenError {
    /// Whether an `Authorization` header was found. Always true: the
    /// missing-header case is not an error.
    #[must_use]
    pub fn header_present(&self) -> bool {
        true
    }

    /// The partially constructed token, when claims parsing was what failed.
    #[must_use]
    pub fn partial_token(&self) -> Option<&Token> {
        match self {
            Self::NotBearer => None,
            Self::Claims { token, .. } => Some(token),
        }
    }
}

/// Result type alias for UAA client operations.
pub type UaaResult<T> = Result<T, UaaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_classification() {
        assert!(UaaError::not_found("client c1").is_not_found());
        assert!(UaaError::SessionNotFound.is_not_found());

        assert!(!UaaError::bad_request("nope").is_not_found());
        assert!(!UaaError::BadCredentials.is_not_found());
    }

    #[test]
    fn test_error_messages_carry_detail() {
        let err = UaaError::InvalidToken { reason: "token expired".into() };
        assert!(err.to_string().contains("token expired"));

        let err = UaaError::unexpected_status(502, "bad gateway");
        assert!(err.to_string().contains("502"));
    }

    #[test]
    fn test_header_error_always_means_header_present() {
        assert!(HeaderTokenError::NotBearer.header_present());
        assert!(HeaderTokenError::NotBearer.partial_token().is_none());
    }
}
