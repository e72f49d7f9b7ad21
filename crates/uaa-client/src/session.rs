//! Session correlation via the `JSESSIONID` cookie.
//!
//! Sessions here are naming-convention only: an opaque identifier on a
//! cookie, with no server-side session store. Persistence, expiry and
//! invalidation are all the caller's responsibility.

use http::{HeaderMap, header};

use crate::client::UaaClient;
use crate::config::defaults;
use crate::error::{UaaError, UaaResult};

/// A correlation session: an opaque identifier and the `Set-Cookie` header
/// value carrying it.
#[derive(Debug, Clone)]
pub struct Session {
    /// `<uuid>.<client id>` correlation handle.
    pub id: String,

    /// Complete `Set-Cookie` value for the response.
    pub cookie: String,
}

impl Session {
    /// Append this session's cookie to a response's headers.
    pub fn apply(&self, headers: &mut HeaderMap) -> UaaResult<()> {
        headers.append(header::SET_COOKIE, self.cookie.parse()?);
        Ok(())
    }
}

impl UaaClient {
    /// Create a new session cookie scoped to the configured redirect path
    /// and the inbound request's host.
    ///
    /// The identifier is a random UUID suffixed with this client's id, so
    /// cookies from different registered clients stay distinguishable.
    #[must_use]
    pub fn create_session(&self, request_host: &str) -> Session {
        let id = format!("{}.{}", uuid::Uuid::new_v4(), self.config().client_id);

        let cookie = format!(
            "{}={id}; Path={}; Domain={request_host}; HttpOnly",
            defaults::SESSION_COOKIE,
            self.config().redirect_url,
        );

        tracing::debug!(client_id = %self.config().client_id, "Created session cookie");

        Session { id, cookie }
    }
}

/// Read the session identifier from an inbound request's `Cookie` headers.
///
/// # Errors
///
/// [`UaaError::SessionNotFound`] when no `JSESSIONID` cookie is present.
pub fn read_session(headers: &HeaderMap) -> UaaResult<String> {
    for value in headers.get_all(header::COOKIE) {
        let Ok(cookies) = value.to_str() else { continue };
        for pair in cookies.split(';') {
            if let Some((name, value)) = pair.trim().split_once('=') {
                if name == defaults::SESSION_COOKIE {
                    return Ok(value.to_string());
                }
            }
        }
    }

    Err(UaaError::SessionNotFound)
}
