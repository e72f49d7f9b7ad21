//! Access token wrapper and unverified JWT claims parsing.
//!
//! # Trust boundary
//!
//! Claims in this module are decoded **without verifying the JWT signature**.
//! They exist for ergonomic introspection of a token the caller already
//! trusts - reading expiry, username or scopes for display and bookkeeping.
//! Never use them as an authorization source of truth: anyone can mint a
//! token with arbitrary claims. Authorization decisions belong behind
//! [`crate::UaaClient::valid_token`] or an independent signature check.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Duration, Utc};
use http::{HeaderMap, header};
use serde::Deserialize;

use crate::error::{HeaderTokenError, UaaError, UaaResult};

/// Number of dot-separated segments in a signed JWT (JWS compact form).
const SIGNED_SEGMENTS: usize = 3;

/// Number of dot-separated segments in an encrypted JWT (JWE compact form).
const ENCRYPTED_SEGMENTS: usize = 5;

/// An OAuth2 access/refresh token pair plus best-effort-parsed claims.
///
/// Owned exclusively by the caller once returned; this crate never persists
/// tokens.
#[derive(Debug, Clone)]
pub struct Token {
    /// The access token, usually a signed JWT.
    pub access_token: String,

    /// Token type reported by the server, e.g. `bearer`.
    pub token_type: String,

    /// Refresh token, when the grant produced one.
    pub refresh_token: Option<String>,

    /// Expiry timestamp, from the token response or the parsed claims.
    pub expiry: Option<DateTime<Utc>>,

    /// Decoded claims. Populated by [`Token::unsafe_parse_claims`]; unverified.
    pub claims: Option<Claims>,
}

/// Decoded JWT claims body.
///
/// All values are **unverified** - see the module docs. Missing fields
/// default to empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Claims {
    /// JWT id, unique per token.
    #[serde(default)]
    pub jti: String,

    /// Time the token was issued.
    #[serde(default, rename = "iat", with = "chrono::serde::ts_seconds_option")]
    pub issued_at: Option<DateTime<Utc>>,

    /// Time the token expires.
    #[serde(default, rename = "exp", with = "chrono::serde::ts_seconds_option")]
    pub expires_at: Option<DateTime<Utc>>,

    /// Issuer that created and signed the token.
    #[serde(default)]
    pub iss: String,

    /// Identity zone id, used in multi-tenant deployments.
    #[serde(default)]
    pub zid: String,

    /// Identity provider that authenticated the end user.
    #[serde(default)]
    pub origin: String,

    /// Canonical username of the end user.
    #[serde(default)]
    pub user_name: String,

    /// Email address of the end user.
    #[serde(default)]
    pub email: String,

    /// Subject the token refers to.
    #[serde(default)]
    pub sub: String,

    /// Scopes granted to this access token.
    #[serde(default)]
    pub scope: Vec<String>,

    /// Authorities granted to the client.
    #[serde(default)]
    pub authorities: Vec<String>,

    /// Client that requested the token.
    #[serde(default)]
    pub client_id: String,

    /// Authorization grant type that produced the token.
    #[serde(default)]
    pub grant_type: String,
}

/// Shape of a token-endpoint success response.
#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    access_token: String,
    token_type: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
}

impl Token {
    pub(crate) fn from_token_response(response: TokenResponse) -> Self {
        // A lifetime outside chrono's representable range yields no expiry
        // rather than a panic; expires_in is server-controlled input.
        let expiry = response
            .expires_in
            .and_then(Duration::try_seconds)
            .and_then(|lifetime| Utc::now().checked_add_signed(lifetime));

        Self {
            access_token: response.access_token,
            token_type: response.token_type,
            refresh_token: response.refresh_token,
            expiry,
            claims: None,
        }
    }

    /// Decode the access token's JWT claims **without verifying the
    /// signature** and store them in `self.claims`.
    ///
    /// Fails for anything that is not a well-formed signed JWT; encrypted
    /// (JWE) tokens are rejected explicitly. Never contacts the network.
    pub fn unsafe_parse_claims(&mut self) -> UaaResult<&Claims> {
        let claims = unsafe_decode_claims(&self.access_token)?;
        Ok(self.claims.insert(claims))
    }

    /// `Authorization` header value carrying this token as a bearer.
    #[must_use]
    pub fn authorization_header(&self) -> String {
        format!("Bearer {}", self.access_token)
    }

    /// Set this token as the `Authorization: Bearer` header.
    ///
    /// Errors only if the access token contains bytes not allowed in a
    /// header value.
    pub fn apply_auth_header(&self, headers: &mut HeaderMap) -> UaaResult<()> {
        headers.insert(header::AUTHORIZATION, self.authorization_header().parse()?);
        Ok(())
    }

    /// Whether the token's expiry (if known) is in the past.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.expiry.is_some_and(|exp| exp <= Utc::now())
    }
}

/// Decode the claims body of a signed JWT **without verifying the signature**.
///
/// See the module docs for the trust boundary this implies.
pub fn unsafe_decode_claims(access_token: &str) -> UaaResult<Claims> {
    let segments: Vec<&str> = access_token.split('.').collect();
    match segments.len() {
        SIGNED_SEGMENTS => {}
        ENCRYPTED_SEGMENTS => return Err(UaaError::EncryptedTokenUnsupported),
        n => {
            return Err(UaaError::malformed_jwt(format!(
                "expected {SIGNED_SEGMENTS} segments, found {n}"
            )));
        }
    }

    let header_bytes = URL_SAFE_NO_PAD
        .decode(segments[0])
        .map_err(|e| UaaError::malformed_jwt(format!("header is not base64url: {e}")))?;
    let jose_header: serde_json::Value = serde_json::from_slice(&header_bytes)
        .map_err(|e| UaaError::malformed_jwt(format!("header is not JSON: {e}")))?;

    // JWE compact form also has 5 segments, but a header carrying "enc" is
    // the reliable marker for encrypted content.
    if jose_header.get("enc").is_some() {
        return Err(UaaError::EncryptedTokenUnsupported);
    }

    let payload = URL_SAFE_NO_PAD
        .decode(segments[1])
        .map_err(|e| UaaError::malformed_jwt(format!("payload is not base64url: {e}")))?;

    serde_json::from_slice(&payload)
        .map_err(|e| UaaError::malformed_jwt(format!("cannot parse token payload: {e}")))
}

/// Extract a bearer [`Token`] from an inbound request's `Authorization` header.
///
/// Tri-state contract:
/// - no header → `Ok(None)`, no error;
/// - header present but not exactly `"Bearer "`-prefixed (case-sensitive) →
///   [`HeaderTokenError::NotBearer`];
/// - bearer token whose claims fail to parse →
///   [`HeaderTokenError::Claims`] carrying the partially constructed token;
/// - otherwise `Ok(Some(token))` with `expiry` taken from the (unverified)
///   claims.
pub fn token_from_header(headers: &HeaderMap) -> Result<Option<Token>, HeaderTokenError> {
    let Some(value) = headers.get(header::AUTHORIZATION) else {
        return Ok(None);
    };

    let Some(raw) = value.to_str().ok().and_then(|v| v.strip_prefix("Bearer ")) else {
        return Err(HeaderTokenError::NotBearer);
    };

    let mut token = Token {
        access_token: raw.to_string(),
        token_type: "bearer".to_string(),
        refresh_token: None,
        expiry: None,
        claims: None,
    };

    if let Err(source) = token.unsafe_parse_claims() {
        return Err(HeaderTokenError::Claims { token: Box::new(token), source });
    }

    token.expiry = token.claims.as_ref().and_then(|c| c.expires_at);

    Ok(Some(token))
}
