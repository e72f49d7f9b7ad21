//! UAA client: authentication flows, token validation, transport.
//!
//! Every operation is a single synchronous request/response exchange.
//! There is no retry, no backoff, and no caching of results anywhere in
//! this client; a network failure propagates immediately.

pub mod registrations;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use futures::StreamExt;
use http::{HeaderMap, StatusCode, Uri, header};
use serde::Deserialize;
use url::Url;

use crate::config::{Config, defaults};
use crate::error::{UaaError, UaaResult};
use crate::models::{Token, TokenResponse};

/// Client for a UAA-style OAuth2/OIDC identity service.
///
/// Holds only immutable state after construction, so a single instance is
/// safe to share across concurrent callers.
#[derive(Clone)]
pub struct UaaClient {
    /// Plain HTTP client; retries are deliberately absent.
    http: reqwest::Client,

    config: Config,

    /// `{scheme}://{host}`
    uri: String,

    /// `{scheme}://{host}{uaa_endpoint}`
    uaa_uri: String,
}

/// Error detail shape shared by the token and introspection endpoints.
#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error_description: String,
}

impl UaaClient {
    /// Create a new client, validating and completing the configuration.
    ///
    /// An empty `client_secret` is replaced with a random UUID; an empty
    /// `scheme` defaults to `http`.
    ///
    /// # Errors
    ///
    /// [`UaaError::MissingClientId`] for an empty client id,
    /// [`UaaError::UnsupportedScheme`] for schemes other than `http`/`https`,
    /// or a transport error if the HTTP client cannot be initialized.
    pub fn new(mut config: Config) -> UaaResult<Self> {
        if config.client_id.is_empty() {
            return Err(UaaError::MissingClientId);
        }

        if config.client_secret.is_empty() {
            config.client_secret = uuid::Uuid::new_v4().to_string();
            tracing::debug!(client_id = %config.client_id, "Generated random client secret");
        }

        if config.scheme.is_empty() {
            config.scheme = defaults::SCHEME.to_string();
        }

        if config.scheme != "http" && config.scheme != "https" {
            return Err(UaaError::UnsupportedScheme { scheme: config.scheme });
        }

        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .build()?;

        let uri = format!("{}://{}", config.scheme, config.host);
        let uaa_uri = format!("{uri}{}", config.uaa_endpoint);

        tracing::debug!(client_id = %config.client_id, uaa_uri = %uaa_uri, "UAA client ready");

        Ok(Self { http, config, uri, uaa_uri })
    }

    /// The configuration this client was built with.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Build the authorization-code URL for `{uaa}/authorize`.
    ///
    /// `state` is the caller's opaque anti-forgery value; the caller stores
    /// and later validates it. `extra` parameters are appended verbatim.
    pub fn authorize_url(&self, state: &str, extra: &[(&str, &str)]) -> UaaResult<Url> {
        let mut url = Url::parse(&format!("{}{}", self.uaa_uri, defaults::AUTHORIZE_PATH))?;

        {
            let mut query = url.query_pairs_mut();
            query.append_pair("response_type", "code");
            query.append_pair("client_id", &self.config.client_id);
            query.append_pair("redirect_uri", &self.config.redirect_url);
            if !self.config.scopes.is_empty() {
                query.append_pair("scope", &self.config.scopes.join(" "));
            }
            query.append_pair("state", state);
            for (key, value) in extra {
                query.append_pair(key, value);
            }
        }

        Ok(url)
    }

    /// A `302 Found` response sending the browser into the
    /// authorization-code flow. Framework-agnostic; convert the returned
    /// parts into your server's response type.
    pub fn auth_redirect(&self, state: &str) -> UaaResult<http::Response<()>> {
        let url = self.authorize_url(state, &[])?;
        Ok(http::Response::builder()
            .status(StatusCode::FOUND)
            .header(header::LOCATION, url.as_str())
            .body(())?)
    }

    /// Read the one-time `code` query parameter from an authorization
    /// callback request.
    #[must_use]
    pub fn code_from_request(uri: &Uri) -> Option<String> {
        let query = uri.query()?;
        url::form_urlencoded::parse(query.as_bytes())
            .find(|(key, _)| key == "code")
            .map(|(_, value)| value.into_owned())
    }

    /// Exchange resource-owner password credentials for a [`Token`].
    ///
    /// Client credentials travel in the form body, matching the UAA
    /// token-endpoint auth style.
    pub async fn password_credentials_token(
        &self,
        username: &str,
        password: &str,
    ) -> UaaResult<Token> {
        let scope = self.config.scopes.join(" ");
        let mut params = vec![
            ("grant_type", "password"),
            ("username", username),
            ("password", password),
            ("client_id", &self.config.client_id),
            ("client_secret", &self.config.client_secret),
        ];
        if !scope.is_empty() {
            params.push(("scope", scope.as_str()));
        }

        self.request_token(&params).await
    }

    /// Exchange a one-time authorization code for a [`Token`]. `extra`
    /// parameters (e.g. a PKCE verifier) are appended to the grant request.
    pub async fn code_token(&self, code: &str, extra: &[(&str, &str)]) -> UaaResult<Token> {
        let mut params = vec![
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", &self.config.redirect_url),
            ("client_id", &self.config.client_id),
            ("client_secret", &self.config.client_secret),
        ];
        params.extend_from_slice(extra);

        self.request_token(&params).await
    }

    /// Validate a token against the identity service's `/check_token`
    /// introspection endpoint, authenticated with this client's basic-auth
    /// credentials.
    ///
    /// Every call re-contacts the identity service; results are never
    /// cached.
    ///
    /// # Errors
    ///
    /// [`UaaError::InvalidToken`] when the server rejects the token (400),
    /// [`UaaError::BadCredentials`] when it rejects this client's
    /// credentials (401), [`UaaError::ValidationFailed`] for any other
    /// non-200 status.
    pub async fn valid_token(&self, token: &Token) -> UaaResult<()> {
        let url = format!("{}{}", self.uri, defaults::CHECK_TOKEN_PATH);

        let response = self
            .http
            .post(&url)
            .form(&[("token", token.access_token.as_str())])
            .basic_auth(&self.config.client_id, Some(&self.config.client_secret))
            .send()
            .await?;

        let (status, body) = Self::read_body(response).await?;

        match status {
            StatusCode::OK => Ok(()),
            StatusCode::BAD_REQUEST => {
                tracing::debug!(client_id = %self.config.client_id, "Token rejected by check_token");
                match serde_json::from_slice::<ErrorBody>(&body) {
                    Ok(detail) if !detail.error_description.is_empty() => {
                        Err(UaaError::InvalidToken { reason: detail.error_description })
                    }
                    _ => Err(UaaError::InvalidToken { reason: "could not verify token".to_string() }),
                }
            }
            StatusCode::UNAUTHORIZED => Err(UaaError::BadCredentials),
            _ => Err(UaaError::ValidationFailed {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            }),
        }
    }

    /// `Authorization: Basic` value for this client's id/secret pair, for
    /// callers authenticating their own requests against the identity
    /// service.
    #[must_use]
    pub fn basic_authorization(&self) -> String {
        let credentials = format!("{}:{}", self.config.client_id, self.config.client_secret);
        format!("Basic {}", STANDARD.encode(credentials))
    }

    /// Set this client's basic-auth credentials as the `Authorization`
    /// header.
    pub fn apply_basic_auth(&self, headers: &mut HeaderMap) -> UaaResult<()> {
        headers.insert(header::AUTHORIZATION, self.basic_authorization().parse()?);
        Ok(())
    }

    /// POST a grant request to `{uaa}/token` and decode the response.
    async fn request_token(&self, params: &[(&str, &str)]) -> UaaResult<Token> {
        let url = format!("{}{}", self.uaa_uri, defaults::TOKEN_PATH);

        let response = self.http.post(&url).form(params).send().await?;
        let (status, body) = Self::read_body(response).await?;

        if !status.is_success() {
            let message = match serde_json::from_slice::<ErrorBody>(&body) {
                Ok(detail) if !detail.error_description.is_empty() => detail.error_description,
                _ => String::from_utf8_lossy(&body).into_owned(),
            };
            tracing::debug!(status = status.as_u16(), "Token endpoint refused grant");
            return Err(UaaError::TokenEndpoint { status: status.as_u16(), message });
        }

        let parsed: TokenResponse = serde_json::from_slice(&body)?;
        Ok(Token::from_token_response(parsed))
    }

    /// Read a response body, bounded to
    /// [`defaults::MAX_RESPONSE_BYTES`]. Exceeding the bound is a transport
    /// error, not a parse error.
    pub(crate) async fn read_body(response: reqwest::Response) -> UaaResult<(StatusCode, Vec<u8>)> {
        let limit = defaults::MAX_RESPONSE_BYTES;
        let status = response.status();

        if response.content_length().is_some_and(|len| len > limit as u64) {
            return Err(UaaError::ResponseTooLarge { limit });
        }

        let mut body = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            if body.len() + chunk.len() > limit {
                return Err(UaaError::ResponseTooLarge { limit });
            }
            body.extend_from_slice(&chunk);
        }

        Ok((status, body))
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub(crate) fn uaa_uri(&self) -> &str {
        &self.uaa_uri
    }
}

impl std::fmt::Debug for UaaClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // client_secret stays out of debug output
        f.debug_struct("UaaClient")
            .field("client_id", &self.config.client_id)
            .field("uaa_uri", &self.uaa_uri)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_empty_client_id() {
        let config = Config { client_id: String::new(), ..Config::default() };
        assert!(matches!(UaaClient::new(config), Err(UaaError::MissingClientId)));
    }

    #[test]
    fn test_new_rejects_unknown_scheme() {
        let config = Config { scheme: "ftp".to_string(), ..Config::default() };
        let err = UaaClient::new(config).unwrap_err();
        assert!(matches!(err, UaaError::UnsupportedScheme { scheme } if scheme == "ftp"));
    }

    #[test]
    fn test_new_generates_secret_when_empty() {
        let config = Config { client_secret: String::new(), ..Config::default() };
        let client = UaaClient::new(config).unwrap();
        assert!(!client.config().client_secret.is_empty());
    }

    #[test]
    fn test_new_defaults_empty_scheme_to_http() {
        let config = Config { scheme: String::new(), ..Config::default() };
        let client = UaaClient::new(config).unwrap();
        assert_eq!(client.config().scheme, "http");
        assert!(client.uaa_uri().starts_with("http://localhost"));
    }

    #[test]
    fn test_authorize_url_parameters() {
        let config = Config {
            scopes: vec!["openid".to_string(), "uaa.user".to_string()],
            ..Config::default()
        };
        let client = UaaClient::new(config).unwrap();

        let url = client.authorize_url("xyzzy", &[("prompt", "none")]).unwrap();
        assert_eq!(url.path(), "/oauth/authorize");

        let pairs: Vec<(String, String)> =
            url.query_pairs().map(|(k, v)| (k.into_owned(), v.into_owned())).collect();
        assert!(pairs.contains(&("response_type".to_string(), "code".to_string())));
        assert!(pairs.contains(&("client_id".to_string(), "oauthClient".to_string())));
        assert!(pairs.contains(&("redirect_uri".to_string(), "/".to_string())));
        assert!(pairs.contains(&("scope".to_string(), "openid uaa.user".to_string())));
        assert!(pairs.contains(&("state".to_string(), "xyzzy".to_string())));
        assert!(pairs.contains(&("prompt".to_string(), "none".to_string())));
    }

    #[test]
    fn test_authorize_url_omits_empty_scope() {
        let client = UaaClient::new(Config::default()).unwrap();
        let url = client.authorize_url("s", &[]).unwrap();
        assert!(url.query_pairs().all(|(k, _)| k != "scope"));
    }

    #[test]
    fn test_auth_redirect_is_302_with_location() {
        let client = UaaClient::new(Config::default()).unwrap();
        let response = client.auth_redirect("state-1").unwrap();

        assert_eq!(response.status(), StatusCode::FOUND);
        let location = response.headers()[header::LOCATION].to_str().unwrap();
        assert!(location.starts_with("http://localhost/oauth/authorize?"));
        assert!(location.contains("state=state-1"));
    }

    #[test]
    fn test_code_from_request() {
        let uri: Uri = "/callback?state=s&code=one-time-code".parse().unwrap();
        assert_eq!(UaaClient::code_from_request(&uri).as_deref(), Some("one-time-code"));

        let uri: Uri = "/callback?state=s".parse().unwrap();
        assert!(UaaClient::code_from_request(&uri).is_none());

        let uri: Uri = "/callback".parse().unwrap();
        assert!(UaaClient::code_from_request(&uri).is_none());
    }

    #[test]
    fn test_basic_authorization_encoding() {
        let client = UaaClient::new(Config::new("app", "secret")).unwrap();
        // base64("app:secret")
        assert_eq!(client.basic_authorization(), "Basic YXBwOnNlY3JldA==");

        let mut headers = HeaderMap::new();
        client.apply_basic_auth(&mut headers).unwrap();
        assert_eq!(headers[header::AUTHORIZATION], "Basic YXBwOnNlY3JldA==");
    }

    #[test]
    fn test_debug_hides_secret() {
        let client = UaaClient::new(Config::new("app", "super-secret")).unwrap();
        let debug = format!("{client:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("app"));
    }
}
