//! UAA OAuth2/OIDC client
//!
//! Client library for UAA-style identity services: acquires tokens through
//! the authorization-code and password-credentials grants, validates them
//! against the remote introspection endpoint, manages OAuth2 client
//! registrations over REST, and reads JWT access-token claims.
//!
//! # Security
//!
//! Claims parsing is **unverified** by design - the operations are named
//! `unsafe_*` to keep that visible at every call site. Parsed claims are
//! for introspecting a token you already trust (expiry, username, scopes),
//! never for authorization decisions. Validate tokens with
//! [`UaaClient::valid_token`] or verify signatures independently.
//!
//! # Example
//!
//! ```no_run
//! use uaa_client::{Config, UaaClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), uaa_client::UaaError> {
//!     let config = Config::new("my-app", "my-secret");
//!     let uaa = UaaClient::new(config)?;
//!
//!     let mut token = uaa.password_credentials_token("marissa", "koala").await?;
//!     token.unsafe_parse_claims()?;
//!
//!     uaa.valid_token(&token).await?;
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod session;

pub use client::UaaClient;
pub use client::registrations::{Clients, CreateOutcome};
pub use config::Config;
pub use error::{HeaderTokenError, UaaError, UaaResult};
pub use models::{Claims, ClientRegistration, Token, token_from_header, unsafe_decode_claims};
pub use session::{Session, read_session};
