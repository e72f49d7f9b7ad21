//! CRUD against the identity service's client-registration REST resource.

use http::StatusCode;

use super::UaaClient;
use crate::config::defaults;
use crate::error::{UaaError, UaaResult};
use crate::models::{ClientRegistration, Token};

/// Handle for client-registration operations, borrowed from a [`UaaClient`].
///
/// All operations authenticate with the bearer [`Token`] passed per call.
pub struct Clients<'a> {
    uaa: &'a UaaClient,
}

/// Outcome of [`Clients::create`].
///
/// The identity service's 409-on-create is deliberately not collapsed into
/// an error: the resource exists either way, and whether a conflict counts
/// as success-with-warning or failure is the caller's call. Branch on the
/// variant rather than assuming `Ok` means "newly created".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateOutcome {
    /// The server created the registration (201).
    Created,
    /// A registration with this id already existed (409). The resource
    /// exists, but not with the submitted definition.
    AlreadyExists {
        /// Id of the conflicting registration
        client_id: String,
    },
}

impl UaaClient {
    /// Client-registration operations.
    #[must_use]
    pub fn clients(&self) -> Clients<'_> {
        Clients { uaa: self }
    }
}

impl Clients<'_> {
    /// Register a new OAuth2 client: POST `{uaa}/clients/`.
    pub async fn create(
        &self,
        token: &Token,
        registration: &ClientRegistration,
    ) -> UaaResult<CreateOutcome> {
        let url = format!("{}{}", self.uaa.uaa_uri(), defaults::CLIENTS_PATH);

        let response = self
            .uaa
            .http()
            .post(&url)
            .json(registration)
            .bearer_auth(&token.access_token)
            .send()
            .await?;

        let (status, body) = UaaClient::read_body(response).await?;

        match status {
            StatusCode::CREATED => {
                tracing::info!(client_id = %registration.client_id, "Created client registration");
                Ok(CreateOutcome::Created)
            }
            StatusCode::CONFLICT => {
                tracing::warn!(client_id = %registration.client_id, "Client already exists");
                Ok(CreateOutcome::AlreadyExists { client_id: registration.client_id.clone() })
            }
            StatusCode::BAD_REQUEST => {
                Err(UaaError::bad_request(String::from_utf8_lossy(&body).into_owned()))
            }
            _ => Err(UaaError::unexpected_status(
                status.as_u16(),
                format!("cannot create client {}", registration.client_id),
            )),
        }
    }

    /// Delete a client registration: DELETE `{uaa}/clients/{id}`.
    ///
    /// Returns the raw status code; the identity service's delete responses
    /// vary by version, so interpretation is left to the caller.
    pub async fn delete(&self, token: &Token, client_id: &str) -> UaaResult<StatusCode> {
        let url = format!("{}{}{}", self.uaa.uaa_uri(), defaults::CLIENTS_PATH, client_id);

        let response =
            self.uaa.http().delete(&url).bearer_auth(&token.access_token).send().await?;

        let (status, _) = UaaClient::read_body(response).await?;
        tracing::debug!(client_id = %client_id, status = status.as_u16(), "Deleted client registration");

        Ok(status)
    }

    /// Fetch a client registration: GET `{uaa}/clients/{id}`.
    ///
    /// Unknown response fields are preserved in the registration's
    /// extension map.
    pub async fn get(&self, token: &Token, client_id: &str) -> UaaResult<ClientRegistration> {
        let url = format!("{}{}{}", self.uaa.uaa_uri(), defaults::CLIENTS_PATH, client_id);

        let response = self.uaa.http().get(&url).bearer_auth(&token.access_token).send().await?;

        let (status, body) = UaaClient::read_body(response).await?;

        match status {
            StatusCode::OK => Ok(serde_json::from_slice(&body)?),
            StatusCode::NOT_FOUND => Err(UaaError::not_found(format!("client {client_id}"))),
            _ => Err(UaaError::unexpected_status(
                status.as_u16(),
                format!("cannot fetch client {client_id}"),
            )),
        }
    }
}
