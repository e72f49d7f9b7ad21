//! OAuth2 client registration entity.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// An OAuth2 client descriptor as stored by the identity service.
///
/// Known fields are typed; anything the server sends outside the known
/// schema lands in an extension map and survives a serialize round-trip
/// unchanged, so the entity stays forward-compatible with identity-service
/// schema additions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientRegistration {
    /// Client identifier, unique within an identity zone. Required.
    pub client_id: String,

    /// Grant types this client may use to obtain a token: any of
    /// `authorization_code`, `password`, `implicit`, `client_credentials`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub authorized_grant_types: Vec<String>,

    /// Allowed redirect URI patterns (Ant-style wildcards permitted).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub redirect_uri: Vec<String>,

    /// Scopes allowed for the client. Server defaults to `uaa.none`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub scope: Vec<String>,

    /// Resources the client is allowed access to.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resource_ids: Vec<String>,

    /// Scopes the client is able to grant when creating clients.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub authorities: Vec<String>,

    /// Scopes that do not require user approval. The server accepts either
    /// `true` or a list of scope names, so this stays free-form JSON.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub autoapprove: Option<serde_json::Value>,

    /// Seconds until an issued access token expires.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token_validity: Option<u32>,

    /// Seconds until an issued refresh token expires.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token_validity: Option<u32>,

    /// Origin keys of identity providers the client is limited to.
    /// Empty means any provider is allowed.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allowedproviders: Vec<String>,

    /// Human readable client name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Random string feeding the client's revocation key. Change it to
    /// revoke all active tokens for the client.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_salt: Option<String>,

    /// Scope the bearer token had when the client was created.
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "createdwith")]
    pub created_with: Option<String>,

    /// Group names a user must belong to for tokens to be issued to this
    /// client on their behalf.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required_user_groups: Vec<String>,

    /// Client authentication secret. Space-delimit two secrets to support
    /// rotation. Required for `authorization_code` and `client_credentials`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,

    /// Fields outside the known schema. Merged with the typed fields only
    /// at the serde boundary.
    #[serde(flatten)]
    extra: BTreeMap<String, serde_json::Value>,
}

impl ClientRegistration {
    /// Create a registration for the given client id.
    #[must_use]
    pub fn new(client_id: impl Into<String>) -> Self {
        Self { client_id: client_id.into(), ..Self::default() }
    }

    /// Set a field outside the known schema.
    pub fn set_extra(&mut self, key: impl Into<String>, value: serde_json::Value) {
        self.extra.insert(key.into(), value);
    }

    /// Read a field outside the known schema.
    #[must_use]
    pub fn extra(&self, key: &str) -> Option<&serde_json::Value> {
        self.extra.get(key)
    }

    /// Iterate the fields outside the known schema, in key order.
    pub fn extras(&self) -> impl Iterator<Item = (&str, &serde_json::Value)> {
        self.extra.iter().map(|(k, v)| (k.as_str(), v))
    }
}
