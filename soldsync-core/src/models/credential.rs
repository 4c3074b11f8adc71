//! Marketplace access credentials.
//!
//! A [`Credential`] is loaded once from the credential store and is
//! read-only for the lifetime of a run. The bearer token is never rendered
//! by `Debug` or `Display`.

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Credential Id
// ============================================================================

/// Row identifier of a credential in the credential store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CredentialId(pub u32);

impl fmt::Display for CredentialId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for CredentialId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

// ============================================================================
// Credential
// ============================================================================

/// A bearer token bound to the account that owns it.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    id: CredentialId,
    owner: String,
    token: String,
}

impl Credential {
    /// Creates a credential.
    pub fn new(id: impl Into<CredentialId>, owner: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            owner: owner.into(),
            token: token.into(),
        }
    }

    /// Store row id.
    pub fn id(&self) -> CredentialId {
        self.id
    }

    /// Human label of the account that owns the token.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Raw bearer token.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Value for the `Authorization` header.
    pub fn bearer_header(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("id", &self.id)
            .field("owner", &self.owner)
            .field("token", &"<redacted>")
            .finish()
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (#{})", self.owner, self.id)
    }
}
