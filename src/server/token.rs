//! Access-token port for authenticated ESI calls.
//!
//! Token acquisition and refresh live outside this service. The sync only needs a
//! valid bearer token for the configured character, or a typed failure it can
//! record on the handler.

use async_trait::async_trait;

use crate::server::error::token::TokenError;

/// Scopes the sync credential must carry.
pub const REQUIRED_SCOPES: [&str; 2] = [
    "esi-contracts.read_corporation_contracts.v1",
    "esi-universe.read_structures.v1",
];

#[async_trait]
pub trait AccessTokenProvider: Send + Sync {
    /// Returns a valid bearer token for the character, or a typed failure.
    async fn access_token(&self, character_id: i64) -> Result<String, TokenError>;
}

/// Provider backed by a pre-issued token from the environment. Suitable for
/// deployments where an external auth component keeps the token fresh on disk.
pub struct StaticTokenProvider {
    token: Option<String>,
}

impl StaticTokenProvider {
    pub fn new(token: Option<String>) -> Self {
        Self { token }
    }
}

#[async_trait]
impl AccessTokenProvider for StaticTokenProvider {
    async fn access_token(&self, character_id: i64) -> Result<String, TokenError> {
        match &self.token {
            Some(token) if !token.is_empty() => Ok(token.clone()),
            _ => Err(TokenError::Missing(character_id)),
        }
    }
}
