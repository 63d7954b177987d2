use thiserror::Error;

/// Typed failure from the access-token provider. Token acquisition and refresh
/// happen outside this service; it only ever sees a usable bearer token or one
/// of these.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    #[error("no access token is stored for character {0}")]
    Missing(i64),
    #[error("the access token for character {0} has expired")]
    Expired(i64),
    #[error("the access token for character {0} is invalid or lacks required scopes")]
    Invalid(i64),
}
