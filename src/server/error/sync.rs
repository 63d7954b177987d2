use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("no contract handler is installed")]
    HandlerNotInstalled,
    /// Overlapping sync triggers for the same handler are rejected, not interleaved.
    #[error("a contract sync is already running")]
    AlreadyRunning,
    /// A courier contract payload is missing a field courier contracts must carry.
    #[error("contract {contract_id} is missing required field {field}")]
    MissingField { contract_id: i64, field: &'static str },
    #[error("contract {contract_id} has unrecognized status {status:?}")]
    UnknownStatus { contract_id: i64, status: String },
}
