use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing environment variable: {0}")]
    MissingVar(String),
    #[error("invalid value {value:?} for environment variable {name}")]
    InvalidVar { name: String, value: String },
}
