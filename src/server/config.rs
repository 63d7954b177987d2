use std::str::FromStr;

use crate::server::error::config::ConfigError;

fn required(name: &str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingVar(name.to_string()))
}

fn optional(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}

fn parsed_or<T: FromStr>(name: &str, default: T) -> Result<T, ConfigError> {
    match optional(name) {
        Some(value) => value.parse().map_err(|_| ConfigError::InvalidVar {
            name: name.to_string(),
            value,
        }),
        None => Ok(default),
    }
}

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    /// User agent sent with every ESI request, per CCP's developer guidelines
    pub user_agent: String,
    /// Pre-issued ESI access token; an external auth component keeps it fresh
    pub esi_access_token: Option<String>,
    /// Webhook for the operator audience (pilots flying the freight)
    pub operator_webhook_url: Option<String>,
    /// Webhook for the customer audience (members who issued contracts)
    pub customer_webhook_url: Option<String>,
    /// Optional mention prepended to operator notifications, e.g. "@here"
    pub mention_prefix: Option<String>,
    /// Attach the service thumbnail to outgoing embeds
    pub use_branding: bool,
    /// Customer notifications are suppressed for contracts whose status has not
    /// changed within this window
    pub stale_after_hours: i64,
    /// Global percentage modifier applied to every rule's per-volume rate
    pub price_per_volume_modifier_percent: f64,
    /// Cron expression for the periodic contract sync
    pub sync_cron: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            database_url: required("DATABASE_URL")?,
            user_agent: required("ESI_USER_AGENT")?,
            esi_access_token: optional("ESI_ACCESS_TOKEN"),
            operator_webhook_url: optional("OPERATOR_WEBHOOK_URL"),
            customer_webhook_url: optional("CUSTOMER_WEBHOOK_URL"),
            mention_prefix: optional("MENTION_PREFIX"),
            use_branding: parsed_or("USE_BRANDING", true)?,
            stale_after_hours: parsed_or("STALE_AFTER_HOURS", 24)?,
            price_per_volume_modifier_percent: parsed_or("PRICE_PER_VOLUME_MODIFIER_PERCENT", 0.0)?,
            sync_cron: optional("SYNC_CRON").unwrap_or_else(|| "0 */10 * * * *".to_string()),
        })
    }
}
