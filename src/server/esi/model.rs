//! Payload models for the ESI endpoints the sync consumes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One contract as returned by `/corporations/{id}/contracts/`.
///
/// `Serialize` is kept so the filtered contract set can be fingerprinted for the
/// nothing-changed short-circuit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EsiContract {
    pub contract_id: i64,
    #[serde(rename = "type")]
    pub contract_type: String,
    pub status: String,
    pub availability: String,
    pub assignee_id: i64,
    /// 0 while the contract is unaccepted
    pub acceptor_id: i64,
    pub issuer_id: i64,
    pub issuer_corporation_id: i64,
    pub start_location_id: Option<i64>,
    pub end_location_id: Option<i64>,
    pub collateral: Option<f64>,
    pub reward: Option<f64>,
    pub volume: Option<f64>,
    pub days_to_complete: Option<i32>,
    pub date_issued: DateTime<Utc>,
    pub date_expired: DateTime<Utc>,
    pub date_accepted: Option<DateTime<Utc>>,
    pub date_completed: Option<DateTime<Utc>>,
    pub title: Option<String>,
    pub for_corporation: Option<bool>,
}

impl EsiContract {
    pub fn is_courier(&self) -> bool {
        self.contract_type == "courier"
    }
}

/// `/universe/stations/{id}/`
#[derive(Debug, Clone, Deserialize)]
pub struct EsiStation {
    pub station_id: i64,
    pub name: String,
    pub system_id: i64,
    pub type_id: i64,
}

/// `/universe/structures/{id}/` (requires docking access)
#[derive(Debug, Clone, Deserialize)]
pub struct EsiStructure {
    pub name: String,
    pub solar_system_id: i64,
    pub type_id: Option<i64>,
    pub owner_id: i64,
}

/// `/characters/{id}/`
#[derive(Debug, Clone, Deserialize)]
pub struct EsiCharacter {
    pub name: String,
    pub corporation_id: i64,
}

/// `/corporations/{id}/`
#[derive(Debug, Clone, Deserialize)]
pub struct EsiCorporation {
    pub name: String,
    pub ticker: String,
    pub alliance_id: Option<i64>,
}
