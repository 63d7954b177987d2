//! Minimal typed client for the EVE Online ESI endpoints the freight sync uses:
//! corporation contracts (paginated via the `x-pages` header), station and
//! structure details, and character/corporation info.

pub mod model;

use serde::de::DeserializeOwned;

use crate::server::error::esi::EsiError;
use model::{EsiCharacter, EsiContract, EsiCorporation, EsiStation, EsiStructure};

/// Production ESI base URL.
pub const ESI_BASE_URL: &str = "https://esi.evetech.net/latest";

const PAGES_HEADER: &str = "x-pages";

/// One page of corporation contracts plus the total page count reported by ESI.
#[derive(Debug)]
pub struct ContractsPage {
    pub contracts: Vec<EsiContract>,
    pub pages: u32,
}

#[derive(Clone)]
pub struct EsiClient {
    http: reqwest::Client,
    base_url: String,
}

impl EsiClient {
    /// Client against the production ESI cluster.
    pub fn new(user_agent: &str) -> Result<Self, EsiError> {
        Self::with_base_url(user_agent, ESI_BASE_URL)
    }

    /// Client against an arbitrary base URL. Tests point this at a mock server.
    pub fn with_base_url(user_agent: &str, base_url: &str) -> Result<Self, EsiError> {
        let http = reqwest::Client::builder().user_agent(user_agent).build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get(
        &self,
        path: &str,
        token: Option<&str>,
    ) -> Result<reqwest::Response, EsiError> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.http.get(&url);

        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(EsiError::Status {
                status,
                path: path.to_string(),
            });
        }

        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        token: Option<&str>,
    ) -> Result<T, EsiError> {
        Ok(self.get(path, token).await?.json().await?)
    }

    /// Fetches one page of the corporation's contracts. The total page count is
    /// read from the `x-pages` response header; a missing header means a single
    /// page.
    pub async fn get_corporation_contracts(
        &self,
        corporation_id: i64,
        token: &str,
        page: u32,
    ) -> Result<ContractsPage, EsiError> {
        let path = format!("/corporations/{corporation_id}/contracts/?page={page}");
        let response = self.get(&path, Some(token)).await?;

        let pages = response
            .headers()
            .get(PAGES_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.parse::<u32>().ok())
            .unwrap_or(1);

        let contracts = response.json().await?;

        Ok(ContractsPage { contracts, pages })
    }

    pub async fn get_station(&self, station_id: i64) -> Result<EsiStation, EsiError> {
        self.get_json(&format!("/universe/stations/{station_id}/"), None)
            .await
    }

    /// Structure details require a token with docking access; ESI answers 403
    /// otherwise, which the resolver turns into a placeholder location.
    pub async fn get_structure(
        &self,
        structure_id: i64,
        token: &str,
    ) -> Result<EsiStructure, EsiError> {
        self.get_json(&format!("/universe/structures/{structure_id}/"), Some(token))
            .await
    }

    pub async fn get_character(&self, character_id: i64) -> Result<EsiCharacter, EsiError> {
        self.get_json(&format!("/characters/{character_id}/"), None)
            .await
    }

    pub async fn get_corporation(&self, corporation_id: i64) -> Result<EsiCorporation, EsiError> {
        self.get_json(&format!("/corporations/{corporation_id}/"), None)
            .await
    }
}
