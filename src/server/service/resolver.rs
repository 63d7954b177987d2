//! Resolves EVE entity ids referenced by contracts into locally stored rows.
//!
//! Contracts arrive carrying raw ids for pilots, corporations, and locations.
//! Each id is looked up locally first; only unknown ids cost an ESI round trip,
//! so the first sync is expensive and later syncs are nearly free.

use std::ops::RangeInclusive;

use entity::location::LocationCategory;
use reqwest::StatusCode;
use sea_orm::ConnectionTrait;
use tracing::{debug, warn};

use crate::server::{
    data::{
        eve::{character::CharacterRepository, corporation::CorporationRepository},
        location::LocationRepository,
    },
    error::Error,
    esi::EsiClient,
    service::retry::RetryContext,
};

/// NPC stations live in a fixed id band. Everything outside it is a player
/// structure and needs an authenticated lookup.
pub const STATION_ID_RANGE: RangeInclusive<i64> = 60_000_000..=64_000_000;

/// Whether a resolved row already existed or had to be fetched and stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Found,
    Created,
}

pub struct EntityResolver<'a, C: ConnectionTrait> {
    db: &'a C,
    esi_client: &'a EsiClient,
}

impl<'a, C: ConnectionTrait> EntityResolver<'a, C> {
    pub fn new(db: &'a C, esi_client: &'a EsiClient) -> Self {
        Self { db, esi_client }
    }

    /// Resolves a station or structure id.
    ///
    /// Structures the token cannot dock at come back as 403 from ESI. With
    /// `allow_placeholder` set, that becomes a stored placeholder row so the
    /// contract referencing it still syncs; without it, the error propagates.
    pub async fn resolve_location(
        &self,
        location_id: i64,
        token: &str,
        allow_placeholder: bool,
    ) -> Result<(entity::location::Model, Resolution), Error> {
        let repo = LocationRepository::new(self.db);

        if let Some(existing) = repo.get_by_location_id(location_id).await? {
            return Ok((existing, Resolution::Found));
        }

        if STATION_ID_RANGE.contains(&location_id) {
            let esi_client = self.esi_client;
            let station = RetryContext::new()
                .execute_with_retry(&format!("station lookup {location_id}"), || {
                    let esi_client = esi_client.clone();
                    Box::pin(async move { Ok(esi_client.get_station(location_id).await?) })
                })
                .await?;

            debug!("storing station {location_id} ({})", station.name);
            let created = repo
                .create(
                    location_id,
                    station.name,
                    Some(station.system_id),
                    Some(station.type_id),
                    LocationCategory::Station,
                )
                .await?;

            return Ok((created, Resolution::Created));
        }

        let esi_client = self.esi_client;
        let result = RetryContext::new()
            .execute_with_retry(&format!("structure lookup {location_id}"), || {
                let esi_client = esi_client.clone();
                let token = token.to_string();
                Box::pin(async move { Ok(esi_client.get_structure(location_id, &token).await?) })
            })
            .await;

        match result {
            Ok(structure) => {
                debug!("storing structure {location_id} ({})", structure.name);
                let created = repo
                    .create(
                        location_id,
                        structure.name,
                        Some(structure.solar_system_id),
                        structure.type_id,
                        LocationCategory::Structure,
                    )
                    .await?;

                Ok((created, Resolution::Created))
            }
            Err(Error::EsiError(err))
                if allow_placeholder && err.status() == Some(StatusCode::FORBIDDEN) =>
            {
                warn!("no docking access to structure {location_id}, storing placeholder");
                let created = repo
                    .create(
                        location_id,
                        format!("Unknown structure {location_id}"),
                        None,
                        None,
                        LocationCategory::Unknown,
                    )
                    .await?;

                Ok((created, Resolution::Created))
            }
            Err(err) => Err(err),
        }
    }

    pub async fn resolve_character(
        &self,
        character_id: i64,
    ) -> Result<(entity::eve_character::Model, Resolution), Error> {
        let repo = CharacterRepository::new(self.db);

        if let Some(existing) = repo.get_by_character_id(character_id).await? {
            return Ok((existing, Resolution::Found));
        }

        let esi_client = self.esi_client;
        let character = RetryContext::new()
            .execute_with_retry(&format!("character lookup {character_id}"), || {
                let esi_client = esi_client.clone();
                Box::pin(async move { Ok(esi_client.get_character(character_id).await?) })
            })
            .await?;

        debug!("storing character {character_id} ({})", character.name);
        let created = repo.create(character_id, character).await?;

        Ok((created, Resolution::Created))
    }

    pub async fn resolve_corporation(
        &self,
        corporation_id: i64,
    ) -> Result<(entity::eve_corporation::Model, Resolution), Error> {
        let repo = CorporationRepository::new(self.db);

        if let Some(existing) = repo.get_by_corporation_id(corporation_id).await? {
            return Ok((existing, Resolution::Found));
        }

        let esi_client = self.esi_client;
        let corporation = RetryContext::new()
            .execute_with_retry(&format!("corporation lookup {corporation_id}"), || {
                let esi_client = esi_client.clone();
                Box::pin(async move { Ok(esi_client.get_corporation(corporation_id).await?) })
            })
            .await?;

        debug!("storing corporation {corporation_id} ({})", corporation.name);
        let created = repo.create(corporation_id, corporation).await?;

        Ok((created, Resolution::Created))
    }
}
