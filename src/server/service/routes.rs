//! Operator-facing route administration.
//!
//! Creating or deactivating a pricing rule changes which contracts match which
//! route, so every mutation announces itself on the pricing event channel; the
//! listener task then re-evaluates the whole contract set. Locations can be
//! registered ahead of any contract referencing them, strictly: a structure the
//! token cannot see is an error here, not a placeholder.

use sea_orm::DatabaseConnection;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::server::{
    data::{
        location::LocationRepository,
        pricing::{PricingParams, PricingRepository},
    },
    error::Error,
    esi::EsiClient,
    scheduler::events::PricingEvent,
    service::resolver::EntityResolver,
};

pub struct RouteService<'a> {
    db: &'a DatabaseConnection,
    esi_client: &'a EsiClient,
    events: mpsc::Sender<PricingEvent>,
}

impl<'a> RouteService<'a> {
    pub fn new(
        db: &'a DatabaseConnection,
        esi_client: &'a EsiClient,
        events: mpsc::Sender<PricingEvent>,
    ) -> Self {
        Self {
            db,
            esi_client,
            events,
        }
    }

    /// Registers a location by its EVE id before any contract references it.
    /// Unlike the sync path, an inaccessible structure is an error.
    pub async fn add_location(
        &self,
        location_id: i64,
        token: &str,
    ) -> Result<entity::location::Model, Error> {
        let (location, _) = EntityResolver::new(self.db, self.esi_client)
            .resolve_location(location_id, token, false)
            .await?;

        Ok(location)
    }

    /// Every known location, ordered by name.
    pub async fn locations(&self) -> Result<Vec<entity::location::Model>, Error> {
        Ok(LocationRepository::new(self.db).get_all().await?)
    }

    pub async fn create_rule(
        &self,
        params: PricingParams,
    ) -> Result<entity::pricing::Model, Error> {
        let rule = PricingRepository::new(self.db).create(params).await?;
        info!(
            "pricing rule {} created for route {} -> {}",
            rule.id, rule.start_location_id, rule.end_location_id
        );
        self.announce_change().await;

        Ok(rule)
    }

    pub async fn deactivate_rule(
        &self,
        id: i32,
    ) -> Result<Option<entity::pricing::Model>, Error> {
        let rule = PricingRepository::new(self.db).set_active(id, false).await?;
        if rule.is_some() {
            info!("pricing rule {id} deactivated");
            self.announce_change().await;
        }

        Ok(rule)
    }

    /// The rule is stored either way; a missing listener only delays the
    /// re-evaluation until the next sync run.
    async fn announce_change(&self) {
        if self.events.send(PricingEvent::RulesChanged).await.is_err() {
            warn!("pricing event listener is gone, reconciliation waits for the next sync");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::RouteService;
    use crate::server::{
        data::pricing::{PricingParams, PricingRepository},
        scheduler::events::{pricing_channel, PricingEvent},
        util::test::{
            mock::mock_station_endpoint,
            seed::{seed_entities, TEST_END_STATION_ID, TEST_START_STATION_ID},
            setup::test_setup,
        },
    };

    #[tokio::test]
    async fn rule_mutations_announce_a_pricing_event() {
        let test = test_setup().await;
        let seed = seed_entities(&test.db).await;
        let (tx, mut rx) = pricing_channel();
        let service = RouteService::new(&test.db, &test.esi_client, tx);

        let rule = service
            .create_rule(PricingParams {
                start_location_id: seed.end_location.id,
                end_location_id: seed.start_location.id,
                price_base: 5_000_000.0,
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(rx.recv().await, Some(PricingEvent::RulesChanged));

        let deactivated = service.deactivate_rule(rule.id).await.unwrap().unwrap();
        assert!(!deactivated.is_active);
        assert_eq!(rx.recv().await, Some(PricingEvent::RulesChanged));

        let active = PricingRepository::new(&test.db).get_active().await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, seed.pricing.id);
    }

    #[tokio::test]
    async fn deactivating_a_missing_rule_stays_quiet() {
        let test = test_setup().await;
        seed_entities(&test.db).await;
        let (tx, mut rx) = pricing_channel();
        let service = RouteService::new(&test.db, &test.esi_client, tx);

        assert!(service.deactivate_rule(9999).await.unwrap().is_none());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn add_location_registers_a_station_ahead_of_contracts() {
        let mut test = test_setup().await;
        let station_id = 60011866;
        let mock =
            mock_station_endpoint(&mut test.server, station_id, "Dodixie IX - Moon 20", 1).await;
        let (tx, _rx) = pricing_channel();
        let service = RouteService::new(&test.db, &test.esi_client, tx);

        let location = service.add_location(station_id, "token").await.unwrap();
        assert_eq!(location.name, "Dodixie IX - Moon 20");

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn locations_are_listed_by_name() {
        let test = test_setup().await;
        seed_entities(&test.db).await;
        let (tx, _rx) = pricing_channel();
        let service = RouteService::new(&test.db, &test.esi_client, tx);

        let locations = service.locations().await.unwrap();

        assert_eq!(locations.len(), 2);
        // "Amarr VIII…" sorts before "Jita IV…"
        assert_eq!(locations[0].location_id, TEST_END_STATION_ID);
        assert_eq!(locations[1].location_id, TEST_START_STATION_ID);
    }
}
