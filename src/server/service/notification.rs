//! Webhook notifications about synced contracts, split into two audiences.
//!
//! Operators (the pilots flying the freight) hear about each outstanding
//! contract exactly once, stamped via `date_notified`. Customers (the members
//! who issued contracts) hear about each contract once per status it reaches,
//! tracked in the `contract_notification` table. Delivery failures are logged
//! and left unstamped so the next dispatch retries them.

use std::time::Duration;

use chrono::{NaiveDateTime, Utc};
use entity::contract::ContractStatus;
use sea_orm::DatabaseConnection;
use tracing::{debug, warn};

use crate::server::{
    config::Config,
    data::{
        contract::ContractRepository, eve::character::CharacterRepository,
        handler::HandlerRepository, location::LocationRepository,
    },
    error::Error,
    webhook::{Embed, EmbedField, EmbedFooter, EmbedThumbnail, WebhookClient, WebhookMessage},
};

/// Statuses the customer audience is told about. Deleted and failed contracts
/// stay quiet; couriers handle those out of band.
pub const CUSTOMER_STATUSES: [ContractStatus; 5] = [
    ContractStatus::Outstanding,
    ContractStatus::InProgress,
    ContractStatus::FinishedIssuer,
    ContractStatus::FinishedContractor,
    ContractStatus::Finished,
];

const OPERATOR_STATUSES: [ContractStatus; 1] = [ContractStatus::Outstanding];

/// Pause between consecutive webhook posts when rate limiting is requested.
const SEND_PAUSE: Duration = Duration::from_secs(2);

const COLOR_PASSED: u32 = 0x2ecc71;
const COLOR_FAILED: u32 = 0xe74c3c;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Audience {
    Operator,
    Customer,
}

#[derive(Debug, Clone)]
pub struct NotificationOptions {
    /// Prepended to operator messages, e.g. "@here"
    pub mention_prefix: Option<String>,
    /// Attach the organization logo as the embed thumbnail
    pub use_branding: bool,
    /// Customer notifications are suppressed for contracts whose status has not
    /// changed within this window
    pub stale_after_hours: i64,
}

impl From<&Config> for NotificationOptions {
    fn from(config: &Config) -> Self {
        Self {
            mention_prefix: config.mention_prefix.clone(),
            use_branding: config.use_branding,
            stale_after_hours: config.stale_after_hours,
        }
    }
}

pub struct NotificationService<'a> {
    db: &'a DatabaseConnection,
    operator_webhook: Option<&'a WebhookClient>,
    customer_webhook: Option<&'a WebhookClient>,
    options: NotificationOptions,
}

impl<'a> NotificationService<'a> {
    pub fn new(
        db: &'a DatabaseConnection,
        operator_webhook: Option<&'a WebhookClient>,
        customer_webhook: Option<&'a WebhookClient>,
        options: NotificationOptions,
    ) -> Self {
        Self {
            db,
            operator_webhook,
            customer_webhook,
            options,
        }
    }

    /// Sends everything currently due to both audiences.
    ///
    /// Returns whether every due notification was delivered. With `rate_limited`
    /// set, consecutive posts are spaced out; with `force` set, already-notified
    /// contracts fire again.
    pub async fn dispatch(&self, rate_limited: bool, force: bool) -> Result<bool, Error> {
        let Some(handler) = HandlerRepository::new(self.db).get().await? else {
            debug!("no handler installed, nothing to notify about");
            return Ok(true);
        };

        let mut failures = 0;
        if let Some(webhook) = self.operator_webhook {
            failures += self
                .dispatch_operator(webhook, &handler, rate_limited, force)
                .await?;
        }
        if let Some(webhook) = self.customer_webhook {
            failures += self
                .dispatch_customer(webhook, &handler, rate_limited, force)
                .await?;
        }

        Ok(failures == 0)
    }

    async fn dispatch_operator(
        &self,
        webhook: &WebhookClient,
        handler: &entity::contract_handler::Model,
        rate_limited: bool,
        force: bool,
    ) -> Result<usize, Error> {
        let repo = ContractRepository::new(self.db);
        let contracts = repo
            .by_statuses_with_pricing(handler.id, &OPERATOR_STATUSES)
            .await?;
        let now = Utc::now().naive_utc();

        let mut failures = 0;
        let mut sent = 0;
        for contract in contracts {
            if contract.date_notified.is_some() && !force {
                continue;
            }
            // Expired contracts stay unstamped but are never announced
            if contract.date_expired <= now {
                continue;
            }

            let message = self
                .build_message(handler, &contract, Audience::Operator)
                .await?;

            if rate_limited && sent > 0 {
                tokio::time::sleep(SEND_PAUSE).await;
            }

            match webhook.send(&message).await {
                Ok(()) => {
                    repo.stamp_notified(contract, Utc::now().naive_utc()).await?;
                    sent += 1;
                }
                Err(err) => {
                    warn!("operator notification failed: {err}");
                    failures += 1;
                }
            }
        }

        debug!("operator dispatch sent {sent}, failed {failures}");
        Ok(failures)
    }

    async fn dispatch_customer(
        &self,
        webhook: &WebhookClient,
        handler: &entity::contract_handler::Model,
        rate_limited: bool,
        force: bool,
    ) -> Result<usize, Error> {
        let repo = ContractRepository::new(self.db);
        let contracts = repo
            .by_statuses_with_pricing(handler.id, &CUSTOMER_STATUSES)
            .await?;
        let now = Utc::now().naive_utc();

        let mut failures = 0;
        let mut sent = 0;
        for contract in contracts {
            if contract.date_expired <= now {
                continue;
            }
            if self.is_stale(&contract, now) {
                continue;
            }
            if !force && repo.customer_notified(contract.id, contract.status).await? {
                continue;
            }

            let message = self
                .build_message(handler, &contract, Audience::Customer)
                .await?;

            if rate_limited && sent > 0 {
                tokio::time::sleep(SEND_PAUSE).await;
            }

            match webhook.send(&message).await {
                Ok(()) => {
                    repo.record_customer_notification(
                        contract.id,
                        contract.status,
                        Utc::now().naive_utc(),
                    )
                    .await?;
                    sent += 1;
                }
                Err(err) => {
                    warn!("customer notification failed: {err}");
                    failures += 1;
                }
            }
        }

        debug!("customer dispatch sent {sent}, failed {failures}");
        Ok(failures)
    }

    /// A contract whose status last moved outside the configured window is old
    /// news; announcing it would only confuse the issuer.
    fn is_stale(&self, contract: &entity::contract::Model, now: NaiveDateTime) -> bool {
        let last_change = [
            Some(contract.date_issued),
            contract.date_accepted,
            contract.date_completed,
        ]
        .into_iter()
        .flatten()
        .max();

        match last_change {
            Some(changed_at) => {
                now.signed_duration_since(changed_at)
                    > chrono::Duration::hours(self.options.stale_after_hours)
            }
            None => false,
        }
    }

    async fn build_message(
        &self,
        handler: &entity::contract_handler::Model,
        contract: &entity::contract::Model,
        audience: Audience,
    ) -> Result<WebhookMessage, Error> {
        let locations = LocationRepository::new(self.db);
        let start = locations
            .get_by_id(contract.start_location_id)
            .await?
            .map(|location| location.name)
            .unwrap_or_else(|| "Unknown location".to_string());
        let end = locations
            .get_by_id(contract.end_location_id)
            .await?
            .map(|location| location.name)
            .unwrap_or_else(|| "Unknown location".to_string());
        let issuer = CharacterRepository::new(self.db)
            .get_by_id(contract.issuer_character_id)
            .await?
            .map(|character| character.name)
            .unwrap_or_else(|| "Unknown pilot".to_string());

        let issues: Vec<String> = contract
            .issues
            .as_deref()
            .map(serde_json::from_str)
            .transpose()?
            .unwrap_or_default();
        let passed = issues.is_empty();

        let mut fields = vec![
            EmbedField {
                name: "Route".to_string(),
                value: format!("{start} to {end}"),
                inline: false,
            },
            EmbedField {
                name: "Reward".to_string(),
                value: format!("{:.0} ISK", contract.reward),
                inline: true,
            },
            EmbedField {
                name: "Collateral".to_string(),
                value: format!("{:.0} ISK", contract.collateral),
                inline: true,
            },
            EmbedField {
                name: "Volume".to_string(),
                value: format!("{:.0} m3", contract.volume),
                inline: true,
            },
            EmbedField {
                name: "Issued by".to_string(),
                value: issuer,
                inline: true,
            },
            EmbedField {
                name: "Days to complete".to_string(),
                value: contract.days_to_complete.to_string(),
                inline: true,
            },
        ];
        if audience == Audience::Operator {
            let value = if passed {
                "passed".to_string()
            } else {
                issues.join("\n")
            };
            fields.push(EmbedField {
                name: "Price check".to_string(),
                value,
                inline: false,
            });
        }

        let thumbnail = if self.options.use_branding {
            let kind = match handler.organization_category {
                entity::contract_handler::OrganizationCategory::Alliance => "alliances",
                entity::contract_handler::OrganizationCategory::Corporation => "corporations",
            };
            Some(EmbedThumbnail {
                url: format!(
                    "https://images.evetech.net/{kind}/{}/logo?size=128",
                    handler.organization_id
                ),
            })
        } else {
            None
        };

        let embed = Embed {
            title: Some(status_headline(contract.status).to_string()),
            description: contract.title.clone().filter(|title| !title.is_empty()),
            color: Some(if passed { COLOR_PASSED } else { COLOR_FAILED }),
            timestamp: Some(contract.date_expired.format("%Y-%m-%dT%H:%M:%SZ").to_string()),
            fields,
            footer: Some(EmbedFooter {
                text: format!("Contract {}", contract.contract_id),
            }),
            thumbnail,
        };

        let content = match audience {
            Audience::Operator => self.options.mention_prefix.clone(),
            Audience::Customer => None,
        };

        Ok(WebhookMessage {
            content,
            embeds: vec![embed],
            username: Some(handler.organization_name.clone()),
            avatar_url: None,
        })
    }
}

fn status_headline(status: ContractStatus) -> &'static str {
    match status {
        ContractStatus::Outstanding => "New courier contract",
        ContractStatus::InProgress => "Courier contract accepted",
        ContractStatus::FinishedIssuer | ContractStatus::FinishedContractor
        | ContractStatus::Finished => "Courier contract delivered",
        ContractStatus::Canceled => "Courier contract canceled",
        ContractStatus::Rejected => "Courier contract rejected",
        ContractStatus::Failed => "Courier contract failed",
        ContractStatus::Deleted => "Courier contract deleted",
        ContractStatus::Reversed => "Courier contract reversed",
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use entity::contract::ContractStatus;

    use super::{NotificationOptions, NotificationService};
    use crate::server::{
        data::contract::{ContractRepository, ContractUpsert},
        util::test::{
            seed::{seed_entities, SeededEntities},
            setup::test_setup,
        },
        webhook::WebhookClient,
    };

    fn options() -> NotificationOptions {
        NotificationOptions {
            mention_prefix: Some("@here".to_string()),
            use_branding: true,
            stale_after_hours: 24,
        }
    }

    fn contract_fixture(seed: &SeededEntities, contract_id: i64) -> ContractUpsert {
        let now = Utc::now().naive_utc();

        ContractUpsert {
            contract_id,
            status: ContractStatus::Outstanding,
            issuer_character_id: seed.character.id,
            issuer_corporation_id: seed.corporation.id,
            acceptor_character_id: None,
            acceptor_corporation_id: None,
            start_location_id: seed.start_location.id,
            end_location_id: seed.end_location.id,
            collateral: 1_000_000.0,
            reward: 25_000_000.0,
            volume: 50_000.0,
            days_to_complete: 3,
            date_issued: now,
            date_expired: now + Duration::days(7),
            date_accepted: None,
            date_completed: None,
            title: None,
        }
    }

    async fn priced_contract(
        db: &sea_orm::DatabaseConnection,
        seed: &SeededEntities,
        update: ContractUpsert,
    ) -> entity::contract::Model {
        let repo = ContractRepository::new(db);
        let (contract, _) = repo.upsert(seed.handler.id, update).await.unwrap();
        repo.set_pricing(contract, Some(seed.pricing.id), Some("[]".to_string()))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn operator_notification_fires_once() {
        let mut test = test_setup().await;
        let seed = seed_entities(&test.db).await;
        priced_contract(&test.db, &seed, contract_fixture(&seed, 1)).await;

        let mock = test
            .server
            .mock("POST", "/webhook")
            .with_status(204)
            .expect(1)
            .create_async()
            .await;
        let webhook = WebhookClient::new(&format!("{}/webhook", test.server.url())).unwrap();
        let service = NotificationService::new(&test.db, Some(&webhook), None, options());

        assert!(service.dispatch(false, false).await.unwrap());
        assert!(service.dispatch(false, false).await.unwrap());

        let stamped = ContractRepository::new(&test.db)
            .get_by_handler_and_contract_id(seed.handler.id, 1)
            .await
            .unwrap()
            .unwrap();
        assert!(stamped.date_notified.is_some());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn expired_contracts_are_never_announced() {
        let mut test = test_setup().await;
        let seed = seed_entities(&test.db).await;
        let mut expired = contract_fixture(&seed, 2);
        expired.date_expired = Utc::now().naive_utc() - Duration::hours(1);
        priced_contract(&test.db, &seed, expired).await;

        let mock = test
            .server
            .mock("POST", "/webhook")
            .with_status(204)
            .expect(0)
            .create_async()
            .await;
        let webhook = WebhookClient::new(&format!("{}/webhook", test.server.url())).unwrap();
        let service = NotificationService::new(&test.db, Some(&webhook), None, options());

        assert!(service.dispatch(false, false).await.unwrap());

        let contract = ContractRepository::new(&test.db)
            .get_by_handler_and_contract_id(seed.handler.id, 2)
            .await
            .unwrap()
            .unwrap();
        // Left unstamped, so it would fire if it ever came back from the dead
        assert!(contract.date_notified.is_none());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn customer_hears_once_per_status() {
        let mut test = test_setup().await;
        let seed = seed_entities(&test.db).await;
        priced_contract(&test.db, &seed, contract_fixture(&seed, 3)).await;

        let mock = test
            .server
            .mock("POST", "/webhook")
            .with_status(204)
            .expect(2)
            .create_async()
            .await;
        let webhook = WebhookClient::new(&format!("{}/webhook", test.server.url())).unwrap();
        let service = NotificationService::new(&test.db, None, Some(&webhook), options());

        // Outstanding announced once
        assert!(service.dispatch(false, false).await.unwrap());
        assert!(service.dispatch(false, false).await.unwrap());

        // Status moves forward, one more announcement
        let mut accepted = contract_fixture(&seed, 3);
        accepted.status = ContractStatus::InProgress;
        accepted.date_accepted = Some(Utc::now().naive_utc());
        priced_contract(&test.db, &seed, accepted).await;
        assert!(service.dispatch(false, false).await.unwrap());

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn expired_contracts_are_skipped_for_customers() {
        let mut test = test_setup().await;
        let seed = seed_entities(&test.db).await;
        let mut expired = contract_fixture(&seed, 6);
        expired.date_expired = Utc::now().naive_utc() - Duration::hours(1);
        let contract = priced_contract(&test.db, &seed, expired).await;

        let mock = test
            .server
            .mock("POST", "/webhook")
            .with_status(204)
            .expect(0)
            .create_async()
            .await;
        let webhook = WebhookClient::new(&format!("{}/webhook", test.server.url())).unwrap();
        let service = NotificationService::new(&test.db, None, Some(&webhook), options());

        assert!(service.dispatch(false, false).await.unwrap());

        let notified = ContractRepository::new(&test.db)
            .customer_notified(contract.id, ContractStatus::Outstanding)
            .await
            .unwrap();
        assert!(!notified);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn stale_contracts_are_skipped_for_customers() {
        let mut test = test_setup().await;
        let seed = seed_entities(&test.db).await;
        let mut stale = contract_fixture(&seed, 4);
        stale.date_issued = Utc::now().naive_utc() - Duration::hours(48);
        priced_contract(&test.db, &seed, stale).await;

        let mock = test
            .server
            .mock("POST", "/webhook")
            .with_status(204)
            .expect(0)
            .create_async()
            .await;
        let webhook = WebhookClient::new(&format!("{}/webhook", test.server.url())).unwrap();
        let service = NotificationService::new(&test.db, None, Some(&webhook), options());

        assert!(service.dispatch(false, false).await.unwrap());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn failed_delivery_stays_due() {
        let mut test = test_setup().await;
        let seed = seed_entities(&test.db).await;
        priced_contract(&test.db, &seed, contract_fixture(&seed, 5)).await;

        let mock = test
            .server
            .mock("POST", "/webhook")
            .with_status(500)
            .expect(1)
            .create_async()
            .await;
        let webhook = WebhookClient::new(&format!("{}/webhook", test.server.url())).unwrap();
        let service = NotificationService::new(&test.db, Some(&webhook), None, options());

        assert!(!service.dispatch(false, false).await.unwrap());

        let contract = ContractRepository::new(&test.db)
            .get_by_handler_and_contract_id(seed.handler.id, 5)
            .await
            .unwrap()
            .unwrap();
        assert!(contract.date_notified.is_none());
        mock.assert_async().await;
    }
}
