//! Periodic pull of courier contracts from ESI into the local mirror.
//!
//! One run fetches every page of the corporation's contracts, filters them down
//! to the couriers visible under the handler's operation mode, fingerprints the
//! result to skip no-op runs, and upserts the remainder in a single transaction
//! together with the pricing reconciliation. The handler row always ends the run
//! stamped with a [`SyncErrorCode`] describing what happened.

use chrono::Utc;
use entity::contract::ContractStatus;
use entity::contract_handler::SyncErrorCode;
use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};
use sha2::{Digest, Sha256};
use tracing::{debug, error, info, warn};

use crate::server::{
    data::{
        contract::{ContractRepository, ContractUpsert},
        eve::character::CharacterRepository,
        handler::HandlerRepository,
    },
    error::{retry::ErrorRetryStrategy, sync::SyncError, token::TokenError, Error},
    esi::{model::EsiContract, ContractsPage, EsiClient},
    service::{pricing::PricingService, resolver::EntityResolver, retry::RetryContext},
    token::AccessTokenProvider,
};

/// What one sync run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOutcome {
    /// Whether the local mirror was modified
    pub changed: bool,
    /// Outcome code stamped on the handler
    pub error: SyncErrorCode,
    /// Contracts stored or refreshed
    pub synced: usize,
    /// Contracts skipped because their own data could not be processed
    pub failures: usize,
}

impl SyncOutcome {
    fn unchanged(error: SyncErrorCode) -> Self {
        Self {
            changed: false,
            error,
            synced: 0,
            failures: 0,
        }
    }
}

pub struct ContractSyncService<'a> {
    db: &'a DatabaseConnection,
    esi_client: &'a EsiClient,
    tokens: &'a dyn AccessTokenProvider,
    modifier_percent: f64,
}

impl<'a> ContractSyncService<'a> {
    pub fn new(
        db: &'a DatabaseConnection,
        esi_client: &'a EsiClient,
        tokens: &'a dyn AccessTokenProvider,
        modifier_percent: f64,
    ) -> Self {
        Self {
            db,
            esi_client,
            tokens,
            modifier_percent,
        }
    }

    /// Runs one sync for the installed handler.
    ///
    /// Configuration and upstream failures are recorded on the handler and
    /// reported in the outcome rather than returned as errors; `Err` means the
    /// outcome itself could not be recorded. With `force` set, the
    /// nothing-changed fingerprint short-circuit is bypassed.
    pub async fn ingest(&self, force: bool) -> Result<SyncOutcome, Error> {
        let handler_repo = HandlerRepository::new(self.db);
        let handler = handler_repo
            .get()
            .await?
            .ok_or(SyncError::HandlerNotInstalled)?;

        match self.ingest_inner(&handler, force).await {
            Ok(outcome) => Ok(outcome),
            Err(err) => {
                let code = classify_failure(&err);
                error!("contract sync for {} failed: {err}", handler.organization_name);
                handler_repo.record_error(handler.id, code).await?;
                Ok(SyncOutcome::unchanged(code))
            }
        }
    }

    async fn ingest_inner(
        &self,
        handler: &entity::contract_handler::Model,
        force: bool,
    ) -> Result<SyncOutcome, Error> {
        let handler_repo = HandlerRepository::new(self.db);

        // Configuration gate, checked before any network traffic
        let Some(character_row_id) = handler.character_id else {
            warn!("handler {} has no sync character", handler.organization_name);
            handler_repo
                .record_error(handler.id, SyncErrorCode::NoCharacter)
                .await?;
            return Ok(SyncOutcome::unchanged(SyncErrorCode::NoCharacter));
        };
        let Some(character) = CharacterRepository::new(self.db)
            .get_by_id(character_row_id)
            .await?
        else {
            warn!("sync character row {character_row_id} is gone");
            handler_repo
                .record_error(handler.id, SyncErrorCode::NoCharacter)
                .await?;
            return Ok(SyncOutcome::unchanged(SyncErrorCode::NoCharacter));
        };

        if handler.operation_mode.required_category() != handler.organization_category {
            warn!(
                "handler {} mode {:?} does not fit a {:?}",
                handler.organization_name, handler.operation_mode, handler.organization_category
            );
            handler_repo
                .record_error(handler.id, SyncErrorCode::OperationModeMismatch)
                .await?;
            return Ok(SyncOutcome::unchanged(SyncErrorCode::OperationModeMismatch));
        }

        let token = match self.tokens.access_token(character.character_id).await {
            Ok(token) => token,
            Err(err) => {
                let code = match err {
                    TokenError::Expired(_) => SyncErrorCode::TokenExpired,
                    TokenError::Missing(_) | TokenError::Invalid(_) => SyncErrorCode::TokenInvalid,
                };
                warn!("no usable token for {}: {err}", character.name);
                handler_repo.record_error(handler.id, code).await?;
                return Ok(SyncOutcome::unchanged(code));
            }
        };

        let contracts = self.fetch_all_pages(character.corporation_id, &token).await?;
        let total_fetched = contracts.len();
        let relevant: Vec<EsiContract> = contracts
            .into_iter()
            .filter(|contract| is_relevant(handler, &character, contract))
            .collect();
        debug!(
            "{} of {total_fetched} fetched contracts are couriers visible to {}",
            relevant.len(),
            handler.organization_name
        );

        let fingerprint = fingerprint(&relevant)?;
        if !force && handler.version_hash.as_deref() == Some(fingerprint.as_str()) {
            debug!("contract set unchanged, skipping storage");
            handler_repo
                .record_success(handler.id, &fingerprint, Utc::now().naive_utc())
                .await?;
            return Ok(SyncOutcome::unchanged(SyncErrorCode::None));
        }

        let txn = self.db.begin().await?;
        let mut synced = 0;
        let mut failures = 0;

        for contract in &relevant {
            match self.sync_one(&txn, handler, &token, contract).await {
                Ok(()) => synced += 1,
                Err(err) => {
                    warn!("contract {} not synced: {err}", contract.contract_id);
                    failures += 1;
                }
            }
        }

        // Every single contract failing points at something systemic, not at the
        // contracts themselves
        if !relevant.is_empty() && synced == 0 {
            txn.rollback().await?;
            handler_repo
                .record_error(handler.id, SyncErrorCode::Unknown)
                .await?;
            return Ok(SyncOutcome {
                changed: false,
                error: SyncErrorCode::Unknown,
                synced: 0,
                failures,
            });
        }

        HandlerRepository::new(&txn)
            .record_success(handler.id, &fingerprint, Utc::now().naive_utc())
            .await?;
        PricingService::new(&txn, self.modifier_percent)
            .reconcile(handler.id)
            .await?;
        txn.commit().await?;

        info!(
            "contract sync for {} complete: {synced} synced, {failures} failed",
            handler.organization_name
        );

        Ok(SyncOutcome {
            changed: true,
            error: SyncErrorCode::None,
            synced,
            failures,
        })
    }

    async fn fetch_all_pages(
        &self,
        corporation_id: i64,
        token: &str,
    ) -> Result<Vec<EsiContract>, Error> {
        let retry = RetryContext::new();
        let esi_client = self.esi_client;

        type PageFuture =
            std::pin::Pin<Box<dyn std::future::Future<Output = Result<ContractsPage, Error>> + Send>>;
        let fetch_page = |page: u32| -> PageFuture {
            let esi_client = esi_client.clone();
            let token = token.to_string();
            Box::pin(async move {
                Ok(esi_client
                    .get_corporation_contracts(corporation_id, &token, page)
                    .await?)
            })
        };

        let first = retry
            .execute_with_retry("contract page 1", || fetch_page(1))
            .await?;
        let mut contracts = first.contracts;

        for page in 2..=first.pages {
            let result = retry
                .execute_with_retry(&format!("contract page {page}"), || fetch_page(page))
                .await?;
            contracts.extend(result.contracts);
        }

        Ok(contracts)
    }

    /// Resolves one remote contract's references and stores it. Runs on the batch
    /// transaction so a partial batch never becomes visible.
    async fn sync_one(
        &self,
        txn: &DatabaseTransaction,
        handler: &entity::contract_handler::Model,
        token: &str,
        contract: &EsiContract,
    ) -> Result<(), Error> {
        let resolver = EntityResolver::new(txn, self.esi_client);

        let status = ContractStatus::from_esi(&contract.status).ok_or_else(|| {
            SyncError::UnknownStatus {
                contract_id: contract.contract_id,
                status: contract.status.clone(),
            }
        })?;

        let (issuer, _) = resolver.resolve_character(contract.issuer_id).await?;
        let (issuer_corporation, _) = resolver
            .resolve_corporation(contract.issuer_corporation_id)
            .await?;

        // acceptor_id is 0 until somebody takes the contract
        let (acceptor_character_id, acceptor_corporation_id) = if contract.acceptor_id != 0 {
            let (acceptor, _) = resolver.resolve_character(contract.acceptor_id).await?;
            let (acceptor_corporation, _) = resolver
                .resolve_corporation(acceptor.corporation_id)
                .await?;
            (Some(acceptor.id), Some(acceptor_corporation.id))
        } else {
            (None, None)
        };

        let start_location_id =
            contract
                .start_location_id
                .ok_or(SyncError::MissingField {
                    contract_id: contract.contract_id,
                    field: "start_location_id",
                })?;
        let end_location_id = contract.end_location_id.ok_or(SyncError::MissingField {
            contract_id: contract.contract_id,
            field: "end_location_id",
        })?;
        let (start_location, _) = resolver
            .resolve_location(start_location_id, token, true)
            .await?;
        let (end_location, _) = resolver
            .resolve_location(end_location_id, token, true)
            .await?;

        let upsert = ContractUpsert {
            contract_id: contract.contract_id,
            status,
            issuer_character_id: issuer.id,
            issuer_corporation_id: issuer_corporation.id,
            acceptor_character_id,
            acceptor_corporation_id,
            start_location_id: start_location.id,
            end_location_id: end_location.id,
            collateral: contract.collateral.unwrap_or(0.0),
            reward: contract.reward.unwrap_or(0.0),
            volume: contract.volume.unwrap_or(0.0),
            days_to_complete: contract.days_to_complete.unwrap_or(0),
            date_issued: contract.date_issued.naive_utc(),
            date_expired: contract.date_expired.naive_utc(),
            date_accepted: contract.date_accepted.map(|date| date.naive_utc()),
            date_completed: contract.date_completed.map(|date| date.naive_utc()),
            title: contract.title.clone(),
        };

        ContractRepository::new(txn)
            .upsert(handler.id, upsert)
            .await?;

        Ok(())
    }
}

/// Whether the operation mode makes this contract ours to mirror.
fn is_relevant(
    handler: &entity::contract_handler::Model,
    sync_character: &entity::eve_character::Model,
    contract: &EsiContract,
) -> bool {
    use entity::contract_handler::OperationMode;

    if !contract.is_courier() {
        return false;
    }

    match handler.operation_mode {
        OperationMode::MyAlliance | OperationMode::MyCorporation => {
            contract.assignee_id == handler.organization_id
        }
        OperationMode::CorpInAlliance => contract.assignee_id == sync_character.corporation_id,
        OperationMode::CorpPublic => {
            contract.availability == "public"
                && contract.assignee_id == sync_character.corporation_id
        }
    }
}

/// Content hash of the filtered contract set, used to skip runs where upstream
/// reports nothing new.
fn fingerprint(contracts: &[EsiContract]) -> Result<String, Error> {
    let serialized = serde_json::to_vec(contracts)?;
    let mut hasher = Sha256::new();
    hasher.update(&serialized);

    Ok(hasher
        .finalize()
        .iter()
        .map(|byte| format!("{byte:02x}"))
        .collect())
}

fn classify_failure(err: &Error) -> SyncErrorCode {
    match err {
        Error::EsiError(_) => match err.to_retry_strategy() {
            ErrorRetryStrategy::Retry => SyncErrorCode::UpstreamUnavailable,
            ErrorRetryStrategy::Fail => SyncErrorCode::Unknown,
        },
        _ => SyncErrorCode::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use entity::contract_handler::{OperationMode, OrganizationCategory, SyncErrorCode};
    use serde_json::json;

    use super::ContractSyncService;
    use crate::server::{
        data::{
            contract::ContractRepository, eve::character::CharacterRepository,
            handler::HandlerRepository,
        },
        esi::model::EsiCharacter,
        token::StaticTokenProvider,
        util::test::{
            mock::{
            mock_contracts_endpoint, mock_contracts_outage_endpoint, mock_courier_contract,
            mock_item_exchange_contract,
        },
            seed::{seed_entities, TEST_ALLIANCE_ID, TEST_CHARACTER_ID, TEST_CORPORATION_ID},
            setup::test_setup,
        },
    };

    fn provider() -> StaticTokenProvider {
        StaticTokenProvider::new(Some("token".to_string()))
    }

    #[tokio::test]
    async fn ingest_records_missing_character() {
        let test = test_setup().await;
        HandlerRepository::new(&test.db)
            .create(
                TEST_ALLIANCE_ID,
                "Test Freight Alliance".to_string(),
                OrganizationCategory::Alliance,
                OperationMode::MyAlliance,
                None,
            )
            .await
            .unwrap();
        let tokens = provider();
        let service = ContractSyncService::new(&test.db, &test.esi_client, &tokens, 0.0);

        let outcome = service.ingest(false).await.unwrap();

        assert!(!outcome.changed);
        assert_eq!(outcome.error, SyncErrorCode::NoCharacter);
        let handler = HandlerRepository::new(&test.db).get().await.unwrap().unwrap();
        assert_eq!(handler.last_error, SyncErrorCode::NoCharacter);
    }

    #[tokio::test]
    async fn ingest_rejects_operation_mode_mismatch_without_network() {
        let test = test_setup().await;
        let character = CharacterRepository::new(&test.db)
            .create(
                TEST_CHARACTER_ID,
                EsiCharacter {
                    name: "Sync Pilot".to_string(),
                    corporation_id: TEST_CORPORATION_ID,
                },
            )
            .await
            .unwrap();
        // Alliance organization paired with a corporation-only mode
        HandlerRepository::new(&test.db)
            .create(
                TEST_ALLIANCE_ID,
                "Test Freight Alliance".to_string(),
                OrganizationCategory::Alliance,
                OperationMode::MyCorporation,
                Some(character.id),
            )
            .await
            .unwrap();
        let tokens = provider();
        let service = ContractSyncService::new(&test.db, &test.esi_client, &tokens, 0.0);

        let outcome = service.ingest(false).await.unwrap();

        assert!(!outcome.changed);
        assert_eq!(outcome.error, SyncErrorCode::OperationModeMismatch);
    }

    #[tokio::test]
    async fn ingest_records_unusable_token() {
        let test = test_setup().await;
        seed_entities(&test.db).await;
        let tokens = StaticTokenProvider::new(None);
        let service = ContractSyncService::new(&test.db, &test.esi_client, &tokens, 0.0);

        let outcome = service.ingest(false).await.unwrap();

        assert!(!outcome.changed);
        assert_eq!(outcome.error, SyncErrorCode::TokenInvalid);
        let handler = HandlerRepository::new(&test.db).get().await.unwrap().unwrap();
        assert_eq!(handler.last_error, SyncErrorCode::TokenInvalid);
    }

    #[tokio::test]
    async fn ingest_stores_visible_couriers_across_pages() {
        let mut test = test_setup().await;
        let seed = seed_entities(&test.db).await;

        let page_one = json!([
            mock_courier_contract(1001, TEST_ALLIANCE_ID),
            mock_item_exchange_contract(1002, TEST_ALLIANCE_ID),
        ]);
        let page_two = json!([
            mock_courier_contract(1003, TEST_ALLIANCE_ID),
            mock_courier_contract(1004, 98000077),
        ]);
        let mock_one =
            mock_contracts_endpoint(&mut test.server, TEST_CORPORATION_ID, 1, 2, page_one, 1).await;
        let mock_two =
            mock_contracts_endpoint(&mut test.server, TEST_CORPORATION_ID, 2, 2, page_two, 1).await;

        let tokens = provider();
        let service = ContractSyncService::new(&test.db, &test.esi_client, &tokens, 0.0);
        let outcome = service.ingest(false).await.unwrap();

        assert!(outcome.changed);
        assert_eq!(outcome.error, SyncErrorCode::None);
        assert_eq!(outcome.synced, 2);
        assert_eq!(outcome.failures, 0);

        let repo = ContractRepository::new(&test.db);
        let stored = repo
            .get_by_handler_and_contract_id(seed.handler.id, 1001)
            .await
            .unwrap()
            .unwrap();
        // Reconciliation ran as part of the same sync
        assert_eq!(stored.pricing_id, Some(seed.pricing.id));
        assert!(repo
            .get_by_handler_and_contract_id(seed.handler.id, 1002)
            .await
            .unwrap()
            .is_none());
        assert!(repo
            .get_by_handler_and_contract_id(seed.handler.id, 1004)
            .await
            .unwrap()
            .is_none());

        let handler = HandlerRepository::new(&test.db).get().await.unwrap().unwrap();
        assert!(handler.version_hash.is_some());
        assert!(handler.last_sync_at.is_some());
        assert_eq!(handler.last_error, SyncErrorCode::None);

        mock_one.assert_async().await;
        mock_two.assert_async().await;
    }

    #[tokio::test]
    async fn ingest_skips_storage_when_fingerprint_matches() {
        let mut test = test_setup().await;
        seed_entities(&test.db).await;

        let contracts = json!([mock_courier_contract(2001, TEST_ALLIANCE_ID)]);
        let mock = mock_contracts_endpoint(
            &mut test.server,
            TEST_CORPORATION_ID,
            1,
            1,
            contracts,
            2,
        )
        .await;

        let tokens = provider();
        let service = ContractSyncService::new(&test.db, &test.esi_client, &tokens, 0.0);

        let first = service.ingest(false).await.unwrap();
        assert!(first.changed);
        assert_eq!(first.synced, 1);

        let second = service.ingest(false).await.unwrap();
        assert!(!second.changed);
        assert_eq!(second.error, SyncErrorCode::None);
        assert_eq!(second.synced, 0);

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn exhausted_upstream_outage_is_recorded_as_unavailable() {
        let mut test = test_setup().await;
        seed_entities(&test.db).await;
        // 503 on every attempt burns the whole retry budget
        let mock =
            mock_contracts_outage_endpoint(&mut test.server, TEST_CORPORATION_ID, 503, 3).await;

        let tokens = provider();
        let service = ContractSyncService::new(&test.db, &test.esi_client, &tokens, 0.0);
        let outcome = service.ingest(false).await.unwrap();

        assert!(!outcome.changed);
        assert_eq!(outcome.error, SyncErrorCode::UpstreamUnavailable);
        let handler = HandlerRepository::new(&test.db).get().await.unwrap().unwrap();
        assert_eq!(handler.last_error, SyncErrorCode::UpstreamUnavailable);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn forced_ingest_bypasses_fingerprint_short_circuit() {
        let mut test = test_setup().await;
        seed_entities(&test.db).await;

        let contracts = json!([mock_courier_contract(3001, TEST_ALLIANCE_ID)]);
        let mock = mock_contracts_endpoint(
            &mut test.server,
            TEST_CORPORATION_ID,
            1,
            1,
            contracts,
            2,
        )
        .await;

        let tokens = provider();
        let service = ContractSyncService::new(&test.db, &test.esi_client, &tokens, 0.0);

        service.ingest(false).await.unwrap();
        let forced = service.ingest(true).await.unwrap();

        assert!(forced.changed);
        assert_eq!(forced.synced, 1);

        mock.assert_async().await;
    }
}
