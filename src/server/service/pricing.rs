//! Route-based pricing: the route table, the price formula, and the
//! reconciliation pass that stamps every synced contract with its matching rule
//! and any violations.

use std::collections::HashMap;

use sea_orm::ConnectionTrait;
use tracing::{debug, info};

use crate::server::{
    data::{contract::ContractRepository, pricing::PricingRepository},
    error::Error,
};

/// Builds the directed route lookup from the active rules.
///
/// A bidirectional rule covers the reversed pair as well. When two rules cover
/// the same directed pair the highest-id rule wins, so a newly created rule
/// overrides an older overlapping one.
pub fn route_table(
    rules: &[entity::pricing::Model],
) -> HashMap<(i32, i32), &entity::pricing::Model> {
    let mut table: HashMap<(i32, i32), &entity::pricing::Model> = HashMap::new();

    for rule in rules {
        insert_route(&mut table, (rule.start_location_id, rule.end_location_id), rule);
        if rule.is_bidirectional {
            insert_route(&mut table, (rule.end_location_id, rule.start_location_id), rule);
        }
    }

    table
}

fn insert_route<'r>(
    table: &mut HashMap<(i32, i32), &'r entity::pricing::Model>,
    key: (i32, i32),
    rule: &'r entity::pricing::Model,
) {
    table
        .entry(key)
        .and_modify(|existing| {
            if rule.id > existing.id {
                *existing = rule;
            }
        })
        .or_insert(rule);
}

/// Per-volume rate after the global modifier, never negative.
pub fn effective_price_per_volume(rule: &entity::pricing::Model, modifier_percent: f64) -> f64 {
    let rate = rule.price_per_volume.unwrap_or(0.0);
    (rate * (1.0 + modifier_percent / 100.0)).max(0.0)
}

/// Expected reward for a shipment under this rule.
///
/// Base plus volume and collateral components, floored at the rule's minimum
/// price and never below zero. Negative volume or collateral violates the
/// contract of this function and is reported as an error.
pub fn price(
    rule: &entity::pricing::Model,
    modifier_percent: f64,
    volume: f64,
    collateral: f64,
) -> Result<f64, Error> {
    if volume < 0.0 || collateral < 0.0 {
        return Err(Error::PricingInput(format!(
            "volume {volume} and collateral {collateral} must be non-negative"
        )));
    }

    let computed = rule.price_base
        + volume * effective_price_per_volume(rule, modifier_percent)
        + collateral * rule.price_per_collateral_percent.unwrap_or(0.0) / 100.0;

    let floored = match rule.price_min {
        Some(min) => computed.max(min),
        None => computed,
    };

    Ok(floored.max(0.0))
}

/// Evaluates a shipment against a rule and returns every violation, not just the
/// first, so an issuer can fix their contract in one pass.
pub fn check(
    rule: &entity::pricing::Model,
    modifier_percent: f64,
    volume: f64,
    collateral: f64,
    reward: Option<f64>,
) -> Result<Vec<String>, Error> {
    if volume < 0.0 || collateral < 0.0 {
        return Err(Error::PricingInput(format!(
            "volume {volume} and collateral {collateral} must be non-negative"
        )));
    }

    let mut issues = Vec::new();

    if let Some(max) = rule.volume_max {
        if volume > max {
            issues.push(format!(
                "Volume of {volume:.0} m3 exceeds the maximum allowed volume of {max:.0} m3"
            ));
        }
    }
    if let Some(min) = rule.volume_min {
        if volume < min {
            issues.push(format!(
                "Volume of {volume:.0} m3 is below the minimum required volume of {min:.0} m3"
            ));
        }
    }
    if let Some(max) = rule.collateral_max {
        if collateral > max {
            issues.push(format!(
                "Collateral of {collateral:.0} ISK exceeds the maximum allowed collateral of {max:.0} ISK"
            ));
        }
    }
    if let Some(min) = rule.collateral_min {
        if collateral < min {
            issues.push(format!(
                "Collateral of {collateral:.0} ISK is below the minimum required collateral of {min:.0} ISK"
            ));
        }
    }
    if let Some(reward) = reward {
        let required = price(rule, modifier_percent, volume, collateral)?;
        if reward < required {
            issues.push(format!(
                "Reward of {reward:.0} ISK is below the calculated price of {required:.0} ISK"
            ));
        }
    }

    Ok(issues)
}

pub struct PricingService<'a, C: ConnectionTrait> {
    db: &'a C,
    modifier_percent: f64,
}

impl<'a, C: ConnectionTrait> PricingService<'a, C> {
    pub fn new(db: &'a C, modifier_percent: f64) -> Self {
        Self {
            db,
            modifier_percent,
        }
    }

    /// Re-evaluates pricing for every contract still outstanding or never
    /// evaluated. Contracts on a priced route get the rule id and the serialized
    /// issue list; contracts off every route get both cleared. Returns the number
    /// of contracts whose stored outcome changed.
    pub async fn reconcile(&self, handler_id: i32) -> Result<usize, Error> {
        let rules = PricingRepository::new(self.db).get_active().await?;
        let table = route_table(&rules);

        let repo = ContractRepository::new(self.db);
        let contracts = repo.needing_pricing_update(handler_id).await?;
        let total = contracts.len();

        let mut updated = 0;
        for contract in contracts {
            let key = (contract.start_location_id, contract.end_location_id);

            match table.get(&key) {
                Some(rule) => {
                    let issues = check(
                        rule,
                        self.modifier_percent,
                        contract.volume,
                        contract.collateral,
                        Some(contract.reward),
                    )?;
                    let issues = serde_json::to_string(&issues)?;

                    if contract.pricing_id != Some(rule.id)
                        || contract.issues.as_deref() != Some(issues.as_str())
                    {
                        debug!(
                            "contract {} priced by rule {} with issues {issues}",
                            contract.contract_id, rule.id
                        );
                        repo.set_pricing(contract, Some(rule.id), Some(issues)).await?;
                        updated += 1;
                    }
                }
                None => {
                    if contract.pricing_id.is_some() || contract.issues.is_some() {
                        debug!("contract {} no longer on a priced route", contract.contract_id);
                        repo.set_pricing(contract, None, None).await?;
                        updated += 1;
                    }
                }
            }
        }

        info!("pricing reconciled for {total} contracts, {updated} updated");
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use entity::contract::ContractStatus;

    use super::{check, price, route_table, PricingService};
    use crate::server::{
        data::contract::{ContractRepository, ContractUpsert},
        util::test::{
            seed::{seed_entities, SeededEntities},
            setup::test_setup,
        },
    };

    fn rule(id: i32) -> entity::pricing::Model {
        let now = Utc::now().naive_utc();

        entity::pricing::Model {
            id,
            start_location_id: 1,
            end_location_id: 2,
            is_active: true,
            is_bidirectional: false,
            price_base: 0.0,
            price_min: None,
            price_per_volume: None,
            price_per_collateral_percent: None,
            collateral_min: None,
            collateral_max: None,
            volume_min: None,
            volume_max: None,
            days_to_expire: None,
            days_to_complete: None,
            details: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn price_combines_base_volume_and_collateral_components() {
        let mut r = rule(1);
        r.price_base = 1_000_000.0;
        r.price_per_volume = Some(100.0);
        r.price_per_collateral_percent = Some(1.0);

        let price = price(&r, 0.0, 1_000.0, 50_000_000.0).unwrap();

        // 1M base + 100k volume + 500k collateral
        assert_eq!(price, 1_600_000.0);
    }

    #[test]
    fn price_is_floored_at_rule_minimum() {
        let mut r = rule(1);
        r.price_base = 100_000.0;
        r.price_min = Some(5_000_000.0);

        assert_eq!(price(&r, 0.0, 0.0, 0.0).unwrap(), 5_000_000.0);
    }

    #[test]
    fn modifier_cannot_push_rate_below_zero() {
        let mut r = rule(1);
        r.price_per_volume = Some(100.0);

        // -200% would make the rate negative; it clamps to zero instead
        assert_eq!(price(&r, -200.0, 1_000.0, 0.0).unwrap(), 0.0);
        assert_eq!(price(&r, 50.0, 1_000.0, 0.0).unwrap(), 150_000.0);
    }

    #[test]
    fn price_rejects_negative_inputs() {
        let r = rule(1);

        assert!(price(&r, 0.0, -1.0, 0.0).is_err());
        assert!(price(&r, 0.0, 0.0, -1.0).is_err());
        assert!(check(&r, 0.0, -1.0, 0.0, None).is_err());
    }

    #[test]
    fn route_table_reverses_bidirectional_rules() {
        let mut forward = rule(1);
        forward.is_bidirectional = true;

        let rules = vec![forward];
        let table = route_table(&rules);

        assert_eq!(table.get(&(1, 2)).unwrap().id, 1);
        assert_eq!(table.get(&(2, 1)).unwrap().id, 1);
    }

    #[test]
    fn route_table_prefers_highest_id_on_overlap() {
        let rules = vec![rule(1), rule(7), rule(3)];
        let table = route_table(&rules);

        assert_eq!(table.get(&(1, 2)).unwrap().id, 7);
    }

    #[test]
    fn check_collects_every_violation() {
        let mut r = rule(1);
        r.price_base = 500.0;
        r.volume_max = Some(300.0);
        r.collateral_min = Some(1_000.0);

        let issues = check(&r, 0.0, 350.0, 0.0, Some(400.0)).unwrap();

        assert_eq!(issues.len(), 3);
        assert!(issues[0].contains("exceeds the maximum allowed volume of 300"));
        assert!(issues[1].contains("below the minimum required collateral"));
        assert!(issues[2].contains("Reward of 400 ISK is below the calculated price of 500 ISK"));
    }

    #[test]
    fn check_passes_zero_collateral_against_zero_minimum() {
        let mut r = rule(1);
        r.collateral_min = Some(0.0);

        assert!(check(&r, 0.0, 100.0, 0.0, None).unwrap().is_empty());
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
            date_expired: now + chrono::Duration::days(7),
            date_accepted: None,
            date_completed: None,
            title: None,
        }
    }

    #[tokio::test]
    async fn reconcile_assigns_matching_rule_and_records_issues() {
        let test = test_setup().await;
        let seed = seed_entities(&test.db).await;
        let repo = ContractRepository::new(&test.db);

        // Priced fine: 10M base + 50k * 300 = 25M, reward matches exactly
        repo.upsert(seed.handler.id, contract_fixture(&seed, 1))
            .await
            .unwrap();
        // Underpriced and overweight
        let mut bad = contract_fixture(&seed, 2);
        bad.volume = 400_000.0;
        bad.reward = 1_000_000.0;
        repo.upsert(seed.handler.id, bad).await.unwrap();

        let updated = PricingService::new(&test.db, 0.0)
            .reconcile(seed.handler.id)
            .await
            .unwrap();
        assert_eq!(updated, 2);

        let clean = repo
            .get_by_handler_and_contract_id(seed.handler.id, 1)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(clean.pricing_id, Some(seed.pricing.id));
        assert_eq!(clean.issues.as_deref(), Some("[]"));

        let flagged = repo
            .get_by_handler_and_contract_id(seed.handler.id, 2)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(flagged.pricing_id, Some(seed.pricing.id));
        let issues: Vec<String> = serde_json::from_str(flagged.issues.as_deref().unwrap()).unwrap();
        assert_eq!(issues.len(), 2);
    }

    #[tokio::test]
    async fn reconcile_clears_pricing_when_route_goes_away() {
        let test = test_setup().await;
        let seed = seed_entities(&test.db).await;
        let repo = ContractRepository::new(&test.db);

        let (contract, _) = repo
            .upsert(seed.handler.id, contract_fixture(&seed, 3))
            .await
            .unwrap();
        repo.set_pricing(contract, Some(seed.pricing.id), Some("[]".to_string()))
            .await
            .unwrap();

        // Deactivate the only rule covering the route
        let mut inactive = sea_orm::IntoActiveModel::into_active_model(seed.pricing.clone());
        inactive.is_active = sea_orm::ActiveValue::Set(false);
        sea_orm::ActiveModelTrait::update(inactive, &test.db)
            .await
            .unwrap();

        let updated = PricingService::new(&test.db, 0.0)
            .reconcile(seed.handler.id)
            .await
            .unwrap();
        assert_eq!(updated, 1);

        let cleared = repo
            .get_by_handler_and_contract_id(seed.handler.id, 3)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(cleared.pricing_id, None);
        assert_eq!(cleared.issues, None);
    }
}
