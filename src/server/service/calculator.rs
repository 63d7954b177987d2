//! Reward calculator for members planning a shipment.
//!
//! Answers "what should I offer for this haul" with the exact formula and checks
//! the sync uses, so a quote taken from here never gets flagged once the real
//! contract comes in.

use sea_orm::ConnectionTrait;

use crate::server::{
    data::{location::LocationRepository, pricing::PricingRepository},
    error::Error,
    service::pricing,
};

/// A computed reward plus any bounds the planned shipment would violate.
#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    pub price: f64,
    pub issues: Vec<String>,
}

/// An active rule with its endpoint names resolved, for display.
#[derive(Debug, Clone)]
pub struct RouteListing {
    pub pricing: entity::pricing::Model,
    pub start_name: String,
    pub end_name: String,
}

pub struct CalculatorService<'a, C: ConnectionTrait> {
    db: &'a C,
    modifier_percent: f64,
}

impl<'a, C: ConnectionTrait> CalculatorService<'a, C> {
    pub fn new(db: &'a C, modifier_percent: f64) -> Self {
        Self {
            db,
            modifier_percent,
        }
    }

    /// Quote for a shipment under the given rule, or `None` if the rule is gone.
    pub async fn quote(
        &self,
        pricing_id: i32,
        volume: f64,
        collateral: f64,
    ) -> Result<Option<Quote>, Error> {
        let Some(rule) = PricingRepository::new(self.db).get_by_id(pricing_id).await? else {
            return Ok(None);
        };

        let price = pricing::price(&rule, self.modifier_percent, volume, collateral)?;
        let issues = pricing::check(&rule, self.modifier_percent, volume, collateral, None)?;

        Ok(Some(Quote { price, issues }))
    }

    /// Every active rule with resolved endpoint names, sorted by start then end.
    pub async fn routes(&self) -> Result<Vec<RouteListing>, Error> {
        let locations = LocationRepository::new(self.db);
        let rules = PricingRepository::new(self.db).get_active().await?;

        let mut listings = Vec::with_capacity(rules.len());
        for rule in rules {
            let start_name = locations
                .get_by_id(rule.start_location_id)
                .await?
                .map(|location| location.name)
                .unwrap_or_else(|| "Unknown location".to_string());
            let end_name = locations
                .get_by_id(rule.end_location_id)
                .await?
                .map(|location| location.name)
                .unwrap_or_else(|| "Unknown location".to_string());

            listings.push(RouteListing {
                pricing: rule,
                start_name,
                end_name,
            });
        }

        listings.sort_by(|a, b| {
            a.start_name
                .cmp(&b.start_name)
                .then_with(|| a.end_name.cmp(&b.end_name))
        });

        Ok(listings)
    }
}
