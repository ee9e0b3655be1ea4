// Pricing Defaults Store
//
// Loads, caches and validates the externally-configured pricing values: the
// per-km travel rate, the boleto fee, tax and interest percentages, and the
// visit-count discount table used by the proposal flow. Values live in the
// database so the back office can adjust them without a deployment; a
// time-based cache with a 60-second TTL keeps request-path lookups cheap.

use crate::pricing::error::{PricingError, PricingResult};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

/// Time-to-live for cached configuration (60 seconds)
const CACHE_TTL: Duration = Duration::from_secs(60);

/// Singleton row of pricing defaults
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PricingDefaults {
    pub config_id: i32,
    pub rate_per_km: Decimal,
    pub boleto_fee: Decimal,
    pub monthly_interest_percent: Decimal,
    pub service_tax_percent: Decimal,
    pub material_tax_percent: Decimal,
    pub updated_at: DateTime<Utc>,
}

/// One row of the visit-count discount table
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct VisitDiscount {
    pub visit_count: i32,
    pub discount_percent: Decimal,
}

/// Payload for updating the pricing defaults
#[derive(Debug, Clone, Deserialize, validator::Validate)]
pub struct UpdatePricingDefaults {
    #[validate(custom = "crate::validation::validate_non_negative_money")]
    pub rate_per_km: Decimal,
    #[validate(custom = "crate::validation::validate_non_negative_money")]
    pub boleto_fee: Decimal,
    #[validate(custom = "crate::validation::validate_percent_range")]
    pub monthly_interest_percent: Decimal,
    #[validate(custom = "crate::validation::validate_percent_range")]
    pub service_tax_percent: Decimal,
    #[validate(custom = "crate::validation::validate_percent_range")]
    pub material_tax_percent: Decimal,
}

/// In-memory cache for pricing configuration
#[derive(Debug, Clone)]
struct ConfigCache {
    defaults: Option<PricingDefaults>,
    visit_discounts: HashMap<i32, Decimal>,
    last_updated: HashMap<String, Instant>,
}

impl ConfigCache {
    fn new() -> Self {
        Self {
            defaults: None,
            visit_discounts: HashMap::new(),
            last_updated: HashMap::new(),
        }
    }

    fn is_stale(&self, kind: &str, ttl: Duration) -> bool {
        match self.last_updated.get(kind) {
            Some(last_update) => last_update.elapsed() > ttl,
            None => true, // Never loaded
        }
    }

    fn mark_updated(&mut self, kind: &str) {
        self.last_updated.insert(kind.to_string(), Instant::now());
    }
}

/// Pricing Defaults Store
///
/// Shared by the quote and proposal services. Reads go through the cache;
/// writes update the database and invalidate the affected entry.
pub struct PricingDefaultsStore {
    pool: PgPool,
    cache: Arc<RwLock<ConfigCache>>,
    cache_ttl: Duration,
}

impl PricingDefaultsStore {
    /// Create a new PricingDefaultsStore
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            cache: Arc::new(RwLock::new(ConfigCache::new())),
            cache_ttl: CACHE_TTL,
        }
    }

    /// Load the pricing defaults row from the database
    async fn load_defaults(&self) -> PricingResult<PricingDefaults> {
        let defaults = sqlx::query_as::<_, PricingDefaults>(
            r#"
            SELECT config_id, rate_per_km, boleto_fee, monthly_interest_percent,
                   service_tax_percent, material_tax_percent, updated_at
            FROM pricing_defaults
            WHERE config_id = 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| PricingError::ConfigurationNotFound("pricing_defaults".to_string()))?;

        Self::validate_defaults(&defaults)?;

        Ok(defaults)
    }

    /// Load the visit-discount table from the database
    async fn load_visit_discounts(&self) -> PricingResult<HashMap<i32, Decimal>> {
        let rows = sqlx::query_as::<_, VisitDiscount>(
            "SELECT visit_count, discount_percent FROM visit_discounts ORDER BY visit_count",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut map = HashMap::new();
        for row in rows {
            if row.discount_percent < Decimal::ZERO || row.discount_percent > Decimal::from(100) {
                return Err(PricingError::InvalidConfiguration(format!(
                    "Discount percent for {} visits must be within 0..=100",
                    row.visit_count
                )));
            }
            map.insert(row.visit_count, row.discount_percent);
        }

        Ok(map)
    }

    fn validate_defaults(defaults: &PricingDefaults) -> PricingResult<()> {
        if defaults.rate_per_km < Decimal::ZERO {
            return Err(PricingError::InvalidConfiguration(
                "rate_per_km must be non-negative".to_string(),
            ));
        }
        if defaults.boleto_fee < Decimal::ZERO {
            return Err(PricingError::InvalidConfiguration(
                "boleto_fee must be non-negative".to_string(),
            ));
        }
        for (name, value) in [
            ("monthly_interest_percent", defaults.monthly_interest_percent),
            ("service_tax_percent", defaults.service_tax_percent),
            ("material_tax_percent", defaults.material_tax_percent),
        ] {
            if value < Decimal::ZERO || value > Decimal::from(100) {
                return Err(PricingError::InvalidConfiguration(format!(
                    "{} must be within 0..=100",
                    name
                )));
            }
        }
        Ok(())
    }

    /// Get the pricing defaults, refreshing the cache when stale
    pub async fn defaults(&self) -> PricingResult<PricingDefaults> {
        self.refresh_if_stale("defaults").await?;

        let cache = self.cache.read().await;
        cache
            .defaults
            .clone()
            .ok_or_else(|| PricingError::ConfigurationNotFound("pricing_defaults".to_string()))
    }

    /// Get the full visit-discount table, refreshing the cache when stale
    pub async fn visit_discounts(&self) -> PricingResult<Vec<VisitDiscount>> {
        self.refresh_if_stale("visit_discounts").await?;

        let cache = self.cache.read().await;
        let mut rows: Vec<VisitDiscount> = cache
            .visit_discounts
            .iter()
            .map(|(visit_count, discount_percent)| VisitDiscount {
                visit_count: *visit_count,
                discount_percent: *discount_percent,
            })
            .collect();
        rows.sort_by_key(|row| row.visit_count);
        Ok(rows)
    }

    /// Discount percent for a visit count
    ///
    /// Visit counts without a configured row get no discount rather than an
    /// error; the table is sparse by design.
    pub async fn visit_discount_percent(&self, visit_count: i32) -> PricingResult<Decimal> {
        self.refresh_if_stale("visit_discounts").await?;

        let cache = self.cache.read().await;
        Ok(cache
            .visit_discounts
            .get(&visit_count)
            .copied()
            .unwrap_or(Decimal::ZERO))
    }

    /// Update the pricing defaults row and invalidate the cache
    pub async fn update_defaults(
        &self,
        update: &UpdatePricingDefaults,
    ) -> PricingResult<PricingDefaults> {
        let defaults = sqlx::query_as::<_, PricingDefaults>(
            r#"
            UPDATE pricing_defaults
            SET rate_per_km = $1,
                boleto_fee = $2,
                monthly_interest_percent = $3,
                service_tax_percent = $4,
                material_tax_percent = $5,
                updated_at = NOW()
            WHERE config_id = 1
            RETURNING config_id, rate_per_km, boleto_fee, monthly_interest_percent,
                      service_tax_percent, material_tax_percent, updated_at
            "#,
        )
        .bind(update.rate_per_km)
        .bind(update.boleto_fee)
        .bind(update.monthly_interest_percent)
        .bind(update.service_tax_percent)
        .bind(update.material_tax_percent)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| PricingError::ConfigurationNotFound("pricing_defaults".to_string()))?;

        self.invalidate_cache("defaults").await;

        Ok(defaults)
    }

    /// Upsert one visit-discount row and invalidate the cache
    pub async fn upsert_visit_discount(
        &self,
        visit_count: i32,
        discount_percent: Decimal,
    ) -> PricingResult<VisitDiscount> {
        if discount_percent < Decimal::ZERO || discount_percent > Decimal::from(100) {
            return Err(PricingError::InvalidConfiguration(
                "discount_percent must be within 0..=100".to_string(),
            ));
        }

        let row = sqlx::query_as::<_, VisitDiscount>(
            r#"
            INSERT INTO visit_discounts (visit_count, discount_percent)
            VALUES ($1, $2)
            ON CONFLICT (visit_count)
            DO UPDATE SET discount_percent = EXCLUDED.discount_percent
            RETURNING visit_count, discount_percent
            "#,
        )
        .bind(visit_count)
        .bind(discount_percent)
        .fetch_one(&self.pool)
        .await?;

        self.invalidate_cache("visit_discounts").await;

        Ok(row)
    }

    /// Refresh the cache entry when its TTL has expired
    async fn refresh_if_stale(&self, kind: &str) -> PricingResult<()> {
        // Fast path under the read lock
        {
            let cache = self.cache.read().await;
            if !cache.is_stale(kind, self.cache_ttl) {
                return Ok(());
            }
        }

        let mut cache = self.cache.write().await;

        // Double-check: another task may have refreshed while we waited
        if !cache.is_stale(kind, self.cache_ttl) {
            return Ok(());
        }

        match kind {
            "defaults" => {
                let defaults = self.load_defaults().await?;
                cache.defaults = Some(defaults);
                cache.mark_updated("defaults");
            }
            "visit_discounts" => {
                let discounts = self.load_visit_discounts().await?;
                cache.visit_discounts = discounts;
                cache.mark_updated("visit_discounts");
            }
            _ => {
                return Err(PricingError::InvalidConfiguration(format!(
                    "Unknown configuration kind: {}",
                    kind
                )));
            }
        }

        Ok(())
    }

    /// Invalidate a cache entry, forcing the next read to hit the database
    pub async fn invalidate_cache(&self, kind: &str) {
        let mut cache = self.cache.write().await;
        cache.last_updated.remove(kind);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_config_cache_is_stale() {
        let mut cache = ConfigCache::new();

        // Never loaded: stale
        assert!(cache.is_stale("defaults", Duration::from_secs(60)));

        cache.mark_updated("defaults");
        assert!(!cache.is_stale("defaults", Duration::from_secs(60)));

        // Zero TTL: immediately stale again
        assert!(cache.is_stale("defaults", Duration::from_secs(0)));
    }

    #[test]
    fn test_validate_defaults_accepts_sane_values() {
        let defaults = PricingDefaults {
            config_id: 1,
            rate_per_km: dec!(1.50),
            boleto_fee: dec!(3.50),
            monthly_interest_percent: dec!(2),
            service_tax_percent: dec!(10.9),
            material_tax_percent: dec!(12.7),
            updated_at: Utc::now(),
        };

        assert!(PricingDefaultsStore::validate_defaults(&defaults).is_ok());
    }

    #[test]
    fn test_validate_defaults_rejects_negative_rate() {
        let defaults = PricingDefaults {
            config_id: 1,
            rate_per_km: dec!(-1),
            boleto_fee: dec!(3.50),
            monthly_interest_percent: dec!(2),
            service_tax_percent: dec!(10.9),
            material_tax_percent: dec!(12.7),
            updated_at: Utc::now(),
        };

        assert!(PricingDefaultsStore::validate_defaults(&defaults).is_err());
    }

    #[test]
    fn test_validate_defaults_rejects_percent_out_of_range() {
        let defaults = PricingDefaults {
            config_id: 1,
            rate_per_km: dec!(1.50),
            boleto_fee: dec!(3.50),
            monthly_interest_percent: dec!(101),
            service_tax_percent: dec!(10.9),
            material_tax_percent: dec!(12.7),
            updated_at: Utc::now(),
        };

        assert!(PricingDefaultsStore::validate_defaults(&defaults).is_err());
    }
}
