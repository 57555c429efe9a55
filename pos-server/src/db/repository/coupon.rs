//! Coupon Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Coupon, CouponApplied, CouponCreate, CouponUpdate};
use crate::orders::money;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "coupon";

#[derive(Clone)]
pub struct CouponRepository {
    base: BaseRepository,
}

impl CouponRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all coupons
    pub async fn find_all(&self) -> RepoResult<Vec<Coupon>> {
        let coupons: Vec<Coupon> = self
            .base
            .db()
            .query("SELECT * FROM coupon ORDER BY code")
            .await?
            .take(0)?;
        Ok(coupons)
    }

    /// Find coupon by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Coupon>> {
        let thing = self.base.parse_id(id)?;
        let coupon: Option<Coupon> = self.base.db().select(thing).await?;
        Ok(coupon)
    }

    /// Find an active coupon by code
    pub async fn find_active_by_code(&self, code: &str) -> RepoResult<Option<Coupon>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM coupon WHERE code = $code AND is_active = true LIMIT 1")
            .bind(("code", code.to_string()))
            .await?;
        let coupons: Vec<Coupon> = result.take(0)?;
        Ok(coupons.into_iter().next())
    }

    /// Find coupon by code regardless of active flag (duplicate guard)
    pub async fn find_by_code(&self, code: &str) -> RepoResult<Option<Coupon>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM coupon WHERE code = $code LIMIT 1")
            .bind(("code", code.to_string()))
            .await?;
        let coupons: Vec<Coupon> = result.take(0)?;
        Ok(coupons.into_iter().next())
    }

    /// Create a new coupon
    pub async fn create(&self, data: CouponCreate) -> RepoResult<Coupon> {
        if data.code.trim().is_empty() {
            return Err(RepoError::Validation("Coupon code is required".to_string()));
        }
        if !(0.0..=100.0).contains(&data.discount_percentage) {
            return Err(RepoError::Validation(
                "Discount percentage must be between 0 and 100".to_string(),
            ));
        }
        if self.find_by_code(&data.code).await?.is_some() {
            return Err(RepoError::Duplicate(
                "Coupon code already exists!".to_string(),
            ));
        }

        let coupon = Coupon {
            id: None,
            code: data.code,
            discount_percentage: data.discount_percentage,
            expiration_date: data.expiration_date,
            is_active: data.is_active.unwrap_or(true),
            created_at: Some(chrono::Utc::now().to_rfc3339()),
        };

        let created: Option<Coupon> = self.base.db().create(TABLE).content(coupon).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create coupon".to_string()))
    }

    /// Update a coupon
    pub async fn update(&self, id: &str, data: CouponUpdate) -> RepoResult<Coupon> {
        let thing = self.base.parse_id(id)?;
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Coupon {} not found", id)))?;

        if let Some(code) = data.code.as_ref()
            && code != &existing.code
            && self.find_by_code(code).await?.is_some()
        {
            return Err(RepoError::Duplicate(
                "Coupon code already exists!".to_string(),
            ));
        }
        if let Some(pct) = data.discount_percentage
            && !(0.0..=100.0).contains(&pct)
        {
            return Err(RepoError::Validation(
                "Discount percentage must be between 0 and 100".to_string(),
            ));
        }

        let code = data.code.unwrap_or(existing.code);
        let discount_percentage = data.discount_percentage.unwrap_or(existing.discount_percentage);
        let expiration_date = data.expiration_date.or(existing.expiration_date);
        let is_active = data.is_active.unwrap_or(existing.is_active);

        self.base
            .db()
            .query(
                "UPDATE $thing SET code = $code, discount_percentage = $discount_percentage, \
                 expiration_date = $expiration_date, is_active = $is_active",
            )
            .bind(("thing", thing))
            .bind(("code", code))
            .bind(("discount_percentage", discount_percentage))
            .bind(("expiration_date", expiration_date))
            .bind(("is_active", is_active))
            .await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Coupon {} not found", id)))
    }

    /// Hard delete a coupon
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let thing = self.base.parse_id(id)?;
        if self.find_by_id(id).await?.is_none() {
            return Err(RepoError::NotFound(format!("Coupon {} not found", id)));
        }
        self.base
            .db()
            .query("DELETE $thing")
            .bind(("thing", thing))
            .await?;
        Ok(true)
    }

    /// Apply a coupon code to a bill total
    ///
    /// Validates code, active flag and expiry, then computes the
    /// percentage discount against the supplied total.
    pub async fn apply(&self, code: &str, total_amount: f64) -> RepoResult<CouponApplied> {
        let coupon = self
            .find_active_by_code(code)
            .await?
            .ok_or_else(|| RepoError::NotFound("Invalid or expired coupon code!".to_string()))?;

        if let Some(expiry) = coupon.expiration_date.as_deref() {
            let expiry = DateTime::parse_from_rfc3339(expiry).map_err(|_| {
                RepoError::Database(format!("Malformed expiration date on coupon {}", coupon.code))
            })?;
            if Utc::now() > expiry {
                return Err(RepoError::Validation("Coupon has expired!".to_string()));
            }
        }

        let total = money::to_decimal(total_amount);
        let pct = money::to_decimal(coupon.discount_percentage);
        let discount_amount = money::to_f64(total * pct / Decimal::ONE_HUNDRED);
        let total_with_discount = money::to_f64(total - money::to_decimal(discount_amount));

        Ok(CouponApplied {
            coupon_code: coupon.code,
            discount_amount,
            total_with_discount,
        })
    }
}
