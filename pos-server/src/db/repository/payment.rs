//! Payment Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Payment, PaymentCreate, PaymentStatus};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "payment";

/// Cash payments settle immediately
const DEFAULT_METHOD: &str = "cash";
const DEFAULT_CURRENCY: &str = "INR";

#[derive(Clone)]
pub struct PaymentRepository {
    base: BaseRepository,
}

impl PaymentRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all payment records, newest first
    pub async fn find_all(&self) -> RepoResult<Vec<Payment>> {
        let payments: Vec<Payment> = self
            .base
            .db()
            .query("SELECT * FROM payment ORDER BY created_at DESC")
            .await?
            .take(0)?;
        Ok(payments)
    }

    /// Find all payments recorded against an order
    pub async fn find_by_order(&self, order_id: &str) -> RepoResult<Vec<Payment>> {
        let payments: Vec<Payment> = self
            .base
            .db()
            .query("SELECT * FROM payment WHERE order_id = $order_id ORDER BY created_at DESC")
            .bind(("order_id", order_id.to_string()))
            .await?
            .take(0)?;
        Ok(payments)
    }

    /// Record a completed cash payment
    pub async fn create(&self, data: PaymentCreate) -> RepoResult<Payment> {
        if data.amount <= 0.0 {
            return Err(RepoError::Validation(
                "Payment amount must be positive".to_string(),
            ));
        }

        let payment = Payment {
            id: None,
            order_id: data.order_id,
            amount: data.amount,
            currency: DEFAULT_CURRENCY.to_string(),
            status: PaymentStatus::Completed,
            method: DEFAULT_METHOD.to_string(),
            created_at: Some(chrono::Utc::now().to_rfc3339()),
        };

        let created: Option<Payment> = self.base.db().create(TABLE).content(payment).await?;
        created.ok_or_else(|| RepoError::Database("Failed to record payment".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;

    #[tokio::test]
    async fn records_completed_cash_payments() {
        let service = DbService::new_in_memory().await.unwrap();
        let repo = PaymentRepository::new(service.db);

        let payment = repo
            .create(PaymentCreate {
                order_id: "order-1".into(),
                amount: 275.5,
            })
            .await
            .unwrap();
        assert_eq!(payment.status, PaymentStatus::Completed);
        assert_eq!(payment.method, "cash");

        let by_order = repo.find_by_order("order-1").await.unwrap();
        assert_eq!(by_order.len(), 1);
        assert!(repo.find_by_order("other").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn non_positive_amount_is_rejected() {
        let service = DbService::new_in_memory().await.unwrap();
        let repo = PaymentRepository::new(service.db);
        let err = repo
            .create(PaymentCreate {
                order_id: "order-1".into(),
                amount: 0.0,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Validation(_)));
    }
}
