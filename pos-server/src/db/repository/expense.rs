//! Expense Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Expense, ExpenseCategory, ExpenseCreate, ExpenseUpdate};
use crate::orders::money;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "expense";

/// amount × amount_per_unit when a per-unit value is set, else amount
fn computed_total(amount: f64, amount_per_unit: Option<f64>) -> f64 {
    match amount_per_unit {
        Some(per_unit) if per_unit > 0.0 => {
            money::to_f64(money::to_decimal(amount) * money::to_decimal(per_unit))
        }
        _ => money::to_f64(money::to_decimal(amount)),
    }
}

#[derive(Clone)]
pub struct ExpenseRepository {
    base: BaseRepository,
}

impl ExpenseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all expenses, optionally filtered by category; soft-deleted
    /// rows are excluded
    pub async fn find_all(&self, category: Option<ExpenseCategory>) -> RepoResult<Vec<Expense>> {
        let expenses: Vec<Expense> = match category {
            Some(category) => {
                self.base
                    .db()
                    .query(
                        "SELECT * FROM expense WHERE is_deleted = false AND category = $category \
                         ORDER BY created_at DESC",
                    )
                    .bind(("category", category))
                    .await?
                    .take(0)?
            }
            None => {
                self.base
                    .db()
                    .query(
                        "SELECT * FROM expense WHERE is_deleted = false ORDER BY created_at DESC",
                    )
                    .await?
                    .take(0)?
            }
        };
        Ok(expenses)
    }

    /// Find expense by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Expense>> {
        let thing = self.base.parse_id(id)?;
        let expense: Option<Expense> = self.base.db().select(thing).await?;
        Ok(expense.filter(|e| !e.is_deleted))
    }

    /// Create a new expense
    pub async fn create(&self, data: ExpenseCreate) -> RepoResult<Expense> {
        if data.title.trim().is_empty() {
            return Err(RepoError::Validation(
                "Expense title is required".to_string(),
            ));
        }
        if data.amount < 0.0 {
            return Err(RepoError::Validation(
                "Amount cannot be negative".to_string(),
            ));
        }
        if let Some(per_unit) = data.amount_per_unit
            && per_unit < 0.0
        {
            return Err(RepoError::Validation(
                "Amount per unit cannot be negative".to_string(),
            ));
        }

        let now = chrono::Utc::now().to_rfc3339();
        let expense = Expense {
            id: None,
            total_amount: computed_total(data.amount, data.amount_per_unit),
            title: data.title,
            amount: data.amount,
            amount_per_unit: data.amount_per_unit,
            category: data.category,
            description: data.description,
            is_deleted: false,
            created_at: Some(now.clone()),
            updated_at: Some(now),
        };

        let created: Option<Expense> = self.base.db().create(TABLE).content(expense).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create expense".to_string()))
    }

    /// Update an expense; total is recomputed from the effective values
    pub async fn update(&self, id: &str, data: ExpenseUpdate) -> RepoResult<Expense> {
        let thing = self.base.parse_id(id)?;
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Expense {} not found", id)))?;

        let title = data.title.unwrap_or(existing.title);
        let amount = data.amount.unwrap_or(existing.amount);
        let amount_per_unit = data.amount_per_unit.or(existing.amount_per_unit);
        let category = data.category.unwrap_or(existing.category);
        let description = data.description.or(existing.description);

        if amount < 0.0 {
            return Err(RepoError::Validation(
                "Amount cannot be negative".to_string(),
            ));
        }

        let total_amount = computed_total(amount, amount_per_unit);
        let updated_at = chrono::Utc::now().to_rfc3339();

        self.base
            .db()
            .query(
                "UPDATE $thing SET title = $title, amount = $amount, \
                 amount_per_unit = $amount_per_unit, total_amount = $total_amount, \
                 category = $category, description = $description, updated_at = $updated_at",
            )
            .bind(("thing", thing))
            .bind(("title", title))
            .bind(("amount", amount))
            .bind(("amount_per_unit", amount_per_unit))
            .bind(("total_amount", total_amount))
            .bind(("category", category))
            .bind(("description", description))
            .bind(("updated_at", updated_at))
            .await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Expense {} not found", id)))
    }

    /// Soft delete an expense
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let thing = self.base.parse_id(id)?;
        if self.find_by_id(id).await?.is_none() {
            return Err(RepoError::NotFound(format!("Expense {} not found", id)));
        }
        self.base
            .db()
            .query("UPDATE $thing SET is_deleted = true")
            .bind(("thing", thing))
            .await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;

    async fn repo() -> ExpenseRepository {
        let service = DbService::new_in_memory().await.unwrap();
        ExpenseRepository::new(service.db)
    }

    fn create(title: &str, amount: f64, per_unit: Option<f64>) -> ExpenseCreate {
        ExpenseCreate {
            title: title.into(),
            amount,
            amount_per_unit: per_unit,
            category: ExpenseCategory::RawMaterials,
            description: None,
        }
    }

    #[tokio::test]
    async fn total_uses_per_unit_amount_when_set() {
        let repo = repo().await;
        let expense = repo.create(create("Rice", 40.0, Some(25.0))).await.unwrap();
        assert_eq!(expense.total_amount, 1000.0);

        let flat = repo.create(create("Electricity", 350.0, None)).await.unwrap();
        assert_eq!(flat.total_amount, 350.0);
    }

    #[tokio::test]
    async fn update_recomputes_total() {
        let repo = repo().await;
        let expense = repo.create(create("Rice", 40.0, Some(25.0))).await.unwrap();
        let id = expense.id.as_ref().unwrap().to_string();

        let updated = repo
            .update(
                &id,
                ExpenseUpdate {
                    amount: Some(50.0),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.total_amount, 1250.0);
    }

    #[tokio::test]
    async fn soft_deleted_rows_disappear_from_reads() {
        let repo = repo().await;
        let expense = repo.create(create("Rice", 40.0, None)).await.unwrap();
        let id = expense.id.as_ref().unwrap().to_string();

        repo.delete(&id).await.unwrap();
        assert!(repo.find_by_id(&id).await.unwrap().is_none());
        assert!(repo.find_all(None).await.unwrap().is_empty());

        // deleting twice reports not found
        let err = repo.delete(&id).await.unwrap_err();
        assert!(matches!(err, RepoError::NotFound(_)));
    }
}
