//! Menu Item Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{MenuCategory, MenuItem, MenuItemCreate, MenuItemUpdate};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "menu_item";

#[derive(Clone)]
pub struct MenuItemRepository {
    base: BaseRepository,
}

impl MenuItemRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all menu items, optionally filtered by category
    pub async fn find_all(&self, category: Option<MenuCategory>) -> RepoResult<Vec<MenuItem>> {
        let items: Vec<MenuItem> = match category {
            Some(category) => {
                self.base
                    .db()
                    .query("SELECT * FROM menu_item WHERE category = $category ORDER BY title")
                    .bind(("category", category))
                    .await?
                    .take(0)?
            }
            None => {
                self.base
                    .db()
                    .query("SELECT * FROM menu_item ORDER BY title")
                    .await?
                    .take(0)?
            }
        };
        Ok(items)
    }

    /// Find menu item by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<MenuItem>> {
        let thing = self.base.parse_id(id)?;
        let item: Option<MenuItem> = self.base.db().select(thing).await?;
        Ok(item)
    }

    /// Find menu item by title (duplicate guard)
    pub async fn find_by_title(&self, title: &str) -> RepoResult<Option<MenuItem>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM menu_item WHERE title = $title LIMIT 1")
            .bind(("title", title.to_string()))
            .await?;
        let items: Vec<MenuItem> = result.take(0)?;
        Ok(items.into_iter().next())
    }

    /// Create a new menu item
    pub async fn create(&self, data: MenuItemCreate) -> RepoResult<MenuItem> {
        if data.title.trim().is_empty() {
            return Err(RepoError::Validation(
                "Menu item title is required".to_string(),
            ));
        }
        if data.price < 0.0 {
            return Err(RepoError::Validation(
                "Price cannot be negative".to_string(),
            ));
        }
        if self.find_by_title(&data.title).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Menu item '{}' already exists",
                data.title
            )));
        }

        let now = chrono::Utc::now().to_rfc3339();
        let item = MenuItem {
            id: None,
            title: data.title,
            category: data.category,
            price: data.price,
            is_available: true,
            description: data.description,
            created_at: Some(now.clone()),
            updated_at: Some(now),
        };

        let created: Option<MenuItem> = self.base.db().create(TABLE).content(item).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create menu item".to_string()))
    }

    /// Update a menu item
    pub async fn update(&self, id: &str, data: MenuItemUpdate) -> RepoResult<MenuItem> {
        let thing = self.base.parse_id(id)?;
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Menu item {} not found", id)))?;

        if let Some(price) = data.price
            && price < 0.0
        {
            return Err(RepoError::Validation(
                "Price cannot be negative".to_string(),
            ));
        }

        if let Some(title) = data.title.as_ref()
            && title != &existing.title
            && let Some(found) = self.find_by_title(title).await?
            && found.id != existing.id
        {
            return Err(RepoError::Duplicate(format!(
                "Menu item '{}' already exists",
                title
            )));
        }

        let title = data.title.unwrap_or(existing.title);
        let category = data.category.unwrap_or(existing.category);
        let price = data.price.unwrap_or(existing.price);
        let is_available = data.is_available.unwrap_or(existing.is_available);
        let description = data.description.or(existing.description);
        let updated_at = chrono::Utc::now().to_rfc3339();

        self.base
            .db()
            .query(
                "UPDATE $thing SET title = $title, category = $category, price = $price, \
                 is_available = $is_available, description = $description, updated_at = $updated_at",
            )
            .bind(("thing", thing))
            .bind(("title", title))
            .bind(("category", category))
            .bind(("price", price))
            .bind(("is_available", is_available))
            .bind(("description", description))
            .bind(("updated_at", updated_at))
            .await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Menu item {} not found", id)))
    }

    /// Hard delete a menu item
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let thing = self.base.parse_id(id)?;
        if self.find_by_id(id).await?.is_none() {
            return Err(RepoError::NotFound(format!("Menu item {} not found", id)));
        }
        self.base
            .db()
            .query("DELETE $thing")
            .bind(("thing", thing))
            .await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;

    async fn repo() -> MenuItemRepository {
        let service = DbService::new_in_memory().await.unwrap();
        MenuItemRepository::new(service.db)
    }

    fn create(title: &str, category: MenuCategory, price: f64) -> MenuItemCreate {
        MenuItemCreate {
            title: title.into(),
            category,
            price,
            description: None,
        }
    }

    #[tokio::test]
    async fn create_and_list_by_category() {
        let repo = repo().await;
        repo.create(create("Kacchi Biriyani", MenuCategory::Biriyani, 320.0))
            .await
            .unwrap();
        repo.create(create("Coke", MenuCategory::Drinks, 25.0))
            .await
            .unwrap();

        let all = repo.find_all(None).await.unwrap();
        assert_eq!(all.len(), 2);

        let drinks = repo.find_all(Some(MenuCategory::Drinks)).await.unwrap();
        assert_eq!(drinks.len(), 1);
        assert_eq!(drinks[0].title, "Coke");
        assert!(drinks[0].is_available);
    }

    #[tokio::test]
    async fn duplicate_title_is_rejected() {
        let repo = repo().await;
        repo.create(create("Coke", MenuCategory::Drinks, 25.0))
            .await
            .unwrap();
        let err = repo
            .create(create("Coke", MenuCategory::Drinks, 30.0))
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Duplicate(_)));
    }

    #[tokio::test]
    async fn negative_price_is_rejected() {
        let repo = repo().await;
        let err = repo
            .create(create("Coke", MenuCategory::Drinks, -1.0))
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Validation(_)));
    }

    #[tokio::test]
    async fn update_toggles_availability() {
        let repo = repo().await;
        let item = repo
            .create(create("Coke", MenuCategory::Drinks, 25.0))
            .await
            .unwrap();
        let id = item.id.as_ref().unwrap().to_string();

        let updated = repo
            .update(
                &id,
                MenuItemUpdate {
                    is_available: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(!updated.is_available);
        assert_eq!(updated.price, 25.0);
    }
}
