//! In-process storage.
//!
//! Implements every repository over a shared, lock-protected set of maps.
//! Unique keys and the product→category reference are enforced on write,
//! matching the constraints of the Postgres schema. Selected with a
//! `memory://` database URL and used by the integration tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::unit_of_work::UnitOfWork;
use crate::repository::{CategoryRepository, ProductRepository, UserRepository};
use common::{AppError, AppResult};
use domain::{Category, Page, Product, ProductFilter, User};

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    categories: HashMap<Uuid, Category>,
    products: HashMap<Uuid, Product>,
}

/// Cloneable handle; clones share the same data.
#[derive(Clone)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
    available: Arc<AtomicBool>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            tables: Arc::new(RwLock::new(Tables::default())),
            available: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Simulate losing the connection; every call then fails with
    /// `Unavailable`.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    fn check_available(&self) -> AppResult<()> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(AppError::unavailable("Storage"))
        }
    }
}

fn paginate<T>(items: Vec<T>, page: Page) -> Vec<T> {
    items
        .into_iter()
        .skip(page.offset as usize)
        .take(page.limit as usize)
        .collect()
}

fn newest_first(mut products: Vec<Product>) -> Vec<Product> {
    products.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
    products
}

#[async_trait]
impl UnitOfWork for MemoryStore {
    fn users(&self) -> Arc<dyn UserRepository> {
        Arc::new(self.clone())
    }

    fn categories(&self) -> Arc<dyn CategoryRepository> {
        Arc::new(self.clone())
    }

    fn products(&self) -> Arc<dyn ProductRepository> {
        Arc::new(self.clone())
    }

    async fn ping(&self) -> AppResult<()> {
        self.check_available()
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        self.check_available()?;
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        self.check_available()?;
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        self.check_available()?;
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.username == username).cloned())
    }

    async fn insert(&self, user: User) -> AppResult<User> {
        self.check_available()?;
        let mut tables = self.tables.write().await;
        if tables
            .users
            .values()
            .any(|u| u.email == user.email || u.username == user.username)
        {
            return Err(AppError::conflict("User"));
        }
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update(&self, user: User) -> AppResult<User> {
        self.check_available()?;
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&user.id) {
            return Err(AppError::not_found("User"));
        }
        if tables
            .users
            .values()
            .any(|u| u.id != user.id && (u.email == user.email || u.username == user.username))
        {
            return Err(AppError::conflict("User"));
        }
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn list(&self, page: Page) -> AppResult<Vec<User>> {
        self.check_available()?;
        let tables = self.tables.read().await;
        let mut users: Vec<User> = tables.users.values().cloned().collect();
        users.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(paginate(users, page))
    }
}

#[async_trait]
impl CategoryRepository for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Category>> {
        self.check_available()?;
        Ok(self.tables.read().await.categories.get(&id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Category>> {
        self.check_available()?;
        let tables = self.tables.read().await;
        Ok(tables.categories.values().find(|c| c.name == name).cloned())
    }

    async fn insert(&self, category: Category) -> AppResult<Category> {
        self.check_available()?;
        let mut tables = self.tables.write().await;
        if tables.categories.values().any(|c| c.name == category.name) {
            return Err(AppError::conflict("Category name"));
        }
        tables.categories.insert(category.id, category.clone());
        Ok(category)
    }

    async fn update(&self, category: Category) -> AppResult<Category> {
        self.check_available()?;
        let mut tables = self.tables.write().await;
        if !tables.categories.contains_key(&category.id) {
            return Err(AppError::not_found("Category"));
        }
        if tables
            .categories
            .values()
            .any(|c| c.id != category.id && c.name == category.name)
        {
            return Err(AppError::conflict("Category name"));
        }
        tables.categories.insert(category.id, category.clone());
        Ok(category)
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        self.check_available()?;
        let mut tables = self.tables.write().await;
        if tables.products.values().any(|p| p.category_id == id) {
            return Err(AppError::has_dependents("Category"));
        }
        Ok(tables.categories.remove(&id).is_some())
    }

    async fn list(&self, page: Page) -> AppResult<Vec<Category>> {
        self.check_available()?;
        let tables = self.tables.read().await;
        let mut categories: Vec<Category> = tables.categories.values().cloned().collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(paginate(categories, page))
    }
}

#[async_trait]
impl ProductRepository for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Product>> {
        self.check_available()?;
        Ok(self.tables.read().await.products.get(&id).cloned())
    }

    async fn insert(&self, product: Product) -> AppResult<Product> {
        self.check_available()?;
        let mut tables = self.tables.write().await;
        if !tables.categories.contains_key(&product.category_id) {
            return Err(AppError::not_found("Category"));
        }
        tables.products.insert(product.id, product.clone());
        Ok(product)
    }

    async fn update(&self, product: Product) -> AppResult<Product> {
        self.check_available()?;
        let mut tables = self.tables.write().await;
        if !tables.products.contains_key(&product.id) {
            return Err(AppError::not_found("Product"));
        }
        if !tables.categories.contains_key(&product.category_id) {
            return Err(AppError::not_found("Category"));
        }
        tables.products.insert(product.id, product.clone());
        Ok(product)
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        self.check_available()?;
        Ok(self.tables.write().await.products.remove(&id).is_some())
    }

    async fn list(&self, filter: &ProductFilter, page: Page) -> AppResult<Vec<Product>> {
        self.check_available()?;
        let tables = self.tables.read().await;
        let matching = tables
            .products
            .values()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect();
        Ok(paginate(newest_first(matching), page))
    }

    async fn search(&self, term: &str, page: Page) -> AppResult<Vec<Product>> {
        self.check_available()?;
        let tables = self.tables.read().await;
        let matching = tables
            .products
            .values()
            .filter(|p| p.matches_term(term))
            .cloned()
            .collect();
        Ok(paginate(newest_first(matching), page))
    }

    async fn count_by_category(&self, category_id: Uuid) -> AppResult<u64> {
        self.check_available()?;
        let tables = self.tables.read().await;
        Ok(tables
            .products
            .values()
            .filter(|p| p.category_id == category_id)
            .count() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::{NewCategory, NewProduct, Password};
    use rust_decimal::Decimal;

    fn category(name: &str) -> Category {
        Category::new(NewCategory {
            name: name.to_string(),
            description: None,
        })
        .unwrap()
    }

    fn product(name: &str, category_id: Uuid) -> Product {
        Product::new(
            NewProduct {
                name: name.to_string(),
                description: String::new(),
                price: Decimal::from(10),
                stock: 1,
                category_id: category_id.to_string(),
                is_active: true,
                image_url: None,
                tags: vec![],
            },
            category_id,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_categories_sorted_by_name() {
        let store = MemoryStore::new();
        for name in ["Tools", "Garden", "Books"] {
            CategoryRepository::insert(&store, category(name)).await.unwrap();
        }

        let names: Vec<String> = CategoryRepository::list(&store, Page::default())
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Books", "Garden", "Tools"]);

        let second: Vec<String> = CategoryRepository::list(&store, Page::new(1, 1))
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(second, vec!["Garden"]);
    }

    #[tokio::test]
    async fn test_unique_keys_enforced() {
        let store = MemoryStore::new();
        CategoryRepository::insert(&store, category("Tools")).await.unwrap();
        let err = CategoryRepository::insert(&store, category("Tools"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        let password = Password::from_hash("x");
        let first = User::new("a@x.com".into(), "a".into(), password.clone());
        let dup = User::new("a@x.com".into(), "b".into(), password);
        UserRepository::insert(&store, first).await.unwrap();
        assert!(matches!(
            UserRepository::insert(&store, dup).await,
            Err(AppError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn test_product_reference_enforced() {
        let store = MemoryStore::new();
        let err = ProductRepository::insert(&store, product("Orphan", Uuid::new_v4()))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let tools = CategoryRepository::insert(&store, category("Tools")).await.unwrap();
        ProductRepository::insert(&store, product("Hammer", tools.id))
            .await
            .unwrap();
        let err = CategoryRepository::delete(&store, tools.id).await.unwrap_err();
        assert!(matches!(err, AppError::HasDependents(_)));
    }

    #[tokio::test]
    async fn test_unavailable_store() {
        let store = MemoryStore::new();
        store.set_available(false);
        assert!(matches!(
            UserRepository::find_by_id(&store, Uuid::new_v4()).await,
            Err(AppError::Unavailable(_))
        ));
        assert!(store.ping().await.is_err());

        store.set_available(true);
        assert!(store.ping().await.is_ok());
    }
}
