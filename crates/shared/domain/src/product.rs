//! Product domain entity, patch and list filter.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{MAX_PRICE_CENTS, MIN_NAME_LENGTH, PRICE_SCALE};
use crate::error::{DomainError, DomainResult};

/// Catalog item. `category_id` always refers to an existing category at the
/// time the product was written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    #[cfg_attr(feature = "openapi", schema(value_type = f64, example = 19.99))]
    pub price: Decimal,
    pub stock: i64,
    pub category_id: Uuid,
    pub is_active: bool,
    pub image_url: Option<String>,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Build a product from validated input and a resolved category.
    pub fn new(input: NewProduct, category_id: Uuid) -> DomainResult<Self> {
        input.validate()?;
        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            name: input.name.trim().to_string(),
            description: input.description,
            price: input.price,
            stock: input.stock,
            category_id,
            is_active: input.is_active,
            image_url: input.image_url,
            tags: input.tags,
            created_at: now,
            updated_at: now,
        })
    }

    /// Merge a validated patch. `category_id` is the resolved reference when
    /// the patch names a category.
    pub fn apply(&mut self, patch: ProductPatch, category_id: Option<Uuid>) {
        if let Some(name) = patch.name {
            self.name = name.trim().to_string();
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(stock) = patch.stock {
            self.stock = stock;
        }
        if let Some(category_id) = category_id {
            self.category_id = category_id;
        }
        if let Some(is_active) = patch.is_active {
            self.is_active = is_active;
        }
        if let Some(image_url) = patch.image_url {
            self.image_url = Some(image_url);
        }
        if let Some(tags) = patch.tags {
            self.tags = tags;
        }
        self.updated_at = Utc::now();
    }

    /// Case-insensitive substring match on name or description, or exact
    /// tag membership.
    pub fn matches_term(&self, term: &str) -> bool {
        let needle = term.to_lowercase();
        self.name.to_lowercase().contains(&needle)
            || self.description.to_lowercase().contains(&needle)
            || self.tags.iter().any(|tag| tag == term)
    }
}

/// Product creation input. `category_id` is the caller's opaque handle.
#[derive(Debug, Clone, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub stock: i64,
    pub category_id: String,
    pub is_active: bool,
    pub image_url: Option<String>,
    pub tags: Vec<String>,
}

impl NewProduct {
    pub fn validate(&self) -> DomainResult<()> {
        validate_name(&self.name)?;
        validate_price(self.price)?;
        validate_stock(self.stock)
    }
}

/// Partial product update
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub stock: Option<i64>,
    pub category_id: Option<String>,
    pub is_active: Option<bool>,
    pub image_url: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl ProductPatch {
    pub fn validate(&self) -> DomainResult<()> {
        if let Some(name) = &self.name {
            validate_name(name)?;
        }
        if let Some(price) = self.price {
            validate_price(price)?;
        }
        if let Some(stock) = self.stock {
            validate_stock(stock)?;
        }
        Ok(())
    }
}

fn validate_name(name: &str) -> DomainResult<()> {
    if name.trim().chars().count() < MIN_NAME_LENGTH {
        return Err(DomainError::validation("Product name is required"));
    }
    Ok(())
}

fn validate_price(price: Decimal) -> DomainResult<()> {
    if price < Decimal::ZERO {
        return Err(DomainError::validation("Price must not be negative"));
    }
    if price.normalize().scale() > PRICE_SCALE {
        return Err(DomainError::validation(
            "Price must have at most two decimal places",
        ));
    }
    if price > Decimal::new(MAX_PRICE_CENTS, PRICE_SCALE) {
        return Err(DomainError::validation("Price is too large"));
    }
    Ok(())
}

fn validate_stock(stock: i64) -> DomainResult<()> {
    if stock < 0 {
        return Err(DomainError::validation("Stock must not be negative"));
    }
    Ok(())
}

/// Conjunctive product list filter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFilter {
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub category_id: Option<Uuid>,
    pub active_only: bool,
}

impl ProductFilter {
    pub fn matches(&self, product: &Product) -> bool {
        if self.active_only && !product.is_active {
            return false;
        }
        if let Some(category_id) = self.category_id {
            if product.category_id != category_id {
                return false;
            }
        }
        if let Some(min) = self.min_price {
            if product.price < min {
                return false;
            }
        }
        if let Some(max) = self.max_price {
            if product.price > max {
                return false;
            }
        }
        true
    }
}
