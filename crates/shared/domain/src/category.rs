//! Category domain entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::MIN_NAME_LENGTH;
use crate::error::{DomainError, DomainResult};

/// Product classification. Names are unique across the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Category {
    /// Build a new category from validated input.
    pub fn new(input: NewCategory) -> DomainResult<Self> {
        let name = validate_category_name(&input.name)?;
        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            name,
            description: input.description,
            created_at: now,
            updated_at: now,
        })
    }

    /// Merge a validated patch and bump `updated_at`.
    pub fn apply(&mut self, patch: CategoryPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = Some(description);
        }
        self.updated_at = Utc::now();
    }
}

/// Category creation input
#[derive(Debug, Clone, Deserialize)]
pub struct NewCategory {
    pub name: String,
    pub description: Option<String>,
}

/// Partial category update
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl CategoryPatch {
    /// Check present fields, trimming the name.
    pub fn validate(self) -> DomainResult<Self> {
        let name = match self.name {
            Some(name) => Some(validate_category_name(&name)?),
            None => None,
        };
        Ok(Self {
            name,
            description: self.description,
        })
    }
}

fn validate_category_name(name: &str) -> DomainResult<String> {
    let name = name.trim();
    if name.chars().count() < MIN_NAME_LENGTH {
        return Err(DomainError::validation("Category name is required"));
    }
    Ok(name.to_string())
}
