//! Category database entity for SeaORM.

use sea_orm::entity::prelude::*;
use sea_orm::Set;

use domain::Category;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::product::Entity")]
    Products,
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Products.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Category {
    fn from(model: Model) -> Self {
        Category {
            id: model.id,
            name: model.name,
            description: model.description,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<Category> for ActiveModel {
    fn from(category: Category) -> Self {
        ActiveModel {
            id: Set(category.id),
            name: Set(category.name),
            description: Set(category.description),
            created_at: Set(category.created_at),
            updated_at: Set(category.updated_at),
        }
    }
}
