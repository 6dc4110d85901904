//! Product database entity for SeaORM.

use sea_orm::entity::prelude::*;
use sea_orm::Set;

use domain::Product;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub price: Decimal,
    pub stock: i64,
    pub category_id: Uuid,
    pub is_active: bool,
    pub image_url: Option<String>,
    pub tags: Vec<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id"
    )]
    Category,
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Product {
    fn from(model: Model) -> Self {
        Product {
            id: model.id,
            name: model.name,
            description: model.description,
            price: model.price,
            stock: model.stock,
            category_id: model.category_id,
            is_active: model.is_active,
            image_url: model.image_url,
            tags: model.tags,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<Product> for ActiveModel {
    fn from(product: Product) -> Self {
        ActiveModel {
            id: Set(product.id),
            name: Set(product.name),
            description: Set(product.description),
            price: Set(product.price),
            stock: Set(product.stock),
            category_id: Set(product.category_id),
            is_active: Set(product.is_active),
            image_url: Set(product.image_url),
            tags: Set(product.tags),
            created_at: Set(product.created_at),
            updated_at: Set(product.updated_at),
        }
    }
}
