//! User database entity for SeaORM.

use sea_orm::entity::prelude::*;
use sea_orm::Set;

use domain::User;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub email: String,
    #[sea_orm(unique)]
    pub username: String,
    pub password_hash: String,
    pub is_active: bool,
    pub is_admin: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to domain entity
impl From<Model> for User {
    fn from(model: Model) -> Self {
        User {
            id: model.id,
            email: model.email,
            username: model.username,
            password_hash: model.password_hash,
            is_active: model.is_active,
            is_admin: model.is_admin,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Full-row active model; every column is written.
impl From<User> for ActiveModel {
    fn from(user: User) -> Self {
        ActiveModel {
            id: Set(user.id),
            email: Set(user.email),
            username: Set(user.username),
            password_hash: Set(user.password_hash),
            is_active: Set(user.is_active),
            is_admin: Set(user.is_admin),
            created_at: Set(user.created_at),
            updated_at: Set(user.updated_at),
        }
    }
}
