//! Post entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "posts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(indexed)]
    pub user_id: Uuid,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    #[sea_orm(nullable)]
    pub location: Option<String>,
    pub mood: i32,
    #[sea_orm(column_type = "Double")]
    pub temperature: f64,
    pub photo_url: String,
    pub is_public: bool,
    pub is_approved: bool,
    /// Unique together with `user_id`.
    pub created_on: Date,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Conversion from SeaORM Model to Domain Post.
impl From<Model> for daybook_core::domain::Post {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            description: model.description,
            location: model.location,
            mood: model.mood,
            temperature: model.temperature,
            photo_url: model.photo_url,
            is_public: model.is_public,
            is_approved: model.is_approved,
            created_on: model.created_on,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

/// Conversion from Domain Post to SeaORM ActiveModel.
impl From<daybook_core::domain::Post> for ActiveModel {
    fn from(post: daybook_core::domain::Post) -> Self {
        Self {
            id: Set(post.id),
            user_id: Set(post.user_id),
            description: Set(post.description),
            location: Set(post.location),
            mood: Set(post.mood),
            temperature: Set(post.temperature),
            photo_url: Set(post.photo_url),
            is_public: Set(post.is_public),
            is_approved: Set(post.is_approved),
            created_on: Set(post.created_on),
            created_at: Set(post.created_at.into()),
            updated_at: Set(post.updated_at.into()),
        }
    }
}
