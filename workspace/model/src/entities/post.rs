use chrono::NaiveDateTime;
use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, Condition, QueryFilter, Select};

use super::user;

/// A post on the board, authored by a single user.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "posts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// The user who authored this post.
    pub user_id: i32,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub body: String,
    /// Free-form workflow status, e.g. "open" or "closed". Which values
    /// count as open is decided by the configured [`OpenFilter`], not here.
    pub status: String,
    pub created_at: NaiveDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// A post belongs to one author. No delete action is declared:
    /// deleting a user who still has posts is rejected by the database.
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
}

impl Related<user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Entity {
    /// All posts whose `user_id` equals the given author id.
    pub fn find_by_author(author_id: i32) -> Select<Entity> {
        Self::find().filter(Column::UserId.eq(author_id))
    }
}

/// The "which posts count as open" capability.
///
/// The predicate is an external contract supplied through configuration;
/// the entity never hard-codes it. Deployments with a richer notion of
/// openness can supply an arbitrary condition over the posts table.
#[derive(Clone, Debug)]
pub struct OpenFilter {
    condition: Condition,
}

impl OpenFilter {
    /// Openness is `status == value`.
    pub fn status(value: impl Into<String>) -> Self {
        Self {
            condition: Condition::all().add(Column::Status.eq(value.into())),
        }
    }

    /// Openness is an arbitrary condition over the posts table.
    pub fn condition(condition: Condition) -> Self {
        Self { condition }
    }

    /// Restrict a post selection to open posts.
    pub fn apply(&self, select: Select<Entity>) -> Select<Entity> {
        select.filter(self.condition.clone())
    }
}

impl ActiveModelBehavior for ActiveModel {}
