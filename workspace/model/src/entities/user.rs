use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue, ColumnTrait, QueryFilter, Select};

use super::post;
use crate::error::ModelError;

/// Represents a user of the posting board.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub username: String,
    // Other fields like password_hash, email, etc., would go here.
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    // A user can author multiple posts.
    #[sea_orm(has_many = "super::post::Entity")]
    Post,
}

impl Related<post::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Post.def()
    }
}

impl Model {
    /// All posts authored by this user, selected by foreign-key equality.
    ///
    /// The returned `Select` is lazy and restartable; each `.all(db)` call
    /// re-queries. No ordering is imposed, so callers must not rely on a
    /// stable order.
    pub fn find_posts(&self) -> Select<post::Entity> {
        post::Entity::find_by_author(self.id)
    }

    /// This user's open posts, obtained by forwarding through the open
    /// filter the `post` module was configured with.
    ///
    /// A missing filter is a configuration error (`MissingOpenFilter`),
    /// never an empty result.
    pub fn find_open_posts(
        &self,
        filter: Option<&post::OpenFilter>,
    ) -> Result<Select<post::Entity>, ModelError> {
        let filter = filter.ok_or(ModelError::MissingOpenFilter)?;
        Ok(filter.apply(self.find_posts()))
    }
}

impl ActiveModel {
    /// Posts of a possibly-unsaved user. A user whose id is not set cannot
    /// own any rows, so the query matches nothing rather than erroring.
    pub fn find_posts(&self) -> Select<post::Entity> {
        match &self.id {
            ActiveValue::Set(id) | ActiveValue::Unchanged(id) => {
                post::Entity::find_by_author(*id)
            }
            // posts.user_id is NOT NULL, so this predicate matches no rows.
            ActiveValue::NotSet => {
                post::Entity::find().filter(post::Column::UserId.is_null())
            }
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}
