//! This file serves as the root for all SeaORM entity modules.
//! The posting-board schema is small: users and the posts they author,
//! plus the open-post filter capability the `post` module owns.

pub mod post;
pub mod user;

pub mod prelude {
    //! A prelude module for easy importing of all entities.
    pub use super::post::Entity as Post;
    pub use super::user::Entity as User;
}
