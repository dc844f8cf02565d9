use thiserror::Error;

/// Errors surfaced by the entity query helpers.
#[derive(Error, Debug)]
pub enum ModelError {
    /// The open-posts view was requested but no open filter has been
    /// configured. This is a configuration error, distinct from a user
    /// who simply has no open posts.
    #[error("no open-post filter is configured")]
    MissingOpenFilter,

    /// Database errors pass through unchanged.
    #[error("database error: {0}")]
    Db(#[from] sea_orm::DbErr),
}
