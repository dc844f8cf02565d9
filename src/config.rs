use anyhow::Result;
use model::entities::post::OpenFilter;
use sea_orm::Database;

use crate::schemas::AppState;

/// Initialize application state against the given database URL
pub async fn initialize_app_state_with_url(database_url: &str) -> Result<AppState> {
    // Load configuration
    dotenvy::dotenv().ok();

    // Connect to database
    tracing::info!("Connecting to database: {}", database_url);
    let db = Database::connect(database_url).await?;

    let open_filter = open_filter_from_env();
    if open_filter.is_none() {
        tracing::warn!("OPEN_POST_STATUS is empty; the open-posts view will report a configuration error");
    }

    Ok(AppState { db, open_filter })
}

/// Build the open-post filter from the environment.
///
/// Openness is an external contract: `OPEN_POST_STATUS` names the status
/// value that counts as open (default "open"). Setting it to the empty
/// string withholds the capability entirely.
pub fn open_filter_from_env() -> Option<OpenFilter> {
    match std::env::var("OPEN_POST_STATUS") {
        Ok(value) if value.is_empty() => None,
        Ok(value) => Some(OpenFilter::status(value)),
        Err(_) => Some(OpenFilter::status("open")),
    }
}
