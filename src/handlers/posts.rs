use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use chrono::NaiveDateTime;
use model::entities::post;
use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, trace, warn};
use utoipa::ToSchema;
use validator::Validate;

/// Request body for creating a new post
#[derive(Debug, Deserialize, Serialize, Validate, ToSchema)]
pub struct CreatePostRequest {
    /// Authoring user ID
    pub user_id: i32,
    /// Post title
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    /// Post body
    pub body: String,
    /// Workflow status (default: "open")
    pub status: Option<String>,
}

/// Request body for updating a post
#[derive(Debug, Deserialize, Serialize, Validate, ToSchema)]
pub struct UpdatePostRequest {
    /// Post title
    #[validate(length(min = 1, max = 255))]
    pub title: Option<String>,
    /// Post body
    pub body: Option<String>,
    /// Workflow status
    pub status: Option<String>,
}

/// Post response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PostResponse {
    pub id: i32,
    pub user_id: i32,
    pub title: String,
    pub body: String,
    pub status: String,
    pub created_at: NaiveDateTime,
}

impl From<post::Model> for PostResponse {
    fn from(model: post::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            title: model.title,
            body: model.body,
            status: model.status,
            created_at: model.created_at,
        }
    }
}

/// Create a new post
#[utoipa::path(
    post,
    path = "/api/v1/posts",
    tag = "posts",
    request_body = CreatePostRequest,
    responses(
        (status = 201, description = "Post created successfully", body = ApiResponse<PostResponse>),
        (status = 400, description = "Invalid request or unknown author", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn create_post(
    State(state): State<AppState>,
    Json(request): Json<CreatePostRequest>,
) -> Result<(StatusCode, Json<ApiResponse<PostResponse>>), (StatusCode, Json<ErrorResponse>)> {
    trace!("Entering create_post function");
    debug!(
        "Creating post '{}' for user {}",
        request.title, request.user_id
    );

    if let Err(validation_errors) = request.validate() {
        warn!("Post creation request failed validation: {}", validation_errors);
        let error_response = ErrorResponse {
            error: format!("Invalid post data: {}", validation_errors),
            code: "VALIDATION_ERROR".to_string(),
            success: false,
        };
        return Err((StatusCode::BAD_REQUEST, Json(error_response)));
    }

    let new_post = post::ActiveModel {
        user_id: Set(request.user_id),
        title: Set(request.title.clone()),
        body: Set(request.body),
        status: Set(request.status.unwrap_or_else(|| "open".to_string())),
        ..Default::default()
    };

    trace!("Attempting to insert new post into database");
    match new_post.insert(&state.db).await {
        Ok(post_model) => {
            info!(
                "Post created successfully with ID: {}, author: {}",
                post_model.id, post_model.user_id
            );
            let response = ApiResponse {
                data: PostResponse::from(post_model),
                message: "Post created successfully".to_string(),
                success: true,
            };
            Ok((StatusCode::CREATED, Json(response)))
        }
        Err(db_error) => {
            error!("Failed to create post '{}': {}", request.title, db_error);

            let error_msg = db_error.to_string().to_lowercase();
            if error_msg.contains("foreign key") {
                let error_response = ErrorResponse {
                    error: format!("No user with ID {} exists", request.user_id),
                    code: "AUTHOR_NOT_FOUND".to_string(),
                    success: false,
                };
                Err((StatusCode::BAD_REQUEST, Json(error_response)))
            } else {
                let error_response = ErrorResponse {
                    error: "Internal server error while creating post".to_string(),
                    code: "DATABASE_ERROR".to_string(),
                    success: false,
                };
                Err((StatusCode::INTERNAL_SERVER_ERROR, Json(error_response)))
            }
        }
    }
}

/// Get all posts
#[utoipa::path(
    get,
    path = "/api/v1/posts",
    tag = "posts",
    responses(
        (status = 200, description = "Posts retrieved successfully", body = ApiResponse<Vec<PostResponse>>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_posts(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<PostResponse>>>, StatusCode> {
    trace!("Entering get_posts function");
    debug!("Fetching all posts from database");

    match post::Entity::find().all(&state.db).await {
        Ok(posts) => {
            info!("Successfully retrieved {} posts", posts.len());
            let post_responses: Vec<PostResponse> =
                posts.into_iter().map(PostResponse::from).collect();
            let response = ApiResponse {
                data: post_responses,
                message: "Posts retrieved successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(db_error) => {
            error!("Failed to retrieve posts from database: {}", db_error);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Get a specific post by ID
#[utoipa::path(
    get,
    path = "/api/v1/posts/{post_id}",
    tag = "posts",
    params(
        ("post_id" = i32, Path, description = "Post ID"),
    ),
    responses(
        (status = 200, description = "Post retrieved successfully", body = ApiResponse<PostResponse>),
        (status = 404, description = "Post not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_post(
    Path(post_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<PostResponse>>, StatusCode> {
    trace!("Entering get_post function for post_id: {}", post_id);
    debug!("Fetching post with ID: {}", post_id);

    match post::Entity::find_by_id(post_id).one(&state.db).await {
        Ok(Some(post_model)) => {
            info!("Successfully retrieved post with ID: {}", post_model.id);
            let response = ApiResponse {
                data: PostResponse::from(post_model),
                message: "Post retrieved successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Ok(None) => {
            warn!("Post with ID {} not found", post_id);
            Err(StatusCode::NOT_FOUND)
        }
        Err(db_error) => {
            error!("Failed to retrieve post with ID {}: {}", post_id, db_error);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Update a post
#[utoipa::path(
    put,
    path = "/api/v1/posts/{post_id}",
    tag = "posts",
    params(
        ("post_id" = i32, Path, description = "Post ID"),
    ),
    request_body = UpdatePostRequest,
    responses(
        (status = 200, description = "Post updated successfully", body = ApiResponse<PostResponse>),
        (status = 404, description = "Post not found", body = ErrorResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn update_post(
    Path(post_id): Path<i32>,
    State(state): State<AppState>,
    Json(request): Json<UpdatePostRequest>,
) -> Result<Json<ApiResponse<PostResponse>>, (StatusCode, Json<ErrorResponse>)> {
    trace!("Entering update_post function for post_id: {}", post_id);
    debug!("Updating post with ID: {}", post_id);

    if let Err(validation_errors) = request.validate() {
        warn!("Post update request failed validation: {}", validation_errors);
        let error_response = ErrorResponse {
            error: format!("Invalid post data: {}", validation_errors),
            code: "VALIDATION_ERROR".to_string(),
            success: false,
        };
        return Err((StatusCode::BAD_REQUEST, Json(error_response)));
    }

    // First, find the existing post
    trace!("Looking up existing post with ID: {}", post_id);
    let existing_post = match post::Entity::find_by_id(post_id).one(&state.db).await {
        Ok(Some(post)) => post,
        Ok(None) => {
            warn!("Post with ID {} not found for update", post_id);
            let error_response = ErrorResponse {
                error: format!("Post with ID {} not found", post_id),
                code: "POST_NOT_FOUND".to_string(),
                success: false,
            };
            return Err((StatusCode::NOT_FOUND, Json(error_response)));
        }
        Err(db_error) => {
            error!(
                "Failed to lookup post with ID {} for update: {}",
                post_id, db_error
            );
            let error_response = ErrorResponse {
                error: "Internal server error while looking up post".to_string(),
                code: "DATABASE_ERROR".to_string(),
                success: false,
            };
            return Err((StatusCode::INTERNAL_SERVER_ERROR, Json(error_response)));
        }
    };

    // Create active model for update
    let mut post_active: post::ActiveModel = existing_post.into();

    // Update only provided fields
    if let Some(title) = request.title {
        debug!("Updating title to: {}", title);
        post_active.title = Set(title);
    }
    if let Some(body) = request.body {
        post_active.body = Set(body);
    }
    if let Some(status) = request.status {
        debug!("Updating status to: {}", status);
        post_active.status = Set(status);
    }

    trace!("Attempting to update post in database");
    match post_active.update(&state.db).await {
        Ok(updated_post) => {
            info!("Post with ID {} updated successfully", post_id);
            let response = ApiResponse {
                data: PostResponse::from(updated_post),
                message: "Post updated successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(db_error) => {
            error!("Failed to update post with ID {}: {}", post_id, db_error);
            let error_response = ErrorResponse {
                error: "Internal server error while updating post".to_string(),
                code: "DATABASE_ERROR".to_string(),
                success: false,
            };
            Err((StatusCode::INTERNAL_SERVER_ERROR, Json(error_response)))
        }
    }
}

/// Delete a post
#[utoipa::path(
    delete,
    path = "/api/v1/posts/{post_id}",
    tag = "posts",
    params(
        ("post_id" = i32, Path, description = "Post ID"),
    ),
    responses(
        (status = 200, description = "Post deleted successfully", body = ApiResponse<String>),
        (status = 404, description = "Post not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn delete_post(
    Path(post_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<String>>, StatusCode> {
    trace!("Entering delete_post function for post_id: {}", post_id);
    debug!("Attempting to delete post with ID: {}", post_id);

    match post::Entity::delete_by_id(post_id).exec(&state.db).await {
        Ok(delete_result) => {
            debug!(
                "Delete operation completed. Rows affected: {}",
                delete_result.rows_affected
            );
            if delete_result.rows_affected > 0 {
                info!("Post with ID {} deleted successfully", post_id);
                let response = ApiResponse {
                    data: format!("Post {} deleted", post_id),
                    message: "Post deleted successfully".to_string(),
                    success: true,
                };
                Ok(Json(response))
            } else {
                warn!(
                    "Post with ID {} not found for deletion (no rows affected)",
                    post_id
                );
                Err(StatusCode::NOT_FOUND)
            }
        }
        Err(db_error) => {
            error!("Failed to delete post with ID {}: {}", post_id, db_error);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
