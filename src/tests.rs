#[cfg(test)]
mod integration_tests {
    use crate::handlers::posts::{CreatePostRequest, UpdatePostRequest};
    use crate::handlers::users::{CreateUserRequest, UpdateUserRequest};
    use crate::schemas::{ApiResponse, ErrorResponse};
    use crate::test_utils::test_utils::{setup_test_app, setup_test_app_without_open_filter};
    use axum::http::StatusCode;
    use axum_test::TestServer;

    /// Create a user through the API and return its id
    async fn create_user(server: &TestServer, username: &str) -> i64 {
        let response = server
            .post("/api/v1/users")
            .json(&CreateUserRequest {
                username: username.to_string(),
            })
            .await;
        response.assert_status(StatusCode::CREATED);
        let body: ApiResponse<serde_json::Value> = response.json();
        body.data["id"].as_i64().unwrap()
    }

    /// Create a post through the API and return its id
    async fn create_post(server: &TestServer, user_id: i64, title: &str, status: &str) -> i64 {
        let response = server
            .post("/api/v1/posts")
            .json(&CreatePostRequest {
                user_id: user_id as i32,
                title: title.to_string(),
                body: format!("body of {title}"),
                status: Some(status.to_string()),
            })
            .await;
        response.assert_status(StatusCode::CREATED);
        let body: ApiResponse<serde_json::Value> = response.json();
        body.data["id"].as_i64().unwrap()
    }

    #[tokio::test]
    async fn test_health_check() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let response = server.get("/health").await;

        response.assert_status(StatusCode::OK);
    }

    #[tokio::test]
    async fn test_create_user() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let response = server
            .post("/api/v1/users")
            .json(&CreateUserRequest {
                username: "testuser".to_string(),
            })
            .await;

        response.assert_status(StatusCode::CREATED);
        let body: ApiResponse<serde_json::Value> = response.json();
        assert!(body.success);
        assert_eq!(body.message, "User created successfully");
        assert_eq!(body.data["username"], "testuser");
        assert!(body.data["id"].as_i64().unwrap() > 0);
    }

    #[tokio::test]
    async fn test_create_user_duplicate_username() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        create_user(&server, "taken").await;

        let response = server
            .post("/api/v1/users")
            .json(&CreateUserRequest {
                username: "taken".to_string(),
            })
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: ErrorResponse = response.json();
        assert!(!body.success);
        assert_eq!(body.code, "USERNAME_ALREADY_EXISTS");
    }

    #[tokio::test]
    async fn test_get_users() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        create_user(&server, "first").await;
        create_user(&server, "second").await;

        let response = server.get("/api/v1/users").await;

        response.assert_status(StatusCode::OK);
        let body: ApiResponse<Vec<serde_json::Value>> = response.json();
        assert!(body.success);
        assert_eq!(body.data.len(), 2);
        assert!(body.data.iter().any(|u| u["username"] == "first"));
        assert!(body.data.iter().any(|u| u["username"] == "second"));
    }

    #[tokio::test]
    async fn test_get_user_by_id() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let user_id = create_user(&server, "someone").await;

        let response = server.get(&format!("/api/v1/users/{}", user_id)).await;

        response.assert_status(StatusCode::OK);
        let body: ApiResponse<serde_json::Value> = response.json();
        assert!(body.success);
        assert_eq!(body.data["username"], "someone");
        assert_eq!(body.data["id"].as_i64().unwrap(), user_id);
    }

    #[tokio::test]
    async fn test_get_unknown_user_is_not_found() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let response = server.get("/api/v1/users/9999").await;

        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_update_user() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let user_id = create_user(&server, "before").await;

        let response = server
            .put(&format!("/api/v1/users/{}", user_id))
            .json(&UpdateUserRequest {
                username: Some("after".to_string()),
            })
            .await;

        response.assert_status(StatusCode::OK);
        let body: ApiResponse<serde_json::Value> = response.json();
        assert!(body.success);
        assert_eq!(body.data["username"], "after");
    }

    #[tokio::test]
    async fn test_delete_user_without_posts() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let user_id = create_user(&server, "fleeting").await;

        let response = server.delete(&format!("/api/v1/users/{}", user_id)).await;
        response.assert_status(StatusCode::OK);

        let lookup = server.get(&format!("/api/v1/users/{}", user_id)).await;
        lookup.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_user_with_posts_is_rejected() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let user_id = create_user(&server, "owner").await;
        let post_id = create_post(&server, user_id, "kept post", "open").await;

        let response = server.delete(&format!("/api/v1/users/{}", user_id)).await;

        response.assert_status(StatusCode::CONFLICT);
        let body: ErrorResponse = response.json();
        assert_eq!(body.code, "USER_HAS_POSTS");

        // Both the user and the post survive
        let user_lookup = server.get(&format!("/api/v1/users/{}", user_id)).await;
        user_lookup.assert_status(StatusCode::OK);
        let post_lookup = server.get(&format!("/api/v1/posts/{}", post_id)).await;
        post_lookup.assert_status(StatusCode::OK);
    }

    #[tokio::test]
    async fn test_get_user_posts_empty() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let user_id = create_user(&server, "quiet").await;

        let response = server
            .get(&format!("/api/v1/users/{}/posts", user_id))
            .await;

        response.assert_status(StatusCode::OK);
        let body: ApiResponse<Vec<serde_json::Value>> = response.json();
        assert!(body.success);
        assert!(body.data.is_empty());
    }

    #[tokio::test]
    async fn test_get_user_posts_lists_all_statuses() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let author_id = create_user(&server, "author").await;
        let other_id = create_user(&server, "other").await;
        let open_id = create_post(&server, author_id, "open question", "open").await;
        let closed_id = create_post(&server, author_id, "closed question", "closed").await;
        create_post(&server, other_id, "unrelated", "open").await;

        let response = server
            .get(&format!("/api/v1/users/{}/posts", author_id))
            .await;

        response.assert_status(StatusCode::OK);
        let body: ApiResponse<Vec<serde_json::Value>> = response.json();
        assert_eq!(body.data.len(), 2);
        // No ordering is promised, only membership
        let ids: Vec<i64> = body.data.iter().map(|p| p["id"].as_i64().unwrap()).collect();
        assert!(ids.contains(&open_id));
        assert!(ids.contains(&closed_id));
        assert!(body
            .data
            .iter()
            .all(|p| p["user_id"].as_i64().unwrap() == author_id));
    }

    #[tokio::test]
    async fn test_get_posts_of_unknown_user_is_not_found() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let response = server.get("/api/v1/users/9999/posts").await;

        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_get_user_open_posts_filters_closed() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let author_id = create_user(&server, "author").await;
        let open_id = create_post(&server, author_id, "still open", "open").await;
        create_post(&server, author_id, "already closed", "closed").await;

        let response = server
            .get(&format!("/api/v1/users/{}/posts/open", author_id))
            .await;

        response.assert_status(StatusCode::OK);
        let body: ApiResponse<Vec<serde_json::Value>> = response.json();
        assert_eq!(body.data.len(), 1);
        assert_eq!(body.data[0]["id"].as_i64().unwrap(), open_id);
        assert_eq!(body.data[0]["status"], "open");
    }

    #[tokio::test]
    async fn test_open_posts_without_filter_is_a_configuration_error() {
        let app = setup_test_app_without_open_filter().await;
        let server = TestServer::new(app).unwrap();

        let author_id = create_user(&server, "author").await;
        create_post(&server, author_id, "open question", "open").await;

        let response = server
            .get(&format!("/api/v1/users/{}/posts/open", author_id))
            .await;

        // A misconfigured deployment must answer with an error, never an
        // empty 200
        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        let body: ErrorResponse = response.json();
        assert!(!body.success);
        assert_eq!(body.code, "OPEN_FILTER_NOT_CONFIGURED");
    }

    #[tokio::test]
    async fn test_create_post() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let user_id = create_user(&server, "poster").await;

        let response = server
            .post("/api/v1/posts")
            .json(&CreatePostRequest {
                user_id: user_id as i32,
                title: "hello board".to_string(),
                body: "first post".to_string(),
                status: None,
            })
            .await;

        response.assert_status(StatusCode::CREATED);
        let body: ApiResponse<serde_json::Value> = response.json();
        assert!(body.success);
        assert_eq!(body.data["title"], "hello board");
        // Status defaults to "open" when not supplied
        assert_eq!(body.data["status"], "open");
        assert_eq!(body.data["user_id"].as_i64().unwrap(), user_id);
    }

    #[tokio::test]
    async fn test_create_post_for_unknown_author() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let response = server
            .post("/api/v1/posts")
            .json(&CreatePostRequest {
                user_id: 9999,
                title: "orphan".to_string(),
                body: "no author".to_string(),
                status: Some("open".to_string()),
            })
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: ErrorResponse = response.json();
        assert_eq!(body.code, "AUTHOR_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_create_post_with_empty_title_is_rejected() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let user_id = create_user(&server, "poster").await;

        let response = server
            .post("/api/v1/posts")
            .json(&CreatePostRequest {
                user_id: user_id as i32,
                title: String::new(),
                body: "empty title".to_string(),
                status: None,
            })
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: ErrorResponse = response.json();
        assert_eq!(body.code, "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_update_post() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let user_id = create_user(&server, "poster").await;
        let post_id = create_post(&server, user_id, "draft", "open").await;

        let response = server
            .put(&format!("/api/v1/posts/{}", post_id))
            .json(&UpdatePostRequest {
                title: Some("final".to_string()),
                body: None,
                status: Some("closed".to_string()),
            })
            .await;

        response.assert_status(StatusCode::OK);
        let body: ApiResponse<serde_json::Value> = response.json();
        assert_eq!(body.data["title"], "final");
        assert_eq!(body.data["status"], "closed");

        // The closed post has left the open view
        let open = server
            .get(&format!("/api/v1/users/{}/posts/open", user_id))
            .await;
        open.assert_status(StatusCode::OK);
        let open_body: ApiResponse<Vec<serde_json::Value>> = open.json();
        assert!(open_body.data.is_empty());
    }

    #[tokio::test]
    async fn test_delete_post() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let user_id = create_user(&server, "poster").await;
        let post_id = create_post(&server, user_id, "short lived", "open").await;

        let response = server.delete(&format!("/api/v1/posts/{}", post_id)).await;
        response.assert_status(StatusCode::OK);

        let lookup = server.get(&format!("/api/v1/posts/{}", post_id)).await;
        lookup.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_get_unknown_post_is_not_found() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let response = server.get("/api/v1/posts/9999").await;

        response.assert_status(StatusCode::NOT_FOUND);
    }
}
