//! HTTP server - axum router and shared state

use axum::{
    Router,
    routing::{get, post, put},
};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::storage::SqliteStore;

pub mod routes;

/// Server state shared across handlers.
///
/// The store is constructed once at startup and injected here; handlers
/// serialize their single store call through the mutex.
pub struct AppState {
    pub store: Mutex<SqliteStore>,
}

impl AppState {
    pub fn new(store: SqliteStore) -> Self {
        Self {
            store: Mutex::new(store),
        }
    }
}

/// Build the application router around a shared store
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(routes::home))
        .route("/users", post(routes::create_user))
        .route("/bugs", post(routes::report_bug).get(routes::list_bugs))
        .route("/bugs/{id}/assign", put(routes::assign_bug))
        .route(
            "/bugs/{bug_id}/comments",
            post(routes::add_comment).get(routes::list_comments),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn start_server(port: u16, database_path: PathBuf) -> anyhow::Result<()> {
    let store = SqliteStore::open(&database_path)?;
    let state = Arc::new(AppState::new(store));
    let app = app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Starting server on {}", addr);
    println!("🌍 Server running at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    fn test_app() -> Router {
        let store = SqliteStore::open_in_memory().unwrap();
        app(Arc::new(AppState::new(store)))
    }

    async fn send(
        app: &Router,
        method: &str,
        path: &str,
        body: Option<Value>,
    ) -> (StatusCode, Vec<u8>) {
        let request = match body {
            Some(json_body) => Request::builder()
                .method(method)
                .uri(path)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json_body.to_string()))
                .unwrap(),
            None => Request::builder()
                .method(method)
                .uri(path)
                .body(Body::empty())
                .unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, bytes.to_vec())
    }

    async fn send_json(
        app: &Router,
        method: &str,
        path: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let (status, bytes) = send(app, method, path, body).await;
        let value = serde_json::from_slice(&bytes).unwrap();
        (status, value)
    }

    #[tokio::test]
    async fn test_home_liveness() {
        let app = test_app();
        let (status, body) = send(&app, "GET", "/", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"Bug Tracker API is Running!");
    }

    #[tokio::test]
    async fn test_report_and_assign_flow() {
        let app = test_app();

        let (status, body) = send_json(
            &app,
            "POST",
            "/users",
            Some(json!({"name": "A", "email": "a@x.com", "role": "tester"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"message": "User created"}));

        let (status, body) = send_json(
            &app,
            "POST",
            "/bugs",
            Some(json!({"title": "T", "description": "D"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"message": "Bug reported"}));

        let (status, body) = send_json(&app, "GET", "/bugs", None).await;
        assert_eq!(status, StatusCode::OK);
        let bugs = body.as_array().unwrap();
        assert_eq!(bugs.len(), 1);
        assert_eq!(bugs[0]["id"], 1);
        assert_eq!(bugs[0]["title"], "T");
        assert_eq!(bugs[0]["status"], "open");
        assert_eq!(bugs[0]["priority"], "medium");
        assert_eq!(bugs[0]["assigned_to"], Value::Null);

        let (status, body) = send_json(
            &app,
            "PUT",
            "/bugs/1/assign",
            Some(json!({"assigned_to": 1})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"message": "Bug assigned"}));

        let (_, body) = send_json(&app, "GET", "/bugs", None).await;
        let bugs = body.as_array().unwrap();
        assert_eq!(bugs[0]["status"], "in_progress");
        assert_eq!(bugs[0]["assigned_to"], 1);
    }

    #[tokio::test]
    async fn test_assign_missing_bug_returns_404() {
        let app = test_app();

        let (status, body) = send_json(
            &app,
            "PUT",
            "/bugs/42/assign",
            Some(json!({"assigned_to": 1})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"error": "Bug not found"}));
    }

    #[tokio::test]
    async fn test_list_bugs_status_filter() {
        let app = test_app();

        for (title, status) in [("a", "open"), ("b", "resolved"), ("c", "open")] {
            let (code, _) = send_json(
                &app,
                "POST",
                "/bugs",
                Some(json!({"title": title, "description": "d", "status": status})),
            )
            .await;
            assert_eq!(code, StatusCode::OK);
        }

        let (status, body) = send_json(&app, "GET", "/bugs?status=open", None).await;
        assert_eq!(status, StatusCode::OK);
        let bugs = body.as_array().unwrap();
        assert_eq!(bugs.len(), 2);
        assert!(bugs.iter().all(|b| b["status"] == "open"));

        let (_, body) = send_json(&app, "GET", "/bugs", None).await;
        assert_eq!(body.as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_duplicate_email_is_conflict() {
        let app = test_app();

        let payload = json!({"name": "A", "email": "a@x.com", "role": "admin"});
        let (status, _) = send_json(&app, "POST", "/users", Some(payload.clone())).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send_json(&app, "POST", "/users", Some(payload)).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert!(body["error"].as_str().unwrap().contains("a@x.com"));
    }

    #[tokio::test]
    async fn test_comments_scoped_to_bug() {
        let app = test_app();

        // Comments do not check that the bug exists
        let (status, body) = send_json(
            &app,
            "POST",
            "/bugs/5/comments",
            Some(json!({"user_id": 1, "text": "first"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"message": "Comment added"}));

        send_json(
            &app,
            "POST",
            "/bugs/6/comments",
            Some(json!({"user_id": 1, "text": "elsewhere"})),
        )
        .await;

        let (status, body) = send_json(&app, "GET", "/bugs/5/comments", None).await;
        assert_eq!(status, StatusCode::OK);
        let comments = body.as_array().unwrap();
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0]["user_id"], 1);
        assert_eq!(comments[0]["text"], "first");
        assert!(comments[0]["created_at"].is_string());
    }

    #[tokio::test]
    async fn test_malformed_body_is_client_error() {
        let app = test_app();

        // Missing required fields
        let (status, _) = send(&app, "POST", "/users", Some(json!({"name": "A"}))).await;
        assert!(status.is_client_error());

        // Unknown field is rejected
        let (status, _) = send(
            &app,
            "POST",
            "/bugs",
            Some(json!({"title": "T", "description": "D", "severity": "high"})),
        )
        .await;
        assert!(status.is_client_error());
    }
}
