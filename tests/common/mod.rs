#![allow(dead_code)]

use axum::{
    body::{self, Body},
    http::{header, Method, Request, StatusCode},
    response::Response,
    Router,
};
use bookshop_api::{
    config::AppConfig,
    db::{self, StatementCounter},
    handlers::AppServices,
    seed, AppState,
};
use serde_json::Value;
use tower::ServiceExt;

/// Helper harness for spinning up an application state backed by an in-memory SQLite database.
pub struct TestApp {
    router: Router,
    pub state: AppState,
}

impl TestApp {
    /// Construct a new test application with an empty, migrated database.
    pub async fn new() -> Self {
        Self::with_batch_size(100).await
    }

    /// Like [`TestApp::new`] with IN queries limited to `batch_size` ids.
    pub async fn with_batch_size(batch_size: u64) -> Self {
        let mut cfg = AppConfig::new(
            "sqlite::memory:".to_string(),
            "127.0.0.1".to_string(),
            18_080,
            "test".to_string(),
        );
        // One connection keeps every statement on the same in-memory database.
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;
        cfg.batch_fetch_size = batch_size;

        let mut pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("failed to create test database");
        let statements = db::install_statement_metrics(&mut pool);
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let state = AppState::new(pool, cfg, statements);
        let router = bookshop_api::build_router(state.clone());
        Self { router, state }
    }

    /// Like [`TestApp::new`] with the demo members, books and orders inserted.
    pub async fn seeded() -> Self {
        Self::seed(Self::new().await).await
    }

    pub async fn seeded_with_batch_size(batch_size: u64) -> Self {
        Self::seed(Self::with_batch_size(batch_size).await).await
    }

    async fn seed(app: Self) -> Self {
        seed::seed_demo_data(&app.state.db, &app.state.services)
            .await
            .expect("seed demo data");
        app
    }

    pub fn services(&self) -> &AppServices {
        &self.state.services
    }

    pub fn statements(&self) -> &StatementCounter {
        &self.state.statements
    }

    /// Send a request against the router with an optional JSON body.
    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);

        let body = if let Some(json) = body {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(serde_json::to_vec(&json).expect("failed to serialize json request body"))
        } else {
            Body::empty()
        };

        let request = builder.body(body).expect("failed to build request");
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }

    /// Submit an urlencoded form the way a browser does.
    pub async fn post_form(&self, uri: &str, form: &str) -> Response {
        let request = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form.to_string()))
            .expect("failed to build request");
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }

    pub async fn get_json(&self, uri: &str) -> (StatusCode, Value) {
        let response = self.request(Method::GET, uri, None).await;
        let status = response.status();
        (status, response_json(response).await)
    }

    /// Number of statements `f` issues, measured from a reset counter.
    pub async fn count_statements<F, Fut, T>(&self, f: F) -> (T, u64)
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = T>,
    {
        self.statements().reset();
        let out = f().await;
        (out, self.statements().get())
    }
}

pub async fn response_json(response: Response) -> Value {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body bytes");
    serde_json::from_slice(&bytes).expect("json response")
}

pub async fn response_text(response: Response) -> String {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body bytes");
    String::from_utf8(bytes.to_vec()).expect("utf-8 response")
}
