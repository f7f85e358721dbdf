//! Test helpers for Web API integration tests.

use std::sync::Arc;

use axum::http::HeaderName;
use axum_test::TestServer;
use tempfile::TempDir;

use cumulus::web::handlers::AppState;
use cumulus::web::router::{create_health_router, create_router};
use cumulus::{Database, IngestService, ObjectStore};

/// A running test server with handles to its backing state.
pub struct TestApp {
    pub server: TestServer,
    pub db: Arc<Database>,
    /// Object store directory; dropped with the app.
    pub store_dir: TempDir,
}

/// Create a test server with an in-memory database and a temporary
/// object store.
pub async fn create_test_app() -> TestApp {
    let db = Arc::new(
        Database::open_in_memory()
            .await
            .expect("Failed to create test database"),
    );

    let store_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let store = ObjectStore::new(store_dir.path()).expect("Failed to create object store");

    let ingest = Arc::new(IngestService::new(db.clone(), store));
    let app_state = Arc::new(AppState::new(db.clone(), ingest));

    let router = create_router(app_state, &[]).merge(create_health_router());
    let server = TestServer::new(router).expect("Failed to create test server");

    TestApp {
        server,
        db,
        store_dir,
    }
}

/// Header carrying the trusted account identity.
pub fn account_id_header() -> HeaderName {
    HeaderName::from_static("x-account-id")
}

/// Header carrying the account email.
pub fn account_email_header() -> HeaderName {
    HeaderName::from_static("x-account-email")
}
