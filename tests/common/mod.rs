use axum::{routing::post, Extension, Json, Router};
use axum_login_throttle::{
    axum_api::guard_router, ClientIdentity, InMemoryStorage, StorageType, ThrottleConfig,
    ThrottleService,
};
use std::sync::Arc;

async fn login(Extension(identity): Extension<ClientIdentity>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": "login accepted",
        "identity": identity.key(),
    }))
}

#[allow(dead_code)]
pub fn spawn_app() -> Router {
    spawn_app_with_max(3)
}

#[allow(dead_code)]
pub fn spawn_app_with_max(max_attempts: u32) -> Router {
    let config = ThrottleConfig {
        max_attempts,
        storage_type: StorageType::Memory,
        ..ThrottleConfig::default()
    };

    let storage = Arc::new(InMemoryStorage::new());
    let throttle = Arc::new(ThrottleService::new(config, storage));

    let router = Router::new().route("/login", post(login));
    guard_router(router, throttle)
}
