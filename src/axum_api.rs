#[cfg(feature = "axum")]
use crate::errors::ThrottleError;
#[cfg(feature = "axum")]
use crate::identity::{RequestMeta, ThrottleContext};
#[cfg(feature = "axum")]
use crate::service::ThrottleService;
#[cfg(feature = "axum")]
use axum::{
    extract::{ConnectInfo, Json, Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Router,
};
#[cfg(feature = "axum")]
use std::net::SocketAddr;
#[cfg(feature = "axum")]
use std::sync::Arc;

#[cfg(feature = "axum")]
#[derive(Clone)]
pub struct ThrottleState {
    pub throttle: Arc<ThrottleService>,
}

#[cfg(feature = "axum")]
impl IntoResponse for ThrottleError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            ThrottleError::Throttled => (StatusCode::TOO_MANY_REQUESTS, self.to_string()),
            ThrottleError::RedisError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
            ThrottleError::ConfigError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Configuration error".to_string(),
            ),
            ThrottleError::StorageError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Storage error".to_string(),
            ),
        };

        let body = Json(serde_json::json!({
            "error": error_message,
            "details": self.to_string(),
        }));

        (status, body).into_response()
    }
}

/// Middleware gating login attempts by request identity.
///
/// On allow, the derived [`crate::ClientIdentity`] is inserted into request
/// extensions so downstream handlers see the exact key the throttle used.
#[cfg(feature = "axum")]
pub async fn throttle_login(
    State(state): State<ThrottleState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ThrottleError> {
    let meta = request_meta(&req);
    let mut ctx = ThrottleContext::new();

    state.throttle.evaluate(&meta, &mut ctx).await?;

    if let Some(identity) = ctx.into_identity() {
        req.extensions_mut().insert(identity);
    }

    Ok(next.run(req).await)
}

#[cfg(feature = "axum")]
fn request_meta(req: &Request) -> RequestMeta {
    let forwarded_addr = req
        .headers()
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty());

    let remote_addr = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.ip().to_string());

    let user_agent = req
        .headers()
        .get(header::USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);

    RequestMeta {
        forwarded_addr,
        remote_addr,
        user_agent,
    }
}

/// Wrap `router` so every route in it is gated by the login throttle.
#[cfg(feature = "axum")]
pub fn guard_router(router: Router, throttle: Arc<ThrottleService>) -> Router {
    let state = ThrottleState { throttle };
    router.layer(axum::middleware::from_fn_with_state(state, throttle_login))
}
