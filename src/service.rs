use crate::config::{FailurePolicy, ThrottleConfig};
use crate::errors::ThrottleError;
use crate::identity::{ClientIdentity, RequestMeta, ThrottleContext};
use crate::rate_limit::{Decision, RateLimiter};
use crate::storage::Storage;
use std::sync::Arc;
use tracing::warn;

/// Gates authentication attempts by request identity.
///
/// At the point this runs the caller is not authenticated yet, so the
/// throttle keys on what the request itself exposes: network address plus
/// user-agent. The accept/reject decision is delegated to the
/// [`RateLimiter`]; this layer supplies the identity and translates the
/// deny outcome into [`ThrottleError::Throttled`].
pub struct ThrottleService {
    pub config: ThrottleConfig,
    rate_limiter: RateLimiter,
}

impl ThrottleService {
    pub fn new(config: ThrottleConfig, storage: Arc<dyn Storage>) -> Self {
        let rate_limiter = RateLimiter::new(storage, config.clone());
        Self {
            config,
            rate_limiter,
        }
    }

    /// Evaluate one login attempt.
    ///
    /// Derives the identity from `meta`, attaches it to `ctx`, and asks the
    /// rate limiter for a decision on exactly that identity. A deny becomes
    /// [`ThrottleError::Throttled`]; any other limiter failure is handled
    /// according to the configured [`FailurePolicy`] and, by default, passed
    /// through unchanged.
    pub async fn evaluate(
        &self,
        meta: &RequestMeta,
        ctx: &mut ThrottleContext,
    ) -> Result<(), ThrottleError> {
        let identity = ctx.attach(ClientIdentity::derive(meta, self.config.address_precedence));

        match self.rate_limiter.decide(identity.key()).await {
            Ok(Decision::Allowed) => Ok(()),
            Ok(Decision::Denied) => Err(ThrottleError::Throttled),
            Err(err) => match self.config.failure_policy {
                FailurePolicy::Propagate => Err(err),
                FailurePolicy::Open => {
                    warn!(error = %err, "counter store unavailable, allowing login attempt");
                    Ok(())
                }
                FailurePolicy::Closed => {
                    warn!(error = %err, "counter store unavailable, denying login attempt");
                    Err(ThrottleError::Throttled)
                }
            },
        }
    }

    /// Drop the counter for an identity, e.g. after a successful login.
    pub async fn clear(&self, identity: &ClientIdentity) -> Result<(), ThrottleError> {
        self.rate_limiter.reset(identity.key()).await
    }
}
