use crate::config::AddressPrecedence;
use serde::{Deserialize, Serialize};

/// The observable parts of an inbound request that identity derivation reads.
///
/// An explicit value rather than a view over a framework request type, so the
/// throttle can be evaluated against any transport.
#[derive(Debug, Clone, Default)]
pub struct RequestMeta {
    /// Client address as reported upstream, e.g. the first `X-Forwarded-For` hop.
    pub forwarded_addr: Option<String>,
    /// Transport-level peer address.
    pub remote_addr: Option<String>,
    /// Value of the `User-Agent` header.
    pub user_agent: Option<String>,
}

impl RequestMeta {
    fn address(&self, precedence: AddressPrecedence) -> &str {
        let addr = match precedence {
            AddressPrecedence::ForwardedThenRemote => self
                .forwarded_addr
                .as_deref()
                .or(self.remote_addr.as_deref()),
            AddressPrecedence::RemoteOnly => self.remote_addr.as_deref(),
        };
        addr.unwrap_or("")
    }
}

/// The key login attempts are bucketed under: `"<address>:<user-agent>"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClientIdentity {
    key: String,
}

impl ClientIdentity {
    /// Derive the identity for a request.
    ///
    /// Pure function of the request metadata. Missing fields become empty
    /// strings, so a request exposing nothing at all yields `":"` rather
    /// than an error.
    pub fn derive(meta: &RequestMeta, precedence: AddressPrecedence) -> Self {
        let address = meta.address(precedence);
        let user_agent = meta.user_agent.as_deref().unwrap_or("");
        Self {
            key: format!("{address}:{user_agent}"),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

/// Per-request slot the computed identity is attached to.
///
/// Downstream collaborators read the identity from here instead of deriving
/// their own (address-only) key.
#[derive(Debug, Clone, Default)]
pub struct ThrottleContext {
    identity: Option<ClientIdentity>,
}

impl ThrottleContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach the identity for this request, replacing any previous one.
    pub fn attach(&mut self, identity: ClientIdentity) -> &ClientIdentity {
        self.identity.insert(identity)
    }

    pub fn identity(&self) -> Option<&ClientIdentity> {
        self.identity.as_ref()
    }

    pub fn into_identity(self) -> Option<ClientIdentity> {
        self.identity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(forwarded: Option<&str>, remote: Option<&str>, agent: Option<&str>) -> RequestMeta {
        RequestMeta {
            forwarded_addr: forwarded.map(str::to_string),
            remote_addr: remote.map(str::to_string),
            user_agent: agent.map(str::to_string),
        }
    }

    #[test]
    fn test_same_inputs_same_identity() {
        let a = ClientIdentity::derive(
            &meta(None, Some("10.0.0.1"), Some("Mozilla/5.0")),
            AddressPrecedence::ForwardedThenRemote,
        );
        let b = ClientIdentity::derive(
            &meta(None, Some("10.0.0.1"), Some("Mozilla/5.0")),
            AddressPrecedence::ForwardedThenRemote,
        );
        assert_eq!(a, b);
        assert_eq!(a.key(), "10.0.0.1:Mozilla/5.0");
    }

    #[test]
    fn test_different_address_or_agent_differ() {
        let base = ClientIdentity::derive(
            &meta(None, Some("10.0.0.1"), Some("Mozilla/5.0")),
            AddressPrecedence::ForwardedThenRemote,
        );
        let other_addr = ClientIdentity::derive(
            &meta(None, Some("10.0.0.2"), Some("Mozilla/5.0")),
            AddressPrecedence::ForwardedThenRemote,
        );
        let other_agent = ClientIdentity::derive(
            &meta(None, Some("10.0.0.1"), Some("curl/8.0")),
            AddressPrecedence::ForwardedThenRemote,
        );
        assert_ne!(base, other_addr);
        assert_ne!(base, other_agent);
    }

    #[test]
    fn test_fully_absent_request_yields_sentinel() {
        let identity = ClientIdentity::derive(
            &RequestMeta::default(),
            AddressPrecedence::ForwardedThenRemote,
        );
        assert_eq!(identity.key(), ":");
    }

    #[test]
    fn test_forwarded_address_preferred_then_remote() {
        let both = meta(Some("198.51.100.9"), Some("127.0.0.1"), Some("ua"));
        let identity =
            ClientIdentity::derive(&both, AddressPrecedence::ForwardedThenRemote);
        assert_eq!(identity.key(), "198.51.100.9:ua");

        let remote_only = meta(None, Some("127.0.0.1"), Some("ua"));
        let identity =
            ClientIdentity::derive(&remote_only, AddressPrecedence::ForwardedThenRemote);
        assert_eq!(identity.key(), "127.0.0.1:ua");
    }

    #[test]
    fn test_remote_only_precedence_ignores_forwarded() {
        let both = meta(Some("198.51.100.9"), Some("127.0.0.1"), Some("ua"));
        let identity = ClientIdentity::derive(&both, AddressPrecedence::RemoteOnly);
        assert_eq!(identity.key(), "127.0.0.1:ua");
    }

    #[test]
    fn test_context_attach_and_read_back() {
        let mut ctx = ThrottleContext::new();
        assert!(ctx.identity().is_none());

        let identity = ClientIdentity::derive(
            &meta(None, Some("10.0.0.1"), Some("ua")),
            AddressPrecedence::ForwardedThenRemote,
        );
        ctx.attach(identity.clone());

        assert_eq!(ctx.identity(), Some(&identity));
        assert_eq!(ctx.into_identity(), Some(identity));
    }
}
