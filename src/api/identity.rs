use async_trait::async_trait;
use crate::domain::CallerIdentity;

/// Turns a bearer token into the caller it was issued to.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn resolve_caller(&self, token: &str) -> Option<CallerIdentity>;
}

/// Per-request context built once at the boundary.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RequestContext {
    pub caller: Option<CallerIdentity>,
}

impl RequestContext {
    #[allow(dead_code)]
    pub fn anonymous() -> Self {
        Self { caller: None }
    }

    #[allow(dead_code)]
    pub fn authenticated(caller: CallerIdentity) -> Self {
        Self { caller: Some(caller) }
    }

    /// Resolves the optional bearer token of an incoming request. Unknown
    /// tokens yield an anonymous context rather than an error.
    pub async fn resolve(provider: &dyn IdentityProvider, token: Option<&str>) -> Self {
        let caller = match token {
            Some(token) => provider.resolve_caller(token).await,
            None => None,
        };
        Self { caller }
    }
}
