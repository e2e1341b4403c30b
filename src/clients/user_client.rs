use async_trait::async_trait;
use tracing::{debug, instrument, warn};
use crate::actor_framework::ResourceClient;
use crate::api::IdentityProvider;
use crate::domain::{CallerIdentity, User, UserCreate, UserRole};
use crate::user_actor::UserError;

/// Client for interacting with the User actor.
#[derive(Clone)]
pub struct UserClient {
    inner: ResourceClient<User>,
}

impl_basic_client!(UserClient, User, UserError, user);

impl UserClient {
    /// Registers a user and returns the stored record, token included.
    #[instrument(skip(self))]
    pub async fn register_user(&self, email: &str, role: UserRole) -> Result<User, UserError> {
        let id = self.create_user(UserCreate { email: email.to_string(), role }).await?;
        self.get_user(id)
            .await?
            .ok_or_else(|| UserError::ActorCommunicationError(format!("User {id} vanished after creation")))
    }
}

#[async_trait]
impl IdentityProvider for UserClient {
    #[instrument(skip_all)]
    async fn resolve_caller(&self, token: &str) -> Option<CallerIdentity> {
        let token = token.to_string();
        match self.inner.list(move |user: &User| user.token == token).await {
            Ok(users) => {
                let caller = users.first().map(User::caller);
                debug!(found = caller.is_some(), "Token resolved");
                caller
            }
            Err(e) => {
                warn!(error = %e, "Identity lookup failed");
                None
            }
        }
    }
}
