use uuid::Uuid;
use crate::actor_framework::Entity;
use crate::domain::{User, UserCreate, UserId};

impl Entity for User {
    type Id = UserId;
    type CreatePayload = UserCreate;
    type Action = ();
    type ActionResult = ();

    fn id(&self) -> &UserId { &self.id }

    /// Creates a new User and issues its bearer token.
    fn from_create(id: UserId, payload: UserCreate) -> Result<Self, String> {
        if !payload.email.contains('@') {
            return Err(format!("Invalid email: {}", payload.email));
        }
        Ok(Self {
            id,
            email: payload.email,
            role: payload.role,
            token: Uuid::new_v4().to_string(),
        })
    }

    fn handle_action(&mut self, _action: ()) -> Result<(), String> {
        Ok(())
    }
}
