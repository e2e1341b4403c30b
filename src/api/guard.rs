use thiserror::Error;
use tracing::warn;
use crate::domain::{CallerIdentity, UserRole};
use super::RequestContext;

/// Which roles may invoke an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllowedRoles {
    /// Any authenticated caller.
    Any,
    Only(UserRole),
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum GuardError {
    #[error("Authentication required")]
    Unauthenticated,
    #[error("Role {role} may not perform this operation")]
    Forbidden { role: UserRole },
}

/// Checks the request's caller against `allowed` and hands back the caller.
pub fn authorize(ctx: &RequestContext, allowed: AllowedRoles) -> Result<CallerIdentity, GuardError> {
    let Some(caller) = ctx.caller else {
        warn!("Rejected anonymous request");
        return Err(GuardError::Unauthenticated);
    };
    match allowed {
        AllowedRoles::Any => Ok(caller),
        AllowedRoles::Only(role) if role == caller.role => Ok(caller),
        AllowedRoles::Only(_) => {
            warn!(caller_id = caller.id, role = %caller.role, "Rejected by role guard");
            Err(GuardError::Forbidden { role: caller.role })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anonymous_is_rejected_everywhere() {
        let ctx = RequestContext::anonymous();
        assert_eq!(authorize(&ctx, AllowedRoles::Any), Err(GuardError::Unauthenticated));
        assert_eq!(authorize(&ctx, AllowedRoles::Only(UserRole::Client)), Err(GuardError::Unauthenticated));
    }

    #[test]
    fn test_role_must_match() {
        let ctx = RequestContext::authenticated(CallerIdentity::owner(9));
        assert_eq!(authorize(&ctx, AllowedRoles::Any), Ok(CallerIdentity::owner(9)));
        assert_eq!(authorize(&ctx, AllowedRoles::Only(UserRole::Owner)), Ok(CallerIdentity::owner(9)));
        assert_eq!(
            authorize(&ctx, AllowedRoles::Only(UserRole::Delivery)),
            Err(GuardError::Forbidden { role: UserRole::Owner })
        );
    }
}
