use dishpicker_core::{AppError, AppResult};
use dishpicker_domain::{Ability, Action, Ownable, Principal, ResourceKind, Target};
use tracing::debug;

/// Message returned to clients for every denied request.
pub const FORBIDDEN_MESSAGE: &str =
    "Forbidden resource. You do not have permission to access the data.";

/// Application service that turns capability decisions into errors.
///
/// Holds no state; every check compiles a fresh [`Ability`] for the principal.
#[derive(Debug, Clone, Copy, Default)]
pub struct AuthorizationService;

impl AuthorizationService {
    /// Creates a new authorization service.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Returns whether the principal may perform the action on the target.
    #[must_use]
    pub fn is_allowed(&self, principal: Principal, action: Action, target: Target) -> bool {
        Ability::for_principal(principal).can(action, target)
    }

    /// Ensures the principal may perform the action on a resource instance.
    pub fn require_on(
        &self,
        principal: Principal,
        action: Action,
        resource: &impl Ownable,
    ) -> AppResult<()> {
        self.require(principal, action, Target::of(resource))
    }

    /// Ensures the principal may perform the action on a whole collection.
    pub fn require_collection(
        &self,
        principal: Principal,
        action: Action,
        kind: ResourceKind,
    ) -> AppResult<()> {
        self.require(principal, action, Target::Collection(kind))
    }

    /// Ensures the principal may perform the action on the target.
    pub fn require(&self, principal: Principal, action: Action, target: Target) -> AppResult<()> {
        if self.is_allowed(principal, action, target) {
            return Ok(());
        }

        debug!(
            principal_id = %principal.id(),
            role = principal.role().as_str(),
            action = action.as_str(),
            resource = target.kind().as_str(),
            "authorization denied"
        );

        Err(AppError::Forbidden(FORBIDDEN_MESSAGE.to_owned()))
    }

    /// Ensures the principal is an administrator.
    ///
    /// Listing every user account is admin-only on top of the rule check.
    pub fn require_admin(&self, principal: Principal) -> AppResult<()> {
        if principal.is_admin() {
            return Ok(());
        }

        debug!(
            principal_id = %principal.id(),
            "administrator role required"
        );

        Err(AppError::Forbidden(FORBIDDEN_MESSAGE.to_owned()))
    }
}

#[cfg(test)]
mod tests;
