//! Capability rules for users and dishes.
//!
//! Rules are compiled from a [`Principal`] on every decision and never
//! cached. The table is allow-only: a request is permitted when at least one
//! rule matches, otherwise it is denied.

use serde::{Deserialize, Serialize};

use crate::{Dish, Role, User, UserId};

/// Action requested against a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Creates a new resource.
    Create,
    /// Reads a resource or a collection.
    Read,
    /// Modifies an existing resource.
    Update,
    /// Removes an existing resource.
    Delete,
    /// Subsumes every other action.
    Manage,
}

impl Action {
    /// Returns every action.
    #[must_use]
    pub fn all() -> &'static [Self] {
        &[
            Self::Create,
            Self::Read,
            Self::Update,
            Self::Delete,
            Self::Manage,
        ]
    }

    /// Returns a stable name used in logs and error details.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Read => "read",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Manage => "manage",
        }
    }

    fn covers(self, requested: Self) -> bool {
        self == Self::Manage || self == requested
    }
}

/// Kind of protected resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    /// User accounts.
    User,
    /// Dishes.
    Dish,
}

impl ResourceKind {
    /// Returns every resource kind.
    #[must_use]
    pub fn all() -> &'static [Self] {
        &[Self::User, Self::Dish]
    }

    /// Returns a stable name used in logs and error details.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Dish => "dish",
        }
    }
}

/// Authenticated actor making a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    id: UserId,
    role: Role,
}

impl Principal {
    /// Creates a principal.
    #[must_use]
    pub fn new(id: UserId, role: Role) -> Self {
        Self { id, role }
    }

    /// Returns the principal's account id.
    #[must_use]
    pub fn id(&self) -> UserId {
        self.id
    }

    /// Returns the principal's role.
    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    /// Returns whether the principal is an administrator.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

impl From<&User> for Principal {
    fn from(user: &User) -> Self {
        Self::new(user.id(), user.role())
    }
}

/// Resource instance with a known owner.
pub trait Ownable {
    /// Returns the resource kind.
    fn resource_kind(&self) -> ResourceKind;

    /// Returns the id of the owning account.
    fn owner_id(&self) -> UserId;
}

impl Ownable for User {
    fn resource_kind(&self) -> ResourceKind {
        ResourceKind::User
    }

    fn owner_id(&self) -> UserId {
        self.id()
    }
}

impl Ownable for Dish {
    fn resource_kind(&self) -> ResourceKind {
        ResourceKind::Dish
    }

    fn owner_id(&self) -> UserId {
        Dish::owner_id(self)
    }
}

/// What an authorization check is evaluated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// Collection-level check, e.g. listing all users.
    Collection(ResourceKind),
    /// Check against one resource instance.
    Instance {
        /// Resource kind of the instance.
        kind: ResourceKind,
        /// Owner of the instance.
        owner_id: UserId,
    },
}

impl Target {
    /// Builds an instance target from an ownable resource.
    #[must_use]
    pub fn of(resource: &impl Ownable) -> Self {
        Self::Instance {
            kind: resource.resource_kind(),
            owner_id: resource.owner_id(),
        }
    }

    /// Returns the targeted resource kind.
    #[must_use]
    pub fn kind(&self) -> ResourceKind {
        match self {
            Self::Collection(kind) | Self::Instance { kind, .. } => *kind,
        }
    }
}

/// Resource kinds a rule applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleScope {
    /// Every resource kind.
    All,
    /// A single resource kind.
    Kind(ResourceKind),
}

impl RuleScope {
    fn covers(self, kind: ResourceKind) -> bool {
        match self {
            Self::All => true,
            Self::Kind(scope) => scope == kind,
        }
    }
}

/// Predicate over a target instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    /// The instance is owned by the requesting principal.
    OwnedByPrincipal,
}

/// One allow rule of an [`Ability`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PermissionRule {
    action: Action,
    scope: RuleScope,
    condition: Option<Condition>,
}

impl PermissionRule {
    /// Creates an unconditioned rule.
    #[must_use]
    pub const fn allow(action: Action, scope: RuleScope) -> Self {
        Self {
            action,
            scope,
            condition: None,
        }
    }

    /// Creates a rule that only holds when `condition` is satisfied.
    #[must_use]
    pub const fn allow_if(action: Action, scope: RuleScope, condition: Condition) -> Self {
        Self {
            action,
            scope,
            condition: Some(condition),
        }
    }

    /// Returns the granted action.
    #[must_use]
    pub fn action(&self) -> Action {
        self.action
    }

    /// Returns the rule scope.
    #[must_use]
    pub fn scope(&self) -> RuleScope {
        self.scope
    }

    /// Returns the rule condition, if any.
    #[must_use]
    pub fn condition(&self) -> Option<Condition> {
        self.condition
    }

    fn matches(&self, principal: &Principal, action: Action, target: Target) -> bool {
        if !self.action.covers(action) || !self.scope.covers(target.kind()) {
            return false;
        }

        match (self.condition, target) {
            (None, _) => true,
            // Conditioned rules never grant collection-level access.
            (Some(_), Target::Collection(_)) => false,
            (Some(Condition::OwnedByPrincipal), Target::Instance { owner_id, .. }) => {
                owner_id == principal.id()
            }
        }
    }
}

const ADMIN_RULES: &[PermissionRule] = &[PermissionRule::allow(Action::Manage, RuleScope::All)];

const USER_RULES: &[PermissionRule] = &[
    PermissionRule::allow(Action::Create, RuleScope::Kind(ResourceKind::User)),
    PermissionRule::allow_if(
        Action::Read,
        RuleScope::Kind(ResourceKind::User),
        Condition::OwnedByPrincipal,
    ),
    PermissionRule::allow_if(
        Action::Update,
        RuleScope::Kind(ResourceKind::User),
        Condition::OwnedByPrincipal,
    ),
    PermissionRule::allow_if(
        Action::Delete,
        RuleScope::Kind(ResourceKind::User),
        Condition::OwnedByPrincipal,
    ),
    PermissionRule::allow(Action::Create, RuleScope::Kind(ResourceKind::Dish)),
    PermissionRule::allow(Action::Read, RuleScope::Kind(ResourceKind::Dish)),
    PermissionRule::allow_if(
        Action::Update,
        RuleScope::Kind(ResourceKind::Dish),
        Condition::OwnedByPrincipal,
    ),
    PermissionRule::allow_if(
        Action::Delete,
        RuleScope::Kind(ResourceKind::Dish),
        Condition::OwnedByPrincipal,
    ),
];

/// Rule set compiled for one principal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ability {
    principal: Principal,
    rules: Vec<PermissionRule>,
}

impl Ability {
    /// Compiles the rule set for a principal.
    ///
    /// `Manage` rules are ordered ahead of specific ones.
    #[must_use]
    pub fn for_principal(principal: Principal) -> Self {
        let table = match principal.role() {
            Role::Admin => ADMIN_RULES,
            Role::User => USER_RULES,
        };

        let mut rules = table.to_vec();
        rules.sort_by_key(|rule| rule.action() != Action::Manage);

        Self { principal, rules }
    }

    /// Returns the principal this ability was compiled for.
    #[must_use]
    pub fn principal(&self) -> Principal {
        self.principal
    }

    /// Returns the compiled rules in evaluation order.
    #[must_use]
    pub fn rules(&self) -> &[PermissionRule] {
        &self.rules
    }

    /// Returns whether `action` is permitted against `target`.
    #[must_use]
    pub fn can(&self, action: Action, target: Target) -> bool {
        self.rules
            .iter()
            .any(|rule| rule.matches(&self.principal, action, target))
    }
}

/// Decides whether `principal` may perform `action` against `target`.
///
/// `None` as target is a collection-level check against `kind`.
#[must_use]
pub fn is_allowed(
    principal: Principal,
    action: Action,
    kind: ResourceKind,
    target: Option<&dyn Ownable>,
) -> bool {
    let target = match target {
        Some(resource) if resource.resource_kind() == kind => Target::Instance {
            kind,
            owner_id: resource.owner_id(),
        },
        Some(_) => return false,
        None => Target::Collection(kind),
    };

    Ability::for_principal(principal).can(action, target)
}
