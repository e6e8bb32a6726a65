//! Role-based authorization — a single pure decision table.
//!
//! Every lifecycle service delegates here instead of comparing roles
//! inline. Evaluation order: admin first, then resource-scoped ownership,
//! then membership; the first matching rule wins and nothing stacks.

use crate::error::{ForbiddenError, TaskHubError};
use crate::id::UserId;
use crate::role::Role;

/// What the actor is trying to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Create,
    Read,
    Update,
    Delete,
    /// Status-only task update, distinct from a full update.
    UpdateStatus,
}

impl Action {
    /// Create/update/delete, as distinct from read or status-only update.
    #[must_use]
    pub fn is_manage(self) -> bool {
        matches!(self, Self::Create | Self::Update | Self::Delete)
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Read => "read",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::UpdateStatus => "update status",
        }
    }
}

/// The kind of resource the action targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Project,
    Task,
    Team,
    User,
}

/// Ownership and membership context of the targeted resource, resolved by
/// the caller before evaluation. The evaluator itself performs no lookups.
#[derive(Debug, Clone, Copy)]
pub struct Resource {
    pub kind: ResourceKind,
    /// The owning project's `owner_id`, when one is set.
    pub project_owner_id: Option<UserId>,
    /// The task's assignee, when the resource is a task with one.
    pub assigned_to_id: Option<UserId>,
    /// Whether the actor belongs to a team of the resource's project.
    pub actor_is_team_member: bool,
}

impl Resource {
    #[must_use]
    pub fn project(owner_id: Option<UserId>) -> Self {
        Self {
            kind: ResourceKind::Project,
            project_owner_id: owner_id,
            assigned_to_id: None,
            actor_is_team_member: false,
        }
    }

    #[must_use]
    pub fn task(project_owner_id: Option<UserId>, assigned_to_id: Option<UserId>) -> Self {
        Self {
            kind: ResourceKind::Task,
            project_owner_id,
            assigned_to_id,
            actor_is_team_member: false,
        }
    }

    #[must_use]
    pub fn team(project_owner_id: Option<UserId>) -> Self {
        Self {
            kind: ResourceKind::Team,
            project_owner_id,
            assigned_to_id: None,
            actor_is_team_member: false,
        }
    }

    #[must_use]
    pub fn user() -> Self {
        Self {
            kind: ResourceKind::User,
            project_owner_id: None,
            assigned_to_id: None,
            actor_is_team_member: false,
        }
    }

    /// Mark the actor as a team member of the resource's project.
    #[must_use]
    pub fn with_team_membership(mut self, is_member: bool) -> Self {
        self.actor_is_team_member = is_member;
        self
    }
}

/// Outcome of an authorization check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(&'static str),
}

/// Pure decision function mapping (actor, action, resource) to a decision.
/// No side effects and no IO; denial reasons are stable strings.
#[must_use]
pub fn evaluate(role: Role, actor_id: UserId, action: Action, resource: &Resource) -> Decision {
    match role {
        Role::Admin => Decision::Allow,
        Role::Owner => evaluate_owner(actor_id, action, resource),
        Role::Member => evaluate_member(actor_id, action, resource),
    }
}

fn evaluate_owner(actor_id: UserId, action: Action, resource: &Resource) -> Decision {
    if resource.kind == ResourceKind::User {
        return Decision::Deny("only admins may manage users");
    }
    if resource.project_owner_id == Some(actor_id) {
        return Decision::Allow;
    }
    if action.is_manage() {
        Decision::Deny("only the project owner may manage this resource")
    } else {
        Decision::Deny("not the owner of this project")
    }
}

fn evaluate_member(actor_id: UserId, action: Action, resource: &Resource) -> Decision {
    if resource.kind == ResourceKind::User {
        return Decision::Deny("only admins may manage users");
    }
    match action {
        Action::Read => {
            if resource.actor_is_team_member || resource.assigned_to_id == Some(actor_id) {
                Decision::Allow
            } else {
                Decision::Deny("not a member of this project")
            }
        }
        Action::UpdateStatus => {
            if resource.assigned_to_id == Some(actor_id) {
                Decision::Allow
            } else {
                Decision::Deny("task is not assigned to you")
            }
        }
        Action::Create | Action::Update | Action::Delete => {
            Decision::Deny("members may not manage resources")
        }
    }
}

/// Evaluate and convert a denial into [`TaskHubError::Forbidden`].
///
/// # Errors
///
/// Returns [`TaskHubError::Forbidden`] carrying the denial reason.
pub fn check(
    role: Role,
    actor_id: UserId,
    action: Action,
    resource: &Resource,
) -> Result<(), TaskHubError> {
    match evaluate(role, actor_id, action, resource) {
        Decision::Allow => Ok(()),
        Decision::Deny(reason) => Err(ForbiddenError { reason }.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Relation between the actor and the resource under test.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Relation {
        IsOwner,
        IsTeamMember,
        IsAssignee,
        Unrelated,
    }

    fn resource_for(kind: ResourceKind, actor: UserId, relation: Relation) -> Resource {
        let other = UserId::new();
        let owner = if relation == Relation::IsOwner {
            Some(actor)
        } else {
            Some(other)
        };
        let assigned = if relation == Relation::IsAssignee {
            Some(actor)
        } else {
            Some(other)
        };
        match kind {
            ResourceKind::Project => Resource::project(owner),
            ResourceKind::Team => Resource::team(owner),
            ResourceKind::Task => Resource::task(owner, assigned),
            ResourceKind::User => Resource::user(),
        }
        .with_team_membership(relation == Relation::IsTeamMember)
    }

    /// Expected outcome per the decision table, written independently of
    /// the implementation.
    fn expected(role: Role, action: Action, kind: ResourceKind, relation: Relation) -> bool {
        match role {
            Role::Admin => true,
            Role::Owner => kind != ResourceKind::User && relation == Relation::IsOwner,
            Role::Member => match action {
                Action::Read => {
                    kind != ResourceKind::User
                        && matches!(relation, Relation::IsTeamMember | Relation::IsAssignee)
                        && (kind == ResourceKind::Task || relation == Relation::IsTeamMember)
                }
                Action::UpdateStatus => {
                    kind == ResourceKind::Task && relation == Relation::IsAssignee
                }
                _ => false,
            },
        }
    }

    #[test]
    fn should_match_decision_table_for_full_cross_product() {
        let actor = UserId::new();
        for role in [Role::Admin, Role::Owner, Role::Member] {
            for action in [
                Action::Create,
                Action::Read,
                Action::Update,
                Action::Delete,
                Action::UpdateStatus,
            ] {
                for kind in [
                    ResourceKind::Project,
                    ResourceKind::Task,
                    ResourceKind::Team,
                    ResourceKind::User,
                ] {
                    for relation in [
                        Relation::IsOwner,
                        Relation::IsTeamMember,
                        Relation::IsAssignee,
                        Relation::Unrelated,
                    ] {
                        let resource = resource_for(kind, actor, relation);
                        let decision = evaluate(role, actor, action, &resource);
                        let allow = decision == Decision::Allow;
                        assert_eq!(
                            allow,
                            expected(role, action, kind, relation),
                            "{role:?} {action:?} {kind:?} {relation:?} -> {decision:?}"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn should_allow_member_status_update_only_on_own_task() {
        let actor = UserId::new();
        let own = Resource::task(Some(UserId::new()), Some(actor));
        let other = Resource::task(Some(UserId::new()), Some(UserId::new()));
        assert_eq!(
            evaluate(Role::Member, actor, Action::UpdateStatus, &own),
            Decision::Allow
        );
        assert!(matches!(
            evaluate(Role::Member, actor, Action::UpdateStatus, &other),
            Decision::Deny(_)
        ));
    }

    #[test]
    fn should_convert_denial_into_forbidden_error() {
        let actor = UserId::new();
        let resource = Resource::project(Some(UserId::new()));
        let err = check(Role::Member, actor, Action::Delete, &resource).unwrap_err();
        assert!(matches!(err, TaskHubError::Forbidden(_)));
    }

    #[test]
    fn should_never_panic_and_always_classify() {
        // Denials are values, not exceptions: evaluate is total.
        let actor = UserId::new();
        let resource = Resource::user();
        for role in [Role::Admin, Role::Owner, Role::Member] {
            let _ = evaluate(role, actor, Action::Delete, &resource);
        }
    }
}
