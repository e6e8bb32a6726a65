//! Team — a project-scoped group of users.

use serde::{Deserialize, Serialize};

use crate::error::{TaskHubError, ValidationError};
use crate::id::{ProjectId, TeamId, UserId};

/// A team belongs to exactly one project and carries a duplicate-free
/// membership set. The project's owner and the team's own owner are always
/// members; the lifecycle manager seeds them on creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    pub project_id: ProjectId,
    /// The owner (or admin) managing this team.
    pub owner_id: UserId,
    pub member_ids: Vec<UserId>,
}

impl Team {
    /// Create a new team with the given seed members, deduplicated while
    /// preserving first-seen order.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        project_id: ProjectId,
        owner_id: UserId,
        members: impl IntoIterator<Item = UserId>,
    ) -> Self {
        let mut member_ids = Vec::new();
        for id in members {
            if !member_ids.contains(&id) {
                member_ids.push(id);
            }
        }
        Self {
            id: TeamId::new(),
            name: name.into(),
            project_id,
            owner_id,
            member_ids,
        }
    }

    /// Whether the given user belongs to this team.
    #[must_use]
    pub fn is_member(&self, user_id: UserId) -> bool {
        self.member_ids.contains(&user_id)
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`TaskHubError::Validation`] when `name` is empty or the
    /// membership set contains duplicates.
    pub fn validate(&self) -> Result<(), TaskHubError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        for (i, id) in self.member_ids.iter().enumerate() {
            if self.member_ids[..i].contains(id) {
                return Err(ValidationError::AlreadyInTeam.into());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_deduplicate_seed_members() {
        let a = UserId::new();
        let b = UserId::new();
        let team = Team::new("Backend", ProjectId::new(), a, [a, b, a, b]);
        assert_eq!(team.member_ids, vec![a, b]);
    }

    #[test]
    fn should_report_membership() {
        let a = UserId::new();
        let team = Team::new("Backend", ProjectId::new(), a, [a]);
        assert!(team.is_member(a));
        assert!(!team.is_member(UserId::new()));
    }

    #[test]
    fn should_reject_duplicate_members_on_validate() {
        let a = UserId::new();
        let mut team = Team::new("Backend", ProjectId::new(), a, [a]);
        team.member_ids.push(a);
        assert!(matches!(
            team.validate(),
            Err(TaskHubError::Validation(ValidationError::AlreadyInTeam))
        ));
    }

    #[test]
    fn should_reject_empty_name() {
        let team = Team::new(" ", ProjectId::new(), UserId::new(), []);
        assert!(team.validate().is_err());
    }
}
