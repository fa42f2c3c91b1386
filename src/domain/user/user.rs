//! The caller as seen by the authorization engine.

use std::collections::BTreeSet;

use super::Role;
use crate::domain::foundation::{IdentityClaims, TeamId, UserId};

/// An authenticated caller with role and team memberships.
///
/// Built once per request from verified claims plus a directory lookup.
/// There are no mutators: role and teams stay fixed for the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    user_id: UserId,
    username: String,
    email: String,
    role: Role,
    team_ids: BTreeSet<TeamId>,
}

impl User {
    pub fn new(
        user_id: UserId,
        username: impl Into<String>,
        email: impl Into<String>,
        role: Role,
        team_ids: impl IntoIterator<Item = TeamId>,
    ) -> Self {
        Self {
            user_id,
            username: username.into(),
            email: email.into(),
            role,
            team_ids: team_ids.into_iter().collect(),
        }
    }

    /// Combines verified claims with the directory's role and teams.
    pub fn from_claims(
        claims: IdentityClaims,
        role: Role,
        team_ids: impl IntoIterator<Item = TeamId>,
    ) -> Self {
        Self::new(claims.user_id, claims.username, claims.email, role, team_ids)
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn team_ids(&self) -> &BTreeSet<TeamId> {
        &self.team_ids
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn is_team_admin(&self) -> bool {
        self.role == Role::TeamAdmin
    }

    /// True if the user's role allows writing team items they are a member of.
    pub fn can_manage_team_items(&self) -> bool {
        self.role.can_manage_team_items()
    }

    pub fn is_member_of(&self, team_id: &TeamId) -> bool {
        self.team_ids.contains(team_id)
    }
}
