//! Item aggregate.
//!
//! An item is owned by exactly one user and is visible to its owner only,
//! to one team, or to everyone. The team is present if and only if the
//! access level is `Team`; `ItemDraft::build` is the single place where
//! that invariant is checked, so an `Item` value always satisfies it.

use serde::Serialize;

use super::AccessLevel;
use crate::domain::foundation::{FieldError, ItemId, TeamId, Timestamp, UserId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Item {
    id: ItemId,
    message: String,
    user_id: UserId,
    team_id: Option<TeamId>,
    access_level: AccessLevel,
    created_at: Timestamp,
    updated_at: Timestamp,
    created_by: UserId,
}

impl Item {
    pub fn id(&self) -> ItemId {
        self.id
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// The owner.
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn team_id(&self) -> Option<&TeamId> {
        self.team_id.as_ref()
    }

    pub fn access_level(&self) -> AccessLevel {
        self.access_level
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    pub fn created_by(&self) -> &UserId {
        &self.created_by
    }

    pub fn is_owned_by(&self, user_id: &UserId) -> bool {
        &self.user_id == user_id
    }

    pub fn is_team_item(&self) -> bool {
        self.team_id.is_some() && self.access_level == AccessLevel::Team
    }

    pub fn is_public(&self) -> bool {
        self.access_level == AccessLevel::Public
    }

    pub fn is_individual(&self) -> bool {
        self.access_level == AccessLevel::Individual
    }

    /// True if this is a team item shared with `team_id`.
    pub fn is_shared_with(&self, team_id: &TeamId) -> bool {
        self.is_team_item() && self.team_id.as_ref() == Some(team_id)
    }

    /// Replaces the message and refreshes `updated_at`.
    ///
    /// Owner, team and access level are never touched by updates.
    pub fn update_message(&mut self, message: impl Into<String>) -> Result<(), FieldError> {
        let message = message.into();
        if message.trim().is_empty() {
            return Err(FieldError::empty_field("message"));
        }
        self.message = message;
        self.touch();
        Ok(())
    }

    /// Refreshes `updated_at` to now.
    pub fn touch(&mut self) {
        self.updated_at = Timestamp::now();
    }
}

/// Builder for new items.
#[derive(Debug, Clone)]
pub struct ItemDraft {
    owner: UserId,
    message: String,
    access_level: AccessLevel,
    team_id: Option<TeamId>,
    id: Option<ItemId>,
}

impl ItemDraft {
    /// Starts an individual item owned by `owner`.
    pub fn new(owner: UserId, message: impl Into<String>) -> Self {
        Self {
            owner,
            message: message.into(),
            access_level: AccessLevel::Individual,
            team_id: None,
            id: None,
        }
    }

    pub fn access_level(mut self, access_level: AccessLevel) -> Self {
        self.access_level = access_level;
        self
    }

    pub fn team_id(mut self, team_id: Option<TeamId>) -> Self {
        self.team_id = team_id;
        self
    }

    /// Shortcut for a team item shared with `team_id`.
    pub fn shared_with(self, team_id: TeamId) -> Self {
        self.access_level(AccessLevel::Team).team_id(Some(team_id))
    }

    /// Shortcut for a public item.
    pub fn public(self) -> Self {
        self.access_level(AccessLevel::Public).team_id(None)
    }

    /// Uses a caller-chosen id instead of a generated one.
    pub fn with_id(mut self, id: ItemId) -> Self {
        self.id = Some(id);
        self
    }

    /// Validates the draft and produces an item with
    /// `created_at == updated_at` and `created_by == owner`.
    pub fn build(self) -> Result<Item, FieldError> {
        if self.message.trim().is_empty() {
            return Err(FieldError::empty_field("message"));
        }
        match (self.access_level, &self.team_id) {
            (AccessLevel::Team, None) => {
                return Err(FieldError::invalid_combination(
                    "team_id",
                    "team items must name a team",
                ))
            }
            (AccessLevel::Individual | AccessLevel::Public, Some(_)) => {
                return Err(FieldError::invalid_combination(
                    "team_id",
                    "only team items may name a team",
                ))
            }
            _ => {}
        }

        let now = Timestamp::now();
        Ok(Item {
            id: self.id.unwrap_or_default(),
            message: self.message,
            created_by: self.owner.clone(),
            user_id: self.owner,
            team_id: self.team_id,
            access_level: self.access_level,
            created_at: now,
            updated_at: now,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn owner() -> UserId {
        UserId::new("owner-1").unwrap()
    }

    fn team(id: &str) -> TeamId {
        TeamId::new(id).unwrap()
    }

    #[test]
    fn build_individual_item() {
        let item = ItemDraft::new(owner(), "hello").build().unwrap();

        assert!(item.is_individual());
        assert!(item.team_id().is_none());
        assert_eq!(item.created_at(), item.updated_at());
        assert_eq!(item.created_by(), &owner());
        assert!(item.is_owned_by(&owner()));
    }

    #[test]
    fn build_team_item() {
        let item = ItemDraft::new(owner(), "hello")
            .shared_with(team("engineering"))
            .build()
            .unwrap();

        assert!(item.is_team_item());
        assert!(item.is_shared_with(&team("engineering")));
        assert!(!item.is_shared_with(&team("marketing")));
    }

    #[test]
    fn team_level_without_team_is_rejected() {
        let err = ItemDraft::new(owner(), "hello")
            .access_level(AccessLevel::Team)
            .build()
            .unwrap_err();

        assert_eq!(err.field(), "team_id");
    }

    #[test]
    fn individual_with_team_is_rejected() {
        let err = ItemDraft::new(owner(), "hello")
            .team_id(Some(team("engineering")))
            .build()
            .unwrap_err();

        assert!(matches!(err, FieldError::InvalidCombination { .. }));
    }

    #[test]
    fn public_with_team_is_rejected() {
        let result = ItemDraft::new(owner(), "hello")
            .access_level(AccessLevel::Public)
            .team_id(Some(team("engineering")))
            .build();

        assert!(result.is_err());
    }

    #[test]
    fn blank_message_is_rejected() {
        let err = ItemDraft::new(owner(), "   ").build().unwrap_err();
        assert_eq!(err, FieldError::empty_field("message"));
    }

    #[test]
    fn with_id_keeps_given_id() {
        let id = ItemId::new();
        let item = ItemDraft::new(owner(), "hello").with_id(id).build().unwrap();
        assert_eq!(item.id(), id);
    }

    #[test]
    fn update_message_refreshes_updated_at_only() {
        let mut item = ItemDraft::new(owner(), "hello")
            .shared_with(team("engineering"))
            .build()
            .unwrap();
        let created_at = item.created_at();
        std::thread::sleep(std::time::Duration::from_millis(5));

        item.update_message("changed").unwrap();

        assert_eq!(item.message(), "changed");
        assert_eq!(item.created_at(), created_at);
        assert!(item.updated_at() > created_at);
        assert_eq!(item.user_id(), &owner());
        assert_eq!(item.created_by(), &owner());
        assert_eq!(item.team_id(), Some(&team("engineering")));
        assert_eq!(item.access_level(), AccessLevel::Team);
    }

    #[test]
    fn update_message_rejects_blank_and_keeps_old() {
        let mut item = ItemDraft::new(owner(), "hello").build().unwrap();
        assert!(item.update_message("").is_err());
        assert_eq!(item.message(), "hello");
    }

    fn access_level() -> impl Strategy<Value = AccessLevel> {
        prop_oneof![
            Just(AccessLevel::Individual),
            Just(AccessLevel::Team),
            Just(AccessLevel::Public),
        ]
    }

    proptest! {
        #[test]
        fn built_items_satisfy_team_invariant(
            level in access_level(),
            team_name in proptest::option::of("[a-z]{1,8}"),
        ) {
            let draft = ItemDraft::new(owner(), "message")
                .access_level(level)
                .team_id(team_name.map(|t| team(&t)));

            if let Ok(item) = draft.build() {
                prop_assert_eq!(
                    item.is_team_item(),
                    item.team_id().is_some() && item.access_level() == AccessLevel::Team
                );
                prop_assert_eq!(item.access_level() == AccessLevel::Team, item.team_id().is_some());
            }
        }
    }
}
