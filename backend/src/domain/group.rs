//! Messaging group records.
//!
//! A messaging group mirrors a party's participant set for chat delivery.
//! Membership additions track participant additions (create, join, invite);
//! removals are deliberately not mirrored, so a user who leaves a party keeps
//! receiving that party's group messages.

use uuid::Uuid;

use crate::domain::user::UserId;

/// Delivery-scope mirror of a party's participant set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessagingGroup {
    id: Uuid,
    name: String,
    members: Vec<UserId>,
}

impl MessagingGroup {
    /// Create a group with an initial member set.
    pub fn new(id: Uuid, name: impl Into<String>, members: Vec<UserId>) -> Self {
        Self {
            id,
            name: name.into(),
            members,
        }
    }

    /// Group identity.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Group name; groups are created with their party's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Member set, insertion ordered.
    pub fn members(&self) -> &[UserId] {
        &self.members
    }

    /// Whether `user` belongs to the group.
    pub fn is_member(&self, user: &UserId) -> bool {
        self.members.contains(user)
    }

    /// Add members, skipping any already present.
    pub fn add_members(&mut self, users: &[UserId]) {
        for user in users {
            if !self.is_member(user) {
                self.members.push(*user);
            }
        }
    }
}
