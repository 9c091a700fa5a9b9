//! Community entity and the membership state machine
//!
//! A user is in at most one of `members` / `pending_members`. The creator joins
//! `members` at creation. `member_count` is a counter of its own: approving an
//! existing member bumps it again, so it is allowed to drift from `members.len()`.

use chrono::{DateTime, Utc};

use super::status::ApprovalStatus;
use crate::value_objects::Snowflake;

/// Where a user stands relative to one community
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommunityAccess {
    NonMember,
    Pending,
    Member,
    Creator,
}

impl CommunityAccess {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NonMember => "non_member",
            Self::Pending => "pending",
            Self::Member => "member",
            Self::Creator => "creator",
        }
    }

    /// Read and post in the message feed
    pub const fn can_use_feed(self) -> bool {
        match self {
            Self::Member | Self::Creator => true,
            Self::NonMember | Self::Pending => false,
        }
    }

    /// Approve, reject, and list join requests
    pub const fn can_moderate(self) -> bool {
        match self {
            Self::Creator => true,
            Self::NonMember | Self::Pending | Self::Member => false,
        }
    }

    /// The creator has no leave transition
    pub const fn can_leave(self) -> bool {
        match self {
            Self::Member => true,
            Self::NonMember | Self::Pending | Self::Creator => false,
        }
    }

    /// Only outsiders change state when asking to join; for everyone else it is a no-op
    pub const fn join_request_applies(self) -> bool {
        matches!(self, Self::NonMember)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Community {
    pub id: Snowflake,
    pub name: String,
    pub description: String,
    pub creator_id: Snowflake,
    pub members: Vec<Snowflake>,
    pub pending_members: Vec<Snowflake>,
    pub member_count: i32,
    pub status: ApprovalStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Community {
    /// New communities wait for admin approval with the creator as sole member
    pub fn new(id: Snowflake, name: String, description: String, creator_id: Snowflake) -> Self {
        let now = Utc::now();
        Self {
            id,
            name,
            description,
            creator_id,
            members: vec![creator_id],
            pending_members: Vec::new(),
            member_count: 1,
            status: ApprovalStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    #[inline]
    pub fn is_creator(&self, user_id: Snowflake) -> bool {
        self.creator_id == user_id
    }

    #[inline]
    pub fn is_member(&self, user_id: Snowflake) -> bool {
        self.members.contains(&user_id)
    }

    #[inline]
    pub fn is_pending(&self, user_id: Snowflake) -> bool {
        self.pending_members.contains(&user_id)
    }

    /// Publicly listed and joinable
    #[inline]
    pub fn is_visible(&self) -> bool {
        self.status.is_approved()
    }

    pub fn access_for(&self, user_id: Snowflake) -> CommunityAccess {
        if self.is_creator(user_id) {
            CommunityAccess::Creator
        } else if self.is_member(user_id) {
            CommunityAccess::Member
        } else if self.is_pending(user_id) {
            CommunityAccess::Pending
        } else {
            CommunityAccess::NonMember
        }
    }

    /// Queue a join request. Returns false when nothing changed.
    pub fn add_pending(&mut self, user_id: Snowflake) -> bool {
        if !self.access_for(user_id).join_request_applies() {
            return false;
        }
        self.pending_members.push(user_id);
        self.touch();
        true
    }

    /// Move a user into `members` and bump the counter unconditionally
    pub fn approve(&mut self, member_id: Snowflake) {
        self.pending_members.retain(|id| *id != member_id);
        if !self.is_member(member_id) {
            self.members.push(member_id);
        }
        self.member_count += 1;
        self.touch();
    }

    /// Drop a pending request. Returns whether one existed.
    pub fn reject(&mut self, member_id: Snowflake) -> bool {
        let before = self.pending_members.len();
        self.pending_members.retain(|id| *id != member_id);
        let removed = self.pending_members.len() != before;
        if removed {
            self.touch();
        }
        removed
    }

    /// Remove a member, decrementing the counter when someone actually left
    pub fn remove_member(&mut self, user_id: Snowflake) -> bool {
        let before = self.members.len();
        self.members.retain(|id| *id != user_id);
        let removed = self.members.len() != before;
        if removed {
            self.member_count -= 1;
            self.touch();
        }
        removed
    }

    pub fn set_status(&mut self, status: ApprovalStatus) {
        self.status = status;
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: Snowflake = Snowflake::new(1);
    const B: Snowflake = Snowflake::new(2);
    const C: Snowflake = Snowflake::new(3);

    fn sketchers() -> Community {
        Community::new(
            Snowflake::new(100),
            "Sketchers".to_string(),
            "Daily sketches".to_string(),
            A,
        )
    }

    fn disjoint(c: &Community) -> bool {
        c.members.iter().all(|m| !c.pending_members.contains(m))
    }

    #[test]
    fn test_new_community_defaults() {
        let c = sketchers();
        assert_eq!(c.members, vec![A]);
        assert_eq!(c.member_count, 1);
        assert_eq!(c.status, ApprovalStatus::Pending);
        assert_eq!(c.access_for(A), CommunityAccess::Creator);
    }

    #[test]
    fn test_request_then_approve() {
        let mut c = sketchers();
        assert!(c.add_pending(B));
        assert!(!c.add_pending(B));
        assert_eq!(c.access_for(B), CommunityAccess::Pending);

        c.approve(B);
        assert_eq!(c.members, vec![A, B]);
        assert!(c.pending_members.is_empty());
        assert_eq!(c.member_count, 2);
        assert!(disjoint(&c));
    }

    #[test]
    fn test_double_approve_bumps_counter_only() {
        let mut c = sketchers();
        c.add_pending(B);
        c.approve(B);
        c.approve(B);
        assert_eq!(c.members, vec![A, B]);
        assert_eq!(c.member_count, 3);
    }

    #[test]
    fn test_members_cannot_re_request() {
        let mut c = sketchers();
        assert!(!c.add_pending(A));
        c.add_pending(B);
        c.approve(B);
        assert!(!c.add_pending(B));
        assert!(disjoint(&c));
    }

    #[test]
    fn test_reject_and_leave() {
        let mut c = sketchers();
        c.add_pending(B);
        c.add_pending(C);
        assert!(c.reject(C));
        assert!(!c.reject(C));
        assert_eq!(c.member_count, 1);

        c.approve(B);
        assert!(c.remove_member(B));
        assert!(!c.remove_member(B));
        assert_eq!(c.member_count, 1);
        assert_eq!(c.access_for(B), CommunityAccess::NonMember);
    }

    #[test]
    fn test_access_table() {
        use CommunityAccess::{Creator, Member, NonMember, Pending};

        assert!(!NonMember.can_use_feed());
        assert!(!Pending.can_use_feed());
        assert!(Member.can_use_feed());
        assert!(Creator.can_use_feed());

        assert!(Creator.can_moderate());
        assert!(!Member.can_moderate());

        assert!(Member.can_leave());
        assert!(!Creator.can_leave());
        assert!(!Pending.can_leave());
    }
}
