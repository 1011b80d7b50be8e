//! Per-connection room membership.
//!
//! Tracks which per-user rooms a WebSocket client has joined and filters
//! push events server-side.

use std::collections::HashSet;

use crate::domain::UserId;

/// Parses a `user_<uuid>` room name into the user id it targets.
#[must_use]
pub fn parse_room(room: &str) -> Option<UserId> {
    let uuid = room.strip_prefix("user_")?;
    uuid.parse::<uuid::Uuid>().ok().map(UserId::from_uuid)
}

/// The set of per-user rooms one WebSocket connection has joined.
#[derive(Debug, Default)]
pub struct RoomMembership {
    users: HashSet<UserId>,
}

impl RoomMembership {
    /// Creates an empty membership.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Joins a user's room. Idempotent.
    pub fn join(&mut self, user_id: UserId) {
        self.users.insert(user_id);
    }

    /// Leaves a user's room. Idempotent.
    pub fn leave(&mut self, user_id: UserId) {
        self.users.remove(&user_id);
    }

    /// Returns `true` if events for the given user should be forwarded.
    #[must_use]
    pub fn matches(&self, user_id: UserId) -> bool {
        self.users.contains(&user_id)
    }

    /// Number of joined rooms.
    #[must_use]
    pub fn count(&self) -> usize {
        self.users.len()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn empty_matches_nothing() {
        let membership = RoomMembership::new();
        assert!(!membership.matches(UserId::new()));
    }

    #[test]
    fn join_then_match() {
        let mut membership = RoomMembership::new();
        let user = UserId::new();
        membership.join(user);
        assert!(membership.matches(user));
        assert!(!membership.matches(UserId::new()));
    }

    #[test]
    fn leave_removes_the_room() {
        let mut membership = RoomMembership::new();
        let user = UserId::new();
        membership.join(user);
        membership.leave(user);
        assert!(!membership.matches(user));
        assert_eq!(membership.count(), 0);
    }

    #[test]
    fn parse_room_round_trips() {
        let user = UserId::new();
        let room = format!("user_{user}");
        assert_eq!(parse_room(&room), Some(user));
    }

    #[test]
    fn parse_room_rejects_garbage() {
        assert!(parse_room("user_not-a-uuid").is_none());
        assert!(parse_room("lobby").is_none());
        assert!(parse_room("").is_none());
    }
}
