use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::Error;
use crate::model::UserBrief;

/// one record per unordered user pair; lookups always canonicalize the pair
/// so a reverse-direction duplicate can never be created
#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct FriendRequest {
    #[serde(rename = "_id")]
    pub id: String,
    pub sender_id: String,
    pub receiver_id: String,
    pub status: FriendRequestStatus,
    pub create_time: i64,
    pub update_time: i64,
}

impl FriendRequest {
    pub fn involves(&self, user_id: &str) -> bool {
        self.sender_id == user_id || self.receiver_id == user_id
    }

    /// the other participant, from `user_id`'s point of view
    pub fn counterpart(&self, user_id: &str) -> &str {
        if self.sender_id == user_id {
            &self.receiver_id
        } else {
            &self.sender_id
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum FriendRequestStatus {
    #[default]
    Pending,
    Accepted,
    Rejected,
}

impl Display for FriendRequestStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FriendRequestStatus::Pending => f.write_str("Pending"),
            FriendRequestStatus::Accepted => f.write_str("Accepted"),
            FriendRequestStatus::Rejected => f.write_str("Rejected"),
        }
    }
}

/// what a responder may do with a pending request; anything else is a
/// client error, not a silent rejection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RespondAction {
    Accept,
    Reject,
}

impl FromStr for RespondAction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "accept" => Ok(RespondAction::Accept),
            "reject" => Ok(RespondAction::Reject),
            other => Err(Error::bad_request(format!(
                "unknown respond action: {other}"
            ))),
        }
    }
}

impl From<RespondAction> for FriendRequestStatus {
    fn from(action: RespondAction) -> Self {
        match action {
            RespondAction::Accept => FriendRequestStatus::Accepted,
            RespondAction::Reject => FriendRequestStatus::Rejected,
        }
    }
}

/// how the caller relates to another user, derived from the single record
/// (if any) that exists for the pair
#[derive(Debug, Default, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct RelationFlags {
    pub is_friend: bool,
    pub request_sent: bool,
    pub request_received: bool,
}

impl RelationFlags {
    pub fn derive(me_id: &str, record: Option<&FriendRequest>) -> Self {
        match record {
            Some(fs) if fs.status == FriendRequestStatus::Accepted => Self {
                is_friend: true,
                ..Default::default()
            },
            Some(fs) if fs.status == FriendRequestStatus::Pending => Self {
                request_sent: fs.sender_id == me_id,
                request_received: fs.receiver_id == me_id,
                ..Default::default()
            },
            // rejected records grant no relation
            _ => Self::default(),
        }
    }
}

/// request record with both participants resolved
#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct FriendRequestWithUsers {
    pub id: String,
    pub status: FriendRequestStatus,
    pub create_time: i64,
    pub update_time: i64,
    pub sender: UserBrief,
    pub receiver: UserBrief,
}

/// accepted and pending buckets for the "friends and requests" listing;
/// rejected records stay in the store but show up in neither bucket
#[derive(Debug, Default, Serialize)]
pub struct FriendsAndPending {
    pub friends: Vec<FriendRequestWithUsers>,
    pub pending: Vec<FriendRequestWithUsers>,
}

impl FriendsAndPending {
    pub fn partition(records: Vec<FriendRequestWithUsers>) -> Self {
        let mut out = Self::default();
        for record in records {
            match record.status {
                FriendRequestStatus::Accepted => out.friends.push(record),
                FriendRequestStatus::Pending => out.pending.push(record),
                FriendRequestStatus::Rejected => {}
            }
        }
        out
    }
}

/// suggestions entry: a candidate user annotated with mutual friends and
/// the caller's relation flags
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Suggestion {
    pub id: String,
    pub username: String,
    pub profile_name: String,
    pub avatar: String,
    pub town: String,
    pub mutual_friends_count: usize,
    pub mutual_friends: Vec<UserBrief>,
    pub is_friend: bool,
    pub request_sent: bool,
    pub request_received: bool,
}

/// pending inbound request resolved with sender info and mutual friends
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestWithMutuals {
    pub id: String,
    pub sender: UserBrief,
    pub town: String,
    pub create_time: i64,
    pub mutual_friends_count: usize,
    pub mutual_friends: Vec<UserBrief>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(sender: &str, receiver: &str, status: FriendRequestStatus) -> FriendRequest {
        FriendRequest {
            id: "fs1".to_string(),
            sender_id: sender.to_string(),
            receiver_id: receiver.to_string(),
            status,
            create_time: 0,
            update_time: 0,
        }
    }

    #[test]
    fn relation_flags_from_accepted() {
        let fs = record("a", "b", FriendRequestStatus::Accepted);
        let flags = RelationFlags::derive("a", Some(&fs));
        assert!(flags.is_friend);
        assert!(!flags.request_sent);
        assert!(!flags.request_received);
    }

    #[test]
    fn relation_flags_follow_pending_direction() {
        let fs = record("a", "b", FriendRequestStatus::Pending);
        let sender_side = RelationFlags::derive("a", Some(&fs));
        assert!(sender_side.request_sent);
        assert!(!sender_side.request_received);

        let receiver_side = RelationFlags::derive("b", Some(&fs));
        assert!(!receiver_side.request_sent);
        assert!(receiver_side.request_received);
    }

    #[test]
    fn relation_flags_ignore_rejected_and_missing() {
        let fs = record("a", "b", FriendRequestStatus::Rejected);
        assert_eq!(RelationFlags::derive("a", Some(&fs)), RelationFlags::default());
        assert_eq!(RelationFlags::derive("a", None), RelationFlags::default());
    }

    #[test]
    fn counterpart_is_the_other_side() {
        let fs = record("a", "b", FriendRequestStatus::Pending);
        assert_eq!(fs.counterpart("a"), "b");
        assert_eq!(fs.counterpart("b"), "a");
    }

    #[test]
    fn respond_action_rejects_unknown_token() {
        assert_eq!("accept".parse::<RespondAction>().unwrap(), RespondAction::Accept);
        assert_eq!("reject".parse::<RespondAction>().unwrap(), RespondAction::Reject);
        assert!("block".parse::<RespondAction>().is_err());
    }

    #[test]
    fn partition_drops_rejected() {
        let brief = UserBrief::default();
        let mk = |status| FriendRequestWithUsers {
            id: "1".to_string(),
            status,
            create_time: 0,
            update_time: 0,
            sender: brief.clone(),
            receiver: brief.clone(),
        };
        let buckets = FriendsAndPending::partition(vec![
            mk(FriendRequestStatus::Accepted),
            mk(FriendRequestStatus::Pending),
            mk(FriendRequestStatus::Rejected),
        ]);
        assert_eq!(buckets.friends.len(), 1);
        assert_eq!(buckets.pending.len(), 1);
    }
}
