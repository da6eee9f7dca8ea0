use std::collections::{HashMap, HashSet};

use axum::extract::State;
use axum::Json;

use common::errors::Error;
use common::model::{
    FriendRequest, FriendRequestWithUsers, FriendsAndPending, RelationFlags, RequestWithMutuals,
    RespondAction, Suggestion, User, UserBrief,
};

use crate::api_utils::custom_extract::{ClaimsExtractor, JsonExtractor, PathExtractor};
use crate::handlers::friends::{CreateFriendRequest, RespondRequest};
use crate::AppState;

/// resolve both participants of each record; records whose users vanished
/// are silently dropped
async fn with_users(
    state: &AppState,
    records: Vec<FriendRequest>,
) -> Result<Vec<FriendRequestWithUsers>, Error> {
    let mut ids: Vec<String> = records
        .iter()
        .flat_map(|fs| [fs.sender_id.clone(), fs.receiver_id.clone()])
        .collect();
    ids.sort();
    ids.dedup();

    let users: HashMap<String, UserBrief> = state
        .db
        .user
        .get_users_by_ids(&ids)
        .await?
        .iter()
        .map(|user| (user.id.clone(), UserBrief::from(user)))
        .collect();

    Ok(records
        .into_iter()
        .filter_map(|fs| {
            let sender = users.get(&fs.sender_id)?.clone();
            let receiver = users.get(&fs.receiver_id)?.clone();
            Some(FriendRequestWithUsers {
                id: fs.id,
                status: fs.status,
                create_time: fs.create_time,
                update_time: fs.update_time,
                sender,
                receiver,
            })
        })
        .collect())
}

async fn validate_target(state: &AppState, me: &str, target: &str) -> Result<(), Error> {
    if me == target {
        return Err(Error::unprocessable(
            "you cannot send a friend request to yourself".to_string(),
        ));
    }
    state
        .db
        .user
        .get_user_by_id(target)
        .await?
        .ok_or_else(|| Error::not_found_with_details("user not found".to_string()))?;
    Ok(())
}

pub async fn create_friendship(
    State(state): State<AppState>,
    ClaimsExtractor(claims): ClaimsExtractor,
    JsonExtractor(req): JsonExtractor<CreateFriendRequest>,
) -> Result<Json<FriendRequest>, Error> {
    validate_target(&state, &claims.sub, &req.receiver_id).await?;
    let fs = state
        .db
        .friend
        .create_request(&claims.sub, &req.receiver_id)
        .await?;
    Ok(Json(fs))
}

pub async fn respond_to_request(
    State(state): State<AppState>,
    ClaimsExtractor(claims): ClaimsExtractor,
    PathExtractor(id): PathExtractor<String>,
    JsonExtractor(req): JsonExtractor<RespondRequest>,
) -> Result<Json<FriendRequest>, Error> {
    let action: RespondAction = req.action.parse()?;
    let fs = state.db.friend.respond(&id, &claims.sub, action).await?;
    Ok(Json(fs))
}

/// accepted and still-pending records in one response
pub async fn friends_and_requests(
    State(state): State<AppState>,
    ClaimsExtractor(claims): ClaimsExtractor,
) -> Result<Json<FriendsAndPending>, Error> {
    let records = state.db.friend.get_for_user(&claims.sub).await?;
    let resolved = with_users(&state, records).await?;
    Ok(Json(FriendsAndPending::partition(resolved)))
}

pub async fn friends_list(
    State(state): State<AppState>,
    ClaimsExtractor(claims): ClaimsExtractor,
) -> Result<Json<Vec<UserBrief>>, Error> {
    let ids = state.db.friend.get_friend_ids(&claims.sub).await?;
    let users = state.db.user.get_users_by_ids(&ids).await?;
    Ok(Json(users.iter().map(UserBrief::from).collect()))
}

/// breaking up is explicit; asking to remove someone who is not a friend
/// is an error on this surface
pub async fn remove_friend(
    State(state): State<AppState>,
    ClaimsExtractor(claims): ClaimsExtractor,
    PathExtractor(user_id): PathExtractor<String>,
) -> Result<(), Error> {
    let removed = state
        .db
        .friend
        .delete_accepted(&claims.sub, &user_id)
        .await?;
    if !removed {
        return Err(Error::not_found_with_details(
            "you are not friends with this user".to_string(),
        ));
    }
    Ok(())
}

pub async fn send_request(
    State(state): State<AppState>,
    ClaimsExtractor(claims): ClaimsExtractor,
    PathExtractor(receiver_id): PathExtractor<String>,
) -> Result<Json<FriendRequest>, Error> {
    validate_target(&state, &claims.sub, &receiver_id).await?;
    let fs = state
        .db
        .friend
        .create_request(&claims.sub, &receiver_id)
        .await?;
    Ok(Json(fs))
}

pub async fn accept_request(
    State(state): State<AppState>,
    ClaimsExtractor(claims): ClaimsExtractor,
    PathExtractor(sender_id): PathExtractor<String>,
) -> Result<Json<FriendRequest>, Error> {
    let fs = state.db.friend.accept_from(&claims.sub, &sender_id).await?;
    Ok(Json(fs))
}

/// declining something that is not pending is a no-op, not an error
pub async fn decline_request(
    State(state): State<AppState>,
    ClaimsExtractor(claims): ClaimsExtractor,
    PathExtractor(sender_id): PathExtractor<String>,
) -> Result<(), Error> {
    state
        .db
        .friend
        .delete_pending(&sender_id, &claims.sub)
        .await?;
    Ok(())
}

pub async fn cancel_request(
    State(state): State<AppState>,
    ClaimsExtractor(claims): ClaimsExtractor,
    PathExtractor(receiver_id): PathExtractor<String>,
) -> Result<(), Error> {
    state
        .db
        .friend
        .delete_pending(&claims.sub, &receiver_id)
        .await?;
    Ok(())
}

/// same removal as [remove_friend] but idempotent
pub async fn unfriend(
    State(state): State<AppState>,
    ClaimsExtractor(claims): ClaimsExtractor,
    PathExtractor(user_id): PathExtractor<String>,
) -> Result<(), Error> {
    state
        .db
        .friend
        .delete_accepted(&claims.sub, &user_id)
        .await?;
    Ok(())
}

pub async fn incoming_requests(
    State(state): State<AppState>,
    ClaimsExtractor(claims): ClaimsExtractor,
) -> Result<Json<Vec<FriendRequestWithUsers>>, Error> {
    let records = state.db.friend.get_incoming_pending(&claims.sub).await?;
    let resolved = with_users(&state, records).await?;
    Ok(Json(resolved))
}

pub async fn suggestions(
    State(state): State<AppState>,
    ClaimsExtractor(claims): ClaimsExtractor,
) -> Result<Json<Vec<Suggestion>>, Error> {
    let users = state.db.user.get_all_except(&claims.sub).await?;
    let my_records = state.db.friend.get_for_user(&claims.sub).await?;
    let accepted = state.db.friend.get_all_accepted().await?;
    Ok(Json(build_suggestions(
        &claims.sub,
        &users,
        &my_records,
        &accepted,
    )))
}

pub async fn incoming_requests_detailed(
    State(state): State<AppState>,
    ClaimsExtractor(claims): ClaimsExtractor,
) -> Result<Json<Vec<RequestWithMutuals>>, Error> {
    let incoming = state.db.friend.get_incoming_pending(&claims.sub).await?;
    let users = state.db.user.get_all_except(&claims.sub).await?;
    let accepted = state.db.friend.get_all_accepted().await?;
    Ok(Json(build_requests_detailed(
        &claims.sub,
        &incoming,
        &users,
        &accepted,
    )))
}

fn friends_by_user(accepted: &[FriendRequest]) -> HashMap<&str, HashSet<&str>> {
    let mut map: HashMap<&str, HashSet<&str>> = HashMap::new();
    for edge in accepted {
        map.entry(&edge.sender_id)
            .or_default()
            .insert(&edge.receiver_id);
        map.entry(&edge.receiver_id)
            .or_default()
            .insert(&edge.sender_id);
    }
    map
}

fn mutual_friends<'a>(
    a: &str,
    b: &str,
    friends: &HashMap<&str, HashSet<&'a str>>,
) -> Vec<&'a str> {
    let empty = HashSet::new();
    let a_friends = friends.get(a).unwrap_or(&empty);
    let b_friends = friends.get(b).unwrap_or(&empty);
    let mut mutuals: Vec<&str> = a_friends.intersection(b_friends).copied().collect();
    mutuals.sort();
    mutuals
}

/// at most this many mutual friends are resolved as samples per entry
const MUTUAL_SAMPLES: usize = 2;

const SUGGESTION_LIMIT: usize = 20;

/// non-friend candidates annotated with mutual-friend counts, most mutual
/// friends first
fn build_suggestions(
    me: &str,
    users: &[User],
    my_records: &[FriendRequest],
    accepted: &[FriendRequest],
) -> Vec<Suggestion> {
    let friends = friends_by_user(accepted);
    let briefs: HashMap<&str, UserBrief> = users
        .iter()
        .map(|user| (user.id.as_str(), UserBrief::from(user)))
        .collect();
    let records: HashMap<&str, &FriendRequest> = my_records
        .iter()
        .map(|fs| (fs.counterpart(me), fs))
        .collect();

    let mut suggestions: Vec<Suggestion> = users
        .iter()
        .filter_map(|user| {
            let flags = RelationFlags::derive(me, records.get(user.id.as_str()).copied());
            if flags.is_friend {
                return None;
            }

            let mutuals = mutual_friends(me, &user.id, &friends);
            let samples = mutuals
                .iter()
                .filter_map(|id| briefs.get(id).cloned())
                .take(MUTUAL_SAMPLES)
                .collect();

            Some(Suggestion {
                id: user.id.clone(),
                username: user.username.clone(),
                profile_name: user.profile_name.clone(),
                avatar: user.avatar.clone(),
                town: user.town.clone(),
                mutual_friends_count: mutuals.len(),
                mutual_friends: samples,
                is_friend: false,
                request_sent: flags.request_sent,
                request_received: flags.request_received,
            })
        })
        .collect();

    // sort_by is stable, so equal counts keep their input order
    suggestions.sort_by(|a, b| b.mutual_friends_count.cmp(&a.mutual_friends_count));
    suggestions.truncate(SUGGESTION_LIMIT);
    suggestions
}

fn build_requests_detailed(
    me: &str,
    incoming: &[FriendRequest],
    users: &[User],
    accepted: &[FriendRequest],
) -> Vec<RequestWithMutuals> {
    let friends = friends_by_user(accepted);
    let by_id: HashMap<&str, &User> = users.iter().map(|user| (user.id.as_str(), user)).collect();

    incoming
        .iter()
        .filter_map(|fs| {
            let sender = by_id.get(fs.sender_id.as_str())?;
            let mutuals = mutual_friends(me, &fs.sender_id, &friends);
            let samples = mutuals
                .iter()
                .filter_map(|id| by_id.get(id).map(|user| UserBrief::from(*user)))
                .take(MUTUAL_SAMPLES)
                .collect();

            Some(RequestWithMutuals {
                id: fs.id.clone(),
                sender: UserBrief::from(*sender),
                town: sender.town.clone(),
                create_time: fs.create_time,
                mutual_friends_count: mutuals.len(),
                mutual_friends: samples,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use common::model::FriendRequestStatus;

    use super::*;

    fn user(id: &str) -> User {
        User {
            id: id.to_string(),
            username: id.to_string(),
            ..Default::default()
        }
    }

    fn edge(a: &str, b: &str) -> FriendRequest {
        FriendRequest {
            id: format!("{a}-{b}"),
            sender_id: a.to_string(),
            receiver_id: b.to_string(),
            status: FriendRequestStatus::Accepted,
            create_time: 0,
            update_time: 0,
        }
    }

    fn pending(a: &str, b: &str) -> FriendRequest {
        FriendRequest {
            status: FriendRequestStatus::Pending,
            ..edge(a, b)
        }
    }

    #[test]
    fn suggestions_exclude_friends_and_rank_by_mutuals() {
        // me is friends with bob; bob knows carol and dave, carol knows dave
        let users = vec![user("bob"), user("carol"), user("dave"), user("eve")];
        let accepted = vec![
            edge("me", "bob"),
            edge("bob", "carol"),
            edge("bob", "dave"),
            edge("carol", "dave"),
        ];
        let my_records = vec![edge("me", "bob")];

        let suggestions = build_suggestions("me", &users, &my_records, &accepted);
        let ids: Vec<&str> = suggestions.iter().map(|s| s.id.as_str()).collect();

        // bob is a friend already, so only the rest remain; carol and dave
        // share bob with me, eve shares nobody
        assert_eq!(ids.len(), 3);
        assert!(!ids.contains(&"bob"));
        assert_eq!(ids[2], "eve");
        assert_eq!(suggestions[0].mutual_friends_count, 1);
        assert_eq!(suggestions[0].mutual_friends[0].id, "bob");
        assert_eq!(suggestions[2].mutual_friends_count, 0);
    }

    #[test]
    fn suggestions_carry_pending_direction_flags() {
        let users = vec![user("carol"), user("dave")];
        let my_records = vec![pending("me", "carol"), pending("dave", "me")];

        let suggestions = build_suggestions("me", &users, &my_records, &[]);
        let carol = suggestions.iter().find(|s| s.id == "carol").unwrap();
        assert!(carol.request_sent);
        assert!(!carol.request_received);

        let dave = suggestions.iter().find(|s| s.id == "dave").unwrap();
        assert!(dave.request_received);
        assert!(!dave.request_sent);
    }

    #[test]
    fn detailed_requests_resolve_sender_and_mutuals() {
        let users = vec![user("carol"), user("bob")];
        let incoming = vec![pending("carol", "me")];
        let accepted = vec![edge("me", "bob"), edge("carol", "bob")];

        let detailed = build_requests_detailed("me", &incoming, &users, &accepted);
        assert_eq!(detailed.len(), 1);
        assert_eq!(detailed[0].sender.id, "carol");
        assert_eq!(detailed[0].mutual_friends_count, 1);
        assert_eq!(detailed[0].mutual_friends[0].id, "bob");
    }

    #[test]
    fn detailed_requests_skip_unknown_senders() {
        let incoming = vec![pending("ghost", "me")];
        let detailed = build_requests_detailed("me", &incoming, &[], &[]);
        assert!(detailed.is_empty());
    }
}
