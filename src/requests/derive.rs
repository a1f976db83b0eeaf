//! Reconstructs the state of pairwise connection requests from both
//! parties' denormalized sets. Nothing here reads or writes a request
//! record, because none exists: a request is born when the sender adds
//! the target to its own `sent_requests`, and resolved when the target
//! files the sender under `accepted_requests` or `rejected_requests`.

use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::profiles::{RequestStatus, UserProfile};

/// A request someone else has open towards `me`.
///
/// The id is synthesized from the two party ids, and the timestamp is
/// taken at derivation time, not at send time: a bare id set cannot
/// remember when it grew. If ordering ever matters, `sent_requests`
/// has to become an id-to-timestamp map.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomingRequest {
    pub id: String,
    pub from_id: Uuid,
    pub to_id: Uuid,
    pub from_name: String,
    pub from_avatar: String,
    pub status: RequestStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

/// A request `me` has open towards someone else.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutgoingRequest {
    pub id: Uuid,
    pub name: String,
    pub avatar: String,
}

/// Everyone who has asked `me` to room and has not been answered yet.
pub fn derive_incoming(me: &UserProfile, others: &[UserProfile]) -> Vec<IncomingRequest> {
    let now = OffsetDateTime::now_utc();
    others
        .iter()
        .filter(|o| {
            o.sent_requests.contains(&me.id)
                && !me.accepted_requests.contains(&o.id)
                && !me.rejected_requests.contains(&o.id)
        })
        .map(|o| IncomingRequest {
            id: format!("{}_{}", o.id, me.id),
            from_id: o.id,
            to_id: me.id,
            from_name: o.name.clone(),
            from_avatar: o.avatar.clone(),
            status: RequestStatus::Pending,
            timestamp: now,
        })
        .collect()
}

/// Everyone `me` has asked to room who has not accepted, and whom `me`
/// has not meanwhile accepted through the other direction.
pub fn derive_outgoing(me: &UserProfile, others: &[UserProfile]) -> Vec<OutgoingRequest> {
    others
        .iter()
        .filter(|o| {
            me.sent_requests.contains(&o.id)
                && !o.accepted_requests.contains(&me.id)
                && !me.accepted_requests.contains(&o.id)
        })
        .map(|o| OutgoingRequest {
            id: o.id,
            name: o.name.clone(),
            avatar: o.avatar.clone(),
        })
        .collect()
}

/// The status annotation for one match card. `Accepted` means the two
/// are connected, which holds as soon as either side has accepted the
/// other; `Pending` means `me` has asked and heard nothing back; `None`
/// means no relationship either way.
pub fn status_with(
    me: &UserProfile,
    others: &[UserProfile],
    target_id: Uuid,
) -> Option<RequestStatus> {
    let they_accepted_me = others
        .iter()
        .find(|o| o.id == target_id)
        .is_some_and(|o| o.accepted_requests.contains(&me.id));

    if they_accepted_me || me.accepted_requests.contains(&target_id) {
        return Some(RequestStatus::Accepted);
    }
    if me.sent_requests.contains(&target_id) {
        return Some(RequestStatus::Pending);
    }
    None
}
