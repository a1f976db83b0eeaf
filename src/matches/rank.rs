use serde::Serialize;

use crate::profiles::UserProfile;

use super::score;

/// A candidate profile with its derived score attached. The score is
/// never persisted; `ai_insight` is optional garnish fetched separately.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    #[serde(flatten)]
    pub profile: UserProfile,
    pub score: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_insight: Option<String>,
}

/// Gate, score and order the candidate set for `current`.
///
/// Candidates failing the gender gate are dropped entirely, never
/// scored. Ties on score break by ascending id so the ordering is
/// stable across calls. An empty candidate set yields an empty vec.
pub fn rank(current: &UserProfile, candidates: &[UserProfile]) -> Vec<MatchResult> {
    let mut matches: Vec<MatchResult> = candidates
        .iter()
        .filter(|other| score::is_gender_compatible(current, other))
        .map(|other| MatchResult {
            score: score::compatibility(current, other),
            profile: other.clone(),
            ai_insight: None,
        })
        .collect();

    matches.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then_with(|| a.profile.id.cmp(&b.profile.id))
    });
    matches
}
