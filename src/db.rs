//! The profile store. One row per user; the three relationship sets
//! live as json arrays on that row, so every mutation only ever touches
//! the acting user's own record and no cross-row transaction exists.

use sqlx::SqlitePool;
use uuid::Uuid;

use crate::profiles::{Gender, LifestyleData, UserProfile};
use crate::{AppError, AppResult};

// unique: uuid
// unique: user_id (the identity provider's subject)
const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS profiles (
    uuid TEXT PRIMARY KEY,
    user_id TEXT NOT NULL UNIQUE,
    email TEXT NOT NULL,
    name TEXT NOT NULL DEFAULT '',
    avatar TEXT NOT NULL DEFAULT '',
    bio TEXT NOT NULL DEFAULT '',
    occupation TEXT NOT NULL DEFAULT '',
    age INTEGER NOT NULL DEFAULT 22,
    gender TEXT NOT NULL DEFAULT 'male',
    allow_opposite_gender INTEGER NOT NULL DEFAULT 0,
    sleep INTEGER NOT NULL DEFAULT 50,
    cleanliness INTEGER NOT NULL DEFAULT 50,
    noise INTEGER NOT NULL DEFAULT 50,
    guests INTEGER NOT NULL DEFAULT 50,
    cooking INTEGER NOT NULL DEFAULT 50,
    smoking INTEGER NOT NULL DEFAULT 0,
    pets INTEGER NOT NULL DEFAULT 0,
    sent_requests TEXT NOT NULL DEFAULT '[]',
    accepted_requests TEXT NOT NULL DEFAULT '[]',
    rejected_requests TEXT NOT NULL DEFAULT '[]'
)";

const PROFILE_COLUMNS: &str = "uuid,email,name,avatar,bio,occupation,age,gender,\
    allow_opposite_gender,sleep,cleanliness,noise,guests,cooking,smoking,pets,\
    sent_requests,accepted_requests,rejected_requests";

pub async fn init(pool: &SqlitePool) -> AppResult<()> {
    sqlx::query(SCHEMA).execute(pool).await?;
    Ok(())
}

#[derive(sqlx::FromRow)]
struct ProfileRow {
    uuid: String,
    email: String,
    name: String,
    avatar: String,
    bio: String,
    occupation: String,
    age: i64,
    gender: String,
    allow_opposite_gender: bool,
    sleep: i64,
    cleanliness: i64,
    noise: i64,
    guests: i64,
    cooking: i64,
    smoking: bool,
    pets: bool,
    sent_requests: String,
    accepted_requests: String,
    rejected_requests: String,
}

fn axis(v: i64) -> u8 {
    v.clamp(0, 100) as u8
}

impl TryFrom<ProfileRow> for UserProfile {
    type Error = AppError;

    fn try_from(row: ProfileRow) -> AppResult<UserProfile> {
        Ok(UserProfile {
            id: Uuid::parse_str(&row.uuid)?,
            gender: Gender::parse(&row.gender)
                .ok_or(format!("bad gender {:?} on profile {}", row.gender, row.uuid))?,
            email: row.email,
            name: row.name,
            avatar: row.avatar,
            bio: row.bio,
            occupation: row.occupation,
            age: row.age,
            allow_opposite_gender: row.allow_opposite_gender,
            lifestyle: LifestyleData {
                sleep: axis(row.sleep),
                cleanliness: axis(row.cleanliness),
                noise: axis(row.noise),
                guests: axis(row.guests),
                cooking: axis(row.cooking),
                smoking: row.smoking,
                pets: row.pets,
            },
            sent_requests: serde_json::from_str(&row.sent_requests)?,
            accepted_requests: serde_json::from_str(&row.accepted_requests)?,
            rejected_requests: serde_json::from_str(&row.rejected_requests)?,
        })
    }
}

pub async fn load_profile(pool: &SqlitePool, id: Uuid) -> AppResult<Option<UserProfile>> {
    let row: Option<ProfileRow> =
        sqlx::query_as(&format!("SELECT {PROFILE_COLUMNS} FROM profiles WHERE uuid=?"))
            .bind(id.to_string())
            .fetch_optional(pool)
            .await?;
    row.map(UserProfile::try_from).transpose()
}

/// Resolves the identity provider's subject to its profile row.
pub async fn profile_by_user(pool: &SqlitePool, user_id: &str) -> AppResult<Option<UserProfile>> {
    let row: Option<ProfileRow> =
        sqlx::query_as(&format!("SELECT {PROFILE_COLUMNS} FROM profiles WHERE user_id=?"))
            .bind(user_id)
            .fetch_optional(pool)
            .await?;
    row.map(UserProfile::try_from).transpose()
}

/// Everyone except `excluding`, minus draft rows that never finished
/// the questionnaire (no name yet).
pub async fn load_all_others(pool: &SqlitePool, excluding: Uuid) -> AppResult<Vec<UserProfile>> {
    let rows: Vec<ProfileRow> = sqlx::query_as(&format!(
        "SELECT {PROFILE_COLUMNS} FROM profiles WHERE uuid != ? AND name != ''"
    ))
    .bind(excluding.to_string())
    .fetch_all(pool)
    .await?;
    rows.into_iter().map(UserProfile::try_from).collect()
}

/// Merge-saves the editable profile fields. The relationship set
/// columns are deliberately not in the statement, so a save cannot
/// clobber a request mutation that landed in between.
pub async fn save_profile(pool: &SqlitePool, profile: &UserProfile) -> AppResult<()> {
    let done = sqlx::query(
        "UPDATE profiles SET email=?,name=?,avatar=?,bio=?,occupation=?,age=?,gender=?,\
         allow_opposite_gender=?,sleep=?,cleanliness=?,noise=?,guests=?,cooking=?,\
         smoking=?,pets=? WHERE uuid=?",
    )
    .bind(&profile.email)
    .bind(&profile.name)
    .bind(&profile.avatar)
    .bind(&profile.bio)
    .bind(&profile.occupation)
    .bind(profile.age)
    .bind(profile.gender.as_str())
    .bind(profile.allow_opposite_gender)
    .bind(profile.lifestyle.sleep as i64)
    .bind(profile.lifestyle.cleanliness as i64)
    .bind(profile.lifestyle.noise as i64)
    .bind(profile.lifestyle.guests as i64)
    .bind(profile.lifestyle.cooking as i64)
    .bind(profile.lifestyle.smoking)
    .bind(profile.lifestyle.pets)
    .bind(profile.id.to_string())
    .execute(pool)
    .await?;

    if done.rows_affected() == 0 {
        return Err(format!("no profile row for {}", profile.id).into());
    }
    Ok(())
}

/// Creates the draft row on first sign-in, or hands back the existing
/// one. The avatar seed is the provider subject, so re-registration
/// draws the same face.
pub async fn init_user_record(
    pool: &SqlitePool,
    user_id: &str,
    email: &str,
) -> AppResult<UserProfile> {
    if let Some(profile) = profile_by_user(pool, user_id).await? {
        return Ok(profile);
    }

    let uuid = Uuid::now_v7();
    let avatar = format!("https://api.dicebear.com/7.x/avataaars/svg?seed={user_id}");
    tracing::info!("registering u/{user_id} as {uuid}");
    sqlx::query("INSERT INTO profiles (uuid,user_id,email,avatar) VALUES (?,?,?,?)")
        .bind(uuid.to_string())
        .bind(user_id)
        .bind(email)
        .bind(avatar)
        .execute(pool)
        .await?;

    profile_by_user(pool, user_id)
        .await?
        .ok_or("profile row vanished right after insert".into())
}

/// The three per-user sets a request mutation may touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestSet {
    Sent,
    Accepted,
    Rejected,
}

impl RequestSet {
    fn column(self) -> &'static str {
        use RequestSet::*;
        match self {
            Sent => "sent_requests",
            Accepted => "accepted_requests",
            Rejected => "rejected_requests",
        }
    }
}

async fn read_set(pool: &SqlitePool, owner: Uuid, set: RequestSet) -> AppResult<Vec<Uuid>> {
    let (json,): (String,) =
        sqlx::query_as(&format!("SELECT {} FROM profiles WHERE uuid=?", set.column()))
            .bind(owner.to_string())
            .fetch_one(pool)
            .await?;
    Ok(serde_json::from_str(&json)?)
}

async fn write_set(
    pool: &SqlitePool,
    owner: Uuid,
    set: RequestSet,
    ids: &[Uuid],
) -> AppResult<()> {
    sqlx::query(&format!("UPDATE profiles SET {}=? WHERE uuid=?", set.column()))
        .bind(serde_json::to_string(ids)?)
        .bind(owner.to_string())
        .execute(pool)
        .await?;
    Ok(())
}

/// Set-union on one relationship set of the owner's row. Re-adding an
/// id that is already present is a no-op.
pub async fn append_to_set(
    pool: &SqlitePool,
    owner: Uuid,
    set: RequestSet,
    value: Uuid,
) -> AppResult<()> {
    let mut ids = read_set(pool, owner, set).await?;
    if !ids.contains(&value) {
        ids.push(value);
        write_set(pool, owner, set, &ids).await?;
    }
    Ok(())
}

/// Set-remove on one relationship set of the owner's row. Removing an
/// absent id is a no-op.
pub async fn remove_from_set(
    pool: &SqlitePool,
    owner: Uuid,
    set: RequestSet,
    value: Uuid,
) -> AppResult<()> {
    let mut ids = read_set(pool, owner, set).await?;
    let before = ids.len();
    ids.retain(|id| *id != value);
    if ids.len() != before {
        write_set(pool, owner, set, &ids).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    // a single connection, or every statement would get its own
    // private in-memory database
    async fn test_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        init(&pool).await.unwrap();
        pool
    }

    #[tokio::test]
    async fn init_is_idempotent() {
        let pool = test_pool().await;
        init(&pool).await.unwrap();
    }

    #[tokio::test]
    async fn first_sign_in_creates_one_draft_row() {
        let pool = test_pool().await;
        let a = init_user_record(&pool, "firebase-uid-1", "a@example.com")
            .await
            .unwrap();
        let again = init_user_record(&pool, "firebase-uid-1", "a@example.com")
            .await
            .unwrap();
        assert_eq!(a.id, again.id);
        assert!(a.name.is_empty());
        assert!(a.avatar.contains("firebase-uid-1"));
        assert!(a.sent_requests.is_empty());
    }

    #[tokio::test]
    async fn drafts_and_self_are_excluded_from_candidates() {
        let pool = test_pool().await;
        let me = init_user_record(&pool, "u-me", "me@example.com").await.unwrap();
        let draft = init_user_record(&pool, "u-draft", "d@example.com").await.unwrap();
        let mut done = init_user_record(&pool, "u-done", "x@example.com").await.unwrap();

        done.name = "Finished".to_owned();
        done.occupation = "artist".to_owned();
        save_profile(&pool, &done).await.unwrap();

        let others = load_all_others(&pool, me.id).await.unwrap();
        assert_eq!(others.len(), 1);
        assert_eq!(others[0].id, done.id);
        assert_ne!(others[0].id, draft.id);
    }

    #[tokio::test]
    async fn save_merges_and_leaves_request_sets_alone() {
        let pool = test_pool().await;
        let mut me = init_user_record(&pool, "u-1", "one@example.com").await.unwrap();
        let other = init_user_record(&pool, "u-2", "two@example.com").await.unwrap();

        append_to_set(&pool, me.id, RequestSet::Sent, other.id)
            .await
            .unwrap();

        me.name = "Renamed".to_owned();
        me.lifestyle.noise = 80;
        // the in-memory copy has stale (empty) sets; saving must not
        // push that staleness back down
        save_profile(&pool, &me).await.unwrap();

        let reloaded = load_profile(&pool, me.id).await.unwrap().unwrap();
        assert_eq!(reloaded.name, "Renamed");
        assert_eq!(reloaded.lifestyle.noise, 80);
        assert_eq!(reloaded.sent_requests, vec![other.id]);
    }

    #[tokio::test]
    async fn save_without_a_row_is_an_error() {
        let pool = test_pool().await;
        let mut ghost = init_user_record(&pool, "u-1", "one@example.com").await.unwrap();
        ghost.id = Uuid::now_v7();
        assert!(save_profile(&pool, &ghost).await.is_err());
    }

    #[tokio::test]
    async fn append_is_set_union() {
        let pool = test_pool().await;
        let me = init_user_record(&pool, "u-1", "one@example.com").await.unwrap();
        let other = init_user_record(&pool, "u-2", "two@example.com").await.unwrap();

        append_to_set(&pool, me.id, RequestSet::Sent, other.id).await.unwrap();
        append_to_set(&pool, me.id, RequestSet::Sent, other.id).await.unwrap();

        let sent = read_set(&pool, me.id, RequestSet::Sent).await.unwrap();
        assert_eq!(sent, vec![other.id]);

        // and the recipient's row was never touched
        let them = load_profile(&pool, other.id).await.unwrap().unwrap();
        assert!(them.sent_requests.is_empty());
        assert!(them.accepted_requests.is_empty());
        assert!(them.rejected_requests.is_empty());
    }

    #[tokio::test]
    async fn outcome_sets_stay_mutually_exclusive() {
        let pool = test_pool().await;
        let me = init_user_record(&pool, "u-1", "one@example.com").await.unwrap();
        let other = init_user_record(&pool, "u-2", "two@example.com").await.unwrap();

        // reject first, then change my mind: reject -> accept
        append_to_set(&pool, me.id, RequestSet::Rejected, other.id).await.unwrap();
        remove_from_set(&pool, me.id, RequestSet::Accepted, other.id).await.unwrap();

        append_to_set(&pool, me.id, RequestSet::Accepted, other.id).await.unwrap();
        remove_from_set(&pool, me.id, RequestSet::Rejected, other.id).await.unwrap();

        let reloaded = load_profile(&pool, me.id).await.unwrap().unwrap();
        assert_eq!(reloaded.accepted_requests, vec![other.id]);
        assert!(reloaded.rejected_requests.is_empty());
    }

    #[tokio::test]
    async fn request_lifecycle_reconstructs_from_both_rows() {
        use crate::profiles::RequestStatus;
        use crate::requests::derive;

        let pool = test_pool().await;
        let mut a = init_user_record(&pool, "u-a", "a@example.com").await.unwrap();
        let mut b = init_user_record(&pool, "u-b", "b@example.com").await.unwrap();
        a.name = "Ada".to_owned();
        b.name = "Ben".to_owned();
        save_profile(&pool, &a).await.unwrap();
        save_profile(&pool, &b).await.unwrap();

        // a asks b to room; only a's row changes
        append_to_set(&pool, a.id, RequestSet::Sent, b.id).await.unwrap();

        let a = load_profile(&pool, a.id).await.unwrap().unwrap();
        let b = load_profile(&pool, b.id).await.unwrap().unwrap();
        let seen_by_a = vec![b.clone()];
        let seen_by_b = vec![a.clone()];

        assert_eq!(
            derive::status_with(&a, &seen_by_a, b.id),
            Some(RequestStatus::Pending)
        );
        assert_eq!(derive::derive_incoming(&b, &seen_by_b).len(), 1);
        assert!(b.accepted_requests.is_empty() && b.rejected_requests.is_empty());

        // b accepts; connected from both perspectives
        append_to_set(&pool, b.id, RequestSet::Accepted, a.id).await.unwrap();
        remove_from_set(&pool, b.id, RequestSet::Rejected, a.id).await.unwrap();

        let a = load_profile(&pool, a.id).await.unwrap().unwrap();
        let b = load_profile(&pool, b.id).await.unwrap().unwrap();
        assert_eq!(
            derive::status_with(&a, &[b.clone()], b.id),
            Some(RequestStatus::Accepted)
        );
        assert_eq!(
            derive::status_with(&b, &[a.clone()], a.id),
            Some(RequestStatus::Accepted)
        );
        assert!(derive::derive_outgoing(&a, &[b.clone()]).is_empty());
        assert!(derive::derive_incoming(&b, &[a]).is_empty());
    }

    #[tokio::test]
    async fn removing_an_absent_id_is_a_noop() {
        let pool = test_pool().await;
        let me = init_user_record(&pool, "u-1", "one@example.com").await.unwrap();
        remove_from_set(&pool, me.id, RequestSet::Rejected, Uuid::now_v7())
            .await
            .unwrap();
        let rejected = read_set(&pool, me.id, RequestSet::Rejected).await.unwrap();
        assert!(rejected.is_empty());
    }
}
