//! Keys under which the signed-in user's state lives in the cookie session.

pub const USER_ID: &str = "user_id";
