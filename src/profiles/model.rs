use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Youngest age a profile may declare.
pub const MIN_AGE: i64 = 18;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "male")]
    Male,
    #[serde(rename = "female")]
    Female,
    #[serde(rename = "non-binary")]
    NonBinary,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        use Gender::*;
        match self {
            Male => "male",
            Female => "female",
            NonBinary => "non-binary",
        }
    }

    pub fn parse(s: &str) -> Option<Gender> {
        use Gender::*;
        match s {
            "male" => Some(Male),
            "female" => Some(Female),
            "non-binary" => Some(NonBinary),
            _ => None,
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Where a pairwise connection request stands, as shown on a match card.
/// `Accepted` renders as "connected" on either side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Accepted,
    Rejected,
}

/// The five continuous axes plus the two boolean habits compared
/// between two users.
///
/// Axes read low-to-high: sleep 0 night owl / 100 early bird,
/// cleanliness 0 messy / 100 tidy, noise 0 social-loud / 100 quiet,
/// guests 0 frequent / 100 rare, cooking 0 takeout / 100 home cook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifestyleData {
    pub sleep: u8,
    pub cleanliness: u8,
    pub noise: u8,
    pub guests: u8,
    pub cooking: u8,
    pub smoking: bool,
    pub pets: bool,
}

impl LifestyleData {
    /// Pins every axis back into [0,100]. Applied to anything coming in
    /// from the wire or out of the store.
    pub fn clamped(self) -> LifestyleData {
        LifestyleData {
            sleep: self.sleep.min(100),
            cleanliness: self.cleanliness.min(100),
            noise: self.noise.min(100),
            guests: self.guests.min(100),
            cooking: self.cooking.min(100),
            ..self
        }
    }
}

impl Default for LifestyleData {
    fn default() -> LifestyleData {
        LifestyleData {
            sleep: 50,
            cleanliness: 50,
            noise: 50,
            guests: 50,
            cooking: 50,
            smoking: false,
            pets: false,
        }
    }
}

/// A user's full document: identity, presentation, demographics, the
/// embedded lifestyle, and the three relationship sets stored on the
/// user's own row.
///
/// `accepted_requests` and `rejected_requests` never both contain the
/// same id; the store's resolve primitive keeps them exclusive. Whether
/// two users are connected is never stored anywhere, it is derived from
/// both parties' sets (see `requests::derive`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub avatar: String,
    pub bio: String,
    pub occupation: String,
    pub age: i64,
    pub gender: Gender,
    pub allow_opposite_gender: bool,
    pub lifestyle: LifestyleData,
    #[serde(default)]
    pub sent_requests: Vec<Uuid>,
    #[serde(default)]
    pub accepted_requests: Vec<Uuid>,
    #[serde(default)]
    pub rejected_requests: Vec<Uuid>,
}

/// What the questionnaire posts back. Identity and the relationship
/// sets are never taken from the client.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileForm {
    pub name: String,
    #[serde(default)]
    pub avatar: String,
    #[serde(default)]
    pub bio: String,
    pub occupation: String,
    pub age: i64,
    pub gender: Gender,
    #[serde(default)]
    pub allow_opposite_gender: bool,
    pub lifestyle: LifestyleData,
}

impl ProfileForm {
    /// Everything wrong with the form, checked before any persistence
    /// call. An empty vec means the profile may be saved.
    pub fn problems(&self) -> Vec<&'static str> {
        let mut problems = Vec::new();
        if self.name.trim().is_empty() {
            problems.push("name is required");
        }
        if self.occupation.trim().is_empty() {
            problems.push("occupation is required");
        }
        if self.age < MIN_AGE {
            problems.push("age must be at least 18");
        }
        problems
    }
}

#[cfg(test)]
pub(crate) fn sample(n: u128) -> UserProfile {
    UserProfile {
        id: Uuid::from_u128(n),
        email: format!("user{n}@example.com"),
        name: format!("User {n}"),
        avatar: String::new(),
        bio: String::new(),
        occupation: "tester".to_owned(),
        age: 25,
        gender: Gender::Male,
        allow_opposite_gender: false,
        lifestyle: LifestyleData::default(),
        sent_requests: Vec::new(),
        accepted_requests: Vec::new(),
        rejected_requests: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axes_clamp_to_scale() {
        let wild = LifestyleData {
            sleep: 200,
            cleanliness: 101,
            noise: 100,
            guests: 0,
            cooking: 255,
            smoking: false,
            pets: true,
        };
        let clamped = wild.clamped();
        assert_eq!(clamped.sleep, 100);
        assert_eq!(clamped.cleanliness, 100);
        assert_eq!(clamped.noise, 100);
        assert_eq!(clamped.guests, 0);
        assert_eq!(clamped.cooking, 100);
        assert!(clamped.pets);
    }

    #[test]
    fn incomplete_form_is_rejected() {
        let form = ProfileForm {
            name: "  ".to_owned(),
            avatar: String::new(),
            bio: String::new(),
            occupation: String::new(),
            age: 17,
            gender: Gender::Female,
            allow_opposite_gender: false,
            lifestyle: LifestyleData::default(),
        };
        let problems = form.problems();
        assert_eq!(problems.len(), 3);

        let ok = ProfileForm {
            name: "Ada".to_owned(),
            occupation: "engineer".to_owned(),
            age: 22,
            ..form
        };
        assert!(ok.problems().is_empty());
    }

    #[test]
    fn profile_round_trips_the_wire_names() {
        let mut p = sample(7);
        p.gender = Gender::NonBinary;
        p.allow_opposite_gender = true;
        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(json["gender"], "non-binary");
        assert_eq!(json["allowOppositeGender"], true);
        assert!(json["sentRequests"].is_array());

        let back: UserProfile = serde_json::from_value(json).unwrap();
        assert_eq!(back.id, p.id);
        assert_eq!(back.gender, Gender::NonBinary);
    }
}
