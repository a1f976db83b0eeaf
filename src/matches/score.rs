use crate::profiles::UserProfile;

// Fixed axis weights, summing to 100.
const W_SLEEP: f64 = 10.0;
const W_CLEANLINESS: f64 = 20.0;
const W_NOISE: f64 = 15.0;
const W_GUESTS: f64 = 10.0;
const W_SMOKING: f64 = 15.0;
const W_PETS: f64 = 10.0;
const W_COOKING: f64 = 5.0;
const W_AGE: f64 = 15.0;
const W_TOTAL: f64 =
    W_SLEEP + W_CLEANLINESS + W_NOISE + W_GUESTS + W_SMOKING + W_PETS + W_COOKING + W_AGE;

/// Two profiles may be scored and shown to each other iff they share a
/// gender, or both have opted into opposite-gender sharing. Symmetric.
pub fn is_gender_compatible(a: &UserProfile, b: &UserProfile) -> bool {
    if a.gender == b.gender {
        return true;
    }
    a.allow_opposite_gender && b.allow_opposite_gender
}

/// Weighted lifestyle compatibility of `a` and `b`, 0-100.
///
/// Continuous axes lose weight linearly with divergence; matching
/// booleans earn their full weight; age proximity fades to nothing over
/// a 15-year gap. Not strictly symmetric: a non-smoking `a` paired with
/// a smoking `b` is penalized 15 points, while the mirrored call merely
/// earns nothing for the axis. The raw sum can therefore go negative,
/// hence the clamp before rounding.
pub fn compatibility(a: &UserProfile, b: &UserProfile) -> u8 {
    let la = &a.lifestyle;
    let lb = &b.lifestyle;

    let axis = |x: u8, y: u8, weight: f64| (1.0 - (x as f64 - y as f64).abs() / 100.0) * weight;

    let mut total = 0.0;
    total += axis(la.sleep, lb.sleep, W_SLEEP);
    total += axis(la.cleanliness, lb.cleanliness, W_CLEANLINESS);
    total += axis(la.noise, lb.noise, W_NOISE);
    total += axis(la.guests, lb.guests, W_GUESTS);
    total += axis(la.cooking, lb.cooking, W_COOKING);

    if la.smoking == lb.smoking {
        total += W_SMOKING;
    } else if !la.smoking && lb.smoking {
        total -= W_SMOKING;
    }

    if la.pets == lb.pets {
        total += W_PETS;
    }

    let age_gap = (a.age - b.age).abs() as f64;
    total += (1.0 - age_gap / 15.0).max(0.0) * W_AGE;

    let percentage = (total / W_TOTAL * 100.0).clamp(0.0, 100.0);
    percentage.round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profiles::model::sample;
    use crate::profiles::{Gender, LifestyleData};

    #[test]
    fn identical_profiles_score_full_marks() {
        let a = sample(1);
        let b = sample(2);
        assert_eq!(compatibility(&a, &b), 100);
    }

    #[test]
    fn fifteen_year_gap_drops_the_age_weight() {
        let a = sample(1);
        let mut b = sample(2);
        b.age = 40;
        assert_eq!(compatibility(&a, &b), 85);
        assert_eq!(compatibility(&b, &a), 85);
    }

    #[test]
    fn smoking_penalty_is_asymmetric() {
        let a = sample(1);
        let mut b = sample(2);
        b.lifestyle.smoking = true;
        // non-smoker first: mismatch weight lost and 15 more docked
        assert_eq!(compatibility(&a, &b), 70);
        // smoker first: the axis merely earns nothing
        assert_eq!(compatibility(&b, &a), 85);
    }

    #[test]
    fn score_stays_on_the_scale_at_the_extremes() {
        let mut a = sample(1);
        let mut b = sample(2);
        a.lifestyle = LifestyleData {
            sleep: 0,
            cleanliness: 0,
            noise: 0,
            guests: 0,
            cooking: 0,
            smoking: false,
            pets: false,
        };
        b.lifestyle = LifestyleData {
            sleep: 100,
            cleanliness: 100,
            noise: 100,
            guests: 100,
            cooking: 100,
            smoking: true,
            pets: true,
        };
        a.age = 18;
        b.age = 90;
        // raw sum is -15 here; the clamp floors it at zero
        assert_eq!(compatibility(&a, &b), 0);
        assert_eq!(compatibility(&b, &a), 0);
    }

    #[test]
    fn gender_gate_is_symmetric() {
        let mut a = sample(1);
        let mut b = sample(2);
        a.gender = Gender::Female;
        b.gender = Gender::Male;
        assert!(!is_gender_compatible(&a, &b));
        assert!(!is_gender_compatible(&b, &a));

        a.allow_opposite_gender = true;
        assert!(!is_gender_compatible(&a, &b));
        assert!(!is_gender_compatible(&b, &a));

        b.allow_opposite_gender = true;
        assert!(is_gender_compatible(&a, &b));
        assert!(is_gender_compatible(&b, &a));

        b.gender = Gender::Female;
        b.allow_opposite_gender = false;
        a.allow_opposite_gender = false;
        assert!(is_gender_compatible(&a, &b));
    }
}
