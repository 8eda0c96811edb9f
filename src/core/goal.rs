use crate::domain::model::{BmiCategory, ProteinGoal, UserProfile};

/// Multiplier used when the activity level is missing or unrecognized.
pub const DEFAULT_PROTEIN_MULTIPLIER: f64 = 1.2;

/// BMI above which the goal is computed from an adjusted weight.
pub const LEAN_MASS_BMI_THRESHOLD: f64 = 30.0;

/// BMI the ideal weight is anchored to.
pub const IDEAL_BMI: f64 = 25.0;

/// Share of the excess over ideal weight that still counts toward the goal.
pub const EXCESS_WEIGHT_SHARE: f64 = 0.25;

pub fn body_mass_index(weight_kg: f64, height_cm: f64) -> f64 {
    let height_m = height_cm / 100.0;
    weight_kg / (height_m * height_m)
}

/// Daily protein target in grams, with the BMI it was derived from.
///
/// Above a BMI of 30 the weight is pulled toward the BMI-25 weight for the
/// same height, keeping a quarter of the excess.
pub fn calculate_protein_goal(profile: &UserProfile) -> ProteinGoal {
    let height_m = profile.height_cm / 100.0;
    let bmi = body_mass_index(profile.weight_kg, profile.height_cm);

    let lean_mass_adjusted = bmi > LEAN_MASS_BMI_THRESHOLD;
    let calculation_weight = if lean_mass_adjusted {
        let ideal_weight = IDEAL_BMI * height_m * height_m;
        ideal_weight + EXCESS_WEIGHT_SHARE * (profile.weight_kg - ideal_weight)
    } else {
        profile.weight_kg
    };

    let multiplier = profile
        .activity
        .map(|level| level.protein_multiplier())
        .unwrap_or(DEFAULT_PROTEIN_MULTIPLIER);

    ProteinGoal {
        daily_grams: calculation_weight * multiplier,
        bmi,
        category: BmiCategory::from_bmi(bmi),
        calculation_weight,
        lean_mass_adjusted,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::ActivityLevel;

    fn close(a: f64, b: f64, tolerance: f64) -> bool {
        (a - b).abs() < tolerance
    }

    #[test]
    fn test_normal_weight_uses_body_weight() {
        let profile = UserProfile::new(70.0, 175.0, "Moderately Active");
        let goal = calculate_protein_goal(&profile);

        assert!(close(goal.bmi, 22.857, 1e-3));
        assert_eq!(goal.category, BmiCategory::Normal);
        assert_eq!(goal.calculation_weight, 70.0);
        assert!(!goal.lean_mass_adjusted);
        assert!(close(goal.daily_grams, 105.0, 1e-9));
    }

    #[test]
    fn test_obese_weight_is_blended_toward_ideal() {
        let profile = UserProfile {
            weight_kg: 110.0,
            height_cm: 170.0,
            activity: Some(ActivityLevel::VeryActive),
        };
        let goal = calculate_protein_goal(&profile);

        assert!(close(goal.bmi, 38.062, 1e-3));
        assert_eq!(goal.category, BmiCategory::Obese);
        assert!(goal.lean_mass_adjusted);
        // ideal 72.25 + 0.25 * (110 - 72.25)
        assert!(close(goal.calculation_weight, 81.6875, 1e-9));
        assert!(close(goal.daily_grams, 81.6875 * 1.7, 1e-9));
    }

    #[test]
    fn test_bmi_of_exactly_thirty_is_not_adjusted() {
        // 30 * 2^2 = 120 kg at 200 cm
        let profile = UserProfile::new(120.0, 200.0, "Sedentary");
        let goal = calculate_protein_goal(&profile);

        assert!(close(goal.bmi, 30.0, 1e-9));
        assert!(!goal.lean_mass_adjusted);
        assert!(close(goal.daily_grams, 96.0, 1e-9));
    }

    #[test]
    fn test_unknown_activity_defaults_to_light_multiplier() {
        let profile = UserProfile::new(80.0, 180.0, "Professional Napper");
        assert_eq!(profile.activity, None);

        let goal = calculate_protein_goal(&profile);
        assert!(close(goal.daily_grams, 80.0 * DEFAULT_PROTEIN_MULTIPLIER, 1e-9));
    }

    #[test]
    fn test_multiplier_table() {
        let expected = [0.8, 1.2, 1.5, 1.7, 2.0];
        for (level, multiplier) in ActivityLevel::ALL.iter().zip(expected) {
            let profile = UserProfile {
                weight_kg: 50.0,
                height_cm: 160.0,
                activity: Some(*level),
            };
            let goal = calculate_protein_goal(&profile);
            assert!(close(goal.daily_grams, 50.0 * multiplier, 1e-9), "{:?}", level);
        }
    }

    #[test]
    fn test_named_levels_use_their_multiplier() {
        let cases = [
            ("Sedentary", 56.0),
            ("Lightly Active", 84.0),
            ("Moderately Active", 105.0),
            ("Very Active", 119.0),
            ("Athlete/Hypertrophy", 140.0),
        ];
        for (name, grams) in cases {
            let goal = calculate_protein_goal(&UserProfile::new(70.0, 175.0, name));
            assert!(close(goal.daily_grams, grams, 1e-9), "{}", name);
        }
    }
}
