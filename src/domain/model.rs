use serde::{Deserialize, Serialize};

/// Nutrient amounts for one food item as entered by the user.
///
/// Everything is in grams except `sodium_mg` and `cholesterol_mg`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NutrientProfile {
    pub fat: f64,
    pub carbohydrate: f64,
    pub protein: f64,
    pub fiber: f64,
    pub sugar: f64,
    pub saturated_fat: f64,
    pub sodium_mg: f64,
    pub cholesterol_mg: f64,
    pub water: f64,
}

impl NutrientProfile {
    /// Mass in grams the densities are normalized by. Sugar, fiber and
    /// saturated fat are already part of carbohydrate and fat.
    pub fn total_mass(&self) -> f64 {
        self.fat
            + self.carbohydrate
            + self.protein
            + self.water
            + self.sodium_mg / 1000.0
            + self.cholesterol_mg / 1000.0
    }
}

/// A fixed-shape row handed to a scoring model. `NAMES` is the column order
/// the model was trained with and `values` must follow it.
pub trait FeatureRecord {
    const NAMES: &'static [&'static str];

    fn values(&self) -> Vec<f64>;
}

/// Input row of the calorie regressor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CalorieFeatures {
    #[serde(rename = "Fat")]
    pub fat: f64,
    #[serde(rename = "Protein")]
    pub protein: f64,
    #[serde(rename = "Carbohydrate")]
    pub carbohydrate: f64,
    #[serde(rename = "Fiber")]
    pub fiber: f64,
}

impl CalorieFeatures {
    pub fn from_profile(profile: &NutrientProfile) -> Self {
        Self {
            fat: profile.fat,
            protein: profile.protein,
            carbohydrate: profile.carbohydrate,
            fiber: profile.fiber,
        }
    }
}

impl FeatureRecord for CalorieFeatures {
    const NAMES: &'static [&'static str] = &["Fat", "Protein", "Carbohydrate", "Fiber"];

    fn values(&self) -> Vec<f64> {
        vec![self.fat, self.protein, self.carbohydrate, self.fiber]
    }
}

/// Input row of the health classifier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HealthFeatures {
    #[serde(rename = "Calorie_Density")]
    pub calorie_density: f64,
    #[serde(rename = "Fat_Density")]
    pub fat_density: f64,
    #[serde(rename = "Sugar_Density")]
    pub sugar_density: f64,
    #[serde(rename = "Protein_Density")]
    pub protein_density: f64,
    #[serde(rename = "Fiber_Density")]
    pub fiber_density: f64,
    #[serde(rename = "Saturated_Fat_Density")]
    pub saturated_fat_density: f64,
    #[serde(rename = "Cholesterol_Density")]
    pub cholesterol_density: f64,
    #[serde(rename = "Water_Density")]
    pub water_density: f64,
    #[serde(rename = "Sugar_Fiber_Ratio")]
    pub sugar_fiber_ratio: f64,
    #[serde(rename = "Sodium_Density")]
    pub sodium_density: f64,
}

impl FeatureRecord for HealthFeatures {
    const NAMES: &'static [&'static str] = &[
        "Calorie_Density",
        "Fat_Density",
        "Sugar_Density",
        "Protein_Density",
        "Fiber_Density",
        "Saturated_Fat_Density",
        "Cholesterol_Density",
        "Water_Density",
        "Sugar_Fiber_Ratio",
        "Sodium_Density",
    ];

    fn values(&self) -> Vec<f64> {
        vec![
            self.calorie_density,
            self.fat_density,
            self.sugar_density,
            self.protein_density,
            self.fiber_density,
            self.saturated_fat_density,
            self.cholesterol_density,
            self.water_density,
            self.sugar_fiber_ratio,
            self.sodium_density,
        ]
    }
}

/// Per-mass composition of one food item.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DensityVector {
    pub total_mass: f64,
    pub calorie_density: f64,
    pub fat_density: f64,
    pub carbohydrate_density: f64,
    pub protein_density: f64,
    pub fiber_density: f64,
    pub sugar_density: f64,
    pub saturated_fat_density: f64,
    pub sodium_density: f64,
    pub cholesterol_density: f64,
    pub water_density: f64,
    pub sugar_fiber_ratio: f64,
}

impl DensityVector {
    /// Returns `None` when the profile has no mass to normalize by.
    ///
    /// Sodium and cholesterol densities use the milligram amounts, matching
    /// the columns the classifier was trained on.
    pub fn compute(profile: &NutrientProfile, estimated_calories: f64) -> Option<Self> {
        let total_mass = profile.total_mass();
        if total_mass <= 0.0 {
            return None;
        }

        let sugar_fiber_ratio = if profile.fiber > 0.0 {
            profile.sugar / profile.fiber
        } else {
            0.0
        };

        Some(Self {
            total_mass,
            calorie_density: estimated_calories / total_mass,
            fat_density: profile.fat / total_mass,
            carbohydrate_density: profile.carbohydrate / total_mass,
            protein_density: profile.protein / total_mass,
            fiber_density: profile.fiber / total_mass,
            sugar_density: profile.sugar / total_mass,
            saturated_fat_density: profile.saturated_fat / total_mass,
            sodium_density: profile.sodium_mg / total_mass,
            cholesterol_density: profile.cholesterol_mg / total_mass,
            water_density: profile.water / total_mass,
            sugar_fiber_ratio,
        })
    }

    pub fn to_features(&self) -> HealthFeatures {
        HealthFeatures {
            calorie_density: self.calorie_density,
            fat_density: self.fat_density,
            sugar_density: self.sugar_density,
            protein_density: self.protein_density,
            fiber_density: self.fiber_density,
            saturated_fat_density: self.saturated_fat_density,
            cholesterol_density: self.cholesterol_density,
            water_density: self.water_density,
            sugar_fiber_ratio: self.sugar_fiber_ratio,
            sodium_density: self.sodium_density,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthLabel {
    Unhealthy,
    Healthy,
}

impl HealthLabel {
    /// Binary classifier convention: class 0 is unhealthy, class 1 healthy.
    pub fn from_class_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(HealthLabel::Unhealthy),
            1 => Some(HealthLabel::Healthy),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HealthLabel::Unhealthy => "UNHEALTHY",
            HealthLabel::Healthy => "HEALTHY",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HealthVerdict {
    pub label: HealthLabel,
    /// Probability that `label` is correct, in [0, 1].
    pub confidence: f64,
    /// Set when the protein/sugar correction replaced the model's label.
    pub overridden: bool,
}

impl HealthVerdict {
    /// Builds a verdict from the classifier's probability of the healthy
    /// class. A missing probability yields a confidence of 0.
    pub fn from_healthy_probability(label: HealthLabel, prob_healthy: Option<f64>) -> Self {
        let confidence = match (label, prob_healthy) {
            (HealthLabel::Healthy, Some(p)) => p,
            (HealthLabel::Unhealthy, Some(p)) => 1.0 - p,
            (_, None) => 0.0,
        };
        Self {
            label,
            confidence,
            overridden: false,
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.label == HealthLabel::Healthy
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivityLevel {
    Sedentary,
    LightlyActive,
    ModeratelyActive,
    VeryActive,
    Athlete,
}

impl ActivityLevel {
    pub const ALL: [ActivityLevel; 5] = [
        ActivityLevel::Sedentary,
        ActivityLevel::LightlyActive,
        ActivityLevel::ModeratelyActive,
        ActivityLevel::VeryActive,
        ActivityLevel::Athlete,
    ];

    /// Grams of protein per kilogram of calculation weight.
    pub fn protein_multiplier(&self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 0.8,
            ActivityLevel::LightlyActive => 1.2,
            ActivityLevel::ModeratelyActive => 1.5,
            ActivityLevel::VeryActive => 1.7,
            ActivityLevel::Athlete => 2.0,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "Sedentary (Office Job, No Exercise)",
            ActivityLevel::LightlyActive => "Lightly Active (Exercise 1-3 days/week)",
            ActivityLevel::ModeratelyActive => "Moderately Active (Exercise 3-5 days/week)",
            ActivityLevel::VeryActive => "Very Active (Hard Exercise 6-7 days/week)",
            ActivityLevel::Athlete => "Athlete / Muscle Building (Hypertrophy)",
        }
    }

    /// Short names a level is also known by.
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            ActivityLevel::Sedentary => &["Sedentary"],
            ActivityLevel::LightlyActive => &["Lightly Active"],
            ActivityLevel::ModeratelyActive => &["Moderately Active"],
            ActivityLevel::VeryActive => &["Very Active"],
            ActivityLevel::Athlete => &["Athlete/Hypertrophy", "Athlete", "Muscle Building"],
        }
    }

    /// Accepts the full form label or one of its aliases, case-insensitive,
    /// with `-`/`_` read as spaces ("very-active"). Anything else is unknown.
    pub fn parse(value: &str) -> Option<Self> {
        fn normalize(s: &str) -> String {
            s.to_lowercase()
                .replace(|c: char| c == '-' || c == '_', " ")
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ")
                .replace(" / ", "/")
        }

        let wanted = normalize(value);
        if wanted.is_empty() {
            return None;
        }
        Self::ALL.into_iter().find(|level| {
            normalize(level.label()) == wanted
                || level.aliases().iter().any(|alias| normalize(alias) == wanted)
        })
    }
}

/// Body profile used for the protein goal. `activity` is `None` when the
/// submitted level was missing or not recognized.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UserProfile {
    pub weight_kg: f64,
    pub height_cm: f64,
    pub activity: Option<ActivityLevel>,
}

impl UserProfile {
    pub fn new(weight_kg: f64, height_cm: f64, activity_level: &str) -> Self {
        Self {
            weight_kg,
            height_cm,
            activity: ActivityLevel::parse(activity_level),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BmiCategory {
    Underweight,
    Normal,
    Overweight,
    Obese,
}

impl BmiCategory {
    pub fn from_bmi(bmi: f64) -> Self {
        if bmi < 18.5 {
            BmiCategory::Underweight
        } else if bmi < 25.0 {
            BmiCategory::Normal
        } else if bmi < 30.0 {
            BmiCategory::Overweight
        } else {
            BmiCategory::Obese
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BmiCategory::Underweight => "Underweight",
            BmiCategory::Normal => "Normal",
            BmiCategory::Overweight => "Overweight",
            BmiCategory::Obese => "Obese - Weight Adjusted",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProteinGoal {
    pub daily_grams: f64,
    pub bmi: f64,
    pub category: BmiCategory,
    /// Weight the multiplier was applied to.
    pub calculation_weight: f64,
    pub lean_mass_adjusted: bool,
}

/// One row of the crawled dataset. `None` marks a value that was absent
/// or could not be parsed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodRecord {
    #[serde(rename = "Name")]
    pub name: Option<String>,
    #[serde(rename = "Calories")]
    pub calories: Option<f64>,
    #[serde(rename = "Fat")]
    pub fat: Option<f64>,
    #[serde(rename = "Carbohydrate")]
    pub carbohydrate: Option<f64>,
    #[serde(rename = "Protein")]
    pub protein: Option<f64>,
    #[serde(rename = "Sugars")]
    pub sugars: Option<f64>,
    #[serde(rename = "Fiber")]
    pub fiber: Option<f64>,
    #[serde(rename = "Sodium")]
    pub sodium: Option<f64>,
    #[serde(rename = "Saturated_Fat")]
    pub saturated_fat: Option<f64>,
    #[serde(rename = "Cholesterol")]
    pub cholesterol: Option<f64>,
    #[serde(rename = "Water")]
    pub water: Option<f64>,
}

impl FoodRecord {
    pub fn named(name: Option<String>) -> Self {
        Self {
            name,
            calories: None,
            fat: None,
            carbohydrate: None,
            protein: None,
            sugars: None,
            fiber: None,
            sodium: None,
            saturated_fat: None,
            cholesterol: None,
            water: None,
        }
    }
}

/// A detail page fetched by the crawler, before extraction.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub url: String,
    pub food_name: Option<String>,
    pub html: String,
}

#[derive(Debug, Clone)]
pub struct TransformResult {
    pub records: Vec<FoodRecord>,
    pub csv_output: String,
    pub json_output: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_mass_converts_milligrams() {
        let profile = NutrientProfile {
            fat: 10.0,
            carbohydrate: 20.0,
            protein: 5.0,
            water: 60.0,
            sodium_mg: 500.0,
            cholesterol_mg: 1500.0,
            // not part of the mass
            sugar: 8.0,
            fiber: 3.0,
            saturated_fat: 4.0,
        };
        assert!((profile.total_mass() - 97.0).abs() < 1e-9);
    }

    #[test]
    fn test_densities_divide_by_mass() {
        let profile = NutrientProfile {
            fat: 10.0,
            carbohydrate: 30.0,
            protein: 10.0,
            fiber: 4.0,
            sugar: 6.0,
            saturated_fat: 2.0,
            sodium_mg: 0.0,
            cholesterol_mg: 0.0,
            water: 50.0,
        };
        let d = DensityVector::compute(&profile, 250.0).unwrap();
        assert_eq!(d.total_mass, 100.0);
        assert_eq!(d.calorie_density, 2.5);
        assert_eq!(d.fat_density, 0.1);
        assert_eq!(d.carbohydrate_density, 0.3);
        assert_eq!(d.protein_density, 0.1);
        assert_eq!(d.fiber_density, 0.04);
        assert_eq!(d.sugar_density, 0.06);
        assert_eq!(d.saturated_fat_density, 0.02);
        assert_eq!(d.water_density, 0.5);
        assert_eq!(d.sugar_fiber_ratio, 1.5);
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn mixed_profile() -> NutrientProfile {
        NutrientProfile {
            fat: 10.0,
            carbohydrate: 30.0,
            protein: 12.0,
            fiber: 4.0,
            sugar: 6.0,
            saturated_fat: 2.0,
            sodium_mg: 400.0,
            cholesterol_mg: 100.0,
            water: 47.5,
        }
    }

    #[test]
    fn test_mineral_densities_use_milligrams() {
        let d = DensityVector::compute(&mixed_profile(), 250.0).unwrap();
        assert!(close(d.total_mass, 100.0));
        assert!(close(d.calorie_density, 2.5));
        assert!(close(d.fat_density, 0.1));
        assert!(close(d.carbohydrate_density, 0.3));
        assert!(close(d.protein_density, 0.12));
        assert!(close(d.fiber_density, 0.04));
        assert!(close(d.sugar_density, 0.06));
        assert!(close(d.saturated_fat_density, 0.02));
        assert!(close(d.sodium_density, 4.0));
        assert!(close(d.cholesterol_density, 1.0));
        assert!(close(d.water_density, 0.475));
        assert!(close(d.sugar_fiber_ratio, 1.5));
    }

    #[test]
    fn test_health_features_follow_trained_column_order() {
        let features = DensityVector::compute(&mixed_profile(), 250.0)
            .unwrap()
            .to_features();
        let expected = [
            ("Calorie_Density", 2.5),
            ("Fat_Density", 0.1),
            ("Sugar_Density", 0.06),
            ("Protein_Density", 0.12),
            ("Fiber_Density", 0.04),
            ("Saturated_Fat_Density", 0.02),
            ("Cholesterol_Density", 1.0),
            ("Water_Density", 0.475),
            ("Sugar_Fiber_Ratio", 1.5),
            ("Sodium_Density", 4.0),
        ];

        let values = features.values();
        assert_eq!(values.len(), HealthFeatures::NAMES.len());
        for (i, (name, value)) in expected.iter().enumerate() {
            assert_eq!(HealthFeatures::NAMES[i], *name);
            assert!(close(values[i], *value), "{} = {}", name, values[i]);
        }

        // serialized keys come out in the same order
        let json = serde_json::to_string(&features).unwrap();
        let positions: Vec<usize> = HealthFeatures::NAMES
            .iter()
            .map(|name| json.find(&format!("\"{}\"", name)).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_sugar_fiber_ratio_zero_without_fiber() {
        let profile = NutrientProfile {
            carbohydrate: 20.0,
            sugar: 15.0,
            water: 10.0,
            ..Default::default()
        };
        let d = DensityVector::compute(&profile, 80.0).unwrap();
        assert_eq!(d.sugar_fiber_ratio, 0.0);
    }

    #[test]
    fn test_zero_mass_has_no_densities() {
        let profile = NutrientProfile {
            sugar: 5.0,
            fiber: 2.0,
            ..Default::default()
        };
        assert!(DensityVector::compute(&profile, 0.0).is_none());
    }

    #[test]
    fn test_feature_values_follow_declared_order() {
        let features = CalorieFeatures {
            fat: 1.0,
            protein: 2.0,
            carbohydrate: 3.0,
            fiber: 4.0,
        };
        assert_eq!(features.values(), vec![1.0, 2.0, 3.0, 4.0]);

        let json = serde_json::to_string(&features).unwrap();
        assert_eq!(json, r#"{"Fat":1.0,"Protein":2.0,"Carbohydrate":3.0,"Fiber":4.0}"#);
        assert_eq!(HealthFeatures::NAMES.len(), 10);
    }

    #[test]
    fn test_confidence_is_probability_of_label() {
        let unhealthy = HealthVerdict::from_healthy_probability(HealthLabel::Unhealthy, Some(0.3));
        assert!((unhealthy.confidence - 0.7).abs() < 1e-12);

        let healthy = HealthVerdict::from_healthy_probability(HealthLabel::Healthy, Some(0.9));
        assert_eq!(healthy.confidence, 0.9);

        let missing = HealthVerdict::from_healthy_probability(HealthLabel::Unhealthy, None);
        assert_eq!(missing.confidence, 0.0);
    }

    #[test]
    fn test_activity_level_parse() {
        assert_eq!(
            ActivityLevel::parse("Moderately Active (Exercise 3-5 days/week)"),
            Some(ActivityLevel::ModeratelyActive)
        );
        assert_eq!(ActivityLevel::parse("very-active"), Some(ActivityLevel::VeryActive));
        assert_eq!(ActivityLevel::parse("Athlete"), Some(ActivityLevel::Athlete));
        assert_eq!(
            ActivityLevel::parse("Athlete/Hypertrophy"),
            Some(ActivityLevel::Athlete)
        );
        assert_eq!(
            ActivityLevel::parse("athlete / hypertrophy"),
            Some(ActivityLevel::Athlete)
        );
        assert_eq!(
            ActivityLevel::parse("Athlete / Muscle Building (Hypertrophy)"),
            Some(ActivityLevel::Athlete)
        );
        assert_eq!(ActivityLevel::parse("lightly_active"), Some(ActivityLevel::LightlyActive));
        assert_eq!(ActivityLevel::parse("Sedentary"), Some(ActivityLevel::Sedentary));
        assert_eq!(ActivityLevel::parse("Couch Potato"), None);
        assert_eq!(ActivityLevel::parse(""), None);
    }

    #[test]
    fn test_bmi_bands() {
        assert_eq!(BmiCategory::from_bmi(18.4), BmiCategory::Underweight);
        assert_eq!(BmiCategory::from_bmi(18.5), BmiCategory::Normal);
        assert_eq!(BmiCategory::from_bmi(25.0), BmiCategory::Overweight);
        assert_eq!(BmiCategory::from_bmi(30.0), BmiCategory::Obese);
    }
}
