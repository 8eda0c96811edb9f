use crate::core::calorie::estimate_calories;
use crate::core::health::classify_health;
use crate::domain::model::{HealthVerdict, NutrientProfile, ProteinGoal};
use crate::domain::ports::{CalorieRegressor, HealthScorer};
use crate::scoring::ScoringModels;
use crate::utils::error::Result;
use serde::Serialize;

/// Share of the daily goal from which a food counts as high protein.
pub const HIGH_PROTEIN_SHARE: f64 = 0.20;
/// Share of the daily goal from which a food counts as a good source.
pub const GOOD_SOURCE_SHARE: f64 = 0.10;

/// One submission of the nutrient form.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FoodSubmission {
    pub name: Option<String>,
    pub nutrients: NutrientProfile,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ProteinRating {
    High,
    GoodSource,
    Low,
}

impl ProteinRating {
    pub fn from_share(share: f64) -> Self {
        if share >= HIGH_PROTEIN_SHARE {
            ProteinRating::High
        } else if share >= GOOD_SOURCE_SHARE {
            ProteinRating::GoodSource
        } else {
            ProteinRating::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProteinRating::High => "High Protein!",
            ProteinRating::GoodSource => "Good Source",
            ProteinRating::Low => "Low Protein",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProteinAnalysis {
    pub protein_grams: f64,
    pub daily_goal_grams: f64,
    /// protein / goal, may exceed 1.
    pub goal_share: f64,
    /// `goal_share` capped at 1 for progress display.
    pub progress: f64,
    pub rating: ProteinRating,
}

impl ProteinAnalysis {
    pub fn new(protein_grams: f64, goal: &ProteinGoal) -> Self {
        let goal_share = if goal.daily_grams > 0.0 {
            protein_grams / goal.daily_grams
        } else {
            0.0
        };
        Self {
            protein_grams,
            daily_goal_grams: goal.daily_grams,
            goal_share,
            progress: goal_share.min(1.0),
            rating: ProteinRating::from_share(goal_share),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub food_name: Option<String>,
    pub total_mass: f64,
    pub estimated_calories: f64,
    pub verdict: HealthVerdict,
    pub protein: ProteinAnalysis,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisOutcome {
    /// Nothing with mass was entered.
    NoInput,
    Report(AnalysisReport),
}

/// Runs calorie estimation, then health classification, for one submission.
pub struct FoodAnalyzer<'m, R: ?Sized, C: ?Sized> {
    regressor: &'m R,
    classifier: &'m C,
}

impl<'m> FoodAnalyzer<'m, crate::scoring::LinearRegressor, crate::scoring::LogisticClassifier> {
    pub fn from_models(models: &'m ScoringModels) -> Self {
        Self::new(&models.regressor, &models.classifier)
    }
}

impl<'m, R, C> FoodAnalyzer<'m, R, C>
where
    R: CalorieRegressor + ?Sized,
    C: HealthScorer + ?Sized,
{
    pub fn new(regressor: &'m R, classifier: &'m C) -> Self {
        Self {
            regressor,
            classifier,
        }
    }

    pub fn analyze(&self, submission: &FoodSubmission, goal: &ProteinGoal) -> Result<AnalysisOutcome> {
        let nutrients = &submission.nutrients;
        let label = submission.name.as_deref().unwrap_or("unnamed food");
        tracing::info!("🔍 Analyzing {}", label);

        let estimated_calories = estimate_calories(self.regressor, nutrients)?;
        let Some(verdict) = classify_health(self.classifier, estimated_calories, nutrients)? else {
            tracing::info!("No nutrient values entered for {}", label);
            return Ok(AnalysisOutcome::NoInput);
        };

        tracing::info!(
            "✅ {}: {} ({:.1}% confidence{})",
            label,
            verdict.label.as_str(),
            verdict.confidence * 100.0,
            if verdict.overridden { ", protein override" } else { "" }
        );

        Ok(AnalysisOutcome::Report(AnalysisReport {
            food_name: submission.name.clone(),
            total_mass: nutrients.total_mass(),
            estimated_calories,
            verdict,
            protein: ProteinAnalysis::new(nutrients.protein, goal),
        }))
    }
}
