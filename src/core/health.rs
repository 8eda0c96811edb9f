use crate::domain::model::{DensityVector, HealthLabel, HealthVerdict, NutrientProfile};
use crate::domain::ports::HealthScorer;
use crate::utils::error::Result;

/// The classifier misses high-protein, low-sugar foods. Above this protein
/// density and below the sugar density the label is corrected.
pub const OVERRIDE_MIN_PROTEIN_DENSITY: f64 = 0.15;
pub const OVERRIDE_MAX_SUGAR_DENSITY: f64 = 0.02;
pub const OVERRIDE_CONFIDENCE: f64 = 0.85;

/// Classifies one food item.
///
/// Returns `Ok(None)` when the profile has zero total mass: there is nothing
/// to normalize by, which callers should report as missing input.
pub fn classify_health<C: HealthScorer + ?Sized>(
    classifier: &C,
    estimated_calories: f64,
    profile: &NutrientProfile,
) -> Result<Option<HealthVerdict>> {
    let Some(densities) = DensityVector::compute(profile, estimated_calories) else {
        tracing::debug!("Total mass is zero, skipping classification");
        return Ok(None);
    };

    let features = densities.to_features();
    let label = classifier.predict(&features)?;
    let prob_healthy = classifier.predict_proba(&features)?.get(1).copied();
    if prob_healthy.is_none() {
        tracing::warn!("Classifier returned no probability for the healthy class");
    }

    Ok(Some(apply_protein_override(label, prob_healthy, &densities)))
}

/// Turns the raw classifier output into the reported verdict, flipping
/// unhealthy high-protein/low-sugar items to healthy at a fixed confidence.
pub fn apply_protein_override(
    label: HealthLabel,
    prob_healthy: Option<f64>,
    densities: &DensityVector,
) -> HealthVerdict {
    let blind_spot = label == HealthLabel::Unhealthy
        && densities.protein_density > OVERRIDE_MIN_PROTEIN_DENSITY
        && densities.sugar_density < OVERRIDE_MAX_SUGAR_DENSITY;

    if blind_spot {
        tracing::debug!(
            "Overriding unhealthy label (protein density {:.3}, sugar density {:.3})",
            densities.protein_density,
            densities.sugar_density
        );
        return HealthVerdict {
            label: HealthLabel::Healthy,
            confidence: OVERRIDE_CONFIDENCE,
            overridden: true,
        };
    }

    HealthVerdict::from_healthy_probability(label, prob_healthy)
}
