use crate::domain::model::{CalorieFeatures, NutrientProfile};
use crate::domain::ports::CalorieRegressor;
use crate::utils::error::Result;

/// Estimated kcal for the macro-nutrients of `profile`, never negative.
pub fn estimate_calories<R: CalorieRegressor + ?Sized>(
    regressor: &R,
    profile: &NutrientProfile,
) -> Result<f64> {
    let features = CalorieFeatures::from_profile(profile);
    let prediction = regressor.predict(&features)?;
    tracing::debug!("Calorie regressor predicted {:.2} kcal for {:?}", prediction, features);

    // 空輸入時回歸模型可能給出負值
    Ok(prediction.max(0.0))
}
