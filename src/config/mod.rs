pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use analyzer::{AnalyzeArgs, AnalyzerCli, Command, ModelArgs, ProfileArgs};

#[cfg(feature = "cli")]
mod analyzer {
    use crate::core::analysis::FoodSubmission;
    use crate::domain::model::{NutrientProfile, UserProfile};
    use crate::scoring::ModelPaths;
    use crate::utils::error::Result;
    use crate::utils::validation::{validate_non_negative, validate_range, Validate};
    use clap::{Args, Parser, Subcommand};
    use std::path::PathBuf;

    #[derive(Debug, Clone, Parser)]
    #[command(name = "food-insight")]
    #[command(about = "Check whether a food is actually healthy, and how it fits your protein goal")]
    pub struct AnalyzerCli {
        #[arg(long, global = true, help = "Enable verbose output")]
        pub verbose: bool,

        #[arg(long, global = true, help = "Emit logs as JSON lines")]
        pub json_logs: bool,

        #[command(subcommand)]
        pub command: Command,
    }

    #[derive(Debug, Clone, Subcommand)]
    pub enum Command {
        /// Analyze one food item against the scoring models
        Analyze(AnalyzeArgs),
        /// Show the daily protein goal for a body profile
        Goal(ProfileArgs),
    }

    #[derive(Debug, Clone, Args)]
    pub struct ProfileArgs {
        #[arg(long = "weight", default_value_t = 70.0, help = "Body weight in kg (30-200)")]
        pub weight_kg: f64,

        #[arg(long = "height", default_value_t = 175.0, help = "Height in cm (100-250)")]
        pub height_cm: f64,

        #[arg(
            long,
            default_value = "Moderately Active",
            help = "Sedentary, Lightly Active, Moderately Active, Very Active or Athlete/Hypertrophy"
        )]
        pub activity: String,
    }

    impl ProfileArgs {
        pub fn user_profile(&self) -> UserProfile {
            UserProfile::new(self.weight_kg, self.height_cm, &self.activity)
        }
    }

    impl Validate for ProfileArgs {
        fn validate(&self) -> Result<()> {
            validate_range("weight", self.weight_kg, 30.0, 200.0)?;
            validate_range("height", self.height_cm, 100.0, 250.0)?;
            Ok(())
        }
    }

    #[derive(Debug, Clone, Args)]
    pub struct ModelArgs {
        #[arg(long, default_value = "models", help = "Directory holding both model artifacts")]
        pub models_dir: PathBuf,

        #[arg(long, help = "Calorie regressor artifact, overrides --models-dir")]
        pub regressor: Option<PathBuf>,

        #[arg(long, help = "Health classifier artifact, overrides --models-dir")]
        pub classifier: Option<PathBuf>,
    }

    impl ModelArgs {
        pub fn paths(&self) -> ModelPaths {
            let defaults = ModelPaths::from_dir(&self.models_dir);
            ModelPaths {
                regressor: self.regressor.clone().unwrap_or(defaults.regressor),
                classifier: self.classifier.clone().unwrap_or(defaults.classifier),
            }
        }
    }

    #[derive(Debug, Clone, Args)]
    pub struct AnalyzeArgs {
        #[arg(long, help = "Food name, e.g. \"Greek Yogurt\"")]
        pub name: Option<String>,

        #[arg(long, default_value_t = 0.0, help = "Total fat (g)")]
        pub fat: f64,

        #[arg(long, default_value_t = 0.0, help = "Carbohydrates (g)")]
        pub carbs: f64,

        #[arg(long, default_value_t = 0.0, help = "Protein (g)")]
        pub protein: f64,

        #[arg(long, default_value_t = 0.0, help = "Fiber (g)")]
        pub fiber: f64,

        #[arg(long, default_value_t = 0.0, help = "Sugar (g)")]
        pub sugar: f64,

        #[arg(long, default_value_t = 0.0, help = "Saturated fat (g)")]
        pub sat_fat: f64,

        #[arg(long, default_value_t = 0.0, help = "Sodium (mg)")]
        pub sodium: f64,

        #[arg(long, default_value_t = 0.0, help = "Cholesterol (mg)")]
        pub cholesterol: f64,

        #[arg(long, default_value_t = 0.0, help = "Water content (g)")]
        pub water: f64,

        #[arg(long, help = "Print the report as JSON")]
        pub json: bool,

        #[command(flatten)]
        pub profile: ProfileArgs,

        #[command(flatten)]
        pub models: ModelArgs,
    }

    impl AnalyzeArgs {
        pub fn submission(&self) -> FoodSubmission {
            FoodSubmission {
                name: self
                    .name
                    .as_deref()
                    .map(str::trim)
                    .filter(|n| !n.is_empty())
                    .map(str::to_string),
                nutrients: NutrientProfile {
                    fat: self.fat,
                    carbohydrate: self.carbs,
                    protein: self.protein,
                    fiber: self.fiber,
                    sugar: self.sugar,
                    saturated_fat: self.sat_fat,
                    sodium_mg: self.sodium,
                    cholesterol_mg: self.cholesterol,
                    water: self.water,
                },
            }
        }
    }

    impl Validate for AnalyzeArgs {
        fn validate(&self) -> Result<()> {
            for (field, value) in [
                ("fat", self.fat),
                ("carbs", self.carbs),
                ("protein", self.protein),
                ("fiber", self.fiber),
                ("sugar", self.sugar),
                ("sat-fat", self.sat_fat),
                ("sodium", self.sodium),
                ("cholesterol", self.cholesterol),
                ("water", self.water),
            ] {
                validate_non_negative(field, value)?;
            }
            self.profile.validate()
        }
    }

}
