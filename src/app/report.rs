use crate::core::analysis::{AnalysisOutcome, AnalysisReport};
use crate::domain::model::{BmiCategory, ProteinGoal};
use serde_json::json;
use std::fmt::Write;

pub const NO_INPUT_NOTICE: &str = "Please enter nutrient values to analyze.";
pub const DEFAULT_FOOD_NAME: &str = "Food Item";
pub const LEAN_MASS_NOTE: &str = "Since BMI is high, the protein goal is based on your lean body mass, not total weight.";

const PROGRESS_WIDTH: usize = 20;

/// Protein goal panel: goal rounded to whole grams plus the BMI caption.
pub fn render_goal(goal: &ProteinGoal) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Daily Protein Goal: {:.0} g", goal.daily_grams);
    let _ = writeln!(out, "BMI: {:.1} ({})", goal.bmi, goal.category.as_str());
    if goal.category == BmiCategory::Obese {
        let _ = writeln!(out, "ℹ️ {}", LEAN_MASS_NOTE);
    }
    out
}

pub fn render_outcome(outcome: &AnalysisOutcome) -> String {
    match outcome {
        AnalysisOutcome::NoInput => format!("⚠️ {}\n", NO_INPUT_NOTICE),
        AnalysisOutcome::Report(report) => render_report(report),
    }
}

pub fn render_report(report: &AnalysisReport) -> String {
    let mut out = String::new();
    let verdict = &report.verdict;
    let marker = if verdict.is_healthy() { "✅" } else { "❌" };

    let name = report.food_name.as_deref().unwrap_or(DEFAULT_FOOD_NAME);
    let _ = writeln!(out, "Results for: {}", name);
    let _ = writeln!(out, "Estimated Calories: {:.0} kcal", report.estimated_calories);
    let _ = writeln!(out, "Total Mass: {:.1} g", report.total_mass);
    let _ = writeln!(out, "AI Verdict: {} {}", marker, verdict.label.as_str());
    let _ = writeln!(out, "Confidence: {:.1}%", verdict.confidence * 100.0);
    if verdict.overridden {
        let _ = writeln!(out, "(High protein, low sugar: model verdict corrected)");
    }

    let protein = &report.protein;
    let filled = (protein.progress * PROGRESS_WIDTH as f64).round() as usize;
    let _ = writeln!(out);
    let _ = writeln!(out, "Protein Analysis");
    let _ = writeln!(out, "This food provides {:.1}g of protein.", protein.protein_grams);
    let _ = writeln!(
        out,
        "[{}{}]",
        "#".repeat(filled),
        "-".repeat(PROGRESS_WIDTH - filled)
    );
    let _ = writeln!(
        out,
        "That's {:.1}% of your daily goal ({:.0}g). {}",
        protein.goal_share * 100.0,
        protein.daily_goal_grams,
        protein.rating.as_str()
    );
    out
}

/// Machine-readable form of a run: the goal always, plus either the report
/// or the no-input notice.
pub fn render_json(outcome: &AnalysisOutcome, goal: &ProteinGoal) -> serde_json::Result<String> {
    let value = match outcome {
        AnalysisOutcome::NoInput => json!({ "goal": goal, "notice": NO_INPUT_NOTICE }),
        AnalysisOutcome::Report(report) => json!({ "goal": goal, "report": report }),
    };
    serde_json::to_string_pretty(&value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::analysis::ProteinAnalysis;
    use crate::core::goal::calculate_protein_goal;
    use crate::domain::model::{HealthLabel, HealthVerdict, UserProfile};

    fn report(verdict: HealthVerdict, protein: f64) -> AnalysisReport {
        let goal = calculate_protein_goal(&UserProfile::new(70.0, 175.0, "Moderately Active"));
        AnalysisReport {
            food_name: Some("Greek Yogurt".to_string()),
            total_mass: 100.0,
            estimated_calories: 59.4,
            verdict,
            protein: ProteinAnalysis::new(protein, &goal),
        }
    }

    #[test]
    fn test_render_unhealthy_confidence() {
        let verdict = HealthVerdict::from_healthy_probability(HealthLabel::Unhealthy, Some(0.3));
        let text = render_report(&report(verdict, 10.5));

        assert!(text.contains("Results for: Greek Yogurt"));
        assert!(text.contains("AI Verdict: ❌ UNHEALTHY"));
        assert!(text.contains("Confidence: 70.0%"));
        assert!(text.contains("Estimated Calories: 59 kcal"));
        assert!(text.contains("That's 10.0% of your daily goal (105g). Good Source"));
    }

    #[test]
    fn test_render_progress_bar_is_capped() {
        let verdict = HealthVerdict::from_healthy_probability(HealthLabel::Healthy, Some(0.9));
        let text = render_report(&report(verdict, 300.0));
        assert!(text.contains(&format!("[{}]", "#".repeat(PROGRESS_WIDTH))));
        assert!(text.contains("High Protein!"));
    }

    #[test]
    fn test_render_goal_obese_note() {
        let goal = calculate_protein_goal(&UserProfile::new(110.0, 170.0, "Sedentary"));
        let text = render_goal(&goal);
        assert!(text.contains("BMI: 38.1 (Obese - Weight Adjusted)"));
        assert!(text.contains(LEAN_MASS_NOTE));

        let normal = calculate_protein_goal(&UserProfile::new(70.0, 175.0, "Moderately Active"));
        let text = render_goal(&normal);
        assert!(text.contains("Daily Protein Goal: 105 g"));
        assert!(!text.contains(LEAN_MASS_NOTE));
    }

    #[test]
    fn test_render_no_input() {
        assert!(render_outcome(&AnalysisOutcome::NoInput).contains("Please enter nutrient values"));
    }

    #[test]
    fn test_unnamed_food_uses_default_header() {
        let verdict = HealthVerdict::from_healthy_probability(HealthLabel::Healthy, Some(0.8));
        let mut unnamed = report(verdict, 12.0);
        unnamed.food_name = None;
        assert!(render_report(&unnamed).contains("Results for: Food Item"));
    }

    #[test]
    fn test_json_no_input_keeps_notice_and_goal() {
        let goal = calculate_protein_goal(&UserProfile::new(70.0, 175.0, "Moderately Active"));
        let json = render_json(&AnalysisOutcome::NoInput, &goal).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["notice"], NO_INPUT_NOTICE);
        assert_eq!(value["goal"]["daily_grams"], 105.0);
        assert!(value.get("report").is_none());
    }

    #[test]
    fn test_json_report_includes_goal() {
        let goal = calculate_protein_goal(&UserProfile::new(70.0, 175.0, "Moderately Active"));
        let verdict = HealthVerdict::from_healthy_probability(HealthLabel::Unhealthy, Some(0.3));
        let outcome = AnalysisOutcome::Report(report(verdict, 10.5));
        let value: serde_json::Value =
            serde_json::from_str(&render_json(&outcome, &goal).unwrap()).unwrap();

        assert_eq!(value["goal"]["category"], "Normal");
        assert_eq!(value["report"]["food_name"], "Greek Yogurt");
        assert!(value.get("notice").is_none());
    }
}
