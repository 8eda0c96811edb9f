//! Nutrient extraction rules for food detail pages.
//!
//! Each output column is bound to the label of the table row that holds its
//! value. Labels are compared after [`normalize_label`], so spacing and
//! case differences in the page do not matter.

use crate::domain::model::FoodRecord;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NutrientField {
    Fat,
    Carbohydrate,
    Protein,
    Sugars,
    Fiber,
    Sodium,
    #[serde(rename = "Saturated_Fat")]
    SaturatedFat,
    Cholesterol,
    Water,
}

impl NutrientField {
    pub const ALL: [NutrientField; 9] = [
        NutrientField::Fat,
        NutrientField::Carbohydrate,
        NutrientField::Protein,
        NutrientField::Sugars,
        NutrientField::Fiber,
        NutrientField::Sodium,
        NutrientField::SaturatedFat,
        NutrientField::Cholesterol,
        NutrientField::Water,
    ];

    /// Column name in the output dataset.
    pub fn column(&self) -> &'static str {
        match self {
            NutrientField::Fat => "Fat",
            NutrientField::Carbohydrate => "Carbohydrate",
            NutrientField::Protein => "Protein",
            NutrientField::Sugars => "Sugars",
            NutrientField::Fiber => "Fiber",
            NutrientField::Sodium => "Sodium",
            NutrientField::SaturatedFat => "Saturated_Fat",
            NutrientField::Cholesterol => "Cholesterol",
            NutrientField::Water => "Water",
        }
    }

    pub fn from_column(column: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.column().eq_ignore_ascii_case(column))
    }

    pub fn assign(&self, record: &mut FoodRecord, value: Option<f64>) {
        let slot = match self {
            NutrientField::Fat => &mut record.fat,
            NutrientField::Carbohydrate => &mut record.carbohydrate,
            NutrientField::Protein => &mut record.protein,
            NutrientField::Sugars => &mut record.sugars,
            NutrientField::Fiber => &mut record.fiber,
            NutrientField::Sodium => &mut record.sodium,
            NutrientField::SaturatedFat => &mut record.saturated_fat,
            NutrientField::Cholesterol => &mut record.cholesterol,
            NutrientField::Water => &mut record.water,
        };
        *slot = value;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelMatch {
    /// Normalized row label equals the rule label.
    Exact,
    /// Normalized row label contains the rule label.
    Contains,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionRule {
    pub field: NutrientField,
    /// Stored normalized.
    pub label: String,
    pub matching: LabelMatch,
}

impl ExtractionRule {
    pub fn new(field: NutrientField, label: &str, matching: LabelMatch) -> Self {
        Self {
            field,
            label: normalize_label(label),
            matching,
        }
    }

    pub fn matches(&self, row_label: &str) -> bool {
        let row_label = normalize_label(row_label);
        match self.matching {
            LabelMatch::Exact => row_label == self.label,
            LabelMatch::Contains => row_label.contains(&self.label),
        }
    }
}

/// Label override read from configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelOverride {
    pub label: String,
    #[serde(default = "default_match")]
    pub matching: LabelMatch,
}

fn default_match() -> LabelMatch {
    LabelMatch::Exact
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionRules {
    rules: Vec<ExtractionRule>,
}

impl Default for ExtractionRules {
    fn default() -> Self {
        use LabelMatch::{Contains, Exact};
        Self {
            rules: vec![
                ExtractionRule::new(NutrientField::Fat, "Fat", Exact),
                ExtractionRule::new(NutrientField::Carbohydrate, "Carbohydrate", Exact),
                ExtractionRule::new(NutrientField::Protein, "Protein", Exact),
                ExtractionRule::new(NutrientField::Sugars, "Sugars", Exact),
                ExtractionRule::new(NutrientField::Fiber, "Fiber", Exact),
                ExtractionRule::new(NutrientField::Sodium, "Sodium", Exact),
                ExtractionRule::new(NutrientField::SaturatedFat, "Saturated fatty acids", Contains),
                ExtractionRule::new(NutrientField::Cholesterol, "Cholesterol", Exact),
                ExtractionRule::new(NutrientField::Water, "Water", Exact),
            ],
        }
    }
}

impl ExtractionRules {
    /// Default rules with the labels in `overrides` replaced. Keys are
    /// output column names (`"Saturated_Fat"`, `"Fiber"`, ...); unknown keys
    /// are returned as the error value.
    pub fn with_overrides(
        overrides: &HashMap<String, LabelOverride>,
    ) -> std::result::Result<Self, String> {
        let mut rules = Self::default();
        for (column, replacement) in overrides {
            let field = NutrientField::from_column(column).ok_or_else(|| column.clone())?;
            if let Some(rule) = rules.rules.iter_mut().find(|r| r.field == field) {
                *rule = ExtractionRule::new(field, &replacement.label, replacement.matching);
            }
        }
        Ok(rules)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ExtractionRule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Lowercase, NBSP folded to space, runs of whitespace collapsed, trimmed.
pub fn normalize_label(label: &str) -> String {
    label
        .replace('\u{a0}', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn number_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[\d.]+").expect("numeric pattern is valid"))
}

/// First numeric run in a table cell ("1 234 mg" style values are not
/// grouped). `None` when the cell is empty or holds no parseable number.
pub fn clean_value(raw: Option<&str>) -> Option<f64> {
    let text = raw?.replace('\u{a0}', " ");
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    let found = number_pattern().find(text)?;
    found.as_str().parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_value() {
        assert_eq!(clean_value(Some("12.5 g")), Some(12.5));
        assert_eq!(clean_value(Some("\u{a0}420\u{a0}mg")), Some(420.0));
        assert_eq!(clean_value(Some("0 g")), Some(0.0));
        assert_eq!(clean_value(Some("n/a")), None);
        assert_eq!(clean_value(Some("")), None);
        assert_eq!(clean_value(Some(".")), None);
        assert_eq!(clean_value(None), None);
    }

    #[test]
    fn test_normalize_label() {
        assert_eq!(normalize_label("  Saturated\u{a0}fatty   acids "), "saturated fatty acids");
    }

    #[test]
    fn test_exact_rule_does_not_match_longer_labels() {
        let rule = ExtractionRule::new(NutrientField::Fat, "Fat", LabelMatch::Exact);
        assert!(rule.matches("Fat"));
        assert!(rule.matches(" fat "));
        assert!(!rule.matches("Fatty acids, total saturated"));
    }

    #[test]
    fn test_contains_rule() {
        let rules = ExtractionRules::default();
        let sat = rules
            .iter()
            .find(|r| r.field == NutrientField::SaturatedFat)
            .unwrap();
        assert!(sat.matches("Saturated fatty acids"));
        assert!(sat.matches("Fatty acids: Saturated fatty acids, total"));
        assert_eq!(rules.len(), 9);
    }

    #[test]
    fn test_overrides_replace_label() {
        let mut overrides = HashMap::new();
        overrides.insert(
            "Fiber".to_string(),
            LabelOverride {
                label: "Dietary fiber".to_string(),
                matching: LabelMatch::Contains,
            },
        );
        let rules = ExtractionRules::with_overrides(&overrides).unwrap();
        let fiber = rules.iter().find(|r| r.field == NutrientField::Fiber).unwrap();
        assert!(fiber.matches("Total dietary fiber"));

        overrides.insert(
            "Vitamin_C".to_string(),
            LabelOverride {
                label: "Vitamin C".to_string(),
                matching: LabelMatch::Exact,
            },
        );
        assert_eq!(ExtractionRules::with_overrides(&overrides).unwrap_err(), "Vitamin_C");
    }
}
