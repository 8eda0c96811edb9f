use crate::core::ConfigProvider;
use crate::crawler::extract::{ExtractionRules, LabelOverride};
use crate::utils::error::{InsightError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_positive_number, validate_url, Validate,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlConfig {
    pub crawler: CrawlerSection,
    pub output: OutputSection,
    pub extraction: Option<ExtractionSection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlerSection {
    pub name: String,
    pub start_urls: Vec<String>,
    #[serde(default)]
    pub allowed_domains: Vec<String>,
    pub user_agent: Option<String>,
    pub download_delay_ms: Option<u64>,
    pub concurrent_requests: Option<usize>,
    pub max_pages_per_category: Option<usize>,
    pub request_timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputSection {
    pub output_path: String,
    pub formats: Vec<String>,
    /// Base file name without extension; `{timestamp}` is expanded.
    pub filename: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ExtractionSection {
    /// Keyed by output column, e.g. `Saturated_Fat`.
    #[serde(default)]
    pub labels: HashMap<String, LabelOverride>,
}

impl CrawlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(InsightError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| InsightError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unset variables are
    /// left as written.
    fn substitute_env_vars(content: &str) -> String {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").unwrap();

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .to_string()
    }

    pub fn extraction_rules(&self) -> Result<ExtractionRules> {
        let Some(section) = &self.extraction else {
            return Ok(ExtractionRules::default());
        };
        ExtractionRules::with_overrides(&section.labels).map_err(|column| {
            InsightError::InvalidConfigValueError {
                field: "extraction.labels".to_string(),
                value: column,
                reason: "Unknown output column".to_string(),
            }
        })
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_non_empty_string("crawler.name", &self.crawler.name)?;

        if self.crawler.start_urls.is_empty() {
            return Err(InsightError::MissingConfigError {
                field: "crawler.start_urls".to_string(),
            });
        }
        for url in &self.crawler.start_urls {
            validate_url("crawler.start_urls", url)?;
        }

        for domain in &self.crawler.allowed_domains {
            validate_non_empty_string("crawler.allowed_domains", domain)?;
        }

        if let Some(concurrent) = self.crawler.concurrent_requests {
            validate_positive_number("crawler.concurrent_requests", concurrent, 1)?;
        }
        if let Some(max_pages) = self.crawler.max_pages_per_category {
            validate_positive_number("crawler.max_pages_per_category", max_pages, 1)?;
        }

        validate_path("output.output_path", &self.output.output_path)?;
        if let Some(filename) = &self.output.filename {
            validate_non_empty_string("output.filename", filename)?;
            validate_path("output.filename", filename)?;
        }

        if self.output.formats.is_empty() {
            return Err(InsightError::MissingConfigError {
                field: "output.formats".to_string(),
            });
        }
        let valid_formats = ["csv", "json"];
        for format in &self.output.formats {
            if !valid_formats.contains(&format.as_str()) {
                return Err(InsightError::InvalidConfigValueError {
                    field: "output.formats".to_string(),
                    value: format.clone(),
                    reason: format!(
                        "Unsupported format. Valid formats: {}",
                        valid_formats.join(", ")
                    ),
                });
            }
        }

        self.extraction_rules()?;

        Ok(())
    }
}

impl ConfigProvider for CrawlConfig {
    fn start_urls(&self) -> &[String] {
        &self.crawler.start_urls
    }

    fn allowed_domains(&self) -> &[String] {
        &self.crawler.allowed_domains
    }

    fn user_agent(&self) -> &str {
        self.crawler.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT)
    }

    fn download_delay(&self) -> Duration {
        Duration::from_millis(self.crawler.download_delay_ms.unwrap_or(1000))
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.crawler.request_timeout_seconds.unwrap_or(30))
    }

    fn concurrent_requests(&self) -> usize {
        self.crawler.concurrent_requests.unwrap_or(16)
    }

    fn max_pages_per_category(&self) -> Option<usize> {
        self.crawler.max_pages_per_category
    }

    fn output_path(&self) -> &str {
        &self.output.output_path
    }

    fn output_formats(&self) -> &[String] {
        &self.output.formats
    }

    fn output_filename(&self) -> &str {
        self.output.filename.as_deref().unwrap_or("foods")
    }
}

impl Validate for CrawlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::extract::NutrientField;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const BASIC: &str = r#"
[crawler]
name = "nutritionvalue"
start_urls = ["https://www.nutritionvalue.org/foods_in_Fast_Foods_page_1.html"]
allowed_domains = ["www.nutritionvalue.org"]

[output]
output_path = "./output"
formats = ["csv", "json"]
"#;

    #[test]
    fn test_parse_basic_config_with_defaults() {
        let config = CrawlConfig::from_toml_str(BASIC).unwrap();

        assert_eq!(config.crawler.name, "nutritionvalue");
        assert_eq!(config.start_urls().len(), 1);
        assert_eq!(config.concurrent_requests(), 16);
        assert_eq!(config.download_delay(), Duration::from_secs(1));
        assert_eq!(config.user_agent(), DEFAULT_USER_AGENT);
        assert_eq!(config.output_filename(), "foods");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("FOOD_INSIGHT_TEST_OUTPUT", "/tmp/food-data");

        let toml_content = r#"
[crawler]
name = "env"
start_urls = ["https://www.nutritionvalue.org/a.html"]

[output]
output_path = "${FOOD_INSIGHT_TEST_OUTPUT}"
formats = ["csv"]
"#;

        let config = CrawlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.output.output_path, "/tmp/food-data");

        std::env::remove_var("FOOD_INSIGHT_TEST_OUTPUT");
    }

    #[test]
    fn test_invalid_start_url_fails_validation() {
        let config = CrawlConfig::from_toml_str(&BASIC.replace("https://www.", "ftp://www.")).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_format_fails_validation() {
        let config = CrawlConfig::from_toml_str(&BASIC.replace("\"json\"", "\"parquet\"")).unwrap();
        assert!(matches!(
            config.validate(),
            Err(InsightError::InvalidConfigValueError { .. })
        ));
    }

    #[test]
    fn test_label_overrides() {
        let toml_content = format!(
            "{}\n{}",
            BASIC,
            r#"
[extraction.labels.Saturated_Fat]
label = "Fatty acids, total saturated"

[extraction.labels.Fiber]
label = "fiber"
matching = "contains"
"#
        );
        let config = CrawlConfig::from_toml_str(&toml_content).unwrap();
        let rules = config.extraction_rules().unwrap();

        let sat = rules
            .iter()
            .find(|r| r.field == NutrientField::SaturatedFat)
            .unwrap();
        assert!(sat.matches("Fatty acids, total saturated"));
        assert!(!sat.matches("Saturated fatty acids"));

        let fiber = rules.iter().find(|r| r.field == NutrientField::Fiber).unwrap();
        assert!(fiber.matches("Fiber, total dietary"));
    }

    #[test]
    fn test_unknown_label_column_fails_validation() {
        let toml_content = format!("{}\n[extraction.labels.Vitamin_C]\nlabel = \"Vitamin C\"\n", BASIC);
        let config = CrawlConfig::from_toml_str(&toml_content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(BASIC.as_bytes()).unwrap();

        let config = CrawlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.crawler.name, "nutritionvalue");
    }
}
