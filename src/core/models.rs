use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Backend company id. The backend hands out UUID strings, older builds used integers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CompanyId {
    Number(i64),
    Text(String),
}

impl fmt::Display for CompanyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompanyId::Number(id) => write!(f, "{id}"),
            CompanyId::Text(id) => f.write_str(id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    pub id: CompanyId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub platform: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub career_url: Option<String>,
}

impl Company {
    /// Companies are identified by their `(slug, platform)` pair.
    pub fn matches(&self, slug: &str, platform: &str) -> bool {
        self.slug == slug && self.platform == platform
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCompany {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub platform: String,
    #[serde(default)]
    pub slug: String,
}

/// The part of a `/jobcart/scan` response the agent looks at. `new_jobs` is
/// kept as the raw number, so any positive value counts.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScanSummary {
    pub new_jobs: f64,
}

impl ScanSummary {
    pub fn from_value(data: &Value) -> Self {
        let new_jobs = data.get("new_jobs").and_then(Value::as_f64).unwrap_or(0.0);
        Self { new_jobs }
    }
}

/// Number of jobs in a `/jobs?new=true` body. Anything that is not a list counts as zero.
pub fn new_job_count(body: &Value) -> usize {
    body.as_array().map_or(0, Vec::len)
}

pub fn badge_text(count: usize) -> String {
    if count > 0 {
        count.to_string()
    } else {
        String::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_company_id_accepts_strings_and_numbers() {
        let text: Company = serde_json::from_value(json!({
            "id": "3f2a", "name": "Acme", "platform": "lever", "slug": "acme"
        }))
        .unwrap();
        assert_eq!(text.id, CompanyId::Text("3f2a".to_string()));
        assert_eq!(text.id.to_string(), "3f2a");

        let number: Company = serde_json::from_value(json!({
            "id": 42, "name": "Acme", "platform": "lever", "slug": "acme", "in_cart": true
        }))
        .unwrap();
        assert_eq!(number.id.to_string(), "42");
    }

    #[test]
    fn test_company_matches_requires_both_fields() {
        let company: Company = serde_json::from_value(json!({
            "id": 1, "name": "Acme", "platform": "lever", "slug": "acme"
        }))
        .unwrap();
        assert!(company.matches("acme", "lever"));
        assert!(!company.matches("acme", "greenhouse"));
        assert!(!company.matches("acme-inc", "lever"));
    }

    #[test]
    fn test_scan_summary() {
        assert_eq!(ScanSummary::from_value(&json!({"new_jobs": 3})).new_jobs, 3.0);
        assert_eq!(ScanSummary::from_value(&json!({"new_jobs": 0.5})).new_jobs, 0.5);
        assert_eq!(ScanSummary::from_value(&json!({"scanned": 10})).new_jobs, 0.0);
        assert_eq!(ScanSummary::from_value(&json!([1, 2])).new_jobs, 0.0);
        assert_eq!(ScanSummary::from_value(&json!({"new_jobs": "3"})).new_jobs, 0.0);
    }

    #[test]
    fn test_badge_text_from_body() {
        assert_eq!(badge_text(new_job_count(&json!([{"id": 1}, {"id": 2}]))), "2");
        assert_eq!(badge_text(new_job_count(&json!([]))), "");
        assert_eq!(badge_text(new_job_count(&json!({"error": "boom"}))), "");
        assert_eq!(badge_text(new_job_count(&Value::Null)), "");
    }
}
