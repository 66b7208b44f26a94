use std::fs;
use std::path::Path;

use home_score::config::ScoringConfig;
use home_score::error::AppError;
use home_score::scoring::{FieldMapping, RuleCatalog};
use serde_json::Value;
use tracing::info;

/// Rule catalog from the explicit path, else the configured path, else the built-in defaults.
pub(crate) fn load_catalog(
    rules: Option<&Path>,
    config: &ScoringConfig,
) -> Result<RuleCatalog, AppError> {
    match rules.or(config.rules_path.as_deref()) {
        Some(path) => {
            let raw = fs::read_to_string(path)?;
            let catalog = RuleCatalog::from_json(&raw)?;
            info!(path = %path.display(), rules = catalog.len(), "rule catalog loaded");
            Ok(catalog)
        }
        None => Ok(RuleCatalog::home_search_defaults()),
    }
}

pub(crate) fn load_mapping(mapping: Option<&Path>) -> Result<FieldMapping, AppError> {
    match mapping {
        Some(path) => {
            let raw = fs::read_to_string(path)?;
            Ok(serde_json::from_str(&raw)?)
        }
        None => Ok(FieldMapping::home_search_defaults()),
    }
}

/// Records are a JSON array of objects, or a single object.
pub(crate) fn load_records(path: &Path) -> Result<Vec<Value>, AppError> {
    let raw = fs::read_to_string(path)?;
    parse_records(&raw)
}

pub(crate) fn parse_records(raw: &str) -> Result<Vec<Value>, AppError> {
    match serde_json::from_str(raw)? {
        Value::Array(records) => Ok(records),
        record => Ok(vec![record]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn scratch_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("home-score-{}-{name}", std::process::id()));
        fs::write(&path, contents).expect("scratch file written");
        path
    }

    fn config(rules_path: Option<PathBuf>) -> ScoringConfig {
        ScoringConfig {
            rules_path,
            normalized_scale: 10.0,
        }
    }

    #[test]
    fn falls_back_to_default_catalog() {
        let catalog = load_catalog(None, &config(None)).expect("defaults load");
        assert_eq!(catalog, RuleCatalog::home_search_defaults());
    }

    #[test]
    fn explicit_rules_override_configured_path() {
        let explicit = scratch_file(
            "explicit-rules.json",
            r#"[{
                "key": "balcony",
                "category": "Outdoor",
                "type": "threshold",
                "default_threshold": 1
            }]"#,
        );
        let configured = config(Some(PathBuf::from("/nonexistent/rules.json")));

        let catalog = load_catalog(Some(explicit.as_path()), &configured).expect("explicit loads");

        assert_eq!(catalog.len(), 1);
        assert!(catalog.rule("balcony").is_some());
        fs::remove_file(explicit).ok();
    }

    #[test]
    fn missing_rules_file_is_an_io_error() {
        let configured = config(Some(PathBuf::from("/nonexistent/rules.json")));
        let error = load_catalog(None, &configured).expect_err("missing file");
        assert!(matches!(error, AppError::Io(_)));
    }

    #[test]
    fn single_record_is_accepted() {
        let records = parse_records(r#"{ "id": "solo" }"#).expect("parses");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["id"], "solo");
    }

    #[test]
    fn malformed_records_are_json_errors() {
        let error = parse_records("[{").expect_err("malformed");
        assert!(matches!(error, AppError::Json(_)));
    }
}
