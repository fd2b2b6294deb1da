use dentalsearch::config::ErrorLogConfig;
use dentalsearch::prelude::*;
use serde_json::json;
use std::fs;

fn log_config(dir: &tempfile::TempDir, max_entries: usize) -> ErrorLogConfig {
  ErrorLogConfig {
    path: dir.path().join("errors.json"),
    max_entries,
    environment: "test".to_string(),
  }
}

#[test]
fn test_error_log_survives_close_and_open() {
  let dir = tempfile::tempdir().unwrap();
  let config = log_config(&dir, 100);

  let mut log = ErrorLog::open(&config).unwrap();
  assert!(log.is_empty());
  log.log_error("search failed", json!({"page": "Search"}));
  log.log_warning("slow response", json!({"ms": 1200}));
  log.close().unwrap();

  let reopened = ErrorLog::open(&config).unwrap();
  assert_eq!(reopened.len(), 2);
  assert_eq!(reopened.entries()[0].message, "slow response");
  assert_eq!(reopened.entries()[0].level, Level::Warning);
  assert_eq!(reopened.entries()[1].context["page"], "Search");
  assert_eq!(reopened.entries()[1].environment, "test");
}

#[test]
fn test_reopened_log_respects_cap() {
  let dir = tempfile::tempdir().unwrap();

  let mut log = ErrorLog::open(&log_config(&dir, 10)).unwrap();
  for i in 0..10 {
    log.log_error(format!("error {i}"), json!(null));
  }
  log.close().unwrap();

  let mut log = ErrorLog::open(&log_config(&dir, 4)).unwrap();
  assert_eq!(log.len(), 4);
  assert_eq!(log.entries()[0].message, "error 9");
  log.log_error("newest", json!(null));
  assert_eq!(log.len(), 4);
  assert_eq!(log.entries()[3].message, "error 7");
}

#[test]
fn test_clear_removes_file() {
  let dir = tempfile::tempdir().unwrap();
  let config = log_config(&dir, 100);

  let mut log = ErrorLog::open(&config).unwrap();
  log.log_error("boom", json!(null));
  log.flush().unwrap();
  assert!(config.path.exists());

  log.clear().unwrap();
  assert!(!config.path.exists());
  log.close().unwrap();
  assert!(!config.path.exists());
  assert!(ErrorLog::open(&config).unwrap().is_empty());
}

#[test]
fn test_export_and_corrupt_file() {
  let dir = tempfile::tempdir().unwrap();
  let config = log_config(&dir, 100);
  fs::write(&config.path, "not json").unwrap();

  let mut log = ErrorLog::open(&config).unwrap();
  assert!(log.is_empty());
  log.log_error("after corruption", json!({"source": "api"}));

  let export = dir.path().join("export.json");
  log.export(&export).unwrap();
  let exported: Vec<LogEntry> = serde_json::from_str(&fs::read_to_string(&export).unwrap()).unwrap();
  assert_eq!(exported.len(), 1);
  assert_eq!(exported[0].message, "after corruption");
}

#[test]
fn test_config_file_round_trip() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("dentalsearch.toml");
  fs::write(
    &path,
    r#"
[search]
max_results = 50
default_page_size = 25

[api]
base_url = "https://clinics.example.org"
api_key = "from-file"

[error_log]
max_entries = 20
"#,
  )
  .unwrap();

  let config = Config::load(&path).unwrap();
  assert_eq!(config.search.max_results, 50);
  assert_eq!(config.search.page_size_options, vec![25, 50, 100]);
  assert_eq!(config.api.api_key, "from-file");
  assert_eq!(config.api.limit, 50);
  assert_eq!(config.error_log.max_entries, 20);
  assert_eq!(config.error_log.environment, "production");

  let pager = config.search.pager().unwrap();
  assert_eq!(pager.page_size(), 25);

  let matcher = ClinicMatcher::from_config(&config.search);
  let clinics = EmbeddedSource::new().load().unwrap();
  let page = matcher.search(&clinics, &SearchCriteria::builder().page_size(0).build());
  assert_eq!(page.page_size, 25);
}

#[test]
fn test_missing_config_file_is_an_error() {
  let dir = tempfile::tempdir().unwrap();
  let result = Config::load(dir.path().join("absent.toml"));
  assert!(matches!(result, Err(Error::Io(_))));
  assert!(Config::load_or_default(None).is_ok());
}
