use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::GenerateError;

// Workflow identity
pub const WORKFLOW_NAME: &str = "Sui Smart Contract CI/CD";
pub const TRIGGER_BRANCHES: [&str; 2] = ["main", "develop"];

// Output location, relative to the project root
pub const WORKFLOW_DIR: &str = ".github/workflows";
pub const WORKFLOW_FILE: &str = "sui-ci.yml";

// Runner and marketplace actions
pub const RUNNER: &str = "ubuntu-latest";
pub const CHECKOUT_ACTION: &str = "actions/checkout@v4";
pub const UPLOAD_ARTIFACT_ACTION: &str = "actions/upload-artifact@v4";
pub const WORKSPACE_DIR: &str = "${{ github.workspace }}";

pub const DEPLOY_NETWORK: &str = "devnet";
pub const DEPLOY_GUARD: &str = "github.ref == 'refs/heads/main' && github.event_name == 'push'";
/// Secrets the deploy job reads: client config, keystore, aliases.
pub const DEPLOY_SECRETS: [&str; 3] = ["SUI_CONFIG", "SUI_KEYSTORE", "SUI_ALIASES"];

pub const SECURITY_REPORT_ARTIFACT: &str = "security-report";
pub const SECURITY_REPORT_PATH: &str = "security-report.md";

/// Run configuration. CLI values first, then every key of the optional JSON
/// file on top of them.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub project_root: PathBuf,
    pub enable_deployment: bool,
    /// Keys this tool does not consume, kept in file order.
    pub extra: Map<String, Value>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            project_root: PathBuf::from("."),
            enable_deployment: false,
            extra: Map::new(),
        }
    }
}

impl Config {
    /// Builds the configuration from CLI values, letting `config_file` override them.
    pub fn load(
        project_root: impl Into<PathBuf>,
        enable_deployment: bool,
        config_file: Option<&Path>,
    ) -> Result<Self, GenerateError> {
        let mut config = Self {
            project_root: project_root.into(),
            enable_deployment,
            extra: Map::new(),
        };

        if let Some(path) = config_file {
            let mut overrides = read_overrides(path)?;
            tracing::debug!("merging {} key(s) from {}", overrides.len(), path.display());

            if let Some(root) = overrides.shift_remove("project_root") {
                config.project_root =
                    serde_json::from_value(root).map_err(|e| GenerateError::config_read(path, e))?;
            }
            if let Some(flag) = overrides.shift_remove("enable_deployment") {
                config.enable_deployment =
                    serde_json::from_value(flag).map_err(|e| GenerateError::config_read(path, e))?;
            }
            config.extra = overrides;
        }

        Ok(config)
    }
}

fn read_overrides(path: &Path) -> Result<Map<String, Value>, GenerateError> {
    let txt = fs::read_to_string(path).map_err(|e| GenerateError::config_read(path, e))?;
    match serde_json::from_str::<Value>(&txt).map_err(|e| GenerateError::config_read(path, e))? {
        Value::Object(map) => Ok(map),
        other => Err(GenerateError::config_read(
            path,
            format!("expected a JSON object, found {}", json_kind(&other)),
        )),
    }
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_json(dir: &TempDir, body: &str) -> PathBuf {
        let path = dir.path().join("ci.json");
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn test_defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.project_root, PathBuf::from("."));
        assert!(!cfg.enable_deployment);
        assert!(cfg.extra.is_empty());

        let loaded = Config::load(".", false, None).unwrap();
        assert_eq!(loaded, cfg);
    }

    #[test]
    fn test_cli_values_without_file() {
        let cfg = Config::load("/tmp/demo", true, None).unwrap();
        assert_eq!(cfg.project_root, PathBuf::from("/tmp/demo"));
        assert!(cfg.enable_deployment);
    }

    #[test]
    fn test_file_overrides_cli_flag() {
        let dir = TempDir::new().unwrap();
        let path = write_json(&dir, r#"{"enable_deployment": true}"#);

        let cfg = Config::load(".", false, Some(&path)).unwrap();
        assert!(cfg.enable_deployment);

        let cfg = Config::load(".", true, Some(&path)).unwrap();
        assert!(cfg.enable_deployment);

        let path = write_json(&dir, r#"{"enable_deployment": false}"#);
        let cfg = Config::load(".", true, Some(&path)).unwrap();
        assert!(!cfg.enable_deployment);
    }

    #[test]
    fn test_file_overrides_project_root() {
        let dir = TempDir::new().unwrap();
        let path = write_json(&dir, r#"{"project_root": "/srv/contracts"}"#);

        let cfg = Config::load("/tmp/demo", false, Some(&path)).unwrap();
        assert_eq!(cfg.project_root, PathBuf::from("/srv/contracts"));
    }

    #[test]
    fn test_extra_keys_are_kept_in_file_order() {
        let dir = TempDir::new().unwrap();
        let path = write_json(&dir, r#"{"zeta": 1, "project_root": ".", "network": "devnet", "enable_deployment": true, "alpha": [true]}"#);

        let cfg = Config::load(".", false, Some(&path)).unwrap();
        let keys: Vec<&str> = cfg.extra.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["zeta", "network", "alpha"]);
        assert_eq!(cfg.extra["network"], Value::String("devnet".into()));
        assert!(!cfg.extra.contains_key("project_root"));
        assert!(!cfg.extra.contains_key("enable_deployment"));
    }

    #[test]
    fn test_missing_file_is_config_read_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent.json");

        let err = Config::load(".", false, Some(&path)).unwrap_err();
        assert!(matches!(err, GenerateError::ConfigRead { .. }));
    }

    #[test]
    fn test_malformed_file_is_config_read_error() {
        let dir = TempDir::new().unwrap();

        let path = write_json(&dir, "{ not json");
        let err = Config::load(".", false, Some(&path)).unwrap_err();
        assert!(matches!(err, GenerateError::ConfigRead { .. }));

        let path = write_json(&dir, "[1, 2, 3]");
        let err = Config::load(".", false, Some(&path)).unwrap_err();
        assert!(matches!(err, GenerateError::ConfigRead { .. }));
        assert_eq!(
            std::error::Error::source(&err).unwrap().to_string(),
            "expected a JSON object, found an array"
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_root_is_kept_verbatim() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = TempDir::new().unwrap();
        let root = dir.path().join(OsStr::from_bytes(b"proj\xff"));

        let cfg = Config::load(&root, false, None).unwrap();
        assert_eq!(cfg.project_root, root);

        let path = write_json(&dir, r#"{"enable_deployment": true}"#);
        let cfg = Config::load(&root, false, Some(&path)).unwrap();
        assert_eq!(cfg.project_root, root);
        assert!(cfg.enable_deployment);
        assert!(cfg.extra.is_empty());
    }

    #[test]
    fn test_wrong_type_for_known_key_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write_json(&dir, r#"{"enable_deployment": "yes"}"#);
        let err = Config::load(".", false, Some(&path)).unwrap_err();
        assert!(matches!(err, GenerateError::ConfigRead { .. }));

        let path = write_json(&dir, r#"{"project_root": 42}"#);
        let err = Config::load(".", false, Some(&path)).unwrap_err();
        assert!(matches!(err, GenerateError::ConfigRead { .. }));
    }
}
