use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

// ---- GitHub Actions workflow schema ----
// Field order here is the key order of the rendered YAML.

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workflow {
    pub name: String,
    pub on: Triggers,
    pub env: IndexMap<String, String>,
    pub jobs: IndexMap<String, Job>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Triggers {
    pub push: BranchFilter,
    pub pull_request: BranchFilter,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BranchFilter {
    pub branches: Vec<String>,
}

impl BranchFilter {
    pub fn new(branches: &[&str]) -> Self {
        Self {
            branches: branches.iter().map(|b| b.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub name: String,
    #[serde(rename = "runs-on")]
    pub runs_on: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub needs: Vec<String>,
    #[serde(rename = "if", default, skip_serializing_if = "Option::is_none")]
    pub if_: Option<String>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub env: IndexMap<String, String>,
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub name: String,
    // `if` and `env` are part of the step schema; the generated jobs put their
    // guard and secrets at job level, so these stay unset there.
    #[serde(rename = "if", default, skip_serializing_if = "Option::is_none")]
    pub if_: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uses: Option<String>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub with: IndexMap<String, String>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub env: IndexMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run: Option<String>,
    #[serde(
        rename = "working-directory",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub working_directory: Option<String>,
}

impl Step {
    /// A step that calls a marketplace action.
    pub fn uses(name: &str, action: &str) -> Self {
        Self {
            name: name.to_string(),
            uses: Some(action.to_string()),
            ..Default::default()
        }
    }

    /// A step that runs a shell script.
    pub fn run(name: &str, script: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            run: Some(script.into()),
            ..Default::default()
        }
    }

    pub fn in_dir(mut self, dir: &str) -> Self {
        self.working_directory = Some(dir.to_string());
        self
    }

    pub fn with_input(mut self, key: &str, value: &str) -> Self {
        self.with.insert(key.to_string(), value.to_string());
        self
    }
}
