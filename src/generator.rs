use indexmap::IndexMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use crate::config::{self, Config};
use crate::error::GenerateError;
use crate::models::{BranchFilter, Job, Step, Triggers, Workflow};
use crate::templates;

/// What the project root looks like. Logged, never used to shape the workflow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProjectStructure {
    pub has_move_toml: bool,
    pub has_tests: bool,
    pub has_sources: bool,
}

/// The four jobs of the workflow, in emission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageKind {
    Build,
    Test,
    Security,
    Deploy,
}

impl StageKind {
    pub const ALL: [StageKind; 4] = [
        StageKind::Build,
        StageKind::Test,
        StageKind::Security,
        StageKind::Deploy,
    ];

    /// Key under `jobs:`; also what `needs:` refers to.
    pub fn job_id(self) -> &'static str {
        match self {
            StageKind::Build => "build",
            StageKind::Test => "test",
            StageKind::Security => "security",
            StageKind::Deploy => "deploy",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            StageKind::Build => "Build",
            StageKind::Test => "Test",
            StageKind::Security => "Security Analysis",
            StageKind::Deploy => "Deploy to Devnet",
        }
    }

    pub fn needs(self) -> &'static [StageKind] {
        match self {
            StageKind::Build => &[],
            StageKind::Test | StageKind::Security => &[StageKind::Build],
            StageKind::Deploy => &[StageKind::Test, StageKind::Security],
        }
    }

    fn apt_packages(self) -> &'static str {
        match self {
            StageKind::Build | StageKind::Test => "build-essential",
            StageKind::Security | StageKind::Deploy => "build-essential jq",
        }
    }
}

pub struct CiGenerator {
    config: Config,
    project_root: PathBuf,
    workflow_dir: PathBuf,
}

impl CiGenerator {
    pub fn new(config: Config) -> Self {
        let project_root = config.project_root.clone();
        let workflow_dir = project_root.join(config::WORKFLOW_DIR);
        Self {
            config,
            project_root,
            workflow_dir,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn workflow_path(&self) -> PathBuf {
        self.workflow_dir.join(config::WORKFLOW_FILE)
    }

    pub fn detect_project_structure(&self) -> ProjectStructure {
        ProjectStructure {
            has_move_toml: self.project_root.join("Move.toml").exists(),
            has_tests: has_move_files(&self.project_root.join("tests")),
            has_sources: has_move_files(&self.project_root.join("sources")),
        }
    }

    pub fn generate_stage(&self, kind: StageKind) -> Job {
        let mut steps = vec![
            Step::uses("Checkout code", config::CHECKOUT_ACTION),
            Step::run(
                "Install Homebrew and Sui",
                templates::install_sui_tpl(kind.apt_packages()),
            ),
        ];
        let (mut if_, mut env) = (None, IndexMap::new());

        match kind {
            StageKind::Build => {
                steps.push(workspace_step("Build Move modules", templates::BUILD_MOVE_TPL));
            }
            StageKind::Test => {
                steps.push(workspace_step("Run Move tests", templates::TEST_MOVE_TPL));
            }
            StageKind::Security => {
                steps.extend([
                    workspace_step("Run Sui Built-in Linters", templates::LINT_TPL),
                    workspace_step("Security Best Practices Check", templates::BEST_PRACTICES_TPL),
                    workspace_step("Formal Verification Check", templates::FORMAL_VERIFICATION_TPL),
                    workspace_step("Generate Security Report", templates::SECURITY_REPORT_TPL),
                    Step::uses("Upload Security Report", config::UPLOAD_ARTIFACT_ACTION)
                        .with_input("name", config::SECURITY_REPORT_ARTIFACT)
                        .with_input("path", config::SECURITY_REPORT_PATH),
                ]);
            }
            StageKind::Deploy => {
                if_ = Some(config::DEPLOY_GUARD.to_string());
                env = deploy_env();
                steps.extend([
                    Step::run("Setup Sui CLI config and Deploy", templates::DEPLOY_TPL),
                    Step::run("Verify deployment", templates::VERIFY_DEPLOY_TPL),
                ]);
            }
        }

        Job {
            name: kind.display_name().to_string(),
            runs_on: config::RUNNER.to_string(),
            needs: kind.needs().iter().map(|k| k.job_id().to_string()).collect(),
            if_,
            env,
            steps,
        }
    }

    pub fn generate_workflow(&self) -> Workflow {
        let mut env = IndexMap::new();
        env.insert("RUST_BACKTRACE".to_string(), "1".to_string());
        env.insert("SUI_LOG_LEVEL".to_string(), "info".to_string());

        let jobs = StageKind::ALL
            .iter()
            .map(|&kind| (kind.job_id().to_string(), self.generate_stage(kind)))
            .collect();

        Workflow {
            name: config::WORKFLOW_NAME.to_string(),
            on: Triggers {
                push: BranchFilter::new(&config::TRIGGER_BRANCHES),
                pull_request: BranchFilter::new(&config::TRIGGER_BRANCHES),
            },
            env,
            jobs,
        }
    }

    pub fn render(&self, workflow: &Workflow) -> Result<String, GenerateError> {
        serde_yaml::to_string(workflow).map_err(|e| GenerateError::output_write(self.workflow_path(), e))
    }

    /// Writes `workflow` to `.github/workflows/sui-ci.yml`, replacing any previous file.
    pub fn save_workflow(&self, workflow: &Workflow) -> Result<PathBuf, GenerateError> {
        let path = self.workflow_path();
        let yaml = self.render(workflow)?;

        fs::create_dir_all(&self.workflow_dir)
            .map_err(|e| GenerateError::output_write(&self.workflow_dir, e))?;

        // Stage next to the target so the rename stays on one filesystem.
        let mut tmp = NamedTempFile::new_in(&self.workflow_dir)
            .map_err(|e| GenerateError::output_write(&path, e))?;
        tmp.write_all(yaml.as_bytes())
            .and_then(|_| tmp.flush())
            .and_then(|_| match output_permissions(&path) {
                Some(perms) => tmp.as_file().set_permissions(perms),
                None => Ok(()),
            })
            .map_err(|e| GenerateError::output_write(&path, e))?;
        tmp.persist(&path)
            .map_err(|e| GenerateError::output_write(&path, e.error))?;

        tracing::info!("wrote {} bytes to {}", yaml.len(), path.display());
        Ok(path)
    }

    /// Detect, generate and save in one pass.
    pub fn run(&self) -> Result<PathBuf, GenerateError> {
        let structure = self.detect_project_structure();
        tracing::info!(
            root = %self.project_root.display(),
            has_move_toml = structure.has_move_toml,
            has_tests = structure.has_tests,
            has_sources = structure.has_sources,
            "detected project structure"
        );
        tracing::info!(enable_deployment = self.config.enable_deployment, "deployment flag");
        if !self.config.extra.is_empty() {
            tracing::debug!(keys = ?self.config.extra.keys().collect::<Vec<_>>(), "unused config keys");
        }

        let workflow = self.generate_workflow();
        self.save_workflow(&workflow)
    }
}

fn workspace_step(name: &str, script: &str) -> Step {
    Step::run(name, script).in_dir(config::WORKSPACE_DIR)
}

fn deploy_env() -> IndexMap<String, String> {
    let mut env = IndexMap::new();
    env.insert("SUI_NETWORK".to_string(), config::DEPLOY_NETWORK.to_string());
    for secret in config::DEPLOY_SECRETS {
        env.insert(secret.to_string(), format!("${{{{ secrets.{secret} }}}}"));
    }
    env
}

// Temp files start out 0600; keep an existing file's mode, else the usual 0644.
#[cfg(unix)]
fn output_permissions(path: &Path) -> Option<fs::Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(
        fs::metadata(path)
            .map(|m| m.permissions())
            .unwrap_or_else(|_| fs::Permissions::from_mode(0o644)),
    )
}

#[cfg(not(unix))]
fn output_permissions(_path: &Path) -> Option<fs::Permissions> {
    None
}

fn has_move_files(dir: &Path) -> bool {
    let Ok(entries) = fs::read_dir(dir) else {
        return false;
    };
    entries
        .filter_map(|e| e.ok())
        .any(|e| e.path().extension().is_some_and(|ext| ext == "move"))
}
