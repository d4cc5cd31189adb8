use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sui_ci_gen::{CiGenerator, Config};

#[derive(Parser, Debug)]
#[command(name = "sui-ci-gen", version, about = "Generate Sui Move CI/CD workflow")]
struct Cli {
    /// Path to a JSON config file; its keys override the flags below
    #[arg(long)]
    config: Option<PathBuf>,
    /// Path to project root
    #[arg(long, default_value = ".")]
    project_root: PathBuf,
    /// Enable devnet deployment
    #[arg(long)]
    enable_deployment: bool,
    /// Verbose logs
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "info" } else { "warn" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("SUI_CI_LOG").unwrap_or_else(|_| filter.into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let path = generate(&cli)?;
    println!("✓ Successfully generated CI/CD workflow at {}", path.display());
    Ok(())
}

fn generate(cli: &Cli) -> Result<PathBuf> {
    let config = Config::load(&cli.project_root, cli.enable_deployment, cli.config.as_deref())?;
    tracing::debug!(?config, "resolved configuration");

    let generator = CiGenerator::new(config);
    let path = generator
        .run()
        .with_context(|| format!("generating workflow for {}", generator.config().project_root.display()))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["sui-ci-gen"]).unwrap();
        assert_eq!(cli.project_root, PathBuf::from("."));
        assert!(cli.config.is_none());
        assert!(!cli.enable_deployment);
        assert!(!cli.verbose);
    }

    #[test]
    fn test_cli_flags() {
        let cli = Cli::try_parse_from([
            "sui-ci-gen",
            "--config",
            "ci.json",
            "--project-root",
            "/tmp/demo",
            "--enable-deployment",
            "-v",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("ci.json")));
        assert_eq!(cli.project_root, PathBuf::from("/tmp/demo"));
        assert!(cli.enable_deployment);
        assert!(cli.verbose);
    }

    #[test]
    fn test_generate_into_empty_project() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().to_str().unwrap();
        let cli = Cli::try_parse_from(["sui-ci-gen", "--project-root", root]).unwrap();

        let path = generate(&cli).unwrap();
        assert_eq!(path, dir.path().join(".github/workflows/sui-ci.yml"));
        let first = fs::read_to_string(&path).unwrap();
        assert!(first.contains("jobs:"));

        generate(&cli).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), first);
    }

    #[test]
    fn test_generate_with_config_file_root() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("contracts");
        let config_path = dir.path().join("ci.json");
        fs::write(
            &config_path,
            serde_json::json!({ "project_root": target, "enable_deployment": true }).to_string(),
        )
        .unwrap();

        let cli = Cli::try_parse_from([
            "sui-ci-gen",
            "--config",
            config_path.to_str().unwrap(),
        ])
        .unwrap();
        let path = generate(&cli).unwrap();
        assert_eq!(path, target.join(".github/workflows/sui-ci.yml"));
        assert!(path.exists());
    }

    #[test]
    fn test_generate_fails_before_writing_on_bad_config() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("ci.json");
        fs::write(&config_path, "not json").unwrap();

        let cli = Cli::try_parse_from([
            "sui-ci-gen",
            "--config",
            config_path.to_str().unwrap(),
            "--project-root",
            dir.path().to_str().unwrap(),
        ])
        .unwrap();
        let err = generate(&cli).unwrap_err();
        assert!(err.to_string().starts_with("failed to read config file"));
        assert!(!dir.path().join(".github").exists());
    }
}
