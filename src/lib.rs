pub mod config;
pub mod error;
pub mod generator;
pub mod models;
pub mod templates;

pub use config::Config;
pub use error::GenerateError;
pub use generator::{CiGenerator, ProjectStructure, StageKind};
pub use models::Workflow;
