pub mod aliases;
pub mod artifact_store;
pub mod config;
pub mod models;
pub mod names;
pub mod pipeline;
pub mod reference_index;
pub mod source;
pub mod text;
pub mod transform;
pub mod tree;

pub use config::Config;
pub use pipeline::{build_artifacts, run, Artifacts, RunSummary};
