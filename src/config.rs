use std::{
    env,
    path::{Path, PathBuf},
};

use anyhow::Result;

pub const DEFAULT_SOURCE_BASE: &str =
    "https://raw.githubusercontent.com/robertrouse/theographic-bible-metadata/master/json";
pub const DEFAULT_OUTPUT_DIR: &str = "public/data";

pub const PEOPLE_TABLE: &str = "people.json";
pub const VERSES_TABLE: &str = "verses.json";
pub const BOOKS_TABLE: &str = "books.json";
pub const CHAPTERS_TABLE: &str = "chapters.json";

#[derive(Debug, Clone)]
pub struct Config {
    pub source_base: String,
    pub output_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let source_base = env::var("THEOGRAPHIC_SOURCE")
            .ok()
            .map(|v| normalize_env_value(&v))
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_SOURCE_BASE.to_string());

        let output_raw = env::var("THEOGRAPHIC_OUTPUT_DIR")
            .ok()
            .map(|v| normalize_env_value(&v))
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_OUTPUT_DIR.to_string());

        Self::new(source_base, &output_raw)
    }

    pub fn new(source_base: impl Into<String>, output_dir: &str) -> Result<Self> {
        Ok(Self {
            source_base: source_base.into(),
            output_dir: resolve_output_dir(output_dir)?,
        })
    }

    pub fn table_ref(&self, table: &str) -> String {
        if is_http_ref(&self.source_base) {
            format!("{}/{table}", self.source_base.trim_end_matches('/'))
        } else {
            resolve_file_ref_path(&self.source_base)
                .join(table)
                .display()
                .to_string()
        }
    }
}

pub fn is_http_ref(reference: &str) -> bool {
    reference.starts_with("http://") || reference.starts_with("https://")
}

pub fn resolve_file_ref_path(file_ref: &str) -> PathBuf {
    if let Some(stripped) = file_ref.strip_prefix("file://") {
        PathBuf::from(stripped)
    } else {
        PathBuf::from(file_ref)
    }
}

fn resolve_output_dir(raw: &str) -> Result<PathBuf> {
    if is_http_ref(raw) {
        anyhow::bail!("HTTP output locations are not supported: {raw}");
    }

    let path = resolve_file_ref_path(raw);
    if path == Path::new("/") {
        anyhow::bail!("Refusing to write output to filesystem root");
    }
    Ok(path)
}

fn normalize_env_value(raw: &str) -> String {
    raw.trim().trim_matches('"').trim_matches('\'').to_string()
}
