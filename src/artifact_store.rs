use std::{
    io::{self, Write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::ser::Formatter;
use tokio::fs;
use tracing::{debug, info};

use crate::models::PersonDetail;

pub const FALLBACK_BUCKET: &str = "other";

pub const PEOPLE_FILE: &str = "people.json";
pub const CHILDREN_FILE: &str = "children.json";
pub const ALIASES_FILE: &str = "aliases.json";
pub const ROOT_FILE: &str = "root.json";
pub const DETAILS_DIR: &str = "details";

pub fn bucket_for_key(lookup: &str) -> String {
    match lookup.chars().next().map(|c| c.to_ascii_lowercase()) {
        Some(c) if c.is_ascii_lowercase() => c.to_string(),
        _ => FALLBACK_BUCKET.to_string(),
    }
}

pub fn partition_details(
    details: IndexMap<String, PersonDetail>,
) -> IndexMap<String, IndexMap<String, PersonDetail>> {
    let mut buckets: IndexMap<String, IndexMap<String, PersonDetail>> = IndexMap::new();
    for (lookup, detail) in details {
        buckets
            .entry(bucket_for_key(&lookup))
            .or_default()
            .insert(lookup, detail);
    }
    buckets
}

/// Compact JSON with every non-ASCII character written as a `\uXXXX` escape.
#[derive(Debug, Clone, Copy, Default)]
pub struct AsciiFormatter;

impl Formatter for AsciiFormatter {
    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        let mut start = 0;
        for (idx, ch) in fragment.char_indices() {
            if ch.is_ascii() {
                continue;
            }
            writer.write_all(fragment[start..idx].as_bytes())?;
            let mut units = [0u16; 2];
            for unit in ch.encode_utf16(&mut units) {
                write!(writer, "\\u{unit:04x}")?;
            }
            start = idx + ch.len_utf8();
        }
        writer.write_all(fragment[start..].as_bytes())
    }
}

pub fn to_ascii_json<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    let mut serializer = serde_json::Serializer::with_formatter(Vec::new(), AsciiFormatter);
    value
        .serialize(&mut serializer)
        .context("Failed to serialize artifact")?;
    Ok(serializer.into_inner())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFile {
    pub relative_path: PathBuf,
    pub bytes: Vec<u8>,
}

impl RenderedFile {
    pub fn render<T: Serialize + ?Sized>(relative_path: impl Into<PathBuf>, value: &T) -> Result<Self> {
        let relative_path = relative_path.into();
        let bytes = to_ascii_json(value)
            .with_context(|| format!("Failed to render {}", relative_path.display()))?;
        Ok(Self {
            relative_path,
            bytes,
        })
    }
}

pub fn bucket_relative_path(bucket: &str) -> PathBuf {
    Path::new(DETAILS_DIR).join(format!("{bucket}.json"))
}

pub async fn ensure_output_dirs(output_dir: &Path) -> Result<()> {
    let details_dir = output_dir.join(DETAILS_DIR);
    fs::create_dir_all(&details_dir)
        .await
        .with_context(|| format!("Failed to create output directory {}", details_dir.display()))
}

pub async fn write_rendered(output_dir: &Path, files: &[RenderedFile]) -> Result<()> {
    ensure_output_dirs(output_dir).await?;

    for file in files {
        let path = output_dir.join(&file.relative_path);
        fs::write(&path, &file.bytes)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!(path = %path.display(), bytes = file.bytes.len(), "Artifact written");
    }

    remove_stale_buckets(output_dir, files).await
}

async fn remove_stale_buckets(output_dir: &Path, files: &[RenderedFile]) -> Result<()> {
    let details_dir = output_dir.join(DETAILS_DIR);
    let mut entries = fs::read_dir(&details_dir)
        .await
        .with_context(|| format!("Failed to list {}", details_dir.display()))?;

    while let Some(entry) = entries
        .next_entry()
        .await
        .with_context(|| format!("Failed to list {}", details_dir.display()))?
    {
        let path = entry.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
            continue;
        }
        let relative = Path::new(DETAILS_DIR).join(entry.file_name());
        if files.iter().any(|f| f.relative_path == relative) {
            continue;
        }
        debug!(path = %path.display(), "Removing stale detail bucket");
        delete_file_if_exists(&path).await?;
    }
    Ok(())
}

pub async fn delete_file_if_exists(path: &Path) -> Result<()> {
    match fs::remove_file(path).await {
        Ok(_) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(err).with_context(|| format!("Failed to delete {}", path.display())),
    }
}
