use std::{io, path::PathBuf};

use serde_json::Value;
use thiserror::Error;
use tokio::process::Command;
use tracing::info;

use crate::config::{
    is_http_ref, resolve_file_ref_path, Config, BOOKS_TABLE, CHAPTERS_TABLE, PEOPLE_TABLE,
    VERSES_TABLE,
};

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to execute curl for {url}")]
    Spawn {
        url: String,
        #[source]
        source: io::Error,
    },
    #[error("download of {url} failed: {stderr}")]
    Download { url: String, stderr: String },
    #[error("failed reading source table {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("source table {reference} is not valid JSON")]
    Decode {
        reference: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("source table {reference} is not a JSON array")]
    NotAnArray { reference: String },
}

#[derive(Debug, Clone, Default)]
pub struct SourceTables {
    pub people: Vec<Value>,
    pub verses: Vec<Value>,
    pub books: Vec<Value>,
    pub chapters: Vec<Value>,
}

pub async fn load_tables(config: &Config) -> Result<SourceTables, SourceError> {
    let (people, verses, books, chapters) = tokio::try_join!(
        load_table(config.table_ref(PEOPLE_TABLE)),
        load_table(config.table_ref(VERSES_TABLE)),
        load_table(config.table_ref(BOOKS_TABLE)),
        load_table(config.table_ref(CHAPTERS_TABLE)),
    )?;

    Ok(SourceTables {
        people,
        verses,
        books,
        chapters,
    })
}

async fn load_table(reference: String) -> Result<Vec<Value>, SourceError> {
    let raw = load_document(&reference).await?;
    let rows = parse_table(&reference, &raw)?;
    info!(reference = %reference, rows = rows.len(), "Source table loaded");
    Ok(rows)
}

pub fn parse_table(reference: &str, raw: &[u8]) -> Result<Vec<Value>, SourceError> {
    let parsed: Value = serde_json::from_slice(raw).map_err(|source| SourceError::Decode {
        reference: reference.to_string(),
        source,
    })?;

    match parsed {
        Value::Array(rows) => Ok(rows),
        _ => Err(SourceError::NotAnArray {
            reference: reference.to_string(),
        }),
    }
}

async fn load_document(reference: &str) -> Result<Vec<u8>, SourceError> {
    if is_http_ref(reference) {
        let output = Command::new("curl")
            .arg("-sS")
            .arg("--fail")
            .arg("-L")
            .arg(reference)
            .output()
            .await
            .map_err(|source| SourceError::Spawn {
                url: reference.to_string(),
                source,
            })?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SourceError::Download {
                url: reference.to_string(),
                stderr: stderr.trim().to_string(),
            });
        }
        return Ok(output.stdout);
    }

    let path = resolve_file_ref_path(reference);
    tokio::fs::read(&path)
        .await
        .map_err(|source| SourceError::Read { path, source })
}
