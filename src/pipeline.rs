use anyhow::{Context, Result};
use indexmap::IndexMap;
use tracing::info;

use crate::{
    aliases::AliasAccumulator,
    artifact_store::{
        bucket_relative_path, partition_details, write_rendered, RenderedFile, ALIASES_FILE,
        CHILDREN_FILE, PEOPLE_FILE, ROOT_FILE,
    },
    config::Config,
    models::{PersonDetail, PersonSummary, TreeNode},
    reference_index::ReferenceIndex,
    source::{load_tables, SourceTables},
    transform::project_people,
    tree::select_root,
};

#[derive(Debug, Clone)]
pub struct Artifacts {
    pub people: IndexMap<String, PersonSummary>,
    pub children: IndexMap<String, Vec<String>>,
    pub aliases: IndexMap<String, Vec<String>>,
    pub root: TreeNode,
    pub buckets: IndexMap<String, IndexMap<String, PersonDetail>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub people: usize,
    pub children_entries: usize,
    pub alias_entries: usize,
    pub root_children: usize,
    pub buckets: usize,
}

impl Artifacts {
    pub fn summary(&self) -> RunSummary {
        RunSummary {
            people: self.people.len(),
            children_entries: self.children.len(),
            alias_entries: self.aliases.len(),
            root_children: self.root.children.as_ref().map_or(0, Vec::len),
            buckets: self.buckets.len(),
        }
    }

    pub fn render(&self) -> Result<Vec<RenderedFile>> {
        let mut files = vec![
            RenderedFile::render(PEOPLE_FILE, &self.people)?,
            RenderedFile::render(CHILDREN_FILE, &self.children)?,
            RenderedFile::render(ALIASES_FILE, &self.aliases)?,
            RenderedFile::render(ROOT_FILE, &self.root)?,
        ];
        for (bucket, details) in &self.buckets {
            files.push(RenderedFile::render(bucket_relative_path(bucket), details)?);
        }
        Ok(files)
    }
}

pub fn build_artifacts(tables: &SourceTables) -> Artifacts {
    let index = ReferenceIndex::build(tables);
    info!(
        books = index.books.len(),
        chapters = index.chapters.len(),
        verses = index.verses.len(),
        people = index.people.len(),
        "Reference index built"
    );

    let mut aliases = AliasAccumulator::default();
    let projection = project_people(&index, &mut aliases);
    let root = select_root(&index, &projection);

    Artifacts {
        people: projection.people,
        children: projection.children,
        aliases: aliases.finish(),
        root,
        buckets: partition_details(projection.details),
    }
}

pub async fn run(config: &Config) -> Result<RunSummary> {
    info!(source = %config.source_base, output = %config.output_dir.display(), "Export started");

    let tables = load_tables(config)
        .await
        .context("Failed to load source tables")?;

    let artifacts = build_artifacts(&tables);
    let files = artifacts.render()?;
    write_rendered(&config.output_dir, &files).await?;

    let summary = artifacts.summary();
    info!(
        people = summary.people,
        buckets = summary.buckets,
        root = %artifacts.root.id,
        "Export completed"
    );
    Ok(summary)
}
