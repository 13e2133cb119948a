use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;

use crate::{
    aliases::AliasAccumulator,
    models::{PersonDetail, PersonSummary},
    names::{display_name, extract_qualifier},
    reference_index::{ReferenceIndex, VerseEntry},
    text::{trim_bio, MAX_BIO_SENTENCES},
};

pub const MAX_SCRIPTURE_REFS: usize = 6;

#[derive(Debug, Clone, Default)]
pub struct Projection {
    pub people: IndexMap<String, PersonSummary>,
    pub details: IndexMap<String, PersonDetail>,
    pub children: IndexMap<String, Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerseSelection {
    pub scriptures: Vec<String>,
    pub first_mention: Option<String>,
}

pub fn project_people(index: &ReferenceIndex, aliases: &mut AliasAccumulator) -> Projection {
    let names = DisplayNames::build(index);
    let mut projection = Projection::default();

    for (lookup, fields) in &index.people {
        let raw_name = fields.raw_name(lookup);
        let name = names.name_for(lookup);
        let verses = select_verses(index, &fields.verses);

        let spouses_ids = resolve_lookups(index, &fields.partners);
        let parents_ids = resolve_lookups(index, fields.parent_ids());
        let children_ids = resolve_lookups(index, &fields.children);
        let spouses = names.names_for(&spouses_ids);

        projection.people.insert(
            lookup.clone(),
            PersonSummary {
                id: lookup.clone(),
                name: name.clone(),
                display_title: fields
                    .display_title
                    .clone()
                    .or_else(|| extract_qualifier(&name, fields.disambiguation.as_deref())),
                gender: fields.gender.clone(),
                birth_year: fields.min_year,
                death_year: fields.max_year,
                first_mention: verses.first_mention.clone(),
                verse_count: fields.verse_count,
                alpha_group: fields.alpha_group.clone(),
                spouses: spouses.clone(),
            },
        );

        aliases.record(raw_name, lookup, fields.verse_count);

        projection.details.insert(
            lookup.clone(),
            PersonDetail {
                id: lookup.clone(),
                name,
                role: fields.display_title.clone(),
                bio: trim_bio(fields.biography_source(), MAX_BIO_SENTENCES),
                scriptures: verses.scriptures,
                spouses,
                spouses_ids,
                parents: names.names_for(&parents_ids),
                parents_ids,
                children: names.names_for(&children_ids),
                children_ids: children_ids.clone(),
                first_mention: verses.first_mention,
                birth_year: fields.min_year,
                death_year: fields.max_year,
                verse_count: fields.verse_count,
            },
        );
        projection.children.insert(lookup.clone(), children_ids);
    }

    projection
}

struct DisplayNames<'a> {
    index: &'a ReferenceIndex,
    by_lookup: HashMap<&'a str, String>,
}

impl<'a> DisplayNames<'a> {
    fn build(index: &'a ReferenceIndex) -> Self {
        let by_lookup = index
            .people
            .iter()
            .map(|(lookup, fields)| {
                let raw_name = fields.raw_name(lookup);
                (
                    lookup.as_str(),
                    display_name(raw_name, fields.disambiguation.as_deref()),
                )
            })
            .collect();
        Self { index, by_lookup }
    }

    fn name_for(&self, lookup: &str) -> String {
        if let Some(name) = self.by_lookup.get(lookup).filter(|n| !n.is_empty()) {
            return name.clone();
        }
        self.index
            .people
            .get(lookup)
            .map(|fields| fields.raw_name(lookup).to_string())
            .unwrap_or_else(|| lookup.to_string())
    }

    fn names_for(&self, lookups: &[String]) -> Vec<String> {
        lookups.iter().map(|lookup| self.name_for(lookup)).collect()
    }
}

pub fn resolve_lookups<'a>(
    index: &ReferenceIndex,
    record_ids: impl IntoIterator<Item = &'a String>,
) -> Vec<String> {
    record_ids
        .into_iter()
        .filter_map(|record_id| index.lookup_for_record(record_id))
        .map(ToString::to_string)
        .collect()
}

pub fn select_verses(index: &ReferenceIndex, verse_ids: &[String]) -> VerseSelection {
    let mut ordered: Vec<&String> = verse_ids.iter().collect();
    ordered.sort_by_key(|id| verse_sort_key(index.verses.get(id.as_str())));

    let mut selection = VerseSelection::default();
    let mut seen = HashSet::new();

    for verse_id in ordered {
        let Some(verse) = index.verses.get(verse_id.as_str()) else {
            continue;
        };

        if selection.first_mention.is_none() {
            selection.first_mention = index
                .book(verse.book_id.as_deref())
                .and_then(|book| book.name.clone());
        }

        let Some(reference) = render_reference(index, verse) else {
            continue;
        };
        if !seen.insert(reference.clone()) {
            continue;
        }
        selection.scriptures.push(reference);
        if selection.scriptures.len() >= MAX_SCRIPTURE_REFS {
            break;
        }
    }

    selection
}

/// Unknown verses and missing ordinals sort after every known ordinal.
fn verse_sort_key(verse: Option<&VerseEntry>) -> (bool, i64) {
    match verse.and_then(|v| v.ordinal) {
        Some(ordinal) => (false, ordinal),
        None => (true, 0),
    }
}

pub fn render_reference(index: &ReferenceIndex, verse: &VerseEntry) -> Option<String> {
    let book = index
        .book(verse.book_id.as_deref())
        .and_then(|b| b.name.as_deref())?;
    let chapter = index
        .chapter(verse.chapter_id.as_deref())
        .and_then(|c| c.number.as_deref())?;
    let verse_number = verse.verse_number.as_deref()?;
    Some(format!("{book} {chapter}:{verse_number}"))
}
