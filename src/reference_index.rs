use std::collections::HashMap;

use indexmap::IndexMap;

use crate::{
    models::{
        decode_rows, BookFields, ChapterFields, PersonFields, VerseFields, DEFAULT_BOOK_ORDER,
    },
    source::SourceTables,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookEntry {
    pub name: Option<String>,
    pub order: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterEntry {
    pub number: Option<String>,
    pub book_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerseEntry {
    pub book_id: Option<String>,
    pub chapter_id: Option<String>,
    pub verse_number: Option<String>,
    pub ordinal: Option<i64>,
}

#[derive(Debug, Clone, Default)]
pub struct ReferenceIndex {
    pub books: HashMap<String, BookEntry>,
    pub chapters: HashMap<String, ChapterEntry>,
    pub verses: HashMap<String, VerseEntry>,
    pub record_to_lookup: HashMap<String, String>,
    pub people: IndexMap<String, PersonFields>,
}

impl ReferenceIndex {
    pub fn build(tables: &SourceTables) -> Self {
        let mut index = Self::default();

        for book in decode_rows::<BookFields>(&tables.books) {
            let Some(id) = book.id else {
                continue;
            };
            index.books.insert(
                id,
                BookEntry {
                    name: book.fields.book_name,
                    order: book.fields.book_order.unwrap_or(DEFAULT_BOOK_ORDER),
                },
            );
        }

        for chapter in decode_rows::<ChapterFields>(&tables.chapters) {
            let Some(id) = chapter.id else {
                continue;
            };
            index.chapters.insert(
                id,
                ChapterEntry {
                    number: chapter.fields.chapter_num,
                    book_id: first_id(chapter.fields.book),
                },
            );
        }

        for verse in decode_rows::<VerseFields>(&tables.verses) {
            let Some(id) = verse.id else {
                continue;
            };
            index.verses.insert(
                id,
                VerseEntry {
                    book_id: first_id(verse.fields.book),
                    chapter_id: first_id(verse.fields.chapter),
                    verse_number: verse.fields.verse_num,
                    ordinal: verse.fields.verse_id,
                },
            );
        }

        for person in decode_rows::<PersonFields>(&tables.people) {
            let (Some(id), Some(lookup)) = (person.id, person.fields.person_lookup.clone()) else {
                continue;
            };
            index.record_to_lookup.insert(id, lookup.clone());
            index.people.insert(lookup, person.fields);
        }

        index
    }

    pub fn book(&self, book_id: Option<&str>) -> Option<&BookEntry> {
        book_id.and_then(|id| self.books.get(id))
    }

    pub fn chapter(&self, chapter_id: Option<&str>) -> Option<&ChapterEntry> {
        chapter_id.and_then(|id| self.chapters.get(id))
    }

    pub fn lookup_for_record(&self, record_id: &str) -> Option<&str> {
        self.record_to_lookup.get(record_id).map(String::as_str)
    }
}

fn first_id(ids: Vec<String>) -> Option<String> {
    ids.into_iter().next()
}
