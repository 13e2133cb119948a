use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

pub const DEFAULT_BOOK_ORDER: i64 = 999;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SourceRecord<F: Default> {
    #[serde(deserialize_with = "lenient::text")]
    pub id: Option<String>,
    pub fields: F,
}

pub fn decode_rows<F>(rows: &[Value]) -> impl Iterator<Item = SourceRecord<F>> + '_
where
    F: Default + DeserializeOwned,
{
    rows.iter()
        .filter_map(|row| SourceRecord::<F>::deserialize(row).ok())
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BookFields {
    #[serde(deserialize_with = "lenient::text")]
    pub book_name: Option<String>,
    #[serde(deserialize_with = "lenient::integer")]
    pub book_order: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChapterFields {
    #[serde(deserialize_with = "lenient::ordinal_text")]
    pub chapter_num: Option<String>,
    #[serde(deserialize_with = "lenient::ids")]
    pub book: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VerseFields {
    #[serde(deserialize_with = "lenient::ids")]
    pub book: Vec<String>,
    #[serde(deserialize_with = "lenient::ids")]
    pub chapter: Vec<String>,
    #[serde(deserialize_with = "lenient::ordinal_text")]
    pub verse_num: Option<String>,
    #[serde(rename = "verseID", deserialize_with = "lenient::integer")]
    pub verse_id: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PersonFields {
    #[serde(deserialize_with = "lenient::text")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub person_lookup: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub display_title: Option<String>,
    #[serde(rename = "Disambiguation (temp)", deserialize_with = "lenient::text")]
    pub disambiguation: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub gender: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub alpha_group: Option<String>,
    #[serde(deserialize_with = "lenient::count")]
    pub verse_count: i64,
    #[serde(deserialize_with = "lenient::integer")]
    pub min_year: Option<i64>,
    #[serde(deserialize_with = "lenient::integer")]
    pub max_year: Option<i64>,
    #[serde(deserialize_with = "lenient::ids")]
    pub verses: Vec<String>,
    #[serde(deserialize_with = "lenient::ids")]
    pub partners: Vec<String>,
    #[serde(deserialize_with = "lenient::ids")]
    pub father: Vec<String>,
    #[serde(deserialize_with = "lenient::ids")]
    pub mother: Vec<String>,
    #[serde(deserialize_with = "lenient::ids")]
    pub children: Vec<String>,
    #[serde(deserialize_with = "lenient::fragments")]
    pub dictionary_text: Option<String>,
    #[serde(deserialize_with = "lenient::fragments")]
    pub dict_text: Option<String>,
}

impl PersonFields {
    pub fn raw_name<'a>(&'a self, lookup: &'a str) -> &'a str {
        self.name.as_deref().unwrap_or(lookup)
    }

    pub fn biography_source(&self) -> Option<&str> {
        self.dictionary_text
            .as_deref()
            .or(self.dict_text.as_deref())
    }

    pub fn parent_ids(&self) -> impl Iterator<Item = &String> {
        self.father.iter().chain(self.mother.iter())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonSummary {
    pub id: String,
    pub name: String,
    pub display_title: Option<String>,
    pub gender: Option<String>,
    pub birth_year: Option<i64>,
    pub death_year: Option<i64>,
    pub first_mention: Option<String>,
    pub verse_count: i64,
    pub alpha_group: Option<String>,
    pub spouses: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonDetail {
    pub id: String,
    pub name: String,
    pub role: Option<String>,
    pub bio: Option<String>,
    pub scriptures: Vec<String>,
    pub spouses: Vec<String>,
    pub spouses_ids: Vec<String>,
    pub parents: Vec<String>,
    pub parents_ids: Vec<String>,
    pub children: Vec<String>,
    pub children_ids: Vec<String>,
    pub first_mention: Option<String>,
    pub birth_year: Option<i64>,
    pub death_year: Option<i64>,
    pub verse_count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeNode {
    pub id: String,
    pub name: String,
    pub attributes: TreeAttributes,
    pub has_loaded_children: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<TreeNode>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeAttributes {
    pub title: Option<String>,
    #[serde(flatten, default, skip_serializing_if = "Option::is_none")]
    pub person: Option<PersonAttributes>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonAttributes {
    pub spouses: Vec<String>,
    pub birth_year: Option<i64>,
    pub death_year: Option<i64>,
    pub first_mention: Option<String>,
}

pub fn value_text(value: &Value) -> Option<String> {
    value
        .as_str()
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

pub fn value_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && f.fract() == 0.0)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

pub fn value_ordinal_text(value: &Value) -> Option<String> {
    match value {
        Value::Number(n) => {
            if n.as_f64() == Some(0.0) {
                None
            } else {
                Some(n.to_string())
            }
        }
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

pub fn value_ids(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().filter_map(value_text).collect(),
        Value::String(s) if !s.is_empty() => vec![s.clone()],
        _ => Vec::new(),
    }
}

pub fn value_fragments(value: &Value) -> Option<String> {
    let joined = match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .collect::<Vec<_>>()
            .join(" "),
        _ => return None,
    };
    (!joined.is_empty()).then_some(joined)
}

mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        Ok(super::value_text(&Value::deserialize(d)?))
    }

    pub fn integer<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i64>, D::Error> {
        Ok(super::value_integer(&Value::deserialize(d)?))
    }

    pub fn count<'de, D: Deserializer<'de>>(d: D) -> Result<i64, D::Error> {
        Ok(super::value_integer(&Value::deserialize(d)?).unwrap_or(0))
    }

    pub fn ordinal_text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        Ok(super::value_ordinal_text(&Value::deserialize(d)?))
    }

    pub fn ids<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
        Ok(super::value_ids(&Value::deserialize(d)?))
    }

    pub fn fragments<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        Ok(super::value_fragments(&Value::deserialize(d)?))
    }
}
