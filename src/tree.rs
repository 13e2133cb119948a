use crate::{
    models::{PersonAttributes, PersonSummary, TreeAttributes, TreeNode},
    reference_index::ReferenceIndex,
    transform::Projection,
};

pub const ROOT_PERSON_NAME: &str = "Adam";
pub const COMPANION_PERSON_NAME: &str = "Eve";

pub const FALLBACK_ROOT_ID: &str = "bible_root";
pub const FALLBACK_ROOT_NAME: &str = "Bible";
pub const FALLBACK_ROOT_TITLE: &str = "All People";

pub fn select_root(index: &ReferenceIndex, projection: &Projection) -> TreeNode {
    let Some(root) = most_mentioned(index, ROOT_PERSON_NAME)
        .and_then(|lookup| projection.people.get(lookup))
    else {
        return fallback_root();
    };

    let mut child_ids: Vec<&str> = projection
        .children
        .get(&root.id)
        .map(|ids| ids.iter().map(String::as_str).collect())
        .unwrap_or_default();

    if let Some(companion) = most_mentioned(index, COMPANION_PERSON_NAME) {
        if companion != root.id && !child_ids.contains(&companion) {
            child_ids.push(companion);
        }
    }

    let children = child_ids
        .into_iter()
        .filter_map(|id| projection.people.get(id))
        .map(|child| build_node(child, false, None))
        .collect();

    build_node(root, true, Some(children))
}

pub fn build_node(
    person: &PersonSummary,
    has_loaded_children: bool,
    children: Option<Vec<TreeNode>>,
) -> TreeNode {
    let name = if person.name.is_empty() {
        person.id.clone()
    } else {
        person.name.clone()
    };

    TreeNode {
        id: person.id.clone(),
        name,
        attributes: TreeAttributes {
            title: person.display_title.clone(),
            person: Some(PersonAttributes {
                spouses: person.spouses.clone(),
                birth_year: person.birth_year,
                death_year: person.death_year,
                first_mention: person.first_mention.clone(),
            }),
        },
        has_loaded_children,
        children,
    }
}

pub fn fallback_root() -> TreeNode {
    TreeNode {
        id: FALLBACK_ROOT_ID.to_string(),
        name: FALLBACK_ROOT_NAME.to_string(),
        attributes: TreeAttributes {
            title: Some(FALLBACK_ROOT_TITLE.to_string()),
            person: None,
        },
        has_loaded_children: true,
        children: Some(Vec::new()),
    }
}

/// Lookup key of the person stored under exactly `name` with the highest verse
/// count. The earliest such person wins ties.
fn most_mentioned<'a>(index: &'a ReferenceIndex, name: &str) -> Option<&'a str> {
    let mut best: Option<(&str, i64)> = None;
    for (lookup, fields) in &index.people {
        if fields.name.as_deref() != Some(name) {
            continue;
        }
        if best.map_or(true, |(_, count)| fields.verse_count > count) {
            best = Some((lookup.as_str(), fields.verse_count));
        }
    }
    best.map(|(lookup, _)| lookup)
}
