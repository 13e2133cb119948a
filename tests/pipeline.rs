use std::{
    collections::{BTreeMap, HashSet},
    fs,
    path::Path,
};

use serde_json::{json, Value};
use tempfile::TempDir;
use theographic_export::{run, Config};

fn write_table(dir: &Path, name: &str, rows: Value) {
    fs::write(dir.join(name), serde_json::to_vec(&rows).expect("encode")).expect("write table");
}

fn seed_source(dir: &Path) {
    write_table(
        dir,
        "books.json",
        json!([
            {"id": "recGen", "fields": {"bookName": "Genesis", "bookOrder": 1}},
            {"id": "recLuke", "fields": {"bookName": "Luke", "bookOrder": 42}}
        ]),
    );
    write_table(
        dir,
        "chapters.json",
        json!([
            {"id": "recGen2", "fields": {"chapterNum": 2, "book": ["recGen"]}},
            {"id": "recGen4", "fields": {"chapterNum": 4, "book": ["recGen"]}},
            {"id": "recLuke1", "fields": {"chapterNum": 1, "book": ["recLuke"]}}
        ]),
    );

    let mut verses = Vec::new();
    for n in 1..=9 {
        verses.push(json!({
            "id": format!("recGen2v{n}"),
            "fields": {"book": ["recGen"], "chapter": ["recGen2"], "verseNum": n.to_string(), "verseID": 1002000 + n}
        }));
    }
    verses.push(json!({
        "id": "recGen4v1",
        "fields": {"book": ["recGen"], "chapter": ["recGen4"], "verseNum": "1", "verseID": "1004001"}
    }));
    verses.push(json!({
        "id": "recLuke1v13",
        "fields": {"book": ["recLuke"], "chapter": ["recLuke1"], "verseNum": "13", "verseID": 42001013}
    }));
    write_table(dir, "verses.json", Value::Array(verses));

    write_table(
        dir,
        "people.json",
        json!([
            {"id": "recAdam", "fields": {
                "name": "Adam", "personLookup": "adam_1", "verseCount": 30, "gender": "Male",
                "Disambiguation (temp)": "Adam",
                "partners": ["recEve"],
                "children": ["recCain", "recAbel", "recUnknown"],
                "verses": ["recGen4v1", "recGen2v9", "recGen2v8", "recGen2v7", "recGen2v6",
                           "recGen2v5", "recGen2v4", "recGen2v3", "recGen2v2", "recGen2v1"],
                "dictionaryText": "Adam was the first man. He was made from dust. He lived in Eden. He named the animals. He died at 930."
            }},
            {"id": "recEve", "fields": {
                "name": "Eve", "personLookup": "eve_1", "verseCount": 4,
                "partners": ["recAdam"], "verses": ["recGen4v1"]
            }},
            {"id": "recCain", "fields": {
                "name": "Cain", "personLookup": "cain_1", "verseCount": 17,
                "father": ["recAdam"], "mother": ["recEve"]
            }},
            {"id": "recAbel", "fields": {
                "name": "Abel", "personLookup": "abel_1", "verseCount": 12,
                "father": ["recAdam"], "mother": ["recEve"]
            }},
            {"id": "recJohnB", "fields": {
                "name": "John", "personLookup": "john_1", "verseCount": 3,
                "Disambiguation (temp)": "John (the Baptist)",
                "verses": ["recLuke1v13"]
            }},
            {"id": "recJohnA", "fields": {
                "name": "John", "personLookup": "john_2", "verseCount": 10,
                "Disambiguation (temp)": "John, son of Zebedee, apostle"
            }},
            {"id": "recSeven", "fields": {"name": "Seven", "personLookup": "7_sons", "verseCount": 1}},
            {"id": "recZoe", "fields": {"name": "Zo\u{eb}", "personLookup": "zoe_1"}},
            {"id": "recNoLookup", "fields": {"name": "Nobody"}}
        ]),
    );
}

fn read_json(path: &Path) -> Value {
    let raw = fs::read(path).unwrap_or_else(|err| panic!("read {}: {err}", path.display()));
    assert!(raw.is_ascii(), "{} is not ASCII", path.display());
    serde_json::from_slice(&raw).expect("valid json")
}

fn snapshot(dir: &Path) -> BTreeMap<String, Vec<u8>> {
    let mut files = BTreeMap::new();
    for name in ["people.json", "children.json", "aliases.json", "root.json"] {
        files.insert(name.to_string(), fs::read(dir.join(name)).expect("read"));
    }
    for entry in fs::read_dir(dir.join("details")).expect("details dir") {
        let entry = entry.expect("entry");
        files.insert(
            format!("details/{}", entry.file_name().to_string_lossy()),
            fs::read(entry.path()).expect("read bucket"),
        );
    }
    files
}

async fn run_fixture() -> (TempDir, TempDir, theographic_export::RunSummary) {
    let source = tempfile::tempdir().expect("source dir");
    let output = tempfile::tempdir().expect("output dir");
    seed_source(source.path());
    let config = Config::new(
        source.path().display().to_string(),
        &output.path().display().to_string(),
    )
    .expect("config");
    let summary = run(&config).await.expect("pipeline run");
    (source, output, summary)
}

#[tokio::test]
async fn summary_counts_match_outputs() {
    let (_source, output, summary) = run_fixture().await;
    assert_eq!(summary.people, 8);
    assert_eq!(summary.children_entries, 8);
    assert_eq!(summary.alias_entries, 7);
    assert_eq!(summary.root_children, 3);

    let people = read_json(&output.path().join("people.json"));
    assert_eq!(people.as_object().expect("map").len(), summary.people);
}

#[tokio::test]
async fn people_are_keyed_by_their_own_lookup() {
    let (_source, output, _) = run_fixture().await;
    let people = read_json(&output.path().join("people.json"));
    for (key, person) in people.as_object().expect("map") {
        assert_eq!(person["id"], Value::String(key.clone()));
    }
    assert!(people.get("nobody").is_none());
    assert_eq!(people["john_1"]["name"], "John (the Baptist)");
    assert_eq!(people["john_2"]["name"], "John (son of Zebedee)");
    assert_eq!(people["adam_1"]["name"], "Adam");
    assert_eq!(people["adam_1"]["firstMention"], "Genesis");
    assert_eq!(people["adam_1"]["spouses"], json!(["Eve"]));
    assert_eq!(people["zoe_1"]["name"], "Zo\u{eb}");
}

#[tokio::test]
async fn children_reference_known_people_only() {
    let (_source, output, _) = run_fixture().await;
    let people = read_json(&output.path().join("people.json"));
    let children = read_json(&output.path().join("children.json"));
    assert_eq!(children["adam_1"], json!(["cain_1", "abel_1"]));
    for ids in children.as_object().expect("map").values() {
        for id in ids.as_array().expect("list") {
            let id = id.as_str().expect("string id");
            assert!(people.get(id).is_some(), "dangling child {id}");
        }
    }
}

#[tokio::test]
async fn aliases_rank_by_verse_count() {
    let (_source, output, _) = run_fixture().await;
    let aliases = read_json(&output.path().join("aliases.json"));
    assert_eq!(aliases["john"], json!(["john_2", "john_1"]));
    assert_eq!(aliases["adam"], json!(["adam_1"]));

    let mut seen = HashSet::new();
    for ids in aliases.as_object().expect("map").values() {
        for id in ids.as_array().expect("list") {
            assert!(seen.insert(id.as_str().expect("id").to_string()));
        }
    }
    assert_eq!(seen.len(), 8);
}

#[tokio::test]
async fn root_is_adam_with_loaded_children() {
    let (_source, output, _) = run_fixture().await;
    let root = read_json(&output.path().join("root.json"));
    assert_eq!(root["id"], "adam_1");
    assert_eq!(root["hasLoadedChildren"], true);
    assert_eq!(root["attributes"]["firstMention"], "Genesis");

    let child_ids: Vec<&str> = root["children"]
        .as_array()
        .expect("children")
        .iter()
        .map(|c| c["id"].as_str().expect("id"))
        .collect();
    assert_eq!(child_ids, vec!["cain_1", "abel_1", "eve_1"]);
    for child in root["children"].as_array().expect("children") {
        assert_eq!(child["hasLoadedChildren"], false);
        assert!(child.get("children").is_none());
    }
}

#[tokio::test]
async fn details_partition_every_person_once() {
    let (_source, output, _) = run_fixture().await;
    let details_dir = output.path().join("details");

    let mut bucket_names: Vec<String> = fs::read_dir(&details_dir)
        .expect("details")
        .map(|e| e.expect("entry").file_name().to_string_lossy().to_string())
        .collect();
    bucket_names.sort();
    assert_eq!(
        bucket_names,
        vec!["a.json", "c.json", "e.json", "j.json", "other.json", "z.json"]
    );

    let mut keys = Vec::new();
    for name in &bucket_names {
        let bucket = read_json(&details_dir.join(name));
        keys.extend(bucket.as_object().expect("map").keys().cloned());
    }
    keys.sort();
    let mut expected = vec![
        "7_sons", "abel_1", "adam_1", "cain_1", "eve_1", "john_1", "john_2", "zoe_1",
    ];
    expected.sort();
    assert_eq!(keys, expected);

    let a = read_json(&details_dir.join("a.json"));
    let adam = &a["adam_1"];
    assert_eq!(
        adam["scriptures"],
        json!([
            "Genesis 2:1",
            "Genesis 2:2",
            "Genesis 2:3",
            "Genesis 2:4",
            "Genesis 2:5",
            "Genesis 2:6"
        ])
    );
    assert_eq!(
        adam["bio"],
        "Adam was the first man. He was made from dust. He lived in Eden."
    );
    assert_eq!(adam["childrenIds"], json!(["cain_1", "abel_1"]));
    assert_eq!(adam["children"], json!(["Cain", "Abel"]));
    assert_eq!(adam["spousesIds"], json!(["eve_1"]));

    let c = read_json(&details_dir.join("c.json"));
    assert_eq!(c["cain_1"]["parentsIds"], json!(["adam_1", "eve_1"]));
    assert_eq!(c["cain_1"]["bio"], Value::Null);
}

#[tokio::test]
async fn rerun_is_byte_identical_and_drops_stale_buckets() {
    let (source, output, _) = run_fixture().await;
    let first = snapshot(output.path());

    fs::write(output.path().join("details").join("q.json"), b"{}").expect("stale bucket");

    let config = Config::new(
        source.path().display().to_string(),
        &output.path().display().to_string(),
    )
    .expect("config");
    run(&config).await.expect("second run");

    assert_eq!(snapshot(output.path()), first);
}

#[tokio::test]
async fn missing_table_aborts_without_output() {
    let source = tempfile::tempdir().expect("source dir");
    let output = tempfile::tempdir().expect("output dir");
    seed_source(source.path());
    fs::remove_file(source.path().join("chapters.json")).expect("remove table");

    let out_dir = output.path().join("data");
    let config = Config::new(
        source.path().display().to_string(),
        &out_dir.display().to_string(),
    )
    .expect("config");

    assert!(run(&config).await.is_err());
    assert!(!out_dir.exists());
}
