use modconf_fs::{Document, DocumentLoader, Error, NormalizedPath};
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::TempDir;

fn write(temp: &TempDir, rel: &str, content: &str) -> NormalizedPath {
    let path = temp.path().join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    NormalizedPath::new(path)
}

fn yaml(doc: Document) -> serde_yaml::Value {
    match doc {
        Document::Yaml(value) => value,
        other => panic!("expected YAML, got {other:?}"),
    }
}

#[test]
fn test_load_json_document() {
    let temp = TempDir::new().unwrap();
    let path = write(&temp, "data.json", r#"{"k": 1}"#);

    let doc = DocumentLoader::new().load(&path).unwrap();
    assert_eq!(doc, Document::Json(serde_json::json!({"k": 1})));
    assert!(doc.is_composite());
}

#[test]
fn test_load_toml_document() {
    let temp = TempDir::new().unwrap();
    let path = write(&temp, "data.toml", "name = \"app\"\nport = 8080\n");

    let Document::Toml(value) = DocumentLoader::new().load(&path).unwrap() else {
        panic!("expected TOML");
    };
    assert_eq!(value["name"].as_str(), Some("app"));
    assert_eq!(value["port"].as_integer(), Some(8080));
}

#[test]
fn test_include_is_expanded_relative_to_including_file() {
    let temp = TempDir::new().unwrap();
    write(&temp, "conf/parts/db.yaml", "host: localhost\nport: 5432\n");
    let main = write(&temp, "conf/main.yaml", "name: app\ndb: !include parts/db.yaml\n");

    let value = yaml(DocumentLoader::new().load(&main).unwrap());
    assert_eq!(value["name"].as_str(), Some("app"));
    assert_eq!(value["db"]["host"].as_str(), Some("localhost"));
    assert_eq!(value["db"]["port"].as_u64(), Some(5432));
}

#[test]
fn test_nested_includes_use_their_own_directory() {
    let temp = TempDir::new().unwrap();
    write(&temp, "a/b/leaf.json", r#"{"deep": true}"#);
    write(&temp, "a/mid.yaml", "leaf: !include b/leaf.json\n");
    let main = write(&temp, "main.yaml", "items:\n  - !include a/mid.yaml\n");

    let value = yaml(DocumentLoader::new().load(&main).unwrap());
    assert_eq!(value["items"][0]["leaf"]["deep"].as_bool(), Some(true));
}

#[test]
fn test_include_cycle_is_an_error() {
    let temp = TempDir::new().unwrap();
    write(&temp, "a.yaml", "next: !include b.yaml\n");
    let b = write(&temp, "b.yaml", "next: !include a.yaml\n");

    let err = DocumentLoader::new().load(&b).unwrap_err();
    assert!(matches!(err, Error::IncludeCycle { .. }), "got {err:?}");
}

#[test]
fn test_include_requires_string_target() {
    let temp = TempDir::new().unwrap();
    let main = write(&temp, "main.yaml", "x: !include [a, b]\n");

    let err = DocumentLoader::new().load(&main).unwrap_err();
    assert!(matches!(err, Error::InvalidInclude { .. }), "got {err:?}");
}

#[test]
fn test_missing_include_reports_io_error() {
    let temp = TempDir::new().unwrap();
    let main = write(&temp, "main.yaml", "x: !include nope.yaml\n");

    let err = DocumentLoader::new().load(&main).unwrap_err();
    assert_eq!(err.io_kind(), Some(std::io::ErrorKind::NotFound));
}

#[test]
fn test_invalid_json_is_a_parse_error() {
    let temp = TempDir::new().unwrap();
    let path = write(&temp, "bad.json", "{not json");

    let err = DocumentLoader::new().load(&path).unwrap_err();
    match err {
        Error::ConfigParse { format, .. } => assert_eq!(format, "JSON"),
        other => panic!("unexpected error: {other:?}"),
    }
}
