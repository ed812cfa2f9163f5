use serde_json::json;
use std::path::PathBuf;
use tempfile::TempDir;
use widget_manifest_core::{
    parse_manifest, ErrorStyle, FileManifestLoader, JsonManifestLoader, ParseError, ParserConfig,
};

fn write_manifest(dir: &TempDir, document: serde_json::Value) -> PathBuf {
    let path = dir.path().join("config.json");
    std::fs::write(&path, document.to_string()).expect("write manifest fixture");
    path
}

fn loader() -> JsonManifestLoader {
    JsonManifestLoader::new(ParserConfig::default().max_document_bytes)
}

fn base_widget() -> serde_json::Value {
    json!({
        "widget": {
            "@version": "1.0",
            "name": "MyApp",
            "tizen:application": {
                "@id": "pkg0000001.MyApp",
                "@package": "pkg0000001",
                "@required_version": "3.0"
            }
        }
    })
}

fn parse(document: serde_json::Value) -> Result<widget_manifest_core::ManifestRecord, ParseError> {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = write_manifest(&dir, document);
    let path = path.to_str().expect("UTF-8 path").to_string();
    parse_manifest(Some(path.as_str()), &loader())
}

#[test]
fn well_formed_manifest_without_privileges() {
    let record = parse(base_widget()).expect("parse");
    assert_eq!(record.name, "MyApp");
    assert_eq!(record.version, "1.0");
    assert_eq!(record.api_version, "3.0");
    assert_eq!(record.short_name, "");
    assert_eq!(record.icon, "");
    assert_eq!(record.privilege_count(), 0);
}

#[test]
fn single_privilege_dictionary_yields_one_entry() {
    let mut document = base_widget();
    document["widget"]["privilege"] = json!({ "@name": "X" });
    let record = parse(document).expect("parse");
    assert_eq!(record.privileges, vec!["X".to_string()]);
}

#[test]
fn privilege_list_keeps_document_order() {
    let mut document = base_widget();
    document["widget"]["privilege"] = json!([
        { "@name": "third" },
        { "@name": "first" },
        { "@name": "second" }
    ]);
    let record = parse(document).expect("parse");
    assert_eq!(record.privileges, vec!["third", "first", "second"]);
}

#[test]
fn bare_scalar_privilege_group_is_tolerated() {
    let mut document = base_widget();
    document["widget"]["privilege"] = json!("http://tizen.org/privilege/internet");
    let record = parse(document).expect("parse");
    assert_eq!(record.privilege_count(), 0);
}

#[test]
fn privilege_without_name_fails_the_parse() {
    let mut document = base_widget();
    document["widget"]["privilege"] = json!([{ "@name": "ok" }, { "@id": "broken" }]);
    let err = parse(document).unwrap_err();
    assert_eq!(err.to_string(), "Cannot find mandatory key. Key name: @name");
}

#[test]
fn icon_without_src_is_reported_before_privileges() {
    let mut document = base_widget();
    document["widget"]["icon"] = json!({ "@width": "64" });
    document["widget"]["privilege"] = json!([{ "@id": "broken" }]);
    let err = parse(document).unwrap_err();
    assert_eq!(err.to_string(), "Cannot find mandatory key. Key name: @src");
}

#[test]
fn missing_version_uses_value_not_found_message() {
    let mut document = base_widget();
    document["widget"]
        .as_object_mut()
        .expect("widget object")
        .remove("@version");
    let err = parse(document).unwrap_err();
    assert_eq!(err.to_string(), "Value not found. Value name: version");
}

#[test]
fn missing_required_version_in_legacy_style() {
    let mut document = base_widget();
    document["widget"]["tizen:application"]
        .as_object_mut()
        .expect("application object")
        .remove("@required_version");
    let err = parse(document).unwrap_err();
    assert_eq!(
        err.message(ErrorStyle::Legacy),
        "Required version not found."
    );
    assert_eq!(
        err.message(ErrorStyle::Canonical),
        "Value not found. Value name: required_version"
    );
}

#[test]
fn loader_failures_surface_verbatim() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("config.json");
    std::fs::write(&path, "<widget/>").expect("write fixture");
    let path = path.to_str().expect("UTF-8 path").to_string();

    let err = parse_manifest(Some(path.as_str()), &loader()).unwrap_err();
    assert!(matches!(err, ParseError::Load(_)));
    assert!(err.to_string().starts_with("Manifest is not valid JSON"));
}

#[test]
fn xml_config_yields_the_same_record_shape() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("config.xml");
    std::fs::write(
        &path,
        r#"<?xml version="1.0" encoding="UTF-8"?>
<widget xmlns="http://www.w3.org/ns/widgets" xmlns:tizen="http://tizen.org/ns/widgets"
        version="1.2.0">
    <tizen:application id="pkg0000001.MyApp" package="pkg0000001" required_version="3.0"/>
    <name short="Mine">MyApp</name>
    <icon src="icon.png"/>
    <icon src="icon-large.png"/>
    <privilege name="http://tizen.org/privilege/internet"/>
    <privilege name="http://tizen.org/privilege/alarm"/>
</widget>"#,
    )
    .expect("write manifest fixture");

    let loader = FileManifestLoader::new(ParserConfig::default().max_document_bytes);
    let record =
        parse_manifest(Some(path.to_str().expect("UTF-8 path")), &loader).expect("parse");
    assert_eq!(record.package, "pkg0000001");
    assert_eq!(record.id, "pkg0000001.MyApp");
    assert_eq!(record.name, "MyApp");
    assert_eq!(record.short_name, "Mine");
    assert_eq!(record.version, "1.2.0");
    assert_eq!(record.icon, "icon.png");
    assert_eq!(record.api_version, "3.0");
    assert_eq!(
        record.privileges,
        vec![
            "http://tizen.org/privilege/internet".to_string(),
            "http://tizen.org/privilege/alarm".to_string(),
        ]
    );
}
