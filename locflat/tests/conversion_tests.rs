use locflat::{
    Conversion, ConvertOptions, Error, JsonLayout, convert,
    formats::{CSVRecord, XmlFormat, csv::read_records_from},
    traits::Parser,
};
use serde_json::{Value, json};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write_json(path: &Path, value: &Value) {
    fs::write(path, serde_json::to_string_pretty(value).unwrap()).unwrap();
}

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

fn sample_tree() -> Value {
    json!({
        "app": { "name": "Demo", "tagline": "Fast, simple" },
        "menu": { "items": ["Open", "Save", "Quit"], "recent": [] },
        "settings": {},
        "dialogs": [{ "title": "Confirm", "buttons": { "ok": "OK", "cancel": "Cancel" } }]
    })
}

#[test]
fn test_json_to_csv_flattens_keys() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("en.json");
    let output = dir.path().join("en.csv");
    write_json(&source, &json!({ "a": { "b": [10, 20] }, "c": "x" }));

    let summary = convert(Conversion::JsonToCsv, &source, &output, &ConvertOptions::new()).unwrap();
    assert_eq!(summary.entries, 3);
    assert_eq!(summary.translated, 0);

    let content = fs::read_to_string(&output).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(
        lines,
        [
            r#""key","string_value","translated_value","remarks""#,
            r#""a.b[0]","10","","""#,
            r#""a.b[1]","20","","""#,
            r#""c","x","","""#,
        ]
    );
}

#[test]
fn test_json_csv_json_round_trip() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("en.json");
    let table = dir.path().join("en.csv");
    let back = dir.path().join("back.json");
    let tree = sample_tree();
    write_json(&source, &tree);

    let options = ConvertOptions::new();
    convert(Conversion::JsonToCsv, &source, &table, &options).unwrap();
    convert(Conversion::CsvToJson, &table, &back, &options).unwrap();

    let rebuilt = read_json(&back);
    assert_eq!(rebuilt, tree);
    assert_eq!(
        serde_json::to_string(&rebuilt).unwrap(),
        serde_json::to_string(&tree).unwrap()
    );
}

#[test]
fn test_typed_scalars_survive_round_trip_with_inference() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("config.json");
    let table = dir.path().join("config.csv");
    let back = dir.path().join("config_back.json");
    let tree = json!({ "limits": { "max": 10, "ratio": 0.5 }, "enabled": true, "owner": null });
    write_json(&source, &tree);

    let options = ConvertOptions::new().with_infer_scalars(true);
    convert(Conversion::JsonToCsv, &source, &table, &options).unwrap();
    convert(Conversion::CsvToJson, &table, &back, &options).unwrap();
    assert_eq!(read_json(&back), tree);
}

#[test]
fn test_typed_scalars_become_strings_without_inference() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("config.json");
    let table = dir.path().join("config.csv");
    let back = dir.path().join("config_back.json");
    write_json(
        &source,
        &json!({ "limits": { "max": 10 }, "enabled": true, "owner": null, "tags": [] }),
    );

    let options = ConvertOptions::new();
    convert(Conversion::JsonToCsv, &source, &table, &options).unwrap();
    convert(Conversion::CsvToJson, &table, &back, &options).unwrap();
    assert_eq!(
        read_json(&back),
        json!({ "limits": { "max": "10" }, "enabled": "true", "owner": "null", "tags": [] })
    );
}

#[test]
fn test_scalars_read_back_as_strings_without_inference() {
    let dir = TempDir::new().unwrap();
    let table = dir.path().join("t.csv");
    let out = dir.path().join("t.json");
    fs::write(&table, "key,string_value\ncount,3\nflag,true\n").unwrap();

    convert(Conversion::CsvToJson, &table, &out, &ConvertOptions::new()).unwrap();
    assert_eq!(read_json(&out), json!({ "count": "3", "flag": "true" }));
}

#[test]
fn test_json_to_csv_with_translation_join() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("en.json");
    let translation = dir.path().join("fr.json");
    let output = dir.path().join("fr.csv");
    write_json(&source, &json!({ "greeting": { "hello": "Hello", "bye": "Bye" } }));
    write_json(&translation, &json!({ "greeting": { "hello": "Bonjour" }, "extra": "ignored" }));

    let options = ConvertOptions::new().with_translation(Some(translation));
    let summary = convert(Conversion::JsonToCsv, &source, &output, &options).unwrap();
    assert_eq!(summary.entries, 2);
    assert_eq!(summary.translated, 1);

    let rows = Vec::<CSVRecord>::read_from(&output).unwrap();
    assert_eq!(rows[0].key, "greeting.hello");
    assert_eq!(rows[0].translated_value.as_deref(), Some("Bonjour"));
    assert_eq!(rows[1].key, "greeting.bye");
    assert_eq!(rows[1].translated_value, None);
    assert!(rows.iter().all(|row| row.key != "extra"));
}

#[test]
fn test_xml_to_csv_two_resources() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("strings.xml");
    let output = dir.path().join("strings.csv");
    fs::write(
        &source,
        r#"<resources>
    <string name="app_name">Demo</string>
    <string name="greeting">Hello</string>
</resources>"#,
    )
    .unwrap();

    convert(Conversion::XmlToCsv, &source, &output, &ConvertOptions::new()).unwrap();

    let rows = Vec::<CSVRecord>::read_from(&output).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!((rows[0].key.as_str(), rows[0].string_value.as_str()), ("app_name", "Demo"));
    assert_eq!((rows[1].key.as_str(), rows[1].string_value.as_str()), ("greeting", "Hello"));
    assert!(rows.iter().all(|row| row.translated_value.is_none() && row.remarks.is_empty()));
}

#[test]
fn test_xml_to_csv_with_translation() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("en.xml");
    let translation = dir.path().join("de.xml");
    let output = dir.path().join("de.csv");
    fs::write(
        &source,
        r#"<resources><string name="hello">Hello</string><string name="bye">Bye</string></resources>"#,
    )
    .unwrap();
    fs::write(&translation, r#"<resources><string name="bye">Tschüss</string></resources>"#).unwrap();

    let options = ConvertOptions::new().with_translation(Some(translation));
    convert(Conversion::XmlToCsv, &source, &output, &options).unwrap();

    let rows = Vec::<CSVRecord>::read_from(&output).unwrap();
    assert_eq!(rows[0].translated_value, None);
    assert_eq!(rows[1].translated_value.as_deref(), Some("Tschüss"));
}

#[test]
fn test_translation_without_root_is_empty_lookup() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("en.xml");
    let translation = dir.path().join("broken.xml");
    let output = dir.path().join("out.csv");
    fs::write(&source, r#"<resources><string name="a">A</string></resources>"#).unwrap();
    fs::write(&translation, "<other/>").unwrap();

    let options = ConvertOptions::new().with_translation(Some(translation));
    let summary = convert(Conversion::XmlToCsv, &source, &output, &options).unwrap();
    assert_eq!(summary.translated, 0);
}

#[test]
fn test_csv_to_xml_keeps_order_and_escapes() {
    let dir = TempDir::new().unwrap();
    let table = dir.path().join("in.csv");
    let output = dir.path().join("out.xml");
    fs::write(
        &table,
        "\"key\",\"string_value\",\"translated_value\",\"remarks\"\n\"z\",\"Last <b>bold</b>\",\"\",\"\"\n\"a\",\"First\",\"\",\"\"\n",
    )
    .unwrap();

    convert(Conversion::CsvToXml, &table, &output, &ConvertOptions::new()).unwrap();

    let content = fs::read_to_string(&output).unwrap();
    assert!(content.contains("<![CDATA[Last <b>bold</b>]]>"));
    let format = XmlFormat::read_from(&output).unwrap();
    assert_eq!(format.strings[0].name, "z");
    assert_eq!(format.strings[0].value, "Last <b>bold</b>");
    assert_eq!(format.strings[1].name, "a");
}

#[test]
fn test_csv_value_column_override() {
    let dir = TempDir::new().unwrap();
    let table = dir.path().join("in.csv");
    let output = dir.path().join("fr.json");
    fs::write(
        &table,
        "key,string_value,translated_value\nmenu.open,Open,Ouvrir\nmenu.close,Close,Fermer\n",
    )
    .unwrap();

    let options = ConvertOptions::new().with_value_column(Some("translated_value".to_string()));
    convert(Conversion::CsvToJson, &table, &output, &options).unwrap();
    assert_eq!(read_json(&output), json!({ "menu": { "open": "Ouvrir", "close": "Fermer" } }));
}

#[test]
fn test_xml_json_round_trip_through_path_keys() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("en.json");
    let xml = dir.path().join("en.xml");
    let back = dir.path().join("back.json");
    let tree = sample_tree();
    write_json(&source, &tree);

    let options = ConvertOptions::new();
    convert(Conversion::JsonToXml, &source, &xml, &options).unwrap();
    convert(Conversion::XmlToJson, &xml, &back, &options).unwrap();
    assert_eq!(read_json(&back), tree);
}

#[test]
fn test_commonjs_module_source_and_output() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("en.js");
    let table = dir.path().join("en.csv");
    let back = dir.path().join("back.js");
    fs::write(&source, "module.exports = {\n    \"title\": \"Home\"\n};").unwrap();

    convert(Conversion::JsonToCsv, &source, &table, &ConvertOptions::new()).unwrap();
    let options = ConvertOptions::new().with_json_layout(JsonLayout::CommonJs);
    convert(Conversion::CsvToJson, &table, &back, &options).unwrap();

    assert_eq!(
        fs::read_to_string(&back).unwrap(),
        "module.exports = {\n    \"title\": \"Home\"\n};\n"
    );
}

#[test]
fn test_empty_xml_source_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("empty.xml");
    let output = dir.path().join("out.csv");
    fs::write(&source, "<?xml version=\"1.0\"?><resources></resources>").unwrap();

    let err = convert(Conversion::XmlToCsv, &source, &output, &ConvertOptions::new()).unwrap_err();
    assert!(matches!(err, Error::EmptySource(_)));
    assert!(!output.exists());
}

#[test]
fn test_missing_source_is_source_read_failure() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out.csv");

    let err = convert(
        Conversion::JsonToCsv,
        dir.path().join("missing.json"),
        &output,
        &ConvertOptions::new(),
    )
    .unwrap_err();
    assert!(matches!(err, Error::SourceRead { .. }));
    assert!(err.to_string().contains("missing.json"));
    assert!(!output.exists());
}

#[test]
fn test_malformed_json_is_source_read_failure() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("bad.json");
    let output = dir.path().join("out.csv");
    fs::write(&source, "{ \"a\": ").unwrap();

    let err = convert(Conversion::JsonToCsv, &source, &output, &ConvertOptions::new()).unwrap_err();
    match err {
        Error::SourceRead { source, .. } => assert!(matches!(*source, Error::Parse(_))),
        other => panic!("unexpected error: {other}"),
    }
    assert!(!output.exists());
}

#[test]
fn test_missing_value_column_is_source_read_failure() {
    let dir = TempDir::new().unwrap();
    let table = dir.path().join("in.csv");
    let output = dir.path().join("out.json");
    fs::write(&table, "key,string_value\na,b\n").unwrap();

    let options = ConvertOptions::new().with_value_column(Some("fr".to_string()));
    let err = convert(Conversion::CsvToJson, &table, &output, &options).unwrap_err();
    assert!(matches!(err, Error::SourceRead { .. }));
}

#[test]
fn test_unwritable_destination() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("en.json");
    write_json(&source, &json!({ "a": "x" }));
    let output = dir.path().join("no_such_dir").join("out.csv");

    let err = convert(Conversion::JsonToCsv, &source, &output, &ConvertOptions::new()).unwrap_err();
    assert!(matches!(err, Error::DestinationWrite { .. }));
}

#[test]
fn test_bom_prefixed_csv_header() {
    let dir = TempDir::new().unwrap();
    let table = dir.path().join("excel.csv");
    fs::write(&table, b"\xEF\xBB\xBFkey,string_value\nhello,Hello\n").unwrap();

    let rows = read_records_from(&table, "string_value").unwrap();
    assert_eq!(rows[0].key, "hello");
}
