// Tests for document and kind output
//
// Output goes to a temporary file so each test can read back exactly what
// the writer produced.

use super::*;
use gqlpoint_core::AstDocument;
use std::fs;
use tempfile::NamedTempFile;

fn writer(format: OutputFormat, quiet: bool) -> (OutputWriter, NamedTempFile) {
    let (output, file, _) = writers(format, quiet);
    (output, file)
}

fn writers(format: OutputFormat, quiet: bool) -> (OutputWriter, NamedTempFile, NamedTempFile) {
    let out = NamedTempFile::new().unwrap();
    let messages = NamedTempFile::new().unwrap();
    let output = OutputWriter::with_writers(
        format,
        false,
        quiet,
        Box::new(out.reopen().unwrap()),
        Box::new(messages.reopen().unwrap()),
    );
    (output, out, messages)
}

fn document_file(path: &str, sdl: &str) -> DocumentFile {
    DocumentFile {
        file_path: path.to_string(),
        content: AstDocument::parse(sdl, path).unwrap(),
    }
}

#[test]
fn test_human_documents_have_path_headers() {
    let (mut output, file) = writer(OutputFormat::Human, false);
    let files = vec![
        document_file("types.graphql", "type User { id: ID! }"),
        document_file("ops.graphql", "query Me { me { id } }"),
    ];
    output.documents(&files, false).unwrap();

    let written = fs::read_to_string(file.path()).unwrap();
    let types_at = written.find("# types.graphql").unwrap();
    let ops_at = written.find("# ops.graphql").unwrap();
    assert!(types_at < ops_at);
    assert!(written.contains("type User"));
    assert!(written.contains("query Me"));
}

#[test]
fn test_human_merged_documents() {
    let (mut output, file) = writer(OutputFormat::Human, false);
    let files = vec![
        document_file("a.graphql", "scalar Date"),
        document_file("b.graphql", "type Query { now: Date }"),
    ];
    output.documents(&files, true).unwrap();

    let written = fs::read_to_string(file.path()).unwrap();
    assert!(!written.contains("# a.graphql"));
    assert!(written.find("scalar Date").unwrap() < written.find("type Query").unwrap());
    assert!(written.ends_with('\n'));
}

#[test]
fn test_json_source_reports() {
    let (mut output, file) = writer(OutputFormat::Json, false);
    let files = vec![document_file("schema.graphql", "scalar Date type Query { now: Date }")];
    output.documents(&files, false).unwrap();

    let written = fs::read_to_string(file.path()).unwrap();
    let value: serde_json::Value = serde_json::from_str(written.trim()).unwrap();
    let report = &value[0];
    assert_eq!(report["file_path"], "schema.graphql");
    assert_eq!(
        report["kinds"],
        serde_json::json!(["ScalarTypeDefinition", "ObjectTypeDefinition"])
    );
    assert_eq!(report["names"], serde_json::json!(["Date", "Query"]));
    assert!(report["sdl"].as_str().unwrap().contains("scalar Date"));
}

#[test]
fn test_yaml_merged_report() {
    let (mut output, file) = writer(OutputFormat::Yaml, false);
    let files = vec![
        document_file("a.graphql", "scalar Date"),
        document_file("b.graphql", "scalar Time"),
    ];
    output.documents(&files, true).unwrap();

    let written = fs::read_to_string(file.path()).unwrap();
    let report: serde_yaml::Value = serde_yaml::from_str(&written).unwrap();
    assert_eq!(report["definitions"], serde_yaml::Value::from(2));
    assert_eq!(report["sources"][1], serde_yaml::Value::from("b.graphql"));
}

#[test]
fn test_messages_stay_off_the_result_stream() {
    let (mut output, file, messages) = writers(OutputFormat::Human, false);
    output.info("loading").unwrap();
    output.success("done").unwrap();
    output.documents(&[document_file("a.graphql", "scalar Date")], false).unwrap();

    let written = fs::read_to_string(file.path()).unwrap();
    assert!(!written.contains("loading"));
    assert!(written.contains("scalar Date"));
    let status = fs::read_to_string(messages.path()).unwrap();
    assert_eq!(status, "INFO: loading\ndone\n");
}

#[test]
fn test_quiet_suppresses_messages_but_not_data() {
    let (mut output, file, messages) = writers(OutputFormat::Human, true);
    output.info("loading").unwrap();
    output.success("done").unwrap();
    output.documents(&[document_file("a.graphql", "scalar Date")], false).unwrap();

    assert!(fs::read_to_string(messages.path()).unwrap().is_empty());
    assert!(fs::read_to_string(file.path()).unwrap().contains("scalar Date"));
}

#[test]
fn test_kinds_listing() {
    let (mut output, file) = writer(OutputFormat::Human, false);
    output.kinds().unwrap();
    let written = fs::read_to_string(file.path()).unwrap();
    assert_eq!(written.lines().count(), Kind::all().count());
    assert!(written.lines().any(|l| l.starts_with("OperationDefinition") && l.ends_with("document")));
    assert!(written.lines().any(|l| l.starts_with("ScalarTypeDefinition") && l.ends_with("schema")));

    let (mut output, file) = writer(OutputFormat::Json, false);
    output.kinds().unwrap();
    let value: serde_json::Value =
        serde_json::from_str(fs::read_to_string(file.path()).unwrap().trim()).unwrap();
    assert_eq!(value[0]["executable"], true);
}
