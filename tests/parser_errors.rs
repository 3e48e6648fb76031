// Parser error path tests
// Malformed or mis-shaped documents must be rejected before generation runs

use miette::{Diagnostic, GraphicalReportHandler, GraphicalTheme};
use schema_to_zod::compile;
use schema_to_zod::error::{ParserError, SchemaError};

fn parser_err(source: &str, file_name: &str) -> ParserError {
    match compile(source, file_name) {
        Ok(bundle) => panic!("Expected a ParserError, but got:\n{bundle}"),
        Err(SchemaError::Parser(err)) => err,
        Err(other) => panic!("Expected a ParserError, but got {other:?}"),
    }
}

fn render(err: &ParserError) -> String {
    let mut out = String::new();
    GraphicalReportHandler::new_themed(GraphicalTheme::unicode_nocolor())
        .render_report(&mut out, err)
        .unwrap();
    out
}

#[test]
fn test_parser_error_truncated_json() {
    let err = parser_err("{ \"type\": \"object\"", "test.json");
    assert!(matches!(err, ParserError::InvalidJson { .. }), "{err:?}");
}

#[test]
fn test_parser_error_trailing_comma() {
    let err = parser_err("{ \"type\": \"string\", }", "test.json");
    assert!(matches!(err, ParserError::InvalidJson { .. }));
}

#[test]
fn test_parser_error_unknown_type_tag() {
    let source = r#"{
  "type": "object",
  "properties": {
    "name": { "type": "text" }
  }
}"#;
    match parser_err(source, "test.json") {
        ParserError::InvalidJson { path, span, .. } => {
            assert_eq!(path, "properties.name.type");
            let line = source[..span.offset()].matches('\n').count() + 1;
            assert_eq!(line, 4, "span should point at the offending line");
        }
        other => panic!("Expected InvalidJson, got {other:?}"),
    }
}

#[test]
fn test_parser_error_wrong_keyword_shape() {
    let err = parser_err(r#"{ "minLength": "three" }"#, "test.json");
    match err {
        ParserError::InvalidJson { path, .. } => assert_eq!(path, "minLength"),
        other => panic!("Expected InvalidJson, got {other:?}"),
    }
}

#[test]
fn test_parser_error_required_not_list() {
    let err = parser_err(r#"{ "required": "name" }"#, "test.json");
    assert!(matches!(err, ParserError::InvalidJson { .. }));
}

#[test]
fn test_parser_error_yaml_indentation() {
    let source = "type: object\nproperties:\n  name:\n    type: string\n   bad: [\n";
    let err = parser_err(source, "test.yaml");
    assert!(matches!(err, ParserError::InvalidYaml { .. }), "{err:?}");
}

#[test]
fn test_parser_error_yaml_wrong_shape() {
    let source = "type: array\nitems: [1, 2]\n";
    match parser_err(source, "test.yml") {
        ParserError::InvalidYaml { path, .. } => assert_eq!(path, "items"),
        other => panic!("Expected InvalidYaml, got {other:?}"),
    }
}

#[test]
fn test_parser_error_unsupported_extension() {
    let err = parser_err("{}", "schema.toml");
    assert!(matches!(err, ParserError::UnsupportedFormat { .. }));
    assert_eq!(
        err.code().map(|c| c.to_string()).as_deref(),
        Some("parser::unsupported_format")
    );
}

#[test]
fn test_parser_error_report_names_the_file() {
    let err = parser_err("{ \"type\": 5 }", "broken.json");
    let report = render(&err);
    assert!(report.contains("broken.json"), "{report}");
    assert!(report.contains("parser::invalid_json"), "{report}");
}
