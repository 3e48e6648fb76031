use crate::ast::Schema;
use crate::error::{ParserError, SchemaError};
use crate::utils::offset_of;
use miette::{NamedSource, SourceSpan};
use serde::de::DeserializeOwned;
use std::path::Path;

/// Surface syntax of a schema document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Json,
    Yaml,
}

impl SourceFormat {
    /// Picks the format from the file extension: `.json`, `.yaml` or `.yml`.
    pub fn from_file_name(file_name: &str) -> Result<Self, SchemaError> {
        let extension = Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("json") => Ok(SourceFormat::Json),
            Some("yaml" | "yml") => Ok(SourceFormat::Yaml),
            _ => Err(ParserError::UnsupportedFormat {
                file_name: file_name.to_string(),
            }
            .into()),
        }
    }
}

/// Parses and shape-validates a schema document into the [`Schema`] IR.
///
/// Every keyword is checked against its expected shape while deserializing, so a
/// document that makes it through here can be compiled without further checks.
#[derive(Debug)]
pub struct Parser<'a> {
    source_text: &'a str,
    name: String,
    format: SourceFormat,
}

impl<'a> Parser<'a> {
    pub fn new(source_text: &'a str) -> Result<Self, SchemaError> {
        Self::new_with_name(source_text, "schema.json".to_string())
    }

    pub fn new_with_name(source_text: &'a str, name: String) -> Result<Self, SchemaError> {
        let format = SourceFormat::from_file_name(&name)?;
        Ok(Self {
            source_text,
            name,
            format,
        })
    }

    pub fn format(&self) -> SourceFormat {
        self.format
    }

    pub fn parse_document(&mut self) -> Result<Schema, SchemaError> {
        let schema = match self.format {
            SourceFormat::Json => self.parse_json()?,
            SourceFormat::Yaml => self.parse_yaml()?,
        };
        log::debug!("parsed `{}` as {:?}", self.name, self.format);
        Ok(schema)
    }

    fn parse_json<T: DeserializeOwned>(&self) -> Result<T, SchemaError> {
        let de = &mut serde_json::Deserializer::from_str(self.source_text);
        serde_path_to_error::deserialize(de).map_err(|err| {
            let path = err.path().to_string();
            let inner = err.into_inner();
            let offset = offset_of(self.source_text, inner.line(), inner.column());
            ParserError::InvalidJson {
                src: self.named_source(),
                span: self.span_at(offset),
                path,
                message: inner.to_string(),
            }
            .into()
        })
    }

    fn parse_yaml<T: DeserializeOwned>(&self) -> Result<T, SchemaError> {
        let de = serde_yaml::Deserializer::from_str(self.source_text);
        serde_path_to_error::deserialize(de).map_err(|err| {
            let path = err.path().to_string();
            let inner = err.into_inner();
            let offset = inner.location().map_or(0, |location| location.index());
            ParserError::InvalidYaml {
                src: self.named_source(),
                span: self.span_at(offset),
                path,
                message: inner.to_string(),
            }
            .into()
        })
    }

    fn named_source(&self) -> NamedSource<String> {
        NamedSource::new(self.name.clone(), self.source_text.to_string())
    }

    /// A one-character span at `offset`, or an empty one at the end of input.
    fn span_at(&self, offset: usize) -> SourceSpan {
        let offset = offset.min(self.source_text.len());
        let len = usize::from(offset < self.source_text.len());
        (offset, len).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::TypeTag;

    fn parse_ok(source: &str, name: &str) -> Schema {
        let mut parser = Parser::new_with_name(source, name.to_string()).unwrap();
        parser.parse_document().unwrap()
    }

    #[test]
    fn test_format_detection() {
        assert_eq!(SourceFormat::from_file_name("a.json").unwrap(), SourceFormat::Json);
        assert_eq!(SourceFormat::from_file_name("a.YAML").unwrap(), SourceFormat::Yaml);
        assert_eq!(SourceFormat::from_file_name("dir/a.yml").unwrap(), SourceFormat::Yaml);
        assert!(SourceFormat::from_file_name("a.toml").is_err());
        assert!(SourceFormat::from_file_name("noext").is_err());
    }

    #[test]
    fn test_parse_json_document() {
        let schema = parse_ok(r#"{"title": "user", "type": "object"}"#, "user.json");
        assert_eq!(schema.title.as_deref(), Some("user"));
        assert_eq!(schema.primary_type(), Some(TypeTag::Object));
    }

    #[test]
    fn test_parse_yaml_document() {
        let schema = parse_ok("type: array\nitems:\n  type: string\n", "list.yaml");
        assert_eq!(schema.primary_type(), Some(TypeTag::Array));
        assert!(schema.items.is_some());
    }

    #[test]
    fn test_json_error_points_into_source() {
        let source = "{\n  \"type\": \"strin\"\n}";
        let mut parser = Parser::new_with_name(source, "bad.json".to_string()).unwrap();
        match parser.parse_document() {
            Err(SchemaError::Parser(ParserError::InvalidJson { span, path, .. })) => {
                assert_eq!(path, "type");
                assert!(span.offset() > 0 && span.offset() <= source.len());
            }
            other => panic!("expected InvalidJson, got {other:?}"),
        }
    }
}
