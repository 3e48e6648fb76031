use miette::{Diagnostic, NamedSource, SourceSpan};
use std::fmt::Display;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic, Clone)]
pub enum SchemaError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Parser(#[from] ParserError),

    #[error("Failed to read `{path}`: {message}")]
    #[diagnostic(
        code(schema::io),
        help("Check that the file exists and is readable.")
    )]
    Io { path: String, message: String },

    #[error("Invalid generator configuration in `{path}`: {message}")]
    #[diagnostic(code(schema::config))]
    Config { path: String, message: String },
}

#[derive(Error, Debug, Diagnostic, Clone)]
pub enum ParserError {
    #[error("Invalid JSON schema document at `{path}`: {message}")]
    #[diagnostic(
        code(parser::invalid_json),
        help("The document must be valid JSON and every keyword must have the expected shape.")
    )]
    InvalidJson {
        #[source_code]
        src: NamedSource<String>,
        #[label("{message}")]
        span: SourceSpan,
        path: String,
        message: String,
    },

    #[error("Invalid YAML schema document at `{path}`: {message}")]
    #[diagnostic(
        code(parser::invalid_yaml),
        help("The document must be valid YAML and every keyword must have the expected shape.")
    )]
    InvalidYaml {
        #[source_code]
        src: NamedSource<String>,
        #[label("{message}")]
        span: SourceSpan,
        path: String,
        message: String,
    },

    #[error("Unsupported input `{file_name}`")]
    #[diagnostic(
        code(parser::unsupported_format),
        help("Input must be a .json, .yaml or .yml file.")
    )]
    UnsupportedFormat { file_name: String },
}

/// A non-fatal problem found while generating code. Generation always completes; these
/// are reported to the caller for observability only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    pub kind: WarningKind,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    /// No dispatch rule matched; the node accepts anything.
    UnrecognizedShape,
    /// A name from the dependency order had no definition at emission time.
    MissingDefinition,
}

impl Warning {
    pub fn new(kind: WarningKind, message: impl Into<String>) -> Self {
        let warning = Warning {
            kind,
            message: message.into(),
        };
        log::warn!("{warning}");
        warning
    }
}

impl Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            WarningKind::UnrecognizedShape => write!(f, "unrecognized shape: {}", self.message),
            WarningKind::MissingDefinition => write!(f, "missing definition: {}", self.message),
        }
    }
}
