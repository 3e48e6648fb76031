use crate::ast::{Definitions, Schema};
use crate::config::GeneratorConfig;
use crate::error::{SchemaError, Warning, WarningKind};
use crate::parser::Parser;
use crate::reference::{classify, Reference};
use crate::resolver::{is_self_referential, order, reachable};
use crate::types::type_of;
use crate::utils::to_pascal_case;
use crate::validator::Validators;
use std::fmt::Display;
use std::path::Path;

/// The output of one generation run: a TypeScript module declaring the root validator
/// and its type, plus every named definition it needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceBundle {
    pub root_name: String,
    /// Definition keys in dependency order.
    pub order: Vec<String>,
    pub code: String,
    pub warnings: Vec<Warning>,
}

impl Display for SourceBundle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.code)
    }
}

/// Generates the source bundle for `document` with default options.
#[must_use]
pub fn generate(document: &Schema) -> SourceBundle {
    generate_with(document, &GeneratorConfig::default())
}

/// Generates the source bundle for `document`.
///
/// Never fails: unresolvable references, missing definitions and unrecognized shapes
/// degrade to permissive output and are listed in [`SourceBundle::warnings`].
#[must_use]
pub fn generate_with(document: &Schema, config: &GeneratorConfig) -> SourceBundle {
    let root_name = root_name(document, config);
    let definitions = document.merged_definitions();
    let order = order(&definitions);
    let root_key = definitions
        .keys()
        .find(|key| to_pascal_case(key) == root_name)
        .cloned();

    let self_referential = definitions
        .iter()
        .find(|(key, schema)| is_self_referential(key, schema))
        .map(|(key, _)| key.as_str());
    let whole_graph =
        document.reference.is_some() || self_referential.is_some() || (config.strict && root_key.is_some());
    log::debug!(
        "root `{root_name}`: {} definitions, order {order:?}, whole graph: {whole_graph} (root $ref: {}, self-referential: {self_referential:?}, root definition: {root_key:?})",
        definitions.len(),
        document.reference.is_some(),
    );

    let mut emitter = Emitter::new(&definitions);
    let code = if whole_graph {
        let declared: Vec<&str> = order
            .iter()
            .map(String::as_str)
            .filter(|key| Some(*key) != root_key.as_deref())
            .collect();
        let root = root_key
            .as_deref()
            .and_then(|key| definitions.get(key))
            .unwrap_or(document);
        let root_type = type_of(root, &root_name);
        let root_validator = emitter.validator(root, &root_name);
        assemble(
            config,
            &root_name,
            Some(&root_type),
            &emitter.type_declarations(&declared),
            &emitter.validator_declarations(&declared),
            &root_validator,
        )
    } else {
        let declared: Vec<&str> = if config.declare_unreferenced {
            order.iter().map(String::as_str).collect()
        } else {
            let reached = reachable(document, &definitions);
            order
                .iter()
                .map(String::as_str)
                .filter(|key| reached.contains(*key))
                .collect()
        };
        let has_references = document.definitions.is_some()
            || document.defs.is_some()
            || document
                .references(true)
                .into_iter()
                .any(|token| classify(token) == Reference::Root);
        let root_type = has_references.then(|| type_of(document, &root_name));
        let root_validator = emitter.validator(document, &root_name);
        assemble(
            config,
            &root_name,
            root_type.as_deref(),
            &emitter.type_declarations(&declared),
            &emitter.validator_declarations(&declared),
            &root_validator,
        )
    };

    SourceBundle {
        root_name,
        order,
        code,
        warnings: emitter.warnings,
    }
}

/// Parses `source` (JSON or YAML, picked from `file_name`) and generates its bundle.
///
/// # Errors
///
/// Returns a `SchemaError` if `file_name` has no supported extension or the document
/// does not parse into a schema.
pub fn compile(source: &str, file_name: &str) -> Result<SourceBundle, SchemaError> {
    compile_with(source, file_name, &GeneratorConfig::default())
}

/// Like [`compile`], with explicit generator options.
///
/// # Errors
///
/// Returns a `SchemaError` if `file_name` has no supported extension or the document
/// does not parse into a schema.
pub fn compile_with(
    source: &str,
    file_name: &str,
    config: &GeneratorConfig,
) -> Result<SourceBundle, SchemaError> {
    let mut parser = Parser::new_with_name(source, file_name.to_string())?;
    let document = parser.parse_document()?;
    Ok(generate_with(&document, config))
}

/// Reads and compiles the schema document at `path`.
///
/// # Errors
///
/// Returns `SchemaError::Io` if the file cannot be read, otherwise the same errors as
/// [`compile_with`].
pub fn compile_file(
    path: impl AsRef<Path>,
    config: &GeneratorConfig,
) -> Result<SourceBundle, SchemaError> {
    let path = path.as_ref();
    let file_name = path.display().to_string();
    let source = std::fs::read_to_string(path).map_err(|e| SchemaError::Io {
        path: file_name.clone(),
        message: e.to_string(),
    })?;
    compile_with(&source, &file_name, config)
}

fn root_name(document: &Schema, config: &GeneratorConfig) -> String {
    match document.title.as_deref() {
        Some(title) if !title.is_empty() => to_pascal_case(title),
        _ => config.fallback_name.clone(),
    }
}

/// Emits named declarations for definitions, collecting warnings as it goes.
struct Emitter<'d> {
    definitions: &'d Definitions,
    warnings: Vec<Warning>,
}

impl<'d> Emitter<'d> {
    fn new(definitions: &'d Definitions) -> Self {
        Emitter {
            definitions,
            warnings: Vec::new(),
        }
    }

    fn validator(&mut self, schema: &Schema, root_name: &str) -> String {
        let mut validators = Validators::new(root_name, true);
        let code = validators.validator_of(schema);
        self.warnings.extend(validators.into_warnings());
        code
    }

    fn type_declarations(&mut self, keys: &[&str]) -> Vec<String> {
        let definitions = self.definitions;
        keys.iter()
            .map(|key| match definitions.get(*key) {
                Some(schema) => {
                    let name = to_pascal_case(key);
                    format!("type {name}Type = {}", type_of(schema, &name))
                }
                None => self.missing(key),
            })
            .collect()
    }

    fn validator_declarations(&mut self, keys: &[&str]) -> Vec<String> {
        let definitions = self.definitions;
        keys.iter()
            .map(|key| match definitions.get(*key) {
                Some(schema) => {
                    let name = to_pascal_case(key);
                    let code = self.validator(schema, &name);
                    format!("const {name}: z.ZodType<{name}Type> = {code}")
                }
                None => self.missing(key),
            })
            .collect()
    }

    fn missing(&mut self, key: &str) -> String {
        let name = to_pascal_case(key);
        self.warnings
            .push(Warning::new(WarningKind::MissingDefinition, name.clone()));
        format!("// missing definition for {name}")
    }
}

/// Lays out the module text. Without a root type alias the root validator is exported
/// without a type annotation.
fn assemble(
    config: &GeneratorConfig,
    root_name: &str,
    root_type: Option<&str>,
    types: &[String],
    validators: &[String],
    root_validator: &str,
) -> String {
    let mut code = format!("{}\n\n", config.preamble);
    if let Some(root_type) = root_type {
        code.push_str(&format!("type {root_name}Type = {root_type}\n\n"));
    }
    for block in [types, validators] {
        if !block.is_empty() {
            code.push_str(&block.join("\n\n"));
            code.push_str("\n\n");
        }
    }
    match root_type {
        Some(_) => code.push_str(&format!(
            "export const {root_name}: z.ZodType<{root_name}Type> = {root_validator}"
        )),
        None => code.push_str(&format!("export const {root_name} = {root_validator}")),
    }
    code.push_str(&format!(
        "\n\nexport type {root_name} = z.infer<typeof {root_name}>"
    ));
    code
}

#[cfg(test)]
mod tests {
    use crate::compile;

    #[test]
    fn test_plain_object_compiles_without_type_alias() {
        let source = r#"{
            "type": "object",
            "properties": { "name": { "type": "string" } },
            "required": ["name"]
        }"#;
        let bundle = compile(source, "schema.json").unwrap();
        assert_eq!(
            bundle.code,
            "import * as z from 'zod'\n\nexport const Schema = z.object({name:z.string()})\n\nexport type Schema = z.infer<typeof Schema>"
        );
        assert!(bundle.order.is_empty());
        assert!(bundle.warnings.is_empty());
    }

    #[test]
    fn test_yaml_source() {
        let source = "title: tags\ntype: array\nitems:\n  type: string\n";
        let bundle = compile(source, "tags.yaml").unwrap();
        assert_eq!(bundle.root_name, "Tags");
        assert!(bundle.code.contains("export const Tags = z.array(z.string())"));
    }

    #[test]
    fn test_display_prints_code() {
        let bundle = compile(r#"{"type": "boolean"}"#, "flag.json").unwrap();
        assert_eq!(bundle.to_string(), bundle.code);
    }
}
