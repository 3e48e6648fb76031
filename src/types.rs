//! TypeScript type expressions for schema nodes.

use crate::ast::{AdditionalProperties, Schema, Shape, TypeTag};
use crate::reference::{classify, Reference};
use crate::serialization::{double_quoted, json_literal};
use crate::utils::is_identifier;
use indexmap::IndexMap;
use serde_json::Value;

/// The universal top type.
pub const TOP: &str = "unknown";

/// Returns the TypeScript type of `schema`.
///
/// Named references become nominal `<Name>Type` handles, never inlined bodies, which is
/// what lets self- and mutually-recursive definitions type-check. The root reference
/// (`#`) becomes `z.infer<typeof Root>`.
pub fn type_of(schema: &Schema, root_name: &str) -> String {
    match schema.shape() {
        Shape::Ref(token) => reference_type(token, root_name),
        Shape::OneOf(members) | Shape::AnyOf(members) => union(members, root_name),
        Shape::AllOf(members) => intersection(members, root_name),
        Shape::Not(_) => TOP.to_string(),
        Shape::Const(value) => json_literal(value),
        Shape::Enum(values) => enumeration(values),
        Shape::Properties(properties) => record(schema, properties, root_name),
        Shape::Primitive(tag) => primitive(schema, tag, root_name),
        Shape::Unknown => TOP.to_string(),
    }
}

fn reference_type(token: &str, root_name: &str) -> String {
    match classify(token) {
        Reference::Root => format!("z.infer<typeof {root_name}>"),
        Reference::Named { name, .. } => format!("{name}Type"),
        Reference::External => TOP.to_string(),
    }
}

fn union(members: &[Schema], root_name: &str) -> String {
    if members.is_empty() {
        return TOP.to_string();
    }
    let types: Vec<String> = members.iter().map(|m| type_of(m, root_name)).collect();
    format!("({})", types.join(" | "))
}

fn intersection(members: &[Schema], root_name: &str) -> String {
    let mut types: Vec<String> = members
        .iter()
        .filter(|m| !is_vacuous(m))
        .map(|m| type_of(m, root_name))
        .collect();
    match types.len() {
        0 => TOP.to_string(),
        1 => types.remove(0),
        _ => format!("({})", types.join(" & ")),
    }
}

/// An `allOf` member that adds no structure: a `null` type, a bare `nullable: true`,
/// or an object holding nothing but `default` or `const`.
pub fn is_vacuous(member: &Schema) -> bool {
    if member.type_spec.as_ref().map(|t| t.tags()) == Some(&[TypeTag::Null][..]) {
        return true;
    }
    let keys = member.key_count();
    if keys != 1 {
        return false;
    }
    member.nullable == Some(true) || member.default.is_some() || member.const_value.is_some()
}

fn enumeration(values: &[Value]) -> String {
    match values {
        [] => TOP.to_string(),
        [single] => json_literal(single),
        _ => {
            let members: Vec<String> = values.iter().map(json_literal).collect();
            format!("({})", members.join(" | "))
        }
    }
}

fn record(schema: &Schema, properties: &IndexMap<String, Schema>, root_name: &str) -> String {
    let required = schema.required_names();
    let fields: Vec<String> = properties
        .iter()
        .map(|(key, property)| {
            let name = if is_identifier(key) {
                key.clone()
            } else {
                double_quoted(key)
            };
            let optional = if required.contains(key) { "" } else { "?" };
            format!("{name}{optional}: {}", type_of(property, root_name))
        })
        .collect();
    format!("{{{}}}", fields.join("; "))
}

fn primitive(schema: &Schema, tag: TypeTag, root_name: &str) -> String {
    match tag {
        TypeTag::String => "string".to_string(),
        TypeTag::Number | TypeTag::Integer => "number".to_string(),
        TypeTag::Boolean => "boolean".to_string(),
        TypeTag::Date => "Date".to_string(),
        TypeTag::Null => "null".to_string(),
        TypeTag::Array => match &schema.items {
            Some(items) => format!("{}[]", type_of(items, root_name)),
            None => format!("{TOP}[]"),
        },
        TypeTag::Object => index_type(schema, root_name),
    }
}

/// An object without `properties`. `true` and `false` both collapse to an unconstrained
/// index type.
fn index_type(schema: &Schema, root_name: &str) -> String {
    match &schema.additional_properties {
        Some(AdditionalProperties::Schema(value)) => {
            format!("Record<string, {}>", type_of(value, root_name))
        }
        Some(AdditionalProperties::Flag(_)) | None => format!("Record<string, {TOP}>"),
    }
}
