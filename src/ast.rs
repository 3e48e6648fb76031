use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Number, Value};

/// Named definitions of one document, in insertion order.
pub type Definitions = IndexMap<String, Schema>;

/// One node of a parsed JSON-Schema-style document.
///
/// Every keyword is optional. Keywords the code generator does not interpret are kept
/// in [`Schema::extra`] so that the node still reports how many keys it carries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_spec: Option<TypeSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    // == Combinators ==
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub one_of: Option<Vec<Schema>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub any_of: Option<Vec<Schema>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub all_of: Option<Vec<Schema>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub not: Option<Box<Schema>>,

    // == Literals ==
    #[serde(
        rename = "const",
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub const_value: Option<Value>,
    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Value>>,

    // == Numeric bounds ==
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclusive_minimum: Option<Exclusive>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclusive_maximum: Option<Exclusive>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multiple_of: Option<Number>,

    // == String bounds ==
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,

    // == Array bounds ==
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_items: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_items: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Schema>>,

    // == Object fields ==
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<IndexMap<String, Schema>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<Required>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_properties: Option<AdditionalProperties>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nullable: Option<bool>,
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub default: Option<Value>,

    // == Definitions and references ==
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definitions: Option<Definitions>,
    #[serde(rename = "$defs", default, skip_serializing_if = "Option::is_none")]
    pub defs: Option<Definitions>,
    #[serde(rename = "$ref", default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,

    /// Keywords without a dedicated field (`description`, `examples`, `xml`, ...).
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

/// Keeps an explicit `null` as `Some(Value::Null)` instead of collapsing it to `None`.
fn deserialize_present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeTag {
    String,
    Number,
    Integer,
    Date,
    Boolean,
    Array,
    Object,
    Null,
}

/// The `type` keyword: a single tag or an ordered list of tags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TypeSpec {
    Single(TypeTag),
    List(Vec<TypeTag>),
}

impl TypeSpec {
    pub fn tags(&self) -> &[TypeTag] {
        match self {
            TypeSpec::Single(tag) => std::slice::from_ref(tag),
            TypeSpec::List(tags) => tags,
        }
    }

    pub fn contains(&self, tag: TypeTag) -> bool {
        self.tags().contains(&tag)
    }
}

/// `exclusiveMinimum` / `exclusiveMaximum`: a draft-4 flag or a draft-6 bound.
///
/// Bounds stay as [`Number`] so 64-bit integers keep every digit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Exclusive {
    Flag(bool),
    Bound(Number),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Required {
    Names(Vec<String>),
    Flag(bool),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AdditionalProperties {
    Flag(bool),
    Schema(Box<Schema>),
}

/// Which keyword decides how a node is compiled.
///
/// Priority, highest first: reference, `oneOf`, `anyOf`, `allOf`, `not`, `const`, `enum`,
/// `properties`, primitive type tag. Lower keywords are ignored once a higher one is present.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape<'a> {
    Ref(&'a str),
    OneOf(&'a [Schema]),
    AnyOf(&'a [Schema]),
    AllOf(&'a [Schema]),
    Not(&'a Schema),
    Const(&'a Value),
    Enum(&'a [Value]),
    Properties(&'a IndexMap<String, Schema>),
    Primitive(TypeTag),
    Unknown,
}

impl Schema {
    /// Classifies this node once so callers can `match` instead of probing fields.
    pub fn shape(&self) -> Shape<'_> {
        if let Some(token) = &self.reference {
            return Shape::Ref(token);
        }
        if let Some(members) = &self.one_of {
            return Shape::OneOf(members);
        }
        if let Some(members) = &self.any_of {
            return Shape::AnyOf(members);
        }
        if let Some(members) = &self.all_of {
            return Shape::AllOf(members);
        }
        if let Some(inner) = &self.not {
            return Shape::Not(inner);
        }
        if let Some(value) = &self.const_value {
            return Shape::Const(value);
        }
        if let Some(values) = &self.enum_values {
            return Shape::Enum(values);
        }
        if let Some(properties) = &self.properties {
            return Shape::Properties(properties);
        }
        match self.primary_type() {
            Some(tag) => Shape::Primitive(tag),
            None => Shape::Unknown,
        }
    }

    /// The tag that drives primitive dispatch: the first non-`null` tag, or `null` when
    /// that is the only tag present.
    ///
    /// A multi-tag list keeps a single tag, so `["string", "number"]` compiles as a string.
    pub fn primary_type(&self) -> Option<TypeTag> {
        let tags = self.type_spec.as_ref()?.tags();
        let mut non_null = tags.iter().copied().filter(|t| *t != TypeTag::Null);
        match non_null.next() {
            Some(first) => {
                if let Some(dropped) = non_null.next() {
                    log::warn!(
                        "type list {tags:?} keeps only {first:?}; {dropped:?} and later tags are ignored"
                    );
                }
                Some(first)
            }
            None if tags.is_empty() => None,
            None => Some(TypeTag::Null),
        }
    }

    pub fn has_type(&self, tag: TypeTag) -> bool {
        self.type_spec.as_ref().is_some_and(|spec| spec.contains(tag))
    }

    /// True for an explicit `nullable: true` or a type list that names `null`.
    pub fn is_nullable(&self) -> bool {
        self.nullable == Some(true) || self.has_type(TypeTag::Null)
    }

    /// Property names listed in `required`; a boolean `required` names nothing.
    pub fn required_names(&self) -> &[String] {
        match &self.required {
            Some(Required::Names(names)) => names,
            _ => &[],
        }
    }

    /// Number of keywords present on this node, unmodelled ones included.
    pub fn key_count(&self) -> usize {
        serde_json::to_value(self)
            .ok()
            .and_then(|v| v.as_object().map(|o| o.len()))
            .unwrap_or(0)
    }

    /// `definitions` merged with `$defs`; a `$defs` entry overwrites a `definitions`
    /// entry with the same key.
    pub fn merged_definitions(&self) -> Definitions {
        let mut merged = Definitions::new();
        for source in [&self.definitions, &self.defs].into_iter().flatten() {
            for (name, schema) in source {
                merged.insert(name.clone(), schema.clone());
            }
        }
        merged
    }

    /// Direct child nodes. With `include_definitions` the nested definition maps are
    /// visited too.
    pub fn children(&self, include_definitions: bool) -> Vec<&Schema> {
        let mut out: Vec<&Schema> = Vec::new();
        for members in [&self.one_of, &self.any_of, &self.all_of].into_iter().flatten() {
            out.extend(members.iter());
        }
        if let Some(inner) = &self.not {
            out.push(inner);
        }
        if let Some(items) = &self.items {
            out.push(items);
        }
        if let Some(properties) = &self.properties {
            out.extend(properties.values());
        }
        if let Some(AdditionalProperties::Schema(inner)) = &self.additional_properties {
            out.push(inner);
        }
        if include_definitions {
            for source in [&self.definitions, &self.defs].into_iter().flatten() {
                out.extend(source.values());
            }
        }
        out
    }

    /// Every reference token in this subtree, depth first.
    pub fn references(&self, include_definitions: bool) -> Vec<&str> {
        let mut tokens = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            if let Some(token) = &node.reference {
                tokens.push(token.as_str());
            }
            stack.extend(node.children(include_definitions).into_iter().rev());
        }
        tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema(value: Value) -> Schema {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_reference_outranks_everything() {
        let s = schema(json!({
            "$ref": "#/definitions/A",
            "oneOf": [{ "type": "string" }],
            "const": 1,
            "type": "string"
        }));
        assert_eq!(s.shape(), Shape::Ref("#/definitions/A"));
    }

    #[test]
    fn test_combinator_priority() {
        let s = schema(json!({
            "anyOf": [{ "type": "string" }],
            "allOf": [{ "type": "number" }],
            "oneOf": [{ "type": "boolean" }]
        }));
        assert!(matches!(s.shape(), Shape::OneOf(m) if m.len() == 1));

        let s = schema(json!({ "allOf": [], "not": { "type": "string" } }));
        assert!(matches!(s.shape(), Shape::AllOf(m) if m.is_empty()));
    }

    #[test]
    fn test_const_enum_properties_priority() {
        let s = schema(json!({ "const": "a", "enum": ["a", "b"], "properties": {} }));
        assert_eq!(s.shape(), Shape::Const(&json!("a")));

        let s = schema(json!({ "enum": ["a"], "properties": {}, "type": "object" }));
        assert!(matches!(s.shape(), Shape::Enum(_)));

        let s = schema(json!({ "properties": {}, "type": "string" }));
        assert!(matches!(s.shape(), Shape::Properties(_)));
    }

    #[test]
    fn test_explicit_null_const_is_present() {
        let s = schema(json!({ "const": null }));
        assert_eq!(s.shape(), Shape::Const(&Value::Null));
        assert_eq!(s.key_count(), 1);

        let s = schema(json!({ "type": "string", "default": null }));
        assert_eq!(s.default, Some(Value::Null));
    }

    #[test]
    fn test_primary_type_skips_null() {
        let s = schema(json!({ "type": ["null", "string"] }));
        assert_eq!(s.shape(), Shape::Primitive(TypeTag::String));
        assert!(s.is_nullable());

        let s = schema(json!({ "type": ["null"] }));
        assert_eq!(s.shape(), Shape::Primitive(TypeTag::Null));

        let s = schema(json!({ "type": ["string", "number"] }));
        assert_eq!(s.primary_type(), Some(TypeTag::String));

        assert_eq!(schema(json!({})).shape(), Shape::Unknown);
    }

    #[test]
    fn test_key_count_includes_unmodelled_keywords() {
        let s = schema(json!({ "default": 1, "description": "x" }));
        assert_eq!(s.key_count(), 2);
        assert_eq!(s.extra.get("description"), Some(&json!("x")));
    }

    #[test]
    fn test_merged_definitions_defs_overwrite() {
        let s = schema(json!({
            "definitions": { "A": { "type": "string" }, "B": { "type": "number" } },
            "$defs": { "A": { "type": "boolean" }, "C": { "type": "null" } }
        }));
        let merged = s.merged_definitions();
        let keys: Vec<&str> = merged.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["A", "B", "C"]);
        assert_eq!(merged["A"].primary_type(), Some(TypeTag::Boolean));
    }

    #[test]
    fn test_references_walk_all_members() {
        let s = schema(json!({
            "properties": {
                "a": { "$ref": "#/definitions/A" },
                "b": { "type": "array", "items": { "$ref": "#B" } }
            },
            "additionalProperties": { "$ref": "#" },
            "allOf": [{ "not": { "$ref": "#/$defs/C" } }],
            "definitions": { "D": { "$ref": "#/definitions/E" } }
        }));
        let mut outside = s.references(false);
        outside.sort_unstable();
        assert_eq!(outside, vec!["#", "#/$defs/C", "#/definitions/A", "#B"]);
        assert!(s.references(true).contains(&"#/definitions/E"));
    }

    #[test]
    fn test_yaml_document_parses() {
        let s: Schema = serde_yaml::from_str(
            "title: user\ntype: object\nrequired: [name]\nproperties:\n  name:\n    type: string\n",
        )
        .unwrap();
        assert_eq!(s.required_names(), &["name".to_string()]);
        assert!(matches!(s.shape(), Shape::Properties(p) if p.contains_key("name")));
    }
}
