//! Zod validator expressions for schema nodes.

use crate::ast::{AdditionalProperties, Exclusive, Schema, Shape, TypeTag};
use crate::error::{Warning, WarningKind};
use crate::reference::{classify, Reference};
use crate::serialization::{
    double_quoted, encode_integer, enum_literal, json_literal, number_literal, IntegerEncoding,
};
use crate::types::is_vacuous;
use crate::utils::{escape_regex_slashes, is_identifier};
use indexmap::IndexMap;
use serde_json::{Number, Value};
use std::fmt::{self, Display};

/// The accept-anything validator.
pub const ANY: &str = "z.any()";

/// A synthesized validator before the wrap step.
///
/// Reference handles are their own variants so a reference is never expanded in place:
/// a `Deferred` handle is resolved on first use, which is what lets recursive and
/// mutually recursive declarations reference each other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// `z.lazy(() => Name)`
    Deferred(String),
    /// A bare `NameSchema` handle to a component declared elsewhere.
    Direct(String),
    Inline(String),
}

impl Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Deferred(name) => write!(f, "z.lazy(() => {name})"),
            Expr::Direct(name) => write!(f, "{name}"),
            Expr::Inline(code) => f.write_str(code),
        }
    }
}

impl From<&str> for Expr {
    fn from(code: &str) -> Self {
        Expr::Inline(code.to_string())
    }
}

impl From<String> for Expr {
    fn from(code: String) -> Self {
        Expr::Inline(code)
    }
}

/// Format keyword to Zod constructor lookup, one table per base kind.
#[derive(Debug, Clone, Copy)]
pub struct FormatTable {
    pub strings: &'static [(&'static str, &'static str)],
    pub numbers: &'static [(&'static str, &'static str)],
    pub integers: &'static [(&'static str, &'static str)],
}

impl FormatTable {
    fn lookup(table: &[(&str, &'static str)], format: Option<&str>) -> Option<&'static str> {
        let format = format?;
        table
            .iter()
            .find(|(name, _)| *name == format)
            .map(|(_, call)| *call)
    }
}

pub const ZOD_FORMATS: FormatTable = FormatTable {
    strings: &[
        ("email", "email()"),
        ("uuid", "uuid()"),
        ("uuidv4", "uuidv4()"),
        ("uuidv6", "uuidv6()"),
        ("uuidv7", "uuidv7()"),
        ("uri", "url()"),
        ("emoji", "emoji()"),
        ("base64", "base64()"),
        ("base64url", "base64url()"),
        ("nanoid", "nanoid()"),
        ("cuid", "cuid()"),
        ("cuid2", "cuid2()"),
        ("ulid", "ulid()"),
        ("ip", "ipv4()"),
        ("ipv4", "ipv4()"),
        ("ipv6", "ipv6()"),
        ("cidrv4", "cidrv4()"),
        ("cidrv6", "cidrv6()"),
        ("date", "iso.date()"),
        ("time", "iso.time()"),
        ("date-time", "iso.datetime()"),
        ("duration", "iso.duration()"),
        ("binary", "file()"),
        ("toLowerCase", "toLowerCase()"),
        ("toUpperCase", "toUpperCase()"),
        ("trim", "trim()"),
        ("jwt", "jwt()"),
    ],
    numbers: &[
        ("float", "float32()"),
        ("float32", "float32()"),
        ("float64", "float64()"),
        ("double", "float64()"),
    ],
    integers: &[
        ("int32", "int32()"),
        ("int64", "int64()"),
        ("bigint", "bigint()"),
    ],
};

/// The literal spelling that matches an integer format's width.
fn integer_encoding(format: Option<&str>) -> IntegerEncoding {
    match format {
        Some("int64") => IntegerEncoding::BigIntSuffix,
        Some("bigint") => IntegerEncoding::BigIntCall,
        _ => IntegerEncoding::Plain,
    }
}

/// `nullable` and `default` carried out of filtered `allOf` members to the outer wrap.
#[derive(Debug, Clone, Copy, Default)]
struct Rescued<'s> {
    nullable: bool,
    default: Option<&'s Value>,
}

/// Refinement names for one side of a numeric range.
struct BoundCalls {
    zero_exclusive: &'static str,
    zero_inclusive: &'static str,
    exclusive: &'static str,
    inclusive: &'static str,
}

const LOWER: BoundCalls = BoundCalls {
    zero_exclusive: "positive",
    zero_inclusive: "nonnegative",
    exclusive: "gt",
    inclusive: "min",
};

const UPPER: BoundCalls = BoundCalls {
    zero_exclusive: "negative",
    zero_inclusive: "nonpositive",
    exclusive: "lt",
    inclusive: "max",
};

/// Synthesizes validator expressions relative to one root name.
///
/// With `named` set, named references become deferred handles to sibling declarations
/// in the same bundle. Without it they become direct `<Name>Schema` handles to
/// separately declared components.
pub struct Validators<'a> {
    root_name: &'a str,
    named: bool,
    formats: &'a FormatTable,
    warnings: Vec<Warning>,
}

impl<'a> Validators<'a> {
    pub fn new(root_name: &'a str, named: bool) -> Self {
        Validators {
            root_name,
            named,
            formats: &ZOD_FORMATS,
            warnings: Vec::new(),
        }
    }

    pub fn with_formats(mut self, formats: &'a FormatTable) -> Self {
        self.formats = formats;
        self
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn into_warnings(self) -> Vec<Warning> {
        self.warnings
    }

    /// Returns the validator expression of `schema`, wrap step included.
    pub fn validator_of(&mut self, schema: &Schema) -> String {
        let (expr, rescued) = self.dispatch(schema);
        wrap(expr, schema, rescued)
    }

    fn dispatch<'s>(&mut self, schema: &'s Schema) -> (Expr, Rescued<'s>) {
        let expr = match schema.shape() {
            Shape::Ref(token) => self.reference(token),
            Shape::OneOf(members) | Shape::AnyOf(members) => self.union(members),
            Shape::AllOf(members) => return self.conjunction(members),
            Shape::Not(_) | Shape::Unknown => self.unmatched(schema),
            Shape::Const(value) => format!("z.literal({})", json_literal(value)).into(),
            Shape::Enum(values) => enumeration(schema, values).into(),
            Shape::Properties(properties) => self.object(schema, properties).into(),
            Shape::Primitive(tag) => self.primitive(schema, tag),
        };
        (expr, Rescued::default())
    }

    fn reference(&self, token: &str) -> Expr {
        match classify(token) {
            Reference::Root => Expr::Deferred(self.root_name.to_string()),
            Reference::Named { name, .. } if self.named || name == self.root_name => {
                Expr::Deferred(name)
            }
            Reference::Named { name, .. } => Expr::Direct(format!("{name}Schema")),
            Reference::External => "z.unknown()".into(),
        }
    }

    fn union(&mut self, members: &[Schema]) -> Expr {
        if members.is_empty() {
            return ANY.into();
        }
        let validators: Vec<String> = members.iter().map(|m| self.validator_of(m)).collect();
        format!("z.union([{}])", validators.join(",")).into()
    }

    fn conjunction<'s>(&mut self, members: &'s [Schema]) -> (Expr, Rescued<'s>) {
        let mut rescued = Rescued::default();
        let mut validators: Vec<String> = Vec::new();
        for member in members {
            if is_vacuous(member) {
                if member.is_nullable() {
                    rescued.nullable = true;
                } else if let Some(value) = &member.default {
                    rescued.default = Some(value);
                }
                continue;
            }
            validators.push(self.validator_of(member));
        }

        let mut validators = validators.into_iter();
        let expr = match validators.next() {
            None => ANY.to_string(),
            Some(first) => validators.fold(first, |acc, next| format!("z.intersection({acc},{next})")),
        };
        (expr.into(), rescued)
    }

    fn unmatched(&mut self, schema: &Schema) -> Expr {
        let description = serde_json::to_string(schema).unwrap_or_default();
        self.warnings.push(Warning::new(
            WarningKind::UnrecognizedShape,
            format!("falling back to {ANY}: schema={description}"),
        ));
        ANY.into()
    }

    fn primitive(&mut self, schema: &Schema, tag: TypeTag) -> Expr {
        match tag {
            TypeTag::String => self.string(schema).into(),
            TypeTag::Number => self.number(schema).into(),
            TypeTag::Integer => self.integer(schema).into(),
            TypeTag::Boolean => "z.boolean()".into(),
            TypeTag::Date => "z.date()".into(),
            TypeTag::Null => "z.null()".into(),
            TypeTag::Array => self.array(schema).into(),
            TypeTag::Object => self.dictionary(schema).into(),
        }
    }

    fn string(&self, schema: &Schema) -> String {
        let base = FormatTable::lookup(self.formats.strings, schema.format.as_deref())
            .unwrap_or("string()");
        let mut out = format!("z.{base}");
        if let Some(pattern) = &schema.pattern {
            out.push_str(&format!(".regex(/{}/)", escape_regex_slashes(pattern)));
        }
        out.push_str(&length(schema.min_length, schema.max_length));
        out
    }

    fn number(&self, schema: &Schema) -> String {
        let base = FormatTable::lookup(self.formats.numbers, schema.format.as_deref())
            .unwrap_or("number()");
        format!("z.{base}{}", numeric_refinements(schema, IntegerEncoding::Plain))
    }

    fn integer(&self, schema: &Schema) -> String {
        let base = FormatTable::lookup(self.formats.integers, schema.format.as_deref())
            .unwrap_or("int()");
        let encoding = integer_encoding(schema.format.as_deref());
        format!("z.{base}{}", numeric_refinements(schema, encoding))
    }

    fn array(&mut self, schema: &Schema) -> String {
        let items = match &schema.items {
            Some(items) => self.validator_of(items),
            None => ANY.to_string(),
        };
        format!("z.array({items}){}", length(schema.min_items, schema.max_items))
    }

    fn object(&mut self, schema: &Schema, properties: &IndexMap<String, Schema>) -> String {
        let required = schema.required_names();
        let partial = required.is_empty();
        let entries: Vec<String> = properties
            .iter()
            .map(|(key, property)| {
                let key_text = if is_identifier(key) {
                    key.clone()
                } else {
                    double_quoted(key)
                };
                let optional = if partial || required.contains(key) {
                    ""
                } else {
                    ".optional()"
                };
                format!("{key_text}:{}{optional}", self.validator_of(property))
            })
            .collect();

        let constructor = match &schema.additional_properties {
            Some(AdditionalProperties::Flag(false)) => "strictObject",
            Some(AdditionalProperties::Flag(true)) => "looseObject",
            _ => "object",
        };
        let mut out = format!("z.{constructor}({{{}}})", entries.join(","));
        if partial {
            out.push_str(".partial()");
        }
        if let Some(AdditionalProperties::Schema(value)) = &schema.additional_properties {
            out.push_str(&format!(".catchall({})", self.validator_of(value)));
        }
        out
    }

    /// An object node without `properties`.
    fn dictionary(&mut self, schema: &Schema) -> String {
        match &schema.additional_properties {
            Some(AdditionalProperties::Schema(value)) => {
                format!("z.record(z.string(),{})", self.validator_of(value))
            }
            Some(AdditionalProperties::Flag(_)) => "z.record(z.string(),z.unknown())".to_string(),
            None => "z.object({})".to_string(),
        }
    }
}

/// Returns the validator expression of `schema` relative to `root_name`.
///
/// Warnings are logged and discarded; use [`Validators`] to collect them.
pub fn validator_of(schema: &Schema, root_name: &str, emit_as_named: bool) -> String {
    Validators::new(root_name, emit_as_named).validator_of(schema)
}

/// `.length(n)` when both bounds agree, else independent `.min`/`.max`.
fn length(min: Option<u64>, max: Option<u64>) -> String {
    match (min, max) {
        (Some(min), Some(max)) if min == max => format!(".length({min})"),
        (min, max) => {
            let mut out = String::new();
            if let Some(min) = min {
                out.push_str(&format!(".min({min})"));
            }
            if let Some(max) = max {
                out.push_str(&format!(".max({max})"));
            }
            out
        }
    }
}

fn numeric_refinements(schema: &Schema, encoding: IntegerEncoding) -> String {
    let mut out = String::new();
    let sides = [
        (schema.minimum.as_ref(), schema.exclusive_minimum.as_ref(), &LOWER),
        (schema.maximum.as_ref(), schema.exclusive_maximum.as_ref(), &UPPER),
    ];
    for (value, exclusive, calls) in sides {
        if let Some(refinement) = bound(value, exclusive, calls, encoding) {
            out.push_str(&refinement);
        }
    }
    if let Some(step) = &schema.multiple_of {
        out.push_str(&format!(".multipleOf({})", encode_number(step, encoding)));
    }
    out
}

fn bound(
    value: Option<&Number>,
    exclusive: Option<&Exclusive>,
    calls: &BoundCalls,
    encoding: IntegerEncoding,
) -> Option<String> {
    let refinement = match (value, exclusive) {
        (Some(v), Some(Exclusive::Flag(true))) if is_zero(v) => {
            format!(".{}()", calls.zero_exclusive)
        }
        (Some(v), Some(Exclusive::Flag(false))) if is_zero(v) => {
            format!(".{}()", calls.zero_inclusive)
        }
        (Some(v), Some(Exclusive::Flag(true))) => {
            format!(".{}({})", calls.exclusive, encode_number(v, encoding))
        }
        (Some(v), _) => format!(".{}({})", calls.inclusive, encode_number(v, encoding)),
        (None, Some(Exclusive::Bound(v))) => {
            format!(".{}({})", calls.exclusive, encode_number(v, encoding))
        }
        (None, _) => return None,
    };
    Some(refinement)
}

fn is_zero(n: &Number) -> bool {
    n.as_f64() == Some(0.0)
}

fn encode_number(value: &Number, encoding: IntegerEncoding) -> String {
    match encoding {
        IntegerEncoding::Plain => number_literal(value),
        wide => encode_integer(value, wide),
    }
}

fn enumeration(schema: &Schema, values: &[Value]) -> String {
    let literal = |v: &Value| format!("z.literal({})", enum_literal(v));
    let union = |parts: Vec<String>| format!("z.union([{}])", parts.join(","));

    if values.is_empty() {
        return ANY.to_string();
    }

    let scalar = schema.has_type(TypeTag::Number)
        || schema.has_type(TypeTag::Integer)
        || schema.has_type(TypeTag::Boolean);
    if scalar {
        return match values {
            [single] => literal(single),
            _ => union(values.iter().map(literal).collect()),
        };
    }

    if schema.has_type(TypeTag::Array) || values.iter().any(Value::is_array) {
        let member = |v: &Value| match v {
            Value::Array(items) => tuple(items),
            other => literal(other),
        };
        return match values {
            [Value::Array(items)] => tuple(items),
            _ => union(values.iter().map(member).collect()),
        };
    }

    if values.iter().all(Value::is_string) {
        return match values {
            [single] => literal(single),
            _ => format!("z.enum({})", json_literal(&Value::Array(values.to_vec()))),
        };
    }

    match values {
        [single] => literal(single),
        _ => union(values.iter().map(literal).collect()),
    }
}

fn tuple(items: &[Value]) -> String {
    let members: Vec<String> = items
        .iter()
        .map(|v| format!("z.literal({})", enum_literal(v)))
        .collect();
    format!("z.tuple([{}])", members.join(","))
}

/// Appends `.default(...)` then `.nullable()`; each at most once.
fn wrap(expr: Expr, schema: &Schema, rescued: Rescued<'_>) -> String {
    let mut out = expr.to_string();
    if let Some(value) = schema.default.as_ref().or(rescued.default) {
        out.push_str(&format!(".default({})", default_literal(value, schema)));
    }
    if schema.is_nullable() || rescued.nullable {
        out.push_str(".nullable()");
    }
    out
}

fn default_literal(value: &Value, schema: &Schema) -> String {
    match value {
        Value::Number(n) => encode_number(n, integer_encoding(schema.format.as_deref())),
        Value::String(s) if schema.primary_type() == Some(TypeTag::Date) => {
            format!("new Date({})", double_quoted(s))
        }
        other => json_literal(other),
    }
}
