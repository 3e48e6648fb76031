use crate::utils::to_pascal_case;

/// Definition-map prefixes a local named reference may start with.
pub const NAMED_PREFIXES: [&str; 3] = ["#/components/schemas/", "#/definitions/", "#/$defs/"];

/// What a `$ref` token points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reference<'a> {
    /// `#` or the empty token: the enclosing root.
    Root,
    /// A local definition. `key` is the definitions-map key, `name` its PascalCase form.
    Named { key: &'a str, name: String },
    /// Another document, a URL, or a pointer this generator does not follow.
    External,
}

impl<'a> Reference<'a> {
    pub fn key(&self) -> Option<&'a str> {
        match self {
            Reference::Named { key, .. } => Some(*key),
            _ => None,
        }
    }
}

/// Classifies a reference token. Total: every token maps to exactly one variant.
///
/// The root's own name plays no part here; a named reference that happens to spell the
/// root name is still `Named`, and callers decide what that means.
pub fn classify(token: &str) -> Reference<'_> {
    if token.is_empty() || token == "#" {
        return Reference::Root;
    }

    if let Some(key) = NAMED_PREFIXES
        .iter()
        .find_map(|prefix| token.strip_prefix(prefix))
    {
        return named(key);
    }

    if let Some(key) = token.strip_prefix('#') {
        return named(key);
    }

    // `other.json#/definitions/x`, `https://...`, bare file names.
    Reference::External
}

fn named(key: &str) -> Reference<'_> {
    if key.is_empty() || key.contains('/') || key.contains('#') {
        return Reference::External;
    }
    Reference::Named {
        key,
        name: to_pascal_case(key),
    }
}
