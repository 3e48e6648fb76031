use crate::ast::{Definitions, Schema};
use crate::reference::{classify, Reference};
use std::collections::{BTreeSet, HashMap, HashSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    InProgress,
    Done,
}

/// Orders named definitions so that every definition comes after the ones it depends on.
///
/// Cycles do not fail: an edge back to a definition that is still being visited is
/// skipped, and that definition is placed once its own traversal finishes.
pub struct DependencyResolver<'a> {
    definitions: &'a Definitions,
    marks: HashMap<&'a str, Mark>,
    sorted: Vec<String>,
}

impl<'a> DependencyResolver<'a> {
    pub fn new(definitions: &'a Definitions) -> Self {
        DependencyResolver {
            definitions,
            marks: HashMap::new(),
            sorted: Vec::with_capacity(definitions.len()),
        }
    }

    pub fn resolve(mut self) -> Vec<String> {
        let mut names: Vec<&'a str> = self.definitions.keys().map(String::as_str).collect();
        names.sort_unstable();
        for name in names {
            self.visit(name);
        }
        self.sorted
    }

    fn visit(&mut self, name: &'a str) {
        match self.marks.get(name) {
            Some(Mark::Done) => return,
            Some(Mark::InProgress) => {
                log::debug!("cycle through definition `{name}`; edge skipped");
                return;
            }
            None => {}
        }
        let definitions = self.definitions;
        let Some((key, schema)) = definitions.get_key_value(name) else {
            return;
        };

        self.marks.insert(key.as_str(), Mark::InProgress);
        for dependency in dependencies(schema) {
            if let Some((dep_key, _)) = definitions.get_key_value(dependency) {
                self.visit(dep_key.as_str());
            }
        }
        self.marks.insert(key.as_str(), Mark::Done);
        self.sorted.push(key.clone());
    }
}

/// Topological order of `definitions` (see [`DependencyResolver`]).
pub fn order(definitions: &Definitions) -> Vec<String> {
    DependencyResolver::new(definitions).resolve()
}

/// Keys of every named reference anywhere inside `schema`, sorted and de-duplicated.
/// Root and external references are not dependencies.
pub fn dependencies(schema: &Schema) -> BTreeSet<&str> {
    schema
        .references(true)
        .into_iter()
        .filter_map(|token| match classify(token) {
            Reference::Named { key, .. } => Some(key),
            _ => None,
        })
        .collect()
}

/// Whether the definition stored under `key` refers to itself by name.
pub fn is_self_referential(key: &str, schema: &Schema) -> bool {
    dependencies(schema).contains(key)
}

/// Keys of the definitions reachable from the document body, following references
/// transitively through the definitions themselves.
pub fn reachable(document: &Schema, definitions: &Definitions) -> HashSet<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut pending: Vec<&str> = document
        .references(false)
        .into_iter()
        .filter_map(|token| classify(token).key())
        .filter_map(|key| definitions.get_key_value(key).map(|(k, _)| k.as_str()))
        .collect();

    while let Some(key) = pending.pop() {
        if !seen.insert(key.to_string()) {
            continue;
        }
        if let Some(schema) = definitions.get(key) {
            for dependency in dependencies(schema) {
                if let Some((dep_key, _)) = definitions.get_key_value(dependency) {
                    pending.push(dep_key.as_str());
                }
            }
        }
    }
    seen
}
