//! Read-only diagnostics over a struct tree.
//!
//! Walks raw slots rather than going through the read accessors, so it also
//! works on trees that hold uncommitted containers and reports where they are.

use serde::Serialize;

use crate::value::{Kind, ListValue, Struct, Value};

/// Variant counts, nesting depth and unset slots of one tree.
///
/// The root container is counted. Paths use `$` for the root, `.key` for
/// struct fields and `[index]` for list elements.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TreeStats {
    pub nulls: usize,
    pub bools: usize,
    pub numbers: usize,
    pub strings: usize,
    pub structs: usize,
    pub lists: usize,
    /// Deepest container nesting, the root being 1.
    pub max_depth: usize,
    /// Slots that fail to read because nothing was ever committed to them.
    pub unset_paths: Vec<String>,
}

impl TreeStats {
    pub fn is_readable(&self) -> bool {
        self.unset_paths.is_empty()
    }
}

pub fn inspect_struct(root: &Struct) -> TreeStats {
    let mut stats = TreeStats::default();
    walk_struct(root, "$", 1, &mut stats);
    stats
}

pub fn inspect_list(root: &ListValue) -> TreeStats {
    let mut stats = TreeStats::default();
    walk_list(root, "$", 1, &mut stats);
    stats
}

/// Paths of every slot under `root` that would fail with `ValueNotSet`.
pub fn unset_paths(root: &Struct) -> Vec<String> {
    inspect_struct(root).unset_paths
}

fn walk_struct(s: &Struct, path: &str, depth: usize, stats: &mut TreeStats) {
    stats.structs += 1;
    stats.max_depth = stats.max_depth.max(depth);
    for (key, value) in s.fields() {
        walk_value(value, &format!("{path}.{key}"), depth, stats);
    }
}

fn walk_list(l: &ListValue, path: &str, depth: usize, stats: &mut TreeStats) {
    stats.lists += 1;
    stats.max_depth = stats.max_depth.max(depth);
    for (index, value) in l.values().enumerate() {
        walk_value(value, &format!("{path}[{index}]"), depth, stats);
    }
}

fn walk_value(value: &Value, path: &str, depth: usize, stats: &mut TreeStats) {
    match value.kind() {
        Some(Kind::Null) => stats.nulls += 1,
        Some(Kind::Bool(_)) => stats.bools += 1,
        Some(Kind::Number(_)) => stats.numbers += 1,
        Some(Kind::String(_)) => stats.strings += 1,
        Some(Kind::Struct(inner)) => walk_struct(inner, path, depth + 1, stats),
        Some(Kind::List(inner)) => walk_list(inner, path, depth + 1, stats),
        None => stats.unset_paths.push(path.to_owned()),
    }
}
