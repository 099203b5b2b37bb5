//! Conversion between `serde_json::Value` and struct trees.
//!
//! [`update_struct`] and [`update_list`] mirror a JSON object or array into a
//! struct tree, depth-first. [`update_json_from_struct`] and
//! [`update_json_from_list`] walk a tree back out into JSON. The two directions
//! are structural duals.
//!
//! # Empty containers
//!
//! Child containers are linked with [`Struct::get_or_create_struct`] and
//! friends, which leave them uncommitted until written to. An empty JSON
//! object or array therefore produces a slot that cannot be read back. Under
//! [`EmptyPolicy::ForceSet`] (the default) an empty container receives a
//! placeholder entry that is removed again before returning, which commits it
//! without leaving anything behind. [`EmptyPolicy::LeaveUnset`] skips that
//! step and keeps the unreadable slots; it exists to reproduce the failure.
//!
//! ```
//! use jsonstruct_core::{from_json_str, from_json_str_with, struct_to_json};
//! use jsonstruct_core::{ConvertOptions, StructError};
//!
//! let json = r#"{"empty_dict":{},"empty_list":[]}"#;
//!
//! let tree = from_json_str(json).unwrap();
//! let back = serde_json::Value::Object(struct_to_json(&tree).unwrap());
//! assert_eq!(back.to_string(), json);
//!
//! let broken = from_json_str_with(json, &ConvertOptions::unpatched()).unwrap();
//! assert!(matches!(struct_to_json(&broken), Err(StructError::ValueNotSet { .. })));
//! ```
//!
//! Numbers come back as JSON floats: the tree keeps a single `f64`
//! representation, so `1` reads back as `1.0`.

use log::{debug, trace};
use serde_json::{Map, Number, Value as JsonValue};

use crate::error::{Result, StructError};
use crate::value::{ListValue, Struct, Value, ValueRef, Variant};

/// Default nesting limit, the same as serde_json's parser recursion limit.
pub const DEFAULT_MAX_DEPTH: usize = 128;

const PLACEHOLDER_KEY: &str = "k";

/// What to do with a container whose JSON source is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmptyPolicy {
    /// Insert and remove a placeholder entry so the container reads back.
    #[default]
    ForceSet,
    /// Leave the container uncommitted. Reading it later fails with
    /// [`StructError::ValueNotSet`].
    LeaveUnset,
}

/// Options for the JSON to struct direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvertOptions {
    pub empty_policy: EmptyPolicy,
    /// Maximum container nesting, counting the root container as 1.
    pub max_depth: usize,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            empty_policy: EmptyPolicy::default(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ConvertOptions {
    /// Options that leave empty containers uncommitted.
    pub fn unpatched() -> Self {
        Self::default().with_empty_policy(EmptyPolicy::LeaveUnset)
    }

    pub fn with_empty_policy(mut self, empty_policy: EmptyPolicy) -> Self {
        self.empty_policy = empty_policy;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

/// A caller-owned root container to fill from JSON.
#[derive(Debug)]
pub enum Container<'a> {
    Struct(&'a mut Struct),
    List(&'a mut ListValue),
}

impl Container<'_> {
    fn variant(&self) -> Variant {
        match self {
            Container::Struct(_) => Variant::Struct,
            Container::List(_) => Variant::List,
        }
    }
}

// ============================================================================
// JSON -> struct tree
// ============================================================================

/// Fill `target` from `source`, which must be an object for a struct target
/// or an array for a list target.
pub fn update_from_json(
    target: Container<'_>,
    source: &JsonValue,
    options: &ConvertOptions,
) -> Result<()> {
    match (target, source) {
        (Container::Struct(s), JsonValue::Object(map)) => update_struct(s, map, options),
        (Container::List(l), JsonValue::Array(items)) => update_list(l, items, options),
        (target, source) => Err(StructError::ContainerMismatch {
            expected: target.variant().name(),
            found: json_kind(source),
        }),
    }
}

/// Mirror every entry of `source` into `target`, in insertion order.
pub fn update_struct(
    target: &mut Struct,
    source: &Map<String, JsonValue>,
    options: &ConvertOptions,
) -> Result<()> {
    fill_struct(target, source, options, 1)
}

/// Mirror every element of `source` onto the end of `target`.
pub fn update_list(
    target: &mut ListValue,
    source: &[JsonValue],
    options: &ConvertOptions,
) -> Result<()> {
    fill_list(target, source, options, 1)
}

/// Build a new struct from a JSON object with default options.
pub fn struct_from_json(source: &Map<String, JsonValue>) -> Result<Struct> {
    let mut root = Struct::new();
    update_struct(&mut root, source, &ConvertOptions::default())?;
    Ok(root)
}

/// Build a new list from a JSON array with default options.
pub fn list_from_json(source: &[JsonValue]) -> Result<ListValue> {
    let mut root = ListValue::new();
    update_list(&mut root, source, &ConvertOptions::default())?;
    Ok(root)
}

/// Parse a JSON document, which must be an object, into a struct.
pub fn from_json_str(json: &str) -> Result<Struct> {
    from_json_str_with(json, &ConvertOptions::default())
}

pub fn from_json_str_with(json: &str, options: &ConvertOptions) -> Result<Struct> {
    let map = match serde_json::from_str(json)? {
        JsonValue::Object(map) => map,
        other => {
            return Err(StructError::ContainerMismatch {
                expected: Variant::Struct.name(),
                found: json_kind(&other),
            })
        }
    };
    let mut root = Struct::new();
    update_struct(&mut root, &map, options)?;
    Ok(root)
}

fn fill_struct(
    target: &mut Struct,
    source: &Map<String, JsonValue>,
    options: &ConvertOptions,
    depth: usize,
) -> Result<()> {
    check_depth(depth, options)?;
    trace!("filling struct with {} entries at depth {depth}", source.len());

    for (key, val) in source {
        match val {
            JsonValue::Object(inner) => {
                fill_struct(target.get_or_create_struct(key), inner, options, depth + 1)?;
            }
            JsonValue::Array(items) => {
                fill_list(target.get_or_create_list(key), items, options, depth + 1)?;
            }
            scalar => target.set(key.as_str(), scalar_value(scalar)?),
        }
    }

    // A target that already holds entries is committed; only a fresh empty one
    // needs the placeholder, and only then is the reserved key free.
    if source.is_empty() && target.is_empty() && options.empty_policy == EmptyPolicy::ForceSet {
        debug!("committing empty struct at depth {depth} with a placeholder entry");
        target.set(PLACEHOLDER_KEY, "v");
        target.remove(PLACEHOLDER_KEY);
    }
    Ok(())
}

fn fill_list(
    target: &mut ListValue,
    source: &[JsonValue],
    options: &ConvertOptions,
    depth: usize,
) -> Result<()> {
    check_depth(depth, options)?;
    trace!("filling list with {} elements at depth {depth}", source.len());

    for val in source {
        match val {
            JsonValue::Object(inner) => {
                fill_struct(target.add_struct(), inner, options, depth + 1)?;
            }
            JsonValue::Array(items) => {
                fill_list(target.add_list(), items, options, depth + 1)?;
            }
            scalar => target.append(scalar_value(scalar)?),
        }
    }

    if source.is_empty() && target.is_empty() && options.empty_policy == EmptyPolicy::ForceSet {
        debug!("committing empty list at depth {depth} with a placeholder element");
        target.append(0);
        target.pop(target.len() - 1)?;
    }
    Ok(())
}

fn check_depth(depth: usize, options: &ConvertOptions) -> Result<()> {
    if depth > options.max_depth {
        return Err(StructError::DepthLimitExceeded {
            limit: options.max_depth,
        });
    }
    Ok(())
}

fn scalar_value(value: &JsonValue) -> Result<Value> {
    match value {
        JsonValue::Null => Ok(Value::null()),
        JsonValue::Bool(b) => Ok((*b).into()),
        JsonValue::Number(n) => n
            .as_f64()
            .map(Value::from)
            .ok_or_else(|| StructError::UnrepresentableNumber(n.to_string())),
        JsonValue::String(s) => Ok(s.as_str().into()),
        JsonValue::Object(_) | JsonValue::Array(_) => Err(StructError::ContainerMismatch {
            expected: "scalar",
            found: json_kind(value),
        }),
    }
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "bool",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Object(_) => "object",
        JsonValue::Array(_) => "array",
    }
}

// ============================================================================
// struct tree -> JSON
// ============================================================================

/// Copy every field of `source` into `target` and return `target`.
///
/// Containers are discriminated with [`Value::which`]; everything else is read
/// through [`Struct::get`], so a slot left uncommitted fails here with
/// [`StructError::ValueNotSet`].
pub fn update_json_from_struct<'a>(
    target: &'a mut Map<String, JsonValue>,
    source: &Struct,
) -> Result<&'a mut Map<String, JsonValue>> {
    for (key, value) in source.fields() {
        match value.which() {
            Some(Variant::Struct) => {
                let mut inner = Map::new();
                update_json_from_struct(&mut inner, expect_struct(source.get(key)?)?)?;
                target.insert(key.to_owned(), JsonValue::Object(inner));
            }
            Some(Variant::List) => {
                let mut inner = Vec::new();
                update_json_from_list(&mut inner, expect_list(source.get(key)?)?)?;
                target.insert(key.to_owned(), JsonValue::Array(inner));
            }
            _ => {
                target.insert(key.to_owned(), scalar_json(source.get(key)?)?);
            }
        }
    }
    Ok(target)
}

/// Append every element of `source` to `target` and return `target`.
pub fn update_json_from_list<'a>(
    target: &'a mut Vec<JsonValue>,
    source: &ListValue,
) -> Result<&'a mut Vec<JsonValue>> {
    for (index, value) in source.values().enumerate() {
        match value.view() {
            Some(ValueRef::Struct(inner_source)) => {
                let mut inner = Map::new();
                update_json_from_struct(&mut inner, inner_source)?;
                target.push(JsonValue::Object(inner));
            }
            Some(ValueRef::List(inner_source)) => {
                let mut inner = Vec::new();
                update_json_from_list(&mut inner, inner_source)?;
                target.push(JsonValue::Array(inner));
            }
            _ => target.push(scalar_json(source.get(index)?)?),
        }
    }
    Ok(target)
}

pub fn struct_to_json(source: &Struct) -> Result<Map<String, JsonValue>> {
    let mut map = Map::new();
    update_json_from_struct(&mut map, source)?;
    Ok(map)
}

pub fn list_to_json(source: &ListValue) -> Result<Vec<JsonValue>> {
    let mut items = Vec::new();
    update_json_from_list(&mut items, source)?;
    Ok(items)
}

/// Compact JSON text for a struct tree.
pub fn to_json_string(source: &Struct) -> Result<String> {
    Ok(serde_json::to_string(&struct_to_json(source)?)?)
}

pub fn to_json_string_pretty(source: &Struct) -> Result<String> {
    Ok(serde_json::to_string_pretty(&struct_to_json(source)?)?)
}

fn expect_struct(value: ValueRef<'_>) -> Result<&Struct> {
    value.as_struct().ok_or(StructError::ContainerMismatch {
        expected: Variant::Struct.name(),
        found: value.variant().name(),
    })
}

fn expect_list(value: ValueRef<'_>) -> Result<&ListValue> {
    value.as_list().ok_or(StructError::ContainerMismatch {
        expected: Variant::List.name(),
        found: value.variant().name(),
    })
}

fn scalar_json(value: ValueRef<'_>) -> Result<JsonValue> {
    match value {
        ValueRef::Null => Ok(JsonValue::Null),
        ValueRef::Bool(b) => Ok(JsonValue::Bool(b)),
        ValueRef::Number(n) => Number::from_f64(n)
            .map(JsonValue::Number)
            .ok_or(StructError::NonFiniteNumber(n)),
        ValueRef::String(s) => Ok(JsonValue::String(s.to_owned())),
        ValueRef::Struct(s) => Ok(JsonValue::Object(struct_to_json(s)?)),
        ValueRef::List(l) => Ok(JsonValue::Array(list_to_json(l)?)),
    }
}
