//! Tagged-union tree value: `Value`, `Struct` and `ListValue`.
//!
//! A `Value` slot holds at most one [`Kind`]. Child containers are linked into
//! their parent with get-or-create accessors ([`Struct::get_or_create_struct`],
//! [`ListValue::add_list`], ...) and owned by the parent slot from then on.
//!
//! # Uncommitted containers
//!
//! A container linked by one of those accessors starts out *uncommitted*. Until
//! it receives its first write (set, remove, append, pop, or linking a child),
//! the slot that holds it reports no variant and reading it fails:
//!
//! ```
//! use jsonstruct_core::{Struct, StructError};
//!
//! let mut root = Struct::new();
//! root.get_or_create_list("items");
//! assert!(matches!(root.get("items"), Err(StructError::ValueNotSet { .. })));
//!
//! let items = root.get_or_create_list("items");
//! items.append(0);
//! items.pop(0).unwrap();
//! assert!(root.get("items").unwrap().as_list().unwrap().is_empty());
//! ```
//!
//! The commit survives removal of the entry that caused it, which is what the
//! placeholder step in [`crate::convert`] relies on.

use std::fmt;

use crate::error::{Result, StructError};

/// Discriminator for the active variant of a [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
    Null,
    Bool,
    Number,
    String,
    Struct,
    List,
}

impl Variant {
    /// Lowercase name used in error messages and reports.
    pub fn name(self) -> &'static str {
        match self {
            Variant::Null => "null",
            Variant::Bool => "bool",
            Variant::Number => "number",
            Variant::String => "string",
            Variant::Struct => "struct",
            Variant::List => "list",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Payload of a [`Value`]. Numbers share a single `f64` representation.
#[derive(Debug, Clone, PartialEq)]
pub enum Kind {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Struct(Struct),
    List(ListValue),
}

impl Kind {
    pub fn variant(&self) -> Variant {
        match self {
            Kind::Null => Variant::Null,
            Kind::Bool(_) => Variant::Bool,
            Kind::Number(_) => Variant::Number,
            Kind::String(_) => Variant::String,
            Kind::Struct(_) => Variant::Struct,
            Kind::List(_) => Variant::List,
        }
    }
}

/// A single slot of the tree. `Value::default()` is an unset slot.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Value {
    kind: Option<Kind>,
}

impl Value {
    pub fn null() -> Self {
        Self {
            kind: Some(Kind::Null),
        }
    }

    /// Which variant is set, or `None` for an unset slot. Never fails.
    ///
    /// A slot holding an uncommitted container counts as unset.
    pub fn which(&self) -> Option<Variant> {
        self.kind().map(Kind::variant)
    }

    pub fn is_set(&self) -> bool {
        self.which().is_some()
    }

    /// The committed payload, if any.
    pub fn kind(&self) -> Option<&Kind> {
        match &self.kind {
            Some(Kind::Struct(s)) if !s.committed => None,
            Some(Kind::List(l)) if !l.committed => None,
            other => other.as_ref(),
        }
    }

    /// Borrowed view of the committed payload, if any.
    pub fn view(&self) -> Option<ValueRef<'_>> {
        self.kind().map(|kind| match kind {
            Kind::Null => ValueRef::Null,
            Kind::Bool(b) => ValueRef::Bool(*b),
            Kind::Number(n) => ValueRef::Number(*n),
            Kind::String(s) => ValueRef::String(s),
            Kind::Struct(s) => ValueRef::Struct(s),
            Kind::List(l) => ValueRef::List(l),
        })
    }

    fn struct_slot(&mut self) -> &mut Struct {
        if !matches!(self.kind, Some(Kind::Struct(_))) {
            self.kind = Some(Kind::Struct(Struct::default()));
        }
        match &mut self.kind {
            Some(Kind::Struct(s)) => s,
            _ => unreachable!("slot was just linked to a struct"),
        }
    }

    fn list_slot(&mut self) -> &mut ListValue {
        if !matches!(self.kind, Some(Kind::List(_))) {
            self.kind = Some(Kind::List(ListValue::default()));
        }
        match &mut self.kind {
            Some(Kind::List(l)) => l,
            _ => unreachable!("slot was just linked to a list"),
        }
    }
}

impl From<Kind> for Value {
    fn from(kind: Kind) -> Self {
        Self { kind: Some(kind) }
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::null()
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Kind::Bool(b).into()
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Kind::Number(n).into()
    }
}

macro_rules! number_from {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(n: $t) -> Self {
                    Kind::Number(n as f64).into()
                }
            }
        )*
    };
}

number_from!(f32, i8, i16, i32, i64, u8, u16, u32, u64);

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Kind::String(s.to_owned()).into()
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Kind::String(s).into()
    }
}

/// A whole struct assigned as a value is committed, even when empty.
impl From<Struct> for Value {
    fn from(mut s: Struct) -> Self {
        s.committed = true;
        Kind::Struct(s).into()
    }
}

impl From<ListValue> for Value {
    fn from(mut l: ListValue) -> Self {
        l.committed = true;
        Kind::List(l).into()
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or_else(Value::null, Into::into)
    }
}

/// Borrowed view of a committed slot, as returned by [`Struct::get`] and [`ListValue::get`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ValueRef<'a> {
    Null,
    Bool(bool),
    Number(f64),
    String(&'a str),
    Struct(&'a Struct),
    List(&'a ListValue),
}

impl<'a> ValueRef<'a> {
    pub fn variant(&self) -> Variant {
        match self {
            ValueRef::Null => Variant::Null,
            ValueRef::Bool(_) => Variant::Bool,
            ValueRef::Number(_) => Variant::Number,
            ValueRef::String(_) => Variant::String,
            ValueRef::Struct(_) => Variant::Struct,
            ValueRef::List(_) => Variant::List,
        }
    }

    pub fn as_struct(&self) -> Option<&'a Struct> {
        match *self {
            ValueRef::Struct(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&'a ListValue> {
        match *self {
            ValueRef::List(l) => Some(l),
            _ => None,
        }
    }
}

/// Mapping-mode container: string keys to [`Value`], in insertion order.
///
/// Fields are kept as `Vec<(String, Value)>`; lookups are linear, which keeps
/// insertion order without an extra map type.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Struct {
    fields: Vec<(String, Value)>,
    committed: bool,
}

impl Struct {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Whether this container has received any write since it was allocated.
    pub fn is_committed(&self) -> bool {
        self.committed
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    /// Raw slots in insertion order. Unlike [`Struct::get`], this never fails.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    /// The raw slot at `key`, whether or not it is set.
    pub fn value(&self, key: &str) -> Option<&Value> {
        self.position(key).map(|i| &self.fields[i].1)
    }

    /// Read the slot at `key`.
    ///
    /// Fails with [`StructError::ValueNotSet`] when the slot holds a container
    /// that was allocated but never written to.
    pub fn get(&self, key: &str) -> Result<ValueRef<'_>> {
        let slot = self
            .value(key)
            .ok_or_else(|| StructError::KeyNotFound(key.to_owned()))?;
        slot.view().ok_or_else(|| StructError::ValueNotSet {
            slot: key.to_owned(),
        })
    }

    /// Write `value` at `key`, replacing in place or appending a new entry.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        self.committed = true;
        match self.position(&key) {
            Some(i) => self.fields[i].1 = value,
            None => self.fields.push((key, value)),
        }
    }

    /// Remove the entry at `key`, keeping the order of the others.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        let i = self.position(key)?;
        self.committed = true;
        Some(self.fields.remove(i).1)
    }

    /// The struct at `key`, allocating and linking an empty uncommitted one
    /// unless the slot already holds a struct.
    pub fn get_or_create_struct(&mut self, key: &str) -> &mut Struct {
        self.slot_mut(key).struct_slot()
    }

    /// The list at `key`, allocating and linking an empty uncommitted one
    /// unless the slot already holds a list.
    pub fn get_or_create_list(&mut self, key: &str) -> &mut ListValue {
        self.slot_mut(key).list_slot()
    }

    fn slot_mut(&mut self, key: &str) -> &mut Value {
        self.committed = true;
        let i = match self.position(key) {
            Some(i) => i,
            None => {
                self.fields.push((key.to_owned(), Value::default()));
                self.fields.len() - 1
            }
        };
        &mut self.fields[i].1
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.fields.iter().position(|(k, _)| k == key)
    }
}

/// Sequence-mode container.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ListValue {
    values: Vec<Value>,
    committed: bool,
}

impl ListValue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn is_committed(&self) -> bool {
        self.committed
    }

    /// Raw slots in order.
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.values.iter()
    }

    pub fn value(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// Read the element at `index`; see [`Struct::get`].
    pub fn get(&self, index: usize) -> Result<ValueRef<'_>> {
        let slot = self.values.get(index).ok_or(StructError::IndexOutOfRange {
            index,
            len: self.values.len(),
        })?;
        slot.view().ok_or_else(|| StructError::ValueNotSet {
            slot: format!("[{index}]"),
        })
    }

    pub fn append(&mut self, value: impl Into<Value>) {
        self.committed = true;
        self.values.push(value.into());
    }

    /// Remove and return the element at `index`.
    pub fn pop(&mut self, index: usize) -> Result<Value> {
        if index >= self.values.len() {
            return Err(StructError::IndexOutOfRange {
                index,
                len: self.values.len(),
            });
        }
        self.committed = true;
        Ok(self.values.remove(index))
    }

    /// Append an empty uncommitted struct and return it.
    pub fn add_struct(&mut self) -> &mut Struct {
        self.push_slot().struct_slot()
    }

    /// Append an empty uncommitted list and return it.
    pub fn add_list(&mut self) -> &mut ListValue {
        self.push_slot().list_slot()
    }

    fn push_slot(&mut self) -> &mut Value {
        self.committed = true;
        self.values.push(Value::default());
        let last = self.values.len() - 1;
        &mut self.values[last]
    }
}
