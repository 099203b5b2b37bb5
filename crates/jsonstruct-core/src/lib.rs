//! # jsonstruct-core
//!
//! Converts between `serde_json::Value` and a tagged-union struct tree
//! (null, bool, number, string, nested struct, nested list) used for
//! schema-less data interchange.
//!
//! The tree reproduces a known quirk of such values: a child container linked
//! into its parent but never written to reads back as *unset*. Converting an
//! empty JSON object or array naively leaves exactly such a container behind.
//! The converter commits every empty container with a placeholder entry that
//! it removes again before returning.
//!
//! ## Quick start
//!
//! ```rust
//! use jsonstruct_core::{from_json_str, to_json_string};
//!
//! let json = r#"{"name":"Alice","tags":[],"meta":{}}"#;
//! let tree = from_json_str(json).unwrap();
//! assert!(tree.get("meta").unwrap().as_struct().unwrap().is_empty());
//!
//! let back = to_json_string(&tree).unwrap();
//! assert_eq!(back, json);
//! ```
//!
//! ## Modules
//!
//! - [`value`] — `Value`, `Struct`, `ListValue` and their accessors
//! - [`convert`] — JSON → tree and tree → JSON
//! - [`inspect`] — variant counts and unset-slot diagnostics
//! - [`error`] — Error types for reads and conversions

pub mod convert;
pub mod error;
pub mod inspect;
pub mod value;

pub use convert::{
    from_json_str, from_json_str_with, list_from_json, list_to_json, struct_from_json,
    struct_to_json, to_json_string, to_json_string_pretty, update_from_json,
    update_json_from_list, update_json_from_struct, update_list, update_struct, Container,
    ConvertOptions, EmptyPolicy,
};
pub use error::{Result, StructError};
pub use inspect::{inspect_list, inspect_struct, unset_paths, TreeStats};
pub use value::{Kind, ListValue, Struct, Value, ValueRef, Variant};
